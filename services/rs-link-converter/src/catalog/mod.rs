//!
//! src/catalog/mod.rs  Andrew Belles  Oct 18th, 2026
//!
//! Catalog client contract shared by spotify and tidal, plus the
//! helpers both use to send requests and walk the json they get back
//!

pub mod spotify;
pub mod tidal;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::auth::TokenProvider;
use crate::errors::ConvertError;
use crate::types::{AlbumInfo, Isrc, StreamingPlatform};

pub use spotify::SpotifyCatalog;
pub use tidal::TidalCatalog;

///
/// One platform's view of the catalog. The `*_by_code` lookups are search
/// based and always take the first hit, so multiple pressings sharing a
/// code are not told apart.
///
#[async_trait]
pub trait CatalogClient: Send + Sync {
    fn platform(&self) -> StreamingPlatform;

    /// platform track id -> ISRC
    async fn resolve_track_code(&self, id: &str) -> Result<Isrc, ConvertError>;

    /// ISRC -> public track url
    async fn resolve_track_link_by_code(&self, isrc: &Isrc) -> Result<String, ConvertError>;

    /// platform album id -> album metadata including UPC
    async fn resolve_album_info(&self, id: &str) -> Result<AlbumInfo, ConvertError>;

    /// album UPC -> public album url
    async fn resolve_album_link_by_code(&self, album: &AlbumInfo) -> Result<String, ConvertError>;
}

/// Bearer for `platform`, or an auth error when the provider has none
pub(crate) async fn bearer(
    tokens: &dyn TokenProvider,
    platform: StreamingPlatform
) -> Result<String, ConvertError> {
    tokens.access_token(platform)
        .await
        .map(|t| t.bearer)
        .ok_or(ConvertError::Auth(platform))
}

/// Shape of a catalog request, decides how a 400 is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    ById,
    Search
}

/// Sends `request` and decodes the body, mapping statuses onto the error taxonomy
pub(crate) async fn send_json(
    platform: StreamingPlatform,
    request: RequestBuilder,
    what: &str,
    lookup: Lookup
) -> Result<Value, ConvertError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(%platform, status = status.as_u16(), what, ?lookup, "catalog.response");

    match (status, lookup) {
        (StatusCode::NOT_FOUND, _) | (StatusCode::BAD_REQUEST, Lookup::ById) => {
            return Err(ConvertError::NotFound(format!("{platform} has no such {what}")));
        },
        (s, _) if !s.is_success() => {
            return Err(ConvertError::Upstream { platform, status: s.as_u16() });
        },
        _ => {}
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Non-empty string at a json pointer
pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str, context: &str) ->
    Result<&'a str, ConvertError> {
    value.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ConvertError::MalformedResponse(
            format!("{context}: expected string at {pointer}")
        ))
}

/// Like `str_at` but also takes numbers, barcodes show up as either
pub(crate) fn code_at(value: &Value, pointer: &str, context: &str) ->
    Result<String, ConvertError> {
    match value.pointer(pointer) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ConvertError::MalformedResponse(
            format!("{context}: expected code at {pointer}")
        ))
    }
}

/// First element of the result array at `pointer`; an empty array is no match
pub(crate) fn first_result<'a>(value: &'a Value, pointer: &str, context: &str) ->
    Result<&'a Value, ConvertError> {
    let items = value.pointer(pointer)
        .and_then(Value::as_array)
        .ok_or_else(|| ConvertError::MalformedResponse(
            format!("{context}: expected array at {pointer}")
        ))?;

    items.first().ok_or_else(|| ConvertError::NoMatch(context.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use url::Url;

    /// Reads one request off the socket, headers plus content-length body
    async fn drain_request(socket: &mut TcpStream) {
        let mut seen = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n
            };
            seen.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&seen);
            let Some(end) = text.find("\r\n\r\n") else { continue };
            let length = text[..end].lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if seen.len() >= end + 4 + length {
                return;
            }
        }
    }

    ///
    /// Local http server answering every request with `status` and `body`.
    /// Returns its base url, e.g. http://127.0.0.1:PORT/
    ///
    pub(crate) async fn stub_server(status: u16, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                drain_request(&mut socket).await;
                let reply = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    /// Plain client that ignores any proxy set in the environment
    pub(crate) fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    async fn send_to(status: u16, body: &'static str, lookup: Lookup) ->
        Result<Value, ConvertError> {
        let base = stub_server(status, body).await;
        let request = local_client().get(base.join("tracks/1").unwrap());
        send_json(StreamingPlatform::Spotify, request, "track", lookup).await
    }

    #[tokio::test]
    async fn send_json_decodes_success() {
        let json = send_to(200, r#"{"external_ids":{"isrc":"AUUM71900929"}}"#, Lookup::ById)
            .await
            .unwrap();
        assert_eq!(json["external_ids"]["isrc"], "AUUM71900929");
    }

    #[tokio::test]
    async fn send_json_maps_statuses() {
        let err = send_to(404, r#"{"error":"missing"}"#, Lookup::ById).await.unwrap_err();
        assert!(matches!(err, ConvertError::NotFound(_)));

        let err = send_to(404, "", Lookup::Search).await.unwrap_err();
        assert!(matches!(err, ConvertError::NotFound(_)));

        let err = send_to(500, "{}", Lookup::ById).await.unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Upstream { platform: StreamingPlatform::Spotify, status: 500 }
        ));
    }

    #[tokio::test]
    async fn bad_request_is_not_found_only_for_lookups_by_id() {
        let body = r#"{"error":{"status":400,"message":"invalid id"}}"#;

        let err = send_to(400, body, Lookup::ById).await.unwrap_err();
        assert!(matches!(err, ConvertError::NotFound(_)));

        let err = send_to(400, body, Lookup::Search).await.unwrap_err();
        assert!(matches!(err, ConvertError::Upstream { status: 400, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_malformed() {
        let err = send_to(200, "<html>not json</html>", Lookup::Search).await.unwrap_err();
        assert!(matches!(err, ConvertError::MalformedResponse(_)));
    }

    #[test]
    fn str_at_rejects_missing_wrong_type_and_empty() {
        let v = json!({ "a": { "b": "x", "n": 3, "e": "" } });
        assert_eq!(str_at(&v, "/a/b", "t").unwrap(), "x");
        assert!(matches!(str_at(&v, "/a/n", "t"), Err(ConvertError::MalformedResponse(_))));
        assert!(matches!(str_at(&v, "/a/e", "t"), Err(ConvertError::MalformedResponse(_))));
        assert!(matches!(str_at(&v, "/a/zz", "t"), Err(ConvertError::MalformedResponse(_))));
    }

    #[test]
    fn code_at_accepts_numbers() {
        let v = json!({ "upc": 196589525444_u64, "s": "00602445790111" });
        assert_eq!(code_at(&v, "/upc", "t").unwrap(), "196589525444");
        assert_eq!(code_at(&v, "/s", "t").unwrap(), "00602445790111");
        assert!(code_at(&v, "/missing", "t").is_err());
    }

    #[test]
    fn first_result_distinguishes_empty_from_malformed() {
        let empty = json!({ "data": [] });
        assert!(matches!(first_result(&empty, "/data", "t"), Err(ConvertError::NoMatch(_))));

        let not_array = json!({ "data": {} });
        assert!(matches!(
            first_result(&not_array, "/data", "t"),
            Err(ConvertError::MalformedResponse(_))
        ));

        let one = json!({ "data": [{ "id": "1" }, { "id": "2" }] });
        assert_eq!(first_result(&one, "/data", "t").unwrap()["id"], "1");
    }
}
