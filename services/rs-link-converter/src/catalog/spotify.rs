//!
//! src/catalog/spotify.rs  Andrew Belles  Oct 18th, 2026
//!
//! Spotify web api catalog client. Responses are flat: codes live under
//! external_ids and links under external_urls
//!

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::auth::TokenProvider;
use crate::catalog::{
    bearer, code_at, first_result, send_json, str_at, CatalogClient, Lookup
};
use crate::errors::ConvertError;
use crate::fetch::SpotifyClient;
use crate::types::{AlbumInfo, Isrc, StreamingPlatform, Upc};

const PLATFORM: StreamingPlatform = StreamingPlatform::Spotify;

pub struct SpotifyCatalog {
    client: SpotifyClient,
    tokens: Arc<dyn TokenProvider>
}

impl SpotifyCatalog {
    pub fn new(client: SpotifyClient, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { client, tokens }
    }
}

/// GET /tracks/{id} -> external_ids.isrc
pub(crate) fn track_isrc(track: &Value, id: &str) -> Result<Isrc, ConvertError> {
    let context = format!("spotify track {id}");
    Ok(Isrc(str_at(track, "/external_ids/isrc", &context)?.to_string()))
}

/// GET /search?type=track -> tracks.items[0].external_urls.spotify
pub(crate) fn track_link(search: &Value, isrc: &Isrc) -> Result<String, ConvertError> {
    let context = format!("spotify track search for isrc {isrc}");
    let hit = first_result(search, "/tracks/items", &context)?;
    Ok(str_at(hit, "/external_urls/spotify", &context)?.to_string())
}

/// GET /albums/{id} -> name, release_date, artists[0].name, external_ids.upc
pub(crate) fn album_info(album: &Value, id: &str) -> Result<AlbumInfo, ConvertError> {
    let context = format!("spotify album {id}");
    Ok( AlbumInfo {
        artist: str_at(album, "/artists/0/name", &context)?.to_string(),
        album_name: str_at(album, "/name", &context)?.to_string(),
        release_date: str_at(album, "/release_date", &context)?.to_string(),
        upc: Upc(code_at(album, "/external_ids/upc", &context)?)
    })
}

/// GET /search?type=album -> albums.items[0].external_urls.spotify
pub(crate) fn album_link(search: &Value, upc: &Upc) -> Result<String, ConvertError> {
    let context = format!("spotify album search for upc {upc}");
    let hit = first_result(search, "/albums/items", &context)?;
    Ok(str_at(hit, "/external_urls/spotify", &context)?.to_string())
}

#[async_trait]
impl CatalogClient for SpotifyCatalog {
    fn platform(&self) -> StreamingPlatform { PLATFORM }

    async fn resolve_track_code(&self, id: &str) -> Result<Isrc, ConvertError> {
        let bearer = bearer(self.tokens.as_ref(), PLATFORM).await?;
        let request = self.client.track(id, &bearer)?;
        let json = send_json(PLATFORM, request, "track", Lookup::ById).await?;
        let isrc = track_isrc(&json, id)?;
        info!(platform = %PLATFORM, id, isrc = %isrc, "catalog.track.code");
        Ok(isrc)
    }

    async fn resolve_track_link_by_code(&self, isrc: &Isrc) -> Result<String, ConvertError> {
        let bearer = bearer(self.tokens.as_ref(), PLATFORM).await?;
        let request = self.client.search("isrc", &isrc.0, "track", &bearer)?;
        let json = send_json(PLATFORM, request, "track search", Lookup::Search).await?;
        let link = track_link(&json, isrc)?;
        info!(platform = %PLATFORM, isrc = %isrc, link = %link, "catalog.track.link");
        Ok(link)
    }

    async fn resolve_album_info(&self, id: &str) -> Result<AlbumInfo, ConvertError> {
        let bearer = bearer(self.tokens.as_ref(), PLATFORM).await?;
        let request = self.client.album(id, &bearer)?;
        let json = send_json(PLATFORM, request, "album", Lookup::ById).await?;
        let album = album_info(&json, id)?;
        info!(platform = %PLATFORM, id, upc = %album.upc, "catalog.album.info");
        Ok(album)
    }

    async fn resolve_album_link_by_code(&self, album: &AlbumInfo) -> Result<String, ConvertError> {
        let bearer = bearer(self.tokens.as_ref(), PLATFORM).await?;
        let request = self.client.search("upc", &album.upc.0, "album", &bearer)?;
        let json = send_json(PLATFORM, request, "album search", Lookup::Search).await?;
        let link = album_link(&json, &album.upc)?;
        info!(platform = %PLATFORM, upc = %album.upc, link = %link, "catalog.album.link");
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::auth::tests::{CountingProvider, NoTokens};
    use crate::catalog::tests::{local_client, stub_server};
    use crate::config::HttpConfig;
    use crate::fetch::tests::spotify_config;

    #[test]
    fn track_isrc_from_external_ids() {
        let track = json!({
            "id": "3tYxhPqkioZEV5el3DJxLQ",
            "name": "Breathe Deeper",
            "external_ids": { "isrc": "AUUM71900929" }
        });
        assert_eq!(
            track_isrc(&track, "3tYxhPqkioZEV5el3DJxLQ").unwrap(),
            Isrc("AUUM71900929".to_string())
        );

        let no_ids = json!({ "id": "x", "external_ids": {} });
        assert!(matches!(track_isrc(&no_ids, "x"), Err(ConvertError::MalformedResponse(_))));
    }

    #[test]
    fn track_link_takes_first_item() {
        let search = json!({ "tracks": { "items": [
            { "external_urls": { "spotify": "https://open.spotify.com/track/first" } },
            { "external_urls": { "spotify": "https://open.spotify.com/track/second" } }
        ]}});
        let isrc = Isrc("AUUM71900929".to_string());
        assert_eq!(track_link(&search, &isrc).unwrap(), "https://open.spotify.com/track/first");
    }

    #[test]
    fn empty_track_search_is_no_match() {
        let search = json!({ "tracks": { "items": [], "total": 0 } });
        let isrc = Isrc("ZZZZ00000000".to_string());
        assert!(matches!(track_link(&search, &isrc), Err(ConvertError::NoMatch(_))));
    }

    #[test]
    fn album_info_reads_flat_fields() {
        let album = json!({
            "name": "Currents",
            "release_date": "2015-07-17",
            "artists": [{ "name": "Tame Impala" }, { "name": "Someone Else" }],
            "external_ids": { "upc": "00602547240064" }
        });
        let info = album_info(&album, "79dL7FLiJFOO0EoehUHQBv").unwrap();
        assert_eq!(info, AlbumInfo {
            artist: "Tame Impala".to_string(),
            album_name: "Currents".to_string(),
            release_date: "2015-07-17".to_string(),
            upc: Upc("00602547240064".to_string())
        });
    }

    #[test]
    fn album_without_artists_is_malformed() {
        let album = json!({
            "name": "Currents",
            "release_date": "2015-07-17",
            "artists": [],
            "external_ids": { "upc": "00602547240064" }
        });
        assert!(matches!(album_info(&album, "x"), Err(ConvertError::MalformedResponse(_))));
    }

    #[test]
    fn album_link_and_empty_search() {
        let upc = Upc("00602547240064".to_string());
        let search = json!({ "albums": { "items": [
            { "external_urls": { "spotify": "https://open.spotify.com/album/79dL7FLiJFOO0EoehUHQBv" } }
        ]}});
        assert_eq!(
            album_link(&search, &upc).unwrap(),
            "https://open.spotify.com/album/79dL7FLiJFOO0EoehUHQBv"
        );

        let empty = json!({ "albums": { "items": [] } });
        assert!(matches!(album_link(&empty, &upc), Err(ConvertError::NoMatch(_))));
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        let mut cfg = spotify_config();
        // unroutable, so an attempted request would surface as an http error
        cfg.api_base = url::Url::parse("https://127.0.0.1:9/v1/").unwrap();
        let client = SpotifyClient::new(&HttpConfig::default(), &cfg).unwrap();
        let catalog = SpotifyCatalog::new(client, Arc::new(NoTokens));

        let err = catalog.resolve_track_code("3tYxhPqkioZEV5el3DJxLQ").await.unwrap_err();
        assert!(matches!(err, ConvertError::Auth(StreamingPlatform::Spotify)));

        let isrc = Isrc("AUUM71900929".to_string());
        let err = catalog.resolve_track_link_by_code(&isrc).await.unwrap_err();
        assert!(matches!(err, ConvertError::Auth(StreamingPlatform::Spotify)));
    }

    #[tokio::test]
    async fn invalid_id_reply_is_not_found() {
        let base = stub_server(400, r#"{"error":{"status":400,"message":"invalid id"}}"#).await;
        let mut cfg = spotify_config();
        cfg.api_base = base.join("v1/").unwrap();
        let catalog = SpotifyCatalog::new(
            SpotifyClient { http: local_client(), cfg },
            Arc::new(CountingProvider::new(None))
        );

        let err = catalog.resolve_album_info("notAnAlbum").await.unwrap_err();
        assert!(matches!(err, ConvertError::NotFound(_)));
    }

    #[tokio::test]
    async fn track_code_read_from_live_response() {
        let base = stub_server(
            200, r#"{"id":"3tYxhPqkioZEV5el3DJxLQ","external_ids":{"isrc":"AUUM71900929"}}"#
        ).await;
        let mut cfg = spotify_config();
        cfg.api_base = base.join("v1/").unwrap();
        let catalog = SpotifyCatalog::new(
            SpotifyClient { http: local_client(), cfg },
            Arc::new(CountingProvider::new(None))
        );

        let isrc = catalog.resolve_track_code("3tYxhPqkioZEV5el3DJxLQ").await.unwrap();
        assert_eq!(isrc, Isrc("AUUM71900929".to_string()));
    }
}
