//!
//! src/fetch.rs  Andrew Belles  Oct 18th, 2026
//!
//! Defines methods for building requests against the spotify and tidal
//! catalog endpoints. Nothing here sends or parses, see catalog/
//!

use reqwest::{Client, header, redirect, RequestBuilder};
use url::Url;

use crate::config::{HttpConfig, SpotifyConfig, TidalConfig};
use crate::errors::ConvertError;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder  {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

fn client_with_headers(http: &HttpConfig, headers: header::HeaderMap) ->
    Result<Client, ConvertError> {
    client_helper(http)
        .default_headers(headers)
        .user_agent(concat!("rs-link-converter/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ConvertError::Http(format!("build client: {e}")))
}

fn client_accepting(http: &HttpConfig, accept: &'static str) -> Result<Client, ConvertError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static(accept));
    client_with_headers(http, h)
}

fn join(base: &Url, path: &str) -> Result<Url, ConvertError> {
    base.join(path)
        .map_err(|e| ConvertError::Config(format!("join {path} onto {base}: {e}")))
}

/// {base}{collection}/{id} with the id pushed as one percent-encoded segment
fn entity_url(base: &Url, collection: &str, id: &str) -> Result<Url, ConvertError> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(ConvertError::InvalidId(id.to_string()));
    }

    let mut url = join(base, collection)?;
    url.path_segments_mut()
        .map_err(|_| ConvertError::Config(format!("{base} cannot carry a path")))?
        .push(id);
    Ok(url)
}

/// POST {token_url} grant_type=client_credentials with basic client auth
fn client_credentials(
    http: &Client,
    token_url: &Url,
    client_id: &str,
    client_secret: &str
) -> RequestBuilder {
    http
        .post(token_url.clone())
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
}

#[derive(Clone, Debug)]
pub struct SpotifyClient {
    pub http: Client,
    pub cfg: SpotifyConfig
}

impl SpotifyClient {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) ->
        Result<Self, ConvertError> {

        let http = client_accepting(http_config, "application/json")?;
        Ok( Self {
            http,
            cfg: cfg.clone()
        })
    }

    pub fn token_request(&self) -> RequestBuilder {
        client_credentials(
            &self.http, &self.cfg.token_url, &self.cfg.client_id, &self.cfg.client_secret
        )
    }

    /// GET /v1/tracks/{id}
    pub fn track(&self, track_id: &str, bearer: &str) -> Result<RequestBuilder, ConvertError> {
        let url = entity_url(&self.cfg.api_base, "tracks", track_id)?;
        Ok(self.http.get(url).bearer_auth(bearer))
    }

    /// GET /v1/albums/{id}
    pub fn album(&self, album_id: &str, bearer: &str) -> Result<RequestBuilder, ConvertError> {
        let url = entity_url(&self.cfg.api_base, "albums", album_id)?;
        Ok(self.http.get(url).bearer_auth(bearer))
    }

    /// GET /v1/search?q={field}:{code}&type={kind}
    pub fn search(&self, field: &str, code: &str, kind: &str, bearer: &str) ->
        Result<RequestBuilder, ConvertError> {
        let url = join(&self.cfg.api_base, "search")?;
        let query = format!("{field}:{code}");
        Ok(self.http.get(url).bearer_auth(bearer).query(&[
            ("q", query.as_str()),
            ("type", kind)
        ]))
    }
}

#[derive(Clone, Debug)]
pub struct TidalClient {
    pub http: Client,
    pub cfg: TidalConfig
}

impl TidalClient {
    pub fn new(http_config: &HttpConfig, cfg: &TidalConfig) ->
        Result<Self, ConvertError> {

        let http = client_accepting(http_config, "application/vnd.api+json")?;
        Ok( Self {
            http,
            cfg: cfg.clone()
        })
    }

    pub fn token_request(&self) -> RequestBuilder {
        client_credentials(
            &self.http, &self.cfg.token_url, &self.cfg.client_id, &self.cfg.client_secret
        )
    }

    /// GET /v2/tracks/{id}?countryCode=
    pub fn track(&self, track_id: &str, bearer: &str) -> Result<RequestBuilder, ConvertError> {
        let url = entity_url(&self.cfg.api_base, "tracks", track_id)?;
        Ok(self.http.get(url).bearer_auth(bearer).query(&[
            ("countryCode", self.cfg.country_code.as_str())
        ]))
    }

    /// GET /v2/tracks?countryCode=&filter[isrc]=
    pub fn tracks_by_isrc(&self, isrc: &str, bearer: &str) -> Result<RequestBuilder, ConvertError> {
        let url = join(&self.cfg.api_base, "tracks")?;
        Ok(self.http.get(url).bearer_auth(bearer).query(&[
            ("countryCode", self.cfg.country_code.as_str()),
            ("filter[isrc]", isrc)
        ]))
    }

    /// GET /v2/albums/{id}?countryCode=&include=artists
    pub fn album(&self, album_id: &str, bearer: &str) -> Result<RequestBuilder, ConvertError> {
        let url = entity_url(&self.cfg.api_base, "albums", album_id)?;
        Ok(self.http.get(url).bearer_auth(bearer).query(&[
            ("countryCode", self.cfg.country_code.as_str()),
            ("include", "artists")
        ]))
    }

    /// GET /v2/albums?countryCode=&filter[barcodeId]=
    pub fn albums_by_barcode(&self, upc: &str, bearer: &str) -> Result<RequestBuilder, ConvertError> {
        let url = join(&self.cfg.api_base, "albums")?;
        Ok(self.http.get(url).bearer_auth(bearer).query(&[
            ("countryCode", self.cfg.country_code.as_str()),
            ("filter[barcodeId]", upc)
        ]))
    }
}
