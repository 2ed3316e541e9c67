//!
//! src/catalog/tidal.rs  Andrew Belles  Oct 18th, 2026
//!
//! Tidal open api (v2) catalog client. Everything interesting sits under
//! the top level `data` object, related resources under `included`
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
use crate::fetch::TidalClient;
use crate::types::{AlbumInfo, Isrc, StreamingPlatform, Upc};

const PLATFORM: StreamingPlatform = StreamingPlatform::Tidal;

pub struct TidalCatalog {
    client: TidalClient,
    tokens: Arc<dyn TokenProvider>
}

impl TidalCatalog {
    pub fn new(client: TidalClient, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { client, tokens }
    }
}

/// GET /tracks/{id} -> data.attributes.isrc
pub(crate) fn track_isrc(track: &Value, id: &str) -> Result<Isrc, ConvertError> {
    let context = format!("tidal track {id}");
    Ok(Isrc(str_at(track, "/data/attributes/isrc", &context)?.to_string()))
}

/// Public url of a search hit, first external link wins
fn resource_link(hit: &Value, context: &str) -> Result<String, ConvertError> {
    Ok(str_at(hit, "/attributes/externalLinks/0/href", context)?.to_string())
}

/// GET /tracks?filter[isrc]= -> data[0].attributes.externalLinks[0].href
pub(crate) fn track_link(search: &Value, isrc: &Isrc) -> Result<String, ConvertError> {
    let context = format!("tidal track search for isrc {isrc}");
    resource_link(first_result(search, "/data", &context)?, &context)
}

///
/// GET /albums/{id}?include=artists
///
/// The artist comes from `included[0]`, matched by position rather than by
/// the album's artist relationship id. This only holds while tidal returns
/// the primary artist first among the included resources.
///
pub(crate) fn album_info(album: &Value, id: &str) -> Result<AlbumInfo, ConvertError> {
    let context = format!("tidal album {id}");
    Ok( AlbumInfo {
        artist: str_at(album, "/included/0/attributes/name", &context)?.to_string(),
        album_name: str_at(album, "/data/attributes/title", &context)?.to_string(),
        release_date: str_at(album, "/data/attributes/releaseDate", &context)?.to_string(),
        upc: Upc(code_at(album, "/data/attributes/barcodeId", &context)?)
    })
}

/// GET /albums?filter[barcodeId]= -> data[0].attributes.externalLinks[0].href
pub(crate) fn album_link(search: &Value, upc: &Upc) -> Result<String, ConvertError> {
    let context = format!("tidal album search for upc {upc}");
    resource_link(first_result(search, "/data", &context)?, &context)
}

#[async_trait]
impl CatalogClient for TidalCatalog {
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
        let request = self.client.tracks_by_isrc(&isrc.0, &bearer)?;
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
        let request = self.client.albums_by_barcode(&album.upc.0, &bearer)?;
        let json = send_json(PLATFORM, request, "album search", Lookup::Search).await?;
        let link = album_link(&json, &album.upc)?;
        info!(platform = %PLATFORM, upc = %album.upc, link = %link, "catalog.album.link");
        Ok(link)
    }
}
