//!
//! src/convert.rs  Andrew Belles  Oct 18th, 2026
//!
//! Resolves an id on its origin platform to a universal code (ISRC/UPC)
//! and looks that code up on the other platform
//!

use std::sync::Arc;

use tracing::{info, instrument};

use crate::catalog::CatalogClient;
use crate::errors::ConvertError;
use crate::link;
use crate::types::{EntityKind, StreamingPlatform};

pub struct Converter {
    tidal: Arc<dyn CatalogClient>,
    spotify: Arc<dyn CatalogClient>
}

impl Converter {
    pub fn new(
        tidal: Arc<dyn CatalogClient>,
        spotify: Arc<dyn CatalogClient>
    ) -> Result<Self, ConvertError> {
        for (expected, client) in [
            (StreamingPlatform::Tidal, &tidal),
            (StreamingPlatform::Spotify, &spotify)
        ] {
            if client.platform() != expected {
                return Err(ConvertError::Config(format!(
                    "{} catalog wired into the {expected} slot", client.platform()
                )));
            }
        }
        Ok( Self { tidal, spotify } )
    }

    fn checked(id: &str) -> Result<&str, ConvertError> {
        if link::valid_id(id) {
            Ok(id)
        } else {
            Err(ConvertError::InvalidId(id.to_string()))
        }
    }

    fn catalog(&self, platform: StreamingPlatform) -> &dyn CatalogClient {
        match platform {
            StreamingPlatform::Tidal => self.tidal.as_ref(),
            StreamingPlatform::Spotify => self.spotify.as_ref()
        }
    }

    /// Track id on either platform -> link on the other one
    #[instrument(skip(self), fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn convert_track(&self, id: &str) -> Result<Vec<String>, ConvertError> {
        let id = Self::checked(id)?;
        let origin = StreamingPlatform::classify(id);
        let target = origin.counterpart();
        info!(%origin, %target, "convert.track.start");

        let isrc = self.catalog(origin).resolve_track_code(id).await?;
        let link = self.catalog(target).resolve_track_link_by_code(&isrc).await?;

        info!(%origin, %target, isrc = %isrc, "convert.track.done");
        Ok(vec![link])
    }

    /// Album id on either platform -> link on the other one
    #[instrument(skip(self), fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn convert_album(&self, id: &str) -> Result<Vec<String>, ConvertError> {
        let id = Self::checked(id)?;
        let origin = StreamingPlatform::classify(id);
        let target = origin.counterpart();
        info!(%origin, %target, "convert.album.start");

        let album = self.catalog(origin).resolve_album_info(id).await?;
        let link = self.catalog(target).resolve_album_link_by_code(&album).await?;

        info!(%origin, %target, upc = %album.upc, "convert.album.done");
        Ok(vec![link])
    }

    /// Shared link -> link on the other platform, kind taken from the link
    pub async fn convert_link(&self, raw: &str) -> Result<Vec<String>, ConvertError> {
        let shared = link::parse(raw)?;
        info!(
            platform = %shared.platform,
            kind = shared.kind.as_str(),
            id = %shared.id,
            "convert.link.parsed"
        );

        match shared.kind {
            EntityKind::Track => self.convert_track(&shared.id).await,
            EntityKind::Album => self.convert_album(&shared.id).await
        }
    }
}
