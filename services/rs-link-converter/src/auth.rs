//!
//! src/auth.rs  Andrew Belles  Oct 18th, 2026
//!
//! Client credential tokens for the spotify and tidal catalogs, and a
//! small per platform cache that honours the lifetime the token endpoint
//! hands back
//!

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::ConvertError;
use crate::fetch::{SpotifyClient, TidalClient};
use crate::types::StreamingPlatform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub bearer: String,
    pub expires_in: Option<Duration>
}

///
/// Source of bearer credentials. `None` means no token could be obtained,
/// which catalog clients turn into an auth error before sending anything.
///
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self, platform: StreamingPlatform) -> Option<AccessToken>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>
}

/// Fetches a fresh token from the platform's oauth endpoint on every call
#[derive(Clone, Debug)]
pub struct ClientCredentialsProvider {
    spotify: SpotifyClient,
    tidal: TidalClient
}

impl ClientCredentialsProvider {
    pub fn new(spotify: SpotifyClient, tidal: TidalClient) -> Self {
        Self { spotify, tidal }
    }

    async fn fetch(&self, platform: StreamingPlatform) -> Result<AccessToken, ConvertError> {
        let request = match platform {
            StreamingPlatform::Spotify => self.spotify.token_request(),
            StreamingPlatform::Tidal => self.tidal.token_request()
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::Upstream { platform, status: status.as_u16() });
        }

        let body = response.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&body)?;
        if token.access_token.trim().is_empty() {
            return Err(ConvertError::MalformedResponse(
                format!("{platform} token endpoint returned an empty access_token")
            ));
        }

        Ok( AccessToken {
            bearer: token.access_token,
            expires_in: token.expires_in.map(Duration::from_secs)
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn access_token(&self, platform: StreamingPlatform) -> Option<AccessToken> {
        match self.fetch(platform).await {
            Ok(token) => {
                debug!(%platform, expires_in = ?token.expires_in, "token.fetch");
                Some(token)
            },
            Err(e) => {
                warn!(%platform, error = %e, "token.fetch.failed");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: AccessToken,
    refresh_at: DateTime<Utc>
}

///
/// Wraps another provider and reuses its tokens until `leeway` before they
/// expire. Tokens without a stated lifetime are never cached. Each platform
/// has its own slot so a slow token call for one never holds up the other.
///
pub struct CachedTokenProvider {
    inner: Arc<dyn TokenProvider>,
    leeway: Duration,
    tidal: Mutex<Option<CachedToken>>,
    spotify: Mutex<Option<CachedToken>>
}

impl CachedTokenProvider {
    pub fn new(inner: Arc<dyn TokenProvider>, leeway: Duration) -> Self {
        Self { inner, leeway, tidal: Mutex::new(None), spotify: Mutex::new(None) }
    }

    fn slot(&self, platform: StreamingPlatform) -> &Mutex<Option<CachedToken>> {
        match platform {
            StreamingPlatform::Tidal => &self.tidal,
            StreamingPlatform::Spotify => &self.spotify
        }
    }

    fn refresh_at(&self, now: DateTime<Utc>, expires_in: Duration) -> Option<DateTime<Utc>> {
        let usable = expires_in.checked_sub(self.leeway)?;
        if usable.is_zero() {
            return None;
        }
        let usable = chrono::Duration::from_std(usable).ok()?;
        now.checked_add_signed(usable)
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn access_token(&self, platform: StreamingPlatform) -> Option<AccessToken> {
        // held across the fetch so concurrent misses on a platform share one call
        let mut slot = self.slot(platform).lock().await;
        let now = Utc::now();

        if let Some(entry) = &*slot {
            if now < entry.refresh_at {
                debug!(%platform, "token.cache.hit");
                return Some(entry.token.clone());
            }
        }
        *slot = None;

        let token = self.inner.access_token(platform).await?;
        *slot = token.expires_in
            .and_then(|ttl| self.refresh_at(now, ttl))
            .map(|refresh_at| CachedToken { token: token.clone(), refresh_at });
        Some(token)
    }
}
