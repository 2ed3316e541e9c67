//!
//! src/main.rs  Andrew Belles  Oct 18th, 2026
//!
//! Wires configuration, logging, token provider and catalog clients
//! into the converter and serves it over http
//!
//!

mod config;
mod errors;
mod logging;

mod api;
mod auth;
mod catalog;
mod convert;
mod fetch;
mod link;
mod types;

use std::sync::Arc;

use crate::auth::{CachedTokenProvider, ClientCredentialsProvider, TokenProvider};
use crate::catalog::{SpotifyCatalog, TidalCatalog};
use crate::config::AppConfig;
use crate::convert::Converter;
use crate::errors::ConvertError;

/// Catalog clients sharing a single token provider
fn build_catalogs(cfgs: &AppConfig) ->
    Result<(Arc<TidalCatalog>, Arc<SpotifyCatalog>), ConvertError> {
    let spotify = fetch::SpotifyClient::new(&cfgs.http, &cfgs.spotify)?;
    let tidal   = fetch::TidalClient::new(&cfgs.http, &cfgs.tidal)?;

    let fresh: Arc<dyn TokenProvider> = Arc::new(
        ClientCredentialsProvider::new(spotify.clone(), tidal.clone())
    );
    let tokens: Arc<dyn TokenProvider> = if cfgs.token.cache_enabled {
        Arc::new(CachedTokenProvider::new(fresh, cfgs.token.expiry_leeway))
    } else {
        fresh
    };

    Ok((
        Arc::new(TidalCatalog::new(tidal, tokens.clone())),
        Arc::new(SpotifyCatalog::new(spotify, tokens))
    ))
}

fn build_converter(cfgs: &AppConfig) -> Result<Converter, ConvertError> {
    let (tidal, spotify) = build_catalogs(cfgs)?;
    Converter::new(tidal, spotify)
}

#[actix_web::main]
async fn main() -> Result<(), ConvertError> {
    let cfgs = config::load_config()?;
    let _logger = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service="rs-link-converter",
        version=%env!("CARGO_PKG_VERSION"),
        token_cache=cfgs.token.cache_enabled,
        "starting"
    );

    let converter = build_converter(&cfgs)?;
    api::serve(&cfgs.server, converter).await
}
