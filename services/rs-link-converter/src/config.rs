//!
//! src/config.rs  Andrew Belles  Oct 18th, 2026
//!
//! Reads environment at startup into typed configuration for
//! catalog clients, token handling, http server and logging
//!

use url::Url;
use std::time;
use crate::errors::ConvertError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 16;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

pub const TOKEN_EXPIRY_LEEWAY: u64 = 30;
pub const SERVER_PORT: u16 = 8000;

/// Wrapper over env::var to return an invalid enviroment var error
fn env_check(s: &str) -> Result<String, ConvertError> {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConvertError::Config(format!("{s} was not set"))),
    }
}

fn env_or(s: &str, default: &str) -> String {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string()
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

// ensure trailing slash so Url::join appends instead of replacing
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let mut path = url.path().to_string();
        path.push('/');
        url.set_path(&path);
    }
    url
}

/// Parses and validates a url taken from `var` or its default
fn checked_url(var: &str, default: &str, host: &str) -> Result<Url, ConvertError> {
    let raw = env_or(var, default);
    let url = Url::parse(&raw)
        .map_err(|e| ConvertError::Config(format!("{var} invalid {e}")))?;

    ensure_https(&url).map_err(ConvertError::Config)?;
    ensure_host(&url, host).map_err(ConvertError::Config)?;
    Ok(url)
}

/// Configuration that Spotify expects when hitting endpoints
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
    pub api_base: Url,
}

fn build_spotify() -> Result<SpotifyConfig, ConvertError> {
    let client_id     = env_check("SPOTIFY_CLIENT_ID")?;
    let client_secret = env_check("SPOTIFY_CLIENT_SECRET")?;

    let token_url = checked_url(
        "SPOTIFY_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
        "accounts.spotify.com"
    )?;
    let api_base = checked_url(
        "SPOTIFY_API_BASE",
        "https://api.spotify.com/v1/",
        "api.spotify.com"
    )?;

    Ok( SpotifyConfig {
        client_id,
        client_secret,
        token_url,
        api_base: with_trailing_slash(api_base)
    })
}

///
/// Configuration for the Tidal open api (JSON:API flavoured v2)
///
#[derive(Debug, Clone)]
pub struct TidalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
    pub api_base: Url,
    pub country_code: String,  // catalog region, default GB
}

fn build_tidal() -> Result<TidalConfig, ConvertError> {
    let client_id     = env_check("TIDAL_CLIENT_ID")?;
    let client_secret = env_check("TIDAL_CLIENT_SECRET")?;

    let token_url = checked_url(
        "TIDAL_TOKEN_URL",
        "https://auth.tidal.com/v1/oauth2/token",
        "auth.tidal.com"
    )?;
    let api_base = checked_url(
        "TIDAL_API_BASE",
        "https://openapi.tidal.com/v2/",
        "openapi.tidal.com"
    )?;

    let country_code = env_or("TIDAL_COUNTRY_CODE", "GB").to_ascii_uppercase();
    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConvertError::Config(
            format!("TIDAL_COUNTRY_CODE invalid: {country_code}")
        ));
    }

    Ok( TidalConfig {
        client_id,
        client_secret,
        token_url,
        api_base: with_trailing_slash(api_base),
        country_code
    })
}

///
/// Configuration for Http timeouts, pooling, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
        }
    }
}

///
/// Configuration for caching client credential tokens between requests
///
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub cache_enabled: bool,
    pub expiry_leeway: time::Duration  // refetch this long before expiry
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            expiry_leeway: time::Duration::from_secs(TOKEN_EXPIRY_LEEWAY)
        }
    }
}

fn build_token() -> Result<TokenConfig, ConvertError> {
    let mut token = TokenConfig::default();

    if let Ok(v) = std::env::var("TOKEN_CACHE") {
        token.cache_enabled = match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => true,
            "0" | "false" | "off" | "no" => false,
            other => return Err(ConvertError::Config(
                format!("TOKEN_CACHE invalid: {other}")
            ))
        };
    }

    if let Ok(v) = std::env::var("TOKEN_EXPIRY_LEEWAY_SECS") {
        let secs = v.trim().parse::<u64>()
            .map_err(|e| ConvertError::Config(
                format!("TOKEN_EXPIRY_LEEWAY_SECS invalid {e}")
            ))?;
        token.expiry_leeway = time::Duration::from_secs(secs);
    }

    Ok(token)
}

/// Bind address and route prefix for the http api
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_prefix: String
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: SERVER_PORT,
            api_prefix: String::new()
        }
    }
}

fn build_server() -> Result<ServerConfig, ConvertError> {
    let defaults = ServerConfig::default();

    let host = env_or("SERVER_HOST", &defaults.host);
    let port = match std::env::var("SERVER_PORT") {
        Ok(v) => v.trim().parse::<u16>()
            .map_err(|e| ConvertError::Config(format!("SERVER_PORT invalid {e}")))?,
        Err(_) => defaults.port
    };

    Ok( ServerConfig { host, port, api_prefix: normalize_prefix(&env_or("API_PREFIX", "")) })
}

/// "api/v1/" -> "/api/v1", "/" -> ""
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,rs_link_converter=debug,reqwest=warn".to_string(),
            format: LogFormat::Json,
            with_ansi: true,
            include_file_line: true,
            include_target: true,
        }
    }
}

fn build_logging() -> Result<LoggingConfig, ConvertError> {
    let mut logging = LoggingConfig::default();

    logging.format = match env_or("LOG_FORMAT", "json").to_ascii_lowercase().as_str() {
        "json" => LogFormat::Json,
        "pretty" => LogFormat::Pretty,
        other => return Err(ConvertError::Config(format!("LOG_FORMAT invalid: {other}")))
    };

    Ok(logging)
}

///
/// AppConfig which holds everything main needs to wire the service
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub tidal: TidalConfig,
    pub http: HttpConfig,
    pub token: TokenConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, ConvertError> {
    dotenvy::dotenv().ok();

    let spotify = build_spotify()?;
    let tidal   = build_tidal()?;
    let http    = HttpConfig::default();
    let token   = build_token()?;
    let server  = build_server()?;
    let logging = build_logging()?;

    Ok( AppConfig { spotify, tidal, http, token, server, logging } )
}
