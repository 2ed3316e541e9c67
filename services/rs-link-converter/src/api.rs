//!
//! src/api.rs  Andrew Belles  Oct 18th, 2026
//!
//! Http routes in front of the converter and the mapping from
//! converter errors onto status codes
//!

use actix_web::{
    get,
    http::StatusCode,
    middleware,
    web::{self, Json},
    App, HttpResponse, HttpServer, ResponseError,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::convert::Converter;
use crate::errors::ConvertError;
use crate::types::ConvertResponse;

impl ResponseError for ConvertError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConvertError::NotFound(_) | ConvertError::NoMatch(_) => StatusCode::NOT_FOUND,
            ConvertError::InvalidLink(_) | ConvertError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ConvertError::Auth(_)
            | ConvertError::Upstream { .. }
            | ConvertError::Http(_)
            | ConvertError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            ConvertError::Config(_) | ConvertError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "api.error");
        }
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}

#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    url: String
}

#[get("/health")]
pub async fn health_endpoint() -> Json<Value> {
    Json(json!({ "healthy": true }))
}

#[get("/convert/track/{id}")]
pub async fn convert_track_endpoint(
    path: web::Path<String>,
    converter: web::Data<Converter>
) -> Result<Json<ConvertResponse>, ConvertError> {
    let links = converter.convert_track(&path.into_inner()).await?;
    Ok(Json(ConvertResponse { links }))
}

#[get("/convert/album/{id}")]
pub async fn convert_album_endpoint(
    path: web::Path<String>,
    converter: web::Data<Converter>
) -> Result<Json<ConvertResponse>, ConvertError> {
    let links = converter.convert_album(&path.into_inner()).await?;
    Ok(Json(ConvertResponse { links }))
}

#[get("/convert/link")]
pub async fn convert_link_endpoint(
    query: web::Query<LinkQuery>,
    converter: web::Data<Converter>
) -> Result<Json<ConvertResponse>, ConvertError> {
    let links = converter.convert_link(&query.url).await?;
    Ok(Json(ConvertResponse { links }))
}

/// Registers every route, conversions under `prefix`
pub fn bind_services(cfg: &mut web::ServiceConfig, prefix: &str) {
    cfg.service(health_endpoint)
        .service(
            web::scope(prefix)
                .service(convert_track_endpoint)
                .service(convert_album_endpoint)
                .service(convert_link_endpoint)
        );
}

pub async fn serve(server: &ServerConfig, converter: Converter) -> Result<(), ConvertError> {
    let converter = web::Data::new(converter);
    let prefix = server.api_prefix.clone();

    info!(host = %server.host, port = server.port, prefix = %prefix, "api.listen");

    HttpServer::new(move || {
        let prefix = prefix.clone();
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(converter.clone())
            .configure(move |cfg| bind_services(cfg, &prefix))
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await?;

    info!("api.exit");
    Ok(())
}
