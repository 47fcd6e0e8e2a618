use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::config::settings;
use crate::http;
use crate::http::error::ApiError;

/// Mount every HTTP sub-module plus the JSON catch-all.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(http::state::init_routes)
        .configure(http::daily::init_routes)
        .configure(http::save::init_routes)
        .configure(http::health::init_routes)
        .default_service(web::route().to(not_found));
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}

/// CORS layer reflecting the configured allowed origin. Also answers the
/// client's preflight requests.
pub fn cors() -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(86400);

    match settings().allowed_origin.as_str() {
        "*" => cors.allow_any_origin().send_wildcard(),
        origin => cors.allowed_origin(origin),
    }
}
