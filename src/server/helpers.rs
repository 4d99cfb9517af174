//! Shared pipeline stages for route handlers.

use crate::auth::Credentials;
use crate::error::{ApiError, ApiResult};
use crate::hal::{format_link_header, negotiate, Representation, HAL_JSON, JSON};
use crate::server::http_server::AppState;
use crate::store::User;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{Map, Value};

/// Establish the request's identity: credential resolution, then
/// authentication. Anonymous requests pass through as `None`.
pub fn identity(req: &HttpRequest, state: &AppState) -> ApiResult<Option<User>> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    state
        .authenticator
        .authenticate(Credentials::from_header(header))
}

/// The declared content type of the request body, without parameters.
pub fn content_type(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or("")
                .trim()
                .to_ascii_lowercase()
        })
}

/// Reject write bodies whose declared media type the endpoint does not
/// accept, before the body is interpreted.
pub fn require_content_type(req: &HttpRequest, accepted: &[&str]) -> ApiResult<()> {
    match content_type(req) {
        Some(declared) if accepted.contains(&declared.as_str()) => Ok(()),
        _ => Err(ApiError::UnsupportedMediaType),
    }
}

/// Parse a JSON object body.
pub fn parse_json_object(body: &web::Bytes) -> ApiResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::BadRequest(
            "Body must be a JSON object.".to_string(),
        )),
        Err(e) => Err(ApiError::BadRequest(format!("Invalid JSON body: {e}"))),
    }
}

/// Send an entity in the negotiated representation: HAL embeds `_links`,
/// plain JSON carries the same body with the entity's own links surfaced
/// through a `Link` response header instead.
pub fn represent(req: &HttpRequest, mut entity: Map<String, Value>) -> HttpResponse {
    let accept = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());
    match negotiate(accept) {
        Representation::Hal => HttpResponse::Ok().content_type(HAL_JSON).json(entity),
        Representation::Json => {
            let links = entity.remove("_links");
            let mut builder = HttpResponse::Ok();
            if let Some(Value::Object(links)) = links {
                let value = format_link_header(&links);
                if !value.is_empty() {
                    builder.insert_header(("Link", value));
                }
            }
            builder.content_type(JSON).json(entity)
        }
    }
}
