//! Governance routes: reading and replacing permission records.

use crate::error::{ApiError, ApiResult};
use crate::governance::{decode_hal_permissions, decode_json_permissions, Operation};
use crate::hal::{merge_links, Link, HAL_JSON, JSON};
use crate::server::helpers;
use crate::server::http_server::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GovernanceParams {
    resource: Option<String>,
}

fn required_resource(params: &GovernanceParams) -> ApiResult<&str> {
    params
        .resource
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Missing \"resource\" URL parameter.".to_string()))
}

/// `GET /.well-known/governance?resource=<path>` - effective permissions.
pub async fn read(
    req: HttpRequest,
    params: web::Query<GovernanceParams>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let resource = required_resource(&params)?.to_string();
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Govern)?;

    let resolved = state.resolver.resolve(&resource)?;
    let mut body = resolved.rules;
    let mut links = vec![(
        "self",
        Link::new(format!("/.well-known/governance?resource={resource}")),
    )];
    if let Some(parent) = &resolved.inherit {
        links.push(("inherit", Link::new(parent.clone())));
    }
    merge_links(&mut body, links);
    Ok(helpers::represent(&req, body))
}

/// `PUT /.well-known/governance?resource=<path>` - replace a resource's
/// permission record. The inheritance pointer may arrive as a `Link` request
/// header (plain JSON) or as `_links.inherit.href` (HAL); both decoders
/// normalize to the same record before storage.
pub async fn replace(
    req: HttpRequest,
    params: web::Query<GovernanceParams>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let resource = required_resource(&params)?.to_string();
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Govern)?;
    helpers::require_content_type(&req, &[JSON, HAL_JSON])?;

    let record = match helpers::content_type(&req).as_deref() {
        Some(HAL_JSON) => decode_hal_permissions(&body)?,
        _ => {
            let link_header = req
                .headers()
                .get("Link")
                .and_then(|value| value.to_str().ok());
            decode_json_permissions(&body, link_header)?
        }
    };
    state.store.update_permissions(&resource, &record)?;
    Ok(HttpResponse::NoContent().finish())
}
