//! Collection routes: describe, replace, delete.

use crate::error::ApiResult;
use crate::governance::Operation;
use crate::hal::{governance_href, merge_links, Link, JSON};
use crate::server::helpers;
use crate::server::http_server::AppState;
use actix_web::{web, HttpRequest, HttpResponse};

/// `GET /{collection}` - describe a collection.
pub async fn read(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let collection = path.into_inner();
    let resource = format!("/{collection}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Read)?;

    let mut body = state.store.get_collection(&collection)?;
    merge_links(
        &mut body,
        vec![
            ("self", Link::new(resource.clone())),
            ("governance", Link::new(governance_href(&resource))),
        ],
    );
    Ok(helpers::represent(&req, body))
}

/// `PUT /{collection}` - replace a collection's spec.
pub async fn replace(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let collection = path.into_inner();
    let resource = format!("/{collection}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Write)?;
    helpers::require_content_type(&req, &[JSON])?;

    let spec = helpers::parse_json_object(&body)?;
    state.store.update_collection(&collection, spec)?;
    Ok(HttpResponse::NoContent().finish())
}

/// `DELETE /{collection}` - drop a collection and its documents.
pub async fn remove(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let collection = path.into_inner();
    let resource = format!("/{collection}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Delete)?;

    state.store.delete_collection(&collection)?;
    Ok(HttpResponse::Ok().body("OK"))
}
