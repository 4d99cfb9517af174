//! Binary file routes: upload, conditional download, delete.

use crate::error::{ApiError, ApiResult};
use crate::governance::Operation;
use crate::hal::{format_link_header, governance_href};
use crate::server::document_routes::document_representation;
use crate::server::helpers;
use crate::server::http_server::AppState;
use crate::store::file_collection_name;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Map};

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    binary: Option<String>,
}

/// `POST /{prefix}.files` - upload a blob.
pub async fn upload(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let prefix = path.into_inner();
    let collection = file_collection_name(&prefix);
    let resource = format!("/{collection}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Write)?;

    // Skip empty files.
    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty body.".to_string()));
    }
    let content_type = helpers::content_type(&req)
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let id = state.store.insert_file(&prefix, &content_type, &body)?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/{collection}/{id}")))
        .body("Created"))
}

/// `GET /{prefix}.files/{file}` - download the raw bytes when `binary=1` is
/// requested; otherwise serve the metadata document form.
pub async fn download(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    params: web::Query<DownloadParams>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (prefix, file) = path.into_inner();
    let collection = file_collection_name(&prefix);
    if params.binary.as_deref() != Some("1") {
        return document_representation(&req, &state, &collection, &file);
    }

    let resource = format!("/{collection}/{file}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Read)?;

    let stored = state.store.get_file(&prefix, &file)?;
    let mut links = Map::new();
    links.insert("self".to_string(), json!({ "href": resource }));
    links.insert(
        "governance".to_string(),
        json!({ "href": governance_href(&resource) }),
    );
    Ok(HttpResponse::Ok()
        .content_type(stored.content_type)
        .insert_header(("Link", format_link_header(&links)))
        .body(stored.bytes))
}

/// `DELETE /{prefix}.files/{file}` - delete a blob and its metadata.
pub async fn remove(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (prefix, file) = path.into_inner();
    let resource = format!("/{}/{}", file_collection_name(&prefix), file);
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Delete)?;

    state.store.delete_file(&prefix, &file)?;
    Ok(HttpResponse::Ok().body("OK"))
}
