//! Document routes: CRUD, field reads, and search.

use crate::error::ApiResult;
use crate::governance::Operation;
use crate::hal::{governance_href, merge_links, Link, JSON};
use crate::server::helpers;
use crate::server::http_server::AppState;
use crate::store::{is_file_collection, QueryOptions};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Result-set modifiers accepted by the search endpoint.
#[derive(Debug, Deserialize)]
pub struct QueryModifiers {
    limit: Option<usize>,
    skip: Option<usize>,
    sort: Option<String>,
}

/// `GET /{collection}/{document}` - read a single document.
pub async fn read(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (collection, document) = path.into_inner();
    document_representation(&req, &state, &collection, &document)
}

/// Read a document and shape it for the wire. Shared with the non-binary
/// file read, which serves file metadata through the same rules.
pub(crate) fn document_representation(
    req: &HttpRequest,
    state: &AppState,
    collection: &str,
    id: &str,
) -> ApiResult<HttpResponse> {
    let resource = format!("/{collection}/{id}");
    let user = helpers::identity(req, state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Read)?;

    let doc = state.store.get_document(collection, id)?;
    let mut doc = if is_file_collection(collection) {
        file_projection(&doc)
    } else {
        doc
    };
    // The identity travels in the self link, not the body.
    doc.remove("_id");
    merge_links(
        &mut doc,
        vec![
            ("self", Link::new(resource.clone())),
            ("governance", Link::new(governance_href(&resource))),
        ],
    );
    Ok(helpers::represent(req, doc))
}

/// Narrow a file-collection document to its fixed projection.
pub(crate) fn file_projection(doc: &Map<String, Value>) -> Map<String, Value> {
    let mut projection = Map::new();
    if let Some(id) = doc.get("_id") {
        projection.insert("_id".to_string(), id.clone());
    }
    projection.insert(
        "size".to_string(),
        doc.get("length").cloned().unwrap_or(Value::Null),
    );
    projection.insert(
        "contentType".to_string(),
        doc.get("contentType").cloned().unwrap_or(Value::Null),
    );
    projection
}

/// `POST /{collection}` - insert a document.
pub async fn create(
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

    let doc = helpers::parse_json_object(&body)?;
    let id = state.store.insert_document(&collection, doc)?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/{collection}/{id}")))
        .body("Created"))
}

/// `PUT /{collection}/{document}` - replace a document.
pub async fn replace(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (collection, document) = path.into_inner();
    let resource = format!("/{collection}/{document}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Write)?;
    helpers::require_content_type(&req, &[JSON])?;

    let doc = helpers::parse_json_object(&body)?;
    state.store.update_document(&collection, &document, doc)?;
    Ok(HttpResponse::NoContent().finish())
}

/// `DELETE /{collection}/{document}` - delete a document.
pub async fn remove(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (collection, document) = path.into_inner();
    let resource = format!("/{collection}/{document}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Delete)?;

    state.store.delete_document(&collection, &document)?;
    Ok(HttpResponse::Ok().body("OK"))
}

/// `GET /{collection}/{document}/{field}` - read a single field, wrapped as
/// a single-key object. Fields are governed by their document's record.
pub async fn read_field(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (collection, document, field) = path.into_inner();
    let document_resource = format!("/{collection}/{document}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &document_resource, Operation::Read)?;

    let value = state.store.get_field(&collection, &document, &field)?;
    let mut body = Map::new();
    body.insert(field.clone(), value);
    merge_links(
        &mut body,
        vec![
            (
                "self",
                Link::new(format!("{document_resource}/{field}")),
            ),
            ("governance", Link::new(governance_href(&document_resource))),
        ],
    );
    Ok(helpers::represent(&req, body))
}

/// `POST /{collection}/query` - search a collection.
pub async fn query(
    req: HttpRequest,
    path: web::Path<String>,
    modifiers: web::Query<QueryModifiers>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let collection = path.into_inner();
    let resource = format!("/{collection}");
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), &resource, Operation::Read)?;
    helpers::require_content_type(&req, &[JSON])?;

    let query = helpers::parse_json_object(&body)?;
    let options = QueryOptions {
        limit: modifiers.limit,
        skip: modifiers.skip,
        sort: modifiers.sort.clone(),
    };
    let documents = state.store.list_documents(&collection, &query, &options)?;

    let file_collection = is_file_collection(&collection);
    let results: Vec<Value> = documents
        .into_iter()
        .map(|doc| {
            let mut doc = if file_collection {
                file_projection(&doc)
            } else {
                doc
            };
            let id = doc
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let path = format!("/{collection}/{id}");
            doc.remove("_id");
            merge_links(
                &mut doc,
                vec![
                    ("self", Link::new(path.clone())),
                    ("governance", Link::new(governance_href(&path))),
                ],
            );
            Value::Object(doc)
        })
        .collect();

    let mut envelope = Map::new();
    merge_links(
        &mut envelope,
        vec![
            ("self", Link::new(format!("{resource}/query"))),
            ("governance", Link::new(governance_href(&resource))),
        ],
    );
    envelope.insert("_embedded".to_string(), json!({ "results": results }));
    Ok(helpers::represent(&req, envelope))
}
