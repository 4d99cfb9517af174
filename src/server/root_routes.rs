//! Root-resource routes: collection listing and creation.

use crate::error::ApiResult;
use crate::governance::Operation;
use crate::hal::{governance_href, merge_links, Link, JSON};
use crate::server::helpers;
use crate::server::http_server::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Map, Value};

/// `GET /` - list collections.
pub async fn list_collections(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), "/", Operation::Read)?;

    let embedded: Vec<Value> = state
        .store
        .list_collections()?
        .into_iter()
        .map(|mut collection| {
            let name = collection
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let path = format!("/{name}");
            merge_links(
                &mut collection,
                vec![
                    ("self", Link::new(path.clone())),
                    ("governance", Link::new(governance_href(&path))),
                ],
            );
            Value::Object(collection)
        })
        .collect();

    let mut body = Map::new();
    merge_links(
        &mut body,
        vec![
            ("self", Link::new("/")),
            ("governance", Link::new(governance_href("/"))),
        ],
    );
    body.insert(
        "_embedded".to_string(),
        json!({ "collections": embedded }),
    );
    Ok(helpers::represent(&req, body))
}

/// `POST /` - create a collection.
pub async fn create_collection(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let user = helpers::identity(&req, &state)?;
    state
        .authorizer
        .authorize(user.as_ref(), "/", Operation::Write)?;
    helpers::require_content_type(&req, &[JSON])?;

    let spec = helpers::parse_json_object(&body)?;
    let name = state.store.create_collection(spec)?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/{name}")))
        .body("Created"))
}
