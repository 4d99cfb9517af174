//! User routes: self-registration and public lookup. None of these require
//! authorization; the authorizer is deliberately not consulted.

use crate::error::{ApiError, ApiResult};
use crate::hal::{governance_href, merge_links, Link, JSON};
use crate::server::helpers;
use crate::server::http_server::AppState;
use crate::store::Registration;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Map, Value};

/// `POST /ming.users` - self-registration.
pub async fn register(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    helpers::require_content_type(&req, &[JSON])?;
    let registration: Registration = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let username = state.store.register_user(registration)?;
    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/ming.users/{username}")))
        .body("Created"))
}

/// `GET /ming.users` - public user list.
pub async fn list(req: HttpRequest, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let embedded: Vec<Value> = state
        .store
        .list_users()?
        .into_iter()
        .map(|user| {
            let path = format!("/ming.users/{}", user.username);
            let mut view = user.public_view();
            merge_links(
                &mut view,
                vec![
                    ("self", Link::new(path.clone())),
                    ("governance", Link::new(governance_href(&path))),
                ],
            );
            Value::Object(view)
        })
        .collect();

    let mut body = Map::new();
    merge_links(
        &mut body,
        vec![
            ("self", Link::new("/ming.users")),
            ("governance", Link::new(governance_href("/ming.users"))),
        ],
    );
    body.insert("_embedded".to_string(), json!({ "users": embedded }));
    Ok(helpers::represent(&req, body))
}

/// `GET /ming.users/{user}` - public lookup by username.
pub async fn read(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let username = path.into_inner();
    let user = state.store.get_user(&username)?;

    let resource = format!("/ming.users/{username}");
    let mut view = user.public_view();
    merge_links(
        &mut view,
        vec![
            ("self", Link::new(resource.clone())),
            ("governance", Link::new(governance_href(&resource))),
        ],
    );
    Ok(helpers::represent(&req, view))
}
