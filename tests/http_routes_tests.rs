//! HTTP surface tests: the full pipeline from request to representation.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use base64::{engine::general_purpose, Engine as _};
use ming::store::Registration;
use ming::{server, AppState, DataSource, DefaultAccess, PermissionRecord};
use serde_json::{json, Map, Value};

/// Fresh application state over a throwaway store.
fn app_state(default_access: DefaultAccess) -> (tempfile::TempDir, web::Data<AppState>) {
    let dir = tempfile::tempdir().unwrap();
    let store = DataSource::open(dir.path()).unwrap();
    (dir, web::Data::new(AppState::new(store, default_access)))
}

/// Shorthand: the service under test, wired exactly like the real server
/// minus the CORS layer.
macro_rules! service {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(server::configure),
        )
        .await
    };
}

fn register(state: &AppState, username: &str, password: &str) {
    state
        .store
        .register_user(Registration {
            username: username.to_string(),
            password: password.to_string(),
        })
        .unwrap();
}

fn basic(username: &str, password: &str) -> (&'static str, String) {
    (
        "Authorization",
        format!(
            "Basic {}",
            general_purpose::STANDARD.encode(format!("{username}:{password}"))
        ),
    )
}

fn set_rules(state: &AppState, resource: &str, rules: Value) {
    state
        .store
        .update_permissions(
            resource,
            &PermissionRecord {
                rules: rules.as_object().unwrap().clone(),
                inherit: None,
            },
        )
        .unwrap();
}

fn doc(fields: &[(&str, Value)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[actix_web::test]
async fn anonymous_write_is_challenged_and_never_stored() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/widgets")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"label": "a"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("WWW-Authenticate"));

    // The data collaborator was never reached.
    assert!(state.store.list_collections().unwrap().is_empty());
}

#[actix_web::test]
async fn invalid_credentials_resolve_to_anonymous() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/widgets")
        .insert_header(basic("alice", "wrong"))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn document_read_hides_identity_behind_self_link() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let id = state
        .store
        .insert_document("widgets", doc(&[("label", json!("a"))]))
        .unwrap();
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/widgets/{id}"))
        .insert_header(basic("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("_id").is_none());
    assert_eq!(body.get("label"), Some(&json!("a")));
    let self_href = body["_links"]["self"]["href"].as_str().unwrap();
    assert!(self_href.ends_with(&id));
    assert_eq!(
        body["_links"]["governance"]["href"].as_str().unwrap(),
        format!("/.well-known/governance?resource=/widgets/{id}")
    );
}

#[actix_web::test]
async fn file_document_read_is_narrowed_to_the_projection() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let id = state
        .store
        .insert_file("attachments", "image/png", b"binary bytes")
        .unwrap();
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/attachments.files/{id}"))
        .insert_header(basic("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let object = body.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["_links", "contentType", "size"]);
    assert_eq!(object.get("size"), Some(&json!(12)));
    assert_eq!(object.get("contentType"), Some(&json!("image/png")));
}

#[actix_web::test]
async fn binary_download_requires_the_flag() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let id = state
        .store
        .insert_file("attachments", "text/plain", b"hello")
        .unwrap();
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/attachments.files/{id}?binary=1"))
        .insert_header(basic("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "text/plain"
    );
    let link = resp
        .headers()
        .get("Link")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(link.contains("rel=\"self\""));
    assert!(link.contains("rel=\"governance\""));
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"hello");
}

#[actix_web::test]
async fn empty_file_upload_is_rejected_before_storage() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/attachments.files")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Content-Type", "image/png"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // insert_file was never invoked: no metadata collection appeared.
    assert!(state.store.list_collections().unwrap().is_empty());
}

#[actix_web::test]
async fn file_upload_round_trip() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/attachments.files")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Content-Type", "text/plain"))
        .set_payload(&b"file content"[..])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get("Location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("/attachments.files/"));

    let id = location.rsplit('/').next().unwrap();
    let stored = state.store.get_file("attachments", id).unwrap();
    assert_eq!(stored.bytes, b"file content");
}

#[actix_web::test]
async fn governance_hal_round_trip_preserves_inherit_link() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let app = service!(state);

    let put = test::TestRequest::put()
        .uri("/.well-known/governance?resource=/foo")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Content-Type", "application/hal+json"))
        .set_payload(json!({"_links": {"inherit": {"href": "/bar"}}}).to_string())
        .to_request();
    let resp = test::call_service(&app, put).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let get = test::TestRequest::get()
        .uri("/.well-known/governance?resource=/foo")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Accept", "application/hal+json"))
        .to_request();
    let resp = test::call_service(&app, get).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["_links"]["inherit"]["href"], json!("/bar"));
    assert!(body.get("_inherit").is_none());
}

#[actix_web::test]
async fn governance_json_uses_link_headers() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let app = service!(state);

    let put = test::TestRequest::put()
        .uri("/.well-known/governance?resource=/foo")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Content-Type", "application/json"))
        .insert_header(("Link", "</bar>; rel=\"inherit\""))
        .set_payload(r#"{"read": "public"}"#)
        .to_request();
    let resp = test::call_service(&app, put).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let get = test::TestRequest::get()
        .uri("/.well-known/governance?resource=/foo")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Accept", "application/json"))
        .to_request();
    let resp = test::call_service(&app, get).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let link = resp
        .headers()
        .get("Link")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(link.contains("</bar>; rel=\"inherit\""));
    assert!(link.contains("rel=\"self\""));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"read": "public"}));
}

#[actix_web::test]
async fn governance_requires_the_resource_parameter() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let app = service!(state);

    let get = test::TestRequest::get()
        .uri("/.well-known/governance")
        .insert_header(basic("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, get).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let put = test::TestRequest::put()
        .uri("/.well-known/governance")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, put).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn forbidden_is_distinct_from_unauthorized() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    set_rules(&state, "/widgets", json!({"write": ["bob"]}));
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/widgets")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn public_read_default_admits_anonymous_reads() {
    let (_dir, state) = app_state(DefaultAccess::PublicRead);
    let app = service!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn unsupported_media_type_is_rejected() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/widgets")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Content-Type", "text/plain"))
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[actix_web::test]
async fn collection_lifecycle() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let auth = basic("alice", "secret");
    let app = service!(state);

    let create = test::TestRequest::post()
        .uri("/")
        .insert_header(auth.clone())
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"name": "widgets"}"#)
        .to_request();
    let resp = test::call_service(&app, create).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/widgets"
    );

    let list = test::TestRequest::get()
        .uri("/")
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, list).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let collections = body["_embedded"]["collections"].as_array().unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0]["name"], json!("widgets"));
    assert_eq!(collections[0]["_links"]["self"]["href"], json!("/widgets"));

    let replace = test::TestRequest::put()
        .uri("/widgets")
        .insert_header(auth.clone())
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"description": "things"}"#)
        .to_request();
    let resp = test::call_service(&app, replace).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let remove = test::TestRequest::delete()
        .uri("/widgets")
        .insert_header(auth)
        .to_request();
    let resp = test::call_service(&app, remove).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(state.store.list_collections().unwrap().is_empty());
}

#[actix_web::test]
async fn query_applies_modifiers_and_synthesizes_item_links() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    for (label, rank) in [("a", 3), ("b", 1), ("c", 2)] {
        state
            .store
            .insert_document(
                "widgets",
                doc(&[("label", json!(label)), ("rank", json!(rank))]),
            )
            .unwrap();
    }
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/widgets/query?sort=rank&limit=2")
        .insert_header(basic("alice", "secret"))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["_links"]["self"]["href"], json!("/widgets/query"));
    let results = body["_embedded"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    let labels: Vec<&str> = results
        .iter()
        .map(|result| result["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["b", "c"]);
    for result in results {
        assert!(result.get("_id").is_none());
        let href = result["_links"]["self"]["href"].as_str().unwrap();
        assert!(href.starts_with("/widgets/"));
    }
}

#[actix_web::test]
async fn field_read_wraps_the_value() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let id = state
        .store
        .insert_document("widgets", doc(&[("label", json!("a"))]))
        .unwrap();
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/widgets/{id}/label"))
        .insert_header(basic("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.get("label"), Some(&json!("a")));
    // The field is governed by its document.
    assert_eq!(
        body["_links"]["governance"]["href"].as_str().unwrap(),
        format!("/.well-known/governance?resource=/widgets/{id}")
    );
}

#[actix_web::test]
async fn user_registration_and_public_lookup() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    let app = service!(state);

    let register = test::TestRequest::post()
        .uri("/ming.users")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"username": "alice", "password": "secret"}"#)
        .to_request();
    let resp = test::call_service(&app, register).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/ming.users/alice"
    );

    // Lookup and list are public; credential material never appears.
    let read = test::TestRequest::get()
        .uri("/ming.users/alice")
        .to_request();
    let resp = test::call_service(&app, read).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], json!("alice"));
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let list = test::TestRequest::get().uri("/ming.users").to_request();
    let resp = test::call_service(&app, list).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let users = body["_embedded"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(
        users[0]["_links"]["self"]["href"],
        json!("/ming.users/alice")
    );

    // Usernames are unique.
    let duplicate = test::TestRequest::post()
        .uri("/ming.users")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"username": "alice", "password": "other"}"#)
        .to_request();
    let resp = test::call_service(&app, duplicate).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_documents_and_routes_yield_not_found() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let app = service!(state);

    let missing_doc = test::TestRequest::get()
        .uri("/widgets/nope")
        .insert_header(basic("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, missing_doc).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let unmatched = test::TestRequest::get()
        .uri("/a/b/c/d")
        .insert_header(basic("alice", "secret"))
        .to_request();
    let resp = test::call_service(&app, unmatched).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn document_replace_and_delete() {
    let (_dir, state) = app_state(DefaultAccess::Authenticated);
    register(&state, "alice", "secret");
    let auth = basic("alice", "secret");
    let id = state
        .store
        .insert_document("widgets", doc(&[("label", json!("a"))]))
        .unwrap();
    let app = service!(state);

    let replace = test::TestRequest::put()
        .uri(&format!("/widgets/{id}"))
        .insert_header(auth.clone())
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"label": "b"}"#)
        .to_request();
    let resp = test::call_service(&app, replace).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let stored = state.store.get_document("widgets", &id).unwrap();
    assert_eq!(stored.get("label"), Some(&json!("b")));

    let remove = test::TestRequest::delete()
        .uri(&format!("/widgets/{id}"))
        .insert_header(auth)
        .to_request();
    let resp = test::call_service(&app, remove).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(state.store.get_document("widgets", &id).is_err());
}
