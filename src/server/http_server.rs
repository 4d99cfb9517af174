//! HTTP server for the governed document store.

use crate::auth::Authenticator;
use crate::config::{DefaultAccess, ServerConfig};
use crate::error::{ApiError, ApiResult};
use crate::governance::{Authorizer, PermissionResolver};
use crate::server::{
    collection_routes, document_routes, file_routes, governance_routes, root_routes, user_routes,
};
use crate::store::DataSource;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer as ActixHttpServer};
use log::info;

/// Shared application state for the HTTP server.
///
/// Built once at startup and handed to every worker; all members are cheap
/// handle clones with no shared mutable state of their own.
pub struct AppState {
    /// The data collaborator
    pub store: DataSource,
    /// Maps credentials to identities
    pub authenticator: Authenticator,
    /// Resolves effective permission records
    pub resolver: PermissionResolver,
    /// Gates operations on resources
    pub authorizer: Authorizer,
}

impl AppState {
    pub fn new(store: DataSource, default_access: DefaultAccess) -> Self {
        let resolver = PermissionResolver::new(store.clone());
        Self {
            authenticator: Authenticator::new(store.clone()),
            authorizer: Authorizer::new(resolver.clone(), default_access),
            resolver,
            store,
        }
    }
}

/// HTTP server exposing the document store as a governed hypermedia API.
pub struct MingHttpServer {
    state: web::Data<AppState>,
    bind_address: String,
}

impl MingHttpServer {
    /// Open the store at the configured path and prepare a server.
    pub fn new(config: &ServerConfig) -> ApiResult<Self> {
        let store = DataSource::open(&config.storage_path)?;
        Ok(Self::with_store(store, config))
    }

    /// Prepare a server over an already-open store.
    pub fn with_store(store: DataSource, config: &ServerConfig) -> Self {
        Self {
            state: web::Data::new(AppState::new(store, config.default_access)),
            bind_address: config.bind_address.clone(),
        }
    }

    /// Run the HTTP server until the process is stopped.
    pub async fn run(&self) -> ApiResult<()> {
        info!("Ming is running on {}", self.bind_address);

        let state = self.state.clone();
        ActixHttpServer::new(move || {
            App::new()
                .wrap(cors())
                .app_data(state.clone())
                .configure(configure)
        })
        .bind(&self.bind_address)
        .map_err(|e| ApiError::Internal(format!("Failed to bind HTTP server: {e}")))?
        .run()
        .await
        .map_err(|e| ApiError::Internal(format!("HTTP server error: {e}")))
    }
}

/// Cross-origin policy: the configured method and header set. Preflights are
/// answered by the middleware with no body.
fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec!["Authorization", "Content-Type", "Link"])
        .expose_headers(vec!["Link", "Location"])
        .max_age(3600)
}

/// Register every route.
///
/// Order matters: the reserved governance, user, and file namespaces must
/// come before the generic collection patterns that would otherwise swallow
/// them, and `/{collection}/query` before `/{collection}/{document}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/.well-known/governance",
        web::get().to(governance_routes::read),
    )
    .route(
        "/.well-known/governance",
        web::put().to(governance_routes::replace),
    )
    .route("/ming.users", web::get().to(user_routes::list))
    .route("/ming.users", web::post().to(user_routes::register))
    .route("/ming.users/{user}", web::get().to(user_routes::read))
    .route("/{prefix}.files", web::post().to(file_routes::upload))
    .route("/{prefix}.files/{file}", web::get().to(file_routes::download))
    .route("/{prefix}.files/{file}", web::delete().to(file_routes::remove))
    .route("/", web::get().to(root_routes::list_collections))
    .route("/", web::post().to(root_routes::create_collection))
    .route("/{collection}/query", web::post().to(document_routes::query))
    .route("/{collection}", web::get().to(collection_routes::read))
    .route("/{collection}", web::post().to(document_routes::create))
    .route("/{collection}", web::put().to(collection_routes::replace))
    .route("/{collection}", web::delete().to(collection_routes::remove))
    .route(
        "/{collection}/{document}",
        web::get().to(document_routes::read),
    )
    .route(
        "/{collection}/{document}",
        web::put().to(document_routes::replace),
    )
    .route(
        "/{collection}/{document}",
        web::delete().to(document_routes::remove),
    )
    .route(
        "/{collection}/{document}/{field}",
        web::get().to(document_routes::read_field),
    )
    .default_service(web::route().to(not_found));
}

async fn not_found() -> HttpResponse {
    use actix_web::ResponseError;
    ApiError::NotFound.error_response()
}
