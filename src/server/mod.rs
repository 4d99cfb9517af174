//! HTTP server and route handlers.
//!
//! Routes are split by resource kind, the way the pipeline addresses them:
//! root, collections, documents, files, users, and governance records. Every
//! handler walks the same explicit stages: identity, authorization, dispatch,
//! representation.

pub mod collection_routes;
pub mod document_routes;
pub mod file_routes;
pub mod governance_routes;
pub mod helpers;
pub mod http_server;
pub mod root_routes;
pub mod user_routes;

pub use http_server::{configure, AppState, MingHttpServer};
