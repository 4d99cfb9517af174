//! # Ming
//!
//! Ming exposes an embedded document store as a hypermedia REST API with
//! per-resource access control ("governance") and HAL-style link synthesis.
//! Every addressable resource (root, collection, document, field, file, user)
//! has an associated permission record that can be set explicitly or
//! inherited from another resource, and every request resolves effective
//! permissions for its target resource before the underlying operation runs.
//!
//! ## Core Components
//!
//! * `auth` - Credential resolution and authentication
//! * `config` - Server configuration and the default-access policy
//! * `error` - The request-pipeline error taxonomy
//! * `governance` - Permission records, resolution, and authorization
//! * `hal` - Link synthesis, Link header codec, and content negotiation
//! * `server` - HTTP server and route handlers
//! * `store` - Sled-backed data collaborator
//!
//! ## Architecture
//!
//! Each request moves through an explicit pipeline: credential resolution,
//! authentication, authorization, dispatch, representation. The data
//! collaborator and the governance components are constructed once at startup
//! and injected into the router through shared application state; no global
//! singletons are involved.

pub mod auth;
pub mod config;
pub mod error;
pub mod governance;
pub mod hal;
pub mod server;
pub mod store;

// Re-export main types for convenience
pub use config::{DefaultAccess, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use governance::{Authorizer, Operation, PermissionRecord, PermissionResolver};
pub use server::{AppState, MingHttpServer};
pub use store::{DataSource, QueryOptions};
