//! Credential resolution and authentication.

pub mod authenticator;
pub mod credentials;

pub use authenticator::Authenticator;
pub use credentials::Credentials;
