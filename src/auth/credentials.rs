//! Client credential extraction.

use base64::{engine::general_purpose, Engine as _};

/// Normalized client credentials, independent of transport encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parse an HTTP Basic `Authorization` header value.
    ///
    /// Malformed material (wrong scheme, bad base64, missing separator,
    /// non-UTF-8) is treated exactly like absent material: the rejection
    /// decision belongs to later pipeline stages, not here.
    pub fn from_header(header: Option<&str>) -> Option<Self> {
        let header = header?;
        let (scheme, encoded) = header.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("Basic") {
            return None;
        }
        let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
