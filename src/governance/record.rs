//! The permission record attached to a resource path.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Access-control record for exactly one resource path.
///
/// The wire and storage form is a flat JSON object: every key except
/// `_inherit` belongs to the access-control payload, which this layer treats
/// as opaque and the [`Authorizer`](crate::governance::Authorizer) interprets.
///
/// ```json
/// { "read": "public", "write": ["alice"], "_inherit": "/widgets" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Access-control payload, opaque at this layer.
    #[serde(flatten)]
    pub rules: Map<String, Value>,
    /// Resource path this record may derive its rules from.
    #[serde(rename = "_inherit", skip_serializing_if = "Option::is_none")]
    pub inherit: Option<String>,
}

impl PermissionRecord {
    /// Split a flat JSON object into payload and inheritance pointer.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let inherit = match map.remove("_inherit") {
            Some(Value::String(path)) => Some(path),
            _ => None,
        };
        Self {
            rules: map,
            inherit,
        }
    }

    /// Whether the record carries any rules besides the pointer itself.
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }
}
