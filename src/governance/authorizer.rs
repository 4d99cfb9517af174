//! Grant-or-deny decisions.

use crate::config::DefaultAccess;
use crate::error::{ApiError, ApiResult};
use crate::governance::resolver::PermissionResolver;
use crate::store::User;
use log::debug;
use serde_json::Value;
use std::fmt;

/// The kinds of operation a request can perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    Delete,
    /// Reading or replacing the resource's permission record.
    Govern,
}

impl Operation {
    /// The payload key carrying this operation's grant.
    fn rule_key(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Govern => "govern",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_key())
    }
}

/// Gates operations on resources.
///
/// A decision depends only on the resolved permission payload, the operation
/// kind, and the identity; nothing is mutated. Denial distinguishes a missing
/// identity (credential challenge) from an insufficient one (forbidden).
#[derive(Clone)]
pub struct Authorizer {
    resolver: PermissionResolver,
    default_access: DefaultAccess,
}

impl Authorizer {
    pub fn new(resolver: PermissionResolver, default_access: DefaultAccess) -> Self {
        Self {
            resolver,
            default_access,
        }
    }

    /// Grant or deny `operation` on `resource` for the given identity.
    pub fn authorize(
        &self,
        user: Option<&User>,
        resource: &str,
        operation: Operation,
    ) -> ApiResult<()> {
        let resolved = self.resolver.resolve(resource)?;
        let allowed = match resolved.rules.get(operation.rule_key()) {
            Some(grant) => grant_permits(grant, user),
            None => default_permits(self.default_access, operation, user),
        };
        if allowed {
            return Ok(());
        }
        match user {
            Some(user) => {
                debug!(
                    "{} denied {} on {}",
                    user.username, operation, resource
                );
                Err(ApiError::Forbidden(format!(
                    "{operation} access denied for {resource}"
                )))
            }
            None => {
                debug!("anonymous denied {} on {}", operation, resource);
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Evaluate one grant entry: `"public"` admits everyone, `"authenticated"`
/// any identified user, an array its listed usernames. Anything else denies.
fn grant_permits(grant: &Value, user: Option<&User>) -> bool {
    match grant {
        Value::String(s) if s == "public" => true,
        Value::String(s) if s == "authenticated" => user.is_some(),
        Value::Array(usernames) => user.map_or(false, |user| {
            usernames
                .iter()
                .any(|name| name.as_str() == Some(user.username.as_str()))
        }),
        _ => false,
    }
}

fn default_permits(access: DefaultAccess, operation: Operation, user: Option<&User>) -> bool {
    match access {
        DefaultAccess::Authenticated => user.is_some(),
        DefaultAccess::PublicRead => matches!(operation, Operation::Read) || user.is_some(),
        DefaultAccess::Deny => false,
    }
}
