//! Effective-permission resolution.

use crate::error::ApiResult;
use crate::governance::record::PermissionRecord;
use crate::store::DataSource;
use serde_json::{Map, Value};

/// The outcome of resolving a resource path: the rules that apply to it plus
/// the inheritance pointer stored on the resource itself, if any. The pointer
/// is always surfaced so callers can expose it as an `inherit` link, even
/// when local rules made it irrelevant for content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPermissions {
    pub rules: Map<String, Value>,
    pub inherit: Option<String>,
}

/// Resolves the effective permission record for a resource path.
///
/// Local rules always win: `_inherit` contributes content only when the
/// record carries no rules of its own. Resolution follows at most one hop; a
/// nested `_inherit` on the target record is never chased.
#[derive(Clone)]
pub struct PermissionResolver {
    store: DataSource,
}

impl PermissionResolver {
    pub fn new(store: DataSource) -> Self {
        Self { store }
    }

    /// Resolve a resource path. An unknown resource is not an error: it
    /// yields an empty record and the caller's default policy applies.
    pub fn resolve(&self, resource: &str) -> ApiResult<ResolvedPermissions> {
        let Some(record) = self.store.get_permissions(resource)? else {
            return Ok(ResolvedPermissions::default());
        };
        let PermissionRecord { rules, inherit } = record;
        if !rules.is_empty() {
            return Ok(ResolvedPermissions { rules, inherit });
        }
        if let Some(parent) = &inherit {
            if let Some(parent_record) = self.store.get_permissions(parent)? {
                // One hop only: the parent's own pointer is not chased.
                return Ok(ResolvedPermissions {
                    rules: parent_record.rules,
                    inherit,
                });
            }
        }
        Ok(ResolvedPermissions {
            rules: Map::new(),
            inherit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> (tempfile::TempDir, PermissionResolver, DataSource) {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::open(dir.path()).unwrap();
        (dir, PermissionResolver::new(source.clone()), source)
    }

    fn record(rules: Value, inherit: Option<&str>) -> PermissionRecord {
        PermissionRecord {
            rules: rules.as_object().unwrap().clone(),
            inherit: inherit.map(str::to_string),
        }
    }

    #[test]
    fn unknown_resource_resolves_empty() {
        let (_dir, resolver, _) = resolver();
        let resolved = resolver.resolve("/nowhere").unwrap();
        assert!(resolved.rules.is_empty());
        assert!(resolved.inherit.is_none());
    }

    #[test]
    fn local_rules_win_over_inherit() {
        let (_dir, resolver, source) = resolver();
        source
            .update_permissions("/parent", &record(json!({"read": "authenticated"}), None))
            .unwrap();
        source
            .update_permissions("/child", &record(json!({"read": "public"}), Some("/parent")))
            .unwrap();

        let resolved = resolver.resolve("/child").unwrap();
        assert_eq!(resolved.rules.get("read"), Some(&json!("public")));
        // The pointer is still surfaced for link synthesis.
        assert_eq!(resolved.inherit.as_deref(), Some("/parent"));
    }

    #[test]
    fn empty_record_defers_to_inherited_rules() {
        let (_dir, resolver, source) = resolver();
        source
            .update_permissions("/parent", &record(json!({"write": ["alice"]}), None))
            .unwrap();
        source
            .update_permissions("/child", &record(json!({}), Some("/parent")))
            .unwrap();

        let resolved = resolver.resolve("/child").unwrap();
        assert_eq!(resolved.rules.get("write"), Some(&json!(["alice"])));
        assert_eq!(resolved.inherit.as_deref(), Some("/parent"));
    }

    #[test]
    fn inheritance_is_single_hop() {
        let (_dir, resolver, source) = resolver();
        source
            .update_permissions("/grandparent", &record(json!({"read": "public"}), None))
            .unwrap();
        source
            .update_permissions("/parent", &record(json!({}), Some("/grandparent")))
            .unwrap();
        source
            .update_permissions("/child", &record(json!({}), Some("/parent")))
            .unwrap();

        // /parent has no rules of its own and its nested pointer is ignored.
        let resolved = resolver.resolve("/child").unwrap();
        assert!(resolved.rules.is_empty());
        assert_eq!(resolved.inherit.as_deref(), Some("/parent"));
    }

    #[test]
    fn dangling_inherit_resolves_empty() {
        let (_dir, resolver, source) = resolver();
        source
            .update_permissions("/child", &record(json!({}), Some("/nowhere")))
            .unwrap();

        let resolved = resolver.resolve("/child").unwrap();
        assert!(resolved.rules.is_empty());
        assert_eq!(resolved.inherit.as_deref(), Some("/nowhere"));
    }
}
