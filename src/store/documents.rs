//! Document operations: CRUD, field projection, and query matching.

use crate::store::core::DataSource;
use crate::store::error::{StoreError, StoreResult};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use uuid::Uuid;

/// Result-set modifiers taken from the query string of a search request.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub limit: Option<usize>,
    pub skip: Option<usize>,
    /// Field to order by; a leading `-` means descending.
    pub sort: Option<String>,
}

impl DataSource {
    /// Insert a document, assigning it a fresh identity. Returns the id.
    pub fn insert_document(
        &self,
        collection: &str,
        mut doc: Map<String, Value>,
    ) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        doc.insert("_id".to_string(), Value::String(id.clone()));
        self.ensure_collection(collection)?;
        let tree = self.documents_tree(collection)?;
        DataSource::put_json(&tree, &id, &doc)?;
        Ok(id)
    }

    /// Fetch a single document by identity.
    pub fn get_document(&self, collection: &str, id: &str) -> StoreResult<Map<String, Value>> {
        let tree = self.documents_tree(collection)?;
        DataSource::get_json(&tree, id)?
            .ok_or_else(|| StoreError::DocumentNotFound(format!("{collection}/{id}")))
    }

    /// Replace a document by identity. The stored identity is preserved.
    pub fn update_document(
        &self,
        collection: &str,
        id: &str,
        mut doc: Map<String, Value>,
    ) -> StoreResult<()> {
        let tree = self.documents_tree(collection)?;
        if !tree.contains_key(id.as_bytes())? {
            return Err(StoreError::DocumentNotFound(format!("{collection}/{id}")));
        }
        doc.insert("_id".to_string(), Value::String(id.to_string()));
        DataSource::put_json(&tree, id, &doc)
    }

    /// Delete a document by identity. Idempotent.
    pub fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        let tree = self.documents_tree(collection)?;
        DataSource::remove_key(&tree, id)
    }

    /// Fetch a single field of a document.
    pub fn get_field(&self, collection: &str, id: &str, field: &str) -> StoreResult<Value> {
        let doc = self.get_document(collection, id)?;
        doc.get(field)
            .cloned()
            .ok_or_else(|| StoreError::FieldNotFound(format!("{collection}/{id}/{field}")))
    }

    /// Search a collection with a top-level equality query and modifiers.
    pub fn list_documents(
        &self,
        collection: &str,
        query: &Map<String, Value>,
        options: &QueryOptions,
    ) -> StoreResult<Vec<Map<String, Value>>> {
        let tree = self.documents_tree(collection)?;
        let mut docs = Vec::new();
        for entry in tree.iter() {
            let (_, bytes) = entry?;
            let doc: Map<String, Value> = serde_json::from_slice(&bytes)?;
            if matches_query(&doc, query) {
                docs.push(doc);
            }
        }
        if let Some(sort) = &options.sort {
            let (field, descending) = match sort.strip_prefix('-') {
                Some(field) => (field, true),
                None => (sort.as_str(), false),
            };
            docs.sort_by(|a, b| {
                let ordering = compare_fields(a.get(field), b.get(field));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        let skipped = docs.into_iter().skip(options.skip.unwrap_or(0));
        Ok(match options.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        })
    }
}

/// A document matches when every query entry equals the document's value.
fn matches_query(doc: &Map<String, Value>, query: &Map<String, Value>) -> bool {
    query.iter().all(|(key, value)| doc.get(key) == Some(value))
}

/// Order two field values; missing values sort last regardless of direction.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .unwrap_or(f64::NAN)
            .partial_cmp(&b.as_f64().unwrap_or(f64::NAN))
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: &[(&str, Value)]) -> Map<String, Value> {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn insert_assigns_identity() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::open(dir.path()).unwrap();

        let id = source
            .insert_document("widgets", doc(&[("label", json!("a"))]))
            .unwrap();
        let stored = source.get_document("widgets", &id).unwrap();
        assert_eq!(stored.get("_id"), Some(&json!(id)));
        assert_eq!(stored.get("label"), Some(&json!("a")));
    }

    #[test]
    fn replace_preserves_identity() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::open(dir.path()).unwrap();

        let id = source
            .insert_document("widgets", doc(&[("label", json!("a"))]))
            .unwrap();
        source
            .update_document("widgets", &id, doc(&[("label", json!("b"))]))
            .unwrap();

        let stored = source.get_document("widgets", &id).unwrap();
        assert_eq!(stored.get("_id"), Some(&json!(id)));
        assert_eq!(stored.get("label"), Some(&json!("b")));
    }

    #[test]
    fn replace_of_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::open(dir.path()).unwrap();

        assert!(matches!(
            source.update_document("widgets", "nope", Map::new()),
            Err(StoreError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn field_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::open(dir.path()).unwrap();

        let id = source
            .insert_document("widgets", doc(&[("label", json!("a"))]))
            .unwrap();
        assert_eq!(source.get_field("widgets", &id, "label").unwrap(), json!("a"));
        assert!(matches!(
            source.get_field("widgets", &id, "missing"),
            Err(StoreError::FieldNotFound(_))
        ));
    }

    #[test]
    fn query_filters_and_modifies() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::open(dir.path()).unwrap();

        for (label, size) in [("a", 3), ("b", 1), ("c", 2), ("d", 2)] {
            source
                .insert_document(
                    "widgets",
                    doc(&[("label", json!(label)), ("size", json!(size))]),
                )
                .unwrap();
        }

        let mut query = Map::new();
        query.insert("size".to_string(), json!(2));
        let matched = source
            .list_documents("widgets", &query, &QueryOptions::default())
            .unwrap();
        assert_eq!(matched.len(), 2);

        let sorted = source
            .list_documents(
                "widgets",
                &Map::new(),
                &QueryOptions {
                    sort: Some("-size".to_string()),
                    limit: Some(2),
                    skip: Some(1),
                },
            )
            .unwrap();
        let sizes: Vec<i64> = sorted
            .iter()
            .map(|d| d.get("size").unwrap().as_i64().unwrap())
            .collect();
        assert_eq!(sizes, vec![2, 2]);
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::open(dir.path()).unwrap();

        let id = source
            .insert_document("widgets", doc(&[("label", json!("a"))]))
            .unwrap();
        source.delete_document("widgets", &id).unwrap();
        source.delete_document("widgets", &id).unwrap();
        assert!(source.get_document("widgets", &id).is_err());
    }
}
