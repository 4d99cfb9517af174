//! Collection operations.

use crate::store::core::DataSource;
use crate::store::error::{StoreError, StoreResult};
use serde_json::{Map, Value};

impl DataSource {
    /// List all collections, sorted by name.
    pub fn list_collections(&self) -> StoreResult<Vec<Map<String, Value>>> {
        let mut collections = Vec::new();
        for entry in self.collections_tree.iter() {
            let (_, bytes) = entry?;
            collections.push(serde_json::from_slice(&bytes)?);
        }
        Ok(collections)
    }

    /// Create a collection from a spec body carrying at least a `name`.
    ///
    /// Returns the collection name.
    pub fn create_collection(&self, spec: Map<String, Value>) -> StoreResult<String> {
        let name = collection_name(&spec)?;
        if self.collections_tree.contains_key(name.as_bytes())? {
            return Err(StoreError::CollectionExists(name));
        }
        DataSource::put_json(&self.collections_tree, &name, &spec)?;
        Ok(name)
    }

    /// Describe a collection: its stored spec plus the live document count.
    pub fn get_collection(&self, name: &str) -> StoreResult<Map<String, Value>> {
        let mut spec: Map<String, Value> =
            DataSource::get_json(&self.collections_tree, name)?
                .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;
        let tree = self.documents_tree(name)?;
        spec.insert("count".to_string(), Value::from(tree.len() as u64));
        Ok(spec)
    }

    /// Replace a collection's spec. Creates the collection if it is missing.
    pub fn update_collection(&self, name: &str, mut spec: Map<String, Value>) -> StoreResult<()> {
        spec.insert("name".to_string(), Value::String(name.to_string()));
        DataSource::put_json(&self.collections_tree, name, &spec)
    }

    /// Delete a collection and all of its documents. Idempotent.
    pub fn delete_collection(&self, name: &str) -> StoreResult<()> {
        DataSource::remove_key(&self.collections_tree, name)?;
        self.drop_documents_tree(name)
    }

    /// Register a collection touched by a document write, keeping implicit
    /// creation (insert into a collection nobody declared) working.
    pub(crate) fn ensure_collection(&self, name: &str) -> StoreResult<()> {
        if !self.collections_tree.contains_key(name.as_bytes())? {
            let mut spec = Map::new();
            spec.insert("name".to_string(), Value::String(name.to_string()));
            DataSource::put_json(&self.collections_tree, name, &spec)?;
        }
        Ok(())
    }
}

fn collection_name(spec: &Map<String, Value>) -> StoreResult<String> {
    match spec.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() && !name.contains('/') => Ok(name.to_string()),
        Some(_) => Err(StoreError::InvalidData(
            "Collection name must be a non-empty string without \"/\".".to_string(),
        )),
        None => Err(StoreError::InvalidData(
            "Missing \"name\" property.".to_string(),
        )),
    }
}
