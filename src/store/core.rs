//! Database handle and generic persistence helpers.

use crate::store::error::StoreResult;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Unified access to the embedded database.
///
/// Collections, users, permission records, and file blobs each live in their
/// own tree; documents get one tree per collection. Handles are cheap to
/// clone and safe to share across request tasks.
#[derive(Clone)]
pub struct DataSource {
    /// The underlying sled database instance
    db: sled::Db,
    pub(crate) collections_tree: sled::Tree,
    pub(crate) users_tree: sled::Tree,
    pub(crate) permissions_tree: sled::Tree,
    pub(crate) blobs_tree: sled::Tree,
}

impl DataSource {
    /// Open (or create) the database at `path` with all required trees.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = sled::open(path)?;
        let collections_tree = db.open_tree("collections")?;
        let users_tree = db.open_tree("users")?;
        let permissions_tree = db.open_tree("permissions")?;
        let blobs_tree = db.open_tree("file_blobs")?;

        Ok(Self {
            db,
            collections_tree,
            users_tree,
            permissions_tree,
            blobs_tree,
        })
    }

    /// Tree holding the documents of one collection.
    pub(crate) fn documents_tree(&self, collection: &str) -> StoreResult<sled::Tree> {
        Ok(self.db.open_tree(format!("docs:{collection}"))?)
    }

    /// Drop the document tree of a collection.
    pub(crate) fn drop_documents_tree(&self, collection: &str) -> StoreResult<()> {
        self.db.drop_tree(format!("docs:{collection}"))?;
        Ok(())
    }

    /// Store a serializable item under `key`, durably.
    pub(crate) fn put_json<T: Serialize>(
        tree: &sled::Tree,
        key: &str,
        item: &T,
    ) -> StoreResult<()> {
        let bytes = serde_json::to_vec(item)?;
        tree.insert(key.as_bytes(), bytes)?;
        tree.flush()?;
        Ok(())
    }

    /// Retrieve a deserializable item stored under `key`.
    pub(crate) fn get_json<T: DeserializeOwned>(
        tree: &sled::Tree,
        key: &str,
    ) -> StoreResult<Option<T>> {
        match tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Remove the item stored under `key`, durably. Missing keys are fine.
    pub(crate) fn remove_key(tree: &sled::Tree, key: &str) -> StoreResult<()> {
        tree.remove(key.as_bytes())?;
        tree.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::open(dir.path()).unwrap();

        let item = json!({"name": "widgets", "kind": "inventory"});
        DataSource::put_json(&source.collections_tree, "widgets", &item).unwrap();

        let loaded: Option<serde_json::Value> =
            DataSource::get_json(&source.collections_tree, "widgets").unwrap();
        assert_eq!(loaded, Some(item));

        DataSource::remove_key(&source.collections_tree, "widgets").unwrap();
        let gone: Option<serde_json::Value> =
            DataSource::get_json(&source.collections_tree, "widgets").unwrap();
        assert!(gone.is_none());
    }
}
