//! Binary file storage.
//!
//! Files live in reserved `{prefix}.files` collections: a JSON metadata
//! document next to the raw blob. The metadata document is what generic
//! document reads see; the blob is only reachable through [`DataSource::get_file`].

use crate::store::core::DataSource;
use crate::store::error::{StoreError, StoreResult};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Suffix marking a collection as a binary-file collection.
pub const FILE_SUFFIX: &str = ".files";

/// Whether a collection name addresses a binary-file collection.
pub fn is_file_collection(name: &str) -> bool {
    name.len() > FILE_SUFFIX.len() && name.ends_with(FILE_SUFFIX)
}

/// The file collection for an upload prefix.
pub fn file_collection_name(prefix: &str) -> String {
    format!("{prefix}{FILE_SUFFIX}")
}

/// A stored blob and its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DataSource {
    /// Store a blob under `{prefix}.files`, returning the file identity.
    pub fn insert_file(
        &self,
        prefix: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> StoreResult<String> {
        let collection = file_collection_name(prefix);
        let id = Uuid::new_v4().to_string();

        let mut metadata = Map::new();
        metadata.insert("_id".to_string(), Value::String(id.clone()));
        metadata.insert("length".to_string(), Value::from(bytes.len() as u64));
        metadata.insert(
            "contentType".to_string(),
            Value::String(content_type.to_string()),
        );
        metadata.insert(
            "uploadDate".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );

        self.ensure_collection(&collection)?;
        let tree = self.documents_tree(&collection)?;
        DataSource::put_json(&tree, &id, &metadata)?;
        self.blobs_tree
            .insert(blob_key(&collection, &id), bytes)?;
        self.blobs_tree.flush()?;
        Ok(id)
    }

    /// Fetch a blob and its content type.
    pub fn get_file(&self, prefix: &str, id: &str) -> StoreResult<StoredFile> {
        let collection = file_collection_name(prefix);
        let metadata = match self.get_document(&collection, id) {
            Ok(doc) => doc,
            Err(StoreError::DocumentNotFound(_)) => {
                return Err(StoreError::FileNotFound(format!("{collection}/{id}")))
            }
            Err(e) => return Err(e),
        };
        let content_type = metadata
            .get("contentType")
            .and_then(Value::as_str)
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = self
            .blobs_tree
            .get(blob_key(&collection, id))?
            .ok_or_else(|| StoreError::FileNotFound(format!("{collection}/{id}")))?
            .to_vec();
        Ok(StoredFile {
            content_type,
            bytes,
        })
    }

    /// Delete a blob and its metadata. Idempotent.
    pub fn delete_file(&self, prefix: &str, id: &str) -> StoreResult<()> {
        let collection = file_collection_name(prefix);
        self.delete_document(&collection, id)?;
        self.blobs_tree.remove(blob_key(&collection, id))?;
        self.blobs_tree.flush()?;
        Ok(())
    }
}

fn blob_key(collection: &str, id: &str) -> Vec<u8> {
    format!("{collection}/{id}").into_bytes()
}
