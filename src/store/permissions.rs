//! Permission-record persistence.
//!
//! Records are keyed by resource path. An update is a single-record replace;
//! atomicity is sled's single-key insert.

use crate::governance::PermissionRecord;
use crate::store::core::DataSource;
use crate::store::error::StoreResult;

impl DataSource {
    /// Fetch the stored permission record for a resource path, if any.
    pub fn get_permissions(&self, resource: &str) -> StoreResult<Option<PermissionRecord>> {
        DataSource::get_json(&self.permissions_tree, resource)
    }

    /// Replace the permission record for a resource path.
    pub fn update_permissions(
        &self,
        resource: &str,
        record: &PermissionRecord,
    ) -> StoreResult<()> {
        DataSource::put_json(&self.permissions_tree, resource, record)
    }
}
