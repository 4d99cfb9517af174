//! Access control for addressable resources.
//!
//! Every resource path may carry a permission record, set explicitly or
//! inherited from another resource through its `_inherit` pointer. The
//! [`PermissionResolver`] turns a resource path into the rules that apply to
//! it; the [`Authorizer`] turns those rules, an identity, and an operation
//! kind into a grant-or-deny decision.

pub mod authorizer;
pub mod decode;
pub mod record;
pub mod resolver;

pub use authorizer::{Authorizer, Operation};
pub use decode::{decode_hal_permissions, decode_json_permissions};
pub use record::PermissionRecord;
pub use resolver::{PermissionResolver, ResolvedPermissions};
