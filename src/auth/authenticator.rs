//! Identity establishment.

use crate::auth::credentials::Credentials;
use crate::error::ApiResult;
use crate::store::{DataSource, StoreError, User};
use log::debug;

/// Maps credentials to a user identity or anonymous.
///
/// Absent credentials and credentials that match no user both resolve to
/// anonymous, never to an error; only collaborator failures propagate.
/// Whether anonymous access suffices is the authorizer's call, not this one.
#[derive(Clone)]
pub struct Authenticator {
    store: DataSource,
}

impl Authenticator {
    pub fn new(store: DataSource) -> Self {
        Self { store }
    }

    pub fn authenticate(&self, credentials: Option<Credentials>) -> ApiResult<Option<User>> {
        let Some(credentials) = credentials else {
            return Ok(None);
        };
        match self.store.get_user(&credentials.username) {
            Ok(user) => {
                if user.verify_password(&credentials.password) {
                    Ok(Some(user))
                } else {
                    debug!("password mismatch for {}", credentials.username);
                    Ok(None)
                }
            }
            Err(StoreError::UserNotFound(_)) => {
                debug!("unknown user {}", credentials.username);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
