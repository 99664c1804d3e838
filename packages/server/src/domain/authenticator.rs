//! Authentication collaborator.

use super::{AuthError, Identity};

/// Turns a presented credential into the identity the server trusts for the
/// lifetime of the connection.
#[cfg_attr(test, mockall::automock)]
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<Identity, AuthError>;
}
