use thiserror::Error;
use crate::owner_id::OwnerIdParseError;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid principal id: {0}")]
    InvalidPrincipalId(#[from] OwnerIdParseError),
}
