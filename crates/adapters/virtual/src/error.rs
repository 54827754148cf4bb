//! Virtual host error types.

use notifreeze_domain::entity::EntityId;
use notifreeze_domain::error::{NotFoundError, NotiFreezeError, ValidationError};

/// Errors specific to the virtual host.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// A configured entity id is malformed.
    #[error("invalid virtual entity")]
    InvalidEntity(#[source] ValidationError),

    /// A scenario step targets an entity that was never declared.
    #[error("unknown virtual entity {0}")]
    UnknownEntity(EntityId),
}

impl VirtualError {
    /// Convert into a [`NotiFreezeError`] for propagation across port boundaries.
    pub fn into_domain(self) -> NotiFreezeError {
        match self {
            Self::InvalidEntity(err) => NotiFreezeError::Validation(err),
            Self::UnknownEntity(entity_id) => NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            }
            .into(),
        }
    }
}

impl From<VirtualError> for NotiFreezeError {
    fn from(err: VirtualError) -> Self {
        err.into_domain()
    }
}
