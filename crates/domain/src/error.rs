//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`NotiFreezeError`] via `#[from]`.

/// Top-level error for every fallible NotiFreeze operation.
#[derive(Debug, thiserror::Error)]
pub enum NotiFreezeError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A host call (state store, scheduler, notifier) failed.
    #[error("host error")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations, mostly raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("no notify service configured")]
    MissingNotifyService,

    #[error("invalid notify service {0:?}, expected `notify.<name>`")]
    InvalidNotifyService(String),

    #[error("no outdoor sensors configured")]
    NoOutdoorSensors,

    #[error("invalid entity id {0:?}, expected `<domain>.<object_id>`")]
    InvalidEntityId(String),

    #[error("max difference must be a non-negative number, got {0}")]
    InvalidMaxDifference(f64),
}

/// A referenced item does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
