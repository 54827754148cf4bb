//! State store port — the host's registry of entities and their states.

use std::future::Future;

use notifreeze_domain::entity::{EntityId, EntitySnapshot};
use notifreeze_domain::error::NotiFreezeError;
use notifreeze_domain::time::Timestamp;

/// Read access to host entity states plus change subscriptions.
///
/// Lookups of unknown entities return `None`/`false` rather than an error;
/// errors are reserved for failing host calls.
pub trait StateStore {
    /// Current raw state (`on`, `21.5`, `unavailable`, …).
    fn state(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<String>, NotiFreezeError>> + Send;

    /// When the state last changed.
    fn last_changed(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Timestamp>, NotiFreezeError>> + Send;

    /// Human-readable name (`Kitchen Window`).
    fn friendly_name(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<String>, NotiFreezeError>> + Send;

    /// Whether the host knows this entity.
    fn exists(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<bool, NotiFreezeError>> + Send;

    /// All entities of a domain (`sensor`, `binary_sensor`, …).
    fn states(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<EntitySnapshot>, NotiFreezeError>> + Send;

    /// Ask the host to deliver state changes of `entity_id` to the monitor.
    fn subscribe(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send;
}

impl<T: StateStore + Send + Sync> StateStore for std::sync::Arc<T> {
    fn state(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<String>, NotiFreezeError>> + Send {
        (**self).state(entity_id)
    }

    fn last_changed(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Timestamp>, NotiFreezeError>> + Send {
        (**self).last_changed(entity_id)
    }

    fn friendly_name(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<String>, NotiFreezeError>> + Send {
        (**self).friendly_name(entity_id)
    }

    fn exists(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<bool, NotiFreezeError>> + Send {
        (**self).exists(entity_id)
    }

    fn states(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<EntitySnapshot>, NotiFreezeError>> + Send {
        (**self).states(domain)
    }

    fn subscribe(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        (**self).subscribe(entity_id)
    }
}
