//! In-memory entity registry implementing the `StateStore` port.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use notifreeze_app::ports::StateStore;
use notifreeze_domain::entity::{EntityId, EntitySnapshot, EntityState, StateChange};
use notifreeze_domain::error::{NotFoundError, NotiFreezeError};
use notifreeze_domain::time::{Timestamp, now};
use tokio::sync::mpsc;

#[derive(Default)]
struct Inner {
    entities: HashMap<EntityId, EntitySnapshot>,
    subscribed: HashSet<EntityId>,
}

/// Shared in-memory state store.
///
/// Cloning is cheap; all clones see the same entities. State changes of
/// subscribed entities are pushed to the channel given to [`new`](Self::new).
#[derive(Clone)]
pub struct VirtualStateStore {
    inner: Arc<Mutex<Inner>>,
    changes: mpsc::UnboundedSender<StateChange>,
}

impl VirtualStateStore {
    #[must_use]
    pub fn new(changes: mpsc::UnboundedSender<StateChange>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            changes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Declare an entity, replacing any previous one with the same id.
    pub fn insert(
        &self,
        entity_id: EntityId,
        state: impl Into<String>,
        friendly_name: Option<String>,
    ) {
        let snapshot = EntitySnapshot {
            entity_id: entity_id.clone(),
            state: state.into(),
            friendly_name,
            last_changed: now(),
        };
        self.lock().entities.insert(entity_id, snapshot);
    }

    /// Change the state of a declared entity.
    ///
    /// `last_changed` only moves when the state actually differs, and only
    /// then is a [`StateChange`] pushed (for subscribed entities).
    ///
    /// # Errors
    ///
    /// Returns [`NotiFreezeError::NotFound`] if the entity was never declared.
    pub fn set_state(
        &self,
        entity_id: &EntityId,
        state: impl Into<String>,
    ) -> Result<(), NotiFreezeError> {
        self.set_state_at(entity_id, state, now())
    }

    /// Like [`set_state`](Self::set_state) with an explicit change time.
    ///
    /// # Errors
    ///
    /// Returns [`NotiFreezeError::NotFound`] if the entity was never declared.
    pub fn set_state_at(
        &self,
        entity_id: &EntityId,
        state: impl Into<String>,
        at: Timestamp,
    ) -> Result<(), NotiFreezeError> {
        let state = state.into();
        let change = {
            let mut inner = self.lock();
            let subscribed = inner.subscribed.contains(entity_id);
            let snapshot = inner.entities.get_mut(entity_id).ok_or_else(|| NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            })?;

            if snapshot.state == state {
                return Ok(());
            }

            let old = std::mem::replace(&mut snapshot.state, state);
            snapshot.last_changed = at;
            subscribed.then(|| StateChange {
                entity_id: entity_id.clone(),
                old: EntityState::parse(&old),
                new: EntityState::parse(&snapshot.state),
            })
        };

        if let Some(change) = change {
            tracing::debug!(
                entity = %change.entity_id,
                old = %change.old,
                new = %change.new,
                "virtual state change"
            );
            // The receiver only goes away when the host shuts down.
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    /// Snapshot of a single entity.
    #[must_use]
    pub fn snapshot(&self, entity_id: &EntityId) -> Option<EntitySnapshot> {
        self.lock().entities.get(entity_id).cloned()
    }

    #[must_use]
    pub fn is_subscribed(&self, entity_id: &EntityId) -> bool {
        self.lock().subscribed.contains(entity_id)
    }
}

impl StateStore for VirtualStateStore {
    fn state(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<String>, NotiFreezeError>> + Send {
        let r = self.snapshot(entity_id).map(|s| s.state);
        async move { Ok(r) }
    }

    fn last_changed(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Timestamp>, NotiFreezeError>> + Send {
        let r = self.snapshot(entity_id).map(|s| s.last_changed);
        async move { Ok(r) }
    }

    fn friendly_name(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<String>, NotiFreezeError>> + Send {
        let r = self.snapshot(entity_id).and_then(|s| s.friendly_name);
        async move { Ok(r) }
    }

    fn exists(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<bool, NotiFreezeError>> + Send {
        let r = self.lock().entities.contains_key(entity_id);
        async move { Ok(r) }
    }

    fn states(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<EntitySnapshot>, NotiFreezeError>> + Send {
        let mut r: Vec<_> = self
            .lock()
            .entities
            .values()
            .filter(|s| s.entity_id.domain() == domain)
            .cloned()
            .collect();
        r.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        async move { Ok(r) }
    }

    fn subscribe(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        self.lock().subscribed.insert(entity_id.clone());
        tracing::debug!(entity = %entity_id, "subscribed");
        async { Ok(()) }
    }
}
