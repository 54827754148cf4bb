//! The virtual host — wires the in-memory ports together and drives the
//! monitor from their channels.

use std::future::Future;
use std::time::Duration;

use notifreeze_app::monitor::FreezeMonitor;
use notifreeze_app::ports::{Notifier, Scheduler, StateStore};
use notifreeze_domain::entity::{EntityId, StateChange};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{ScenarioStep, VirtualConfig};
use crate::error::VirtualError;
use crate::notifier::LogNotifier;
use crate::scheduler::{FiredTimer, TokioScheduler};
use crate::state_store::VirtualStateStore;

/// A self-contained host: entity store, scheduler, notifier, and the event
/// loop that feeds state changes and fired timers to a monitor.
pub struct VirtualHost {
    store: VirtualStateStore,
    scheduler: TokioScheduler,
    notifier: LogNotifier,
    changes: mpsc::UnboundedReceiver<StateChange>,
    fired: mpsc::UnboundedReceiver<FiredTimer>,
}

impl Default for VirtualHost {
    fn default() -> Self {
        let (changes_tx, changes) = mpsc::unbounded_channel();
        let (fired_tx, fired) = mpsc::unbounded_channel();
        Self {
            store: VirtualStateStore::new(changes_tx),
            scheduler: TokioScheduler::new(fired_tx),
            notifier: LogNotifier::default(),
            changes,
            fired,
        }
    }
}

impl VirtualHost {
    /// Build a host populated with the entities of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::InvalidEntity`] for malformed entity ids.
    pub fn from_config(config: &VirtualConfig) -> Result<Self, VirtualError> {
        let host = Self::default();
        for entity in &config.entities {
            let entity_id =
                EntityId::new(entity.entity_id.as_str()).map_err(VirtualError::InvalidEntity)?;
            host.store
                .insert(entity_id, entity.state.clone(), entity.friendly_name.clone());
        }
        tracing::info!(entities = config.entities.len(), "virtual host ready");
        Ok(host)
    }

    #[must_use]
    pub fn store(&self) -> VirtualStateStore {
        self.store.clone()
    }

    #[must_use]
    pub fn scheduler(&self) -> TokioScheduler {
        self.scheduler.clone()
    }

    #[must_use]
    pub fn notifier(&self) -> LogNotifier {
        self.notifier.clone()
    }

    /// Play `steps` in the background, each `after_secs` after this call.
    ///
    /// # Errors
    ///
    /// Returns an error, before anything is spawned, if a step has a
    /// malformed id or targets an entity that was never declared.
    pub fn play(&self, steps: &[ScenarioStep]) -> Result<JoinHandle<()>, VirtualError> {
        let mut timeline = Vec::with_capacity(steps.len());
        for step in steps {
            let entity_id =
                EntityId::new(step.entity_id.as_str()).map_err(VirtualError::InvalidEntity)?;
            if self.store.snapshot(&entity_id).is_none() {
                return Err(VirtualError::UnknownEntity(entity_id));
            }
            timeline.push((
                Duration::from_secs(step.after_secs),
                entity_id,
                step.state.clone(),
            ));
        }
        timeline.sort_by_key(|(after, _, _)| *after);

        let store = self.store.clone();
        let start = tokio::time::Instant::now();
        Ok(tokio::spawn(async move {
            for (after, entity_id, state) in timeline {
                tokio::time::sleep_until(start + after).await;
                tracing::info!(entity = %entity_id, %state, "scenario step");
                if let Err(err) = store.set_state(&entity_id, state) {
                    tracing::warn!(%err, entity = %entity_id, "scenario step failed");
                }
            }
            tracing::debug!("scenario finished");
        }))
    }

    /// Deliver state changes and fired timers to `monitor`, one at a time,
    /// until `shutdown` completes. Pending timers are aborted on exit.
    ///
    /// Handler errors are logged and do not stop the loop.
    pub async fn run<S, T, N, F>(&mut self, monitor: &mut FreezeMonitor<S, T, N>, shutdown: F)
    where
        S: StateStore,
        T: Scheduler,
        N: Notifier,
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                Some(change) = self.changes.recv() => {
                    if let Err(err) = monitor.on_state_change(change).await {
                        tracing::error!(%err, "state change handler failed");
                    }
                }
                Some(FiredTimer { handle, reminder }) = self.fired.recv() => {
                    if let Err(err) = monitor.on_timer_fire(handle, reminder).await {
                        tracing::error!(%err, "reminder handler failed");
                    }
                }
                else => break,
            }
        }

        self.scheduler.cancel_all();
    }
}
