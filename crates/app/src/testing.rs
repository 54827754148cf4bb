//! In-memory fakes of the host ports, shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notifreeze_domain::entity::{EntityId, EntitySnapshot};
use notifreeze_domain::error::NotiFreezeError;
use notifreeze_domain::id::TimerHandle;
use notifreeze_domain::notify::NotifyService;
use notifreeze_domain::reminder::Reminder;
use notifreeze_domain::time::{Timestamp, now};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::ports::{Notifier, Scheduler, StateStore};

pub fn id(value: &str) -> EntityId {
    EntityId::new(value).unwrap()
}

// ── In-memory state store ──────────────────────────────────────────

#[derive(Debug, Clone)]
struct FakeEntity {
    state: String,
    friendly_name: Option<String>,
    last_changed: Timestamp,
}

#[derive(Default)]
pub struct FakeStateStore {
    entities: Mutex<HashMap<EntityId, FakeEntity>>,
    pub subscribed: Mutex<Vec<EntityId>>,
}

impl FakeStateStore {
    pub fn with(self, entity_id: &str, state: &str, friendly_name: Option<&str>) -> Self {
        self.entities.lock().unwrap().insert(
            id(entity_id),
            FakeEntity {
                state: state.to_string(),
                friendly_name: friendly_name.map(str::to_string),
                last_changed: now(),
            },
        );
        self
    }

    pub fn set_state(&self, entity_id: &str, state: &str) {
        let mut entities = self.entities.lock().unwrap();
        let entity = entities.get_mut(&id(entity_id)).unwrap();
        entity.state = state.to_string();
        entity.last_changed = now();
    }

    pub fn set_last_changed(&self, entity_id: &str, last_changed: Timestamp) {
        let mut entities = self.entities.lock().unwrap();
        entities.get_mut(&id(entity_id)).unwrap().last_changed = last_changed;
    }
}

impl StateStore for FakeStateStore {
    fn state(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<String>, NotiFreezeError>> + Send {
        let r = self
            .entities
            .lock()
            .unwrap()
            .get(entity_id)
            .map(|e| e.state.clone());
        async { Ok(r) }
    }

    fn last_changed(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Timestamp>, NotiFreezeError>> + Send {
        let r = self
            .entities
            .lock()
            .unwrap()
            .get(entity_id)
            .map(|e| e.last_changed);
        async move { Ok(r) }
    }

    fn friendly_name(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<String>, NotiFreezeError>> + Send {
        let r = self
            .entities
            .lock()
            .unwrap()
            .get(entity_id)
            .and_then(|e| e.friendly_name.clone());
        async { Ok(r) }
    }

    fn exists(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<bool, NotiFreezeError>> + Send {
        let r = self.entities.lock().unwrap().contains_key(entity_id);
        async move { Ok(r) }
    }

    fn states(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<Vec<EntitySnapshot>, NotiFreezeError>> + Send {
        let mut r: Vec<_> = self
            .entities
            .lock()
            .unwrap()
            .iter()
            .filter(|(entity_id, _)| entity_id.domain() == domain)
            .map(|(entity_id, e)| EntitySnapshot {
                entity_id: entity_id.clone(),
                state: e.state.clone(),
                friendly_name: e.friendly_name.clone(),
                last_changed: e.last_changed,
            })
            .collect();
        r.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        async { Ok(r) }
    }

    fn subscribe(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        self.subscribed.lock().unwrap().push(entity_id.clone());
        async { Ok(()) }
    }
}

// ── Recording scheduler ────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Scheduled {
    pub handle: TimerHandle,
    pub delay: Duration,
    pub reminder: Reminder,
}

#[derive(Default)]
pub struct FakeScheduler {
    pub scheduled: Mutex<Vec<Scheduled>>,
    pub cancelled: Mutex<Vec<TimerHandle>>,
}

impl FakeScheduler {
    pub fn last(&self) -> Scheduled {
        self.scheduled.lock().unwrap().last().cloned().unwrap()
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled.lock().unwrap().len()
    }

    pub fn cancelled(&self) -> Vec<TimerHandle> {
        self.cancelled.lock().unwrap().clone()
    }
}

impl Scheduler for FakeScheduler {
    fn schedule_after(
        &self,
        delay: Duration,
        reminder: Reminder,
    ) -> impl Future<Output = Result<TimerHandle, NotiFreezeError>> + Send {
        let handle = TimerHandle::new();
        self.scheduled.lock().unwrap().push(Scheduled {
            handle,
            delay,
            reminder,
        });
        async move { Ok(handle) }
    }

    fn cancel(
        &self,
        handle: TimerHandle,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        self.cancelled.lock().unwrap().push(handle);
        async { Ok(()) }
    }
}

// ── Spy notifier ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Sent {
    pub service: String,
    pub message: String,
    pub data: serde_json::Value,
}

#[derive(Default)]
pub struct SpyNotifier {
    pub sent: Mutex<Vec<Sent>>,
}

impl SpyNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.message.clone())
            .collect()
    }
}

impl Notifier for SpyNotifier {
    fn notify(
        &self,
        service: &NotifyService,
        message: &str,
        data: &serde_json::Value,
    ) -> impl Future<Output = Result<(), NotiFreezeError>> + Send {
        self.sent.lock().unwrap().push(Sent {
            service: service.to_string(),
            message: message.to_string(),
            data: data.clone(),
        });
        async { Ok(()) }
    }
}

// ── Log capture ────────────────────────────────────────────────────

/// A `tracing` layer recording every event's level and message.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl LogCapture {
    /// Capture events on the current thread until the guard is dropped.
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::ERROR)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = MessageVisitor::default();
        event.record(&mut message);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), message.0));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
