//! Freeze monitor — reacts to door/window changes and reminder timers.
//!
//! Per (room, sensor) the monitor moves between two states:
//!
//! - **Idle** → **Pending** when the sensor opens while the indoor/outdoor
//!   gap exceeds the threshold (a reminder is scheduled).
//! - **Pending** → **Pending** on every reminder that still sees the sensor
//!   open and the gap exceeded (notify, then reschedule).
//! - **Pending** → **Idle** when the sensor closes (timer cancelled) or a
//!   reminder finds the gap resolved (timer cleared).
//!
//! The host must deliver [`on_state_change`](FreezeMonitor::on_state_change)
//! and [`on_timer_fire`](FreezeMonitor::on_timer_fire) calls one at a time.

use std::collections::{BTreeMap, BTreeSet};

use chrono::TimeDelta;
use notifreeze_domain::config::NotiFreezeConfig;
use notifreeze_domain::entity::{EntityId, EntityState, StateChange};
use notifreeze_domain::error::NotiFreezeError;
use notifreeze_domain::id::TimerHandle;
use notifreeze_domain::message::{MessageContext, trim_entity_name};
use notifreeze_domain::reminder::Reminder;
use notifreeze_domain::room::Room;
use notifreeze_domain::temperature::{Aggregate, Delta};
use notifreeze_domain::time::{elapsed_since, now};

use crate::ports::{Notifier, Scheduler, StateStore};
use crate::setup::{self, Settings};

pub const APP_NAME: &str = "NotiFreeze";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The freeze monitor, generic over the host ports it is wired to.
pub struct FreezeMonitor<S, T, N> {
    settings: Settings,
    rooms: BTreeMap<String, Room>,
    store: S,
    scheduler: T,
    notifier: N,
}

impl<S, T, N> FreezeMonitor<S, T, N>
where
    S: StateStore,
    T: Scheduler,
    N: Notifier,
{
    /// Resolve `config` against the host, subscribe to every door/window
    /// sensor, and log the resulting setup.
    ///
    /// # Errors
    ///
    /// Returns [`NotiFreezeError::Validation`] when the configuration can not
    /// work at all (see [`setup::resolve`]), or a host error.
    pub async fn setup(
        config: &NotiFreezeConfig,
        store: S,
        scheduler: T,
        notifier: N,
    ) -> Result<Self, NotiFreezeError> {
        let resolved = setup::resolve(config, &store).await?;

        let watched: BTreeSet<&EntityId> = resolved
            .rooms
            .values()
            .flat_map(|room| room.door_window.iter())
            .collect();
        for entity_id in watched {
            store.subscribe(entity_id).await?;
        }

        let monitor = Self {
            settings: resolved.settings,
            rooms: resolved.rooms,
            store,
            scheduler,
            notifier,
        };
        monitor.log_summary();
        Ok(monitor)
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn rooms(&self) -> &BTreeMap<String, Room> {
        &self.rooms
    }

    #[must_use]
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Handle a state change of a subscribed door/window sensor.
    ///
    /// `off → on` schedules the first reminder when the gap is exceeded;
    /// `on → off` cancels a pending reminder. Anything else is ignored.
    ///
    /// # Errors
    ///
    /// Only host failures are returned; unreadable sensors are logged and
    /// leave the state untouched.
    pub async fn on_state_change(&mut self, change: StateChange) -> Result<(), NotiFreezeError> {
        let owners: Vec<String> = self
            .rooms
            .values()
            .filter(|room| room.watches(&change.entity_id))
            .map(|room| room.name.clone())
            .collect();

        if owners.is_empty() {
            tracing::debug!(entity = %change.entity_id, "state change for unwatched entity");
            return Ok(());
        }

        for room_name in owners {
            tracing::debug!(
                room = %room_name,
                entity = %change.entity_id,
                old = %change.old,
                new = %change.new,
                "state change"
            );

            if change.is_opening() {
                self.opened(&room_name, &change.entity_id).await?;
            } else if change.is_closing() {
                self.clear_timer(&room_name, &change.entity_id).await?;
            }
        }

        Ok(())
    }

    /// Handle a fired reminder.
    ///
    /// Notifies and reschedules while the sensor is open and the gap is
    /// exceeded; otherwise clears the room's timer entry.
    ///
    /// # Errors
    ///
    /// Only host failures are returned; unreadable sensors are logged and
    /// leave the state untouched.
    pub async fn on_timer_fire(
        &mut self,
        handle: TimerHandle,
        reminder: Reminder,
    ) -> Result<(), NotiFreezeError> {
        let Some(room) = self.rooms.get(&reminder.room) else {
            tracing::warn!(room = %reminder.room, "reminder for unknown room");
            return Ok(());
        };
        if room.timer(&reminder.entity_id) != Some(handle) {
            tracing::debug!(
                room = %reminder.room,
                entity = %reminder.entity_id,
                "stale reminder, ignoring"
            );
            return Ok(());
        }

        tracing::debug!(
            room = %reminder.room,
            entity = %reminder.entity_id,
            counter = reminder.counter,
            "reminder fired"
        );

        let Some(delta) = self.delta(room).await? else {
            tracing::error!(
                room = %reminder.room,
                entity = %reminder.entity_id,
                "no valid temperature readings, skipping reminder"
            );
            return Ok(());
        };

        let still_open = self
            .store
            .state(&reminder.entity_id)
            .await?
            .is_some_and(|state| EntityState::parse(&state) == EntityState::On);

        if !(still_open && self.settings.threshold.is_exceeded_by(&delta)) {
            if let Some(room) = self.rooms.get_mut(&reminder.room) {
                room.take_timer(&reminder.entity_id);
            }
            tracing::info!(
                room = %reminder.room,
                entity = %reminder.entity_id,
                still_open,
                delta = delta.value(),
                "condition resolved, timer stopped"
            );
            return Ok(());
        }

        self.remind(&reminder, &delta).await?;

        let handle = self
            .scheduler
            .schedule_after(self.settings.reminder_delay, reminder.next())
            .await?;
        if let Some(room) = self.rooms.get_mut(&reminder.room) {
            // The replaced handle is the one that just fired.
            room.track_timer(reminder.entity_id.clone(), handle);
        }

        Ok(())
    }

    async fn opened(
        &mut self,
        room_name: &str,
        entity_id: &EntityId,
    ) -> Result<(), NotiFreezeError> {
        let Some(room) = self.rooms.get(room_name) else {
            return Ok(());
        };

        let Some(delta) = self.delta(room).await? else {
            tracing::error!(
                room = %room_name,
                entity = %entity_id,
                "no valid temperature readings, not scheduling a reminder"
            );
            return Ok(());
        };

        if !self.settings.threshold.is_exceeded_by(&delta) {
            tracing::debug!(
                room = %room_name,
                entity = %entity_id,
                delta = delta.value(),
                "opened, temperature difference within limits"
            );
            return Ok(());
        }

        let reminder = Reminder::first(entity_id.clone(), room_name, delta.indoor);
        let handle = self
            .scheduler
            .schedule_after(self.settings.initial_delay, reminder)
            .await?;

        let replaced = self
            .rooms
            .get_mut(room_name)
            .and_then(|room| room.track_timer(entity_id.clone(), handle));
        if let Some(previous) = replaced {
            self.scheduler.cancel(previous).await?;
        }

        let entity_name = self.entity_name(entity_id, room_name).await?;
        tracing::info!(
            room = %room_name,
            entity = %entity_name,
            delta = %format_args!("{:+.1}°C", delta.value()),
            reminder_in_min = self.settings.initial_delay.as_secs() / 60,
            "opened, reminder scheduled"
        );

        Ok(())
    }

    async fn clear_timer(
        &mut self,
        room_name: &str,
        entity_id: &EntityId,
    ) -> Result<(), NotiFreezeError> {
        let Some(handle) = self
            .rooms
            .get_mut(room_name)
            .and_then(|room| room.take_timer(entity_id))
        else {
            return Ok(());
        };

        self.scheduler.cancel(handle).await?;

        let entity_name = self.entity_name(entity_id, room_name).await?;
        tracing::info!(room = %room_name, entity = %entity_name, "closed, timer stopped");
        Ok(())
    }

    /// Build and dispatch the reminder message, unless it would only repeat
    /// an unchanged temperature and `always_notify` is off.
    async fn remind(&self, reminder: &Reminder, delta: &Delta) -> Result<(), NotiFreezeError> {
        let Some(room) = self.rooms.get(&reminder.room) else {
            return Ok(());
        };

        let entity_name = self.entity_name(&reminder.entity_id, &room.name).await?;
        let open_for = self
            .store
            .last_changed(&reminder.entity_id)
            .await?
            .map_or(TimeDelta::zero(), |since| elapsed_since(since, now()));

        let ctx = MessageContext {
            room_name: &room.name,
            entity_name: &entity_name,
            open_for,
            initial: reminder.initial,
            indoor: delta.indoor,
        };

        if ctx.is_unchanged() && !self.settings.always_notify {
            tracing::debug!(
                room = %room.name,
                entity = %entity_name,
                counter = reminder.counter,
                "indoor temperature unchanged, notification suppressed"
            );
            return Ok(());
        }

        let message = self.settings.templates.render(&ctx);
        self.notifier
            .notify(&self.settings.notify_service, &message, &room.push_data)
            .await?;

        tracing::info!(
            service = %self.settings.notify_service,
            counter = reminder.counter,
            "notifying: {message}"
        );
        Ok(())
    }

    /// Current outdoor/indoor means for `room`, `None` if either is unreadable.
    async fn delta(&self, room: &Room) -> Result<Option<Delta>, NotiFreezeError> {
        let outdoor = self.mean("outdoor", &self.settings.outdoor).await?;
        let indoor = self.mean(&room.name, &room.temperature).await?;
        Ok(outdoor
            .zip(indoor)
            .map(|(outdoor, indoor)| Delta { outdoor, indoor }))
    }

    async fn mean(
        &self,
        label: &str,
        sensors: &BTreeSet<EntityId>,
    ) -> Result<Option<f64>, NotiFreezeError> {
        let mut states = Vec::with_capacity(sensors.len());
        for sensor in sensors {
            states.push((sensor.clone(), self.store.state(sensor).await?));
        }

        let aggregate = Aggregate::from_states(states);
        if !aggregate.invalid.is_empty() {
            let invalid: Vec<String> = aggregate
                .invalid
                .iter()
                .map(|(sensor, raw)| format!("{sensor}={}", raw.as_deref().unwrap_or("missing")))
                .collect();
            tracing::warn!(sensors = label, invalid = ?invalid, "ignoring invalid temperature readings");
        }
        Ok(aggregate.mean)
    }

    /// Friendly name with the room name stripped, falling back to the entity id.
    async fn entity_name(
        &self,
        entity_id: &EntityId,
        room_name: &str,
    ) -> Result<String, NotiFreezeError> {
        let friendly = self
            .store
            .friendly_name(entity_id)
            .await?
            .unwrap_or_else(|| entity_id.to_string());
        Ok(trim_entity_name(&friendly, room_name))
    }

    fn log_summary(&self) {
        let settings = &self.settings;
        tracing::info!("{APP_NAME} v{APP_VERSION}");
        tracing::info!(
            max_difference = %format_args!("±{}°C", settings.threshold.value()),
            initial_min = settings.initial_delay.as_secs() / 60,
            reminder_min = settings.reminder_delay.as_secs() / 60,
            notify_service = %settings.notify_service,
            always_notify = settings.always_notify,
            "settings"
        );
        tracing::info!(outdoor = ?settings.outdoor, "outdoor sensors");
        for room in self.rooms.values() {
            tracing::info!(
                room = %room.name,
                door_window = ?room.door_window,
                indoor = ?room.temperature,
                "watching room"
            );
        }
    }
}
