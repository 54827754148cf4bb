//! Configuration resolution — turns the declarative [`NotiFreezeConfig`]
//! into validated [`Settings`] and watchable [`Room`]s by checking it
//! against the host.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use notifreeze_domain::config::{EntityList, NotiFreezeConfig, RoomConfig};
use notifreeze_domain::discovery::{KEYWORD_DOOR_WINDOW, KEYWORD_TEMPERATURE, find_sensors};
use notifreeze_domain::entity::{EntityId, EntitySnapshot};
use notifreeze_domain::error::{NotiFreezeError, ValidationError};
use notifreeze_domain::message::{MessageTemplates, capitalize};
use notifreeze_domain::notify::NotifyService;
use notifreeze_domain::room::Room;
use notifreeze_domain::temperature::Threshold;

use crate::ports::StateStore;

/// Validated, component-wide settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub notify_service: NotifyService,
    pub outdoor: BTreeSet<EntityId>,
    pub threshold: Threshold,
    pub initial_delay: Duration,
    pub reminder_delay: Duration,
    pub templates: MessageTemplates,
    pub always_notify: bool,
}

/// Result of resolving a configuration: settings plus rooms keyed by name.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub settings: Settings,
    pub rooms: BTreeMap<String, Room>,
}

/// Resolve `config` against the host.
///
/// Unusable rooms are skipped with a warning; the component as a whole only
/// fails when it could never notify anyone.
///
/// # Errors
///
/// Returns [`NotiFreezeError::Validation`] when no (valid) notify service is
/// configured, the threshold is invalid, or none of the outdoor sensors
/// exist. Host failures are propagated.
pub async fn resolve<S: StateStore>(
    config: &NotiFreezeConfig,
    store: &S,
) -> Result<Resolved, NotiFreezeError> {
    let notify_service = match config.notify_service.as_deref().map(str::trim) {
        None | Some("") => return Err(ValidationError::MissingNotifyService.into()),
        Some(value) => NotifyService::parse(value)?,
    };
    let threshold = Threshold::new(config.max_difference)?;

    let outdoor = existing(&config.outdoor, store).await?;
    if outdoor.is_empty() {
        return Err(ValidationError::NoOutdoorSensors.into());
    }

    let settings = Settings {
        notify_service,
        outdoor,
        threshold,
        initial_delay: config.delays.initial_delay(),
        reminder_delay: config.delays.reminder_delay(),
        templates: MessageTemplates::resolve(config.locale, &config.messages),
        always_notify: config.always_notify,
    };

    let mut catalog = Catalog::default();
    let mut rooms = BTreeMap::new();

    for room_config in &config.rooms {
        let Some(room) = resolve_room(room_config, config, store, &mut catalog).await? else {
            continue;
        };
        if rooms.contains_key(&room.name) {
            tracing::warn!(room = %room.name, "room configured twice, keeping the first one");
            continue;
        }
        rooms.insert(room.name.clone(), room);
    }

    Ok(Resolved { settings, rooms })
}

/// Host entity listings, fetched on first use only.
#[derive(Default)]
struct Catalog {
    binary_sensors: Option<Vec<EntitySnapshot>>,
    sensors: Option<Vec<EntitySnapshot>>,
}

impl Catalog {
    async fn binary_sensors<S: StateStore>(
        &mut self,
        store: &S,
    ) -> Result<&[EntitySnapshot], NotiFreezeError> {
        if self.binary_sensors.is_none() {
            self.binary_sensors = Some(store.states("binary_sensor").await?);
        }
        Ok(self.binary_sensors.as_deref().unwrap_or_default())
    }

    async fn sensors<S: StateStore>(
        &mut self,
        store: &S,
    ) -> Result<&[EntitySnapshot], NotiFreezeError> {
        if self.sensors.is_none() {
            self.sensors = Some(store.states("sensor").await?);
        }
        Ok(self.sensors.as_deref().unwrap_or_default())
    }
}

async fn resolve_room<S: StateStore>(
    room_config: &RoomConfig,
    config: &NotiFreezeConfig,
    store: &S,
    catalog: &mut Catalog,
) -> Result<Option<Room>, NotiFreezeError> {
    let name = capitalize(room_config.name().trim());
    if name.is_empty() {
        tracing::warn!("room without a name, skipping");
        return Ok(None);
    }

    let (alias, explicit_door_window, explicit_indoor) = match room_config {
        RoomConfig::Name(_) => (name.clone(), None, None),
        RoomConfig::Detailed(details) => (
            details.alias.clone().unwrap_or_else(|| name.clone()),
            details.door_window.as_ref(),
            details.indoor.as_ref(),
        ),
    };

    let mut door_window = match explicit_door_window {
        Some(list) => existing(list, store).await?,
        None => BTreeSet::new(),
    };
    if door_window.is_empty() {
        let states = catalog.binary_sensors(store).await?;
        door_window.extend(find_sensors(KEYWORD_DOOR_WINDOW, &alias, states));
    }

    let mut indoor = match explicit_indoor {
        Some(list) => existing(list, store).await?,
        None => BTreeSet::new(),
    };
    if indoor.is_empty() {
        let states = catalog.sensors(store).await?;
        indoor.extend(find_sensors(KEYWORD_TEMPERATURE, &alias, states));
    }

    let mut builder = Room::builder()
        .name(name.clone())
        .door_windows(door_window)
        .temperatures(indoor);
    if let Some(push) = &config.push {
        builder = builder.push_data(push.data_for(&name));
    }
    let room = builder.build()?;

    if !room.is_watchable() {
        tracing::warn!(
            room = %room.name,
            door_window = room.door_window.len(),
            indoor = room.temperature.len(),
            "room needs door/window and indoor sensors, skipping"
        );
        return Ok(None);
    }

    Ok(Some(room))
}

/// The entries of `list` that are valid ids known to the host.
async fn existing<S: StateStore>(
    list: &EntityList,
    store: &S,
) -> Result<BTreeSet<EntityId>, NotiFreezeError> {
    let mut found = BTreeSet::new();
    for raw in list.iter() {
        let entity_id = match EntityId::new(raw) {
            Ok(entity_id) => entity_id,
            Err(err) => {
                tracing::warn!(%err, "ignoring invalid entity id");
                continue;
            }
        };
        if store.exists(&entity_id).await? {
            found.insert(entity_id);
        } else {
            tracing::warn!(entity = %entity_id, "entity does not exist, ignoring");
        }
    }
    Ok(found)
}
