//! # notifreeze-domain
//!
//! Pure domain model for NotiFreeze, the open-window freeze reminder.
//!
//! ## Responsibilities
//! - Foundational types: entity identifiers, timer handles, error conventions, timestamps
//! - Define **Rooms** (door/window sensors, indoor sensors, pending timers)
//! - Define **Readings** (parsing sensor states, averaging, indoor/outdoor delta)
//! - Define **Messages** (locale templates, open-since formatting)
//! - Define **Discovery** (matching sensors to rooms by naming convention)
//! - Define the declarative **configuration** record
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All host boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod config;
pub mod discovery;
pub mod entity;
pub mod message;
pub mod notify;
pub mod reminder;
pub mod room;
pub mod temperature;
