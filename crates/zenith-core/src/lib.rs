//! # Zenith Core Library
//!
//! Core logic for Zenith, a minimalist "digital wellbeing" launcher. All
//! behavior lives here; the `zenith` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Focus timer**: a tick-driven state machine with a three-step typed
//!   exit challenge. The caller invokes `tick()` once per second.
//! - **Intention gate**: a countdown before a distracting app may open.
//! - **Storage**: an append-only event log over SQLite (or memory) and
//!   TOML-based configuration
//! - **Statistics**: pure rollups over store snapshots
//! - **Collaborators**: notifications, camera passthrough, AI focus coach
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: Focus session state machine
//! - [`IntentionGate`]: Launch friction for distracting apps
//! - [`LogStore`]: Event log with truncation caps and export/import
//! - [`Launcher`]: Owns the store and applies state machine events
//! - [`Config`]: Application configuration management

pub mod camera;
pub mod catalog;
pub mod coach;
pub mod error;
pub mod events;
pub mod focus;
pub mod gate;
pub mod launcher;
pub mod model;
pub mod notify;
pub mod stats;
pub mod storage;

pub use error::{CameraError, CoachError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use focus::{DurationChoice, FocusState, FocusTimer};
pub use gate::{GateRejection, GateState, IntentionGate};
pub use launcher::{LaunchDecision, Launcher, Screen};
pub use model::{
    AppCategory, AppItem, AppKind, AppLaunchLog, FocusSession, LaunchDelay, SettingsPatch, Theme,
    UserSettings,
};
pub use notify::{Notification, NotificationPermission, Notifier};
pub use stats::Summary;
pub use storage::{Config, KvBackend, LogStore, MemoryKv, SqliteKv, StoreChange};
