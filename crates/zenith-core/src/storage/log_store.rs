//! Append-only event log with write-through persistence.
//!
//! The store keeps an in-memory copy of every record; readers always see
//! that copy. Mutations update memory first, then write the affected record
//! to the backend as a JSON document. Reads never fail: a missing or corrupt
//! record degrades to its default.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use super::kv::KvBackend;
use crate::error::StorageError;
use crate::model::{AppCategory, AppLaunchLog, FocusSession, SettingsPatch, UserSettings};

pub const SETTINGS_KEY: &str = "zenith_settings";
pub const APP_LAUNCHES_KEY: &str = "zenith_app_launches";
pub const FOCUS_SESSIONS_KEY: &str = "zenith_focus_sessions";
pub const APP_CATEGORIES_KEY: &str = "zenith_app_categories";

/// Most recent launches retained.
pub const MAX_LAUNCHES: usize = 1000;
/// Most recent sessions retained.
pub const MAX_SESSIONS: usize = 100;

const DAY_MS: i64 = 86_400_000;
const CHANGE_CAPACITY: usize = 64;

/// Notification published after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    LaunchAppended(AppLaunchLog),
    SessionAppended(FocusSession),
    CategoryChanged {
        app_id: String,
        category: AppCategory,
    },
    SettingsChanged(UserSettings),
    Imported,
    Cleared,
}

/// Event log over a key/value backend.
pub struct LogStore<B: KvBackend> {
    backend: B,
    settings: UserSettings,
    launches: Vec<AppLaunchLog>,
    sessions: Vec<FocusSession>,
    categories: BTreeMap<String, AppCategory>,
    changes: broadcast::Sender<StoreChange>,
}

impl<B: KvBackend> LogStore<B> {
    /// Load every record from `backend`.
    pub fn open(backend: B) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        let mut store = Self {
            backend,
            settings: UserSettings::default(),
            launches: Vec::new(),
            sessions: Vec::new(),
            categories: BTreeMap::new(),
            changes,
        };
        store.reload();
        store
    }

    /// Receive a `StoreChange` for every subsequent mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ── Logs ─────────────────────────────────────────────────────────

    /// Append a launch, dropping the oldest entries beyond the cap.
    pub fn append_launch(&mut self, log: AppLaunchLog) -> Result<(), StorageError> {
        self.launches.push(log.clone());
        truncate_front(&mut self.launches, MAX_LAUNCHES);
        tracing::info!(app = %log.app_name, gated = log.intention.is_some(), "app launched");
        self.publish(StoreChange::LaunchAppended(log));
        write_record(&mut self.backend, APP_LAUNCHES_KEY, &self.launches)
    }

    /// Append a finalized session, dropping the oldest entries beyond the cap.
    pub fn append_session(&mut self, session: FocusSession) -> Result<(), StorageError> {
        self.sessions.push(session.clone());
        truncate_front(&mut self.sessions, MAX_SESSIONS);
        tracing::info!(
            id = %session.id,
            duration = session.duration,
            completed = session.completed,
            "focus session recorded"
        );
        self.publish(StoreChange::SessionAppended(session));
        write_record(&mut self.backend, FOCUS_SESSIONS_KEY, &self.sessions)
    }

    pub fn launches(&self) -> &[AppLaunchLog] {
        &self.launches
    }

    pub fn sessions(&self) -> &[FocusSession] {
        &self.sessions
    }

    /// Launches within `[now - days, now)`, or all when `since_days` is `None`.
    pub fn read_launches(&self, since_days: Option<u32>, now_ms: i64) -> Vec<AppLaunchLog> {
        self.launches
            .iter()
            .filter(|l| in_window(l.timestamp, since_days, now_ms))
            .cloned()
            .collect()
    }

    /// Sessions whose start falls within `[now - days, now)`, or all.
    pub fn read_sessions(&self, since_days: Option<u32>, now_ms: i64) -> Vec<FocusSession> {
        self.sessions
            .iter()
            .filter(|s| in_window(s.start_time, since_days, now_ms))
            .cloned()
            .collect()
    }

    /// Launches on the same local calendar day as `now_ms`.
    pub fn today_launch_count(&self, now_ms: i64) -> usize {
        self.today_launch_count_in(now_ms, &Local)
    }

    pub fn today_launch_count_in<Tz: TimeZone>(&self, now_ms: i64, tz: &Tz) -> usize {
        let Some(today) = local_date(now_ms, tz) else {
            return 0;
        };
        self.launches
            .iter()
            .filter(|l| local_date(l.timestamp, tz) == Some(today))
            .count()
    }

    /// Completion percentage over the last `days` days.
    pub fn completion_rate(&self, days: u32, now_ms: i64) -> u32 {
        crate::stats::completion_rate(&self.read_sessions(Some(days), now_ms))
    }

    // ── Categories ───────────────────────────────────────────────────

    pub fn category(&self, app_id: &str) -> AppCategory {
        self.categories.get(app_id).copied().unwrap_or_default()
    }

    pub fn categories(&self) -> &BTreeMap<String, AppCategory> {
        &self.categories
    }

    pub fn set_category(&mut self, app_id: &str, category: AppCategory) -> Result<(), StorageError> {
        self.categories.insert(app_id.to_string(), category);
        tracing::debug!(app_id, category = category.as_str(), "category changed");
        self.publish(StoreChange::CategoryChanged {
            app_id: app_id.to_string(),
            category,
        });
        write_record(&mut self.backend, APP_CATEGORIES_KEY, &self.categories)
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Merge `patch` into the current settings and persist the result.
    pub fn set_settings(&mut self, patch: &SettingsPatch) -> Result<UserSettings, StorageError> {
        self.replace_settings(self.settings.merged(patch))
    }

    pub fn reset_settings(&mut self) -> Result<UserSettings, StorageError> {
        self.replace_settings(UserSettings::default())
    }

    fn replace_settings(&mut self, settings: UserSettings) -> Result<UserSettings, StorageError> {
        self.settings = settings.clone();
        self.publish(StoreChange::SettingsChanged(settings.clone()));
        write_record(&mut self.backend, SETTINGS_KEY, &self.settings)?;
        Ok(settings)
    }

    // ── Export / import ──────────────────────────────────────────────

    /// Pretty JSON snapshot of every record, stamped with `now_ms`.
    pub fn export_all(&self, now_ms: i64) -> Result<String, StorageError> {
        let export_date = DateTime::<Utc>::from_timestamp_millis(now_ms)
            .unwrap_or_default()
            .to_rfc3339();
        let doc = serde_json::json!({
            "settings": self.settings,
            "launches": self.launches,
            "sessions": self.sessions,
            "categories": self.categories,
            "exportDate": export_date,
        });
        serde_json::to_string_pretty(&doc).map_err(|source| StorageError::Serialize {
            key: "export".into(),
            source,
        })
    }

    /// Replace records from an exported document.
    ///
    /// Each present field of the right shape replaces its record; absent,
    /// null or mistyped fields are left untouched. Malformed list entries
    /// are dropped one by one. Returns `false` without changing anything if
    /// the input is not a JSON object or a backend write fails.
    pub fn import_all(&mut self, json: &str) -> bool {
        let doc = match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!("import rejected: top level is not an object");
                return false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "import rejected: invalid JSON");
                return false;
            }
        };

        let settings = match doc.get("settings") {
            Some(Value::Object(map)) => {
                serde_json::from_value::<UserSettings>(Value::Object(map.clone()))
                    .inspect_err(|e| tracing::warn!(error = %e, "import: settings skipped"))
                    .ok()
            }
            other => skip_field("settings", other),
        };
        let launches = match doc.get("launches") {
            Some(Value::Array(items)) => {
                let mut launches = parse_entries::<AppLaunchLog>(APP_LAUNCHES_KEY, items);
                truncate_front(&mut launches, MAX_LAUNCHES);
                Some(launches)
            }
            other => skip_field("launches", other),
        };
        let sessions = match doc.get("sessions") {
            Some(Value::Array(items)) => {
                let mut sessions = parse_entries::<FocusSession>(FOCUS_SESSIONS_KEY, items);
                truncate_front(&mut sessions, MAX_SESSIONS);
                Some(sessions)
            }
            other => skip_field("sessions", other),
        };
        let categories = match doc.get("categories") {
            Some(Value::Object(map)) => Some(
                map.iter()
                    .filter_map(|(id, v)| {
                        serde_json::from_value::<AppCategory>(v.clone())
                            .inspect_err(|e| {
                                tracing::warn!(app_id = %id, error = %e, "import: category skipped")
                            })
                            .ok()
                            .map(|c| (id.clone(), c))
                    })
                    .collect::<BTreeMap<_, _>>(),
            ),
            other => skip_field("categories", other),
        };

        let mut staged = Vec::new();
        let encoded = [
            (SETTINGS_KEY, settings.as_ref().map(serde_json::to_string)),
            (APP_LAUNCHES_KEY, launches.as_ref().map(serde_json::to_string)),
            (FOCUS_SESSIONS_KEY, sessions.as_ref().map(serde_json::to_string)),
            (APP_CATEGORIES_KEY, categories.as_ref().map(serde_json::to_string)),
        ];
        for (key, raw) in encoded {
            match raw {
                None => {}
                Some(Ok(raw)) => staged.push((key, raw)),
                Some(Err(e)) => {
                    tracing::error!(key, error = %e, "import encode failed");
                    return false;
                }
            }
        }

        let mut written: Vec<(&str, Option<String>)> = Vec::new();
        for (key, raw) in &staged {
            let previous = self.backend.get(key).ok().flatten();
            if let Err(e) = self.backend.set(key, raw) {
                tracing::error!(key, error = %e, "import write failed, rolling back");
                self.restore(written);
                return false;
            }
            written.push((*key, previous));
        }

        if let Some(settings) = settings {
            self.settings = settings;
        }
        if let Some(launches) = launches {
            self.launches = launches;
        }
        if let Some(sessions) = sessions {
            self.sessions = sessions;
        }
        if let Some(categories) = categories {
            self.categories = categories;
        }
        self.publish(StoreChange::Imported);
        true
    }

    /// Remove every record and return to defaults.
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.settings = UserSettings::default();
        self.launches.clear();
        self.sessions.clear();
        self.categories.clear();
        self.publish(StoreChange::Cleared);

        for key in [
            SETTINGS_KEY,
            APP_LAUNCHES_KEY,
            FOCUS_SESSIONS_KEY,
            APP_CATEGORIES_KEY,
        ] {
            self.backend.remove(key).inspect_err(|e| {
                tracing::error!(key, error = %e, "failed to clear record");
            })?;
        }
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn reload(&mut self) {
        self.settings = read_record(&self.backend, SETTINGS_KEY);
        self.launches = read_list(&self.backend, APP_LAUNCHES_KEY);
        self.sessions = read_list(&self.backend, FOCUS_SESSIONS_KEY);
        self.categories = read_record(&self.backend, APP_CATEGORIES_KEY);
        truncate_front(&mut self.launches, MAX_LAUNCHES);
        truncate_front(&mut self.sessions, MAX_SESSIONS);
    }

    /// Put back the backend values an aborted import overwrote.
    fn restore(&mut self, written: Vec<(&str, Option<String>)>) {
        for (key, previous) in written.into_iter().rev() {
            let result = match previous {
                Some(raw) => self.backend.set(key, &raw),
                None => self.backend.remove(key),
            };
            if let Err(e) = result {
                tracing::error!(key, error = %e, "import rollback failed");
            }
        }
    }

    fn publish(&self, change: StoreChange) {
        // No subscribers is not an error.
        let _ = self.changes.send(change);
    }
}

fn read_record<B: KvBackend, T: DeserializeOwned + Default>(backend: &B, key: &str) -> T {
    match backend.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "corrupt record, using default");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read record, using default");
            T::default()
        }
    }
}

/// Read a JSON array record, keeping every entry that parses.
fn read_list<B: KvBackend, T: DeserializeOwned>(backend: &B, key: &str) -> Vec<T> {
    let items: Vec<Value> = read_record(backend, key);
    parse_entries(key, &items)
}

fn parse_entries<T: DeserializeOwned>(key: &str, items: &[Value]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value(item.clone())
                .inspect_err(|e| {
                    tracing::warn!(key, index, error = %e, "dropping malformed entry");
                })
                .ok()
        })
        .collect()
}

fn skip_field<T>(field: &str, value: Option<&Value>) -> Option<T> {
    match value {
        None | Some(Value::Null) => {}
        Some(other) => {
            tracing::warn!(field, found = %other, "import: field has the wrong shape, skipped")
        }
    }
    None
}

fn write_record<B: KvBackend, T: Serialize + ?Sized>(
    backend: &mut B,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    backend.set(key, &raw).inspect_err(|e| {
        tracing::error!(key, error = %e, "failed to persist record");
    })
}

fn truncate_front<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
}

fn in_window(timestamp: i64, since_days: Option<u32>, now_ms: i64) -> bool {
    match since_days {
        None => true,
        Some(days) => {
            let start = now_ms - i64::from(days) * DAY_MS;
            timestamp >= start && timestamp < now_ms
        }
    }
}

fn local_date<Tz: TimeZone>(ms: i64, tz: &Tz) -> Option<chrono::NaiveDate> {
    tz.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.date_naive())
}
