//! Integration tests for the event log store.
//!
//! Covers the truncation caps, windowed reads, export/import round trips and
//! persistence through SQLite on disk.

use proptest::prelude::*;
use zenith_core::storage::{APP_LAUNCHES_KEY, FOCUS_SESSIONS_KEY, MAX_LAUNCHES, MAX_SESSIONS};
use zenith_core::{
    AppCategory, AppItem, AppKind, AppLaunchLog, FocusSession, KvBackend, LogStore, MemoryKv,
    SettingsPatch, SqliteKv, StorageError, Theme,
};

const DAY_MS: i64 = 86_400_000;

fn launch(i: i64) -> AppLaunchLog {
    let app = AppItem::new(&i.to_string(), &format!("App {i}"), AppKind::Utility);
    AppLaunchLog::new(&app, i, None)
}

fn finished(start: i64, completed: bool) -> FocusSession {
    FocusSession::open(25, start)
        .finalize(completed, start + 25 * 60_000)
        .unwrap()
}

#[test]
fn inserting_1005_launches_drops_earliest_five() {
    let mut store = LogStore::open(MemoryKv::new());
    for i in 0..1005 {
        store.append_launch(launch(i)).unwrap();
    }
    assert_eq!(store.launches().len(), 1000);
    assert_eq!(store.launches()[0].timestamp, 5);
    assert_eq!(store.launches()[999].timestamp, 1004);

    // Persisted copy obeys the same cap.
    let reopened = LogStore::open(store.backend().clone());
    assert_eq!(reopened.launches().len(), 1000);
    assert_eq!(reopened.launches()[0].timestamp, 5);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn caps_hold_for_any_append_sequence(ops in prop::collection::vec(any::<bool>(), 0..1300)) {
        let mut store = LogStore::open(MemoryKv::new());
        let mut launches = 0usize;
        let mut sessions = 0usize;
        for (i, is_launch) in ops.iter().enumerate() {
            if *is_launch {
                store.append_launch(launch(i as i64)).unwrap();
                launches += 1;
            } else {
                store.append_session(finished(i as i64, true)).unwrap();
                sessions += 1;
            }
            prop_assert!(store.launches().len() <= MAX_LAUNCHES);
            prop_assert!(store.sessions().len() <= MAX_SESSIONS);
        }
        prop_assert_eq!(store.launches().len(), launches.min(MAX_LAUNCHES));
        prop_assert_eq!(store.sessions().len(), sessions.min(MAX_SESSIONS));
        // Newest entry always survives.
        if let Some(last) = store.launches().last() {
            let newest = ops.iter().rposition(|l| *l).unwrap() as i64;
            prop_assert_eq!(last.timestamp, newest);
        }
    }
}

#[test]
fn completion_rate_over_window() {
    let mut store = LogStore::open(MemoryKv::new());
    let now = 30 * DAY_MS;
    for i in 0..3 {
        store.append_session(finished(now - DAY_MS + i, true)).unwrap();
    }
    for i in 0..4 {
        store.append_session(finished(now - 2 * DAY_MS + i, false)).unwrap();
    }
    // Outside a 7 day window.
    store.append_session(finished(now - 10 * DAY_MS, false)).unwrap();

    assert_eq!(store.completion_rate(7, now), 43);
    assert_eq!(store.completion_rate(1, now), 100);
    assert_eq!(store.read_sessions(Some(7), now).len(), 7);
    assert_eq!(store.read_sessions(None, now).len(), 8);
}

#[test]
fn export_clear_import_restores_everything() {
    let mut store = LogStore::open(MemoryKv::new());
    store
        .set_settings(&SettingsPatch {
            grayscale_mode: Some(true),
            theme: Some(Theme::DarkGray),
            launch_delay: Some(zenith_core::LaunchDelay::new(10).unwrap()),
            ..Default::default()
        })
        .unwrap();
    for i in 0..20 {
        store.append_launch(launch(i)).unwrap();
    }
    let mut gated = launch(99);
    gated.intention = Some("reply to Sam".into());
    store.append_launch(gated).unwrap();
    store.append_session(finished(1_000, true)).unwrap();
    store.append_session(finished(2_000, false)).unwrap();
    store.set_category("12", AppCategory::Distracting).unwrap();
    store.set_category("1", AppCategory::Essential).unwrap();

    let settings = store.settings().clone();
    let launches = store.launches().to_vec();
    let sessions = store.sessions().to_vec();
    let categories = store.categories().clone();

    let exported = store.export_all(1_700_000_000_000).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert!(doc["exportDate"].as_str().unwrap().starts_with("2023-11-14T"));
    assert!(exported.contains('\n'));

    store.clear_all().unwrap();
    assert!(store.launches().is_empty());
    assert_eq!(store.category("12"), AppCategory::Productive);

    assert!(store.import_all(&exported));
    assert_eq!(store.settings(), &settings);
    assert_eq!(store.launches(), launches.as_slice());
    assert_eq!(store.sessions(), sessions.as_slice());
    assert_eq!(store.categories(), &categories);

    // The imported records reached the backend too.
    let reopened = LogStore::open(store.backend().clone());
    assert_eq!(reopened.sessions(), sessions.as_slice());
}

#[test]
fn import_of_loose_data_degrades_per_record() {
    let mut store = LogStore::open(MemoryKv::new());
    let ok = store.import_all(
        r#"{
            "settings": {"launchDelay": 42, "theme": "dark-gray"},
            "launches": "not a list",
            "categories": {"12": "Distracting", "13": "Mystery"}
        }"#,
    );
    assert!(ok);
    assert_eq!(store.settings().launch_delay.seconds(), 5);
    assert_eq!(store.settings().theme, Theme::DarkGray);
    assert!(store.launches().is_empty());
    assert_eq!(store.category("12"), AppCategory::Distracting);
    assert_eq!(store.category("13"), AppCategory::Productive);
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("zenith.db");
    {
        let mut store = LogStore::open(SqliteKv::open_at(&path).unwrap());
        store.append_launch(launch(7)).unwrap();
        store.append_session(finished(3_000, true)).unwrap();
        store.set_category("3", AppCategory::Essential).unwrap();
    }
    let store = LogStore::open(SqliteKv::open_at(&path).unwrap());
    assert_eq!(store.launches().len(), 1);
    assert_eq!(store.sessions()[0].start_time, 3_000);
    assert_eq!(store.category("3"), AppCategory::Essential);
}

#[test]
fn import_keeps_valid_entries_next_to_malformed_ones() {
    let mut store = LogStore::open(MemoryKv::new());
    let ok = store.import_all(
        r#"{
            "launches": [
                {"appId": "1", "appName": "Messages", "timestamp": 1000},
                {"appId": "2", "appName": "Calendar"},
                {"appId": "3", "appName": "Camera", "timestamp": 2000, "intention": "photo"}
            ],
            "sessions": [
                {"id": "s1", "duration": 25, "startTime": 10, "endTime": 20, "completed": true},
                {"id": "s2", "duration": "long"}
            ]
        }"#,
    );
    assert!(ok);
    let ids: Vec<&str> = store.launches().iter().map(|l| l.app_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(store.sessions().len(), 1);

    // A later append must not erase the imported history.
    store.append_launch(launch(3_000)).unwrap();
    let reopened = LogStore::open(store.backend().clone());
    assert_eq!(reopened.launches().len(), 3);
    assert_eq!(reopened.launches()[0].app_name, "Messages");
}

#[test]
fn stored_list_with_one_bad_entry_keeps_the_rest() {
    let mut kv = MemoryKv::new();
    kv.set(
        APP_LAUNCHES_KEY,
        r#"[{"appId": "7", "appName": "Maps", "timestamp": 5}, {"oops": true}]"#,
    )
    .unwrap();
    let store = LogStore::open(kv);
    assert_eq!(store.launches().len(), 1);
    assert_eq!(store.launches()[0].app_name, "Maps");
}

#[test]
fn import_skips_fields_of_the_wrong_shape() {
    let mut store = LogStore::open(MemoryKv::new());
    store
        .set_settings(&SettingsPatch {
            grayscale_mode: Some(true),
            ..Default::default()
        })
        .unwrap();
    store.append_launch(launch(1)).unwrap();
    store.set_category("12", AppCategory::Distracting).unwrap();

    assert!(store.import_all(
        r#"{"settings": false, "launches": 0, "sessions": "", "categories": []}"#
    ));
    assert!(store.settings().grayscale_mode);
    assert_eq!(store.launches().len(), 1);
    assert_eq!(store.category("12"), AppCategory::Distracting);

    let reopened = LogStore::open(store.backend().clone());
    assert!(reopened.settings().grayscale_mode);
}

/// Memory backend that refuses writes to one key.
#[derive(Clone, Default)]
struct FailingKv {
    inner: MemoryKv,
    fail_key: &'static str,
}

impl KvBackend for FailingKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.fail_key {
            return Err(StorageError::QueryFailed(format!("write to {key} refused")));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[test]
fn failed_import_write_rolls_back_earlier_fields() {
    let mut seeded = LogStore::open(MemoryKv::new());
    seeded.append_launch(launch(1)).unwrap();
    let backend = FailingKv {
        inner: seeded.backend().clone(),
        fail_key: FOCUS_SESSIONS_KEY,
    };
    let mut store = LogStore::open(backend);

    let ok = store.import_all(
        r#"{
            "settings": {"intentionalMode": true},
            "launches": [{"appId": "9", "appName": "Email", "timestamp": 50}],
            "sessions": []
        }"#,
    );
    assert!(!ok);
    assert!(!store.settings().intentional_mode);
    assert_eq!(store.launches(), &[launch(1)]);

    let reopened = LogStore::open(store.backend().clone());
    assert!(!reopened.settings().intentional_mode);
    assert_eq!(reopened.launches(), &[launch(1)]);
}
