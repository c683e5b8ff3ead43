//! The launcher: owns the store and drives both state machines.
//!
//! `FocusTimer` and `IntentionGate` never touch storage. Every command here
//! forwards to the right machine and then applies the event it returned:
//! finalized sessions and launches are appended to the log, completion
//! fires a notification. Persistence failures are logged by the store and
//! do not interrupt the flow; the in-memory log stays authoritative.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::events::Event;
use crate::focus::{DurationChoice, FocusState, FocusTimer};
use crate::gate::{requires_gate, GateRejection, IntentionGate};
use crate::model::{AppItem, AppLaunchLog};
use crate::notify::{Notification, NotificationPermission, Notifier};
use crate::stats::{InsightLadder, Summary};
use crate::storage::{KvBackend, LogStore};

/// Screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Home,
    AppDrawer,
    FocusMode,
    Stats,
    Settings,
}

/// Result of tapping an app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchDecision {
    /// Opened immediately; the record is already in the log.
    Launched(AppLaunchLog),
    /// Held behind the intention gate for `delay_secs`.
    Gated { delay_secs: u32 },
    /// Another launch is already waiting at the gate.
    GateBusy,
}

pub struct Launcher<B: KvBackend, N: Notifier> {
    store: LogStore<B>,
    notifier: N,
    timer: FocusTimer,
    gate: IntentionGate,
    apps: Vec<AppItem>,
    screen: Screen,
    notifications_enabled: bool,
}

impl<B: KvBackend, N: Notifier> Launcher<B, N> {
    pub fn new(store: LogStore<B>, notifier: N) -> Self {
        Self {
            store,
            notifier,
            timer: FocusTimer::default(),
            gate: IntentionGate::new(),
            apps: catalog::builtin_apps(),
            screen: Screen::Home,
            notifications_enabled: true,
        }
    }

    pub fn with_default_duration(mut self, duration: DurationChoice) -> Self {
        self.timer = FocusTimer::new(duration);
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &LogStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LogStore<B> {
        &mut self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn gate(&self) -> &IntentionGate {
        &self.gate
    }

    pub fn apps(&self) -> &[AppItem] {
        &self.apps
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Switch screens. The focus screen can only be left through
    /// `request_exit` or the exit challenge while a session is open.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        if self.is_focusing() && screen != Screen::FocusMode {
            tracing::debug!(?screen, "navigation blocked while focusing");
            return false;
        }
        tracing::debug!(?screen, "navigate");
        self.screen = screen;
        true
    }

    /// Apps visible in the drawer for `query`.
    pub fn drawer(&self, query: &str) -> Vec<&AppItem> {
        catalog::visible_apps(
            &self.apps,
            self.store.settings(),
            self.store.categories(),
            query,
        )
    }

    /// Stats over the last `days` days (all history when `None`).
    pub fn summary<Tz: TimeZone>(
        &self,
        days: Option<u32>,
        now_ms: i64,
        today: NaiveDate,
        tz: &Tz,
    ) -> Summary {
        Summary::build(
            &self.store.read_sessions(days, now_ms),
            &self.store.read_launches(days, now_ms),
            today,
            tz,
            &InsightLadder::default(),
        )
    }

    // ── Focus ────────────────────────────────────────────────────────

    pub fn select_duration(&mut self, duration: DurationChoice) -> Option<Event> {
        self.timer.select_duration(duration)
    }

    /// Start (or resume) focusing. Asks for notification permission the
    /// first time.
    pub fn start_focus(&mut self, now_ms: i64) -> Option<Event> {
        if self.notifications_enabled
            && self.notifier.permission() == NotificationPermission::Default
        {
            let granted = self.notifier.request_permission();
            tracing::debug!(?granted, "notification permission requested");
        }
        self.navigate(Screen::FocusMode);
        self.timer.start(now_ms)
    }

    pub fn toggle_pause(&mut self) -> Option<Event> {
        self.timer.toggle_pause()
    }

    /// One second for whichever machine is active; the gate wins while open.
    pub fn tick(&mut self, now_ms: i64) -> Option<Event> {
        if self.gate.is_active() {
            return self.tick_gate();
        }
        let event = self.timer.tick(now_ms);
        self.apply(event)
    }

    pub fn request_exit(&mut self) -> Option<Event> {
        let event = self.timer.request_exit();
        if event == Some(Event::FocusLeft) {
            self.navigate(Screen::Home);
        }
        event
    }

    pub fn submit_exit_challenge(&mut self, input: &str, now_ms: i64) -> Option<Event> {
        let event = self.timer.submit_exit_challenge(input, now_ms);
        if matches!(event, Some(Event::SessionAbandoned { .. })) {
            self.navigate(Screen::Home);
        }
        self.apply(event)
    }

    pub fn cancel_exit_challenge(&mut self) -> Option<Event> {
        self.timer.cancel_exit_challenge()
    }

    pub fn reset_timer(&mut self, now_ms: i64) -> Option<Event> {
        let event = self.timer.reset(now_ms);
        self.apply(event)
    }

    // ── Apps ─────────────────────────────────────────────────────────

    /// Tap an app: gated apps open the intention prompt, others launch now.
    pub fn launch_app(&mut self, app: &AppItem, now_ms: i64) -> LaunchDecision {
        let settings = self.store.settings().clone();
        let category = self.store.category(&app.id);
        if !requires_gate(&settings, category) {
            let log = AppLaunchLog::new(app, now_ms, None);
            self.apply(Some(Event::AppLaunched { log: log.clone() }));
            return LaunchDecision::Launched(log);
        }

        let delay_secs = settings.launch_delay.seconds();
        if !self.gate.open(app.clone(), delay_secs) {
            return LaunchDecision::GateBusy;
        }
        tracing::debug!(app = %app.name, delay_secs, "intention gate opened");
        LaunchDecision::Gated { delay_secs }
    }

    pub fn tick_gate(&mut self) -> Option<Event> {
        if !self.gate.tick() {
            return None;
        }
        let app_id = self.gate.pending_app()?.id.clone();
        Some(Event::GateConfirmable { app_id })
    }

    /// Submit the intention. Rejected submissions change nothing.
    pub fn confirm_launch(
        &mut self,
        intention: &str,
        now_ms: i64,
    ) -> Result<AppLaunchLog, GateRejection> {
        let log = self.gate.confirm(intention, now_ms)?;
        self.apply(Some(Event::AppLaunched { log: log.clone() }));
        self.gate.close();
        Ok(log)
    }

    pub fn cancel_launch(&mut self) -> Option<Event> {
        let app = self.gate.cancel()?;
        self.gate.close();
        Some(Event::GateCancelled { app_id: app.id })
    }

    // ── Effects ──────────────────────────────────────────────────────

    fn apply(&mut self, event: Option<Event>) -> Option<Event> {
        match &event {
            Some(Event::FocusCompleted { session }) => {
                let _ = self.store.append_session(session.clone());
                self.notify_completion();
            }
            Some(Event::SessionAbandoned { session }) => {
                let _ = self.store.append_session(session.clone());
            }
            Some(Event::AppLaunched { log }) => {
                let _ = self.store.append_launch(log.clone());
            }
            _ => {}
        }
        event
    }

    fn notify_completion(&mut self) {
        if !self.notifications_enabled
            || self.notifier.permission() != NotificationPermission::Granted
        {
            return;
        }
        if let Err(e) = self.notifier.notify(&Notification::session_complete()) {
            tracing::warn!(error = %e, "completion notification failed");
        }
    }

    /// Whether the focus timer is mid-session.
    pub fn is_focusing(&self) -> bool {
        matches!(
            self.timer.state(),
            FocusState::Running | FocusState::ExitChallenge
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppCategory;
    use crate::notify::RecordingNotifier;
    use crate::storage::MemoryKv;

    fn launcher() -> Launcher<MemoryKv, RecordingNotifier> {
        Launcher::new(LogStore::open(MemoryKv::new()), RecordingNotifier::default())
    }

    #[test]
    fn direct_launch_logs_without_intention() {
        let mut l = launcher();
        let maps = catalog::find_by_name(l.apps(), "Maps").unwrap().clone();
        let decision = l.launch_app(&maps, 100);
        match decision {
            LaunchDecision::Launched(log) => assert!(log.intention.is_none()),
            other => panic!("expected launch, got {other:?}"),
        }
        assert_eq!(l.store().launches().len(), 1);
    }

    #[test]
    fn first_start_requests_permission() {
        let mut l = launcher();
        l.start_focus(0);
        assert_eq!(l.notifier().permission_requests, 1);
        assert_eq!(l.screen(), Screen::FocusMode);
        l.toggle_pause();
        l.start_focus(1000);
        assert_eq!(l.notifier().permission_requests, 1);
    }

    #[test]
    fn gate_tick_takes_priority() {
        let mut l = launcher();
        l.store_mut()
            .set_category("12", AppCategory::Distracting)
            .unwrap();
        l.start_focus(0);
        let twitter = catalog::find_by_id(l.apps(), "12").unwrap().clone();
        assert_eq!(
            l.launch_app(&twitter, 0),
            LaunchDecision::Gated { delay_secs: 5 }
        );
        let before = l.timer().remaining_secs();
        l.tick(1000);
        assert_eq!(l.timer().remaining_secs(), before);
        assert_eq!(l.gate().seconds_remaining(), 4);
        assert_eq!(l.launch_app(&twitter, 0), LaunchDecision::GateBusy);
        assert_eq!(
            l.cancel_launch(),
            Some(Event::GateCancelled {
                app_id: "12".into()
            })
        );
        assert!(l.store().launches().is_empty());
    }

    #[test]
    fn notifier_failure_does_not_interrupt_completion() {
        let mut l = Launcher::new(
            LogStore::open(MemoryKv::new()),
            RecordingNotifier {
                fail_with: Some("offline".into()),
                ..RecordingNotifier::granted()
            },
        );
        l.select_duration(DurationChoice::custom(1).unwrap());
        l.start_focus(0);
        let mut completed = false;
        for i in 1..=60 {
            if let Some(Event::FocusCompleted { .. }) = l.tick(i * 1000) {
                completed = true;
            }
        }
        assert!(completed);
        assert_eq!(l.store().sessions().len(), 1);
        assert!(l.notifier().delivered.is_empty());
    }

    #[test]
    fn disabled_notifications_skip_permission_and_delivery() {
        let mut l = launcher().with_notifications(false);
        l.start_focus(0);
        assert_eq!(l.notifier().permission_requests, 0);
    }

    #[test]
    fn reset_while_running_records_abandoned_session() {
        let mut l = Launcher::new(LogStore::open(MemoryKv::new()), crate::notify::NoopNotifier);
        l.start_focus(1_000);
        assert!(l.is_focusing());
        l.reset_timer(61_000);

        assert!(!l.is_focusing());
        let last = l.timer().last_session().cloned();
        assert_eq!(l.store().sessions(), last.as_slice());
        assert!(!l.store().sessions()[0].completed);
        assert_eq!(l.store().sessions()[0].end_time, Some(61_000));
    }

    #[test]
    fn focus_screen_is_left_only_through_exit() {
        let mut l = launcher();
        assert!(l.navigate(Screen::AppDrawer));
        l.start_focus(0);
        assert!(!l.navigate(Screen::Stats));
        assert_eq!(l.screen(), Screen::FocusMode);

        l.request_exit();
        for _ in 0..3 {
            l.submit_exit_challenge("yes", 5_000);
        }
        assert_eq!(l.screen(), Screen::Home);
        assert!(l.navigate(Screen::Settings));
    }
}
