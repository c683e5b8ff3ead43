//! Intention Gate - timed friction before opening a distracting app
//!
//! When the intention prompt is enabled and the user taps an app categorized
//! as `Distracting`, the launch is held behind a countdown seeded from the
//! configured launch delay. Only after the countdown reaches zero can the user
//! submit their intention and continue.
//!
//! ## States
//!
//! - **Closed**: no prompt showing
//! - **Prompting**: countdown running, submission rejected
//! - **Confirmable**: countdown elapsed, submission accepted
//! - **Launched** / **Cancelled**: terminal, the gate can be reopened

use serde::{Deserialize, Serialize};

use crate::model::{AppCategory, AppItem, AppLaunchLog, UserSettings};

/// Whether launching an app of `category` must pass through the gate.
pub fn requires_gate(settings: &UserSettings, category: AppCategory) -> bool {
    settings.show_intention_prompt && category == AppCategory::Distracting
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GateState {
    Closed,
    Prompting { app: AppItem, seconds_remaining: u32 },
    Confirmable { app: AppItem },
    Launched { app: AppItem },
    Cancelled { app: AppItem },
}

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    /// Countdown still running.
    #[error("Wait {seconds_remaining}s")]
    NotYetConfirmable { seconds_remaining: u32 },
    /// No prompt is showing.
    #[error("No launch is pending")]
    NotOpen,
}

/// Intention gate for a single pending launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentionGate {
    state: GateState,
}

impl Default for IntentionGate {
    fn default() -> Self {
        Self {
            state: GateState::Closed,
        }
    }
}

impl IntentionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// App currently held by the gate, if the prompt is showing.
    pub fn pending_app(&self) -> Option<&AppItem> {
        match &self.state {
            GateState::Prompting { app, .. } | GateState::Confirmable { app } => Some(app),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.pending_app().is_some()
    }

    pub fn can_confirm(&self) -> bool {
        matches!(self.state, GateState::Confirmable { .. })
    }

    pub fn seconds_remaining(&self) -> u32 {
        match &self.state {
            GateState::Prompting {
                seconds_remaining, ..
            } => *seconds_remaining,
            _ => 0,
        }
    }

    /// Show the prompt for `app`. Ignored while another launch is pending.
    ///
    /// A zero delay makes the prompt confirmable immediately.
    pub fn open(&mut self, app: AppItem, delay_secs: u32) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = if delay_secs == 0 {
            GateState::Confirmable { app }
        } else {
            GateState::Prompting {
                app,
                seconds_remaining: delay_secs,
            }
        };
        true
    }

    /// Advance the countdown by one second. Returns true on the tick that
    /// makes the gate confirmable.
    pub fn tick(&mut self) -> bool {
        let GateState::Prompting {
            app,
            seconds_remaining,
        } = &mut self.state
        else {
            return false;
        };
        *seconds_remaining = seconds_remaining.saturating_sub(1);
        if *seconds_remaining > 0 {
            return false;
        }
        let app = app.clone();
        self.state = GateState::Confirmable { app };
        true
    }

    /// Submit the stated intention and produce the launch record.
    pub fn confirm(&mut self, intention: &str, now_ms: i64) -> Result<AppLaunchLog, GateRejection> {
        match &self.state {
            GateState::Confirmable { app } => {
                let app = app.clone();
                let log = AppLaunchLog::new(&app, now_ms, Some(intention.trim().to_string()));
                self.state = GateState::Launched { app };
                Ok(log)
            }
            GateState::Prompting {
                seconds_remaining, ..
            } => Err(GateRejection::NotYetConfirmable {
                seconds_remaining: *seconds_remaining,
            }),
            _ => Err(GateRejection::NotOpen),
        }
    }

    /// Abandon the pending launch. Returns the app that was held.
    pub fn cancel(&mut self) -> Option<AppItem> {
        let app = self.pending_app()?.clone();
        self.state = GateState::Cancelled { app: app.clone() };
        Some(app)
    }

    /// Return to `Closed` after a terminal state.
    pub fn close(&mut self) {
        self.state = GateState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppKind;

    fn twitter() -> AppItem {
        AppItem::new("12", "Twitter", AppKind::Social)
    }

    #[test]
    fn requires_gate_only_for_distracting_with_prompt() {
        let mut settings = UserSettings::default();
        assert!(requires_gate(&settings, AppCategory::Distracting));
        assert!(!requires_gate(&settings, AppCategory::Productive));
        assert!(!requires_gate(&settings, AppCategory::Essential));
        settings.show_intention_prompt = false;
        assert!(!requires_gate(&settings, AppCategory::Distracting));
    }

    #[test]
    fn confirm_rejected_until_countdown_elapses() {
        let mut gate = IntentionGate::new();
        assert!(gate.open(twitter(), 3));
        assert_eq!(
            gate.confirm("check DMs", 0),
            Err(GateRejection::NotYetConfirmable {
                seconds_remaining: 3
            })
        );
        assert!(!gate.tick());
        assert!(!gate.tick());
        assert_eq!(gate.seconds_remaining(), 1);
        assert!(gate.tick());
        assert!(gate.can_confirm());

        let log = gate.confirm("  check DMs ", 42).unwrap();
        assert_eq!(log.app_name, "Twitter");
        assert_eq!(log.intention.as_deref(), Some("check DMs"));
        assert_eq!(log.timestamp, 42);
        assert!(matches!(gate.state(), GateState::Launched { .. }));
    }

    #[test]
    fn empty_intention_is_allowed() {
        let mut gate = IntentionGate::new();
        gate.open(twitter(), 0);
        let log = gate.confirm("", 1).unwrap();
        assert_eq!(log.intention.as_deref(), Some(""));
    }

    #[test]
    fn cancel_before_launch() {
        let mut gate = IntentionGate::new();
        gate.open(twitter(), 5);
        gate.tick();
        assert_eq!(gate.cancel().map(|a| a.name), Some("Twitter".to_string()));
        assert!(!gate.is_active());
        assert_eq!(gate.confirm("x", 0), Err(GateRejection::NotOpen));
        assert!(gate.cancel().is_none());
    }

    #[test]
    fn open_ignored_while_pending() {
        let mut gate = IntentionGate::new();
        assert!(gate.open(twitter(), 5));
        assert!(!gate.open(AppItem::new("13", "Instagram", AppKind::Social), 5));
        assert_eq!(gate.pending_app().unwrap().name, "Twitter");
    }

    #[test]
    fn ticks_after_confirmable_are_ignored() {
        let mut gate = IntentionGate::new();
        gate.open(twitter(), 1);
        assert!(gate.tick());
        assert!(!gate.tick());
        assert!(gate.can_confirm());
    }

    #[test]
    fn rejection_is_a_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(GateRejection::NotYetConfirmable { seconds_remaining: 3 });
        assert_eq!(err.to_string(), "Wait 3s");
        assert_eq!(GateRejection::NotOpen.to_string(), "No launch is pending");
    }
}
