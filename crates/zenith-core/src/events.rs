use serde::{Deserialize, Serialize};

use crate::focus::FocusState;
use crate::model::{AppLaunchLog, FocusSession};

/// Every state change in the focus timer and intention gate produces an Event.
/// The launcher applies terminal events (writes records, notifies); the CLI
/// prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    DurationSelected {
        minutes: u32,
    },
    FocusStarted {
        session_id: String,
        duration_min: u32,
        at_ms: i64,
    },
    FocusPaused {
        remaining_secs: u32,
    },
    FocusResumed {
        remaining_secs: u32,
    },
    /// The countdown reached zero; carries the finalized session.
    FocusCompleted {
        session: FocusSession,
    },
    ExitChallengeStarted {
        step: u8,
    },
    ExitChallengeAdvanced {
        step: u8,
    },
    /// A wrong answer sent the challenge back to step one.
    ExitChallengeReset,
    ExitChallengeCancelled {
        remaining_secs: u32,
    },
    /// Confirmed exit; carries the finalized (incomplete) session.
    SessionAbandoned {
        session: FocusSession,
    },
    /// Left the focus screen without a running timer.
    FocusLeft,
    TimerReset,
    GateConfirmable {
        app_id: String,
    },
    GateCancelled {
        app_id: String,
    },
    AppLaunched {
        log: AppLaunchLog,
    },
    StateSnapshot {
        state: FocusState,
        remaining_secs: u32,
        display: String,
        paused: bool,
        challenge_step: Option<u8>,
    },
}
