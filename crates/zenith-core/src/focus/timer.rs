//! Focus timer state machine.
//!
//! The timer counts whole seconds. It does not use internal threads or read
//! the clock: the caller invokes `tick()` once per elapsed second and passes
//! the current epoch-ms timestamp to commands that stamp a session.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Completed -> Idle
//!           |  ^
//!           v  |
//!       ExitChallenge -> Idle   (third confirmation)
//! ```
//!
//! Pausing is a flag on `Running`, not a separate state. Ticks are ignored
//! while paused and while the exit challenge is showing.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::default();
//! timer.start(now_ms);
//! // Once per second:
//! if let Some(Event::FocusCompleted { session }) = timer.tick(now_ms) { ... }
//! ```

use serde::{Deserialize, Serialize};

use super::challenge::{ChallengeOutcome, ExitChallenge};
use super::duration::DurationChoice;
use crate::events::Event;
use crate::model::FocusSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusState {
    Idle,
    Running,
    ExitChallenge,
    Completed,
}

/// Core focus timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    duration: DurationChoice,
    state: FocusState,
    remaining_secs: u32,
    #[serde(default)]
    paused: bool,
    /// The unfinalized session while Running or in the exit challenge.
    #[serde(default)]
    open_session: Option<FocusSession>,
    #[serde(default)]
    challenge: Option<ExitChallenge>,
    /// Last finalized session, kept for the completion screen.
    #[serde(default)]
    last_session: Option<FocusSession>,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(DurationChoice::default())
    }
}

impl FocusTimer {
    /// Create an idle timer with the given duration selected.
    pub fn new(duration: DurationChoice) -> Self {
        Self {
            duration,
            state: FocusState::Idle,
            remaining_secs: duration.minutes().saturating_mul(60),
            paused: false,
            open_session: None,
            challenge: None,
            last_session: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn duration(&self) -> DurationChoice {
        self.duration
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the countdown advances on the next tick.
    pub fn is_ticking(&self) -> bool {
        self.state == FocusState::Running && !self.paused
    }

    pub fn open_session(&self) -> Option<&FocusSession> {
        self.open_session.as_ref()
    }

    pub fn last_session(&self) -> Option<&FocusSession> {
        self.last_session.as_ref()
    }

    pub fn challenge_step(&self) -> Option<u8> {
        self.challenge.as_ref().map(ExitChallenge::step)
    }

    pub fn challenge(&self) -> Option<&ExitChallenge> {
        self.challenge.as_ref()
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_secs: self.remaining_secs,
            display: self.display(),
            paused: self.paused,
            challenge_step: self.challenge_step(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Change the selected duration. Only allowed while idle.
    pub fn select_duration(&mut self, duration: DurationChoice) -> Option<Event> {
        if self.state != FocusState::Idle {
            tracing::debug!(state = ?self.state, "duration change ignored");
            return None;
        }
        self.duration = duration;
        self.remaining_secs = duration.minutes().saturating_mul(60);
        Some(Event::DurationSelected {
            minutes: duration.minutes(),
        })
    }

    /// Start a new session, or resume the open one if paused.
    pub fn start(&mut self, now_ms: i64) -> Option<Event> {
        match self.state {
            FocusState::Idle => {
                if !self.duration.is_startable() {
                    return None;
                }
                let minutes = self.duration.minutes();
                let session = FocusSession::open(minutes, now_ms);
                let session_id = session.id.clone();
                self.open_session = Some(session);
                self.last_session = None;
                self.remaining_secs = minutes.saturating_mul(60);
                self.paused = false;
                self.state = FocusState::Running;
                tracing::debug!(%session_id, minutes, "focus session started");
                Some(Event::FocusStarted {
                    session_id,
                    duration_min: minutes,
                    at_ms: now_ms,
                })
            }
            FocusState::Running if self.paused => self.resume(),
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != FocusState::Running || self.paused {
            return None;
        }
        self.paused = true;
        Some(Event::FocusPaused {
            remaining_secs: self.remaining_secs,
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != FocusState::Running || !self.paused {
            return None;
        }
        self.paused = false;
        Some(Event::FocusResumed {
            remaining_secs: self.remaining_secs,
        })
    }

    pub fn toggle_pause(&mut self) -> Option<Event> {
        if self.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Advance by one second. Returns `Some(Event::FocusCompleted)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self, now_ms: i64) -> Option<Event> {
        if !self.is_ticking() {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        let session = self.open_session.take()?.finalize(true, now_ms)?;
        self.state = FocusState::Completed;
        self.last_session = Some(session.clone());
        tracing::debug!(session_id = %session.id, "focus session completed");
        Some(Event::FocusCompleted { session })
    }

    /// Try to leave the focus screen.
    ///
    /// A running session must be confirmed through the exit challenge;
    /// otherwise the exit is immediate.
    pub fn request_exit(&mut self) -> Option<Event> {
        match self.state {
            FocusState::Running => {
                let challenge = ExitChallenge::new();
                let step = challenge.step();
                self.challenge = Some(challenge);
                self.state = FocusState::ExitChallenge;
                Some(Event::ExitChallengeStarted { step })
            }
            FocusState::ExitChallenge => None,
            FocusState::Idle | FocusState::Completed => Some(Event::FocusLeft),
        }
    }

    pub fn submit_exit_challenge(&mut self, input: &str, now_ms: i64) -> Option<Event> {
        if self.state != FocusState::ExitChallenge {
            return None;
        }
        let challenge = self.challenge.as_mut()?;
        match challenge.submit(input) {
            ChallengeOutcome::Advanced(step) => Some(Event::ExitChallengeAdvanced { step }),
            ChallengeOutcome::Reset => Some(Event::ExitChallengeReset),
            ChallengeOutcome::Confirmed => self.abandon(now_ms),
        }
    }

    /// Dismiss the exit challenge and keep focusing.
    pub fn cancel_exit_challenge(&mut self) -> Option<Event> {
        if self.state != FocusState::ExitChallenge {
            return None;
        }
        self.challenge = None;
        self.state = FocusState::Running;
        Some(Event::ExitChallengeCancelled {
            remaining_secs: self.remaining_secs,
        })
    }

    /// Return to idle. A still-open session is recorded as abandoned.
    pub fn reset(&mut self, now_ms: i64) -> Option<Event> {
        match self.state {
            FocusState::Running | FocusState::ExitChallenge => self.abandon(now_ms),
            FocusState::Completed | FocusState::Idle => {
                self.go_idle();
                Some(Event::TimerReset)
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn abandon(&mut self, now_ms: i64) -> Option<Event> {
        let session = self
            .open_session
            .take()
            .and_then(|s| s.finalize(false, now_ms));
        self.go_idle();
        let session = session?;
        self.last_session = Some(session.clone());
        tracing::debug!(session_id = %session.id, "focus session abandoned");
        Some(Event::SessionAbandoned { session })
    }

    fn go_idle(&mut self) {
        self.state = FocusState::Idle;
        self.paused = false;
        self.challenge = None;
        self.open_session = None;
        self.remaining_secs = self.duration.minutes().saturating_mul(60);
    }
}

/// Format seconds as zero-padded `MM:SS`; minutes may exceed two digits.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;

    fn running(minutes: u32) -> FocusTimer {
        let mut timer = FocusTimer::new(DurationChoice::from_minutes(minutes).unwrap());
        assert!(timer.start(T0).is_some());
        timer
    }

    #[test]
    fn start_pause_resume() {
        let mut timer = running(25);
        assert_eq!(timer.state(), FocusState::Running);
        assert_eq!(timer.remaining_secs(), 1500);

        assert!(timer.pause().is_some());
        assert!(timer.is_paused());
        assert!(timer.tick(T0 + 1000).is_none());
        assert_eq!(timer.remaining_secs(), 1500);

        let id = timer.open_session().unwrap().id.clone();
        assert!(matches!(timer.start(T0 + 2000), Some(Event::FocusResumed { .. })));
        assert_eq!(timer.open_session().unwrap().id, id);
        timer.tick(T0 + 3000);
        assert_eq!(timer.remaining_secs(), 1499);
    }

    #[test]
    fn zero_duration_does_not_start() {
        let mut timer = FocusTimer::new(DurationChoice::parse_custom("").unwrap());
        assert!(timer.start(T0).is_none());
        assert_eq!(timer.state(), FocusState::Idle);
        assert!(timer.open_session().is_none());
    }

    #[test]
    fn duration_locked_while_running() {
        let mut timer = running(25);
        assert!(timer.select_duration(DurationChoice::Preset(5)).is_none());
        assert_eq!(timer.duration().minutes(), 25);
        assert_eq!(timer.remaining_secs(), 1500);
    }

    #[test]
    fn select_duration_updates_idle_display() {
        let mut timer = FocusTimer::default();
        timer.select_duration(DurationChoice::Preset(90));
        assert_eq!(timer.display(), "90:00");
    }

    #[test]
    fn countdown_completes_after_duration() {
        let mut timer = running(1);
        for i in 1..60 {
            assert!(timer.tick(T0 + i * 1000).is_none());
        }
        match timer.tick(T0 + 60_000) {
            Some(Event::FocusCompleted { session }) => {
                assert!(session.completed);
                assert_eq!(session.duration, 1);
                assert_eq!(session.end_time, Some(T0 + 60_000));
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(timer.state(), FocusState::Completed);
        assert!(timer.tick(T0 + 61_000).is_none());
    }

    #[test]
    fn exit_from_idle_is_immediate() {
        let mut timer = FocusTimer::default();
        assert_eq!(timer.request_exit(), Some(Event::FocusLeft));
        assert_eq!(timer.state(), FocusState::Idle);
    }

    #[test]
    fn challenge_suspends_ticks_and_cancel_resumes() {
        let mut timer = running(25);
        timer.tick(T0 + 1000);
        timer.request_exit();
        assert_eq!(timer.state(), FocusState::ExitChallenge);
        assert_eq!(timer.challenge_step(), Some(1));
        timer.tick(T0 + 2000);
        assert_eq!(timer.remaining_secs(), 1499);

        assert!(timer.cancel_exit_challenge().is_some());
        assert_eq!(timer.state(), FocusState::Running);
        assert!(timer.open_session().is_some());
        timer.tick(T0 + 3000);
        assert_eq!(timer.remaining_secs(), 1498);
    }

    #[test]
    fn third_confirmation_abandons_session() {
        let mut timer = running(25);
        timer.request_exit();
        timer.submit_exit_challenge("yes", T0 + 1000);
        timer.submit_exit_challenge("yes", T0 + 2000);
        match timer.submit_exit_challenge("yes", T0 + 3000) {
            Some(Event::SessionAbandoned { session }) => {
                assert!(!session.completed);
                assert_eq!(session.end_time, Some(T0 + 3000));
            }
            other => panic!("expected abandonment, got {other:?}"),
        }
        assert_eq!(timer.state(), FocusState::Idle);
        assert!(timer.open_session().is_none());
        assert_eq!(timer.remaining_secs(), 1500);
    }

    #[test]
    fn reset_while_running_records_abandonment() {
        let mut timer = running(5);
        assert!(matches!(
            timer.reset(T0 + 5000),
            Some(Event::SessionAbandoned { .. })
        ));
        assert_eq!(timer.reset(T0 + 6000), Some(Event::TimerReset));
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(999 * 60), "999:00");
    }

    #[test]
    fn snapshot_reflects_state() {
        let timer = running(15);
        match timer.snapshot() {
            Event::StateSnapshot {
                state,
                remaining_secs,
                display,
                ..
            } => {
                assert_eq!(state, FocusState::Running);
                assert_eq!(remaining_secs, 900);
                assert_eq!(display, "15:00");
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
