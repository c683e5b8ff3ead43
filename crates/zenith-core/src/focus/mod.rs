mod challenge;
mod duration;
mod timer;

pub use challenge::{ChallengeOutcome, ExitChallenge, CONFIRMATION_WORD, REQUIRED_CONFIRMATIONS};
pub use duration::{DurationChoice, DEFAULT_MINUTES, MAX_CUSTOM_DIGITS, PRESET_MINUTES};
pub use timer::{format_clock, FocusState, FocusTimer};
