//! Exit challenge: the typed confirmation needed to abandon a running session.
//!
//! The user must type the confirmation word three times in a row. A wrong
//! answer at any step sends the challenge back to step one; it never touches
//! the timer itself.

use serde::{Deserialize, Serialize};

pub const CONFIRMATION_WORD: &str = "yes";

/// Consecutive confirmations required.
pub const REQUIRED_CONFIRMATIONS: u8 = 3;

/// Result of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// Correct answer, now waiting at this step.
    Advanced(u8),
    /// Final correct answer.
    Confirmed,
    /// Wrong answer, back to step one.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitChallenge {
    step: u8,
}

impl Default for ExitChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitChallenge {
    pub fn new() -> Self {
        Self { step: 1 }
    }

    /// Current step, 1-based.
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn prompt(&self) -> String {
        format!(
            "Type '{CONFIRMATION_WORD}' to confirm ({}/{REQUIRED_CONFIRMATIONS})",
            self.step
        )
    }

    pub fn submit(&mut self, input: &str) -> ChallengeOutcome {
        if !is_confirmation(input) {
            self.step = 1;
            return ChallengeOutcome::Reset;
        }
        if self.step >= REQUIRED_CONFIRMATIONS {
            return ChallengeOutcome::Confirmed;
        }
        self.step += 1;
        ChallengeOutcome::Advanced(self.step)
    }
}

fn is_confirmation(input: &str) -> bool {
    input.trim().to_lowercase() == CONFIRMATION_WORD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_confirmations_in_a_row() {
        let mut challenge = ExitChallenge::new();
        assert_eq!(challenge.submit("yes"), ChallengeOutcome::Advanced(2));
        assert_eq!(challenge.submit("  YES "), ChallengeOutcome::Advanced(3));
        assert_eq!(challenge.submit("Yes"), ChallengeOutcome::Confirmed);
    }

    #[test]
    fn wrong_answer_resets_to_step_one() {
        let mut challenge = ExitChallenge::new();
        challenge.submit("yes");
        challenge.submit("yes");
        assert_eq!(challenge.step(), 3);
        assert_eq!(challenge.submit("no"), ChallengeOutcome::Reset);
        assert_eq!(challenge.step(), 1);
    }

    #[test]
    fn partial_words_are_not_accepted() {
        let mut challenge = ExitChallenge::new();
        assert_eq!(challenge.submit("y"), ChallengeOutcome::Reset);
        assert_eq!(challenge.submit("yess"), ChallengeOutcome::Reset);
        assert_eq!(challenge.submit(""), ChallengeOutcome::Reset);
    }

    #[test]
    fn prompt_shows_progress() {
        let mut challenge = ExitChallenge::new();
        challenge.submit("yes");
        assert_eq!(challenge.prompt(), "Type 'yes' to confirm (2/3)");
    }
}
