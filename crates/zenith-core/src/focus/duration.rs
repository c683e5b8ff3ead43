//! Session length choices: the preset buttons and the custom field.
//!
//! A custom value keeps only its digits and may be at most three long.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Preset durations offered on the focus screen, in minutes.
pub const PRESET_MINUTES: [u32; 6] = [5, 15, 25, 45, 60, 90];

pub const DEFAULT_MINUTES: u32 = 25;

/// Custom durations are typed, at most three digits.
pub const MAX_CUSTOM_DIGITS: usize = 3;

/// The duration picked before a session starts.
///
/// A custom value of zero is representable (an empty input field) but
/// cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "minutes", rename_all = "lowercase")]
pub enum DurationChoice {
    Preset(u32),
    Custom(u32),
}

impl DurationChoice {
    pub fn preset(minutes: u32) -> Result<Self, ValidationError> {
        if PRESET_MINUTES.contains(&minutes) {
            Ok(Self::Preset(minutes))
        } else {
            Err(ValidationError::InvalidDuration(format!(
                "{minutes} is not a preset"
            )))
        }
    }

    pub fn custom(minutes: u32) -> Result<Self, ValidationError> {
        if minutes > 999 {
            return Err(ValidationError::InvalidDuration(format!(
                "{minutes} has more than {MAX_CUSTOM_DIGITS} digits"
            )));
        }
        Ok(Self::Custom(minutes))
    }

    /// Parse free-form input the way the custom field accepts it:
    /// non-digits are dropped, more than three digits is rejected,
    /// an empty field reads as zero.
    pub fn parse_custom(input: &str) -> Result<Self, ValidationError> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() > MAX_CUSTOM_DIGITS {
            return Err(ValidationError::InvalidDuration(format!(
                "'{input}' has more than {MAX_CUSTOM_DIGITS} digits"
            )));
        }
        let minutes = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<u32>()
                .map_err(|e| ValidationError::InvalidDuration(e.to_string()))?
        };
        Ok(Self::Custom(minutes))
    }

    /// Preset if the value is on the preset list, custom otherwise.
    pub fn from_minutes(minutes: u32) -> Result<Self, ValidationError> {
        Self::preset(minutes).or_else(|_| Self::custom(minutes))
    }

    pub fn minutes(self) -> u32 {
        match self {
            Self::Preset(m) | Self::Custom(m) => m,
        }
    }

    pub fn is_startable(self) -> bool {
        self.minutes() > 0
    }
}

impl Default for DurationChoice {
    fn default() -> Self {
        Self::Preset(DEFAULT_MINUTES)
    }
}
