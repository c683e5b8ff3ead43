//! Record types persisted by the event log.
//!
//! All records serialize with camelCase field names; the same JSON shape is
//! used for storage and for export/import.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// One timed focus interval.
///
/// `end_time` and `completed` are written exactly once, when the session is
/// finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: String,
    /// Minutes.
    pub duration: u32,
    /// Epoch milliseconds.
    pub start_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub completed: bool,
}

impl FocusSession {
    /// Open a new session starting at `start_time` (epoch ms).
    pub fn open(duration: u32, start_time: i64) -> Self {
        Self {
            id: format!("session_{}", uuid::Uuid::new_v4().simple()),
            duration,
            start_time,
            end_time: None,
            completed: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Finalize the session. Returns `None` if it was already finalized.
    ///
    /// `end_time` is clamped so it never precedes `start_time`.
    pub fn finalize(&self, completed: bool, end_time: i64) -> Option<Self> {
        if !self.is_open() {
            return None;
        }
        Some(Self {
            end_time: Some(end_time.max(self.start_time)),
            completed,
            ..self.clone()
        })
    }
}

/// One app launch decision, gated or direct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppLaunchLog {
    pub app_id: String,
    pub app_name: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intention: Option<String>,
}

impl AppLaunchLog {
    pub fn new(app: &AppItem, timestamp: i64, intention: Option<String>) -> Self {
        Self {
            app_id: app.id.clone(),
            app_name: app.name.clone(),
            timestamp,
            intention,
        }
    }
}

/// Background style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    PureBlack,
    DarkGray,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::PureBlack => "pure-black",
            Theme::DarkGray => "dark-gray",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pure-black" => Ok(Theme::PureBlack),
            "dark-gray" => Ok(Theme::DarkGray),
            other => Err(ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("expected pure-black or dark-gray, got '{other}'"),
            }),
        }
    }
}

/// Allowed intention-gate delays, in seconds.
pub const LAUNCH_DELAYS: [u32; 4] = [3, 5, 10, 15];

/// Seconds of friction before a distracting app may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LaunchDelay(u32);

impl LaunchDelay {
    pub fn new(seconds: u32) -> Result<Self, ValidationError> {
        if LAUNCH_DELAYS.contains(&seconds) {
            Ok(Self(seconds))
        } else {
            Err(ValidationError::InvalidLaunchDelay(seconds))
        }
    }

    pub fn seconds(self) -> u32 {
        self.0
    }
}

impl Default for LaunchDelay {
    fn default() -> Self {
        Self(5)
    }
}

// Out-of-range stored values read as the default rather than failing the
// whole settings record.
impl<'de> Deserialize<'de> for LaunchDelay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Ok(LaunchDelay::new(raw).unwrap_or_default())
    }
}

/// Singleton user settings. Missing fields take their defaults on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub grayscale_mode: bool,
    #[serde(default)]
    pub intentional_mode: bool,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub show_intention_prompt: bool,
    #[serde(default)]
    pub launch_delay: LaunchDelay,
}

fn default_true() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            grayscale_mode: false,
            intentional_mode: false,
            theme: Theme::PureBlack,
            show_intention_prompt: true,
            launch_delay: LaunchDelay::default(),
        }
    }
}

impl UserSettings {
    /// Apply a partial update, returning the merged settings.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            grayscale_mode: patch.grayscale_mode.unwrap_or(self.grayscale_mode),
            intentional_mode: patch.intentional_mode.unwrap_or(self.intentional_mode),
            theme: patch.theme.unwrap_or(self.theme),
            show_intention_prompt: patch
                .show_intention_prompt
                .unwrap_or(self.show_intention_prompt),
            launch_delay: patch.launch_delay.unwrap_or(self.launch_delay),
        }
    }
}

/// Partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intentional_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_intention_prompt: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_delay: Option<LaunchDelay>,
}

impl SettingsPatch {
    /// Build a single-field patch from a settings key and its string value.
    ///
    /// Keys are the camelCase names used in storage.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, ValidationError> {
        let parse_bool = |field: &str| {
            value.parse::<bool>().map_err(|_| ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("expected true or false, got '{value}'"),
            })
        };
        let mut patch = Self::default();
        match key {
            "grayscaleMode" => patch.grayscale_mode = Some(parse_bool(key)?),
            "intentionalMode" => patch.intentional_mode = Some(parse_bool(key)?),
            "showIntentionPrompt" => patch.show_intention_prompt = Some(parse_bool(key)?),
            "theme" => patch.theme = Some(value.parse()?),
            "launchDelay" => {
                let secs = value.parse::<u32>().map_err(|_| ValidationError::InvalidValue {
                    field: key.to_string(),
                    message: format!("expected seconds, got '{value}'"),
                })?;
                patch.launch_delay = Some(LaunchDelay::new(secs)?);
            }
            other => {
                return Err(ValidationError::InvalidValue {
                    field: other.to_string(),
                    message: "unknown settings key".into(),
                })
            }
        }
        Ok(patch)
    }
}

/// User-assigned app category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AppCategory {
    Essential,
    #[default]
    Productive,
    Distracting,
}

impl AppCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppCategory::Essential => "Essential",
            AppCategory::Productive => "Productive",
            AppCategory::Distracting => "Distracting",
        }
    }
}

impl std::str::FromStr for AppCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "essential" => Ok(AppCategory::Essential),
            "productive" => Ok(AppCategory::Productive),
            "distracting" => Ok(AppCategory::Distracting),
            other => Err(ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("expected Essential, Productive or Distracting, got '{other}'"),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for AppCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// Kind shown beside each app in the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppKind {
    Social,
    Work,
    Utility,
    Entertainment,
}

/// An installed (mock) app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppItem {
    pub id: String,
    pub name: String,
    pub kind: AppKind,
}

impl AppItem {
    pub fn new(id: &str, name: &str, kind: AppKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
        }
    }
}
