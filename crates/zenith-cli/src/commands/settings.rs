use clap::Subcommand;
use zenith_core::notify::NoopNotifier;
use zenith_core::{Config, Screen, SettingsPatch};

use crate::common::{open_launcher, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting (e.g. "intentionalMode", "launchDelay")
    Get { key: String },
    /// Set a setting
    Set { key: String, value: String },
    /// Show all settings
    List,
    /// Restore default settings
    Reset,
}

pub fn run(action: SettingsAction, config: &Config) -> CliResult {
    let mut launcher = open_launcher(config, NoopNotifier)?;
    launcher.navigate(Screen::Settings);
    let store = launcher.store_mut();
    match action {
        SettingsAction::Get { key } => {
            let value = serde_json::to_value(store.settings())?;
            match value.get(&key) {
                Some(serde_json::Value::String(s)) => println!("{s}"),
                Some(other) => println!("{other}"),
                None => return Err(format!("unknown settings key: {key}").into()),
            }
        }
        SettingsAction::Set { key, value } => {
            let patch = SettingsPatch::from_key_value(&key, &value)?;
            store.set_settings(&patch)?;
            println!("ok");
        }
        SettingsAction::List => {
            println!("{}", serde_json::to_string_pretty(store.settings())?);
        }
        SettingsAction::Reset => {
            store.reset_settings()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
