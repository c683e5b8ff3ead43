use chrono::Local;
use clap::Subcommand;
use zenith_core::notify::NoopNotifier;
use zenith_core::{Config, Screen};

use crate::common::{now_ms, open_launcher, CliResult};

/// Window used when `--days` is not given.
const DEFAULT_DAYS: u32 = 7;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Number of app launches since local midnight
    Today,
    /// Completion rate over the window
    Rate,
}

pub fn run(days: Option<u32>, action: Option<StatsAction>, config: &Config) -> CliResult {
    let mut launcher = open_launcher(config, NoopNotifier)?;
    launcher.navigate(Screen::Stats);
    let days = days.unwrap_or(DEFAULT_DAYS);
    let now = now_ms();

    match action {
        None => {
            let summary = launcher.summary(Some(days), now, Local::now().date_naive(), &Local);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some(StatsAction::Today) => println!("{}", launcher.store().today_launch_count(now)),
        Some(StatsAction::Rate) => {
            println!("{}%", launcher.store().completion_rate(days, now))
        }
    }
    Ok(())
}
