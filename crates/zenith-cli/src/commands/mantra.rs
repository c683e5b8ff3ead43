use chrono::Local;
use zenith_core::stats::daily_mantra;

use crate::common::CliResult;

pub fn run() -> CliResult {
    println!("{}", daily_mantra(Local::now().date_naive()));
    Ok(())
}
