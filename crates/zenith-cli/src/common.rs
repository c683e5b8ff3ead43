//! Helpers shared by the CLI commands.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use zenith_core::notify::{Notification, NotificationPermission, Notifier, NotifyError};
use zenith_core::{Config, DurationChoice, Launcher, LogStore, SqliteKv};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn open_store() -> Result<LogStore<SqliteKv>, Box<dyn std::error::Error>> {
    Ok(LogStore::open(SqliteKv::open()?))
}

/// Launcher over the on-disk store, configured from `config`.
pub fn open_launcher<N: Notifier>(
    config: &Config,
    notifier: N,
) -> Result<Launcher<SqliteKv, N>, Box<dyn std::error::Error>> {
    let duration = DurationChoice::from_minutes(config.timer.default_minutes)?;
    Ok(Launcher::new(open_store()?, notifier)
        .with_default_duration(duration)
        .with_notifications(config.notifications.enabled))
}

/// Current-thread runtime for the interactive commands.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

pub fn stdin_lines() -> Lines<BufReader<Stdin>> {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Overwrite the current terminal line.
pub fn status_line(text: &str) {
    print!("\r\x1b[2K{text}");
    let _ = std::io::stdout().flush();
}

/// Prints notifications to the terminal with a bell. A terminal is always
/// allowed to show them once asked.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    permission: NotificationPermission,
}

impl Notifier for TerminalNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        if self.permission == NotificationPermission::Default {
            self.permission = NotificationPermission::Granted;
        }
        self.permission
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        println!("\x07\n{}\n{}", notification.title, notification.body);
        std::io::stdout()
            .flush()
            .map_err(|e| NotifyError::Backend(e.to_string()))
    }
}
