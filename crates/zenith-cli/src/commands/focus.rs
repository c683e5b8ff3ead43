use std::io::IsTerminal;

use clap::Subcommand;
use tokio::time::{interval, Duration, MissedTickBehavior};
use zenith_core::focus::{ExitChallenge, PRESET_MINUTES};
use zenith_core::notify::{LogNotifier, NotificationPermission};
use zenith_core::{Config, DurationChoice, Event, FocusState, KvBackend, Launcher, Notifier};

use crate::common::{
    now_ms, open_launcher, runtime, status_line, stdin_lines, CliResult, TerminalNotifier,
};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Run a focus session in the foreground
    ///
    /// While running: `p` pauses or resumes, `x` asks to leave. Leaving
    /// takes three `yes` answers; `back` returns to the timer.
    Start {
        /// Minutes (preset or up to three digits); defaults to config
        minutes: Option<String>,
    },
    /// List preset durations
    Presets,
}

pub fn run(action: FocusAction, config: &Config) -> CliResult {
    match action {
        FocusAction::Start { minutes } => {
            let duration = match minutes {
                Some(input) => DurationChoice::parse_custom(&input)
                    .and_then(|c| DurationChoice::from_minutes(c.minutes()))?,
                None => DurationChoice::from_minutes(config.timer.default_minutes)?,
            };
            if !duration.is_startable() {
                return Err("duration must be at least one minute".into());
            }
            // Without a terminal the completion notice goes to the log.
            if std::io::stdout().is_terminal() {
                let launcher = open_launcher(config, TerminalNotifier::default())?;
                runtime()?.block_on(run_session(launcher, duration))
            } else {
                let notifier = LogNotifier::new(NotificationPermission::Default, true);
                let launcher = open_launcher(config, notifier)?;
                runtime()?.block_on(run_session(launcher, duration))
            }
        }
        FocusAction::Presets => {
            for m in PRESET_MINUTES {
                println!("{m}");
            }
            Ok(())
        }
    }
}

async fn run_session<B: KvBackend, N: Notifier>(
    mut launcher: Launcher<B, N>,
    duration: DurationChoice,
) -> CliResult {
    launcher.select_duration(duration);
    if launcher.start_focus(now_ms()).is_none() {
        return Err("could not start focus session".into());
    }

    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let mut lines = stdin_lines();
    let mut stdin_open = true;
    status_line(&launcher.timer().display());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match launcher.tick(now_ms()) {
                    Some(Event::FocusCompleted { session }) => {
                        tracing::debug!(id = %session.id, "focus session completed");
                        println!();
                        println!("completed {} minute session", session.duration);
                        return Ok(());
                    }
                    _ if launcher.timer().state() == FocusState::Running => {
                        let suffix = if launcher.timer().is_paused() { "  (paused)" } else { "" };
                        status_line(&format!("{}{suffix}", launcher.timer().display()));
                    }
                    _ => {}
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                if handle_input(&mut launcher, line.trim()) {
                    return Ok(());
                }
            }
        }
    }
}

/// Returns true when the session has ended.
fn handle_input<B: KvBackend, N: Notifier>(launcher: &mut Launcher<B, N>, input: &str) -> bool {
    if launcher.timer().state() == FocusState::ExitChallenge {
        if input.eq_ignore_ascii_case("back") {
            launcher.cancel_exit_challenge();
            println!("back to focus");
            return false;
        }
        return match launcher.submit_exit_challenge(input, now_ms()) {
            Some(Event::SessionAbandoned { .. }) => {
                println!("session ended early");
                true
            }
            _ => {
                print_prompt(launcher.timer().challenge());
                false
            }
        };
    }

    match input {
        "p" => {
            launcher.toggle_pause();
        }
        "x" => match launcher.request_exit() {
            Some(Event::FocusLeft) => return true,
            Some(Event::ExitChallengeStarted { .. }) => {
                println!();
                println!("Are you sure? Leaving breaks your focus.");
                print_prompt(launcher.timer().challenge());
            }
            _ => {}
        },
        "" => {}
        other => {
            println!();
            println!("unknown command '{other}' (p = pause/resume, x = leave)");
        }
    }
    false
}

fn print_prompt(challenge: Option<&ExitChallenge>) {
    if let Some(challenge) = challenge {
        println!("{}", challenge.prompt());
    }
}
