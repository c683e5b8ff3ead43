use clap::Subcommand;
use serde::Serialize;
use tokio::time::{interval, Duration};
use zenith_core::notify::NoopNotifier;
use zenith_core::{AppCategory, Config, Event, LaunchDecision, Screen};

use crate::common::{now_ms, open_launcher, open_store, runtime, status_line, stdin_lines, CliResult};

#[derive(Subcommand)]
pub enum AppsAction {
    /// List apps in the drawer
    List {
        /// Case-insensitive name filter
        #[arg(long, short)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Launch an app by name
    Launch {
        name: String,
        /// Intention to submit once the gate opens (prompted otherwise)
        #[arg(long)]
        intention: Option<String>,
    },
    /// Get or set an app's category
    Category {
        /// App id (see `apps list`)
        id: String,
        /// Essential, Productive or Distracting
        category: Option<String>,
    },
}

#[derive(Serialize)]
struct AppRow<'a> {
    id: &'a str,
    name: &'a str,
    kind: zenith_core::AppKind,
    category: AppCategory,
}

pub fn run(action: AppsAction, config: &Config) -> CliResult {
    match action {
        AppsAction::List { search, json } => {
            let mut launcher = open_launcher(config, NoopNotifier)?;
            launcher.navigate(Screen::AppDrawer);
            let apps = launcher.drawer(search.as_deref().unwrap_or(""));
            if json {
                let rows: Vec<_> = apps
                    .iter()
                    .map(|a| AppRow {
                        id: &a.id,
                        name: &a.name,
                        kind: a.kind,
                        category: launcher.store().category(&a.id),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if apps.is_empty() {
                println!("No apps found");
            } else {
                for app in apps {
                    let category = launcher.store().category(&app.id);
                    println!(
                        "{:>3}  {:<12} {:<14} {}",
                        app.id,
                        app.name,
                        format!("{:?}", app.kind),
                        category.as_str()
                    );
                }
            }
        }
        AppsAction::Launch { name, intention } => {
            runtime()?.block_on(launch(config, &name, intention))?;
        }
        AppsAction::Category { id, category } => {
            let mut store = open_store()?;
            if zenith_core::catalog::find_by_id(&zenith_core::catalog::builtin_apps(), &id).is_none()
            {
                return Err(format!("unknown app id: {id}").into());
            }
            match category {
                Some(value) => {
                    let category: AppCategory = value.parse()?;
                    store.set_category(&id, category)?;
                    println!("{id}: {}", category.as_str());
                }
                None => println!("{}", store.category(&id).as_str()),
            }
        }
    }
    Ok(())
}

async fn launch(config: &Config, name: &str, intention: Option<String>) -> CliResult {
    let mut launcher = open_launcher(config, NoopNotifier)?;
    launcher.navigate(Screen::AppDrawer);
    let app = launcher
        .drawer("")
        .into_iter()
        .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
        .cloned()
        .ok_or_else(|| format!("no app named '{name}' in the drawer"))?;

    let delay = match launcher.launch_app(&app, now_ms()) {
        LaunchDecision::Launched(_) => {
            println!("Launching {}...", app.name);
            return Ok(());
        }
        LaunchDecision::GateBusy => return Err("another launch is pending".into()),
        LaunchDecision::Gated { delay_secs } => delay_secs,
    };

    println!("{} is marked Distracting. Pause for {delay}s.", app.name);
    let mut lines = stdin_lines();
    let mut stdin_open = intention.is_none();
    let mut ticker = interval(Duration::from_secs(1));
    ticker.tick().await;

    while !launcher.gate().can_confirm() {
        status_line(&format!(
            "Wait {}s  (type 'cancel' to stop)",
            launcher.gate().seconds_remaining()
        ));
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(Event::GateConfirmable { .. }) = launcher.tick_gate() {
                    println!();
                }
            }
            line = lines.next_line(), if stdin_open => {
                let cancelled = match line? {
                    Some(l) => l.trim().eq_ignore_ascii_case("cancel"),
                    None => {
                        stdin_open = false;
                        false
                    }
                };
                if cancelled {
                    launcher.cancel_launch();
                    println!();
                    println!("Launch cancelled");
                    return Ok(());
                }
            }
        }
    }

    let intention = match intention {
        Some(text) => text,
        None => {
            println!("What is your intention for opening {}?", app.name);
            match lines.next_line().await? {
                Some(line) if !line.trim().eq_ignore_ascii_case("cancel") => line,
                _ => {
                    launcher.cancel_launch();
                    println!("Launch cancelled");
                    return Ok(());
                }
            }
        }
    };

    launcher.confirm_launch(&intention, now_ms())?;
    println!("Launching {}...", app.name);
    Ok(())
}
