use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zenith_core::Config;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "zenith", version, about = "Zenith: a minimalist focus launcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus timer
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// App drawer and launching
    Apps {
        #[command(subcommand)]
        action: commands::apps::AppsAction,
    },
    /// Usage statistics
    Stats {
        /// Only include the last N days (default 7)
        #[arg(long)]
        days: Option<u32>,
        #[command(subcommand)]
        action: Option<commands::stats::StatsAction>,
    },
    /// User settings (exported with your data)
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export, import or clear local data
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Chat with the focus coach
    Coach {
        #[command(subcommand)]
        action: commands::coach::CoachAction,
    },
    /// Print today's mantra
    Mantra,
    /// Camera passthrough
    Camera {
        #[command(subcommand)]
        action: commands::camera::CameraAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("ZENITH_LOG")
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::Focus { action } => commands::focus::run(action, &config),
        Commands::Apps { action } => commands::apps::run(action, &config),
        Commands::Stats { days, action } => commands::stats::run(days, action, &config),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Coach { action } => commands::coach::run(action, &config),
        Commands::Mantra => commands::mantra::run(),
        Commands::Camera { action } => commands::camera::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "zenith", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
