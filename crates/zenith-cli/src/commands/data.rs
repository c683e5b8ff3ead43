use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{now_ms, open_store, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export settings, logs and categories as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Import a previously exported JSON file
    Import { file: PathBuf },
    /// Delete all local data
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CliResult {
    let mut store = open_store()?;
    match action {
        DataAction::Export { out } => {
            let json = store.export_all(now_ms())?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        DataAction::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            if !store.import_all(&json) {
                return Err(format!("{} is not a valid export", file.display()).into());
            }
            tracing::info!(file = %file.display(), "data imported");
            println!("imported {}", file.display());
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear data without --yes".into());
            }
            store.clear_all()?;
            tracing::info!("data cleared");
            println!("all data cleared");
        }
    }
    Ok(())
}
