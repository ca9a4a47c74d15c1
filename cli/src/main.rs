use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsonedit_history::config::StorageConfig;
use jsonedit_history::history::service::HistoryService;
use jsonedit_history::io::fs::RealFs;
use jsonedit_history::HistoryError;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jsonedit")]
#[command(about = "Inspect and maintain the JSON editor's recent-file history", long_about = None)]
struct Cli {
    /// Directory holding json-file-history.json and editor.config.json
    /// (default: $JSONEDIT_DATA_DIR, then ~/.jsonedit)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the history, most recent first
    List {
        /// One `label<TAB>path` line per entry instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Records a file as just opened
    Open {
        directory: String,
        name: String,
    },
    /// Flags a file as missing without removing it
    Missing {
        directory: String,
        name: String,
    },
    /// Removes the entry at INDEX (0 is the most recent)
    Remove { index: usize },
    /// Re-applies alias rules to every entry
    Relabel,
    /// Prints the effective configuration
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let storage = match cli.data_dir {
        Some(dir) => StorageConfig::new(dir),
        None => StorageConfig::from_env(),
    };
    let service = HistoryService::open(RealFs, &storage).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            storage.config_path().display()
        )
    })?;

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::List { plain } => {
            let history = service.get_history()?;
            if plain {
                for entry in &history {
                    let marker = if entry.missing { " (missing)" } else { "" };
                    writeln!(
                        out,
                        "{}\t{}/{}{}",
                        entry.display_name(),
                        entry.directory_path,
                        entry.name,
                        marker
                    )?;
                }
                return Ok(());
            }
            emit(&mut out, &json!({ "fileHistory": history }))
        }
        Commands::Open { directory, name } => {
            let opened = report_unsaved(service.open_file(&directory, &name).map(|o| o.history))?;
            emit(&mut out, &json!({ "fileHistory": opened }))
        }
        Commands::Missing { directory, name } => {
            let history = report_unsaved(service.report_missing(&directory, &name))?;
            emit(&mut out, &json!({ "fileHistory": history }))
        }
        Commands::Remove { index } => {
            let history = service.remove(index)?;
            emit(&mut out, &json!({ "fileHistory": history }))
        }
        Commands::Relabel => {
            let history = service.relabel()?;
            emit(&mut out, &json!({ "fileHistory": history }))
        }
        Commands::Config => emit(&mut out, &json!(service.config())),
    }
}

/// Shows the computed list even when it could not be saved, then fails.
fn report_unsaved<T>(result: Result<T, HistoryError>) -> Result<T> {
    match result {
        Ok(v) => Ok(v),
        Err(e) => {
            if let Some(unsaved) = e.unsaved_history() {
                log::warn!("Unsaved history: {}", json!(unsaved));
            }
            Err(e.into())
        }
    }
}

fn emit(out: &mut impl Write, value: &serde_json::Value) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

