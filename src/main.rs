//! sortlist - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use sortlist::model::{ColumnName, ColumnSet};
use sortlist::persist::{load_order, JsonOrderSink};
use sortlist::state::{ReorderNotifier, SortableList};

/// sortlist - reorder a JSONL list by dragging rows or sorting columns
#[derive(Parser, Debug)]
#[command(name = "sortlist")]
#[command(version)]
#[command(about = "Sort and drag-reorder the rows of a JSONL file in the terminal")]
pub struct Args {
    /// Path to JSONL file, one object per row
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where the committed order is saved
    #[arg(long)]
    pub order_file: Option<PathBuf>,

    /// Column the header starts on
    #[arg(long)]
    pub sort_column: Option<String>,

    /// Print row ids in order and exit instead of opening the table
    #[arg(long)]
    pub dump: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = sortlist::config::load_config_with_precedence(args.config.clone())?;
        let merged = sortlist::config::merge_config(config_file);
        let with_env = sortlist::config::apply_env_overrides(merged);
        sortlist::config::apply_cli_overrides(
            with_env,
            args.order_file.clone(),
            args.sort_column.clone(),
        )
    };

    sortlist::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let file = args.file.clone().ok_or("no input file given (usage: sortlist FILE)")?;
    let options = config.source_options()?;
    let loaded = sortlist::source::load_file(&file, &options)?;
    if !loaded.report.skipped.is_empty() {
        warn!(
            malformed = loaded.report.malformed(),
            duplicates = loaded.report.duplicates(),
            "some input lines were skipped"
        );
    }

    let default_column = default_column(config.default_sort_column.as_deref(), &loaded.columns)?;
    let store = loaded.into_store()?;

    // Dumping is read-only: nothing should touch the saved order.
    let notifier = if args.dump {
        ReorderNotifier::silent()
    } else {
        ReorderNotifier::new(JsonOrderSink::new(&config.order_file))
    };
    let mut list = SortableList::new(store, default_column, notifier)?;

    match load_order(&config.order_file) {
        Ok(Some(saved)) => {
            info!(saved_at = %saved.saved_at, ids = saved.ids.len(), "restoring saved order");
            list.apply_saved_order(&saved.ids)?;
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "ignoring unreadable saved order"),
    }

    if args.dump {
        for id in list.ids() {
            println!("{}", id);
        }
        return Ok(());
    }

    let list = sortlist::view::run(list)?;
    info!(rows = list.len(), notifications = list.notifications(), "exiting");
    Ok(())
}

/// The configured start column, or the first column when none is set.
fn default_column(
    configured: Option<&str>,
    columns: &ColumnSet,
) -> Result<ColumnName, sortlist::model::InvalidColumnName> {
    match configured {
        Some(name) => ColumnName::new(name),
        None => Ok(columns.first().name.clone()),
    }
}
