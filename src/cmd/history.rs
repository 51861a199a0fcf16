use crate::reports;
use clap::{Args, Subcommand};
use lanesignal::error::{LaneSignalError, LsResult};
use lanesignal::history::{HistoryStore, DEFAULT_LIST_LIMIT};
use std::path::Path;
use uuid::Uuid;

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryAction {
    /// Most recent analyses first.
    List {
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Show {
        id: Uuid,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Delete {
        id: Uuid,
    },
}

pub fn run(args: HistoryArgs, history_path: &Path) -> LsResult<()> {
    let mut store = HistoryStore::open(history_path)?;

    match args.action {
        HistoryAction::List { limit, json } => {
            let records = store.list(limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                reports::print_history(&records);
            }
        }
        HistoryAction::Show { id, json } => {
            let record = store
                .get(id)
                .ok_or_else(|| LaneSignalError::NotFound(format!("analysis {}", id)))?;
            if json {
                println!("{}", serde_json::to_string_pretty(record)?);
            } else {
                reports::print_analysis(record);
            }
        }
        HistoryAction::Delete { id } => {
            if !store.delete(id)? {
                return Err(LaneSignalError::NotFound(format!("analysis {}", id)));
            }
            println!("Deleted {}", id);
        }
    }
    Ok(())
}
