use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use lanesignal::config::Config;
use lanesignal::error::LsResult;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with policy and simulation settings.
    #[arg(global = true, long = "config")]
    config_file: Option<PathBuf>,

    #[arg(global = true, long, default_value = "data/history.json")]
    history: PathBuf,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Analyze(cmd::analyze::AnalyzeArgs),
    History(cmd::history::HistoryArgs),
}

fn run(cli: Cli, matches: &clap::ArgMatches) -> LsResult<()> {
    match cli.command {
        Commands::Analyze(args) => {
            // Flags typed on the command line beat the config file, which
            // beats the built-in defaults.
            let config = match &cli.config_file {
                Some(path) => {
                    info!("⚖️  Loading config from: {}", path.display());
                    let mut file_config = Config::load_from_file(path)?;
                    if let Some(sub_matches) = matches.subcommand_matches("analyze") {
                        file_config.merge_from_cli(&args.config, sub_matches);
                    }
                    file_config
                }
                None => args.config.clone(),
            };
            config.validate()?;
            cmd::analyze::run(args, config, &cli.history)
        }
        Commands::History(args) => cmd::history::run(args, &cli.history),
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}
