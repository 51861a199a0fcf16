use crate::reports;
use clap::Args;
use lanesignal::api::{self, AnalysisRecord, AnalyzeOptions, InputType};
use lanesignal::config::Config;
use lanesignal::detection::{
    CsvDetectionSource, DetectionSource, JsonDetectionSource, SimulatedDetector,
};
use lanesignal::error::{LaneSignalError, LsResult};
use lanesignal::history::HistoryStore;
use lanesignal::scorer::LaneScorer;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long, value_enum, default_value_t = InputType::Image)]
    pub input_type: InputType,

    /// JSON (one frame or a list) or CSV detections. Simulated when absent.
    #[arg(short, long)]
    pub detections: Option<PathBuf>,

    /// Lane count: fixes the simulated roadway, required for CSV input.
    #[arg(short, long)]
    pub lanes: Option<u32>,

    #[arg(short, long, default_value_t = 1)]
    pub frames: usize,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    #[arg(long, default_value_t = false)]
    pub keep_detections: bool,
}

fn build_source(args: &AnalyzeArgs, config: &Config) -> LsResult<Box<dyn DetectionSource>> {
    match &args.detections {
        Some(path) if is_csv(path) => {
            let lanes = args.lanes.ok_or_else(|| {
                LaneSignalError::Config("--lanes is required for CSV detections".to_string())
            })?;
            Ok(Box::new(CsvDetectionSource::new(path, lanes)))
        }
        Some(path) => {
            if args.lanes.is_some() {
                warn!("⚠️  --lanes is ignored for JSON detections (frames carry their own lane count)");
            }
            Ok(Box::new(JsonDetectionSource::new(path)))
        }
        None => {
            let mut sim = SimulatedDetector::new(config.simulation.clone(), args.seed)?;
            if let Some(lanes) = args.lanes {
                sim = sim.with_lane_count(lanes)?;
            }
            Ok(Box::new(sim))
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn print_json(records: &[AnalysisRecord]) -> LsResult<()> {
    let out = match records {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    println!("{}", out);
    Ok(())
}

pub fn run(args: AnalyzeArgs, config: Config, history_path: &Path) -> LsResult<()> {
    let scorer = LaneScorer::new(config.policy.clone())?;

    if args.frames > 1 && args.input_type != InputType::Video {
        info!(
            "Scoring {} frames as '{}' input",
            args.frames, args.input_type
        );
    }

    let mut source = build_source(&args, &config)?;
    let opts = AnalyzeOptions {
        input_type: args.input_type,
        keep_detections: args.keep_detections,
    };
    let records = api::analyze_source(&scorer, source.as_mut(), args.frames, opts)?;

    if args.json {
        print_json(&records)?;
    } else {
        for record in &records {
            reports::print_analysis(record);
        }
    }

    if !args.no_save {
        let mut store = HistoryStore::open(history_path)?;
        store.save_all(records)?;
        info!("History now holds {} analyses", store.len());
    }
    Ok(())
}
