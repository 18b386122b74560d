use super::resolve_governor_config;
use crate::reports;
use citygov::api::{load_city_dir, optimize_batch, summarize};
use citygov::config::{GovernorConfig, ObjectiveArgs};
use citygov::error::GovResult;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directory of city definitions (*.json).
    #[arg(long)]
    pub dir: PathBuf,

    #[command(flatten)]
    pub objective: ObjectiveArgs,

    #[command(flatten)]
    pub governor: GovernorConfig,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: BatchArgs) -> GovResult<()> {
    let models = load_city_dir(&args.dir)?;
    let param = args.objective.resolve()?;
    let config = resolve_governor_config(args.config.as_ref(), &args.governor)?;

    info!("🔥 Optimizing {} cities in parallel", models.len());
    let start = Instant::now();
    let entries = optimize_batch(&models, &param, &config);
    let summary = summarize(&entries);
    info!("⏱️  Batch finished in {:.2?}", start.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        reports::print_batch_report(&entries, &summary);
    }
    Ok(())
}
