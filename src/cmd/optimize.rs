use super::{load_city, resolve_governor_config};
use crate::reports;
use citygov::config::{GovernorConfig, ObjectiveArgs};
use citygov::error::GovResult;
use citygov::governor::Governor;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// City definition (JSON).
    #[arg(long)]
    pub city: PathBuf,

    /// Replace the city's tiles with a CSV list (x,y,food,shield,trade).
    #[arg(long)]
    pub tiles: Option<PathBuf>,

    #[command(flatten)]
    pub objective: ObjectiveArgs,

    #[command(flatten)]
    pub governor: GovernorConfig,

    /// Governor config file (JSON); overrides the governor flags.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: OptimizeArgs) -> GovResult<()> {
    let model = load_city(&args.city, args.tiles.as_ref())?;
    let param = args.objective.resolve()?;
    let config = resolve_governor_config(args.config.as_ref(), &args.governor)?;

    info!(
        "🏙️  Optimizing {} (size {}, {} tiles)",
        model.city.name,
        model.city.size,
        model.city.tiles.len()
    );
    let mut governor = Governor::new(config);
    let result = governor.optimize(&model.city, &model, &param)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        reports::print_allocation(&model.city, &result);
        reports::print_search_stats(&result.stats);
    }
    Ok(())
}
