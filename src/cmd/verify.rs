use super::{load_city, resolve_governor_config};
use crate::reports;
use citygov::config::{GovernorConfig, ObjectiveArgs};
use citygov::error::{GovResult, GovernorError};
use citygov::verifier::Verifier;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    #[arg(long)]
    pub city: PathBuf,

    #[arg(long)]
    pub tiles: Option<PathBuf>,

    #[command(flatten)]
    pub objective: ObjectiveArgs,

    #[command(flatten)]
    pub governor: GovernorConfig,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: VerifyArgs) -> GovResult<()> {
    let model = load_city(&args.city, args.tiles.as_ref())?;
    let param = args.objective.resolve()?;
    let config = resolve_governor_config(args.config.as_ref(), &args.governor)?;

    info!("🔎 Verifying {} against brute force", model.city.name);
    let report = Verifier::new(config).verify(&model.city, &model, &param)?;
    reports::print_verification(&report);

    if !report.matches() && report.monotone {
        return Err(GovernorError::Validation(format!(
            "cached search disagrees with brute force for city {}",
            model.city.id
        )));
    }
    Ok(())
}
