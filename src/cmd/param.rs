use crate::reports;
use citygov::config::ObjectiveArgs;
use citygov::error::GovResult;
use citygov::parameter::Parameter;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ParamArgs {
    #[command(flatten)]
    pub objective: ObjectiveArgs,

    /// Write the binary record here.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Decode and show an existing binary record instead.
    #[arg(long)]
    pub inspect: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: ParamArgs) -> GovResult<()> {
    let (name, param) = match &args.inspect {
        Some(path) => {
            let bytes = fs::read(path)?;
            (path.display().to_string(), Parameter::from_bytes(&bytes)?)
        }
        None => ("resolved objective".to_string(), args.objective.resolve()?),
    };

    if let Some(out) = &args.out {
        fs::write(out, param.to_bytes())?;
        info!("💾 Wrote parameter record to {:?}", out);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&param)?);
    } else {
        reports::print_parameter(&name, &param);
        let hex: String = param
            .to_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        println!("Record: {}", hex);
    }
    Ok(())
}
