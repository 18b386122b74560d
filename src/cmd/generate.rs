use citygov::error::GovResult;
use citygov::model::generate_city;
use citygov::types::CityId;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(short = 'S', long, default_value_t = 1)]
    pub seed: u64,

    /// Work tiles per city (at most 48).
    #[arg(long, default_value_t = 20)]
    pub tiles: usize,

    #[arg(long, default_value_t = 6)]
    pub size: u32,

    /// Number of cities. More than one writes `city_<id>.json` files into
    /// the `--out` directory.
    #[arg(long, default_value_t = 1)]
    pub count: u32,

    #[arg(long, default_value_t = 1)]
    pub first_id: CityId,

    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: GenerateArgs) -> GovResult<()> {
    let mut rng = fastrand::Rng::with_seed(args.seed);

    if args.count <= 1 {
        let model = generate_city(&mut rng, args.first_id, args.tiles, args.size);
        model.save_to_file(&args.out)?;
        info!("🌱 Wrote {} to {:?}", model.city.name, args.out);
        return Ok(());
    }

    fs::create_dir_all(&args.out)?;
    for i in 0..args.count {
        let id = args.first_id + i;
        let model = generate_city(&mut rng, id, args.tiles, args.size);
        model.save_to_file(args.out.join(format!("city_{}.json", id)))?;
    }
    info!("🌱 Wrote {} cities to {:?}", args.count, args.out);
    Ok(())
}
