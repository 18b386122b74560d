pub mod batch;
pub mod generate;
pub mod optimize;
pub mod param;
pub mod presets;
pub mod verify;

use citygov::city::City;
use citygov::config::GovernorConfig;
use citygov::error::GovResult;
use citygov::model::CityModel;
use std::path::{Path, PathBuf};
use tracing::info;

/// A `--config` file replaces the governor flags wholesale.
pub fn resolve_governor_config(
    file: Option<&PathBuf>,
    flags: &GovernorConfig,
) -> GovResult<GovernorConfig> {
    match file {
        Some(path) => {
            info!("⚙️  Loading governor config: {:?}", path);
            GovernorConfig::load_from_file(path)
        }
        None => {
            flags.validate()?;
            Ok(flags.clone())
        }
    }
}

/// Loads a city file, optionally replacing its tiles with a CSV list.
pub fn load_city(path: &Path, tiles: Option<&PathBuf>) -> GovResult<CityModel> {
    info!("📂 Loading City: {:?}", path);
    let mut model = CityModel::load_from_file(path)?;
    if let Some(csv) = tiles {
        info!("🗺️  Loading Tiles: {:?}", csv);
        model.city.tiles = City::load_tiles_csv(csv)?;
        model.city.validate()?;
    }
    Ok(model)
}
