use crate::config::GovernorConfig;
use crate::error::GovResult;
use crate::governor::{Governor, Optimization};
use crate::model::CityModel;
use crate::parameter::Parameter;
use crate::types::CityId;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub city: CityId,
    pub name: String,
    pub size: u32,
    pub optimization: Option<Optimization>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub cities: usize,
    pub governed: usize,
    pub infeasible: usize,
    pub failed: usize,
    pub oracle_calls: usize,
}

/// Optimises every city on the rayon pool, one governor per city. Entries
/// come back in input order; a failing city does not stop the others.
pub fn optimize_batch(
    models: &[CityModel],
    param: &Parameter,
    config: &GovernorConfig,
) -> Vec<BatchEntry> {
    models
        .par_iter()
        .map(|model| {
            let mut governor = Governor::new(config.clone());
            let (optimization, error) = match governor.optimize(&model.city, model, param) {
                Ok(o) => (Some(o), None),
                Err(e) => {
                    warn!(city = model.city.id, "batch entry failed: {}", e);
                    (None, Some(e.to_string()))
                }
            };
            BatchEntry {
                city: model.city.id,
                name: model.city.name.clone(),
                size: model.city.size,
                optimization,
                error,
            }
        })
        .collect()
}

pub fn summarize(entries: &[BatchEntry]) -> BatchSummary {
    let mut summary = BatchSummary {
        cities: entries.len(),
        ..Default::default()
    };
    for entry in entries {
        match &entry.optimization {
            Some(o) if o.found_a_valid() => summary.governed += 1,
            Some(_) => summary.infeasible += 1,
            None => summary.failed += 1,
        }
        if let Some(o) = &entry.optimization {
            summary.oracle_calls += o.stats.oracle_calls;
        }
    }
    summary
}

/// Loads every `*.json` city file in `dir`, sorted by file name.
pub fn load_city_dir<P: AsRef<Path>>(dir: P) -> GovResult<Vec<CityModel>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let models = paths
        .iter()
        .map(CityModel::load_from_file)
        .collect::<GovResult<Vec<_>>>()?;

    info!(
        "API: Loaded {} cities from {:?}",
        models.len(),
        dir.as_ref()
    );
    Ok(models)
}
