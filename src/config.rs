use crate::consts::{DEFAULT_COMBINATION_CAPACITY, NUM_STATS};
use crate::error::{GovResult, GovernorError};
use crate::parameter::{FactorTarget, Parameter};
use crate::presets::KnownPreset;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cache behaviour of a [`crate::governor::Governor`].
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Combinations kept per worker count before the cache reports exhaustion.
    #[arg(long, default_value_t = DEFAULT_COMBINATION_CAPACITY)]
    pub combination_capacity: usize,

    /// Rebuild every cache on every call.
    #[arg(long, default_value_t = false)]
    pub disable_cache: bool,

    /// Keep caches of cities other than the one last optimised.
    #[arg(long, default_value_t = false)]
    pub retain_inactive_cities: bool,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            combination_capacity: DEFAULT_COMBINATION_CAPACITY,
            disable_cache: false,
            retain_inactive_cities: false,
        }
    }
}

impl GovernorConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GovResult<Self> {
        let content = fs::read_to_string(path)?;
        let cfg: GovernorConfig = serde_json::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> GovResult<()> {
        if self.combination_capacity == 0 {
            return Err(GovernorError::Config(
                "combination_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Objective selection for command-line runs. Sources are applied in order:
/// binary record, JSON file, preset, defaults; explicit flags override last.
#[derive(Args, Debug, Clone, Default)]
pub struct ObjectiveArgs {
    #[arg(long)]
    pub preset: Option<KnownPreset>,

    /// JSON parameter file.
    #[arg(long)]
    pub parameter: Option<PathBuf>,

    /// Persisted binary parameter record.
    #[arg(long)]
    pub parameter_bin: Option<PathBuf>,

    /// Minimum surplus per stat: "food,shield,trade,gold,luxury,science".
    #[arg(long, allow_hyphen_values = true)]
    pub minimal: Option<String>,

    /// Weight per stat, same order as --minimal.
    #[arg(long, allow_hyphen_values = true)]
    pub factors: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub happy_factor: Option<i16>,

    #[arg(long)]
    pub factor_target: Option<FactorTarget>,

    #[arg(long, default_value_t = false)]
    pub require_happy: bool,
}

impl ObjectiveArgs {
    pub fn resolve(&self) -> GovResult<Parameter> {
        let mut param = if let Some(path) = &self.parameter_bin {
            let bytes = fs::read(path)?;
            Parameter::from_bytes(&bytes)?
        } else if let Some(path) = &self.parameter {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else if let Some(preset) = self.preset {
            preset.parameter()
        } else {
            Parameter::default()
        };

        if let Some(s) = &self.minimal {
            param.minimal_surplus = parse_i16_array::<NUM_STATS>(s, "minimal")?;
        }
        if let Some(s) = &self.factors {
            param.factor = parse_i16_array::<NUM_STATS>(s, "factors")?;
        }
        if let Some(h) = self.happy_factor {
            param.happy_factor = h;
        }
        if let Some(t) = self.factor_target {
            param.factor_target = t;
        }
        if self.require_happy {
            param.require_happy = true;
        }

        debug!(?param, "resolved objective");
        Ok(param)
    }
}

fn parse_i16_array<const N: usize>(s: &str, name: &str) -> GovResult<[i16; N]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(GovernorError::Config(format!(
            "--{} requires {} values, got {}",
            name,
            N,
            parts.len()
        )));
    }
    let mut arr = [0; N];
    for (i, p) in parts.iter().enumerate() {
        arr[i] = p.trim().parse().map_err(|_| {
            GovernorError::Config(format!("Invalid number '{}' in --{}", p.trim(), name))
        })?;
    }
    Ok(arr)
}
