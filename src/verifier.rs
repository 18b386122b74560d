use crate::city::City;
use crate::config::GovernorConfig;
use crate::error::GovResult;
use crate::governor::exhaustive::optimize_exhaustive;
use crate::governor::{fitness, Fitness, Governor, Optimization, SearchStats};
use crate::oracle::Oracle;
use crate::parameter::Parameter;
use crate::types::Allocation;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub cached: Optimization,
    pub exhaustive_allocation: Option<Allocation>,
    pub exhaustive_fitness: Option<Fitness>,
    pub exhaustive_stats: SearchStats,
    /// Pruning is only exact for monotone objectives.
    pub monotone: bool,
}

impl VerificationReport {
    pub fn matches(&self) -> bool {
        self.cached.fitness == self.exhaustive_fitness
    }
}

/// Compares the cached search against oracle-only brute force.
pub struct Verifier {
    config: GovernorConfig,
}

impl Verifier {
    pub fn new(config: GovernorConfig) -> Self {
        Self { config }
    }

    pub fn verify<O: Oracle>(
        &self,
        city: &City,
        oracle: &O,
        param: &Parameter,
    ) -> GovResult<VerificationReport> {
        let monotone = fitness::is_monotone(param);
        if !monotone {
            warn!(
                city = city.id,
                "objective is not monotone in primary output, a mismatch is possible"
            );
        }

        let mut governor = Governor::new(self.config.clone());
        let cached = governor.optimize(city, oracle, param)?;
        let (best, exhaustive_stats) = optimize_exhaustive(city, oracle, param)?;
        let (exhaustive_allocation, exhaustive_fitness) = best.unzip();

        let report = VerificationReport {
            cached,
            exhaustive_allocation,
            exhaustive_fitness,
            exhaustive_stats,
            monotone,
        };

        if report.matches() {
            info!(
                city = city.id,
                cached_calls = report.cached.stats.oracle_calls,
                exhaustive_calls = report.exhaustive_stats.oracle_calls,
                "verification passed"
            );
        } else {
            warn!(
                city = city.id,
                cached = ?report.cached.fitness,
                exhaustive = ?report.exhaustive_fitness,
                "verification mismatch"
            );
        }
        Ok(report)
    }
}
