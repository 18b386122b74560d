//! Realization fill chain, specialist-arrangement search and the top-level
//! combination loop.

use super::arrangement::ArrangementCache;
use super::combination::{Combination, CombinationCache};
use super::fitness::{self, Fitness};
use super::secondary::SecondaryCache;
use crate::city::City;
use crate::error::GovResult;
use crate::oracle::Oracle;
use crate::parameter::Parameter;
use crate::types::{Allocation, Assignment, Specialists};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Counters for one optimisation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub oracle_calls: usize,
    pub tier1_hits: usize,
    pub tier2_reconstructions: usize,
    pub combinations_visited: usize,
    /// Rejected by the primary-surplus probe before any specialist search.
    pub combinations_pruned: usize,
    pub realizations_evaluated: usize,
    pub combinations_cached: usize,
}

/// Best feasible realization found so far, with its score.
pub type Candidate = (Allocation, Fitness);

/// One pass over a city's combination cache for a single parameter.
pub struct Search<'a, O: Oracle> {
    city: &'a City,
    oracle: &'a O,
    param: &'a Parameter,
    secondary: &'a mut SecondaryCache,
    stats: SearchStats,
}

impl<'a, O: Oracle> Search<'a, O> {
    pub fn new(
        city: &'a City,
        oracle: &'a O,
        param: &'a Parameter,
        secondary: &'a mut SecondaryCache,
    ) -> Self {
        Self {
            city,
            oracle,
            param,
            secondary,
            stats: SearchStats::default(),
        }
    }

    /// Visits every cached combination, lowest worker count first, and keeps
    /// the realization with the strictly greatest fitness.
    pub fn run(mut self, combinations: &mut CombinationCache) -> GovResult<(Option<Candidate>, SearchStats)> {
        let mut best: Option<Candidate> = None;
        self.stats.combinations_cached = combinations.len();

        for level in combinations.levels_mut() {
            for combo in level.iter_mut() {
                self.stats.combinations_visited += 1;

                let baseline = self.baseline(combo)?;
                if !fitness::could_satisfy(self.param, &baseline) {
                    self.stats.combinations_pruned += 1;
                    continue;
                }

                if let Some((alloc, fit)) = self.best_arrangement(combo)? {
                    let better = match &best {
                        Some((_, current)) => fit > *current,
                        None => true,
                    };
                    if better {
                        best = Some((alloc, fit));
                    }
                }
            }
        }

        if let Some((alloc, _)) = &best {
            alloc.check_population(self.city.size)?;
        }

        debug!(city = self.city.id, stats = ?self.stats, "search finished");
        Ok((best, self.stats))
    }

    /// Every (scientists, taxmen) split this combination can field, scored.
    /// Roles the city is too small for only take the value zero.
    pub fn best_arrangement(&mut self, combo: &mut Combination) -> GovResult<Option<Candidate>> {
        let free = self.free_citizens(combo);
        let role_cap = self.role_cap(free);
        let mut best: Option<Candidate> = None;

        for scientists in 0..=role_cap {
            for taxmen in 0..=role_cap.min(free - scientists) {
                let alloc = self.fill_out(combo, scientists, taxmen)?;
                self.stats.realizations_evaluated += 1;

                if !fitness::is_valid_result(self.param, &alloc) {
                    continue;
                }
                let fit = fitness::evaluate(self.param, &alloc);
                let better = match &best {
                    Some((_, current)) => fit > *current,
                    None => true,
                };
                if better {
                    best = Some((alloc, fit));
                }
            }
        }

        Ok(best)
    }

    /// The all-entertainer realization. Always comes from the oracle on first
    /// use since primary surpluses depend on upkeep the governor cannot see.
    /// This is the floor of one oracle call per visited combination; every
    /// other split of the combination can then be rebuilt from Tier 2.
    pub fn baseline(&mut self, combo: &mut Combination) -> GovResult<Allocation> {
        if let Some(alloc) = combo.all_entertainers {
            return Ok(alloc);
        }
        let free = self.free_citizens(combo);
        let alloc = self.evaluate(combo, Specialists::new(free, 0, 0))?;
        self.arrangements(combo).store(0, 0, alloc);
        combo.all_entertainers = Some(alloc);
        Ok(alloc)
    }

    /// Tier 1 hit, then Tier 2 reconstruction from the baseline, then the
    /// oracle. Whatever is produced lands in the combination's Tier 1 slot.
    pub fn fill_out(
        &mut self,
        combo: &mut Combination,
        scientists: u32,
        taxmen: u32,
    ) -> GovResult<Allocation> {
        if let Some(alloc) = self.arrangements(combo).get(scientists, taxmen) {
            self.stats.tier1_hits += 1;
            return Ok(*alloc);
        }

        let free = self.free_citizens(combo);
        let specialists = Specialists::new(free - scientists - taxmen, taxmen, scientists);
        let baseline = self.baseline(combo)?;

        let alloc = match self.secondary.reconstruct(&baseline, specialists) {
            Some(alloc) => {
                self.stats.tier2_reconstructions += 1;
                alloc
            }
            None => self.evaluate(combo, specialists)?,
        };

        self.arrangements(combo).store(scientists, taxmen, alloc);
        Ok(alloc)
    }

    fn evaluate(&mut self, combo: &Combination, specialists: Specialists) -> GovResult<Allocation> {
        let assignment = Assignment {
            worked: combo.worked,
            specialists,
        };
        self.stats.oracle_calls += 1;
        let alloc = self
            .oracle
            .evaluate(self.city.id, &assignment)?
            .into_allocation(&assignment);
        self.secondary.record_allocation(&alloc)?;
        Ok(alloc)
    }

    fn arrangements<'c>(&self, combo: &'c mut Combination) -> &'c mut ArrangementCache {
        let free = self.free_citizens(combo);
        let cap = self.role_cap(free);
        combo
            .arrangements
            .get_or_insert_with(|| ArrangementCache::new(free, cap, cap))
    }

    fn free_citizens(&self, combo: &Combination) -> u32 {
        self.city.size.saturating_sub(combo.workers())
    }

    fn role_cap(&self, free: u32) -> u32 {
        if self.city.supports_specialists() {
            free
        } else {
            0
        }
    }
}

/// Runs one search over `combinations`.
pub fn optimize_combinations<O: Oracle>(
    city: &City,
    oracle: &O,
    param: &Parameter,
    secondary: &mut SecondaryCache,
    combinations: &mut CombinationCache,
) -> GovResult<(Option<Candidate>, SearchStats)> {
    Search::new(city, oracle, param, secondary).run(combinations)
}
