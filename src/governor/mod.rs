//! Citizen allocation search with three cache tiers.
//!
//! * Tier 3 ([`combination`]): non-dominated sets of worked tiles, one arena
//!   per worker count. Independent of the objective.
//! * Tier 2 ([`secondary`]): gold, luxury, science and mood keyed by what
//!   they depend on, shared by every combination of a city.
//! * Tier 1 ([`arrangement`]): every evaluated specialist split of a single
//!   combination.
//!
//! A [`Governor`] owns one [`CityContext`] per cached city and decides when a
//! context is stale.

pub mod arrangement;
pub mod combination;
pub mod exhaustive;
pub mod fitness;
pub mod search;
pub mod secondary;

pub use self::fitness::Fitness;
pub use self::search::SearchStats;

use self::combination::CombinationCache;
use self::secondary::SecondaryCache;
use crate::city::City;
use crate::config::GovernorConfig;
use crate::error::GovResult;
use crate::oracle::Oracle;
use crate::parameter::Parameter;
use crate::types::{Allocation, CityId};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use tracing::{debug, error, info, warn};

/// Every cache built for one city snapshot.
#[derive(Debug, Clone)]
pub struct CityContext {
    fingerprint: u64,
    secondary: SecondaryCache,
    combinations: CombinationCache,
}

impl CityContext {
    pub fn build(city: &City, capacity: usize) -> GovResult<Self> {
        let combinations = CombinationCache::build(city, capacity)?;
        debug!(
            city = city.id,
            combinations = combinations.len(),
            "built city context"
        );
        Ok(Self {
            fingerprint: city.fingerprint(),
            secondary: SecondaryCache::for_city(city),
            combinations,
        })
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn secondary(&self) -> &SecondaryCache {
        &self.secondary
    }

    pub fn combinations(&self) -> &CombinationCache {
        &self.combinations
    }
}

/// Outcome of one optimisation. `allocation` is `None` when no assignment
/// meets the parameter's constraints, which is a normal result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimization {
    pub allocation: Option<Allocation>,
    pub fitness: Option<Fitness>,
    pub stats: SearchStats,
}

impl Optimization {
    pub fn found_a_valid(&self) -> bool {
        self.allocation.is_some()
    }
}

/// Notifications from the game about city state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityEvent {
    Added(CityId),
    Changed(CityId),
    Removed(CityId),
}

/// Pushes an allocation into the game. Returns false when the game refused
/// it, typically because the city changed underneath.
pub trait Applier {
    fn apply(&mut self, city: CityId, allocation: &Allocation) -> bool;
}

#[derive(Debug, Default)]
pub struct Governor {
    config: GovernorConfig,
    contexts: FnvHashMap<CityId, CityContext>,
    active: Option<CityId>,
}

impl Governor {
    pub fn new(config: GovernorConfig) -> Self {
        Self {
            config,
            contexts: FnvHashMap::default(),
            active: None,
        }
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn is_cached(&self, city: CityId) -> bool {
        self.contexts.contains_key(&city)
    }

    pub fn cached_cities(&self) -> usize {
        self.contexts.len()
    }

    pub fn context(&self, city: CityId) -> Option<&CityContext> {
        self.contexts.get(&city)
    }

    /// Best allocation of `city` under `param`. Any error drops the city's
    /// caches before it is returned.
    pub fn optimize<O: Oracle>(
        &mut self,
        city: &City,
        oracle: &O,
        param: &Parameter,
    ) -> GovResult<Optimization> {
        match self.optimize_cached(city, oracle, param) {
            Ok(result) => {
                info!(
                    city = city.id,
                    found = result.found_a_valid(),
                    fitness = ?result.fitness,
                    oracle_calls = result.stats.oracle_calls,
                    "optimized city"
                );
                Ok(result)
            }
            Err(e) => {
                if e.is_fatal() {
                    error!(city = city.id, "{}", e);
                }
                self.invalidate(city.id);
                Err(e)
            }
        }
    }

    fn optimize_cached<O: Oracle>(
        &mut self,
        city: &City,
        oracle: &O,
        param: &Parameter,
    ) -> GovResult<Optimization> {
        city.validate()?;
        let ctx = self.context_for(city)?;
        let (best, stats) = search::optimize_combinations(
            city,
            oracle,
            param,
            &mut ctx.secondary,
            &mut ctx.combinations,
        )?;

        let (allocation, fitness) = best.unzip();
        Ok(Optimization {
            allocation,
            fitness,
            stats,
        })
    }

    /// Returns the city's context, rebuilding it when missing, stale or when
    /// caching is disabled.
    fn context_for(&mut self, city: &City) -> GovResult<&mut CityContext> {
        if let Some(prev) = self.active.filter(|&prev| prev != city.id) {
            if !self.config.retain_inactive_cities && self.contexts.remove(&prev).is_some() {
                debug!(from = prev, to = city.id, "city switch, released previous caches");
            }
        }
        self.active = Some(city.id);

        let capacity = self.config.combination_capacity;
        let fingerprint = city.fingerprint();
        let disabled = self.config.disable_cache;

        match self.contexts.entry(city.id) {
            Entry::Occupied(mut entry) => {
                let stale = entry.get().fingerprint != fingerprint;
                if stale {
                    warn!(
                        city = city.id,
                        "city changed without an invalidation, rebuilding caches"
                    );
                }
                if stale || disabled {
                    entry.insert(CityContext::build(city, capacity)?);
                }
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(CityContext::build(city, capacity)?)),
        }
    }

    /// Drops every cache of `city`. Returns whether anything was cached.
    pub fn invalidate(&mut self, city: CityId) -> bool {
        if self.active == Some(city) {
            self.active = None;
        }
        let dropped = self.contexts.remove(&city).is_some();
        if dropped {
            debug!(city, "invalidated city caches");
        }
        dropped
    }

    pub fn invalidate_all(&mut self) {
        debug!(cities = self.contexts.len(), "invalidating all caches");
        self.contexts.clear();
        self.active = None;
    }

    pub fn handle_event(&mut self, event: CityEvent) {
        match event {
            CityEvent::Added(id) | CityEvent::Changed(id) | CityEvent::Removed(id) => {
                self.invalidate(id);
            }
        }
    }

    /// Hands `allocation` to `applier`. A refused apply means the cached view
    /// of the city is wrong, so its caches are dropped. No retry.
    pub fn apply<A: Applier>(
        &mut self,
        city: &City,
        allocation: &Allocation,
        applier: &mut A,
    ) -> GovResult<bool> {
        if let Err(e) = allocation.check_population(city.size) {
            error!(city = city.id, "{}", e);
            self.invalidate(city.id);
            return Err(e.into());
        }
        if applier.apply(city.id, allocation) {
            Ok(true)
        } else {
            warn!(city = city.id, "apply failed, invalidating");
            self.invalidate(city.id);
            Ok(false)
        }
    }
}
