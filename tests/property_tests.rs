use citygov::city::{City, WorkTile};
use citygov::config::GovernorConfig;
use citygov::error::GovResult;
use citygov::governor::combination::CombinationCache;
use citygov::governor::exhaustive::optimize_exhaustive;
use citygov::governor::fitness::{is_monotone, is_valid_result};
use citygov::governor::secondary::SecondaryCache;
use citygov::governor::Governor;
use citygov::model::{CityModel, Economy};
use citygov::oracle::{Evaluation, Oracle};
use citygov::parameter::{FactorTarget, Parameter};
use citygov::types::{Assignment, CityId, PrimaryOutput};
use proptest::prelude::*;
use std::cell::RefCell;

// --- STRATEGIES ---

prop_compose! {
    fn arb_tile()(food in 0..4i32, shield in 0..4i32, trade in 0..4i32) -> (i32, i32, i32) {
        (food, shield, trade)
    }
}

prop_compose! {
    fn arb_economy()(
        tax in 0..=10i32,
        lux in 0..=10i32,
        corruption in 0..=30i32,
        shield_upkeep in 0..=1i32,
        gold_upkeep in 0..=2i32,
        content_base in 1..=4u32,
        happy_cost in 1..=2i32,
        celebrate_size in 1..=4u32,
        sci_bonus in 0..=50i32,
    ) -> Economy {
        let lux = lux.min(10 - tax);
        Economy {
            tax_rate: tax * 10,
            lux_rate: lux * 10,
            sci_rate: (10 - tax - lux) * 10,
            corruption_percent: corruption,
            shield_upkeep,
            gold_upkeep,
            content_base,
            happy_cost,
            celebrate_size,
            sci_bonus,
            ..Economy::default()
        }
    }
}

prop_compose! {
    fn arb_city()(
        size in 1..=5u32,
        tiles in proptest::collection::vec(arb_tile(), 0..=5),
        center in arb_tile(),
        specialist_min_size in 1..=6u32,
        economy in arb_economy(),
    ) -> CityModel {
        let tiles = tiles
            .into_iter()
            .enumerate()
            .map(|(i, (f, s, t))| WorkTile::new(i as i8 + 1, 0, f, s, t))
            .collect();
        let mut city = City::new(1, size, PrimaryOutput::new(center.0, center.1, center.2), tiles);
        city.specialist_min_size = specialist_min_size;
        CityModel::new(city, economy)
    }
}

prop_compose! {
    fn arb_monotone_param()(
        minimal in proptest::array::uniform6(-4..=2i16),
        factor in proptest::array::uniform6(0..=5i16),
        happy_factor in 0..=5i16,
        shortfall in any::<bool>(),
        require_happy in proptest::bool::weighted(0.2),
    ) -> Parameter {
        let (factor_target, factor) = if shortfall {
            (FactorTarget::Shortfall, factor.map(|f| -f))
        } else {
            (FactorTarget::Surplus, factor)
        };
        Parameter::builder()
            .minimal_surplus(minimal)
            .factor(factor)
            .happy_factor(happy_factor)
            .factor_target(factor_target)
            .require_happy(require_happy)
            .build()
    }
}

/// Pushes every evaluation through a Tier 2 cache, failing on disagreement.
struct RecordingOracle<'a> {
    inner: &'a CityModel,
    cache: RefCell<SecondaryCache>,
}

impl Oracle for RecordingOracle<'_> {
    fn evaluate(&self, city: CityId, assignment: &Assignment) -> GovResult<Evaluation> {
        let eval = self.inner.evaluate(city, assignment)?;
        self.cache
            .borrow_mut()
            .record_allocation(&eval.into_allocation(assignment))?;
        Ok(eval)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_matches_brute_force(model in arb_city(), param in arb_monotone_param()) {
        prop_assume!(is_monotone(&param));
        let mut gov = Governor::new(GovernorConfig::default());
        let cached = gov.optimize(&model.city, &model, &param).unwrap();
        let (best, _) = optimize_exhaustive(&model.city, &model, &param).unwrap();

        prop_assert_eq!(cached.fitness, best.map(|(_, f)| f));
        if let Some(alloc) = cached.allocation {
            prop_assert!(is_valid_result(&param, &alloc));
            prop_assert_eq!(alloc.citizens(), model.city.size);
        }
    }

    #[test]
    fn prop_cached_equals_uncached(model in arb_city(), param in arb_monotone_param()) {
        let mut cached = Governor::new(GovernorConfig::default());
        let mut uncached = Governor::new(GovernorConfig {
            disable_cache: true,
            ..Default::default()
        });
        // Warm the cache with a different objective first.
        cached.optimize(&model.city, &model, &Parameter::default()).unwrap();

        let a = cached.optimize(&model.city, &model, &param).unwrap();
        let b = uncached.optimize(&model.city, &model, &param).unwrap();
        prop_assert_eq!(a.fitness, b.fitness);
        prop_assert_eq!(a.allocation, b.allocation);
    }

    #[test]
    fn prop_levels_are_pareto_sound(model in arb_city()) {
        let cache = CombinationCache::build(&model.city, 1024).unwrap();
        for level in cache.levels() {
            let combos: Vec<_> = level.iter().collect();
            for (i, a) in combos.iter().enumerate() {
                prop_assert_eq!(a.workers(), level.workers());
                for b in combos.iter().skip(i + 1) {
                    prop_assert!(!a.production.dominates(&b.production));
                    prop_assert!(!b.production.dominates(&a.production));
                }
            }
        }
    }

    #[test]
    fn prop_secondary_stats_are_deterministic(model in arb_city(), param in arb_monotone_param()) {
        let oracle = RecordingOracle {
            inner: &model,
            cache: RefCell::new(SecondaryCache::for_city(&model.city)),
        };
        optimize_exhaustive(&model.city, &oracle, &param).unwrap();
        prop_assert!(oracle.cache.borrow().entries() > 0);
    }
}
