use crate::parameter::{FactorTarget, Parameter};
use crate::types::{Allocation, Stat};
use serde::{Deserialize, Serialize};

/// Ranking key of a feasible allocation. Field order gives the lexicographic
/// (major, minor) comparison through the derived `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fitness {
    /// Weighted objective.
    pub major: i64,
    /// Tie-break: unweighted sum of all surpluses.
    pub minor: i64,
}

pub fn evaluate(param: &Parameter, alloc: &Allocation) -> Fitness {
    let mut major = 0i64;
    for stat in Stat::ALL {
        let surplus = alloc.surplus[stat] as i64;
        let factor = param.factor_for(stat) as i64;
        major += match param.factor_target {
            FactorTarget::Surplus => surplus * factor,
            FactorTarget::Shortfall => (param.minimal(stat) as i64 - surplus) * factor,
        };
    }
    if alloc.happy {
        major += param.happy_factor as i64;
    }

    Fitness {
        major,
        minor: alloc.surplus.sum(),
    }
}

/// Hard constraints: no disorder, happy when required, every surplus at or
/// above its minimum.
pub fn is_valid_result(param: &Parameter, alloc: &Allocation) -> bool {
    if alloc.disorder {
        return false;
    }
    if param.require_happy && !alloc.happy {
        return false;
    }
    Stat::ALL
        .iter()
        .all(|&stat| alloc.surplus[stat] >= param.minimal(stat))
}

/// One-sided feasibility probe on a combination's all-entertainer baseline.
///
/// Secondary surpluses are replaced by the parameter's own minimums and the
/// mood by the best case, so only the primary surpluses can fail the check.
/// Primary surpluses do not depend on the specialist split, so a rejection
/// here holds for every realization of the combination.
pub fn could_satisfy(param: &Parameter, baseline: &Allocation) -> bool {
    let mut probe = *baseline;
    for stat in Stat::ALL {
        if !stat.is_primary() {
            probe.surplus[stat] = param.minimal(stat);
        }
    }
    probe.disorder = false;
    probe.happy = true;
    is_valid_result(param, &probe)
}

/// True when more of any primary stat can never lower fitness or break a
/// constraint. Combination pruning only keeps the optimum for such
/// objectives.
pub fn is_monotone(param: &Parameter) -> bool {
    let factors_ok = match param.factor_target {
        FactorTarget::Surplus => param.factor.iter().all(|&f| f >= 0),
        FactorTarget::Shortfall => param.factor.iter().all(|&f| f <= 0),
    };
    factors_ok && param.happy_factor >= 0
}
