//! Oracle-only brute force over every tile subset and specialist split.
//! Exponential in the tile count; only meant for small cities.

use super::fitness;
use super::search::{Candidate, SearchStats};
use crate::city::City;
use crate::error::GovResult;
use crate::oracle::Oracle;
use crate::parameter::Parameter;
use crate::types::{Assignment, Specialists, TileMask};

/// Calls `visit` for every subset of `0..n` with at most `max_len` members.
fn for_each_subset<F>(n: usize, max_len: u32, mut visit: F) -> GovResult<()>
where
    F: FnMut(TileMask) -> GovResult<()>,
{
    fn rec<F>(start: usize, n: usize, max_len: u32, mask: TileMask, visit: &mut F) -> GovResult<()>
    where
        F: FnMut(TileMask) -> GovResult<()>,
    {
        visit(mask)?;
        if mask.len() == max_len {
            return Ok(());
        }
        for idx in start..n {
            rec(idx + 1, n, max_len, mask.with(idx), visit)?;
        }
        Ok(())
    }
    rec(0, n, max_len, TileMask::empty(), &mut visit)
}

pub fn optimize_exhaustive<O: Oracle>(
    city: &City,
    oracle: &O,
    param: &Parameter,
) -> GovResult<(Option<Candidate>, SearchStats)> {
    city.validate()?;
    let mut stats = SearchStats::default();
    let mut best: Option<Candidate> = None;

    for_each_subset(city.tiles.len(), city.max_workers(), |worked| {
        stats.combinations_visited += 1;
        let free = city.size - worked.len();
        let cap = if city.supports_specialists() { free } else { 0 };

        for scientists in 0..=cap {
            for taxmen in 0..=cap.min(free - scientists) {
                let assignment = Assignment {
                    worked,
                    specialists: Specialists::new(free - scientists - taxmen, taxmen, scientists),
                };
                stats.oracle_calls += 1;
                stats.realizations_evaluated += 1;
                let alloc = oracle
                    .evaluate(city.id, &assignment)?
                    .into_allocation(&assignment);

                if !fitness::is_valid_result(param, &alloc) {
                    continue;
                }
                let fit = fitness::evaluate(param, &alloc);
                if best.as_ref().map_or(true, |(_, current)| fit > *current) {
                    best = Some((alloc, fit));
                }
            }
        }
        Ok(())
    })?;

    Ok((best, stats))
}
