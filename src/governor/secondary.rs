//! Tier 2: secondary stats keyed by what they actually depend on.
//!
//! Gold, luxury and science are functions of (trade surplus, own role
//! headcount); mood is a function of (luxury, workers). Any two
//! combinations with the same trade share these entries, no matter which
//! tiles produced the trade.

use crate::city::City;
use crate::consts::{ESTIMATED_SPECIALIST_OUTPUT, NUM_SPECIALISTS, SECONDARY_INITIAL_ROWS};
use crate::error::InvariantError;
use crate::types::{Allocation, Specialist, Specialists, Stat};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryStat {
    pub production: i32,
    pub surplus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityMood {
    pub disorder: bool,
    pub happy: bool,
}

/// Row-major table addressed by (row, column). Columns are fixed; rows grow
/// on demand so an undersized estimate only costs a resize. Negative rows
/// and out-of-range columns are never cached.
#[derive(Debug, Clone)]
pub struct FlatTable<T> {
    cols: usize,
    cells: Vec<Option<T>>,
}

impl<T: Copy> FlatTable<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        let cols = cols.max(1);
        Self {
            cols,
            cells: vec![None; rows.max(1) * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len() / self.cols
    }

    #[inline(always)]
    fn flat_index(&self, row: i32, col: u32) -> Option<usize> {
        if row < 0 || col as usize >= self.cols {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    #[inline(always)]
    pub fn get(&self, row: i32, col: u32) -> Option<T> {
        let idx = self.flat_index(row, col)?;
        self.cells.get(idx).copied().flatten()
    }

    /// Stores `value` if the cell is empty and returns `None`; otherwise
    /// leaves the cell alone and returns what it already held.
    pub fn record(&mut self, row: i32, col: u32, value: T) -> Option<T> {
        let idx = self.flat_index(row, col)?;
        if idx >= self.cells.len() {
            let rows = (row as usize + 1).max(self.rows() * 2);
            debug!(from = self.rows(), to = rows, "growing secondary table");
            self.cells.resize(rows * self.cols, None);
        }
        match self.cells[idx] {
            Some(existing) => Some(existing),
            None => {
                self.cells[idx] = Some(value);
                None
            }
        }
    }

    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Per-city Tier 2 store, shared by every combination of that city.
#[derive(Debug, Clone)]
pub struct SecondaryCache {
    roles: [FlatTable<SecondaryStat>; NUM_SPECIALISTS],
    moods: FlatTable<CityMood>,
}

impl SecondaryCache {
    /// Pre-sizes the tables from the city's trade potential, size and bonus.
    pub fn for_city(city: &City) -> Self {
        let headcounts = city.size as usize + 1;
        let trade_rows = (city.trade_potential() as usize + 1).min(SECONDARY_INITIAL_ROWS);
        let luxury_bound = (city.trade_potential() + city.size as i32 * ESTIMATED_SPECIALIST_OUTPUT)
            * (100 + city.bonus_percent as i32)
            / 100;

        debug!(
            city = city.id,
            trade_rows,
            luxury_rows = luxury_bound + 1,
            headcounts,
            "sizing secondary cache"
        );

        Self {
            roles: [
                FlatTable::new(trade_rows, headcounts),
                FlatTable::new(trade_rows, headcounts),
                FlatTable::new(trade_rows, headcounts),
            ],
            moods: FlatTable::new(
                (luxury_bound.max(0) as usize + 1).min(SECONDARY_INITIAL_ROWS),
                headcounts,
            ),
        }
    }

    pub fn lookup(&self, role: Specialist, trade: i32, headcount: u32) -> Option<SecondaryStat> {
        self.roles[role.index()].get(trade, headcount)
    }

    pub fn lookup_mood(&self, luxury: i32, workers: u32) -> Option<CityMood> {
        self.moods.get(luxury, workers)
    }

    /// First write wins; a later write must agree with it.
    pub fn record(
        &mut self,
        role: Specialist,
        trade: i32,
        headcount: u32,
        fresh: SecondaryStat,
    ) -> Result<(), InvariantError> {
        match self.roles[role.index()].record(trade, headcount, fresh) {
            Some(cached) if cached != fresh => Err(InvariantError::SecondaryMismatch {
                role,
                trade,
                headcount,
                cached: (cached.production, cached.surplus),
                fresh: (fresh.production, fresh.surplus),
            }),
            _ => Ok(()),
        }
    }

    pub fn record_mood(
        &mut self,
        luxury: i32,
        workers: u32,
        fresh: CityMood,
    ) -> Result<(), InvariantError> {
        match self.moods.record(luxury, workers, fresh) {
            Some(cached) if cached != fresh => Err(InvariantError::MoodMismatch {
                luxury,
                workers,
                cached: (cached.disorder, cached.happy),
                fresh: (fresh.disorder, fresh.happy),
            }),
            _ => Ok(()),
        }
    }

    /// Records every secondary fact an oracle-computed allocation carries.
    pub fn record_allocation(&mut self, alloc: &Allocation) -> Result<(), InvariantError> {
        let trade = alloc.surplus[Stat::Trade];
        for role in Specialist::ALL {
            let stat = role.output_stat();
            self.record(
                role,
                trade,
                alloc.specialists.count(role),
                SecondaryStat {
                    production: alloc.production[stat],
                    surplus: alloc.surplus[stat],
                },
            )?;
        }
        self.record_mood(
            alloc.production[Stat::Luxury],
            alloc.workers(),
            CityMood {
                disorder: alloc.disorder,
                happy: alloc.happy,
            },
        )
    }

    /// Rebuilds a realization from the combination's all-entertainer
    /// baseline. Returns `None` unless every lookup hits.
    pub fn reconstruct(&self, baseline: &Allocation, specialists: Specialists) -> Option<Allocation> {
        let trade = baseline.surplus[Stat::Trade];
        let mut out = *baseline;
        out.specialists = specialists;

        for role in Specialist::ALL {
            let s = self.lookup(role, trade, specialists.count(role))?;
            let stat = role.output_stat();
            out.production[stat] = s.production;
            out.surplus[stat] = s.surplus;
        }

        let mood = self.lookup_mood(out.production[Stat::Luxury], out.workers())?;
        out.disorder = mood.disorder;
        out.happy = mood.happy;
        Some(out)
    }

    pub fn entries(&self) -> usize {
        self.roles.iter().map(|t| t.filled()).sum::<usize>() + self.moods.filled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::WorkTile;
    use crate::types::PrimaryOutput;

    #[test]
    fn test_table_grows_rows() {
        let mut t: FlatTable<i32> = FlatTable::new(2, 3);
        assert_eq!(t.rows(), 2);
        assert_eq!(t.record(9, 1, 5), None);
        assert!(t.rows() >= 10);
        assert_eq!(t.get(9, 1), Some(5));
        assert_eq!(t.get(9, 2), None);
    }

    #[test]
    fn test_table_ignores_uncacheable_keys() {
        let mut t: FlatTable<i32> = FlatTable::new(2, 3);
        assert_eq!(t.record(-1, 0, 5), None);
        assert_eq!(t.record(0, 3, 5), None);
        assert_eq!(t.get(-1, 0), None);
        assert_eq!(t.filled(), 0);
    }

    #[test]
    fn test_initial_rows_are_capped() {
        let tiles = vec![WorkTile::new(1, 0, 0, 0, 1000); 40];
        let city = City::new(1, 20, PrimaryOutput::default(), tiles);
        let mut cache = SecondaryCache::for_city(&city);
        assert!(cache.roles.iter().all(|t| t.rows() <= SECONDARY_INITIAL_ROWS));
        assert!(cache.moods.rows() <= SECONDARY_INITIAL_ROWS);

        // Keys past the initial size still cache.
        let stat = SecondaryStat { production: 7, surplus: 7 };
        cache.record(Specialist::Taxman, 30_000, 2, stat).unwrap();
        assert_eq!(cache.lookup(Specialist::Taxman, 30_000, 2), Some(stat));
    }

    #[test]
    fn test_second_write_must_agree() {
        let mut t: FlatTable<i32> = FlatTable::new(2, 3);
        assert_eq!(t.record(1, 1, 5), None);
        assert_eq!(t.record(1, 1, 6), Some(5));
        assert_eq!(t.get(1, 1), Some(5));
    }
}
