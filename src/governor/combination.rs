//! Tier 3: non-dominated tile combinations per worker count.

use super::arrangement::ArrangementCache;
use crate::city::{City, WorkTile};
use crate::error::InvariantError;
use crate::types::{Allocation, PrimaryOutput, TileMask};
use tracing::debug;

/// A set of worked tiles, independent of the specialist split. Owns the
/// realizations evaluated for it.
#[derive(Debug, Clone)]
pub struct Combination {
    pub worked: TileMask,
    /// Centre output plus the simple output of every worked tile.
    pub production: PrimaryOutput,
    pub(crate) all_entertainers: Option<Allocation>,
    pub(crate) arrangements: Option<ArrangementCache>,
}

impl Combination {
    /// Zero workers: only the city centre produces.
    pub fn root(center: PrimaryOutput) -> Self {
        Self {
            worked: TileMask::empty(),
            production: center,
            all_entertainers: None,
            arrangements: None,
        }
    }

    pub fn extend(&self, idx: usize, tile: &WorkTile) -> Self {
        Self {
            worked: self.worked.with(idx),
            production: self.production + tile.output,
            all_entertainers: None,
            arrangements: None,
        }
    }

    pub fn workers(&self) -> u32 {
        self.worked.len()
    }

    pub fn baseline(&self) -> Option<&Allocation> {
        self.all_entertainers.as_ref()
    }

    pub fn arrangements(&self) -> Option<&ArrangementCache> {
        self.arrangements.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// An existing combination is at least as good in every primary stat.
    Rejected,
    /// Stored in `slot` after reclaiming `evicted` dominated entries.
    Inserted { slot: usize, evicted: usize },
}

/// Fixed-capacity arena of combinations sharing one worker count. Freed
/// slots go on a free list and are reused before the arena grows.
#[derive(Debug, Clone)]
pub struct CombinationLevel {
    workers: u32,
    capacity: usize,
    slots: Vec<Option<Combination>>,
    free: Vec<usize>,
}

impl CombinationLevel {
    pub fn new(workers: u32, capacity: usize) -> Self {
        Self {
            workers,
            capacity,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn workers(&self) -> u32 {
        self.workers
    }

    /// Pareto filter. Rejects the candidate if anything here dominates it,
    /// otherwise evicts whatever it dominates and takes a slot.
    pub fn insert(&mut self, candidate: Combination) -> Result<Insertion, InvariantError> {
        let dominated = self
            .slots
            .iter()
            .flatten()
            .any(|c| c.production.dominates(&candidate.production));
        if dominated {
            return Ok(Insertion::Rejected);
        }

        let mut evicted = 0;
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let beaten = matches!(slot, Some(c) if candidate.production.dominates(&c.production));
            if beaten {
                *slot = None;
                self.free.push(idx);
                evicted += 1;
            }
        }

        let slot = if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(candidate);
            idx
        } else if self.slots.len() < self.capacity {
            self.slots.push(Some(candidate));
            self.slots.len() - 1
        } else {
            return Err(InvariantError::CapacityExhausted {
                workers: self.workers,
                capacity: self.capacity,
            });
        };

        Ok(Insertion::Inserted { slot, evicted })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combination> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combination> {
        self.slots.iter_mut().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every level from 0 to the city's maximum worker count.
#[derive(Debug, Clone)]
pub struct CombinationCache {
    levels: Vec<CombinationLevel>,
}

impl CombinationCache {
    /// Grows level k from level k-1 by adding each unused tile to each
    /// surviving combination, filtering every candidate through
    /// [`CombinationLevel::insert`].
    pub fn build(city: &City, capacity: usize) -> Result<Self, InvariantError> {
        let mut root = CombinationLevel::new(0, capacity.max(1));
        root.insert(Combination::root(city.center))?;

        let mut levels = vec![root];
        for workers in 1..=city.max_workers() {
            let mut next = CombinationLevel::new(workers, capacity);
            let mut rejected = 0usize;
            let mut evicted = 0usize;

            let prev = &levels[levels.len() - 1];
            for base in prev.iter() {
                for (idx, tile) in city.tiles.iter().enumerate() {
                    if base.worked.contains(idx) {
                        continue;
                    }
                    match next.insert(base.extend(idx, tile))? {
                        Insertion::Rejected => rejected += 1,
                        Insertion::Inserted { evicted: e, .. } => evicted += e,
                    }
                }
            }

            debug!(
                city = city.id,
                workers,
                kept = next.len(),
                rejected,
                evicted,
                "built combination level"
            );
            levels.push(next);
        }

        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[CombinationLevel] {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> &mut [CombinationLevel] {
        &mut self.levels
    }

    pub fn level(&self, workers: u32) -> Option<&CombinationLevel> {
        self.levels.get(workers as usize)
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(|l| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(food: i32, shield: i32, trade: i32) -> Combination {
        Combination::root(PrimaryOutput::new(food, shield, trade))
    }

    #[test]
    fn test_rejects_dominated_and_equal() {
        let mut level = CombinationLevel::new(1, 8);
        assert!(matches!(level.insert(combo(2, 2, 2)), Ok(Insertion::Inserted { .. })));
        assert_eq!(level.insert(combo(1, 2, 2)), Ok(Insertion::Rejected));
        assert_eq!(level.insert(combo(2, 2, 2)), Ok(Insertion::Rejected));
        assert_eq!(level.len(), 1);
    }

    #[test]
    fn test_evicts_dominated_and_reuses_slot() {
        let mut level = CombinationLevel::new(1, 8);
        level.insert(combo(3, 0, 0)).unwrap();
        level.insert(combo(0, 3, 0)).unwrap();
        assert_eq!(
            level.insert(combo(3, 1, 0)),
            Ok(Insertion::Inserted { slot: 0, evicted: 1 })
        );
        assert_eq!(level.len(), 2);
    }

    #[test]
    fn test_capacity_exhaustion_is_an_error() {
        let mut level = CombinationLevel::new(4, 2);
        level.insert(combo(3, 0, 0)).unwrap();
        level.insert(combo(0, 3, 0)).unwrap();
        assert_eq!(
            level.insert(combo(0, 0, 3)),
            Err(InvariantError::CapacityExhausted {
                workers: 4,
                capacity: 2
            })
        );
    }
}
