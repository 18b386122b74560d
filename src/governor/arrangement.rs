//! Tier 1: evaluated realizations of one combination, by specialist split.

use crate::types::Allocation;

/// Slots for every (scientists, taxmen) pair a combination can field.
/// Entertainers fill the remainder, so the pair identifies the realization.
#[derive(Debug, Clone)]
pub struct ArrangementCache {
    free_citizens: u32,
    max_scientists: u32,
    max_taxmen: u32,
    slots: Vec<Option<Allocation>>,
}

impl ArrangementCache {
    pub fn new(free_citizens: u32, max_scientists: u32, max_taxmen: u32) -> Self {
        let max_scientists = max_scientists.min(free_citizens);
        let max_taxmen = max_taxmen.min(free_citizens);
        let len = (max_scientists as usize + 1) * (max_taxmen as usize + 1);
        Self {
            free_citizens,
            max_scientists,
            max_taxmen,
            slots: vec![None; len],
        }
    }

    /// `None` for splits the combination cannot staff.
    #[inline(always)]
    fn slot(&self, scientists: u32, taxmen: u32) -> Option<usize> {
        if scientists > self.max_scientists
            || taxmen > self.max_taxmen
            || scientists + taxmen > self.free_citizens
        {
            return None;
        }
        Some(scientists as usize * (self.max_taxmen as usize + 1) + taxmen as usize)
    }

    pub fn get(&self, scientists: u32, taxmen: u32) -> Option<&Allocation> {
        self.slot(scientists, taxmen)
            .and_then(|idx| self.slots[idx].as_ref())
    }

    /// Returns false when the split is out of range and nothing was stored.
    pub fn store(&mut self, scientists: u32, taxmen: u32, alloc: Allocation) -> bool {
        match self.slot(scientists, taxmen) {
            Some(idx) => {
                self.slots[idx] = Some(alloc);
                true
            }
            None => false,
        }
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
