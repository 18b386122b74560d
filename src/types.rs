use crate::consts::{MAX_WORK_TILES, NUM_PRIMARY_STATS, NUM_STATS};
use crate::error::InvariantError;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Index, IndexMut};
use strum_macros::{Display, EnumIter, EnumString};

/// Identity of a city as assigned by the surrounding game.
pub type CityId = u32;

/// The six tracked city outputs. The first three are primary: they are plain
/// sums over worked tiles. The rest are derived from trade and specialists.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Food,
    Shield,
    Trade,
    Gold,
    Luxury,
    Science,
}

impl Stat {
    pub const ALL: [Stat; NUM_STATS] = [
        Stat::Food,
        Stat::Shield,
        Stat::Trade,
        Stat::Gold,
        Stat::Luxury,
        Stat::Science,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn is_primary(self) -> bool {
        self.index() < NUM_PRIMARY_STATS
    }
}

/// Specialist roles. Entertainers are always available; the other two need a
/// minimum city size.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Specialist {
    Entertainer,
    Taxman,
    Scientist,
}

impl Specialist {
    pub const ALL: [Specialist; 3] = [
        Specialist::Entertainer,
        Specialist::Taxman,
        Specialist::Scientist,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The secondary stat this role contributes to.
    pub fn output_stat(self) -> Stat {
        match self {
            Specialist::Entertainer => Stat::Luxury,
            Specialist::Taxman => Stat::Gold,
            Specialist::Scientist => Stat::Science,
        }
    }
}

/// One value per [`Stat`], indexable by stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats(pub [i32; NUM_STATS]);

impl Stats {
    /// Unweighted sum, widened so weighted objectives cannot overflow.
    pub fn sum(&self) -> i64 {
        self.0.iter().map(|&v| v as i64).sum()
    }
}

impl Index<Stat> for Stats {
    type Output = i32;

    #[inline(always)]
    fn index(&self, stat: Stat) -> &i32 {
        &self.0[stat.index()]
    }
}

impl IndexMut<Stat> for Stats {
    #[inline(always)]
    fn index_mut(&mut self, stat: Stat) -> &mut i32 {
        &mut self.0[stat.index()]
    }
}

/// Locally summable tile output. For a combination this is the lower bound on
/// the oracle's primary production.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimaryOutput {
    pub food: i32,
    pub shield: i32,
    pub trade: i32,
}

impl PrimaryOutput {
    pub fn new(food: i32, shield: i32, trade: i32) -> Self {
        Self {
            food,
            shield,
            trade,
        }
    }

    /// `self` is at least as good as `other` in every primary resource.
    #[inline(always)]
    pub fn dominates(&self, other: &PrimaryOutput) -> bool {
        self.food >= other.food && self.shield >= other.shield && self.trade >= other.trade
    }
}

impl Add for PrimaryOutput {
    type Output = PrimaryOutput;

    fn add(self, rhs: PrimaryOutput) -> PrimaryOutput {
        PrimaryOutput {
            food: self.food + rhs.food,
            shield: self.shield + rhs.shield,
            trade: self.trade + rhs.trade,
        }
    }
}

/// Set of worked tiles, indexed by position in [`crate::city::City::tiles`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileMask(u64);

impl TileMask {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut mask = Self::empty();
        for idx in indices {
            mask.insert(idx);
        }
        mask
    }

    #[inline(always)]
    pub fn contains(&self, idx: usize) -> bool {
        idx < MAX_WORK_TILES && (self.0 >> idx) & 1 == 1
    }

    /// Panics on an index beyond [`MAX_WORK_TILES`]; cities are validated
    /// against that bound before any mask is built.
    #[inline(always)]
    pub fn insert(&mut self, idx: usize) {
        assert!(idx < MAX_WORK_TILES, "tile index {} out of range", idx);
        self.0 |= 1 << idx;
    }

    #[inline(always)]
    pub fn with(mut self, idx: usize) -> Self {
        self.insert(idx);
        self
    }

    #[inline(always)]
    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Highest index in the mask plus one (0 for an empty mask).
    pub fn span(&self) -> usize {
        MAX_WORK_TILES - self.0.leading_zeros() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_WORK_TILES).filter(move |&i| self.contains(i))
    }
}

/// Specialist headcounts of one realization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Specialists {
    pub entertainers: u32,
    pub taxmen: u32,
    pub scientists: u32,
}

impl Specialists {
    pub fn new(entertainers: u32, taxmen: u32, scientists: u32) -> Self {
        Self {
            entertainers,
            taxmen,
            scientists,
        }
    }

    pub fn total(&self) -> u32 {
        self.entertainers + self.taxmen + self.scientists
    }

    pub fn count(&self, role: Specialist) -> u32 {
        match role {
            Specialist::Entertainer => self.entertainers,
            Specialist::Taxman => self.taxmen,
            Specialist::Scientist => self.scientists,
        }
    }
}

/// What the oracle is asked to evaluate: tiles worked plus specialist split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub worked: TileMask,
    pub specialists: Specialists,
}

impl Assignment {
    pub fn workers(&self) -> u32 {
        self.worked.len()
    }

    pub fn citizens(&self) -> u32 {
        self.workers() + self.specialists.total()
    }
}

/// A fully evaluated realization. Plain value: copied between cache tiers,
/// never shared. "Not yet computed" is expressed as `Option::None` by the
/// caches holding it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    pub worked: TileMask,
    pub specialists: Specialists,
    pub production: Stats,
    pub surplus: Stats,
    pub disorder: bool,
    pub happy: bool,
}

impl Allocation {
    pub fn workers(&self) -> u32 {
        self.worked.len()
    }

    pub fn citizens(&self) -> u32 {
        self.workers() + self.specialists.total()
    }

    /// `workers + entertainers + scientists + taxmen == population`.
    pub fn check_population(&self, population: u32) -> Result<(), InvariantError> {
        if self.citizens() == population {
            Ok(())
        } else {
            Err(InvariantError::PopulationMismatch {
                workers: self.workers(),
                specialists: self.specialists.total(),
                population,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_mask_basics() {
        let mask = TileMask::empty().with(0).with(3).with(63);
        assert_eq!(mask.len(), 3);
        assert!(mask.contains(3));
        assert!(!mask.contains(2));
        assert!(!mask.contains(64));
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0, 3, 63]);
        assert_eq!(mask.span(), 64);
        assert_eq!(TileMask::empty().span(), 0);
    }

    #[test]
    fn test_dominance_is_inclusive() {
        let a = PrimaryOutput::new(2, 1, 0);
        let b = PrimaryOutput::new(2, 1, 0);
        let c = PrimaryOutput::new(3, 0, 0);
        assert!(a.dominates(&b));
        assert!(b.dominates(&a));
        assert!(!a.dominates(&c));
        assert!(!c.dominates(&a));
    }

    #[test]
    fn test_population_check() {
        let alloc = Allocation {
            worked: TileMask::from_indices([0, 1]),
            specialists: Specialists::new(1, 0, 1),
            ..Default::default()
        };
        assert!(alloc.check_population(4).is_ok());
        assert_eq!(
            alloc.check_population(5),
            Err(InvariantError::PopulationMismatch {
                workers: 2,
                specialists: 2,
                population: 5
            })
        );
    }
}
