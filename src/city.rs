use crate::consts::{DEFAULT_SPECIALIST_MIN_SIZE, MAX_CITY_SIZE, MAX_TILE_OUTPUT, MAX_WORK_TILES};
use crate::error::{GovResult, GovernorError};
use crate::types::{CityId, PrimaryOutput};
use fnv::FnvHasher;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// A tile a citizen may work, with its locally summable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkTile {
    /// Offset from the city centre.
    pub x: i8,
    pub y: i8,
    #[serde(flatten)]
    pub output: PrimaryOutput,
}

impl WorkTile {
    pub fn new(x: i8, y: i8, food: i32, shield: i32, trade: i32) -> Self {
        Self {
            x,
            y,
            output: PrimaryOutput::new(food, shield, trade),
        }
    }
}

// csv cannot drive `#[serde(flatten)]`, so rows are read flat.
#[derive(Deserialize)]
struct TileRow {
    x: i8,
    y: i8,
    food: i32,
    shield: i32,
    trade: i32,
}

fn default_specialist_min_size() -> u32 {
    DEFAULT_SPECIALIST_MIN_SIZE
}

/// Snapshot of everything the governor needs to know about a city. The
/// oracle holds the rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    #[serde(default)]
    pub name: String,
    /// Population; every citizen is a worker or a specialist.
    pub size: u32,
    /// Output of the always-worked centre tile.
    #[serde(default)]
    pub center: PrimaryOutput,
    /// Tiles available to workers. Their order defines tile indices.
    #[serde(default)]
    pub tiles: Vec<WorkTile>,
    #[serde(default = "default_specialist_min_size")]
    pub specialist_min_size: u32,
    /// Largest building bonus (percent) applied to a secondary stat. Only
    /// used to pre-size cache tables.
    #[serde(default)]
    pub bonus_percent: u32,
}

impl City {
    pub fn new(id: CityId, size: u32, center: PrimaryOutput, tiles: Vec<WorkTile>) -> Self {
        Self {
            id,
            name: String::new(),
            size,
            center,
            tiles,
            specialist_min_size: DEFAULT_SPECIALIST_MIN_SIZE,
            bonus_percent: 0,
        }
    }

    pub fn validate(&self) -> GovResult<()> {
        if self.size == 0 {
            return Err(GovernorError::Validation(format!(
                "City {} has size 0",
                self.id
            )));
        }
        if self.tiles.len() > MAX_WORK_TILES {
            return Err(GovernorError::Validation(format!(
                "City {} has {} work tiles, at most {} are supported",
                self.id,
                self.tiles.len(),
                MAX_WORK_TILES
            )));
        }
        if self.size > MAX_CITY_SIZE {
            return Err(GovernorError::Validation(format!(
                "City {} has size {}, at most {} is supported",
                self.id, self.size, MAX_CITY_SIZE
            )));
        }
        let outputs = std::iter::once(&self.center).chain(self.tiles.iter().map(|t| &t.output));
        for o in outputs {
            if [o.food, o.shield, o.trade]
                .iter()
                .any(|v| v.abs() > MAX_TILE_OUTPUT)
            {
                return Err(GovernorError::Validation(format!(
                    "City {} has a tile yielding {}/{}/{}, outputs are limited to +-{}",
                    self.id, o.food, o.shield, o.trade, MAX_TILE_OUTPUT
                )));
            }
        }
        Ok(())
    }

    /// Largest possible number of tile workers.
    pub fn max_workers(&self) -> u32 {
        (self.tiles.len() as u32).min(self.size)
    }

    /// Taxmen and scientists need a minimum city size; entertainers do not.
    pub fn supports_specialists(&self) -> bool {
        self.size >= self.specialist_min_size
    }

    /// Sum of all non-negative trade the city could ever work.
    pub fn trade_potential(&self) -> i32 {
        self.center.trade.max(0) + self.tiles.iter().map(|t| t.output.trade.max(0)).sum::<i32>()
    }

    /// Cheap content hash used to notice snapshots that changed without an
    /// invalidation.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FnvHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Reads work tiles from a CSV file with `x,y,food,shield,trade` columns.
    pub fn load_tiles_csv<P: AsRef<Path>>(path: P) -> GovResult<Vec<WorkTile>> {
        let file = File::open(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut tiles = Vec::new();
        for record in rdr.deserialize::<TileRow>() {
            let row = record?;
            tiles.push(WorkTile::new(row.x, row.y, row.food, row.shield, row.trade));
        }
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_workers_bounded_by_size_and_tiles() {
        let tiles = vec![WorkTile::new(1, 0, 2, 0, 0); 4];
        let city = City::new(1, 2, PrimaryOutput::default(), tiles.clone());
        assert_eq!(city.max_workers(), 2);
        let city = City::new(1, 9, PrimaryOutput::default(), tiles);
        assert_eq!(city.max_workers(), 4);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = City::new(1, 3, PrimaryOutput::new(2, 1, 1), vec![]);
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.tiles.push(WorkTile::new(0, 1, 1, 1, 1));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_rejects_oversized_outputs_and_population() {
        let city = City::new(1, 3, PrimaryOutput::default(), vec![WorkTile::new(1, 0, 1, 0, 1_000_000_000)]);
        assert!(matches!(city.validate(), Err(GovernorError::Validation(_))));

        let city = City::new(1, 3, PrimaryOutput::new(-5000, 0, 0), vec![]);
        assert!(city.validate().is_err());

        let city = City::new(1, MAX_CITY_SIZE + 1, PrimaryOutput::default(), vec![]);
        assert!(city.validate().is_err());

        let city = City::new(1, MAX_CITY_SIZE, PrimaryOutput::new(0, 0, MAX_TILE_OUTPUT), vec![]);
        assert!(city.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_city() {
        let city = City::new(1, 0, PrimaryOutput::default(), vec![]);
        assert!(city.validate().is_err());
    }
}
