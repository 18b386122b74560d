#![allow(dead_code)]

use citygov::city::{City, WorkTile};
use citygov::error::GovResult;
use citygov::governor::Applier;
use citygov::model::{CityModel, Economy};
use citygov::oracle::{Evaluation, Oracle};
use citygov::types::{Allocation, Assignment, CityId, PrimaryOutput, Stat};

/// Builder for small hand-made cities.
pub struct CityBuilder {
    city: City,
    economy: Economy,
}

impl CityBuilder {
    pub fn new(id: CityId, size: u32) -> Self {
        Self {
            city: City::new(id, size, PrimaryOutput::default(), Vec::new()),
            economy: Economy::default(),
        }
    }

    pub fn center(mut self, food: i32, shield: i32, trade: i32) -> Self {
        self.city.center = PrimaryOutput::new(food, shield, trade);
        self
    }

    /// Tiles are laid out along the x axis in insertion order.
    pub fn tile(mut self, food: i32, shield: i32, trade: i32) -> Self {
        let x = self.city.tiles.len() as i8 + 1;
        self.city.tiles.push(WorkTile::new(x, 0, food, shield, trade));
        self
    }

    pub fn specialist_min_size(mut self, size: u32) -> Self {
        self.city.specialist_min_size = size;
        self
    }

    pub fn economy(mut self, economy: Economy) -> Self {
        self.economy = economy;
        self
    }

    pub fn build(self) -> CityModel {
        CityModel::new(self.city, self.economy)
    }
}

/// Population 1, one tile yielding 2 food and 1 shield.
pub fn one_tile_city() -> CityModel {
    CityBuilder::new(1, 1).tile(2, 1, 0).build()
}

/// Size 5 with specialists enabled. Four workers and one specialist is the
/// largest workforce that avoids disorder.
pub fn market_town(id: CityId) -> CityModel {
    CityBuilder::new(id, 5)
        .center(2, 1, 2)
        .tile(3, 0, 1)
        .tile(2, 1, 1)
        .tile(2, 0, 2)
        .tile(1, 2, 0)
        .tile(1, 0, 3)
        .tile(0, 3, 0)
        .tile(2, 2, 0)
        .specialist_min_size(4)
        .build()
}

/// Wraps a model and adds one gold whenever tile 0 is worked, so gold no
/// longer depends on trade alone.
pub struct TileBiasedOracle {
    pub inner: CityModel,
}

impl Oracle for TileBiasedOracle {
    fn evaluate(&self, city: CityId, assignment: &Assignment) -> GovResult<Evaluation> {
        let mut eval = self.inner.evaluate(city, assignment)?;
        if assignment.worked.contains(0) {
            eval.production[Stat::Gold] += 1;
            eval.surplus[Stat::Gold] += 1;
        }
        Ok(eval)
    }
}

/// Wraps a model and flips the celebration flag whenever tile 0 is worked,
/// so mood no longer depends on luxury and workers alone.
pub struct MoodBiasedOracle {
    pub inner: CityModel,
}

impl Oracle for MoodBiasedOracle {
    fn evaluate(&self, city: CityId, assignment: &Assignment) -> GovResult<Evaluation> {
        let mut eval = self.inner.evaluate(city, assignment)?;
        if assignment.worked.contains(0) {
            eval.happy = !eval.happy;
        }
        Ok(eval)
    }
}

/// Records applied allocations and answers with a fixed verdict.
pub struct RecordingApplier {
    pub accept: bool,
    pub applied: Vec<(CityId, Allocation)>,
}

impl RecordingApplier {
    pub fn new(accept: bool) -> Self {
        Self {
            accept,
            applied: Vec::new(),
        }
    }
}

impl Applier for RecordingApplier {
    fn apply(&mut self, city: CityId, allocation: &Allocation) -> bool {
        self.applied.push((city, *allocation));
        self.accept
    }
}
