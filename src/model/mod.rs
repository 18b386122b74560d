//! A deterministic city economy used as the reference [`Oracle`].
//!
//! Gold, luxury and science depend only on (trade surplus, own specialist
//! headcount) and mood only on (luxury, workers), which is what the
//! governor's secondary cache relies on.

pub mod generate;
pub mod happiness;

pub use self::generate::generate_city;

use crate::city::City;
use crate::error::{GovResult, GovernorError, InvariantError};
use crate::oracle::{Evaluation, Oracle};
use crate::types::{Assignment, CityId, PrimaryOutput, Stat, Stats};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Economy {
    pub food_per_citizen: i32,
    pub shield_upkeep: i32,
    pub gold_upkeep: i32,
    pub corruption_percent: i32,

    // Trade split, in percent. Rounding remainders are lost.
    pub tax_rate: i32,
    pub lux_rate: i32,
    pub sci_rate: i32,

    // Building bonuses, in percent.
    pub gold_bonus: i32,
    pub lux_bonus: i32,
    pub sci_bonus: i32,

    pub content_base: u32,
    pub happy_cost: i32,
    pub celebrate_size: u32,

    pub entertainer_output: i32,
    pub taxman_output: i32,
    pub scientist_output: i32,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            food_per_citizen: 2,
            shield_upkeep: 0,
            gold_upkeep: 0,
            corruption_percent: 0,
            tax_rate: 40,
            lux_rate: 0,
            sci_rate: 60,
            gold_bonus: 0,
            lux_bonus: 0,
            sci_bonus: 0,
            content_base: 4,
            happy_cost: 2,
            celebrate_size: 3,
            entertainer_output: 2,
            taxman_output: 3,
            scientist_output: 3,
        }
    }
}

/// Trade shares after the rate split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradeShares {
    pub tax: i32,
    pub lux: i32,
    pub sci: i32,
}

impl Economy {
    pub fn validate(&self) -> GovResult<()> {
        let rates = [self.tax_rate, self.lux_rate, self.sci_rate];
        if rates.iter().any(|&r| r < 0) || rates.iter().sum::<i32>() > 100 {
            return Err(GovernorError::Validation(format!(
                "Rates tax={} lux={} sci={} must be non-negative and sum to at most 100",
                self.tax_rate, self.lux_rate, self.sci_rate
            )));
        }
        if !(0..=100).contains(&self.corruption_percent) {
            return Err(GovernorError::Validation(format!(
                "Corruption {}% is outside 0..=100",
                self.corruption_percent
            )));
        }
        Ok(())
    }

    /// Each share is rounded down on its own, so every share is monotone in
    /// trade.
    pub fn split_trade(&self, net_trade: i32) -> TradeShares {
        let net = net_trade.max(0);
        TradeShares {
            tax: net * self.tax_rate / 100,
            lux: net * self.lux_rate / 100,
            sci: net * self.sci_rate / 100,
        }
    }

    pub fn max_bonus(&self) -> i32 {
        self.gold_bonus.max(self.lux_bonus).max(self.sci_bonus).max(0)
    }
}

#[inline(always)]
fn with_bonus(base: i32, bonus_percent: i32) -> i32 {
    base * (100 + bonus_percent) / 100
}

/// One city plus its economy. Serialised form is the `--city` file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityModel {
    pub city: City,
    #[serde(default)]
    pub economy: Economy,
}

impl CityModel {
    pub fn new(mut city: City, economy: Economy) -> Self {
        city.bonus_percent = economy.max_bonus() as u32;
        Self { city, economy }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GovResult<Self> {
        let content = fs::read_to_string(path)?;
        let model: CityModel = serde_json::from_str(&content)?;
        model.economy.validate()?;
        model.city.validate()?;
        Ok(CityModel::new(model.city, model.economy))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GovResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Evaluates `assignment` against this city's current state.
    pub fn compute(&self, assignment: &Assignment) -> GovResult<Evaluation> {
        let city = &self.city;
        let eco = &self.economy;

        if assignment.worked.span() > city.tiles.len() {
            return Err(GovernorError::Validation(format!(
                "City {} has {} tiles, assignment works tile {}",
                city.id,
                city.tiles.len(),
                assignment.worked.span() - 1
            )));
        }
        if assignment.citizens() != city.size {
            return Err(InvariantError::PopulationMismatch {
                workers: assignment.workers(),
                specialists: assignment.specialists.total(),
                population: city.size,
            }
            .into());
        }

        let primary = assignment
            .worked
            .iter()
            .fold(city.center, |acc: PrimaryOutput, idx| acc + city.tiles[idx].output);

        let mut production = Stats::default();
        let mut surplus = Stats::default();

        production[Stat::Food] = primary.food;
        surplus[Stat::Food] = primary.food - eco.food_per_citizen * city.size as i32;

        production[Stat::Shield] = primary.shield;
        surplus[Stat::Shield] = primary.shield - eco.shield_upkeep;

        let corruption = primary.trade.max(0) * eco.corruption_percent / 100;
        production[Stat::Trade] = primary.trade;
        surplus[Stat::Trade] = primary.trade - corruption;

        let shares = eco.split_trade(surplus[Stat::Trade]);
        let spec = assignment.specialists;

        let gold = with_bonus(
            shares.tax + spec.taxmen as i32 * eco.taxman_output,
            eco.gold_bonus,
        );
        let lux = with_bonus(
            shares.lux + spec.entertainers as i32 * eco.entertainer_output,
            eco.lux_bonus,
        );
        let sci = with_bonus(
            shares.sci + spec.scientists as i32 * eco.scientist_output,
            eco.sci_bonus,
        );

        production[Stat::Gold] = gold;
        surplus[Stat::Gold] = gold - eco.gold_upkeep;
        production[Stat::Luxury] = lux;
        surplus[Stat::Luxury] = lux;
        production[Stat::Science] = sci;
        surplus[Stat::Science] = sci;

        let mood = happiness::assess(city.size, assignment.workers(), lux, eco);

        Ok(Evaluation {
            production,
            surplus,
            disorder: mood.disorder,
            happy: mood.happy,
        })
    }
}

impl Oracle for CityModel {
    fn evaluate(&self, city: CityId, assignment: &Assignment) -> GovResult<Evaluation> {
        if city != self.city.id {
            return Err(GovernorError::Validation(format!(
                "Model of city {} asked to evaluate city {}",
                self.city.id, city
            )));
        }
        self.compute(assignment)
    }
}

/// Several cities behind one oracle.
#[derive(Debug, Clone, Default)]
pub struct ModelWorld {
    cities: FnvHashMap<CityId, CityModel>,
}

impl ModelWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: CityModel) -> Option<CityModel> {
        self.cities.insert(model.city.id, model)
    }

    pub fn remove(&mut self, city: CityId) -> Option<CityModel> {
        self.cities.remove(&city)
    }

    pub fn get(&self, city: CityId) -> Option<&CityModel> {
        self.cities.get(&city)
    }
}

impl Oracle for ModelWorld {
    fn evaluate(&self, city: CityId, assignment: &Assignment) -> GovResult<Evaluation> {
        self.cities
            .get(&city)
            .ok_or_else(|| GovernorError::Validation(format!("Unknown city {}", city)))?
            .compute(assignment)
    }
}
