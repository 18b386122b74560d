use super::{CityModel, Economy};
use crate::city::{City, WorkTile};
use crate::consts::DEFAULT_SPECIALIST_MIN_SIZE;
use crate::types::{CityId, PrimaryOutput};

/// Base (food, shield, trade) of the terrain kinds a synthetic city draws from.
const TERRAIN: [(i32, i32, i32); 8] = [
    (2, 0, 0), // grassland
    (2, 1, 0), // grassland with resources
    (1, 1, 0), // plains
    (1, 0, 2), // ocean
    (1, 2, 0), // forest
    (1, 0, 0), // hills
    (0, 1, 0), // desert
    (0, 1, 0), // mountains
];

/// Ring offsets around the centre, nearest first.
fn ring_positions() -> Vec<(i8, i8)> {
    let mut positions = Vec::new();
    for y in -3i8..=3 {
        for x in -3i8..=3 {
            if x == 0 && y == 0 {
                continue;
            }
            positions.push((x, y));
        }
    }
    positions.sort_by_key(|&(x, y)| (x as i32 * x as i32 + y as i32 * y as i32, y, x));
    positions
}

/// Builds a reproducible random city. `tile_count` is capped at the 48
/// positions within three tiles of the centre.
pub fn generate_city(rng: &mut fastrand::Rng, id: CityId, tile_count: usize, size: u32) -> CityModel {
    let positions = ring_positions();
    let tile_count = tile_count.min(positions.len());

    let tiles: Vec<WorkTile> = positions
        .into_iter()
        .take(tile_count)
        .map(|(x, y)| {
            let (mut food, shield, mut trade) = TERRAIN[rng.usize(..TERRAIN.len())];
            if rng.u8(..4) == 0 {
                food += 1; // irrigation
            }
            if trade == 0 && rng.bool() {
                trade += 1; // road or river
            }
            WorkTile::new(x, y, food, shield, trade)
        })
        .collect();

    let tax_rate = 10 * rng.i32(3..=6);
    let lux_rate = 10 * rng.i32(0..=2);
    let economy = Economy {
        tax_rate,
        lux_rate,
        sci_rate: 100 - tax_rate - lux_rate,
        corruption_percent: rng.i32(0..=30),
        shield_upkeep: rng.i32(0..=2),
        gold_upkeep: rng.i32(0..=3),
        ..Economy::default()
    };

    let mut city = City::new(
        id,
        size.max(1),
        PrimaryOutput::new(2 + rng.i32(0..=1), 1, 1 + rng.i32(0..=1)),
        tiles,
    );
    city.name = format!("Synthetic {}", id);
    city.specialist_min_size = DEFAULT_SPECIALIST_MIN_SIZE;

    CityModel::new(city, economy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        let a = generate_city(&mut fastrand::Rng::with_seed(7), 1, 12, 6);
        let b = generate_city(&mut fastrand::Rng::with_seed(7), 1, 12, 6);
        assert_eq!(a.city, b.city);
        assert_eq!(a.city.tiles.len(), 12);
    }

    #[test]
    fn test_positions_are_distinct() {
        let model = generate_city(&mut fastrand::Rng::with_seed(3), 2, 100, 10);
        assert_eq!(model.city.tiles.len(), 48);
        let mut seen: Vec<(i8, i8)> = model.city.tiles.iter().map(|t| (t.x, t.y)).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 48);
    }
}
