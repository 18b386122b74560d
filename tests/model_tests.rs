mod common;

use citygov::city::City;
use citygov::error::GovernorError;
use citygov::model::{CityModel, Economy, ModelWorld};
use citygov::oracle::Oracle;
use citygov::types::{Assignment, Specialists, Stat, TileMask};
use common::{market_town, CityBuilder};
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_city_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("town.json");
    let mut model = market_town(4);
    model.city.name = "Riverside".to_string();

    model.save_to_file(&path).unwrap();
    let loaded = CityModel::load_from_file(&path).unwrap();

    assert_eq!(loaded, model);
    assert_eq!(loaded.city.fingerprint(), model.city.fingerprint());
}

#[test]
fn test_minimal_city_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiny.json");
    let mut f = File::create(&path).unwrap();
    writeln!(
        f,
        r#"{{"city": {{"id": 9, "size": 2, "tiles": [{{"x": 1, "y": 0, "food": 2, "shield": 0, "trade": 1}}]}}}}"#
    )
    .unwrap();

    let model = CityModel::load_from_file(&path).unwrap();
    assert_eq!(model.city.id, 9);
    assert_eq!(model.city.tiles[0].output.food, 2);
    assert_eq!(model.economy, Economy::default());
    assert!(!model.city.supports_specialists());
}

#[test]
fn test_bad_rates_are_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    let model = CityBuilder::new(1, 3)
        .tile(1, 1, 1)
        .economy(Economy {
            tax_rate: 80,
            lux_rate: 40,
            sci_rate: 0,
            ..Economy::default()
        })
        .build();
    model.save_to_file(&path).unwrap();

    let err = CityModel::load_from_file(&path).unwrap_err();
    assert!(matches!(err, GovernorError::Validation(_)));
}

#[test]
fn test_malformed_city_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        CityModel::load_from_file(&path),
        Err(GovernorError::Json(_))
    ));
}

#[test]
fn test_tiles_from_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiles.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "x,y,food,shield,trade").unwrap();
    writeln!(f, "1, 0, 2, 1, 0").unwrap();
    writeln!(f, "-1,1,1,0,2").unwrap();

    let tiles = City::load_tiles_csv(&path).unwrap();
    assert_eq!(tiles.len(), 2);
    assert_eq!((tiles[1].x, tiles[1].y), (-1, 1));
    assert_eq!(tiles[1].output.trade, 2);
}

#[test]
fn test_csv_with_bad_row_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiles.csv");
    std::fs::write(&path, "x,y,food,shield,trade\n1,0,two,1,0\n").unwrap();
    assert!(matches!(
        City::load_tiles_csv(&path),
        Err(GovernorError::Csv(_))
    ));
}

#[test]
fn test_corruption_reduces_trade_surplus() {
    let model = CityBuilder::new(1, 1)
        .center(2, 0, 10)
        .economy(Economy {
            corruption_percent: 30,
            ..Economy::default()
        })
        .build();
    let eval = model
        .compute(&Assignment {
            worked: TileMask::empty(),
            specialists: Specialists::new(1, 0, 0),
        })
        .unwrap();
    assert_eq!(eval.production[Stat::Trade], 10);
    assert_eq!(eval.surplus[Stat::Trade], 7);
    // 7 trade at 40/0/60: tax 2, sci 4.
    assert_eq!(eval.production[Stat::Gold], 2);
    assert_eq!(eval.production[Stat::Science], 4);
}

#[test]
fn test_world_dispatches_by_city() {
    let mut world = ModelWorld::new();
    world.insert(market_town(1));
    world.insert(CityBuilder::new(2, 1).tile(2, 1, 0).build());

    let single = Assignment {
        worked: TileMask::from_indices([0]),
        specialists: Specialists::default(),
    };
    assert_eq!(world.evaluate(2, &single).unwrap().surplus[Stat::Shield], 1);
    assert!(world.evaluate(1, &single).is_err());
    assert!(matches!(
        world.evaluate(3, &single),
        Err(GovernorError::Validation(_))
    ));

    world.remove(2);
    assert!(world.get(2).is_none());
}
