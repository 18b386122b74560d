mod common;

use citygov::api::{load_city_dir, optimize_batch, summarize};
use citygov::config::GovernorConfig;
use citygov::model::generate_city;
use citygov::oracle::CountingOracle;
use citygov::parameter::Parameter;
use citygov::types::Stat;
use citygov::verifier::Verifier;
use common::{market_town, one_tile_city, CityBuilder};
use tempfile::tempdir;

#[test]
fn test_batch_keeps_input_order_and_isolates_failures() {
    let models = vec![
        market_town(10),
        CityBuilder::new(11, 0).tile(1, 1, 1).build(),
        CityBuilder::new(12, 1).center(0, 0, 0).build(),
        market_town(13),
    ];

    let entries = optimize_batch(&models, &Parameter::default(), &GovernorConfig::default());

    let ids: Vec<_> = entries.iter().map(|e| e.city).collect();
    assert_eq!(ids, vec![10, 11, 12, 13]);
    assert!(entries[0].optimization.as_ref().unwrap().found_a_valid());
    assert!(entries[1].optimization.is_none());
    assert!(entries[1].error.is_some());
    assert!(!entries[2].optimization.as_ref().unwrap().found_a_valid());

    let summary = summarize(&entries);
    assert_eq!(summary.cities, 4);
    assert_eq!(summary.governed, 2);
    assert_eq!(summary.infeasible, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.oracle_calls > 0);
}

#[test]
fn test_batch_entries_serialize_camel_case() {
    let entries = optimize_batch(&[one_tile_city()], &Parameter::default(), &GovernorConfig::default());
    let json = serde_json::to_string(&summarize(&entries)).unwrap();
    assert!(json.contains("\"oracleCalls\""));
}

#[test]
fn test_load_city_dir_sorted_and_filtered() {
    let dir = tempdir().unwrap();
    market_town(2).save_to_file(dir.path().join("b.json")).unwrap();
    market_town(1).save_to_file(dir.path().join("a.json")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let models = load_city_dir(dir.path()).unwrap();
    let ids: Vec<_> = models.iter().map(|m| m.city.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_load_city_dir_missing() {
    let dir = tempdir().unwrap();
    assert!(load_city_dir(dir.path().join("nope")).is_err());
}

#[test]
fn test_verifier_agrees_on_market_town() {
    let model = market_town(3);
    let oracle = CountingOracle::new(&model);
    let mut param = Parameter::default();
    param.set_factor(Stat::Shield, 2);

    let report = Verifier::new(GovernorConfig::default())
        .verify(&model.city, &oracle, &param)
        .unwrap();

    assert!(report.monotone);
    assert!(report.matches());
    assert!(report.cached.found_a_valid());
    assert!(report.cached.stats.oracle_calls <= report.exhaustive_stats.oracle_calls);
}

#[test]
fn test_verifier_on_generated_cities() {
    let mut rng = fastrand::Rng::with_seed(42);
    let verifier = Verifier::new(GovernorConfig::default());
    for id in 1..=5 {
        let model = generate_city(&mut rng, id, 8, 4);
        let report = verifier
            .verify(&model.city, &model, &Parameter::default())
            .unwrap();
        assert!(report.matches(), "city {} diverged", id);
    }
}
