//! End-to-end tests of the lowest-price and top-quantity reports

mod common;

use common::{Fixture, claim};
use rx_metrics::report::top_prescribed_quantities;
use rx_metrics::{FailurePolicy, run_pipeline};
use serde_json::{Value, json};

fn fixture() -> Fixture {
    let fx = Fixture::new();
    fx.write_pharmacies(
        "chains-a.csv",
        &[("Acme", "1"), ("Best", "2"), ("Corner", "3")],
    );
    fx.write_pharmacies("chains-b.csv", &[("Depot", "4"), ("Acme", "1")]);
    fx.write_reverts("reverts.json", &["r-1"]);

    fx.write_claims(
        "a.json",
        &json!([
            claim("a1", "1", "X", 30.0, 30.0),
            claim("a2", "2", "X", 60.0, 30.0),
            claim("a3", "3", "X", 15.0, 30.0),
            claim("a4", "4", "Y", 10.0, 90.0),
            claim("r-1", "3", "X", 1.0, 60.0),
            claim("bad", "1", "X", -1.0, 30.0)
        ]),
    );
    fx.write_claims(
        "b.json",
        &json!([
            claim("b1", "4", "X", 90.0, 90.0),
            claim("b2", "1", "Y", 20.0, 90.0),
            claim("b3", "9", "X", 5.0, 60.0),
            claim("b4", "2", "Y", 40.0, 30.0)
        ]),
    );
    fx
}

/// All three stages run in sequence and write their reports
#[test]
fn test_pipeline_writes_all_reports() {
    let fx = fixture();
    let summary = run_pipeline(&fx.config(2)).unwrap();

    assert_eq!(summary.metrics.files_processed, 2);
    assert_eq!(summary.metrics.stats.invalid, 1);
    for name in ["metrics.json", "lowest_price_chains.json", "top_prescribed_quantities.json"] {
        assert!(fx.output_dir().join(name).exists(), "{name} missing");
    }
    assert!(fx.output_dir().join("invalid_claims/a.json").exists());
}

/// Cheapest chains per drug, at most two, prices non-decreasing
#[test]
fn test_lowest_price_report() {
    let fx = fixture();
    run_pipeline(&fx.config(2)).unwrap();

    // X: Corner 0.5, Acme 1.0, Depot 1.0 (collapses into Acme), Best 2.0
    // Y: Acme 0.2222.., Depot 0.1111.., Best 1.3333..
    let report = fx.read_output("lowest_price_chains.json");
    assert_eq!(
        report,
        json!([
            {"ndc": "X", "chain": [
                {"name": "Corner", "avg_price": 0.5},
                {"name": "Acme", "avg_price": 1.0}
            ]},
            {"ndc": "Y", "chain": [
                {"name": "Depot", "avg_price": 10.0 / 90.0},
                {"name": "Acme", "avg_price": 20.0 / 90.0}
            ]}
        ])
    );

    for entry in report.as_array().unwrap() {
        let prices: Vec<f64> = entry["chain"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["avg_price"].as_f64().unwrap())
            .collect();
        assert!(prices.len() <= 2);
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }
}

/// Most prescribed quantities ignore pharmacies and reverts but not validation
#[test]
fn test_top_quantity_report() {
    let fx = fixture();
    let mut config = fx.config(2);
    config.quantity_top_n = 2;
    config.report_workers = 3;
    run_pipeline(&config).unwrap();

    // X: 30 x3 (the invalid row is dropped), 60 x2, 90 x1
    // Y: 90 x2, 30 x1
    let report = fx.read_output("top_prescribed_quantities.json");
    assert_eq!(
        report,
        json!([
            {"ndc": "X", "most_prescribed_quantity": [30.0, 60.0]},
            {"ndc": "Y", "most_prescribed_quantity": [90.0, 30.0]}
        ])
    );
}

/// The top-quantity stage honours its failure policy
#[test]
fn test_top_quantities_skip_failed_files() {
    let fx = fixture();
    fx.write_raw_claims("c.json", "not json");
    let files = vec![
        fx.claims_dir().join("a.json"),
        fx.claims_dir().join("b.json"),
        fx.claims_dir().join("c.json"),
    ];

    assert!(top_prescribed_quantities(&files, 2, 5, FailurePolicy::Abort).is_err());

    let report = top_prescribed_quantities(&files, 2, 5, FailurePolicy::SkipAndReport).unwrap();
    let drugs: Vec<_> = report.iter().map(|r| r.ndc.as_str()).collect();
    assert_eq!(drugs, vec!["X", "Y"]);
    assert!(report.iter().all(|r| r.most_prescribed_quantity.len() <= 5));
}

/// Empty inputs produce empty reports rather than errors
#[test]
fn test_empty_inputs() {
    let fx = Fixture::new();
    let summary = run_pipeline(&fx.config(1)).unwrap();

    assert!(summary.metrics.metrics.is_empty());
    assert!(summary.lowest_prices.is_empty());
    assert!(summary.top_quantities.is_empty());
    assert_eq!(fx.read_output("metrics.json"), Value::Array(Vec::new()));
}
