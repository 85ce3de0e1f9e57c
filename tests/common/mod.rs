//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use rx_metrics::PipelineConfig;
use serde_json::{Value, json};
use tempfile::TempDir;

/// A temporary workspace with claims, reverts and pharmacies directories
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["claims", "reverts", "pharmacies"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    pub fn claims_dir(&self) -> PathBuf {
        self.dir.path().join("claims")
    }

    pub fn reverts_dir(&self) -> PathBuf {
        self.dir.path().join("reverts")
    }

    pub fn pharmacies_dir(&self) -> PathBuf {
        self.dir.path().join("pharmacies")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn write_claims(&self, name: &str, claims: &Value) {
        fs::write(self.claims_dir().join(name), claims.to_string()).unwrap();
    }

    pub fn write_raw_claims(&self, name: &str, content: &str) {
        fs::write(self.claims_dir().join(name), content).unwrap();
    }

    pub fn write_reverts(&self, name: &str, claim_ids: &[&str]) {
        let reverts: Vec<Value> = claim_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                json!({"id": format!("r{i}"), "claim_id": id, "timestamp": "2024-01-02T00:00:00"})
            })
            .collect();
        fs::write(self.reverts_dir().join(name), Value::Array(reverts).to_string()).unwrap();
    }

    pub fn write_pharmacies(&self, name: &str, rows: &[(&str, &str)]) {
        let mut csv = String::from("chain,npi\n");
        for (chain, npi) in rows {
            csv.push_str(&format!("{chain},{npi}\n"));
        }
        fs::write(self.pharmacies_dir().join(name), csv).unwrap();
    }

    /// Configuration pointing at this fixture, writing under `output/`
    pub fn config(&self, workers: usize) -> PipelineConfig {
        PipelineConfig::new(self.claims_dir(), self.reverts_dir(), self.pharmacies_dir())
            .with_workers(workers)
            .with_output_dir(self.output_dir())
    }

    pub fn read_output(&self, name: &str) -> Value {
        serde_json::from_slice(&fs::read(self.output_dir().join(name)).unwrap()).unwrap()
    }
}

/// A claim object as found in claims files
pub fn claim(id: &str, npi: &str, ndc: &str, price: f64, quantity: f64) -> Value {
    json!({
        "id": id,
        "npi": npi,
        "ndc": ndc,
        "price": price,
        "quantity": quantity,
        "timestamp": "2024-01-01T12:00:00"
    })
}
