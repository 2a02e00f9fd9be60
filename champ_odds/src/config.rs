use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::PathBuf, str::FromStr};

use crate::types::{DEFAULT_MAX_SIMULATIONS, DEFAULT_SIMULATIONS, DEFAULT_TOTAL_RACES};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub total_races: u32,
    pub simulations: u32,
    pub max_simulations: u32, // cap on per-request simulation counts
    pub seed: Option<u64>, // fixed seed for reproducible odds
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("scraped_data"),
            port: 8080,
            total_races: DEFAULT_TOTAL_RACES,
            simulations: DEFAULT_SIMULATIONS,
            max_simulations: DEFAULT_MAX_SIMULATIONS,
            seed: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("ignoring {}={:?}: not a valid value", name, raw);
            None
        }
    }
}

impl ServiceConfig {
    pub fn load(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path).with_context(|| format!("failed to read config at {}", path))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config JSON in {}", path))
    }

    /// `CONFIG_PATH` (if set) then the individual environment overrides.
    pub fn from_env() -> Result<Self> {
        let base = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(&path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_overrides(|k| std::env::var(k).ok()))
    }

    /// Apply `DATA_DIR`, `PORT`, `TOTAL_RACES`, `SIMULATIONS`, `MAX_SIMULATIONS`,
    /// `ODDS_SEED` from `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(port) = parse_var("PORT", lookup("PORT")) {
            self.port = port;
        }
        if let Some(n) = parse_var("TOTAL_RACES", lookup("TOTAL_RACES")) {
            self.total_races = n;
        }
        if let Some(n) = parse_var("SIMULATIONS", lookup("SIMULATIONS")) {
            self.simulations = n;
        }
        if let Some(n) = parse_var("MAX_SIMULATIONS", lookup("MAX_SIMULATIONS")) {
            self.max_simulations = n;
        }
        if let Some(seed) = parse_var("ODDS_SEED", lookup("ODDS_SEED")) {
            self.seed = Some(seed);
        }
        self
    }
}
