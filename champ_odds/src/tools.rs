//! Named operations the assistant can call. Each takes a typed input and
//! returns text for the conversation plus the structured data behind it.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{OddsError, Result, ToolError};
use crate::model::estimate_championship_odds;
use crate::standings::find_driver;
use crate::store::StandingsStore;
use crate::types::{SeasonProgress, SimulationConfig, DEFAULT_MAX_SIMULATIONS};

#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub text: String,
    pub data: Value,
}

impl ToolOutput {
    fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: Value::Null,
        }
    }
}

pub trait Tool {
    const NAME: &'static str;
    type Input: DeserializeOwned;

    fn call(&self, input: Self::Input) -> Result<ToolOutput>;

    /// Decode a JSON argument object and run the tool.
    fn call_json(&self, args: Value) -> Result<ToolOutput> {
        let input = serde_json::from_value(args).map_err(|e| ToolError::InvalidInput {
            tool: Self::NAME,
            reason: e.to_string(),
        })?;
        self.call(input)
    }
}

// ---------- championship_odds ----------

#[derive(Debug, Clone, Deserialize)]
pub struct OddsInput {
    pub driver_name: String,
    #[serde(default)]
    pub total_races: Option<u32>,
    #[serde(default)]
    pub races_done: Option<u32>,
    #[serde(default)]
    pub simulations: Option<i64>, // <= 0 disables simulation
}

pub struct ChampionshipOddsTool {
    store: StandingsStore,
    total_races: u32,
    simulations: u32,
    max_simulations: u32,
    rng: Arc<Mutex<StdRng>>, // only locked to fork a per-call generator
}

impl ChampionshipOddsTool {
    pub fn new(store: StandingsStore, total_races: u32, simulations: u32, rng: Arc<Mutex<StdRng>>) -> Self {
        Self {
            store,
            total_races,
            simulations,
            max_simulations: DEFAULT_MAX_SIMULATIONS,
            rng,
        }
    }

    pub fn with_max_simulations(mut self, max_simulations: u32) -> Self {
        self.max_simulations = max_simulations;
        self
    }

    fn fork_rng(&self) -> StdRng {
        let mut shared = self.rng.lock();
        StdRng::from_rng(&mut *shared).unwrap_or_else(|e| {
            tracing::warn!("rng fork failed ({}); using fresh entropy", e);
            StdRng::from_entropy()
        })
    }
}

impl Tool for ChampionshipOddsTool {
    const NAME: &'static str = "championship_odds";
    type Input = OddsInput;

    fn call(&self, input: OddsInput) -> Result<ToolOutput> {
        let standings = self.store.drivers()?;
        let (races_done, source) = self.store.races_done(input.races_done);
        let season = SeasonProgress {
            total_races: input.total_races.unwrap_or(self.total_races),
            races_done,
            source,
        };
        let mut sim = input
            .simulations
            .map(SimulationConfig::from_signed)
            .unwrap_or(SimulationConfig::new(self.simulations));
        if sim.simulation_count > self.max_simulations {
            tracing::warn!(
                "capping simulations at {} (requested {})",
                self.max_simulations,
                sim.simulation_count
            );
            sim.simulation_count = self.max_simulations;
        }

        let mut rng = self.fork_rng();
        let result = estimate_championship_odds(&standings, &input.driver_name, season, sim, &mut rng);

        match result {
            Ok(report) => {
                tracing::info!(
                    driver = %report.driver,
                    method = ?report.method,
                    odds = report.win_probability_pct,
                    "championship odds"
                );
                Ok(ToolOutput {
                    text: report.narrative.clone(),
                    data: json!(report),
                })
            }
            Err(e @ OddsError::DriverNotFound { .. }) => Ok(ToolOutput::message(e.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------- f1_standings ----------

fn default_query() -> String {
    "drivers".to_string()
}

fn default_top() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsInput {
    #[serde(default = "default_query")]
    pub query: String, // "drivers", "teams", or anything containing "all"
    #[serde(default)]
    pub driver_name: String,
    #[serde(default = "default_top")]
    pub top: usize,
}

impl Default for StandingsInput {
    fn default() -> Self {
        Self {
            query: default_query(),
            driver_name: String::new(),
            top: default_top(),
        }
    }
}

pub struct StandingsTool {
    store: StandingsStore,
}

impl StandingsTool {
    pub fn new(store: StandingsStore) -> Self {
        Self { store }
    }
}

impl Tool for StandingsTool {
    const NAME: &'static str = "f1_standings";
    type Input = StandingsInput;

    fn call(&self, input: StandingsInput) -> Result<ToolOutput> {
        let query = input.query.to_lowercase();

        if query == "teams" {
            let teams = self.store.teams()?;
            let shown = &teams[..teams.len().min(10)];
            let mut lines = vec!["F1 Constructors' Standings".to_string()];
            lines.extend(
                shown
                    .iter()
                    .map(|t| format!("{}. {} - {} pts", t.position, t.team, t.points)),
            );
            return Ok(ToolOutput {
                text: lines.join("\n"),
                data: json!(shown),
            });
        }

        let drivers = self.store.drivers()?;

        if !input.driver_name.is_empty() {
            let Some(d) = find_driver(&drivers, &input.driver_name) else {
                return Ok(ToolOutput::message(format!("No driver found for '{}'.", input.driver_name)));
            };
            return Ok(ToolOutput {
                text: format!(
                    "{}\n- Position: {}\n- Team: {}\n- Nationality: {}\n- Points: {}",
                    d.driver_name, d.position, d.team, d.nationality, d.points
                ),
                data: json!(d),
            });
        }

        let shown = if query.contains("all") {
            &drivers[..]
        } else {
            &drivers[..drivers.len().min(input.top)]
        };
        let mut lines = vec!["F1 Drivers' Standings".to_string()];
        lines.extend(
            shown
                .iter()
                .map(|d| format!("{}. {} ({}) - {} pts", d.position, d.driver_name, d.team, d.points)),
        );
        Ok(ToolOutput {
            text: lines.join("\n"),
            data: json!(shown),
        })
    }
}
