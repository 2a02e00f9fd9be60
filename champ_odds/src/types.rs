use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Points awarded to finishing positions 1..=10. Everyone else scores nothing.
pub const POINTS_SCHEME: [f64; 10] = [25.0, 18.0, 15.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0, 1.0];

/// Most points a single driver can take from one race.
pub const MAX_POINTS_PER_RACE: f64 = 25.0;

pub const DEFAULT_TOTAL_RACES: u32 = 24;
pub const DEFAULT_RACES_DONE: u32 = 18;
pub const DEFAULT_SIMULATIONS: u32 = 1000;
pub const DEFAULT_MAX_SIMULATIONS: u32 = 100_000;

// ---------- Scraped records (driver_standing.json / team_standing.json) ----------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDriverRecord {
    #[serde(rename = "POS.", default)]
    pub position: Option<Value>,
    #[serde(rename = "DRIVER", default)]
    pub driver: Option<String>,
    #[serde(rename = "NATIONALITY", default)]
    pub nationality: Option<String>,
    #[serde(rename = "TEAM", default)]
    pub team: Option<String>,
    #[serde(rename = "PTS.", default)]
    pub points: Option<Value>, // "250", 250, "250.5", missing, ...
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTeamRecord {
    #[serde(rename = "POS.", default)]
    pub position: Option<Value>,
    #[serde(rename = "TEAM", default)]
    pub team: Option<String>,
    #[serde(rename = "PTS.", default)]
    pub points: Option<Value>,
}

/// Scraped season metadata. Any of the three round counters may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonMeta {
    #[serde(default)]
    pub races_done: Option<Value>,
    #[serde(default)]
    pub completed_races: Option<Value>,
    #[serde(default)]
    pub current_round: Option<Value>,
}

// ---------- Normalised standings ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingEntry {
    pub driver_name: String,
    pub points: f64, // finite, >= 0
    pub position: String,
    pub team: String,
    pub nationality: String,
}

impl StandingEntry {
    pub fn new(driver_name: impl Into<String>, points: f64) -> Self {
        Self {
            driver_name: driver_name.into(),
            points,
            position: String::new(),
            team: String::new(),
            nationality: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamEntry {
    pub team: String,
    pub points: f64,
    pub position: String,
}

// ---------- Estimator inputs ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RacesDoneSource {
    Explicit,
    Metadata,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonProgress {
    pub total_races: u32,
    pub races_done: u32,
    pub source: RacesDoneSource,
}

impl SeasonProgress {
    pub fn new(total_races: u32, races_done: u32) -> Self {
        Self {
            total_races,
            races_done,
            source: RacesDoneSource::Explicit,
        }
    }

    /// Races still to run. Zero or negative once the season is over.
    pub fn remaining(&self) -> i64 {
        i64::from(self.total_races) - i64::from(self.races_done)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub simulation_count: u32, // 0 selects the analytic bound
}

impl SimulationConfig {
    pub fn new(simulation_count: u32) -> Self {
        Self { simulation_count }
    }

    /// Negative counts behave like 0.
    pub fn from_signed(simulation_count: i64) -> Self {
        let clamped = simulation_count.clamp(0, i64::from(u32::MAX));
        Self::new(u32::try_from(clamped).unwrap_or(u32::MAX))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATIONS)
    }
}

// ---------- Estimator output ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsMethod {
    /// Season finished; champion decided by points.
    SeasonComplete,
    /// Cannot catch the leader even winning every remaining race.
    Eliminated,
    /// Linear bound, no simulation.
    Analytic,
    MonteCarlo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityReport {
    pub driver: String,
    pub driver_points: f64,
    pub leader: String,
    pub leader_points: f64,
    pub races_done: u32,
    pub races_done_source: RacesDoneSource,
    pub remaining_races: i64,
    pub simulations: u32,
    pub method: OddsMethod,
    pub win_probability_pct: f64, // [0, 100], 2 decimals
    pub narrative: String,
}
