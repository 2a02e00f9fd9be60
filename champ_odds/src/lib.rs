//! Championship odds for the pit-wall assistant: standings lookups and a
//! Monte Carlo title-odds estimator over scraped F1 standings.

pub mod config;
pub mod error;
pub mod model;
pub mod sampling;
pub mod server;
pub mod standings;
pub mod store;
pub mod tools;
pub mod types;

pub use error::{DataError, OddsError, ToolError};
pub use model::estimate_championship_odds;
pub use sampling::weighted_sample_without_replacement;
pub use types::{ProbabilityReport, SeasonProgress, SimulationConfig, StandingEntry};
