use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::error::ToolError;
use crate::store::StandingsStore;
use crate::tools::{ChampionshipOddsTool, StandingsTool, Tool, ToolOutput};

type ApiError = (StatusCode, Json<Value>);

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    odds: Arc<ChampionshipOddsTool>,
    standings: Arc<StandingsTool>,
    log_requests: bool,
}

impl AppState {
    pub fn new(cfg: &ServiceConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let store = StandingsStore::new(cfg.data_dir.clone());
        Self {
            odds: Arc::new(ChampionshipOddsTool::new(
                store.clone(),
                cfg.total_races,
                cfg.simulations,
                Arc::new(Mutex::new(rng)),
            )
            .with_max_simulations(cfg.max_simulations)),
            standings: Arc::new(StandingsTool::new(store)),
            log_requests: std::env::var("LOG_ODDS").ok().as_deref() == Some("1"),
        }
    }
}

fn status_for(err: &ToolError) -> StatusCode {
    match err {
        ToolError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        // unknown drivers come back as a normal answer; only empty standings reach here
        ToolError::Odds(_) => StatusCode::SERVICE_UNAVAILABLE,
        ToolError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn run<T: Tool>(tool: &T, args: Value, log: bool) -> Result<Json<ToolOutput>, ApiError> {
    if log {
        tracing::info!("recv tool={} args={}", T::NAME, args);
    }
    tool.call_json(args).map(Json).map_err(|e| {
        tracing::warn!("tool {} failed: {}", T::NAME, e);
        (status_for(&e), Json(json!({ "error": e.to_string() })))
    })
}

// ---------- Handlers ----------

/// Monte Carlo runs are CPU-bound; keep them off the async workers.
async fn championship_odds(
    State(state): State<AppState>,
    Json(args): Json<Value>,
) -> Result<Json<ToolOutput>, ApiError> {
    tokio::task::spawn_blocking(move || run(state.odds.as_ref(), args, state.log_requests))
        .await
        .map_err(|e| {
            tracing::error!("odds task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?
}

async fn f1_standings(
    State(state): State<AppState>,
    Json(args): Json<Value>,
) -> Result<Json<ToolOutput>, ApiError> {
    run(state.standings.as_ref(), args, state.log_requests)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools/championship_odds", post(championship_odds))
        .route("/tools/f1_standings", post(f1_standings))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn state_for(dir: &tempfile::TempDir) -> AppState {
        let cfg = ServiceConfig {
            data_dir: dir.path().to_path_buf(),
            seed: Some(9),
            ..Default::default()
        };
        AppState::new(&cfg)
    }

    #[tokio::test]
    async fn test_odds_handler_scenario_a() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("driver_standing.json"),
            r#"[{"DRIVER":"Alice","PTS.":"200"},{"DRIVER":"Bob","PTS.":"180"}]"#,
        )
        .unwrap();

        let state = state_for(&dir);
        let Json(out) = championship_odds(
            State(state),
            Json(json!({"driver_name": "Bob", "races_done": 22, "simulations": 0})),
        )
        .await
        .unwrap();
        assert_eq!(out.data["win_probability_pct"], json!(60.0));
    }

    #[tokio::test]
    async fn test_missing_data_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let err = f1_standings(State(state_for(&dir)), Json(json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.1 .0["error"].as_str().unwrap().contains("driver_standing.json"));
    }

    #[tokio::test]
    async fn test_unknown_driver_is_plain_answer() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("driver_standing.json"), r#"[{"DRIVER":"Alice","PTS.":"200"}]"#).unwrap();

        let Json(out) = championship_odds(State(state_for(&dir)), Json(json!({"driver_name": "senna"})))
            .await
            .unwrap();
        assert!(out.text.starts_with("Could not find 'senna'"));
    }

    #[tokio::test]
    async fn test_empty_standings_is_503() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("driver_standing.json"), "[]").unwrap();

        let err = championship_odds(State(state_for(&dir)), Json(json!({"driver_name": "bob"})))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_bad_args_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let err = championship_odds(State(state_for(&dir)), Json(json!({"driver_name": 5})))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }
}
