//! Championship odds.
//!
//! Decision order: resolve driver and leader, stop if the season is over, stop
//! if the driver cannot mathematically catch the leader, then either the
//! linear bound (no simulations requested) or a Monte Carlo run over the
//! remaining races.

use rand::Rng;

use crate::error::OddsError;
use crate::sampling::weighted_sample_without_replacement;
use crate::standings::{driver_index, find_leader};
use crate::types::{
    OddsMethod, ProbabilityReport, SeasonProgress, SimulationConfig, StandingEntry,
    MAX_POINTS_PER_RACE, POINTS_SCHEME,
};

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Linear bound between "level on points" (100%) and "trailing by everything
/// still available" (0%). Not a probability model.
pub fn analytic_odds(driver_points: f64, leader_points: f64, max_points_available: f64) -> f64 {
    let diff = leader_points - driver_points;
    round2((1.0 - diff / max_points_available) * 100.0).clamp(0.0, 100.0)
}

/// Win credit the target earns from one finished season: `1/n` when it is one
/// of `n` drivers level on the top score, otherwise nothing.
pub fn championship_credit(final_points: &[f64], target: usize) -> f64 {
    let max = final_points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    match final_points.get(target) {
        Some(p) if *p == max => {
            let tied = final_points.iter().filter(|p| **p == max).count();
            1.0 / tied as f64
        }
        _ => 0.0,
    }
}

/// Run `simulations` completions of the season and return the target's summed
/// fractional wins.
///
/// Every simulation works on its own copy of `base_points`. Grid weights are
/// the simulation's running points + 1, recomputed before each race.
pub fn simulate_championship<R: Rng + ?Sized>(
    base_points: &[f64],
    target: usize,
    remaining_races: u32,
    simulations: u32,
    rng: &mut R,
) -> f64 {
    let grid: Vec<usize> = (0..base_points.len()).collect();
    let mut wins = 0.0;

    for _ in 0..simulations {
        let mut points = base_points.to_vec();
        for _ in 0..remaining_races {
            let weights: Vec<f64> = points.iter().map(|p| p + 1.0).collect();
            let order = weighted_sample_without_replacement(&grid, &weights, grid.len(), rng);
            for (award, driver) in POINTS_SCHEME.iter().zip(&order) {
                points[*driver] += award;
            }
        }
        wins += championship_credit(&points, target);
    }

    wins
}

/// Estimate `query`'s chance of taking the title from the current standings.
pub fn estimate_championship_odds<R: Rng + ?Sized>(
    standings: &[StandingEntry],
    query: &str,
    season: SeasonProgress,
    sim: SimulationConfig,
    rng: &mut R,
) -> Result<ProbabilityReport, OddsError> {
    let leader = find_leader(standings).ok_or(OddsError::EmptyStandings)?;
    let target = driver_index(standings, query).ok_or_else(|| OddsError::DriverNotFound {
        query: query.to_string(),
    })?;
    let driver = &standings[target];

    let remaining = season.remaining();
    let mut report = ProbabilityReport {
        driver: driver.driver_name.clone(),
        driver_points: driver.points,
        leader: leader.driver_name.clone(),
        leader_points: leader.points,
        races_done: season.races_done,
        races_done_source: season.source,
        remaining_races: remaining,
        simulations: 0,
        method: OddsMethod::SeasonComplete,
        win_probability_pct: 0.0,
        narrative: String::new(),
    };

    if remaining <= 0 {
        let champion = driver.points >= leader.points;
        tracing::debug!(driver = %driver.driver_name, champion, "season complete");
        report.win_probability_pct = if champion { 100.0 } else { 0.0 };
        report.narrative = if champion {
            format!(
                "{} is currently the champion with {} points (season complete).",
                driver.driver_name, driver.points
            )
        } else {
            format!(
                "The season is complete. {} finished with {} points; leader was {} with {} points.",
                driver.driver_name, driver.points, leader.driver_name, leader.points
            )
        };
        return Ok(report);
    }

    let max_points = remaining as f64 * MAX_POINTS_PER_RACE;

    if driver.points + max_points < leader.points {
        tracing::debug!(driver = %driver.driver_name, max_points, "mathematically eliminated");
        report.method = OddsMethod::Eliminated;
        report.narrative = format!(
            "{} has no mathematical chance of winning this season.",
            driver.driver_name
        );
        return Ok(report);
    }

    let header = format!(
        "{} currently has {} points.\nLeader: {} with {} points.\n",
        driver.driver_name, driver.points, leader.driver_name, leader.points
    );

    if sim.simulation_count == 0 {
        let odds = analytic_odds(driver.points, leader.points, max_points);
        tracing::debug!(driver = %driver.driver_name, odds, "analytic bound");
        report.method = OddsMethod::Analytic;
        report.win_probability_pct = odds;
        report.narrative = format!(
            "{header}Simple estimated chance of winning (no simulation): {odds}%\n\
             (Linear bound on the points gap, not a simulated probability.)"
        );
        return Ok(report);
    }

    // remaining > 0 here and a season never has more than u32::MAX rounds
    let races = u32::try_from(remaining).unwrap_or(u32::MAX);
    let base: Vec<f64> = standings.iter().map(|e| e.points).collect();
    let wins = simulate_championship(&base, target, races, sim.simulation_count, rng);
    let odds = round2(wins / f64::from(sim.simulation_count) * 100.0).clamp(0.0, 100.0);

    tracing::debug!(
        driver = %driver.driver_name,
        simulations = sim.simulation_count,
        remaining,
        wins,
        odds,
        "monte carlo complete"
    );

    report.method = OddsMethod::MonteCarlo;
    report.simulations = sim.simulation_count;
    report.win_probability_pct = odds;
    report.narrative = format!(
        "{header}Remaining races: {remaining}. Simulations run: {}.\n\
         Estimated chance of winning the championship: {odds}%\n\
         (This estimate uses a lightweight Monte Carlo simulation based on current points to model likely race finishes.)",
        sim.simulation_count
    );
    Ok(report)
}
