//! Normalisation and lookups over scraped standings.
//!
//! Scraped values are best-effort: points that fail to parse count as zero and
//! missing season metadata falls back to a fixed round count. Nothing here fails.

use serde_json::Value;

use crate::types::{
    RacesDoneSource, RawDriverRecord, RawTeamRecord, SeasonMeta, StandingEntry, TeamEntry,
    DEFAULT_RACES_DONE,
};

/// Coerce a points-like value to a finite, non-negative float. Anything else is `0.0`.
pub fn coerce_points(raw: Option<&Value>) -> f64 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.replace('\u{a0}', " ").trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed {
        Some(p) if p.is_finite() && p >= 0.0 => p,
        _ => 0.0,
    }
}

/// Undo scraper artefacts: non-breaking spaces, padding, and the three-letter
/// driver code the results table glues onto the surname ("Lando NorrisNOR").
pub fn clean_driver_name(raw: &str) -> String {
    let name = raw.replace('\u{a0}', " ");
    let name = name.trim();

    let chars: Vec<char> = name.chars().collect();
    if chars.len() > 3 {
        let (head, code) = chars.split_at(chars.len() - 3);
        let glued = head.last().is_some_and(|c| c.is_lowercase());
        if glued && code.iter().all(|c| c.is_ascii_uppercase()) {
            return head.iter().collect::<String>().trim().to_string();
        }
    }
    name.to_string()
}

/// Render a scraped cell for display, whatever JSON type it arrived as.
pub fn value_text(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.replace('\u{a0}', " ").trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn clean_field(raw: Option<&String>) -> String {
    raw.map(|s| s.replace('\u{a0}', " ").trim().to_string())
        .unwrap_or_default()
}

pub fn normalize_drivers(raw: &[RawDriverRecord]) -> Vec<StandingEntry> {
    raw.iter()
        .map(|r| {
            let points = coerce_points(r.points.as_ref());
            if points == 0.0 && r.points.is_some() {
                tracing::trace!(driver = ?r.driver, raw = ?r.points, "points coerced to 0");
            }
            StandingEntry {
                driver_name: clean_driver_name(r.driver.as_deref().unwrap_or_default()),
                points,
                position: value_text(r.position.as_ref()),
                team: clean_field(r.team.as_ref()),
                nationality: clean_field(r.nationality.as_ref()),
            }
        })
        .collect()
}

pub fn normalize_teams(raw: &[RawTeamRecord]) -> Vec<TeamEntry> {
    raw.iter()
        .map(|r| TeamEntry {
            team: clean_field(r.team.as_ref()),
            points: coerce_points(r.points.as_ref()),
            position: value_text(r.position.as_ref()),
        })
        .collect()
}

/// Index of the first entry whose name contains `query`, ignoring case.
pub fn driver_index(standings: &[StandingEntry], query: &str) -> Option<usize> {
    let needle = query.to_lowercase();
    standings
        .iter()
        .position(|e| e.driver_name.to_lowercase().contains(&needle))
}

pub fn find_driver<'a>(standings: &'a [StandingEntry], query: &str) -> Option<&'a StandingEntry> {
    driver_index(standings, query).map(|i| &standings[i])
}

/// Entry with the most points; the earliest one wins a tie. `None` only for empty input.
pub fn find_leader(standings: &[StandingEntry]) -> Option<&StandingEntry> {
    let mut leader: Option<&StandingEntry> = None;
    for entry in standings {
        match leader {
            Some(best) if entry.points <= best.points => {}
            _ => leader = Some(entry),
        }
    }
    leader
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn round_count(v: &Value) -> Option<i64> {
    match v {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Races completed according to season metadata.
///
/// The first truthy of `races_done`, `completed_races`, `current_round` is used.
/// No truthy key at all means zero rounds. Missing metadata, or a value that is
/// not a non-negative whole number, falls back to [`DEFAULT_RACES_DONE`].
pub fn races_done_from_meta(meta: Option<&SeasonMeta>) -> (u32, RacesDoneSource) {
    let Some(meta) = meta else {
        return (DEFAULT_RACES_DONE, RacesDoneSource::Default);
    };

    let picked = [&meta.races_done, &meta.completed_races, &meta.current_round]
        .into_iter()
        .flatten()
        .find(|v| is_truthy(v));

    let Some(value) = picked else {
        return (0, RacesDoneSource::Metadata);
    };

    match round_count(value).and_then(|n| u32::try_from(n).ok()) {
        Some(n) => (n, RacesDoneSource::Metadata),
        None => {
            tracing::warn!(value = %value, "malformed races-done metadata; using default");
            (DEFAULT_RACES_DONE, RacesDoneSource::Default)
        }
    }
}
