use serde::de::DeserializeOwned;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::DataError;
use crate::standings::{normalize_drivers, normalize_teams, races_done_from_meta};
use crate::types::{RacesDoneSource, RawDriverRecord, RawTeamRecord, SeasonMeta, StandingEntry, TeamEntry};

pub const DRIVER_STANDINGS_FILE: &str = "driver_standing.json";
pub const TEAM_STANDINGS_FILE: &str = "team_standing.json";
pub const SEASON_META_FILE: &str = "season_meta.json";

/// Scraped standings on disk. Files are re-read on every call since the
/// scrapers rewrite them in place.
#[derive(Debug, Clone)]
pub struct StandingsStore {
    data_dir: PathBuf,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let txt = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl StandingsStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn drivers(&self) -> Result<Vec<StandingEntry>, DataError> {
        let raw: Vec<RawDriverRecord> = read_json(&self.data_dir.join(DRIVER_STANDINGS_FILE))?;
        Ok(normalize_drivers(&raw))
    }

    pub fn teams(&self) -> Result<Vec<TeamEntry>, DataError> {
        let raw: Vec<RawTeamRecord> = read_json(&self.data_dir.join(TEAM_STANDINGS_FILE))?;
        Ok(normalize_teams(&raw))
    }

    /// Season metadata, or `None` when it is missing or unusable.
    pub fn season_meta(&self) -> Option<SeasonMeta> {
        match read_json(&self.data_dir.join(SEASON_META_FILE)) {
            Ok(meta) => Some(meta),
            Err(DataError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(dir = %self.data_dir.display(), "no season metadata");
                None
            }
            Err(e) => {
                tracing::warn!("ignoring season metadata: {}", e);
                None
            }
        }
    }

    /// `explicit` if given, otherwise whatever the season metadata says.
    pub fn races_done(&self, explicit: Option<u32>) -> (u32, RacesDoneSource) {
        match explicit {
            Some(n) => (n, RacesDoneSource::Explicit),
            None => races_done_from_meta(self.season_meta().as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_reads_and_normalises_drivers() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            DRIVER_STANDINGS_FILE,
            r#"[{"POS.":"1","DRIVER":"Oscar PiastriPIA","NATIONALITY":"AUS","TEAM":"McLaren","PTS.":"324"},
                {"POS.":"2","DRIVER":"Lando Norris","TEAM":"McLaren","PTS.":"bad"}]"#,
        );
        let store = StandingsStore::new(dir.path());
        let drivers = store.drivers().unwrap();
        assert_eq!(drivers.len(), 2);
        assert_eq!(drivers[0].driver_name, "Oscar Piastri");
        assert_eq!(drivers[0].points, 324.0);
        assert_eq!(drivers[1].points, 0.0);
        assert_eq!(drivers[1].nationality, "");
    }

    #[test]
    fn test_missing_standings_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StandingsStore::new(dir.path()).drivers().unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn test_garbage_standings_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), TEAM_STANDINGS_FILE, "<html>");
        let err = StandingsStore::new(dir.path()).teams().unwrap_err();
        assert!(matches!(err, DataError::Json { .. }));
    }

    #[test]
    fn test_races_done_sources() {
        let dir = tempfile::tempdir().unwrap();
        let store = StandingsStore::new(dir.path());

        assert_eq!(store.races_done(Some(5)), (5, RacesDoneSource::Explicit));
        assert_eq!(store.races_done(None), (18, RacesDoneSource::Default));

        write(dir.path(), SEASON_META_FILE, "{not json");
        assert_eq!(store.races_done(None), (18, RacesDoneSource::Default));

        write(dir.path(), SEASON_META_FILE, r#"{"current_round": 21}"#);
        assert_eq!(store.races_done(None), (21, RacesDoneSource::Metadata));
    }
}
