//! Local dump of a test run and its configuration.
//!
//! Meant for debugging and for publishing a run later (e.g. from another CI
//! step). The format is not versioned.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{ProbeDockError, ProbeDockResult};
use crate::test_run::TestRun;

/// A saved `{testRun, config}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub test_run: TestRun,
    pub config: Config,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    test_run: &'a TestRun,
    config: &'a Config,
}

/// Write `run` and `config` to `path`, replacing any existing file.
pub fn save(path: &Path, run: &TestRun, config: &Config) -> ProbeDockResult<()> {
    let json = serde_json::to_string(&SnapshotRef {
        test_run: run,
        config,
    })?;
    std::fs::write(path, json).map_err(|e| ProbeDockError::io(path, e))?;
    debug!(path = %path.display(), results = run.results.len(), "saved test run");
    Ok(())
}

/// Read a snapshot written by [`save`].
pub fn load(path: &Path) -> ProbeDockResult<Snapshot> {
    let raw = std::fs::read_to_string(path).map_err(|e| ProbeDockError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| ProbeDockError::Serialization {
        message: format!("invalid test run dump {}: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProjectConfig, ServerOptions};
    use crate::test_run::AddOptions;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test-run-dump.json");

        let mut servers = BTreeMap::new();
        servers.insert(
            "local".to_string(),
            ServerOptions {
                api_url: Some("http://localhost".into()),
                api_token: Some("t".into()),
                project_api_id: None,
            },
        );
        let config = Config {
            publish: Some(true),
            project: Some(ProjectConfig {
                api_id: Some("abc".into()),
                version: Some("1.0.0".into()),
                ..Default::default()
            }),
            servers: Some(servers),
            server: Some("local".into()),
            ..Default::default()
        };

        let mut run = TestRun::new(&config);
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        run.start_at(start);
        run.add(None, "it works @probedock(k1)", true, 12, AddOptions::default());
        run.add(None, "it fails", false, 3, AddOptions::default().with_message("boom"));
        run.end_at(start + Duration::milliseconds(250));

        save(&path, &run, &config).unwrap();
        let snapshot = load(&path).unwrap();

        assert_eq!(snapshot.config, config);
        assert_eq!(snapshot.test_run, run);
        assert_eq!(snapshot.test_run.start_time, Some(start));
        assert_eq!(snapshot.test_run.duration, Some(250));
        assert_eq!(snapshot.test_run.results[0].key.as_deref(), Some("k1"));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, "garbage").unwrap();

        save(&path, &TestRun::default(), &Config::new()).unwrap();
        assert_eq!(load(&path).unwrap().test_run, TestRun::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ProbeDockError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(load(&path), Err(ProbeDockError::Serialization { .. })));
    }
}
