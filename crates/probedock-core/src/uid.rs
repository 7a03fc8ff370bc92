//! Report UID resolution.
//!
//! A UID groups several test runs (e.g. sharded suites) into one report on the
//! server. It comes from `config.testRunUid` or, failing that, from the first
//! line of `<workspace>/uid`.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::Config;

/// Name of the UID file inside the workspace.
pub const UID_FILE: &str = "uid";

/// Path of the UID file, if a workspace is configured.
pub fn uid_file(config: &Config) -> Option<PathBuf> {
    config.workspace_dir().map(|workspace| workspace.join(UID_FILE))
}

/// Resolve the report UID for `config`.
pub fn load(config: &Config) -> Option<String> {
    if let Some(uid) = config.test_run_uid.as_ref().filter(|uid| !uid.is_empty()) {
        return Some(uid.clone());
    }

    let path = uid_file(config)?;
    if !path.is_file() {
        debug!(path = %path.display(), "no test run UID in workspace");
        return None;
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => content
            .lines()
            .next()
            .map(|line| line.trim_end_matches('\r').to_string())
            .filter(|line| !line.is_empty()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read test run UID");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace_config(dir: &TempDir) -> Config {
        Config {
            workspace: Some(dir.path().to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_uid() {
        assert_eq!(load(&Config::new()), None);
    }

    #[test]
    fn test_no_uid_file_in_workspace() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load(&workspace_config(&dir)), None);
    }

    #[test]
    fn test_uid_from_workspace() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("uid"), "foo").unwrap();
        assert_eq!(load(&workspace_config(&dir)), Some("foo".to_string()));
    }

    #[test]
    fn test_only_first_line() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("uid"), "baz\nbar\nfoo").unwrap();
        assert_eq!(load(&workspace_config(&dir)), Some("baz".to_string()));
    }

    #[test]
    fn test_config_uid_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("uid"), "yooayedee").unwrap();

        let mut config = workspace_config(&dir);
        config.test_run_uid = Some("yooeyedee".into());
        assert_eq!(load(&config), Some("yooeyedee".to_string()));

        config.workspace = None;
        assert_eq!(load(&config), Some("yooeyedee".to_string()));
    }

    #[test]
    fn test_empty_workspace_has_no_uid_file() {
        let mut config = Config::new();
        config.workspace = Some(PathBuf::new());
        assert_eq!(uid_file(&config), None);
        assert_eq!(load(&config), None);
    }
}
