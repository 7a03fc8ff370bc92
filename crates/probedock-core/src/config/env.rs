//! Environment snapshot used to resolve configuration.

use std::path::{Path, PathBuf};

/// Project configuration file path override.
pub const ENV_CONFIG: &str = "PROBEDOCK_CONFIG";
/// Publish boolean override.
pub const ENV_PUBLISH: &str = "PROBEDOCK_PUBLISH";
/// Selected server name override.
pub const ENV_SERVER: &str = "PROBEDOCK_SERVER";
/// Workspace directory override.
pub const ENV_WORKSPACE: &str = "PROBEDOCK_WORKSPACE";
/// Print payload boolean override.
pub const ENV_PRINT_PAYLOAD: &str = "PROBEDOCK_PRINT_PAYLOAD";
/// Save payload boolean override.
pub const ENV_SAVE_PAYLOAD: &str = "PROBEDOCK_SAVE_PAYLOAD";
/// Test run UID override.
pub const ENV_TEST_REPORT_UID: &str = "PROBEDOCK_TEST_REPORT_UID";

/// Name of the project configuration file when `PROBEDOCK_CONFIG` is unset.
pub const PROJECT_CONFIG_FILE: &str = "probedock.yml";

/// Values read from the process environment.
///
/// Configuration loading never calls `std::env` directly; it reads this
/// snapshot instead, so tests can inject any combination of variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigEnv {
    /// Home directory containing `.probedock/config.yml`.
    pub home: Option<PathBuf>,

    /// Directory relative configuration paths are resolved against.
    pub working_dir: PathBuf,

    /// `PROBEDOCK_CONFIG`
    pub config_path: Option<String>,

    /// `PROBEDOCK_PUBLISH`
    pub publish: Option<String>,

    /// `PROBEDOCK_SERVER`
    pub server: Option<String>,

    /// `PROBEDOCK_WORKSPACE`
    pub workspace: Option<String>,

    /// `PROBEDOCK_PRINT_PAYLOAD`
    pub print_payload: Option<String>,

    /// `PROBEDOCK_SAVE_PAYLOAD`
    pub save_payload: Option<String>,

    /// `PROBEDOCK_TEST_REPORT_UID`
    pub test_run_uid: Option<String>,
}

impl ConfigEnv {
    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir);

        Self {
            home,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: std::env::var(ENV_CONFIG).ok(),
            publish: std::env::var(ENV_PUBLISH).ok(),
            server: std::env::var(ENV_SERVER).ok(),
            workspace: std::env::var(ENV_WORKSPACE).ok(),
            print_payload: std::env::var(ENV_PRINT_PAYLOAD).ok(),
            save_payload: std::env::var(ENV_SAVE_PAYLOAD).ok(),
            test_run_uid: std::env::var(ENV_TEST_REPORT_UID).ok(),
        }
    }

    /// An empty environment rooted at `working_dir`.
    pub fn isolated(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Default::default()
        }
    }

    /// Set the home directory.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Set the project configuration file path.
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// `$HOME/.probedock/config.yml`, if a home directory is known.
    pub fn home_config_file(&self) -> Option<PathBuf> {
        self.home
            .as_ref()
            .map(|home| home.join(".probedock").join("config.yml"))
    }

    /// The project configuration file: `PROBEDOCK_CONFIG` or `probedock.yml`.
    pub fn project_config_file(&self) -> PathBuf {
        let path = self.explicit_config_path().unwrap_or(PROJECT_CONFIG_FILE);
        self.resolve(path)
    }

    /// The project configuration file explicitly requested through
    /// `PROBEDOCK_CONFIG`, if any.
    pub fn explicit_config_file(&self) -> Option<PathBuf> {
        self.explicit_config_path().map(|p| self.resolve(p))
    }

    /// An empty `PROBEDOCK_CONFIG` counts as unset.
    fn explicit_config_path(&self) -> Option<&str> {
        self.config_path.as_deref().filter(|p| !p.is_empty())
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Parse a boolean environment variable.
///
/// `1`, `t`, `true`, `y` and `yes` (any case) are true; anything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "t" | "true" | "y" | "yes"
    )
}
