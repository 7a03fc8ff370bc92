//! High-level interface for test framework integrations.
//!
//! ```no_run
//! use probedock_core::{AddOptions, Client};
//!
//! # async fn example() -> probedock_core::ProbeDockResult<()> {
//! let client = Client::from_env()?;
//! let config = client.load_config(None);
//! let mut run = client.start_test_run(&config);
//!
//! run.add(None, "it works", true, 12, AddOptions::default());
//! run.end();
//!
//! let outcome = client.process(&run, &config).await?;
//! for error in &outcome.errors {
//!     eprintln!("{error}");
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::api::ApiClient;
use crate::config::{Config, ConfigEnv};
use crate::error::{ProbeDockError, ProbeDockResult};
use crate::payload::{self, PayloadV1};
use crate::persistence::{self, Snapshot};
use crate::publisher::Publisher;
use crate::test_run::TestRun;
use crate::uid;

/// Directory of the workspace the payload is dumped to.
pub const PAYLOAD_DIR: &str = "jasmine";

/// Name of the payload dump.
pub const PAYLOAD_FILE: &str = "payload.json";

/// What [`Client::process`] did with a test run.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutcome {
    /// Validation errors; when not empty nothing was serialized or sent.
    pub errors: Vec<String>,

    /// The serialized payload, if validation passed.
    pub payload: Option<PayloadV1>,

    /// Where the payload was saved, if it was.
    pub saved_to: Option<PathBuf>,

    /// Whether the payload was accepted by the server.
    pub published: bool,
}

impl ProcessOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads configuration, creates test runs and publishes them.
#[derive(Debug, Clone)]
pub struct Client {
    env: ConfigEnv,
    publisher: Publisher,
}

impl Client {
    pub fn new(env: ConfigEnv, publisher: Publisher) -> Self {
        Self { env, publisher }
    }

    /// Create a client reading the process environment.
    pub fn from_env() -> ProbeDockResult<Self> {
        Ok(Self::new(
            ConfigEnv::from_process(),
            Publisher::new(ApiClient::new()?),
        ))
    }

    /// Environment the configuration is resolved from.
    pub fn env(&self) -> &ConfigEnv {
        &self.env
    }

    /// Resolve the effective configuration.
    pub fn load_config(&self, overrides: Option<&Config>) -> Config {
        Config::resolve(overrides, &self.env)
    }

    /// Create and start a test run, attached to the report UID if one is
    /// configured.
    pub fn start_test_run(&self, config: &Config) -> TestRun {
        let mut run = TestRun::new(config);
        run.uid = uid::load(config);
        run.start();
        run
    }

    /// Validate, serialize, save and publish a finished test run.
    ///
    /// The test run is only validated when the configuration is valid. Any
    /// validation error stops the pipeline and is returned in the outcome;
    /// transport failures are returned as errors.
    pub async fn process(&self, run: &TestRun, config: &Config) -> ProbeDockResult<ProcessOutcome> {
        let mut outcome = ProcessOutcome::default();

        config.validate(&mut outcome.errors);
        if outcome.errors.is_empty() {
            run.validate(&mut outcome.errors);
        }
        if !outcome.errors.is_empty() {
            debug!(errors = outcome.errors.len(), "test run not processed");
            return Ok(outcome);
        }

        let payload = payload::serialize_v1(run);

        if config.print_payload() {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }

        if config.save_payload() {
            if let Some(workspace) = config.workspace_dir() {
                outcome.saved_to = Some(save_payload(workspace, &payload)?);
            }
        }

        if config.should_publish() {
            self.publisher
                .upload(&payload, &config.server_options())
                .await?;
            outcome.published = true;
        } else {
            info!("publishing disabled; payload not sent");
        }

        outcome.payload = Some(payload);
        Ok(outcome)
    }

    /// Dump a test run and its configuration to `path`.
    pub fn save_test_run(
        &self,
        path: &Path,
        run: &TestRun,
        config: &Config,
    ) -> ProbeDockResult<()> {
        persistence::save(path, run, config)
    }

    /// Read a dump written by [`Client::save_test_run`].
    pub fn load_test_run(&self, path: &Path) -> ProbeDockResult<Snapshot> {
        persistence::load(path)
    }
}

fn save_payload(workspace: &Path, payload: &PayloadV1) -> ProbeDockResult<PathBuf> {
    let dir = workspace.join(PAYLOAD_DIR);
    std::fs::create_dir_all(&dir).map_err(|e| ProbeDockError::io(&dir, e))?;

    let path = dir.join(PAYLOAD_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(payload)?)
        .map_err(|e| ProbeDockError::io(&path, e))?;

    debug!(path = %path.display(), "saved payload");
    Ok(path)
}
