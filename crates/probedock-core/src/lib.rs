//! Test result collection and publishing for Probe Dock.
//!
//! This crate provides the pieces a test framework integration needs to
//! report results to a Probe Dock server:
//!
//! - layered YAML/environment configuration
//! - `@probedock(...)` annotations in test names
//! - stable test fingerprints
//! - test run aggregation and validation
//! - the `application/vnd.probedock.payload.v1+json` payload format
//! - authenticated upload to the API
//! - local dumps and report UIDs
//!
//! # Quick Start
//!
//! ```no_run
//! use probedock_core::{AddOptions, Client};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Client::from_env()?;
//! let config = client.load_config(None);
//! let mut run = client.start_test_run(&config);
//!
//! run.add(None, "login works @probedock(tag=auth)", true, 42, AddOptions::default());
//! run.add(
//!     None,
//!     "logout works",
//!     false,
//!     7,
//!     AddOptions::default().with_message("expected 204, got 500"),
//! );
//! run.end();
//!
//! let outcome = client.process(&run, &config).await?;
//! if !outcome.is_valid() {
//!     for error in &outcome.errors {
//!         eprintln!("{error}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `PROBEDOCK_CONFIG` | Project configuration file (default: `probedock.yml`) |
//! | `PROBEDOCK_PUBLISH` | Publish results (`1`/`t`/`true`/`y`/`yes`) |
//! | `PROBEDOCK_SERVER` | Name of the server to publish to |
//! | `PROBEDOCK_WORKSPACE` | Workspace directory |
//! | `PROBEDOCK_PRINT_PAYLOAD` | Print the payload |
//! | `PROBEDOCK_SAVE_PAYLOAD` | Save the payload to the workspace |
//! | `PROBEDOCK_TEST_REPORT_UID` | Report UID grouping several runs |

pub mod annotation;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod payload;
pub mod persistence;
pub mod publisher;
pub mod test_run;
pub mod uid;

// Re-export main types
pub use annotation::Annotation;
pub use api::{ApiClient, ApiRequest, USER_AGENT_VALUE};
pub use client::{Client, ProcessOutcome};
pub use config::{
    Config, ConfigEnv, PayloadOptions, ProjectConfig, ProjectOptions, ServerOptions,
};
pub use error::{ProbeDockError, ProbeDockResult};
pub use payload::{serialize_v1, PayloadV1, ReportRef, ResultV1, MEDIA_TYPE_V1};
pub use persistence::Snapshot;
pub use publisher::{Publisher, PUBLISH_PATH};
pub use test_run::{AddOptions, TestResult, TestRun};
