//! Layered configuration.
//!
//! The effective configuration is built from, in increasing precedence:
//!
//! 1. built-in defaults (`publish: true`)
//! 2. `$HOME/.probedock/config.yml`
//! 3. the project file (`$PROBEDOCK_CONFIG`, or `probedock.yml`)
//! 4. overrides passed by the caller
//! 5. environment variables
//!
//! Scalars from a later layer replace earlier ones, objects are merged
//! recursively and lists (`tags`, `tickets`) are unioned. `testRunUid` is
//! dropped from the file layers: it can only come from overrides, the
//! environment or the workspace.
//!
//! ```yaml
//! project:
//!   apiId: kvr0r1t0ydqx
//!   version: 1.0.0
//!   tags: [api]
//! servers:
//!   trial:
//!     apiUrl: https://trial.probedock.io/api
//!     apiToken: secret
//! server: trial
//! ```

mod de;
pub mod env;
pub mod merge;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

pub use env::{parse_bool, ConfigEnv};
use merge::deep_merge;

const TEST_RUN_UID_KEY: &str = "testRunUid";

/// Effective Probe Dock configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Whether results are sent to the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,

    /// Project identity and result defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectConfig>,

    /// Known servers by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<BTreeMap<String, ServerOptions>>,

    /// Name of the server results are published to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Local directory for payload dumps and the report UID file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PathBuf>,

    /// Payload debugging options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadOptions>,

    /// Groups several test runs into one report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_run_uid: Option<String>,

    /// `PROBEDOCK_CONFIG` pointed at a file that does not exist.
    #[serde(skip)]
    pub(crate) missing_config_file: Option<PathBuf>,
}

/// `project` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(
        default,
        deserialize_with = "de::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    /// Default category of results.
    #[serde(
        default,
        deserialize_with = "de::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,

    /// Tags added to every result.
    #[serde(
        default,
        deserialize_with = "de::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    /// Tickets added to every result.
    #[serde(
        default,
        deserialize_with = "de::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tickets: Vec<String>,
}

/// Connection options of one server (`servers.<name>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    /// Root of the Probe Dock API.
    #[serde(
        default,
        deserialize_with = "de::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_url: Option<String>,

    /// Bearer token.
    #[serde(
        default,
        deserialize_with = "de::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_token: Option<String>,

    /// Overrides `project.apiId` when this server is selected.
    #[serde(
        default,
        deserialize_with = "de::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_api_id: Option<String>,
}

/// `payload` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save: Option<bool>,
}

/// Project fields as seen by a test run, after applying the selected server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectOptions {
    pub api_id: Option<String>,
    pub version: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub tickets: Vec<String>,
}

impl Config {
    /// An empty configuration (no layer applied).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the effective configuration from all layers.
    pub fn resolve(overrides: Option<&Config>, env: &ConfigEnv) -> Self {
        let mut merged = json!({ "publish": true, "project": {}, "payload": {} });

        let files = [env.home_config_file(), Some(env.project_config_file())];
        for path in files.into_iter().flatten() {
            if let Some(layer) = read_layer(&path) {
                merged = deep_merge(merged, layer);
            }
        }

        if let Value::Object(map) = &mut merged {
            map.remove(TEST_RUN_UID_KEY);
        }

        if let Some(layer) = overrides.and_then(Config::to_layer) {
            merged = deep_merge(merged, layer);
        }

        merged = deep_merge(merged, env_layer(env));

        let mut config = Self::from_merged(merged);
        config.missing_config_file = env.explicit_config_file().filter(|path| !path.exists());
        config
    }

    /// Clear this configuration and rebuild it from all layers.
    pub fn load(&mut self, overrides: Option<&Config>, env: &ConfigEnv) {
        *self = Self::resolve(overrides, env);
    }

    /// Options of the selected server, or empty options if the selection or
    /// the server list is missing.
    pub fn server_options(&self) -> ServerOptions {
        match (&self.servers, &self.server) {
            (Some(servers), Some(name)) => servers.get(name).cloned().unwrap_or_default(),
            _ => ServerOptions::default(),
        }
    }

    /// Project options, with `apiId` replaced by the selected server's
    /// `projectApiId` when set.
    pub fn project_options(&self) -> ProjectOptions {
        let mut options = self
            .project
            .as_ref()
            .map(|project| ProjectOptions {
                api_id: project.api_id.clone(),
                version: project.version.clone(),
                category: project.category.clone(),
                tags: project.tags.clone(),
                tickets: project.tickets.clone(),
            })
            .unwrap_or_default();

        if let Some(api_id) = self.server_options().project_api_id.filter(|id| !id.is_empty()) {
            options.api_id = Some(api_id);
        }

        options
    }

    /// Whether results should be sent to the server.
    pub fn should_publish(&self) -> bool {
        self.publish == Some(true)
    }

    /// Whether the serialized payload should be printed.
    pub fn print_payload(&self) -> bool {
        self.payload.as_ref().and_then(|p| p.print) == Some(true)
    }

    /// Whether the serialized payload should be written to the workspace.
    ///
    /// Saving is on whenever a workspace is configured, unless `payload.save`
    /// is explicitly false.
    pub fn save_payload(&self) -> bool {
        self.workspace_dir().is_some()
            && self.payload.as_ref().and_then(|p| p.save) != Some(false)
    }

    /// The workspace directory; an empty path means no workspace.
    pub fn workspace_dir(&self) -> Option<&Path> {
        self.workspace
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Append a message for every configuration problem to `errors`.
    pub fn validate(&self, errors: &mut Vec<String>) {
        if let Some(path) = &self.missing_config_file {
            errors.push(format!(
                "No project configuration file found at {} (set with ${} environment variable)",
                path.display(),
                env::ENV_CONFIG
            ));
        }

        match &self.project {
            None => errors.push(
                "Project is not configured (set \"project.apiId\" and \"project.version\" in configuration file)"
                    .to_string(),
            ),
            Some(project) => {
                if is_blank(&project.api_id) {
                    errors.push(
                        "Project API ID is not set (set \"project.apiId\" in configuration file)"
                            .to_string(),
                    );
                }
                if is_blank(&project.version) {
                    errors.push(
                        "Project version is not set (set \"project.version\" in configuration file)"
                            .to_string(),
                    );
                }
            }
        }

        match &self.servers {
            None => errors.push(
                "No Probe Dock server is configured (set \"servers\" in configuration file)"
                    .to_string(),
            ),
            Some(servers) => {
                for (name, server) in servers {
                    if is_blank(&server.api_url) {
                        errors.push(format!(
                            "No API URL is set for Probe Dock server {name} (set \"servers.{name}.apiUrl\" in configuration file)"
                        ));
                    }
                    if is_blank(&server.api_token) {
                        errors.push(format!(
                            "No API authentication token is set for Probe Dock server {name} (set \"servers.{name}.apiToken\" in configuration file)"
                        ));
                    }
                }
            }
        }
    }

    fn to_layer(&self) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "ignoring configuration overrides");
                None
            }
        }
    }

    /// Decode a merged layer field by field, so one ill-typed field does not
    /// discard the rest.
    fn from_merged(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        Self {
            publish: take_field(&mut map, "publish"),
            project: take_field(&mut map, "project"),
            servers: take_servers(&mut map),
            server: take_field(&mut map, "server"),
            workspace: take_field::<PathBuf>(&mut map, "workspace")
                .filter(|path| !path.as_os_str().is_empty()),
            payload: take_field(&mut map, "payload"),
            test_run_uid: take_field(&mut map, TEST_RUN_UID_KEY),
            missing_config_file: None,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Read one YAML file layer. Missing files and malformed YAML contribute
/// nothing.
fn read_layer(path: &Path) -> Option<Value> {
    if !path.is_file() {
        debug!(path = %path.display(), "configuration file not found");
        return None;
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read configuration file");
            return None;
        }
    };

    match serde_yaml::from_str::<Value>(&raw) {
        Ok(value @ Value::Object(_)) => {
            debug!(path = %path.display(), "loaded configuration file");
            Some(value)
        }
        Ok(Value::Null) => None,
        Ok(_) => {
            warn!(path = %path.display(), "configuration file is not a mapping; ignoring it");
            None
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "invalid YAML in configuration file; ignoring it"
            );
            None
        }
    }
}

fn env_layer(env: &ConfigEnv) -> Value {
    let mut layer = Map::new();
    let mut payload = Map::new();

    if let Some(value) = &env.publish {
        layer.insert("publish".into(), Value::Bool(parse_bool(value)));
    }
    if let Some(value) = &env.server {
        layer.insert("server".into(), Value::String(value.clone()));
    }
    if let Some(value) = &env.workspace {
        layer.insert("workspace".into(), Value::String(value.clone()));
    }
    if let Some(value) = &env.print_payload {
        payload.insert("print".into(), Value::Bool(parse_bool(value)));
    }
    if let Some(value) = &env.save_payload {
        payload.insert("save".into(), Value::Bool(parse_bool(value)));
    }
    if let Some(value) = &env.test_run_uid {
        layer.insert(TEST_RUN_UID_KEY.into(), Value::String(value.clone()));
    }

    layer.insert("payload".into(), Value::Object(payload));
    Value::Object(layer)
}

fn take_field<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.remove(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "ignoring invalid configuration value");
            None
        }
    }
}

/// `servers` is decoded entry by entry; a null or ill-typed entry becomes an
/// empty server so validation still reports it by name.
fn take_servers(map: &mut Map<String, Value>) -> Option<BTreeMap<String, ServerOptions>> {
    let Value::Object(entries) = map.remove("servers")? else {
        warn!(key = "servers", "ignoring invalid configuration value");
        return None;
    };

    let servers = entries
        .into_iter()
        .map(|(name, value)| {
            let options = if value.is_null() {
                ServerOptions::default()
            } else {
                serde_json::from_value(value).unwrap_or_else(|e| {
                    warn!(server = %name, error = %e, "ignoring invalid server configuration");
                    ServerOptions::default()
                })
            };
            (name, options)
        })
        .collect();

    Some(servers)
}
