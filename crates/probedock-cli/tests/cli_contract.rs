#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use probedock_core::{persistence, AddOptions, Config, ProjectConfig, ServerOptions, TestRun};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PROJECT_CONFIG: &str = r#"
project:
  apiId: abc
  version: 1.2.3
servers:
  local:
    apiUrl: http://127.0.0.1:9/api
    apiToken: secret-token
server: local
"#;

struct Sandbox {
    _dir: TempDir,
    home: PathBuf,
    work: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let work = dir.path().join("work");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&work).unwrap();
        Self {
            _dir: dir,
            home,
            work,
        }
    }

    fn with_project_config(self) -> Self {
        fs::write(self.work.join("probedock.yml"), PROJECT_CONFIG).unwrap();
        self
    }

    fn probedock(&self) -> Command {
        let mut cmd = Command::cargo_bin("probedock").unwrap();
        cmd.env_clear()
            .env("HOME", &self.home)
            .current_dir(&self.work);
        cmd
    }
}

fn dump_config(workspace: &Path) -> Config {
    let mut servers = BTreeMap::new();
    servers.insert(
        "local".to_string(),
        ServerOptions {
            api_url: Some("http://127.0.0.1:9/api".into()),
            api_token: Some("secret-token".into()),
            project_api_id: None,
        },
    );

    let mut config = Config::new();
    config.publish = Some(true);
    config.project = Some(ProjectConfig {
        api_id: Some("abc".into()),
        version: Some("1.2.3".into()),
        category: Some("Jasmine".into()),
        ..Default::default()
    });
    config.servers = Some(servers);
    config.server = Some("local".into());
    config.workspace = Some(workspace.to_path_buf());
    config
}

fn write_dump(sandbox: &Sandbox, finished: bool) -> (PathBuf, PathBuf) {
    let workspace = sandbox.work.join("ws");
    let config = dump_config(&workspace);

    let mut run = TestRun::new(&config);
    run.start();
    run.add(None, "it works", true, 10, AddOptions::default());
    run.add(
        None,
        "it fails @probedock(key=k1)",
        false,
        5,
        AddOptions::default().with_message("boom"),
    );
    if finished {
        run.end();
    }

    let dump = sandbox.work.join("test-run.json");
    persistence::save(&dump, &run, &config).unwrap();
    (dump, workspace)
}

#[test]
fn validate_reports_missing_settings() {
    let sandbox = Sandbox::new();

    sandbox
        .probedock()
        .arg("validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Project API ID is not set"))
        .stdout(predicate::str::contains("Project version is not set"))
        .stdout(predicate::str::contains("No Probe Dock server is configured"));
}

#[test]
fn validate_accepts_complete_configuration() {
    let sandbox = Sandbox::new().with_project_config();

    sandbox
        .probedock()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn validate_reports_missing_explicit_config_file() {
    let sandbox = Sandbox::new().with_project_config();

    sandbox
        .probedock()
        .arg("validate")
        .env("PROBEDOCK_CONFIG", "missing.yml")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No project configuration file found at"))
        .stdout(predicate::str::contains("PROBEDOCK_CONFIG"));
}

#[test]
fn config_json_masks_tokens() {
    let sandbox = Sandbox::new().with_project_config();

    let output = sandbox
        .probedock()
        .args(["config", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["project"]["apiId"], "abc");
    assert_eq!(config["servers"]["local"]["apiUrl"], "http://127.0.0.1:9/api");
    assert_eq!(config["servers"]["local"]["apiToken"], "********");
    assert_eq!(config["publish"], true);
}

#[test]
fn config_yaml_applies_environment() {
    let sandbox = Sandbox::new().with_project_config();

    sandbox
        .probedock()
        .arg("config")
        .env("PROBEDOCK_PUBLISH", "no")
        .assert()
        .success()
        .stdout(predicate::str::contains("apiId: abc"))
        .stdout(predicate::str::contains("publish: false"))
        .stdout(predicate::str::contains("secret-token").not());
}

#[test]
fn uid_missing_exits_with_failure() {
    let sandbox = Sandbox::new();

    sandbox
        .probedock()
        .arg("uid")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn uid_from_environment_and_workspace() {
    let sandbox = Sandbox::new();

    sandbox
        .probedock()
        .arg("uid")
        .env("PROBEDOCK_TEST_REPORT_UID", "shard-1")
        .assert()
        .success()
        .stdout("shard-1\n");

    let workspace = sandbox.work.join("ws");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(workspace.join("uid"), "from-file\nsecond\n").unwrap();

    sandbox
        .probedock()
        .arg("uid")
        .env("PROBEDOCK_WORKSPACE", &workspace)
        .assert()
        .success()
        .stdout("from-file\n");
}

#[test]
fn publish_dry_run_saves_payload() {
    let sandbox = Sandbox::new();
    let (dump, workspace) = write_dump(&sandbox, true);

    sandbox
        .probedock()
        .arg("publish")
        .arg(&dump)
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Publishing disabled"));

    let payload_path = workspace.join("jasmine").join("payload.json");
    let payload: Value = serde_json::from_str(&fs::read_to_string(payload_path).unwrap()).unwrap();
    assert_eq!(payload["projectId"], "abc");
    assert_eq!(payload["version"], "1.2.3");
    assert_eq!(payload["results"].as_array().unwrap().len(), 2);
    assert_eq!(payload["results"][1]["k"], "k1");
    assert_eq!(payload["results"][1]["c"], "Jasmine");
}

#[test]
fn publish_logs_loaded_dump_at_debug_level() {
    let sandbox = Sandbox::new();
    let (dump, _workspace) = write_dump(&sandbox, true);

    sandbox
        .probedock()
        .arg("publish")
        .arg(&dump)
        .arg("--dry-run")
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded test run"))
        .stdout(predicate::str::contains("loaded test run").not());
}

#[test]
fn publish_rejects_unfinished_run() {
    let sandbox = Sandbox::new();
    let (dump, workspace) = write_dump(&sandbox, false);

    sandbox
        .probedock()
        .arg("publish")
        .arg(&dump)
        .arg("--dry-run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("End time is not set"));

    assert!(!workspace.join("jasmine").exists());
}

#[test]
fn publish_missing_dump_is_io_error() {
    let sandbox = Sandbox::new();

    sandbox
        .probedock()
        .args(["publish", "nope.json"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("failed to load test run"));
}
