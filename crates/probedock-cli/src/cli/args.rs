use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "probedock",
    version,
    about = "Inspect Probe Dock configuration and publish saved test runs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the effective configuration (API tokens are masked)
    Config(ConfigArgs),
    /// Check that the configuration is complete
    Validate,
    /// Print the test run UID
    Uid,
    /// Publish a test run saved with `save_test_run`
    Publish(PublishArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long, value_enum, default_value_t = ConfigFormat::Yaml)]
    pub format: ConfigFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct PublishArgs {
    /// Test run dump (`{testRun, config}` JSON)
    #[arg(value_name = "DUMP")]
    pub dump: PathBuf,

    /// Validate and serialize, but do not send anything
    #[arg(long)]
    pub dry_run: bool,
}
