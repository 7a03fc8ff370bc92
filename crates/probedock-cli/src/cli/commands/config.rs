//! `probedock config` - Print the effective configuration.

use anyhow::{Context, Result};
use probedock_core::{Config, ConfigEnv};
use serde_json::Value;

use crate::cli::args::{ConfigArgs, ConfigFormat};
use crate::exit_codes;

const MASK: &str = "********";

pub fn run(args: ConfigArgs) -> Result<i32> {
    let config = Config::resolve(None, &ConfigEnv::from_process());

    let mut value = serde_json::to_value(&config).context("failed to encode configuration")?;
    mask_tokens(&mut value);

    match args.format {
        ConfigFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        ConfigFormat::Yaml => print!("{}", serde_yaml::to_string(&value)?),
    }

    Ok(exit_codes::SUCCESS)
}

/// Replace every `servers.<name>.apiToken` with a fixed mask.
fn mask_tokens(value: &mut Value) {
    let Some(servers) = value.get_mut("servers").and_then(Value::as_object_mut) else {
        return;
    };

    for server in servers.values_mut() {
        if let Some(token) = server.get_mut("apiToken") {
            if token.as_str().is_some_and(|t| !t.is_empty()) {
                *token = Value::String(MASK.to_string());
            }
        }
    }
}
