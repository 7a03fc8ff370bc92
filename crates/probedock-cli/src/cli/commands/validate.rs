//! `probedock validate` - Report incomplete configuration.

use anyhow::Result;
use probedock_core::{Config, ConfigEnv};

use crate::exit_codes;

pub fn run() -> Result<i32> {
    let config = Config::resolve(None, &ConfigEnv::from_process());

    let mut errors = Vec::new();
    config.validate(&mut errors);

    if errors.is_empty() {
        println!("Configuration is valid");
        return Ok(exit_codes::SUCCESS);
    }

    println!("Configuration has {} error(s):", errors.len());
    for error in &errors {
        println!("- {error}");
    }
    Ok(exit_codes::VALIDATION_FAILED)
}
