//! `probedock uid` - Print the test run UID.

use anyhow::Result;
use probedock_core::{uid, Config, ConfigEnv};

use crate::exit_codes;

pub fn run() -> Result<i32> {
    let config = Config::resolve(None, &ConfigEnv::from_process());

    match uid::load(&config) {
        Some(uid) => {
            println!("{uid}");
            Ok(exit_codes::SUCCESS)
        }
        None => Ok(exit_codes::VALIDATION_FAILED),
    }
}
