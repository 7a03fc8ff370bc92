//! Process exit codes of the `probedock` binary.
//!
//! Failures of the core library exit with `ProbeDockError::exit_code`:
//! 2 configuration, 3 network, 4 unexpected status, 5 local I/O.

pub const SUCCESS: i32 = 0;
pub const VALIDATION_FAILED: i32 = 1; // Configuration or test run is incomplete
pub const CONFIG_ERROR: i32 = 2;
