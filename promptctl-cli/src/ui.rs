//! Quiet mode detection
//!
//! Progress spinners are suppressed when:
//! - `--quiet` flag is passed
//! - `PROMPTCTL_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;

pub const QUIET_ENV: &str = "PROMPTCTL_QUIET";

static QUIET_MODE: OnceLock<bool> = OnceLock::new();

fn env_requests_quiet() -> bool {
    std::env::var(QUIET_ENV).map(|v| v == "1").unwrap_or(false)
}

/// Call once at startup with the --quiet flag value.
pub fn init_quiet_mode(quiet_flag: bool) {
    let is_quiet = quiet_flag || env_requests_quiet() || !std::io::stderr().is_terminal();
    QUIET_MODE.set(is_quiet).ok();
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

/// Whether the user asked for quiet output, ignoring TTY detection.
/// Used to lower the log level, which should not change just because
/// stderr is piped.
pub fn quiet_requested(quiet_flag: bool) -> bool {
    quiet_flag || env_requests_quiet()
}
