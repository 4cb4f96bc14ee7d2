pub(crate) const DEFAULT_NEW_CIRCUIT_PERIOD_SECS: u64 = 10;
pub(crate) const DEFAULT_CIRCUIT_BUILD_TIMEOUT_SECS: u64 = 20;
pub(crate) const DEFAULT_MAX_CIRCUIT_DIRTINESS_SECS: u64 = 60;

// Tor needs a moment to apply SETCONF/NEWNYM before the next circuit is usable.
pub(crate) const DEFAULT_SETTLE_DELAY_SECS: u64 = 5;
pub(crate) const DEFAULT_CONTROL_TIMEOUT_SECS: u64 = 30;

pub(crate) const REPLY_OK_CODE: &str = "250";

pub(crate) const AUTHENTICATE_COMMAND: &str = "AUTHENTICATE";
pub(crate) const SETCONF_COMMAND: &str = "SETCONF";
pub(crate) const NEWNYM_COMMAND: &str = "SIGNAL NEWNYM";

pub(crate) const NEW_CIRCUIT_PERIOD_KEY: &str = "NewCircuitPeriod";
pub(crate) const CIRCUIT_BUILD_TIMEOUT_KEY: &str = "CircuitBuildTimeout";
pub(crate) const MAX_CIRCUIT_DIRTINESS_KEY: &str = "MaxCircuitDirtiness";
