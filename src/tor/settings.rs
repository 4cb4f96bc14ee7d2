use serde::Deserialize;
use std::time::Duration;

use super::consts::{
    self, DEFAULT_CIRCUIT_BUILD_TIMEOUT_SECS, DEFAULT_CONTROL_TIMEOUT_SECS,
    DEFAULT_MAX_CIRCUIT_DIRTINESS_SECS, DEFAULT_NEW_CIRCUIT_PERIOD_SECS,
    DEFAULT_SETTLE_DELAY_SECS,
};

const fn _default_new_circuit_period() -> u64 { DEFAULT_NEW_CIRCUIT_PERIOD_SECS }
const fn _default_circuit_build_timeout() -> u64 { DEFAULT_CIRCUIT_BUILD_TIMEOUT_SECS }
const fn _default_max_circuit_dirtiness() -> u64 { DEFAULT_MAX_CIRCUIT_DIRTINESS_SECS }
const fn _default_settle_delay_secs() -> u64 { DEFAULT_SETTLE_DELAY_SECS }
const fn _default_control_timeout_secs() -> u64 { DEFAULT_CONTROL_TIMEOUT_SECS }

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TorSettings {
    #[serde(default = "_default_new_circuit_period")]
    pub new_circuit_period: u64,
    #[serde(default = "_default_circuit_build_timeout")]
    pub circuit_build_timeout: u64,
    /// Also the length of the petition window enforced before each request.
    #[serde(default = "_default_max_circuit_dirtiness")]
    pub max_circuit_dirtiness: u64,
    #[serde(default = "_default_settle_delay_secs")]
    pub settle_delay_secs: u64,
    #[serde(default = "_default_control_timeout_secs")]
    pub control_timeout_secs: u64,
}

impl TorSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn control_timeout(&self) -> Duration {
        Duration::from_secs(self.control_timeout_secs)
    }

    pub(crate) fn setconf_arguments(&self) -> [String; 3] {
        [
            format!(
                "{}={}",
                consts::NEW_CIRCUIT_PERIOD_KEY,
                self.new_circuit_period
            ),
            format!(
                "{}={}",
                consts::CIRCUIT_BUILD_TIMEOUT_KEY,
                self.circuit_build_timeout
            ),
            format!(
                "{}=\"{}\"",
                consts::MAX_CIRCUIT_DIRTINESS_KEY,
                self.max_circuit_dirtiness
            ),
        ]
    }
}

impl Default for TorSettings {
    fn default() -> Self {
        Self {
            new_circuit_period: _default_new_circuit_period(),
            circuit_build_timeout: _default_circuit_build_timeout(),
            max_circuit_dirtiness: _default_max_circuit_dirtiness(),
            settle_delay_secs: _default_settle_delay_secs(),
            control_timeout_secs: _default_control_timeout_secs(),
        }
    }
}
