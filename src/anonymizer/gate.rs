use chrono::{DateTime, TimeDelta, Utc};

use super::errors::{AnonymizerError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Admission {
    Rotate,
    Proceed,
}

/// Fixed-window petition counter for one Tor circuit.
#[derive(Debug)]
pub(crate) struct CircuitGate {
    max_petitions: u32,
    current_petitions: u32,
    last_circuit: DateTime<Utc>,
    window_secs: u64,
}

impl CircuitGate {
    pub(crate) fn new(
        max_petitions: u32,
        window_secs: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            max_petitions,
            current_petitions: 0,
            last_circuit: now,
            window_secs,
        }
    }

    pub(crate) fn admit(&mut self, now: DateTime<Utc>) -> Result<Admission> {
        if self.window_expired(now) {
            self.current_petitions = 1;
            self.last_circuit = now;
            return Ok(Admission::Rotate);
        }

        if self.current_petitions == self.max_petitions {
            self.current_petitions = 0;
            return Err(AnonymizerError::RateLimitExceeded {
                max_petitions: self.max_petitions,
                window_secs: self.window_secs,
            });
        }

        self.current_petitions += 1;
        Ok(Admission::Proceed)
    }

    pub(crate) fn current_petitions(&self) -> u32 {
        self.current_petitions
    }

    // Whole seconds only, so a window of 60 rotates from the 61st second on.
    fn window_expired(&self, now: DateTime<Utc>) -> bool {
        let elapsed: TimeDelta = now - self.last_circuit;
        elapsed.num_seconds() > i64::try_from(self.window_secs).unwrap_or(i64::MAX)
    }

    #[cfg(test)]
    pub(crate) fn last_circuit(&self) -> DateTime<Utc> {
        self.last_circuit
    }

    #[cfg(test)]
    pub(crate) fn age_by(&mut self, seconds: i64) {
        self.last_circuit -= TimeDelta::seconds(seconds);
    }
}
