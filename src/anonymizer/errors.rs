use thiserror::Error;

use crate::tor::TorControlError;

#[derive(Error, Debug)]
pub enum AnonymizerError {
    #[error("Invalid anonymizer configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Tor control port failure: {0}")]
    TorControl(#[from] TorControlError),

    #[error(
        "Max number of petitions ({max_petitions}) in {window_secs} seconds reached"
    )]
    RateLimitExceeded { max_petitions: u32, window_secs: u64 },

    // The transport error is logged, never carried.
    #[error("Unable to get {url} using the proxy {proxy}")]
    Request { url: String, proxy: String },
}

impl AnonymizerError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AnonymizerError::RateLimitExceeded { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("No proxy source: expected an `http` list or a `tor` address")]
    MissingProxySource,

    #[error("No good HTTP proxy list provided: `http` must be a list of addresses")]
    HttpNotAList,

    #[error("The `http` proxy list is empty")]
    EmptyProxyList,

    #[error("`{key}` entries must be address strings")]
    NotAnAddress { key: &'static str },

    #[error("Invalid proxy address {address}: {reason}")]
    InvalidProxy { address: String, reason: String },

    #[error("Tor control passphrase must not contain line breaks")]
    InvalidPassphrase,

    #[error("Invalid Tor control address {address}: expected host:port")]
    InvalidControlAddress { address: String },

    #[error("Couldn't prepare Tor through its control port: {0}")]
    TorControl(#[from] TorControlError),
}

pub type Result<T> = std::result::Result<T, AnonymizerError>;
