//! Issue HTTP GETs through a rotating set of proxies or a Tor proxy.
//!
//! Each request gets a random proxy and a random browser identity. With a Tor
//! control port configured, requests are also counted per circuit window and
//! the circuit is replaced with `SIGNAL NEWNYM` once the window expires.

pub mod anonymizer;
pub mod config;
pub mod metrics;
pub mod tor;

#[cfg(test)]
pub(crate) mod test_support;

pub use anonymizer::{
    Anonymizer, AnonymizerError, AnonymizerOptions, Fetched, RequestHeaders,
};
pub use config::{AnonymizerConfig, ProxyConfig};
