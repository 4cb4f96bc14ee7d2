mod config;

pub use config::{AnonymizerConfig, ProxyConfig};
