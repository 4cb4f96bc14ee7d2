use serde::Deserialize;
use toml::{Table, Value};

use crate::anonymizer::ConfigurationError;
use crate::tor::TorSettings;

const fn _default_petitions() -> u32 { 15 }
const fn _default_timeout() -> u64 { 15 }

#[derive(Deserialize, Clone, Debug)]
pub struct AnonymizerConfig {
    /// Either `http = [..]` or `tor = ".."` with an optional `torctl = ".."`.
    /// Kept as a raw table so that a malformed shape surfaces as a
    /// [`ConfigurationError`] instead of a parse error.
    pub proxy: Table,
    #[serde(default = "_default_petitions")]
    pub petitions: u32,
    pub passwd: Option<String>,
    #[serde(default = "_default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub tor: TorSettings,
}

impl AnonymizerConfig {
    pub fn validate(&self) -> Result<ProxyConfig, ConfigurationError> {
        ProxyConfig::from_table(&self.proxy)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProxyConfig {
    Http { proxies: Vec<String> },
    Tor { proxy: String, control: Option<String> },
}

impl ProxyConfig {
    pub fn from_table(table: &Table) -> Result<Self, ConfigurationError> {
        if let Some(tor) = table.get("tor") {
            let proxy = address(tor, "tor")?;
            let control = table
                .get("torctl")
                .map(|control| address(control, "torctl"))
                .transpose()?;
            return Ok(ProxyConfig::Tor { proxy, control });
        }

        match table.get("http") {
            Some(Value::Array(entries)) => {
                if entries.is_empty() {
                    return Err(ConfigurationError::EmptyProxyList);
                }
                let proxies = entries
                    .iter()
                    .map(|entry| address(entry, "http"))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ProxyConfig::Http { proxies })
            }
            Some(_) => Err(ConfigurationError::HttpNotAList),
            None => Err(ConfigurationError::MissingProxySource),
        }
    }

    pub fn is_tor(&self) -> bool {
        matches!(self, ProxyConfig::Tor { .. })
    }
}

fn address(value: &Value, key: &'static str) -> Result<String, ConfigurationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(ConfigurationError::NotAnAddress { key })
}
