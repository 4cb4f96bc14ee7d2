use std::sync::Arc;
use std::time::{Duration, Instant};

use ::metrics::{counter, histogram};
use chrono::Utc;
use rand::seq::SliceRandom;
use reqwest::blocking::{Client, Response};
use reqwest::cookie::Jar;
use reqwest::Proxy;
use tracing::instrument;

use super::errors::{AnonymizerError, ConfigurationError, Result};
use super::gate::{Admission, CircuitGate};
use super::headers::RequestHeaders;
use crate::config::{AnonymizerConfig, ProxyConfig};
use crate::metrics::consts as crate_metrics;
use crate::tor::{is_valid_passphrase, ControlPort, TorSettings};

const DEFAULT_PETITIONS: u32 = 15;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

fn uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Clone, Debug)]
pub struct AnonymizerOptions {
    pub petitions: u32,
    pub passphrase: Option<String>,
    pub timeout: Duration,
    pub tor: TorSettings,
}

impl Default for AnonymizerOptions {
    fn default() -> Self {
        Self {
            petitions: DEFAULT_PETITIONS,
            passphrase: None,
            timeout: DEFAULT_TIMEOUT,
            tor: TorSettings::default(),
        }
    }
}

#[derive(Debug)]
pub struct Fetched {
    pub response: Response,
    pub proxy: String,
    pub headers: RequestHeaders,
}

struct TorCircuit {
    control: ControlPort,
    gate: CircuitGate,
}

impl TorCircuit {
    fn pass_gate(&mut self) -> Result<()> {
        match self.gate.admit(Utc::now()) {
            Ok(Admission::Proceed) => Ok(()),
            Ok(Admission::Rotate) => {
                self.control.new_identity()?;
                counter!(crate_metrics::TOR_CIRCUIT_ROTATIONS).increment(1);
                Ok(())
            }
            Err(error) => {
                counter!(crate_metrics::RATE_LIMIT_EXCEEDED).increment(1);
                tracing::warn!(%error);
                Err(error)
            }
        }
    }
}

pub struct Anonymizer {
    proxies: Vec<String>,
    is_tor: bool,
    circuit: Option<TorCircuit>,
    timeout: Duration,
    cookies: Arc<Jar>,
}

impl Anonymizer {
    #[instrument(skip_all, err)]
    pub fn new(
        config: ProxyConfig,
        options: AnonymizerOptions,
    ) -> std::result::Result<Self, ConfigurationError> {
        let AnonymizerOptions {
            petitions,
            passphrase,
            timeout,
            tor,
        } = options;

        let is_tor = config.is_tor();
        let (addresses, control) = match config {
            ProxyConfig::Http { proxies } => (proxies, None),
            ProxyConfig::Tor { proxy, control } => (vec![proxy], control),
        };
        if addresses.is_empty() {
            return Err(ConfigurationError::EmptyProxyList);
        }
        let proxies = addresses
            .iter()
            .map(|address| proxy_url(address))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let circuit = match control {
            Some(address) => {
                validate_control_address(&address)?;
                if !passphrase.as_deref().map_or(true, is_valid_passphrase) {
                    return Err(ConfigurationError::InvalidPassphrase);
                }
                // The window starts before the settle delay, not after it.
                let gate = CircuitGate::new(
                    petitions,
                    tor.max_circuit_dirtiness,
                    Utc::now(),
                );
                let control = ControlPort::new(address, passphrase, tor);
                control.configure()?;
                Some(TorCircuit { control, gate })
            }
            None => None,
        };

        tracing::info!(
            proxies = proxies.len(),
            is_tor,
            control_port = circuit.is_some(),
            "Anonymizer ready."
        );

        Ok(Self {
            proxies,
            is_tor,
            circuit,
            timeout,
            cookies: Arc::new(Jar::default()),
        })
    }

    pub fn from_config(
        config: &AnonymizerConfig,
    ) -> std::result::Result<Self, ConfigurationError> {
        Self::new(
            config.validate()?,
            AnonymizerOptions {
                petitions: config.petitions,
                passphrase: config.passwd.clone(),
                timeout: Duration::from_secs(config.timeout),
                tor: config.tor.clone(),
            },
        )
    }

    pub fn is_tor(&self) -> bool {
        self.is_tor
    }

    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    pub fn current_petitions(&self) -> Option<u32> {
        self.circuit
            .as_ref()
            .map(|circuit| circuit.gate.current_petitions())
    }

    /// `pure_anonymous` requests neither send nor store cookies.
    #[instrument(
        skip(self),
        err,
        level = tracing::Level::DEBUG,
        fields(request_id = uuid())
    )]
    pub fn get(&mut self, url: &str, pure_anonymous: bool) -> Result<Fetched> {
        let headers = RequestHeaders::random();

        if let Some(circuit) = self.circuit.as_mut() {
            circuit.pass_gate()?;
        }

        let proxy = self
            .proxies
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(ConfigurationError::EmptyProxyList)?;
        tracing::debug!(%proxy, ?headers);

        let request_start = Instant::now();
        let result = self.client(&proxy, pure_anonymous).and_then(|client| {
            client.get(url).headers(headers.to_header_map()).send()
        });
        histogram!(crate_metrics::HTTP_REQUEST_DURATION_SECS)
            .record(request_start.elapsed().as_secs_f64());

        match result {
            Ok(response) => {
                counter!(crate_metrics::HTTP_REQUEST_SUCCESS).increment(1);
                tracing::info!(status = %response.status(), url, %proxy);
                Ok(Fetched {
                    response,
                    proxy,
                    headers,
                })
            }
            Err(error) => {
                counter!(crate_metrics::HTTP_REQUEST_FAILURE).increment(1);
                tracing::warn!(%error, url, %proxy, "Request failed.");
                Err(AnonymizerError::Request {
                    url: url.to_string(),
                    proxy,
                })
            }
        }
    }

    // One client per request: the proxy and cookie policy change between calls.
    fn client(&self, proxy: &str, pure_anonymous: bool) -> reqwest::Result<Client> {
        let mut builder = Client::builder()
            .proxy(Proxy::all(proxy)?)
            .timeout(self.timeout)
            .pool_max_idle_per_host(0);
        if !pure_anonymous {
            builder = builder.cookie_provider(Arc::clone(&self.cookies));
        }
        builder.build()
    }

    #[cfg(test)]
    fn age_circuit_by(&mut self, seconds: i64) {
        if let Some(circuit) = self.circuit.as_mut() {
            circuit.gate.age_by(seconds);
        }
    }
}

/// Bare `host:port` addresses are HTTP proxies.
fn proxy_url(address: &str) -> std::result::Result<String, ConfigurationError> {
    let url = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };
    Proxy::all(&url).map_err(|error| ConfigurationError::InvalidProxy {
        address: address.to_string(),
        reason: error.to_string(),
    })?;
    Ok(url)
}

fn validate_control_address(
    address: &str,
) -> std::result::Result<(), ConfigurationError> {
    match address.rsplit_once(':') {
        Some((host, port))
            if !host.is_empty() && port.parse::<u16>().is_ok() =>
        {
            Ok(())
        }
        _ => Err(ConfigurationError::InvalidControlAddress {
            address: address.to_string(),
        }),
    }
}
