mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::ExitCode;

use anonymizer::{Anonymizer, AnonymizerConfig};

#[derive(Parser, Debug)]
#[command(version, about)]
pub(crate) struct Args {
    #[arg(long, default_value = "config.toml")]
    config_file: String,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, action)]
    json: bool,

    /// Neither send nor keep cookies.
    #[arg(long, action)]
    pure_anonymous: bool,

    /// Log the proxy and headers used for every request.
    #[arg(long, action)]
    debug: bool,

    /// Serve Prometheus metrics on this loopback port.
    #[arg(long)]
    metrics_port: Option<u16>,

    #[arg(required = true)]
    urls: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    logging::init(&args)?;

    let config_file = std::fs::read_to_string(&args.config_file)
        .with_context(|| format!("Couldn't read config file {}", args.config_file))?;
    let config: AnonymizerConfig = toml::from_str(&config_file)?;

    if let Some(metrics_port) = args.metrics_port {
        let loopback_address = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
        anonymizer::metrics::init(SocketAddr::new(loopback_address, metrics_port))?;
        tracing::info!("Serving metrics on {loopback_address}:{metrics_port}...");
    }

    let mut anonymizer = Anonymizer::from_config(&config)?;

    let mut failures = 0;
    for url in &args.urls {
        if let Err(error) = fetch(&mut anonymizer, url, &args) {
            tracing::error!(url = %url, "{error:#}");
            failures += 1;
        }
    }

    Ok(match failures {
        0 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn fetch(anonymizer: &mut Anonymizer, url: &str, args: &Args) -> Result<()> {
    let fetched = anonymizer.get(url, args.pure_anonymous)?;

    if args.debug {
        tracing::info!(
            url,
            proxy = %fetched.proxy,
            user_agent = fetched.headers.user_agent,
            accept_language = fetched.headers.accept_language
        );
    }

    let status = fetched.response.status();
    let body = fetched.response.bytes()?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{status} {url}")?;
    stdout.write_all(&body)?;
    writeln!(stdout)?;
    Ok(())
}
