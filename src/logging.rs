use anyhow::Context;
use std::str::FromStr;
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    fmt::{format::FmtSpan, Layer},
    prelude::*,
};

use crate::Args;

pub fn init(args: &Args) -> anyhow::Result<()> {
    let log_level_filter = LevelFilter::from_level(
        Level::from_str(&args.log_level)
            .with_context(|| format!("Unknown log level \"{}\"", args.log_level))?,
    );

    // Logs go to stderr so that fetched bodies own stdout.
    let default_fmt_layer = Layer::default().with_writer(std::io::stderr);
    let fmt = match args.json {
        true => default_fmt_layer
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(log_level_filter)
            .boxed(),
        false => default_fmt_layer
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(log_level_filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(fmt).init();
    Ok(())
}
