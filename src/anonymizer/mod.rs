//! Anonymised GETs through a randomly chosen proxy with randomised headers.

mod anonymizer;
mod errors;
mod gate;
mod headers;

pub use anonymizer::{Anonymizer, AnonymizerOptions, Fetched};
pub use errors::{AnonymizerError, ConfigurationError, Result};
pub use headers::RequestHeaders;
