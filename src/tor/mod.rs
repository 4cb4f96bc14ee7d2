//! Tor control-port client.
//!
//! Every exchange opens a fresh connection, runs a fixed sequence of
//! commands and drops the socket again. There is no connection reuse.

pub(crate) mod consts;
mod control;
mod settings;

pub(crate) use control::is_valid_passphrase;
pub use control::{ControlPort, Reply, TorControlError};
pub use settings::TorSettings;
