use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use super::consts;
use super::settings::TorSettings;

#[derive(Error, Debug)]
pub enum TorControlError {
    #[error("Couldn't connect to Tor control port {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Tor control port I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Tor control port rejected AUTHENTICATE: {reply}")]
    AuthenticationRejected { reply: String },

    #[error("Tor control port closed the connection before replying")]
    ConnectionClosed,

    #[error("Passphrase must not contain line breaks")]
    InvalidPassphrase,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    lines: Vec<String>,
}

impl Reply {
    pub fn is_ok(&self) -> bool {
        self.lines
            .first()
            .is_some_and(|line| line.starts_with(consts::REPLY_OK_CODE))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join(" | "))
    }
}

#[derive(Clone, Debug)]
pub struct ControlPort {
    address: String,
    passphrase: Option<String>,
    settings: TorSettings,
}

impl ControlPort {
    pub fn new(
        address: impl Into<String>,
        passphrase: Option<String>,
        settings: TorSettings,
    ) -> Self {
        Self {
            address: address.into(),
            passphrase,
            settings,
        }
    }

    /// Shortens circuit lifetimes so that NEWNYM rotations take effect quickly.
    #[instrument(skip(self), err, fields(address = %self.address))]
    pub fn configure(&self) -> Result<(), TorControlError> {
        let mut connection = self.open()?;
        for argument in self.settings.setconf_arguments() {
            let reply = connection
                .command(&format!("{} {argument}", consts::SETCONF_COMMAND))?;
            if !reply.is_ok() {
                tracing::warn!(%reply, %argument, "Tor didn't accept SETCONF.");
            }
        }
        thread::sleep(self.settings.settle_delay());
        tracing::info!("Tor reconfigured.");
        Ok(())
    }

    /// Asks Tor to build a fresh circuit for subsequent connections.
    #[instrument(skip(self), err, fields(address = %self.address))]
    pub fn new_identity(&self) -> Result<(), TorControlError> {
        let mut connection = self.open()?;
        let reply = connection.command(consts::NEWNYM_COMMAND)?;
        if !reply.is_ok() {
            tracing::warn!(%reply, "Tor didn't accept NEWNYM.");
        }
        thread::sleep(self.settings.settle_delay());
        tracing::info!("Tor rerouted.");
        Ok(())
    }

    fn open(&self) -> Result<ControlConnection, TorControlError> {
        let mut connection = ControlConnection::connect(
            &self.address,
            self.settings.control_timeout(),
        )?;
        if let Some(passphrase) = &self.passphrase {
            connection.authenticate(passphrase)?;
        }
        Ok(connection)
    }
}

// The socket is closed when the connection is dropped, whichever way the
// exchange ends.
struct ControlConnection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl ControlConnection {
    fn connect(address: &str, timeout: Duration) -> Result<Self, TorControlError> {
        let stream = TcpStream::connect(address).map_err(|source| {
            TorControlError::Connect {
                address: address.to_string(),
                source,
            }
        })?;
        // A zero duration is rejected by the socket API; treat it as "no timeout".
        let timeout = (!timeout.is_zero()).then_some(timeout);
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: stream,
        })
    }

    fn authenticate(&mut self, passphrase: &str) -> Result<(), TorControlError> {
        if !is_valid_passphrase(passphrase) {
            return Err(TorControlError::InvalidPassphrase);
        }
        let reply = self.send(&format!(
            "{} {}",
            consts::AUTHENTICATE_COMMAND,
            quote(passphrase)
        ))?;
        if !reply.is_ok() {
            return Err(TorControlError::AuthenticationRejected {
                reply: reply.to_string(),
            });
        }
        tracing::debug!("Authenticated with Tor control port.");
        Ok(())
    }

    fn command(&mut self, line: &str) -> Result<Reply, TorControlError> {
        tracing::debug!(command = line);
        let reply = self.send(line)?;
        tracing::debug!(%reply);
        Ok(reply)
    }

    fn send(&mut self, line: &str) -> Result<Reply, TorControlError> {
        self.writer.write_all(format!("{line}\r\n").as_bytes())?;
        self.writer.flush()?;
        self.read_reply()
    }

    // Mid-reply lines look like "250-..." and the final one like "250 ...".
    fn read_reply(&mut self) -> Result<Reply, TorControlError> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(TorControlError::ConnectionClosed);
            }
            let line = line.trim_end_matches(['\r', '\n']).to_string();
            let is_final =
                line.as_bytes().get(3).map_or(true, |separator| *separator == b' ');
            lines.push(line);
            if is_final {
                return Ok(Reply { lines });
            }
        }
    }
}

/// A raw CR or LF would end the AUTHENTICATE line early.
pub(crate) fn is_valid_passphrase(passphrase: &str) -> bool {
    !passphrase.contains(['\r', '\n'])
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeControlPort;
    use anyhow::Result;

    fn fast_settings() -> TorSettings {
        TorSettings {
            settle_delay_secs: 0,
            control_timeout_secs: 5,
            ..TorSettings::default()
        }
    }

    #[test]
    fn configure_sends_setconf_in_order() -> Result<()> {
        let fake = FakeControlPort::spawn(None)?;
        ControlPort::new(fake.address(), None, fast_settings()).configure()?;

        assert_eq!(
            fake.commands(),
            vec![
                "SETCONF NewCircuitPeriod=10",
                "SETCONF CircuitBuildTimeout=20",
                "SETCONF MaxCircuitDirtiness=\"60\"",
            ]
        );
        Ok(())
    }

    #[test]
    fn authenticates_before_commands() -> Result<()> {
        let fake = FakeControlPort::spawn(Some("hunter2"))?;
        ControlPort::new(
            fake.address(),
            Some("hunter2".to_string()),
            fast_settings(),
        )
        .new_identity()?;

        assert_eq!(
            fake.commands(),
            vec!["AUTHENTICATE \"hunter2\"", "SIGNAL NEWNYM"]
        );
        Ok(())
    }

    #[test]
    fn rejected_passphrase_stops_the_exchange() -> Result<()> {
        let fake = FakeControlPort::spawn(Some("hunter2"))?;
        let result = ControlPort::new(
            fake.address(),
            Some("wrong".to_string()),
            fast_settings(),
        )
        .configure();

        assert!(matches!(
            result,
            Err(TorControlError::AuthenticationRejected { .. })
        ));
        assert_eq!(fake.commands(), vec!["AUTHENTICATE \"wrong\""]);
        Ok(())
    }

    #[test]
    fn unreachable_control_port_is_a_connect_error() -> Result<()> {
        let address = crate::test_support::closed_address()?;
        let result = ControlPort::new(address, None, fast_settings()).new_identity();

        assert!(matches!(result, Err(TorControlError::Connect { .. })));
        Ok(())
    }

    #[test]
    fn line_breaks_in_passphrase_never_reach_the_port() -> Result<()> {
        let fake = FakeControlPort::spawn(None)?;
        let result = ControlPort::new(
            fake.address(),
            Some("x\r\nSIGNAL SHUTDOWN".to_string()),
            fast_settings(),
        )
        .new_identity();

        assert!(matches!(result, Err(TorControlError::InvalidPassphrase)));
        assert!(fake.commands().is_empty());
        Ok(())
    }

    #[test]
    fn passphrase_quotes_are_escaped() {
        assert_eq!(quote(r#"pa"ss\word"#), r#""pa\"ss\\word""#);
    }

    #[test]
    fn multi_line_reply_is_read_to_the_final_line() -> Result<()> {
        let fake = FakeControlPort::spawn_with_reply(
            None,
            "250-circuit-status=\r\n250 OK",
        )?;
        let mut connection =
            ControlConnection::connect(&fake.address(), Duration::from_secs(5))?;
        let reply = connection.command("GETINFO circuit-status")?;

        assert!(reply.is_ok());
        assert_eq!(reply.lines(), ["250-circuit-status=", "250 OK"]);
        Ok(())
    }
}
