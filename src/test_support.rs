//! Loopback stand-ins for a Tor control port and an HTTP proxy.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub(crate) fn closed_address() -> io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?.to_string();
    drop(listener);
    Ok(address)
}

fn recorded(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().map(|entries| entries.clone()).unwrap_or_default()
}

// Replies 250 OK to everything but a wrong AUTHENTICATE.
pub(crate) struct FakeControlPort {
    address: String,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FakeControlPort {
    pub(crate) fn spawn(passphrase: Option<&str>) -> io::Result<Self> {
        Self::spawn_with_reply(passphrase, "250 OK")
    }

    /// `reply` is written back for every command other than AUTHENTICATE.
    pub(crate) fn spawn_with_reply(
        passphrase: Option<&str>,
        reply: &str,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let address = listener.local_addr()?.to_string();
        let commands = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&commands);
        let expected_auth = passphrase.map(|p| format!("AUTHENTICATE \"{p}\""));
        let reply = reply.to_string();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let _ = serve_control(
                    stream,
                    &log,
                    expected_auth.as_deref(),
                    &reply,
                );
            }
        });

        Ok(Self { address, commands })
    }

    pub(crate) fn address(&self) -> String {
        self.address.clone()
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        recorded(&self.commands)
    }
}

fn serve_control(
    stream: TcpStream,
    log: &Arc<Mutex<Vec<String>>>,
    expected_auth: Option<&str>,
    reply: &str,
) -> io::Result<()> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let command = line.trim_end().to_string();
        let response = if command.starts_with("AUTHENTICATE") {
            match expected_auth {
                Some(expected) if expected != command => "515 Authentication failed",
                _ => "250 OK",
            }
        } else {
            reply
        };
        if let Ok(mut entries) = log.lock() {
            entries.push(command);
        }
        writer.write_all(format!("{response}\r\n").as_bytes())?;
        writer.flush()?;
    }
}

const OK_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: text/plain\r\n\
Set-Cookie: session=abc; Path=/\r\n\
Content-Length: 2\r\n\
Connection: close\r\n\r\n\
ok";

pub(crate) struct FakeHttpProxy {
    address: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeHttpProxy {
    pub(crate) fn spawn() -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let address = listener.local_addr()?.to_string();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let _ = serve_http(stream, &log);
            }
        });

        Ok(Self { address, requests })
    }

    pub(crate) fn address(&self) -> String {
        self.address.clone()
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        recorded(&self.requests)
    }
}

fn serve_http(stream: TcpStream, log: &Arc<Mutex<Vec<String>>>) -> io::Result<()> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut head = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" {
            break;
        }
        head.push_str(&line);
    }
    if let Ok(mut entries) = log.lock() {
        entries.push(head.to_ascii_lowercase());
    }
    writer.write_all(OK_RESPONSE)?;
    writer.flush()
}

// Accepts connections and never answers them.
pub(crate) fn silent_address() -> io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?.to_string();
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    Ok(address)
}
