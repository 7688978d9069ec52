//! SSH transport for RouterOS.

use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use ssh2::{Channel, ExtendedData, HashType, Session};
use tracing::{debug, info};

use crate::{CommandOutput, RemoteChannel, RemoteError, RemoteSession, SessionOp};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where and how to reach the router.
#[derive(Clone)]
pub struct SshTarget {
    /// `host:port`.
    pub address: String,
    pub login: String,
    pub password: String,
    /// Bounds TCP connect, handshake and authentication.
    pub connect_timeout: Duration,
    /// Bounds each blocking SSH operation after login. `None` waits forever.
    pub command_timeout: Option<Duration>,
    /// Hex SHA-256 of the server host key. `None` accepts any key.
    pub host_key_sha256: Option<String>,
}

impl std::fmt::Debug for SshTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshTarget")
            .field("address", &self.address)
            .field("login", &self.login)
            .field("password", &"<REDACTED>")
            .field("connect_timeout", &self.connect_timeout)
            .field("command_timeout", &self.command_timeout)
            .field("host_key_sha256", &self.host_key_sha256)
            .finish()
    }
}

/// An authenticated SSH connection. Each session is a fresh exec channel.
pub struct SshChannel {
    session: Session,
    peer: String,
}

impl SshChannel {
    pub fn connect(target: &SshTarget) -> Result<Self, RemoteError> {
        let tcp = dial(&target.address, target.connect_timeout)?;

        let mut session =
            Session::new().map_err(|e| RemoteError::Handshake { source: e.into() })?;
        session.set_tcp_stream(tcp);
        session.set_timeout(millis(target.connect_timeout));
        session
            .handshake()
            .map_err(|e| RemoteError::Handshake { source: e.into() })?;

        if let Some(expected) = &target.host_key_sha256 {
            verify_host_key(&session, expected)?;
        }

        session
            .userauth_password(&target.login, &target.password)
            .map_err(|e| RemoteError::Auth {
                login: target.login.clone(),
                source: Some(e.into()),
            })?;
        if !session.authenticated() {
            return Err(RemoteError::Auth {
                login: target.login.clone(),
                source: None,
            });
        }

        session.set_timeout(target.command_timeout.map(millis).unwrap_or(0));

        let peer = format!("{}@{}", target.login, target.address);
        info!(peer = %peer, "ssh channel established");
        Ok(Self { session, peer })
    }
}

impl RemoteChannel for SshChannel {
    fn peer(&self) -> String {
        self.peer.clone()
    }

    fn open_session(&self) -> Result<Box<dyn RemoteSession>, RemoteError> {
        let channel = self
            .session
            .channel_session()
            .map_err(|e| RemoteError::session(SessionOp::Open, e))?;
        debug!(peer = %self.peer, "ssh session opened");
        Ok(Box::new(SshSession {
            channel,
            finished: false,
        }))
    }
}

struct SshSession {
    channel: Channel,
    /// Remote side already closed after a completed command.
    finished: bool,
}

impl RemoteSession for SshSession {
    fn run(&mut self, command: &str) -> Result<CommandOutput, RemoteError> {
        // stderr shares the stdout stream so a chatty stderr cannot fill its
        // window while we block on stdout.
        self.channel
            .handle_extended_data(ExtendedData::Merge)
            .map_err(RemoteError::exec)?;
        self.channel.exec(command).map_err(RemoteError::exec)?;

        let mut output = String::new();
        self.channel
            .read_to_string(&mut output)
            .map_err(RemoteError::exec)?;

        self.channel.wait_close().map_err(RemoteError::exec)?;
        self.finished = true;

        let exit_status = self.channel.exit_status().map_err(RemoteError::exec)?;
        completion(exit_status, output)
    }

    fn close(mut self: Box<Self>) -> Result<(), RemoteError> {
        if self.finished {
            return Ok(());
        }
        self.channel
            .close()
            .map_err(|e| RemoteError::session(SessionOp::Close, e))?;
        self.channel
            .wait_close()
            .map_err(|e| RemoteError::session(SessionOp::Close, e))
    }
}

/// Map a finished command's exit status. Exec plumbing itself needs a live
/// router and is not unit-tested.
fn completion(exit_status: i32, output: String) -> Result<CommandOutput, RemoteError> {
    if exit_status != 0 {
        return Err(RemoteError::CommandFailed {
            exit_status,
            output: output.trim().to_string(),
        });
    }
    Ok(CommandOutput {
        output,
        exit_status,
    })
}

fn dial(address: &str, timeout: Duration) -> Result<TcpStream, RemoteError> {
    let connect_err = |source: std::io::Error| RemoteError::Connect {
        address: address.to_string(),
        source: source.into(),
    };

    let addrs = address.to_socket_addrs().map_err(connect_err)?;

    let mut last_err = std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "address resolved to nothing",
    );
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = e,
        }
    }
    Err(connect_err(last_err))
}

fn verify_host_key(session: &Session, expected: &str) -> Result<(), RemoteError> {
    let actual = session
        .host_key_hash(HashType::Sha256)
        .map(hex::encode)
        .unwrap_or_default();
    if fingerprints_match(expected, &actual) {
        Ok(())
    } else {
        Err(RemoteError::HostKeyMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Case-insensitive hex compare; `:` separators in the pin are ignored.
fn fingerprints_match(expected: &str, actual: &str) -> bool {
    let normalized: String = expected
        .chars()
        .filter(|c| *c != ':')
        .collect::<String>()
        .to_ascii_lowercase();
    !actual.is_empty() && normalized == actual.to_ascii_lowercase()
}

fn millis(d: Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}
