//! Remote command boundary to the router.
//!
//! This crate defines the channel/session contract, the scoped session
//! guard every caller goes through, and the SSH implementation. All calls
//! are blocking; the channel's connect timeout is the only deadline.

mod error;
mod guard;
mod ssh;

pub use error::{BoxError, RemoteError, SessionOp};
pub use guard::SessionGuard;
pub use ssh::{SshChannel, SshTarget, DEFAULT_CONNECT_TIMEOUT};

// ---------------------------------------------------------------------------
// Channel contract
// ---------------------------------------------------------------------------

/// Output of one completed remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// stdout and stderr, interleaved as the router wrote them.
    pub output: String,
    pub exit_status: i32,
}

/// An authenticated, long-lived connection that hands out sessions.
///
/// Shared across update calls. Implementations need not multiplex
/// concurrent sessions.
pub trait RemoteChannel: Send + Sync {
    /// Human-readable peer identity for logs (never includes credentials).
    fn peer(&self) -> String;

    fn open_session(&self) -> Result<Box<dyn RemoteSession>, RemoteError>;
}

/// One unit of remote command execution.
///
/// Prefer [`SessionGuard`] over driving this directly: it guarantees
/// `close` runs on every exit path.
pub trait RemoteSession: Send {
    /// Run `command` to completion. A non-zero exit is an error.
    fn run(&mut self, command: &str) -> Result<CommandOutput, RemoteError>;

    fn close(self: Box<Self>) -> Result<(), RemoteError>;
}
