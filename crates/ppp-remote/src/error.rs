pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOp {
    Open,
    Close,
}

impl std::fmt::Display for SessionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionOp::Open => write!(f, "new session"),
            SessionOp::Close => write!(f, "close session"),
        }
    }
}

/// Errors raised by a [`crate::RemoteChannel`] or [`crate::RemoteSession`].
///
/// `Connect`, `Handshake`, `Auth` and `HostKeyMismatch` only happen while the
/// channel is being established.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("dial {address}")]
    Connect {
        address: String,
        #[source]
        source: BoxError,
    },
    #[error("ssh handshake")]
    Handshake {
        #[source]
        source: BoxError,
    },
    #[error("authentication failed for user {login}")]
    Auth {
        login: String,
        #[source]
        source: Option<BoxError>,
    },
    #[error("host key mismatch: expected sha256 {expected}, got {actual}")]
    HostKeyMismatch { expected: String, actual: String },
    #[error("{op}")]
    Session {
        op: SessionOp,
        #[source]
        source: BoxError,
    },
    /// Transport failure while a command was running.
    #[error("run cmd")]
    Exec {
        #[source]
        source: BoxError,
    },
    /// The command ran but exited non-zero.
    #[error("run cmd: exit status {exit_status}: {output}")]
    CommandFailed { exit_status: i32, output: String },
}

impl RemoteError {
    pub fn session(op: SessionOp, source: impl Into<BoxError>) -> Self {
        Self::Session {
            op,
            source: source.into(),
        }
    }

    pub fn exec(source: impl Into<BoxError>) -> Self {
        Self::Exec {
            source: source.into(),
        }
    }

    /// True for session open/close failures.
    pub fn is_session(&self) -> bool {
        matches!(self, RemoteError::Session { .. })
    }
}
