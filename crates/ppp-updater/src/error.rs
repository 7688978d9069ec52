use ppp_db::FetchError;
use ppp_remote::RemoteError;

/// Step of an update call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Prepare,
    Query,
    Scan,
    Iterate,
    Erase,
    Rebuild,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Prepare => "prepare",
            Phase::Query => "query",
            Phase::Scan => "scan",
            Phase::Iterate => "iterate",
            Phase::Erase => "erase previous",
            Phase::Rebuild => "rebuild",
        };
        f.write_str(s)
    }
}

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Query,
    Scan,
    Iteration,
    Session,
    RemoteCommand,
}

/// Terminal failure of one update call.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{phase}")]
    Remote {
        phase: Phase,
        #[source]
        source: RemoteError,
    },
}

impl UpdateError {
    pub(crate) fn remote(phase: Phase, source: RemoteError) -> Self {
        Self::Remote { phase, source }
    }

    pub fn phase(&self) -> Phase {
        match self {
            UpdateError::Fetch(FetchError::Prepare { .. }) => Phase::Prepare,
            UpdateError::Fetch(FetchError::Query { .. }) => Phase::Query,
            UpdateError::Fetch(FetchError::Scan { .. }) => Phase::Scan,
            UpdateError::Fetch(FetchError::Iterate { .. }) => Phase::Iterate,
            UpdateError::Remote { phase, .. } => *phase,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UpdateError::Fetch(FetchError::Prepare { .. })
            | UpdateError::Fetch(FetchError::Query { .. }) => ErrorKind::Query,
            UpdateError::Fetch(FetchError::Scan { .. }) => ErrorKind::Scan,
            UpdateError::Fetch(FetchError::Iterate { .. }) => ErrorKind::Iteration,
            UpdateError::Remote { source, .. } if source.is_session() => ErrorKind::Session,
            UpdateError::Remote { .. } => ErrorKind::RemoteCommand,
        }
    }
}
