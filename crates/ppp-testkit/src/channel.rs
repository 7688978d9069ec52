use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use ppp_remote::{CommandOutput, RemoteChannel, RemoteError, RemoteSession, SessionOp};

/// Something that happened on the fake router, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Open(usize),
    Run(usize, String),
    Close(usize),
}

/// Scripted failure for one session (by zero-based open order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailure {
    Open,
    Run,
    Close,
}

#[derive(Default)]
struct Inner {
    events: Vec<SessionEvent>,
    next_id: usize,
    failures: BTreeMap<usize, RemoteFailure>,
}

/// [`RemoteChannel`] that records every session call.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_session(self, index: usize, failure: RemoteFailure) -> Self {
        lock(&self.inner).failures.insert(index, failure);
        self
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        lock(&self.inner).events.clone()
    }

    /// Sessions attempted, including ones whose open failed.
    pub fn sessions_opened(&self) -> usize {
        lock(&self.inner).next_id
    }

    /// Commands that reached the router, in order.
    pub fn commands(&self) -> Vec<String> {
        lock(&self.inner)
            .events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Run(_, cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect()
    }
}

impl RemoteChannel for RecordingChannel {
    fn peer(&self) -> String {
        "recording".to_string()
    }

    fn open_session(&self) -> Result<Box<dyn RemoteSession>, RemoteError> {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        let failure = inner.failures.get(&id).copied();

        if failure == Some(RemoteFailure::Open) {
            return Err(RemoteError::session(SessionOp::Open, "channel open refused"));
        }
        inner.events.push(SessionEvent::Open(id));

        Ok(Box::new(RecordingSession {
            id,
            failure,
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct RecordingSession {
    id: usize,
    failure: Option<RemoteFailure>,
    inner: Arc<Mutex<Inner>>,
}

impl RemoteSession for RecordingSession {
    fn run(&mut self, command: &str) -> Result<CommandOutput, RemoteError> {
        lock(&self.inner)
            .events
            .push(SessionEvent::Run(self.id, command.to_string()));

        if self.failure == Some(RemoteFailure::Run) {
            return Err(RemoteError::CommandFailed {
                exit_status: 1,
                output: "failure: scripted".to_string(),
            });
        }
        Ok(CommandOutput::default())
    }

    fn close(self: Box<Self>) -> Result<(), RemoteError> {
        lock(&self.inner).events.push(SessionEvent::Close(self.id));

        if self.failure == Some(RemoteFailure::Close) {
            return Err(RemoteError::session(SessionOp::Close, "close: broken pipe"));
        }
        Ok(())
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
