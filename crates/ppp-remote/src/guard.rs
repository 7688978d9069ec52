use tracing::warn;

use crate::{CommandOutput, RemoteChannel, RemoteError, RemoteSession};

/// Scoped session: opened on construction, closed exactly once.
///
/// Call [`SessionGuard::close`] on the success path to observe close errors.
/// If the guard is dropped instead (early return, `?`, panic unwind), the
/// session is closed in `Drop` and a close failure is only logged, since the
/// caller is already propagating a different error.
pub struct SessionGuard {
    session: Option<Box<dyn RemoteSession>>,
}

impl SessionGuard {
    pub fn open(channel: &dyn RemoteChannel) -> Result<Self, RemoteError> {
        let session = channel.open_session()?;
        Ok(Self {
            session: Some(session),
        })
    }

    // `session` is only emptied by `close` (which consumes the guard) and by
    // `Drop`, so it is always present while the guard is reachable.

    pub fn run(&mut self, command: &str) -> Result<CommandOutput, RemoteError> {
        self.session
            .as_mut()
            .expect("session held until the guard is consumed")
            .run(command)
    }

    pub fn close(mut self) -> Result<(), RemoteError> {
        self.session
            .take()
            .expect("session held until the guard is consumed")
            .close()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.close() {
                warn!(error = %e, "remote session close failed during unwind");
            }
        }
    }
}
