//! A shared slot for the one session a host embeds.
//!
//! Mirrors a provider/consumer split: wiring code installs the session once,
//! consumers borrow it through the context and get a hard error instead of
//! silent garbage when nothing was installed.

use crate::error::{Result, TimerError};
use crate::session::Session;
use crate::timer::Snapshot;

/// Owns at most one [`Session`].
#[derive(Debug, Default)]
pub struct SessionContext {
    inner: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session, replacing any previous one.
    pub fn install(&mut self, session: Session) -> &mut Session {
        self.inner.insert(session)
    }

    /// Drop the active session, if any.
    pub fn clear(&mut self) {
        self.inner = None;
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    /// Borrow the active session.
    pub fn session(&self) -> Result<&Session> {
        self.inner.as_ref().ok_or(TimerError::NoActiveSession)
    }

    /// Borrow the active session mutably (the dispatch path).
    pub fn session_mut(&mut self) -> Result<&mut Session> {
        self.inner.as_mut().ok_or(TimerError::NoActiveSession)
    }

    /// Convenience read of the active session's snapshot.
    pub fn snapshot(&self) -> Result<Snapshot> {
        self.session()?.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ConfigPatch;

    #[test]
    fn empty_context_is_a_hard_error() {
        let ctx = SessionContext::new();
        assert!(matches!(ctx.session(), Err(TimerError::NoActiveSession)));
        assert!(matches!(ctx.snapshot(), Err(TimerError::NoActiveSession)));
        assert!(!ctx.is_active());
    }

    #[test]
    fn install_then_read() {
        let mut ctx = SessionContext::new();
        ctx.install(Session::new(ConfigPatch::default()).unwrap());
        assert!(ctx.is_active());
        let snap = ctx.snapshot().unwrap();
        assert_eq!(snap.view.formatted_time, "25:00");
    }

    #[test]
    fn clear_uninstalls() {
        let mut ctx = SessionContext::new();
        ctx.install(Session::new(ConfigPatch::default()).unwrap());
        ctx.clear();
        assert!(ctx.session_mut().is_err());
    }
}
