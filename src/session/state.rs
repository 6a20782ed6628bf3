//! Setup state machine for the capture session.

/// Configuration progress of a session.
///
/// Setup advances `Unconfigured → Configuring → Running` exactly once, on
/// successful authorization. A failed device binding stalls the session in
/// `Configuring` permanently; there is no retry and no teardown state
/// short of dropping the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupState {
    /// No setup attempted yet.
    Unconfigured,
    /// Setup started; input binding or output attachment in progress.
    Configuring,
    /// Input bound, outputs attached, pipeline started.
    Running,
}

impl Default for SetupState {
    fn default() -> Self {
        SetupState::Unconfigured
    }
}

impl SetupState {
    /// Returns true once setup completed.
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, SetupState::Running)
    }
}
