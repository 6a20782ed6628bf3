//! Authorization state machine.
//!
//! One request, one resolution. A denied gate stays denied for the life
//! of the session; re-authorization means constructing a new session.

/// Authorization status for camera access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationState {
    /// No request has been issued yet.
    Unrequested,
    /// A request is in flight, awaiting the provider's answer.
    Pending,
    /// Access granted; gated operations may proceed.
    Authorized,
    /// Access denied; gated operations fail permanently.
    Denied,
}

impl Default for AuthorizationState {
    fn default() -> Self {
        AuthorizationState::Unrequested
    }
}

/// Tracks the single authorization request a session performs.
///
/// The gate is the one enforcement point for the "no operation before
/// authorization" contract: every gated operation asks [`is_authorized`]
/// and nothing else.
///
/// [`is_authorized`]: AuthorizationGate::is_authorized
#[derive(Debug, Default)]
pub struct AuthorizationGate {
    state: AuthorizationState,
}

impl AuthorizationGate {
    /// Creates a gate in the `Unrequested` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> AuthorizationState {
        self.state
    }

    /// Returns true once access has been granted.
    #[inline]
    pub fn is_authorized(&self) -> bool {
        self.state == AuthorizationState::Authorized
    }

    /// Marks the request as issued.
    ///
    /// Returns false if a request was already issued; the caller must not
    /// issue a second one.
    pub fn begin_request(&mut self) -> bool {
        if self.state != AuthorizationState::Unrequested {
            tracing::warn!(state = ?self.state, "Duplicate authorization request suppressed");
            return false;
        }
        self.state = AuthorizationState::Pending;
        tracing::debug!("Authorization request issued");
        true
    }

    /// Records the provider's answer.
    ///
    /// Only a `Pending` gate accepts a resolution; duplicate or stale
    /// resolutions are rejected and return false.
    pub fn resolve(&mut self, granted: bool) -> bool {
        if self.state != AuthorizationState::Pending {
            tracing::warn!(state = ?self.state, granted, "Stale authorization resolution ignored");
            return false;
        }
        self.state = if granted {
            AuthorizationState::Authorized
        } else {
            AuthorizationState::Denied
        };
        tracing::info!(granted, "Authorization resolved");
        true
    }
}
