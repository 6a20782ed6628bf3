//! Authorization provider trait and mock implementations.
//!
//! A provider answers a camera-access request through a one-shot callback.
//! The callback may run on any thread; the session is responsible for
//! tolerating that. Providers must invoke the responder at most once.

use std::sync::{Arc, Mutex, MutexGuard};

/// One-shot callback delivering the authorization answer.
pub type AuthorizationResponder = Box<dyn FnOnce(bool) + Send + 'static>;

/// Capability to ask the user or system for camera access.
pub trait AuthorizationProvider {
    /// Issues an access request, resuming through `respond` exactly once.
    ///
    /// `respond` may be invoked synchronously from inside this call or
    /// later from an arbitrary thread.
    fn request_access(&self, respond: AuthorizationResponder);
}

/// Mock provider that answers immediately with a fixed result.
#[derive(Debug, Clone, Copy)]
pub struct MockAuthorizer {
    grant: bool,
}

impl MockAuthorizer {
    /// A provider that grants every request.
    pub fn granting() -> Self {
        Self { grant: true }
    }

    /// A provider that denies every request.
    pub fn denying() -> Self {
        Self { grant: false }
    }
}

impl AuthorizationProvider for MockAuthorizer {
    fn request_access(&self, respond: AuthorizationResponder) {
        tracing::info!(grant = self.grant, "MockAuthorizer answering immediately");
        respond(self.grant);
    }
}

/// Mock provider that parks the responder until told to resolve.
///
/// Models the delay of a real permission prompt: construct the session,
/// attach a delegate, then call [`resolve`] to deliver the answer. A second
/// `resolve` is a logged no-op, matching the at-most-once contract.
///
/// [`resolve`]: ManualAuthorizer::resolve
#[derive(Default)]
pub struct ManualAuthorizer {
    pending: Mutex<Option<AuthorizationResponder>>,
}

impl ManualAuthorizer {
    /// Creates an authorizer with no request in flight.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn pending(&self) -> MutexGuard<'_, Option<AuthorizationResponder>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns true while a request is waiting for an answer.
    pub fn has_pending(&self) -> bool {
        self.pending().is_some()
    }

    /// Delivers the answer to the parked request, if any.
    pub fn resolve(&self, granted: bool) {
        let responder = self.pending().take();
        match responder {
            Some(respond) => {
                tracing::info!(granted, "ManualAuthorizer resolving parked request");
                respond(granted);
            }
            None => {
                tracing::warn!(granted, "ManualAuthorizer has no parked request to resolve");
            }
        }
    }
}

impl AuthorizationProvider for ManualAuthorizer {
    fn request_access(&self, respond: AuthorizationResponder) {
        let mut pending = self.pending();
        if pending.is_some() {
            tracing::warn!("ManualAuthorizer dropping second concurrent request");
            return;
        }
        *pending = Some(respond);
        tracing::debug!("ManualAuthorizer parked access request");
    }
}
