//! Camera-usage authorization.
//!
//! Authorization resolves asynchronously, exactly once per session instance.
//! The [`AuthorizationGate`] tracks the request/resolution state machine;
//! the [`AuthorizationProvider`] trait is the external capability that
//! actually prompts the user or system.

mod gate;
mod provider;

pub use gate::{AuthorizationGate, AuthorizationState};
pub use provider::{AuthorizationProvider, AuthorizationResponder, ManualAuthorizer, MockAuthorizer};
