//! Session lifecycle and the authorization-gated operation surface.
//!
//! [`CaptureSession`] is the aggregate root: it owns the authorization
//! gate, the setup state machine, the bound device input, and the pipeline
//! handle, and exposes the capture, flash, torch, and preview operations.

mod controller;
mod delegate;
mod state;

pub use controller::{CaptureSession, SessionError};
pub use delegate::SessionDelegate;
pub use state::SetupState;
