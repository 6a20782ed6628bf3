//! Capture outputs: session host capability, attachment policy, encoding.
//!
//! The underlying capture pipeline is an external collaborator reached
//! through the [`SessionHost`] trait. This module owns the idempotent
//! output-attachment policy and the still-image encoding boundary.

mod encoder;
mod host;
mod manager;

pub use encoder::{CapturedImage, PgmEncoder, StillImageEncoder};
pub use host::{FrameBuffer, MockHost, OutputKind, SessionHost, StillCaptureCallback};
pub use manager::{attach_output, attach_standard_outputs, OutputAttachment};
