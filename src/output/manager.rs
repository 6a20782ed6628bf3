//! Idempotent output attachment policy.
//!
//! Attachment is check-then-add: an already-attached output is left alone,
//! a rejected one is a silent degradation. At most one output of a kind
//! ever ends up on a host.

use super::host::{OutputKind, SessionHost};

/// Which standard outputs made it onto the session during setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputAttachment {
    /// Movie stream attached.
    pub movie: bool,
    /// Still-image sink attached.
    pub still_image: bool,
}

/// Attaches one output kind, idempotently.
///
/// Returns true if the output is present after the call (already attached
/// or freshly added), false if the host rejected it.
pub fn attach_output(host: &mut dyn SessionHost, kind: OutputKind) -> bool {
    if host.has_output(kind) {
        tracing::debug!(?kind, "Output already attached");
        return true;
    }
    if !host.can_add_output(kind) {
        tracing::warn!(?kind, "Host rejected output attachment");
        return false;
    }
    host.add_output(kind);
    tracing::info!(?kind, "Output attached");
    true
}

/// Attaches the standard movie and still-image outputs used by setup.
pub fn attach_standard_outputs(host: &mut dyn SessionHost) -> OutputAttachment {
    OutputAttachment {
        movie: attach_output(host, OutputKind::Movie),
        still_image: attach_output(host, OutputKind::StillImage),
    }
}
