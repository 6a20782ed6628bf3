//! Observer surface for session notifications.

use crate::output::CapturedImage;

/// Receives session notifications.
///
/// Both methods have no-op defaults, so implementers handle only what they
/// care about. The session holds the delegate weakly: registration
/// transfers no ownership, and a delegate that has been dropped is simply
/// skipped at notification time.
pub trait SessionDelegate: Send + Sync {
    /// Authorization resolved; delivered exactly once per session.
    fn device_authorized(&self, _authorized: bool) {}

    /// A still capture completed and was encoded.
    fn captured_picture(&self, _picture: CapturedImage) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    // A delegate that overrides nothing still satisfies the trait.
    struct Uninterested;
    impl SessionDelegate for Uninterested {}

    #[test]
    fn test_default_notifications_are_noops() {
        let delegate = Uninterested;
        delegate.device_authorized(true);
        delegate.captured_picture(CapturedImage::new(vec![1, 2, 3]));
    }
}
