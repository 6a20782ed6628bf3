//! Preview surface geometry and factory.

use crate::output::SessionHost;

/// Rectangular frame for a preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Horizontal origin.
    pub x: f32,
    /// Vertical origin.
    pub y: f32,
    /// Surface width.
    pub width: f32,
    /// Surface height.
    pub height: f32,
}

impl Bounds {
    /// Creates a bounds rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true when the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A renderable view onto the live camera feed.
///
/// The surface is pure core-side state; rendering belongs to the factory
/// implementation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSurface {
    bounds: Bounds,
}

impl PreviewSurface {
    /// Creates a surface covering the given bounds.
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Returns the bounds this surface was created with.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Capability to produce a preview surface bound to a session pipeline.
pub trait PreviewFactory: Send + Sync {
    /// Creates a surface over the host's live feed, or declines.
    fn make_surface(&self, host: &dyn SessionHost, bounds: Bounds) -> Option<PreviewSurface>;
}

/// Mock factory that allocates plain surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPreviewFactory {
    fail: bool,
}

impl MockPreviewFactory {
    /// A factory that always produces a surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that declines every request.
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl PreviewFactory for MockPreviewFactory {
    fn make_surface(&self, _host: &dyn SessionHost, bounds: Bounds) -> Option<PreviewSurface> {
        if self.fail {
            tracing::debug!(?bounds, "MockPreviewFactory declining surface");
            return None;
        }
        tracing::debug!(?bounds, "MockPreviewFactory allocated surface");
        Some(PreviewSurface::new(bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MockHost;

    #[test]
    fn test_bounds_emptiness() {
        assert!(Bounds::default().is_empty());
        assert!(Bounds::new(0.0, 0.0, 100.0, 0.0).is_empty());
        assert!(!Bounds::new(10.0, 20.0, 320.0, 240.0).is_empty());
    }

    #[test]
    fn test_surface_reflects_requested_bounds() {
        let host = MockHost::new();
        let bounds = Bounds::new(0.0, 0.0, 640.0, 480.0);

        let surface = MockPreviewFactory::new().make_surface(&host, bounds).unwrap();
        assert_eq!(surface.bounds(), bounds);
    }

    #[test]
    fn test_failing_factory() {
        let host = MockHost::new();
        let bounds = Bounds::new(0.0, 0.0, 64.0, 64.0);
        assert!(MockPreviewFactory::failing().make_surface(&host, bounds).is_none());
    }
}
