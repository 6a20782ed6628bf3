//! Live preview surfaces.
//!
//! Preview creation is independent of authorization: a surface can be
//! requested whenever the session still has an underlying pipeline handle.

mod surface;

pub use surface::{Bounds, MockPreviewFactory, PreviewFactory, PreviewSurface};
