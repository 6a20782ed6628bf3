//! Camera Capture Session Library
//!
//! An authorization-gated controller for the lifecycle of a camera capture
//! session: requesting device permission, binding an input, attaching
//! outputs, producing a live preview surface, capturing still images, and
//! toggling flash/torch modes.
//!
//! # Architecture
//!
//! The session core only consumes capabilities; hardware stays outside:
//!
//! ```text
//! authorization ──> lifecycle setup ──> gated operations
//!       │                 │                   │
//!   provider        device provider     host / encoder / preview
//!   (trait)           (trait)                (traits)
//! ```
//!
//! # Design Principles
//!
//! - **Authorization first**: no gated operation succeeds before the single
//!   per-session grant; denial is permanent for that session instance
//! - **Silent degradation**: a missing device, a rejected output, or a
//!   dropped capture buffer never raises an error; the session stays alive
//!   in a reduced state observable through its state accessors
//! - **Callback tolerant**: authorization and capture completions may
//!   arrive on any thread; completions hold only weak session references
//!
//! # Example
//!
//! ```
//! use camera_session::{
//!     Bounds, CaptureSession, FlashMode, FrameBuffer, ManualAuthorizer, MockDevice,
//!     MockDeviceProvider, MockHost, MockPreviewFactory, PgmEncoder, SessionConfig,
//! };
//!
//! let authorizer = ManualAuthorizer::new();
//! let host = MockHost::new();
//! let device = MockDevice::new(Default::default());
//! let provider = MockDeviceProvider::empty().with_device(device.clone());
//!
//! let session = CaptureSession::start(
//!     authorizer.as_ref(),
//!     Box::new(host.clone()),
//!     Box::new(provider),
//!     Box::new(PgmEncoder::new()),
//!     Box::new(MockPreviewFactory::new()),
//!     SessionConfig::default(),
//! );
//!
//! // The preview surface works even while the prompt is still pending.
//! let surface = session.preview_surface(Bounds::new(0.0, 0.0, 320.0, 240.0));
//! assert!(surface.is_some());
//!
//! // Everything else waits for the grant.
//! assert!(session.change_flash_mode(FlashMode::Auto).is_err());
//! authorizer.resolve(true);
//! assert_eq!(session.change_flash_mode(FlashMode::Auto), Ok(true));
//!
//! // Still captures complete asynchronously through the delegate.
//! host.queue_capture(Some(FrameBuffer::new(vec![0u8; 320 * 240], 320, 240)));
//! session.capture_picture().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod device;
pub mod output;
pub mod preview;
pub mod session;

// Re-export commonly used types at crate root
pub use auth::{
    AuthorizationGate, AuthorizationProvider, AuthorizationResponder, AuthorizationState,
    ManualAuthorizer, MockAuthorizer,
};
pub use config::{ConfigError, DemoConfig, FileConfig, SessionConfig};
pub use device::{
    CameraDevice, DeviceInput, DeviceKind, DeviceProvider, FlashMode, MockDevice,
    MockDeviceProvider, TorchMode,
};
pub use output::{
    CapturedImage, FrameBuffer, MockHost, OutputKind, PgmEncoder, SessionHost, StillImageEncoder,
};
pub use preview::{Bounds, MockPreviewFactory, PreviewFactory, PreviewSurface};
pub use session::{CaptureSession, SessionDelegate, SessionError, SetupState};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
