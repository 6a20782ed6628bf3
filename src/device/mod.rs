//! Camera device selection and input binding.
//!
//! The physical camera is an external collaborator reached through the
//! [`DeviceProvider`] and [`CameraDevice`] traits. The session core only
//! ever holds a [`DeviceInput`], which wraps whatever device the provider
//! opened and exposes the adjustable light modes.

mod input;
mod provider;

pub use input::{DeviceInput, DeviceKind, FlashMode, TorchMode};
pub use provider::{CameraDevice, DeviceProvider, MockDevice, MockDeviceProvider};
