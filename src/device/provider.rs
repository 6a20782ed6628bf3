//! Camera device collaborator traits and mock implementations.
//!
//! The session never touches hardware directly: it asks a [`DeviceProvider`]
//! to open a device by kind, receiving an opaque [`CameraDevice`] handle.
//! Mocks with inspectable shared state stand in for hardware in tests and
//! in the demo binary.

use super::input::{DeviceKind, FlashMode, TorchMode};
use std::sync::{Arc, Mutex, MutexGuard};

/// An opened camera device with adjustable light modes.
///
/// Mode setters return whether the hardware applied the requested mode;
/// a device that lacks a flash simply reports `false`.
pub trait CameraDevice: Send {
    /// Returns the kind of this device.
    fn kind(&self) -> DeviceKind;

    /// Attempts to apply a flash mode.
    fn set_flash_mode(&mut self, mode: FlashMode) -> bool;

    /// Attempts to apply a torch mode.
    fn set_torch_mode(&mut self, mode: TorchMode) -> bool;
}

/// Capability to enumerate and open camera devices by kind.
pub trait DeviceProvider: Send + Sync {
    /// Opens the device of the given kind, if one exists.
    fn open_device(&self, kind: DeviceKind) -> Option<Box<dyn CameraDevice>>;
}

#[derive(Debug)]
struct MockDeviceState {
    kind: DeviceKind,
    flash: FlashMode,
    torch: TorchMode,
    reject_flash: bool,
    reject_torch: bool,
}

/// Mock camera device backed by shared, inspectable state.
///
/// Clones share the same state, so tests can hand one clone to the
/// provider and keep another to observe mode changes.
#[derive(Debug, Clone)]
pub struct MockDevice {
    state: Arc<Mutex<MockDeviceState>>,
}

impl MockDevice {
    /// Creates a mock device of the given kind with all modes off.
    pub fn new(kind: DeviceKind) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockDeviceState {
                kind,
                flash: FlashMode::Off,
                torch: TorchMode::Off,
                reject_flash: false,
                reject_torch: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockDeviceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the currently applied flash mode.
    pub fn flash_mode(&self) -> FlashMode {
        self.state().flash
    }

    /// Returns the currently applied torch mode.
    pub fn torch_mode(&self) -> TorchMode {
        self.state().torch
    }

    /// Makes subsequent flash mode changes fail.
    pub fn reject_flash(&self, reject: bool) {
        self.state().reject_flash = reject;
    }

    /// Makes subsequent torch mode changes fail.
    pub fn reject_torch(&self, reject: bool) {
        self.state().reject_torch = reject;
    }
}

impl CameraDevice for MockDevice {
    fn kind(&self) -> DeviceKind {
        self.state().kind
    }

    fn set_flash_mode(&mut self, mode: FlashMode) -> bool {
        let mut state = self.state();
        if state.reject_flash {
            tracing::debug!(?mode, "MockDevice rejected flash mode");
            return false;
        }
        state.flash = mode;
        true
    }

    fn set_torch_mode(&mut self, mode: TorchMode) -> bool {
        let mut state = self.state();
        if state.reject_torch {
            tracing::debug!(?mode, "MockDevice rejected torch mode");
            return false;
        }
        state.torch = mode;
        true
    }
}

/// Mock provider holding a fixed set of mock devices.
#[derive(Debug, Clone, Default)]
pub struct MockDeviceProvider {
    devices: Vec<MockDevice>,
}

impl MockDeviceProvider {
    /// A provider with no devices at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a device to the provider.
    pub fn with_device(mut self, device: MockDevice) -> Self {
        self.devices.push(device);
        self
    }
}

impl DeviceProvider for MockDeviceProvider {
    fn open_device(&self, kind: DeviceKind) -> Option<Box<dyn CameraDevice>> {
        let found = self.devices.iter().find(|d| d.state().kind == kind);
        if found.is_none() {
            tracing::info!(?kind, "MockDeviceProvider has no device of kind");
        }
        found.map(|d| Box::new(d.clone()) as Box<dyn CameraDevice>)
    }
}
