//! Device kinds, light modes, and the bound input wrapper.

use super::provider::{CameraDevice, DeviceProvider};
use serde::{Deserialize, Serialize};

/// Which physical camera to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Rear-facing camera.
    Back,
    /// User-facing camera.
    Front,
}

impl Default for DeviceKind {
    fn default() -> Self {
        DeviceKind::Back
    }
}

/// Per-capture flash setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    /// Flash never fires.
    Off,
    /// Flash fires on every capture.
    On,
    /// Device decides per capture.
    Auto,
}

impl Default for FlashMode {
    fn default() -> Self {
        FlashMode::Off
    }
}

/// Continuous light setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TorchMode {
    /// Torch off.
    Off,
    /// Torch continuously lit.
    On,
    /// Device decides based on scene light.
    Auto,
}

impl Default for TorchMode {
    fn default() -> Self {
        TorchMode::Off
    }
}

/// A bound camera device and its adjustable modes.
///
/// Created during session setup by [`DeviceInput::bind`] and owned
/// exclusively by the session. Mode setters report hardware acceptance
/// as a bool and never fail.
pub struct DeviceInput {
    kind: DeviceKind,
    device: Box<dyn CameraDevice>,
}

impl DeviceInput {
    /// Selects and opens a device of the given kind.
    ///
    /// Returns `None` when the provider has no such device; callers treat
    /// that as a degraded state, not an error.
    pub fn bind(provider: &dyn DeviceProvider, kind: DeviceKind) -> Option<Self> {
        match provider.open_device(kind) {
            Some(device) => {
                tracing::info!(?kind, "Bound camera device input");
                Some(Self { kind, device })
            }
            None => {
                tracing::warn!(?kind, "No camera device available for kind");
                None
            }
        }
    }

    /// Returns the kind this input was bound for.
    #[inline]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Applies a flash mode, returning whether the hardware accepted it.
    pub fn set_flash_mode(&mut self, mode: FlashMode) -> bool {
        let applied = self.device.set_flash_mode(mode);
        tracing::debug!(?mode, applied, "Flash mode change");
        applied
    }

    /// Applies a torch mode, returning whether the hardware accepted it.
    pub fn set_torch_mode(&mut self, mode: TorchMode) -> bool {
        let applied = self.device.set_torch_mode(mode);
        tracing::debug!(?mode, applied, "Torch mode change");
        applied
    }
}

impl std::fmt::Debug for DeviceInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceInput").field("kind", &self.kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{MockDevice, MockDeviceProvider};

    #[test]
    fn test_bind_returns_none_without_device() {
        let provider = MockDeviceProvider::empty();
        assert!(DeviceInput::bind(&provider, DeviceKind::Back).is_none());
    }

    #[test]
    fn test_bind_selects_by_kind() {
        let provider = MockDeviceProvider::empty().with_device(MockDevice::new(DeviceKind::Front));

        assert!(DeviceInput::bind(&provider, DeviceKind::Back).is_none());

        let input = DeviceInput::bind(&provider, DeviceKind::Front).unwrap();
        assert_eq!(input.kind(), DeviceKind::Front);
    }

    #[test]
    fn test_mode_setters_reach_device() {
        let device = MockDevice::new(DeviceKind::Back);
        let provider = MockDeviceProvider::empty().with_device(device.clone());
        let mut input = DeviceInput::bind(&provider, DeviceKind::Back).unwrap();

        assert!(input.set_flash_mode(FlashMode::On));
        assert_eq!(device.flash_mode(), FlashMode::On);

        assert!(input.set_torch_mode(TorchMode::Auto));
        assert_eq!(device.torch_mode(), TorchMode::Auto);
    }

    #[test]
    fn test_rejected_mode_reports_false() {
        let device = MockDevice::new(DeviceKind::Back);
        device.reject_flash(true);
        let provider = MockDeviceProvider::empty().with_device(device.clone());
        let mut input = DeviceInput::bind(&provider, DeviceKind::Back).unwrap();

        assert!(!input.set_flash_mode(FlashMode::On));
        assert_eq!(device.flash_mode(), FlashMode::Off);
    }
}
