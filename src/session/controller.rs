//! The capture session aggregate.
//!
//! Construction issues the authorization request; a grant runs setup
//! exactly once (bind input, attach outputs, start the pipeline); the
//! gated operations share a single authorization guard. Degradations
//! along the way are silent: they keep the session alive in a reduced
//! state and surface only through tracing and the state accessors.

use super::delegate::SessionDelegate;
use super::state::SetupState;
use crate::auth::{AuthorizationGate, AuthorizationProvider, AuthorizationState};
use crate::config::SessionConfig;
use crate::device::{DeviceInput, DeviceProvider, FlashMode, TorchMode};
use crate::output::{
    attach_standard_outputs, FrameBuffer, OutputKind, SessionHost, StillImageEncoder,
};
use crate::preview::{Bounds, PreviewFactory, PreviewSurface};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use thiserror::Error;

/// Errors raised synchronously by gated session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Camera access has not been granted (pending or denied).
    #[error("camera access not authorized")]
    NotAuthorized,
}

/// State mutated by the lifecycle controller and read by operations.
struct SessionInner {
    gate: AuthorizationGate,
    setup: SetupState,
    input: Option<DeviceInput>,
}

/// An authorization-gated camera capture session.
///
/// Shared as `Arc<CaptureSession>` because the authorization and capture
/// completions may arrive on any thread; completions capture only a
/// [`Weak`] reference and become no-ops once the session is dropped.
///
/// The pipeline handle lives in its own slot and is taken out of it for
/// the duration of any collaborator call, so no session lock is held
/// while external code runs: a capture completion or delegate may call
/// back into the session's accessors freely. While the handle is out,
/// concurrent captures and previews see "no pipeline" and degrade
/// silently.
///
/// # Example
///
/// ```
/// use camera_session::{
///     Bounds, CaptureSession, ManualAuthorizer, MockDevice, MockDeviceProvider, MockHost,
///     MockPreviewFactory, PgmEncoder, SessionConfig,
/// };
///
/// let authorizer = ManualAuthorizer::new();
/// let host = MockHost::new();
/// let provider = MockDeviceProvider::empty().with_device(MockDevice::new(Default::default()));
///
/// let session = CaptureSession::start(
///     authorizer.as_ref(),
///     Box::new(host.clone()),
///     Box::new(provider),
///     Box::new(PgmEncoder::new()),
///     Box::new(MockPreviewFactory::new()),
///     SessionConfig::default(),
/// );
///
/// // Preview needs no authorization.
/// assert!(session.preview_surface(Bounds::new(0.0, 0.0, 320.0, 240.0)).is_some());
///
/// // Gated operations fail until the prompt resolves.
/// assert!(session.capture_picture().is_err());
/// authorizer.resolve(true);
/// assert!(session.is_running());
/// ```
pub struct CaptureSession {
    inner: Mutex<SessionInner>,
    host: Mutex<Option<Box<dyn SessionHost>>>,
    delegate: Mutex<Option<Weak<dyn SessionDelegate>>>,
    devices: Box<dyn DeviceProvider>,
    encoder: Box<dyn StillImageEncoder>,
    previews: Box<dyn PreviewFactory>,
    config: SessionConfig,
}

impl CaptureSession {
    /// Creates a session and issues the one authorization request.
    ///
    /// The provider's answer may arrive on any thread, before or after
    /// this call returns. Attach a delegate before resolution if the
    /// `device_authorized` notification matters to you; with an
    /// immediately-resolving provider that notification has nowhere to go.
    pub fn start(
        authorizer: &dyn AuthorizationProvider,
        host: Box<dyn SessionHost>,
        devices: Box<dyn DeviceProvider>,
        encoder: Box<dyn StillImageEncoder>,
        previews: Box<dyn PreviewFactory>,
        config: SessionConfig,
    ) -> Arc<Self> {
        let session = Arc::new(Self {
            inner: Mutex::new(SessionInner {
                gate: AuthorizationGate::new(),
                setup: SetupState::Unconfigured,
                input: None,
            }),
            host: Mutex::new(Some(host)),
            delegate: Mutex::new(None),
            devices,
            encoder,
            previews,
            config,
        });

        session.lock_inner().gate.begin_request();

        let weak = Arc::downgrade(&session);
        authorizer.request_access(Box::new(move |granted| {
            if let Some(session) = weak.upgrade() {
                session.resolve_authorization(granted);
            }
        }));

        session
    }

    /// Registers a non-owning delegate, replacing any previous one.
    ///
    /// The session keeps only a weak reference; the caller retains
    /// ownership and may drop the delegate at any time.
    pub fn set_delegate<D: SessionDelegate + 'static>(&self, delegate: &Arc<D>) {
        let weak: Weak<D> = Arc::downgrade(delegate);
        let weak: Weak<dyn SessionDelegate> = weak;
        *self.lock_delegate() = Some(weak);
    }

    /// Returns the current authorization state.
    pub fn authorization_state(&self) -> AuthorizationState {
        self.lock_inner().gate.state()
    }

    /// Returns the current setup state.
    pub fn setup_state(&self) -> SetupState {
        self.lock_inner().setup
    }

    /// Returns whether the underlying pipeline is running.
    pub fn is_running(&self) -> bool {
        let running = self.lock_host().as_deref().map(|host| host.is_running());
        // The handle is briefly out of its slot while a collaborator
        // runs; answer from the setup state so callers inside a capture
        // completion still see the truth.
        running.unwrap_or_else(|| self.lock_inner().setup.is_running())
    }

    /// Creates a preview surface over the live feed.
    ///
    /// Available regardless of authorization state; `None` when the
    /// session has no pipeline handle or the factory declines.
    pub fn preview_surface(&self, bounds: Bounds) -> Option<PreviewSurface> {
        let taken = self.lock_host().take();
        let host = taken?;
        let surface = self.previews.make_surface(&*host, bounds);
        *self.lock_host() = Some(host);
        surface
    }

    /// Issues one asynchronous still capture.
    ///
    /// Fails with [`SessionError::NotAuthorized`] before a grant. With no
    /// still-image output attached the call is a silent no-op. A completed
    /// capture whose buffer is absent or fails to encode is dropped
    /// without any notification; a successful one reaches the delegate's
    /// `captured_picture` exactly once. Captures cannot be cancelled.
    ///
    /// The completion may run synchronously inside this call; no session
    /// lock is held while it does, so it may query the session.
    pub fn capture_picture(self: &Arc<Self>) -> Result<(), SessionError> {
        self.check_authorized()?;

        let taken = self.lock_host().take();
        let Some(mut host) = taken else {
            tracing::debug!("Capture requested without pipeline handle; ignoring");
            return Ok(());
        };

        if host.has_output(OutputKind::StillImage) {
            let weak = Arc::downgrade(self);
            host.capture_still(Box::new(move |buffer| {
                if let Some(session) = weak.upgrade() {
                    session.deliver_capture(buffer);
                }
            }));
        } else {
            tracing::debug!("Capture requested without still-image output; ignoring");
        }

        *self.lock_host() = Some(host);
        Ok(())
    }

    /// Applies a flash mode to the bound device.
    ///
    /// Fails with [`SessionError::NotAuthorized`] before a grant. Without
    /// a bound input the result is `Ok(false)`; otherwise the bool is the
    /// hardware's acceptance of the mode.
    pub fn change_flash_mode(&self, mode: FlashMode) -> Result<bool, SessionError> {
        self.check_authorized()?;
        Ok(self
            .lock_inner()
            .input
            .as_mut()
            .map(|input| input.set_flash_mode(mode))
            .unwrap_or(false))
    }

    /// Applies a torch mode to the bound device. Same contract as
    /// [`change_flash_mode`](CaptureSession::change_flash_mode).
    pub fn change_torch_mode(&self, mode: TorchMode) -> Result<bool, SessionError> {
        self.check_authorized()?;
        Ok(self
            .lock_inner()
            .input
            .as_mut()
            .map(|input| input.set_torch_mode(mode))
            .unwrap_or(false))
    }

    fn lock_inner(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_host(&self) -> MutexGuard<'_, Option<Box<dyn SessionHost>>> {
        self.host.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_delegate(&self) -> MutexGuard<'_, Option<Weak<dyn SessionDelegate>>> {
        self.delegate.lock().unwrap_or_else(|e| e.into_inner())
    }

    // The single enforcement point for the authorization contract.
    // Authorization is monotonic once resolved, so the released lock
    // cannot invalidate the answer before the operation proceeds.
    fn check_authorized(&self) -> Result<(), SessionError> {
        if self.lock_inner().gate.is_authorized() {
            Ok(())
        } else {
            Err(SessionError::NotAuthorized)
        }
    }

    /// Runs `f` against the delegate if one is registered and still alive.
    fn notify(&self, f: impl FnOnce(&dyn SessionDelegate)) {
        let delegate = self.lock_delegate().as_ref().and_then(|weak| weak.upgrade());
        if let Some(delegate) = delegate {
            f(delegate.as_ref());
        }
    }

    fn resolve_authorization(&self, granted: bool) {
        let accepted = self.lock_inner().gate.resolve(granted);
        if !accepted {
            return;
        }

        // Transition first, notify second, set up last.
        self.notify(|delegate| delegate.device_authorized(granted));

        if granted {
            self.configure();
        }
    }

    /// Performs setup after a grant: bind input, attach outputs, start.
    ///
    /// Runs at most once. Any failure leaves the session stalled in
    /// `Configuring` with outputs unattached and the pipeline stopped.
    fn configure(&self) {
        {
            let mut inner = self.lock_inner();
            if inner.setup != SetupState::Unconfigured {
                tracing::warn!(state = ?inner.setup, "Session setup already performed");
                return;
            }
            inner.setup = SetupState::Configuring;
        }

        let kind = self.config.device_kind;
        let Some(input) = DeviceInput::bind(self.devices.as_ref(), kind) else {
            tracing::warn!(?kind, "Device binding failed; session degraded");
            return;
        };
        self.lock_inner().input = Some(input);

        let taken = self.lock_host().take();
        let Some(mut host) = taken else {
            tracing::warn!("Session has no pipeline handle; setup stalled");
            return;
        };
        host.attach_input(kind);
        let attached = attach_standard_outputs(&mut *host);
        host.start_running();
        *self.lock_host() = Some(host);

        self.lock_inner().setup = SetupState::Running;
        tracing::info!(?kind, ?attached, "Capture session running");
    }

    fn deliver_capture(&self, buffer: Option<FrameBuffer>) {
        let Some(buffer) = buffer else {
            tracing::debug!("Capture completed without a buffer; frame dropped");
            return;
        };
        let Some(image) = self.encoder.encode(&buffer) else {
            return;
        };
        self.notify(move |delegate| delegate.captured_picture(image));
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        let slot = self.host.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(host) = slot.as_deref_mut() {
            if host.is_running() {
                host.stop_running();
            }
        }
        tracing::debug!("Capture session dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ManualAuthorizer;
    use crate::device::{DeviceKind, MockDevice, MockDeviceProvider};
    use crate::output::{CapturedImage, MockHost, PgmEncoder};
    use crate::preview::MockPreviewFactory;

    #[derive(Default)]
    struct RecordingDelegate {
        authorized: Mutex<Vec<bool>>,
        pictures: Mutex<Vec<CapturedImage>>,
    }

    impl RecordingDelegate {
        fn authorized(&self) -> Vec<bool> {
            self.authorized.lock().unwrap().clone()
        }

        fn pictures(&self) -> Vec<CapturedImage> {
            self.pictures.lock().unwrap().clone()
        }
    }

    impl SessionDelegate for RecordingDelegate {
        fn device_authorized(&self, authorized: bool) {
            self.authorized.lock().unwrap().push(authorized);
        }

        fn captured_picture(&self, picture: CapturedImage) {
            self.pictures.lock().unwrap().push(picture);
        }
    }

    struct Fixture {
        authorizer: Arc<ManualAuthorizer>,
        host: MockHost,
        device: MockDevice,
        delegate: Arc<RecordingDelegate>,
        session: Arc<CaptureSession>,
    }

    fn build_fixture(provider: MockDeviceProvider, device: MockDevice) -> Fixture {
        let authorizer = ManualAuthorizer::new();
        let host = MockHost::new();

        let session = CaptureSession::start(
            authorizer.as_ref(),
            Box::new(host.clone()),
            Box::new(provider),
            Box::new(PgmEncoder::new()),
            Box::new(MockPreviewFactory::new()),
            SessionConfig::default(),
        );

        let delegate = Arc::new(RecordingDelegate::default());
        session.set_delegate(&delegate);

        Fixture {
            authorizer,
            host,
            device,
            delegate,
            session,
        }
    }

    fn fixture() -> Fixture {
        let device = MockDevice::new(DeviceKind::Back);
        let provider = MockDeviceProvider::empty().with_device(device.clone());
        build_fixture(provider, device)
    }

    fn fixture_without_device() -> Fixture {
        build_fixture(MockDeviceProvider::empty(), MockDevice::new(DeviceKind::Back))
    }

    #[test]
    fn test_gated_operations_fail_before_resolution() {
        let fx = fixture();

        assert_eq!(fx.session.capture_picture(), Err(SessionError::NotAuthorized));
        assert_eq!(
            fx.session.change_flash_mode(FlashMode::On),
            Err(SessionError::NotAuthorized)
        );
        assert_eq!(
            fx.session.change_torch_mode(TorchMode::On),
            Err(SessionError::NotAuthorized)
        );
        assert_eq!(fx.session.authorization_state(), AuthorizationState::Pending);
    }

    #[test]
    fn test_grant_runs_setup_once() {
        let fx = fixture();
        fx.authorizer.resolve(true);

        assert_eq!(fx.session.authorization_state(), AuthorizationState::Authorized);
        assert_eq!(fx.session.setup_state(), SetupState::Running);
        assert!(fx.session.is_running());
        assert_eq!(fx.host.bound_input(), Some(DeviceKind::Back));
        assert_eq!(fx.host.output_count(OutputKind::Movie), 1);
        assert_eq!(fx.host.output_count(OutputKind::StillImage), 1);
        assert_eq!(fx.delegate.authorized(), vec![true]);
    }

    #[test]
    fn test_denial_is_permanent_and_notified_once() {
        let fx = fixture();
        fx.authorizer.resolve(false);

        assert_eq!(fx.session.authorization_state(), AuthorizationState::Denied);
        assert_eq!(fx.session.setup_state(), SetupState::Unconfigured);
        assert!(!fx.session.is_running());
        assert_eq!(fx.host.output_count(OutputKind::Movie), 0);
        assert_eq!(fx.delegate.authorized(), vec![false]);

        // Gated operations keep failing after the denial.
        assert_eq!(
            fx.session.change_flash_mode(FlashMode::On),
            Err(SessionError::NotAuthorized)
        );
        assert_eq!(fx.delegate.authorized(), vec![false]);
    }

    #[test]
    fn test_flash_and_torch_after_grant() {
        let fx = fixture();
        fx.authorizer.resolve(true);

        assert_eq!(fx.session.change_flash_mode(FlashMode::Auto), Ok(true));
        assert_eq!(fx.device.flash_mode(), FlashMode::Auto);

        assert_eq!(fx.session.change_torch_mode(TorchMode::On), Ok(true));
        assert_eq!(fx.device.torch_mode(), TorchMode::On);

        // Hardware rejection surfaces as Ok(false), never as an error.
        fx.device.reject_flash(true);
        assert_eq!(fx.session.change_flash_mode(FlashMode::On), Ok(false));
        assert_eq!(fx.device.flash_mode(), FlashMode::Auto);
    }

    #[test]
    fn test_failed_binding_stalls_in_configuring() {
        let fx = fixture_without_device();
        fx.authorizer.resolve(true);

        assert_eq!(fx.session.authorization_state(), AuthorizationState::Authorized);
        assert_eq!(fx.session.setup_state(), SetupState::Configuring);
        assert!(!fx.session.is_running());
        assert_eq!(fx.host.output_count(OutputKind::Movie), 0);
        assert_eq!(fx.host.output_count(OutputKind::StillImage), 0);

        // Authorized but inputless: mode changes report false, not errors.
        assert_eq!(fx.session.change_flash_mode(FlashMode::On), Ok(false));
        assert_eq!(fx.session.change_torch_mode(TorchMode::On), Ok(false));
    }

    #[test]
    fn test_capture_delivers_encoded_picture_once() {
        let fx = fixture();
        fx.authorizer.resolve(true);
        fx.host
            .queue_capture(Some(FrameBuffer::new(vec![9u8; 8 * 6], 8, 6)));

        fx.session.capture_picture().unwrap();

        let pictures = fx.delegate.pictures();
        assert_eq!(pictures.len(), 1);
        assert!(!pictures[0].is_empty());
        assert!(pictures[0].bytes().starts_with(b"P5\n8 6\n"));
        assert_eq!(fx.host.capture_requests(), 1);
    }

    #[test]
    fn test_dropped_buffer_never_reaches_delegate() {
        let fx = fixture();
        fx.authorizer.resolve(true);
        fx.host.queue_capture(None);

        fx.session.capture_picture().unwrap();

        assert!(fx.delegate.pictures().is_empty());
        assert_eq!(fx.host.capture_requests(), 1);
    }

    #[test]
    fn test_unencodable_buffer_is_dropped() {
        let fx = fixture();
        fx.authorizer.resolve(true);
        // Pixel count disagrees with the dimensions.
        fx.host.queue_capture(Some(FrameBuffer::new(vec![1u8; 3], 8, 6)));

        fx.session.capture_picture().unwrap();
        assert!(fx.delegate.pictures().is_empty());
    }

    #[test]
    fn test_capture_without_still_output_is_silent_noop() {
        let fx = fixture();
        fx.host.reject_output(OutputKind::StillImage);
        fx.authorizer.resolve(true);

        assert_eq!(fx.session.capture_picture(), Ok(()));
        assert_eq!(fx.host.capture_requests(), 0);
        assert!(fx.delegate.pictures().is_empty());
    }

    #[test]
    fn test_preview_surface_ignores_authorization() {
        let fx = fixture();
        let bounds = Bounds::new(10.0, 20.0, 320.0, 240.0);

        // Still pending: preview works anyway and reflects the bounds.
        let surface = fx.session.preview_surface(bounds).unwrap();
        assert_eq!(surface.bounds(), bounds);

        fx.authorizer.resolve(false);
        assert!(fx.session.preview_surface(bounds).is_some());
    }

    #[test]
    fn test_preview_surface_respects_declining_factory() {
        let authorizer = ManualAuthorizer::new();
        let session = CaptureSession::start(
            authorizer.as_ref(),
            Box::new(MockHost::new()),
            Box::new(MockDeviceProvider::empty()),
            Box::new(PgmEncoder::new()),
            Box::new(MockPreviewFactory::failing()),
            SessionConfig::default(),
        );

        assert!(session
            .preview_surface(Bounds::new(0.0, 0.0, 64.0, 64.0))
            .is_none());
    }

    #[test]
    fn test_absent_delegate_is_tolerated() {
        let fx = fixture();
        drop(fx.delegate);

        // Resolution and capture proceed with nobody listening.
        fx.authorizer.resolve(true);
        fx.host
            .queue_capture(Some(FrameBuffer::new(vec![0u8; 4], 2, 2)));
        fx.session.capture_picture().unwrap();
        assert!(fx.session.is_running());
    }

    /// Delegate that queries the session from inside the capture
    /// completion, the way a UI observer refreshing its state would.
    #[derive(Default)]
    struct QueryingDelegate {
        session: Mutex<Option<Arc<CaptureSession>>>,
        observed: Mutex<Vec<(SetupState, bool)>>,
    }

    impl SessionDelegate for QueryingDelegate {
        fn captured_picture(&self, _picture: CapturedImage) {
            let session = self.session.lock().unwrap().clone();
            if let Some(session) = session {
                let state = session.setup_state();
                let running = session.is_running();
                self.observed.lock().unwrap().push((state, running));
                // A follow-up capture from inside the completion must not
                // hang; with the pipeline handle out of its slot it is a
                // silent no-op.
                session.capture_picture().unwrap();
            }
        }
    }

    #[test]
    fn test_delegate_may_query_session_from_completion() {
        let fx = fixture();
        let delegate = Arc::new(QueryingDelegate::default());
        *delegate.session.lock().unwrap() = Some(Arc::clone(&fx.session));
        fx.session.set_delegate(&delegate);

        fx.authorizer.resolve(true);
        fx.host
            .queue_capture(Some(FrameBuffer::new(vec![0u8; 4], 2, 2)));
        fx.session.capture_picture().unwrap();

        // The completion ran synchronously and saw a running session.
        let observed = delegate.observed.lock().unwrap();
        assert_eq!(observed.as_slice(), &[(SetupState::Running, true)]);

        // The nested no-op capture never reached the hardware.
        assert_eq!(fx.host.capture_requests(), 1);
    }

    #[test]
    fn test_drop_stops_running_host() {
        let fx = fixture();
        fx.authorizer.resolve(true);
        assert!(fx.host.is_running());

        drop(fx.session);
        assert!(!fx.host.is_running());
    }

    #[test]
    fn test_front_device_config() {
        let authorizer = ManualAuthorizer::new();
        let host = MockHost::new();
        let front = MockDevice::new(DeviceKind::Front);
        let provider = MockDeviceProvider::empty().with_device(front);

        let session = CaptureSession::start(
            authorizer.as_ref(),
            Box::new(host.clone()),
            Box::new(provider),
            Box::new(PgmEncoder::new()),
            Box::new(MockPreviewFactory::new()),
            SessionConfig {
                device_kind: DeviceKind::Front,
            },
        );

        authorizer.resolve(true);
        assert_eq!(host.bound_input(), Some(DeviceKind::Front));
        assert!(session.is_running());
    }
}
