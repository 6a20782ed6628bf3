//! Session host capability and the raw frame buffer type.
//!
//! The host is whatever actually runs the capture pipeline. The core only
//! relies on the can-add/add pair for outputs, run control, and a one-shot
//! asynchronous still capture.

use crate::device::DeviceKind;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Kinds of output that can be attached to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Continuous movie stream sink.
    Movie,
    /// Single still-image sink.
    StillImage,
}

/// One-shot completion for an asynchronous still capture.
///
/// `None` covers both an absent buffer and a hardware error; the two are
/// indistinguishable to the caller and both end as dropped frames.
pub type StillCaptureCallback = Box<dyn FnOnce(Option<FrameBuffer>) + Send + 'static>;

/// A raw grayscale buffer handed back by the capture hardware.
#[derive(Clone)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Creates a buffer from raw pixels and dimensions.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Returns the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the buffer width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the buffer height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == (self.width as usize) * (self.height as usize)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

/// Capability to run a capture pipeline.
///
/// Attachment follows a check-then-add protocol: the core never assumes
/// `add_output` will be accepted without asking first. `capture_still`
/// returns immediately; the completion may run on any thread, including
/// synchronously inside the call.
pub trait SessionHost: Send {
    /// Binds the active device input to the pipeline.
    fn attach_input(&mut self, kind: DeviceKind);

    /// Returns whether an output of this kind could be added now.
    fn can_add_output(&self, kind: OutputKind) -> bool;

    /// Adds an output. Call only after `can_add_output` returned true.
    fn add_output(&mut self, kind: OutputKind);

    /// Returns whether an output of this kind is already attached.
    fn has_output(&self, kind: OutputKind) -> bool;

    /// Starts the pipeline.
    fn start_running(&mut self);

    /// Stops the pipeline.
    fn stop_running(&mut self);

    /// Returns whether the pipeline is running.
    fn is_running(&self) -> bool;

    /// Issues one asynchronous still capture.
    fn capture_still(&mut self, completion: StillCaptureCallback);
}

#[derive(Debug, Default)]
struct MockHostState {
    outputs: Vec<OutputKind>,
    rejected: Vec<OutputKind>,
    input: Option<DeviceKind>,
    running: bool,
    queued_captures: VecDeque<Option<FrameBuffer>>,
    capture_requests: u64,
}

/// Mock capture pipeline backed by shared, inspectable state.
///
/// Clones share state: hand one clone to the session and keep another to
/// queue capture results and observe attachments. Captures complete
/// synchronously from the head of the queue; an empty queue completes
/// with `None` (a dropped frame).
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    state: Arc<Mutex<MockHostState>>,
}

impl MockHost {
    /// Creates an empty, stopped mock host.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockHostState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes the host refuse attachment of the given kind.
    pub fn reject_output(&self, kind: OutputKind) {
        self.state().rejected.push(kind);
    }

    /// Queues the result of the next still capture.
    pub fn queue_capture(&self, result: Option<FrameBuffer>) {
        self.state().queued_captures.push_back(result);
    }

    /// Returns how many outputs of this kind were actually added.
    pub fn output_count(&self, kind: OutputKind) -> usize {
        self.state().outputs.iter().filter(|&&k| k == kind).count()
    }

    /// Returns the input kind bound to the pipeline, if any.
    pub fn bound_input(&self) -> Option<DeviceKind> {
        self.state().input
    }

    /// Returns how many still captures were requested.
    pub fn capture_requests(&self) -> u64 {
        self.state().capture_requests
    }
}

impl SessionHost for MockHost {
    fn attach_input(&mut self, kind: DeviceKind) {
        tracing::debug!(?kind, "MockHost bound input");
        self.state().input = Some(kind);
    }

    fn can_add_output(&self, kind: OutputKind) -> bool {
        let state = self.state();
        !state.rejected.contains(&kind) && !state.outputs.contains(&kind)
    }

    fn add_output(&mut self, kind: OutputKind) {
        tracing::debug!(?kind, "MockHost added output");
        self.state().outputs.push(kind);
    }

    fn has_output(&self, kind: OutputKind) -> bool {
        self.state().outputs.contains(&kind)
    }

    fn start_running(&mut self) {
        tracing::info!("MockHost running");
        self.state().running = true;
    }

    fn stop_running(&mut self) {
        tracing::info!("MockHost stopped");
        self.state().running = false;
    }

    fn is_running(&self) -> bool {
        self.state().running
    }

    fn capture_still(&mut self, completion: StillCaptureCallback) {
        let result = {
            let mut state = self.state();
            state.capture_requests += 1;
            state.queued_captures.pop_front().flatten()
        };
        // Completion runs outside the state lock, as a real pipeline would.
        completion(result);
    }
}
