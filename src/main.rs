//! Camera Capture Session CLI
//!
//! Command-line demonstration of the session lifecycle against mock
//! hardware: authorization prompt, setup, preview, still captures, and
//! flash/torch changes.

use camera_session::{
    Bounds, CapturedImage, CaptureSession, FrameBuffer, ManualAuthorizer, MockDevice,
    MockDeviceProvider, MockHost, MockPreviewFactory, PgmEncoder, SessionDelegate, TorchMode,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "camera-session", version, about = "Capture session lifecycle demo")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate a denied permission prompt.
    #[arg(long)]
    deny: bool,

    /// Override the number of still captures to request.
    #[arg(long)]
    captures: Option<u32>,
}

/// Delegate that logs notifications and counts delivered pictures.
#[derive(Default)]
struct LoggingDelegate {
    pictures: AtomicU64,
}

impl SessionDelegate for LoggingDelegate {
    fn device_authorized(&self, authorized: bool) {
        info!(authorized, "Delegate: authorization resolved");
    }

    fn captured_picture(&self, picture: CapturedImage) {
        self.pictures.fetch_add(1, Ordering::SeqCst);
        info!(bytes = picture.len(), "Delegate: picture delivered");
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Camera Capture Session v{}", camera_session::VERSION);
    info!("This is a demonstration using mock camera hardware");

    let mut config = match args.config {
        Some(path) => match camera_session::FileConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => camera_session::FileConfig::default(),
    };
    if args.deny {
        config.demo.grant = false;
    }
    if let Some(captures) = args.captures {
        config.demo.captures = captures;
    }

    // Build the mock collaborators
    let authorizer = ManualAuthorizer::new();
    let host = MockHost::new();
    let device = MockDevice::new(config.session.device_kind);
    let provider = MockDeviceProvider::empty().with_device(device.clone());

    let session = CaptureSession::start(
        authorizer.as_ref(),
        Box::new(host.clone()),
        Box::new(provider),
        Box::new(PgmEncoder::new()),
        Box::new(MockPreviewFactory::new()),
        config.session.clone(),
    );

    let delegate = Arc::new(LoggingDelegate::default());
    session.set_delegate(&delegate);

    // Preview is available before the prompt resolves
    let bounds = Bounds::new(0.0, 0.0, 320.0, 240.0);
    match session.preview_surface(bounds) {
        Some(surface) => info!(bounds = ?surface.bounds(), "Preview surface created"),
        None => warn!("No preview surface available"),
    }

    info!(grant = config.demo.grant, "Resolving simulated permission prompt");
    authorizer.resolve(config.demo.grant);

    info!(
        running = session.is_running(),
        auth = ?session.authorization_state(),
        setup = ?session.setup_state(),
        "Session state after resolution"
    );

    // Apply the configured light modes
    match session.change_flash_mode(config.demo.flash) {
        Ok(applied) => info!(mode = ?config.demo.flash, applied, "Flash mode change"),
        Err(e) => warn!("Flash mode change failed: {}", e),
    }
    match session.change_torch_mode(TorchMode::Off) {
        Ok(applied) => info!(applied, "Torch mode change"),
        Err(e) => warn!("Torch mode change failed: {}", e),
    }

    // Request still captures; every other frame is dropped by the mock
    // hardware to show the silent dropped-frame policy.
    let width = config.demo.frame_width;
    let height = config.demo.frame_height;
    for i in 0..config.demo.captures {
        if i % 2 == 0 {
            let pixels: Vec<u8> = (0..(width * height) as usize)
                .map(|p| ((p as u32 ^ i) % 256) as u8)
                .collect();
            host.queue_capture(Some(FrameBuffer::new(pixels, width, height)));
        } else {
            host.queue_capture(None);
        }

        match session.capture_picture() {
            Ok(()) => {}
            Err(e) => warn!(capture = i, "Capture failed: {}", e),
        }
    }

    info!(
        requested = config.demo.captures,
        delivered = delegate.pictures.load(Ordering::SeqCst),
        "Done"
    );
}
