//! Camera capability used by the capture step. A device is acquired when the
//! flow enters `Capture` and released once a frame is taken, when the user goes
//! back, or when the flow is dropped. [`Acquisition`] ties release to scope so
//! every exit path gives the device back.
//!
//! No image content is inspected here; the still is forwarded as a data URL and
//! the backend decides whether it is usable.

use base64ct::{Base64, Encoding};
use std::{
    fmt, fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera access denied")]
    Denied,
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("frame capture failed: {0}")]
    Capture(String),
}

/// One still frame, encoded as a `data:` URL.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    data_url: String,
}

impl CapturedImage {
    /// Encodes raw image bytes with their MIME type, e.g. `image/jpeg`.
    #[must_use]
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self {
            data_url: format!("data:{mime};base64,{}", Base64::encode_string(bytes)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.data_url
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.data_url
    }
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CapturedImage")
            .field("len", &self.data_url.len())
            .finish()
    }
}

/// An acquired device able to produce stills.
pub trait FrameSource: Send {
    /// Takes one still from the live device.
    ///
    /// # Errors
    /// Returns an error if no frame could be read.
    fn snapshot(&mut self) -> Result<CapturedImage, CameraError>;

    /// Stops the device. Must be safe to call more than once.
    fn release(&mut self);
}

/// Something that can hand out a [`FrameSource`].
pub trait Camera: Send {
    type Source: FrameSource;

    /// Opens the device.
    ///
    /// # Errors
    /// Returns an error if the device is denied or missing.
    fn acquire(&mut self) -> Result<Self::Source, CameraError>;
}

/// Scoped hold on a device; releases on drop.
pub struct Acquisition<S: FrameSource> {
    source: S,
    released: bool,
}

impl<S: FrameSource> Acquisition<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            released: false,
        }
    }

    /// # Errors
    /// Returns an error if the device has been released or the read fails.
    pub fn snapshot(&mut self) -> Result<CapturedImage, CameraError> {
        if self.released {
            return Err(CameraError::Unavailable("camera already released".to_string()));
        }
        self.source.snapshot()
    }

    pub fn release(&mut self) {
        if !self.released {
            self.source.release();
            self.released = true;
        }
    }
}

impl<S: FrameSource> Drop for Acquisition<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Uses an image file on disk as the device; the CLI's stand-in for a webcam.
#[derive(Clone, Debug)]
pub struct ImageFileCamera {
    path: PathBuf,
}

impl ImageFileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Camera for ImageFileCamera {
    type Source = ImageFileSource;

    fn acquire(&mut self) -> Result<Self::Source, CameraError> {
        match fs::metadata(&self.path) {
            Ok(metadata) if metadata.is_file() => {
                debug!(path = %self.path.display(), "image device acquired");
                Ok(ImageFileSource {
                    path: self.path.clone(),
                })
            }
            Ok(_) => Err(CameraError::Unavailable(format!(
                "{} is not a file",
                self.path.display()
            ))),
            Err(err) if err.kind() == ErrorKind::PermissionDenied => Err(CameraError::Denied),
            Err(err) => Err(CameraError::Unavailable(format!(
                "{}: {err}",
                self.path.display()
            ))),
        }
    }
}

#[derive(Debug)]
pub struct ImageFileSource {
    path: PathBuf,
}

impl FrameSource for ImageFileSource {
    fn snapshot(&mut self) -> Result<CapturedImage, CameraError> {
        let bytes = fs::read(&self.path).map_err(|err| match err.kind() {
            ErrorKind::PermissionDenied => CameraError::Denied,
            _ => CameraError::Capture(err.to_string()),
        })?;
        let mime = sniff_mime(&bytes)
            .ok_or_else(|| CameraError::Capture("unsupported image format".to_string()))?;
        Ok(CapturedImage::from_bytes(mime, &bytes))
    }

    fn release(&mut self) {
        debug!(path = %self.path.display(), "image device released");
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else {
        None
    }
}

/// In-memory device that always yields the same still, or is unavailable.
/// Tracks how many acquisitions are live so callers can check release.
#[derive(Clone, Debug)]
pub struct StaticCamera {
    image: Option<CapturedImage>,
    denials_left: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    acquired: Arc<AtomicUsize>,
}

impl StaticCamera {
    #[must_use]
    pub fn new(image: CapturedImage) -> Self {
        Self::denied_then(image, 0)
    }

    /// A device that refuses the first `denials` acquisitions, then works.
    #[must_use]
    pub fn denied_then(image: CapturedImage, denials: usize) -> Self {
        Self {
            image: Some(image),
            denials_left: Arc::new(AtomicUsize::new(denials)),
            active: Arc::default(),
            acquired: Arc::default(),
        }
    }

    /// A device that refuses every acquisition.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            image: None,
            denials_left: Arc::default(),
            active: Arc::default(),
            acquired: Arc::default(),
        }
    }

    /// Acquisitions currently held.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Acquisitions attempted, successful or not.
    #[must_use]
    pub fn acquire_attempts(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

impl Camera for StaticCamera {
    type Source = StaticSource;

    fn acquire(&mut self) -> Result<Self::Source, CameraError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        let denied = self
            .denials_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if denied {
            return Err(CameraError::Denied);
        }
        let image = self.image.clone().ok_or(CameraError::Denied)?;
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(StaticSource {
            image,
            active: Arc::clone(&self.active),
            live: true,
        })
    }
}

#[derive(Debug)]
pub struct StaticSource {
    image: CapturedImage,
    active: Arc<AtomicUsize>,
    live: bool,
}

impl FrameSource for StaticSource {
    fn snapshot(&mut self) -> Result<CapturedImage, CameraError> {
        Ok(self.image.clone())
    }

    fn release(&mut self) {
        if self.live {
            self.live = false;
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}
