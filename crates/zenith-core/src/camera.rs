//! Camera passthrough.
//!
//! A [`CameraSession`] borrows a [`VideoSource`] for as long as the camera
//! screen is open and closes the stream when dropped. Capture is simulated:
//! the current frame is encoded as a binary PPM and handed back as a data
//! URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CameraError;

/// Dimensions of the frames a source produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    /// Bytes in one packed RGB frame.
    pub fn rgb_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// A stream of RGB frames.
pub trait VideoSource {
    fn open(&mut self) -> Result<FrameSize, CameraError>;
    /// Current frame, packed RGB, row-major.
    fn frame(&mut self) -> Result<Vec<u8>, CameraError>;
    fn close(&mut self);
}

/// A still taken from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub size: FrameSize,
    pub rgb: Vec<u8>,
}

impl CapturedImage {
    /// Binary PPM (`P6`) encoding.
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.size.width, self.size.height);
        let mut out = Vec::with_capacity(header.len() + self.rgb.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.rgb);
        out
    }

    pub fn data_url(&self) -> String {
        format!(
            "data:image/x-portable-pixmap;base64,{}",
            STANDARD.encode(self.to_ppm())
        )
    }
}

/// Open camera stream. Released on drop.
pub struct CameraSession<'a, S: VideoSource> {
    source: &'a mut S,
    size: FrameSize,
    released: bool,
}

impl<'a, S: VideoSource> CameraSession<'a, S> {
    /// Open the stream. Any source failure is reported as `Unavailable`.
    pub fn acquire(source: &'a mut S) -> Result<Self, CameraError> {
        let size = source.open().map_err(|e| {
            tracing::warn!(error = %e, "camera acquisition failed");
            CameraError::Unavailable
        })?;
        tracing::debug!(width = size.width, height = size.height, "camera stream opened");
        Ok(Self {
            source,
            size,
            released: false,
        })
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn capture(&mut self) -> Result<CapturedImage, CameraError> {
        if self.released {
            return Err(CameraError::Released);
        }
        let rgb = self.source.frame()?;
        let expected = self.size.rgb_len();
        if rgb.len() != expected {
            return Err(CameraError::FrameSize {
                expected,
                actual: rgb.len(),
            });
        }
        Ok(CapturedImage {
            size: self.size,
            rgb,
        })
    }

    /// Stop the stream now. Idempotent.
    pub fn release(&mut self) {
        if !self.released {
            self.source.close();
            self.released = true;
            tracing::debug!("camera stream released");
        }
    }
}

impl<S: VideoSource> Drop for CameraSession<'_, S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Generated gradient frames; stands in for a real device.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    size: FrameSize,
    available: bool,
    open: bool,
    frame_index: u8,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: FrameSize { width, height },
            available: true,
            open: false,
            frame_index: 0,
        }
    }

    /// A source whose `open` always fails, like a denied permission.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(0, 0)
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl VideoSource for SyntheticSource {
    fn open(&mut self) -> Result<FrameSize, CameraError> {
        if !self.available {
            return Err(CameraError::Unavailable);
        }
        self.open = true;
        Ok(self.size)
    }

    fn frame(&mut self) -> Result<Vec<u8>, CameraError> {
        if !self.open {
            return Err(CameraError::Released);
        }
        let FrameSize { width, height } = self.size;
        let shift = self.frame_index;
        self.frame_index = self.frame_index.wrapping_add(1);

        let mut rgb = Vec::with_capacity(self.size.rgb_len());
        for y in 0..height {
            for x in 0..width {
                let r = (x * 255 / width.max(1)) as u8;
                let g = (y * 255 / height.max(1)) as u8;
                rgb.extend_from_slice(&[r.wrapping_add(shift), g, 128]);
            }
        }
        Ok(rgb)
    }

    fn close(&mut self) {
        self.open = false;
    }
}
