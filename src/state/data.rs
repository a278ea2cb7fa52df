/// Shared data structures for the tool sessions
///
/// These structs represent the data model that flows between
/// the service layer and the UI layer.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Local};
use iced::widget::image::Handle;

use crate::service::ProcessError;

/// The image the user picked, held in memory until reset
#[derive(Debug, Clone)]
pub struct SelectedImage {
    /// Filename only (e.g., "scan_042.png")
    pub file_name: String,
    /// MIME type inferred from the extension (e.g., "image/png")
    pub mime_type: String,
    /// Raw file content, shared so tickets can be cloned cheaply
    pub bytes: Arc<[u8]>,
    /// Preview handle for the "Original Image" region
    pub preview: Handle,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let preview = Handle::from_bytes(bytes.clone());
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
            preview,
        }
    }

    /// Size of the file content in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// An image returned by the service as base64-encoded PNG
#[derive(Debug, Clone)]
pub struct ResultImage {
    /// The payload exactly as received
    base64: String,
    /// Decoded PNG bytes
    bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
    handle: Handle,
}

impl ResultImage {
    /// Decode a base64 payload and verify it holds a readable image
    pub fn from_base64(payload: &str) -> Result<Self, ProcessError> {
        let payload = payload.trim();
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| ProcessError::InvalidImage(e.to_string()))?;

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| ProcessError::InvalidImage(e.to_string()))?;

        Ok(Self {
            base64: payload.to_string(),
            width: decoded.width(),
            height: decoded.height(),
            handle: Handle::from_bytes(bytes.clone()),
            bytes: bytes.into(),
        })
    }

    /// Displayable data URI (`data:image/png;base64,...`)
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.base64)
    }

    /// Native image handle, created once at decode time so iced can cache it
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Re-encode the image as PNG regardless of what the service sent
    pub fn to_png(&self) -> Result<Vec<u8>, ProcessError> {
        let decoded = image::load_from_memory(&self.bytes)
            .map_err(|e| ProcessError::InvalidImage(e.to_string()))?;
        let mut out = Cursor::new(Vec::new());
        decoded
            .write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| ProcessError::InvalidImage(e.to_string()))?;
        Ok(out.into_inner())
    }
}

/// A pixel-space length converted to millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Value reported by the service, in pixels
    pub pixels: f64,
    /// Physical size of one pixel in millimetres
    pub pixel_size_mm: f64,
}

impl Measurement {
    pub fn new(pixels: f64, pixel_size_mm: f64) -> Self {
        Self { pixels, pixel_size_mm }
    }

    pub fn millimetres(&self) -> f64 {
        self.pixels * self.pixel_size_mm
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} mm", self.millimetres())
    }
}

/// Successful response of the circumference endpoint
#[derive(Debug, Clone)]
pub struct CircumferenceResult {
    pub measurement: Measurement,
    /// `pixelValue` passed through from the response, if numeric
    pub pixel_value: Option<f64>,
    pub mask: ResultImage,
    pub received_at: DateTime<Local>,
}

/// Successful response of the enhancement endpoint
#[derive(Debug, Clone)]
pub struct EnhancementResult {
    pub enhanced: ResultImage,
    pub received_at: DateTime<Local>,
}

/// Common view of a tool result: the image the service produced
pub trait ProcessedOutput {
    fn output_image(&self) -> &ResultImage;
    fn received_at(&self) -> DateTime<Local>;
}

impl ProcessedOutput for CircumferenceResult {
    fn output_image(&self) -> &ResultImage {
        &self.mask
    }

    fn received_at(&self) -> DateTime<Local> {
        self.received_at
    }
}

impl ProcessedOutput for EnhancementResult {
    fn output_image(&self) -> &ResultImage {
        &self.enhanced
    }

    fn received_at(&self) -> DateTime<Local> {
        self.received_at
    }
}
