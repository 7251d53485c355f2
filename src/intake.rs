//! Image intake: turns an uploaded byte buffer into a validated, immutable image.
//!
//! Only JPEG and PNG uploads are accepted. The container format is sniffed from the
//! buffer's magic bytes rather than trusted from the file name, and decoding must fully
//! succeed before an [`UploadedImage`] exists.

use crate::error::Result;
use base64::Engine;
use image::error::{DecodingError, ImageFormatHint};
use image::{ColorType, GenericImageView, ImageError, ImageFormat};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// File extensions the upload boundary accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// JPEG end-of-image marker.
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Why an upload could not be turned into an [`UploadedImage`].
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("unsupported file extension '{0}', expected one of jpg, jpeg, png")]
    UnsupportedExtension(String),

    #[error("unsupported image format {0}, expected JPEG or PNG")]
    UnsupportedFormat(String),

    #[error("image could not be decoded: {0}")]
    Malformed(#[source] ImageError),
}

/// A successfully decoded upload.
///
/// Holds the original encoded bytes (for redisplay and for the inference payload) together
/// with the metadata learned while decoding. There is no way to mutate it after creation.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    color_type: ColorType,
    format: ImageFormat,
}

impl UploadedImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel format of the decoded image.
    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "image/png",
            _ => "image/jpeg",
        }
    }

    /// The encoded bytes exactly as uploaded.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 encoding of the uploaded bytes.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Renderable form suitable for an `<img src>` attribute.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.to_base64())
    }
}

/// Decode an uploaded buffer into an [`UploadedImage`].
pub fn decode(bytes: impl Into<Vec<u8>>) -> std::result::Result<UploadedImage, DecodeError> {
    let bytes = bytes.into();
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let format = image::guess_format(&bytes).map_err(DecodeError::Malformed)?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(DecodeError::UnsupportedFormat(format!("{:?}", format)));
    }

    // the JPEG decoder fills missing scan data instead of failing
    if format == ImageFormat::Jpeg && !has_jpeg_eoi(&bytes) {
        return Err(DecodeError::Malformed(ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Exact(ImageFormat::Jpeg),
            "missing end of image marker, the file is truncated",
        ))));
    }

    let decoded =
        image::load_from_memory_with_format(&bytes, format).map_err(DecodeError::Malformed)?;
    let (width, height) = decoded.dimensions();
    let color_type = decoded.color();

    debug!(
        format = ?format,
        width = width,
        height = height,
        color_type = ?color_type,
        size = bytes.len(),
        "Decoded uploaded image"
    );

    Ok(UploadedImage {
        bytes,
        width,
        height,
        color_type,
        format,
    })
}

/// Whether a JPEG buffer ends with the EOI marker, ignoring trailing zero padding.
fn has_jpeg_eoi(bytes: &[u8]) -> bool {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    bytes[..end].ends_with(&JPEG_EOI)
}

/// Check the declared extension of an uploaded file name.
pub fn check_extension(file_name: &str) -> std::result::Result<(), DecodeError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedExtension(ext))
    }
}

/// Read and decode an image file from disk.
pub fn read_image_file(path: impl AsRef<Path>) -> Result<UploadedImage> {
    let path = path.as_ref();
    check_extension(&path.to_string_lossy())?;
    let bytes = std::fs::read(path)?;
    Ok(decode(bytes)?)
}
