//! Error types for qrgen operations

use crate::content::ContentType;
use thiserror::Error;

/// Result type alias using qrgen's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// A submission failed (validation, upload or encoding)
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// A download was requested before any QR code was generated
    #[error("No QR code has been generated yet")]
    NothingToDownload,

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<EncodingError> for Error {
    fn from(e: EncodingError) -> Self {
        Error::Generate(e.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

/// Failure of a single generate attempt.
///
/// None of these are fatal: the session stays editable and the user may
/// resubmit. `Display` yields the message shown next to the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// A required field for the active content type is missing
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Hosting the selected file failed
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The QR library rejected the payload
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A previous submission is still waiting on its upload
    #[error("A QR code is already being generated")]
    InFlight,
}

/// Missing or unacceptable form input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text or URL input is empty
    #[error("Please provide input")]
    MissingInput,

    /// SSID or password is empty
    #[error("Please enter both WiFi name and password")]
    MissingWifiCredentials,

    /// WhatsApp phone number is empty
    #[error("Please enter phone number")]
    MissingPhoneNumber,

    /// No image selected, or the selected file is not an image
    #[error("Please select an image")]
    MissingImage,

    /// No PDF selected, or the selected file is not a PDF
    #[error("Please select a PDF file")]
    MissingPdf,
}

/// Why an upload failed. Kept for logs and callers; the user-facing
/// message does not distinguish between kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadErrorKind {
    /// The request could not be sent or the body could not be read
    Network(String),
    /// The endpoint answered with a non-2xx status
    Status(u16),
    /// A 2xx response without a usable `secure_url`
    MissingUrl,
}

/// Failed upload of an image or PDF
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} upload failed. Please try again.", target_label(.target))]
pub struct UploadError {
    /// Content type whose file was being uploaded
    pub target: ContentType,
    /// Underlying cause
    pub kind: UploadErrorKind,
}

impl UploadError {
    /// Build an upload error for the given target
    pub fn new(target: ContentType, kind: UploadErrorKind) -> Self {
        Self { target, kind }
    }
}

fn target_label(target: &ContentType) -> &'static str {
    match target {
        ContentType::Pdf => "PDF",
        _ => "Image",
    }
}

/// The QR library could not encode the payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to generate QR code. Please try again.")]
pub struct EncodingError {
    /// Library-provided detail, logged but not shown
    pub detail: String,
}

impl EncodingError {
    /// Wrap a library error message
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_messages_are_generic_per_target() {
        let image = UploadError::new(ContentType::Image, UploadErrorKind::Status(500));
        let pdf = UploadError::new(ContentType::Pdf, UploadErrorKind::MissingUrl);
        assert_eq!(image.to_string(), "Image upload failed. Please try again.");
        assert_eq!(pdf.to_string(), "PDF upload failed. Please try again.");

        let network = UploadError::new(
            ContentType::Image,
            UploadErrorKind::Network("connection refused".into()),
        );
        assert_eq!(network.to_string(), image.to_string());
    }

    #[test]
    fn encoding_detail_is_not_shown() {
        let err = GenerateError::from(EncodingError::new("data too long"));
        assert_eq!(
            err.to_string(),
            "Failed to generate QR code. Please try again."
        );
    }
}
