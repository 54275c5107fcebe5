//! qrgen - QR codes for text, URLs, WiFi, WhatsApp and hosted files
//!
//! The crate models a single QR generator form. A [`Session`] holds the
//! fields for the selected [`ContentType`], validates them into a payload
//! string (uploading image and PDF files to a hosting service first) and
//! renders that payload into a PNG QR code.
//!
//! # Features
//!
//! - **Payloads**: raw text and URLs, `WIFI:` network strings, `wa.me` links
//! - **Hosting**: multipart uploads of images and PDFs, the hosted URL is encoded
//! - **Rendering**: fixed-width PNG output with configurable margin and colours
//! - **Async uploads**: run as Tokio tasks, discarded when the form changes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use qrgen::{ContentType, HttpUploader, QrgenConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = QrgenConfig::default();
//!     let uploader = Arc::new(HttpUploader::new(config.upload.clone())?);
//!     let mut session = Session::from_config(&config, uploader)?;
//!
//!     session.select_type(ContentType::Wifi);
//!     if let Some(wifi) = session.form_mut().wifi_mut() {
//!         wifi.ssid = "HomeNet".into();
//!         wifi.password = "secret123".into();
//!     }
//!
//!     let artifact = session.generate().await?;
//!     println!("{}", artifact.payload);
//!     session.download(std::path::Path::new(".")).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod content;
pub mod download;
pub mod error;
pub mod form;
pub mod logging;
pub mod output;
pub mod payload;
pub mod qr;
pub mod session;
pub mod upload;

// Re-exports for convenience
pub use error::{
    EncodingError, Error, GenerateError, Result, UploadError, UploadErrorKind, ValidationError,
};

pub use config::{
    LogRotation, LoggingOptions, OutputOptions, PayloadOptions, QrgenConfig, RenderOptions,
    UploadOptions,
};
pub use content::{COUNTRY_CODES, ContentType, CountryCode, Encryption};
pub use form::{FormState, SelectedFile, WhatsAppFields, WifiFields};
pub use payload::{PayloadBuilder, Prepared, whatsapp_payload, wifi_payload};
pub use qr::{DecodedQr, QrArtifact, QrDecoder, QrRenderer};
pub use session::{Phase, Session, Submitted};
pub use upload::{HttpUploader, UploadRequest, Uploader};
