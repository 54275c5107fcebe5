//! QR code decoder using rqrr

use crate::error::{Error, Result};
use crate::qr::DecodedQr;
use image::{DynamicImage, GrayImage};
use std::path::Path;

/// QR code decoder
pub struct QrDecoder {}

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self {}
    }

    /// Decode the first QR code found in an image
    pub fn decode(&self, img: &DynamicImage) -> Result<DecodedQr> {
        self.decode_gray(img.to_luma8())
    }

    /// Decode the first QR code found in PNG (or any supported format) bytes
    pub fn decode_png(&self, bytes: &[u8]) -> Result<DecodedQr> {
        let img = image::load_from_memory(bytes)?;
        self.decode(&img)
    }

    /// Decode the first QR code found in an image file
    pub fn decode_file(&self, path: &Path) -> Result<DecodedQr> {
        let img = image::open(path)?;
        self.decode(&img)
    }

    fn decode_gray(&self, img: GrayImage) -> Result<DecodedQr> {
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();

        let grid = grids.first().ok_or(Error::NoQrCodeFound)?;
        match grid.decode() {
            Ok((meta, content)) => {
                tracing::debug!(
                    "Decoded QR: version={:?}, ecc_level={:?}, length={}",
                    meta.version,
                    meta.ecc_level,
                    content.len()
                );
                Ok(DecodedQr::from_bytes(content.into_bytes()))
            }
            Err(e) => Err(Error::QrDecode(format!("Decode failed: {:?}", e))),
        }
    }
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}
