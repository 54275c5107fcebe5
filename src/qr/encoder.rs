//! QR code renderer

use crate::config::RenderOptions;
use crate::error::{EncodingError, Error, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

/// Pixels per module when the requested width is too small for the symbol
const FALLBACK_SCALE: u32 = 4;

/// Largest image edge the renderer will allocate
pub const MAX_IMAGE_SIZE: u32 = 8192;

/// An RGBA colour
pub type Rgba = image::Rgba<u8>;

/// Renders payload strings into QR images
#[derive(Debug, Clone)]
pub struct QrRenderer {
    width: u32,
    margin: u32,
    dark: Rgba,
    light: Rgba,
    ecc_level: EcLevel,
}

impl QrRenderer {
    /// 300px wide, 2-module margin, black on white, medium error correction
    pub fn new() -> Self {
        Self {
            width: 300,
            margin: 2,
            dark: image::Rgba([0x00, 0x00, 0x00, 0xFF]),
            light: image::Rgba([0xFF, 0xFF, 0xFF, 0xFF]),
            ecc_level: EcLevel::M,
        }
    }

    /// Build a renderer from configuration, parsing its hex colours.
    pub fn from_options(options: &RenderOptions) -> Result<Self> {
        Ok(Self {
            width: options.width,
            margin: options.margin,
            dark: parse_hex_color(&options.dark)?,
            light: parse_hex_color(&options.light)?,
            ecc_level: options.ecc_level.into(),
        })
    }

    /// Requested image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Render a payload into an RGBA image.
    pub fn render(&self, payload: &str) -> std::result::Result<RgbaImage, EncodingError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.ecc_level)
            .map_err(|e| EncodingError::new(e.to_string()))?;
        let modules = code.width() as u32;
        let colors = code.to_colors();

        let total = self
            .margin
            .checked_mul(2)
            .and_then(|margin| margin.checked_add(modules))
            .ok_or_else(|| EncodingError::new(format!("margin {} is too large", self.margin)))?;
        let (scale, size) = if self.width >= total {
            (f64::from(self.width) / f64::from(total), self.width)
        } else {
            let size = total.checked_mul(FALLBACK_SCALE).ok_or_else(|| {
                EncodingError::new(format!("{total} modules do not fit in an image"))
            })?;
            (f64::from(FALLBACK_SCALE), size)
        };
        if size > MAX_IMAGE_SIZE {
            return Err(EncodingError::new(format!(
                "image of {size}px exceeds the {MAX_IMAGE_SIZE}px limit"
            )));
        }
        let scaled_margin = (f64::from(self.margin) * scale).floor() as u32;
        let inner_end = size.saturating_sub(scaled_margin);

        let mut img = RgbaImage::from_pixel(size, size, self.light);
        for row in scaled_margin..inner_end {
            let src_row = module_index(row - scaled_margin, scale, modules);
            for col in scaled_margin..inner_end {
                let src_col = module_index(col - scaled_margin, scale, modules);
                if colors[(src_row * modules + src_col) as usize] == Color::Dark {
                    img.put_pixel(col, row, self.dark);
                }
            }
        }

        tracing::debug!(
            version = ?code.version(),
            modules,
            size,
            payload_len = payload.len(),
            "Rendered QR code"
        );
        Ok(img)
    }

    /// Render a payload straight to PNG bytes.
    pub fn render_png(&self, payload: &str) -> std::result::Result<Vec<u8>, EncodingError> {
        let img = self.render(payload)?;
        encode_png(img)
    }

    /// Render a payload to PNG bytes along with the edge length actually
    /// produced, which differs from [`width`](Self::width) when the symbol
    /// needs the fallback scale.
    pub fn render_sized_png(
        &self,
        payload: &str,
    ) -> std::result::Result<(Vec<u8>, u32), EncodingError> {
        let img = self.render(payload)?;
        let size = img.width();
        Ok((encode_png(img)?, size))
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn module_index(offset: u32, scale: f64, modules: u32) -> u32 {
    ((f64::from(offset) / scale).floor() as u32).min(modules - 1)
}

fn encode_png(img: RgbaImage) -> std::result::Result<Vec<u8>, EncodingError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| EncodingError::new(e.to_string()))?;
    Ok(buf)
}

/// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
pub(crate) fn parse_hex_color(value: &str) -> Result<Rgba> {
    let digits = value.trim().trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_string(),
        _ => return Err(Error::Config(format!("Invalid hex colour '{value}'"))),
    };
    let bytes = hex::decode(&expanded)
        .map_err(|e| Error::Config(format!("Invalid hex colour '{value}': {e}")))?;
    let alpha = bytes.get(3).copied().unwrap_or(0xFF);
    Ok(image::Rgba([bytes[0], bytes[1], bytes[2], alpha]))
}
