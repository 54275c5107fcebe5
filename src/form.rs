//! Form state for the active content type
//!
//! Exactly one field set exists at a time. Switching content type replaces
//! the whole [`FormState`] with the empty variant of the new type, so fields
//! entered for one type can never end up in another type's payload.

use crate::content::{ContentType, DEFAULT_COUNTRY_CODE, Encryption};
use crate::error::{Error, Result};
use bytes::Bytes;
use std::path::Path;

/// Fields of the WiFi form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WifiFields {
    /// Network name
    pub ssid: String,
    /// Network password
    pub password: String,
    /// Authentication type
    pub encryption: Encryption,
}

/// Fields of the WhatsApp form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppFields {
    /// Dialing prefix, usually with a leading `+`
    pub country_code: String,
    /// Local number, any formatting
    pub phone_number: String,
}

impl Default for WhatsAppFields {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone_number: String::new(),
        }
    }
}

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name sent with the multipart upload
    pub name: String,
    /// MIME type sent with the multipart upload
    pub mime: String,
    /// File contents
    pub data: Bytes,
}

impl SelectedFile {
    /// Wrap in-memory contents
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension.
    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Other(format!("Invalid file name: {}", path.display())))?
            .to_string();
        let mime = mime_for_path(path).to_string();
        tracing::debug!(file = %name, %mime, bytes = data.len(), "Loaded file for upload");
        Ok(Self::new(name, mime, data))
    }

    /// Whether this is an `image/*` file
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Whether this is a PDF
    pub fn is_pdf(&self) -> bool {
        self.mime == "application/pdf"
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Input collected for one content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Free text
    Text {
        /// Text to encode
        text: String,
    },
    /// URL
    Url {
        /// URL to encode
        url: String,
    },
    /// WiFi credentials
    Wifi(WifiFields),
    /// WhatsApp number
    WhatsApp(WhatsAppFields),
    /// Image to host
    Image {
        /// Selected image, if any
        file: Option<SelectedFile>,
    },
    /// PDF to host
    Pdf {
        /// Selected PDF, if any
        file: Option<SelectedFile>,
    },
}

impl FormState {
    /// Empty form for the given content type
    pub fn empty(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Text => FormState::Text {
                text: String::new(),
            },
            ContentType::Url => FormState::Url { url: String::new() },
            ContentType::Wifi => FormState::Wifi(WifiFields::default()),
            ContentType::WhatsApp => FormState::WhatsApp(WhatsAppFields::default()),
            ContentType::Image => FormState::Image { file: None },
            ContentType::Pdf => FormState::Pdf { file: None },
        }
    }

    /// Content type this form belongs to
    pub fn content_type(&self) -> ContentType {
        match self {
            FormState::Text { .. } => ContentType::Text,
            FormState::Url { .. } => ContentType::Url,
            FormState::Wifi(_) => ContentType::Wifi,
            FormState::WhatsApp(_) => ContentType::WhatsApp,
            FormState::Image { .. } => ContentType::Image,
            FormState::Pdf { .. } => ContentType::Pdf,
        }
    }

    /// Whether every field is still at its initial value
    pub fn is_empty(&self) -> bool {
        *self == FormState::empty(self.content_type())
    }

    /// Text or URL input, if this is one of those forms
    pub fn input_mut(&mut self) -> Option<&mut String> {
        match self {
            FormState::Text { text } => Some(text),
            FormState::Url { url } => Some(url),
            _ => None,
        }
    }

    /// WiFi fields, if this is the WiFi form
    pub fn wifi_mut(&mut self) -> Option<&mut WifiFields> {
        match self {
            FormState::Wifi(fields) => Some(fields),
            _ => None,
        }
    }

    /// WhatsApp fields, if this is the WhatsApp form
    pub fn whatsapp_mut(&mut self) -> Option<&mut WhatsAppFields> {
        match self {
            FormState::WhatsApp(fields) => Some(fields),
            _ => None,
        }
    }

    /// Put a file into the image or PDF slot.
    ///
    /// Files whose MIME type does not match the slot are ignored, the same
    /// way a file picker filtered by type would never offer them. Returns
    /// whether the file was accepted.
    pub fn select_file(&mut self, selected: SelectedFile) -> bool {
        match self {
            FormState::Image { file } if selected.is_image() => {
                *file = Some(selected);
                true
            }
            FormState::Pdf { file } if selected.is_pdf() => {
                *file = Some(selected);
                true
            }
            _ => {
                tracing::debug!(
                    form = %self.content_type(),
                    mime = %selected.mime,
                    "Ignoring file that does not match the form"
                );
                false
            }
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        FormState::empty(ContentType::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_forms_match_their_type() {
        for ty in ContentType::ALL {
            let form = FormState::empty(ty);
            assert_eq!(form.content_type(), ty);
            assert!(form.is_empty());
        }
    }

    #[test]
    fn whatsapp_defaults_to_pakistan_prefix() {
        let form = FormState::empty(ContentType::WhatsApp);
        match form {
            FormState::WhatsApp(fields) => assert_eq!(fields.country_code, "+92"),
            other => panic!("unexpected form {other:?}"),
        }
    }

    #[test]
    fn accessors_only_reach_their_own_fields() {
        let mut form = FormState::empty(ContentType::Wifi);
        assert!(form.input_mut().is_none());
        assert!(form.whatsapp_mut().is_none());
        form.wifi_mut().unwrap().ssid = "HomeNet".into();
        assert!(!form.is_empty());
    }

    #[test]
    fn pdf_slot_rejects_other_files() {
        let mut form = FormState::empty(ContentType::Pdf);
        let png = SelectedFile::new("a.png", "image/png", vec![1, 2, 3]);
        assert!(!form.select_file(png));
        assert!(form.is_empty());

        let pdf = SelectedFile::new("a.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        assert!(form.select_file(pdf));
        assert!(!form.is_empty());
    }

    #[test]
    fn image_slot_accepts_any_image() {
        let mut form = FormState::empty(ContentType::Image);
        let webp = SelectedFile::new("a.webp", "image/webp", vec![0]);
        assert!(form.select_file(webp));
    }

    #[test]
    fn mime_is_inferred_from_extension() {
        assert_eq!(mime_for_path(Path::new("scan.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = SelectedFile::load(&path).await.unwrap();
        assert_eq!(file.name, "doc.pdf");
        assert!(file.is_pdf());
        assert_eq!(&file.data[..], b"%PDF-1.7");
    }
}
