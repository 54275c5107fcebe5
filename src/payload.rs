//! Turns form state into the string that gets encoded
//!
//! Text, URL, WiFi and WhatsApp forms resolve to a payload immediately.
//! Image and PDF forms resolve to an [`UploadRequest`]; the hosted URL the
//! upload returns becomes the payload.

use crate::content::{ContentType, Encryption};
use crate::error::ValidationError;
use crate::form::{FormState, SelectedFile};
use crate::upload::UploadRequest;

/// Outcome of validating a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// Payload ready to encode
    Inline(String),
    /// File that must be hosted first
    Upload(UploadRequest),
}

/// Validates forms and formats payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadBuilder {
    escape_wifi: bool,
}

impl PayloadBuilder {
    /// Builder that passes WiFi fields through unescaped
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle escaping of `\ ; , : "` in WiFi SSID and password
    pub fn with_wifi_escaping(mut self, escape: bool) -> Self {
        self.escape_wifi = escape;
        self
    }

    /// Validate the form and produce its payload or upload request.
    pub fn prepare(&self, form: &FormState) -> Result<Prepared, ValidationError> {
        match form {
            FormState::Text { text: input } | FormState::Url { url: input } => {
                if input.is_empty() {
                    return Err(ValidationError::MissingInput);
                }
                Ok(Prepared::Inline(input.clone()))
            }
            FormState::Wifi(fields) => {
                if fields.ssid.is_empty() || fields.password.is_empty() {
                    return Err(ValidationError::MissingWifiCredentials);
                }
                Ok(Prepared::Inline(wifi_payload(
                    &fields.ssid,
                    &fields.password,
                    fields.encryption,
                    self.escape_wifi,
                )))
            }
            FormState::WhatsApp(fields) => {
                if fields.phone_number.is_empty() {
                    return Err(ValidationError::MissingPhoneNumber);
                }
                Ok(Prepared::Inline(whatsapp_payload(
                    &fields.country_code,
                    &fields.phone_number,
                )))
            }
            FormState::Image { file } => {
                upload_request(ContentType::Image, file, ValidationError::MissingImage)
            }
            FormState::Pdf { file } => {
                upload_request(ContentType::Pdf, file, ValidationError::MissingPdf)
            }
        }
    }
}

fn upload_request(
    target: ContentType,
    file: &Option<SelectedFile>,
    missing: ValidationError,
) -> Result<Prepared, ValidationError> {
    let accepted = match file {
        Some(file) if target == ContentType::Image && file.is_image() => file,
        Some(file) if target == ContentType::Pdf && file.is_pdf() => file,
        _ => return Err(missing),
    };
    Ok(Prepared::Upload(UploadRequest {
        target,
        file: accepted.clone(),
    }))
}

/// `WIFI:T:<encryption>;S:<ssid>;P:<password>;;`
pub fn wifi_payload(ssid: &str, password: &str, encryption: Encryption, escape: bool) -> String {
    if escape {
        format!(
            "WIFI:T:{encryption};S:{};P:{};;",
            escape_wifi_field(ssid),
            escape_wifi_field(password)
        )
    } else {
        format!("WIFI:T:{encryption};S:{ssid};P:{password};;")
    }
}

fn escape_wifi_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `https://wa.me/<country digits><phone digits>`
///
/// Only ASCII digits of either field survive, so `+`, separators and
/// labels typed alongside the dialing prefix never reach the link.
pub fn whatsapp_payload(country_code: &str, phone_number: &str) -> String {
    format!(
        "https://wa.me/{}{}",
        ascii_digits(country_code),
        ascii_digits(phone_number)
    )
}

fn ascii_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{WhatsAppFields, WifiFields};

    fn inline(prepared: Prepared) -> String {
        match prepared {
            Prepared::Inline(payload) => payload,
            other => panic!("expected inline payload, got {other:?}"),
        }
    }

    #[test]
    fn wifi_example() {
        let form = FormState::Wifi(WifiFields {
            ssid: "HomeNet".into(),
            password: "secret123".into(),
            ..WifiFields::default()
        });
        let payload = inline(PayloadBuilder::new().prepare(&form).unwrap());
        assert_eq!(payload, "WIFI:T:WPA;S:HomeNet;P:secret123;;");
    }

    #[test]
    fn wifi_format_holds_for_every_encryption() {
        for (encryption, token) in [
            (Encryption::Wep, "WEP"),
            (Encryption::Wpa, "WPA"),
            (Encryption::NoPass, "nopass"),
        ] {
            for (ssid, password) in [("a", "b"), ("Cafe Wifi", "pa ss"), ("x;y", "p:q\\")] {
                assert_eq!(
                    wifi_payload(ssid, password, encryption, false),
                    format!("WIFI:T:{token};S:{ssid};P:{password};;")
                );
            }
        }
    }

    #[test]
    fn wifi_escaping_is_opt_in() {
        let builder = PayloadBuilder::new().with_wifi_escaping(true);
        let form = FormState::Wifi(WifiFields {
            ssid: "my;net".into(),
            password: "a:b\\c,\"d".into(),
            encryption: Encryption::Wpa,
        });
        let payload = inline(builder.prepare(&form).unwrap());
        assert_eq!(payload, r#"WIFI:T:WPA;S:my\;net;P:a\:b\\c\,\"d;;"#);
    }

    #[test]
    fn wifi_requires_both_fields() {
        let builder = PayloadBuilder::new();
        let missing_password = FormState::Wifi(WifiFields {
            ssid: "HomeNet".into(),
            ..WifiFields::default()
        });
        let missing_ssid = FormState::Wifi(WifiFields {
            password: "secret".into(),
            ..WifiFields::default()
        });
        for form in [missing_password, missing_ssid] {
            assert_eq!(
                builder.prepare(&form),
                Err(ValidationError::MissingWifiCredentials)
            );
        }
    }

    #[test]
    fn whatsapp_example() {
        let form = FormState::WhatsApp(WhatsAppFields {
            country_code: "+92".into(),
            phone_number: "300-123-4567".into(),
        });
        let payload = inline(PayloadBuilder::new().prepare(&form).unwrap());
        assert_eq!(payload, "https://wa.me/923001234567");
    }

    #[test]
    fn whatsapp_strips_formatting() {
        assert_eq!(
            whatsapp_payload("+1", "(555) 010-9999 ext."),
            "https://wa.me/15550109999"
        );
        assert_eq!(whatsapp_payload("44", "07 700 900"), "https://wa.me/4407700900");
        assert_eq!(whatsapp_payload("+971", "+50 123"), "https://wa.me/97150123");
    }

    #[test]
    fn whatsapp_country_code_keeps_only_digits() {
        assert_eq!(
            whatsapp_payload("+1-684", "733-1234"),
            "https://wa.me/16847331234"
        );
        assert_eq!(
            whatsapp_payload("+92 (PK)", "3001234567"),
            "https://wa.me/923001234567"
        );
        assert_eq!(whatsapp_payload(" ++44 ", "7700"), "https://wa.me/447700");
    }

    #[test]
    fn whatsapp_requires_phone() {
        let form = FormState::empty(ContentType::WhatsApp);
        assert_eq!(
            PayloadBuilder::new().prepare(&form),
            Err(ValidationError::MissingPhoneNumber)
        );
    }

    #[test]
    fn text_and_url_pass_through() {
        let builder = PayloadBuilder::new();
        let text = FormState::Text {
            text: "  hello\nworld ".into(),
        };
        let url = FormState::Url {
            url: "https://example.com/?q=1".into(),
        };
        assert_eq!(inline(builder.prepare(&text).unwrap()), "  hello\nworld ");
        assert_eq!(
            inline(builder.prepare(&url).unwrap()),
            "https://example.com/?q=1"
        );
        assert_eq!(
            builder.prepare(&FormState::empty(ContentType::Url)),
            Err(ValidationError::MissingInput)
        );
    }

    #[test]
    fn files_become_upload_requests() {
        let file = SelectedFile::new("scan.pdf", "application/pdf", b"%PDF".to_vec());
        let form = FormState::Pdf {
            file: Some(file.clone()),
        };
        assert_eq!(
            PayloadBuilder::new().prepare(&form),
            Ok(Prepared::Upload(UploadRequest {
                target: ContentType::Pdf,
                file,
            }))
        );
    }

    #[test]
    fn missing_files_have_type_specific_messages() {
        let builder = PayloadBuilder::new();
        let image = builder.prepare(&FormState::empty(ContentType::Image));
        let pdf = builder.prepare(&FormState::empty(ContentType::Pdf));
        assert_eq!(image, Err(ValidationError::MissingImage));
        assert_eq!(pdf, Err(ValidationError::MissingPdf));
        assert_ne!(
            ValidationError::MissingImage.to_string(),
            ValidationError::MissingPdf.to_string()
        );
    }

    #[test]
    fn mismatched_file_is_treated_as_missing() {
        let form = FormState::Pdf {
            file: Some(SelectedFile::new("a.png", "image/png", vec![0])),
        };
        assert_eq!(
            PayloadBuilder::new().prepare(&form),
            Err(ValidationError::MissingPdf)
        );
    }
}
