//! Content types a QR code can be generated for

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The QR use-case selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Free text
    Text,
    /// A URL, encoded verbatim
    Url,
    /// WiFi network credentials
    Wifi,
    /// WhatsApp chat deep link
    #[serde(rename = "whatsapp")]
    WhatsApp,
    /// An image hosted on the upload service
    Image,
    /// A PDF hosted on the upload service
    Pdf,
}

impl ContentType {
    /// Every content type, in menu order
    pub const ALL: [ContentType; 6] = [
        ContentType::Text,
        ContentType::Url,
        ContentType::Wifi,
        ContentType::WhatsApp,
        ContentType::Image,
        ContentType::Pdf,
    ];

    /// Lowercase identifier, also used in download file names
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Url => "url",
            ContentType::Wifi => "wifi",
            ContentType::WhatsApp => "whatsapp",
            ContentType::Image => "image",
            ContentType::Pdf => "pdf",
        }
    }

    /// Whether the payload comes from an uploaded file
    pub fn requires_upload(self) -> bool {
        matches!(self, ContentType::Image | ContentType::Pdf)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown content type '{value}', expected text, url, wifi, whatsapp, image or pdf"
                )
            })
    }
}

/// WiFi authentication type as written into the `T:` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encryption {
    /// WEP
    #[serde(rename = "WEP")]
    Wep,
    /// WPA/WPA2/WPA3 personal
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    /// Open network
    #[serde(rename = "nopass")]
    NoPass,
}

impl Encryption {
    /// Token used in the WiFi QR string
    pub fn as_str(self) -> &'static str {
        match self {
            Encryption::Wep => "WEP",
            Encryption::Wpa => "WPA",
            Encryption::NoPass => "nopass",
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encryption {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wep" => Ok(Encryption::Wep),
            "wpa" | "wpa2" | "wpa3" => Ok(Encryption::Wpa),
            "nopass" | "none" | "open" => Ok(Encryption::NoPass),
            other => Err(format!(
                "Unsupported encryption '{other}', expected WEP, WPA or nopass"
            )),
        }
    }
}

/// A dialing prefix offered for WhatsApp links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountryCode {
    /// Prefix including the leading `+`
    pub code: &'static str,
    /// Display name
    pub country: &'static str,
}

/// Prefix preselected for new WhatsApp forms
pub const DEFAULT_COUNTRY_CODE: &str = "+92";

/// Dialing prefixes offered by the WhatsApp form
pub const COUNTRY_CODES: &[CountryCode] = &[
    CountryCode { code: "+1", country: "US/Canada" },
    CountryCode { code: "+44", country: "UK" },
    CountryCode { code: "+91", country: "India" },
    CountryCode { code: "+92", country: "Pakistan" },
    CountryCode { code: "+61", country: "Australia" },
    CountryCode { code: "+86", country: "China" },
    CountryCode { code: "+81", country: "Japan" },
    CountryCode { code: "+49", country: "Germany" },
    CountryCode { code: "+33", country: "France" },
    CountryCode { code: "+971", country: "UAE" },
];
