//! Rendering generated artifacts for the terminal and for JSON consumers

use crate::qr::{DecodedQr, QrArtifact};
use serde_json::{Map, Value, json};
use std::path::Path;

/// Combined structured and human-readable representation of a result
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Describe a generated artifact, optionally with where it was saved and
/// its embeddable data URL.
pub fn render_artifact(
    artifact: &QrArtifact,
    saved_to: Option<&Path>,
    include_data_url: bool,
) -> Rendered {
    let mut root = Map::new();
    root.insert(
        "content_type".to_string(),
        Value::String(artifact.content_type.to_string()),
    );
    root.insert(
        "payload".to_string(),
        Value::String(artifact.payload.clone()),
    );
    root.insert("width".to_string(), Value::from(artifact.width));
    root.insert("png_bytes".to_string(), Value::from(artifact.png.len()));
    root.insert(
        "created_at".to_string(),
        Value::String(artifact.created_at.to_rfc3339()),
    );
    root.insert(
        "path".to_string(),
        saved_to
            .map(|p| Value::String(p.display().to_string()))
            .unwrap_or(Value::Null),
    );
    if include_data_url {
        root.insert("data_url".to_string(), Value::String(artifact.data_url()));
    }

    let mut human = vec![
        "QR code generated".to_string(),
        format!("  Type: {}", artifact.content_type),
        format!("  Payload: {}", format_text_snippet(&artifact.payload)),
        format!(
            "  Image: {}x{} px, {} bytes PNG",
            artifact.width,
            artifact.width,
            artifact.png.len()
        ),
    ];
    if let Some(path) = saved_to {
        human.push(format!("  Saved to: {}", path.display()));
    }
    if include_data_url {
        human.push(format!("  Data URL: {}", artifact.data_url()));
    }

    Rendered {
        json: Value::Object(root),
        human,
    }
}

/// Describe the contents read back from a QR image.
pub fn render_decoded(decoded: &DecodedQr) -> Rendered {
    let json = json!({
        "text": decoded.as_str(),
        "byte_length": decoded.data.len(),
    });
    let human = match decoded.as_str() {
        Some(text) => vec![format!("QR text: {text}")],
        None => vec![format!("QR binary payload ({} bytes)", decoded.data.len())],
    };
    Rendered { json, human }
}

/// JSON shape used for user-facing errors
pub fn error_value(message: &str) -> Value {
    json!({ "error": message })
}

fn format_text_snippet(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let snippet: String = text.chars().take(MAX).collect();
        let total = text.chars().count();
        format!("{}... ({} chars)", snippet, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;
    use bytes::Bytes;
    use chrono::Utc;

    fn artifact(payload: &str) -> QrArtifact {
        QrArtifact {
            content_type: ContentType::Url,
            payload: payload.to_string(),
            png: Bytes::from_static(b"png"),
            width: 300,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn renders_artifact_consistently() {
        let rendered = render_artifact(
            &artifact("https://example.com"),
            Some(Path::new("out/qrcode-url-1.png")),
            false,
        );

        assert_eq!(rendered.json["content_type"], "url");
        assert_eq!(rendered.json["payload"], "https://example.com");
        assert_eq!(rendered.json["path"], "out/qrcode-url-1.png");
        assert!(rendered.json.get("data_url").is_none());
        assert!(
            rendered
                .human
                .iter()
                .any(|line| line.contains("Saved to: out/qrcode-url-1.png"))
        );
    }

    #[test]
    fn data_url_is_optional() {
        let rendered = render_artifact(&artifact("x"), None, true);
        assert_eq!(rendered.json["data_url"], "data:image/png;base64,cG5n");
        assert_eq!(rendered.json["path"], Value::Null);
    }

    #[test]
    fn long_payloads_are_truncated_for_humans() {
        let long = "a".repeat(200);
        let rendered = render_artifact(&artifact(&long), None, false);
        assert!(rendered.human.iter().any(|line| line.ends_with("(200 chars)")));
        assert_eq!(rendered.json["payload"], long.as_str());
    }

    #[test]
    fn decoded_binary_is_summarised() {
        let rendered = render_decoded(&DecodedQr::from_bytes(vec![0xFF]));
        assert_eq!(rendered.human, vec!["QR binary payload (1 bytes)".to_string()]);
        assert_eq!(rendered.json["text"], Value::Null);
    }
}
