//! Hosting of image and PDF files
//!
//! Files are sent as an unsigned multipart upload: a `file` part and an
//! `upload_preset` field. Images go to the `image` endpoint, PDFs to the
//! `raw` endpoint. The hosted URL is read from `secure_url`.

use crate::config::UploadOptions;
use crate::content::ContentType;
use crate::error::{UploadError, UploadErrorKind};
use crate::form::SelectedFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

/// A file waiting to be hosted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// `Image` or `Pdf`; selects the endpoint
    pub target: ContentType,
    /// The file to send
    pub file: SelectedFile,
}

/// Hosts a file and returns its public URL
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload the file, returning the hosted URL
    async fn upload(&self, request: UploadRequest) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Uploader speaking the unsigned multipart upload API over HTTPS
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    options: UploadOptions,
}

impl HttpUploader {
    /// Build an uploader from configuration
    pub fn new(options: UploadOptions) -> crate::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = options.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| crate::Error::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, options })
    }

    /// Endpoint used for the given content type
    pub fn endpoint(&self, target: ContentType) -> String {
        let resource = match target {
            ContentType::Pdf => "raw",
            _ => "image",
        };
        format!(
            "{}/{}/{}/upload",
            self.options.base_url.trim_end_matches('/'),
            self.options.cloud_name,
            resource
        )
    }

    async fn send(&self, request: UploadRequest) -> Result<String, UploadErrorKind> {
        let UploadRequest { target, file } = request;
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.name)
            .mime_str(&file.mime)
            .map_err(|e| UploadErrorKind::Network(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.options.upload_preset.clone());

        let response = self
            .client
            .post(self.endpoint(target))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadErrorKind::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadErrorKind::Status(status.as_u16()));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|_| UploadErrorKind::MissingUrl)?;
        body.secure_url
            .filter(|url| !url.is_empty())
            .ok_or(UploadErrorKind::MissingUrl)
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, request: UploadRequest) -> Result<String, UploadError> {
        let target = request.target;
        let file = request.file.name.clone();
        let bytes = request.file.data.len();
        tracing::info!(%target, %file, bytes, "Uploading file");

        match self.send(request).await {
            Ok(url) => {
                tracing::info!(%target, %url, "Upload complete");
                Ok(url)
            }
            Err(kind) => {
                tracing::warn!(%target, ?kind, "Upload failed");
                Err(UploadError::new(target, kind))
            }
        }
    }
}
