//! The QR generator form and its submission state machine
//!
//! A [`Session`] owns the form for the selected content type and drives one
//! submission at a time through
//! `Idle → Validating → (AwaitingUpload) → Encoding → Ready`, or into
//! `Failed` with the error attached. Failures never lock the form: fields
//! keep their values and a new submission may start right away.
//!
//! Uploads run as spawned tasks owned by the session. Selecting another
//! content type, resetting, or dropping the session aborts the task, so a
//! late upload result can never attach itself to a form it no longer
//! belongs to.

use crate::config::QrgenConfig;
use crate::content::ContentType;
use crate::error::{EncodingError, Error, GenerateError, Result, UploadError, UploadErrorKind};
use crate::form::FormState;
use crate::payload::{PayloadBuilder, Prepared};
use crate::qr::{QrArtifact, QrRenderer};
use crate::upload::{UploadRequest, Uploader};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where the current submission stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Editable, nothing submitted
    Idle,
    /// Checking the form
    Validating,
    /// Waiting for the hosting service to return a URL
    AwaitingUpload,
    /// Rendering the QR image
    Encoding,
    /// Artifact available for display or download
    Ready,
    /// Last submission failed; editable, error attached
    Failed,
}

/// Result of starting a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    /// The payload was encoded synchronously
    Ready(QrArtifact),
    /// An upload is running; await [`Session::wait`] for the artifact
    Pending,
}

struct InFlight {
    submission: u64,
    target: ContentType,
    handle: JoinHandle<std::result::Result<String, UploadError>>,
}

/// Interactive QR generator state
pub struct Session {
    form: FormState,
    phase: Phase,
    error: Option<GenerateError>,
    artifact: Option<QrArtifact>,
    in_flight: Option<InFlight>,
    submissions: u64,
    builder: PayloadBuilder,
    renderer: QrRenderer,
    uploader: Arc<dyn Uploader>,
    default_country_code: Option<String>,
}

impl Session {
    /// Text form, default rendering, unescaped WiFi payloads
    pub fn new(uploader: Arc<dyn Uploader>) -> Self {
        Self {
            form: FormState::default(),
            phase: Phase::Idle,
            error: None,
            artifact: None,
            in_flight: None,
            submissions: 0,
            builder: PayloadBuilder::new(),
            renderer: QrRenderer::new(),
            uploader,
            default_country_code: None,
        }
    }

    /// Session using the rendering and payload settings from `config`
    pub fn from_config(config: &QrgenConfig, uploader: Arc<dyn Uploader>) -> Result<Self> {
        let mut session = Self::new(uploader)
            .with_renderer(QrRenderer::from_options(&config.render)?)
            .with_builder(PayloadBuilder::new().with_wifi_escaping(config.payload.escape_wifi));
        session.default_country_code = Some(config.payload.default_country_code.clone());
        Ok(session)
    }

    /// Replace the renderer
    pub fn with_renderer(mut self, renderer: QrRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the payload builder
    pub fn with_builder(mut self, builder: PayloadBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Selected content type
    pub fn content_type(&self) -> ContentType {
        self.form.content_type()
    }

    /// Current form
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Current form, for editing
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Error from the last submission, if it failed
    pub fn error(&self) -> Option<&GenerateError> {
        self.error.as_ref()
    }

    /// Artifact from the last successful submission
    pub fn artifact(&self) -> Option<&QrArtifact> {
        self.artifact.as_ref()
    }

    /// Whether a submission is waiting on its upload. The generate control
    /// is disabled while this holds.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Switch to another content type, discarding every field, the
    /// artifact, any error, and any running upload.
    pub fn select_type(&mut self, content_type: ContentType) {
        debug!(from = %self.content_type(), to = %content_type, "Switching content type");
        self.clear(content_type);
    }

    /// Clear the form of the current type and return to `Idle`.
    pub fn reset(&mut self) {
        debug!(content_type = %self.content_type(), "Resetting form");
        self.clear(self.content_type());
    }

    fn clear(&mut self, content_type: ContentType) {
        self.cancel_upload();
        self.form = self.empty_form(content_type);
        self.artifact = None;
        self.error = None;
        self.phase = Phase::Idle;
    }

    fn empty_form(&self, content_type: ContentType) -> FormState {
        let mut form = FormState::empty(content_type);
        if let (Some(fields), Some(code)) = (form.whatsapp_mut(), &self.default_country_code) {
            fields.country_code = code.clone();
        }
        form
    }

    fn cancel_upload(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
            debug!(
                submission = in_flight.submission,
                target = %in_flight.target,
                "Discarding in-flight upload"
            );
        }
    }

    /// Start a submission.
    ///
    /// Text, URL, WiFi and WhatsApp forms finish immediately. Image and PDF
    /// forms spawn their upload onto the current Tokio runtime and return
    /// [`Submitted::Pending`]. Fails with [`GenerateError::InFlight`] while
    /// an earlier upload is still running, leaving that upload untouched.
    pub fn submit(&mut self) -> std::result::Result<Submitted, GenerateError> {
        if let Some(in_flight) = &self.in_flight {
            debug!(submission = in_flight.submission, "Submission already in flight");
            return Err(GenerateError::InFlight);
        }

        self.submissions += 1;
        self.error = None;
        self.artifact = None;
        self.phase = Phase::Validating;
        info!(
            submission = self.submissions,
            content_type = %self.content_type(),
            "Generating QR code"
        );

        match self.builder.prepare(&self.form) {
            Err(err) => self.fail(err.into()).map(Submitted::Ready),
            Ok(Prepared::Inline(payload)) => self.encode(payload).map(Submitted::Ready),
            Ok(Prepared::Upload(request)) => {
                self.start_upload(request);
                Ok(Submitted::Pending)
            }
        }
    }

    fn start_upload(&mut self, request: UploadRequest) {
        let target = request.target;
        let uploader = Arc::clone(&self.uploader);
        let handle = tokio::spawn(async move { uploader.upload(request).await });
        self.in_flight = Some(InFlight {
            submission: self.submissions,
            target,
            handle,
        });
        self.phase = Phase::AwaitingUpload;
    }

    /// Wait for the running upload and finish its submission.
    ///
    /// Returns `None` when no upload is running, including when it was
    /// discarded by [`select_type`](Self::select_type) or
    /// [`reset`](Self::reset).
    pub async fn wait(&mut self) -> Option<std::result::Result<QrArtifact, GenerateError>> {
        let in_flight = self.in_flight.as_mut()?;
        let joined = (&mut in_flight.handle).await;
        let target = in_flight.target;
        self.in_flight = None;

        let outcome = joined.unwrap_or_else(|e| {
            Err(UploadError::new(
                target,
                UploadErrorKind::Network(format!("upload task ended early: {e}")),
            ))
        });

        Some(match outcome {
            Ok(url) => self.encode(url),
            Err(err) => self.fail(err.into()),
        })
    }

    /// Submit and, for uploads, wait for completion.
    pub async fn generate(&mut self) -> std::result::Result<QrArtifact, GenerateError> {
        match self.submit()? {
            Submitted::Ready(artifact) => Ok(artifact),
            Submitted::Pending => self.wait().await.unwrap_or(Err(GenerateError::InFlight)),
        }
    }

    fn encode(&mut self, payload: String) -> std::result::Result<QrArtifact, GenerateError> {
        self.phase = Phase::Encoding;
        let (png, width) = match self.renderer.render_sized_png(&payload) {
            Ok(rendered) => rendered,
            Err(err) => return self.fail(err.into()),
        };

        let artifact = QrArtifact {
            content_type: self.content_type(),
            payload,
            png: png.into(),
            width,
            created_at: Utc::now(),
        };
        info!(
            submission = self.submissions,
            content_type = %artifact.content_type,
            payload_len = artifact.payload.len(),
            "QR code ready"
        );
        self.artifact = Some(artifact.clone());
        self.phase = Phase::Ready;
        Ok(artifact)
    }

    fn fail(&mut self, err: GenerateError) -> std::result::Result<QrArtifact, GenerateError> {
        match &err {
            GenerateError::Encoding(EncodingError { detail }) => {
                warn!(submission = self.submissions, %detail, "QR encoding failed")
            }
            other => info!(submission = self.submissions, error = %other, "Submission rejected"),
        }
        self.error = Some(err.clone());
        self.phase = Phase::Failed;
        Err(err)
    }

    /// Save the current artifact as PNG into `dir`.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf> {
        let artifact = self.artifact.as_ref().ok_or(Error::NothingToDownload)?;
        crate::download::save(artifact, dir).await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_upload();
    }
}
