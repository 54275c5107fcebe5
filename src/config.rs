//! qrgen runtime configuration handling

use crate::content::DEFAULT_COUNTRY_CODE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure loaded from disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrgenConfig {
    /// File hosting endpoint settings
    pub upload: UploadOptions,
    /// QR image appearance
    pub render: RenderOptions,
    /// Payload formatting choices
    pub payload: PayloadOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// Where downloads are written
    pub output: OutputOptions,
}

impl QrgenConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrgen.toml / qrgen.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrgen.toml", "qrgen.yaml", "qrgen.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrgen");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.upload.apply_overrides(env_var);
        self.render.apply_overrides(env_var);
        self.payload.apply_overrides(env_var);
        self.logging.apply_overrides(env_var);
        self.output.apply_overrides(env_var);
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Unsigned upload endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// API root, without the cloud name
    pub base_url: String,
    /// Account segment of the endpoint path
    pub cloud_name: String,
    /// Preset authorising unauthenticated uploads
    pub upload_preset: String,
    /// Optional request timeout; uploads wait indefinitely when unset
    pub timeout_secs: Option<u64>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
            cloud_name: "dyau5koyt".to_string(),
            upload_preset: "qr_code".to_string(),
            timeout_secs: None,
        }
    }
}

impl UploadOptions {
    pub(crate) fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("QRGEN_UPLOAD_BASE_URL") {
            self.base_url = url;
        }
        if let Some(name) = var("QRGEN_CLOUD_NAME") {
            self.cloud_name = name;
        }
        if let Some(preset) = var("QRGEN_UPLOAD_PRESET") {
            self.upload_preset = preset;
        }
        if let Some(timeout) = var("QRGEN_UPLOAD_TIMEOUT_SECS") {
            self.timeout_secs = timeout.parse::<u64>().ok().filter(|secs| *secs > 0);
        }
    }
}

/// Error correction level of rendered symbols
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum EcLevelOption {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl From<EcLevelOption> for qrcode::EcLevel {
    fn from(level: EcLevelOption) -> Self {
        match level {
            EcLevelOption::L => qrcode::EcLevel::L,
            EcLevelOption::M => qrcode::EcLevel::M,
            EcLevelOption::Q => qrcode::EcLevel::Q,
            EcLevelOption::H => qrcode::EcLevel::H,
        }
    }
}

/// QR image appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Image width in pixels
    pub width: u32,
    /// Quiet zone, in modules
    pub margin: u32,
    /// Module colour as hex
    pub dark: String,
    /// Background colour as hex
    pub light: String,
    /// Error correction level
    pub ecc_level: EcLevelOption,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 300,
            margin: 2,
            dark: "#000000".to_string(),
            light: "#FFFFFF".to_string(),
            ecc_level: EcLevelOption::M,
        }
    }
}

impl RenderOptions {
    pub(crate) fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(width) = var("QRGEN_QR_WIDTH").and_then(|w| w.parse::<u32>().ok()) {
            self.width = width;
        }
        if let Some(margin) = var("QRGEN_QR_MARGIN").and_then(|m| m.parse::<u32>().ok()) {
            self.margin = margin;
        }
        if let Some(dark) = var("QRGEN_QR_DARK") {
            self.dark = dark;
        }
        if let Some(light) = var("QRGEN_QR_LIGHT") {
            self.light = light;
        }
    }
}

/// Payload formatting choices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadOptions {
    /// Escape `\ ; , : "` inside WiFi SSID and password
    pub escape_wifi: bool,
    /// Dialing prefix preselected for WhatsApp links
    pub default_country_code: String,
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self {
            escape_wifi: false,
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

impl PayloadOptions {
    pub(crate) fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(escape) = var("QRGEN_WIFI_ESCAPE").as_deref().and_then(parse_flag) {
            self.escape_wifi = escape;
        }
        if let Some(code) = var("QRGEN_COUNTRY_CODE") {
            self.default_country_code = code;
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRGEN_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(level) = var("QRGEN_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = var("QRGEN_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = var("QRGEN_LOG_COLOR").as_deref().and_then(parse_flag) {
            self.color = color;
        }
        if let Some(rotation) = var("QRGEN_LOG_ROTATION").as_deref().and_then(LogRotation::parse) {
            self.rotation = Some(rotation);
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

/// Download destination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory PNG downloads are written into
    pub directory: PathBuf,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("QRGEN_OUTPUT_DIR") {
            self.directory = PathBuf::from(dir);
        }
    }
}
