//! qrgen command-line entrypoint

use clap::{Parser, Subcommand};
use qrgen::output::{Rendered, error_value, render_artifact, render_decoded};
use qrgen::{
    COUNTRY_CODES, ContentType, Encryption, Error, FormState, HttpUploader, QrDecoder,
    QrgenConfig, Result, SelectedFile, Session, logging,
};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrgen",
    version,
    about = "Generate QR codes for text, URLs, WiFi, WhatsApp, images and PDFs"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrgen.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Directory the PNG is written to (overrides configuration)
    #[arg(long, value_name = "DIR", global = true)]
    out: Option<PathBuf>,

    /// Do not write a PNG, only report the result
    #[arg(long, global = true)]
    no_download: bool,

    /// Include the base64 data URL of the image in the output
    #[arg(long, global = true)]
    data_url: bool,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode free text
    Text {
        /// Text to encode
        text: String,
    },
    /// Encode a URL
    Url {
        /// URL to encode
        url: String,
    },
    /// Encode WiFi credentials
    Wifi {
        /// Network name
        #[arg(long)]
        ssid: String,
        /// Network password
        #[arg(long)]
        password: String,
        /// WEP, WPA or nopass
        #[arg(long, default_value = "WPA")]
        encryption: Encryption,
        /// Escape reserved characters in SSID and password
        #[arg(long)]
        escape: bool,
    },
    /// Encode a WhatsApp chat link
    Whatsapp {
        /// Phone number, any formatting
        #[arg(long)]
        phone: String,
        /// Dialing prefix (defaults to the configured one)
        #[arg(long, value_name = "CODE")]
        country_code: Option<String>,
    },
    /// Upload an image and encode its URL
    Image {
        /// Image file
        path: PathBuf,
    },
    /// Upload a PDF and encode its URL
    Pdf {
        /// PDF file
        path: PathBuf,
    },
    /// Read a QR code image and print what it encodes
    Inspect {
        /// Image containing a QR code
        path: PathBuf,
    },
    /// List the dialing prefixes offered for WhatsApp links
    Countries,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err.to_string();
            if json {
                match serde_json::to_string_pretty(&error_value(&message)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("{message}"),
                }
            } else {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = QrgenConfig::load(cli.config.as_deref())?;
    if let Some(ref dir) = cli.out {
        config.output.directory = dir.clone();
    }
    if let Command::Wifi { escape: true, .. } = cli.command {
        config.payload.escape_wifi = true;
    }

    logging::init(&config.logging)?;

    match cli.command {
        Command::Countries => {
            return emit(&countries(), cli.json);
        }
        Command::Inspect { ref path } => {
            let decoded = QrDecoder::new().decode_file(path)?;
            return emit(&render_decoded(&decoded), cli.json);
        }
        _ => {}
    }

    let uploader = Arc::new(HttpUploader::new(config.upload.clone())?);
    let mut session = Session::from_config(&config, uploader)?;
    fill_form(&mut session, cli.command).await?;

    let artifact = session.generate().await?;
    let saved_to = if cli.no_download {
        None
    } else {
        Some(session.download(&config.output.directory).await?)
    };
    info!(content_type = %artifact.content_type, "Done");

    emit(
        &render_artifact(&artifact, saved_to.as_deref(), cli.data_url),
        cli.json,
    )
}

async fn fill_form(session: &mut Session, command: Command) -> Result<()> {
    let content_type = match command {
        Command::Text { .. } => ContentType::Text,
        Command::Url { .. } => ContentType::Url,
        Command::Wifi { .. } => ContentType::Wifi,
        Command::Whatsapp { .. } => ContentType::WhatsApp,
        Command::Image { .. } => ContentType::Image,
        Command::Pdf { .. } => ContentType::Pdf,
        Command::Inspect { .. } | Command::Countries => {
            return Err(Error::Other("command does not produce a QR code".into()));
        }
    };
    session.select_type(content_type);

    match (session.form_mut(), command) {
        (FormState::Text { text: field }, Command::Text { text })
        | (FormState::Url { url: field }, Command::Url { url: text }) => *field = text,
        (
            FormState::Wifi(fields),
            Command::Wifi {
                ssid,
                password,
                encryption,
                ..
            },
        ) => {
            fields.ssid = ssid;
            fields.password = password;
            fields.encryption = encryption;
        }
        (
            FormState::WhatsApp(fields),
            Command::Whatsapp {
                phone,
                country_code,
            },
        ) => {
            fields.phone_number = phone;
            if let Some(code) = country_code {
                fields.country_code = code;
            }
        }
        (form, Command::Image { path } | Command::Pdf { path }) => {
            let file = SelectedFile::load(&path).await?;
            if !form.select_file(file) {
                tracing::warn!(path = %path.display(), "File type does not match the form");
            }
        }
        _ => {}
    }
    Ok(())
}

fn countries() -> Rendered {
    let json = json!(COUNTRY_CODES);
    let human = COUNTRY_CODES
        .iter()
        .map(|c| format!("  {:<5} {}", c.code, c.country))
        .collect();
    Rendered { json, human }
}

fn emit(rendered: &Rendered, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
    }
    Ok(())
}
