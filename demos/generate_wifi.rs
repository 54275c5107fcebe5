//! Generate a WiFi QR code and save it to a file
//!
//! Usage: cargo run --example generate_wifi

use qrgen::{Encryption, QrDecoder, QrRenderer, wifi_payload};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let renderer = QrRenderer::new();

    let payload = wifi_payload("HomeNet", "secret123", Encryption::Wpa, false);
    let png = renderer.render_png(&payload)?;
    std::fs::write("qr_wifi.png", &png)?;

    println!("✓ WiFi QR code saved to qr_wifi.png");
    println!("  Content: {}", payload);

    // Read it back to confirm what phones will see
    let decoded = QrDecoder::new().decode_png(&png)?;
    println!("  Decoded: {}", decoded.as_str().unwrap_or("<binary>"));

    Ok(())
}
