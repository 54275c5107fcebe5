use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qrgen::{
    ContentType, FormState, HttpUploader, Phase, SelectedFile, Session, UploadErrorKind,
    UploadOptions, UploadRequest, Uploader,
};

fn options(server: &MockServer) -> UploadOptions {
    UploadOptions {
        base_url: server.uri(),
        cloud_name: "demo".to_string(),
        upload_preset: "qr_code".to_string(),
        timeout_secs: Some(5),
    }
}

fn image_request() -> UploadRequest {
    UploadRequest {
        target: ContentType::Image,
        file: SelectedFile::new("cat.png", "image/png", b"fake-png-bytes".to_vec()),
    }
}

fn pdf_request() -> UploadRequest {
    UploadRequest {
        target: ContentType::Pdf,
        file: SelectedFile::new("menu.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
    }
}

#[tokio::test]
async fn image_upload_posts_multipart_and_returns_secure_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/demo/image/upload"))
        .and(body_string_contains("name=\"upload_preset\""))
        .and(body_string_contains("qr_code"))
        .and(body_string_contains("filename=\"cat.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": "https://cdn.test/demo/cat.png",
            "public_id": "cat",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = HttpUploader::new(options(&server)).expect("build uploader");
    let url = uploader.upload(image_request()).await.expect("upload");
    assert_eq!(url, "https://cdn.test/demo/cat.png");
}

#[tokio::test]
async fn pdf_upload_uses_raw_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/demo/raw/upload"))
        .and(body_string_contains("application/pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "secure_url": "https://cdn.test/demo/menu.pdf" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uploader = HttpUploader::new(options(&server)).expect("build uploader");
    let url = uploader.upload(pdf_request()).await.expect("upload");
    assert_eq!(url, "https://cdn.test/demo/menu.pdf");
}

#[tokio::test]
async fn non_success_status_is_upload_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": { "message": "Upload preset not found" } })),
        )
        .mount(&server)
        .await;

    let uploader = HttpUploader::new(options(&server)).expect("build uploader");
    let err = uploader.upload(image_request()).await.unwrap_err();
    assert_eq!(err.kind, UploadErrorKind::Status(400));
    assert_eq!(err.to_string(), "Image upload failed. Please try again.");
}

#[tokio::test]
async fn response_without_url_is_upload_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "public_id": "x" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/demo/raw/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .with_priority(1)
        .mount(&server)
        .await;

    let uploader = HttpUploader::new(options(&server)).expect("build uploader");
    let missing = uploader.upload(image_request()).await.unwrap_err();
    assert_eq!(missing.kind, UploadErrorKind::MissingUrl);

    let not_json = uploader.upload(pdf_request()).await.unwrap_err();
    assert_eq!(not_json.kind, UploadErrorKind::MissingUrl);
    assert_eq!(not_json.to_string(), "PDF upload failed. Please try again.");
}

#[tokio::test]
async fn unreachable_host_is_network_failure() {
    let opts = UploadOptions {
        base_url: "http://127.0.0.1:1".to_string(),
        ..UploadOptions::default()
    };

    let uploader = HttpUploader::new(opts).expect("build uploader");
    let err = uploader.upload(image_request()).await.unwrap_err();
    assert!(matches!(err.kind, UploadErrorKind::Network(_)), "{err:?}");
}

#[tokio::test]
async fn session_encodes_hosted_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/demo/image/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "secure_url": "https://cdn.test/demo/cat.png" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uploader = Arc::new(HttpUploader::new(options(&server)).expect("build uploader"));
    let mut session = Session::new(uploader);
    session.select_type(ContentType::Image);
    assert!(session.form_mut().select_file(image_request().file));

    let artifact = session.generate().await.expect("generate");
    assert_eq!(artifact.payload, "https://cdn.test/demo/cat.png");

    let decoded = qrgen::QrDecoder::new()
        .decode_png(&artifact.png)
        .expect("decode artifact");
    assert_eq!(decoded.as_str(), Some("https://cdn.test/demo/cat.png"));
}

#[tokio::test]
async fn session_keeps_file_after_failed_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uploader = Arc::new(HttpUploader::new(options(&server)).expect("build uploader"));
    let mut session = Session::new(uploader);
    session.select_type(ContentType::Pdf);
    let file = pdf_request().file;
    session.form_mut().select_file(file.clone());

    let err = session.generate().await.unwrap_err();
    assert_eq!(err.to_string(), "PDF upload failed. Please try again.");
    assert_eq!(session.phase(), Phase::Failed);
    assert_eq!(session.form(), &FormState::Pdf { file: Some(file) });
}
