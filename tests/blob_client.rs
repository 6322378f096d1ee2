//! Blob client against a mock HTTP server. The client is blocking, so
//! every call runs on a blocking thread of the test runtime.

use blob_migrate::api::{BlobClient, BlobStore, ListOptions, PutOptions};
use blob_migrate::config::UploadConfig;
use blob_migrate::error::ApiError;
use blob_migrate::mapping::UrlMapping;
use blob_migrate::report::Reporter;
use blob_migrate::upload::{run_upload, NoDelay};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_bytes, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn put_response(pathname: &str) -> serde_json::Value {
    json!({
        "url": format!("https://store.public.blob.vercel-storage.com/{pathname}"),
        "downloadUrl": format!("https://store.public.blob.vercel-storage.com/{pathname}?download=1"),
        "pathname": pathname,
        "contentType": "image/png",
        "contentDisposition": format!("inline; filename=\"{pathname}\"")
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn put_sends_token_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/"))
        .and(query_param("pathname", "logo.png"))
        .and(header("authorization", "Bearer secret"))
        .and(header("x-api-version", "7"))
        .and(header("x-access", "public"))
        .and(header("x-add-random-suffix", "0"))
        .and(header("x-content-type", "image/png"))
        .and(body_bytes(b"PNGDATA".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(put_response("logo.png")))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let blob = tokio::task::spawn_blocking(move || {
        let client = BlobClient::new(base, "secret").unwrap();
        client.put("logo.png", b"PNGDATA".to_vec(), &PutOptions::public_stable("image/png"))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(blob.url, "https://store.public.blob.vercel-storage.com/logo.png");
    assert_eq!(blob.pathname, "logo.png");
}

#[tokio::test(flavor = "multi_thread")]
async fn put_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Access denied"))
        .mount(&server)
        .await;

    let base = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let client = BlobClient::new(base, "bad").unwrap();
        client.put("x.png", vec![1, 2, 3], &PutOptions::public_stable("image/png"))
    })
    .await
    .unwrap()
    .unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "Access denied");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn list_passes_filters_and_parses_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("limit", "2"))
        .and(query_param("prefix", "logo"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blobs": [{
                "url": "https://store.public.blob.vercel-storage.com/logo.png",
                "downloadUrl": "https://store.public.blob.vercel-storage.com/logo.png?download=1",
                "pathname": "logo.png",
                "size": 1024,
                "uploadedAt": "2024-05-01T10:00:00.000Z"
            }],
            "cursor": "next-page",
            "hasMore": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    let page = tokio::task::spawn_blocking(move || {
        let client = BlobClient::new(base, "secret").unwrap();
        client.list(&ListOptions {
            limit: Some(2),
            prefix: Some("logo".into()),
            cursor: None,
        })
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(page.blobs.len(), 1);
    assert_eq!(page.blobs[0].size, 1024);
    assert!(page.has_more);
    assert_eq!(page.cursor.as_deref(), Some("next-page"));
}

#[tokio::test(flavor = "multi_thread")]
async fn full_upload_run_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(query_param("pathname", "hero.png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(put_response("hero.png")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(query_param("pathname", "broken.png"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    std::fs::write(images.join("hero.png"), b"a").unwrap();
    std::fs::write(images.join("broken.png"), b"b").unwrap();

    let cfg = UploadConfig {
        token: "secret".into(),
        api_url: server.uri(),
        images_dir: images,
        mapping_file: dir.path().join("blob-url-mapping.json"),
        delay: Duration::ZERO,
    };

    let mapping_file = cfg.mapping_file.clone();
    let run = tokio::task::spawn_blocking(move || {
        let client = BlobClient::from_config(&cfg).unwrap();
        run_upload(&cfg, &client, NoDelay, &Reporter::hidden())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(run.found, 2);
    assert_eq!(run.summary.succeeded(), 1);
    assert_eq!(run.summary.failed(), 1);

    let mapping = UrlMapping::load(&mapping_file).unwrap();
    assert_eq!(
        mapping.get("../images/hero.png"),
        Some("https://store.public.blob.vercel-storage.com/hero.png")
    );
    assert!(mapping.get("images/broken.png").is_none());
}
