// Contract tests for the harness's HTTP client
//
// A stub backend stands in for the system under test so the client's
// request shapes (forwarded identity headers, multipart upload, expected
// status codes) and response decoding are pinned down without the real stack.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{web, App, HttpRequest, HttpResponse};
use docproc_harness::config::HarnessConfig;
use docproc_harness::core::AppError;
use docproc_harness::harness::{BackendClient, JobStatus};
use helpers::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const EMAIL: &str = "test@example.com";

fn forwarded_email(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("X-Forwarded-Email")
        .and_then(|v| v.to_str().ok())
}

async fn me(req: HttpRequest) -> HttpResponse {
    match forwarded_email(&req) {
        Some(email) => HttpResponse::Ok().json(json!({"email": email, "authenticated": true})),
        None => HttpResponse::Unauthorized().finish(),
    }
}

async fn create_key(req: HttpRequest, body: web::Json<serde_json::Value>) -> HttpResponse {
    if forwarded_email(&req) != Some(EMAIL) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Created().json(json!({
        "id": "key-1",
        "name": body["name"],
        "key": "dp_live_abcdef"
    }))
}

async fn job_status(path: web::Path<String>, polls: web::Data<AtomicUsize>) -> HttpResponse {
    let seen = polls.fetch_add(1, Ordering::SeqCst);
    let status = if seen < 2 { "processing" } else { "completed" };
    HttpResponse::Ok().json(json!({"id": path.into_inner(), "status": status}))
}

async fn stuck_status(path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(json!({"id": path.into_inner(), "status": "processing"}))
}

fn spawn_backend(polls: Arc<AtomicUsize>) -> TestServer {
    let polls = web::Data::from(polls);
    actix_test::start(move || {
        App::new()
            .app_data(polls.clone())
            .route("/api/v1/me", web::get().to(me))
            .route("/api/v1/api-keys", web::post().to(create_key))
            .route("/api/v1/files/{id}/status", web::get().to(job_status))
            .route("/api/v1/stuck/{id}/status", web::get().to(stuck_status))
    })
}

fn client_for(backend: &TestServer, mock: Option<&TestServer>) -> BackendClient {
    let config = HarnessConfig {
        api_url: format!("http://{}", backend.addr()),
        mock_conversion_url: mock
            .map(|m| format!("http://{}", m.addr()))
            .unwrap_or_else(|| HarnessConfig::default().mock_conversion_url),
        ..HarnessConfig::default()
    };
    BackendClient::new(config).unwrap()
}

#[test]
fn test_job_status_schema() {
    let status: JobStatus =
        serde_json::from_value(json!({"id": "job-1", "status": "failed", "extra": 1})).unwrap();
    assert!(status.is_terminal());

    // `id` is optional in status payloads
    let status: JobStatus = serde_json::from_value(json!({"status": "queued"})).unwrap();
    assert_eq!(status.id, None);
    assert!(!status.is_terminal());
}

#[actix_web::test]
async fn test_identity_headers_are_forwarded() {
    let backend = spawn_backend(Arc::new(AtomicUsize::new(0)));
    let client = client_for(&backend, None);

    let user = client.me().await.unwrap();

    assert_eq!(user.email, EMAIL);
    assert!(user.authenticated);
}

#[actix_web::test]
async fn test_create_api_key_expects_created() {
    let backend = spawn_backend(Arc::new(AtomicUsize::new(0)));
    let client = client_for(&backend, None);

    let key = client.create_api_key("integration key").await.unwrap();

    assert_eq!(key.id, "key-1");
    assert_eq!(key.name, "integration key");
    assert!(!key.key.is_empty());
}

#[actix_web::test]
async fn test_unexpected_status_names_endpoint() {
    let backend = spawn_backend(Arc::new(AtomicUsize::new(0)));
    let client = client_for(&backend, None);

    let err = client.file_status("missing/extra").await.unwrap_err();

    match err {
        AppError::UnexpectedResponse { endpoint, status } => {
            assert!(endpoint.contains("missing/extra"));
            assert_eq!(status, 404);
        }
        other => panic!("expected unexpected response, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_wait_for_processing_complete_polls_until_terminal() {
    let polls = Arc::new(AtomicUsize::new(0));
    let backend = spawn_backend(polls.clone());
    let client = client_for(&backend, None);

    let outcome = client
        .wait_for_processing_complete("job-42", Duration::from_secs(10))
        .await
        .unwrap();

    assert_eq!(outcome.attempts, 3);
    assert_eq!(polls.load(Ordering::SeqCst), 3);
    assert!(outcome.elapsed >= Duration::from_millis(2000));
}

#[actix_web::test]
async fn test_mock_convert_through_client() {
    let backend = spawn_backend(Arc::new(AtomicUsize::new(0)));
    let mock = spawn_mock_server().await;
    let client = client_for(&backend, Some(&mock));

    let health = client.mock_health().await.unwrap();
    assert_eq!(health.status.as_u16(), 200);

    let response = client
        .mock_convert("sample.pdf", SAMPLE_PDF.to_vec(), &[("delay", "20")])
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 200);

    let result = BackendClient::conversion_result(&response).unwrap();
    assert_eq!(result.document.metadata.original_filename, "sample.pdf");
    assert_eq!(result.document.metadata.file_size, SAMPLE_PDF.len() as u64);
    assert_eq!(result.processing_time, 0.02);

    let failed = client
        .mock_convert("sample.pdf", SAMPLE_PDF.to_vec(), &[("simulate_error", "true")])
        .await
        .unwrap();
    assert_eq!(failed.status.as_u16(), 500);
    assert_processing_failed(&failed.body);
}
