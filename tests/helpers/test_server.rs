// Test Server Helpers
//
// Spawns the real mock conversion service on a random port using actix-test.

use actix_cors::Cors;
use actix_web::{web, App};
use docproc_harness::config::ServerConfig;
use docproc_harness::conversion::ConversionService;
use docproc_harness::middleware::FaultBarrier;
use tracing_actix_web::TracingLogger;

pub use actix_test::TestServer;

/// Server config suited to tests: short default delay, private upload dir
pub fn test_server_config() -> ServerConfig {
    let mut config = ServerConfig::new("127.0.0.1".to_string(), 0);
    config.default_delay_ms = 50;
    config.upload_dir = std::env::temp_dir().join(format!(
        "docproc-harness-uploads-{}",
        uuid::Uuid::new_v4().simple()
    ));
    config
}

/// Spawn the mock conversion service with the same middleware stack as the binary
///
/// # Example
/// ```no_run
/// #[actix_web::test]
/// async fn test_health_endpoint() {
///     let srv = spawn_mock_server().await;
///     let response = srv.get("/health").send().await.unwrap();
///     assert_eq!(response.status(), 200);
/// }
/// ```
pub async fn spawn_mock_server() -> TestServer {
    spawn_mock_server_with(test_server_config()).await
}

/// Spawn the mock conversion service with a custom configuration
pub async fn spawn_mock_server_with(config: ServerConfig) -> TestServer {
    let service = ConversionService::new(&config);

    actix_test::start(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .wrap(FaultBarrier)
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .configure(docproc_harness::configure)
    })
}
