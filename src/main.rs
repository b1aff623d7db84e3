use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use docproc_harness::config::Config;
use docproc_harness::conversion::ConversionService;
use docproc_harness::middleware::FaultBarrier;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration first so LOG_LEVEL from .env applies
    let config = Config::from_env().map_err(std::io::Error::other)?;

    // Initialize tracing; RUST_LOG overrides LOG_LEVEL
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("docproc_harness={},actix_web=info", config.app.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().map_err(std::io::Error::other)?;

    std::fs::create_dir_all(&config.server.upload_dir)?;

    tracing::info!("Starting mock conversion service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Upload directory: {}", config.server.upload_dir.display());

    let service = ConversionService::new(&config.server);
    let bind_address = config.server.bind_address();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .wrap(FaultBarrier)
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .configure(docproc_harness::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Mock conversion server running on {}", bind_address);
    tracing::info!("Health check: http://{}/health", bind_address);
    tracing::info!("Convert endpoint: http://{}/v1/convert/file", bind_address);

    server.await
}
