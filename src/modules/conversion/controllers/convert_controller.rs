use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpRequest, HttpResponse};

use crate::core::error::AppError;
use crate::modules::conversion::models::ConvertParams;
use crate::modules::conversion::services::ConversionService;

/// Convert an uploaded document
/// POST /v1/convert/file?delay=<ms>&simulate_error=<bool>
///
/// Lifecycle per request: validate (400 `no_file` without delay), then wait
/// the simulated delay, then answer with the canned result or the injected
/// failure.
pub async fn convert_file(
    req: HttpRequest,
    payload: Multipart,
    service: web::Data<ConversionService>,
) -> Result<HttpResponse, AppError> {
    let received = service.counters().record_received();
    tracing::info!(request_number = received, "Received file conversion request");

    // Malformed query strings fall back to defaults rather than failing the call
    let params = web::Query::<ConvertParams>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    if !is_multipart(&req) {
        return Err(AppError::no_file());
    }

    let upload = service
        .receive_upload(payload)
        .await?
        .ok_or_else(AppError::no_file)?;

    tracing::info!(
        filename = %upload.original_filename,
        size = upload.size,
        "File details"
    );

    let request = service.prepare(&upload, &params);
    let result = service.process(&request).await?;

    // Temp file is released only once the response is ready
    drop(upload);

    Ok(HttpResponse::Ok().json(result))
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Configure conversion routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/v1/convert").route("/file", web::post().to(convert_file)));
}
