use crate::config::ServerConfig;
use crate::core::{AppError, Result};
use crate::modules::conversion::models::{
    ContentClass, ConversionRequest, ConversionResult, ConvertParams, ConvertedDocument,
    DocumentMetadata,
};
use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Multipart field that carries the document
pub const UPLOAD_FIELD: &str = "file";

/// Process-wide counters, read only by log lines
#[derive(Debug, Default)]
pub struct ConversionCounters {
    received: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl ConversionCounters {
    pub fn record_received(&self) -> u64 {
        self.received.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_success(&self) -> u64 {
        self.succeeded.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_failure(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn snapshot(&self) -> (u64, u64, u64) {
        (
            self.received.load(Ordering::Relaxed),
            self.succeeded.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

/// Uploaded file parked on disk for the lifetime of one request
///
/// The backing file is removed when this value drops.
#[derive(Debug)]
pub struct StoredUpload {
    pub original_filename: String,
    pub size: u64,
    pub file: NamedTempFile,
}

/// Stand-in for the external conversion API
///
/// Holds no per-request state: every outcome is computed from the request's
/// own parameters and file.
#[derive(Clone)]
pub struct ConversionService {
    default_delay: Duration,
    max_upload_bytes: usize,
    upload_dir: PathBuf,
    counters: Arc<ConversionCounters>,
}

impl ConversionService {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            default_delay: Duration::from_millis(config.default_delay_ms),
            max_upload_bytes: config.max_upload_bytes,
            upload_dir: config.upload_dir.clone(),
            counters: Arc::new(ConversionCounters::default()),
        }
    }

    pub fn counters(&self) -> &ConversionCounters {
        &self.counters
    }

    /// Drain the multipart body, spooling the `file` part to disk
    ///
    /// Returns `Ok(None)` when no file part is present. A second file part, a
    /// file part under another field name, or an oversized file is a fault.
    pub async fn receive_upload(&self, mut payload: Multipart) -> Result<Option<StoredUpload>> {
        let mut upload: Option<StoredUpload> = None;

        while let Some(field) = payload
            .try_next()
            .await
            .map_err(|e| AppError::internal(format!("Malformed multipart body: {}", e)))?
        {
            let field_name = field.name().unwrap_or_default().to_string();
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            match filename {
                None => drain_field(field).await?,
                Some(filename) if field_name == UPLOAD_FIELD && upload.is_none() => {
                    upload = Some(self.spool_field(field, filename).await?);
                }
                Some(_) => {
                    return Err(AppError::internal(format!(
                        "Unexpected file field '{}'",
                        field_name
                    )));
                }
            }
        }

        Ok(upload)
    }

    async fn spool_field(&self, mut field: Field, original_filename: String) -> Result<StoredUpload> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let dir = self.upload_dir.clone();
        let file = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new().prefix("upload-").tempfile_in(dir)
        })
        .await
        .map_err(|e| AppError::internal(format!("Upload spool task failed: {}", e)))??;
        let mut writer = tokio::fs::File::from_std(file.as_file().try_clone()?);
        let mut size: usize = 0;

        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::internal(format!("Failed to read upload: {}", e)))?
        {
            size += chunk.len();
            if size > self.max_upload_bytes {
                return Err(AppError::internal(format!(
                    "File too large: exceeds {} bytes",
                    self.max_upload_bytes
                )));
            }
            writer.write_all(&chunk).await?;
        }
        writer.flush().await?;

        Ok(StoredUpload {
            original_filename,
            size: size as u64,
            file,
        })
    }

    /// Combine an upload with its query parameters
    pub fn prepare(&self, upload: &StoredUpload, params: &ConvertParams) -> ConversionRequest {
        let (delay, delay_overridden) = parse_delay(params.delay.as_deref(), self.default_delay);

        ConversionRequest {
            original_filename: upload.original_filename.clone(),
            file_size: upload.size,
            content_class: ContentClass::from_filename(&upload.original_filename),
            delay,
            delay_overridden,
            simulate_error: parse_flag(params.simulate_error.as_deref()),
        }
    }

    /// Wait out the simulated latency, then produce the outcome
    pub async fn process(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        debug!(
            filename = %request.original_filename,
            delay_ms = request.delay.as_millis() as u64,
            "Simulating processing delay"
        );
        tokio::time::sleep(request.delay).await;

        if request.simulate_error {
            let failed = self.counters.record_failure();
            warn!(
                filename = %request.original_filename,
                failed_total = failed,
                "Simulating processing error"
            );
            return Err(AppError::injected_failure());
        }

        let result = build_result(request);
        let succeeded = self.counters.record_success();
        info!(
            filename = %request.original_filename,
            file_type = %result.document.metadata.file_type,
            succeeded_total = succeeded,
            "Returning successful processing response"
        );

        Ok(result)
    }
}

async fn drain_field(mut field: Field) -> Result<()> {
    while field
        .try_next()
        .await
        .map_err(|e| AppError::internal(format!("Failed to read form field: {}", e)))?
        .is_some()
    {}
    Ok(())
}

/// Build a fresh response value from the immutable template for the request's class
pub fn build_result(request: &ConversionRequest) -> ConversionResult {
    let template = request.content_class.template();
    let processing_time = request.processing_time_secs();

    ConversionResult {
        document: ConvertedDocument {
            text: template.text.to_string(),
            metadata: DocumentMetadata {
                pages: template.pages,
                words: template.words,
                characters: template.characters,
                file_type: request.content_class.file_type().to_string(),
                processing_time,
                ocr_confidence: template.ocr_confidence,
                original_filename: request.original_filename.clone(),
                file_size: request.file_size,
            },
        },
        status: "success".to_string(),
        processing_time,
    }
}

/// Parse the `delay` query value the way a lenient integer prefix parser would
///
/// Returns the delay and whether it overrides the default. Absent, non-numeric
/// or zero values fall back to `default`; negative values mean no delay.
pub fn parse_delay(raw: Option<&str>, default: Duration) -> (Duration, bool) {
    match raw.and_then(leading_integer) {
        None | Some(0) => (default, false),
        Some(ms) if ms < 0 => (Duration::ZERO, true),
        Some(ms) => (Duration::from_millis(ms as u64), true),
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate rather than reject absurdly long digit runs
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

/// `true` or `1`, case-insensitive
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("1")
    )
}
