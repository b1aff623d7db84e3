use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Processing time reported when the caller does not override the delay
pub const CANNED_PROCESSING_TIME_SECS: f64 = 1.5;

/// Content class derived from the uploaded file's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentClass {
    Pdf,
    Image,
    Other,
}

impl ContentClass {
    /// Classify by lower-cased extension; unknown extensions are `Other`
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") | Some("jpg") | Some("jpeg") => ContentClass::Image,
            Some("pdf") => ContentClass::Pdf,
            _ => ContentClass::Other,
        }
    }

    /// Label exposed as `metadata.file_type`; only images differ from the pdf default
    pub fn file_type(&self) -> &'static str {
        match self {
            ContentClass::Image => "image",
            ContentClass::Pdf | ContentClass::Other => "pdf",
        }
    }

    pub fn template(&self) -> &'static CannedDocument {
        match self {
            ContentClass::Image => &IMAGE_TEMPLATE,
            ContentClass::Pdf | ContentClass::Other => &DOCUMENT_TEMPLATE,
        }
    }
}

/// Immutable canned extraction output
#[derive(Debug, PartialEq)]
pub struct CannedDocument {
    pub text: &'static str,
    pub pages: u32,
    pub words: u32,
    pub characters: u32,
    pub ocr_confidence: Option<f64>,
}

pub static DOCUMENT_TEMPLATE: CannedDocument = CannedDocument {
    text: "This is extracted text from the test document. It contains multiple paragraphs \
           and demonstrates the text extraction capabilities of the Docling API.",
    pages: 2,
    words: 25,
    characters: 150,
    ocr_confidence: None,
};

pub static IMAGE_TEMPLATE: CannedDocument = CannedDocument {
    text: "This is text extracted from an image using OCR technology. The image contained \
           readable text that has been successfully processed.",
    pages: 2,
    words: 25,
    characters: 150,
    ocr_confidence: Some(0.95),
};

/// One upload, alive for the duration of a single HTTP call
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub original_filename: String,
    pub file_size: u64,
    pub content_class: ContentClass,
    pub delay: Duration,
    /// Whether `delay` came from the caller rather than the default
    pub delay_overridden: bool,
    pub simulate_error: bool,
}

impl ConversionRequest {
    /// Seconds reported back as `processing_time`
    pub fn processing_time_secs(&self) -> f64 {
        if self.delay_overridden {
            self.delay.as_secs_f64()
        } else {
            CANNED_PROCESSING_TIME_SECS
        }
    }
}

/// Raw query parameters of `POST /v1/convert/file`
#[derive(Debug, Default, Deserialize)]
pub struct ConvertParams {
    pub delay: Option<String>,
    pub simulate_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub pages: u32,
    pub words: u32,
    pub characters: u32,
    pub file_type: String,
    pub processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_confidence: Option<f64>,
    pub original_filename: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Success body of `POST /v1/convert/file`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub document: ConvertedDocument,
    pub status: String,
    pub processing_time: f64,
}
