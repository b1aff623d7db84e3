pub mod conversion;

pub use conversion::{
    CannedDocument, ContentClass, ConversionRequest, ConversionResult, ConvertParams,
    ConvertedDocument, DocumentMetadata, CANNED_PROCESSING_TIME_SECS, DOCUMENT_TEMPLATE,
    IMAGE_TEMPLATE,
};
