pub mod conversion_service;

pub use conversion_service::{
    build_result, parse_delay, parse_flag, ConversionCounters, ConversionService, StoredUpload,
    UPLOAD_FIELD,
};
