pub mod error;

pub use error::{internal_error_response, AppError, Result};
