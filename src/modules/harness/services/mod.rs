pub mod backend_client;
pub mod scenario;

pub use backend_client::{
    ApiResponse, BackendClient, CreatedApiKey, CurrentUser, JobStatus, TERMINAL_STATUSES,
};
pub use scenario::Scenario;
