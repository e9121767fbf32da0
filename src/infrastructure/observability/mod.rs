mod init_tracing;
mod log_preview;
mod request_id;
mod tracing_config;

pub use init_tracing::{DEFAULT_FILTER, filter_directives, init_tracing};
pub use log_preview::log_preview;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use tracing_config::TracingConfig;
