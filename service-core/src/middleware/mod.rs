pub mod cors;
pub mod metrics;
pub mod tracing;

pub use cors::{cors_middleware, CorsPolicy};
pub use metrics::metrics_middleware;
pub use self::tracing::{request_id_middleware, REQUEST_ID_HEADER};
