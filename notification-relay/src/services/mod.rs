pub mod formatter;
pub mod metrics;
pub mod providers;
pub mod validator;

pub use formatter::format_notification;
pub use metrics::{get_metrics, init_metrics, record_delivery, record_rejection};
pub use providers::{
    MockPushProvider, ProviderError, ProviderResponse, PushProvider, PushoverProvider,
};
pub use validator::{parse_body, parse_event, validate};
