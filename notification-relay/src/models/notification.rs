use serde::Serialize;

pub const CUSTOM_MESSAGE_TITLE: &str = "Custom Message";
pub const FRISBEE_COLLECTION_TITLE: &str = "Frisbee Collection Alert";

/// Human-readable content of a push notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Form body posted to the push provider. Credentials come from
/// configuration, never from the inbound request.
#[derive(Debug, Serialize)]
pub struct OutboundNotification<'a> {
    pub token: &'a str,
    pub user: &'a str,
    pub message: &'a str,
    pub title: &'a str,
}
