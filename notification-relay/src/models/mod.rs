pub mod event;
pub mod notification;

pub use event::{IncomingEvent, ValidatedEvent, ValidationPolicy};
pub use notification::{
    Notification, OutboundNotification, CUSTOM_MESSAGE_TITLE, FRISBEE_COLLECTION_TITLE,
};
