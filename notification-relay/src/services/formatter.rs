use crate::models::{
    Notification, ValidatedEvent, CUSTOM_MESSAGE_TITLE, FRISBEE_COLLECTION_TITLE,
};

/// Turn a validated event into notification text.
pub fn format_notification(event: &ValidatedEvent) -> Notification {
    match event {
        ValidatedEvent::Custom { message } => Notification {
            title: CUSTOM_MESSAGE_TITLE.to_string(),
            message: message.clone(),
        },
        ValidatedEvent::FrisbeeCollected { fris, team } => Notification {
            title: FRISBEE_COLLECTION_TITLE.to_string(),
            message: format!(
                "Hello Lad. Frisbee {} has been collected by the {} team.",
                fris, team
            ),
        },
    }
}
