//! Notification domain types and templates.

mod error;
mod kind;
mod message;
mod template;

pub use error::NotificationTemplateError;
pub use kind::NotificationKind;
pub use message::{OutboundMessage, collect_recipients};
pub use template::{RenderedNotification, render};
