//! Notification orchestration services.

mod dispatcher;

pub use dispatcher::{
    DEFAULT_SEND_TIMEOUT, DispatchFailure, DispatchOutcome, NotificationDispatcher,
    NotificationSettings,
};
