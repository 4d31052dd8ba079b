//! Port contracts for notification transports.

mod notifier;

pub use notifier::{Notifier, NotifierError, NotifierResult};
