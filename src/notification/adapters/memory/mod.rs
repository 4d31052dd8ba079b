//! In-memory notifier for tests and local tooling.

mod recording;

pub use recording::RecordingNotifier;
