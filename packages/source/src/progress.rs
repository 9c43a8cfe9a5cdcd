//! Progress reporting for fetches.
//!
//! Defines a [`ProgressCallback`] trait that decouples fetch status
//! reporting from any specific rendering backend (an `indicatif` spinner in
//! the CLI, silence in tests and library use).

use std::sync::Arc;

/// Trait for reporting progress of an in-flight fetch.
///
/// Implementations must be `Send + Sync` so sources holding one stay
/// shareable across tasks.
pub trait ProgressCallback: Send + Sync {
    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);

    /// Mark progress as complete and remove the progress indicator.
    fn finish_and_clear(&self);
}

/// A no-op [`ProgressCallback`].
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
