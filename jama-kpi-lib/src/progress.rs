/// A trait for reporting progress of long-running operations.
pub trait Progress: Send + Sync {
    /// Set the phase label for the current operation (e.g., "Fetching", "Resolving").
    fn set_phase(&self, phase: &str);

    /// Report that `current` out of `total` units of work are complete.
    fn set_position(&self, current: u64, total: u64, message: &str);

    /// Finish and clear the progress indicator.
    fn done(&self);
}

/// A [`Progress`] that shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_phase(&self, _phase: &str) {}
    fn set_position(&self, _current: u64, _total: u64, _message: &str) {}
    fn done(&self) {}
}
