//! Change tracking across one rewrite run.

/// Accumulates whether any entry of a run was changed.
///
/// Starts out `false` and latches on the first change; it is never reset
/// during a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeTracker {
    changed: bool,
}

impl ChangeTracker {
    /// Creates a tracker with no recorded changes.
    #[must_use]
    pub const fn new() -> Self {
        Self { changed: false }
    }

    /// Records the outcome of one entry.
    pub fn record(&mut self, changed: bool) {
        self.changed |= changed;
    }

    /// Returns `true` if at least one recorded entry changed.
    #[must_use]
    pub const fn any_changed(&self) -> bool {
        self.changed
    }
}
