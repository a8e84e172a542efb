/// Lifecycle states of a [`crate::Resource`], in increasing order of readiness.
///
/// The derived ordering is meaningful: "at or beyond `ReadyForLayout`" is
/// `state >= ResourceState::ReadyForLayout`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceState {
    /// The item has not been built yet, or its build failed.
    NotBuilt,
    /// Built, but not measured since the last invalidation.
    NotLaidOut,
    /// Measured and waiting for the scheduler to start a layout.
    ReadyForLayout,
    /// A layout attempt is in flight.
    LayoutScheduled,
    LayoutComplete,
    /// The last layout attempt failed. Retryable.
    LayoutFailed,
}

impl ResourceState {
    pub fn is_built(self) -> bool {
        self != ResourceState::NotBuilt
    }

    /// Whether a layout has been scheduled or has settled.
    pub fn has_started_layout(self) -> bool {
        self >= ResourceState::LayoutScheduled
    }

    /// Neither complete nor failed.
    pub fn is_layout_pending(self) -> bool {
        !matches!(
            self,
            ResourceState::LayoutComplete | ResourceState::LayoutFailed
        )
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
