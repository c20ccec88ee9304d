use std::fmt;

/// Lifecycle state of the processor.
///
/// `Stopped -> Started -> Active -> Stopped`. Authentication and
/// authorization are served between `start` and `stop`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessorState {
    Stopped,
    Started,
    /// The surrounding node is up and the cluster is active.
    Active,
}

impl ProcessorState {
    #[must_use]
    pub fn is_serving(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "stopped",
            Self::Started => "started",
            Self::Active => "active",
        })
    }
}
