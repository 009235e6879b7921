//! Input zones.
//!
//! A zone is one button + one directory of candidate tracks. The toy has
//! exactly two: the left and right paw. Static configuration — nothing
//! here changes at runtime.

/// One of the two physical input channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Zone {
    /// Left paw button and the `left/` track directory.
    Left,
    /// Right paw button and the `right/` track directory.
    Right,
}

impl Zone {
    /// Track directory for this zone, relative to the card root.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Human-readable name for log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}
