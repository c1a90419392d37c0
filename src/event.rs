//! Notifications sent by the [`PresetEngine`](crate::PresetEngine).

use std::fmt::Display;

use crate::PresetId;

// -------------------------------------------------------------------------------------------------

/// Engine notification, sent through the optional event sender of a
/// [`PresetEngine`](crate::PresetEngine).
///
/// Events are sent synchronously, in the order they occurred. Within a single engine update,
/// interpolation events are sent before sequencer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetEvent {
    /// A preset got loaded and its transition started. Carries the resolved preset id.
    PresetApplied(PresetId),
    /// The last running interpolation job finished.
    TransitionFinished,
    /// The sequencer's preset duration elapsed and the next sequence step got applied.
    PresetDurationElapsed,
    /// Reserved for sequences which play only once. Currently never sent, as sequences
    /// always loop.
    SequenceFinished,
}

impl Display for PresetEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PresetApplied(id) => write!(f, "preset {id} applied"),
            Self::TransitionFinished => write!(f, "transition finished"),
            Self::PresetDurationElapsed => write!(f, "preset duration elapsed"),
            Self::SequenceFinished => write!(f, "sequence finished"),
        }
    }
}

// -------------------------------------------------------------------------------------------------
