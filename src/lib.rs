//! Persisted parameter presets with eased transitions, mutations and timed preset sequences.
//!
//! A host exposes its controllable values as named [`ParameterGroup`]s. The [`PresetEngine`]
//! snapshots them into JSON preset files, restores them later with a smooth, eased transition,
//! perturbs them with bounded random noise and auto-advances through a [`Sequence`] of presets.
//!
//! The engine runs on the host's thread: call [`PresetEngine::update`] once per frame.
//!
//! ### Sequences
//!
//! Sequences are typed as short texts, such as `"1, 2, 3-6, ?, 4*"`: see [`Sequence`] for the
//! syntax.

// -------------------------------------------------------------------------------------------------

pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod event;
pub mod interpolation;
pub mod mutation;
pub mod parameter;
pub mod preset;
pub mod sequence;
pub mod sequencer;
pub mod store;
pub mod time;
pub mod value;

// -------------------------------------------------------------------------------------------------

pub use config::EngineConfig;
pub use easing::Easing;
pub use engine::PresetEngine;
pub use error::{Error, Result};
pub use event::PresetEvent;
pub use interpolation::{InterpolationJob, Interpolator};
pub use mutation::MutationSource;
pub use parameter::{ParameterBounds, ParameterGroup, ParameterMap};
pub use preset::{Preset, PresetId};
pub use sequence::{Sequence, SequenceStep};
pub use sequencer::{Sequencer, SequencerState};
pub use store::PresetStore;
pub use time::{Clock, ManualClock, SecondTime, SystemClock};
pub use value::{Color, ParameterType, ParameterValue};

// -------------------------------------------------------------------------------------------------

pub mod prelude {
    pub use super::{
        Clock, Color, Easing, EngineConfig, ManualClock, ParameterBounds, ParameterGroup,
        ParameterMap, ParameterType, ParameterValue, Preset, PresetEngine, PresetEvent, PresetId,
        PresetStore, SecondTime, Sequence, SequenceStep, Sequencer, SequencerState, SystemClock,
    };
}
