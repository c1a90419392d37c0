//! Timed playback of a preset [`Sequence`].

use std::fmt::Display;

use crate::{time::SecondTime, Sequence, SequenceStep};

// -------------------------------------------------------------------------------------------------

/// Default time in seconds a sequence preset stays active before the next one gets applied.
pub const DEFAULT_PRESET_DURATION: f64 = 5.0;

// -------------------------------------------------------------------------------------------------

/// Playback phase of a [`Sequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SequencerState {
    /// Not playing.
    #[default]
    Stopped,
    /// Waiting for the preset duration to elapse before applying the next preset.
    Settling,
    /// Waiting for the transition towards the last applied preset to finish.
    Transitioning,
}

impl Display for SequencerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Stopped => "Stopped",
            Self::Settling => "Settling",
            Self::Transitioning => "Transitioning",
        })
    }
}

// -------------------------------------------------------------------------------------------------

/// Paces preset changes of a [`Sequence`].
///
/// The sequencer itself does not apply anything: [`Self::play`] and [`Self::update`] return
/// the step that is due, and the caller applies it. While playing, a new step is due every `preset_duration`
/// seconds, measured from the time the previous step got applied. The first
/// `transition_duration` seconds after each step are the transitioning phase.
///
/// Steps are played in order and playback wraps around to the first step after the last one.
#[derive(Debug, Clone)]
pub struct Sequencer {
    sequence: Sequence,
    index: usize,
    state: SequencerState,
    last_update_time: SecondTime,
    preset_duration: f64,
    transition_duration: f64,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(
            DEFAULT_PRESET_DURATION,
            crate::interpolation::DEFAULT_INTERPOLATION_DURATION,
        )
    }
}

impl Sequencer {
    /// Create a new, stopped sequencer with an empty sequence and the given durations in
    /// seconds.
    pub fn new(preset_duration: f64, transition_duration: f64) -> Self {
        Self {
            sequence: Sequence::default(),
            index: 0,
            state: SequencerState::Stopped,
            last_update_time: 0.0,
            preset_duration: preset_duration.max(0.0),
            transition_duration: transition_duration.max(0.0),
        }
    }

    /// The compiled sequence.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Index of the step which gets applied next.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state != SequencerState::Stopped
    }

    pub fn is_transitioning(&self) -> bool {
        self.state == SequencerState::Transitioning
    }

    /// Time in seconds a preset stays active.
    pub fn preset_duration(&self) -> f64 {
        self.preset_duration
    }
    pub fn set_preset_duration(&mut self, duration: f64) {
        self.preset_duration = duration.max(0.0);
    }

    /// Time in seconds of the transitioning phase.
    pub fn transition_duration(&self) -> f64 {
        self.transition_duration
    }
    pub fn set_transition_duration(&mut self, duration: f64) {
        self.transition_duration = duration.max(0.0);
    }

    /// Replace the sequence and rewind to its first step. When playing, the new sequence
    /// takes effect with the next due step. The current phase and its timing are kept.
    pub fn load(&mut self, sequence: Sequence) {
        log::info!(target: "Sequencer", "Sequence loaded: {}", sequence);
        self.sequence = sequence;
        self.index = 0;
    }

    /// Start playing from the first step. Returns the first step, which should be applied
    /// right away, or None when the sequence is empty. The sequencer stays stopped then.
    pub fn play(&mut self, now: SecondTime) -> Option<SequenceStep> {
        if self.sequence.is_empty() {
            log::warn!(target: "Sequencer", "No sequence to play");
            return None;
        }
        log::info!(target: "Sequencer",
            "Playing sequence with preset and transition durations: {:.2}s, {:.2}s",
            self.preset_duration,
            self.transition_duration
        );
        self.index = 0;
        self.take_step(now)
    }

    /// Stop playing and rewind to the first step.
    pub fn stop(&mut self) {
        if self.state != SequencerState::Stopped {
            log::debug!(target: "Sequencer", "Stopping sequence");
        }
        self.state = SequencerState::Stopped;
        self.index = 0;
    }

    /// Advance the sequencer's phases to the given time. Returns the step which should be
    /// applied now, if any.
    pub fn update(&mut self, now: SecondTime) -> Option<SequenceStep> {
        if self.state == SequencerState::Transitioning
            && now - self.last_update_time >= self.transition_duration
        {
            log::debug!(target: "Sequencer", "Transition phase finished");
            self.state = SequencerState::Settling;
        }
        if self.state == SequencerState::Settling
            && now - self.last_update_time >= self.preset_duration
        {
            return self.take_step(now);
        }
        None
    }

    // start the transitioning phase of the step at the current index
    fn take_step(&mut self, now: SecondTime) -> Option<SequenceStep> {
        let Some(step) = self.sequence.step(self.index) else {
            log::warn!(target: "Sequencer", "Sequence is empty, stopping");
            self.stop();
            return None;
        };
        log::debug!(target: "Sequencer", "Applying step #{}: {}", self.index, step);
        self.last_update_time = now;
        self.advance_index();
        self.state = SequencerState::Transitioning;
        Some(step)
    }

    // move to the next step, wrapping around at the end
    fn advance_index(&mut self) {
        self.index += 1;
        if self.index >= self.sequence.len() {
            self.index = 0;
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer(steps: Vec<i32>, preset_duration: f64, transition_duration: f64) -> Sequencer {
        let mut sequencer = Sequencer::new(preset_duration, transition_duration);
        sequencer.load(Sequence::from_steps(steps));
        sequencer
    }

    #[test]
    fn cycle() {
        let mut sequencer = sequencer(vec![1, 2, 3], 1.0, 0.5);
        // first step applies without waiting
        assert_eq!(sequencer.play(0.0), Some(SequenceStep::Preset(1)));
        assert!(sequencer.is_transitioning());
        assert_eq!(sequencer.index(), 1);

        assert_eq!(sequencer.update(0.0), None);
        assert_eq!(sequencer.update(0.25), None);
        assert!(sequencer.is_transitioning());
        assert_eq!(sequencer.update(0.5), None);
        assert_eq!(sequencer.state(), SequencerState::Settling);

        assert_eq!(sequencer.update(1.0), Some(SequenceStep::Preset(2)));
        assert!(sequencer.is_transitioning());
        assert_eq!(sequencer.update(1.5), None);
        assert!(!sequencer.is_transitioning());

        assert_eq!(sequencer.update(2.0), Some(SequenceStep::Preset(3)));
        // wraps around
        assert_eq!(sequencer.index(), 0);
        assert_eq!(sequencer.update(3.0), Some(SequenceStep::Preset(1)));
    }

    #[test]
    fn second_step_after_preset_duration() {
        let mut sequencer = sequencer(vec![1, 2, 3], 1.0, 0.5);
        assert_eq!(sequencer.play(0.0), Some(SequenceStep::Preset(1)));
        // no update in between: the first step must not be applied twice
        assert_eq!(sequencer.update(1.0), Some(SequenceStep::Preset(2)));
        assert_eq!(sequencer.index(), 2);
        assert!(sequencer.is_transitioning());
        assert_eq!(sequencer.update(1.5), None);
        assert!(!sequencer.is_transitioning());
    }

    #[test]
    fn transition_end_and_next_step_in_one_update() {
        let mut sequencer = sequencer(vec![1, 2], 1.0, 1.0);
        assert_eq!(sequencer.play(0.0), Some(SequenceStep::Preset(1)));
        assert_eq!(sequencer.update(1.0), Some(SequenceStep::Preset(2)));
        assert_eq!(sequencer.index(), 0);
    }

    #[test]
    fn sentinels() {
        let mut sequencer = sequencer(vec![0, -3], 1.0, 0.0);
        assert_eq!(sequencer.play(0.0), Some(SequenceStep::Random));
        assert_eq!(sequencer.update(1.0), Some(SequenceStep::Mutate(3)));
    }

    #[test]
    fn stop() {
        let mut sequencer = sequencer(vec![1, 2], 1.0, 0.5);
        sequencer.play(0.0);
        sequencer.stop();
        assert!(!sequencer.is_playing());
        assert_eq!(sequencer.index(), 0);
        assert_eq!(sequencer.update(10.0), None);
        // stopping twice changes nothing
        sequencer.stop();
        assert_eq!(sequencer.state(), SequencerState::Stopped);
    }

    #[test]
    fn empty_sequence() {
        let mut sequencer = Sequencer::default();
        assert_eq!(sequencer.play(0.0), None);
        assert!(!sequencer.is_playing());
        assert_eq!(sequencer.update(10.0), None);
    }

    #[test]
    fn load_while_playing() {
        let mut sequencer = sequencer(vec![1, 2, 3], 1.0, 0.5);
        sequencer.play(0.0);
        sequencer.update(1.0);
        assert_eq!(sequencer.index(), 2);
        sequencer.load(Sequence::from_steps(vec![7, 8]));
        assert_eq!(sequencer.index(), 0);
        assert!(sequencer.is_transitioning());
        assert_eq!(sequencer.update(2.0), Some(SequenceStep::Preset(7)));
    }
}
