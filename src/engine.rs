//! The preset engine: applies, saves and mutates presets and plays preset sequences.

use std::path::Path;

use crossbeam_channel::Sender;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    mutation::{self, MutationSource},
    Clock, EngineConfig, Easing, Error, Interpolator, ParameterGroup, ParameterValue, Preset,
    PresetEvent, PresetId, PresetStore, Result, Sequence, SequenceStep, Sequencer,
    SequencerState, SystemClock,
};

// -------------------------------------------------------------------------------------------------

/// Captures, persists and restores values of a set of host [`ParameterGroup`]s.
///
/// Restoring a preset never cuts to the new values: it starts an eased transition, which gets
/// advanced in [`Self::update`]. The engine also plays back [`Sequence`]s of presets, switching
/// to the next preset every `preset_duration` seconds, and mutates parameters with random
/// noise.
///
/// The engine is single threaded and does not run on its own: the host calls `update` once per
/// frame. All timing is evaluated against the engine's [`Clock`] in these calls.
///
/// Failing file operations are logged and leave the engine's state untouched. They are only
/// reported to the caller as boolean result.
///
/// ```rust,no_run
/// use presets::prelude::*;
///
/// let mut engine = PresetEngine::new(EngineConfig::default(), None);
/// engine.setup(vec![Box::new(
///     ParameterMap::new("circle")
///         .with_bounds("radius", 10.0_f32, 1.0, 100.0)
///         .with("fill", Color::rgb(255, 0, 0)),
/// )]);
/// engine.save_preset(1);
/// engine.load_sequence("1, ?, 2*").unwrap();
/// engine.play_sequence();
/// loop {
///     engine.update();
///     // draw the frame...
/// #   break;
/// }
/// ```
pub struct PresetEngine {
    config: EngineConfig,
    clock: Box<dyn Clock>,
    groups: Vec<Box<dyn ParameterGroup>>,
    store: PresetStore,
    interpolator: Interpolator,
    sequencer: Sequencer,
    sequence_text: String,
    current_preset: PresetId,
    rng: Xoshiro256PlusPlus,
    event_sender: Option<Sender<PresetEvent>>,
}

impl PresetEngine {
    /// Create a new engine, using the system clock.
    ///
    /// When an event sender is passed, the engine sends [`PresetEvent`]s to it.
    pub fn new<S: Into<Option<Sender<PresetEvent>>>>(config: EngineConfig, event_sender: S) -> Self {
        Self::with_clock(config, SystemClock::new(), event_sender)
    }

    /// Create a new engine with a custom clock.
    pub fn with_clock<C, S>(config: EngineConfig, clock: C, event_sender: S) -> Self
    where
        C: Clock + 'static,
        S: Into<Option<Sender<PresetEvent>>>,
    {
        let store = PresetStore::new(config.folder_path.clone());
        let interpolator = Interpolator::new(config.interpolation_duration, config.easing);
        let sequencer = Sequencer::new(config.preset_duration, config.interpolation_duration);
        let rng = match config.random_seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            clock: Box::new(clock),
            groups: Vec::new(),
            store,
            interpolator,
            sequencer,
            sequence_text: String::new(),
            current_preset: 0,
            rng,
            event_sender: event_sender.into(),
        }
    }

    /// The configuration the engine got created with. Durations, easing and folder path may
    /// have been changed since then: use the engine's getters to query the actual values.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register the parameter groups the engine operates on, replacing previously registered
    /// groups. Running transitions are stopped.
    pub fn setup(&mut self, groups: Vec<Box<dyn ParameterGroup>>) {
        for (index, group) in groups.iter().enumerate() {
            if groups[..index].iter().any(|g| g.name() == group.name()) {
                log::warn!(target: "Presets",
                    "Duplicate parameter group name '{}': only the first one is used",
                    group.name()
                );
            }
        }
        self.interpolator.stop();
        self.groups = groups;
        log::debug!(target: "Presets", "Registered {} parameter groups", self.groups.len());
    }

    /// All registered parameter groups.
    pub fn groups(&self) -> &[Box<dyn ParameterGroup>] {
        &self.groups
    }

    /// The registered parameter group with the given name.
    pub fn group(&self, name: &str) -> Option<&dyn ParameterGroup> {
        self.groups
            .iter()
            .find(|group| group.name() == name)
            .map(|group| group.as_ref())
    }

    /// Mutable access to the registered parameter group with the given name.
    ///
    /// Values which are part of a running transition get overwritten with the next update.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut (dyn ParameterGroup + 'static)> {
        self.groups
            .iter_mut()
            .find(|group| group.name() == name)
            .map(|group| group.as_mut())
    }

    /// Advance running transitions, then the sequencer. Call this once per frame.
    pub fn update(&mut self) {
        let now = self.clock.now();
        if self.interpolator.update(now, &mut self.groups) {
            log::debug!(target: "Presets", "Preset transition finished");
            self.notify(PresetEvent::TransitionFinished);
        }
        if let Some(step) = self.sequencer.update(now) {
            self.apply_step(step);
            self.notify(PresetEvent::PresetDurationElapsed);
        }
    }

    // ---------------------------------------------------------------------------------------------

    /// Start a transition towards the preset with the given id, using the current
    /// interpolation duration. Id `0` applies a random, existing preset.
    ///
    /// Returns false when the preset could not be loaded. Nothing changes in this case.
    pub fn apply_preset(&mut self, id: PresetId) -> bool {
        let id = if id == 0 { self.random_preset() } else { id };
        self.start_preset_transition(id, None)
    }

    /// Set a new interpolation duration, then apply the given preset like
    /// [`Self::apply_preset`].
    pub fn apply_preset_with_duration(&mut self, id: PresetId, duration: f64) -> bool {
        self.set_interpolation_duration(duration);
        self.apply_preset(id)
    }

    /// Apply a single sequence step: a preset, a random preset or a mutated preset.
    pub fn apply_step(&mut self, step: SequenceStep) -> bool {
        match step {
            SequenceStep::Preset(id) => self.apply_preset(id),
            SequenceStep::Random => {
                let id = self.random_preset();
                self.apply_preset(id)
            }
            SequenceStep::Mutate(id) => {
                self.mutate_from_preset(id, self.config.mutation_percentage)
            }
        }
    }

    /// Save the current values of all registered groups as preset with the given id,
    /// replacing an existing preset.
    ///
    /// Returns false when the preset could not be written.
    pub fn save_preset(&mut self, id: PresetId) -> bool {
        if id == 0 {
            log::warn!(target: "Presets", "Invalid preset id 0: preset ids start at 1");
            return false;
        }
        let preset = Preset::capture(
            self.groups
                .iter()
                .map(|group| group.as_ref() as &dyn ParameterGroup),
        );
        match self.store.save(id, &preset) {
            Ok(()) => true,
            Err(err) => {
                log::error!(target: "Presets", "Failed to save preset {}: {}", id, err);
                false
            }
        }
    }

    /// Delete the preset with the given id. Deleting a missing preset does nothing.
    pub fn delete_preset(&mut self, id: PresetId) {
        if let Err(err) = self.store.delete(id) {
            log::error!(target: "Presets", "Failed to delete preset {}: {}", id, err);
        }
    }

    /// Copy preset `from` to preset `to`, replacing `to`.
    ///
    /// Returns false when the source preset does not exist or copying failed.
    pub fn clone_preset(&mut self, from: PresetId, to: PresetId) -> bool {
        match self.store.clone_preset(from, to) {
            Ok(()) => true,
            Err(Error::NotFound(path)) => {
                log::warn!(target: "Presets",
                    "No preset file for source preset {}, looked for '{}'", from, path.display());
                false
            }
            Err(err) => {
                log::error!(target: "Presets",
                    "Failed to clone preset {} to {}: {}", from, to, err);
                false
            }
        }
    }

    /// true when a file for the given preset id exists.
    pub fn preset_exists(&self, id: PresetId) -> bool {
        self.store.exists(id)
    }

    // ---------------------------------------------------------------------------------------------

    /// Parse and load a new sequence text, see [`Sequence`] for the syntax. When a sequence is
    /// playing, the new sequence replaces it right away, starting at its first step.
    ///
    /// ### Errors
    /// Returns [`Error::Parse`] for malformed sequence texts. The previous sequence is kept
    /// in this case.
    pub fn load_sequence(&mut self, text: &str) -> Result<()> {
        let sequence = Sequence::parse(text)?;
        self.sequence_text = text.to_string();
        self.sequencer.load(sequence);
        Ok(())
    }

    /// The loaded sequence, as it got compiled from the sequence text.
    pub fn sequence(&self) -> &Sequence {
        self.sequencer.sequence()
    }

    /// The text of the loaded sequence.
    pub fn sequence_text(&self) -> &str {
        &self.sequence_text
    }

    /// Index of the sequence step which gets applied next.
    pub fn sequence_index(&self) -> usize {
        self.sequencer.index()
    }

    pub fn sequencer_state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// Start playing the loaded sequence with the current durations. The first step gets
    /// applied right away, the next one after the preset duration elapsed.
    pub fn play_sequence(&mut self) {
        let now = self.clock.now();
        if let Some(step) = self.sequencer.play(now) {
            self.apply_step(step);
        }
    }

    /// Set new preset and transition durations, then start playing the loaded sequence.
    pub fn play_sequence_with_durations(&mut self, preset_duration: f64, transition_duration: f64) {
        self.set_preset_duration(preset_duration);
        self.set_interpolation_duration(transition_duration);
        self.play_sequence();
    }

    /// Stop playing the sequence. A running transition continues.
    pub fn stop_sequence(&mut self) {
        self.sequencer.stop();
    }

    /// Stop the running transition. Parameters keep their current values.
    pub fn stop_interpolating(&mut self) {
        self.interpolator.stop();
    }

    /// Stop the running transition and the sequence.
    pub fn stop(&mut self) {
        self.stop_interpolating();
        self.stop_sequence();
    }

    pub fn is_playing_sequence(&self) -> bool {
        self.sequencer.is_playing()
    }

    /// true while the sequencer waits for the transition towards the last applied sequence
    /// preset to finish.
    pub fn is_transitioning(&self) -> bool {
        self.sequencer.is_transitioning()
    }

    // ---------------------------------------------------------------------------------------------

    /// Start a transition towards randomly perturbed current values, using the configured
    /// mutation percentage.
    pub fn mutate(&mut self) {
        self.mutate_with_percentage(self.config.mutation_percentage);
    }

    /// Start a transition towards randomly perturbed current values. `percentage` is the
    /// mutation amount as fraction of each parameter's value range.
    pub fn mutate_with_percentage(&mut self, percentage: f32) {
        log::info!(target: "Presets", "Mutating current values by {:.1}%", percentage * 100.0);
        let mut targets = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let values = mutation::mutate_group(&mut self.rng, group.as_ref(), percentage);
            targets.push((group.name().to_string(), values));
        }
        let now = self.clock.now();
        self.interpolator.start(now, &mut self.groups, targets);
    }

    /// Start a transition towards randomly perturbed values of the given preset.
    ///
    /// Returns false when the preset could not be loaded. Nothing changes in this case.
    pub fn mutate_from_preset(&mut self, id: PresetId, percentage: f32) -> bool {
        self.start_preset_transition(id, Some(percentage))
    }

    // ---------------------------------------------------------------------------------------------

    /// Id of the last successfully applied preset, or 0 when no preset got applied yet.
    /// Random steps report the picked preset, mutated steps the preset they started from.
    pub fn current_preset(&self) -> PresetId {
        self.current_preset
    }

    /// true while a transition is running.
    pub fn is_interpolating(&self) -> bool {
        self.interpolator.is_interpolating()
    }

    /// The folder preset files are read from and written to.
    pub fn folder_path(&self) -> &Path {
        self.store.folder()
    }

    /// Set a new preset folder, creating it if it does not exist.
    pub fn set_folder_path<P: AsRef<Path>>(&mut self, path: P) {
        if let Err(err) = self.store.set_folder(path.as_ref()) {
            log::error!(target: "Presets",
                "Failed to create preset folder '{}': {}", path.as_ref().display(), err);
        }
    }

    /// Easing curve of transitions.
    pub fn easing(&self) -> Easing {
        self.interpolator.easing()
    }
    /// Set a new easing curve. Also affects a running transition.
    pub fn set_easing_function<E: Into<Easing>>(&mut self, easing: E) {
        self.interpolator.set_easing(easing.into());
    }

    /// Seconds a sequence preset stays active.
    pub fn preset_duration(&self) -> f64 {
        self.sequencer.preset_duration()
    }
    pub fn set_preset_duration(&mut self, duration: f64) {
        self.sequencer.set_preset_duration(duration);
    }

    /// Seconds of transitions towards presets. Also the duration of the sequencer's
    /// transitioning phase.
    pub fn interpolation_duration(&self) -> f64 {
        self.interpolator.duration()
    }
    pub fn set_interpolation_duration(&mut self, duration: f64) {
        self.interpolator.set_duration(duration);
        self.sequencer.set_transition_duration(duration);
    }

    /// Mutation amount of [`Self::mutate`] and mutated sequence steps.
    pub fn mutation_percentage(&self) -> f32 {
        self.config.mutation_percentage
    }
    pub fn set_mutation_percentage(&mut self, percentage: f32) {
        self.config.mutation_percentage = percentage.max(0.0);
    }

    // ---------------------------------------------------------------------------------------------

    // Load a preset and start a transition towards its values, optionally mutated.
    fn start_preset_transition(&mut self, id: PresetId, mutation: Option<f32>) -> bool {
        let preset = match self.store.load(id) {
            Ok(preset) => preset,
            Err(Error::NotFound(path)) => {
                log::warn!(target: "Presets",
                    "No preset file for preset {}, looked for '{}'", id, path.display());
                return false;
            }
            Err(err) => {
                log::error!(target: "Presets", "Failed to load preset {}: {}", id, err);
                return false;
            }
        };
        match mutation {
            Some(percentage) => log::info!(target: "Presets",
                "Applying preset {} mutated by {:.1}%", id, percentage * 100.0),
            None => log::info!(target: "Presets", "Applying preset {}", id),
        }
        let mut targets: Vec<(String, Vec<(String, ParameterValue)>)> = Vec::new();
        for group in &self.groups {
            if !preset.has_group(group.name()) {
                continue;
            }
            let mut values = preset.values_for(group.as_ref());
            if let Some(percentage) = mutation {
                values = mutation::mutate_values(
                    &mut self.rng,
                    group.as_ref(),
                    values,
                    percentage,
                    MutationSource::Preset,
                );
            }
            targets.push((group.name().to_string(), values));
        }
        let now = self.clock.now();
        self.interpolator.start(now, &mut self.groups, targets);
        self.current_preset = id;
        self.notify(PresetEvent::PresetApplied(id));
        true
    }

    // Pick a random preset which has a file, falling back to preset 1.
    fn random_preset(&mut self) -> PresetId {
        let max = self.config.max_random_preset.max(1);
        let mut attempts = max.saturating_mul(max);
        let mut id = self.rng.random_range(1..=max);
        while !self.store.exists(id) {
            if attempts == 0 {
                log::error!(target: "Presets",
                    "Could not find an existing random preset, using preset 1");
                return 1;
            }
            attempts -= 1;
            id = self.rng.random_range(1..=max);
        }
        log::debug!(target: "Presets", "Picked random preset {}", id);
        id
    }

    fn notify(&self, event: PresetEvent) {
        if let Some(sender) = &self.event_sender {
            // ignore errors: the receiver may be gone
            let _ = sender.send(event);
        }
    }
}

impl std::fmt::Debug for PresetEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetEngine")
            .field("folder_path", &self.store.folder())
            .field("groups", &self.groups.len())
            .field("current_preset", &self.current_preset)
            .field("sequence", self.sequencer.sequence())
            .field("sequencer_state", &self.sequencer.state())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
