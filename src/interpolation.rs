//! Eased, time based transitions of parameter groups towards target values.

use std::collections::HashMap;

use crate::{time::SecondTime, Easing, ParameterGroup, ParameterValue};

// -------------------------------------------------------------------------------------------------

/// Default transition duration in seconds.
pub const DEFAULT_INTERPOLATION_DURATION: f64 = 3.0;

// -------------------------------------------------------------------------------------------------

/// A running transition of a single parameter group.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationJob {
    start_time: SecondTime,
    targets: Vec<(String, ParameterValue)>,
}

impl InterpolationJob {
    /// Time the transition started.
    pub fn start_time(&self) -> SecondTime {
        self.start_time
    }

    /// Target values of the transition.
    pub fn targets(&self) -> &[(String, ParameterValue)] {
        &self.targets
    }
}

// -------------------------------------------------------------------------------------------------

/// Tweens parameter groups from their values at the time a transition got started towards
/// target values, with at most one running [`InterpolationJob`] per group.
///
/// Transitions don't queue or compose: starting a new one discards all running jobs and
/// captures the current values of all groups as new origins.
#[derive(Debug, Clone)]
pub struct Interpolator {
    jobs: HashMap<String, InterpolationJob>,
    origins: HashMap<String, HashMap<String, ParameterValue>>,
    duration: f64,
    easing: Easing,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPOLATION_DURATION, Easing::default())
    }
}

impl Interpolator {
    /// Create a new idle interpolator with the given duration in seconds and easing curve.
    pub fn new(duration: f64, easing: Easing) -> Self {
        Self {
            jobs: HashMap::new(),
            origins: HashMap::new(),
            duration: duration.max(0.0),
            easing,
        }
    }

    /// Transition duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }
    /// Set a new transition duration in seconds. Also affects running jobs.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// true while there are running jobs.
    pub fn is_interpolating(&self) -> bool {
        !self.jobs.is_empty()
    }

    /// The running job of the given group, if any.
    pub fn job(&self, group_name: &str) -> Option<&InterpolationJob> {
        self.jobs.get(group_name)
    }

    /// Discard all running jobs. Parameters keep their current, partially applied values.
    pub fn stop(&mut self) {
        if !self.jobs.is_empty() {
            log::debug!(target: "Interpolator", "Stopping {} running jobs", self.jobs.len());
        }
        self.jobs.clear();
    }

    /// Start a new transition at the given time.
    ///
    /// Discards running jobs, captures the current values of all `groups` as origins, then
    /// creates one job per entry in `targets`, which maps group names to the group's target
    /// values. Boolean targets can't be tweened and are applied immediately.
    pub fn start<T>(
        &mut self,
        now: SecondTime,
        groups: &mut [Box<dyn ParameterGroup>],
        targets: T,
    ) where
        T: IntoIterator<Item = (String, Vec<(String, ParameterValue)>)>,
    {
        self.jobs.clear();
        self.capture_origins(groups);
        for (group_name, values) in targets {
            let Some(group) = groups.iter_mut().find(|g| g.name() == group_name) else {
                log::warn!(target: "Interpolator", "Unknown parameter group '{}'", group_name);
                continue;
            };
            let mut job_targets = Vec::with_capacity(values.len());
            for (key, value) in values {
                if let ParameterValue::Bool(_) = value {
                    if let Err(err) = group.set_value(&key, value) {
                        log::warn!(target: "Interpolator",
                            "Failed to apply '{}.{}': {}", group_name, key, err);
                    }
                } else {
                    job_targets.push((key, value));
                }
            }
            self.jobs.insert(
                group_name,
                InterpolationJob {
                    start_time: now,
                    targets: job_targets,
                },
            );
        }
        log::debug!(target: "Interpolator",
            "Started {} jobs with a duration of {:.2}s", self.jobs.len(), self.duration);
    }

    /// Advance all running jobs to the given time, writing interpolated values to `groups`.
    ///
    /// Jobs which reached their end apply their exact target values and are removed. Returns
    /// true when the last running job finished with this call.
    pub fn update(&mut self, now: SecondTime, groups: &mut [Box<dyn ParameterGroup>]) -> bool {
        if self.jobs.is_empty() {
            return false;
        }
        let mut finished_jobs = Vec::new();
        for (group_name, job) in &self.jobs {
            let t = if self.duration > 0.0 {
                ((now - job.start_time) / self.duration).clamp(0.0, 1.0) as f32
            } else {
                1.0
            };
            let Some(group) = groups.iter_mut().find(|g| g.name() == group_name) else {
                finished_jobs.push(group_name.clone());
                continue;
            };
            let origins = self.origins.get(group_name);
            for (key, target) in &job.targets {
                let value = if t >= 1.0 {
                    *target
                } else {
                    match origins.and_then(|origins| origins.get(key)) {
                        Some(origin) => Self::blend(origin, target, self.easing.ease(t)),
                        None => continue,
                    }
                };
                if let Err(err) = group.set_value(key, value) {
                    log::warn!(target: "Interpolator",
                        "Failed to apply '{}.{}': {}", group_name, key, err);
                }
            }
            if t >= 1.0 {
                finished_jobs.push(group_name.clone());
            }
        }
        for group_name in finished_jobs {
            self.jobs.remove(&group_name);
        }
        if self.jobs.is_empty() {
            log::debug!(target: "Interpolator", "Transition finished");
            true
        } else {
            false
        }
    }

    // snapshot current values of all groups
    fn capture_origins(&mut self, groups: &[Box<dyn ParameterGroup>]) {
        self.origins.clear();
        for group in groups {
            let values = group
                .keys()
                .into_iter()
                .filter_map(|key| group.value(&key).map(|value| (key, value)))
                .collect();
            self.origins.insert(group.name().to_string(), values);
        }
    }

    // blend from origin to target with the given eased progress
    fn blend(origin: &ParameterValue, target: &ParameterValue, progress: f32) -> ParameterValue {
        match (origin, target) {
            (ParameterValue::Int(from), ParameterValue::Int(to)) => {
                let from = *from as f32;
                ParameterValue::Int((from + (*to as f32 - from) * progress) as i32)
            }
            (ParameterValue::Float(from), ParameterValue::Float(to)) => {
                ParameterValue::Float(from + (to - from) * progress)
            }
            (ParameterValue::Color(from), ParameterValue::Color(to)) => {
                ParameterValue::Color(from.lerp(to, progress))
            }
            _ => *target,
        }
    }
}

// -------------------------------------------------------------------------------------------------
