//! Per-identity burden profiles.
//!
//! A [`Profile`] aggregates measurements for *tasks*, keyed by a stable
//! string identity.  Each task has a fixed number of options; each option
//! carries an [`Estimate`] (lifetime + recent accumulators).  Profiles are
//! plain owned data: copyable, clearable, and mergeable, so a controller can
//! keep one for the current run and one loaded from a prior run.
//!
//! Identity keys must be stable across runs and must not be shared by
//! settings with different cost distributions; the key *is* the join
//! between runs.

use std::collections::BTreeMap;

use crate::stats::Estimate;

/// One observed burden for one option of one task.
///
/// Measured burdens are expected to be non-negative; the controller clamps
/// negatives to zero before they reach a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// The observed cost.
    pub burden: f64,
    /// Which option was active when the cost was observed.
    pub choice: usize,
}

/// Aggregated burden statistics for one identity.
///
/// The option count is fixed when the task is created; every later access
/// with a different count is a contract violation and panics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    data_count: usize,
    fully_explored: bool,
    estimates: Vec<Estimate>,
}

impl Task {
    fn new(option_count: usize) -> Self {
        assert!(option_count > 0, "a task needs at least one option");
        Self {
            data_count: 0,
            fully_explored: false,
            estimates: vec![Estimate::default(); option_count],
        }
    }

    /// Number of options this task was created with.
    pub fn option_count(&self) -> usize {
        self.estimates.len()
    }

    /// Total measurements collected into this task this run.
    pub fn data_count(&self) -> usize {
        self.data_count
    }

    /// Per-option estimates, in option order.
    pub fn estimates(&self) -> &[Estimate] {
        &self.estimates
    }

    /// Estimate for one option.
    pub fn estimate(&self, option: usize) -> &Estimate {
        &self.estimates[option]
    }

    /// Whether every option has met its measurement quota.  Maintained by
    /// the controller; once set it is never cleared.
    pub fn fully_explored(&self) -> bool {
        self.fully_explored
    }

    pub(crate) fn mark_fully_explored(&mut self) {
        self.fully_explored = true;
    }

    /// Assemble a task from per-option `full` accumulators (snapshot
    /// restore path).
    pub(crate) fn from_full_stats(stats: Vec<crate::stats::BurdenStat>) -> Self {
        assert!(!stats.is_empty(), "a task needs at least one option");
        Self {
            data_count: 0,
            fully_explored: false,
            estimates: stats
                .into_iter()
                .map(|full| Estimate {
                    full,
                    recent: Default::default(),
                })
                .collect(),
        }
    }
}

/// The set of tasks known for one run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    tasks: BTreeMap<String, Task>,
}

impl Profile {
    /// An empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no task has been recorded.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of known tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Drop all tasks.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Profile data for an identity, if any has been recorded.
    pub fn find(&self, identity: &str) -> Option<&Task> {
        self.tasks.get(identity)
    }

    pub(crate) fn find_mut(&mut self, identity: &str) -> Option<&mut Task> {
        self.tasks.get_mut(identity)
    }

    /// Iterate tasks in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Task)> {
        self.tasks.iter().map(|(id, task)| (id.as_str(), task))
    }

    fn task_init(&mut self, identity: &str, option_count: usize) -> &mut Task {
        let task = self
            .tasks
            .entry(identity.to_string())
            .or_insert_with(|| Task::new(option_count));
        assert_eq!(
            task.option_count(),
            option_count,
            "option count changed for task `{identity}`"
        );
        task
    }

    /// Record one measurement, creating the task on first use.
    ///
    /// The burden lands in both the `full` and `recent` accumulator of the
    /// measured option.
    pub fn collect(
        &mut self,
        identity: &str,
        option_count: usize,
        measurement: &Measurement,
    ) -> &Task {
        assert!(
            measurement.choice < option_count,
            "measurement for task `{identity}` names option {} of {option_count}",
            measurement.choice
        );
        let task = self.task_init(identity, option_count);
        task.data_count += 1;
        let estimate = &mut task.estimates[measurement.choice];
        estimate.full.push(measurement.burden);
        estimate.recent.push(measurement.burden);
        task
    }

    /// Merge another run's `full` statistics into this profile, scaling the
    /// foreign mean linearly and variance quadratically by `scale_factor`.
    pub fn assimilate(&mut self, identity: &str, foreign: &Task, scale_factor: f64) -> &Task {
        let task = self.task_init(identity, foreign.option_count());
        for (est, foreign_est) in task.estimates.iter_mut().zip(foreign.estimates.iter()) {
            let scaled = foreign_est.full.scaled(scale_factor);
            est.full = est.full.pool(&scaled);
        }
        task
    }

    /// Assimilate every task of another profile; see [`Profile::assimilate`].
    pub fn assimilate_all(&mut self, other: &Profile, scale_factor: f64) {
        for (identity, task) in other.iter() {
            self.assimilate(identity, task, scale_factor);
        }
    }

    /// Apply exponential decay to every option's `recent` accumulator.
    ///
    /// Called once per cycle before harvesting, so `recent` approximates a
    /// moving window of `≈ 1/(1−alpha)` samples.
    pub fn decay_recent(&mut self, alpha: f64) {
        for task in self.tasks.values_mut() {
            for estimate in &mut task.estimates {
                estimate.recent.decay(alpha);
            }
        }
    }
}
