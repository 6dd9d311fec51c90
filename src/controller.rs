//! The per-cycle control loop.
//!
//! A [`Controller`] owns two burden profiles (the live one and one loaded
//! from a prior run) and, once per control period, harvests fresh
//! measurements, turns statistics into a chance-constrained knapsack
//! problem, solves it, and pushes the chosen option index back into every
//! [`Setting`].
//!
//! Design points:
//!
//! - **Settings stay externally owned.**  Each cycle borrows them as
//!   `&mut [&mut dyn Setting]`; the controller retains only statistics,
//!   keyed by [`Setting::identity`].  The whole cycle is synchronous and
//!   single-threaded: there is no internal locking, and the borrow rules
//!   make concurrent mutation unrepresentable rather than merely undefined.
//! - **Graceful degradation.**  An unattainable capacity is a normal
//!   outcome: the solver reports it and every setting lands on its lightest
//!   option.  Settings without data are pinned to their declared defaults
//!   instead of being guessed at.
//! - **Exploration is budgeted, not random.**  Under-sampled options get a
//!   value bonus and a burden discount proportional to how much of their
//!   measurement quota is missing, so the solver itself schedules the
//!   sampling (same contract as a coverage floor in bandit routing: every
//!   arm keeps getting measured until its quota is met).

use crate::economy::{Economy, NormalBurden, NormalCapacity, NormalEconomy};
use crate::knapsack::{Item, Knapsack};
use crate::profile::{Measurement, Profile};
use crate::report::{CycleNote, CycleReport};

/// Returned by [`Controller::past_present_ratio`] when no (identity, option)
/// pair has data in both runs.  Callers branch on sign: negative means the
/// past profile cannot be rescaled (and is used as-is), zero means pairs
/// exist but carry no usable weight, positive is a valid scale factor.
pub const RATIO_NO_OVERLAP: f64 = -1.0;

/// One externally-owned, controllable setting.
///
/// Identities must be stable across runs and unique per cost distribution;
/// they key the profiles.  The measurement queue is drained once per cycle;
/// implementations decide how measurements get into it.
pub trait Setting {
    /// Stable profile key for this setting.
    fn identity(&self) -> &str;

    /// Subjective value of each option, in option order.  Burdens are
    /// estimated by the controller, never declared here.
    fn options(&self) -> &[f64];

    /// The option to pin while no profile data exists.
    fn choice_default(&self) -> usize {
        0
    }

    /// Receives the chosen option index at the end of each cycle.
    fn choice_set(&mut self, choice: usize);

    /// Next pending measurement, if any.  Called until it returns `None`
    /// each cycle.
    fn next_measurement(&mut self) -> Option<Measurement>;
}

/// Controller tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Per-cycle decay of the `recent` accumulators; effective window
    /// length is `≈ 1/(1−recent_alpha)` samples.
    pub recent_alpha: f64,
    /// Smoothing decay for the anomaly signal.
    pub anomaly_alpha: f64,
    /// Samples per option before it counts as fully explored.
    pub measure_quota: f64,
    /// Value bonus granted to under-sampled options.
    pub explore_value: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recent_alpha: 0.99,
            anomaly_alpha: 0.99,
            measure_quota: 100.0,
            explore_value: 1.0,
        }
    }
}

/// Observed-vs-expected burden ratio across all profiled settings.
///
/// A sustained value above 1 means the system is running slower than its
/// profile (thermal throttling, background load); below 1, faster.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anomaly {
    /// Ratio from the latest harvest with profiled expectations.
    pub latest: f64,
    /// Exponentially smoothed ratio.
    pub recent: f64,
}

impl Default for Anomaly {
    fn default() -> Self {
        Self {
            latest: 1.0,
            recent: 1.0,
        }
    }
}

/// The control loop: profiles, solver, and anomaly signal.
///
/// Call [`Controller::update`] once per control period from a single thread.
/// Solver and scratch buffers are reused across cycles; only profile data
/// grows, and only when new identities appear.
#[derive(Default)]
pub struct Controller {
    /// Tuning knobs; adjustable between cycles.
    pub config: Config,
    current: Profile,
    past: Profile,
    knapsack: Knapsack<NormalEconomy>,
    anomaly: Anomaly,
    scratch_items: Vec<Item<NormalBurden>>,
    scratch_known: Vec<Option<NormalBurden>>,
}

impl Controller {
    /// A controller with default configuration and empty profiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The live profile for this run.
    pub fn current_profile(&self) -> &Profile {
        &self.current
    }

    /// The prior-run profile.
    pub fn past_profile(&self) -> &Profile {
        &self.past
    }

    /// Install a prior-run profile (typically restored from a snapshot).
    pub fn set_past_profile(&mut self, profile: Profile) {
        self.past = profile;
    }

    /// The current anomaly signal.
    pub fn anomaly(&self) -> Anomaly {
        self.anomaly
    }

    /// The solver, for inspecting the last cycle's decisions and stats.
    pub fn solver(&self) -> &Knapsack<NormalEconomy> {
        &self.knapsack
    }

    /// A read-only merge of both runs: the current profile with every past
    /// task assimilated at the effective cross-run scale.
    pub fn full_profile(&self) -> Profile {
        let ratio = self.past_present_ratio();
        let scale = if ratio > 0.0 { ratio } else { 1.0 };
        let mut merged = self.current.clone();
        merged.assimilate_all(&self.past, scale);
        merged
    }

    /// Weighted mean of per-option mean ratios between the runs.
    ///
    /// Each (identity, option) pair with data in both profiles contributes
    /// `mean_cur / mean_past` at weight
    /// `sqrt(count_cur · count_past · mean_cur · mean_past)`.  Returns
    /// [`RATIO_NO_OVERLAP`] when no pair qualifies, `0.0` when pairs exist
    /// but the weight sum vanishes.
    pub fn past_present_ratio(&self) -> f64 {
        let mut overlap = false;
        let mut weight_sum = 0.0;
        let mut acc = 0.0;
        for (identity, cur_task) in self.current.iter() {
            let Some(past_task) = self.past.find(identity) else {
                continue;
            };
            assert_eq!(
                past_task.option_count(),
                cur_task.option_count(),
                "option count changed across runs for task `{identity}`"
            );
            for i in 0..cur_task.option_count() {
                let cur = &cur_task.estimate(i).full;
                let past = &past_task.estimate(i).full;
                if !(cur.has_data() && past.has_data()) {
                    continue;
                }
                overlap = true;
                let weight = (cur.count() * past.count() * cur.mean() * past.mean()).sqrt();
                if !(weight > 0.0) || !weight.is_finite() {
                    continue;
                }
                weight_sum += weight;
                acc += weight * (cur.mean() / past.mean());
            }
        }
        if !overlap {
            return RATIO_NO_OVERLAP;
        }
        if !(weight_sum > 0.0) {
            return 0.0;
        }
        acc / weight_sum
    }

    /// Run one control cycle: harvest measurements, estimate burdens, solve
    /// the knapsack, apply the choices.
    pub fn update(
        &mut self,
        settings: &mut [&mut dyn Setting],
        capacity: NormalCapacity,
        precision: usize,
    ) -> CycleReport {
        self.harvest(settings);
        self.decide(settings, capacity, precision)
    }

    /// Drain every setting's pending measurements into the current profile,
    /// updating the anomaly signal along the way.
    fn harvest(&mut self, settings: &mut [&mut dyn Setting]) {
        self.current.decay_recent(self.config.recent_alpha);

        let mut observed = 0.0;
        let mut expected = 0.0;
        for setting in settings.iter_mut() {
            let option_count = setting.options().len();
            let identity = setting.identity().to_string();
            while let Some(raw) = setting.next_measurement() {
                if option_count == 0 {
                    continue;
                }
                let measurement = Measurement {
                    burden: raw.burden.max(0.0),
                    choice: raw.choice,
                };
                if let Some(task) = self.current.find(&identity) {
                    if let Some(est) = task.estimates().get(measurement.choice) {
                        if est.full.has_data() {
                            expected += est.full.mean();
                            observed += measurement.burden;
                        }
                    }
                }
                self.current.collect(&identity, option_count, &measurement);
            }
        }

        if expected > 0.0 {
            self.anomaly.latest = observed / expected;
            let alpha = self.config.anomaly_alpha;
            self.anomaly.recent = alpha * self.anomaly.recent + (1.0 - alpha) * self.anomaly.latest;
        }
    }

    /// Turn statistics into a knapsack problem, solve it, and apply the
    /// chosen option of every setting.
    fn decide(
        &mut self,
        settings: &mut [&mut dyn Setting],
        capacity: NormalCapacity,
        precision: usize,
    ) -> CycleReport {
        let ratio = self.past_present_ratio();
        let scale = if ratio < 0.0 { 1.0 } else { ratio };
        let past_usable = ratio != 0.0;
        let quota = self.config.measure_quota.max(1.0);

        let mut notes: Vec<CycleNote> = Vec::new();
        if ratio < 0.0 && !self.past.is_empty() {
            notes.push(CycleNote::PastUnscaled);
        }

        self.knapsack.clear();
        for setting in settings.iter() {
            let identity = setting.identity().to_string();
            let values = setting.options();
            let n = values.len();
            if n == 0 {
                self.knapsack.add_decision(&[]);
                continue;
            }
            let declared = setting.choice_default();
            let default = if declared < n { declared } else { 0 };

            let cur_task = self.current.find(&identity);
            let past_task = self.past.find(&identity);
            if let Some(task) = cur_task {
                assert_eq!(task.option_count(), n, "option count changed for `{identity}`");
            }
            if let Some(task) = past_task {
                assert_eq!(task.option_count(), n, "option count changed for `{identity}`");
            }

            let has_cur = cur_task.is_some_and(|t| t.data_count() > 0);
            let has_past = past_task.is_some_and(|t| t.estimates().iter().any(|e| e.has_data()));

            self.scratch_items.clear();
            if !has_cur && !(has_past && past_usable) {
                // Pin to the declared default until any data arrives.
                for (i, &value) in values.iter().enumerate() {
                    let burden = if i == default {
                        NormalEconomy::zero()
                    } else {
                        NormalEconomy::infinite()
                    };
                    self.scratch_items.push(Item { burden, value });
                }
                notes.push(CycleNote::ForcedDefault {
                    identity,
                    choice: default,
                });
                self.knapsack.add_decision(&self.scratch_items);
                continue;
            }

            // Best available per-option estimate: current-run recent stat,
            // else the past-run stat mapped through the cross-run scale.
            self.scratch_known.clear();
            for i in 0..n {
                let cur = cur_task.map(|t| t.estimate(i).full.count()).unwrap_or(0.0);
                let known = if cur > 0.0 {
                    cur_task.map(|t| t.estimate(i).recent.burden_norm())
                } else {
                    past_task
                        .map(|t| &t.estimate(i).full)
                        .filter(|s| s.has_data() && past_usable)
                        .map(|s| s.scaled(scale).burden_norm())
                };
                self.scratch_known.push(known);
            }
            let lightest_known = self
                .scratch_known
                .iter()
                .flatten()
                .copied()
                .reduce(|a, b| if b.mean < a.mean { b } else { a })
                .expect("setting with data has at least one known option");

            let task_data = cur_task.map_or(0, |t| t.data_count()) as f64;
            let explored = cur_task.is_some_and(|t| t.fully_explored());
            let mut all_explored = true;
            let mut exploring: Vec<usize> = Vec::new();

            for (i, &declared_value) in values.iter().enumerate() {
                let (n_cur, recent) = cur_task
                    .map(|t| {
                        let est = t.estimate(i);
                        (est.full.count(), est.recent.burden_norm())
                    })
                    .unwrap_or((0.0, NormalBurden::default()));
                let past_stat = past_task
                    .map(|t| &t.estimate(i).full)
                    .filter(|s| s.has_data());
                let n_past = past_stat.map_or(0.0, |s| s.count());

                let prior = match past_stat {
                    Some(stat) if past_usable => stat.scaled(scale).burden_norm(),
                    _ => lightest_known,
                };

                let mut burden = if n_cur >= quota {
                    recent
                } else if n_cur > 0.0 {
                    let mix = n_cur / quota;
                    recent * mix + prior * (1.0 - mix)
                } else {
                    prior
                };

                let mut value = declared_value;
                if !explored && n_cur + n_past < quota {
                    all_explored = false;
                    let missing = quota - (n_cur + n_past);
                    // Reachable only with missing > 0, so the divisor is
                    // positive even before any data exists.
                    let factor = missing / missing.max(task_data);
                    burden = burden * factor;
                    value += self.config.explore_value;
                    exploring.push(i);
                }
                self.scratch_items.push(Item { burden, value });
            }

            if all_explored && !explored {
                if let Some(task) = self.current.find_mut(&identity) {
                    task.mark_fully_explored();
                }
            }
            if !exploring.is_empty() {
                notes.push(CycleNote::Exploring {
                    identity,
                    options: exploring,
                });
            }
            self.knapsack.add_decision(&self.scratch_items);
        }

        let solved = self.knapsack.decide(capacity, precision);

        for (index, setting) in settings.iter_mut().enumerate() {
            setting.choice_set(self.knapsack.decision(index).choice);
        }

        let stats = self.knapsack.stats();
        CycleReport {
            solved,
            outcome: stats.outcome,
            ratio,
            anomaly: self.anomaly,
            decisions: settings.len(),
            chosen_burden: stats.chosen.net_burden,
            chosen_value: stats.chosen.net_value,
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knapsack::SolveOutcome;
    use crate::settings::BasicSetting;

    fn capacity(limit: f64) -> NormalCapacity {
        NormalCapacity::new(limit)
    }

    #[test]
    fn first_cycle_pins_every_setting_to_its_default() {
        let mut controller = Controller::new();
        let mut a = BasicSetting::new("a", vec![0.0, 5.0], 0);
        let mut b = BasicSetting::new("b", vec![0.0, 1.0, 2.0], 2);
        {
            let mut settings: Vec<&mut dyn Setting> = vec![&mut a, &mut b];
            let report = controller.update(&mut settings, capacity(10.0), 50);
            assert!(report.solved);
            assert_eq!(report.forced_defaults().count(), 2);
        }
        assert_eq!(a.choice(), 0);
        assert_eq!(b.choice(), 2);
    }

    #[test]
    fn out_of_range_default_falls_back_to_zero() {
        let mut controller = Controller::new();
        let mut setting = BasicSetting::new("s", vec![1.0, 2.0], 9);
        let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
        controller.update(&mut settings, capacity(10.0), 50);
        drop(settings);
        assert_eq!(setting.choice(), 0);
    }

    #[test]
    fn measured_settings_leave_the_pinned_path() {
        let config = Config {
            measure_quota: 2.0,
            explore_value: 0.0,
            ..Config::default()
        };
        let mut controller = Controller::with_config(config);
        let mut setting = BasicSetting::new("s", vec![0.0, 5.0], 0);

        // Feed measurements for both options past the quota.
        for _ in 0..4 {
            setting.record(1.0, 0);
            setting.record(2.0, 1);
        }
        let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
        let report = controller.update(&mut settings, capacity(10.0), 50);
        assert!(report.solved);
        assert_eq!(report.forced_defaults().count(), 0);
        drop(settings);
        // Plenty of headroom: the valuable option wins.
        assert_eq!(setting.choice(), 1);
    }

    #[test]
    fn overload_degrades_to_lightest_choices() {
        let config = Config {
            measure_quota: 1.0,
            ..Config::default()
        };
        let mut controller = Controller::with_config(config);
        let mut setting = BasicSetting::new("s", vec![0.0, 9.0], 0);
        setting.record(4.0, 0);
        setting.record(8.0, 1);
        let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
        let report = controller.update(&mut settings, capacity(1.0), 50);
        assert!(report.overloaded());
        assert_eq!(report.outcome, SolveOutcome::Infeasible);
        drop(settings);
        assert_eq!(setting.choice(), 0, "lightest option under overload");
    }

    #[test]
    fn anomaly_tracks_observed_over_expected() {
        let config = Config {
            anomaly_alpha: 0.5,
            ..Config::default()
        };
        let mut controller = Controller::with_config(config);
        let mut setting = BasicSetting::new("s", vec![0.0], 0);

        // First cycle establishes the expectation at 2.0.
        setting.record(2.0, 0);
        {
            let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
            controller.update(&mut settings, capacity(10.0), 50);
        }
        assert_eq!(controller.anomaly().latest, 1.0, "no expectation yet");

        // Second cycle observes twice the profiled mean.
        setting.record(4.0, 0);
        {
            let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
            controller.update(&mut settings, capacity(10.0), 50);
        }
        let anomaly = controller.anomaly();
        assert!((anomaly.latest - 2.0).abs() < 1e-12, "latest {}", anomaly.latest);
        assert!((anomaly.recent - 1.5).abs() < 1e-12, "recent {}", anomaly.recent);
    }

    #[test]
    fn negative_burdens_are_clamped_before_collection() {
        let mut controller = Controller::new();
        let mut setting = BasicSetting::new("s", vec![0.0], 0);
        setting.record(-5.0, 0);
        let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
        controller.update(&mut settings, capacity(10.0), 50);
        let est = controller
            .current_profile()
            .find("s")
            .unwrap()
            .estimate(0);
        assert_eq!(est.full.mean(), 0.0);
    }

    #[test]
    fn ratio_is_sentinel_without_overlap_and_weighted_with() {
        let mut controller = Controller::new();
        assert_eq!(controller.past_present_ratio(), RATIO_NO_OVERLAP);

        // Past data alone: still no overlap.
        let mut past = Profile::new();
        for _ in 0..10 {
            past.collect("s", 2, &Measurement { burden: 2.0, choice: 0 });
        }
        controller.set_past_profile(past);
        assert_eq!(controller.past_present_ratio(), RATIO_NO_OVERLAP);

        // Current data on the same option: ratio of means (4/2).
        let mut setting = BasicSetting::new("s", vec![0.0, 1.0], 0);
        for _ in 0..10 {
            setting.record(4.0, 0);
        }
        let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
        controller.update(&mut settings, capacity(100.0), 50);
        let ratio = controller.past_present_ratio();
        assert!((ratio - 2.0).abs() < 1e-9, "ratio {ratio}");
    }

    #[test]
    fn unmeasured_option_gets_a_blind_guess_not_a_crash() {
        // One explored option, two unexplored: the blind-guess path must
        // produce finite burdens (its divisor is positive by construction).
        let config = Config {
            measure_quota: 10.0,
            ..Config::default()
        };
        let mut controller = Controller::with_config(config);
        let mut setting = BasicSetting::new("s", vec![0.0, 1.0, 2.0], 0);
        setting.record(3.0, 0);
        let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
        let report = controller.update(&mut settings, capacity(100.0), 50);
        assert!(report.solved);
        for index in 0..3 {
            let item = controller.solver().items_of(0)[index];
            assert!(
                item.burden.mean.is_finite(),
                "option {index} burden {:?}",
                item.burden
            );
        }
    }

    #[test]
    fn full_profile_merges_past_at_the_effective_scale() {
        let mut controller = Controller::new();
        let mut past = Profile::new();
        for _ in 0..4 {
            past.collect("s", 1, &Measurement { burden: 2.0, choice: 0 });
        }
        controller.set_past_profile(past);

        let mut setting = BasicSetting::new("s", vec![0.0], 0);
        for _ in 0..4 {
            setting.record(4.0, 0);
        }
        let mut settings: Vec<&mut dyn Setting> = vec![&mut setting];
        controller.update(&mut settings, capacity(100.0), 50);

        // Ratio is 2: past means are doubled before pooling, so the merged
        // mean stays at the current run's level.
        let merged = controller.full_profile();
        let est = merged.find("s").unwrap().estimate(0);
        assert_eq!(est.full.count(), 8.0);
        assert!((est.full.mean() - 4.0).abs() < 1e-9);
    }
}
