//! Profile snapshots.
//!
//! Durable storage is the host's concern; this module only defines the
//! interchange shape: a map from identity to one `[count, mean, deviation]`
//! triple per option, in option order.  Deviation is stored rather than
//! variance for precision reasons.  With the `serde` feature the snapshot
//! derives `Serialize`/`Deserialize` (transparently, so the JSON form is
//! exactly the map), and the host picks the format.
//!
//! Restoring merges records into a profile via
//! [`Profile::assimilate`] with scale factor 1, and is all-or-nothing: a
//! snapshot that fails validation leaves the profile untouched.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::profile::{Profile, Task};
use crate::stats::BurdenStat;

/// `(count, mean, deviation)` for one option.
pub type StatRecord = (f64, f64, f64);

/// A profile's `full` statistics, flattened for storage.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ProfileSnapshot {
    /// Identity → per-option records, in option order.
    pub tasks: BTreeMap<String, Vec<StatRecord>>,
}

/// Why a snapshot could not be applied.  The target profile is never
/// partially mutated by a failed merge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("task `{identity}` has no option records")]
    EmptyTask { identity: String },
    #[error("task `{identity}` option {option} carries a non-finite statistic")]
    NonFinite { identity: String, option: usize },
    #[error("task `{identity}` option {option} has negative sample count {count}")]
    NegativeCount {
        identity: String,
        option: usize,
        count: f64,
    },
    #[error("task `{identity}` has {found} options, the profile expects {expected}")]
    OptionCountMismatch {
        identity: String,
        expected: usize,
        found: usize,
    },
}

impl ProfileSnapshot {
    /// Flatten a profile's `full` statistics into a snapshot.
    pub fn capture(profile: &Profile) -> Self {
        let tasks = profile
            .iter()
            .map(|(identity, task)| {
                let records = task
                    .estimates()
                    .iter()
                    .map(|e| (e.full.count(), e.full.mean(), e.full.deviation()))
                    .collect();
                (identity.to_string(), records)
            })
            .collect();
        Self { tasks }
    }

    /// Check every record against `target` without mutating anything.
    pub fn validate(&self, target: &Profile) -> Result<(), SnapshotError> {
        for (identity, records) in &self.tasks {
            if records.is_empty() {
                return Err(SnapshotError::EmptyTask {
                    identity: identity.clone(),
                });
            }
            if let Some(existing) = target.find(identity) {
                if existing.option_count() != records.len() {
                    return Err(SnapshotError::OptionCountMismatch {
                        identity: identity.clone(),
                        expected: existing.option_count(),
                        found: records.len(),
                    });
                }
            }
            for (option, &(count, mean, deviation)) in records.iter().enumerate() {
                if !(count.is_finite() && mean.is_finite() && deviation.is_finite()) {
                    return Err(SnapshotError::NonFinite {
                        identity: identity.clone(),
                        option,
                    });
                }
                if count < 0.0 {
                    return Err(SnapshotError::NegativeCount {
                        identity: identity.clone(),
                        option,
                        count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Merge every record into `profile` (scale factor 1), validating the
    /// whole snapshot first so failure leaves `profile` unchanged.
    pub fn merge_into(&self, profile: &mut Profile) -> Result<(), SnapshotError> {
        self.validate(profile)?;
        for (identity, records) in &self.tasks {
            let stats: Vec<BurdenStat> = records
                .iter()
                .map(|&(count, mean, deviation)| BurdenStat::from_moments(count, mean, deviation))
                .collect();
            let task = Task::from_full_stats(stats);
            profile.assimilate(identity, &task, 1.0);
        }
        Ok(())
    }

    /// Build a fresh profile from this snapshot.
    pub fn restore(&self) -> Result<Profile, SnapshotError> {
        let mut profile = Profile::new();
        self.merge_into(&mut profile)?;
        Ok(profile)
    }
}
