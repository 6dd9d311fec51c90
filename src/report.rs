//! Per-cycle audit report.
//!
//! A control loop that silently reshuffles quality settings is miserable to
//! debug, so every [`Controller::update`](crate::Controller::update) returns
//! a [`CycleReport`]: a small, typed, log-ready record of what the cycle did
//! and why.  Notes are intentionally coarse: one entry per noteworthy
//! condition, not one per option.

use crate::controller::Anomaly;
use crate::economy::NormalBurden;
use crate::knapsack::SolveOutcome;

/// Audit notes describing noteworthy conditions in one cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CycleNote {
    /// A setting had no usable data and was pinned to its declared default
    /// (zero burden on the default option, infinite on the rest).
    ForcedDefault { identity: String, choice: usize },

    /// No (identity, option) pair carried data in both runs, so prior-run
    /// statistics were used without rescaling.
    PastUnscaled,

    /// Under-quota options of a setting received the exploration bonus and
    /// burden discount this cycle.
    Exploring {
        identity: String,
        options: Vec<usize>,
    },
}

/// What one `update` cycle did.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleReport {
    /// Whether the capacity was attainable.  `false` means the cycle
    /// degraded every setting to its lightest option.
    pub solved: bool,
    /// How the solver concluded.
    pub outcome: SolveOutcome,
    /// Cross-run burden scale factor (see
    /// [`Controller::past_present_ratio`](crate::Controller::past_present_ratio)).
    pub ratio: f64,
    /// Observed-vs-expected burden signal after this cycle's harvest.
    pub anomaly: Anomaly,
    /// Number of settings decided this cycle.
    pub decisions: usize,
    /// Net burden of the applied assignment.
    pub chosen_burden: NormalBurden,
    /// Net value of the applied assignment.
    pub chosen_value: f64,
    /// Noteworthy conditions, in settings order.
    pub notes: Vec<CycleNote>,
}

impl CycleReport {
    /// Whether the cycle hit the overload path (lightest assignment applied).
    pub fn overloaded(&self) -> bool {
        !self.solved
    }

    /// Identities pinned to their defaults this cycle.
    pub fn forced_defaults(&self) -> impl Iterator<Item = &str> {
        self.notes.iter().filter_map(|n| match n {
            CycleNote::ForcedDefault { identity, .. } => Some(identity.as_str()),
            _ => None,
        })
    }
}
