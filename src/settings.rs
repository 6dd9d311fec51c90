//! A ready-made [`Setting`] implementation.
//!
//! Hosts with their own setting machinery implement the trait directly;
//! [`BasicSetting`] covers the common case of a fixed option list, a
//! measurement queue fed by the host, and a recorded current choice.  It is
//! also what the tests and demo harnesses drive.

use std::collections::VecDeque;

use crate::controller::Setting;
use crate::profile::Measurement;

/// Owned setting: identity, per-option values, declared default, pending
/// measurements, and the last applied choice.
///
/// # Example
///
/// ```rust
/// use budgeteer::{BasicSetting, Setting};
///
/// let mut shadows = BasicSetting::new("shadows", vec![0.0, 2.0, 5.0], 0);
/// shadows.record(1.25, 0); // measured option 0 at a cost of 1.25
/// assert_eq!(shadows.identity(), "shadows");
/// assert_eq!(shadows.choice(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BasicSetting {
    identity: String,
    values: Vec<f64>,
    choice_default: usize,
    choice: usize,
    pending: VecDeque<Measurement>,
}

impl BasicSetting {
    /// A setting with the given identity, option values, and default choice.
    pub fn new(identity: impl Into<String>, values: Vec<f64>, choice_default: usize) -> Self {
        Self {
            identity: identity.into(),
            values,
            choice_default,
            choice: choice_default,
            pending: VecDeque::new(),
        }
    }

    /// A single-option setting: an unavoidable cost (value 0) the solver
    /// must account for but cannot trade away.
    pub fn fixed(identity: impl Into<String>) -> Self {
        Self::new(identity, vec![0.0], 0)
    }

    /// A two-option on/off setting with the given "on" value.
    pub fn on_off(identity: impl Into<String>, value_on: f64, default_on: bool) -> Self {
        Self::new(identity, vec![0.0, value_on], usize::from(default_on))
    }

    /// Queue a measurement: `burden` observed while `choice` was active.
    pub fn record(&mut self, burden: f64, choice: usize) {
        self.pending.push_back(Measurement { burden, choice });
    }

    /// The most recently applied choice.
    pub fn choice(&self) -> usize {
        self.choice
    }

    /// Number of measurements waiting to be harvested.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Setting for BasicSetting {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn options(&self) -> &[f64] {
        &self.values
    }

    fn choice_default(&self) -> usize {
        self.choice_default
    }

    fn choice_set(&mut self, choice: usize) {
        self.choice = choice;
    }

    fn next_measurement(&mut self) -> Option<Measurement> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drains_in_order() {
        let mut s = BasicSetting::new("s", vec![0.0, 1.0], 0);
        s.record(1.0, 0);
        s.record(2.0, 1);
        assert_eq!(s.pending(), 2);
        assert_eq!(s.next_measurement().unwrap().burden, 1.0);
        assert_eq!(s.next_measurement().unwrap().choice, 1);
        assert!(s.next_measurement().is_none());
    }

    #[test]
    fn starts_on_the_declared_default() {
        let s = BasicSetting::new("s", vec![0.0, 1.0, 2.0], 1);
        assert_eq!(s.choice(), 1);
        assert_eq!(s.choice_default(), 1);
    }

    #[test]
    fn convenience_constructors_shape_the_option_list() {
        let fixed = BasicSetting::fixed("cost");
        assert_eq!(fixed.options(), &[0.0]);

        let toggle = BasicSetting::on_off("bloom", 3.0, true);
        assert_eq!(toggle.options(), &[0.0, 3.0]);
        assert_eq!(toggle.choice_default(), 1);
    }
}
