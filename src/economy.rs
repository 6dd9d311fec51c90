//! Burden / value / capacity algebra ("economies").
//!
//! The solver is generic over an *economy*: the ruleset describing what a
//! burden is, how burdens combine, and when a net burden fits within a
//! capacity.  Two economies are provided:
//!
//! - [`ScalarEconomy`]: burden and capacity are plain numbers; feasibility is
//!   `burden < capacity`.
//! - [`NormalEconomy`]: a burden is a normal distribution summarized as
//!   `(mean, var)` under an independence assumption, and the capacity is a
//!   limit plus a sigma count.  Feasibility is chance-constrained: the mean
//!   plus `sigmas` standard deviations must stay under the limit (Charnes &
//!   Cooper 1959).  This is the economy used for live profiling, where every
//!   cost estimate carries measurement uncertainty.
//!
//! Economies are side-effect free and never fail; callers own the numeric
//! hygiene of their inputs.

use core::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

/// The value type maximized by the solver.  Values are plain numbers in every
/// economy; only burdens vary in structure.
pub type Value = f64;

/// A burden/capacity ruleset.
///
/// `lesser` is a strict weak ordering used for ranking only: for
/// probabilistic burdens there is no objective total order, so ranking
/// compares means.  `acceptable` is the one place the actual feasibility
/// semantics live; the solver never tests feasibility any other way.
pub trait Economy {
    /// Cost drawn from the limited resource by choosing an option.
    type Burden: Copy
        + fmt::Debug
        + PartialEq
        + Add<Output = Self::Burden>
        + AddAssign
        + Mul<f64, Output = Self::Burden>;

    /// The limit a net burden is tested against.
    type Capacity: Copy + fmt::Debug;

    /// The burden of choosing nothing.
    fn zero() -> Self::Burden;

    /// A burden no capacity can accommodate.
    fn infinite() -> Self::Burden;

    /// Whether a burden is finite and meaningful (could fit *some* capacity).
    fn is_possible(burden: Self::Burden) -> bool;

    /// Strictly ranks `lhs` below `rhs`.  Ties rank neither below the other,
    /// which is what gives first-wins selection its stability.
    fn lesser(lhs: Self::Burden, rhs: Self::Burden) -> bool;

    /// Whether `burden` fits within `capacity`.
    fn acceptable(burden: Self::Burden, capacity: Self::Capacity) -> bool;
}

/// Deterministic economy: burden and capacity are plain `f64`s.
///
/// # Example
///
/// ```rust
/// use budgeteer::{Economy, ScalarEconomy};
///
/// assert!(ScalarEconomy::acceptable(2.5, 3.0));
/// assert!(!ScalarEconomy::acceptable(3.0, 3.0)); // strict
/// assert!(!ScalarEconomy::is_possible(ScalarEconomy::infinite()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarEconomy;

impl Economy for ScalarEconomy {
    type Burden = f64;
    type Capacity = f64;

    fn zero() -> f64 {
        0.0
    }

    fn infinite() -> f64 {
        f64::INFINITY
    }

    fn is_possible(burden: f64) -> bool {
        // NaN compares false and is therefore impossible.
        burden < f64::INFINITY
    }

    fn lesser(lhs: f64, rhs: f64) -> bool {
        lhs < rhs
    }

    fn acceptable(burden: f64, capacity: f64) -> bool {
        burden < capacity
    }
}

/// A normally-distributed burden, summarized as mean and variance.
///
/// Addition assumes independence: means add, variances add.  Scaling by a
/// factor scales the mean linearly and the variance quadratically.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalBurden {
    /// Expected cost.
    pub mean: f64,
    /// Variance of the cost.
    pub var: f64,
}

impl NormalBurden {
    /// A burden with the given mean and variance.
    pub fn new(mean: f64, var: f64) -> Self {
        Self { mean, var }
    }

    /// A burden known exactly (zero variance).
    pub fn certain(mean: f64) -> Self {
        Self { mean, var: 0.0 }
    }

    /// Standard deviation.
    pub fn deviation(&self) -> f64 {
        self.var.sqrt()
    }

    /// `mean + sigmas · deviation`, the pessimistic point estimate at the
    /// given confidence multiple.
    pub fn sigma_offset(&self, sigmas: f64) -> f64 {
        self.mean + sigmas * self.var.sqrt()
    }
}

impl Add for NormalBurden {
    type Output = NormalBurden;
    fn add(self, o: NormalBurden) -> NormalBurden {
        NormalBurden {
            mean: self.mean + o.mean,
            var: self.var + o.var,
        }
    }
}

impl AddAssign for NormalBurden {
    fn add_assign(&mut self, o: NormalBurden) {
        self.mean += o.mean;
        self.var += o.var;
    }
}

impl Sub for NormalBurden {
    type Output = NormalBurden;
    /// Difference of independent quantities: variances still add.
    fn sub(self, o: NormalBurden) -> NormalBurden {
        NormalBurden {
            mean: self.mean - o.mean,
            var: self.var + o.var,
        }
    }
}

impl SubAssign for NormalBurden {
    fn sub_assign(&mut self, o: NormalBurden) {
        self.mean -= o.mean;
        self.var += o.var;
    }
}

impl Mul<f64> for NormalBurden {
    type Output = NormalBurden;
    fn mul(self, s: f64) -> NormalBurden {
        NormalBurden {
            mean: self.mean * s,
            var: self.var * (s * s),
        }
    }
}

impl MulAssign<f64> for NormalBurden {
    fn mul_assign(&mut self, s: f64) {
        self.mean *= s;
        self.var *= s * s;
    }
}

impl Div<f64> for NormalBurden {
    type Output = NormalBurden;
    fn div(self, s: f64) -> NormalBurden {
        NormalBurden {
            mean: self.mean / s,
            var: self.var / (s * s),
        }
    }
}

impl DivAssign<f64> for NormalBurden {
    fn div_assign(&mut self, s: f64) {
        self.mean /= s;
        self.var /= s * s;
    }
}

/// Capacity for the normal economy: a hard limit on the mean net burden,
/// tightened by a sigma count.  Three to five sigmas make exceeding the
/// limit very unlikely.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalCapacity {
    /// The limit on net burden.
    pub limit: f64,
    /// Confidence multiple applied to the net deviation.
    pub sigmas: f64,
}

impl NormalCapacity {
    /// A capacity at the given limit with the default three-sigma margin.
    pub fn new(limit: f64) -> Self {
        Self { limit, sigmas: 3.0 }
    }

    /// A capacity with an explicit sigma count.
    pub fn with_sigmas(limit: f64, sigmas: f64) -> Self {
        Self { limit, sigmas }
    }
}

/// Chance-constrained economy over [`NormalBurden`]s.
///
/// Feasibility requires `mean + sigmas·sqrt(var) < limit`, evaluated in the
/// squared form `sigmas²·var < (limit − mean)²` so no square root is taken
/// in the solver's inner loop.
///
/// # Example
///
/// ```rust
/// use budgeteer::{Economy, NormalBurden, NormalCapacity, NormalEconomy};
///
/// let cap = NormalCapacity::new(10.0);
/// // Tight estimate fits; a noisy one with the same mean does not.
/// assert!(NormalEconomy::acceptable(NormalBurden::new(8.0, 0.1), cap));
/// assert!(!NormalEconomy::acceptable(NormalBurden::new(8.0, 4.0), cap));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalEconomy;

impl Economy for NormalEconomy {
    type Burden = NormalBurden;
    type Capacity = NormalCapacity;

    fn zero() -> NormalBurden {
        NormalBurden { mean: 0.0, var: 0.0 }
    }

    fn infinite() -> NormalBurden {
        NormalBurden {
            mean: f64::INFINITY,
            var: 0.0,
        }
    }

    fn is_possible(burden: NormalBurden) -> bool {
        burden.mean < f64::INFINITY && burden.var < f64::INFINITY
    }

    /// There is no objective total order for normal burdens; ranking
    /// compares means.
    fn lesser(lhs: NormalBurden, rhs: NormalBurden) -> bool {
        lhs.mean < rhs.mean
    }

    fn acceptable(burden: NormalBurden, capacity: NormalCapacity) -> bool {
        // (mean + sigmas·sqrt(var)) < limit  ⇔  sigmas²·var < (limit − mean)²
        if !(burden.mean < capacity.limit) {
            return false;
        }
        let margin = capacity.limit - burden.mean;
        capacity.sigmas * capacity.sigmas * burden.var < margin * margin
    }
}
