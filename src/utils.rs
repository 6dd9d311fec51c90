//! Utility helpers: tuning-constant guidance.

/// Suggest a `recent` decay constant for a target effective window length.
///
/// A per-cycle decay `alpha` gives the recent accumulators an effective
/// memory of `≈ 1/(1−alpha)` samples, so `alpha = 1 − 1/window`.
///
/// # Example
///
/// ```rust
/// use budgeteer::suggested_recent_alpha;
///
/// // Remember roughly the last 100 measurements per option.
/// let alpha = suggested_recent_alpha(100);
/// assert!((alpha - 0.99).abs() < 1e-12);
/// ```
pub fn suggested_recent_alpha(window: usize) -> f64 {
    let window = (window.max(2)) as f64;
    (1.0 - 1.0 / window).clamp(0.5, 0.9999)
}

/// Suggest a solver precision for an iteration budget.
///
/// The solve cost is bounded by `precision × decisions × total_options`
/// inner steps, so this returns `budget / (decisions × total_options)`,
/// clamped to `[4, 10_000]`.
///
/// # Example
///
/// ```rust
/// use budgeteer::suggested_precision;
///
/// // 100k iterations across 50 decisions averaging 4 options.
/// let precision = suggested_precision(50, 200, 100_000);
/// assert_eq!(precision, 10);
/// ```
pub fn suggested_precision(decisions: usize, total_options: usize, iteration_budget: usize) -> usize {
    let work = decisions.max(1) * total_options.max(1);
    (iteration_budget / work).clamp(4, 10_000)
}
