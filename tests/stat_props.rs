//! Property tests for the burden accumulator:
//!
//! 1. Incremental updates reproduce the two-pass sample mean and (n−1)
//!    variance.
//! 2. Pooling any split of a data set matches the single-pass statistic
//!    over the whole set (parallel variance combination).
//! 3. Pure decay drives the effective count toward 1 and the variance
//!    toward 0, without touching the mean.

use budgeteer::BurdenStat;
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs() + b.abs())
}

fn two_pass(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let ssd: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
    (mean, ssd / (n - 1.0).max(1.0))
}

proptest! {
    #[test]
    fn incremental_matches_two_pass(
        samples in prop::collection::vec(0.0f64..1e3, 1..200),
    ) {
        let mut stat = BurdenStat::new();
        for &x in &samples {
            stat.push(x);
        }
        let (mean, var) = two_pass(&samples);
        prop_assert!(close(stat.mean(), mean), "mean {} vs {mean}", stat.mean());
        prop_assert!(close(stat.variance(), var), "var {} vs {var}", stat.variance());
        prop_assert_eq!(stat.count(), samples.len() as f64);
    }

    #[test]
    fn pooling_any_split_matches_the_whole(
        samples in prop::collection::vec(0.0f64..1e3, 2..120),
        split_seed in 0usize..1000,
    ) {
        let split = 1 + split_seed % (samples.len() - 1);
        let (left, right) = samples.split_at(split);

        let mut a = BurdenStat::new();
        for &x in left {
            a.push(x);
        }
        let mut b = BurdenStat::new();
        for &x in right {
            b.push(x);
        }
        let pooled = a.pool(&b);

        let mut whole = BurdenStat::new();
        for &x in &samples {
            whole.push(x);
        }

        prop_assert!(close(pooled.mean(), whole.mean()));
        prop_assert!(close(pooled.variance(), whole.variance()));
        prop_assert_eq!(pooled.count(), whole.count());
        // Pooling commutes.
        let swapped = b.pool(&a);
        prop_assert!(close(swapped.mean(), pooled.mean()));
        prop_assert!(close(swapped.variance(), pooled.variance()));
    }

    #[test]
    fn decay_converges_without_moving_the_mean(
        samples in prop::collection::vec(0.0f64..1e3, 2..50),
        alpha in 0.5f64..0.999,
    ) {
        let mut stat = BurdenStat::new();
        for &x in &samples {
            stat.push(x);
        }
        let mean = stat.mean();
        for _ in 0..60_000 {
            stat.decay(alpha);
        }
        prop_assert!((stat.count() - 1.0).abs() < 1e-6, "count {}", stat.count());
        prop_assert!(stat.variance().abs() < 1e-3, "variance {}", stat.variance());
        prop_assert_eq!(stat.mean(), mean, "decay must not move the mean");
    }

    #[test]
    fn scaling_commutes_with_pooling(
        left in prop::collection::vec(0.0f64..100.0, 1..40),
        right in prop::collection::vec(0.0f64..100.0, 1..40),
        factor in 0.1f64..10.0,
    ) {
        let mut a = BurdenStat::new();
        for &x in &left {
            a.push(x);
        }
        let mut b = BurdenStat::new();
        for &x in &right {
            b.push(x);
        }

        // Scale both then pool, versus pool then scale.
        let scaled_then_pooled = a.scaled(factor).pool(&b.scaled(factor));
        let pooled_then_scaled = a.pool(&b).scaled(factor);
        prop_assert!(close(scaled_then_pooled.mean(), pooled_then_scaled.mean()));
        prop_assert!(close(
            scaled_then_pooled.variance(),
            pooled_then_scaled.variance()
        ));
    }
}
