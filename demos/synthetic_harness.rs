//! Synthetic solver workout: generate a random multiple-choice knapsack
//! problem, solve it, and report solver internals and solution efficiency.
//!
//! Run with:
//!   cargo run --example synthetic_harness [seed]

use budgeteer::{Item, Knapsack, ScalarEconomy, SolveOutcome};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_burden(rng: &mut ChaCha8Rng) -> f64 {
    // Product of two uniforms: mostly small burdens, occasional spikes.
    rng.gen_range(0.0..1.0) * rng.gen_range(0.0..100.0)
}

fn random_value(rng: &mut ChaCha8Rng) -> f64 {
    rng.gen_range(0.0..1.0) * rng.gen_range(0.0..100.0)
}

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut knapsack: Knapsack<ScalarEconomy> = Knapsack::new();
    let precision = 50;

    println!("Generating a multiple-choice knapsack problem (seed {seed}).");

    let mut total_options = 0usize;
    for _ in 0..100 {
        match rng.gen_range(0..8) {
            0 => {
                // Unavoidable burden: one item, no value.
                knapsack.add_decision(&[Item {
                    burden: random_burden(&mut rng),
                    value: 0.0,
                }]);
                total_options += 1;
            }
            1..=3 => {
                // Binary on/off item.
                knapsack.add_decision(&[
                    Item {
                        burden: 0.0,
                        value: 0.0,
                    },
                    Item {
                        burden: random_burden(&mut rng),
                        value: random_value(&mut rng),
                    },
                ]);
                total_options += 2;
            }
            4..=6 => {
                // Orderly ladder: burden and value both accumulate.
                let mut burden = 0.0;
                let mut value = 0.0;
                let count = rng.gen_range(2..=17);
                let items: Vec<Item<f64>> = (0..count)
                    .map(|_| {
                        burden += random_burden(&mut rng);
                        value += random_value(&mut rng);
                        Item { burden, value }
                    })
                    .collect();
                knapsack.add_decision(&items);
                total_options += count;
            }
            _ => {
                // Chaotic: independent burden/value per item.
                let count = rng.gen_range(2..=17);
                let items: Vec<Item<f64>> = (0..count)
                    .map(|_| Item {
                        burden: random_burden(&mut rng),
                        value: random_value(&mut rng),
                    })
                    .collect();
                knapsack.add_decision(&items);
                total_options += count;
            }
        }
    }

    let decisions = knapsack.decision_count();
    let capacity: f64 = (0..decisions).map(|_| random_burden(&mut rng)).sum();

    println!("  problem:");
    println!("    decisions: {decisions}");
    println!("    total options: {total_options}");
    println!(
        "    mean options per decision: {:.2}",
        total_options as f64 / decisions as f64
    );
    println!("    burden limit: #{capacity:.2}");
    println!("    precision: {precision}");
    println!(
        "    iteration bound (est): {}",
        precision * decisions * total_options
    );

    let solved = knapsack.decide(capacity, precision);
    let stats = knapsack.stats();

    println!("  solver data:");
    println!("    solved: {solved} ({:?})", stats.outcome);
    println!("    iterations: {}", stats.iterations);
    println!(
        "    value->score scale: {:.4}",
        stats.value_to_score_scale
    );

    println!("  solution stats:");
    println!(
        "    min-burden: (#{:.2} ${:.2})",
        stats.lightest.net_burden, stats.lightest.net_value
    );
    println!(
        "    max-value:  (#{:.2} ${:.2} @{})",
        stats.highest.net_burden, stats.highest.net_value, stats.highest.net_score
    );
    println!(
        "    chosen:     (#{:.2} ${:.2} @{})",
        stats.chosen.net_burden, stats.chosen.net_value, stats.chosen.net_score
    );
    if stats.outcome == SolveOutcome::Optimized {
        println!(
            "    efficiency: (#{:.1}% ${:.1}% @{:.1}%)",
            100.0 * stats.chosen.net_burden / stats.highest.net_burden,
            100.0 * stats.chosen.net_value / stats.highest.net_value,
            100.0 * stats.chosen.net_score as f64 / stats.highest.net_score as f64,
        );
    }
}
