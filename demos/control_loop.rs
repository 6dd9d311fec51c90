//! Control-loop demo: a simulated frame loop with a handful of quality
//! settings, each with hidden true costs the controller has to discover.
//!
//! Watch the loop pin defaults, explore every option up to quota, then
//! settle on the best configuration the frame budget allows, and degrade
//! gracefully when the budget tightens mid-run.
//!
//! Run with:
//!   cargo run --example control_loop

use budgeteer::{BasicSetting, Config, Controller, NormalCapacity, Setting};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

struct Simulated {
    setting: BasicSetting,
    /// Hidden per-option mean cost (ms); the controller never sees this.
    true_cost: Vec<f64>,
}

fn main() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let mut sims = vec![
        Simulated {
            setting: BasicSetting::fixed("scene-base"),
            true_cost: vec![4.0],
        },
        Simulated {
            setting: BasicSetting::new("shadows", vec![0.0, 3.0, 6.0], 0),
            true_cost: vec![0.5, 2.0, 5.0],
        },
        Simulated {
            setting: BasicSetting::on_off("bloom", 2.0, false),
            true_cost: vec![0.1, 1.5],
        },
        Simulated {
            setting: BasicSetting::new("particles", vec![0.0, 1.0, 4.0, 7.0], 0),
            true_cost: vec![0.2, 1.0, 3.0, 6.5],
        },
    ];

    let config = Config {
        recent_alpha: 0.97,
        measure_quota: 20.0,
        explore_value: 0.5,
        ..Config::default()
    };
    let mut controller = Controller::with_config(config);

    let mut budget_ms = 16.0;
    for frame in 0..400 {
        if frame == 250 {
            budget_ms = 9.0;
            println!("-- frame {frame}: budget tightened to {budget_ms} ms --");
        }

        let report = {
            let mut settings: Vec<&mut dyn Setting> = sims
                .iter_mut()
                .map(|s| &mut s.setting as &mut dyn Setting)
                .collect();
            controller.update(&mut settings, NormalCapacity::new(budget_ms), 64)
        };

        // Simulate the frame: each chosen option costs its true mean plus
        // ~5% gaussian-ish noise, measured and queued for the next cycle.
        let mut frame_ms = 0.0;
        for sim in &mut sims {
            let choice = sim.setting.choice();
            let noise: f64 = (0..4).map(|_| rng.gen_range(-0.025..0.025)).sum();
            let cost = (sim.true_cost[choice] * (1.0 + noise)).max(0.0);
            frame_ms += cost;
            sim.setting.record(cost, choice);
        }

        if frame % 50 == 0 || frame == 251 {
            let choices: Vec<usize> = sims.iter().map(|s| s.setting.choice()).collect();
            println!(
                "frame {frame:3}: choices {choices:?}  frame {frame_ms:5.2} ms  \
                 value {:4.1}  anomaly {:.2}  solved={}",
                report.chosen_value, report.anomaly.recent, report.solved
            );
        }
    }

    println!("\nfinal profile:");
    for (identity, task) in controller.current_profile().iter() {
        let means: Vec<String> = task
            .estimates()
            .iter()
            .map(|e| format!("{:.2}", e.recent.mean()))
            .collect();
        println!(
            "  {identity:12} samples={:4}  recent means [{}]",
            task.data_count(),
            means.join(", ")
        );
    }
}
