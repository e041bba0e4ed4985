//! Property-based tests for rastrigin-bench
//!
//! Uses proptest to verify invariants of the benchmark function, the
//! engines, the sweep generator and the aggregator.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rastrigin_bench::experiment::{
    aggregate, run_trials, sweep_mode, TrialConfig, TrialResult, SWEEP_LEN,
};
use rastrigin_bench::fitness::{Objective, Rastrigin};
use rastrigin_bench::ga::{GaEngine, GaParams};
use rastrigin_bench::pso::{PsoEngine, PsoParams};
use std::time::Duration;

proptest! {
    // ==================== Fitness Properties ====================

    #[test]
    fn fitness_non_negative(x in prop::collection::vec(-5.12..5.12f64, 10)) {
        prop_assert!(Rastrigin::default().evaluate(&x) >= 0.0);
    }

    #[test]
    fn fitness_zero_vector_is_zero(dim in 1usize..50) {
        let f = Rastrigin::new(dim);
        prop_assert_eq!(f.evaluate(&vec![0.0; dim]), 0.0);
    }

    #[test]
    fn fitness_symmetric_under_sign_flip(
        x in prop::collection::vec(-5.12..5.12f64, 10),
        flip in prop::collection::vec(any::<bool>(), 10)
    ) {
        let f = Rastrigin::default();
        let flipped: Vec<f64> = x
            .iter()
            .zip(&flip)
            .map(|(&v, &neg)| if neg { -v } else { v })
            .collect();
        prop_assert!((f.evaluate(&x) - f.evaluate(&flipped)).abs() < 1e-9);
    }

    // ==================== PSO Properties ====================

    #[test]
    fn pso_stays_within_bounds(
        seed in any::<u64>(),
        vmax in 0.0f64..2.0,
        inertia in 0.0f64..1.5,
        personal in 0.0f64..3.0
    ) {
        let f = Rastrigin::default();
        let params = PsoParams::default()
            .with_num_particles(20)
            .with_max_min_velocity(vmax)
            .with_inertia_weight(inertia)
            .with_personal_weight(personal);
        let engine = PsoEngine::new(&f, params).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut swarm = engine.init_swarm(&mut rng).unwrap();

        for _ in 0..20 {
            engine.step(&mut swarm, &mut rng).unwrap();
            for p in swarm.particles() {
                prop_assert!(p.velocity.iter().all(|v| v.abs() <= vmax));
                prop_assert!(p.position.iter().all(|x| x.abs() <= f.bound));
            }
        }
    }

    // ==================== GA Properties ====================

    #[test]
    fn ga_population_size_constant(
        seed in any::<u64>(),
        pop in 2usize..40,
        p_mut in 0.0f64..1.0
    ) {
        let f = Rastrigin::default();
        let params = GaParams::default()
            .with_pop_size(pop)
            .with_tournament_size(1)
            .with_prob_mutation(p_mut);
        let engine = GaEngine::new(&f, params).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut population = engine.initial_population(&mut rng).unwrap();

        for _ in 0..5 {
            population = engine.next_generation(&population, &mut rng).unwrap();
            prop_assert_eq!(population.len(), pop);
        }
    }

    // ==================== Sweep Properties ====================

    #[test]
    fn budget_sweep_divides_budget(budget in 0usize..5_000_000) {
        let defaults = GaParams::default();
        let sets = sweep_mode::<GaParams>("budget")
            .unwrap()
            .with_budget(budget)
            .generate(&defaults);

        prop_assert_eq!(sets.len(), SWEEP_LEN);
        for set in &sets {
            prop_assert_eq!(set.num_iters, budget / set.pop_size);
            prop_assert_eq!(set.num_survivors, defaults.num_survivors);
            prop_assert_eq!(set.tournament_size, defaults.tournament_size);
        }
    }

    #[test]
    fn perturbation_sweep_sets_one_field(step in 0.0f64..10.0) {
        let defaults = PsoParams::default();
        let sets = sweep_mode::<PsoParams>("globalWeight")
            .unwrap()
            .with_step(step)
            .generate(&defaults);

        prop_assert_eq!(sets.len(), SWEEP_LEN);
        for (i, set) in sets.iter().enumerate() {
            prop_assert_eq!(set.global_weight, i as f64 * step);
            prop_assert_eq!(set.with_global_weight(defaults.global_weight), defaults);
        }
    }

    // ==================== Aggregator Properties ====================

    #[test]
    fn aggregate_is_order_independent(
        values in prop::collection::vec((0.0f64..500.0, 0u64..10_000), 1..40),
        seed in any::<u64>()
    ) {
        let trials: Vec<TrialResult> = values
            .iter()
            .map(|&(best_fitness, micros)| TrialResult {
                seed: 0,
                best_fitness,
                duration: Duration::from_micros(micros),
            })
            .collect();

        let mut shuffled = trials.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        shuffled.shuffle(&mut rng);

        let a = aggregate((), trials).unwrap();
        let b = aggregate((), shuffled).unwrap();
        prop_assert_eq!(a.mean_fitness.to_bits(), b.mean_fitness.to_bits());
        prop_assert_eq!(a.mean_duration, b.mean_duration);
        prop_assert_eq!(a.min_fitness, b.min_fitness);
        prop_assert_eq!(a.max_fitness, b.max_fitness);
    }

    #[test]
    fn aggregate_of_equal_values(value in 0.0f64..1000.0) {
        let trials = vec![
            TrialResult { seed: 0, best_fitness: value, duration: Duration::from_millis(3) };
            30
        ];
        let agg = aggregate((), trials).unwrap();
        prop_assert!((agg.mean_fitness - value).abs() <= value * 1e-12);
        prop_assert_eq!(agg.mean_duration, Duration::from_millis(3));
    }
}

// ==================== End-to-End Scenarios ====================

/// Mean initial-population fitness over 30 seeds.
fn mean_initial(initial: impl Fn(u64) -> f64) -> f64 {
    (0..30).map(initial).sum::<f64>() / 30.0
}

#[test]
fn ga_reference_configuration_converges() {
    let f = Rastrigin::default();
    let params = GaParams::default();
    let config = TrialConfig::default().with_seed(2024);

    let result = run_trials(&params, &f, &config, 2024, 0).unwrap();
    let initial = mean_initial(|seed| {
        GaEngine::new(&f, params)
            .unwrap()
            .with_parallel(false)
            .run(seed)
            .unwrap()
            .initial_mean_fitness
    });

    assert_eq!(result.trials.len(), 30);
    assert!(
        result.mean_fitness < initial / 2.0,
        "mean best {} vs initial mean {}",
        result.mean_fitness,
        initial
    );
}

#[test]
fn pso_reference_configuration_converges() {
    let f = Rastrigin::default();
    let params = PsoParams::default();
    let config = TrialConfig::default().with_seed(2024);

    for base in [1, 99, 2024] {
        let result = run_trials(&params, &f, &config, base, 0).unwrap();
        assert_eq!(result.trials.len(), 30);
        assert!(
            result.mean_fitness < 10.0,
            "base {base}: mean best {} should be near zero",
            result.mean_fitness
        );
    }
}
