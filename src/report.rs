//! Plain-text rendering of experiment results.

use crate::experiment::{AggregateResult, ParameterSet};
use std::fmt::Write;

const RULE: &str = "--------------------------------------------------";

/// Renders one parameter set's aggregate as a framed block:
///
/// ```text
/// --------------------------------------------------
/// Probability of Mutation: 0.09
/// ...
/// Mean 3.2834
/// Time 12.481
/// --------------------------------------------------
/// ```
///
/// `Mean` is the mean best fitness, `Time` the mean run time in
/// milliseconds.
pub fn render<P: ParameterSet>(result: &AggregateResult<P>) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = writeln!(out, "{RULE}");
    for (label, value) in result.params.describe() {
        let _ = writeln!(out, "{label}: {value}");
    }
    let _ = writeln!(out, "Mean {}", result.mean_fitness);
    let _ = writeln!(out, "Time {:.3}", result.mean_millis());
    let _ = writeln!(out, "{RULE}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{aggregate, TrialResult};
    use crate::ga::GaParams;
    use crate::pso::PsoParams;
    use std::time::Duration;

    fn result<P: ParameterSet>(params: P) -> AggregateResult<P> {
        let trials = vec![
            TrialResult {
                seed: 1,
                best_fitness: 1.5,
                duration: Duration::from_millis(4),
            },
            TrialResult {
                seed: 2,
                best_fitness: 2.5,
                duration: Duration::from_millis(6),
            },
        ];
        aggregate(params, trials).unwrap()
    }

    #[test]
    fn test_ga_block() {
        let text = render(&result(GaParams::default()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                RULE,
                "Probability of Mutation: 0.09",
                "Probability of Crossover: 1",
                "Population: 100",
                "Iterations: 100",
                "Tournament Size: 2",
                "Number of Survivors: 1",
                "Mean 2",
                "Time 5.000",
                RULE,
            ]
        );
    }

    #[test]
    fn test_pso_block_lists_every_field() {
        let text = render(&result(PsoParams::default()));
        for label in [
            "Number of Particles: 80",
            "Number of Iterations: 125",
            "Neighbourhood Weight: 0.25",
            "Inertia Weight: 0.5",
            "Personal Weight: 2.25",
            "Global Weight: 0.5",
            "Velocity: 0.04",
        ] {
            assert!(text.contains(label), "missing {label}");
        }
        assert_eq!(text.matches(RULE).count(), 2);
    }
}
