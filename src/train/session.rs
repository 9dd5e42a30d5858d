use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::sensor::clock::Clock;
use crate::train::session_report::SessionReport;
use crate::train::train_config::{StopCondition, TrainConfig};
use crate::train::trainer::train_on_example;
use crate::train::training_set::TrainingSet;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Repeats "pick a random labeled burst, classify it, update towards its
/// label" until `config.stop` says otherwise.
///
/// # Arguments
/// - `network`: modified in place
/// - `set`:     labeled bursts; every label needs at least one
/// - `config`:  learning rate, stop condition, progress interval
/// - `rng`:     picks the label and burst of each iteration
/// - `clock`:   read between iterations for time-bounded sessions
///
/// The stop condition is checked before every iteration, so a session never
/// interrupts an update. Any error from the network ends the session and is
/// returned as is.
pub fn train_session<R, C>(
    network: &mut Network,
    set: &TrainingSet,
    config: &TrainConfig,
    rng: &mut R,
    clock: &C,
) -> Result<SessionReport>
where
    R: Rng + ?Sized,
    C: Clock + ?Sized,
{
    let optimizer = Sgd::new(config.learning_rate)?;
    set.check_against(network)?;
    if let StopCondition::Cost { threshold, .. } = config.stop {
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(NetworkError::InvalidInput(format!("cost threshold {threshold} is not usable")));
        }
    }
    if config.log_every == Some(0) {
        return Err(NetworkError::InvalidInput("progress interval must be at least one iteration".into()));
    }

    let num_labels = set.num_labels();
    let start = clock.elapsed();
    // Unvisited labels count as not converged.
    let mut costs = vec![f32::INFINITY; num_labels];
    let mut iterations = 0usize;
    let mut converged = false;

    log::info!(
        "training session started: {} bursts, {} labels, rate {}, stop {:?}",
        set.len(),
        num_labels,
        config.learning_rate,
        config.stop
    );

    loop {
        // ── Stop check ────────────────────────────────────────────────────
        let done = match config.stop {
            StopCondition::Iterations(limit) => iterations >= limit,
            StopCondition::Duration(limit) => clock.elapsed().saturating_sub(start) >= limit,
            StopCondition::Cost { threshold, max_iterations } => {
                converged = costs.iter().all(|&c| c <= threshold);
                converged || iterations >= max_iterations
            }
        };
        if done {
            break;
        }

        // ── One update ────────────────────────────────────────────────────
        let label = rng.gen_range(0..num_labels);
        let burst = set
            .bursts(label)
            .choose(rng)
            .ok_or_else(|| NetworkError::InvalidInput(format!("no bursts for label {label}")))?;
        network.classify(burst)?;
        train_on_example(network, label, &optimizer)?;
        iterations += 1;

        // ── Cost tracking ─────────────────────────────────────────────────
        if let StopCondition::Cost { .. } = config.stop {
            network.forward()?;
            costs[label] = network.cost(label)?;
            log::trace!("iteration {iterations}: label {label} cost {}", costs[label]);
        }

        if let Some(every) = config.log_every {
            if iterations % every == 0 {
                log::debug!("iteration {iterations}: label {label}, costs {costs:?}");
            }
        }
    }

    let elapsed = clock.elapsed().saturating_sub(start);
    let (label_costs, accuracy) = set.evaluate(network)?;
    log::info!(
        "training session finished after {iterations} iterations in {:?}: accuracy {:.3}, costs {:?}{}",
        elapsed,
        accuracy,
        label_costs,
        if converged { " (converged)" } else { "" }
    );

    Ok(SessionReport {
        iterations,
        elapsed_ms: elapsed.as_millis() as u64,
        label_costs,
        accuracy,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::NetworkSpec;
    use crate::sensor::clock::ManualClock;
    use crate::testing::patterned_network;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn materials() -> TrainingSet {
        TrainingSet::from_bursts(vec![
            vec![vec![10, 20, 30, 40, 50, 60], vec![12, 22, 28, 44, 51, 59]],
            vec![vec![900, 910, 950, 980, 1000, 1023], vec![905, 915, 940, 990, 1010, 1020]],
        ])
    }

    fn network(seed: u64) -> Network {
        Network::new(NetworkSpec::new(8, 6, 1, 1023, ["soft", "hard"]), &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn iteration_bound_session() {
        let mut net = network(1);
        let config = TrainConfig::new(0.1, StopCondition::Iterations(25));
        let report = train_session(&mut net, &materials(), &config, &mut StdRng::seed_from_u64(2), &ManualClock::new())
            .unwrap();
        assert_eq!(report.iterations, 25);
        assert_eq!(report.label_costs.len(), 2);
        assert!(!report.converged);
        assert!((0.0..=1.0).contains(&report.accuracy));
    }

    #[test]
    fn time_bound_session_checks_between_iterations() {
        let mut net = network(3);
        let clock = ManualClock::ticking(Duration::from_millis(100));
        let config = TrainConfig::new(0.1, StopCondition::Duration(Duration::from_secs(1)));
        let report = train_session(&mut net, &materials(), &config, &mut StdRng::seed_from_u64(4), &clock).unwrap();
        // The start read takes t=0; stop checks read 100ms, 200ms, ... 1000ms.
        assert_eq!(report.iterations, 9);
    }

    #[test]
    fn cost_bound_session_converges() {
        let mut net = patterned_network(NetworkSpec::new(8, 6, 1, 1023, ["soft", "hard"]));
        let config = TrainConfig::new(0.2, StopCondition::Cost { threshold: 0.05, max_iterations: 20_000 }).log_every(100);
        let report = train_session(&mut net, &materials(), &config, &mut StdRng::seed_from_u64(6), &ManualClock::new())
            .unwrap();
        assert!(report.converged, "stopped after {} iterations", report.iterations);
        assert!(report.iterations < 20_000);
        assert_eq!(report.accuracy, 1.0);
    }

    #[test]
    fn rejects_mismatched_or_empty_sets() {
        let mut net = network(7);
        let config = TrainConfig::new(0.1, StopCondition::Iterations(1));
        let clock = ManualClock::new();
        let mut rng = StdRng::seed_from_u64(8);

        let three = TrainingSet::new(3);
        assert!(matches!(
            train_session(&mut net, &three, &config, &mut rng, &clock),
            Err(NetworkError::ShapeMismatch { what: "training set labels", .. })
        ));

        let mut half = TrainingSet::new(2);
        half.push(0, vec![1, 2, 3]).unwrap();
        assert!(matches!(
            train_session(&mut net, &half, &config, &mut rng, &clock),
            Err(NetworkError::InvalidInput(_))
        ));

        let bad_rate = TrainConfig::new(-0.1, StopCondition::Iterations(1));
        assert!(matches!(
            train_session(&mut net, &materials(), &bad_rate, &mut rng, &clock),
            Err(NetworkError::InvalidRate(_))
        ));
    }

    #[test]
    fn zero_progress_interval_is_rejected() {
        let mut net = network(9);
        let config = TrainConfig {
            learning_rate: 0.1,
            stop: StopCondition::Iterations(3),
            log_every: Some(0),
        };
        let before = net.output_weights().clone();
        let result = train_session(&mut net, &materials(), &config, &mut StdRng::seed_from_u64(10), &ManualClock::new());
        assert!(matches!(result, Err(NetworkError::InvalidInput(_))));
        assert_eq!(net.output_weights(), &before);
    }
}
