use std::time::Duration;

/// When a training session stops. Every condition is checked between
/// iterations, never in the middle of one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// After this many single-example updates.
    Iterations(usize),
    /// Once the clock shows this much time since the session started.
    Duration(Duration),
    /// Once the last recorded cost of every label is at or below `threshold`,
    /// giving up after `max_iterations`.
    Cost { threshold: f32, max_iterations: usize },
}

/// Configuration for a `train_session` run.
///
/// # Fields
/// - `learning_rate`: step size of every update; must be finite and positive
/// - `stop`:          when the session ends
/// - `log_every`:     if set, logs progress at `debug` every this many iterations
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub learning_rate: f32,
    pub stop: StopCondition,
    pub log_every: Option<usize>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` without progress logging.
    pub fn new(learning_rate: f32, stop: StopCondition) -> Self {
        TrainConfig {
            learning_rate,
            stop,
            log_every: None,
        }
    }

    pub fn log_every(mut self, iterations: usize) -> Self {
        self.log_every = Some(iterations.max(1));
        self
    }
}
