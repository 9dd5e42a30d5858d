use serde::{Deserialize, Serialize};

/// Summary of one `train_session` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Number of single-example updates applied.
    pub iterations: usize,
    /// Wall-clock duration of the session in milliseconds, as seen by its clock.
    pub elapsed_ms: u64,
    /// Mean cost of each label over all of its bursts at the end of the session.
    pub label_costs: Vec<f32>,
    /// Fraction of all bursts in the set classified correctly at the end, in [0, 1].
    pub accuracy: f32,
    /// Whether a cost-bounded session reached its threshold. Always `false`
    /// for iteration- and time-bounded sessions.
    pub converged: bool,
}
