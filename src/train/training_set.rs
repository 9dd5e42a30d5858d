use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::sensor::source::SampleSource;

/// Labeled bursts, grouped by the index of their correct output neuron.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    bursts: Vec<Vec<Vec<u16>>>,
}

impl TrainingSet {
    pub fn new(num_labels: usize) -> TrainingSet {
        TrainingSet {
            bursts: vec![Vec::new(); num_labels],
        }
    }

    pub fn from_bursts(bursts: Vec<Vec<Vec<u16>>>) -> TrainingSet {
        TrainingSet { bursts }
    }

    /// Reads `sets_per_label` bursts of `burst_len` samples for every label in
    /// turn, telling the source which label is next before each group.
    pub fn collect<S: SampleSource + ?Sized>(
        source: &mut S,
        labels: &[String],
        sets_per_label: usize,
        burst_len: usize,
    ) -> Result<TrainingSet> {
        let mut set = TrainingSet::new(labels.len());
        for (label, name) in labels.iter().enumerate() {
            log::info!("collecting {sets_per_label} bursts for label {label} ({name})");
            source.prepare(label, name)?;
            for _ in 0..sets_per_label {
                let mut burst = vec![0u16; burst_len];
                source.read_burst(&mut burst)?;
                log::trace!("label {label}: {burst:?}");
                set.push(label, burst)?;
            }
        }
        Ok(set)
    }

    pub fn push(&mut self, label: usize, burst: Vec<u16>) -> Result<()> {
        let count = self.bursts.len();
        self.bursts
            .get_mut(label)
            .ok_or(NetworkError::InvalidLabel { index: label, count })?
            .push(burst);
        Ok(())
    }

    pub fn num_labels(&self) -> usize {
        self.bursts.len()
    }

    pub fn bursts(&self, label: usize) -> &[Vec<u16>] {
        &self.bursts[label]
    }

    pub fn len(&self) -> usize {
        self.bursts.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every label must have at least one burst and the label count must
    /// match the network's output layer.
    pub fn check_against(&self, network: &Network) -> Result<()> {
        let outputs = network.spec().num_output_neurons;
        if self.num_labels() != outputs {
            return Err(NetworkError::ShapeMismatch {
                what: "training set labels",
                expected: outputs,
                actual: self.num_labels(),
            });
        }
        if let Some(label) = self.bursts.iter().position(Vec::is_empty) {
            return Err(NetworkError::InvalidInput(format!("no bursts for label {label}")));
        }
        Ok(())
    }

    /// Per-label mean cost and overall accuracy of `network` on this set.
    ///
    /// Runs a forward pass per burst, so the network's activations afterwards
    /// belong to the last burst of the last label.
    pub fn evaluate(&self, network: &mut Network) -> Result<(Vec<f32>, f32)> {
        let mut costs = Vec::with_capacity(self.num_labels());
        let mut correct = 0usize;
        for (label, bursts) in self.bursts.iter().enumerate() {
            let mut total = 0.0;
            for burst in bursts {
                if network.classify(burst)? == label {
                    correct += 1;
                }
                total += network.cost(label)?;
            }
            costs.push(if bursts.is_empty() { 0.0 } else { total / bursts.len() as f32 });
        }
        let accuracy = if self.is_empty() { 0.0 } else { correct as f32 / self.len() as f32 };
        Ok((costs, accuracy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::source::ReplaySource;

    struct Recording {
        prepared: Vec<(usize, String)>,
        inner: ReplaySource,
    }

    impl SampleSource for Recording {
        fn prepare(&mut self, label: usize, name: &str) -> Result<()> {
            self.prepared.push((label, name.to_string()));
            Ok(())
        }

        fn read_burst(&mut self, burst: &mut [u16]) -> Result<()> {
            self.inner.read_burst(burst)
        }
    }

    #[test]
    fn collect_reads_each_label_in_turn() {
        let mut source = Recording {
            prepared: Vec::new(),
            inner: ReplaySource::new(vec![vec![1, 1, 1], vec![2, 2, 2], vec![3, 3, 3]]),
        };
        let labels = vec!["wood".to_string(), "steel".to_string()];
        let set = TrainingSet::collect(&mut source, &labels, 2, 3).unwrap();
        assert_eq!(source.prepared, vec![(0, "wood".to_string()), (1, "steel".to_string())]);
        assert_eq!(set.bursts(0), &[vec![1, 1, 1], vec![2, 2, 2]]);
        assert_eq!(set.bursts(1), &[vec![3, 3, 3], vec![1, 1, 1]]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn push_rejects_unknown_label() {
        let mut set = TrainingSet::new(2);
        assert!(matches!(set.push(2, vec![1]), Err(NetworkError::InvalidLabel { index: 2, count: 2 })));
    }
}
