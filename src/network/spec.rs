use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// How weights are filled at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform in [-1, 1] from the caller's RNG.
    #[default]
    Random,
    /// All zero. Every hidden neuron then learns the same thing, so this is
    /// only useful for reproducible experiments.
    Zero,
}

/// A serializable description of a network's shape, input domain and labels.
///
/// This holds the architecture only. Trained weights are never written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Number of input bins the raw domain is split into.
    pub num_input_neurons: usize,
    /// Neurons in every hidden layer.
    pub num_hidden_neurons: usize,
    pub num_hidden_layers: usize,
    pub num_output_neurons: usize,
    /// Inclusive upper bound of a raw reading (1023 for a 10-bit ADC).
    pub max_input: u16,
    /// One human-readable name per output neuron.
    pub labels: Vec<String>,
    /// Whether layers carry a trainable bias term.
    #[serde(default)]
    pub bias: bool,
    #[serde(default)]
    pub init: WeightInit,
}

impl NetworkSpec {
    pub fn new<S: Into<String>>(
        num_input_neurons: usize,
        num_hidden_neurons: usize,
        num_hidden_layers: usize,
        max_input: u16,
        labels: impl IntoIterator<Item = S>,
    ) -> NetworkSpec {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        NetworkSpec {
            num_input_neurons,
            num_hidden_neurons,
            num_hidden_layers,
            num_output_neurons: labels.len(),
            max_input,
            labels,
            bias: false,
            init: WeightInit::Random,
        }
    }

    pub fn with_bias(mut self, bias: bool) -> NetworkSpec {
        self.bias = bias;
        self
    }

    pub fn with_init(mut self, init: WeightInit) -> NetworkSpec {
        self.init = init;
        self
    }

    /// Checks every construction-time invariant.
    pub fn validate(&self) -> Result<()> {
        if self.num_output_neurons == 0 {
            return Err(NetworkError::EmptyOutput);
        }
        if self.labels.len() != self.num_output_neurons {
            return Err(NetworkError::ShapeMismatch {
                what: "labels",
                expected: self.num_output_neurons,
                actual: self.labels.len(),
            });
        }
        if self.num_input_neurons == 0 || self.num_hidden_neurons == 0 || self.num_hidden_layers == 0 {
            return Err(NetworkError::InvalidShape(format!(
                "input, hidden and layer counts must be positive, got {}/{}/{}",
                self.num_input_neurons, self.num_hidden_neurons, self.num_hidden_layers
            )));
        }
        if self.num_input_neurons > usize::from(self.max_input) {
            return Err(NetworkError::InvalidShape(format!(
                "{} input bins cannot partition [0, {}]",
                self.num_input_neurons, self.max_input
            )));
        }
        Ok(())
    }

    /// Expected `(rows, cols)` of every weight matrix, input side first.
    pub fn weight_shapes(&self) -> Vec<(usize, usize)> {
        let mut shapes = Vec::with_capacity(self.num_hidden_layers + 1);
        shapes.push((self.num_hidden_neurons, self.num_input_neurons));
        for _ in 1..self.num_hidden_layers {
            shapes.push((self.num_hidden_neurons, self.num_hidden_neurons));
        }
        shapes.push((self.num_output_neurons, self.num_hidden_neurons));
        shapes
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a spec from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}
