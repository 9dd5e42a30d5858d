use rand::Rng;

use crate::error::{NetworkError, Result};
use crate::input::encoder::InputEncoder;
use crate::layers::dense::Layer;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::network::classifier::most_likely;
use crate::network::spec::{NetworkSpec, WeightInit};
use crate::optim::sgd::Sgd;
use crate::train::trainer::train_on_example;

/// A fixed-shape feed-forward network together with its input encoder.
///
/// `layers` holds every hidden layer in order followed by the output layer.
/// The shape is fixed at construction; weights change only through
/// [`Network::train_on_example`].
#[derive(Debug, Clone)]
pub struct Network {
    spec: NetworkSpec,
    encoder: InputEncoder,
    pub(crate) inputs: Vec<f32>,
    pub(crate) layers: Vec<Layer>,
    has_input: bool,
    /// Activations reflect the current input and weights.
    pub(crate) propagated: bool,
    response: Option<usize>,
}

impl Network {
    /// Builds a network with initialized weights but no input yet.
    ///
    /// A burst must be supplied through [`Network::new_input`] or
    /// [`Network::classify`] before a forward pass means anything.
    pub fn new<R: Rng + ?Sized>(spec: NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .weight_shapes()
            .into_iter()
            .map(|(rows, cols)| match spec.init {
                WeightInit::Random => Layer::random(rows, cols, spec.bias, rng),
                WeightInit::Zero => Layer::zeros(rows, cols, spec.bias),
            })
            .collect();
        Ok(Network::assemble(spec, layers))
    }

    /// Builds a network and runs a first burst through it, so it is ready to
    /// answer straight away.
    pub fn with_burst<R: Rng + ?Sized>(spec: NetworkSpec, burst: &[u16], rng: &mut R) -> Result<Network> {
        let mut network = Network::new(spec, rng)?;
        network.classify(burst)?;
        Ok(network)
    }

    /// Builds a network from explicit weight matrices, input side first.
    ///
    /// `biases` must be given exactly when `spec.bias` is set, one vector per
    /// weight matrix.
    pub fn from_weights(
        spec: NetworkSpec,
        weights: Vec<Matrix>,
        biases: Option<Vec<Vec<f32>>>,
    ) -> Result<Network> {
        spec.validate()?;
        let shapes = spec.weight_shapes();
        if weights.len() != shapes.len() {
            return Err(NetworkError::ShapeMismatch {
                what: "weight matrices",
                expected: shapes.len(),
                actual: weights.len(),
            });
        }
        for (w, &(rows, cols)) in weights.iter().zip(&shapes) {
            if w.rows != rows {
                return Err(NetworkError::ShapeMismatch { what: "weight rows", expected: rows, actual: w.rows });
            }
            if w.cols != cols {
                return Err(NetworkError::ShapeMismatch { what: "weight columns", expected: cols, actual: w.cols });
            }
        }

        let biases: Vec<Option<Vec<f32>>> = match (spec.bias, biases) {
            (false, None) => vec![None; shapes.len()],
            (true, Some(biases)) => {
                if biases.len() != shapes.len() {
                    return Err(NetworkError::ShapeMismatch {
                        what: "bias vectors",
                        expected: shapes.len(),
                        actual: biases.len(),
                    });
                }
                for (b, &(rows, _)) in biases.iter().zip(&shapes) {
                    if b.len() != rows {
                        return Err(NetworkError::ShapeMismatch { what: "bias length", expected: rows, actual: b.len() });
                    }
                }
                biases.into_iter().map(Some).collect()
            }
            (true, None) => {
                return Err(NetworkError::InvalidShape("spec enables biases but none were given".into()))
            }
            (false, Some(_)) => {
                return Err(NetworkError::InvalidShape("biases given but the spec disables them".into()))
            }
        };

        let layers = weights
            .into_iter()
            .zip(biases)
            .map(|(w, b)| Layer::from_parts(w, b))
            .collect();
        Ok(Network::assemble(spec, layers))
    }

    fn assemble(spec: NetworkSpec, layers: Vec<Layer>) -> Network {
        log::debug!(
            "built network {}-{}x{}-{} (bias: {})",
            spec.num_input_neurons,
            spec.num_hidden_neurons,
            spec.num_hidden_layers,
            spec.num_output_neurons,
            spec.bias
        );
        Network {
            encoder: InputEncoder::new(spec.max_input, spec.num_input_neurons),
            inputs: vec![0.0; spec.num_input_neurons],
            layers,
            has_input: false,
            propagated: false,
            response: None,
            spec,
        }
    }

    /// Encodes a new burst into the input neurons. Other activations become stale.
    ///
    /// On error the previous input is kept.
    pub fn new_input(&mut self, burst: &[u16]) -> Result<()> {
        self.encoder.encode(burst, &mut self.inputs)?;
        self.has_input = true;
        self.invalidate();
        Ok(())
    }

    /// Marks the activations and the response as out of date.
    pub(crate) fn invalidate(&mut self) {
        self.propagated = false;
        self.response = None;
    }

    /// Runs the current input through every layer in order and returns the
    /// most likely label.
    pub fn forward(&mut self) -> Result<usize> {
        if !self.has_input {
            return Err(NetworkError::InvalidInput("no sample burst has been supplied".into()));
        }
        let (first, rest) = self
            .layers
            .split_first_mut()
            .ok_or(NetworkError::EmptyOutput)?;
        first.feed_from(&self.inputs);
        let mut previous: &Layer = first;
        for layer in rest {
            layer.feed_from(&previous.neurons);
            previous = layer;
        }
        self.invalidate();
        if self.layers.iter().any(|l| l.neurons.iter().any(|a| a.is_nan())) {
            return Err(NetworkError::NonFiniteActivation);
        }
        let response = most_likely(&self.output_layer().neurons)?;
        self.propagated = true;
        self.response = Some(response);
        Ok(response)
    }

    /// Encodes `burst`, propagates it and returns the index of the winning label.
    pub fn classify(&mut self, burst: &[u16]) -> Result<usize> {
        self.new_input(burst)?;
        self.forward()
    }

    /// One step of gradient descent towards `correct` for the last classified burst.
    ///
    /// Leaves the activations stale. Call [`Network::forward`] before reading
    /// them again. Any error leaves the weights untouched.
    pub fn train_on_example(&mut self, correct: usize, learning_rate: f32) -> Result<()> {
        let optimizer = Sgd::new(learning_rate)?;
        train_on_example(self, correct, &optimizer)
    }

    /// Mean squared error of the current outputs against a one-hot target.
    pub fn cost(&self, correct: usize) -> Result<f32> {
        self.check_label(correct)?;
        Ok(MseLoss::one_hot_loss(self.output_activations(), correct))
    }

    pub(crate) fn check_label(&self, index: usize) -> Result<()> {
        if index >= self.spec.num_output_neurons {
            return Err(NetworkError::InvalidLabel { index, count: self.spec.num_output_neurons });
        }
        Ok(())
    }

    pub fn spec(&self) -> &NetworkSpec {
        &self.spec
    }

    pub fn encoder(&self) -> &InputEncoder {
        &self.encoder
    }

    pub fn labels(&self) -> &[String] {
        &self.spec.labels
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.spec.labels.get(index).map(String::as_str)
    }

    /// Label index chosen by the last forward pass, if it is still current.
    pub fn response(&self) -> Option<usize> {
        self.response
    }

    /// Whether the activations reflect the current input and weights.
    pub fn is_propagated(&self) -> bool {
        self.propagated
    }

    pub fn num_hidden_layers(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn input_activations(&self) -> &[f32] {
        &self.inputs
    }

    /// Panics if `layer` is not a hidden layer index.
    pub fn hidden_activations(&self, layer: usize) -> &[f32] {
        assert!(layer < self.num_hidden_layers(), "hidden layer {layer} out of range");
        &self.layers[layer].neurons
    }

    pub fn output_activations(&self) -> &[f32] {
        &self.output_layer().neurons
    }

    /// Panics if `layer` is not a hidden layer index.
    pub fn hidden_weights(&self, layer: usize) -> &Matrix {
        assert!(layer < self.num_hidden_layers(), "hidden layer {layer} out of range");
        &self.layers[layer].weights
    }

    pub fn output_weights(&self) -> &Matrix {
        &self.output_layer().weights
    }

    /// Biases of weight layer `layer` (the output layer is last), if enabled.
    pub fn biases(&self, layer: usize) -> Option<&[f32]> {
        self.layers.get(layer)?.biases.as_deref()
    }

    pub(crate) fn output_layer(&self) -> &Layer {
        // Construction guarantees at least one hidden layer plus the output layer.
        &self.layers[self.layers.len() - 1]
    }
}
