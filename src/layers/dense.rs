use crate::{activation::activation::ScaledTanh, math::matrix::Matrix};
use rand::Rng;

/// One fully-connected layer: a `size × input_size` weight matrix, an optional
/// bias vector and the buffers filled by the last forward pass.
#[derive(Debug, Clone)]
pub struct Layer {
    pub size: usize,
    pub neurons: Vec<f32>,
    pre_neurons: Vec<f32>, // pre-squash sums, needed for the derivative
    pub weights: Matrix,
    pub biases: Option<Vec<f32>>,
    activator: ScaledTanh,
}

/// Weight and bias adjustments for one layer, already scaled by the learning rate.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub weights: Matrix,
    pub biases: Option<Vec<f32>>,
}

impl Layer {
    pub fn random<R: Rng + ?Sized>(size: usize, input_size: usize, bias: bool, rng: &mut R) -> Layer {
        let weights = Matrix::random(size, input_size, rng);
        let biases = bias.then(|| (0..size).map(|_| rng.gen_range(-1.0f32..=1.0)).collect());
        Layer::from_parts(weights, biases)
    }

    pub fn zeros(size: usize, input_size: usize, bias: bool) -> Layer {
        Layer::from_parts(Matrix::zeros(size, input_size), bias.then(|| vec![0.0; size]))
    }

    /// Callers check that `biases`, when present, has one entry per row.
    pub fn from_parts(weights: Matrix, biases: Option<Vec<f32>>) -> Layer {
        let size = weights.rows;
        Layer {
            size,
            neurons: vec![0.0; size],
            pre_neurons: vec![0.0; size],
            weights,
            biases,
            activator: ScaledTanh,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    pub fn pre_neurons(&self) -> &[f32] {
        &self.pre_neurons
    }

    /// Weighted sum and squash: `a[i] = tanh(π · (Σ_j x[j]·w[i][j] + b[i]))`.
    pub fn feed_from(&mut self, input: &[f32]) {
        debug_assert_eq!(input.len(), self.input_size());
        for i in 0..self.size {
            let mut sum: f32 = input
                .iter()
                .zip(self.weights.row(i))
                .map(|(x, w)| x * w)
                .sum();
            if let Some(biases) = &self.biases {
                sum += biases[i];
            }
            self.pre_neurons[i] = sum;
            self.neurons[i] = self.activator.function(sum);
        }
    }

    /// Turns an error in activation space into this layer's δ:
    /// `δ[i] = error[i] · tanh'(z[i])`.
    pub fn delta(&self, error: &[f32]) -> Vec<f32> {
        error
            .iter()
            .zip(&self.pre_neurons)
            .map(|(e, &z)| e * self.activator.derivative(z))
            .collect()
    }

    /// Error handed to the layer below: `Σ_i δ[i] · w[i][j]`, using the
    /// current (not yet updated) weights.
    pub fn backpropagate(&self, delta: &[f32]) -> Vec<f32> {
        self.weights.transpose_mul_vec(delta)
    }

    /// Ascent step towards the target: `Δw[i][j] = lr · δ[i] · x[j]`, `Δb[i] = lr · δ[i]`.
    pub fn compute_gradients(&self, delta: &[f32], inputs: &[f32], lr: f32) -> Gradients {
        Gradients {
            weights: Matrix::outer(delta, inputs, lr),
            biases: self
                .biases
                .as_ref()
                .map(|_| delta.iter().map(|d| d * lr).collect()),
        }
    }

    /// Whether applying `gradients` keeps every weight and bias finite.
    pub fn accepts(&self, gradients: &Gradients) -> bool {
        let weights_ok = self
            .weights
            .as_slice()
            .iter()
            .zip(gradients.weights.as_slice())
            .all(|(w, g)| (w + g).is_finite());
        let biases_ok = match (&self.biases, &gradients.biases) {
            (Some(b), Some(g)) => b.iter().zip(g).all(|(b, g)| (b + g).is_finite()),
            (None, None) => true,
            _ => false,
        };
        weights_ok && biases_ok
    }

    pub fn apply_gradients(&mut self, gradients: &Gradients) {
        self.weights.add_assign(&gradients.weights);
        if let (Some(biases), Some(grad)) = (self.biases.as_mut(), gradients.biases.as_ref()) {
            for (b, g) in biases.iter_mut().zip(grad) {
                *b += g;
            }
        }
    }
}
