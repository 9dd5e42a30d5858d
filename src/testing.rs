//! Deterministic fixtures shared by unit tests.

use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;

pub fn filled(rows: usize, cols: usize, value: f32) -> Matrix {
    Matrix::from_rows(vec![vec![value; cols]; rows]).unwrap()
}

/// Small weights of mixed sign that keep every neuron away from saturation.
pub fn patterned(rows: usize, cols: usize) -> Matrix {
    let data = (0..rows)
        .map(|i| (0..cols).map(|j| ((i * 7 + j * 3) % 5) as f32 * 0.15 - 0.3).collect())
        .collect();
    Matrix::from_rows(data).unwrap()
}

/// A bias-free network whose every layer uses `patterned` weights.
pub fn patterned_network(spec: NetworkSpec) -> Network {
    let weights = spec
        .weight_shapes()
        .into_iter()
        .map(|(rows, cols)| patterned(rows, cols))
        .collect();
    Network::from_weights(spec, weights, None).unwrap()
}
