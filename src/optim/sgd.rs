use crate::error::{NetworkError, Result};
use crate::layers::dense::{Gradients, Layer};

#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f32,
}

impl Sgd {
    /// Rejects rates that are not finite and strictly positive.
    pub fn new(learning_rate: f32) -> Result<Sgd> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(NetworkError::InvalidRate(learning_rate));
        }
        Ok(Sgd { learning_rate })
    }

    /// Applies one update to a layer given its pre-computed gradients.
    pub fn step(&self, layer: &mut Layer, gradients: &Gradients) {
        layer.apply_gradients(gradients);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_rates() {
        for rate in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            assert!(matches!(Sgd::new(rate), Err(NetworkError::InvalidRate(_))));
        }
        assert_eq!(Sgd::new(0.05).unwrap().learning_rate, 0.05);
    }
}
