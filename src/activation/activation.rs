use std::f32::consts::PI;

/// Largest `f32` strictly below 1.
const SATURATION: f32 = 1.0 - f32::EPSILON / 2.0;

/// The squashing function: `tanh(π·x)`.
///
/// Scaling by π steepens tanh until it discriminates roughly like a logistic
/// sigmoid, without paying for an exponential. Trained weights depend on this
/// exact curve. In `f32` the raw tanh rounds to ±1 for large sums, so the
/// result is held one ulp inside the open interval (-1, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScaledTanh;

impl ScaledTanh {
    pub fn function(&self, x: f32) -> f32 {
        (x * PI).tanh().clamp(-SATURATION, SATURATION)
    }

    /// `1 - tanh(π·x)²`, taken at the pre-squash sum `x`.
    ///
    /// The constant π from the chain rule is left out; it is absorbed into the
    /// learning rate.
    pub fn derivative(&self, x: f32) -> f32 {
        let t = self.function(x);
        1.0 - t * t
    }
}
