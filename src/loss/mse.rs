pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f32], expected: &[f32]) -> f32 {
        let n = predicted.len() as f32;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>() / n
    }

    /// MSE against a target of 1 for `correct` and 0 everywhere else.
    pub fn one_hot_loss(predicted: &[f32], correct: usize) -> f32 {
        MseLoss::loss(predicted, &one_hot(predicted.len(), correct))
    }

    /// Per-output error in activation space: expected - predicted
    pub fn error(predicted: &[f32], expected: &[f32]) -> Vec<f32> {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| b - a)
            .collect()
    }
}

pub fn one_hot(len: usize, index: usize) -> Vec<f32> {
    let mut target = vec![0.0; len];
    if let Some(t) = target.get_mut(index) {
        *t = 1.0;
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn one_hot_loss_against_target() {
        assert_relative_eq!(MseLoss::one_hot_loss(&[0.5, -0.5], 0), 0.25);
        assert_relative_eq!(MseLoss::one_hot_loss(&[1.0, 0.0, 0.0], 0), 0.0);
        assert_relative_eq!(MseLoss::one_hot_loss(&[-1.0, 1.0], 0), 2.5);
    }

    #[test]
    fn error_is_target_minus_activation() {
        let e = MseLoss::error(&[0.25, -0.5], &one_hot(2, 1));
        assert_relative_eq!(e.as_slice(), [-0.25f32, 1.5].as_slice());
    }
}
