use crate::error::{NetworkError, Result};

/// Index of the most activated output neuron.
///
/// The scan keeps the first value that is strictly greater than the running
/// best, so ties always resolve to the lowest index. Values are compared with
/// plain `>`; the squashing function never produces NaN from finite weights.
pub fn most_likely(outputs: &[f32]) -> Result<usize> {
    if outputs.is_empty() {
        return Err(NetworkError::EmptyOutput);
    }
    let mut best = 0;
    for (i, &value) in outputs.iter().enumerate().skip(1) {
        if value > outputs[best] {
            best = i;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_largest() {
        assert_eq!(most_likely(&[-0.5, 0.9, 0.1]).unwrap(), 1);
        assert_eq!(most_likely(&[-0.9]).unwrap(), 0);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        assert_eq!(most_likely(&[0.2, 0.7, 0.7]).unwrap(), 1);
        assert_eq!(most_likely(&[0.0, 0.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn empty_output_is_an_error() {
        assert!(matches!(most_likely(&[]), Err(NetworkError::EmptyOutput)));
    }
}
