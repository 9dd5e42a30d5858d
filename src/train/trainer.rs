use crate::{
    error::{NetworkError, Result},
    layers::dense::Gradients,
    loss::mse::{one_hot, MseLoss},
    network::network::Network,
    optim::sgd::Sgd,
};

/// One step of online backpropagation towards `correct`.
///
/// Uses the activations of the last forward pass. Every layer is updated from
/// its own error signal, walking from the output back to the first hidden
/// layer, and every output row is pushed towards its one-hot target whether
/// it is the correct class or not.
///
/// All updates are computed before any weight changes, so any error leaves
/// the network exactly as it was.
pub fn train_on_example(network: &mut Network, correct: usize, optimizer: &Sgd) -> Result<()> {
    if let Err(err) = network.check_label(correct) {
        log::warn!("rejected training step: {err}");
        return Err(err);
    }
    if !network.propagated {
        log::warn!("rejected training step: activations are stale");
        return Err(NetworkError::NoForwardPass);
    }

    let lr = optimizer.learning_rate;
    let layers = &network.layers;
    let target = one_hot(network.output_layer().size, correct);
    let error = MseLoss::error(network.output_activations(), &target);

    // Output δ: (target - a) · tanh'(z)
    let mut delta = network.output_layer().delta(&error);
    let mut gradients: Vec<Gradients> = Vec::with_capacity(layers.len());

    for i in (0..layers.len()).rev() {
        let inputs = if i == 0 {
            network.inputs.as_slice()
        } else {
            layers[i - 1].neurons.as_slice()
        };
        gradients.push(layers[i].compute_gradients(&delta, inputs, lr));

        if i > 0 {
            // Propagate δ_i through the pre-update weights, then scale by the
            // lower layer's own derivative.
            let upstream = layers[i].backpropagate(&delta);
            delta = layers[i - 1].delta(&upstream);
        }
    }
    gradients.reverse();

    let accepted = layers.iter().zip(&gradients).all(|(layer, g)| layer.accepts(g));
    if !accepted {
        log::warn!("rejected training step: update is not finite (learning rate {lr})");
        return Err(NetworkError::NonFiniteUpdate);
    }

    for (layer, grads) in network.layers.iter_mut().zip(&gradients) {
        optimizer.step(layer, grads);
    }
    network.invalidate();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;
    use crate::network::spec::{NetworkSpec, WeightInit};
    use crate::testing::{filled, patterned_network};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn all_weights(network: &Network) -> Vec<Matrix> {
        network.layers.iter().map(|l| l.weights.clone()).collect()
    }

    #[test]
    fn update_matches_hand_computation() {
        let hidden = Matrix::from_rows(vec![vec![0.2, -0.1], vec![0.3, 0.4]]).unwrap();
        let output = Matrix::from_rows(vec![vec![0.5, -0.5]]).unwrap();
        let spec = NetworkSpec::new(2, 2, 1, 10, ["only"]);
        let mut net = Network::from_weights(spec, vec![hidden, output.clone()], None).unwrap();
        net.classify(&[0, 9]).unwrap(); // features [1, 1]

        let h = net.hidden_activations(0).to_vec();
        let z = net.output_layer().pre_neurons()[0];
        let a = net.output_activations()[0];
        let d_out = (1.0 - a) * (1.0 - (z * PI).tanh().powi(2));

        // Hidden δ uses the output weights before they move.
        let hz = net.layers[0].pre_neurons().to_vec();
        let d_hidden: Vec<f32> = (0..2)
            .map(|j| d_out * output[(0, j)] * (1.0 - (hz[j] * PI).tanh().powi(2)))
            .collect();

        train_on_example(&mut net, 0, &Sgd::new(0.1).unwrap()).unwrap();

        for j in 0..2 {
            assert_relative_eq!(net.output_weights()[(0, j)], output[(0, j)] + 0.1 * d_out * h[j], epsilon = 1e-6);
        }
        assert_relative_eq!(net.hidden_weights(0)[(0, 0)], 0.2 + 0.1 * d_hidden[0], epsilon = 1e-6);
        assert_relative_eq!(net.hidden_weights(0)[(1, 1)], 0.4 + 0.1 * d_hidden[1], epsilon = 1e-6);
    }

    #[test]
    fn interior_layer_update_matches_hand_computation() {
        let w1 = [[0.3f32, -0.2], [0.1, 0.4]];
        let w2 = [[0.5f32, -0.3], [0.2, 0.6]];
        let wo = [0.7f32, -0.4];
        let rows = |m: &[[f32; 2]; 2]| Matrix::from_rows(m.iter().map(|r| r.to_vec()).collect()).unwrap();
        let spec = NetworkSpec::new(2, 2, 2, 10, ["only"]);
        let weights = vec![rows(&w1), rows(&w2), Matrix::from_rows(vec![wo.to_vec()]).unwrap()];
        let mut net = Network::from_weights(spec, weights, None).unwrap();
        net.classify(&[0, 9]).unwrap(); // features [1, 1]

        let squash = |z: f32| (z * PI).tanh();
        let slope = |z: f32| 1.0 - squash(z).powi(2);
        let x = [1.0f32, 1.0];
        let z1: Vec<f32> = w1.iter().map(|r| r[0] * x[0] + r[1] * x[1]).collect();
        let h1: Vec<f32> = z1.iter().map(|&z| squash(z)).collect();
        let z2: Vec<f32> = w2.iter().map(|r| r[0] * h1[0] + r[1] * h1[1]).collect();
        let h2: Vec<f32> = z2.iter().map(|&z| squash(z)).collect();
        let zo = wo[0] * h2[0] + wo[1] * h2[1];
        assert_relative_eq!(net.output_activations()[0], squash(zo), epsilon = 1e-6);

        let d_out = (1.0 - squash(zo)) * slope(zo);
        let d2: Vec<f32> = (0..2).map(|j| d_out * wo[j] * slope(z2[j])).collect();
        let d1: Vec<f32> = (0..2)
            .map(|k| (d2[0] * w2[0][k] + d2[1] * w2[1][k]) * slope(z1[k]))
            .collect();

        let lr = 0.5;
        net.train_on_example(0, lr).unwrap();

        for j in 0..2 {
            for k in 0..2 {
                let expected = w2[j][k] + lr * d2[j] * h1[k];
                assert_relative_eq!(net.hidden_weights(1)[(j, k)], expected, epsilon = 1e-6);
            }
        }
        for k in 0..2 {
            for i in 0..2 {
                let expected = w1[k][i] + lr * d1[k] * x[i];
                assert_relative_eq!(net.hidden_weights(0)[(k, i)], expected, epsilon = 1e-6);
            }
        }
        for j in 0..2 {
            assert_relative_eq!(net.output_weights()[(0, j)], wo[j] + lr * d_out * h2[j], epsilon = 1e-6);
        }
    }

    #[test]
    fn every_layer_and_every_row_moves() {
        let spec = NetworkSpec::new(4, 5, 3, 100, ["a", "b", "c"]).with_bias(true);
        let weights = spec
            .weight_shapes()
            .into_iter()
            .map(|(rows, cols)| filled(rows, cols, 0.1))
            .collect();
        let biases = spec.weight_shapes().into_iter().map(|(rows, _)| vec![0.1; rows]).collect();
        let mut net = Network::from_weights(spec, weights, Some(biases)).unwrap();
        net.classify(&[5, 30, 30, 70, 90]).unwrap();
        let before = all_weights(&net);
        let biases_before: Vec<Vec<f32>> = (0..4).map(|l| net.biases(l).unwrap().to_vec()).collect();

        net.train_on_example(1, 0.2).unwrap();

        let after = all_weights(&net);
        for (layer, (b, a)) in before.iter().zip(&after).enumerate() {
            for row in 0..b.rows {
                assert_ne!(b.row(row), a.row(row), "layer {layer} row {row} did not move");
            }
            assert_ne!(net.biases(layer).unwrap(), biases_before[layer].as_slice());
        }
        // The correct class is pulled up, the others pushed down.
        assert!(after[3][(1, 0)] > before[3][(1, 0)]);
        assert!(after[3][(0, 0)] < before[3][(0, 0)]);
        assert!(after[3][(2, 0)] < before[3][(2, 0)]);
    }

    #[test]
    fn repeated_training_drives_cost_down() {
        let mut net = patterned_network(NetworkSpec::new(8, 6, 2, 1023, ["x", "y", "z"]));
        let burst = [100, 120, 130, 500, 510, 900, 1000, 1023];
        net.classify(&burst).unwrap();
        let initial = net.cost(2).unwrap();
        for _ in 0..1000 {
            net.train_on_example(2, 0.1).unwrap();
            net.forward().unwrap();
        }
        let cost = net.cost(2).unwrap();
        assert!(cost < initial);
        assert!(cost < 0.05, "cost stayed at {cost}");
        assert_eq!(net.response(), Some(2));
    }

    #[test]
    fn rejected_calls_leave_weights_alone() {
        let mut net = Network::new(NetworkSpec::new(4, 3, 2, 10, ["A", "B"]), &mut StdRng::seed_from_u64(9)).unwrap();
        net.classify(&[1, 2, 3]).unwrap();
        let before = all_weights(&net);

        assert!(matches!(
            net.train_on_example(2, 0.1),
            Err(NetworkError::InvalidLabel { index: 2, count: 2 })
        ));
        assert!(matches!(net.train_on_example(0, 0.0), Err(NetworkError::InvalidRate(_))));
        assert!(matches!(net.train_on_example(0, -1.0), Err(NetworkError::InvalidRate(_))));
        assert!(matches!(net.train_on_example(0, f32::NAN), Err(NetworkError::InvalidRate(_))));
        assert_eq!(all_weights(&net), before);
        assert!(net.is_propagated());

        net.train_on_example(0, 0.1).unwrap();
        let trained = all_weights(&net);
        assert!(matches!(net.train_on_example(0, 0.1), Err(NetworkError::NoForwardPass)));
        assert_eq!(all_weights(&net), trained);
    }

    #[test]
    fn overflowing_rate_is_refused_atomically() {
        // Hidden activations are all tanh(0.2π) and output 0 sits near -0.48,
        // so its δ exceeds 1 and the largest finite rate overflows.
        let spec = NetworkSpec::new(4, 3, 1, 10, ["A", "B"]);
        let mut net = Network::from_weights(spec, vec![filled(3, 4, 0.1), filled(2, 3, -0.1)], None).unwrap();
        net.classify(&[0, 0, 10, 10]).unwrap();
        let before = all_weights(&net);
        assert!(matches!(net.train_on_example(0, f32::MAX), Err(NetworkError::NonFiniteUpdate)));
        assert_eq!(all_weights(&net), before);
        assert!(net.is_propagated());
    }

    #[test]
    fn zero_init_without_bias_cannot_learn() {
        let spec = NetworkSpec::new(4, 3, 1, 10, ["A", "B"]).with_init(WeightInit::Zero);
        let mut net = Network::new(spec, &mut StdRng::seed_from_u64(0)).unwrap();
        net.classify(&[0, 0, 10, 10]).unwrap();
        assert_eq!(net.response(), Some(0));
        net.train_on_example(1, 0.5).unwrap();
        // Every hidden activation is tanh(0) = 0, so no gradient reaches any weight.
        assert!(all_weights(&net).iter().all(|m| m.as_slice().iter().all(|&w| w == 0.0)));
    }
}
