use std::fmt;

use crate::error::{NetworkError, Result};
use crate::loss::mse::{one_hot, MseLoss};
use crate::network::network::Network;

/// Column view of every activation in the network, one layer per column.
///
/// Rendering never touches weights or activations.
pub struct NetworkReport<'a> {
    network: &'a Network,
}

impl<'a> fmt::Display for NetworkReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let net = self.network;
        let hidden_layers = net.num_hidden_layers();

        write!(f, "{:<12}", "Input")?;
        for layer in 0..hidden_layers {
            write!(f, "| {:<12}", format!("Hidden {}", layer + 1))?;
        }
        writeln!(f, "| Output")?;

        let spec = net.spec();
        let rows = spec
            .num_input_neurons
            .max(spec.num_hidden_neurons)
            .max(spec.num_output_neurons);
        for i in 0..rows {
            match net.input_activations().get(i) {
                Some(a) => write!(f, "{a:<12.3}")?,
                None => write!(f, "{:<12}", "")?,
            }
            for layer in 0..hidden_layers {
                match net.hidden_activations(layer).get(i) {
                    Some(a) => write!(f, "| {a:<12.3}")?,
                    None => write!(f, "| {:<12}", "")?,
                }
            }
            match net.output_activations().get(i) {
                Some(a) => writeln!(f, "| {a:.3}")?,
                None => writeln!(f, "|")?,
            }
        }

        match net.response() {
            Some(r) => write!(f, "I think this is output {r} which is {}", net.label(r).unwrap_or("?")),
            None => write!(f, "No current response"),
        }
    }
}

impl Network {
    pub fn report(&self) -> NetworkReport<'_> {
        NetworkReport { network: self }
    }

    /// Lists every `source -*-> weight` pair feeding one neuron, with the
    /// neuron's activation on the middle line.
    ///
    /// `layer` counts weight layers: `0..num_hidden_layers()` are the hidden
    /// layers and `num_hidden_layers()` is the output layer.
    pub fn neuron_details(&self, layer: usize, index: usize) -> Result<String> {
        let count = self.layers.len();
        let target = self
            .layers
            .get(layer)
            .ok_or(NetworkError::InvalidNeuron { layer, index, count })?;
        if index >= target.size {
            return Err(NetworkError::InvalidNeuron { layer, index, count: target.size });
        }
        let sources = if layer == 0 {
            self.inputs.as_slice()
        } else {
            self.layers[layer - 1].neurons.as_slice()
        };

        let activation = target.neurons[index];
        let middle = sources.len() / 2;
        let mut lines: Vec<String> = sources
            .iter()
            .zip(target.weights.row(index))
            .enumerate()
            .map(|(j, (source, weight))| {
                if j == middle {
                    format!("{source:.3} -*-> {weight:.3} | = {activation:.3}")
                } else {
                    format!("{source:.3} -*-> {weight:.3} |")
                }
            })
            .collect();
        if let Some(biases) = &target.biases {
            lines.push(format!("bias {:.3}", biases[index]));
        }
        Ok(lines.join("\n"))
    }

    /// The input bin behind one input neuron: its reading range, how many
    /// samples of the last burst fell in it and the resulting activation.
    pub fn input_neuron_details(&self, index: usize) -> Result<String> {
        let count = self.inputs.len();
        let activation = *self
            .inputs
            .get(index)
            .ok_or(NetworkError::InvalidInputNeuron { index, count })?;
        let bounds = self.encoder().bin_upper_bounds();
        let low = if index == 0 { 0 } else { bounds[index - 1] };
        let range = if index + 1 == count {
            format!("[{low}, {}]", self.encoder().max_input())
        } else {
            format!("[{low}, {})", bounds[index])
        };
        let samples = self.encoder().bin_totals().get(index).copied().unwrap_or(0);
        Ok(format!("Input neuron {index} {range}: {samples} samples = {activation:.3}"))
    }

    /// `target - activation` for every output neuron, for a one-hot target on `correct`.
    pub fn output_errors(&self, correct: usize) -> Result<Vec<f32>> {
        self.check_label(correct)?;
        let outputs = self.output_activations();
        Ok(MseLoss::error(outputs, &one_hot(outputs.len(), correct)))
    }
}
