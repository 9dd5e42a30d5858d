//! Error types for the network engine.

/// Everything that can go wrong while building, feeding or training a network.
#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    /// A weight matrix or label list does not match the layer it belongs to
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The requested topology cannot be built at all
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// The sample burst cannot be encoded
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("label index {index} out of range for {count} output neurons")]
    InvalidLabel { index: usize, count: usize },

    #[error("learning rate must be finite and positive, got {0}")]
    InvalidRate(f32),

    #[error("output layer has no neurons")]
    EmptyOutput,

    /// Training was requested without a current forward pass
    #[error("no forward pass since the last input or weight update")]
    NoForwardPass,

    /// The computed update would write NaN or infinity into the weights
    #[error("weight update is not finite")]
    NonFiniteUpdate,

    /// A forward pass produced NaN; the weights are no longer usable
    #[error("forward pass produced a non-finite activation")]
    NonFiniteActivation,

    #[error("neuron {index} out of range for layer {layer} ({count} neurons)")]
    InvalidNeuron {
        layer: usize,
        index: usize,
        count: usize,
    },

    #[error("input neuron {index} out of range ({count} input neurons)")]
    InvalidInputNeuron { index: usize, count: usize },

    /// A sample source failed to deliver a burst
    #[error("sample source failed: {0}")]
    Source(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
