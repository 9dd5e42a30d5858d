pub mod error;
pub mod math;
pub mod activation;
pub mod input;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod sensor;

#[cfg(test)]
pub(crate) mod testing;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ScaledTanh;
pub use input::encoder::InputEncoder;
pub use network::network::Network;
pub use network::spec::{NetworkSpec, WeightInit};
pub use sensor::{Clock, ManualClock, ReplaySource, SampleSource, SystemClock};
pub use train::{train_session, SessionReport, StopCondition, TrainConfig, TrainingSet};
