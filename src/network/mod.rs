pub mod classifier;
pub mod network;
pub mod report;
pub mod spec;

pub use classifier::most_likely;
pub use network::Network;
pub use report::NetworkReport;
pub use spec::{NetworkSpec, WeightInit};
