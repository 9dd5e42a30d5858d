pub mod session;
pub mod session_report;
pub mod train_config;
pub mod trainer;
pub mod training_set;

pub use session::train_session;
pub use session_report::SessionReport;
pub use train_config::{StopCondition, TrainConfig};
pub use trainer::train_on_example;
pub use training_set::TrainingSet;
