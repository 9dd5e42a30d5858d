pub mod mse;

pub use mse::{one_hot, MseLoss};
