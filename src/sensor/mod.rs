pub mod clock;
pub mod source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use source::{ReplaySource, SampleSource};
