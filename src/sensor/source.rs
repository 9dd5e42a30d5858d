use crate::error::{NetworkError, Result};

/// Anything that can deliver bursts of raw readings, usually an ADC pin.
pub trait SampleSource {
    /// Called once before the bursts of each label are collected, so an
    /// interactive source can ask the operator to present that material.
    fn prepare(&mut self, _label: usize, _name: &str) -> Result<()> {
        Ok(())
    }

    /// Fills `burst` with raw readings in `[0, max_input]`.
    fn read_burst(&mut self, burst: &mut [u16]) -> Result<()>;
}

/// Plays back prerecorded bursts in order, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    bursts: Vec<Vec<u16>>,
    next: usize,
}

impl ReplaySource {
    pub fn new(bursts: Vec<Vec<u16>>) -> ReplaySource {
        ReplaySource { bursts, next: 0 }
    }
}

impl SampleSource for ReplaySource {
    fn read_burst(&mut self, burst: &mut [u16]) -> Result<()> {
        let recorded = self
            .bursts
            .get(self.next)
            .ok_or_else(|| NetworkError::Source("no recorded bursts".into()))?;
        if recorded.len() != burst.len() {
            return Err(NetworkError::Source(format!(
                "recorded burst has {} samples, {} requested",
                recorded.len(),
                burst.len()
            )));
        }
        burst.copy_from_slice(recorded);
        self.next = (self.next + 1) % self.bursts.len();
        Ok(())
    }
}
