use crate::error::{NetworkError, Result};

/// Quantizes a burst of raw readings into a normalized histogram.
///
/// The domain `[0, max_input]` is split into `num_bins` bins of width
/// `max_input / num_bins` (integer division). Bin `i` covers
/// `[width * i, width * (i + 1))`; whatever truncation leaves over at the top,
/// `max_input` included, belongs to the last bin.
///
/// Each sample adds one to the bin it falls in, so features describe how the
/// readings are distributed, not how large they are. The fullest bin becomes
/// `1.0` and every other bin is scaled against it.
#[derive(Debug, Clone)]
pub struct InputEncoder {
    max_input: u16,
    bin_upper_bounds: Vec<u32>,
    bin_totals: Vec<u32>,
}

impl InputEncoder {
    /// Callers validate that `num_bins` is in `1..=max_input` beforehand.
    pub fn new(max_input: u16, num_bins: usize) -> InputEncoder {
        let width = u32::from(max_input) / num_bins as u32;
        let bin_upper_bounds = (1..=num_bins as u32).map(|i| width * i).collect();
        InputEncoder {
            max_input,
            bin_upper_bounds,
            bin_totals: vec![0; num_bins],
        }
    }

    pub fn max_input(&self) -> u16 {
        self.max_input
    }

    pub fn num_bins(&self) -> usize {
        self.bin_totals.len()
    }

    pub fn bin_upper_bounds(&self) -> &[u32] {
        &self.bin_upper_bounds
    }

    /// Per-bin counts from the last successful `encode`.
    pub fn bin_totals(&self) -> &[u32] {
        &self.bin_totals
    }

    /// Encodes `samples` into `features`, which must hold one slot per bin.
    ///
    /// On error `features` is left untouched.
    pub fn encode(&mut self, samples: &[u16], features: &mut [f32]) -> Result<()> {
        debug_assert_eq!(features.len(), self.num_bins());
        if samples.is_empty() {
            return Err(NetworkError::InvalidInput("sample burst is empty".into()));
        }
        if let Some(&bad) = samples.iter().find(|&&s| s > self.max_input) {
            return Err(NetworkError::InvalidInput(format!(
                "sample {bad} exceeds max input {}",
                self.max_input
            )));
        }

        let mut totals = vec![0u32; self.num_bins()];
        let last = totals.len() - 1;
        for &sample in samples {
            let bin = self
                .bin_upper_bounds
                .iter()
                .position(|&upper| u32::from(sample) < upper)
                .unwrap_or(last);
            totals[bin] += 1;
        }

        // First maximum wins, same scan as the classifier.
        let largest = totals.iter().copied().max().unwrap_or(0);
        if largest == 0 {
            return Err(NetworkError::InvalidInput("no sample fell into any bin".into()));
        }

        for (feature, &total) in features.iter_mut().zip(&totals) {
            *feature = total as f32 / largest as f32;
        }
        self.bin_totals = totals;
        log::trace!("encoded {} samples into bins {:?}", samples.len(), self.bin_totals);
        Ok(())
    }
}
