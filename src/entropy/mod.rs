//! Byte statistics shared by the scalar providers.
//!
//! Histogram counting, Shannon entropy and a chunked window summary. All
//! functions are pure and allocation-light.

use serde::Serialize;

/// Calculates the Shannon entropy of a byte slice.
///
/// Returns a value between 0.0 (constant data) and 8.0 (uniform bytes).
#[inline]
pub fn shannon_entropy(data: &[u8]) -> f64 {
    Histogram::from_bytes(data).entropy()
}

/// Byte frequency histogram.
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: [u64; 256],
    total: u64,
}

impl Histogram {
    /// Creates a new empty histogram.
    #[inline]
    pub fn new() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }

    /// Creates a histogram from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hist = Self::new();
        for &byte in data {
            hist.add(byte);
        }
        hist
    }

    /// Adds a byte to the histogram.
    #[inline]
    pub fn add(&mut self, byte: u8) {
        self.counts[byte as usize] += 1;
        self.total += 1;
    }

    /// Per-byte-value counts, indexed by byte value.
    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    /// Returns the total number of bytes in the histogram.
    #[inline]
    pub fn len(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Calculates the entropy of the current histogram.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        let mut entropy = 0.0;
        for &count in &self.counts {
            if count == 0 {
                continue;
            }
            let p = (count as f64) / total;
            entropy -= p * p.log2();
        }
        entropy
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Entropy over fixed, non-overlapping windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub overall: f64,
    pub window_size: usize,
    pub windows: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Summarizes entropy of `data` in chunks of `window_size` bytes.
///
/// A trailing partial chunk is included. When the data fits in one window (or
/// `window_size` is zero) the window statistics equal the overall entropy.
pub fn window_summary(data: &[u8], window_size: usize) -> WindowSummary {
    let overall = shannon_entropy(data);
    if window_size == 0 || data.len() <= window_size {
        return WindowSummary {
            overall,
            window_size,
            windows: usize::from(!data.is_empty()),
            min: overall,
            max: overall,
            mean: overall,
        };
    }

    let entropies: Vec<f64> = data.chunks(window_size).map(shannon_entropy).collect();
    let min = entropies.iter().copied().fold(f64::INFINITY, f64::min);
    let max = entropies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = entropies.iter().sum::<f64>() / entropies.len() as f64;
    WindowSummary {
        overall,
        window_size,
        windows: entropies.len(),
        min,
        max,
        mean,
    }
}
