//! Cost and duration estimates derived from text geometry.
//!
//! Both estimators are pure functions of character count. The duration
//! estimate uses the theoretical minimum chunk count (length divided by the
//! limit), which undercounts against the chunker's actual output since the
//! chunker rounds up to sentence and paragraph boundaries. That gap is a
//! display concession, not a bug; callers that care print both numbers.

use serde::{Deserialize, Serialize};
use tts_client::QualityTier;

/// Cost per 1000 characters for each quality tier (USD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub standard_per_1k: f64,
    pub high_per_1k: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            standard_per_1k: 0.015,
            high_per_1k: 0.030,
        }
    }
}

impl RateTable {
    pub fn rate_for(&self, quality: QualityTier) -> f64 {
        match quality {
            QualityTier::Standard => self.standard_per_1k,
            QualityTier::High => self.high_per_1k,
        }
    }
}

/// Character count in Unicode scalar values, the unit the backend prices in.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Estimated cost of converting `text` at the given quality tier.
pub fn estimate_cost(text: &str, quality: QualityTier, rates: &RateTable) -> f64 {
    char_count(text) as f64 / 1000.0 * rates.rate_for(quality)
}

/// Theoretical minimum number of chunks for `text`.
pub fn predicted_chunk_count(text: &str, max_chunk_chars: usize) -> usize {
    char_count(text).div_ceil(max_chunk_chars)
}

/// Rough wall-clock estimate for a conversion run, in seconds.
pub fn estimate_duration_secs(
    text: &str,
    max_chunk_chars: usize,
    seconds_per_chunk: u64,
) -> u64 {
    predicted_chunk_count(text, max_chunk_chars) as u64 * seconds_per_chunk
}
