//! Spectrum to visual bands.
//!
//! Input is a snapshot of analyser byte bins (0-255, 64 bins for a 128-point
//! FFT). Output is three normalized bands plus the mean level used for
//! ambient light. There is no smoothing; each frame stands alone.

use crate::constants::{
    BASS_BINS, FALLBACK_LEVEL, FALLBACK_SWING, HIGH_BINS, HIGH_GAIN, MID_BINS, SPECTRUM_BINS,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioBands {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

impl AudioBands {
    pub fn average(&self) -> f32 {
        (self.bass + self.mid + self.high) / 3.0
    }
}

/// Mean of `bins[lo..hi]` over the bins that exist, in [0, 1].
fn band(bins: &[u8], (lo, hi): (usize, usize)) -> f32 {
    let hi = hi.min(bins.len());
    if lo >= hi {
        return 0.0;
    }
    let sum: u32 = bins[lo..hi].iter().map(|&b| b as u32).sum();
    sum as f32 / ((hi - lo) as f32 * 255.0)
}

pub fn extract_bands(bins: &[u8]) -> AudioBands {
    AudioBands {
        bass: band(bins, BASS_BINS),
        mid: band(bins, MID_BINS),
        high: (band(bins, HIGH_BINS) * HIGH_GAIN).min(1.0),
    }
}

/// Mean bin level over the whole snapshot, in [0, 1].
pub fn average_level(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / (bins.len() as f32 * 255.0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpectrumFrame {
    pub bands: AudioBands,
    /// Mean level in [0, 1], drives ambient light.
    pub average: f32,
    pub synthetic: bool,
}

/// Per-frame extractor with a synthetic fallback for when nothing is
/// connected, so the scene keeps breathing without audio.
#[derive(Debug, Default)]
pub struct SpectrumExtractor {
    fallback: Vec<u8>,
    warned: bool,
}

impl SpectrumExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&mut self, snapshot: Option<&[u8]>, time: f32) -> SpectrumFrame {
        match snapshot {
            Some(bins) => SpectrumFrame {
                bands: extract_bands(bins),
                average: average_level(bins),
                synthetic: false,
            },
            None => {
                if !self.warned {
                    log::info!("[audio] no analyser connected; using synthetic spectrum");
                    self.warned = true;
                }
                let level = (FALLBACK_LEVEL + time.sin() * FALLBACK_SWING).clamp(0.0, 255.0);
                self.fallback.clear();
                self.fallback.resize(SPECTRUM_BINS, level as u8);
                SpectrumFrame {
                    bands: extract_bands(&self.fallback),
                    average: level / 255.0,
                    synthetic: true,
                }
            }
        }
    }
}
