//! PCM to byte spectrum, for hosts without a WebAudio `AnalyserNode`.
//!
//! Produces the same kind of snapshot the browser hands the web front-end:
//! Blackman window, magnitude scaled by 1/N, exponential smoothing over
//! frames, then decibels mapped linearly onto 0..=255.

use crate::constants::{ANALYSER_FFT_SIZE, ANALYSER_MAX_DB, ANALYSER_MIN_DB, ANALYSER_SMOOTHING};
use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Periodic Blackman window (alpha = 0.16).
pub fn blackman_window(n: usize) -> Vec<f32> {
    let two_pi = std::f32::consts::TAU;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            0.42 - 0.5 * (two_pi * x).cos() + 0.08 * (2.0 * two_pi * x).cos()
        })
        .collect()
}

/// Maps a magnitude onto a byte over `[min_db, max_db]`.
#[inline]
pub fn magnitude_to_byte(magnitude: f32, min_db: f32, max_db: f32) -> u8 {
    let db = 20.0 * magnitude.log10();
    let scaled = (db - min_db) * 255.0 / (max_db - min_db);
    // -inf (silence) and NaN both land on 0
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, 255.0).floor() as u8
}

pub struct ByteAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex32>,
    smoothed: Vec<f32>,
    pub smoothing: f32,
    pub min_db: f32,
    pub max_db: f32,
}

impl std::fmt::Debug for ByteAnalyser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteAnalyser")
            .field("fft_size", &self.window.len())
            .field("smoothing", &self.smoothing)
            .finish()
    }
}

impl Default for ByteAnalyser {
    fn default() -> Self {
        Self::new(ANALYSER_FFT_SIZE)
    }
}

impl ByteAnalyser {
    /// `fft_size` is rounded up to an even size of at least 2.
    pub fn new(fft_size: usize) -> Self {
        let n = fft_size.max(2).next_multiple_of(2);
        let mut planner = FftPlanner::<f32>::new();
        Self {
            fft: planner.plan_fft_forward(n),
            window: blackman_window(n),
            scratch: vec![Complex32::new(0.0, 0.0); n],
            smoothed: vec![0.0; n / 2],
            smoothing: ANALYSER_SMOOTHING,
            min_db: ANALYSER_MIN_DB,
            max_db: ANALYSER_MAX_DB,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Clears the smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|m| *m = 0.0);
    }

    /// Analyses the newest `fft_size` samples of `samples` (zero padded in
    /// front when shorter) and writes `min(out.len(), bin_count)` bytes.
    pub fn analyse(&mut self, samples: &[f32], out: &mut [u8]) {
        let n = self.fft_size();
        let tail = &samples[samples.len().saturating_sub(n)..];
        let pad = n - tail.len();
        for (i, c) in self.scratch.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { tail[i - pad] };
            *c = Complex32::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 1.0 / n as f32;
        let tau = self.smoothing.clamp(0.0, 1.0);
        for (k, m) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.scratch[k].norm() * scale;
            *m = tau * *m + (1.0 - tau) * magnitude;
            if !m.is_finite() {
                *m = 0.0;
            }
        }
        for (byte, &m) in out.iter_mut().zip(&self.smoothed) {
            *byte = magnitude_to_byte(m, self.min_db, self.max_db);
        }
    }
}
