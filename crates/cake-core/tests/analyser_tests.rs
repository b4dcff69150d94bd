// Host-side tests for the PCM byte analyser.

use cake_core::analyser::{blackman_window, magnitude_to_byte, ByteAnalyser};
use cake_core::audio::extract_bands;
use std::f32::consts::TAU;

fn sine_at_bin(bin: usize, n: usize, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (TAU * bin as f32 * i as f32 / n as f32).sin())
        .collect()
}

#[test]
fn default_matches_the_web_snapshot_shape() {
    let a = ByteAnalyser::default();
    assert_eq!(a.fft_size(), 128);
    assert_eq!(a.bin_count(), 64);
    assert_eq!(a.smoothing, 0.8);
}

#[test]
fn odd_sizes_round_up() {
    assert_eq!(ByteAnalyser::new(0).fft_size(), 2);
    assert_eq!(ByteAnalyser::new(63).fft_size(), 64);
}

#[test]
fn window_is_zero_at_the_edge_and_one_in_the_middle() {
    let w = blackman_window(128);
    assert!(w[0].abs() < 1e-6);
    assert!((w[64] - 1.0).abs() < 1e-5);
    assert!(w.iter().all(|&x| (-1e-6..=1.0 + 1e-6).contains(&x)));
}

#[test]
fn byte_mapping_covers_the_db_range() {
    assert_eq!(magnitude_to_byte(0.0, -100.0, -30.0), 0);
    assert_eq!(magnitude_to_byte(1.0, -100.0, -30.0), 255);
    // -65 dB is the midpoint
    let mid = 10f32.powf(-65.0 / 20.0);
    let b = magnitude_to_byte(mid, -100.0, -30.0);
    assert!((126..=128).contains(&b), "{b}");
}

#[test]
fn silence_is_all_zero() {
    let mut a = ByteAnalyser::default();
    let mut out = [7u8; 64];
    a.analyse(&[0.0; 128], &mut out);
    assert!(out.iter().all(|&b| b == 0));
    assert_eq!(extract_bands(&out).bass, 0.0);
}

#[test]
fn sine_lights_its_own_bin() {
    let mut a = ByteAnalyser::default();
    let samples = sine_at_bin(8, 128, 128);
    let mut out = [0u8; 64];
    for _ in 0..20 {
        a.analyse(&samples, &mut out);
    }
    assert_eq!(out[8], 255);
    assert!(out[40] < 100, "far bin {}", out[40]);
}

#[test]
fn low_tone_shows_up_as_bass() {
    let mut a = ByteAnalyser::default();
    let samples = sine_at_bin(2, 128, 128);
    let mut out = [0u8; 64];
    for _ in 0..20 {
        a.analyse(&samples, &mut out);
    }
    let bands = extract_bands(&out);
    assert!(bands.bass > bands.high);
    assert!(bands.bass > 0.5);
}

#[test]
fn smoothing_ramps_toward_steady_state() {
    let mut a = ByteAnalyser::default();
    a.min_db = -60.0;
    a.max_db = 0.0;
    let samples = sine_at_bin(8, 128, 128);
    let mut first = [0u8; 64];
    a.analyse(&samples, &mut first);
    let mut later = [0u8; 64];
    for _ in 0..30 {
        a.analyse(&samples, &mut later);
    }
    assert!(first[8] < later[8]);

    a.reset();
    let mut again = [0u8; 64];
    a.analyse(&samples, &mut again);
    assert_eq!(again[8], first[8]);
}

#[test]
fn short_and_long_inputs_are_handled() {
    let mut a = ByteAnalyser::default();
    let mut out = [0u8; 64];
    a.analyse(&[0.5; 10], &mut out);
    // only the newest 128 samples count
    let mut b = ByteAnalyser::default();
    let mut long = vec![1.0; 1000];
    long.extend(std::iter::repeat(0.0).take(128));
    let mut silent = [9u8; 64];
    b.analyse(&long, &mut silent);
    assert!(silent.iter().all(|&x| x == 0));
}

#[test]
fn short_output_gets_a_prefix() {
    let mut a = ByteAnalyser::default();
    a.smoothing = 0.0;
    let samples = sine_at_bin(3, 128, 128);
    let mut full = [0u8; 64];
    a.analyse(&samples, &mut full);
    let mut part = [0u8; 8];
    a.analyse(&samples, &mut part);
    assert_eq!(&part[..], &full[..8]);
}
