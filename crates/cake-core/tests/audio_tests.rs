// Host-side tests for spectrum band extraction.

use cake_core::audio::{average_level, extract_bands, AudioBands, SpectrumExtractor};

#[test]
fn silence_is_zero() {
    let bands = extract_bands(&[0u8; 64]);
    assert_eq!(bands, AudioBands::default());
    assert_eq!(average_level(&[0u8; 64]), 0.0);
}

#[test]
fn full_scale_saturates_with_high_clamped() {
    let bands = extract_bands(&[255u8; 64]);
    assert_eq!(bands.bass, 1.0);
    assert_eq!(bands.mid, 1.0);
    assert_eq!(bands.high, 1.0);
    assert_eq!(average_level(&[255u8; 64]), 1.0);
}

#[test]
fn bands_read_their_own_bins() {
    let mut bins = [0u8; 64];
    for b in &mut bins[0..5] {
        *b = 255;
    }
    let bands = extract_bands(&bins);
    assert_eq!(bands.bass, 1.0);
    assert_eq!(bands.mid, 0.0);
    assert_eq!(bands.high, 0.0);
}

#[test]
fn bin_thirty_is_ignored() {
    let mut bins = [0u8; 64];
    bins[30] = 255;
    let bands = extract_bands(&bins);
    assert_eq!(bands.mid, 0.0);
    assert_eq!(bands.high, 0.0);
}

#[test]
fn high_band_is_boosted() {
    let mut bins = [0u8; 64];
    for b in &mut bins[31..64] {
        *b = 51;
    }
    let bands = extract_bands(&bins);
    // 51 / 255 = 0.2, tripled
    assert!((bands.high - 0.6).abs() < 1e-5);
}

#[test]
fn short_snapshots_average_existing_bins() {
    let bins = [255u8; 10];
    let bands = extract_bands(&bins);
    assert_eq!(bands.bass, 1.0);
    assert_eq!(bands.mid, 1.0);
    assert_eq!(bands.high, 0.0);
    assert_eq!(extract_bands(&[]), AudioBands::default());
}

#[test]
fn missing_source_uses_synthetic_level() {
    let mut ex = SpectrumExtractor::new();
    let frame = ex.extract(None, 0.0);
    assert!(frame.synthetic);
    // 20 / 255 in every bin
    let expected = 20.0 / 255.0;
    assert!((frame.bands.bass - expected).abs() < 1e-3);
    assert!((frame.bands.mid - expected).abs() < 1e-3);
    assert!((frame.average - expected).abs() < 1e-3);

    let later = ex.extract(None, std::f32::consts::FRAC_PI_2);
    assert!(later.bands.bass > frame.bands.bass);
}

#[test]
fn live_source_is_not_synthetic() {
    let mut ex = SpectrumExtractor::new();
    let frame = ex.extract(Some(&[128u8; 64]), 1.0);
    assert!(!frame.synthetic);
    assert!((frame.average - 128.0 / 255.0).abs() < 1e-6);
}
