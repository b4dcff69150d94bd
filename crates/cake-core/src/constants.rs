use glam::Vec3;

// Shared tuning constants used by the core and both frontends.

// Population sizes
pub const BODY_COUNT: usize = 12_000;
pub const GIFT_COUNT: usize = 80;
pub const ORNAMENT_COUNT: usize = 100;
pub const CONFETTI_COUNT: usize = 1_500;
pub const SPARKLE_COUNT: usize = 300;
pub const FLAME_COUNT: usize = 350;

// Tiers, bottom to top: (radius, height, vertical offset)
pub const DEFAULT_TIERS: [[f32; 3]; 3] = [[3.2, 1.4, 0.7], [2.1, 1.4, 2.1], [1.1, 1.4, 3.5]];

// Scatter volume
pub const SCATTER_RADIUS: f32 = 12.0;
pub const SCATTER_HEIGHT_CENTER: f32 = 3.0;

// Body layout
pub const EDGE_FRACTION: f32 = 0.35; // share of body particles sitting on the rim
pub const INTERIOR_RADIUS_FACTOR: f32 = 0.9;

// Assembly transition
pub const TRANSITION_SECONDS: f32 = 3.0;
pub const BREATHE_THRESHOLD: f32 = 0.9; // progress above which the assembled cake breathes
pub const DRIFT_THRESHOLD: f32 = 0.2; // progress below which scattered pieces drift
pub const ORBIT_THRESHOLD: f32 = 0.5; // confetti switches from wobble to orbit
pub const SPARKLE_THRESHOLD: f32 = 0.8; // sparkles only run once mostly assembled
pub const BODY_SPIN_RATE: f32 = 0.2;
pub const SPARKLE_SPIN_RATE: f32 = 0.1;

// Candle
pub const CANDLE_SETTLE_AT: f32 = 0.96; // progress at which the candle lands and lights
pub const CANDLE_LIFT: f32 = 0.1; // gap between the top tier and the candle base

// Audio bands (64-bin analyser snapshot)
pub const SPECTRUM_BINS: usize = 64;
pub const BASS_BINS: (usize, usize) = (0, 5);
pub const MID_BINS: (usize, usize) = (5, 30);
// Bin 30 is skipped; the band edges were tuned by ear.
pub const HIGH_BINS: (usize, usize) = (31, 64);
pub const HIGH_GAIN: f32 = 3.0;
pub const FALLBACK_LEVEL: f32 = 20.0;
pub const FALLBACK_SWING: f32 = 10.0;
// Byte analyser, same defaults as a WebAudio AnalyserNode
pub const ANALYSER_FFT_SIZE: usize = SPECTRUM_BINS * 2;
pub const ANALYSER_SMOOTHING: f32 = 0.8;
pub const ANALYSER_MIN_DB: f32 = -100.0;
pub const ANALYSER_MAX_DB: f32 = -30.0;

// Glow
pub const EDGE_GLOW_THRESHOLD: f32 = 0.7;
pub const INTERIOR_GLOW_THRESHOLD: f32 = 0.9;
pub const GLOW_TIME_SCALE: f32 = 0.5;
pub const GLOW_REACTIVITY: f32 = 15.0;
pub const GLOW_EXPONENT: f32 = 2.5;
pub const EDGE_GLOW_BRIGHTNESS: f32 = 8.0;
pub const INTERIOR_GLOW_BRIGHTNESS: f32 = 4.0;
pub const GLOW_COLOR: [f32; 3] = [1.0, 0.6, 0.2];
pub const RIM_STRENGTH: f32 = 0.2;

// Interaction feedback
pub const HOVER_TINT_HEX: u32 = 0xFFFF99;
pub const GIFT_HOVER_SCALE: f32 = 1.2;
pub const ORNAMENT_HOVER_SCALE: f32 = 1.4;

// Textures
pub const TEXTURE_SIZE: u32 = 512;
pub const MAX_TEXTURE_SIZE: u32 = 4096;
pub const FROSTING_CELLS: u32 = 5;
pub const FROSTING_GRAIN_CELLS: u32 = 50;
pub const FROSTING_BASE: [u8; 3] = [0xFF, 0xC1, 0xE3];
pub const FROSTING_HIGHLIGHT: [u8; 3] = [0xFF, 0xF0, 0xF5];

// Scene placement and camera
pub const SCENE_OFFSET: [f32; 3] = [0.0, -3.2, 0.0];
pub const SCENE_SCALE: f32 = 1.5;
pub const CAMERA_EYE: [f32; 3] = [0.0, 4.0, 14.0];
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
// Orbit of the camera around the assembled cake, rad/s.
pub const AUTO_ROTATE_RATE: f32 = 0.5 * std::f32::consts::TAU / 60.0;

// Narrow viewports
pub const COMPACT_MAX_WIDTH: f64 = 768.0;
pub const COMPACT_CAMERA_EYE: [f32; 3] = [0.0, 8.0, 32.0];
pub const COMPACT_SCENE_SCALE: f32 = 2.1;
pub const COMPACT_SCENE_OFFSET: [f32; 3] = [0.0, -4.5, 0.0];

#[inline]
pub fn scene_offset_vec3() -> Vec3 {
    Vec3::from(SCENE_OFFSET)
}
