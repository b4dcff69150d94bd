// Host-side tests for the gradient noise field.

use cake_core::noise::{fractal3, fractal3_periodic, noise3, noise3_periodic};

#[test]
fn fractal_at_origin_is_bounded_and_deterministic() {
    let a = fractal3(0.0, 0.0, 0.0, 4);
    let b = fractal3(0.0, 0.0, 0.0, 4);
    assert!((-1.0..=1.0).contains(&a));
    assert_eq!(a, b);
}

#[test]
fn zero_octaves_is_zero() {
    assert_eq!(fractal3(1.3, 2.7, 0.4, 0), 0.0);
    assert_eq!(fractal3_periodic(1.3, 2.7, 0.4, 0, 5), 0.0);
}

#[test]
fn lattice_points_are_zero() {
    for (x, y, z) in [(0.0, 0.0, 0.0), (1.0, 2.0, 3.0), (-4.0, 7.0, 11.0)] {
        assert!(noise3(x, y, z).abs() < 1e-6);
    }
}

#[test]
fn noise_stays_in_range() {
    let mut lo = f32::MAX;
    let mut hi = f32::MIN;
    for i in 0..2000 {
        let t = i as f32 * 0.173;
        let v = noise3(t, t * 0.71 + 3.1, t * 0.37 - 1.9);
        lo = lo.min(v);
        hi = hi.max(v);
    }
    assert!(lo >= -1.05 && hi <= 1.05, "range {lo}..{hi}");
    // not flat
    assert!(hi - lo > 0.5);
}

#[test]
fn periodic_noise_wraps_in_x_and_y() {
    let period = 5;
    for i in 0..50 {
        let x = i as f32 * 0.137;
        let y = i as f32 * 0.291;
        let z = 0.42;
        let base = noise3_periodic(x, y, z, period);
        assert!((base - noise3_periodic(x + 5.0, y, z, period)).abs() < 1e-4);
        assert!((base - noise3_periodic(x, y + 5.0, z, period)).abs() < 1e-4);
    }
}

#[test]
fn periodic_fractal_keeps_base_period() {
    for i in 0..50 {
        let x = i as f32 * 0.173;
        let y = i as f32 * 0.059;
        let a = fractal3_periodic(x, y, 0.0, 4, 5);
        let b = fractal3_periodic(x + 5.0, y + 5.0, 0.0, 4, 5);
        assert!((a - b).abs() < 1e-3, "{a} vs {b}");
    }
}
