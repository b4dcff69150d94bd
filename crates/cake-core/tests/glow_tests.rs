// Host-side tests for the selective glow mirror.

use cake_core::glow::{blended_eligibility, eligibility_hash, emissive, rim_light, threshold};
use glam::Vec3;

#[test]
fn thresholds_favor_edge_particles() {
    assert_eq!(threshold(true), 0.7);
    assert_eq!(threshold(false), 0.9);
}

#[test]
fn hash_is_in_unit_range() {
    for i in 0..500 {
        let h = eligibility_hash(i as f32 * 0.0137, (i % 17) as f32);
        assert!((0.0..1.0).contains(&h));
    }
}

#[test]
fn eligibility_is_continuous_across_redraws() {
    // redraws happen every 2 s
    for k in 1..20 {
        let boundary = 2.0 * k as f32;
        for i in 0..50 {
            let offset = i as f32 / 50.0;
            for edge in [true, false] {
                let before = blended_eligibility(offset, boundary - 1e-3, edge);
                let after = blended_eligibility(offset, boundary + 1e-3, edge);
                assert!((before - after).abs() < 1e-2, "jump at t={boundary} offset={offset}");
            }
        }
    }
}

#[test]
fn edge_particles_are_eligible_more_often() {
    let count = |edge: bool| {
        (0..4000)
            .filter(|i| blended_eligibility(*i as f32 / 4000.0, 0.0, edge) > 0.5)
            .count()
    };
    let edge = count(true);
    let interior = count(false);
    assert!(edge > interior * 2, "edge {edge} interior {interior}");
}

#[test]
fn no_glow_without_highs() {
    for i in 0..100 {
        let e = emissive(i as f32 / 100.0, 3.3, true, 0.0);
        assert_eq!(e, Vec3::ZERO);
    }
}

#[test]
fn glow_is_warm_and_nonnegative() {
    let mut lit = 0;
    for i in 0..400 {
        let e = emissive(i as f32 / 400.0, 1.1, true, 1.0);
        assert!(e.x >= 0.0 && e.y >= 0.0 && e.z >= 0.0);
        if e.x > 0.0 {
            lit += 1;
            // gold (1.0, 0.6, 0.2)
            assert!((e.y / e.x - 0.6).abs() < 1e-4);
            assert!((e.z / e.x - 0.2).abs() < 1e-4);
        }
    }
    assert!(lit > 0);
}

#[test]
fn rim_only_on_edge_particles() {
    let cam = Vec3::new(0.0, 4.0, 14.0);
    let side = Vec3::new(3.0, 1.0, 0.0);
    assert_eq!(rim_light(side, cam, false), 0.0);
    let rim = rim_light(side, cam, true);
    assert!(rim > 0.0 && rim <= 0.2);
    // facing the camera head-on: no rim
    let front = Vec3::new(0.0, 4.0, 3.0);
    assert!(rim_light(front, cam, true) < 1e-4);
}
