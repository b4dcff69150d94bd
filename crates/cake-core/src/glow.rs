//! Host-side mirror of the selective emissive glow in `shaders/glow.wgsl`.
//!
//! Every two seconds each body particle redraws whether it may glow (30% of
//! rim particles, 10% of interior ones); eligibility cross-fades between
//! draws so nothing pops. Only the high band drives brightness.

use crate::constants::{
    EDGE_GLOW_BRIGHTNESS, EDGE_GLOW_THRESHOLD, GLOW_COLOR, GLOW_EXPONENT, GLOW_REACTIVITY,
    GLOW_TIME_SCALE, INTERIOR_GLOW_BRIGHTNESS, INTERIOR_GLOW_THRESHOLD, RIM_STRENGTH,
};
use glam::Vec3;

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn smoothstep01(x: f32) -> f32 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pseudo-random value in [0, 1) for a particle offset and a time step.
#[inline]
pub fn eligibility_hash(offset: f32, step: f32) -> f32 {
    fract((offset * 12.9898 + step * 78.233).sin() * 43758.5453)
}

pub fn threshold(is_edge: bool) -> f32 {
    if is_edge {
        EDGE_GLOW_THRESHOLD
    } else {
        INTERIOR_GLOW_THRESHOLD
    }
}

/// Eligibility in [0, 1], blended between consecutive draws.
pub fn blended_eligibility(offset: f32, time: f32, is_edge: bool) -> f32 {
    let scaled = time * GLOW_TIME_SCALE;
    let t1 = scaled.floor();
    let t2 = t1 + 1.0;
    let th = threshold(is_edge);
    let e1 = if eligibility_hash(offset, t1) >= th { 1.0 } else { 0.0 };
    let e2 = if eligibility_hash(offset, t2) >= th { 1.0 } else { 0.0 };
    let k = smoothstep01(fract(scaled));
    e1 + (e2 - e1) * k
}

/// Emissive radiance added to a body particle.
pub fn emissive(offset: f32, time: f32, is_edge: bool, high: f32) -> Vec3 {
    let eligible = blended_eligibility(offset, time, is_edge);
    if eligible <= 0.001 {
        return Vec3::ZERO;
    }
    let reactivity = high.max(0.0).powf(GLOW_EXPONENT) * GLOW_REACTIVITY;
    let pulse = 0.5 + 0.5 * (time * 3.0 + offset * 20.0).sin();
    let flicker = 0.7 + 0.3 * (time * 45.0 + offset * 137.0).sin();
    let base = if is_edge {
        EDGE_GLOW_BRIGHTNESS
    } else {
        INTERIOR_GLOW_BRIGHTNESS
    };
    Vec3::from(GLOW_COLOR) * (reactivity * pulse * flicker * base * eligible)
}

/// Non-blooming fresnel rim on edge particles; zero for interior ones.
pub fn rim_light(instance_pos: Vec3, camera_pos: Vec3, is_edge: bool) -> f32 {
    if !is_edge {
        return 0.0;
    }
    let radial = Vec3::new(instance_pos.x, 0.0, instance_pos.z);
    let view = camera_pos - instance_pos;
    if radial.length_squared() < 1e-12 || view.length_squared() < 1e-12 {
        return 0.0;
    }
    let facing = view.normalize().dot(radial.normalize()).abs();
    RIM_STRENGTH * (1.0 - facing).powi(3)
}
