//! Startup configuration for a cake scene.
//!
//! Everything tunable lives in [`SceneConfig`]; `Default` reproduces the
//! values in `constants.rs`. Frontends may tweak fields (smaller counts on
//! low-end devices, a different seed) before building a [`crate::CakeScene`].

use crate::constants::*;
use crate::population::CakeTier;
use glam::Vec3;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ParticleCounts {
    pub body: usize,
    pub gifts: usize,
    pub ornaments: usize,
    pub confetti: usize,
    pub sparkles: usize,
    pub flame: usize,
}

impl Default for ParticleCounts {
    fn default() -> Self {
        Self {
            body: BODY_COUNT,
            gifts: GIFT_COUNT,
            ornaments: ORNAMENT_COUNT,
            confetti: CONFETTI_COUNT,
            sparkles: SPARKLE_COUNT,
            flame: FLAME_COUNT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub seed: u64,
    pub counts: ParticleCounts,
    /// Bottom to top.
    pub tiers: Vec<CakeTier>,
    pub scatter_radius: f32,
    pub scatter_height_center: f32,
    pub transition: Duration,
    pub texture_size: u32,
    /// World placement of the whole cake group.
    pub scene_offset: Vec3,
    pub scene_scale: f32,
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
    pub camera_fovy_radians: f32,
    /// Camera orbit speed while assembled, rad/s. Zero disables it.
    pub auto_rotate: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            counts: ParticleCounts::default(),
            tiers: default_tiers(),
            scatter_radius: SCATTER_RADIUS,
            scatter_height_center: SCATTER_HEIGHT_CENTER,
            transition: Duration::from_secs_f32(TRANSITION_SECONDS),
            texture_size: TEXTURE_SIZE,
            scene_offset: scene_offset_vec3(),
            scene_scale: SCENE_SCALE,
            camera_eye: Vec3::from(CAMERA_EYE),
            camera_target: Vec3::ZERO,
            camera_fovy_radians: CAMERA_FOV_DEGREES.to_radians(),
            auto_rotate: AUTO_ROTATE_RATE,
        }
    }
}

impl SceneConfig {
    /// Layout for viewports narrower than [`COMPACT_MAX_WIDTH`]: the camera
    /// pulls back and the cake is scaled up and lowered to stay in frame.
    pub fn compact() -> Self {
        Self {
            scene_offset: Vec3::from(COMPACT_SCENE_OFFSET),
            scene_scale: COMPACT_SCENE_SCALE,
            camera_eye: Vec3::from(COMPACT_CAMERA_EYE),
            ..Self::default()
        }
    }

    /// Picks [`SceneConfig::compact`] or the default from a viewport width
    /// in CSS pixels.
    pub fn for_viewport_width(width: f64) -> Self {
        if width < COMPACT_MAX_WIDTH {
            Self::compact()
        } else {
            Self::default()
        }
    }
}

pub fn default_tiers() -> Vec<CakeTier> {
    DEFAULT_TIERS
        .iter()
        .map(|t| CakeTier::new(t[0], t[1], t[2]))
        .collect()
}
