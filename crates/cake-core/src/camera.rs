//! Camera and picking rays.
//!
//! Everything here is platform-free so both frontends and the host tests
//! share one definition of the view.

use crate::config::SceneConfig;
use crate::shader::ViewTerms;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Right-handed camera with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// The same ray expressed in the space `world_to_local` maps into.
    /// The direction is not renormalized, so hit distances stay comparable
    /// with world-space ones.
    pub fn transformed(&self, world_to_local: &Mat4) -> Ray {
        Ray {
            origin: world_to_local.transform_point3(self.origin),
            dir: world_to_local.transform_vector3(self.dir),
        }
    }
}

impl Camera {
    pub fn from_config(cfg: &SceneConfig, aspect: f32) -> Self {
        Self {
            eye: cfg.camera_eye,
            target: cfg.camera_target,
            up: Vec3::Y,
            aspect,
            fovy_radians: cfg.camera_fovy_radians,
            znear: 0.1,
            zfar: 200.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Swings the eye around the vertical axis through the target.
    pub fn orbit(&mut self, angle: f32) {
        let offset = self.eye - self.target;
        self.eye = self.target + Quat::from_rotation_y(angle) * offset;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn view_terms(&self) -> ViewTerms {
        let forward = (self.target - self.eye).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        ViewTerms {
            view_proj: self.view_proj(),
            eye: self.eye,
            right,
            up,
        }
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1 = p_far.truncate() / p_far.w;
        Ray {
            origin: self.eye,
            dir: (p1 - self.eye).normalize_or_zero(),
        }
    }
}

/// Maps a normalized screen point (x right, y down, both in [0, 1]) to NDC.
#[inline]
pub fn ndc_from_screen(x: f32, y: f32) -> Vec2 {
    Vec2::new(2.0 * x - 1.0, 1.0 - 2.0 * y)
}

/// Cake group to world: uniform scale then offset.
pub fn scene_transform(cfg: &SceneConfig) -> Mat4 {
    Mat4::from_translation(cfg.scene_offset) * Mat4::from_scale(Vec3::splat(cfg.scene_scale))
}
