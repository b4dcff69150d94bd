//! Per-frame transforms for every particle class.
//!
//! Each class has one update function; [`UPDATERS`] maps a
//! [`ParticleClass`] to it. An update reads the class records and the
//! frame input and writes world (cake-space) transforms into that class's
//! [`InstanceBuffer`], marking it dirty once.

use crate::audio::AudioBands;
use crate::buffers::{CandleLight, InstanceBuffer, InstanceData, SceneBuffers};
use crate::color::{hex_linear, mix};
use crate::constants::*;
use crate::interaction::InstanceRef;
use crate::population::{Candle, ParticleClass, Populations, FLAME_BASE_Y};
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// Seconds since the scene started.
    pub time: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub progress: f32,
    pub bands: AudioBands,
    /// Mean spectrum level in [0, 1].
    pub level: f32,
    pub hovered: Option<InstanceRef>,
    pub pinching: bool,
}

pub type Updater = fn(&mut Animator, &mut Populations, &FrameInput, &mut InstanceBuffer);

/// Indexed by [`ParticleClass::index`].
pub const UPDATERS: [Updater; 6] = [
    update_body,
    update_gifts,
    update_ornaments,
    update_confetti,
    update_sparkles,
    update_flame,
];

const SPARKLE_PHASE_RATE: f32 = 0.6; // phase units per second at speed 1
const SPARKLE_RISE: f32 = 0.18; // world units per second
const SPARKLE_RESPAWN_BELOW: f32 = -0.9;
const FLAME_POINT_SCALE: f32 = 0.004;
const FLAME_ALPHA: f32 = 0.4;
const CANDLE_LIGHT_COLORS: [u32; 3] = [0xFF2200, 0xFFAA00, 0xFFEFD5];

pub struct Animator {
    rng: StdRng,
    candle_light: CandleLight,
}

impl Animator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            candle_light: CandleLight::default(),
        }
    }

    pub fn animate(&mut self, pops: &mut Populations, input: &FrameInput, buffers: &mut SceneBuffers) {
        for class in ParticleClass::ALL {
            let update = UPDATERS[class.index()];
            update(self, pops, input, buffers.class_mut(class));
        }
        let pose = candle_pose(&pops.candle, input.progress, input.time);
        buffers.candle.write(0, InstanceData::new(pose.model, [1.0; 4]));
        buffers.candle.mark_dirty();
        buffers.candle.set_visible(true);

        self.flicker(input, pose.flame_opacity);
        buffers.lighting.ambient = 0.2 + input.level * 0.15;
        buffers.lighting.key = 1.0 + input.level * 0.5;
        buffers.lighting.candle = self.candle_light;
        buffers.lighting.candle_model = pose.model.to_cols_array_2d();
    }

    pub fn candle_light(&self) -> CandleLight {
        self.candle_light
    }

    fn flicker(&mut self, input: &FrameInput, flame: f32) {
        let t = input.time;
        let drafts = (t * 2.5).sin() * 0.1 + (t * 1.3).cos() * 0.1;
        let jitter = (self.rng.gen::<f32>() - 0.5) * 0.15;
        let gust = if self.rng.gen::<f32>() > 0.98 { -0.4 } else { 0.0 };
        let noise = drafts + jitter + gust;

        let target = (1.2 + noise).clamp(0.3, 2.0) * flame;
        let light = &mut self.candle_light;
        // drops fast, recovers slower; rates tuned at 60 fps
        let per_frame: f32 = if target < light.intensity { 0.4 } else { 0.2 };
        let k = 1.0 - (1.0 - per_frame).powf((input.dt * 60.0).max(0.0));
        light.intensity += (target - light.intensity) * k;
        light.range = (1.5 + noise * 0.4) * flame;

        let warmth = (light.intensity - 0.5).clamp(0.0, 1.0);
        let [low, mid, high] = CANDLE_LIGHT_COLORS.map(hex_linear);
        light.color = if warmth < 0.5 {
            mix(low, mid, warmth * 2.0)
        } else {
            mix(mid, high, (warmth - 0.5) * 2.0)
        };
        light.position = Vec3::new(
            (t * 15.0).sin() * 0.02 * flame,
            0.55 + noise * 0.03,
            (t * 11.0).cos() * 0.02 * flame,
        );
    }
}

/// Rotate about the vertical axis the way the whole cake spins.
#[inline]
pub fn spin_y(p: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(p.x * c - p.z * s, p.y, p.x * s + p.z * c)
}

/// Weight of the scattered-state drift: 1 at progress 0, fading to 0 at
/// [`DRIFT_THRESHOLD`].
#[inline]
pub fn drift_weight(progress: f32) -> f32 {
    (1.0 - progress / DRIFT_THRESHOLD).clamp(0.0, 1.0)
}

/// Model matrix for a disc at `pos` whose normal faces the vertical axis.
pub fn face_axis(pos: Vec3) -> Mat4 {
    let inward = Vec3::new(-pos.x, 0.0, -pos.z);
    if inward.length_squared() < 1e-12 {
        return Mat4::from_translation(pos);
    }
    let z = inward.normalize();
    let x = Vec3::Y.cross(z).normalize();
    let y = z.cross(x);
    Mat4::from_cols(x.extend(0.0), y.extend(0.0), z.extend(0.0), pos.extend(1.0))
}

/// Instance colour for a decoration; hovered ones take the #FFFF99 tint.
pub fn hover_tint(hovered: bool) -> [f32; 4] {
    if hovered {
        let [r, g, b] = hex_linear(HOVER_TINT_HEX);
        [r, g, b, 1.0]
    } else {
        [1.0; 4]
    }
}

/// Scale multiplier for an interactive instance.
pub fn interaction_scale(hover_gain: f32, hovered: bool, pinching: bool, time: f32) -> f32 {
    if !hovered {
        return 1.0;
    }
    let pulse = if pinching {
        1.0 + (time * 15.0).sin() * 0.2
    } else {
        1.0
    };
    hover_gain * pulse
}

fn is_hovered(input: &FrameInput, class: ParticleClass, index: usize) -> bool {
    input.hovered == Some(InstanceRef { class, index })
}

fn update_body(_: &mut Animator, pops: &mut Populations, input: &FrameInput, buf: &mut InstanceBuffer) {
    let t = input.progress;
    let time = input.time;
    let rot_y = time * BODY_SPIN_RATE * t;
    let avg = input.bands.average();
    let drift = drift_weight(t);
    for (i, p) in pops.body.iter().enumerate() {
        let mut pos = p.start.lerp(p.target, t);
        if t > BREATHE_THRESHOLD {
            let seed = p.phase;
            pos.x += (time * 0.8 + seed).sin() * 0.05;
            pos.y += (time * 0.5 + seed).cos() * 0.05;
            pos.z += (time * 0.6 + seed).sin() * 0.05;
            // beat bounce
            pos.y += (time * 3.0 + pos.y * 2.0).sin() * 0.03 * (1.0 + avg);
        } else if drift > 0.0 {
            pos.y += (time * 3.0 + p.phase).sin() * 0.05 * drift;
        }
        let pos = spin_y(pos, rot_y);
        buf.write(i, InstanceData::new(face_axis(pos), [1.0; 4]));
    }
    buf.mark_dirty();
    buf.set_visible(true);
}

fn update_gifts(_: &mut Animator, pops: &mut Populations, input: &FrameInput, buf: &mut InstanceBuffer) {
    let t = input.progress;
    let time = input.time;
    let rot_y = time * BODY_SPIN_RATE * t;
    let drift = drift_weight(t);
    for (i, g) in pops.gifts.iter().enumerate() {
        let mut pos = g.start.lerp(g.target, t);
        if drift > 0.0 {
            pos.y += (time * 2.0 + g.phase).sin() * 0.1 * drift;
        }
        let pos = spin_y(pos, rot_y);
        let r = g.base_rotation;
        let rot = Quat::from_euler(EulerRot::XYZ, r.x, r.y + (1.0 - t) * time + rot_y, r.z);
        let hovered = is_hovered(input, ParticleClass::Gift, i);
        let scale = g.scale * interaction_scale(GIFT_HOVER_SCALE, hovered, input.pinching, time);
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(scale), rot, pos);
        buf.write(i, InstanceData::new(model, hover_tint(hovered)));
    }
    buf.mark_dirty();
    buf.set_visible(true);
}

fn update_ornaments(
    _: &mut Animator,
    pops: &mut Populations,
    input: &FrameInput,
    buf: &mut InstanceBuffer,
) {
    let t = input.progress;
    let time = input.time;
    let rot_y = time * BODY_SPIN_RATE * t;
    let drift = drift_weight(t);
    let rot = Quat::from_euler(EulerRot::XYZ, time * 0.5, time * 0.3, 0.0);
    for (i, o) in pops.ornaments.iter().enumerate() {
        let mut pos = o.start.lerp(o.target, t);
        if t > BREATHE_THRESHOLD {
            // vibrate with the bass
            let seed = o.phase * 13.0;
            let amp = 0.08 + input.bands.bass * 0.05;
            pos.x += (time * 0.9 + seed).sin() * amp;
            pos.y += (time * 0.7 + seed).cos() * amp;
            pos.z += (time * 0.8 + seed).sin() * amp;
        } else if drift > 0.0 {
            pos.y += (time * 1.5 + o.phase).sin() * 0.1 * drift;
        }
        let pos = spin_y(pos, rot_y);
        let hovered = is_hovered(input, ParticleClass::Ornament, i);
        let scale =
            o.scale * interaction_scale(ORNAMENT_HOVER_SCALE, hovered, input.pinching, time);
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(scale), rot, pos);
        buf.write(i, InstanceData::new(model, hover_tint(hovered)));
    }
    buf.mark_dirty();
    buf.set_visible(true);
}

fn update_confetti(
    _: &mut Animator,
    pops: &mut Populations,
    input: &FrameInput,
    buf: &mut InstanceBuffer,
) {
    let t = input.progress;
    let time = input.time;
    let scale = (1.0 - t).max(0.0);
    for (i, c) in pops.confetti.iter().enumerate() {
        let mut pos = c.start.lerp(c.target, t);
        let seed = i as f32;
        if t > ORBIT_THRESHOLD {
            pos = spin_y(pos, time * c.spin.z * 0.4);
            pos.y += (time * 1.5 + seed).sin() * 0.15;
        } else {
            pos.x += (time * 0.5 + seed).sin() * 0.05;
            pos.y += (time * 0.3 + seed).cos() * 0.05;
            pos.z += (time * 0.4 + seed).sin() * 0.05;
        }
        let spin = c.spin * time * 3.0;
        let rot = Quat::from_euler(EulerRot::XYZ, spin.x, spin.y, spin.z);
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(scale), rot, pos);
        buf.write(i, InstanceData::new(model, [c.color[0], c.color[1], c.color[2], 1.0]));
    }
    buf.mark_dirty();
    buf.set_visible(true);
}

fn update_sparkles(
    anim: &mut Animator,
    pops: &mut Populations,
    input: &FrameInput,
    buf: &mut InstanceBuffer,
) {
    if input.progress <= SPARKLE_THRESHOLD {
        buf.set_visible(false);
        return;
    }
    buf.set_visible(true);
    let time = input.time;
    let rot_y = time * SPARKLE_SPIN_RATE;
    let speed_mult = 1.0 + input.bands.high * 6.0;
    let size_mult = 1.0 + input.bands.high * 2.5;
    let rot = Quat::from_euler(EulerRot::XYZ, time, time * 0.5, 0.0);
    let spawn = &pops.sparkle_spawn;
    for (i, s) in pops.sparkles.iter_mut().enumerate() {
        s.phase += s.speed * speed_mult * SPARKLE_PHASE_RATE * input.dt;
        let wave = s.phase.sin();
        let scale = wave.max(0.0);
        if wave < SPARKLE_RESPAWN_BELOW {
            spawn.respawn(s, &mut anim.rng);
        } else {
            s.position.y += SPARKLE_RISE * input.dt;
        }
        let pos = spin_y(s.position, rot_y);
        let model =
            Mat4::from_scale_rotation_translation(Vec3::splat(scale * s.base_scale * size_mult), rot, pos);
        buf.write(i, InstanceData::new(model, [s.color[0], s.color[1], s.color[2], 0.8]));
    }
    buf.mark_dirty();
}

fn update_flame(_: &mut Animator, pops: &mut Populations, input: &FrameInput, buf: &mut InstanceBuffer) {
    let pose = candle_pose(&pops.candle, input.progress, input.time);
    buf.set_visible(pose.flame_opacity > 0.0);
    let time = input.time;
    let physics = pose.physics;
    let anim = smoothstep(0.0, 0.5, physics);
    let alpha = FLAME_ALPHA * pose.flame_opacity;
    for (i, f) in pops.flame.iter().enumerate() {
        let o = f.offset;
        // flame-local, origin at the flame base
        let mut p = f.local - Vec3::Y * FLAME_BASE_Y;
        let scatter = Vec3::new((o * 13.0).sin(), (o * 17.0).cos(), (o * 19.0).sin());
        p += scatter * (1.0 - physics) * 3.0;

        let lift = (p.y * 10.0).max(0.0).powf(1.2);
        p.x += (time * 2.0 + p.y * 4.0).sin() * 0.005 * lift * anim;
        p.z += (time * 1.5 + p.y * 5.0).cos() * 0.003 * lift * anim;
        let breath = (time * 4.0 - p.y * 10.0).sin() * 0.02 * anim;
        p.x *= 1.0 + breath;
        p.z *= 1.0 + breath;

        let pulse = 1.0 + (time * 10.0 + o).sin() * 0.1 * anim;
        let size = f.size * pulse * physics * FLAME_POINT_SCALE;
        let local = p + Vec3::Y * FLAME_BASE_Y;
        let model = pose.model * Mat4::from_scale_rotation_translation(Vec3::splat(size), Quat::IDENTITY, local);
        buf.write(i, InstanceData::new(model, [f.color[0], f.color[1], f.color[2], alpha]));
    }
    buf.mark_dirty();
}

#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Clone, Copy, Debug)]
pub struct CandlePose {
    pub model: Mat4,
    /// Flight progress, reaches 1 slightly before the cake finishes.
    pub physics: f32,
    /// Flame fade-in over the last stretch of assembly.
    pub flame_opacity: f32,
}

pub fn candle_pose(candle: &Candle, progress: f32, time: f32) -> CandlePose {
    let physics = (progress / CANDLE_SETTLE_AT).min(1.0);
    let flame_opacity = if progress > CANDLE_SETTLE_AT {
        ((progress - CANDLE_SETTLE_AT) / (1.0 - CANDLE_SETTLE_AT)).min(1.0)
    } else {
        0.0
    };
    let pos = candle.start.lerp(candle.target, physics);
    let rot = if physics < 0.99 {
        let k = 1.0 - physics;
        let r = candle.start_rotation;
        Quat::from_euler(EulerRot::XYZ, r.x * k, time * 0.5 + r.y * k, r.z * k)
    } else {
        Quat::from_rotation_y(time * BODY_SPIN_RATE)
    };
    let scale = 0.5 + 0.5 * physics;
    CandlePose {
        model: Mat4::from_scale_rotation_translation(Vec3::splat(scale), rot, pos),
        physics,
        flame_opacity,
    }
}
