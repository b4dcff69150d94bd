//! Particle populations, generated once from a [`SceneConfig`].
//!
//! Each class has its own record type carrying only the fields it animates
//! with. `start` and `target` never change after generation; sparkles are
//! the only records mutated later (respawned in place).

use crate::color::{hex_linear, mix, shift_lightness};
use crate::config::SceneConfig;
use crate::constants::{CANDLE_LIFT, EDGE_FRACTION, INTERIOR_RADIUS_FACTOR};
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;
use std::ops::Range;

/// One cylindrical layer of the cake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CakeTier {
    pub radius: f32,
    pub height: f32,
    /// Vertical centre of the tier.
    pub y: f32,
}

impl CakeTier {
    pub const fn new(radius: f32, height: f32, y: f32) -> Self {
        Self { radius, height, y }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height * 0.5
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleClass {
    Body,
    Gift,
    Ornament,
    Confetti,
    Sparkle,
    Flame,
}

impl ParticleClass {
    pub const ALL: [ParticleClass; 6] = [
        ParticleClass::Body,
        ParticleClass::Gift,
        ParticleClass::Ornament,
        ParticleClass::Confetti,
        ParticleClass::Sparkle,
        ParticleClass::Flame,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug)]
pub struct BodyParticle {
    pub start: Vec3,
    pub target: Vec3,
    pub phase: f32,
    pub time_offset: f32,
    pub flash_factor: f32,
    pub is_edge: bool,
    pub uv: Vec2,
}

#[derive(Clone, Debug)]
pub struct GiftParticle {
    pub start: Vec3,
    pub target: Vec3,
    pub scale: f32,
    /// Euler XYZ, radians.
    pub base_rotation: Vec3,
    pub style: usize,
    pub phase: f32,
}

#[derive(Clone, Debug)]
pub struct OrnamentParticle {
    pub start: Vec3,
    pub target: Vec3,
    pub scale: f32,
    pub style: usize,
    pub phase: f32,
}

#[derive(Clone, Debug)]
pub struct ConfettiParticle {
    pub start: Vec3,
    pub target: Vec3,
    pub color: [f32; 3],
    /// Per-axis tumble speeds; z also drives the orbit.
    pub spin: Vec3,
}

#[derive(Clone, Debug)]
pub struct Sparkle {
    pub position: Vec3,
    pub phase: f32,
    pub speed: f32,
    pub base_scale: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct FlameParticle {
    /// Offset in candle space.
    pub local: Vec3,
    pub size: f32,
    /// Per-particle seed for scatter direction and flicker.
    pub offset: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct Candle {
    pub start: Vec3,
    pub target: Vec3,
    pub start_rotation: Vec3,
}

const GIFT_RADIUS_FACTOR: f32 = 0.6;
const ORNAMENT_RADIUS_FACTOR: f32 = 0.65;
const DECORATION_SCALE_GAIN: f32 = 1.3;
const CONFETTI_PALETTE: [u32; 5] = [0xFFD700, 0xC0C0C0, 0xFF1493, 0x00FFFF, 0x32CD32];
const SPARKLE_PALETTE: [u32; 4] = [0xFFFFFF, 0xFFD700, 0xE0FFFF, 0xFFFACD];

// Flame volume, candle space
pub const FLAME_BASE_Y: f32 = 0.52;
pub const FLAME_HEIGHT: f32 = 0.11;
pub const FLAME_MAX_RADIUS: f32 = 0.012;
// Blue base, cyan, white core, gold, orange, smoke tip
const FLAME_STOPS: [(f32, u32); 6] = [
    (0.0, 0x002288),
    (0.1, 0x4488FF),
    (0.25, 0xFFFFEE),
    (0.5, 0xFFAA00),
    (0.8, 0xFF4400),
    (1.0, 0x220000),
];

/// Split `total` body particles across tiers by cross-section area. Each
/// tier gets the floor of its share; the last tier takes the remainder.
pub fn allocate_tier_counts(total: usize, tiers: &[CakeTier]) -> Vec<usize> {
    if tiers.is_empty() {
        return Vec::new();
    }
    let area: f32 = tiers.iter().map(|t| t.radius * t.radius).sum();
    let mut counts = Vec::with_capacity(tiers.len());
    let mut assigned = 0usize;
    for (i, tier) in tiers.iter().enumerate() {
        let n = if i == tiers.len() - 1 {
            total - assigned
        } else if area > 0.0 {
            let share = (total as f32 * (tier.radius * tier.radius) / area).floor() as usize;
            share.min(total - assigned)
        } else {
            total / tiers.len()
        };
        assigned += n;
        counts.push(n);
    }
    counts
}

/// Uniform point in the scatter volume. `vertical` scales the height span
/// and `widen` grows the horizontal span.
fn scatter_point<R: Rng>(cfg: &SceneConfig, vertical: f32, widen: f32, rng: &mut R) -> Vec3 {
    let w = cfg.scatter_radius + widen;
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * w,
        (rng.gen::<f32>() - 0.5) * cfg.scatter_radius * vertical + cfg.scatter_height_center,
        (rng.gen::<f32>() - 0.5) * w,
    )
}

fn random_euler<R: Rng>(rng: &mut R, range: f32) -> Vec3 {
    Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()) * range
}

fn decoration_scale<R: Rng>(rng: &mut R) -> f32 {
    (0.08 + rng.gen::<f32>() * 0.12) * DECORATION_SCALE_GAIN
}

fn pick_tier<'a, R: Rng>(tiers: &'a [CakeTier], rng: &mut R) -> &'a CakeTier {
    &tiers[rng.gen_range(0..tiers.len())]
}

fn on_circle(theta: f32, r: f32, y: f32) -> Vec3 {
    Vec3::new(theta.cos() * r, y, theta.sin() * r)
}

/// Volume sparkles respawn into: a shell just outside the tier walls, or
/// (one time in four) a column above the candle.
#[derive(Clone, Debug)]
pub struct SparkleSpawn {
    tiers: Vec<CakeTier>,
}

impl SparkleSpawn {
    pub const SHELL_GAP: f32 = 0.1;
    pub const SHELL_DEPTH: f32 = 0.8;
    pub const TOP_CHANCE: f32 = 0.25;
    pub const TOP_GAP: f32 = 0.2;
    pub const TOP_DEPTH: f32 = 0.8;
    pub const TOP_WIDTH: f32 = 1.5;

    pub fn new(tiers: &[CakeTier]) -> Self {
        Self {
            tiers: tiers.to_vec(),
        }
    }

    pub fn respawn<R: Rng>(&self, sparkle: &mut Sparkle, rng: &mut R) {
        sparkle.phase = rng.gen::<f32>() * TAU;
        let Some(top) = self.tiers.last() else {
            sparkle.position = Vec3::ZERO;
            return;
        };
        let tier = pick_tier(&self.tiers, rng);
        let theta = rng.gen::<f32>() * TAU;
        let r = tier.radius + Self::SHELL_GAP + rng.gen::<f32>() * Self::SHELL_DEPTH;
        let y = tier.y + (rng.gen::<f32>() - 0.5) * tier.height;
        sparkle.position = on_circle(theta, r, y);
        if rng.gen::<f32>() < Self::TOP_CHANCE {
            sparkle.position = Vec3::new(
                (rng.gen::<f32>() - 0.5) * Self::TOP_WIDTH,
                top.top() + Self::TOP_GAP + rng.gen::<f32>() * Self::TOP_DEPTH,
                (rng.gen::<f32>() - 0.5) * Self::TOP_WIDTH,
            );
        }
    }

    /// Whether `p` lies in the spawn volume, allowing `slack` of vertical drift.
    pub fn contains(&self, p: Vec3, slack: f32) -> bool {
        let eps = 1e-4;
        if let Some(top) = self.tiers.last() {
            let half = Self::TOP_WIDTH * 0.5 + eps;
            let y0 = top.top() + Self::TOP_GAP - eps;
            let y1 = top.top() + Self::TOP_GAP + Self::TOP_DEPTH + slack + eps;
            if p.x.abs() <= half && p.z.abs() <= half && p.y >= y0 && p.y <= y1 {
                return true;
            }
        }
        let radial = Vec2::new(p.x, p.z).length();
        self.tiers.iter().any(|t| {
            let r0 = t.radius + Self::SHELL_GAP - eps;
            let r1 = t.radius + Self::SHELL_GAP + Self::SHELL_DEPTH + eps;
            let dy = p.y - t.y;
            radial >= r0
                && radial <= r1
                && dy >= -t.height * 0.5 - eps
                && dy <= t.height * 0.5 + slack + eps
        })
    }
}

pub struct Populations {
    pub body: Vec<BodyParticle>,
    /// Sorted by style; see [`Populations::gift_ranges`].
    pub gifts: Vec<GiftParticle>,
    pub ornaments: Vec<OrnamentParticle>,
    pub confetti: Vec<ConfettiParticle>,
    pub sparkles: Vec<Sparkle>,
    pub flame: Vec<FlameParticle>,
    pub candle: Candle,
    pub gift_ranges: Vec<Range<usize>>,
    pub ornament_ranges: Vec<Range<usize>>,
    pub sparkle_spawn: SparkleSpawn,
}

impl Populations {
    pub fn generate<R: Rng>(cfg: &SceneConfig, rng: &mut R) -> Self {
        let tiers = &cfg.tiers;
        let body = generate_body(cfg, rng);

        let gift_styles = crate::texture::GIFT_STYLES.len();
        let ornament_styles = crate::texture::ORNAMENT_STYLES.len();

        let mut gifts: Vec<GiftParticle> = Vec::new();
        let mut ornaments: Vec<OrnamentParticle> = Vec::new();
        if !tiers.is_empty() {
            gifts = (0..cfg.counts.gifts)
                .map(|_| {
                    let tier = pick_tier(tiers, rng);
                    let theta = rng.gen::<f32>() * TAU;
                    let r = rng.gen::<f32>().sqrt() * tier.radius * GIFT_RADIUS_FACTOR;
                    let y = tier.y - tier.height * 0.5 + rng.gen::<f32>() * tier.height * 0.9;
                    let target = on_circle(theta, r, y);
                    let base_rotation = random_euler(rng, 1.0);
                    let start = scatter_point(cfg, 0.6, 0.0, rng);
                    GiftParticle {
                        start,
                        target,
                        scale: decoration_scale(rng),
                        base_rotation,
                        style: rng.gen_range(0..gift_styles),
                        phase: rng.gen::<f32>() * TAU,
                    }
                })
                .collect();
            ornaments = (0..cfg.counts.ornaments)
                .map(|_| {
                    let tier = pick_tier(tiers, rng);
                    let theta = rng.gen::<f32>() * TAU;
                    let r = rng.gen::<f32>().sqrt() * tier.radius * ORNAMENT_RADIUS_FACTOR;
                    let y = tier.y + (rng.gen::<f32>() - 0.5) * tier.height * 0.8;
                    let target = on_circle(theta, r, y);
                    let start = scatter_point(cfg, 0.6, 0.0, rng);
                    OrnamentParticle {
                        start,
                        target,
                        scale: decoration_scale(rng),
                        style: rng.gen_range(0..ornament_styles),
                        phase: rng.gen::<f32>() * TAU,
                    }
                })
                .collect();
        }
        gifts.sort_by_key(|g| g.style);
        ornaments.sort_by_key(|o| o.style);
        let gift_ranges = style_ranges(gifts.iter().map(|g| g.style), gift_styles);
        let ornament_ranges = style_ranges(ornaments.iter().map(|o| o.style), ornament_styles);

        let confetti: Vec<ConfettiParticle> = (0..cfg.counts.confetti)
            .map(|_| {
                let r = 4.0 + rng.gen::<f32>() * 2.5;
                let theta = rng.gen::<f32>() * TAU;
                let target = on_circle(theta, r, rng.gen::<f32>() * 8.0);
                let start = scatter_point(cfg, 1.0, 4.0, rng);
                let base = hex_linear(CONFETTI_PALETTE[rng.gen_range(0..CONFETTI_PALETTE.len())]);
                let color = shift_lightness(base, (rng.gen::<f32>() - 0.5) * 0.1);
                let spin = Vec3::new(
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                    0.5 + rng.gen::<f32>(),
                );
                ConfettiParticle {
                    start,
                    target,
                    color,
                    spin,
                }
            })
            .collect();

        let sparkle_spawn = SparkleSpawn::new(tiers);
        let sparkles: Vec<Sparkle> = if tiers.is_empty() {
            Vec::new()
        } else {
            (0..cfg.counts.sparkles)
                .map(|_| {
                    let mut s = Sparkle {
                        position: Vec3::ZERO,
                        phase: 0.0,
                        speed: 1.0 + rng.gen::<f32>() * 2.0,
                        base_scale: 0.03 + rng.gen::<f32>() * 0.04,
                        color: hex_linear(SPARKLE_PALETTE[rng.gen_range(0..SPARKLE_PALETTE.len())]),
                    };
                    sparkle_spawn.respawn(&mut s, rng);
                    s
                })
                .collect()
        };

        let flame: Vec<FlameParticle> = (0..cfg.counts.flame).map(|_| flame_particle(rng)).collect();

        let top = tiers.last().map(|t| t.top()).unwrap_or(0.0);
        let mut candle_start = scatter_point(cfg, 0.5, 0.0, rng);
        candle_start.y += 2.0;
        let candle = Candle {
            start: candle_start,
            target: Vec3::new(0.0, top + CANDLE_LIFT, 0.0),
            start_rotation: random_euler(rng, std::f32::consts::PI),
        };

        log::info!(
            "[population] body={} gifts={} ornaments={} confetti={} sparkles={} flame={}",
            body.len(),
            gifts.len(),
            ornaments.len(),
            confetti.len(),
            sparkles.len(),
            flame.len()
        );

        Self {
            body,
            gifts,
            ornaments,
            confetti,
            sparkles,
            flame,
            candle,
            gift_ranges,
            ornament_ranges,
            sparkle_spawn,
        }
    }

    pub fn len(&self, class: ParticleClass) -> usize {
        match class {
            ParticleClass::Body => self.body.len(),
            ParticleClass::Gift => self.gifts.len(),
            ParticleClass::Ornament => self.ornaments.len(),
            ParticleClass::Confetti => self.confetti.len(),
            ParticleClass::Sparkle => self.sparkles.len(),
            ParticleClass::Flame => self.flame.len(),
        }
    }
}

fn generate_body<R: Rng>(cfg: &SceneConfig, rng: &mut R) -> Vec<BodyParticle> {
    let counts = allocate_tier_counts(cfg.counts.body, &cfg.tiers);
    let mut body = Vec::with_capacity(cfg.counts.body);
    for (tier, &n) in cfg.tiers.iter().zip(counts.iter()) {
        for _ in 0..n {
            let theta = rng.gen::<f32>() * TAU;
            let is_edge = rng.gen::<f32>() < EDGE_FRACTION;
            let r = if is_edge {
                tier.radius
            } else {
                rng.gen::<f32>().sqrt() * tier.radius * INTERIOR_RADIUS_FACTOR
            };
            let h = (rng.gen::<f32>() - 0.5) * tier.height;
            let target = on_circle(theta, r, tier.y + h);
            let start = scatter_point(cfg, 0.5, 0.0, rng);
            let uv = Vec2::new(
                theta / TAU + 0.5,
                if tier.height > 0.0 {
                    (h + tier.height * 0.5) / tier.height
                } else {
                    0.5
                },
            );
            body.push(BodyParticle {
                start,
                target,
                phase: rng.gen::<f32>() * TAU,
                time_offset: rng.gen::<f32>(),
                flash_factor: rng.gen::<f32>(),
                is_edge,
                uv,
            });
        }
    }
    body
}

fn style_ranges(styles: impl Iterator<Item = usize>, n_styles: usize) -> Vec<Range<usize>> {
    let mut counts = vec![0usize; n_styles];
    for s in styles {
        if let Some(c) = counts.get_mut(s) {
            *c += 1;
        }
    }
    let mut start = 0;
    counts
        .into_iter()
        .map(|c| {
            let r = start..start + c;
            start += c;
            r
        })
        .collect()
}

/// Colour of the flame at normalized height `ny` in [0, 1].
pub fn flame_color(ny: f32) -> [f32; 3] {
    let ny = ny.clamp(0.0, 1.0);
    for w in FLAME_STOPS.windows(2) {
        let (y0, c0) = w[0];
        let (y1, c1) = w[1];
        if ny <= y1 {
            return mix(hex_linear(c0), hex_linear(c1), (ny - y0) / (y1 - y0));
        }
    }
    hex_linear(FLAME_STOPS[FLAME_STOPS.len() - 1].1)
}

/// Teardrop envelope: round base, concave taper to the tip.
pub fn flame_envelope(ny: f32) -> f32 {
    2.5 * ny.powf(0.4) * (1.0 - ny).powi(2)
}

fn flame_particle<R: Rng>(rng: &mut R) -> FlameParticle {
    // more particles low in the flame
    let ny = rng.gen::<f32>().powf(0.7);
    let radius = rng.gen::<f32>().sqrt() * FLAME_MAX_RADIUS * flame_envelope(ny);
    let theta = rng.gen::<f32>() * TAU;
    let mut color = flame_color(ny);
    color[0] = (color[0] + (rng.gen::<f32>() - 0.5) * 0.02).max(0.0);
    let base_size = if ny < 0.1 {
        3.0
    } else if ny > 0.6 {
        5.0 * (1.0 - ny)
    } else {
        5.0
    };
    FlameParticle {
        local: on_circle(theta, radius, FLAME_BASE_Y + ny * FLAME_HEIGHT),
        size: base_size * (0.8 + rng.gen::<f32>() * 0.5),
        offset: rng.gen::<f32>() * 100.0,
        color,
    }
}
