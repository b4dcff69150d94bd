//! Procedural textures generated once at startup.
//!
//! - Frosting: a domain-warped fractal height field, returned as a gray bump
//!   map plus a pink color map mixed by height. Both tile seamlessly.
//! - Patterns: ribbon, dots and stripes wrapping paper for gifts and
//!   ornaments.

use crate::constants::{
    FROSTING_BASE, FROSTING_CELLS, FROSTING_GRAIN_CELLS, FROSTING_HIGHLIGHT, MAX_TEXTURE_SIZE,
};
use crate::error::TextureError;
use crate::noise::fractal3_periodic;
use fnv::FnvHashMap;
use image::{Rgba, RgbaImage};

// Reference canvas the pattern dimensions were tuned on.
const PATTERN_REFERENCE: f32 = 512.0;
const RIBBON_WIDTH: f32 = 100.0;
const DOT_SPACING: f32 = 100.0;
const DOT_RADIUS: f32 = 25.0;
const STRIPE_SPACING: f32 = 160.0;
const STRIPE_WIDTH: f32 = 80.0;

pub struct FrostingTextures {
    pub color: RgbaImage,
    pub bump: RgbaImage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Ribbon,
    Dots,
    Stripes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatternStyle {
    pub kind: PatternKind,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
}

const fn style(kind: PatternKind, background: u32, foreground: u32) -> PatternStyle {
    PatternStyle {
        kind,
        background: rgb(background),
        foreground: rgb(foreground),
    }
}

const fn rgb(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

pub const GIFT_STYLES: [PatternStyle; 4] = [
    style(PatternKind::Ribbon, 0xD32F2F, 0xFFD700),
    style(PatternKind::Dots, 0x1976D2, 0xE0E0E0),
    style(PatternKind::Stripes, 0xFFC107, 0xD32F2F),
    style(PatternKind::Ribbon, 0x388E3C, 0xFFD700),
];

pub const ORNAMENT_STYLES: [PatternStyle; 4] = [
    style(PatternKind::Dots, 0xAB47BC, 0xE1BEE7),
    style(PatternKind::Stripes, 0xFF7043, 0xFFCCBC),
    style(PatternKind::Ribbon, 0x26C6DA, 0xE0F7FA),
    style(PatternKind::Dots, 0xFFCA28, 0xFFF8E1),
];

fn check_size(size: u32) -> Result<(), TextureError> {
    if size == 0 {
        return Err(TextureError::ZeroSize);
    }
    if size > MAX_TEXTURE_SIZE {
        return Err(TextureError::TooLarge {
            size,
            max: MAX_TEXTURE_SIZE,
        });
    }
    Ok(())
}

/// Normalized frosting height in [0, 1] at texel (x, y) of a `size` image.
pub fn frosting_height(x: u32, y: u32, size: u32) -> f32 {
    let cells = FROSTING_CELLS;
    let fbm = |x: f32, y: f32| fractal3_periodic(x, y, 0.0, 4, cells);
    let scale = cells as f32 / size as f32;
    let (nx, ny) = (x as f32 * scale, y as f32 * scale);

    // domain warp: q = fbm(p), r = fbm(p + 4q), f = fbm(p + 4r)
    let qx = fbm(nx, ny);
    let qy = fbm(nx + 5.2, ny + 1.3);
    let rx = fbm(nx + 4.0 * qx + 1.7, ny + 4.0 * qy + 9.2);
    let ry = fbm(nx + 4.0 * qx + 8.3, ny + 4.0 * qy + 2.8);
    let f = fbm(nx + 4.0 * rx, ny + 4.0 * ry);

    let grain_scale = FROSTING_GRAIN_CELLS as f32 / size as f32;
    let grain = fractal3_periodic(
        x as f32 * grain_scale,
        y as f32 * grain_scale,
        10.0,
        2,
        FROSTING_GRAIN_CELLS,
    );

    let height = f * 0.85 + grain * 0.15;
    (0.5 + height * 0.5).clamp(0.0, 1.0)
}

pub fn frosting_textures(size: u32) -> Result<FrostingTextures, TextureError> {
    check_size(size)?;
    let texels = (size as usize) * (size as usize);
    let mut color = Vec::with_capacity(texels * 4);
    let mut bump = Vec::with_capacity(texels * 4);
    for y in 0..size {
        for x in 0..size {
            let h = frosting_height(x, y, size);
            let g = (h * 255.0) as u8;
            bump.extend_from_slice(&[g, g, g, 255]);
            // peaks lean toward the highlight
            let m = h * h;
            for c in 0..3 {
                let base = FROSTING_BASE[c] as f32;
                let high = FROSTING_HIGHLIGHT[c] as f32;
                color.push((base + (high - base) * m) as u8);
            }
            color.push(255);
        }
    }
    let len = color.len();
    let color =
        RgbaImage::from_raw(size, size, color).ok_or(TextureError::BufferMismatch { size, len })?;
    let len = bump.len();
    let bump =
        RgbaImage::from_raw(size, size, bump).ok_or(TextureError::BufferMismatch { size, len })?;
    log::info!("[texture] frosting generated at {size}x{size}");
    Ok(FrostingTextures { color, bump })
}

/// Whether the texel centre at (x, y) is covered by the pattern foreground.
pub fn pattern_covers(kind: PatternKind, x: u32, y: u32, size: u32) -> bool {
    let k = size as f32 / PATTERN_REFERENCE;
    let px = x as f32 + 0.5;
    let py = y as f32 + 0.5;
    match kind {
        PatternKind::Ribbon => {
            let half = RIBBON_WIDTH * k * 0.5;
            let center = size as f32 * 0.5;
            (px - center).abs() < half || (py - center).abs() < half
        }
        PatternKind::Dots => {
            let spacing = DOT_SPACING * k;
            let radius = DOT_RADIUS * k;
            let count = ((size as f32 - spacing * 0.5) / spacing).ceil().max(1.0);
            let nearest = |p: f32| {
                let i = ((p - spacing * 0.5) / spacing).round().clamp(0.0, count - 1.0);
                spacing * 0.5 + i * spacing
            };
            let dx = px - nearest(px);
            let dy = py - nearest(py);
            dx * dx + dy * dy <= radius * radius
        }
        PatternKind::Stripes => {
            // lines run from (i, 0) to (i + size, size), i.e. x - y = i
            let spacing = STRIPE_SPACING * k;
            let m = (px - py + size as f32).rem_euclid(spacing);
            let along = m.min(spacing - m);
            along / std::f32::consts::SQRT_2 <= STRIPE_WIDTH * k * 0.5
        }
    }
}

pub fn pattern_texture(style: &PatternStyle, size: u32) -> Result<RgbaImage, TextureError> {
    check_size(size)?;
    let bg = Rgba([style.background[0], style.background[1], style.background[2], 255]);
    let fg = Rgba([style.foreground[0], style.foreground[1], style.foreground[2], 255]);
    Ok(RgbaImage::from_fn(size, size, |x, y| {
        if pattern_covers(style.kind, x, y, size) {
            fg
        } else {
            bg
        }
    }))
}

/// All textures the scene needs, built once. Identical styles share a
/// single image.
pub struct TextureLibrary {
    pub frosting: FrostingTextures,
    patterns: Vec<RgbaImage>,
    gift_slots: Vec<usize>,
    ornament_slots: Vec<usize>,
}

impl TextureLibrary {
    pub fn build(size: u32) -> Result<Self, TextureError> {
        let frosting = frosting_textures(size)?;
        let mut patterns = Vec::new();
        let mut seen: FnvHashMap<PatternStyle, usize> = FnvHashMap::default();
        let mut slot = |s: &PatternStyle| -> Result<usize, TextureError> {
            if let Some(&i) = seen.get(s) {
                return Ok(i);
            }
            patterns.push(pattern_texture(s, size)?);
            seen.insert(*s, patterns.len() - 1);
            Ok(patterns.len() - 1)
        };
        let gift_slots = GIFT_STYLES.iter().map(&mut slot).collect::<Result<Vec<_>, _>>()?;
        let ornament_slots = ORNAMENT_STYLES
            .iter()
            .map(&mut slot)
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[texture] {} pattern textures for {} styles",
            patterns.len(),
            gift_slots.len() + ornament_slots.len()
        );
        Ok(Self {
            frosting,
            patterns,
            gift_slots,
            ornament_slots,
        })
    }

    pub fn patterns(&self) -> &[RgbaImage] {
        &self.patterns
    }

    /// Index into [`Self::patterns`] for a gift style.
    pub fn gift_pattern(&self, style: usize) -> Option<usize> {
        self.gift_slots.get(style).copied()
    }

    pub fn ornament_pattern(&self, style: usize) -> Option<usize> {
        self.ornament_slots.get(style).copied()
    }
}
