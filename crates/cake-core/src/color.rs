// Palette helpers. Hex literals are authored in sRGB; the renderer works in
// linear space.

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` to linear RGB.
pub fn hex_linear(hex: u32) -> [f32; 3] {
    let ch = |shift: u32| srgb_to_linear(((hex >> shift) & 0xFF) as f32 / 255.0);
    [ch(16), ch(8), ch(0)]
}

pub fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Shift lightness by `amount` in [-1, 1]: toward white when positive,
/// toward black when negative.
pub fn shift_lightness(c: [f32; 3], amount: f32) -> [f32; 3] {
    let a = amount.clamp(-1.0, 1.0);
    if a >= 0.0 {
        mix(c, [1.0; 3], a)
    } else {
        mix(c, [0.0; 3], -a)
    }
}
