//! Gradient noise used by the frosting texture.
//!
//! Classic improved Perlin noise over the reference 256-entry permutation,
//! plus a fractal sum. The `_periodic` variants wrap the x/y lattice so an
//! image sampled over exactly one period tiles without seams.

const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

#[inline]
fn perm(i: usize) -> usize {
    PERM[i & 255] as usize
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: usize, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

/// Lattice corners along one axis, wrapped to `period` when given.
#[inline]
fn corners(v: f32, period: Option<u32>) -> (usize, usize) {
    let i = v.floor() as i64;
    match period {
        Some(p) if p > 0 => {
            let p = p as i64;
            let i0 = i.rem_euclid(p);
            (i0 as usize, ((i0 + 1) % p) as usize)
        }
        _ => {
            let i0 = i.rem_euclid(256) as usize;
            (i0, (i0 + 1) & 255)
        }
    }
}

fn perlin(x: f32, y: f32, z: f32, period: Option<u32>) -> f32 {
    let (x0, x1) = corners(x, period);
    let (y0, y1) = corners(y, period);
    let (z0, z1) = corners(z, None);
    let (fx, fy, fz) = (x - x.floor(), y - y.floor(), z - z.floor());
    let (u, v, w) = (fade(fx), fade(fy), fade(fz));

    let hash = |xi: usize, yi: usize, zi: usize| perm(perm(perm(xi) + yi) + zi);

    lerp(
        w,
        lerp(
            v,
            lerp(
                u,
                grad(hash(x0, y0, z0), fx, fy, fz),
                grad(hash(x1, y0, z0), fx - 1.0, fy, fz),
            ),
            lerp(
                u,
                grad(hash(x0, y1, z0), fx, fy - 1.0, fz),
                grad(hash(x1, y1, z0), fx - 1.0, fy - 1.0, fz),
            ),
        ),
        lerp(
            v,
            lerp(
                u,
                grad(hash(x0, y0, z1), fx, fy, fz - 1.0),
                grad(hash(x1, y0, z1), fx - 1.0, fy, fz - 1.0),
            ),
            lerp(
                u,
                grad(hash(x0, y1, z1), fx, fy - 1.0, fz - 1.0),
                grad(hash(x1, y1, z1), fx - 1.0, fy - 1.0, fz - 1.0),
            ),
        ),
    )
}

/// Perlin gradient noise, roughly in [-1, 1].
pub fn noise3(x: f32, y: f32, z: f32) -> f32 {
    perlin(x, y, z, None)
}

/// Like [`noise3`], but x and y repeat every `period` lattice cells.
pub fn noise3_periodic(x: f32, y: f32, z: f32, period: u32) -> f32 {
    perlin(x, y, z, Some(period))
}

/// Fractal sum of `octaves` layers, normalized by the total amplitude.
pub fn fractal3(x: f32, y: f32, z: f32, octaves: u32) -> f32 {
    fractal(x, y, z, octaves, None)
}

/// Periodic fractal sum; octave `i` repeats every `period << i` cells so the
/// whole sum keeps the base period.
pub fn fractal3_periodic(x: f32, y: f32, z: f32, octaves: u32, period: u32) -> f32 {
    fractal(x, y, z, octaves, Some(period))
}

fn fractal(x: f32, y: f32, z: f32, octaves: u32, period: Option<u32>) -> f32 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;
    for i in 0..octaves {
        let p = period.map(|p| p.checked_shl(i).unwrap_or(0));
        total += perlin(x * frequency, y * frequency, z * frequency, p) * amplitude;
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}
