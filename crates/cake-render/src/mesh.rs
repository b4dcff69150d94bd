//! Indexed triangle meshes for every drawable in the scene.
//!
//! Builders follow the usual parametric layouts (counter-clockwise winding,
//! outward normals) so the same meshes work with back-face culling on or off.

use glam::{Mat3, Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Applies `m` to positions and its normal matrix to normals.
    pub fn transformed(mut self, m: Mat4) -> Self {
        let normal_m = Mat3::from_mat4(m).inverse().transpose();
        for v in &mut self.vertices {
            v.position = m.transform_point3(Vec3::from(v.position)).to_array();
            v.normal = (normal_m * Vec3::from(v.normal))
                .normalize_or_zero()
                .to_array();
        }
        self
    }

    fn push(&mut self, v: Vertex) -> u16 {
        self.vertices.push(v);
        (self.vertices.len() - 1) as u16
    }

    fn tri(&mut self, a: u16, b: u16, c: u16) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

/// Flat disc in the XY plane facing +Z.
pub fn disc(radius: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut m = Mesh::default();
    let center = m.push(Vertex::new(Vec3::ZERO, Vec3::Z, Vec2::splat(0.5)));
    for i in 0..=segments {
        let a = i as f32 / segments as f32 * TAU;
        let (s, c) = a.sin_cos();
        let p = Vec3::new(radius * c, radius * s, 0.0);
        m.push(Vertex::new(p, Vec3::Z, Vec2::new(c * 0.5 + 0.5, s * 0.5 + 0.5)));
    }
    for i in 1..=segments as u16 {
        m.tri(center, i, i + 1);
    }
    m
}

/// Axis-aligned cube of edge `size` centred on the origin, one uv square per face.
pub fn cube(size: f32) -> Mesh {
    let h = size * 0.5;
    // (normal, u axis, v axis)
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let mut m = Mesh::default();
    for (n, u, v) in faces {
        let base = m.vertices.len() as u16;
        for (du, dv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (n + u * du + v * dv) * h;
            let uv = Vec2::new(du * 0.5 + 0.5, 0.5 - dv * 0.5);
            m.push(Vertex::new(p, n, uv));
        }
        m.tri(base, base + 1, base + 2);
        m.tri(base, base + 2, base + 3);
    }
    m
}

/// Latitude/longitude sphere; u wraps around Y, v runs pole to pole.
pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> Mesh {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let mut m = Mesh::default();
    for iy in 0..=stacks {
        let v = iy as f32 / stacks as f32;
        let theta = v * PI;
        for ix in 0..=sectors {
            let u = ix as f32 / sectors as f32;
            let phi = u * TAU;
            let n = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            m.push(Vertex::new(n * radius, n, Vec2::new(u, v)));
        }
    }
    let row = (sectors + 1) as u16;
    for iy in 0..stacks as u16 {
        for ix in 0..sectors as u16 {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                m.tri(a, b, d);
            }
            if iy != stacks as u16 - 1 {
                m.tri(b, c, d);
            }
        }
    }
    m
}

/// Rectangle in the XY plane facing +Z.
pub fn plane(width: f32, height: f32) -> Mesh {
    let (w, h) = (width * 0.5, height * 0.5);
    let mut m = Mesh::default();
    m.push(Vertex::new(Vec3::new(-w, h, 0.0), Vec3::Z, Vec2::new(0.0, 0.0)));
    m.push(Vertex::new(Vec3::new(w, h, 0.0), Vec3::Z, Vec2::new(1.0, 0.0)));
    m.push(Vertex::new(Vec3::new(-w, -h, 0.0), Vec3::Z, Vec2::new(0.0, 1.0)));
    m.push(Vertex::new(Vec3::new(w, -h, 0.0), Vec3::Z, Vec2::new(1.0, 1.0)));
    m.tri(0, 2, 1);
    m.tri(2, 3, 1);
    m
}

/// Unit billboard quad; the flame shader spans it along the camera axes.
pub fn quad() -> Mesh {
    plane(1.0, 1.0)
}

/// Flat-shaded octahedron (the sparkle diamond).
pub fn octahedron(radius: f32) -> Mesh {
    let corners = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let faces: [[usize; 3]; 8] = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    let mut m = Mesh::default();
    for f in faces {
        let n = (corners[f[0]] + corners[f[1]] + corners[f[2]]).normalize();
        let a = m.push(Vertex::new(corners[f[0]] * radius, n, Vec2::new(0.0, 0.0)));
        let b = m.push(Vertex::new(corners[f[1]] * radius, n, Vec2::new(1.0, 0.0)));
        let c = m.push(Vertex::new(corners[f[2]] * radius, n, Vec2::new(0.5, 1.0)));
        m.tri(a, b, c);
    }
    m
}

/// Capped cylinder along Y, centred on the origin.
pub fn cylinder(radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half = height * 0.5;
    let mut m = Mesh::default();
    let ring = |i: u32| {
        let a = i as f32 / segments as f32 * TAU;
        (a.sin(), a.cos())
    };

    // side, top row first
    for (row, y) in [half, -half].into_iter().enumerate() {
        for i in 0..=segments {
            let (s, c) = ring(i);
            let uv = Vec2::new(i as f32 / segments as f32, row as f32);
            m.push(Vertex::new(Vec3::new(radius * s, y, radius * c), Vec3::new(s, 0.0, c), uv));
        }
    }
    let row = (segments + 1) as u16;
    for i in 0..segments as u16 {
        let a = i;
        let b = row + i;
        let c = row + i + 1;
        let d = i + 1;
        m.tri(a, b, d);
        m.tri(b, c, d);
    }

    for (y, n) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
        let center = m.push(Vertex::new(Vec3::new(0.0, y, 0.0), n, Vec2::splat(0.5)));
        let first = center + 1;
        for i in 0..=segments {
            let (s, c) = ring(i);
            let uv = Vec2::new(s * 0.5 + 0.5, c * 0.5 + 0.5);
            m.push(Vertex::new(Vec3::new(radius * s, y, radius * c), n, uv));
        }
        for i in 0..segments as u16 {
            if n.y > 0.0 {
                m.tri(center, first + i, first + i + 1);
            } else {
                m.tri(center, first + i + 1, first + i);
            }
        }
    }
    m
}

/// Torus around Z in the XY plane.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut m = Mesh::default();
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let uv = Vec2::new(i as f32 / tubular as f32, j as f32 / radial as f32);
            m.push(Vertex::new(p, (p - center).normalize_or_zero(), uv));
        }
    }
    let row = (tubular + 1) as u16;
    for j in 1..=radial as u16 {
        for i in 1..=tubular as u16 {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            m.tri(a, b, d);
            m.tri(b, c, d);
        }
    }
    m
}

/// One piece of the candle with its surface parameters.
#[derive(Clone, Debug)]
pub struct CandlePart {
    pub name: &'static str,
    pub mesh: Mesh,
    pub color: u32,
    pub roughness: f32,
    pub metalness: f32,
}

/// Wax body, melted pool and wick, in candle space (base at y = 0).
pub fn candle_parts() -> Vec<CandlePart> {
    let flat = Mat4::from_rotation_x(-PI / 2.0);
    vec![
        CandlePart {
            name: "wax",
            mesh: cylinder(0.06, 0.4, 32).transformed(Mat4::from_translation(Vec3::Y * 0.2)),
            color: 0xFDF5E6,
            roughness: 0.3,
            metalness: 0.0,
        },
        CandlePart {
            name: "pool_rim",
            mesh: torus(0.045, 0.015, 16, 32)
                .transformed(Mat4::from_translation(Vec3::Y * 0.4) * Mat4::from_rotation_x(PI / 2.0)),
            color: 0xFFF8E7,
            roughness: 0.15,
            metalness: 0.05,
        },
        CandlePart {
            name: "pool",
            mesh: disc(0.045, 32).transformed(Mat4::from_translation(Vec3::Y * 0.39) * flat),
            color: 0xFFFDE7,
            roughness: 0.05,
            metalness: 0.1,
        },
        CandlePart {
            name: "wick",
            mesh: cylinder(0.008, 0.12, 8).transformed(Mat4::from_translation(Vec3::Y * 0.45)),
            color: 0x111111,
            roughness: 0.9,
            metalness: 0.0,
        },
    ]
}
