//! WGSL programs assembled from small modules.
//!
//! Each [`ShaderModule`] lists the symbols it defines and the symbols it
//! expects an earlier module to have defined. [`compose`] links a sequence
//! of modules and rejects unmet or conflicting declarations before anything
//! reaches the GPU.

use crate::audio::SpectrumFrame;
use crate::buffers::SceneLighting;
use crate::error::ShaderError;
use crate::population::Populations;
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};

pub const COMMON_WGSL: &str = include_str!("../shaders/common.wgsl");
pub const LIGHTING_WGSL: &str = include_str!("../shaders/lighting.wgsl");
pub const GLOW_WGSL: &str = include_str!("../shaders/glow.wgsl");
pub const BODY_WGSL: &str = include_str!("../shaders/body.wgsl");
pub const SOLID_WGSL: &str = include_str!("../shaders/solid.wgsl");
pub const ADDITIVE_WGSL: &str = include_str!("../shaders/additive.wgsl");
pub const POST_WGSL: &str = include_str!("../shaders/post.wgsl");

#[derive(Clone, Copy, Debug)]
pub struct ShaderModule {
    pub name: &'static str,
    pub source: &'static str,
    pub provides: &'static [&'static str],
    pub requires: &'static [&'static str],
}

pub const COMMON: ShaderModule = ShaderModule {
    name: "common",
    source: COMMON_WGSL,
    provides: &["Globals", "globals", "InstanceIn", "instance_model"],
    requires: &[],
};

pub const LIGHTING: ShaderModule = ShaderModule {
    name: "lighting",
    source: LIGHTING_WGSL,
    provides: &["point_light", "shade_lit", "apply_fog"],
    requires: &["globals"],
};

pub const GLOW: ShaderModule = ShaderModule {
    name: "glow",
    source: GLOW_WGSL,
    provides: &["eligibility_hash", "glow_emissive", "rim_light"],
    requires: &["globals"],
};

pub const BODY: ShaderModule = ShaderModule {
    name: "body",
    source: BODY_WGSL,
    provides: &["vs_body", "fs_body", "perturb_normal"],
    requires: &[
        "InstanceIn",
        "instance_model",
        "shade_lit",
        "apply_fog",
        "glow_emissive",
        "rim_light",
    ],
};

pub const SOLID: ShaderModule = ShaderModule {
    name: "solid",
    source: SOLID_WGSL,
    provides: &["Material", "vs_solid", "fs_solid"],
    requires: &["InstanceIn", "instance_model", "shade_lit", "apply_fog"],
};

pub const ADDITIVE: ShaderModule = ShaderModule {
    name: "additive",
    source: ADDITIVE_WGSL,
    provides: &["vs_sparkle", "fs_sparkle", "vs_flame", "fs_flame"],
    requires: &["globals", "InstanceIn", "instance_model"],
};

/// Links `modules` in order into one WGSL source string.
pub fn compose(modules: &[ShaderModule]) -> Result<String, ShaderError> {
    if modules.is_empty() {
        return Err(ShaderError::Empty);
    }
    let mut owners: FnvHashMap<&str, &str> = FnvHashMap::default();
    let mut out = String::new();
    for module in modules {
        if let Some(missing) = module.requires.iter().find(|s| !owners.contains_key(*s)) {
            return Err(ShaderError::MissingSymbol {
                module: module.name.to_string(),
                symbol: missing.to_string(),
            });
        }
        for symbol in module.provides {
            if let Some(first) = owners.insert(*symbol, module.name) {
                return Err(ShaderError::DuplicateSymbol {
                    symbol: symbol.to_string(),
                    first: first.to_string(),
                    second: module.name.to_string(),
                });
            }
        }
        out.push_str("// ---- ");
        out.push_str(module.name);
        out.push_str(" ----\n");
        out.push_str(module.source);
        out.push('\n');
    }
    log::debug!(
        "composed {} shader modules ({} bytes)",
        modules.len(),
        out.len()
    );
    Ok(out)
}

pub fn body_program() -> Result<String, ShaderError> {
    compose(&[COMMON, LIGHTING, GLOW, BODY])
}

pub fn solid_program() -> Result<String, ShaderError> {
    compose(&[COMMON, LIGHTING, SOLID])
}

pub fn additive_program() -> Result<String, ShaderError> {
    compose(&[COMMON, ADDITIVE])
}

/// Mirrors `Globals` in `common.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub scene: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    pub spectrum: [f32; 4],
    pub lights: [f32; 4],
    pub candle_pos: [f32; 4],
    pub candle_color: [f32; 4],
}

/// Camera terms the scene uniforms need, in world space.
#[derive(Clone, Copy, Debug)]
pub struct ViewTerms {
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl SceneUniforms {
    pub fn new(
        view: &ViewTerms,
        scene: Mat4,
        time: f32,
        spectrum: &SpectrumFrame,
        lighting: &SceneLighting,
    ) -> Self {
        let candle_model = Mat4::from_cols_array_2d(&lighting.candle_model);
        let candle_world = scene * candle_model;
        let candle_pos = candle_world.transform_point3(lighting.candle.position);
        // light range follows the candle and scene scale
        let range_scale = candle_world.x_axis.truncate().length();
        let b = spectrum.bands;
        Self {
            view_proj: view.view_proj.to_cols_array_2d(),
            scene: scene.to_cols_array_2d(),
            camera_pos: view.eye.extend(time).to_array(),
            camera_right: view.right.extend(0.0).to_array(),
            camera_up: view.up.extend(0.0).to_array(),
            spectrum: [b.bass, b.mid, b.high, spectrum.average],
            lights: [
                lighting.ambient,
                lighting.key,
                lighting.candle.intensity,
                lighting.candle.range * range_scale,
            ],
            candle_pos: candle_pos.extend(1.0).to_array(),
            candle_color: [
                lighting.candle.color[0],
                lighting.candle.color[1],
                lighting.candle.color[2],
                1.0,
            ],
        }
    }
}

/// Static per-instance attributes of a body particle, locations 8..=11.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodyAttributes {
    pub uv: [f32; 2],
    pub time_offset: f32,
    pub flash_factor: f32,
    pub edge: f32,
}

pub fn body_attributes(pops: &Populations) -> Vec<BodyAttributes> {
    pops.body
        .iter()
        .map(|p| BodyAttributes {
            uv: p.uv.to_array(),
            time_offset: p.time_offset,
            flash_factor: p.flash_factor,
            edge: if p.is_edge { 1.0 } else { 0.0 },
        })
        .collect()
}
