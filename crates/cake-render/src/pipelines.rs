//! Scene pipelines: frosting body, lit solids and the two additive passes.

use super::helpers::{sampler_entry, texture_entry, uniform_entry, DEPTH_FORMAT, HDR_FORMAT};
use super::mesh::Vertex;
use cake_core::{BodyAttributes, InstanceData};

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
    7 => Float32x4,
];

const BODY_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    8 => Float32x2,
    9 => Float32,
    10 => Float32,
    11 => Float32,
];

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceData>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBUTES,
    }
}

fn body_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BodyAttributes>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &BODY_ATTRIBUTES,
    }
}

/// Mirrors `Material` in `solid.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MaterialUniforms {
    pub(crate) tint: [f32; 4],
    /// x = roughness, y = metalness, z = two-sided
    pub(crate) params: [f32; 4],
}

impl MaterialUniforms {
    pub(crate) fn new(tint: [f32; 3], roughness: f32, metalness: f32, two_sided: bool) -> Self {
        Self {
            tint: [tint[0], tint[1], tint[2], 1.0],
            params: [roughness, metalness, if two_sided { 1.0 } else { 0.0 }, 0.0],
        }
    }
}

pub(crate) struct ScenePipelines {
    pub(crate) globals_bgl: wgpu::BindGroupLayout,
    pub(crate) frosting_bgl: wgpu::BindGroupLayout,
    pub(crate) material_bgl: wgpu::BindGroupLayout,
    pub(crate) body: wgpu::RenderPipeline,
    pub(crate) solid: wgpu::RenderPipeline,
    pub(crate) sparkle: wgpu::RenderPipeline,
    pub(crate) flame: wgpu::RenderPipeline,
}

struct PipelineSpec<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
}

fn make_scene_pipeline(device: &wgpu::Device, spec: PipelineSpec) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(spec.layout),
        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some(spec.vs),
            buffers: spec.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        // double sided everywhere; closed meshes are unaffected
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: spec.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some(spec.fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: spec.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

/// src * alpha + dst
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

impl ScenePipelines {
    pub(crate) fn new(device: &wgpu::Device) -> anyhow::Result<Self> {
        let shader = |label: &str, source: String| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        };
        let body_shader = shader("body_shader", cake_core::shader::body_program()?);
        let solid_shader = shader("solid_shader", cake_core::shader::solid_program()?);
        let additive_shader = shader("additive_shader", cake_core::shader::additive_program()?);

        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let frosting_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frosting_bgl"),
            entries: &[texture_entry(0), texture_entry(1), sampler_entry(2)],
        });
        let material_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bgl"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let pl_body = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_body"),
            bind_group_layouts: &[&globals_bgl, &frosting_bgl],
            push_constant_ranges: &[],
        });
        let pl_solid = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_solid"),
            bind_group_layouts: &[&globals_bgl, &material_bgl],
            push_constant_ranges: &[],
        });
        let pl_additive = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_additive"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });

        let mesh_and_instance = [Vertex::layout(), instance_layout()];
        let body = make_scene_pipeline(
            device,
            PipelineSpec {
                label: "body_pipeline",
                layout: &pl_body,
                shader: &body_shader,
                vs: "vs_body",
                fs: "fs_body",
                buffers: &[Vertex::layout(), instance_layout(), body_layout()],
                blend: None,
                depth_write: true,
            },
        );
        let solid = make_scene_pipeline(
            device,
            PipelineSpec {
                label: "solid_pipeline",
                layout: &pl_solid,
                shader: &solid_shader,
                vs: "vs_solid",
                fs: "fs_solid",
                buffers: &mesh_and_instance,
                blend: None,
                depth_write: true,
            },
        );
        let sparkle = make_scene_pipeline(
            device,
            PipelineSpec {
                label: "sparkle_pipeline",
                layout: &pl_additive,
                shader: &additive_shader,
                vs: "vs_sparkle",
                fs: "fs_sparkle",
                buffers: &mesh_and_instance,
                blend: Some(ADDITIVE),
                depth_write: false,
            },
        );
        let flame = make_scene_pipeline(
            device,
            PipelineSpec {
                label: "flame_pipeline",
                layout: &pl_additive,
                shader: &additive_shader,
                vs: "vs_flame",
                fs: "fs_flame",
                buffers: &mesh_and_instance,
                blend: Some(ADDITIVE),
                depth_write: false,
            },
        );
        log::info!("scene pipelines ready");
        Ok(Self {
            globals_bgl,
            frosting_bgl,
            material_bgl,
            body,
            solid,
            sparkle,
            flame,
        })
    }
}
