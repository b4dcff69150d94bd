use super::helpers::{self, sampler_entry, texture_entry, uniform_entry, HDR_FORMAT};
use super::targets::RenderTargets;

/// Mirrors `PostUniforms` in `post.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    time: f32,
    exposure: f32,
    blur_dir: [f32; 2],
    bloom_strength: f32,
    threshold: f32,
    vignette: [f32; 2],
    _pad: [f32; 2],
}

/// Bloom and vignette settings for the composite.
#[derive(Clone, Copy, Debug)]
pub struct PostSettings {
    pub exposure: f32,
    pub bloom_strength: f32,
    /// Luminance where the bright pass starts to let light through.
    pub threshold: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            bloom_strength: 1.5,
            threshold: 1.0,
            vignette_offset: 0.5,
            vignette_darkness: 0.75,
        }
    }
}

// One uniform buffer per pass; all four are written before the single submit.
const PASSES: [&str; 4] = ["bright", "blur_h", "blur_v", "composite"];

pub(crate) struct PostResources {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    uniforms: [wgpu::Buffer; 4],
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    groups: PostBindGroups,
}

struct PostBindGroups {
    hdr_bright: wgpu::BindGroup,
    bloom_a_h: wgpu::BindGroup,
    bloom_b_v: wgpu::BindGroup,
    hdr_composite: wgpu::BindGroup,
    bloom_a_only: wgpu::BindGroup,
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        swap_format: wgpu::TextureFormat,
        targets: &RenderTargets,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(cake_core::shader::POST_WGSL.into()),
        });
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                texture_entry(0),
                sampler_entry(1),
                uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
        let sampler = helpers::linear_sampler(device, "post_sampler", wgpu::AddressMode::ClampToEdge);
        let uniforms = PASSES.map(|pass| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(pass),
                size: std::mem::size_of::<PostUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline = helpers::make_post_pipeline(
            device,
            &pl_bright_blur,
            &shader,
            "fs_bright",
            HDR_FORMAT,
            None,
        );
        let blur_pipeline = helpers::make_post_pipeline(
            device,
            &pl_bright_blur,
            &shader,
            "fs_blur",
            HDR_FORMAT,
            None,
        );
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            &pl_composite,
            &shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );
        let groups = PostBindGroups::new(device, &bgl0, &bgl1, &sampler, &uniforms, targets);
        Self {
            bgl0,
            bgl1,
            sampler,
            uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            groups,
        }
    }

    /// Call after the targets were recreated.
    pub(crate) fn rebuild_bind_groups(&mut self, device: &wgpu::Device, targets: &RenderTargets) {
        self.groups = PostBindGroups::new(
            device,
            &self.bgl0,
            &self.bgl1,
            &self.sampler,
            &self.uniforms,
            targets,
        );
    }

    pub(crate) fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        settings: &PostSettings,
        targets: &RenderTargets,
        time: f32,
    ) {
        let (bw, bh) = targets.bloom_size;
        let base = PostUniforms {
            resolution: [bw as f32, bh as f32],
            time,
            exposure: settings.exposure,
            blur_dir: [0.0, 0.0],
            bloom_strength: settings.bloom_strength,
            threshold: settings.threshold,
            vignette: [settings.vignette_offset, settings.vignette_darkness],
            _pad: [0.0; 2],
        };
        let dirs = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        for (buf, dir) in self.uniforms.iter().zip(dirs) {
            let u = PostUniforms {
                blur_dir: dir,
                ..base
            };
            queue.write_buffer(buf, 0, bytemuck::bytes_of(&u));
        }
    }

    /// Bright pass, two blur passes, then the composite into `output`.
    pub(crate) fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        output: &wgpu::TextureView,
    ) {
        let g = &self.groups;
        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &g.hdr_bright,
            None,
        );
        blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            &self.blur_pipeline,
            &g.bloom_a_h,
            None,
        );
        blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            &self.blur_pipeline,
            &g.bloom_b_v,
            None,
        );
        blit(
            encoder,
            "composite",
            output,
            &self.composite_pipeline,
            &g.hdr_composite,
            Some(&g.bloom_a_only),
        );
    }
}

impl PostBindGroups {
    fn new(
        device: &wgpu::Device,
        bgl0: &wgpu::BindGroupLayout,
        bgl1: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        uniforms: &[wgpu::Buffer; 4],
        targets: &RenderTargets,
    ) -> Self {
        let source = |label: &str, view: &wgpu::TextureView, buf: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buf.as_entire_binding(),
                    },
                ],
            })
        };
        let [bright, blur_h, blur_v, composite] = uniforms;
        Self {
            hdr_bright: source("bg_hdr_bright", &targets.hdr_view, bright),
            bloom_a_h: source("bg_from_bloom_a", &targets.bloom_a_view, blur_h),
            bloom_b_v: source("bg_from_bloom_b", &targets.bloom_b_view, blur_v),
            hdr_composite: source("bg_hdr_composite", &targets.hdr_view, composite),
            bloom_a_only: device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("bg_bloom_a_only"),
                layout: bgl1,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            }),
        }
    }
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
