use super::helpers::{self, linear_sampler};
use super::mesh::{self, Mesh};
use super::pipelines::{MaterialUniforms, ScenePipelines};
use super::post::{PostResources, PostSettings};
use super::targets::RenderTargets;
use cake_core::color::hex_linear;
use cake_core::shader::body_attributes;
use cake_core::{CakeScene, InstanceData, ParticleClass, SceneBuffers, TextureLibrary};
use std::ops::Range;
use wgpu::util::DeviceExt;

// Fog colour #050505; the scene clears to it so distant particles fade out.
const CLEAR_HEX: u32 = 0x050505;

const BODY_DISC_RADIUS: f32 = 0.014;
const CONFETTI_SIZE: (f32, f32) = (0.08, 0.2);

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: mesh.index_count(),
        }
    }

    fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint16);
    }
}

struct Material {
    _uniforms: wgpu::Buffer,
    group: wgpu::BindGroup,
}

impl Material {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params: MaterialUniforms,
    ) -> Self {
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
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
                    resource: uniforms.as_entire_binding(),
                },
            ],
        });
        Self {
            _uniforms: uniforms,
            group,
        }
    }
}

/// A draw of `mesh` over a contiguous run of instances sharing one material.
struct Batch {
    material: usize,
    instances: Range<u32>,
}

struct SceneMeshes {
    disc: GpuMesh,
    cube: GpuMesh,
    sphere: GpuMesh,
    confetti: GpuMesh,
    octahedron: GpuMesh,
    quad: GpuMesh,
    candle: Vec<(GpuMesh, Material)>,
}

/// Everything on the GPU side of one cake: surface, meshes, instance
/// buffers, textures, scene pipelines and the bloom chain.
pub struct Renderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    targets: RenderTargets,
    post: PostResources,
    pub post_settings: PostSettings,
    pipelines: ScenePipelines,
    globals: wgpu::Buffer,
    globals_group: wgpu::BindGroup,
    frosting_group: wgpu::BindGroup,
    meshes: SceneMeshes,
    instances: Vec<wgpu::Buffer>,
    candle_instance: wgpu::Buffer,
    body_attributes: wgpu::Buffer,
    materials: Vec<Material>,
    gift_batches: Vec<Batch>,
    ornament_batches: Vec<Batch>,
    confetti_material: usize,
    clear_color: wgpu::Color,
}

fn instance_buffer(device: &wgpu::Device, label: &str, len: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (len.max(1) * std::mem::size_of::<InstanceData>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn batches(ranges: &[Range<usize>], material_of: impl Fn(usize) -> Option<usize>) -> Vec<Batch> {
    ranges
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_empty())
        .filter_map(|(style, r)| {
            material_of(style).map(|material| Batch {
                material,
                instances: r.start as u32..r.end as u32,
            })
        })
        .collect()
}

impl<'w> Renderer<'w> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
        scene: &CakeScene,
    ) -> anyhow::Result<Self> {
        let (width, height) = (width.max(1), height.max(1));
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {e:?}"))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("surface {width}x{height} {format:?}");

        let targets = RenderTargets::new(&device, width, height);
        let post = PostResources::new(&device, format, &targets);
        let pipelines = ScenePipelines::new(&device)?;

        let globals = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<cake_core::SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_group"),
            layout: &pipelines.globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.as_entire_binding(),
            }],
        });

        let library = TextureLibrary::build(scene.config().texture_size)?;
        let repeat = linear_sampler(&device, "repeat_sampler", wgpu::AddressMode::Repeat);
        let clamp = linear_sampler(&device, "clamp_sampler", wgpu::AddressMode::ClampToEdge);
        let (_, frosting_color) =
            helpers::upload_rgba(&device, &queue, "frosting_color", &library.frosting.color, true);
        let (_, frosting_bump) =
            helpers::upload_rgba(&device, &queue, "frosting_bump", &library.frosting.bump, false);
        let frosting_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frosting_group"),
            layout: &pipelines.frosting_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&frosting_color),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&frosting_bump),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&repeat),
                },
            ],
        });

        let white = image::RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]));
        let (_, white_view) = helpers::upload_rgba(&device, &queue, "white", &white, true);
        let pattern_views: Vec<wgpu::TextureView> = library
            .patterns()
            .iter()
            .enumerate()
            .map(|(i, img)| helpers::upload_rgba(&device, &queue, &format!("pattern_{i}"), img, true).1)
            .collect();

        // Materials 0..patterns are the shared pattern surfaces; confetti follows.
        let mut materials: Vec<Material> = pattern_views
            .iter()
            .enumerate()
            .map(|(i, view)| {
                Material::new(
                    &device,
                    &pipelines.material_bgl,
                    &format!("pattern_material_{i}"),
                    view,
                    &clamp,
                    MaterialUniforms::new([1.0; 3], 1.0, 0.0, false),
                )
            })
            .collect();
        let confetti_material = materials.len();
        materials.push(Material::new(
            &device,
            &pipelines.material_bgl,
            "confetti_material",
            &white_view,
            &clamp,
            MaterialUniforms::new([1.0; 3], 0.2, 0.8, true),
        ));

        let pops = scene.populations();
        let gift_batches = batches(&pops.gift_ranges, |s| library.gift_pattern(s));
        let ornament_batches = batches(&pops.ornament_ranges, |s| library.ornament_pattern(s));

        let candle = mesh::candle_parts()
            .into_iter()
            .map(|part| {
                let gpu = GpuMesh::upload(&device, part.name, &part.mesh);
                let material = Material::new(
                    &device,
                    &pipelines.material_bgl,
                    part.name,
                    &white_view,
                    &clamp,
                    MaterialUniforms::new(hex_linear(part.color), part.roughness, part.metalness, false),
                );
                (gpu, material)
            })
            .collect();
        let meshes = SceneMeshes {
            disc: GpuMesh::upload(&device, "disc", &mesh::disc(BODY_DISC_RADIUS, 32)),
            cube: GpuMesh::upload(&device, "cube", &mesh::cube(1.0)),
            sphere: GpuMesh::upload(&device, "sphere", &mesh::uv_sphere(0.5, 32, 32)),
            confetti: GpuMesh::upload(
                &device,
                "confetti",
                &mesh::plane(CONFETTI_SIZE.0, CONFETTI_SIZE.1),
            ),
            octahedron: GpuMesh::upload(&device, "octahedron", &mesh::octahedron(1.0)),
            quad: GpuMesh::upload(&device, "quad", &mesh::quad()),
            candle,
        };

        let instances = ParticleClass::ALL
            .iter()
            .map(|&c| instance_buffer(&device, &format!("{c:?}_instances"), pops.len(c)))
            .collect();
        let candle_instance = instance_buffer(&device, "candle_instance", 1);
        let mut attributes = body_attributes(pops);
        if attributes.is_empty() {
            attributes.push(bytemuck::Zeroable::zeroed());
        }
        let body_attributes = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body_attributes"),
            contents: bytemuck::cast_slice(&attributes),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let [r, g, b] = hex_linear(CLEAR_HEX);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            targets,
            post,
            post_settings: PostSettings::default(),
            pipelines,
            globals,
            globals_group,
            frosting_group,
            meshes,
            instances,
            candle_instance,
            body_attributes,
            materials,
            gift_batches,
            ornament_batches,
            confetti_material,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.targets.recreate(&self.device, width, height);
        self.post.rebuild_bind_groups(&self.device, &self.targets);
    }

    /// Reconfigures the surface at its current size (after `SurfaceError::Lost`).
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn upload_instances(&self, buffers: &mut SceneBuffers) {
        for (class, gpu) in ParticleClass::ALL.iter().zip(&self.instances) {
            let cpu = buffers.class_mut(*class);
            if cpu.take_dirty() && !cpu.is_empty() {
                self.queue
                    .write_buffer(gpu, 0, bytemuck::cast_slice(cpu.as_slice()));
            }
        }
        if buffers.candle.take_dirty() && !buffers.candle.is_empty() {
            self.queue.write_buffer(
                &self.candle_instance,
                0,
                bytemuck::cast_slice(buffers.candle.as_slice()),
            );
        }
    }

    /// Uploads this frame's instances and uniforms, draws the scene into the
    /// HDR target and runs the bloom chain into the swapchain.
    pub fn render(&mut self, scene: &CakeScene, buffers: &mut SceneBuffers) -> Result<(), wgpu::SurfaceError> {
        self.upload_instances(buffers);
        let uniforms = scene.uniforms(buffers);
        self.queue
            .write_buffer(&self.globals, 0, bytemuck::bytes_of(&uniforms));
        self.post
            .write_uniforms(&self.queue, &self.post_settings, &self.targets, scene.time());

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.draw_scene(&mut rpass, buffers);
        }
        self.post.run(&mut encoder, &self.targets, &view);

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn draw_scene(&self, rpass: &mut wgpu::RenderPass<'_>, buffers: &SceneBuffers) {
        let count = |c: ParticleClass| {
            let buf = buffers.class(c);
            if buf.is_visible() {
                buf.len() as u32
            } else {
                0
            }
        };
        let instances = |c: ParticleClass| &self.instances[c.index()];
        let m = &self.meshes;
        rpass.set_bind_group(0, &self.globals_group, &[]);

        if count(ParticleClass::Body) > 0 {
            rpass.set_pipeline(&self.pipelines.body);
            rpass.set_bind_group(1, &self.frosting_group, &[]);
            m.disc.bind(rpass);
            rpass.set_vertex_buffer(1, instances(ParticleClass::Body).slice(..));
            rpass.set_vertex_buffer(2, self.body_attributes.slice(..));
            rpass.draw_indexed(0..m.disc.index_count, 0, 0..count(ParticleClass::Body));
        }

        rpass.set_pipeline(&self.pipelines.solid);
        for (class, mesh, list) in [
            (ParticleClass::Gift, &m.cube, &self.gift_batches),
            (ParticleClass::Ornament, &m.sphere, &self.ornament_batches),
        ] {
            if list.is_empty() || count(class) == 0 {
                continue;
            }
            mesh.bind(rpass);
            rpass.set_vertex_buffer(1, instances(class).slice(..));
            for batch in list {
                rpass.set_bind_group(1, &self.materials[batch.material].group, &[]);
                rpass.draw_indexed(0..mesh.index_count, 0, batch.instances.clone());
            }
        }
        if count(ParticleClass::Confetti) > 0 {
            m.confetti.bind(rpass);
            rpass.set_vertex_buffer(1, instances(ParticleClass::Confetti).slice(..));
            rpass.set_bind_group(1, &self.materials[self.confetti_material].group, &[]);
            rpass.draw_indexed(0..m.confetti.index_count, 0, 0..count(ParticleClass::Confetti));
        }
        if buffers.candle.is_visible() {
            rpass.set_vertex_buffer(1, self.candle_instance.slice(..));
            for (mesh, material) in &m.candle {
                mesh.bind(rpass);
                rpass.set_bind_group(1, &material.group, &[]);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        // additive, depth-tested without writes, drawn last
        for (class, pipeline, mesh) in [
            (ParticleClass::Sparkle, &self.pipelines.sparkle, &m.octahedron),
            (ParticleClass::Flame, &self.pipelines.flame, &m.quad),
        ] {
            let buf = buffers.class(class);
            if !buf.is_visible() || buf.is_empty() {
                continue;
            }
            rpass.set_pipeline(pipeline);
            mesh.bind(rpass);
            rpass.set_vertex_buffer(1, instances(class).slice(..));
            rpass.draw_indexed(0..mesh.index_count, 0, 0..buf.len() as u32);
        }
    }
}
