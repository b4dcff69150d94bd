use crate::api::{with_controls, Command, JsSink};
use cake_core::constants::SPECTRUM_BINS;
use cake_core::{CakeScene, SceneBuffers};
use cake_render::Renderer;
use instant::Instant;
use web_sys as web;

pub struct FrameContext {
    pub scene: CakeScene,
    pub buffers: SceneBuffers,
    pub gpu: Renderer<'static>,
    pub canvas: web::HtmlCanvasElement,
    pub last_instant: Instant,
    bins: Vec<u8>,
}

impl FrameContext {
    pub fn new(scene: CakeScene, gpu: Renderer<'static>, canvas: web::HtmlCanvasElement) -> Self {
        let buffers = scene.create_buffers();
        Self {
            scene,
            buffers,
            gpu,
            canvas,
            last_instant: Instant::now(),
            bins: vec![0; SPECTRUM_BINS],
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        let (width, height) = (self.canvas.width(), self.canvas.height());
        if (width, height) != self.gpu.size() && width > 0 && height > 0 {
            self.gpu.resize(width, height);
            self.scene.resize(width, height);
        }

        let bins = &mut self.bins;
        let (commands, hand, clicks, has_audio) = with_controls(|c| {
            let has_audio = match c.audio.as_mut().and_then(|tap| tap.snapshot()) {
                Some(snapshot) => {
                    let n = snapshot.len().min(bins.len());
                    bins[..n].copy_from_slice(&snapshot[..n]);
                    true
                }
                None => false,
            };
            (
                std::mem::take(&mut c.commands),
                c.hand,
                std::mem::take(&mut c.clicks),
                has_audio,
            )
        });

        for cmd in commands {
            let changed = match cmd {
                Command::SetAssembled(a) => self.scene.set_assembled(a),
                Command::Toggle => self.scene.toggle(),
            };
            if changed {
                log::debug!("assembly target -> {}", self.scene.is_assembled());
            }
        }

        let audio = has_audio.then_some(self.bins.as_slice());
        let mut events = self
            .scene
            .frame(dt, audio, hand.as_ref(), &mut self.buffers);
        for [x, y] in clicks {
            events.extend(self.scene.click(x, y, &self.buffers));
        }

        let progress = self.scene.progress();
        with_controls(|c| c.progress = progress);
        if !events.is_empty() {
            JsSink::current().emit(&events);
        }

        match self.gpu.render(&self.scene, &mut self.buffers) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => log::error!("render error: out of memory"),
            Err(e) => log::warn!("render error: {:?}", e),
        }
    }
}
