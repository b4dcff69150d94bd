//! Desktop front-end. Space toggles assembly, the mouse stands in for the
//! tracked hand (left button pinches) and right click is a pointer click.

mod mic;

use cake_core::interaction::dispatch;
use cake_core::{ByteAnalyser, CakeScene, HandCursor, InteractionSink, SceneBuffers, SceneConfig};
use cake_render::Renderer;
use mic::Microphone;
use std::time::Instant;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

// A few analyser windows of history is plenty at any common rate.
const MIC_RING: usize = 4096;

/// Logs what the web page would receive as callbacks.
struct LogSink;

impl InteractionSink for LogSink {
    fn on_gesture_interact(&mut self, active: bool) {
        log::info!("gesture interact: active={active}");
    }

    fn on_object_click(&mut self) {
        log::info!("object click");
    }
}

struct App<'w> {
    window: &'w Window,
    gpu: Renderer<'w>,
    scene: CakeScene,
    buffers: SceneBuffers,
    mic: Option<Microphone>,
    analyser: ByteAnalyser,
    samples: Vec<f32>,
    bins: Vec<u8>,
    cursor: HandCursor,
    clicks: Vec<[f32; 2]>,
    last_frame: Instant,
}

impl<'w> App<'w> {
    async fn new(window: &'w Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let mut scene = CakeScene::new(SceneConfig::default());
        let gpu = Renderer::new(window, size.width, size.height, &scene).await?;
        scene.resize(size.width, size.height);
        let buffers = scene.create_buffers();
        let mic = Microphone::start(MIC_RING);
        if mic.is_none() {
            log::info!("no microphone; using the synthetic spectrum");
        }
        let analyser = ByteAnalyser::default();
        let bins = vec![0; analyser.bin_count()];
        Ok(Self {
            window,
            gpu,
            scene,
            buffers,
            mic,
            analyser,
            samples: Vec::with_capacity(MIC_RING),
            bins,
            cursor: HandCursor::default(),
            clicks: Vec::new(),
            last_frame: Instant::now(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.gpu.resize(size.width, size.height);
        self.scene.resize(size.width, size.height);
    }

    fn cursor_moved(&mut self, x: f64, y: f64) {
        let size = self.window.inner_size();
        self.cursor.x = (x / size.width.max(1) as f64) as f32;
        self.cursor.y = (y / size.height.max(1) as f64) as f32;
        self.cursor.detected = true;
    }

    fn mouse_input(&mut self, button: MouseButton, state: ElementState) {
        match (button, state) {
            (MouseButton::Left, s) => self.cursor.pinching = s == ElementState::Pressed,
            (MouseButton::Right, ElementState::Pressed) => {
                self.clicks.push([self.cursor.x, self.cursor.y])
            }
            _ => {}
        }
    }

    fn toggle(&mut self) {
        self.scene.toggle();
        log::info!(
            "assembly -> {}",
            if self.scene.is_assembled() { "assembled" } else { "scattered" }
        );
    }

    fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;

        let audio = match &self.mic {
            Some(mic) => {
                mic.snapshot(&mut self.samples);
                self.analyser.analyse(&self.samples, &mut self.bins);
                Some(self.bins.as_slice())
            }
            None => None,
        };
        let mut events = self
            .scene
            .frame(dt, audio, Some(&self.cursor), &mut self.buffers);
        for [x, y] in self.clicks.drain(..) {
            events.extend(self.scene.click(x, y, &self.buffers));
        }
        dispatch(&events, &mut LogSink);

        self.gpu.render(&self.scene, &mut self.buffers)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Particle Cake (native)")
        .build(&event_loop)?;

    let mut app = pollster::block_on(App::new(&window))?;
    app.scene.set_assembled(true);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => app.cursor_moved(position.x, position.y),
            WindowEvent::CursorLeft { .. } => {
                app.cursor.detected = false;
                app.cursor.pinching = false;
            }
            WindowEvent::MouseInput { state, button, .. } => app.mouse_input(button, state),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Space) => app.toggle(),
                Key::Named(NamedKey::Escape) => elwt.exit(),
                _ => {}
            },
            _ => {}
        },
        Event::AboutToWait => match app.frame() {
            Ok(_) => app.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                app.resize(app.window.inner_size());
                app.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(e) => log::warn!("render error: {e:?}"),
        },
        _ => {}
    })?;
    Ok(())
}
