//! One cake scene: populations, assembly, audio, interaction and the
//! animator, stepped together once per rendered frame.

use crate::animator::{Animator, FrameInput};
use crate::assembly::AssemblyDriver;
use crate::audio::{SpectrumExtractor, SpectrumFrame};
use crate::buffers::SceneBuffers;
use crate::camera::{scene_transform, Camera};
use crate::config::SceneConfig;
use crate::interaction::{
    resolve, resolve_click, Events, HandCursor, InteractionEvent, InteractionState, PickContext,
};
use crate::population::Populations;
use crate::shader::SceneUniforms;
use glam::Mat4;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

// Longer gaps (a backgrounded tab) are treated as one slow frame.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

pub struct CakeScene {
    config: SceneConfig,
    populations: Populations,
    driver: AssemblyDriver,
    animator: Animator,
    spectrum: SpectrumExtractor,
    last_spectrum: SpectrumFrame,
    interaction: InteractionState,
    camera: Camera,
    scene: Mat4,
    time: f32,
}

impl CakeScene {
    pub fn new(config: SceneConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let populations = Populations::generate(&config, &mut rng);
        let camera = Camera::from_config(&config, 16.0 / 9.0);
        let scene = scene_transform(&config);
        Self {
            driver: AssemblyDriver::new(config.transition),
            animator: Animator::new(config.seed.wrapping_add(1)),
            spectrum: SpectrumExtractor::new(),
            last_spectrum: SpectrumFrame::default(),
            interaction: InteractionState::default(),
            populations,
            camera,
            scene,
            time: 0.0,
            config,
        }
    }

    /// Fresh instance buffers sized for this scene's populations.
    pub fn create_buffers(&self) -> SceneBuffers {
        SceneBuffers::for_populations(&self.populations)
    }

    /// Runs one frame and returns the interaction events it produced.
    pub fn frame(
        &mut self,
        dt: Duration,
        audio: Option<&[u8]>,
        hand: Option<&HandCursor>,
        buffers: &mut SceneBuffers,
    ) -> Events {
        let dt = dt.min(MAX_FRAME_STEP);
        self.time += dt.as_secs_f32();

        let (interaction, events) = {
            let ctx = PickContext::new(&self.camera, self.scene, buffers);
            resolve(&self.interaction, hand, self.driver.target(), &ctx)
        };
        self.interaction = interaction;

        self.last_spectrum = self.spectrum.extract(audio, self.time);
        self.driver.advance(dt);
        if self.driver.target() {
            self.camera.orbit(self.config.auto_rotate * dt.as_secs_f32());
        }

        let input = FrameInput {
            time: self.time,
            dt: dt.as_secs_f32(),
            progress: self.driver.progress(),
            bands: self.last_spectrum.bands,
            level: self.last_spectrum.average,
            hovered: self.interaction.hovered,
            pinching: hand.map_or(false, |h| h.detected && h.pinching),
        };
        self.animator.animate(&mut self.populations, &input, buffers);
        events
    }

    pub fn set_assembled(&mut self, assembled: bool) -> bool {
        self.driver.set_target(assembled)
    }

    pub fn toggle(&mut self) -> bool {
        self.driver.toggle()
    }

    pub fn is_assembled(&self) -> bool {
        self.driver.target()
    }

    pub fn progress(&self) -> f32 {
        self.driver.progress()
    }

    /// Pointer click at a normalized screen point (x right, y down).
    pub fn click(&self, x: f32, y: f32, buffers: &SceneBuffers) -> Option<InteractionEvent> {
        let ctx = PickContext::new(&self.camera, self.scene, buffers);
        resolve_click(x, y, self.driver.target(), &ctx)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    pub fn uniforms(&self, buffers: &SceneBuffers) -> SceneUniforms {
        SceneUniforms::new(
            &self.camera.view_terms(),
            self.scene,
            self.time,
            &self.last_spectrum,
            &buffers.lighting,
        )
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn populations(&self) -> &Populations {
        &self.populations
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn spectrum(&self) -> SpectrumFrame {
        self.last_spectrum
    }

    pub fn scene_transform(&self) -> Mat4 {
        self.scene
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}
