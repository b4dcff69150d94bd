//! Platform-free core of the particle cake: populations, assembly,
//! audio bands, procedural textures, shader composition and gesture
//! picking. Both frontends and the renderer build on this crate.

pub mod analyser;
pub mod animator;
pub mod assembly;
pub mod audio;
pub mod buffers;
pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod glow;
pub mod interaction;
pub mod noise;
pub mod population;
pub mod scene;
pub mod shader;
pub mod texture;

pub use analyser::ByteAnalyser;
pub use assembly::AssemblyDriver;
pub use audio::{AudioBands, SpectrumExtractor, SpectrumFrame};
pub use buffers::{InstanceBuffer, InstanceData, SceneBuffers, SceneLighting};
pub use camera::Camera;
pub use config::{ParticleCounts, SceneConfig};
pub use error::{ShaderError, TextureError};
pub use interaction::{HandCursor, InstanceRef, InteractionEvent, InteractionSink};
pub use population::{CakeTier, ParticleClass, Populations};
pub use scene::CakeScene;
pub use shader::{BodyAttributes, SceneUniforms};
pub use texture::TextureLibrary;
