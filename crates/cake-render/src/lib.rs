//! wgpu renderer for the particle cake, shared by the web and native
//! front-ends. Owns the GPU copies of the scene's instance buffers and
//! draws them through the composed scene programs and a bloom chain.

mod helpers;
pub mod mesh;
mod pipelines;
mod post;
mod renderer;
mod targets;

pub use helpers::{DEPTH_FORMAT, HDR_FORMAT};
pub use post::PostSettings;
pub use renderer::Renderer;
