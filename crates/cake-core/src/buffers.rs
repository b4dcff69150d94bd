//! Per-class instance buffers the animator writes and the renderer uploads.
//!
//! Each buffer tracks its own dirty flag so a frontend uploads only what
//! changed, and a visibility flag for classes that switch off entirely
//! (sparkles before the cake settles, the flame before it is lit).

use crate::population::{ParticleClass, Populations};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

impl Default for InstanceData {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, [1.0; 4])
    }
}

#[derive(Clone, Debug)]
pub struct InstanceBuffer {
    instances: Vec<InstanceData>,
    dirty: bool,
    visible: bool,
}

impl InstanceBuffer {
    /// Starts hidden: the slots hold placeholders until the first write
    /// pass shows the buffer.
    pub fn with_len(len: usize) -> Self {
        Self {
            instances: vec![InstanceData::default(); len],
            dirty: true,
            visible: false,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Writes slot `i`; out-of-range indices are ignored and return false.
    pub fn write(&mut self, i: usize, data: InstanceData) -> bool {
        match self.instances.get_mut(i) {
            Some(slot) => {
                *slot = data;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, i: usize) -> Option<&InstanceData> {
        self.instances.get(i)
    }

    pub fn as_slice(&self) -> &[InstanceData] {
        &self.instances
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it; call once per upload.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Point light riding on the candle, in candle space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandleLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: f32,
}

impl Default for CandleLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.55, 0.0),
            color: [1.0, 0.4, 0.0],
            intensity: 0.0,
            range: 0.0,
        }
    }
}

/// Scene-wide light levels, refreshed every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLighting {
    pub ambient: f32,
    pub key: f32,
    pub candle: CandleLight,
    /// Candle model matrix, for placing the candle light in cake space.
    pub candle_model: [[f32; 4]; 4],
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            ambient: 0.2,
            key: 1.0,
            candle: CandleLight::default(),
            candle_model: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// All instance buffers for one scene. Owned by the frontend and lent to
/// the scene each frame.
#[derive(Clone, Debug)]
pub struct SceneBuffers {
    classes: Vec<InstanceBuffer>,
    pub candle: InstanceBuffer,
    pub lighting: SceneLighting,
}

impl SceneBuffers {
    pub fn for_populations(pops: &Populations) -> Self {
        Self {
            classes: ParticleClass::ALL
                .iter()
                .map(|&c| InstanceBuffer::with_len(pops.len(c)))
                .collect(),
            candle: InstanceBuffer::with_len(1),
            lighting: SceneLighting::default(),
        }
    }

    pub fn class(&self, class: ParticleClass) -> &InstanceBuffer {
        &self.classes[class.index()]
    }

    pub fn class_mut(&mut self, class: ParticleClass) -> &mut InstanceBuffer {
        &mut self.classes[class.index()]
    }
}
