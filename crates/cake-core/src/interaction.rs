//! Hand-cursor hover, pinch and click resolution against the decorations.
//!
//! [`resolve`] is a pure step: previous state plus this frame's hand sample
//! in, next state plus events out. Gifts are tested first; an ornament can
//! only be hovered when no gift is under the cursor. A pinch fires once per
//! press, and only on a gift.

use crate::buffers::{InstanceBuffer, SceneBuffers};
use crate::camera::{ndc_from_screen, Camera, Ray};
use crate::population::ParticleClass;
use glam::{Mat4, Vec3};
use smallvec::SmallVec;

/// One hand-tracking sample in normalized screen space (x right, y down).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandCursor {
    pub x: f32,
    pub y: f32,
    pub pinching: bool,
    pub detected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceRef {
    pub class: ParticleClass,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
    GestureInteract { active: bool },
    ObjectClick,
}

pub type Events = SmallVec<[InteractionEvent; 2]>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub hovered: Option<InstanceRef>,
    /// Set on the frame a pinch fires, cleared when the pinch is released.
    pub pinch_latched: bool,
    /// Last sample seen, kept while the hand is lost.
    pub last_cursor: Option<HandCursor>,
}

/// Receives interaction events; frontends forward them to the page or app.
pub trait InteractionSink {
    fn on_gesture_interact(&mut self, active: bool);
    fn on_object_click(&mut self);
}

pub fn dispatch<S: InteractionSink + ?Sized>(events: &[InteractionEvent], sink: &mut S) {
    for ev in events {
        match *ev {
            InteractionEvent::GestureInteract { active } => sink.on_gesture_interact(active),
            InteractionEvent::ObjectClick => sink.on_object_click(),
        }
    }
}

/// What a pick ray is tested against this frame.
pub struct PickContext<'a> {
    pub camera: &'a Camera,
    /// Cake group to world.
    pub scene: Mat4,
    pub gifts: &'a InstanceBuffer,
    pub ornaments: &'a InstanceBuffer,
}

impl<'a> PickContext<'a> {
    pub fn new(camera: &'a Camera, scene: Mat4, buffers: &'a SceneBuffers) -> Self {
        Self {
            camera,
            scene,
            gifts: buffers.class(ParticleClass::Gift),
            ornaments: buffers.class(ParticleClass::Ornament),
        }
    }
}

/// Ray against a sphere; `dir` need not be unit length.
#[inline]
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let a = dir.dot(dir);
    if a <= f32::EPSILON {
        return None;
    }
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / a;
    (t >= 0.0).then_some(t)
}

/// Slab test against the axis-aligned cube `[-half, half]^3`.
pub fn ray_cube(origin: Vec3, dir: Vec3, half: f32) -> Option<f32> {
    let mut t_min = 0.0f32;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-12 {
            if o < -half || o > half {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (t0, t1) = {
            let a = (-half - o) * inv;
            let b = (half - o) * inv;
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}

#[derive(Clone, Copy)]
enum Shape {
    Cube,
    Sphere,
}

// Unit gift box and ornament sphere, in instance space.
const GIFT_HALF_EXTENT: f32 = 0.5;
const ORNAMENT_RADIUS: f32 = 0.5;

fn nearest_hit(ray: &Ray, scene: Mat4, buf: &InstanceBuffer, shape: Shape) -> Option<(usize, f32)> {
    if !buf.is_visible() {
        return None;
    }
    let mut best: Option<(usize, f32)> = None;
    for (i, inst) in buf.as_slice().iter().enumerate() {
        let world = scene * inst.model();
        if world.determinant().abs() < 1e-12 {
            continue;
        }
        let local = ray.transformed(&world.inverse());
        let hit = match shape {
            Shape::Cube => ray_cube(local.origin, local.dir, GIFT_HALF_EXTENT),
            Shape::Sphere => ray_sphere(local.origin, local.dir, Vec3::ZERO, ORNAMENT_RADIUS),
        };
        if let Some(t) = hit {
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((i, t));
            }
        }
    }
    best
}

/// Nearest gift under the ray, else the nearest ornament.
pub fn pick(ray: &Ray, ctx: &PickContext) -> Option<InstanceRef> {
    if let Some((index, _)) = nearest_hit(ray, ctx.scene, ctx.gifts, Shape::Cube) {
        return Some(InstanceRef {
            class: ParticleClass::Gift,
            index,
        });
    }
    nearest_hit(ray, ctx.scene, ctx.ornaments, Shape::Sphere).map(|(index, _)| InstanceRef {
        class: ParticleClass::Ornament,
        index,
    })
}

/// Advances the interaction state by one hand sample.
pub fn resolve(
    prev: &InteractionState,
    hand: Option<&HandCursor>,
    assembled: bool,
    ctx: &PickContext,
) -> (InteractionState, Events) {
    let mut events = Events::new();
    let hand = match hand {
        Some(h) if h.detected => *h,
        _ => {
            return (
                InteractionState {
                    hovered: None,
                    pinch_latched: false,
                    last_cursor: prev.last_cursor,
                },
                events,
            );
        }
    };
    let mut next = InteractionState {
        hovered: None,
        pinch_latched: prev.pinch_latched,
        last_cursor: Some(hand),
    };
    if assembled {
        next.pinch_latched = false;
        return (next, events);
    }

    let ray = ctx.camera.ray_from_ndc(ndc_from_screen(hand.x, hand.y));
    next.hovered = pick(&ray, ctx);

    // Only gifts answer a pinch; ornaments just show hover feedback.
    let gift_hovered = matches!(
        next.hovered,
        Some(InstanceRef {
            class: ParticleClass::Gift,
            ..
        })
    );
    if gift_hovered && hand.pinching && !next.pinch_latched {
        next.pinch_latched = true;
        events.push(InteractionEvent::GestureInteract { active: true });
    } else if !hand.pinching {
        // release re-arms silently
        next.pinch_latched = false;
    }
    (next, events)
}

/// A pointer click at a normalized screen point; only lands while scattered.
pub fn resolve_click(x: f32, y: f32, assembled: bool, ctx: &PickContext) -> Option<InteractionEvent> {
    if assembled {
        return None;
    }
    let ray = ctx.camera.ray_from_ndc(ndc_from_screen(x, y));
    pick(&ray, ctx).map(|_| InteractionEvent::ObjectClick)
}
