// Host-side tests for hover, pinch and click resolution.

use cake_core::buffers::{InstanceData, SceneBuffers};
use cake_core::camera::Camera;
use cake_core::config::{ParticleCounts, SceneConfig};
use cake_core::interaction::{
    dispatch, ray_cube, ray_sphere, resolve, resolve_click, HandCursor, InstanceRef,
    InteractionEvent, InteractionSink, InteractionState, PickContext,
};
use cake_core::population::{ParticleClass, Populations};
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CENTER: HandCursor = HandCursor {
    x: 0.5,
    y: 0.5,
    pinching: false,
    detected: true,
};

fn config() -> SceneConfig {
    SceneConfig {
        counts: ParticleCounts {
            body: 0,
            gifts: 1,
            ornaments: 1,
            confetti: 0,
            sparkles: 0,
            flame: 0,
        },
        ..SceneConfig::default()
    }
}

/// One gift and one ornament, placed by hand.
fn buffers(gift_at: Vec3, ornament_at: Vec3) -> SceneBuffers {
    let pops = Populations::generate(&config(), &mut StdRng::seed_from_u64(1));
    let mut buffers = SceneBuffers::for_populations(&pops);
    buffers
        .class_mut(ParticleClass::Gift)
        .write(0, InstanceData::new(Mat4::from_translation(gift_at), [1.0; 4]));
    buffers
        .class_mut(ParticleClass::Ornament)
        .write(0, InstanceData::new(Mat4::from_translation(ornament_at), [1.0; 4]));
    buffers.class_mut(ParticleClass::Gift).set_visible(true);
    buffers.class_mut(ParticleClass::Ornament).set_visible(true);
    buffers
}

fn camera() -> Camera {
    Camera::from_config(&config(), 1.0)
}

fn pinch(pinching: bool) -> HandCursor {
    HandCursor { pinching, ..CENTER }
}

#[test]
fn ray_hits_sphere_front_face() {
    let t = ray_sphere(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, Vec3::ZERO, 1.0);
    assert_eq!(t, Some(4.0));
    assert_eq!(ray_sphere(Vec3::new(3.0, 0.0, 5.0), -Vec3::Z, Vec3::ZERO, 1.0), None);
    // behind the origin
    assert_eq!(ray_sphere(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, Vec3::ZERO, 1.0), None);
}

#[test]
fn ray_sphere_accepts_unnormalized_direction() {
    let t = ray_sphere(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, 1.0);
    assert_eq!(t, Some(2.0));
}

#[test]
fn ray_hits_cube_slabs() {
    let t = ray_cube(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.5);
    assert_eq!(t, Some(4.5));
    assert_eq!(ray_cube(Vec3::new(0.6, 0.0, 5.0), -Vec3::Z, 0.5), None);
    // starting inside
    assert_eq!(ray_cube(Vec3::ZERO, Vec3::X, 0.5), Some(0.0));
}

#[test]
fn gift_wins_over_ornament() {
    let cam = camera();
    let buffers = buffers(Vec3::ZERO, Vec3::ZERO);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    let (state, events) = resolve(&InteractionState::default(), Some(&CENTER), false, &ctx);
    assert_eq!(
        state.hovered,
        Some(InstanceRef {
            class: ParticleClass::Gift,
            index: 0
        })
    );
    assert!(events.is_empty());
}

#[test]
fn ornament_hovered_when_no_gift_under_cursor() {
    let cam = camera();
    let buffers = buffers(Vec3::new(50.0, 0.0, 0.0), Vec3::ZERO);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    let (state, _) = resolve(&InteractionState::default(), Some(&CENTER), false, &ctx);
    assert_eq!(
        state.hovered,
        Some(InstanceRef {
            class: ParticleClass::Ornament,
            index: 0
        })
    );
}

#[test]
fn empty_space_hovers_nothing() {
    let cam = camera();
    let far = Vec3::new(50.0, 0.0, 0.0);
    let buffers = buffers(far, far);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    let (state, events) = resolve(&InteractionState::default(), Some(&pinch(true)), false, &ctx);
    assert_eq!(state.hovered, None);
    assert!(!state.pinch_latched);
    assert!(events.is_empty());
}

#[test]
fn scene_transform_moves_targets() {
    let cam = camera();
    let buffers = buffers(Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
    let shifted = Mat4::from_translation(Vec3::new(-10.0, 0.0, 0.0));
    let ctx = PickContext::new(&cam, shifted, &buffers);
    let (state, _) = resolve(&InteractionState::default(), Some(&CENTER), false, &ctx);
    assert_eq!(state.hovered.map(|h| h.class), Some(ParticleClass::Gift));
}

#[test]
fn pinch_fires_once_per_press() {
    let cam = camera();
    let buffers = buffers(Vec3::ZERO, Vec3::ZERO);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);

    let (s1, e1) = resolve(&InteractionState::default(), Some(&pinch(true)), false, &ctx);
    assert_eq!(e1.as_slice(), &[InteractionEvent::GestureInteract { active: true }]);
    assert!(s1.pinch_latched);

    // held pinch: no repeat
    let (s2, e2) = resolve(&s1, Some(&pinch(true)), false, &ctx);
    assert!(e2.is_empty());
    assert!(s2.pinch_latched);

    // release re-arms without a callback
    let (s3, e3) = resolve(&s2, Some(&pinch(false)), false, &ctx);
    assert!(e3.is_empty());
    assert!(!s3.pinch_latched);

    let (_, e4) = resolve(&s3, Some(&pinch(true)), false, &ctx);
    assert_eq!(e4.as_slice(), &[InteractionEvent::GestureInteract { active: true }]);
}

#[test]
fn lost_hand_clears_hover_and_latch() {
    let cam = camera();
    let buffers = buffers(Vec3::ZERO, Vec3::ZERO);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    let (s1, _) = resolve(&InteractionState::default(), Some(&pinch(true)), false, &ctx);

    let lost = HandCursor {
        detected: false,
        ..pinch(true)
    };
    let (s2, events) = resolve(&s1, Some(&lost), false, &ctx);
    assert_eq!(s2.hovered, None);
    assert!(!s2.pinch_latched);
    assert!(events.is_empty());
    assert_eq!(s2.last_cursor, Some(pinch(true)));

    let (s3, events) = resolve(&s2, None, false, &ctx);
    assert_eq!(s3.hovered, None);
    assert!(events.is_empty());
}

#[test]
fn assembled_cake_ignores_the_hand() {
    let cam = camera();
    let buffers = buffers(Vec3::ZERO, Vec3::ZERO);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    let (state, events) = resolve(&InteractionState::default(), Some(&pinch(true)), true, &ctx);
    assert_eq!(state.hovered, None);
    assert!(!state.pinch_latched);
    assert!(events.is_empty());
}

#[test]
fn click_lands_only_while_scattered() {
    let cam = camera();
    let buffers = buffers(Vec3::ZERO, Vec3::ZERO);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    assert_eq!(resolve_click(0.5, 0.5, false, &ctx), Some(InteractionEvent::ObjectClick));
    assert_eq!(resolve_click(0.5, 0.5, true, &ctx), None);
    assert_eq!(resolve_click(0.02, 0.02, false, &ctx), None);
}

#[test]
fn hidden_buffers_cannot_be_picked() {
    let cam = camera();
    let mut buffers = buffers(Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0));
    buffers.class_mut(ParticleClass::Gift).set_visible(false);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    assert_eq!(resolve_click(0.5, 0.5, false, &ctx), None);
}

#[derive(Default)]
struct Recorder {
    gestures: Vec<bool>,
    clicks: usize,
}

impl InteractionSink for Recorder {
    fn on_gesture_interact(&mut self, active: bool) {
        self.gestures.push(active);
    }

    fn on_object_click(&mut self) {
        self.clicks += 1;
    }
}

#[test]
fn held_pinch_calls_the_sink_once_per_press() {
    let cam = camera();
    let buffers = buffers(Vec3::ZERO, Vec3::ZERO);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    let mut sink = Recorder::default();
    let mut state = InteractionState::default();
    for pinching in [true, true, true, true, false, false, true, true, false] {
        let (next, events) = resolve(&state, Some(&pinch(pinching)), false, &ctx);
        dispatch(&events, &mut sink);
        state = next;
    }
    assert_eq!(sink.gestures, vec![true, true]);
}

#[test]
fn pinching_an_ornament_fires_nothing() {
    let cam = camera();
    let buffers = buffers(Vec3::new(50.0, 0.0, 0.0), Vec3::ZERO);
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    let mut sink = Recorder::default();
    let mut state = InteractionState::default();
    for pinching in [true, true, false, true] {
        let (next, events) = resolve(&state, Some(&pinch(pinching)), false, &ctx);
        assert_eq!(next.hovered.map(|h| h.class), Some(ParticleClass::Ornament));
        assert!(!next.pinch_latched);
        dispatch(&events, &mut sink);
        state = next;
    }
    assert!(sink.gestures.is_empty());
}

#[test]
fn unwritten_buffers_cannot_be_picked() {
    let pops = Populations::generate(&config(), &mut StdRng::seed_from_u64(1));
    let buffers = SceneBuffers::for_populations(&pops);
    let cam = camera();
    let ctx = PickContext::new(&cam, Mat4::IDENTITY, &buffers);
    let (state, events) = resolve(&InteractionState::default(), Some(&pinch(true)), false, &ctx);
    assert_eq!(state.hovered, None);
    assert!(!state.pinch_latched);
    assert!(events.is_empty());
}

#[test]
fn dispatch_forwards_in_order() {
    let mut sink = Recorder::default();
    dispatch(
        &[
            InteractionEvent::GestureInteract { active: true },
            InteractionEvent::ObjectClick,
            InteractionEvent::GestureInteract { active: false },
        ],
        &mut sink,
    );
    assert_eq!(sink.gestures, vec![true, false]);
    assert_eq!(sink.clicks, 1);
}
