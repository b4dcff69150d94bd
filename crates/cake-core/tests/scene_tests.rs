// Host-side tests for the per-frame scene step.

use cake_core::config::{ParticleCounts, SceneConfig};
use cake_core::interaction::HandCursor;
use cake_core::population::ParticleClass;
use cake_core::CakeScene;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn small_scene() -> CakeScene {
    CakeScene::new(SceneConfig {
        counts: ParticleCounts {
            body: 200,
            gifts: 8,
            ornaments: 8,
            confetti: 20,
            sparkles: 10,
            flame: 30,
        },
        ..SceneConfig::default()
    })
}

#[test]
fn same_seed_same_scene() {
    let a = small_scene();
    let b = small_scene();
    let pa: Vec<_> = a.populations().body.iter().map(|p| p.target).collect();
    let pb: Vec<_> = b.populations().body.iter().map(|p| p.target).collect();
    assert_eq!(pa, pb);
}

#[test]
fn buffers_match_population_sizes() {
    let scene = small_scene();
    let buffers = scene.create_buffers();
    for class in ParticleClass::ALL {
        assert_eq!(buffers.class(class).len(), scene.populations().len(class));
    }
}

#[test]
fn silent_frames_use_the_synthetic_level() {
    let mut scene = small_scene();
    let mut buffers = scene.create_buffers();
    scene.frame(FRAME, None, None, &mut buffers);
    assert!(scene.spectrum().synthetic);
    scene.frame(FRAME, Some(&[0u8; 64]), None, &mut buffers);
    assert!(!scene.spectrum().synthetic);
    assert_eq!(scene.spectrum().average, 0.0);
}

#[test]
fn toggle_assembles_over_the_transition() {
    let mut scene = small_scene();
    let mut buffers = scene.create_buffers();
    assert!(scene.toggle());
    assert!(scene.is_assembled());
    for _ in 0..120 {
        scene.frame(FRAME, None, None, &mut buffers);
    }
    let mid = scene.progress();
    assert!(mid > 0.0 && mid < 1.0, "{mid}");
    for _ in 0..120 {
        scene.frame(FRAME, None, None, &mut buffers);
    }
    assert_eq!(scene.progress(), 1.0);
    assert!(buffers.class(ParticleClass::Flame).is_visible());
    assert!(buffers.class(ParticleClass::Sparkle).is_visible());

    assert!(!scene.set_assembled(true));
    assert!(scene.set_assembled(false));
}

#[test]
fn long_gaps_are_clamped() {
    let mut scene = small_scene();
    let mut buffers = scene.create_buffers();
    scene.set_assembled(true);
    scene.frame(Duration::from_secs(10), None, None, &mut buffers);
    assert!((scene.time() - 0.1).abs() < 1e-6);
    assert!(scene.progress() < 0.1);
}

#[test]
fn lost_hand_produces_no_events() {
    let mut scene = small_scene();
    let mut buffers = scene.create_buffers();
    let hand = HandCursor {
        x: 0.5,
        y: 0.5,
        pinching: true,
        detected: false,
    };
    for _ in 0..10 {
        let events = scene.frame(FRAME, None, Some(&hand), &mut buffers);
        assert!(events.is_empty());
    }
    assert_eq!(scene.interaction().hovered, None);
}

#[test]
fn assembled_scene_swallows_clicks() {
    let mut scene = small_scene();
    let mut buffers = scene.create_buffers();
    scene.set_assembled(true);
    scene.frame(FRAME, None, None, &mut buffers);
    for i in 0..10 {
        let x = i as f32 / 10.0;
        assert_eq!(scene.click(x, 0.5, &buffers), None);
    }
}

#[test]
fn uniforms_carry_time_and_aspect() {
    let mut scene = small_scene();
    let mut buffers = scene.create_buffers();
    scene.resize(800, 400);
    assert_eq!(scene.camera().aspect, 2.0);
    scene.frame(FRAME, None, None, &mut buffers);
    let u = scene.uniforms(&buffers);
    assert!((u.camera_pos[3] - 0.016).abs() < 1e-6);
    assert_eq!(u.scene, scene.scene_transform().to_cols_array_2d());
}

#[test]
fn camera_orbits_only_while_assembled() {
    let mut scene = small_scene();
    let mut buffers = scene.create_buffers();
    let start = scene.camera().eye;
    for _ in 0..30 {
        scene.frame(FRAME, None, None, &mut buffers);
    }
    assert_eq!(scene.camera().eye, start);

    scene.set_assembled(true);
    for _ in 0..60 {
        scene.frame(FRAME, None, None, &mut buffers);
    }
    let eye = scene.camera().eye;
    let target = scene.camera().target;
    assert_ne!(eye, start);
    assert!(((eye - target).length() - (start - target).length()).abs() < 1e-3);
    assert!((eye.y - start.y).abs() < 1e-5);
}

#[test]
fn zero_auto_rotate_keeps_camera_still() {
    let mut scene = CakeScene::new(SceneConfig {
        auto_rotate: 0.0,
        ..SceneConfig::default()
    });
    let mut buffers = scene.create_buffers();
    let start = scene.camera().eye;
    scene.set_assembled(true);
    for _ in 0..10 {
        scene.frame(FRAME, None, None, &mut buffers);
    }
    assert_eq!(scene.camera().eye, start);
}

#[test]
fn narrow_viewports_get_the_compact_layout() {
    let wide = SceneConfig::for_viewport_width(1280.0);
    let narrow = SceneConfig::for_viewport_width(390.0);
    assert_eq!(wide.scene_scale, SceneConfig::default().scene_scale);
    assert_eq!(narrow.scene_scale, 2.1);
    assert_eq!(narrow.scene_offset.y, -4.5);
    assert!(narrow.camera_eye.z > wide.camera_eye.z);
    // only placement changes
    assert_eq!(narrow.counts.body, wide.counts.body);
    assert_eq!(narrow.seed, wide.seed);
}

#[test]
fn first_frame_pinch_does_not_hit_placeholder_gifts() {
    let mut scene = small_scene();
    let mut buffers = scene.create_buffers();
    let hand = HandCursor {
        x: 0.5,
        y: 0.5,
        pinching: true,
        detected: true,
    };
    let events = scene.frame(FRAME, None, Some(&hand), &mut buffers);
    assert!(events.is_empty());
    assert_eq!(scene.interaction().hovered, None);
    assert!(buffers.class(ParticleClass::Gift).is_visible());
}
