// Host-side tests for the per-frame animator.

use cake_core::animator::{candle_pose, drift_weight, interaction_scale, spin_y, Animator, FrameInput};
use cake_core::audio::AudioBands;
use cake_core::buffers::SceneBuffers;
use cake_core::config::{ParticleCounts, SceneConfig};
use cake_core::interaction::InstanceRef;
use cake_core::population::{ParticleClass, Populations};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::PI;

fn setup() -> (Populations, SceneBuffers, Animator) {
    let cfg = SceneConfig {
        counts: ParticleCounts {
            body: 120,
            gifts: 6,
            ornaments: 6,
            confetti: 12,
            sparkles: 10,
            flame: 20,
        },
        ..SceneConfig::default()
    };
    let pops = Populations::generate(&cfg, &mut StdRng::seed_from_u64(21));
    let buffers = SceneBuffers::for_populations(&pops);
    (pops, buffers, Animator::new(99))
}

fn input(progress: f32, time: f32) -> FrameInput {
    FrameInput {
        time,
        dt: 1.0 / 60.0,
        progress,
        ..FrameInput::default()
    }
}

#[test]
fn spin_is_a_rotation_about_y() {
    let p = Vec3::new(1.0, 2.0, 0.0);
    let q = spin_y(p, PI / 2.0);
    assert!((q - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-5);
    assert!((spin_y(p, 0.3).length() - p.length()).abs() < 1e-5);
}

#[test]
fn drift_fades_out_continuously() {
    assert_eq!(drift_weight(0.0), 1.0);
    assert!((drift_weight(0.1) - 0.5).abs() < 1e-6);
    assert_eq!(drift_weight(0.2), 0.0);
    assert_eq!(drift_weight(0.7), 0.0);
}

#[test]
fn start_and_target_never_change() {
    let (mut pops, mut buffers, mut anim) = setup();
    let before: Vec<(Vec3, Vec3)> = pops.body.iter().map(|p| (p.start, p.target)).collect();
    for i in 0..30 {
        anim.animate(&mut pops, &input(i as f32 / 30.0, i as f32 * 0.1), &mut buffers);
    }
    let after: Vec<(Vec3, Vec3)> = pops.body.iter().map(|p| (p.start, p.target)).collect();
    assert_eq!(before, after);
}

#[test]
fn scattered_body_sits_at_start() {
    let (mut pops, mut buffers, mut anim) = setup();
    anim.animate(&mut pops, &input(0.0, 0.0), &mut buffers);
    let buf = buffers.class(ParticleClass::Body);
    for (i, p) in pops.body.iter().enumerate() {
        let t = buf.get(i).map(|d| d.translation()).unwrap_or_default();
        assert!((t.x - p.start.x).abs() < 1e-5);
        assert!((t.z - p.start.z).abs() < 1e-5);
        // only the vertical drift
        assert!((t.y - p.start.y).abs() <= 0.05 + 1e-5);
    }
}

#[test]
fn assembled_body_sits_near_target() {
    let (mut pops, mut buffers, mut anim) = setup();
    anim.animate(&mut pops, &input(1.0, 0.0), &mut buffers);
    let buf = buffers.class(ParticleClass::Body);
    for (i, p) in pops.body.iter().enumerate() {
        let t = buf.get(i).map(|d| d.translation()).unwrap_or_default();
        // breathing plus beat bounce
        assert!((t - p.target).length() < 0.15, "{t:?} vs {:?}", p.target);
    }
}

#[test]
fn every_class_is_marked_dirty() {
    let (mut pops, mut buffers, mut anim) = setup();
    for class in ParticleClass::ALL {
        buffers.class_mut(class).take_dirty();
    }
    anim.animate(&mut pops, &input(0.5, 1.0), &mut buffers);
    for class in [
        ParticleClass::Body,
        ParticleClass::Gift,
        ParticleClass::Ornament,
        ParticleClass::Confetti,
        ParticleClass::Flame,
    ] {
        assert!(buffers.class_mut(class).take_dirty(), "{class:?}");
        assert!(!buffers.class(class).is_dirty());
    }
}

#[test]
fn sparkles_hidden_until_nearly_assembled() {
    let (mut pops, mut buffers, mut anim) = setup();
    anim.animate(&mut pops, &input(0.8, 1.0), &mut buffers);
    assert!(!buffers.class(ParticleClass::Sparkle).is_visible());
    anim.animate(&mut pops, &input(0.85, 1.0), &mut buffers);
    assert!(buffers.class(ParticleClass::Sparkle).is_visible());
}

#[test]
fn sparkle_respawns_when_wave_bottoms_out() {
    let (mut pops, mut buffers, mut anim) = setup();
    let far = Vec3::new(100.0, 100.0, 100.0);
    pops.sparkles[0].position = far;
    pops.sparkles[0].phase = 1.5 * PI;
    pops.sparkles[0].speed = 0.0;
    anim.animate(&mut pops, &input(1.0, 2.0), &mut buffers);
    let s = &pops.sparkles[0];
    assert_ne!(s.position, far);
    assert!(pops.sparkle_spawn.contains(s.position, 0.0), "{:?}", s.position);
}

#[test]
fn sparkles_rise_between_respawns() {
    let (mut pops, mut buffers, mut anim) = setup();
    pops.sparkles[1].phase = 0.5 * PI;
    pops.sparkles[1].speed = 0.0;
    let y0 = pops.sparkles[1].position.y;
    anim.animate(&mut pops, &input(1.0, 2.0), &mut buffers);
    let rise = pops.sparkles[1].position.y - y0;
    assert!((rise - 0.18 / 60.0).abs() < 1e-5);
}

#[test]
fn hovered_gift_grows_and_tints() {
    let (mut pops, mut buffers, mut anim) = setup();
    anim.animate(&mut pops, &input(0.0, 1.0), &mut buffers);
    let plain = buffers.class(ParticleClass::Gift).get(0).copied().unwrap_or_default();

    let mut hovered = input(0.0, 1.0);
    hovered.hovered = Some(InstanceRef {
        class: ParticleClass::Gift,
        index: 0,
    });
    anim.animate(&mut pops, &hovered, &mut buffers);
    let lit = buffers.class(ParticleClass::Gift).get(0).copied().unwrap_or_default();

    let ratio = lit.model().x_axis.length() / plain.model().x_axis.length();
    assert!((ratio - 1.2).abs() < 1e-4);
    let [r, g, b] = cake_core::color::hex_linear(0xFFFF99);
    assert_eq!(lit.color, [r, g, b, 1.0]);
    // #99 is about 0.32 once linearized, not 0.6
    assert!((lit.color[2] - 0.318).abs() < 0.01, "{}", lit.color[2]);
    assert_eq!(plain.color, [1.0; 4]);
}

#[test]
fn pinch_pulses_only_when_hovered() {
    assert_eq!(interaction_scale(1.2, false, true, 0.3), 1.0);
    assert_eq!(interaction_scale(1.4, true, false, 0.3), 1.4);
    let t = 0.1;
    let pulsed = interaction_scale(1.2, true, true, t);
    assert!((pulsed - 1.2 * (1.0 + (15.0f32 * t).sin() * 0.2)).abs() < 1e-6);
}

#[test]
fn confetti_vanishes_when_assembled() {
    let (mut pops, mut buffers, mut anim) = setup();
    anim.animate(&mut pops, &input(1.0, 3.0), &mut buffers);
    for d in buffers.class(ParticleClass::Confetti).as_slice() {
        assert!(d.model().x_axis.length() < 1e-6);
    }
}

#[test]
fn flame_lights_at_the_end_of_assembly() {
    let (mut pops, mut buffers, mut anim) = setup();
    anim.animate(&mut pops, &input(0.9, 1.0), &mut buffers);
    assert!(!buffers.class(ParticleClass::Flame).is_visible());
    assert_eq!(anim.candle_light().intensity, 0.0);

    for i in 0..60 {
        anim.animate(&mut pops, &input(1.0, 1.0 + i as f32 / 60.0), &mut buffers);
    }
    assert!(buffers.class(ParticleClass::Flame).is_visible());
    let light = anim.candle_light();
    assert!(light.intensity > 0.2 && light.intensity <= 2.0);
}

#[test]
fn candle_settles_on_target() {
    let (pops, _, _) = setup();
    let pose = candle_pose(&pops.candle, 1.0, 5.0);
    assert_eq!(pose.physics, 1.0);
    assert_eq!(pose.flame_opacity, 1.0);
    let t = pose.model.w_axis.truncate();
    assert!((t - pops.candle.target).length() < 1e-5);

    let early = candle_pose(&pops.candle, 0.5, 5.0);
    assert_eq!(early.flame_opacity, 0.0);
    assert!(early.physics < 1.0);
}

#[test]
fn ambient_follows_level() {
    let (mut pops, mut buffers, mut anim) = setup();
    let mut frame = input(0.5, 1.0);
    frame.level = 1.0;
    frame.bands = AudioBands {
        bass: 1.0,
        mid: 1.0,
        high: 1.0,
    };
    anim.animate(&mut pops, &frame, &mut buffers);
    assert!((buffers.lighting.ambient - 0.35).abs() < 1e-6);
    assert!((buffers.lighting.key - 1.5).abs() < 1e-6);
}

const ALWAYS_DRAWN: [ParticleClass; 4] = [
    ParticleClass::Body,
    ParticleClass::Gift,
    ParticleClass::Ornament,
    ParticleClass::Confetti,
];

#[test]
fn buffers_stay_hidden_until_first_animated() {
    let (mut pops, mut buffers, mut anim) = setup();
    for class in ALWAYS_DRAWN {
        assert!(!buffers.class(class).is_visible());
    }
    assert!(!buffers.candle.is_visible());

    anim.animate(&mut pops, &input(0.0, 0.1), &mut buffers);
    for class in ALWAYS_DRAWN {
        assert!(buffers.class(class).is_visible());
    }
    assert!(buffers.candle.is_visible());
}

#[test]
fn candle_light_drops_faster_than_it_rises() {
    let (mut pops, mut buffers, mut anim) = setup();
    // one frame of rise from dark
    anim.animate(&mut pops, &input(1.0, 1.0), &mut buffers);
    let risen = anim.candle_light().intensity;
    assert!(risen > 0.0);
    for i in 0..60 {
        anim.animate(&mut pops, &input(1.0, 1.0 + i as f32 / 60.0), &mut buffers);
    }
    let lit = anim.candle_light().intensity;
    // rise covers at most 20% of the gap per 60 Hz frame
    assert!(risen <= 2.0 * 0.2 + 1e-5);

    // flame out: the drop takes 40% of the gap per frame
    anim.animate(&mut pops, &input(0.5, 3.0), &mut buffers);
    let dropped = anim.candle_light().intensity;
    assert!((dropped - lit * 0.6).abs() < 1e-4, "{lit} -> {dropped}");
    for i in 0..60 {
        anim.animate(&mut pops, &input(0.5, 3.0 + i as f32 / 60.0), &mut buffers);
    }
    assert!(anim.candle_light().intensity < 1e-3);
}
