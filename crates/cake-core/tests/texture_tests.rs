// Host-side tests for the procedural textures.

use cake_core::error::TextureError;
use cake_core::texture::{
    frosting_height, frosting_textures, pattern_covers, pattern_texture, PatternKind,
    TextureLibrary, GIFT_STYLES, ORNAMENT_STYLES,
};

#[test]
fn rejects_zero_and_oversized_textures() {
    assert_eq!(frosting_textures(0).err(), Some(TextureError::ZeroSize));
    assert_eq!(
        pattern_texture(&GIFT_STYLES[0], 5000).err(),
        Some(TextureError::TooLarge {
            size: 5000,
            max: 4096
        })
    );
}

#[test]
fn frosting_maps_have_requested_size() {
    let tex = frosting_textures(32).expect("frosting");
    assert_eq!(tex.color.dimensions(), (32, 32));
    assert_eq!(tex.bump.dimensions(), (32, 32));
    for p in tex.bump.pixels() {
        // gray, opaque
        assert_eq!(p.0[0], p.0[1]);
        assert_eq!(p.0[1], p.0[2]);
        assert_eq!(p.0[3], 255);
    }
}

#[test]
fn frosting_color_stays_between_base_and_highlight() {
    let tex = frosting_textures(24).expect("frosting");
    for p in tex.color.pixels() {
        // base #FFC1E3, highlight #FFF0F5
        assert_eq!(p.0[0], 0xFF);
        assert!(p.0[1] >= 0xC1 && p.0[1] <= 0xF0);
        assert!(p.0[2] >= 0xE3 && p.0[2] <= 0xF5);
    }
}

#[test]
fn frosting_tiles_seamlessly() {
    let size = 64;
    for i in 0..size {
        let left = frosting_height(0, i, size);
        let wrapped = frosting_height(size, i, size);
        assert!((left - wrapped).abs() < 2e-2, "row {i}: {left} vs {wrapped}");
        let top = frosting_height(i, 0, size);
        let wrapped = frosting_height(i, size, size);
        assert!((top - wrapped).abs() < 2e-2, "col {i}: {top} vs {wrapped}");
    }
}

#[test]
fn frosting_height_is_normalized() {
    for y in (0..128).step_by(7) {
        for x in (0..128).step_by(5) {
            let h = frosting_height(x, y, 128);
            assert!((0.0..=1.0).contains(&h));
        }
    }
}

#[test]
fn ribbon_crosses_the_centre() {
    let size = 512;
    assert!(pattern_covers(PatternKind::Ribbon, 256, 10, size));
    assert!(pattern_covers(PatternKind::Ribbon, 10, 256, size));
    assert!(!pattern_covers(PatternKind::Ribbon, 10, 10, size));
}

#[test]
fn dots_sit_on_a_grid() {
    let size = 512;
    // first dot centre at half the spacing
    assert!(pattern_covers(PatternKind::Dots, 50, 50, size));
    assert!(pattern_covers(PatternKind::Dots, 150, 250, size));
    assert!(!pattern_covers(PatternKind::Dots, 100, 100, size));
}

#[test]
fn stripes_cover_their_share() {
    let size = 256;
    let mut covered = 0;
    for y in 0..size {
        for x in 0..size {
            if pattern_covers(PatternKind::Stripes, x, y, size) {
                covered += 1;
            }
        }
    }
    let share = covered as f32 / (size * size) as f32;
    // 80-wide strokes every 160 texels along x: 80 * sqrt(2) / 160
    assert!((share - 0.707).abs() < 0.05, "share {share}");
}

#[test]
fn pattern_uses_only_style_colors() {
    let style = ORNAMENT_STYLES[1];
    let img = pattern_texture(&style, 64).expect("pattern");
    for p in img.pixels() {
        let rgb = [p.0[0], p.0[1], p.0[2]];
        assert!(rgb == style.background || rgb == style.foreground);
    }
}

#[test]
fn library_shares_identical_styles() {
    let lib = TextureLibrary::build(16).expect("library");
    // eight styles, all distinct
    assert_eq!(lib.patterns().len(), 8);
    for i in 0..GIFT_STYLES.len() {
        assert!(lib.gift_pattern(i).is_some());
    }
    assert_eq!(lib.ornament_pattern(ORNAMENT_STYLES.len()), None);
}
