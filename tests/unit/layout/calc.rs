use super::*;
use crate::layout::padding::Padding;

const SOURCES: &[(u32, u32)] = &[
    (1920, 1080),
    (1080, 1920),
    (91, 114),
    (100, 100),
    (1, 1),
    (3000, 7),
    (640, 480),
];
const TARGETS: &[(u32, u32)] = &[(800, 800), (300, 200), (1, 1), (1024, 31), (50, 5000)];

fn layout(sw: u32, sh: u32, cfg: &ResizeConfig) -> LayoutResult {
    calculate_final_layout(sw, sh, cfg).unwrap()
}

#[test]
fn cover_scenario_1920x1080_into_800() {
    let l = layout(1920, 1080, &ResizeConfig::cover(800, 800).unwrap());
    assert_eq!(l.image_size, Size::new(1422, 800));
    assert_eq!(l.output_size, Size::new(800, 800));
    assert_eq!(l.position, Position::new(-311, 0));
}

#[test]
fn contain_scenario_1920x1080_into_800() {
    let l = layout(1920, 1080, &ResizeConfig::contain(800, 800).unwrap());
    assert_eq!(l.image_size, Size::new(800, 450));
    assert_eq!(l.output_size, Size::new(800, 800));
    assert_eq!(l.position, Position::new(0, 175));
}

#[test]
fn max_fit_never_enlarges_small_source() {
    let l = layout(91, 114, &ResizeConfig::max_fit(Some(300), Some(200)).unwrap());
    assert_eq!(l.image_size, Size::new(91, 114));
    assert_eq!(l.output_size, Size::new(91, 114));
    assert_eq!(l.position, Position::new(0, 0));
}

#[test]
fn min_fit_grows_each_axis_to_its_minimum() {
    let l = layout(100, 100, &ResizeConfig::min_fit(Some(500), Some(400)).unwrap());
    assert_eq!(l.image_size, Size::new(500, 400));
    assert_eq!(l.output_size, Size::new(500, 400));
}

#[test]
fn min_fit_single_axis_scales_uniformly() {
    let l = layout(100, 50, &ResizeConfig::min_fit(Some(300), None).unwrap());
    assert_eq!(l.image_size, Size::new(300, 150));
    let l = layout(100, 50, &ResizeConfig::min_fit(None, Some(20)).unwrap());
    assert_eq!(l.image_size, Size::new(100, 50));
}

#[test]
fn max_fit_single_axis_scales_uniformly() {
    let l = layout(1920, 1080, &ResizeConfig::max_fit(Some(960), None).unwrap());
    assert_eq!(l.image_size, Size::new(960, 540));
    let l = layout(1920, 1080, &ResizeConfig::max_fit(None, Some(2000)).unwrap());
    assert_eq!(l.image_size, Size::new(1920, 1080));
}

#[test]
fn cover_with_uniform_padding() {
    let cfg = ResizeConfig::cover(100, 100)
        .unwrap()
        .with_padding(Padding::Uniform(10.0))
        .unwrap();
    let l = layout(100, 100, &cfg);
    assert_eq!(l.output_size, Size::new(120, 120));
    assert_eq!(l.position, Position::new(10, 10));
    assert_eq!(l.image_size, Size::new(100, 100));
}

#[test]
fn contain_without_enlargement_keeps_small_source() {
    let cfg = ResizeConfig::contain(400, 400)
        .unwrap()
        .without_enlargement(true)
        .unwrap();
    let l = layout(100, 50, &cfg);
    assert_eq!(l.image_size, Size::new(100, 50));
    assert_eq!(l.output_size, Size::new(400, 400));
    assert_eq!(l.position, Position::new(150, 175));

    let enlarged = layout(100, 50, &ResizeConfig::contain(400, 400).unwrap());
    assert_eq!(enlarged.image_size, Size::new(400, 200));
}

#[test]
fn zero_source_is_rejected() {
    let cfg = ResizeConfig::fill(10, 10).unwrap();
    assert!(calculate_final_layout(0, 10, &cfg).is_err());
    assert!(calculate_final_layout(10, 0, &cfg).is_err());
}

#[test]
fn cover_preserves_aspect_and_covers_target() {
    for &(sw, sh) in SOURCES {
        for &(tw, th) in TARGETS {
            let l = layout(sw, sh, &ResizeConfig::cover(tw, th).unwrap());
            assert_eq!(l.output_size, Size::new(tw, th));
            assert!(l.image_size.width >= tw && l.image_size.height >= th);
            // Binding axis matches the target exactly.
            assert!(l.image_size.width == tw || l.image_size.height == th);
            let src_ratio = f64::from(sw) / f64::from(sh);
            let w = f64::from(l.image_size.width);
            let h = f64::from(l.image_size.height);
            // Within one pixel of rounding on the derived axis.
            assert!((w - h * src_ratio).abs() <= src_ratio.max(1.0) * 0.5 + 0.5);
            assert!(l.position.x <= 0 && l.position.y <= 0);
        }
    }
}

#[test]
fn contain_fits_inside_target() {
    for &(sw, sh) in SOURCES {
        for &(tw, th) in TARGETS {
            let l = layout(sw, sh, &ResizeConfig::contain(tw, th).unwrap());
            assert_eq!(l.output_size, Size::new(tw, th));
            assert!(l.image_size.width <= l.output_size.width);
            assert!(l.image_size.height <= l.output_size.height);
            assert!(l.position.x >= 0 && l.position.y >= 0);
        }
    }
}

#[test]
fn fill_always_matches_target() {
    for &(sw, sh) in SOURCES {
        for &(tw, th) in TARGETS {
            let l = layout(sw, sh, &ResizeConfig::fill(tw, th).unwrap());
            assert_eq!(l.image_size, Size::new(tw, th));
            assert_eq!(l.output_size, Size::new(tw, th));
            assert_eq!(l.position, Position::new(0, 0));
        }
    }
}

#[test]
fn max_fit_is_identity_when_source_fits() {
    for &(sw, sh) in SOURCES {
        let cfgs = [
            ResizeConfig::max_fit(Some(sw), Some(sh)).unwrap(),
            ResizeConfig::max_fit(Some(sw + 10), None).unwrap(),
            ResizeConfig::max_fit(None, Some(sh * 2)).unwrap(),
        ];
        for cfg in &cfgs {
            assert_eq!(layout(sw, sh, cfg).image_size, Size::new(sw, sh));
        }
    }
}

#[test]
fn min_fit_is_identity_when_source_exceeds() {
    for &(sw, sh) in SOURCES {
        let cfgs = [
            ResizeConfig::min_fit(Some(sw), Some(sh)).unwrap(),
            ResizeConfig::min_fit(Some(1), None).unwrap(),
            ResizeConfig::min_fit(None, Some(sh)).unwrap(),
        ];
        for cfg in &cfgs {
            assert_eq!(layout(sw, sh, cfg).image_size, Size::new(sw, sh));
        }
    }
}

#[test]
fn padding_adds_exactly_to_output_for_every_mode() {
    let pad = Padding::edges(3.0, 5.0, 7.0, 11.0);
    let configs = [
        ResizeConfig::cover(300, 200).unwrap(),
        ResizeConfig::contain(300, 200).unwrap(),
        ResizeConfig::fill(300, 200).unwrap(),
        ResizeConfig::max_fit(Some(300), None).unwrap(),
        ResizeConfig::min_fit(Some(300), Some(200)).unwrap(),
    ];
    for &(sw, sh) in SOURCES {
        for cfg in &configs {
            let plain = layout(sw, sh, cfg);
            let padded = layout(sw, sh, &cfg.clone().with_padding(pad).unwrap());
            assert_eq!(
                padded.output_size,
                Size::new(
                    plain.output_size.width + 5 + 11,
                    plain.output_size.height + 3 + 7
                ),
                "mode {}",
                cfg.mode()
            );
            assert_eq!(padded.image_size, plain.image_size);
            assert_eq!(padded.position.x, plain.position.x + 11);
            assert_eq!(padded.position.y, plain.position.y + 3);
        }
    }
}

#[test]
fn intrinsic_layout_is_identity() {
    let l = LayoutResult::intrinsic(Size::new(12, 34));
    assert_eq!(l.image_size, l.output_size);
    assert_eq!(l.position, Position::new(0, 0));
}
