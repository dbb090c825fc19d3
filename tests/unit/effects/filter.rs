use super::*;

fn px(buf: &[u8]) -> [u8; 4] {
    [buf[0], buf[1], buf[2], buf[3]]
}

#[test]
fn empty_expr_prints_none_and_folds_to_identity() {
    let e = FilterExpr::new();
    assert_eq!(e.to_string(), "none");
    let f = e.fold();
    assert_eq!(f.matrix, None);
    assert_eq!(f.blur_sigma, 0.0);
}

#[test]
fn display_keeps_accumulation_order() {
    let mut e = FilterExpr::new();
    e.push_blur(BlurOpts::new(2.0));
    e.push_filter(&FilterOpts {
        brightness: Some(1.2),
        ..FilterOpts::default()
    });
    e.push_filter(&FilterOpts {
        hue_rotate: Some(90.0),
        ..FilterOpts::default()
    });
    assert_eq!(e.to_string(), "blur(2px) brightness(1.2) hue-rotate(90deg)");
}

#[test]
fn blur_sigmas_combine_in_quadrature() {
    let mut e = FilterExpr::new();
    e.push_blur(BlurOpts::new(3.0));
    e.push_blur(BlurOpts::new(4.0));
    assert!((e.fold().blur_sigma - 5.0).abs() < 1e-5);
}

#[test]
fn invalid_values_never_fail_and_are_sanitized() {
    let mut e = FilterExpr::new();
    e.push_blur(BlurOpts::new(f32::NAN));
    e.push_blur(BlurOpts::new(-2.0));
    e.push_filter(&FilterOpts {
        brightness: Some(f32::INFINITY),
        grayscale: Some(7.0),
        ..FilterOpts::default()
    });
    assert_eq!(e.steps(), &[FilterStep::Grayscale(1.0)]);
}

#[test]
fn inverse_brightness_steps_cancel() {
    let mut e = FilterExpr::new();
    e.push_filter(&FilterOpts {
        brightness: Some(2.0),
        ..FilterOpts::default()
    });
    e.push_filter(&FilterOpts {
        brightness: Some(0.5),
        ..FilterOpts::default()
    });
    assert_eq!(e.fold().matrix, None);
}

#[test]
fn folded_matrix_equals_sequential_application() {
    let mut seq = vec![200u8, 100, 50, 255];
    let mut a = FilterExpr::new();
    a.push_filter(&FilterOpts {
        brightness: Some(0.5),
        ..FilterOpts::default()
    });
    a.apply_rgba8_premul(&mut seq, 1, 1).unwrap();
    let mut b = FilterExpr::new();
    b.push_filter(&FilterOpts {
        invert: Some(1.0),
        ..FilterOpts::default()
    });
    b.apply_rgba8_premul(&mut seq, 1, 1).unwrap();

    let mut folded = vec![200u8, 100, 50, 255];
    let mut both = FilterExpr::new();
    both.push_filter(&FilterOpts {
        brightness: Some(0.5),
        ..FilterOpts::default()
    });
    both.push_filter(&FilterOpts {
        invert: Some(1.0),
        ..FilterOpts::default()
    });
    both.apply_rgba8_premul(&mut folded, 1, 1).unwrap();

    for c in 0..4 {
        assert!((i32::from(seq[c]) - i32::from(folded[c])).abs() <= 1);
    }
}

#[test]
fn grayscale_equalizes_channels() {
    let mut buf = vec![255u8, 0, 0, 255];
    let mut e = FilterExpr::new();
    e.push_filter(&FilterOpts {
        grayscale: Some(1.0),
        ..FilterOpts::default()
    });
    e.apply_rgba8_premul(&mut buf, 1, 1).unwrap();
    let [r, g, b, a] = px(&buf);
    assert_eq!(a, 255);
    assert_eq!(r, g);
    assert_eq!(g, b);
    assert_eq!(r, 54);
}

#[test]
fn opacity_scales_premultiplied_pixel() {
    let mut buf = vec![255u8, 255, 255, 255];
    let mut e = FilterExpr::new();
    e.push_filter(&FilterOpts {
        opacity: Some(0.5),
        ..FilterOpts::default()
    });
    e.apply_rgba8_premul(&mut buf, 1, 1).unwrap();
    assert_eq!(px(&buf), [128, 128, 128, 128]);
}

#[test]
fn transparent_pixels_stay_transparent_under_brightness() {
    let mut buf = vec![0u8; 4];
    let mut e = FilterExpr::new();
    e.push_filter(&FilterOpts {
        brightness: Some(3.0),
        ..FilterOpts::default()
    });
    e.apply_rgba8_premul(&mut buf, 1, 1).unwrap();
    assert_eq!(px(&buf), [0, 0, 0, 0]);
}

#[test]
fn blur_applies_after_matrix() {
    let (w, h) = (5u32, 1u32);
    let mut buf = vec![0u8; 20];
    buf[8..12].copy_from_slice(&[255, 255, 255, 255]);
    let mut e = FilterExpr::new();
    e.push_blur(BlurOpts::new(1.0));
    e.apply_rgba8_premul(&mut buf, w, h).unwrap();
    assert!(buf[11] < 255);
    assert!(buf[7] > 0 && buf[15] > 0);
}

#[test]
fn filter_opts_reject_unknown_fields() {
    let ok: FilterOpts = serde_json::from_str(r#"{"sepia": 0.3, "hue_rotate": 45}"#).unwrap();
    assert_eq!(ok.sepia, Some(0.3));
    assert_eq!(ok.hue_rotate, Some(45.0));
    assert!(serde_json::from_str::<FilterOpts>(r#"{"glow": 1}"#).is_err());
}

#[test]
fn clear_resets_expression() {
    let mut e = FilterExpr::new();
    e.push_blur(BlurOpts::new(1.0));
    e.clear();
    assert!(e.is_empty());
}

#[test]
fn oversized_blurs_fold_finite_and_apply_on_small_buffers() {
    let mut e = FilterExpr::new();
    e.push_blur(BlurOpts::new(f32::MAX));
    e.push_blur(BlurOpts::new(f32::MAX));
    let folded = e.fold();
    assert!(folded.blur_sigma.is_finite() && folded.blur_sigma > 0.0);

    let mut buf = vec![0u8; 3 * 2 * 4];
    buf[..4].copy_from_slice(&[200, 0, 0, 200]);
    e.apply_rgba8_premul(&mut buf, 3, 2).unwrap();
    assert!(buf.chunks_exact(4).all(|p| p[3] > 0));
}
