use super::*;
use crate::foundation::core::{Position, Rgba8Premul};
use crate::layout::calc::calculate_final_layout;
use crate::layout::config::ResizeConfig;

fn opaque(w: u32, h: u32) -> Surface {
    let px = Rgba8Premul::from_straight_rgba(0, 0, 255, 255).to_array();
    Surface::from_premul_rgba8(&px.repeat((w * h) as usize), w, h).unwrap()
}

#[test]
fn compose_letterboxes_with_background() {
    let src = opaque(4, 2);
    let cfg = ResizeConfig::contain(8, 8)
        .unwrap()
        .with_background(Color::rgb(255, 0, 0));
    let layout = calculate_final_layout(4, 2, &cfg).unwrap();
    assert_eq!(layout.position, Position::new(0, 2));

    let mut out = Surface::new(8, 8).unwrap();
    compose(&mut out, &src, &layout, cfg.background(), &FilterExpr::new()).unwrap();
    assert_eq!(out.pixel(4, 0).unwrap().r, 255);
    assert_eq!(out.pixel(4, 7).unwrap().r, 255);
    let inside = out.pixel(4, 4).unwrap();
    assert!(inside.b > 250 && inside.r < 5);
}

#[test]
fn compose_clips_cover_overflow() {
    let src = opaque(20, 10);
    let cfg = ResizeConfig::cover(10, 10).unwrap();
    let layout = calculate_final_layout(20, 10, &cfg).unwrap();
    assert!(layout.position.x < 0);

    let mut out = Surface::new(10, 10).unwrap();
    compose(&mut out, &src, &layout, None, &FilterExpr::new()).unwrap();
    assert!(out.data().chunks_exact(4).all(|px| px[3] > 250));
}

#[test]
fn content_bounds_ignores_background() {
    let mut s = Surface::new(6, 5).unwrap();
    assert_eq!(content_bounds(&s, None), None);
    s.set_pixel(2, 1, Rgba8Premul::from_straight_rgba(9, 9, 9, 255));
    s.set_pixel(3, 3, Rgba8Premul::from_straight_rgba(9, 9, 9, 255));
    assert_eq!(content_bounds(&s, None), Some((2, 1, Size::new(2, 3))));

    let mut white = Surface::new(3, 3).unwrap();
    white.fill_rect(white.size().to_rect(), Color::white().to_premul());
    assert_eq!(content_bounds(&white, Some(Color::white())), None);
}

#[test]
fn trim_empty_keeps_padding_and_shifts_the_image() {
    let src = opaque(4, 2);
    let cfg = ResizeConfig::contain(8, 8)
        .unwrap()
        .with_background(Color::white())
        .with_padding(1u32)
        .unwrap();
    let layout = calculate_final_layout(4, 2, &cfg).unwrap();
    assert_eq!(layout.position, Position::new(1, 3));

    let mut out = Surface::new(10, 10).unwrap();
    compose(&mut out, &src, &layout, cfg.background(), &FilterExpr::new()).unwrap();
    let trimmed = trim_empty(&mut out, &layout, cfg.background(), cfg.edges()).unwrap();

    assert_eq!(out.size(), trimmed.output_size);
    assert!(out.height() < 10);
    assert_eq!(trimmed.image_size, layout.image_size);
    assert_eq!(out.pixel(0, 0), Some(Color::white().to_premul()));
    assert!(out.pixel(4, out.height() / 2).unwrap().b > 250);
}

#[test]
fn trim_empty_of_background_only_is_a_no_op() {
    let layout = LayoutResult::intrinsic(Size::new(5, 4));
    let mut s = Surface::new(5, 4).unwrap();
    let kept = trim_empty(&mut s, &layout, None, Edges::uniform(0)).unwrap();
    assert_eq!(kept, layout);
    assert_eq!(s.size(), Size::new(5, 4));
}
