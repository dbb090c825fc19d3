use super::*;

const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
  <rect x="0" y="0" width="5" height="10" fill="#ff0000"/>
</svg>"##;

#[test]
fn parse_reports_intrinsic_size() {
    let v = VectorSource::parse(SQUARE.as_bytes()).unwrap();
    assert_eq!(v.intrinsic_size(), Size::new(10, 10));
}

#[test]
fn parse_rejects_invalid_svg() {
    assert!(VectorSource::parse(b"<svg").is_err());
}

#[test]
fn draw_rasterizes_at_destination_size() {
    let v = VectorSource::parse(SQUARE.as_bytes()).unwrap();
    let mut dst = Surface::new(100, 100).unwrap();
    v.draw_into(
        &mut dst,
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(0.0, 0.0, 100.0, 100.0),
        &FilterExpr::new(),
    )
    .unwrap();
    // The edge at x = 50 stays sharp instead of a 10x upscaled ramp.
    assert_eq!(dst.pixel(46, 50).unwrap().a, 255);
    assert_eq!(dst.pixel(53, 50).unwrap().a, 0);
}

#[test]
fn rasterize_region_maps_source_rect() {
    let v = VectorSource::parse(SQUARE.as_bytes()).unwrap();
    let right_half = v.rasterize(Rect::new(5.0, 0.0, 10.0, 10.0), 4, 4).unwrap();
    assert!(right_half.chunks_exact(4).all(|px| px[3] == 0));
}

#[test]
fn draw_only_rasterizes_the_visible_part_of_a_huge_destination() {
    let v = VectorSource::parse(SQUARE.as_bytes()).unwrap();
    let mut dst = Surface::new(20, 20).unwrap();
    // 200_000 px wide, far beyond any pixmap; only x in 99_990..100_010 lands on the surface.
    v.draw_into(
        &mut dst,
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(-99_990.0, 0.0, 100_010.0, 20.0),
        &FilterExpr::new(),
    )
    .unwrap();
    // Source x = 5 (the red/empty edge) maps to surface x = 10.
    assert_eq!(dst.pixel(2, 10).unwrap().a, 255);
    assert_eq!(dst.pixel(18, 10).unwrap().a, 0);
}

#[test]
fn draw_off_the_surface_is_a_no_op() {
    let v = VectorSource::parse(SQUARE.as_bytes()).unwrap();
    let mut dst = Surface::new(8, 8).unwrap();
    v.draw_into(
        &mut dst,
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(20.0, 20.0, 40.0, 40.0),
        &FilterExpr::new(),
    )
    .unwrap();
    assert!(dst.data().iter().all(|&b| b == 0));
}
