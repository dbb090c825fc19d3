use super::*;
use crate::foundation::core::Rgba8Premul;

#[test]
fn surface_draws_itself_scaled() {
    let mut src = Surface::new(2, 1).unwrap();
    src.set_pixel(0, 0, Rgba8Premul::from_straight_rgba(255, 0, 0, 255));
    src.set_pixel(1, 0, Rgba8Premul::from_straight_rgba(0, 0, 255, 255));
    assert_eq!(src.intrinsic_size(), Size::new(2, 1));

    let mut dst = Surface::new(8, 4).unwrap();
    (&src)
        .draw_into(
            &mut dst,
            Rect::new(0.0, 0.0, 2.0, 1.0),
            Rect::new(0.0, 0.0, 8.0, 4.0),
            &FilterExpr::new(),
        )
        .unwrap();
    let left = dst.pixel(0, 2).unwrap();
    let right = dst.pixel(7, 2).unwrap();
    assert!(left.r > 200 && left.b < 50);
    assert!(right.b > 200 && right.r < 50);
}
