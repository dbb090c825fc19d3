use super::*;

fn blurred(src: &[u8], w: u32, h: u32, sigma: f32) -> Vec<u8> {
    let mut out = src.to_vec();
    if let Some(k) = GaussianKernel::for_surface(sigma, w, h) {
        blur_rgba8_premul_in_place(&mut out, w, h, &k).unwrap();
    }
    out
}

#[test]
fn zero_or_invalid_sigma_has_no_kernel() {
    assert!(GaussianKernel::for_surface(0.0, 8, 8).is_none());
    assert!(GaussianKernel::for_surface(-1.0, 8, 8).is_none());
    assert!(GaussianKernel::for_surface(f32::NAN, 8, 8).is_none());
    assert!(GaussianKernel::for_surface(f32::INFINITY, 8, 8).is_none());
}

#[test]
fn radius_covers_three_sigma() {
    assert_eq!(GaussianKernel::for_surface(1.0, 64, 64).unwrap().radius(), 3);
    assert_eq!(GaussianKernel::for_surface(1.2, 64, 64).unwrap().radius(), 4);
}

#[test]
fn radius_is_capped_by_the_longer_side() {
    assert_eq!(GaussianKernel::for_surface(1.0e9, 4, 3).unwrap().radius(), 4);
    assert_eq!(GaussianKernel::for_surface(f32::MAX, 2, 7).unwrap().radius(), 7);
}

#[test]
fn kernel_weights_sum_to_one() {
    for sigma in [0.4f32, 1.0, 2.5, 40.0, 1.0e9] {
        let k = GaussianKernel::for_surface(sigma, 16, 16).unwrap();
        let total: u32 = k.taps.iter().sum();
        assert_eq!(total, 1 << 16, "sigma {sigma}");
        assert_eq!(k.taps[0], k.taps[2 * k.radius()]);
    }
}

#[test]
fn constant_image_is_unchanged() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    assert_eq!(blurred(&src, w, h, 2.0), src);
}

#[test]
fn single_pixel_spreads_and_keeps_energy() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blurred(&src, w, h, 0.8);

    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: i32 = out.chunks_exact(4).map(|px| i32::from(px[3])).sum();
    assert!((sum_a - 255).abs() <= 10, "alpha sum {sum_a}");
}

#[test]
fn huge_sigma_spreads_over_the_whole_surface() {
    let (w, h) = (4u32, 4u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    src[..4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blurred(&src, w, h, 1.0e9);

    let alphas: Vec<u8> = out.chunks_exact(4).map(|px| px[3]).collect();
    assert!(alphas.iter().all(|&a| a > 0), "alphas {alphas:?}");
    assert!(alphas[0] < 255);
    assert!(alphas[0] >= alphas[3] && alphas[0] >= alphas[15]);
}

#[test]
fn rejects_mismatched_buffer() {
    let k = GaussianKernel::for_surface(1.0, 1, 2).unwrap();
    assert!(blur_rgba8_premul_in_place(&mut [0u8; 7], 1, 2, &k).is_err());
}
