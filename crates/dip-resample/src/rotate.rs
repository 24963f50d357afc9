use dip_core::{Error, Image};
use log::debug;

use crate::remap::resample_bilinear;

/// Rotates about the geometric centre `(W / 2, H / 2)` by `theta` radians, keeping
/// the input size.
///
/// Each destination pixel is mapped back through the inverse rotation. Pixels
/// whose source coordinate falls outside `[0, W) x [0, H)` are zero in every
/// channel; all others are sampled bilinearly.
pub fn rotate(img: &Image, theta: f64) -> Result<Image, Error> {
    debug!("rotate {} by {theta} rad", img);

    let w = img.width() as f64;
    let h = img.height() as f64;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (sin, cos) = theta.sin_cos();

    resample_bilinear(img, img.size(), |xo, yo| {
        let dx = xo as f64 - cx;
        let dy = yo as f64 - cy;
        let x = dx * cos + dy * sin + cx;
        let y = -dx * sin + dy * cos + cy;
        // Written as a positive test so NaN coordinates count as outside.
        (x >= 0.0 && x < w && y >= 0.0 && y < h).then_some((x, y))
    })
}

#[cfg(test)]
mod tests {
    use super::rotate;
    use dip_core::{Element, ElementType, Image, Scalar};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn gradient_f32(w: usize, h: usize) -> Image {
        let data = (0..h)
            .flat_map(|y| (0..w).map(move |x| 3.0 * x as f32 + 2.0 * y as f32))
            .collect();
        Image::from_vec(w, h, 1, data).expect("valid image")
    }

    #[test]
    fn zero_angle_is_identity() {
        let data: Vec<u8> = (0..35).map(|v| (v * 7) as u8).collect();
        let img = Image::from_vec(7, 5, 1, data).expect("valid");
        assert_eq!(rotate(&img, 0.0).expect("rotate"), img);

        let rgb = Image::from_vec(2, 2, 3, (0..12).map(|v| v as i16).collect::<Vec<_>>())
            .expect("valid");
        assert_eq!(rotate(&rgb, 0.0).expect("rotate"), rgb);
    }

    #[test]
    fn half_turn_of_flat_3x3() {
        let img = Image::filled(3, 3, 1, ElementType::U8, Scalar::all(7.0)).expect("filled");
        let out = rotate(&img, PI).expect("rotate");
        assert_eq!((out.width(), out.height()), (3, 3));
        // Row 0 and column 0 map back to source y = 3.0 and x = 3.0, one past the
        // last pixel, and are cut to zero.
        assert_eq!(
            out.view::<u8>().expect("u8").to_vec(),
            vec![0, 0, 0, 0, 7, 7, 0, 7, 7]
        );
    }

    #[test]
    fn quarter_turn_moves_corners_out() {
        let img = Image::filled(4, 4, 1, ElementType::F32, Scalar::all(1.0)).expect("filled");
        let out = rotate(&img, FRAC_PI_2).expect("rotate");
        assert_eq!(out.pixel::<f32>(2, 2, 0), Ok(1.0));
        let zeros = out
            .view::<f32>()
            .expect("f32")
            .to_vec()
            .into_iter()
            .filter(|&v| v == 0.0)
            .count();
        assert!(zeros > 0 && zeros < 16);
    }

    #[test]
    fn forward_then_inverse_recovers_interior() {
        let img = gradient_f32(16, 16);
        let theta = 0.3;
        let back = rotate(&rotate(&img, theta).expect("rotate"), -theta).expect("rotate back");

        for y in 5..11 {
            for x in 5..11 {
                let a = img.pixel::<f32>(x, y, 0).expect("in range").to_f64();
                let b = back.pixel::<f32>(x, y, 0).expect("in range").to_f64();
                assert!((a - b).abs() < 1e-3, "({x}, {y}): {a} vs {b}");
            }
        }
    }

    #[test]
    fn empty_image_rotates_to_empty() {
        assert!(rotate(&Image::default(), 1.0).expect("rotate").is_empty());
    }
}
