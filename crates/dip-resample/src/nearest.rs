use dip_core::{Error, Image, Size, clamp_index, round_half_up};
use log::{debug, warn};

use crate::remap::{gather, scaled_size};

/// Uniform zoom copying the nearest source pixel.
///
/// Destination size is `floor(dim * scale)`. Destination `(x, y)` reads source
/// `(floor(x / scale + 0.5), floor(y / scale + 0.5))` clamped into the image, so
/// every output pixel is a verbatim copy of some input pixel.
pub fn nearest_zoom(img: &Image, scale: f64) -> Result<Image, Error> {
    let size = scaled_size(img.size(), scale)?;
    debug!("nearest_zoom {} x{scale} -> {size}", img);
    if size.is_empty() && !img.is_empty() {
        warn!("nearest_zoom of {} by {scale} produced an empty image", img.size());
    }

    let (w, h) = (img.width(), img.height());
    gather(img, size, |x, y| {
        (
            nearest_index(x as f64 / scale, w),
            nearest_index(y as f64 / scale, h),
        )
    })
}

/// Nearest-neighbour resize to an explicit size. Destination `(x, y)` reads source
/// `(x * W / w, y * H / h)` with integer division.
pub fn resize_nearest(img: &Image, size: Size) -> Result<Image, Error> {
    if img.is_empty() && !size.is_empty() {
        return Err(Error::InvalidArgument("cannot resize an empty image"));
    }
    debug!("resize_nearest {} -> {size}", img);

    let (w, h) = (img.width(), img.height());
    gather(img, size, |x, y| (x * w / size.width, y * h / size.height))
}

#[inline]
fn nearest_index(v: f64, len: usize) -> usize {
    clamp_index(round_half_up(v), len)
}

#[cfg(test)]
mod tests {
    use super::{nearest_zoom, resize_nearest};
    use dip_core::{ElementType, Error, Image, Size};

    fn sum_grid(n: usize) -> Image {
        let data = (0..n)
            .flat_map(|y| (0..n).map(move |x| (x + y) as u8))
            .collect();
        Image::from_vec(n, n, 1, data).expect("valid image")
    }

    #[test]
    fn doubling_a_4x4_sum_grid() {
        let img = sum_grid(4);
        let out = nearest_zoom(&img, 2.0).expect("zoom");
        assert_eq!((out.width(), out.height()), (8, 8));
        for (x, y) in img.pixels() {
            assert_eq!(out.pixel::<u8>(2 * x, 2 * y, 0), Ok((x + y) as u8));
        }
    }

    #[test]
    fn output_values_come_from_the_source() {
        let img = sum_grid(5);
        for scale in [0.3, 0.7, 1.0, 1.9, 3.0] {
            let out = nearest_zoom(&img, scale).expect("zoom");
            assert_eq!(out.width(), (5.0 * scale).floor() as usize);
            let src = img.view::<u8>().expect("u8").to_vec();
            let dst = out.view::<u8>().expect("u8").to_vec();
            assert!(dst.iter().all(|v| src.contains(v)));
        }
    }

    #[test]
    fn rounding_clamps_at_the_far_edge() {
        let img = Image::from_vec(2, 1, 1, vec![3u16, 9]).expect("valid");
        let out = nearest_zoom(&img, 1.5).expect("zoom");
        // x = 0, 1, 2 map to 0.0, 0.67, 1.33 -> 0, 1, 1
        assert_eq!(out.view::<u16>().expect("u16").to_vec(), vec![3, 9, 9]);

        // x = 3 maps to 1.5, rounds to 2 and clamps back to the last column.
        let out = nearest_zoom(&img, 2.0).expect("zoom");
        assert_eq!(out.view::<u16>().expect("u16").to_vec(), vec![3, 9, 9, 9]);
    }

    #[test]
    fn copies_every_channel() {
        let img = Image::from_vec(1, 1, 3, vec![1i8, -2, 3]).expect("valid");
        let out = nearest_zoom(&img, 2.0).expect("zoom");
        assert_eq!(out.channels(), 3);
        assert_eq!(out.element_type(), ElementType::I8);
        assert_eq!(out.view::<i8>().expect("i8").to_vec(), [1, -2, 3].repeat(4));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let img = sum_grid(2);
        assert!(matches!(nearest_zoom(&img, 0.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(nearest_zoom(&img, -0.5), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn resize_maps_with_integer_ratios() {
        let img = sum_grid(4);
        let out = resize_nearest(&img, Size::new(2, 6)).expect("resize");
        assert_eq!((out.width(), out.height()), (2, 6));
        // rows 0..6 map to source rows 0, 0, 1, 2, 2, 3
        let col0: Vec<u8> = (0..6).map(|y| out.pixel::<u8>(0, y, 0).expect("px")).collect();
        assert_eq!(col0, vec![0, 0, 1, 2, 2, 3]);
        assert_eq!(out.pixel::<u8>(1, 0, 0), Ok(2));

        assert!(resize_nearest(&img, Size::new(0, 3)).expect("empty").is_empty());
        assert!(resize_nearest(&Image::default(), Size::new(1, 1)).is_err());
    }
}
