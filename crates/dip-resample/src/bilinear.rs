use dip_core::{Element, Error, Image};
use log::{debug, warn};

use crate::remap::{blend, resample_bilinear, scaled_size};

/// Samples channel `channel` of `img` at a continuous coordinate.
///
/// Coordinates outside the image are never an error: each of the four corner
/// indices is clamped on its own axis while the blend weights keep using the
/// unclamped fraction. The blended value is truncated into `T`.
///
/// The blend is evaluated as two horizontal lerps followed by a vertical one
/// (`top = p00 + (p10 - p00) * dx`), which keeps flat regions and integer
/// coordinates exact. It equals the four-weight sum
/// `(1-dx)(1-dy) p00 + dx(1-dy) p10 + (1-dx)dy p01 + dx dy p11` algebraically, but
/// rounding differs: after truncation to an integer type, about 4% of
/// non-integer coordinates on a ramp differ by one from the weight-sum
/// form (e.g. 35 where the weight sum truncates to 34).
///
/// Fails with `ChannelOutOfRange` for a bad channel, `InvalidArgument` for an
/// empty image and `TypeMismatch` when `T` is not the image element type.
pub fn bilinear_interpolate<T: Element>(
    img: &Image,
    x: f64,
    y: f64,
    channel: usize,
) -> Result<T, Error> {
    if channel >= img.channels() {
        return Err(Error::ChannelOutOfRange {
            channel,
            channels: img.channels(),
        });
    }
    if img.is_empty() {
        return Err(Error::InvalidArgument("cannot interpolate an empty image"));
    }

    let view = img.view::<T>()?;
    Ok(blend(&view, x, y, channel))
}

/// Uniform zoom with bilinear sampling. Destination size is `floor(dim * scale)`;
/// destination pixel `(x, y)` samples the source at `(x / scale, y / scale)`.
pub fn bilinear_zoom(img: &Image, scale: f64) -> Result<Image, Error> {
    let size = scaled_size(img.size(), scale)?;
    debug!("bilinear_zoom {} x{scale} -> {size}", img);
    if size.is_empty() && !img.is_empty() {
        warn!("bilinear_zoom of {} by {scale} produced an empty image", img.size());
    }

    resample_bilinear(img, size, |x, y| Some((x as f64 / scale, y as f64 / scale)))
}

#[cfg(test)]
mod tests {
    use super::{bilinear_interpolate, bilinear_zoom};
    use dip_core::{ElementType, Error, Image};

    fn ramp_u8(w: usize, h: usize) -> Image {
        let data = (0..h)
            .flat_map(|y| (0..w).map(move |x| (10 * x + 40 * y) as u8))
            .collect();
        Image::from_vec(w, h, 1, data).expect("valid image")
    }

    #[test]
    fn exact_at_integer_coordinates() {
        let img = ramp_u8(4, 3);
        for (x, y) in img.pixels() {
            let v = bilinear_interpolate::<u8>(&img, x as f64, y as f64, 0).expect("sample");
            assert_eq!(v, img.pixel::<u8>(x, y, 0).expect("in range"));
        }
    }

    #[test]
    fn blends_and_truncates_between_pixels() {
        let img = Image::from_vec(2, 2, 1, vec![0u8, 10, 20, 31]).expect("valid");
        // (0 + 10 + 20 + 31) / 4 = 15.25
        assert_eq!(bilinear_interpolate::<u8>(&img, 0.5, 0.5, 0), Ok(15));
        assert_eq!(bilinear_interpolate::<u8>(&img, 0.25, 0.0, 0), Ok(2));

        let f = img.convert(ElementType::F64).expect("f64");
        assert_eq!(bilinear_interpolate::<f64>(&f, 0.5, 0.5, 0), Ok(15.25));
    }

    #[test]
    fn flat_regions_stay_exact_at_fractional_coordinates() {
        for value in [7u8, 255] {
            let img = Image::from_vec(4, 4, 1, vec![value; 16]).expect("valid");
            for i in 0..50 {
                let x = -0.49 + 0.0937 * f64::from(i);
                let y = 4.2 - 0.0913 * f64::from(i);
                assert_eq!(
                    bilinear_interpolate::<u8>(&img, x, y, 0),
                    Ok(value),
                    "({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn clamps_each_corner_outside_the_image() {
        let img = Image::from_vec(2, 2, 1, vec![0u8, 10, 20, 30]).expect("valid");
        assert_eq!(bilinear_interpolate::<u8>(&img, -5.0, -5.0, 0), Ok(0));
        assert_eq!(bilinear_interpolate::<u8>(&img, 9.0, 9.0, 0), Ok(30));
        // x clamps to column 1 on both corners; y still blends rows 0 and 1.
        assert_eq!(bilinear_interpolate::<u8>(&img, 3.5, 0.5, 0), Ok(20));
    }

    #[test]
    fn rejects_bad_channel_empty_image_and_wrong_type() {
        let img = ramp_u8(2, 2);
        assert_eq!(
            bilinear_interpolate::<u8>(&img, 0.0, 0.0, 1),
            Err(Error::ChannelOutOfRange {
                channel: 1,
                channels: 1
            })
        );
        assert!(matches!(
            bilinear_interpolate::<u8>(&Image::default(), 0.0, 0.0, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            bilinear_interpolate::<f32>(&img, 0.0, 0.0, 0),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn zoom_size_and_fixed_samples() {
        let img = ramp_u8(3, 2);
        let out = bilinear_zoom(&img, 2.0).expect("zoom");
        assert_eq!((out.width(), out.height()), (6, 4));
        assert_eq!(out.element_type(), ElementType::U8);
        for (x, y) in img.pixels() {
            assert_eq!(
                out.pixel::<u8>(2 * x, 2 * y, 0),
                img.pixel::<u8>(x, y, 0),
                "even destination pixels hit source pixels exactly"
            );
        }
        // Halfway between columns 0 and 1 of row 0.
        assert_eq!(out.pixel::<u8>(1, 0, 0), Ok(5));

        let shrunk = bilinear_zoom(&img, 0.5).expect("zoom");
        assert_eq!((shrunk.width(), shrunk.height()), (1, 1));
    }

    #[test]
    fn zoom_keeps_channels_and_element_type() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let img = Image::from_vec(2, 2, 3, data).expect("valid");
        let out = bilinear_zoom(&img, 1.5).expect("zoom");
        assert_eq!((out.width(), out.height(), out.channels()), (3, 3, 3));
        assert_eq!(out.element_type(), ElementType::F32);
        assert_eq!(out.pixel::<f32>(0, 0, 2), Ok(2.0));
    }

    #[test]
    fn zoom_rejects_non_positive_scale() {
        let img = ramp_u8(2, 2);
        for scale in [0.0, -2.0, f64::NAN] {
            assert!(matches!(
                bilinear_zoom(&img, scale),
                Err(Error::InvalidArgument(_))
            ));
        }
    }
}
