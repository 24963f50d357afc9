use dip_core::{ElementType, Error, Image};
use log::{debug, warn};

/// Rejects anything but u8 images for `op`.
pub(crate) fn require_u8(img: &Image, op: &'static str) -> Result<(), Error> {
    match img.element_type() {
        ElementType::U8 => Ok(()),
        ty => Err(Error::UnsupportedType { op, ty }),
    }
}

/// Applies `f` to every sample, keeping geometry and channel count.
fn map_u8(img: &Image, op: &'static str, f: impl Fn(u8) -> u8) -> Result<Image, Error> {
    require_u8(img, op)?;
    if img.is_empty() {
        warn!("{op} called on an empty image");
        return Ok(img.clone());
    }

    let src = img.view::<u8>()?;
    let mut out = Vec::with_capacity(src.width() * src.channels() * src.height());
    for y in 0..src.height() {
        out.extend(src.row(y).iter().map(|&p| f(p)));
    }
    Image::from_vec(src.width(), src.height(), src.channels(), out)
}

/// Reduces the grey scale to `levels` evenly spaced bins.
///
/// With `step = 256 / levels`, each sample becomes `(p / step) * step + step / 2`
/// cast to u8. When 256 is not a multiple of `levels` the top bin can overflow and
/// wraps.
pub fn quantize(img: &Image, levels: u32) -> Result<Image, Error> {
    if !(1..=256).contains(&levels) {
        return Err(Error::InvalidArgument("levels must be between 1 and 256"));
    }
    let step = 256 / levels;
    debug!("quantize {} to {levels} levels (step {step})", img);

    map_u8(img, "quantize", |p| {
        let p = u32::from(p);
        ((p / step) * step + step / 2) as u8
    })
}

/// `max_gray - p` per sample, cast to u8.
pub fn invert_image(img: &Image, max_gray: i32) -> Result<Image, Error> {
    debug!("invert_image {} with max_gray={max_gray}", img);
    map_u8(img, "invert_image", |p| max_gray.wrapping_sub(i32::from(p)) as u8)
}

/// Set complement against the universe value `k`: `k - p`, cast to u8.
pub fn set_complement(img: &Image, k: i32) -> Result<Image, Error> {
    debug!("set_complement {} with k={k}", img);
    map_u8(img, "set_complement", |p| k.wrapping_sub(i32::from(p)) as u8)
}

#[cfg(test)]
mod tests {
    use super::{invert_image, quantize, set_complement};
    use dip_core::{ElementType, Error, Image};

    fn row(values: &[u8]) -> Image {
        Image::from_vec(values.len(), 1, 1, values.to_vec()).expect("valid image")
    }

    fn values(img: &Image) -> Vec<u8> {
        img.view::<u8>().expect("u8").to_vec()
    }

    #[test]
    fn quantize_maps_to_bin_centres() {
        let img = row(&[0, 63, 64, 130, 255]);
        assert_eq!(values(&quantize(&img, 4).expect("q")), vec![32, 32, 96, 160, 224]);
        assert_eq!(values(&quantize(&img, 256).expect("q")), vec![0, 63, 64, 130, 255]);
        assert_eq!(values(&quantize(&img, 1).expect("q")), vec![128; 5]);
        // step 85: 255 -> 3 * 85 + 42 = 297, wraps to 41
        assert_eq!(values(&quantize(&row(&[255]), 3).expect("q")), vec![41]);
    }

    #[test]
    fn quantize_validates_levels() {
        let img = row(&[1]);
        for levels in [0, 257] {
            assert!(matches!(quantize(&img, levels), Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn invert_and_complement_wrap_like_host_casts() {
        let img = row(&[0, 100, 255]);
        assert_eq!(values(&invert_image(&img, 255).expect("inv")), vec![255, 155, 0]);
        assert_eq!(values(&invert_image(&img, 100).expect("inv")), vec![100, 0, 101]);
        assert_eq!(values(&set_complement(&img, 1).expect("cmp")), vec![1, 157, 2]);
    }

    #[test]
    fn multi_channel_images_keep_layout() {
        let img = Image::from_vec(1, 2, 3, vec![0u8, 1, 2, 3, 4, 5]).expect("valid");
        let out = invert_image(&img, 10).expect("inv");
        assert_eq!((out.width(), out.height(), out.channels()), (1, 2, 3));
        assert_eq!(values(&out), vec![10, 9, 8, 7, 6, 5]);
    }

    #[test]
    fn non_u8_images_are_rejected() {
        let img = Image::gray(2, 2, ElementType::F32).expect("alloc");
        assert_eq!(
            quantize(&img, 4).unwrap_err(),
            Error::UnsupportedType {
                op: "quantize",
                ty: ElementType::F32
            }
        );
        assert!(invert_image(&Image::default(), 255).expect("empty").is_empty());
    }
}
