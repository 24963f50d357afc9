use dip_core::{Element, Error, Image, ImageView, Size, sample_bilinear_f64, with_element_type};

/// Destination size for a uniform zoom: `floor(dim * scale)` per axis.
///
/// Rejects non-positive, NaN and infinite scales before anything is allocated.
pub(crate) fn scaled_size(src: Size, scale: f64) -> Result<Size, Error> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::InvalidArgument("scale must be positive and finite"));
    }

    let w = (src.width as f64 * scale).floor();
    let h = (src.height as f64 * scale).floor();
    if w * h > isize::MAX as f64 {
        return Err(Error::InvalidArgument("zoomed image is too large"));
    }
    Ok(Size::new(w as usize, h as usize))
}

/// Copies whole pixels: destination `(x, y)` takes every channel of source
/// `map(x, y)`. The mapping must stay inside the source.
pub(crate) fn gather(
    src: &Image,
    dst_size: Size,
    map: impl Fn(usize, usize) -> (usize, usize),
) -> Result<Image, Error> {
    let mut dst = Image::new(
        dst_size.width,
        dst_size.height,
        src.channels(),
        src.element_type(),
    )?;
    if dst.is_empty() {
        return Ok(dst);
    }

    let k = src.channels();
    with_element_type!(src.element_type(), T => {
        let sv = src.view::<T>()?;
        let mut dv = dst.view_mut::<T>()?;
        for yd in 0..dst_size.height {
            let out = dv.row_mut(yd);
            for xd in 0..dst_size.width {
                let (xs, ys) = map(xd, yd);
                let px = &sv.row(ys)[xs * k..(xs + 1) * k];
                out[xd * k..(xd + 1) * k].copy_from_slice(px);
            }
        }
    });
    Ok(dst)
}

/// Bilinear inverse mapping: destination `(x, y)` samples the source at
/// `map(x, y)` with clamped borders, or is zero in every channel when `map`
/// returns `None`. Samples are truncated into the source element type.
pub(crate) fn resample_bilinear(
    src: &Image,
    dst_size: Size,
    map: impl Fn(usize, usize) -> Option<(f64, f64)>,
) -> Result<Image, Error> {
    let mut dst = Image::new(
        dst_size.width,
        dst_size.height,
        src.channels(),
        src.element_type(),
    )?;
    if dst.is_empty() {
        return Ok(dst);
    }

    with_element_type!(src.element_type(), T => {
        let sv = src.view::<T>()?;
        let mut dv = dst.view_mut::<T>()?;
        for yd in 0..dst_size.height {
            for xd in 0..dst_size.width {
                let Some((xs, ys)) = map(xd, yd) else {
                    continue;
                };
                for c in 0..sv.channels() {
                    let v: T = blend(&sv, xs, ys, c);
                    // SAFETY: `xd`, `yd` and `c` are inside the destination, which
                    // has `dst_size` and the source channel count.
                    unsafe { dv.set_unchecked(xd, yd, c, v) };
                }
            }
        }
    });
    Ok(dst)
}

#[inline]
pub(crate) fn blend<T: Element>(view: &ImageView<'_, T>, x: f64, y: f64, c: usize) -> T {
    T::from_f64(sample_bilinear_f64(view, x, y, c).unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::scaled_size;
    use dip_core::{Error, Size};

    #[test]
    fn scaled_size_floors_each_axis() {
        assert_eq!(scaled_size(Size::new(5, 3), 1.5), Ok(Size::new(7, 4)));
        assert_eq!(scaled_size(Size::new(5, 3), 0.1), Ok(Size::new(0, 0)));
        assert_eq!(scaled_size(Size::new(4, 4), 2.0), Ok(Size::new(8, 8)));
    }

    #[test]
    fn scaled_size_rejects_bad_scales() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                scaled_size(Size::new(4, 4), scale),
                Err(Error::InvalidArgument(_))
            ));
        }
    }
}
