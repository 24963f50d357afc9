use crate::element::Element;
use crate::view::ImageView;

/// Rounds half up with `floor(v + 0.5)`. Negative halves round toward +inf, which
/// differs from `f64::round`.
#[inline]
pub fn round_half_up(v: f64) -> isize {
    (v + 0.5).floor() as isize
}

/// Clamps an integer coordinate into `[0, len)`, replicating the edge sample.
/// `len` must be non-zero.
#[inline]
pub fn clamp_index(i: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    if i <= 0 {
        0
    } else {
        (i as usize).min(len - 1)
    }
}

/// Bilinear sample of channel `c` as `f64`.
///
/// The 2x2 neighbourhood is `floor(x)..=floor(x)+1` by `floor(y)..=floor(y)+1`;
/// weights come from the unclamped coordinate and every corner index is clamped
/// on its own axis, so corners may repeat at the edges. Returns `None` for an
/// empty view. Caller guarantees `c < img.channels()`.
pub fn sample_bilinear_f64<T: Element>(
    img: &ImageView<'_, T>,
    x: f64,
    y: f64,
    c: usize,
) -> Option<f64> {
    debug_assert!(c < img.channels());
    if img.is_empty() {
        return None;
    }

    let x0f = x.floor();
    let y0f = y.floor();
    let dx = x - x0f;
    let dy = y - y0f;
    let x0 = x0f as isize;
    let y0 = y0f as isize;

    let p00 = sample_at(img, x0, y0, c);
    let p10 = sample_at(img, x0 + 1, y0, c);
    let p01 = sample_at(img, x0, y0 + 1, c);
    let p11 = sample_at(img, x0 + 1, y0 + 1, c);

    // Lerp form keeps flat neighbourhoods and integral coordinates exact.
    let top = p00 + (p10 - p00) * dx;
    let bottom = p01 + (p11 - p01) * dx;
    Some(top + (bottom - top) * dy)
}

#[inline]
fn sample_at<T: Element>(img: &ImageView<'_, T>, x: isize, y: isize, c: usize) -> f64 {
    let mx = clamp_index(x, img.width());
    let my = clamp_index(y, img.height());
    // SAFETY: `clamp_index` only yields indices in `[0, len)` and the view is not
    // empty.
    unsafe { img.get_unchecked(mx, my, c) }.to_f64()
}
