use dip_core::{Error, Image, ImageView};
use log::{debug, warn};

use crate::point::require_u8;

#[inline]
fn dst_dims(src_w: usize, src_h: usize, factor: usize) -> (usize, usize) {
    (src_w / factor, src_h / factor)
}

/// Box-mean reduction by an integer `factor`.
///
/// Output is `floor(W / factor) x floor(H / factor)`; each destination sample is the
/// integer mean of one `factor x factor` source block, per channel. Trailing
/// columns and rows that do not fill a block are dropped. A factor of 0 or 1
/// returns a copy.
pub fn downsample(img: &Image, factor: usize) -> Result<Image, Error> {
    require_u8(img, "downsample")?;
    if factor <= 1 {
        return Ok(img.clone());
    }

    let (dst_w, dst_h) = dst_dims(img.width(), img.height(), factor);
    debug!("downsample {} by {factor} -> {dst_w}x{dst_h}", img);
    if dst_w == 0 || dst_h == 0 {
        warn!("downsample factor {factor} exceeds image size {}", img.size());
        return Image::new(dst_w, dst_h, img.channels(), img.element_type());
    }

    let src = img.view::<u8>()?;
    let mut out = vec![0u8; dst_w * dst_h * src.channels()];
    box_mean(&src, factor, &mut out, dst_w, dst_h);
    Image::from_vec(dst_w, dst_h, src.channels(), out)
}

fn box_mean(src: &ImageView<'_, u8>, factor: usize, dst: &mut [u8], dst_w: usize, dst_h: usize) {
    let k = src.channels();
    let area = (factor * factor) as u32;
    let mut sums = vec![0u32; dst_w * k];

    for y in 0..dst_h {
        sums.fill(0);
        for row in (y * factor..(y + 1) * factor).map(|sy| src.row(sy)) {
            for (x, acc) in sums.chunks_exact_mut(k).enumerate() {
                let block = &row[x * factor * k..(x + 1) * factor * k];
                for px in block.chunks_exact(k) {
                    for (a, &v) in acc.iter_mut().zip(px) {
                        *a += u32::from(v);
                    }
                }
            }
        }

        let dst_row = &mut dst[y * dst_w * k..(y + 1) * dst_w * k];
        for (d, &s) in dst_row.iter_mut().zip(&sums) {
            *d = (s / area) as u8;
        }
    }
}
