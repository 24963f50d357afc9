use dip_core::{Error, Image};
use log::debug;

use crate::point::require_u8;

/// Binary AND: 1 where both samples are exactly 1, else 0.
pub fn logical_and(a: &Image, b: &Image) -> Result<Image, Error> {
    debug!("logical_and {} & {}", a, b);
    zip_u8(a, b, "logical_and", |p, q| u8::from(p == 1 && q == 1))
}

/// Binary XOR: 1 where the samples differ, else 0.
pub fn logical_xor(a: &Image, b: &Image) -> Result<Image, Error> {
    debug!("logical_xor {} ^ {}", a, b);
    zip_u8(a, b, "logical_xor", |p, q| u8::from(p != q))
}

fn zip_u8(a: &Image, b: &Image, op: &'static str, f: impl Fn(u8, u8) -> u8) -> Result<Image, Error> {
    require_u8(a, op)?;
    require_u8(b, op)?;
    if a.is_empty() || b.is_empty() {
        return Err(Error::InvalidArgument("logical operands must not be empty"));
    }
    if a.size() != b.size() || a.channels() != b.channels() {
        return Err(Error::ChannelMismatch);
    }

    let (va, vb) = (a.view::<u8>()?, b.view::<u8>()?);
    let mut out = Vec::with_capacity(va.width() * va.channels() * va.height());
    for y in 0..va.height() {
        out.extend(va.row(y).iter().zip(vb.row(y)).map(|(&p, &q)| f(p, q)));
    }
    Image::from_vec(a.width(), a.height(), a.channels(), out)
}
