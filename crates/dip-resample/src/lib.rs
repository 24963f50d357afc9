//! Inverse-mapping geometric resampling over [`dip_core::Image`].
//!
//! Every algorithm walks the destination grid, computes the matching source
//! coordinate and samples there, so each destination pixel is written exactly
//! once. Results are freshly allocated and keep the source channel count and
//! element type.
//!
//! Sampling rules:
//! - Nearest-neighbour rounds with `floor(v + 0.5)` and clamps into the source.
//! - Bilinear takes the `floor`-based 2x2 neighbourhood, clamps each corner index
//!   on its own axis and truncates the blend into the element type.
//! - Rotation turns about `(W / 2, H / 2)` and zeroes pixels whose source
//!   coordinate lies outside the image.

mod bilinear;
mod nearest;
mod remap;
mod rotate;
mod transform;

pub use bilinear::{bilinear_interpolate, bilinear_zoom};
pub use nearest::{nearest_zoom, resize_nearest};
pub use rotate::rotate;
pub use transform::{flip_horizontal, flip_vertical, rotate90};
