//! Classical point, set and neighbourhood operations on u8 images.
//!
//! Every operation takes a [`dip_core::Image`] of element type u8 and returns a new
//! image with the same channel count. Other element types fail with
//! `UnsupportedType`. Arithmetic results are cast back to u8 the way an `as` cast
//! does, so out-of-range values wrap instead of saturating.
//!
//! Connectivity helpers read channel 0 only.

mod connectivity;
mod downsample;
mod logical;
mod point;

pub use connectivity::{NeighborhoodType, is_connected, neighbors};
pub use downsample::downsample;
pub use logical::{logical_and, logical_xor};
pub use point::{invert_image, quantize, set_complement};
