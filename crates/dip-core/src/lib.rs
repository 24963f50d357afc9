//! Typed strided pixel buffers for classical image processing.
//!
//! ## Element Types
//! A buffer holds one of six element kinds ([`ElementType`]). Storage is the tagged
//! union [`MatrixData`]; type-sensitive operations dispatch with an exhaustive
//! match via [`with_element_type!`].
//!
//! ## Matrix Step and View Stride
//! [`Matrix::step`] is the distance, in bytes, between adjacent row starts and may
//! exceed `cols * element width`. Borrowed views ([`ImageView`], [`ImageViewMut`])
//! use an element stride instead, so padded buffers and zero-copy subviews share
//! one addressing rule.
//!
//! ## Access Tiers
//! Checked accessors ([`Matrix::at`], [`Image::pixel`]) verify the coordinate and
//! the element tag on every call. Algorithms take a typed view once (one tag check)
//! and then read through `get_unchecked` inside their loops.
//!
//! ## Sub-regions
//! [`Matrix::extract_subregion`] and [`Image::sub_image`] copy into a new, packed
//! buffer. [`ImageView::subview`] is the zero-copy alternative; it borrows the
//! parent and cannot outlive it.
//!
//! ## Images
//! An [`Image`] is a matrix plus a channel count. Channels are interleaved along
//! each row, so pixel `(x, y)` channel `c` is matrix element `(y, x * channels + c)`.

mod element;
mod error;
mod geom;
mod image;
mod matrix;
mod ops;
mod sample;
mod scalar;
mod view;

pub use element::{Element, ElementType, MatrixData};
pub use error::Error;
pub use geom::{Point, Point2d, Point2f, Point2i, Rect, Size};
pub use image::Image;
pub use matrix::Matrix;
pub use ops::{add, eye, subtract, transpose};
pub use sample::{clamp_index, round_half_up, sample_bilinear_f64};
pub use scalar::{
    Scalar, Vec2b, Vec2d, Vec2f, Vec2s, Vec3b, Vec3d, Vec3f, Vec3s, Vec4b, Vec4d, Vec4f, Vec4s,
    Vector,
};
pub use view::{ImageView, ImageViewMut};
