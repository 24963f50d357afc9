use thiserror::Error;

use crate::element::ElementType;
use crate::geom::Rect;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("index ({row}, {col}) out of range for {rows}x{cols} buffer")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("channel {channel} out of range for {channels}-channel image")]
    ChannelOutOfRange { channel: usize, channels: usize },
    #[error("region {rect} is not contained in {rows}x{cols} buffer")]
    InvalidRegion { rect: Rect, rows: usize, cols: usize },
    #[error("{op} is not supported for element type {ty}")]
    UnsupportedType { op: &'static str, ty: ElementType },
    #[error("element type mismatch: requested {requested}, buffer holds {actual}")]
    TypeMismatch {
        requested: ElementType,
        actual: ElementType,
    },
    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: ElementType, to: ElementType },
    #[error("channel images differ in size, channel count or element type")]
    ChannelMismatch,
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("invalid stride")]
    InvalidStride,
}
