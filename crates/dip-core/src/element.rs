use core::fmt;

use bytemuck::Pod;

/// Numeric representation of a single buffer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementType {
    #[default]
    U8,
    I8,
    U16,
    I16,
    F32,
    F64,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::U8,
        ElementType::I8,
        ElementType::U16,
        ElementType::I16,
        ElementType::F32,
        ElementType::F64,
    ];

    /// Width of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed element storage. The variant is the buffer's declared element type.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl MatrixData {
    pub fn zeroed(ty: ElementType, len: usize) -> Self {
        match ty {
            ElementType::U8 => Self::U8(vec![0; len]),
            ElementType::I8 => Self::I8(vec![0; len]),
            ElementType::U16 => Self::U16(vec![0; len]),
            ElementType::I16 => Self::I16(vec![0; len]),
            ElementType::F32 => Self::F32(vec![0.0; len]),
            ElementType::F64 => Self::F64(vec![0.0; len]),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Self::U8(_) => ElementType::U8,
            Self::I8(_) => ElementType::I8,
            Self::U16(_) => ElementType::U16,
            Self::I16(_) => ElementType::I16,
            Self::F32(_) => ElementType::F32,
            Self::F64(_) => ElementType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native-endian byte view of the whole storage, padding included.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U8(v) => v,
            Self::I8(v) => bytemuck::cast_slice(v),
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::I16(v) => bytemuck::cast_slice(v),
            Self::F32(v) => bytemuck::cast_slice(v),
            Self::F64(v) => bytemuck::cast_slice(v),
        }
    }

    /// Rebuilds typed storage from raw bytes. `bytes.len()` must be a multiple of
    /// `ty.size()`; a trailing partial element is ignored.
    pub fn from_bytes(ty: ElementType, bytes: &[u8]) -> Self {
        fn collect<T: Pod>(bytes: &[u8]) -> Vec<T> {
            bytes
                .chunks_exact(size_of::<T>())
                .map(bytemuck::pod_read_unaligned)
                .collect()
        }

        match ty {
            ElementType::U8 => Self::U8(bytes.to_vec()),
            ElementType::I8 => Self::I8(collect(bytes)),
            ElementType::U16 => Self::U16(collect(bytes)),
            ElementType::I16 => Self::I16(collect(bytes)),
            ElementType::F32 => Self::F32(collect(bytes)),
            ElementType::F64 => Self::F64(collect(bytes)),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for i8 {}
    impl Sealed for u16 {}
    impl Sealed for i16 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A Rust scalar type that can live in a [`MatrixData`].
///
/// Implemented for exactly the six [`ElementType`] kinds.
pub trait Element:
    Pod + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + sealed::Sealed
{
    const TYPE: ElementType;

    /// Host numeric cast: floats truncate toward zero and saturate when narrowed to
    /// integers, NaN becomes zero.
    fn from_f64(v: f64) -> Self;

    fn to_f64(self) -> f64;

    /// Exact for integer types; floats truncate.
    fn to_i64(self) -> i64;

    /// Host cast from a wide integer: integers wrap, floats round to nearest.
    fn from_i64(v: i64) -> Self;

    /// Host `as`-cast between element types: integer to integer wraps, float to
    /// integer truncates and saturates.
    #[inline]
    fn cast<D: Element>(self) -> D {
        if Self::TYPE.is_float() {
            D::from_f64(self.to_f64())
        } else {
            D::from_i64(self.to_i64())
        }
    }

    fn wrap(data: Vec<Self>) -> MatrixData;

    fn slice(data: &MatrixData) -> Option<&[Self]>;

    fn slice_mut(data: &mut MatrixData) -> Option<&mut [Self]>;
}

macro_rules! impl_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const TYPE: ElementType = ElementType::$variant;

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }

            #[inline]
            fn from_i64(v: i64) -> Self {
                v as $t
            }

            fn wrap(data: Vec<Self>) -> MatrixData {
                MatrixData::$variant(data)
            }

            fn slice(data: &MatrixData) -> Option<&[Self]> {
                match data {
                    MatrixData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_mut(data: &mut MatrixData) -> Option<&mut [Self]> {
                match data {
                    MatrixData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(u8, U8);
impl_element!(i8, I8);
impl_element!(u16, U16);
impl_element!(i16, I16);
impl_element!(f32, F32);
impl_element!(f64, F64);

/// Binds a concrete element type alias for a runtime [`ElementType`] and evaluates
/// the body once per arm of an exhaustive match.
///
/// ```
/// use dip_core::{Element, ElementType, with_element_type};
///
/// fn width_of<T: Element>() -> usize { size_of::<T>() }
///
/// let w = with_element_type!(ElementType::F32, T => width_of::<T>());
/// assert_eq!(w, 4);
/// ```
#[macro_export]
macro_rules! with_element_type {
    ($ty:expr, $t:ident => $body:expr) => {
        match $ty {
            $crate::ElementType::U8 => {
                type $t = u8;
                $body
            }
            $crate::ElementType::I8 => {
                type $t = i8;
                $body
            }
            $crate::ElementType::U16 => {
                type $t = u16;
                $body
            }
            $crate::ElementType::I16 => {
                type $t = i16;
                $body
            }
            $crate::ElementType::F32 => {
                type $t = f32;
                $body
            }
            $crate::ElementType::F64 => {
                type $t = f64;
                $body
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{Element, ElementType, MatrixData};

    #[test]
    fn sizes_and_names() {
        let sizes: Vec<usize> = ElementType::ALL.iter().map(|t| t.size()).collect();
        assert_eq!(sizes, vec![1, 1, 2, 2, 4, 8]);
        assert_eq!(ElementType::I16.to_string(), "i16");
        assert!(ElementType::F64.is_float());
        assert!(!ElementType::U16.is_float());
    }

    #[test]
    fn host_cast_truncates_and_saturates() {
        assert_eq!(u8::from_f64(12.9), 12);
        assert_eq!(u8::from_f64(-3.0), 0);
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(i8::from_f64(-7.8), -7);
        assert_eq!(i16::from_f64(f64::NAN), 0);
        assert_eq!(f32::from_f64(0.5), 0.5);
    }

    #[test]
    fn cast_matches_as_semantics() {
        assert_eq!((-1i16).cast::<u8>(), 255);
        assert_eq!(65535u16.cast::<i16>(), -1);
        assert_eq!((-1.5f32).cast::<u8>(), 0);
        assert_eq!(300.7f64.cast::<i8>(), 127);
        assert_eq!(200u8.cast::<f32>(), 200.0);
        assert_eq!((-3i8).cast::<f64>(), -3.0);
    }

    #[test]
    fn storage_tag_matches_slice_access() {
        let mut data = MatrixData::zeroed(ElementType::U16, 3);
        assert_eq!(data.element_type(), ElementType::U16);
        assert!(u8::slice(&data).is_none());
        u16::slice_mut(&mut data).expect("u16 storage")[1] = 0x0102;
        assert_eq!(u16::slice(&data), Some(&[0u16, 0x0102, 0][..]));
        assert_eq!(data.as_bytes().len(), 6);
    }

    #[test]
    fn bytes_round_trip_through_typed_storage() {
        let data = MatrixData::F64(vec![1.5, -2.25]);
        let rebuilt = MatrixData::from_bytes(ElementType::F64, data.as_bytes());
        assert_eq!(rebuilt, data);
    }

    #[test]
    fn dispatch_macro_binds_concrete_type() {
        for ty in ElementType::ALL {
            let size = with_element_type!(ty, T => size_of::<T>());
            assert_eq!(size, ty.size());
            let tag = with_element_type!(ty, T => <T as Element>::TYPE);
            assert_eq!(tag, ty);
        }
    }
}
