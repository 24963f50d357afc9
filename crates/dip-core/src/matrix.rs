use core::fmt;

use log::debug;

use crate::element::{Element, ElementType, MatrixData};
use crate::geom::{Rect, Size};
use crate::scalar::Scalar;
use crate::view::{ImageView, ImageViewMut};
use crate::{Error, with_element_type};

/// Typed, row-strided 2D buffer.
///
/// `step` is the number of bytes between adjacent row starts. It is always a whole
/// multiple of the element width and at least `cols * width`. A buffer with zero rows
/// or zero columns is the canonical empty state and owns no storage.
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    step: usize,
    data: MatrixData,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::empty(ElementType::U8)
    }
}

impl Matrix {
    pub fn empty(ty: ElementType) -> Self {
        Self {
            rows: 0,
            cols: 0,
            step: 0,
            data: MatrixData::zeroed(ty, 0),
        }
    }

    /// Allocates a tightly packed buffer. Storage is zero-filled.
    pub fn new(rows: usize, cols: usize, ty: ElementType) -> Result<Self, Error> {
        let step = cols
            .checked_mul(ty.size())
            .ok_or(Error::InvalidArgument("matrix row size overflows"))?;
        Self::with_step(rows, cols, ty, step)
    }

    /// Allocates a buffer whose rows are `step` bytes apart, allowing row padding.
    pub fn with_step(rows: usize, cols: usize, ty: ElementType, step: usize) -> Result<Self, Error> {
        if rows == 0 || cols == 0 {
            return Ok(Self::empty(ty));
        }

        let row_bytes = cols
            .checked_mul(ty.size())
            .ok_or(Error::InvalidArgument("matrix row size overflows"))?;
        if step < row_bytes || !step.is_multiple_of(ty.size()) {
            return Err(Error::InvalidStride);
        }

        let len = rows
            .checked_mul(step / ty.size())
            .ok_or(Error::InvalidArgument("matrix size overflows"))?;

        Ok(Self {
            rows,
            cols,
            step,
            data: MatrixData::zeroed(ty, len),
        })
    }

    pub fn zeros(rows: usize, cols: usize, ty: ElementType) -> Result<Self, Error> {
        Self::new(rows, cols, ty)
    }

    /// Takes ownership of packed row-major elements.
    pub fn from_vec<T: Element>(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = rows.checked_mul(cols).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        if expected == 0 {
            return Ok(Self::empty(T::TYPE));
        }

        Ok(Self {
            rows,
            cols,
            step: cols * T::TYPE.size(),
            data: T::wrap(data),
        })
    }

    /// Rebuilds a buffer from its byte layout: `rows` rows of `step` bytes each,
    /// native-endian elements of type `ty`.
    pub fn from_bytes(
        rows: usize,
        cols: usize,
        ty: ElementType,
        step: usize,
        bytes: &[u8],
    ) -> Result<Self, Error> {
        let mut out = Self::with_step(rows, cols, ty, step)?;
        if out.is_empty() {
            return Ok(out);
        }

        let expected = rows * step;
        if bytes.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        out.data = MatrixData::from_bytes(ty, bytes);
        Ok(out)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Bytes between adjacent row starts.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn elem_size(&self) -> usize {
        self.element_type().size()
    }

    pub fn size(&self) -> Size {
        Size::new(self.cols, self.rows)
    }

    pub fn total(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// True when rows carry no padding.
    pub fn is_continuous(&self) -> bool {
        self.step == self.cols * self.elem_size()
    }

    fn stride(&self) -> usize {
        self.step / self.elem_size()
    }

    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    /// Whole storage as bytes, row padding included.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Checked typed access to the whole storage (padding included).
    pub fn typed<T: Element>(&self) -> Result<&[T], Error> {
        T::slice(&self.data).ok_or(Error::TypeMismatch {
            requested: T::TYPE,
            actual: self.element_type(),
        })
    }

    pub fn typed_mut<T: Element>(&mut self) -> Result<&mut [T], Error> {
        let actual = self.element_type();
        T::slice_mut(&mut self.data).ok_or(Error::TypeMismatch {
            requested: T::TYPE,
            actual,
        })
    }

    /// Elements of row `r` without padding.
    pub fn row<T: Element>(&self, r: usize) -> Result<&[T], Error> {
        self.check_index(r, 0)?;
        let start = r * self.stride();
        let cols = self.cols;
        Ok(&self.typed::<T>()?[start..start + cols])
    }

    pub fn row_mut<T: Element>(&mut self, r: usize) -> Result<&mut [T], Error> {
        self.check_index(r, 0)?;
        let start = r * self.stride();
        let cols = self.cols;
        Ok(&mut self.typed_mut::<T>()?[start..start + cols])
    }

    /// Checked element read: fails with `OutOfRange` outside the buffer and with
    /// `TypeMismatch` when `T` is not the declared element type.
    pub fn at<T: Element>(&self, row: usize, col: usize) -> Result<T, Error> {
        self.check_index(row, col)?;
        let idx = row * self.stride() + col;
        Ok(self.typed::<T>()?[idx])
    }

    pub fn at_mut<T: Element>(&mut self, row: usize, col: usize) -> Result<&mut T, Error> {
        self.check_index(row, col)?;
        let idx = row * self.stride() + col;
        Ok(&mut self.typed_mut::<T>()?[idx])
    }

    pub fn set<T: Element>(&mut self, row: usize, col: usize, value: T) -> Result<(), Error> {
        *self.at_mut(row, col)? = value;
        Ok(())
    }

    fn check_index(&self, row: usize, col: usize) -> Result<(), Error> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Typed single-channel view. The element tag is checked once here; reads
    /// through the view are not re-checked.
    pub fn view<T: Element>(&self) -> Result<ImageView<'_, T>, Error> {
        self.view_channels(1)
    }

    pub fn view_mut<T: Element>(&mut self) -> Result<ImageViewMut<'_, T>, Error> {
        self.view_channels_mut(1)
    }

    pub(crate) fn view_channels<T: Element>(
        &self,
        channels: usize,
    ) -> Result<ImageView<'_, T>, Error> {
        let stride = self.stride();
        let data = self.typed::<T>()?;
        ImageView::from_slice(self.cols / channels, self.rows, channels, stride, data)
    }

    pub(crate) fn view_channels_mut<T: Element>(
        &mut self,
        channels: usize,
    ) -> Result<ImageViewMut<'_, T>, Error> {
        let (rows, cols, stride) = (self.rows, self.cols, self.stride());
        let data = self.typed_mut::<T>()?;
        ImageViewMut::from_slice_mut(cols / channels, rows, channels, stride, data)
    }

    /// True when `region` lies inside `[0, cols) x [0, rows)`.
    pub fn contains(&self, region: &Rect) -> bool {
        let bounds = Rect::new(
            0,
            0,
            i32::try_from(self.cols).unwrap_or(i32::MAX),
            i32::try_from(self.rows).unwrap_or(i32::MAX),
        );
        bounds.contains_rect(region)
    }

    /// Copies `region` (element coordinates) into a new, tightly packed buffer.
    /// The result never aliases `self`.
    pub fn extract_subregion(&self, region: &Rect) -> Result<Matrix, Error> {
        if !self.contains(region) {
            return Err(Error::InvalidRegion {
                rect: *region,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let (x, y) = (region.x as usize, region.y as usize);
        let (w, h) = (region.width as usize, region.height as usize);
        if w == 0 || h == 0 {
            return Ok(Self::empty(self.element_type()));
        }

        with_element_type!(self.element_type(), T => {
            let sub = self.view::<T>()?.subview(x, y, w, h)?;
            Self::from_vec(h, w, sub.to_vec())
        })
    }

    /// Produces a same-shape buffer of another element type using host cast rules.
    /// Destinations other than u8, i16, f32 and f64 are rejected unless the type is
    /// unchanged.
    pub fn convert(&self, to: ElementType) -> Result<Matrix, Error> {
        let from = self.element_type();
        if from == to {
            return Ok(self.clone());
        }
        if matches!(to, ElementType::I8 | ElementType::U16) {
            return Err(Error::UnsupportedConversion { from, to });
        }

        debug!(
            "Matrix::convert {}x{} {} -> {}",
            self.rows, self.cols, from, to
        );

        if self.is_empty() {
            return Ok(Self::empty(to));
        }

        with_element_type!(from, S => {
            let src = self.view::<S>()?;
            with_element_type!(to, D => {
                let mut out = Vec::<D>::with_capacity(self.total());
                for y in 0..src.height() {
                    out.extend(src.row(y).iter().map(|&v| v.cast::<D>()));
                }
                Self::from_vec(self.rows, self.cols, out)
            })
        })
    }

    /// Sets every element from the scalar's first component. Only u8, f32 and f64
    /// buffers can be filled.
    pub fn fill(&mut self, value: Scalar) -> Result<(), Error> {
        let v = value.first();
        match &mut self.data {
            MatrixData::U8(d) => d.fill(u8::from_f64(v)),
            MatrixData::F32(d) => d.fill(f32::from_f64(v)),
            MatrixData::F64(d) => d.fill(v),
            other => {
                return Err(Error::UnsupportedType {
                    op: "fill",
                    ty: other.element_type(),
                });
            }
        }
        Ok(())
    }

    pub fn set_zero(&mut self) -> Result<(), Error> {
        self.fill(Scalar::from(0.0))
    }

    pub fn set_one(&mut self) -> Result<(), Error> {
        self.fill(Scalar::from(1.0))
    }

    /// Replaces the owned storage wholesale with a fresh packed allocation.
    pub fn create(&mut self, rows: usize, cols: usize, ty: ElementType) -> Result<(), Error> {
        *self = Self::new(rows, cols, ty)?;
        Ok(())
    }

    /// Drops the storage, leaving an empty buffer of the same element type.
    pub fn release(&mut self) {
        *self = Self::empty(self.element_type());
    }

    fn logical_row_bytes(&self, r: usize) -> &[u8] {
        let start = r * self.step;
        &self.as_bytes()[start..start + self.cols * self.elem_size()]
    }
}

impl PartialEq for Matrix {
    /// Shape, element type and every byte of non-padding content must match.
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.element_type() == other.element_type()
            && (0..self.rows).all(|r| self.logical_row_bytes(r) == other.logical_row_bytes(r))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} {} (step {} bytes)",
            self.rows,
            self.cols,
            self.element_type(),
            self.step
        )
    }
}
