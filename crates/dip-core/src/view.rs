use crate::Error;

/// Borrowed, typed, channel-interleaved view over strided element storage.
///
/// `stride` is the distance in elements between adjacent row starts and is at least
/// `width * channels`. Views alias their parent storage; a [`subview`](Self::subview)
/// is zero-copy.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T: Copy> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        let row_len = checked_row_len(width, channels)?;
        if stride < row_len {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(row_len, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Interleaved elements of row `y` without padding.
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width * self.channels]
    }

    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<T> {
        if x >= self.width || y >= self.height || c >= self.channels {
            return None;
        }
        self.data
            .get(y * self.stride + x * self.channels + c)
            .copied()
    }

    /// Returns a sample without bounds checks.
    ///
    /// # Safety
    /// Caller must guarantee `x < self.width()`, `y < self.height()` and
    /// `c < self.channels()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, x: usize, y: usize, c: usize) -> T {
        // SAFETY: Caller guarantees the coordinate is inside the view. With view
        // invariants this implies the index is in bounds of `data`.
        unsafe { *self.data.get_unchecked(y * self.stride + x * self.channels + c) }
    }

    /// Zero-copy rectangular window in pixel coordinates.
    pub fn subview(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageView<'a, T>, Error> {
        if x > self.width
            || y > self.height
            || width > (self.width - x)
            || height > (self.height - y)
        {
            return Err(Error::OutOfRange {
                row: y,
                col: x,
                rows: self.height,
                cols: self.width,
            });
        }

        let start = y * self.stride + x * self.channels;
        let min_len = min_required_len(width * self.channels, height, self.stride)
            .ok_or(Error::InvalidStride)?;
        let tail = self.data.get(start..).unwrap_or(&[]);

        if tail.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: tail.len(),
            });
        }

        Ok(ImageView {
            width,
            height,
            channels: self.channels,
            stride: self.stride,
            data: tail,
        })
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width * self.channels
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        let len = self.width * self.channels * self.height;
        self.data.get(0..len)
    }

    /// Copies the view into a packed vector, row by row.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.width * self.channels * self.height);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }
}

#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
    data: &'a mut [T],
}

impl<'a, T: Copy> ImageViewMut<'a, T> {
    pub fn from_slice_mut(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
        data: &'a mut [T],
    ) -> Result<Self, Error> {
        let row_len = checked_row_len(width, channels)?;
        if stride < row_len {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(row_len, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width * self.channels]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &mut self.data[start..start + self.width * self.channels]
    }

    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<T> {
        self.as_view().get(x, y, c)
    }

    pub fn get_mut(&mut self, x: usize, y: usize, c: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height || c >= self.channels {
            return None;
        }
        let idx = y * self.stride + x * self.channels + c;
        self.data.get_mut(idx)
    }

    /// Writes a sample without bounds checks.
    ///
    /// # Safety
    /// Caller must guarantee `x < self.width()`, `y < self.height()` and
    /// `c < self.channels()`.
    #[inline]
    pub unsafe fn set_unchecked(&mut self, x: usize, y: usize, c: usize, value: T) {
        let idx = y * self.stride + x * self.channels + c;
        // SAFETY: Caller guarantees the coordinate is inside the view. With view
        // invariants this implies `idx` is in bounds of `data`.
        unsafe { *self.data.get_unchecked_mut(idx) = value };
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.stride,
            data: self.data,
        }
    }

    pub fn fill(&mut self, value: T) {
        for y in 0..self.height {
            self.row_mut(y).fill(value);
        }
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width * self.channels
    }

    pub fn as_contiguous_slice_mut(&mut self) -> Option<&mut [T]> {
        if !self.is_contiguous() {
            return None;
        }
        let len = self.width * self.channels * self.height;
        self.data.get_mut(0..len)
    }
}

fn checked_row_len(width: usize, channels: usize) -> Result<usize, Error> {
    if channels == 0 {
        return Err(Error::InvalidArgument("channel count must be at least 1"));
    }
    width.checked_mul(channels).ok_or(Error::SizeMismatch {
        expected: usize::MAX,
        actual: width,
    })
}

pub(crate) fn min_required_len(row_len: usize, height: usize, stride: usize) -> Option<usize> {
    if row_len == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(row_len)
}
