use core::fmt;

use crate::element::{Element, ElementType};
use crate::geom::{Rect, Size};
use crate::matrix::Matrix;
use crate::scalar::{Scalar, Vector};
use crate::view::{ImageView, ImageViewMut};
use crate::{Error, with_element_type};

/// A [`Matrix`] with an explicit channel count.
///
/// Channels are interleaved along each row: pixel `(x, y)` channel `c` lives at
/// matrix row `y`, column `x * channels + c`. The matrix column count is always an
/// exact multiple of `channels`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    mat: Matrix,
    channels: usize,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            mat: Matrix::default(),
            channels: 1,
        }
    }
}

impl Image {
    /// Zero-filled `width x height` image.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        ty: ElementType,
    ) -> Result<Self, Error> {
        if channels == 0 {
            return Err(Error::InvalidArgument("channel count must be at least 1"));
        }
        let cols = width
            .checked_mul(channels)
            .ok_or(Error::InvalidArgument("image row size overflows"))?;
        Ok(Self {
            mat: Matrix::new(height, cols, ty)?,
            channels,
        })
    }

    pub fn gray(width: usize, height: usize, ty: ElementType) -> Result<Self, Error> {
        Self::new(width, height, 1, ty)
    }

    /// Image with every element set to the first component of `value`.
    pub fn filled(
        width: usize,
        height: usize,
        channels: usize,
        ty: ElementType,
        value: Scalar,
    ) -> Result<Self, Error> {
        let mut img = Self::new(width, height, channels, ty)?;
        img.fill(value)?;
        Ok(img)
    }

    pub fn zeros(
        width: usize,
        height: usize,
        channels: usize,
        ty: ElementType,
    ) -> Result<Self, Error> {
        Self::new(width, height, channels, ty)
    }

    pub fn ones(
        width: usize,
        height: usize,
        channels: usize,
        ty: ElementType,
    ) -> Result<Self, Error> {
        Self::filled(width, height, channels, ty, Scalar::from(1.0))
    }

    /// Wraps an existing matrix, reinterpreting its columns as interleaved channels.
    pub fn from_matrix(mat: Matrix, channels: usize) -> Result<Self, Error> {
        if channels == 0 {
            return Err(Error::InvalidArgument("channel count must be at least 1"));
        }
        if !mat.cols().is_multiple_of(channels) {
            return Err(Error::InvalidArgument(
                "matrix columns are not a multiple of the channel count",
            ));
        }
        Ok(Self { mat, channels })
    }

    /// Takes packed, channel-interleaved samples.
    pub fn from_vec<T: Element>(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<T>,
    ) -> Result<Self, Error> {
        if channels == 0 {
            return Err(Error::InvalidArgument("channel count must be at least 1"));
        }
        let cols = width
            .checked_mul(channels)
            .ok_or(Error::InvalidArgument("image row size overflows"))?;
        let mat = Matrix::from_vec(height, cols, data)?;
        Ok(Self { mat, channels })
    }

    pub fn width(&self) -> usize {
        self.mat.cols() / self.channels
    }

    pub fn height(&self) -> usize {
        self.mat.rows()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn element_type(&self) -> ElementType {
        self.mat.element_type()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.mat.is_empty()
    }

    pub fn matrix(&self) -> &Matrix {
        &self.mat
    }

    pub fn into_matrix(self) -> Matrix {
        self.mat
    }

    /// Channel-interleaved bytes of the whole storage.
    pub fn as_bytes(&self) -> &[u8] {
        self.mat.as_bytes()
    }

    fn check_pixel(&self, x: usize, y: usize, c: usize) -> Result<usize, Error> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::OutOfRange {
                row: y,
                col: x,
                rows: self.height(),
                cols: self.width(),
            });
        }
        if c >= self.channels {
            return Err(Error::ChannelOutOfRange {
                channel: c,
                channels: self.channels,
            });
        }
        Ok(x * self.channels + c)
    }

    /// Strict read: fails on an out-of-range coordinate or channel.
    pub fn pixel<T: Element>(&self, x: usize, y: usize, c: usize) -> Result<T, Error> {
        let col = self.check_pixel(x, y, c)?;
        self.mat.at(y, col)
    }

    pub fn pixel_mut<T: Element>(
        &mut self,
        x: usize,
        y: usize,
        c: usize,
    ) -> Result<&mut T, Error> {
        let col = self.check_pixel(x, y, c)?;
        self.mat.at_mut(y, col)
    }

    pub fn set<T: Element>(&mut self, x: usize, y: usize, c: usize, value: T) -> Result<(), Error> {
        *self.pixel_mut(x, y, c)? = value;
        Ok(())
    }

    /// Lenient read: any out-of-range coordinate or channel, or a mismatched `T`,
    /// yields `T::default()`.
    pub fn get_pixel<T: Element>(&self, x: isize, y: isize, c: usize) -> T {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => self.pixel(x, y, c).unwrap_or_default(),
            _ => T::default(),
        }
    }

    /// Lenient write: silently ignored when the target is not addressable.
    pub fn set_pixel<T: Element>(&mut self, x: isize, y: isize, c: usize, value: T) {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            let _ = self.set(x, y, c, value);
        }
    }

    /// All channels of one pixel. `N` must equal the channel count.
    pub fn pixel_vec<T: Element, const N: usize>(
        &self,
        x: usize,
        y: usize,
    ) -> Result<Vector<T, N>, Error> {
        if N != self.channels {
            return Err(Error::ChannelMismatch);
        }
        let start = self.check_pixel(x, y, 0)?;
        let row = self.mat.row::<T>(y)?;
        let mut out = [T::default(); N];
        out.copy_from_slice(&row[start..start + N]);
        Ok(Vector(out))
    }

    pub fn set_pixel_vec<T: Element, const N: usize>(
        &mut self,
        x: usize,
        y: usize,
        value: Vector<T, N>,
    ) -> Result<(), Error> {
        if N != self.channels {
            return Err(Error::ChannelMismatch);
        }
        let start = self.check_pixel(x, y, 0)?;
        let row = self.mat.row_mut::<T>(y)?;
        row[start..start + N].copy_from_slice(&value.0);
        Ok(())
    }

    /// Typed interleaved view, checked once against the element tag.
    pub fn view<T: Element>(&self) -> Result<ImageView<'_, T>, Error> {
        self.mat.view_channels(self.channels)
    }

    pub fn view_mut<T: Element>(&mut self) -> Result<ImageViewMut<'_, T>, Error> {
        self.mat.view_channels_mut(self.channels)
    }

    /// True when `rect` (pixel coordinates) lies fully inside the image.
    pub fn contains(&self, rect: &Rect) -> bool {
        let bounds = Rect::new(
            0,
            0,
            i32::try_from(self.width()).unwrap_or(i32::MAX),
            i32::try_from(self.height()).unwrap_or(i32::MAX),
        );
        bounds.contains_rect(rect)
    }

    /// Copies a pixel-coordinate rectangle into a new image with the same channel
    /// count. The copy never aliases `self`.
    pub fn sub_image(&self, rect: &Rect) -> Result<Image, Error> {
        let invalid = || Error::InvalidRegion {
            rect: *rect,
            rows: self.height(),
            cols: self.width(),
        };
        if !self.contains(rect) {
            return Err(invalid());
        }

        let k = i32::try_from(self.channels).map_err(|_| invalid())?;
        let scaled = Rect::new(
            rect.x.checked_mul(k).ok_or_else(invalid)?,
            rect.y,
            rect.width.checked_mul(k).ok_or_else(invalid)?,
            rect.height,
        );
        Ok(Self {
            mat: self.mat.extract_subregion(&scaled)?,
            channels: self.channels,
        })
    }

    /// Copies channel `c` into a single-channel image.
    pub fn channel(&self, c: usize) -> Result<Image, Error> {
        if c >= self.channels {
            return Err(Error::ChannelOutOfRange {
                channel: c,
                channels: self.channels,
            });
        }
        if self.is_empty() {
            return Ok(Self {
                mat: Matrix::empty(self.element_type()),
                channels: 1,
            });
        }

        with_element_type!(self.element_type(), T => {
            let src = self.view::<T>()?;
            let mut out = Vec::<T>::with_capacity(src.width() * src.height());
            for y in 0..src.height() {
                out.extend(src.row(y).iter().skip(c).step_by(self.channels).copied());
            }
            Self::from_vec(src.width(), src.height(), 1, out)
        })
    }

    pub fn split_channels(&self) -> Result<Vec<Image>, Error> {
        (0..self.channels).map(|c| self.channel(c)).collect()
    }

    /// Interleaves channel 0 of each plane into one image, plane `i` becoming
    /// channel `i`. Every plane must share width, height and element type; an empty
    /// list gives an empty image.
    pub fn merge_channels(planes: &[Image]) -> Result<Image, Error> {
        let Some(first) = planes.first() else {
            return Ok(Image::default());
        };
        let consistent = planes.iter().all(|p| {
            p.width() == first.width()
                && p.height() == first.height()
                && p.element_type() == first.element_type()
        });
        if !consistent {
            return Err(Error::ChannelMismatch);
        }

        let (w, h, k) = (first.width(), first.height(), planes.len());
        if first.is_empty() {
            return Ok(Self {
                mat: Matrix::empty(first.element_type()),
                channels: k,
            });
        }

        with_element_type!(first.element_type(), T => {
            let views = planes
                .iter()
                .map(|p| p.view::<T>())
                .collect::<Result<Vec<_>, _>>()?;
            let mut out = Vec::<T>::with_capacity(w * h * k);
            for y in 0..h {
                let rows: Vec<(&[T], usize)> =
                    views.iter().map(|v| (v.row(y), v.channels())).collect();
                for x in 0..w {
                    out.extend(rows.iter().map(|&(r, stride)| r[x * stride]));
                }
            }
            Self::from_vec(w, h, k, out)
        })
    }

    /// Same geometry and channel count, elements cast with host rules.
    pub fn convert(&self, to: ElementType) -> Result<Image, Error> {
        Ok(Self {
            mat: self.mat.convert(to)?,
            channels: self.channels,
        })
    }

    pub fn fill(&mut self, value: Scalar) -> Result<(), Error> {
        self.mat.fill(value)
    }

    pub fn set_zero(&mut self) -> Result<(), Error> {
        self.mat.set_zero()
    }

    pub fn set_one(&mut self) -> Result<(), Error> {
        self.mat.set_one()
    }

    /// Replaces the storage with a fresh zero-filled allocation.
    pub fn create(
        &mut self,
        width: usize,
        height: usize,
        channels: usize,
        ty: ElementType,
    ) -> Result<(), Error> {
        *self = Self::new(width, height, channels, ty)?;
        Ok(())
    }

    pub fn release(&mut self) {
        self.mat.release();
    }

    /// Pixel coordinates in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let w = self.width();
        (0..self.height()).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} {}",
            self.width(),
            self.height(),
            self.channels,
            self.element_type()
        )
    }
}
