use core::fmt;
use core::ops::{Add, Div, Index, IndexMut, Mul, Sub};

use crate::element::Element;

/// Fixed-arity numeric tuple: one multi-channel pixel value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<T, const N: usize>(pub [T; N]);

pub type Vec2b = Vector<u8, 2>;
pub type Vec3b = Vector<u8, 3>;
pub type Vec4b = Vector<u8, 4>;
pub type Vec2s = Vector<i16, 2>;
pub type Vec3s = Vector<i16, 3>;
pub type Vec4s = Vector<i16, 4>;
pub type Vec2f = Vector<f32, 2>;
pub type Vec3f = Vector<f32, 3>;
pub type Vec4f = Vector<f32, 4>;
pub type Vec2d = Vector<f64, 2>;
pub type Vec3d = Vector<f64, 3>;
pub type Vec4d = Vector<f64, 4>;

impl<T: Element, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self([T::default(); N])
    }
}

impl<T: Element, const N: usize> Vector<T, N> {
    pub const fn new(values: [T; N]) -> Self {
        Self(values)
    }

    pub fn splat(v: T) -> Self {
        Self([v; N])
    }

    pub fn as_array(&self) -> &[T; N] {
        &self.0
    }

    /// Element-wise host cast.
    pub fn cast<U: Element>(self) -> Vector<U, N> {
        Vector(self.0.map(|v| v.cast::<U>()))
    }

    fn zip_with(self, rhs: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = T::from_f64(f(o.to_f64(), r.to_f64()));
        }
        Self(out)
    }

    pub fn mul_elem(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a * b)
    }

    pub fn div_elem(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a / b)
    }

    pub fn min_elem(self, rhs: Self) -> Self {
        self.zip_with(rhs, f64::min)
    }

    pub fn max_elem(self, rhs: Self) -> Self {
        self.zip_with(rhs, f64::max)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.0
            .iter()
            .zip(rhs.0.iter())
            .map(|(a, b)| a.to_f64() * b.to_f64())
            .sum()
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy; the zero vector stays zero.
    pub fn normalized(self) -> Vector<f64, N> {
        let n = self.length();
        let v = self.0.map(|c| c.to_f64());
        if n == 0.0 {
            return Vector(v);
        }
        Vector(v.map(|c| c / n))
    }
}

impl<T: Element, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Element, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Element, const N: usize> Mul<f64> for Vector<T, N> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0.map(|v| T::from_f64(v.to_f64() * rhs)))
    }
}

impl<T: Element, const N: usize> Div<f64> for Vector<T, N> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0.map(|v| T::from_f64(v.to_f64() / rhs)))
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.0[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

/// Four-component `f64` value used as a fill constant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scalar(pub [f64; 4]);

impl Scalar {
    pub const fn all(v: f64) -> Self {
        Self([v; 4])
    }

    pub const fn new(v0: f64, v1: f64, v2: f64, v3: f64) -> Self {
        Self([v0, v1, v2, v3])
    }

    pub fn first(&self) -> f64 {
        self.0[0]
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self([v, 0.0, 0.0, 0.0])
    }
}

impl<T: Element, const N: usize> From<Vector<T, N>> for Scalar {
    /// Copies up to four components; missing ones are zero.
    fn from(v: Vector<T, N>) -> Self {
        let mut out = [0.0; 4];
        for (o, c) in out.iter_mut().zip(v.0) {
            *o = c.to_f64();
        }
        Self(out)
    }
}

impl Index<usize> for Scalar {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Self::Output {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o += r;
        }
        Scalar(out)
    }
}

impl Sub for Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Scalar) -> Self::Output {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o -= r;
        }
        Scalar(out)
    }
}

impl Mul<f64> for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: f64) -> Self::Output {
        Scalar(self.0.map(|v| v * rhs))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{a}, {b}, {c}, {d}]")
    }
}
