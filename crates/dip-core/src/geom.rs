use core::fmt;
use core::ops::{Add, AddAssign, BitAnd, BitOr, Div, Mul, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

pub type Point2i = Point<i32>;
pub type Point2f = Point<f32>;
pub type Point2d = Point<f64>;

impl<T> Point<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl Point2d {
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Rotates about the origin by `theta` radians (counter-clockwise in a y-up frame).
    pub fn rotated(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }
}

impl From<Point2i> for Point2d {
    fn from(p: Point2i) -> Self {
        Self {
            x: f64::from(p.x),
            y: f64::from(p.y),
        }
    }
}

impl From<Point2f> for Point2d {
    fn from(p: Point2f) -> Self {
        Self {
            x: f64::from(p.x),
            y: f64::from(p.y),
        }
    }
}

impl<T: Add<Output = T>> Add for Point<T> {
    type Output = Point<T>;

    fn add(self, rhs: Point<T>) -> Self::Output {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: Sub<Output = T>> Sub for Point<T> {
    type Output = Point<T>;

    fn sub(self, rhs: Point<T>) -> Self::Output {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Point<T> {
    type Output = Point<T>;

    fn mul(self, rhs: T) -> Self::Output {
        Point {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl<T: Div<Output = T> + Copy> Div<T> for Point<T> {
    type Output = Point<T>;

    fn div(self, rhs: T) -> Self::Output {
        Point {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

impl<T: AddAssign> AddAssign for Point<T> {
    fn add_assign(&mut self, rhs: Point<T>) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<T: SubAssign> SubAssign for Point<T> {
    fn sub_assign(&mut self, rhs: Point<T>) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle: origin plus size. The origin may be negative; the right
/// and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(tl: Point2i, br: Point2i) -> Self {
        Self::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y)
    }

    pub fn tl(&self) -> Point2i {
        Point::new(self.x, self.y)
    }

    pub fn tr(&self) -> Point2i {
        Point::new(self.x + self.width, self.y)
    }

    pub fn bl(&self) -> Point2i {
        Point::new(self.x, self.y + self.height)
    }

    pub fn br(&self) -> Point2i {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point2i {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, p: Point2i) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// True when `other` lies fully inside `self`. Empty rectangles are contained
    /// when their origin lies within the closed extent of `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.width >= 0
            && other.height >= 0
            && i64::from(other.x) + i64::from(other.width)
                <= i64::from(self.x) + i64::from(self.width)
            && i64::from(other.y) + i64::from(other.height)
                <= i64::from(self.y) + i64::from(self.height)
    }

    pub fn inflate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + 2 * dx,
            self.height + 2 * dy,
        )
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

impl BitAnd for Rect {
    type Output = Rect;

    /// Intersection; disjoint rectangles yield the default (empty) rectangle.
    fn bitand(self, rhs: Rect) -> Self::Output {
        let x1 = self.x.max(rhs.x);
        let y1 = self.y.max(rhs.y);
        let x2 = (self.x + self.width).min(rhs.x + rhs.width);
        let y2 = (self.y + self.height).min(rhs.y + rhs.height);

        if x2 <= x1 || y2 <= y1 {
            return Rect::default();
        }
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }
}

impl BitOr for Rect {
    type Output = Rect;

    /// Bounding union; an empty operand is ignored.
    fn bitor(self, rhs: Rect) -> Self::Output {
        if self.is_empty() {
            return rhs;
        }
        if rhs.is_empty() {
            return self;
        }

        let x1 = self.x.min(rhs.x);
        let y1 = self.y.min(rhs.y);
        let x2 = (self.x + self.width).max(rhs.x + rhs.width);
        let y2 = (self.y + self.height).max(rhs.y + rhs.height);
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}, {})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Point2d, Point2i, Rect, Size};

    #[test]
    fn point_ops() {
        let p = Point2i::new(2, 3);
        let q = Point2i::new(1, -1);

        assert_eq!(p + q, Point::new(3, 2));
        assert_eq!(p - q, Point::new(1, 4));
        assert_eq!(p * 2, Point::new(4, 6));
        assert_eq!(Point::new(4.0, 6.0) / 2.0, Point::new(2.0, 3.0));

        let mut r = p;
        r += q;
        r -= Point::new(3, 2);
        assert_eq!(r, Point::new(0, 0));
        assert_eq!(p.to_string(), "(2, 3)");
    }

    #[test]
    fn point_rotation_and_norm() {
        let v = Point2d::new(3.0, 4.0);
        assert!((v.norm() - 5.0).abs() < 1e-12);

        let r = Point2d::new(1.0, 0.0).rotated(core::f64::consts::FRAC_PI_2);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn size_area_and_empty() {
        assert_eq!(Size::new(4, 3).area(), 12);
        assert!(Size::new(0, 3).is_empty());
        assert_eq!(Size::new(4, 3).to_string(), "4x3");
    }

    #[test]
    fn rect_corners_and_containment() {
        let r = Rect::new(1, 2, 4, 3);
        assert_eq!(r.tl(), Point::new(1, 2));
        assert_eq!(r.br(), Point::new(5, 5));
        assert_eq!(r.center(), Point::new(3, 3));
        assert_eq!(r.area(), 12);

        assert!(r.contains(Point::new(1, 2)));
        assert!(!r.contains(Point::new(5, 2)));

        assert!(r.contains_rect(&Rect::new(1, 2, 4, 3)));
        assert!(r.contains_rect(&Rect::new(2, 3, 1, 1)));
        assert!(!r.contains_rect(&Rect::new(2, 3, 4, 1)));
        assert!(!r.contains_rect(&Rect::new(0, 2, 1, 1)));
        assert!(!r.contains_rect(&Rect::new(2, 2, -1, 1)));
    }

    #[test]
    fn rect_intersection_union_inflate() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 1, 4, 2);

        assert_eq!(a & b, Rect::new(2, 1, 2, 2));
        assert_eq!(a & Rect::new(10, 10, 1, 1), Rect::default());
        assert_eq!(a | b, Rect::new(0, 0, 6, 4));
        assert_eq!(Rect::default() | b, b);
        assert_eq!(a.inflate(1, 2), Rect::new(-1, -2, 6, 8));
        assert_eq!(a.translate(3, -1), Rect::new(3, -1, 4, 4));
        assert_eq!(Rect::from_corners(a.tl(), a.br()), a);
    }
}
