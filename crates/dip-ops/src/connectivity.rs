use dip_core::{Image, Point2i};

/// Pixel adjacency relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborhoodType {
    /// Right, left, down and up.
    #[default]
    N4,
    /// 4-neighbours plus the four diagonals.
    N8,
    /// Mixed adjacency: 4-neighbours always, a diagonal only when neither of the two
    /// 4-neighbours it shares with the centre has the centre's value.
    M,
}

const N4_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn in_bounds(img: &Image, p: Point2i) -> bool {
    p.x >= 0 && p.y >= 0 && (p.x as usize) < img.width() && (p.y as usize) < img.height()
}

/// Channel-0 value through the lenient accessor; non-u8 images read as 0.
fn value(img: &Image, p: Point2i) -> u8 {
    img.get_pixel::<u8>(p.x as isize, p.y as isize, 0)
}

/// In-bounds neighbours of `(x, y)`, 4-neighbours first (right, left, down, up),
/// then the admitted diagonals.
pub fn neighbors(img: &Image, x: i32, y: i32, kind: NeighborhoodType) -> Vec<Point2i> {
    let center = Point2i::new(x, y);
    let mut out: Vec<Point2i> = N4_OFFSETS
        .iter()
        .map(|&(dx, dy)| Point2i::new(x + dx, y + dy))
        .filter(|&p| in_bounds(img, p))
        .collect();

    if kind == NeighborhoodType::N4 {
        return out;
    }

    let v = value(img, center);
    for (dx, dy) in DIAGONAL_OFFSETS {
        let q = Point2i::new(x + dx, y + dy);
        if !in_bounds(img, q) {
            continue;
        }
        if kind == NeighborhoodType::M {
            let shared = [Point2i::new(x + dx, y), Point2i::new(x, y + dy)];
            if shared.iter().any(|&s| in_bounds(img, s) && value(img, s) == v) {
                continue;
            }
        }
        out.push(q);
    }
    out
}

/// True when `p` and `q` are both inside the image, both have value `v` in channel
/// 0, and `q` is a `kind`-neighbour of `p`.
pub fn is_connected(img: &Image, p: Point2i, q: Point2i, kind: NeighborhoodType, v: u8) -> bool {
    if !in_bounds(img, p) || !in_bounds(img, q) {
        return false;
    }
    if value(img, p) != v || value(img, q) != v {
        return false;
    }
    neighbors(img, p.x, p.y, kind).contains(&q)
}
