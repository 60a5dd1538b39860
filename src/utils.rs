//! Shape generators used by demos, benchmarks and tests
use crate::{PI, Path64, Point64};

/// Integer rectangle given by its edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect64 {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Rect64 {
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn width(&self) -> i64 {
        self.right - self.left
    }

    pub const fn height(&self) -> i64 {
        self.bottom - self.top
    }

    pub const fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }
}

/// Axis aligned rectangle `(0, 0) - (width, height)`
pub fn rectangle(width: i64, height: i64) -> Path64 {
    vec![
        Point64::new(0, 0),
        Point64::new(width, 0),
        Point64::new(width, height),
        Point64::new(0, height),
    ]
}

/// Polygon approximating ellipse inscribed into `rect`
///
/// Number of vertices grows with square root of the average radius.
pub fn ellipse(rect: Rect64) -> Path64 {
    if rect.is_empty() {
        return Path64::new();
    }
    let cx = (rect.left + rect.right) / 2;
    let cy = (rect.top + rect.bottom) / 2;
    let rx = (rect.width() / 2) as f64;
    let ry = (rect.height() / 2) as f64;
    let steps = ((PI * ((rx + ry) / 2.0).sqrt()) as usize).max(3);
    let (si, co) = (2.0 * PI / steps as f64).sin_cos();
    let (mut dx, mut dy) = (co, si);
    let mut result = Path64::with_capacity(steps);
    result.push(Point64::new(cx + rx as i64, cy));
    for _ in 1..steps {
        result.push(Point64::new(cx + (rx * dx) as i64, cy + (ry * dy) as i64));
        (dx, dy) = (dx * co - dy * si, dy * co + dx * si);
    }
    result
}

/// Polygon with `count` random vertices inside `(0, 0) - (width, height)`
pub fn random_poly(rnd: &mut Rnd, width: u32, height: u32, count: usize) -> Path64 {
    (0..count)
        .map(|_| Point64::new(rnd.below(width) as i64, rnd.below(height) as i64))
        .collect()
}

/// Copy of `path` translated by a random offset below `(max_width, max_height)`
pub fn random_offset(rnd: &mut Rnd, path: &[Point64], max_width: u32, max_height: u32) -> Path64 {
    let dx = rnd.below(max_width) as i64;
    let dy = rnd.below(max_height) as i64;
    path.iter()
        .map(|point| Point64::new(point.x + dx, point.y + dy))
        .collect()
}

/// Simple deterministic random number generator
#[derive(Debug, Clone, Default)]
pub struct Rnd {
    state: u32,
}

impl Rnd {
    /// Create new random number generator with seed `0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new random number generator with provided `seed` value
    pub fn with_seed(seed: u32) -> Self {
        Self { state: seed }
    }

    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(214_013).wrapping_add(2_531_011) & 0x7fffffff;
        self.state >> 16
    }

    /// Sample `u32` from uniform distributes
    pub fn uniform_u32(&mut self) -> u32 {
        ((self.step() & 0xffff) << 16) | (self.step() & 0xffff)
    }

    /// Sample `u32` from `[0, bound)`, zero bound always gives zero
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.uniform_u32() % bound
    }

    /// Sample f64 from `Uniform([0, 1])`
    pub fn uniform(&mut self) -> f64 {
        let bpr_recip: f64 = (2.0f64).powi(-53);
        let value = ((self.uniform_u32() as u64) << 32) | (self.uniform_u32() as u64);
        (value >> 11) as f64 * bpr_recip
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::area;

    #[macro_export]
    macro_rules! assert_approx_eq {
        ( $v0:expr, $v1: expr ) => {{
            assert!(($v0 - $v1).abs() < $crate::EPSILON, "{} != {}", $v0, $v1);
        }};
        ( $v0:expr, $v1: expr, $e: expr ) => {{
            assert!(($v0 - $v1).abs() < $e, "{} != {}", $v0, $v1);
        }};
    }

    #[test]
    fn test_rectangle() {
        let rect = rectangle(30, 20);
        assert_eq!(rect.len(), 4);
        assert_eq!(rect[2], Point64::new(30, 20));
        assert_approx_eq!(area(&rect), 600.0);
    }

    #[test]
    fn test_ellipse() {
        let path = ellipse(Rect64::new(0, 0, 80, 80));
        // PI * sqrt(40) vertices
        assert_eq!(path.len(), 19);
        assert_eq!(path[0], Point64::new(80, 40));
        assert!(path
            .iter()
            .all(|p| (0..=80).contains(&p.x) && (0..=80).contains(&p.y)));
        let area = area(&path);
        assert!(area > 4500.0 && area < 5027.0, "area: {}", area);

        assert!(ellipse(Rect64::new(10, 10, 10, 40)).is_empty());
        assert_eq!(ellipse(Rect64::new(0, 0, 1, 1)).len(), 3);
    }

    #[test]
    fn test_random_shapes() {
        let mut rnd = Rnd::with_seed(7);
        let poly = random_poly(&mut rnd, 800, 600, 50);
        assert_eq!(poly.len(), 50);
        assert!(poly
            .iter()
            .all(|p| (0..800).contains(&p.x) && (0..600).contains(&p.y)));

        let moved = random_offset(&mut rnd, &poly, 100, 1);
        let dx = moved[0].x - poly[0].x;
        assert!((0..100).contains(&dx));
        for (p0, p1) in poly.iter().zip(&moved) {
            assert_eq!(p1.x - p0.x, dx);
            assert_eq!(p1.y, p0.y);
        }

        let mut r0 = Rnd::with_seed(11);
        let mut r1 = Rnd::with_seed(11);
        assert_eq!(
            random_poly(&mut r0, 10, 10, 5),
            random_poly(&mut r1, 10, 10, 5)
        );
        let value = r0.uniform();
        assert!((0.0..=1.0).contains(&value));
        assert_eq!(r1.below(0), 0);
    }
}
