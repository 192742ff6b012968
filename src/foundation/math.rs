use crate::foundation::core::{Point, Vec2};

/// Seeded SplitMix64 generator.
///
/// Physics randomness (break rolls, degenerate explosion directions) goes through this so a
/// simulation is reproducible from its seed.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64_01() < p.clamp(0.0, 1.0)
    }

    /// Uniformly distributed unit vector.
    pub fn unit_vec2(&mut self) -> Vec2 {
        let angle = self.next_f64_01() * std::f64::consts::TAU;
        Vec2::new(angle.cos(), angle.sin())
    }
}

/// Twice the signed area of triangle `abc` (positive when counter-clockwise in y-up axes).
pub(crate) fn cross3(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// Signed shoelace area of a closed polygon.
pub(crate) fn signed_area(poly: &[Point]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        acc += a.x * b.y - b.x * a.y;
    }
    acc * 0.5
}

/// Distance from `p` to the infinite line through `a` and `b`
/// (or to `a` when the chord is degenerate).
pub(crate) fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let chord = b - a;
    let len = chord.hypot();
    if len <= f64::EPSILON {
        return (p - a).hypot();
    }
    (chord.cross(p - a) / len).abs()
}

/// Inclusive point-in-triangle test; works for either winding.
pub(crate) fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = cross3(a, b, p);
    let d2 = cross3(b, c, p);
    let d3 = cross3(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Arithmetic mean of `points`, `None` when empty.
pub(crate) fn mean_point<I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = Point>,
{
    let mut sum = Vec2::ZERO;
    let mut n = 0usize;
    for p in points {
        sum += p.to_vec2();
        n += 1;
    }
    (n > 0).then(|| (sum / n as f64).to_point())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
