use crate::foundation::{core::Point, math::perpendicular_distance};

/// Douglas–Peucker simplification of an open polyline.
///
/// Keeps both endpoints; an interior point survives when it is at least `epsilon` away from
/// the chord of the segment it splits. Inputs shorter than 3 points are returned unchanged.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    mark_kept(points, 0, n - 1, epsilon, &mut keep, 0);

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Douglas–Peucker on a closed ring.
///
/// The ring is split at the point farthest from its first point and both halves are simplified
/// as open polylines, so the seam between the last and first point gets no special treatment.
pub fn simplify_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let anchor = points[0];
    let mut far = 0;
    let mut far_dist = 0.0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let d = (*p - anchor).hypot();
        if d > far_dist {
            far_dist = d;
            far = i;
        }
    }
    if far == 0 {
        return points.to_vec();
    }

    let first_half = simplify(&points[..=far], epsilon);
    let mut second = points[far..].to_vec();
    second.push(anchor);
    let second_half = simplify(&second, epsilon);

    let mut out = first_half;
    out.extend_from_slice(&second_half[1..second_half.len() - 1]);
    out
}

fn mark_kept(
    points: &[Point],
    first: usize,
    last: usize,
    epsilon: f64,
    keep: &mut [bool],
    depth: usize,
) {
    if last <= first + 1 {
        return;
    }
    // Each level splits off at least one point, so this is unreachable for sane input.
    if depth > points.len() {
        tracing::warn!(depth, "simplification recursion limit reached");
        return;
    }

    let (a, b) = (points[first], points[last]);
    let mut max_dist = -1.0;
    let mut split = first + 1;
    for (i, p) in points.iter().enumerate().take(last).skip(first + 1) {
        let d = perpendicular_distance(*p, a, b);
        if d > max_dist {
            max_dist = d;
            split = i;
        }
    }

    if max_dist < epsilon {
        return;
    }

    keep[split] = true;
    mark_kept(points, first, split, epsilon, keep, depth + 1);
    mark_kept(points, split, last, epsilon, keep, depth + 1);
}

#[cfg(test)]
#[path = "../../tests/unit/extract/simplify.rs"]
mod tests;
