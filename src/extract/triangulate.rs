use crate::foundation::{
    core::Point,
    math::{cross3, point_in_triangle, signed_area},
};

const AREA_EPS: f64 = 1e-9;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Ear-clipping output: index triples into the input polygon.
pub struct Triangulation {
    /// Triangles, each wound like the input polygon.
    pub triangles: Vec<[usize; 3]>,
    /// `true` when clipping stopped early because no ear could be found.
    pub stalled: bool,
}

/// Triangulate a simple polygon by ear clipping.
///
/// Either winding is accepted. A polygon with `n` vertices yields `n - 2` triangles unless the
/// input is numerically degenerate, in which case the triangles found so far are returned with
/// `stalled` set.
pub fn triangulate(polygon: &[Point]) -> Triangulation {
    let n = polygon.len();
    let mut out = Triangulation::default();
    if n < 3 {
        return out;
    }

    let orientation = signed_area(polygon).signum();
    let mut remaining: Vec<usize> = (0..n).collect();
    clip_ears(polygon, &mut remaining, orientation, 0, &mut out, 0);

    if out.stalled {
        tracing::warn!(
            vertices = n,
            triangles = out.triangles.len(),
            "triangulation stalled: no ear found, returning partial result"
        );
    }
    out
}

fn clip_ears(
    polygon: &[Point],
    remaining: &mut Vec<usize>,
    orientation: f64,
    cursor: usize,
    out: &mut Triangulation,
    depth: usize,
) {
    let m = remaining.len();
    if m < 3 {
        return;
    }
    if m == 3 {
        out.triangles
            .push([remaining[0], remaining[1], remaining[2]]);
        return;
    }
    // One ear is removed per level.
    if depth > polygon.len() {
        out.stalled = true;
        return;
    }

    let Some(k) = (0..m)
        .map(|offset| (cursor + offset) % m)
        .find(|&k| is_ear(polygon, remaining, k, orientation))
    else {
        out.stalled = true;
        return;
    };

    let prev = remaining[(k + m - 1) % m];
    let next = remaining[(k + 1) % m];
    out.triangles.push([prev, remaining[k], next]);
    remaining.remove(k);

    clip_ears(polygon, remaining, orientation, k % (m - 1), out, depth + 1);
}

fn is_ear(polygon: &[Point], remaining: &[usize], k: usize, orientation: f64) -> bool {
    let m = remaining.len();
    let ia = remaining[(k + m - 1) % m];
    let ib = remaining[k];
    let ic = remaining[(k + 1) % m];
    let (a, b, c) = (polygon[ia], polygon[ib], polygon[ic]);

    if cross3(a, b, c) * orientation <= AREA_EPS {
        return false;
    }

    remaining.iter().all(|&j| {
        if j == ia || j == ib || j == ic {
            return true;
        }
        let p = polygon[j];
        if p == a || p == b || p == c {
            return true;
        }
        !point_in_triangle(p, a, b, c)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/extract/triangulate.rs"]
mod tests;
