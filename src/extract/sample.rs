/// Vertex budget for a detail level `d` in `[0, 1]`:
/// `min + d * (max - min)`, rounded down.
pub fn target_vertex_count(min_count: usize, max_count: usize, detail: f64) -> usize {
    let (lo, hi) = if min_count <= max_count {
        (min_count, max_count)
    } else {
        (max_count, min_count)
    };
    let d = if detail.is_finite() {
        detail.clamp(0.0, 1.0)
    } else {
        1.0
    };
    lo + (d * (hi - lo) as f64).floor() as usize
}

/// Downsample `points` to at most `target` entries by nearest-index striding.
///
/// Never upsamples and never interpolates: every output point is an input point, in the
/// original order.
pub fn sample_to_count<T: Copy>(points: &[T], target: usize) -> Vec<T> {
    let n = points.len();
    if n <= target {
        return points.to_vec();
    }
    (0..target).map(|i| points[i * n / target]).collect()
}

/// [`sample_to_count`] with the budget from [`target_vertex_count`].
pub fn adaptive_sample<T: Copy>(
    points: &[T],
    min_count: usize,
    max_count: usize,
    detail: f64,
) -> Vec<T> {
    sample_to_count(points, target_vertex_count(min_count, max_count, detail))
}

#[cfg(test)]
#[path = "../../tests/unit/extract/sample.rs"]
mod tests;
