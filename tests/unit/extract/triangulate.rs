use super::*;

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn tri_area(poly: &[Point], t: [usize; 3]) -> f64 {
    cross3(poly[t[0]], poly[t[1]], poly[t[2]]) * 0.5
}

fn star(points: usize, outer: f64, inner: f64) -> Vec<Point> {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f64 * std::f64::consts::PI / points as f64;
            Point::new(200.0 + r * a.cos(), 200.0 + r * a.sin())
        })
        .collect()
}

fn assert_covers(poly: &[Point], tri: &Triangulation) {
    assert!(!tri.stalled);
    assert_eq!(tri.triangles.len(), poly.len() - 2);
    let total: f64 = tri.triangles.iter().map(|&t| tri_area(poly, t)).sum();
    assert!((total - signed_area(poly)).abs() < 1e-6 * signed_area(poly).abs().max(1.0));
    let sign = signed_area(poly).signum();
    for &t in &tri.triangles {
        assert!(tri_area(poly, t) * sign > 0.0, "{t:?} is inverted");
    }
}

#[test]
fn fewer_than_three_points_is_empty() {
    let t = triangulate(&pts(&[(0.0, 0.0), (1.0, 0.0)]));
    assert!(t.triangles.is_empty());
    assert!(!t.stalled);
}

#[test]
fn triangle_is_returned_as_is() {
    let poly = pts(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]);
    assert_eq!(triangulate(&poly).triangles, vec![[0, 1, 2]]);
}

#[test]
fn square_in_both_windings() {
    let mut poly = pts(&[(30.0, 30.0), (69.0, 30.0), (69.0, 69.0), (30.0, 69.0)]);
    assert_covers(&poly, &triangulate(&poly));
    poly.reverse();
    assert_covers(&poly, &triangulate(&poly));
}

#[test]
fn concave_polygons_get_n_minus_two() {
    let l_shape = pts(&[
        (0.0, 0.0),
        (6.0, 0.0),
        (6.0, 2.0),
        (2.0, 2.0),
        (2.0, 6.0),
        (0.0, 6.0),
    ]);
    assert_covers(&l_shape, &triangulate(&l_shape));

    let s = star(5, 150.0, 60.0);
    assert_covers(&s, &triangulate(&s));

    let comb = pts(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (8.0, 10.0),
        (8.0, 3.0),
        (6.0, 3.0),
        (6.0, 10.0),
        (4.0, 10.0),
        (4.0, 3.0),
        (2.0, 3.0),
        (2.0, 10.0),
        (0.0, 10.0),
    ]);
    assert_covers(&comb, &triangulate(&comb));
}

#[test]
fn collinear_vertex_is_tolerated() {
    let poly = pts(&[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    assert_covers(&poly, &triangulate(&poly));
}

#[test]
fn degenerate_polygon_stalls_with_partial_result() {
    let flat = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
    let t = triangulate(&flat);
    assert!(t.stalled);
    assert!(t.triangles.is_empty());
}
