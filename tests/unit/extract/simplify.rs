use super::*;

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn square_rim(lo: i32, hi: i32) -> Vec<Point> {
    let mut out = Vec::new();
    for x in lo..=hi {
        out.push((x, lo));
    }
    for y in lo + 1..=hi {
        out.push((hi, y));
    }
    for x in (lo..hi).rev() {
        out.push((x, hi));
    }
    for y in (lo + 1..hi).rev() {
        out.push((lo, y));
    }
    out.into_iter()
        .map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
        .collect()
}

fn wobbly() -> Vec<Point> {
    (0..60)
        .map(|i| {
            let t = f64::from(i) * 0.2;
            Point::new(t * 10.0, (t * 1.7).sin() * 6.0 + (t * 5.3).cos())
        })
        .collect()
}

#[test]
fn short_inputs_are_unchanged() {
    assert!(simplify(&[], 1.0).is_empty());
    let two = pts(&[(0.0, 0.0), (5.0, 5.0)]);
    assert_eq!(simplify(&two, 1.0), two);
    assert_eq!(simplify_closed(&two, 1.0), two);
}

#[test]
fn zero_epsilon_keeps_everything() {
    let p = wobbly();
    assert_eq!(simplify(&p, 0.0), p);
    let rim = square_rim(0, 9);
    assert_eq!(simplify(&rim, 0.0), rim);
    assert_eq!(simplify_closed(&rim, 0.0), rim);
}

#[test]
fn collinear_run_collapses_to_endpoints() {
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.05), (3.0, 0.0), (4.0, 0.0)]);
    assert_eq!(simplify(&p, 0.5), pts(&[(0.0, 0.0), (4.0, 0.0)]));
}

#[test]
fn spike_survives() {
    let p = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 5.0), (3.0, 0.0), (4.0, 0.0)]);
    assert_eq!(
        simplify(&p, 1.0),
        pts(&[(0.0, 0.0), (2.0, 5.0), (4.0, 0.0)])
    );
}

#[test]
fn simplification_is_idempotent() {
    for eps in [0.3, 1.0, 2.5] {
        let once = simplify(&wobbly(), eps);
        assert_eq!(simplify(&once, eps), once);

        let rim = square_rim(3, 20);
        let once = simplify_closed(&rim, eps);
        assert_eq!(simplify_closed(&once, eps), once);
    }
}

#[test]
fn output_is_a_subsequence() {
    let p = wobbly();
    let s = simplify(&p, 1.0);
    let mut it = p.iter();
    for q in &s {
        assert!(it.any(|x| x == q));
    }
    assert_eq!(s.first(), p.first());
    assert_eq!(s.last(), p.last());
}

#[test]
fn closed_square_reduces_to_corners() {
    let rim = square_rim(30, 69);
    assert_eq!(rim.len(), 156);
    assert_eq!(
        simplify_closed(&rim, 1.5),
        pts(&[(30.0, 30.0), (69.0, 30.0), (69.0, 69.0), (30.0, 69.0)])
    );
}

#[test]
fn closed_ring_of_identical_points_is_unchanged() {
    let p = pts(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
    assert_eq!(simplify_closed(&p, 1.0), p);
}
