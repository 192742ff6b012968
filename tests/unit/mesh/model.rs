use super::*;

fn square() -> Mesh {
    let perimeter = [
        Point::new(30.0, 30.0),
        Point::new(70.0, 30.0),
        Point::new(70.0, 70.0),
        Point::new(30.0, 70.0),
    ];
    Mesh::from_polygon(&perimeter, &[[3, 0, 1], [3, 1, 2]], 100, 100).unwrap()
}

#[test]
fn from_polygon_computes_bounds_centroid_and_uvs() {
    let mesh = square();
    assert_eq!(mesh.len(), 4);
    assert_eq!(mesh.bounds, Rect::new(30.0, 30.0, 70.0, 70.0));
    assert_eq!(mesh.centroid, Point::new(50.0, 50.0));
    assert_eq!(mesh.uvs[1], Uv { u: 0.7, v: 0.3 });
    assert_eq!(mesh.vertices[2].uv, Some(Uv { u: 0.7, v: 0.7 }));
    assert_eq!(mesh.vertices[3].index, 3);
    assert_eq!(mesh.triangles[1].points[2], Point::new(70.0, 70.0));
    assert!(mesh.is_simulatable());
}

#[test]
fn uvs_are_clamped() {
    let perimeter = [
        Point::new(-1.0, 0.0),
        Point::new(12.0, 0.0),
        Point::new(5.0, 5.0),
    ];
    let mesh = Mesh::from_polygon(&perimeter, &[[0, 1, 2]], 10, 10).unwrap();
    assert_eq!(mesh.uvs[0].u, 0.0);
    assert_eq!(mesh.uvs[1].u, 1.0);
}

#[test]
fn from_polygon_rejects_bad_input() {
    let two = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
    assert!(matches!(
        Mesh::from_polygon(&two, &[], 10, 10),
        Err(MorphError::Extraction(_))
    ));
    let tri = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    ];
    assert!(matches!(
        Mesh::from_polygon(&tri, &[[0, 1, 3]], 10, 10),
        Err(MorphError::Validation(_))
    ));
}

#[test]
fn current_state_tracks_moved_vertices() {
    let mut mesh = square();
    for v in &mut mesh.vertices {
        v.position += Vec2::new(10.0, 0.0);
    }
    assert_eq!(mesh.current_centroid(), Some(Point::new(60.0, 50.0)));
    assert_eq!(mesh.current_bounds(), Rect::new(40.0, 30.0, 80.0, 70.0));
    assert_eq!(mesh.centroid, Point::new(50.0, 50.0));
}

#[test]
fn non_finite_positions_are_not_simulatable() {
    let mut mesh = square();
    mesh.vertices[0].position.x = f64::NAN;
    assert!(!mesh.is_simulatable());
}

#[test]
fn snapshot_flattens_triangles() {
    let mut mesh = square();
    mesh.vertices[1].alpha = 0.5;
    let snap = mesh.snapshot();
    assert_eq!(snap.positions.len(), 4);
    assert_eq!(snap.indices, vec![3, 0, 1, 3, 1, 2]);
    assert_eq!(snap.alphas[1], 0.5);
    let json = snap.to_json().unwrap();
    assert!(json.contains("\"indices\":[3,0,1,3,1,2]"));
}

#[test]
fn inverse_mass_pins_zero_mass() {
    let mut v = Vertex::new(0, Point::ORIGIN);
    assert_eq!(v.inverse_mass(), 1.0);
    v.mass = 0.0;
    assert_eq!(v.inverse_mass(), 0.0);
    v.mass = 4.0;
    assert_eq!(v.inverse_mass(), 0.25);
}
