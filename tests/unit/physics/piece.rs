use super::*;

fn triangle_mesh() -> Mesh {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(6.0, 0.0),
        Point::new(0.0, 3.0),
    ];
    Mesh::from_polygon(&pts, &[[0, 1, 2]], 10, 10).unwrap()
}

#[test]
fn age_is_measured_from_creation() {
    let piece = Piece {
        id: PieceId(3),
        vertices: vec![0, 1],
        created_at: SimTime::from_secs(1.0),
    };
    assert_eq!(piece.age(SimTime::from_secs(1.75)), 0.75);
    assert_eq!(piece.age(SimTime::from_secs(0.5)), 0.0);
}

#[test]
fn centroid_averages_members_and_skips_missing() {
    let mesh = triangle_mesh();
    let piece = Piece {
        id: PieceId(0),
        vertices: vec![0, 1, 99],
        created_at: SimTime::ZERO,
    };
    assert_eq!(piece.centroid(&mesh), Some(Point::new(3.0, 0.0)));

    let empty = Piece {
        vertices: vec![],
        ..piece
    };
    assert_eq!(empty.centroid(&mesh), None);
}
