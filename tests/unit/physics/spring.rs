use super::*;
use crate::foundation::core::Point;

fn pair(dist: f64) -> Mesh {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(dist, 0.0),
        Point::new(0.0, dist),
    ];
    Mesh::from_polygon(&pts, &[[0, 1, 2]], 100, 100).unwrap()
}

#[test]
fn rest_length_uses_factor() {
    let mesh = pair(10.0);
    assert_eq!(Spring::between(&mesh, 0, 1, 1.0).rest_length, 10.0);
    assert_eq!(Spring::between(&mesh, 0, 1, 0.5).rest_length, 5.0);
}

#[test]
fn tension_and_impulse_follow_stretch() {
    let mut mesh = pair(10.0);
    let s = Spring::between(&mesh, 0, 1, 1.0);
    assert_eq!(s.tension(&mesh), Some(1.0));
    assert_eq!(s.impulse(&mesh, 0.5, 1.0), Vec2::ZERO);

    mesh.vertices[1].position = Point::new(30.0, 0.0);
    assert_eq!(s.tension(&mesh), Some(3.0));
    // Stretched: endpoint `a` is pulled toward `b`.
    assert_eq!(s.impulse(&mesh, 0.5, 2.0), Vec2::new(20.0, 0.0));

    mesh.vertices[1].position = Point::new(4.0, 0.0);
    assert_eq!(s.impulse(&mesh, 0.5, 1.0), Vec2::new(-3.0, 0.0));
}

#[test]
fn zero_rest_length_has_no_tension() {
    let mut mesh = pair(10.0);
    mesh.vertices[1].position = Point::ORIGIN;
    let s = Spring::between(&mesh, 0, 1, 1.0);
    assert_eq!(s.tension(&mesh), None);
    assert_eq!(s.impulse(&mesh, 1.0, 1.0), Vec2::ZERO);
}

#[test]
fn break_keeps_first_timestamp() {
    let mesh = pair(10.0);
    let mut s = Spring::between(&mesh, 0, 1, 1.0);
    s.break_at(SimTime::from_secs(1.0));
    s.break_at(SimTime::from_secs(2.0));
    assert_eq!(
        s.state,
        SpringState::Broken {
            since: SimTime::from_secs(1.0)
        }
    );
    s.reconnect();
    assert!(s.is_connected());
    assert!(s.touches(1) && !s.touches(2));
}
