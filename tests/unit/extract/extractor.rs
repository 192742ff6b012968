use super::*;

fn square_image(size: u32, side: u32) -> RasterImage {
    let lo = (size - side) / 2;
    let mut img = RasterImage::transparent(size, size);
    for y in lo..lo + side {
        for x in lo..lo + side {
            img.put_pixel(x, y, [255, 255, 255, 255]);
        }
    }
    img
}

fn disc_image(size: u32, radius: f64) -> RasterImage {
    let c = f64::from(size) / 2.0;
    let mut img = RasterImage::transparent(size, size);
    for y in 0..size {
        for x in 0..size {
            let dx = f64::from(x) + 0.5 - c;
            let dy = f64::from(y) + 0.5 - c;
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x, y, [10, 20, 30, 255]);
            }
        }
    }
    img
}

#[test]
fn centered_square_becomes_four_corner_mesh() {
    let mut ex = MeshExtractor::default();
    let mesh = ex.extract(&square_image(100, 40), None).unwrap();
    let corners: Vec<Point> = mesh.positions().collect();
    assert_eq!(
        corners,
        vec![
            Point::new(30.0, 30.0),
            Point::new(69.0, 30.0),
            Point::new(69.0, 69.0),
            Point::new(30.0, 69.0),
        ]
    );
    assert_eq!(mesh.triangles.len(), 2);
    assert_eq!(mesh.centroid, Point::new(49.5, 49.5));
    assert_eq!(ex.cache_len(), 0);
}

#[test]
fn transparent_image_yields_none() {
    let mut ex = MeshExtractor::default();
    assert!(ex.extract(&RasterImage::transparent(50, 50), Some("empty")).is_none());
    assert_eq!(ex.cache_len(), 0);
}

#[test]
fn tiny_blob_yields_none() {
    let mut img = RasterImage::transparent(10, 10);
    img.put_pixel(4, 4, [0, 0, 0, 255]);
    img.put_pixel(5, 4, [0, 0, 0, 255]);
    assert!(MeshExtractor::default().extract(&img, None).is_none());
}

#[test]
fn disc_respects_vertex_budget() {
    let img = disc_image(200, 80.0);
    let mut ex = MeshExtractor::new(ExtractConfig {
        simplify_tolerance: 0.0,
        ..ExtractConfig::default()
    });
    let full = ex.extract(&img, None).unwrap();
    assert_eq!(full.len(), 200);
    assert_eq!(full.triangles.len(), full.len() - 2);

    ex.set_detail_level(0.0);
    let coarse = ex.extract(&img, None).unwrap();
    assert_eq!(coarse.len(), 20);
    assert_eq!(coarse.triangles.len(), 18);
    for uv in &coarse.uvs {
        assert!((0.0..=1.0).contains(&uv.u) && (0.0..=1.0).contains(&uv.v));
    }
}

#[test]
fn cache_serves_hits_until_invalidated() {
    let img = disc_image(200, 80.0);
    let mut ex = MeshExtractor::new(ExtractConfig {
        simplify_tolerance: 0.0,
        ..ExtractConfig::default()
    });
    let first = ex.extract(&img, Some("disc")).unwrap();
    assert_eq!(ex.cache_len(), 1);

    ex.set_detail_level(0.0);
    let hit = ex.extract(&img, Some("disc")).unwrap();
    assert_eq!(hit, first);

    let fresh = ex.extract_fresh(&img, Some("disc")).unwrap();
    assert_eq!(fresh.len(), 20);
    assert_eq!(ex.cached("disc").map(Mesh::len), Some(20));

    assert!(ex.invalidate("disc"));
    assert!(!ex.invalidate("disc"));
    assert!(ex.cached("disc").is_none());
}

#[test]
fn image_key_is_used_when_no_explicit_key() {
    let img = square_image(100, 40).with_cache_key("square");
    let mut ex = MeshExtractor::default();
    ex.extract(&img, None).unwrap();
    assert!(ex.cached("square").is_some());
    ex.clear_cache();
    assert_eq!(ex.cache_len(), 0);
}

#[test]
fn detail_level_is_clamped() {
    let mut ex = MeshExtractor::default();
    ex.set_detail_level(3.0);
    assert_eq!(ex.detail_level(), 1.0);
    ex.set_detail_level(f64::NAN);
    assert_eq!(ex.detail_level(), 1.0);
    ex.set_detail_level(-2.0);
    assert_eq!(ex.detail_level(), 0.0);
}

#[test]
fn edge_touching_shape_is_meshed_with_padding() {
    let mut img = RasterImage::transparent(20, 20);
    for y in 0..20 {
        for x in 0..10 {
            img.put_pixel(x, y, [0, 0, 0, 255]);
        }
    }
    let mesh = MeshExtractor::default().extract(&img, None).unwrap();
    assert_eq!(mesh.len(), 4);
    assert_eq!(mesh.bounds, crate::foundation::core::Rect::new(0.0, 0.0, 9.0, 19.0));
}

#[test]
fn zero_threshold_mesh_stays_inside_the_image() {
    let mut ex = MeshExtractor::new(ExtractConfig {
        alpha_threshold: 0,
        ..ExtractConfig::default()
    });
    let mesh = ex.extract(&RasterImage::transparent(10, 10), None).unwrap();
    assert_eq!(mesh.len(), 4);
    assert_eq!(mesh.bounds, crate::foundation::core::Rect::new(0.0, 0.0, 9.0, 9.0));
}

#[test]
fn oversized_padding_yields_none() {
    let mut ex = MeshExtractor::new(ExtractConfig {
        padding: u32::MAX,
        ..ExtractConfig::default()
    });
    assert!(ex.extract(&square_image(20, 10), None).is_none());
}
