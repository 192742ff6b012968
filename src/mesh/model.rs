use crate::foundation::{
    core::{Point, Rect, Vec2},
    error::{MorphError, MorphResult},
    math::mean_point,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Texture coordinate in `[0, 1]`.
pub struct Uv {
    /// Horizontal coordinate.
    pub u: f64,
    /// Vertical coordinate.
    pub v: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Perimeter vertex with simulation state.
pub struct Vertex {
    /// Position in image space.
    pub position: Point,
    /// Velocity in pixels per tick.
    pub velocity: Vec2,
    /// Mass; zero pins the vertex.
    pub mass: f64,
    /// Opacity in `[0, 1]`, lowered while the vertex belongs to a fading piece.
    pub alpha: f64,
    /// Position in the perimeter sequence.
    pub index: usize,
    /// Texture coordinate, if assigned.
    pub uv: Option<Uv>,
}

impl Vertex {
    /// Resting vertex with unit mass and full opacity.
    pub fn new(index: usize, position: Point) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass: 1.0,
            alpha: 1.0,
            index,
            uv: None,
        }
    }

    /// `1 / mass`, or zero for pinned vertices.
    pub fn inverse_mass(&self) -> f64 {
        if self.mass > 0.0 && self.mass.is_finite() {
            1.0 / self.mass
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Triangle of the extraction-time triangulation.
pub struct Triangle {
    /// Perimeter indices.
    pub indices: [usize; 3],
    /// Corner positions captured at extraction time.
    pub points: [Point; 3],
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Silhouette mesh: perimeter ring plus interior triangulation.
pub struct Mesh {
    /// Perimeter vertices in winding order.
    pub vertices: Vec<Vertex>,
    /// Interior triangles.
    pub triangles: Vec<Triangle>,
    /// Texture coordinates, parallel to `vertices`.
    pub uvs: Vec<Uv>,
    /// Axis-aligned bounds of the perimeter at extraction time.
    pub bounds: Rect,
    /// Mean of the perimeter at extraction time.
    pub centroid: Point,
}

impl Mesh {
    /// Assemble a mesh from a perimeter polygon and triangle index triples.
    ///
    /// UVs are the perimeter coordinates normalized by `width` x `height`, clamped to `[0, 1]`.
    pub fn from_polygon(
        perimeter: &[Point],
        triangles: &[[usize; 3]],
        width: u32,
        height: u32,
    ) -> MorphResult<Self> {
        if perimeter.len() < 3 {
            return Err(MorphError::extraction(format!(
                "mesh needs at least 3 perimeter points, got {}",
                perimeter.len()
            )));
        }
        if let Some(bad) = triangles
            .iter()
            .find(|t| t.iter().any(|&i| i >= perimeter.len()))
        {
            return Err(MorphError::validation(format!(
                "triangle {bad:?} references a missing vertex"
            )));
        }

        let w = f64::from(width.max(1));
        let h = f64::from(height.max(1));
        let uvs: Vec<Uv> = perimeter
            .iter()
            .map(|p| Uv {
                u: (p.x / w).clamp(0.0, 1.0),
                v: (p.y / h).clamp(0.0, 1.0),
            })
            .collect();

        let vertices = perimeter
            .iter()
            .zip(&uvs)
            .enumerate()
            .map(|(i, (p, uv))| Vertex {
                uv: Some(*uv),
                ..Vertex::new(i, *p)
            })
            .collect();

        let triangles = triangles
            .iter()
            .map(|&indices| Triangle {
                indices,
                points: indices.map(|i| perimeter[i]),
            })
            .collect();

        Ok(Self {
            vertices,
            triangles,
            uvs,
            bounds: bounds_of(perimeter.iter().copied()),
            centroid: mean_point(perimeter.iter().copied()).unwrap_or(Point::ORIGIN),
        })
    }

    /// Number of perimeter vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// `true` when the perimeter is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// A mesh the physics layer can operate on: a non-empty perimeter, finite positions and
    /// a finite centroid.
    pub fn is_simulatable(&self) -> bool {
        !self.vertices.is_empty()
            && self.centroid.is_finite()
            && self.vertices.iter().all(|v| v.position.is_finite())
    }

    /// Current perimeter positions.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Mean of the current perimeter positions.
    pub fn current_centroid(&self) -> Option<Point> {
        mean_point(self.positions())
    }

    /// Bounds of the current perimeter positions.
    pub fn current_bounds(&self) -> Rect {
        bounds_of(self.positions())
    }

    /// Flattened render data for the current state.
    pub fn snapshot(&self) -> MeshSnapshot {
        MeshSnapshot {
            positions: self
                .vertices
                .iter()
                .map(|v| [v.position.x as f32, v.position.y as f32])
                .collect(),
            uvs: self.uvs.iter().map(|uv| [uv.u as f32, uv.v as f32]).collect(),
            alphas: self.vertices.iter().map(|v| v.alpha as f32).collect(),
            indices: self
                .triangles
                .iter()
                .flat_map(|t| t.indices.map(|i| i as u32))
                .collect(),
        }
    }
}

fn bounds_of(points: impl Iterator<Item = Point>) -> Rect {
    points
        .map(|p| Rect::from_points(p, p))
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Renderer-facing copy of a mesh: parallel vertex arrays plus a flat triangle index list.
pub struct MeshSnapshot {
    /// Vertex positions.
    pub positions: Vec<[f32; 2]>,
    /// Texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Per-vertex opacity.
    pub alphas: Vec<f32>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

impl MeshSnapshot {
    /// Serialize as compact JSON.
    pub fn to_json(&self) -> MorphResult<String> {
        serde_json::to_string(self).map_err(|e| MorphError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/model.rs"]
mod tests;
