use crate::{
    foundation::{
        core::{Point, SimTime},
        math::mean_point,
    },
    mesh::model::Mesh,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
/// Identifier of a detached fragment.
pub struct PieceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Which group a perimeter vertex currently belongs to.
pub enum VertexGroup {
    /// Part of the main body.
    Main,
    /// Part of a fragment.
    Piece(PieceId),
    /// Fragment faded out; the vertex is frozen and invisible until reset.
    Detached,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Connected component split from the main body. Holds vertex indices, not vertices.
pub struct Piece {
    /// Identifier.
    pub id: PieceId,
    /// Member vertex indices.
    pub vertices: Vec<usize>,
    /// Simulation time the piece split off.
    pub created_at: SimTime,
}

impl Piece {
    /// Seconds since the piece split off.
    pub fn age(&self, now: SimTime) -> f64 {
        now.since(self.created_at)
    }

    /// Mean position of the member vertices.
    pub fn centroid(&self, mesh: &Mesh) -> Option<Point> {
        mean_point(
            self.vertices
                .iter()
                .filter_map(|&i| mesh.vertices.get(i).map(|v| v.position)),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/piece.rs"]
mod tests;
