//! Meshmorph turns raster silhouettes into deformable meshes and animates transitions between them.
//!
//! # Pipeline overview
//!
//! 1. **Extract**: `RasterImage -> Mesh` (boundary trace, Douglas–Peucker, adaptive resampling,
//!    ear clipping) via [`MeshExtractor`], with a keyed mesh cache
//! 2. **Simulate**: a breakable spring ring over the mesh perimeter ([`SpringMeshPhysics`]),
//!    including fragment tracking, fading and rejoining
//! 3. **Orchestrate**: [`TransitionOrchestrator`] runs `expansion -> contraction -> morph` between
//!    two images, one `update(dt)` per rendered frame
//! 4. **Present**: each frame exposes the active [`Mesh`]; [`Mesh::snapshot`] flattens it for a
//!    renderer
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit time**: simulation takes [`SimTime`] and `dt` from the caller; no wall clock reads.
//! - **Seeded randomness**: edge breaking draws from a seeded generator, so a run is reproducible
//!   from its config and its sequence of frame deltas.
//! - **No rendering**: rasterization and presentation of meshes are left to the caller.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod extract;
mod foundation;
mod mesh;
mod physics;
mod transition;

pub use assets::decode::{decode_image, raster_from_dynamic};
pub use assets::raster::{AlphaGrid, MAX_PADDING, RasterImage};
pub use config::settings::{
    AdaptiveConfig, BodyType, BreakConfig, ExtractConfig, FadeConfig, FragmentDetection,
    MorphConfig, PhysicsConfig, RejoinConfig, TransitionConfig,
};
pub use extract::boundary::{BoundaryTrace, trace_boundary};
pub use extract::extractor::MeshExtractor;
pub use extract::sample::{adaptive_sample, sample_to_count, target_vertex_count};
pub use extract::simplify::{simplify, simplify_closed};
pub use extract::triangulate::{Triangulation, triangulate};
pub use foundation::core::{GridPoint, Point, Rect, SimTime, Vec2};
pub use foundation::error::{MorphError, MorphResult};
pub use mesh::model::{Mesh, MeshSnapshot, Triangle, Uv, Vertex};
pub use physics::piece::{Piece, PieceId, VertexGroup};
pub use physics::simulation::{PhysicsStats, SpringMeshPhysics};
pub use physics::spring::{Spring, SpringState};
pub use transition::adaptive::{AdaptiveDetail, FrameRateMonitor};
pub use transition::orchestrator::{TransitionFrame, TransitionOrchestrator};
pub use transition::phase::{Phase, TransitionState};
