use rayon::prelude::*;

use crate::{
    config::settings::{FragmentDetection, PhysicsConfig},
    foundation::{
        core::{Point, Rect, SimTime, Vec2},
        math::{Rng64, mean_point},
    },
    mesh::model::{Mesh, Vertex},
    physics::{
        piece::{Piece, PieceId, VertexGroup},
        spring::Spring,
    },
};

/// Spring count from which the parallel impulse path is worth its overhead.
const PAR_MIN_SPRINGS: usize = 256;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Counters for one physics tick.
pub struct PhysicsStats {
    /// Springs currently broken.
    pub broken_springs: usize,
    /// Springs that broke during this tick.
    pub new_breaks: usize,
    /// Live pieces after the tick.
    pub pieces: usize,
    /// Pieces split off during this tick.
    pub pieces_created: usize,
    /// Pieces merged back during this tick.
    pub pieces_rejoined: usize,
    /// Pieces that faded out during this tick.
    pub pieces_expired: usize,
}

/// Breakable mass-spring ring over a mesh perimeter.
///
/// State lives in index arenas parallel to `Mesh::vertices`: one [`VertexGroup`] per vertex and
/// one [`Spring`] per ring edge. Pieces hold vertex indices. A tick runs, in order: spring
/// impulses, integration of the main body, break checks, piece update, rejoin.
#[derive(Clone, Debug)]
pub struct SpringMeshPhysics {
    config: PhysicsConfig,
    stiffness: f64,
    springs: Vec<Spring>,
    springs_of: Vec<Vec<usize>>,
    groups: Vec<VertexGroup>,
    pieces: Vec<Piece>,
    next_piece: u32,
    rng: Rng64,
}

impl SpringMeshPhysics {
    /// Create an uninitialized simulation.
    pub fn new(config: PhysicsConfig) -> Self {
        let stiffness = config.effective_stiffness();
        let rng = Rng64::new(config.seed);
        Self {
            config,
            stiffness,
            springs: Vec::new(),
            springs_of: Vec::new(),
            groups: Vec::new(),
            pieces: Vec::new(),
            next_piece: 0,
            rng,
        }
    }

    /// Active settings.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Spring constant after the body preset.
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Build one spring per adjacent perimeter pair, closing the ring.
    ///
    /// Returns `false` (and leaves the simulation empty) for a mesh without a usable perimeter.
    pub fn initialize(&mut self, mesh: &Mesh) -> bool {
        self.reset();
        if !mesh.is_simulatable() {
            tracing::warn!(
                vertices = mesh.len(),
                "physics initialize skipped: mesh has no usable perimeter"
            );
            return false;
        }

        let n = mesh.len();
        self.springs = (0..n)
            .map(|i| Spring::between(mesh, i, (i + 1) % n, self.config.rest_length_factor))
            .collect();
        self.springs_of = vec![Vec::new(); n];
        for (si, s) in self.springs.iter().enumerate() {
            self.springs_of[s.a].push(si);
            if s.b != s.a {
                self.springs_of[s.b].push(si);
            }
        }
        self.groups = vec![VertexGroup::Main; n];
        true
    }

    /// Drop all springs, pieces and fragment timestamps and re-seed the generator.
    pub fn reset(&mut self) {
        self.springs.clear();
        self.springs_of.clear();
        self.groups.clear();
        self.pieces.clear();
        self.next_piece = 0;
        self.rng = Rng64::new(self.config.seed);
    }

    /// `true` after a successful [`SpringMeshPhysics::initialize`].
    pub fn is_initialized(&self) -> bool {
        !self.groups.is_empty()
    }

    /// All springs in ring order.
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Live pieces.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Group membership of vertex `i`.
    pub fn group_of(&self, i: usize) -> Option<VertexGroup> {
        self.groups.get(i).copied()
    }

    /// Number of broken springs.
    pub fn broken_count(&self) -> usize {
        self.springs.iter().filter(|s| !s.is_connected()).count()
    }

    /// Sum of `m |v|^2 / 2` over all vertices.
    pub fn kinetic_energy(mesh: &Mesh) -> f64 {
        mesh.vertices
            .iter()
            .map(|v| 0.5 * v.mass * v.velocity.hypot2())
            .sum()
    }

    /// Centroid of the main body, falling back to all visible vertices when the main group is
    /// empty.
    pub fn main_centroid(&self, mesh: &Mesh) -> Option<Point> {
        let main = mean_point(self.members(mesh, |g| g == VertexGroup::Main));
        main.or_else(|| mean_point(self.members(mesh, |g| g != VertexGroup::Detached)))
    }

    fn members<'a>(
        &'a self,
        mesh: &'a Mesh,
        pred: impl Fn(VertexGroup) -> bool + 'a,
    ) -> impl Iterator<Item = Point> + 'a {
        mesh.vertices
            .iter()
            .zip(&self.groups)
            .filter(move |(_, g)| pred(**g))
            .map(|(v, _)| v.position)
    }

    fn accepts(&self, mesh: &Mesh, op: &str) -> bool {
        if !mesh.is_simulatable() {
            tracing::warn!(op, "physics call ignored: mesh has no usable perimeter");
            return false;
        }
        if self.groups.len() != mesh.len() {
            tracing::warn!(
                op,
                expected = self.groups.len(),
                got = mesh.len(),
                "physics call ignored: mesh does not match initialized perimeter"
            );
            return false;
        }
        true
    }

    /// Advance the simulation by `dt` ticks at simulation time `now`.
    ///
    /// When `boundaries` is given, vertices crossing it are clamped back and their velocity is
    /// reflected with the configured elasticity.
    pub fn update(
        &mut self,
        mesh: &mut Mesh,
        dt: f64,
        now: SimTime,
        boundaries: Option<Rect>,
    ) -> PhysicsStats {
        let mut stats = PhysicsStats::default();
        if !self.accepts(mesh, "update") || !(dt.is_finite() && dt > 0.0) {
            stats.broken_springs = self.broken_count();
            stats.pieces = self.pieces.len();
            return stats;
        }

        self.apply_spring_impulses(mesh, dt);

        for (v, g) in mesh.vertices.iter_mut().zip(&self.groups) {
            if *g == VertexGroup::Main {
                integrate(v, dt, self.config.damping, boundaries, self.config.elasticity);
            }
        }

        if self.config.breaking.enabled {
            stats.new_breaks = self.break_overstretched(mesh, now);
            if stats.new_breaks > 0 && self.should_detect_fragments() {
                stats.pieces_created = self.detect_fragments(now);
            }
        }

        stats.pieces_expired = self.update_pieces(mesh, dt, now, boundaries);

        if self.config.rejoin.enabled {
            stats.pieces_rejoined = self.rejoin_pieces(mesh, now);
        }

        stats.broken_springs = self.broken_count();
        stats.pieces = self.pieces.len();
        stats
    }

    fn apply_spring_impulses(&self, mesh: &mut Mesh, dt: f64) {
        let k = self.stiffness;
        let groups = &self.groups;
        let snapshot: &Mesh = mesh;
        let impulses: Vec<(usize, usize, Vec2)> =
            if self.config.parallel && self.springs.len() >= PAR_MIN_SPRINGS {
                self.springs
                    .par_iter()
                    .filter(|s| is_live(s, groups))
                    .map(|s| (s.a, s.b, s.impulse(snapshot, k, dt)))
                    .collect()
            } else {
                self.springs
                    .iter()
                    .filter(|s| is_live(s, groups))
                    .map(|s| (s.a, s.b, s.impulse(snapshot, k, dt)))
                    .collect()
            };

        // Applied in spring order so both paths produce identical results.
        for (a, b, j) in impulses {
            let inv_a = mesh.vertices[a].inverse_mass();
            let inv_b = mesh.vertices[b].inverse_mass();
            mesh.vertices[a].velocity += j * inv_a;
            mesh.vertices[b].velocity -= j * inv_b;
        }
    }

    /// Roll a break for every connected spring stretched past the tension threshold.
    pub(crate) fn break_overstretched(&mut self, mesh: &Mesh, now: SimTime) -> usize {
        let threshold = self.config.breaking.tension_threshold;
        let p = self.config.breaking.probability;
        let mut broken = 0;
        for s in &mut self.springs {
            if !is_live(s, &self.groups) {
                continue;
            }
            let Some(tension) = s.tension(mesh) else {
                continue;
            };
            if tension > threshold && self.rng.chance(p) {
                s.break_at(now);
                broken += 1;
            }
        }
        broken
    }

    fn should_detect_fragments(&self) -> bool {
        match self.config.breaking.fragment_detection {
            FragmentDetection::EveryBreak => true,
            FragmentDetection::BrokenRatio(ratio) => {
                !self.springs.is_empty()
                    && self.broken_count() as f64 > ratio * self.springs.len() as f64
            }
        }
    }

    /// Flood-fill the main group over connected springs; every component except the largest
    /// becomes a new piece. Returns the number of pieces created.
    pub(crate) fn detect_fragments(&mut self, now: SimTime) -> usize {
        let n = self.groups.len();
        let mut seen = vec![false; n];
        let mut components: Vec<Vec<usize>> = Vec::new();

        for start in 0..n {
            if seen[start] || self.groups[start] != VertexGroup::Main {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(v) = stack.pop() {
                component.push(v);
                for &si in &self.springs_of[v] {
                    let s = &self.springs[si];
                    if !s.is_connected() {
                        continue;
                    }
                    let other = if s.a == v { s.b } else { s.a };
                    if !seen[other] && self.groups[other] == VertexGroup::Main {
                        seen[other] = true;
                        stack.push(other);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        if components.len() < 2 {
            return 0;
        }

        // First largest component stays as the main body.
        let main_idx = components
            .iter()
            .enumerate()
            .fold(0, |best, (i, c)| {
                if c.len() > components[best].len() {
                    i
                } else {
                    best
                }
            });

        let mut created = 0;
        for (i, vertices) in components.into_iter().enumerate() {
            if i == main_idx {
                continue;
            }
            let id = PieceId(self.next_piece);
            self.next_piece += 1;
            for &v in &vertices {
                self.groups[v] = VertexGroup::Piece(id);
            }
            tracing::debug!(piece = id.0, vertices = vertices.len(), "fragment split off");
            self.pieces.push(Piece {
                id,
                vertices,
                created_at: now,
            });
            created += 1;
        }
        created
    }

    fn update_pieces(
        &mut self,
        mesh: &mut Mesh,
        dt: f64,
        now: SimTime,
        boundaries: Option<Rect>,
    ) -> usize {
        if self.pieces.is_empty() {
            return 0;
        }
        let main = mean_point(self.members(mesh, |g| g == VertexGroup::Main));
        let PhysicsConfig {
            damping,
            elasticity,
            ref fade,
            ..
        } = self.config;

        let mut expired = 0;
        let groups = &mut self.groups;
        self.pieces.retain(|piece| {
            for &i in &piece.vertices {
                integrate(&mut mesh.vertices[i], dt, damping, boundaries, elasticity);
            }

            let age = piece.age(now);
            if age >= fade.timeout {
                for &i in &piece.vertices {
                    let v = &mut mesh.vertices[i];
                    v.alpha = 0.0;
                    v.velocity = Vec2::ZERO;
                    groups[i] = VertexGroup::Detached;
                }
                tracing::debug!(piece = piece.id.0, "fragment faded out");
                expired += 1;
                return false;
            }

            let time_factor = 1.0 - age / fade.timeout;
            let dist = match (piece.centroid(mesh), main) {
                (Some(p), Some(m)) => (p - m).hypot(),
                _ => 0.0,
            };
            let distance_factor = if dist > fade.distance {
                fade.distance / dist
            } else {
                1.0
            };
            let alpha = (time_factor * distance_factor).clamp(0.0, 1.0);
            for &i in &piece.vertices {
                mesh.vertices[i].alpha = alpha;
            }
            true
        });
        expired
    }

    fn rejoin_pieces(&mut self, mesh: &mut Mesh, now: SimTime) -> usize {
        let Some(main) = mean_point(self.members(mesh, |g| g == VertexGroup::Main)) else {
            return 0;
        };
        let rejoin = &self.config.rejoin;

        let mut merged = Vec::new();
        self.pieces.retain(|piece| {
            let close = piece
                .centroid(mesh)
                .is_some_and(|c| (c - main).hypot() <= rejoin.distance);
            if close && piece.age(now) >= rejoin.timeout {
                merged.push(piece.vertices.clone());
                false
            } else {
                true
            }
        });

        for vertices in &merged {
            for &i in vertices {
                self.groups[i] = VertexGroup::Main;
                mesh.vertices[i].alpha = 1.0;
            }
            for &i in vertices {
                for &si in &self.springs_of[i] {
                    let (a, b) = (self.springs[si].a, self.springs[si].b);
                    if self.groups[a] == VertexGroup::Main && self.groups[b] == VertexGroup::Main {
                        self.springs[si].reconnect();
                    }
                }
            }
        }
        if !merged.is_empty() {
            tracing::debug!(pieces = merged.len(), "fragments rejoined main body");
        }
        merged.len()
    }

    /// Push every visible vertex away from the main centroid by
    /// `offset * intensity / (distance + 1)`; a vertex sitting on the centroid gets an impulse of
    /// magnitude `intensity` in a random direction.
    pub fn apply_explosion(&mut self, mesh: &mut Mesh, intensity: f64) {
        if !self.accepts(mesh, "explosion") {
            return;
        }
        let Some(center) = self.main_centroid(mesh) else {
            return;
        };
        for (v, g) in mesh.vertices.iter_mut().zip(&self.groups) {
            if *g == VertexGroup::Detached {
                continue;
            }
            let offset = v.position - center;
            let dist = offset.hypot();
            if dist <= f64::EPSILON {
                v.velocity += self.rng.unit_vec2() * intensity;
            } else {
                v.velocity += offset * (intensity / (dist + 1.0));
            }
        }
    }

    /// Pull every visible vertex toward the main centroid by `offset * strength`.
    pub fn apply_contraction(&self, mesh: &mut Mesh, strength: f64) {
        if !self.accepts(mesh, "contraction") {
            return;
        }
        let Some(center) = self.main_centroid(mesh) else {
            return;
        };
        for (v, g) in mesh.vertices.iter_mut().zip(&self.groups) {
            if *g != VertexGroup::Detached {
                v.velocity += (center - v.position) * strength;
            }
        }
    }

    /// Steer vertex `i` toward `target` by adding `(target - position) * rate` to its velocity.
    pub fn steer_toward(&self, mesh: &mut Mesh, i: usize, target: Point, rate: f64) {
        if self.groups.get(i).is_some_and(|g| *g == VertexGroup::Detached) {
            return;
        }
        if let Some(v) = mesh.vertices.get_mut(i) {
            v.velocity += (target - v.position) * rate;
        }
    }
}

/// Connected and not anchored to a faded-out vertex.
fn is_live(s: &Spring, groups: &[VertexGroup]) -> bool {
    s.is_connected()
        && groups[s.a] != VertexGroup::Detached
        && groups[s.b] != VertexGroup::Detached
}

fn integrate(v: &mut Vertex, dt: f64, damping: f64, boundaries: Option<Rect>, elasticity: f64) {
    if v.inverse_mass() == 0.0 {
        v.velocity = Vec2::ZERO;
        return;
    }
    v.velocity *= damping;
    v.position += v.velocity * dt;

    let Some(b) = boundaries else {
        return;
    };
    if v.position.x < b.x0 {
        v.position.x = b.x0;
        v.velocity.x = -v.velocity.x * elasticity;
    } else if v.position.x > b.x1 {
        v.position.x = b.x1;
        v.velocity.x = -v.velocity.x * elasticity;
    }
    if v.position.y < b.y0 {
        v.position.y = b.y0;
        v.velocity.y = -v.velocity.y * elasticity;
    } else if v.position.y > b.y1 {
        v.position.y = b.y1;
        v.velocity.y = -v.velocity.y * elasticity;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/simulation.rs"]
mod tests;
