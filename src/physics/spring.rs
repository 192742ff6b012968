use crate::{
    foundation::core::{SimTime, Vec2},
    mesh::model::Mesh,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Connection state of a spring.
pub enum SpringState {
    /// Transmits force.
    Connected,
    /// Torn; carries the simulation time of the break.
    Broken {
        /// When the spring broke.
        since: SimTime,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Edge of the perimeter ring between two vertex indices.
pub struct Spring {
    /// First endpoint.
    pub a: usize,
    /// Second endpoint.
    pub b: usize,
    /// Length at which the spring exerts no force.
    pub rest_length: f64,
    /// Connection state.
    pub state: SpringState,
}

impl Spring {
    /// Connected spring whose rest length is the current distance times `rest_length_factor`.
    pub fn between(mesh: &Mesh, a: usize, b: usize, rest_length_factor: f64) -> Self {
        let rest_length = (mesh.vertices[b].position - mesh.vertices[a].position).hypot()
            * rest_length_factor;
        Self {
            a,
            b,
            rest_length,
            state: SpringState::Connected,
        }
    }

    /// `true` while the spring transmits force.
    pub fn is_connected(&self) -> bool {
        matches!(self.state, SpringState::Connected)
    }

    /// Vector from endpoint `a` to endpoint `b`.
    pub fn delta(&self, mesh: &Mesh) -> Vec2 {
        mesh.vertices[self.b].position - mesh.vertices[self.a].position
    }

    /// Current length.
    pub fn length(&self, mesh: &Mesh) -> f64 {
        self.delta(mesh).hypot()
    }

    /// `length / rest_length`; `None` for a zero rest length.
    pub fn tension(&self, mesh: &Mesh) -> Option<f64> {
        (self.rest_length > f64::EPSILON).then(|| self.length(mesh) / self.rest_length)
    }

    /// Hooke impulse on endpoint `a` for a step of `dt` ticks (endpoint `b` gets the negation).
    pub fn impulse(&self, mesh: &Mesh, stiffness: f64, dt: f64) -> Vec2 {
        let d = self.delta(mesh);
        let len = d.hypot();
        if len <= f64::EPSILON {
            return Vec2::ZERO;
        }
        d * (stiffness * (len - self.rest_length) * dt / len)
    }

    /// Mark broken at `now`; a no-op when already broken.
    pub fn break_at(&mut self, now: SimTime) {
        if self.is_connected() {
            self.state = SpringState::Broken { since: now };
        }
    }

    /// Restore force transmission.
    pub fn reconnect(&mut self) {
        self.state = SpringState::Connected;
    }

    /// `true` when either endpoint is `v`.
    pub fn touches(&self, v: usize) -> bool {
        self.a == v || self.b == v
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/spring.rs"]
mod tests;
