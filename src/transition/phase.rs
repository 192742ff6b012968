use crate::{config::settings::TransitionConfig, foundation::core::SimTime};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Transition phase. Phases only ever advance `Idle -> Expansion -> Contraction -> Morph -> Idle`.
pub enum Phase {
    /// No transition running.
    #[default]
    Idle,
    /// Explosion impulse has been applied; physics runs freely.
    Expansion,
    /// Physics plus a ramping pull toward the centroid.
    Contraction,
    /// Physics plus per-vertex steering toward the target perimeter.
    Morph,
}

impl Phase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Expansion,
            Self::Expansion => Self::Contraction,
            Self::Contraction => Self::Morph,
            Self::Morph => Self::Idle,
        }
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Expansion => "expansion",
            Self::Contraction => "contraction",
            Self::Morph => "morph",
        }
    }

    /// Configured length of this phase in seconds; `None` for idle.
    pub fn duration(self, cfg: &TransitionConfig) -> Option<f64> {
        match self {
            Self::Idle => None,
            Self::Expansion => Some(cfg.expansion_duration),
            Self::Contraction => Some(cfg.contraction_duration),
            Self::Morph => Some(cfg.morph_duration),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
/// Active phase with its start time.
pub struct TransitionState {
    phase: Phase,
    started_at: SimTime,
}

impl TransitionState {
    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Simulation time the current phase was entered.
    pub fn started_at(&self) -> SimTime {
        self.started_at
    }

    /// Progress through the current phase in `[0, 1]`; always 0 while idle.
    pub fn progress(&self, now: SimTime, cfg: &TransitionConfig) -> f64 {
        match self.phase.duration(cfg) {
            Some(d) if d > 0.0 => (now.since(self.started_at) / d).clamp(0.0, 1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    /// Move to the next phase at `now`; returns the new phase.
    pub fn advance(&mut self, now: SimTime) -> Phase {
        self.phase = self.phase.next();
        self.started_at = now;
        tracing::debug!(phase = %self.phase, t = now.as_secs(), "transition phase entered");
        self.phase
    }

    /// Return to idle immediately.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/phase.rs"]
mod tests;
