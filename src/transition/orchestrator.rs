use std::sync::Arc;

use crate::{
    assets::raster::RasterImage,
    config::settings::MorphConfig,
    extract::extractor::MeshExtractor,
    foundation::{
        core::{Rect, SimTime},
        error::{MorphError, MorphResult},
    },
    mesh::model::Mesh,
    physics::simulation::{PhysicsStats, SpringMeshPhysics},
    transition::{
        adaptive::AdaptiveDetail,
        phase::{Phase, TransitionState},
    },
};

/// Upper bound on physics ticks simulated by one `update`; longer frames are truncated.
const MAX_TICKS_PER_UPDATE: f64 = 4.0;

#[derive(Clone, Copy, Debug)]
/// What a renderer needs after one [`TransitionOrchestrator::update`].
pub struct TransitionFrame<'a> {
    /// Mesh to draw, if any image has been shown yet.
    pub mesh: Option<&'a Mesh>,
    /// Image the mesh is textured with.
    pub image: Option<&'a Arc<RasterImage>>,
    /// Phase that ran during this tick.
    pub phase: Phase,
    /// Progress through `phase` in `[0, 1]`.
    pub progress: f64,
    /// Set on exactly one tick per transition: the one on which the morph finished.
    pub complete: bool,
    /// Physics counters accumulated over the tick.
    pub stats: PhysicsStats,
}

/// Frame-driven state machine running `idle -> expansion -> contraction -> morph -> idle`.
///
/// The orchestrator owns the active mesh and the physics state. Call
/// [`update`](Self::update) once per rendered frame with the elapsed seconds.
#[derive(Debug)]
pub struct TransitionOrchestrator {
    config: MorphConfig,
    extractor: MeshExtractor,
    physics: SpringMeshPhysics,
    detail: AdaptiveDetail,
    state: TransitionState,
    clock: SimTime,
    boundaries: Option<Rect>,
    active_mesh: Option<Mesh>,
    current_image: Option<Arc<RasterImage>>,
    target_mesh: Option<Mesh>,
    target_image: Option<Arc<RasterImage>>,
}

impl Default for TransitionOrchestrator {
    fn default() -> Self {
        Self::build(MorphConfig::default())
    }
}

impl TransitionOrchestrator {
    /// Create an orchestrator after validating `config`.
    pub fn new(config: MorphConfig) -> MorphResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MorphConfig) -> Self {
        let extractor = MeshExtractor::new(config.extract.clone());
        let detail =
            AdaptiveDetail::new(config.adaptive.clone()).starting_at(extractor.detail_level());
        Self {
            physics: SpringMeshPhysics::new(config.physics.clone()),
            extractor,
            detail,
            state: TransitionState::default(),
            clock: SimTime::ZERO,
            boundaries: None,
            active_mesh: None,
            current_image: None,
            target_mesh: None,
            target_image: None,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Progress through the current phase.
    pub fn progress(&self) -> f64 {
        self.state.progress(self.clock, &self.config.transition)
    }

    /// Simulation clock.
    pub fn clock(&self) -> SimTime {
        self.clock
    }

    /// Mesh currently presented.
    pub fn current_mesh(&self) -> Option<&Mesh> {
        self.active_mesh.as_ref()
    }

    /// Image currently presented.
    pub fn current_image(&self) -> Option<&Arc<RasterImage>> {
        self.current_image.as_ref()
    }

    /// Image the running transition is heading to.
    pub fn target_image(&self) -> Option<&Arc<RasterImage>> {
        self.target_image.as_ref()
    }

    /// Detail level used for the next extraction.
    pub fn detail_level(&self) -> f64 {
        self.extractor.detail_level()
    }

    /// Mesh extractor and its cache.
    pub fn extractor(&self) -> &MeshExtractor {
        &self.extractor
    }

    /// Physics state of the running transition.
    pub fn physics(&self) -> &SpringMeshPhysics {
        &self.physics
    }

    /// Present `image` without a transition. Only allowed while idle.
    pub fn show(&mut self, image: Arc<RasterImage>) -> MorphResult<()> {
        self.ensure_idle("show an image")?;
        let mesh = self
            .extractor
            .extract(&image, None)
            .ok_or_else(|| MorphError::extraction("image has no extractable silhouette"))?;
        self.active_mesh = Some(mesh);
        self.current_image = Some(image);
        Ok(())
    }

    /// Extract both meshes, arm the physics on the source and enter expansion.
    ///
    /// Fails without changing state when a transition is already running or either image has
    /// no usable silhouette.
    #[tracing::instrument(skip_all, fields(
        source = ?source.cache_key,
        target = ?target.cache_key,
        detail = self.extractor.detail_level(),
    ))]
    pub fn start_transition(
        &mut self,
        source: Arc<RasterImage>,
        target: Arc<RasterImage>,
    ) -> MorphResult<()> {
        self.ensure_idle("start a transition")?;

        let Some(mut source_mesh) = self.extractor.extract(&source, None) else {
            tracing::warn!("transition not started: source has no extractable silhouette");
            return Err(MorphError::extraction(
                "source image has no extractable silhouette",
            ));
        };
        let Some(target_mesh) = self.extractor.extract(&target, None) else {
            tracing::warn!("transition not started: target has no extractable silhouette");
            return Err(MorphError::extraction(
                "target image has no extractable silhouette",
            ));
        };
        if !self.physics.initialize(&source_mesh) {
            return Err(MorphError::extraction("source mesh cannot be simulated"));
        }

        self.boundaries = self.config.transition.confine_to_canvas.then(|| {
            Rect::new(
                0.0,
                0.0,
                f64::from(source.width.max(target.width)),
                f64::from(source.height.max(target.height)),
            )
        });
        self.physics
            .apply_explosion(&mut source_mesh, self.config.transition.explosion_intensity);

        self.active_mesh = Some(source_mesh);
        self.current_image = Some(source);
        self.target_mesh = Some(target_mesh);
        self.target_image = Some(target);
        self.state.advance(self.clock);
        Ok(())
    }

    /// Advance the clock by `dt_secs` and run one frame of the current phase.
    ///
    /// Non-positive or non-finite deltas leave the clock where it is.
    pub fn update(&mut self, dt_secs: f64) -> TransitionFrame<'_> {
        let dt = if dt_secs.is_finite() && dt_secs > 0.0 {
            dt_secs
        } else {
            0.0
        };
        if dt > 0.0
            && let Some(level) = self.detail.observe(dt)
        {
            self.extractor.set_detail_level(level);
        }
        self.clock = self.clock.advance(dt);

        let phase = self.state.phase();
        let mut progress = 0.0;
        let mut stats = PhysicsStats::default();
        let mut complete = false;
        if phase != Phase::Idle {
            progress = self.state.progress(self.clock, &self.config.transition);
            stats = self.step(phase, progress, dt);
            if progress >= 1.0 {
                complete = self.finish_phase(phase);
            }
        }

        TransitionFrame {
            mesh: self.active_mesh.as_ref(),
            image: self.current_image.as_ref(),
            phase,
            progress,
            complete,
            stats,
        }
    }

    /// Abort any transition: back to idle, physics cleared, mesh cache emptied.
    ///
    /// The current image is kept; the in-flight mesh is dropped.
    pub fn reset(&mut self) {
        if self.state.phase() != Phase::Idle {
            tracing::debug!(phase = %self.state.phase(), "transition aborted");
            self.active_mesh = None;
        }
        self.state.reset();
        self.physics.reset();
        self.extractor.clear_cache();
        self.target_mesh = None;
        self.target_image = None;
        self.boundaries = None;
    }

    fn ensure_idle(&self, what: &str) -> MorphResult<()> {
        match self.state.phase() {
            Phase::Idle => Ok(()),
            phase => Err(MorphError::transition(format!(
                "cannot {what} during the {phase} phase"
            ))),
        }
    }

    fn step(&mut self, phase: Phase, progress: f64, dt_secs: f64) -> PhysicsStats {
        let Some(mesh) = self.active_mesh.as_mut() else {
            return PhysicsStats::default();
        };
        let cfg = &self.config.transition;
        let ticks = (dt_secs * cfg.ticks_per_second).min(MAX_TICKS_PER_UPDATE);
        // Keep each integration step at or below one tick.
        let substeps = (ticks - 1e-9).ceil().max(1.0);
        let h = ticks / substeps;

        let mut stats = PhysicsStats::default();
        for _ in 0..substeps as usize {
            match phase {
                Phase::Contraction => {
                    self.physics
                        .apply_contraction(mesh, cfg.contraction_peak * progress * h);
                }
                Phase::Morph => {
                    if let Some(target) =
                        self.target_mesh.as_ref().filter(|t| !t.is_empty())
                    {
                        let rate = (cfg.morph_blend_rate * h).min(1.0);
                        let (n, m) = (mesh.len(), target.len());
                        for i in 0..n {
                            let j = i * m / n;
                            self.physics
                                .steer_toward(mesh, i, target.vertices[j].position, rate);
                        }
                    }
                }
                Phase::Idle | Phase::Expansion => {}
            }
            let tick = self.physics.update(mesh, h, self.clock, self.boundaries);
            stats.new_breaks += tick.new_breaks;
            stats.pieces_created += tick.pieces_created;
            stats.pieces_rejoined += tick.pieces_rejoined;
            stats.pieces_expired += tick.pieces_expired;
            stats.broken_springs = tick.broken_springs;
            stats.pieces = tick.pieces;
        }
        stats
    }

    fn finish_phase(&mut self, phase: Phase) -> bool {
        if phase != Phase::Morph {
            self.state.advance(self.clock);
            return false;
        }
        if let Some(mesh) = self.target_mesh.take() {
            self.active_mesh = Some(mesh);
        }
        if let Some(image) = self.target_image.take() {
            self.current_image = Some(image);
        }
        self.physics.reset();
        self.boundaries = None;
        self.state.advance(self.clock);
        tracing::info!(t = self.clock.as_secs(), "transition complete");
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/orchestrator.rs"]
mod tests;
