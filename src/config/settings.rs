use std::path::Path;

use anyhow::Context;

use crate::{
    assets::raster::MAX_PADDING,
    foundation::error::{MorphError, MorphResult},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Complete configuration surface. Every field is optional in JSON and falls back to its default.
pub struct MorphConfig {
    /// Mesh extraction settings.
    pub extract: ExtractConfig,
    /// Spring-mass simulation settings.
    pub physics: PhysicsConfig,
    /// Phase timing and forces.
    pub transition: TransitionConfig,
    /// Frame-rate driven detail reduction.
    pub adaptive: AdaptiveConfig,
}

impl MorphConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(s: &str) -> MorphResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| MorphError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> MorphResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> MorphResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MorphError::serde(e.to_string()))
    }

    /// Check ranges that the simulation relies on.
    pub fn validate(&self) -> MorphResult<()> {
        self.extract.validate()?;
        self.physics.validate()?;
        self.transition.validate()?;
        self.adaptive.validate()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Boundary tracing, simplification and resampling parameters.
pub struct ExtractConfig {
    /// Opacity at or above which a pixel is foreground.
    pub alpha_threshold: u8,
    /// Transparent cells added around the image before tracing, at most 64.
    pub padding: u32,
    /// Douglas–Peucker tolerance in pixels.
    pub simplify_tolerance: f64,
    /// Sampler lower bound.
    pub min_vertex_count: usize,
    /// Sampler upper bound.
    pub max_vertex_count: usize,
    /// Initial detail level in `[0, 1]`.
    pub detail_level: f64,
    /// Treat a trace that hit its iteration cap as an extraction failure.
    pub reject_incomplete_trace: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 128,
            padding: 1,
            simplify_tolerance: 1.5,
            min_vertex_count: 20,
            max_vertex_count: 200,
            detail_level: 1.0,
            reject_incomplete_trace: false,
        }
    }
}

impl ExtractConfig {
    fn validate(&self) -> MorphResult<()> {
        if self.padding > MAX_PADDING {
            return Err(MorphError::validation(format!(
                "extract.padding must be <= {MAX_PADDING}"
            )));
        }
        if !(self.simplify_tolerance.is_finite() && self.simplify_tolerance >= 0.0) {
            return Err(MorphError::validation(
                "extract.simplify_tolerance must be finite and >= 0",
            ));
        }
        if self.min_vertex_count < 3 {
            return Err(MorphError::validation(
                "extract.min_vertex_count must be >= 3",
            ));
        }
        if self.max_vertex_count < self.min_vertex_count {
            return Err(MorphError::validation(
                "extract.max_vertex_count must be >= min_vertex_count",
            ));
        }
        check_unit("extract.detail_level", self.detail_level)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Body stiffness preset.
pub enum BodyType {
    /// Use `stiffness` as configured.
    #[default]
    Soft,
    /// Scale stiffness up by [`BodyType::STIFF_MULTIPLIER`].
    Stiff,
}

impl BodyType {
    /// Stiffness multiplier applied by the stiff preset.
    pub const STIFF_MULTIPLIER: f64 = 3.0;

    /// Effective spring constant for a configured base stiffness.
    pub fn effective_stiffness(self, base: f64) -> f64 {
        match self {
            Self::Soft => base,
            Self::Stiff => base * Self::STIFF_MULTIPLIER,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// When to run connectivity detection after springs break.
pub enum FragmentDetection {
    /// Only once the broken fraction of all springs exceeds the ratio.
    BrokenRatio(f64),
    /// After every tick in which at least one spring broke.
    EveryBreak,
}

impl Default for FragmentDetection {
    fn default() -> Self {
        Self::BrokenRatio(0.3)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Tension-based spring breaking.
pub struct BreakConfig {
    /// Enable breaking.
    pub enabled: bool,
    /// Tension (`length / rest_length`) above which a spring may break.
    pub tension_threshold: f64,
    /// Per-tick probability that an over-tensioned spring breaks.
    pub probability: f64,
    /// Fragment detection policy.
    pub fragment_detection: FragmentDetection,
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tension_threshold: 2.0,
            probability: 0.3,
            fragment_detection: FragmentDetection::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Piece rejoin behavior.
pub struct RejoinConfig {
    /// Enable rejoin.
    pub enabled: bool,
    /// Max distance between a piece centroid and the main centroid for rejoin.
    pub distance: f64,
    /// Minimum piece age in seconds before it may rejoin.
    pub timeout: f64,
}

impl Default for RejoinConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            distance: 30.0,
            timeout: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Fragment fade-out.
pub struct FadeConfig {
    /// Pieces farther than this from the main centroid fade proportionally faster.
    pub distance: f64,
    /// Seconds until a piece is fully transparent and removed.
    pub timeout: f64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            distance: 150.0,
            timeout: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Spring-mass simulation parameters. Velocities are in pixels per tick.
pub struct PhysicsConfig {
    /// Hooke spring constant.
    pub stiffness: f64,
    /// Multiplicative velocity damping per tick, in `(0, 1]`.
    pub damping: f64,
    /// Rest length as a multiple of the initial edge length.
    pub rest_length_factor: f64,
    /// Stiffness preset.
    pub body_type: BodyType,
    /// Velocity retained (and reversed) on boundary collision.
    pub elasticity: f64,
    /// Spring breaking.
    pub breaking: BreakConfig,
    /// Piece rejoin.
    pub rejoin: RejoinConfig,
    /// Piece fade.
    pub fade: FadeConfig,
    /// Seed for break rolls and degenerate explosion directions.
    pub seed: u64,
    /// Compute spring impulses with rayon.
    pub parallel: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            stiffness: 0.1,
            damping: 0.95,
            rest_length_factor: 1.0,
            body_type: BodyType::Soft,
            elasticity: 0.6,
            breaking: BreakConfig::default(),
            rejoin: RejoinConfig::default(),
            fade: FadeConfig::default(),
            seed: 0x5EED,
            parallel: false,
        }
    }
}

impl PhysicsConfig {
    /// Stiffness after the body preset is applied.
    pub fn effective_stiffness(&self) -> f64 {
        self.body_type.effective_stiffness(self.stiffness)
    }

    fn validate(&self) -> MorphResult<()> {
        check_non_negative("physics.stiffness", self.stiffness)?;
        if !(self.damping.is_finite() && self.damping > 0.0 && self.damping <= 1.0) {
            return Err(MorphError::validation("physics.damping must be in (0, 1]"));
        }
        if !(self.rest_length_factor.is_finite() && self.rest_length_factor > 0.0) {
            return Err(MorphError::validation(
                "physics.rest_length_factor must be > 0",
            ));
        }
        check_unit("physics.elasticity", self.elasticity)?;
        if !(self.breaking.tension_threshold.is_finite() && self.breaking.tension_threshold >= 1.0)
        {
            return Err(MorphError::validation(
                "physics.breaking.tension_threshold must be >= 1",
            ));
        }
        check_unit("physics.breaking.probability", self.breaking.probability)?;
        if let FragmentDetection::BrokenRatio(r) = self.breaking.fragment_detection {
            check_unit("physics.breaking.fragment_detection", r)?;
        }
        check_non_negative("physics.rejoin.distance", self.rejoin.distance)?;
        check_non_negative("physics.rejoin.timeout", self.rejoin.timeout)?;
        if !(self.fade.distance.is_finite() && self.fade.distance > 0.0) {
            return Err(MorphError::validation("physics.fade.distance must be > 0"));
        }
        if !(self.fade.timeout.is_finite() && self.fade.timeout > 0.0) {
            return Err(MorphError::validation("physics.fade.timeout must be > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Phase durations (seconds) and transition forces.
pub struct TransitionConfig {
    /// Expansion phase length.
    pub expansion_duration: f64,
    /// Contraction phase length.
    pub contraction_duration: f64,
    /// Morph phase length.
    pub morph_duration: f64,
    /// Explosion impulse applied when expansion starts.
    pub explosion_intensity: f64,
    /// Contraction strength reached at the end of the contraction phase.
    pub contraction_peak: f64,
    /// Fraction of the remaining gap injected as velocity per morph tick.
    pub morph_blend_rate: f64,
    /// Physics ticks per second of simulation time; scales `dt` into tick units.
    pub ticks_per_second: f64,
    /// Bounce vertices off the image canvas during a transition.
    pub confine_to_canvas: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            expansion_duration: 0.8,
            contraction_duration: 0.8,
            morph_duration: 1.0,
            explosion_intensity: 8.0,
            contraction_peak: 0.5,
            morph_blend_rate: 0.1,
            ticks_per_second: 60.0,
            confine_to_canvas: true,
        }
    }
}

impl TransitionConfig {
    /// Sum of all phase durations.
    pub fn total_duration(&self) -> f64 {
        self.expansion_duration + self.contraction_duration + self.morph_duration
    }

    fn validate(&self) -> MorphResult<()> {
        for (name, v) in [
            ("transition.expansion_duration", self.expansion_duration),
            ("transition.contraction_duration", self.contraction_duration),
            ("transition.morph_duration", self.morph_duration),
            ("transition.ticks_per_second", self.ticks_per_second),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(MorphError::validation(format!("{name} must be > 0")));
            }
        }
        check_non_negative("transition.explosion_intensity", self.explosion_intensity)?;
        check_non_negative("transition.contraction_peak", self.contraction_peak)?;
        check_unit("transition.morph_blend_rate", self.morph_blend_rate)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Frame-rate driven detail reduction for future extractions.
pub struct AdaptiveConfig {
    /// Enable detail reduction.
    pub enabled: bool,
    /// Frame rate below which detail is reduced.
    pub target_fps: f64,
    /// Number of frame times averaged.
    pub window: usize,
    /// Multiplier applied to the detail level on each slow tick.
    pub reduction_factor: f64,
    /// Detail floor.
    pub min_detail: f64,
    /// Starting detail.
    pub max_detail: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_fps: 50.0,
            window: 30,
            reduction_factor: 0.9,
            min_detail: 0.2,
            max_detail: 1.0,
        }
    }
}

impl AdaptiveConfig {
    fn validate(&self) -> MorphResult<()> {
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(MorphError::validation("adaptive.target_fps must be > 0"));
        }
        if self.window == 0 {
            return Err(MorphError::validation("adaptive.window must be > 0"));
        }
        if !(self.reduction_factor > 0.0 && self.reduction_factor < 1.0) {
            return Err(MorphError::validation(
                "adaptive.reduction_factor must be in (0, 1)",
            ));
        }
        check_unit("adaptive.min_detail", self.min_detail)?;
        check_unit("adaptive.max_detail", self.max_detail)?;
        if self.min_detail > self.max_detail {
            return Err(MorphError::validation(
                "adaptive.min_detail must be <= max_detail",
            ));
        }
        Ok(())
    }
}

fn check_unit(name: &str, v: f64) -> MorphResult<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(MorphError::validation(format!("{name} must be in [0, 1]")));
    }
    Ok(())
}

fn check_non_negative(name: &str, v: f64) -> MorphResult<()> {
    if !(v.is_finite() && v >= 0.0) {
        return Err(MorphError::validation(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
