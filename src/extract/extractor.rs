use std::collections::HashMap;

use crate::{
    assets::raster::{AlphaGrid, RasterImage},
    config::settings::ExtractConfig,
    extract::{
        boundary::trace_boundary, sample::adaptive_sample, simplify::simplify_closed,
        triangulate::triangulate,
    },
    foundation::core::Point,
    mesh::model::Mesh,
};

/// Image to [`Mesh`] pipeline with a keyed cache.
///
/// Pipeline: alpha grid -> boundary trace -> Douglas–Peucker -> adaptive resampling ->
/// ear clipping -> mesh assembly. Changing the detail level affects later extractions only;
/// cached meshes are kept until invalidated.
#[derive(Clone, Debug)]
pub struct MeshExtractor {
    config: ExtractConfig,
    detail_level: f64,
    cache: HashMap<String, Mesh>,
}

impl Default for MeshExtractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl MeshExtractor {
    /// Create an extractor; the initial detail level comes from `config`.
    pub fn new(config: ExtractConfig) -> Self {
        let detail_level = config.detail_level.clamp(0.0, 1.0);
        Self {
            config,
            detail_level,
            cache: HashMap::new(),
        }
    }

    /// Active extraction settings.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Current detail level in `[0, 1]`.
    pub fn detail_level(&self) -> f64 {
        self.detail_level
    }

    /// Set the detail level used by later extractions.
    pub fn set_detail_level(&mut self, detail: f64) {
        if detail.is_finite() {
            self.detail_level = detail.clamp(0.0, 1.0);
        }
    }

    /// Extract a mesh, serving it from the cache when the key was seen before.
    ///
    /// The key is `cache_key` if given, else the image's own key; without either the result is
    /// not cached. Returns `None` when the image has no usable boundary.
    #[tracing::instrument(skip(self, image), fields(width = image.width, height = image.height))]
    pub fn extract(&mut self, image: &RasterImage, cache_key: Option<&str>) -> Option<Mesh> {
        let key = cache_key.or(image.cache_key.as_deref());
        if let Some(mesh) = key.and_then(|k| self.cache.get(k)) {
            tracing::debug!(key, "mesh cache hit");
            return Some(mesh.clone());
        }
        self.extract_and_store(image, key)
    }

    /// Extract ignoring any cached entry, overwriting the slot for the key.
    pub fn extract_fresh(&mut self, image: &RasterImage, cache_key: Option<&str>) -> Option<Mesh> {
        let key = cache_key.or(image.cache_key.as_deref());
        self.extract_and_store(image, key)
    }

    /// Cached mesh for `key`, if any.
    pub fn cached(&self, key: &str) -> Option<&Mesh> {
        self.cache.get(key)
    }

    /// Drop the cached mesh for `key`. Returns whether an entry existed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.cache.remove(key).is_some()
    }

    /// Drop every cached mesh.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of cached meshes.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn extract_and_store(&mut self, image: &RasterImage, key: Option<&str>) -> Option<Mesh> {
        let mesh = self.build(image)?;
        if let Some(k) = key {
            self.cache.insert(k.to_string(), mesh.clone());
        }
        Some(mesh)
    }

    fn build(&self, image: &RasterImage) -> Option<Mesh> {
        let cfg = &self.config;
        let grid = match AlphaGrid::from_image(image, cfg.padding) {
            Ok(grid) => grid,
            Err(err) => {
                tracing::warn!(%err, "extraction skipped");
                return None;
            }
        };
        let trace = trace_boundary(&grid, cfg.alpha_threshold);

        if trace.points.len() < 3 {
            tracing::debug!(points = trace.points.len(), "no meshable boundary");
            return None;
        }
        if !trace.closed && cfg.reject_incomplete_trace {
            tracing::warn!("rejecting mesh from incomplete boundary trace");
            return None;
        }

        let traced: Vec<Point> = trace.points.iter().map(|p| p.to_point()).collect();
        let simplified = simplify_closed(&traced, cfg.simplify_tolerance);
        let perimeter = adaptive_sample(
            &simplified,
            cfg.min_vertex_count,
            cfg.max_vertex_count,
            self.detail_level,
        );
        if perimeter.len() < 3 {
            tracing::debug!(points = perimeter.len(), "boundary collapsed below 3 points");
            return None;
        }

        let triangulation = triangulate(&perimeter);
        match Mesh::from_polygon(
            &perimeter,
            &triangulation.triangles,
            image.width,
            image.height,
        ) {
            Ok(mesh) => {
                tracing::debug!(
                    traced = traced.len(),
                    simplified = simplified.len(),
                    vertices = mesh.len(),
                    triangles = mesh.triangles.len(),
                    "mesh extracted"
                );
                Some(mesh)
            }
            Err(err) => {
                tracing::warn!(%err, "mesh assembly failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/extract/extractor.rs"]
mod tests;
