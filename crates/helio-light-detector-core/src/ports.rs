//! Capabilities the host supplies to the detector.
//!
//! The detector never touches scene geometry or textures directly. Hosts
//! implement these traits over their physics and rendering backends; tests
//! implement them over fixed data.

use glam::{Vec2, Vec3};

use crate::config::LayerMask;
use crate::Result;

/// Ray visibility queries against scene geometry.
pub trait OcclusionTester {
    /// Whether anything on `mask` blocks the ray within `max_distance`.
    ///
    /// `max_distance` may be `f32::INFINITY`.
    fn is_occluded(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Result<bool>;
}

/// Renderer attached to a surface, as far as lightmapping is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererHandle {
    pub id: u64,
    /// Index into the host's lightmap set. Negative means not lightmapped.
    pub lightmap_index: i32,
}

/// Surface found beneath a sample point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// `None` when the hit collider has no renderer
    pub renderer: Option<RendererHandle>,
    pub lightmap_uv: Vec2,
}

/// Precomputed lighting lookups.
pub trait BakedLightingProvider {
    /// DC (L0) spherical harmonic term of the interpolated probe at `position`.
    fn sample_probe(&self, position: Vec3) -> Result<Vec3>;

    /// Nearest surface along `direction` from `origin`, if any.
    fn find_surface(&self, origin: Vec3, direction: Vec3, mask: LayerMask) -> Result<Option<SurfaceHit>>;

    /// Number of lightmaps currently bound.
    fn lightmap_count(&self) -> usize;

    /// Linear RGB texel of the renderer's lightmap at `uv`.
    fn sample_lightmap_texel(&self, renderer: &RendererHandle, uv: Vec2) -> Result<Vec3>;
}

/// Provider for scenes with no baked lighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBakedLighting;

impl BakedLightingProvider for NoBakedLighting {
    fn sample_probe(&self, _position: Vec3) -> Result<Vec3> {
        Ok(Vec3::ZERO)
    }

    fn find_surface(&self, _origin: Vec3, _direction: Vec3, _mask: LayerMask) -> Result<Option<SurfaceHit>> {
        Ok(None)
    }

    fn lightmap_count(&self) -> usize {
        0
    }

    fn sample_lightmap_texel(&self, _renderer: &RendererHandle, _uv: Vec2) -> Result<Vec3> {
        Ok(Vec3::ZERO)
    }
}

/// Occlusion tester for scenes with no blocking geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcclusion;

impl OcclusionTester for NoOcclusion {
    fn is_occluded(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32, _mask: LayerMask) -> Result<bool> {
        Ok(false)
    }
}
