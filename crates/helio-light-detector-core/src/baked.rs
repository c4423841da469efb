use glam::Vec3;

use crate::color::{irradiance_level, linear_to_gamma, linear_to_gamma_rgb};
use crate::config::{BakedMode, DetectorConfig, GammaAdjustment};
use crate::ports::BakedLightingProvider;
use crate::Result;

/// Baked lighting at `position` for the configured [`BakedMode`].
pub fn baked_contribution(
    provider: &dyn BakedLightingProvider,
    position: Vec3,
    config: &DetectorConfig,
) -> Result<f32> {
    match config.baked_mode {
        BakedMode::None => Ok(0.0),
        BakedMode::LightProbes => probe_contribution(provider, position, config),
        BakedMode::Lightmap => lightmap_contribution(provider, position, config),
    }
}

/// Light probe level at `position`.
///
/// Probes already encode visibility, so no occlusion ray is cast. Under
/// [`GammaAdjustment::Gamma`] the scaled level is remapped here as well as
/// after aggregation.
pub fn probe_contribution(
    provider: &dyn BakedLightingProvider,
    position: Vec3,
    config: &DetectorConfig,
) -> Result<f32> {
    let irradiance = provider.sample_probe(position)?;
    let level = irradiance_level(irradiance, config.perceived_brightness) * config.baked_contribution;

    Ok(match config.gamma_adjustment {
        GammaAdjustment::Gamma => linear_to_gamma(level),
        GammaAdjustment::None => level,
    })
}

/// Lightmap level of the surface beneath `position`.
///
/// The texel is converted to gamma space per channel before weighting.
/// Missing surfaces, renderers or lightmaps contribute nothing.
pub fn lightmap_contribution(
    provider: &dyn BakedLightingProvider,
    position: Vec3,
    config: &DetectorConfig,
) -> Result<f32> {
    let Some(hit) = provider.find_surface(position, config.down, config.raycast_mask)? else {
        return Ok(0.0);
    };

    let Some(renderer) = hit.renderer else {
        log::debug!("Lightmap sample at {:?}: surface has no renderer", position);
        return Ok(0.0);
    };

    let count = provider.lightmap_count();
    if renderer.lightmap_index < 0 || renderer.lightmap_index as usize >= count {
        log::debug!(
            "Lightmap sample at {:?}: renderer {} has lightmap index {} ({} bound)",
            position,
            renderer.id,
            renderer.lightmap_index,
            count
        );
        return Ok(0.0);
    }

    let texel = provider.sample_lightmap_texel(&renderer, hit.lightmap_uv)?;
    let level = irradiance_level(linear_to_gamma_rgb(texel), config.perceived_brightness);
    Ok(level * config.baked_contribution)
}
