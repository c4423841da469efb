use glam::Vec3;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::DetectorConfig;
use crate::lights::LightSource;
use crate::ports::{BakedLightingProvider, OcclusionTester};
use crate::sampler::IlluminationSampler;
use crate::{Error, Result};

/// Read-only view of a detector's latest illumination level.
///
/// Cheap to clone; presentation code can hold one on another thread.
#[derive(Debug, Clone, Default)]
pub struct IlluminationHandle(Arc<RwLock<f32>>);

impl IlluminationHandle {
    pub fn get(&self) -> f32 {
        *self.0.read()
    }

    fn publish(&self, amount: f32) {
        *self.0.write() = amount;
    }
}

/// Per-character light detector.
///
/// The host writes current sample point positions and light state before
/// calling [`LightDetector::update`]; nothing is cached between updates.
pub struct LightDetector {
    pub sample_points: Vec<Vec3>,
    pub lights: Vec<LightSource>,
    pub config: DetectorConfig,
    output: IlluminationHandle,
    fresh: bool,
}

impl LightDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            sample_points: Vec::new(),
            lights: Vec::new(),
            config,
            output: IlluminationHandle::default(),
            fresh: false,
        }
    }

    pub fn with_sample_points(mut self, points: impl IntoIterator<Item = Vec3>) -> Self {
        self.sample_points = points.into_iter().collect();
        self
    }

    pub fn with_lights(mut self, lights: impl IntoIterator<Item = LightSource>) -> Self {
        self.lights = lights.into_iter().collect();
        self
    }

    /// Latest published level. Only meaningful once [`Self::is_fresh`] is true.
    pub fn sampled_light_amount(&self) -> f32 {
        self.output.get()
    }

    pub fn handle(&self) -> IlluminationHandle {
        self.output.clone()
    }

    /// Whether the last evaluation completed.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Per-frame tick. Evaluates while playing, or always with `run_in_editor`.
    ///
    /// Returns whether an evaluation ran.
    pub fn update(
        &mut self,
        is_playing: bool,
        occlusion: &dyn OcclusionTester,
        baked: &dyn BakedLightingProvider,
    ) -> Result<bool> {
        if !is_playing && !self.config.run_in_editor {
            return Ok(false);
        }
        self.update_sampled_light_amount(occlusion, baked)?;
        Ok(true)
    }

    /// Evaluate now and publish the result.
    ///
    /// Invalid configuration publishes 0. Collaborator errors leave the
    /// previous value in place and mark it stale.
    pub fn update_sampled_light_amount(
        &mut self,
        occlusion: &dyn OcclusionTester,
        baked: &dyn BakedLightingProvider,
    ) -> Result<f32> {
        let sampler = IlluminationSampler::new(occlusion, baked);
        match sampler.evaluate(&self.sample_points, &self.lights, &self.config) {
            Ok(amount) => {
                self.output.publish(amount);
                self.fresh = true;
                Ok(amount)
            }
            Err(err @ Error::InvalidConfiguration(_)) => {
                log::warn!("Light detector: {}", err);
                self.output.publish(0.0);
                self.fresh = false;
                Err(err)
            }
            Err(err) => {
                self.fresh = false;
                Err(err)
            }
        }
    }

    /// Replace the light list with every realtime or mixed light in `scene_lights`.
    ///
    /// Disabled and inactive lights are kept; evaluation skips them.
    pub fn collect_realtime_lights<'a>(
        &mut self,
        scene_lights: impl IntoIterator<Item = &'a LightSource>,
    ) -> usize {
        self.lights = collect_realtime_lights(scene_lights);
        log::info!("Light detector collected {} realtime lights", self.lights.len());
        self.lights.len()
    }
}

impl Default for LightDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

/// Lights whose bake type is evaluated at runtime.
pub fn collect_realtime_lights<'a>(
    scene_lights: impl IntoIterator<Item = &'a LightSource>,
) -> Vec<LightSource> {
    scene_lights
        .into_iter()
        .filter(|light| light.bake_type.is_dynamic())
        .cloned()
        .collect()
}
