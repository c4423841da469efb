use glam::Vec3;

use crate::baked::baked_contribution;
use crate::color::linear_to_gamma;
use crate::config::{DetectorConfig, EvaluationMode, GammaAdjustment};
use crate::lights::LightSource;
use crate::ports::{BakedLightingProvider, OcclusionTester};
use crate::{Error, Result};

/// Reduces light contributions at a set of sample points to one level.
///
/// Holds no state between evaluations: every call recomputes from the
/// positions and lights it is given.
pub struct IlluminationSampler<'a> {
    occlusion: &'a dyn OcclusionTester,
    baked: &'a dyn BakedLightingProvider,
}

impl<'a> IlluminationSampler<'a> {
    pub fn new(occlusion: &'a dyn OcclusionTester, baked: &'a dyn BakedLightingProvider) -> Self {
        Self { occlusion, baked }
    }

    /// Sum of all live light contributions plus baked lighting at one point.
    pub fn sample_point(
        &self,
        position: Vec3,
        lights: &[LightSource],
        config: &DetectorConfig,
    ) -> Result<f32> {
        let mut illumination = 0.0;
        for light in lights.iter().filter(|light| light.is_live()) {
            illumination += light.contribution(position, self.occlusion, config)?;
        }
        illumination += baked_contribution(self.baked, position, config)?;
        Ok(illumination)
    }

    /// Illumination level over all sample points.
    ///
    /// An empty sample set under [`EvaluationMode::Average`] is rejected with
    /// [`Error::InvalidConfiguration`]; under [`EvaluationMode::Max`] it yields 0.
    pub fn evaluate(
        &self,
        sample_points: &[Vec3],
        lights: &[LightSource],
        config: &DetectorConfig,
    ) -> Result<f32> {
        if sample_points.is_empty() && config.evaluation_mode == EvaluationMode::Average {
            return Err(Error::InvalidConfiguration(
                "average evaluation needs at least one sample point".into(),
            ));
        }

        let mut amount: f32 = 0.0;
        for &position in sample_points {
            let illumination = self.sample_point(position, lights, config)?;
            match config.evaluation_mode {
                EvaluationMode::Average => amount += illumination,
                EvaluationMode::Max => amount = amount.max(illumination),
            }
        }

        if config.evaluation_mode == EvaluationMode::Average {
            amount /= sample_points.len() as f32;
        }

        if config.gamma_adjustment == GammaAdjustment::Gamma {
            amount = linear_to_gamma(amount);
        }

        log::debug!(
            "Sampled {} points against {} lights: {:.4}",
            sample_points.len(),
            lights.len(),
            amount
        );
        Ok(amount)
    }
}
