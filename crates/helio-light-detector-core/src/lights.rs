use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::weighted_intensity;
use crate::config::DetectorConfig;
use crate::ports::OcclusionTester;
use crate::Result;

/// Lower bound for squared range and squared distance in the falloff.
pub const MIN_SQR_DISTANCE: f32 = 0.00001;
/// Lower bound for the inner/outer cosine gap of a spot cone.
pub const MIN_SPOT_ANGLE_RANGE: f32 = 0.001;

/// Per-kind light parameters. Angles are full cone angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Directional,
    Point {
        range: f32,
    },
    Spot {
        range: f32,
        spot_angle: f32,
        inner_spot_angle: f32,
    },
}

/// How a light participates in lightmap baking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightBakeType {
    Realtime,
    Mixed,
    Baked,
}

impl LightBakeType {
    /// Whether the light is evaluated at runtime rather than only baked.
    pub fn is_dynamic(self) -> bool {
        matches!(self, LightBakeType::Realtime | LightBakeType::Mixed)
    }
}

/// A dynamic light as seen by the detector.
///
/// The host owns the light and refreshes it before each evaluation; the
/// detector only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub kind: LightKind,
    pub position: Vec3,
    /// Forward direction (the way the light points)
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub enabled: bool,
    /// Whether the owning scene node is active
    pub active: bool,
    pub cast_shadows: bool,
    pub bake_type: LightBakeType,
}

impl LightSource {
    fn new(kind: LightKind, position: Vec3, direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind,
            position,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Y),
            color,
            intensity: intensity.max(0.0),
            enabled: true,
            active: true,
            cast_shadows: false,
            bake_type: LightBakeType::Realtime,
        }
    }

    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::new(LightKind::Directional, Vec3::ZERO, direction, color, intensity)
    }

    pub fn point(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Self {
        Self::new(LightKind::Point { range }, position, Vec3::NEG_Y, color, intensity)
    }

    /// Spot light; the inner angle is clamped to the outer one.
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        range: f32,
        spot_angle: f32,
        inner_spot_angle: f32,
    ) -> Self {
        let spot_angle = spot_angle.clamp(0.0, 180.0);
        let kind = LightKind::Spot {
            range,
            spot_angle,
            inner_spot_angle: inner_spot_angle.clamp(0.0, spot_angle),
        };
        Self::new(kind, position, direction, color, intensity)
    }

    pub fn with_shadows(mut self, cast_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self
    }

    pub fn with_bake_type(mut self, bake_type: LightBakeType) -> Self {
        self.bake_type = bake_type;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Enabled and owned by an active node.
    pub fn is_live(&self) -> bool {
        self.enabled && self.active
    }

    pub fn range(&self) -> Option<f32> {
        match self.kind {
            LightKind::Directional => None,
            LightKind::Point { range } | LightKind::Spot { range, .. } => Some(range),
        }
    }

    /// Attenuated contribution of this light at `sample`, occlusion included.
    ///
    /// Liveness is not checked here; the sampler skips dead lights.
    pub fn contribution(
        &self,
        sample: Vec3,
        occlusion: &dyn OcclusionTester,
        config: &DetectorConfig,
    ) -> Result<f32> {
        let intensity =
            weighted_intensity(self.intensity, self.color, config.perceived_brightness);

        match self.kind {
            LightKind::Directional => {
                if self.cast_shadows {
                    let towards_light = -self.direction.normalize_or_zero();
                    if occlusion.is_occluded(sample, towards_light, f32::INFINITY, config.raycast_mask)? {
                        return Ok(0.0);
                    }
                }
                Ok(intensity)
            }
            LightKind::Point { range } => {
                let to_sample = sample - self.position;
                let distance = to_sample.length();
                if distance > range {
                    return Ok(0.0);
                }

                if self.shadowed(to_sample, distance, occlusion, config)? {
                    return Ok(0.0);
                }

                let dist_sqr = to_sample.length_squared().max(MIN_SQR_DISTANCE);
                let attenuation = (range_attenuation(dist_sqr, range) / dist_sqr).min(1.0);
                Ok(attenuation * intensity)
            }
            LightKind::Spot { range, spot_angle, inner_spot_angle } => {
                let to_sample = sample - self.position;
                let distance = to_sample.length();
                if distance > range {
                    return Ok(0.0);
                }

                let outer_cos = half_angle_cos(spot_angle);
                let forward_dot = self
                    .direction
                    .normalize_or_zero()
                    .dot(to_sample.normalize_or_zero());
                if forward_dot < outer_cos {
                    return Ok(0.0);
                }

                if self.shadowed(to_sample, distance, occlusion, config)? {
                    return Ok(0.0);
                }

                let dist_sqr = to_sample.length_squared().max(MIN_SQR_DISTANCE);
                let inner_cos = half_angle_cos(inner_spot_angle);
                let cone = spot_attenuation(forward_dot, outer_cos, inner_cos);
                let attenuation = (cone * range_attenuation(dist_sqr, range) / dist_sqr).min(1.0);
                Ok(attenuation * intensity)
            }
        }
    }

    /// Ray from the light towards the sample, bounded by the distance between them.
    fn shadowed(
        &self,
        to_sample: Vec3,
        distance: f32,
        occlusion: &dyn OcclusionTester,
        config: &DetectorConfig,
    ) -> Result<bool> {
        if !self.cast_shadows {
            return Ok(false);
        }
        occlusion.is_occluded(
            self.position,
            to_sample.normalize_or_zero(),
            distance,
            config.raycast_mask,
        )
    }
}

/// Smooth window that reaches 0 at `range` and 1 near the light.
pub fn range_attenuation(dist_sqr: f32, range: f32) -> f32 {
    let inv_sqr_range = 1.0 / (range * range).max(MIN_SQR_DISTANCE);
    let dist_sqr = dist_sqr.max(MIN_SQR_DISTANCE);
    (1.0 - (dist_sqr * inv_sqr_range).sqrt()).clamp(0.0, 1.0).sqrt()
}

/// Angular falloff between the outer and inner cone cosines.
pub fn spot_attenuation(forward_dot: f32, outer_cos: f32, inner_cos: f32) -> f32 {
    let angle_range_inv = 1.0 / (inner_cos - outer_cos).max(MIN_SPOT_ANGLE_RANGE);
    (forward_dot * angle_range_inv - outer_cos * angle_range_inv)
        .clamp(0.0, 1.0)
        .sqrt()
}

fn half_angle_cos(angle_degrees: f32) -> f32 {
    (0.5 * angle_degrees).to_radians().cos()
}
