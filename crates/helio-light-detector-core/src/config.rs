use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::Result;

bitflags! {
    /// Collision layers an occlusion ray is tested against.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerMask: u32 {
        const DEFAULT = 1 << 0;
        const TRANSPARENT = 1 << 1;
        const IGNORE_RAYCAST = 1 << 2;
        const STATIC = 1 << 3;
        const DYNAMIC = 1 << 4;
        const CHARACTER = 1 << 5;
        const _ = !0;
    }
}

impl LayerMask {
    /// Mask containing only the given layer index (0..32).
    pub fn layer(index: u32) -> Self {
        Self::from_bits_retain(1u32.checked_shl(index).unwrap_or(0))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::DEFAULT
    }
}

impl Serialize for LayerMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for LayerMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(LayerMask::from_bits_retain)
    }
}

/// How per-sample-point sums are reduced to one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// Mean over all sample points
    Average,
    /// Brightest sample point wins
    Max,
}

impl Default for EvaluationMode {
    fn default() -> Self {
        EvaluationMode::Average
    }
}

/// Remap applied to the sampled level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GammaAdjustment {
    None,
    /// Linear to gamma (sRGB) transfer on the scalar
    Gamma,
}

impl Default for GammaAdjustment {
    fn default() -> Self {
        GammaAdjustment::Gamma
    }
}

/// Source of precomputed lighting, mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BakedMode {
    None,
    /// Interpolated light probe volume at the sample point
    LightProbes,
    /// Lightmap texel on the surface beneath the sample point
    Lightmap,
}

impl Default for BakedMode {
    fn default() -> Self {
        BakedMode::LightProbes
    }
}

/// Detector settings, read-only for the duration of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub raycast_mask: LayerMask,
    /// Weight light color by luma instead of using raw intensity
    pub perceived_brightness: bool,
    pub evaluation_mode: EvaluationMode,
    pub gamma_adjustment: GammaAdjustment,
    pub baked_mode: BakedMode,
    /// Scale applied to baked lighting only, 0.0-1.0
    pub baked_contribution: f32,
    /// Direction of the ray used to find the lightmapped surface under a sample point
    pub down: Vec3,
    pub run_in_editor: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            raycast_mask: LayerMask::DEFAULT,
            perceived_brightness: true,
            evaluation_mode: EvaluationMode::Average,
            gamma_adjustment: GammaAdjustment::Gamma,
            baked_mode: BakedMode::LightProbes,
            baked_contribution: 1.0,
            down: Vec3::NEG_Y,
            run_in_editor: false,
        }
    }
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raycast_mask(mut self, mask: LayerMask) -> Self {
        self.raycast_mask = mask;
        self
    }

    pub fn with_perceived_brightness(mut self, enabled: bool) -> Self {
        self.perceived_brightness = enabled;
        self
    }

    pub fn with_evaluation_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = mode;
        self
    }

    pub fn with_gamma_adjustment(mut self, adjustment: GammaAdjustment) -> Self {
        self.gamma_adjustment = adjustment;
        self
    }

    pub fn with_baked_mode(mut self, mode: BakedMode) -> Self {
        self.baked_mode = mode;
        self
    }

    /// Set the baked lighting contribution (0.0-1.0)
    pub fn with_baked_contribution(mut self, contribution: f32) -> Self {
        self.baked_contribution = contribution.clamp(0.0, 1.0);
        self
    }

    /// Set the lightmap probe direction. Zero vectors fall back to -Y.
    pub fn with_down(mut self, down: Vec3) -> Self {
        self.down = down.try_normalize().unwrap_or(Vec3::NEG_Y);
        self
    }

    pub fn with_run_in_editor(mut self, enabled: bool) -> Self {
        self.run_in_editor = enabled;
        self
    }

    /// Apply the builder invariants to values that bypassed the builders.
    fn sanitized(self) -> Self {
        let down = self.down;
        let contribution = self.baked_contribution;
        self.with_baked_contribution(if contribution.is_nan() { 1.0 } else { contribution })
            .with_down(down)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        Ok(config.sanitized())
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
