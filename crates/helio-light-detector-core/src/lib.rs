//! Illumination sampling for stealth and visibility mechanics.
//!
//! A [`LightDetector`] estimates how lit a set of sample points is from
//! dynamic lights ([`LightSource`]) and baked lighting (probes or lightmaps),
//! reducing everything to one scalar. Scene access goes through the
//! [`OcclusionTester`] and [`BakedLightingProvider`] ports so the math runs
//! against any host.

pub mod baked;
pub mod color;
pub mod config;
pub mod detector;
pub mod lights;
pub mod ports;
pub mod sampler;

mod error;

pub use config::{BakedMode, DetectorConfig, EvaluationMode, GammaAdjustment, LayerMask};
pub use detector::{collect_realtime_lights, IlluminationHandle, LightDetector};
pub use error::{Error, Result};
pub use lights::{LightBakeType, LightKind, LightSource};
pub use ports::{
    BakedLightingProvider, NoBakedLighting, NoOcclusion, OcclusionTester, RendererHandle,
    SurfaceHit,
};
pub use sampler::IlluminationSampler;
