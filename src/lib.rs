//! Helio Light Detector - how lit is this character?
//!
//! Samples dynamic lights and baked lighting at a handful of points and
//! reduces them to one illumination level, for stealth and visibility
//! mechanics.

pub use helio_light_detector_core as detector;
pub use helio_light_detector_host as host;

pub mod prelude {
    pub use crate::detector::{
        BakedLightingProvider, BakedMode, DetectorConfig, EvaluationMode, GammaAdjustment,
        IlluminationHandle, IlluminationSampler, LayerMask, LightBakeType, LightDetector,
        LightKind, LightSource, OcclusionTester,
    };
    pub use crate::host::{
        Aabb, Collider, CollisionWorld, HostScene, LightProbe, LightProbeVolume, Lightmap,
        LightmapAtlas,
    };
    pub use glam;
}
