//! Reference host for the light detector: a CPU collision world, a light
//! probe volume and a lightmap atlas, combined in [`HostScene`].

pub mod bounds;
pub mod collision;
pub mod light_probe;
pub mod lightmap;
pub mod scene;

mod error;

pub use bounds::{Aabb, Sphere};
pub use collision::{Collider, ColliderId, ColliderShape, CollisionWorld, RaycastHit};
pub use error::{HostError, Result};
pub use light_probe::{LightProbe, LightProbeVolume};
pub use lightmap::{FilterMode, Lightmap, LightmapAtlas};
pub use scene::HostScene;
