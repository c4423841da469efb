//! Minimal CPU collision world answering occlusion and surface queries.

use glam::{Vec2, Vec3, Vec4};

use helio_light_detector_core::{LayerMask, OcclusionTester, RendererHandle};

use crate::bounds::{Aabb, Sphere};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Box(Aabb),
    Sphere(Sphere),
}

impl ColliderShape {
    fn ray_intersect(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        match self {
            ColliderShape::Box(aabb) => aabb.ray_intersect(origin, direction),
            ColliderShape::Sphere(sphere) => sphere.ray_intersect(origin, direction),
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            ColliderShape::Box(aabb) => *aabb,
            ColliderShape::Sphere(sphere) => sphere.bounds(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collider {
    pub shape: ColliderShape,
    pub layers: LayerMask,
    pub renderer: Option<RendererHandle>,
    /// Lightmap UV scale (xy) and offset (zw) into the renderer's lightmap
    pub lightmap_scale_offset: Vec4,
}

impl Collider {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            layers: LayerMask::DEFAULT,
            renderer: None,
            lightmap_scale_offset: Vec4::new(1.0, 1.0, 0.0, 0.0),
        }
    }

    pub fn cuboid(bounds: Aabb) -> Self {
        Self::new(ColliderShape::Box(bounds))
    }

    pub fn ball(center: Vec3, radius: f32) -> Self {
        Self::new(ColliderShape::Sphere(Sphere::new(center, radius)))
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Attach a lightmapped renderer.
    pub fn with_renderer(mut self, renderer: RendererHandle, scale_offset: Vec4) -> Self {
        self.renderer = Some(renderer);
        self.lightmap_scale_offset = scale_offset;
        self
    }

    /// Lightmap coordinates of a point on this collider.
    pub fn lightmap_uv(&self, point: Vec3) -> Vec2 {
        let uv = self.shape.bounds().planar_uv(point);
        let scale = Vec2::new(self.lightmap_scale_offset.x, self.lightmap_scale_offset.y);
        let offset = Vec2::new(self.lightmap_scale_offset.z, self.lightmap_scale_offset.w);
        uv * scale + offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub collider: ColliderId,
    pub distance: f32,
    pub point: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_collider(&mut self, collider: Collider) -> ColliderId {
        self.colliders.push(collider);
        ColliderId(self.colliders.len() - 1)
    }

    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id.0)
    }

    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Nearest hit on `mask` within `max_distance`.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit> {
        let direction = direction.try_normalize()?;

        self.colliders
            .iter()
            .enumerate()
            .filter(|(_, collider)| collider.layers.intersects(mask))
            .filter_map(|(index, collider)| {
                collider
                    .shape
                    .ray_intersect(origin, direction)
                    .filter(|&t| t <= max_distance)
                    .map(|t| RaycastHit {
                        collider: ColliderId(index),
                        distance: t,
                        point: origin + direction * t,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl OcclusionTester for CollisionWorld {
    fn is_occluded(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> helio_light_detector_core::Result<bool> {
        Ok(self.raycast(origin, direction, max_distance, mask).is_some())
    }
}
