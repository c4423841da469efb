use glam::{Vec2, Vec3};

use helio_light_detector_core::{
    BakedLightingProvider, LayerMask, LightSource, OcclusionTester, RendererHandle, SurfaceHit,
};

use crate::collision::CollisionWorld;
use crate::light_probe::LightProbeVolume;
use crate::lightmap::LightmapAtlas;

/// Everything a detector needs from the world: geometry, baked lighting and
/// the lights placed in it.
#[derive(Default)]
pub struct HostScene {
    pub world: CollisionWorld,
    pub probes: Option<LightProbeVolume>,
    pub lightmaps: LightmapAtlas,
    pub lights: Vec<LightSource>,
}

impl HostScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probes(mut self, probes: LightProbeVolume) -> Self {
        self.probes = Some(probes);
        self
    }

    pub fn add_light(&mut self, light: LightSource) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }
}

impl OcclusionTester for HostScene {
    fn is_occluded(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> helio_light_detector_core::Result<bool> {
        self.world.is_occluded(origin, direction, max_distance, mask)
    }
}

impl BakedLightingProvider for HostScene {
    fn sample_probe(&self, position: Vec3) -> helio_light_detector_core::Result<Vec3> {
        Ok(self
            .probes
            .as_ref()
            .map_or(Vec3::ZERO, |volume| volume.sample_dc(position)))
    }

    fn find_surface(
        &self,
        origin: Vec3,
        direction: Vec3,
        mask: LayerMask,
    ) -> helio_light_detector_core::Result<Option<SurfaceHit>> {
        let Some(hit) = self.world.raycast(origin, direction, f32::INFINITY, mask) else {
            return Ok(None);
        };
        Ok(self.world.collider(hit.collider).map(|collider| SurfaceHit {
            renderer: collider.renderer,
            lightmap_uv: collider.lightmap_uv(hit.point),
        }))
    }

    fn lightmap_count(&self) -> usize {
        self.lightmaps.len()
    }

    fn sample_lightmap_texel(
        &self,
        renderer: &RendererHandle,
        uv: Vec2,
    ) -> helio_light_detector_core::Result<Vec3> {
        if renderer.lightmap_index < 0 {
            return Ok(Vec3::ZERO);
        }
        Ok(self.lightmaps.sample(renderer.lightmap_index as usize, uv)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb;
    use crate::collision::Collider;
    use crate::light_probe::LightProbe;
    use crate::lightmap::Lightmap;
    use glam::Vec4;
    use helio_light_detector_core::{BakedMode, DetectorConfig, Error, GammaAdjustment, LightDetector};

    const EPS: f32 = 1e-5;

    fn floor_scene() -> HostScene {
        let mut scene = HostScene::new();
        let index = scene
            .lightmaps
            .push(Lightmap::solid(4, 4, Vec3::new(0.5, 0.5, 0.5)).unwrap());
        scene.world.add_collider(
            Collider::cuboid(Aabb::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0)))
                .with_renderer(
                    RendererHandle { id: 1, lightmap_index: index as i32 },
                    Vec4::new(1.0, 1.0, 0.0, 0.0),
                ),
        );
        scene
    }

    fn linear(mode: BakedMode) -> DetectorConfig {
        DetectorConfig::new()
            .with_perceived_brightness(false)
            .with_gamma_adjustment(GammaAdjustment::None)
            .with_baked_mode(mode)
    }

    #[test]
    fn test_find_surface_reports_renderer_and_uv() {
        let scene = floor_scene();
        let hit = scene
            .find_surface(Vec3::new(0.0, 1.0, 5.0), Vec3::NEG_Y, LayerMask::DEFAULT)
            .unwrap()
            .unwrap();
        assert_eq!(hit.renderer.unwrap().id, 1);
        assert!((hit.lightmap_uv - Vec2::new(0.5, 0.75)).length() < EPS);
    }

    #[test]
    fn test_no_surface_off_the_floor() {
        let scene = floor_scene();
        let hit = scene
            .find_surface(Vec3::new(50.0, 1.0, 0.0), Vec3::NEG_Y, LayerMask::DEFAULT)
            .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_detector_reads_lightmap_under_sample() {
        let scene = floor_scene();
        let mut detector = LightDetector::new(linear(BakedMode::Lightmap))
            .with_sample_points([Vec3::new(0.0, 1.0, 0.0)]);
        let amount = detector.update_sampled_light_amount(&scene, &scene).unwrap();
        let gamma = helio_light_detector_core::color::linear_to_gamma(0.5);
        assert!((amount - 3.0 * gamma).abs() < EPS);
    }

    #[test]
    fn test_unlightmapped_renderer_is_dark() {
        let mut scene = floor_scene();
        if let Some(collider) = scene.world.collider_mut(crate::collision::ColliderId(0)) {
            collider.renderer = Some(RendererHandle { id: 1, lightmap_index: -1 });
        }
        let mut detector = LightDetector::new(linear(BakedMode::Lightmap))
            .with_sample_points([Vec3::new(0.0, 1.0, 0.0)]);
        assert_eq!(detector.update_sampled_light_amount(&scene, &scene).unwrap(), 0.0);
    }

    #[test]
    fn test_missing_lightmap_file_is_baked_lighting_error() {
        let mut scene = HostScene::new();
        let index = scene.lightmaps.push_file("missing/street_lightmap.png");
        scene.world.add_collider(
            Collider::cuboid(Aabb::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0)))
                .with_renderer(
                    RendererHandle { id: 2, lightmap_index: index as i32 },
                    Vec4::new(1.0, 1.0, 0.0, 0.0),
                ),
        );
        let mut detector = LightDetector::new(linear(BakedMode::Lightmap))
            .with_sample_points([Vec3::new(0.0, 1.0, 0.0)]);
        let err = detector.update_sampled_light_amount(&scene, &scene).unwrap_err();
        assert!(matches!(err, Error::BakedLighting(_)), "{:?}", err);
        assert!(!detector.is_fresh());
    }

    #[test]
    fn test_probe_path_uses_volume() {
        let scene = HostScene::new().with_probes(LightProbeVolume::new(vec![LightProbe::ambient(
            Vec3::ZERO,
            Vec3::splat(0.1),
            5.0,
        )]));
        let mut detector = LightDetector::new(linear(BakedMode::LightProbes))
            .with_sample_points([Vec3::new(0.0, 1.0, 0.0)]);
        let amount = detector.update_sampled_light_amount(&scene, &scene).unwrap();
        assert!((amount - 0.3).abs() < EPS);
    }

    #[test]
    fn test_wall_blocks_point_light() {
        let mut scene = HostScene::new();
        scene.world.add_collider(Collider::cuboid(Aabb::from_center_half_extents(
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.1, 2.0, 2.0),
        )));
        scene.add_light(LightSource::point(Vec3::ZERO, Vec3::ONE, 1.0, 10.0).with_shadows(true));

        let mut detector = LightDetector::new(linear(BakedMode::None));
        detector.collect_realtime_lights(&scene.lights);

        detector.sample_points = vec![Vec3::new(1.0, 0.0, 0.0)];
        assert!(detector.update_sampled_light_amount(&scene, &scene).unwrap() > 0.0);
        detector.sample_points = vec![Vec3::new(3.0, 0.0, 0.0)];
        assert_eq!(detector.update_sampled_light_amount(&scene, &scene).unwrap(), 0.0);
    }
}
