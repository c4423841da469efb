use glam::{Vec2, Vec3};
use helio_light_detector_core::color::linear_to_gamma;
use helio_light_detector_core::{
    BakedLightingProvider, BakedMode, DetectorConfig, EvaluationMode, GammaAdjustment, LayerMask,
    LightDetector, LightSource, OcclusionTester, RendererHandle, Result, SurfaceHit,
};

const EPS: f32 = 1e-5;

/// Infinite wall on the plane x = `x`, on the `layers` layers.
struct Wall {
    x: f32,
    layers: LayerMask,
}

impl OcclusionTester for Wall {
    fn is_occluded(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Result<bool> {
        if !mask.intersects(self.layers) || direction.x.abs() < 1e-6 {
            return Ok(false);
        }
        let t = (self.x - origin.x) / direction.x;
        Ok(t > 0.0 && t < max_distance)
    }
}

/// Probe irradiance grows with height; a lightmapped floor sits at y = 0.
struct Baked;

impl BakedLightingProvider for Baked {
    fn sample_probe(&self, position: Vec3) -> Result<Vec3> {
        Ok(Vec3::splat(0.1 * position.y.max(0.0)))
    }

    fn find_surface(&self, origin: Vec3, direction: Vec3, _mask: LayerMask) -> Result<Option<SurfaceHit>> {
        if origin.y <= 0.0 || direction.y >= 0.0 {
            return Ok(None);
        }
        Ok(Some(SurfaceHit {
            renderer: Some(RendererHandle { id: 1, lightmap_index: 0 }),
            lightmap_uv: Vec2::new(origin.x, origin.z),
        }))
    }

    fn lightmap_count(&self) -> usize {
        1
    }

    fn sample_lightmap_texel(&self, _renderer: &RendererHandle, uv: Vec2) -> Result<Vec3> {
        Ok(if uv.x < 0.0 { Vec3::ZERO } else { Vec3::splat(0.5) })
    }
}

fn linear() -> DetectorConfig {
    DetectorConfig::new()
        .with_perceived_brightness(false)
        .with_gamma_adjustment(GammaAdjustment::None)
        .with_baked_mode(BakedMode::None)
}

#[test]
fn test_wall_shadows_only_the_far_side() {
    let wall = Wall { x: 2.0, layers: LayerMask::DEFAULT };
    let light = LightSource::point(Vec3::ZERO, Vec3::ONE, 1.0, 10.0).with_shadows(true);
    let mut detector = LightDetector::new(linear()).with_lights([light]);

    detector.sample_points = vec![Vec3::new(1.0, 0.0, 0.0)];
    let near = detector.update_sampled_light_amount(&wall, &Baked).unwrap();
    detector.sample_points = vec![Vec3::new(3.0, 0.0, 0.0)];
    let far = detector.update_sampled_light_amount(&wall, &Baked).unwrap();

    assert!(near > 0.0);
    assert_eq!(far, 0.0);
}

#[test]
fn test_raycast_mask_filters_occluders() {
    let wall = Wall { x: 2.0, layers: LayerMask::IGNORE_RAYCAST };
    let light = LightSource::point(Vec3::ZERO, Vec3::ONE, 1.0, 10.0).with_shadows(true);
    let mut detector = LightDetector::new(linear())
        .with_lights([light])
        .with_sample_points([Vec3::new(3.0, 0.0, 0.0)]);
    assert!(detector.update_sampled_light_amount(&wall, &Baked).unwrap() > 0.0);
}

#[test]
fn test_directional_shadow_ray_points_at_the_light() {
    // light shines along +X, so its shadow ray leaves the sample towards -X
    let wall = Wall { x: -1.0, layers: LayerMask::DEFAULT };
    let light = LightSource::directional(Vec3::X, Vec3::ONE, 1.0).with_shadows(true);
    let mut detector = LightDetector::new(linear())
        .with_lights([light])
        .with_sample_points([Vec3::ZERO]);
    assert_eq!(detector.update_sampled_light_amount(&wall, &Baked).unwrap(), 0.0);

    detector.sample_points = vec![Vec3::new(-2.0, 0.0, 0.0)];
    assert_eq!(detector.update_sampled_light_amount(&wall, &Baked).unwrap(), 1.0);
}

#[test]
fn test_probes_add_to_dynamic_lighting() {
    let wall = Wall { x: 100.0, layers: LayerMask::empty() };
    let config = linear()
        .with_baked_mode(BakedMode::LightProbes)
        .with_baked_contribution(0.5);
    let mut detector = LightDetector::new(config)
        .with_lights([LightSource::directional(Vec3::NEG_Y, Vec3::ONE, 1.0)])
        .with_sample_points([Vec3::new(0.0, 2.0, 0.0)]);
    let amount = detector.update_sampled_light_amount(&wall, &Baked).unwrap();
    // 1.0 direct + (0.2 * 3 channels) * 0.5
    assert!((amount - 1.3).abs() < EPS, "{}", amount);
}

#[test]
fn test_lightmap_max_over_points() {
    let wall = Wall { x: 100.0, layers: LayerMask::empty() };
    let config = linear()
        .with_baked_mode(BakedMode::Lightmap)
        .with_evaluation_mode(EvaluationMode::Max);
    let mut detector = LightDetector::new(config).with_sample_points([
        Vec3::new(-1.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
    ]);
    let amount = detector.update_sampled_light_amount(&wall, &Baked).unwrap();
    assert!((amount - 3.0 * linear_to_gamma(0.5)).abs() < EPS);
}

#[test]
fn test_lightmap_average_counts_dark_points() {
    let wall = Wall { x: 100.0, layers: LayerMask::empty() };
    let config = linear().with_baked_mode(BakedMode::Lightmap);
    let mut detector = LightDetector::new(config)
        .with_sample_points([Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)]);
    let amount = detector.update_sampled_light_amount(&wall, &Baked).unwrap();
    assert!((amount - 1.5 * linear_to_gamma(0.5)).abs() < EPS);
}

#[test]
fn test_final_gamma_stage() {
    let wall = Wall { x: 100.0, layers: LayerMask::empty() };
    let config = linear().with_gamma_adjustment(GammaAdjustment::Gamma);
    let mut detector = LightDetector::new(config)
        .with_lights([LightSource::directional(Vec3::NEG_Y, Vec3::ONE, 1.0)])
        .with_sample_points([Vec3::ZERO]);
    let amount = detector.update_sampled_light_amount(&wall, &Baked).unwrap();
    assert!((amount - 1.0).abs() < EPS);
}

#[test]
fn test_config_loaded_from_json_drives_evaluation() {
    let json = r#"{
        "perceived_brightness": false,
        "evaluation_mode": "Max",
        "gamma_adjustment": "None",
        "baked_mode": "None"
    }"#;
    let config = DetectorConfig::from_json_str(json).unwrap();
    let wall = Wall { x: 100.0, layers: LayerMask::empty() };
    let mut detector = LightDetector::new(config)
        .with_lights([LightSource::point(Vec3::ZERO, Vec3::ONE, 1.0, 10.0)])
        .with_sample_points([Vec3::new(0.0, 0.0, 9.0), Vec3::new(0.0, 0.0, 0.5)]);
    let amount = detector.update_sampled_light_amount(&wall, &Baked).unwrap();
    assert_eq!(amount, 1.0);
}
