//! Walks a character along a night street and prints how visible it is.
//!
//! Usage: `stealth_meter [config.json]`

use glam::{Vec3, Vec4};
use helio_light_detector::detector::RendererHandle;
use helio_light_detector::prelude::*;

const TICKS: usize = 24;
const METER_WIDTH: usize = 40;

fn build_street() -> helio_light_detector::host::Result<HostScene> {
    let mut scene = HostScene::new();

    // Pavement lit by baked lamp pools: bright in the middle, dark at the ends
    let lightmap = Lightmap::new(
        8,
        1,
        (0..8)
            .map(|x| {
                let pool = 1.0 - ((x as f32 - 3.5) / 3.5).abs();
                Vec3::splat(0.05 + 0.3 * pool)
            })
            .collect(),
    )?;
    let index = scene.lightmaps.push(lightmap);
    scene.world.add_collider(
        Collider::cuboid(Aabb::new(Vec3::new(-20.0, -1.0, -5.0), Vec3::new(20.0, 0.0, 5.0)))
            .with_layers(LayerMask::STATIC | LayerMask::DEFAULT)
            .with_renderer(
                RendererHandle { id: 1, lightmap_index: index as i32 },
                Vec4::new(1.0, 1.0, 0.0, 0.0),
            ),
    );

    // A pillar casting a moon shadow over part of the street
    scene.world.add_collider(Collider::cuboid(Aabb::from_center_half_extents(
        Vec3::new(4.0, 3.0, -2.0),
        Vec3::new(1.0, 3.0, 1.0),
    )));

    scene.probes = Some({
        let mut volume =
            LightProbeVolume::grid(Vec3::new(-20.0, 0.0, -4.0), Vec3::new(20.0, 4.0, 4.0), Vec3::splat(4.0));
        volume.bake_ambient(|p| Vec3::new(0.02, 0.03, 0.06) * (1.0 + 0.5 * (p.x * 0.2).cos()));
        volume
    });

    scene.add_light(
        LightSource::directional(Vec3::new(-0.5, -1.0, 0.6), Vec3::new(0.6, 0.7, 1.0), 0.15)
            .with_shadows(true)
            .with_bake_type(LightBakeType::Mixed),
    );
    scene.add_light(
        LightSource::spot(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::NEG_Y,
            Vec3::new(1.0, 0.85, 0.6),
            30.0,
            12.0,
            70.0,
            40.0,
        )
        .with_shadows(true),
    );
    scene.add_light(
        LightSource::point(Vec3::new(-12.0, 2.5, 3.0), Vec3::new(1.0, 0.4, 0.2), 6.0, 6.0)
            .with_bake_type(LightBakeType::Baked),
    );

    Ok(scene)
}

fn meter(level: f32) -> String {
    let filled = ((level.clamp(0.0, 1.0)) * METER_WIDTH as f32).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(METER_WIDTH - filled))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading detector config from {}", path);
            DetectorConfig::load_json(path)?
        }
        None => DetectorConfig::new().with_baked_mode(BakedMode::Lightmap),
    };
    log::info!("Detector config: {:?}", config);

    let scene = build_street()?;
    let mut detector = LightDetector::new(config);
    detector.collect_realtime_lights(&scene.lights);
    let meter_handle = detector.handle();

    println!("=== Helio Light Detector ===");
    for tick in 0..TICKS {
        let x = -16.0 + 32.0 * tick as f32 / (TICKS - 1) as f32;
        let feet = Vec3::new(x, 0.1, 0.0);
        detector.sample_points = vec![feet, feet + Vec3::Y * 0.9, feet + Vec3::Y * 1.7];

        detector.update(true, &scene, &scene)?;
        let level = meter_handle.get();
        println!("x = {:6.2}  {} {:.3}", x, meter(level), level);
    }

    scene.lightmaps.release();
    Ok(())
}
