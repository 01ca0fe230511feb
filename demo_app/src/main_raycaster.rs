//! Raycaster demo
//!
//! Three spheres bob up and down across a static ray. Spheres under the ray
//! light up and each casts a fake shadow that fades as it rises.

mod common;

use frame_engine::prelude::*;

const SPHERE_X: [f32; 3] = [-2.0, 0.0, 2.0];
const BOB_SPEED: [f32; 3] = [2.4, 2.6, 2.8];

struct RaycasterDemo {
    spheres: Vec<ObjectId>,
    hovered: Vec<bool>,
}

impl RaycasterDemo {
    fn new() -> Self {
        Self {
            spheres: Vec::new(),
            hovered: Vec::new(),
        }
    }
}

impl SceneDriver for RaycasterDemo {
    fn update(&mut self, frame: &FrameContext, scene: &mut SceneContext) {
        // Report hover changes from last frame's pick
        for (i, id) in self.spheres.iter().enumerate() {
            let hovered = scene.last_hits.contains(*id);
            if hovered != self.hovered[i] {
                log::info!(
                    "Frame {}: sphere {} {} the ray",
                    frame.frame,
                    i,
                    if hovered { "entered" } else { "left" }
                );
                self.hovered[i] = hovered;
            }
        }

        for ((id, x), speed) in self.spheres.iter().zip(SPHERE_X).zip(BOB_SPEED) {
            scene.objects.set_position(*id, Vec3::new(x, (frame.elapsed * speed).sin(), 0.0));
        }
    }
}

impl Application for RaycasterDemo {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), AppError> {
        log::info!("Setting up raycaster scene...");
        let sphere = ctx.assets.get_mesh("sphere")?;
        let plane = ctx.assets.get_mesh("plane")?;
        let basic = ctx.assets.get_material("basic")?;
        let ground = ctx.assets.get_material("ground")?;

        ctx.scene.track(
            TrackedObject::new("ground", plane, ground, Bounds::Box { half_extents: Vec3::new(5.0, 0.01, 5.0) })
                .with_position(Vec3::new(0.0, ctx.config.shadow.plane_y, 0.0))
                .with_flags(ObjectFlags::empty()),
        );
        for (i, x) in SPHERE_X.iter().enumerate() {
            let object = TrackedObject::new(format!("sphere{}", i), sphere, basic, Bounds::Sphere { radius: 0.5 })
                .with_position(Vec3::new(*x, 0.0, 0.0));
            self.spheres.push(ctx.scene.track(object));
            self.hovered.push(false);
        }

        if ctx.scene.pick_source.is_none() {
            log::warn!("No pick ray configured, spheres will never highlight");
        }
        Ok(())
    }

    fn cleanup(&mut self, scene: &mut SceneContext) {
        match scene.last_hits.nearest() {
            Some(hit) => log::info!("Nearest hit at exit: {:.3} units away", hit.distance),
            None => log::info!("Nothing under the ray at exit"),
        }
    }
}

fn default_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.clear_color = Color::from_hex(0x000000);
    config.camera.position = Vec3::new(0.0, 0.0, 6.0);
    config.frame.max_frames = Some(600);
    config.pick = Some(PickConfig {
        origin: Vec3::new(-3.0, 0.0, 0.0),
        direction: Vec3::new(10.0, 0.0, 0.0),
    });
    config
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();
    log::info!("Starting raycaster demo");

    let config = common::load_config(default_config())?;
    let assets = AssetRegistry::new()
        .with_mesh("sphere")
        .with_mesh("plane")
        .with_material("basic")
        .with_material("ground");

    let mut app = RaycasterDemo::new();
    let frames = common::run_headless(config, &mut app, &assets)?;

    log::info!("Raycaster demo finished after {} frames", frames);
    Ok(())
}
