//! Floating shadow demo
//!
//! A sphere circles the origin while bouncing. Its baked-style shadow decal
//! slides along underneath and fades each time the sphere leaves the ground.

mod common;

use frame_engine::prelude::*;

struct ShadowDemo {
    sphere: Option<ObjectId>,
    faintest: f32,
    darkest: f32,
}

impl ShadowDemo {
    fn new() -> Self {
        Self {
            sphere: None,
            faintest: 1.0,
            darkest: 0.0,
        }
    }
}

impl SceneDriver for ShadowDemo {
    fn update(&mut self, frame: &FrameContext, scene: &mut SceneContext) {
        let Some(sphere) = self.sphere else {
            return;
        };

        // Previous frame's decal, before this frame moves the sphere
        if let Some(decal) = scene.decals.get(sphere) {
            self.faintest = self.faintest.min(decal.opacity);
            self.darkest = self.darkest.max(decal.opacity);
        }

        let t = frame.elapsed;
        scene
            .objects
            .set_position(sphere, Vec3::new(t.cos(), (t * 4.0).sin().abs(), t.sin()));
        if let Some(object) = scene.objects.get_mut(sphere) {
            object.rotation = Vec3::new(0.15 * t, 0.1 * t, 0.0);
        }
    }
}

impl Application for ShadowDemo {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), AppError> {
        log::info!("Setting up floating shadow scene...");
        let sphere = ctx.assets.get_mesh("sphere")?;
        let plane = ctx.assets.get_mesh("plane")?;
        let standard = ctx.assets.get_material("standard")?;

        ctx.scene.track(
            TrackedObject::new("plane", plane, standard, Bounds::Box { half_extents: Vec3::new(2.5, 0.01, 2.5) })
                .with_position(Vec3::new(0.0, ctx.config.shadow.plane_y, 0.0))
                .with_flags(ObjectFlags::empty()),
        );
        let ball = TrackedObject::new("sphere", sphere, standard, Bounds::Sphere { radius: 0.5 })
            .with_flags(ObjectFlags::CASTS_SHADOW);
        self.sphere = Some(ctx.scene.track(ball));
        Ok(())
    }

    fn cleanup(&mut self, _scene: &mut SceneContext) {
        log::info!("Shadow opacity ranged {:.2}..{:.2}", self.faintest, self.darkest);
    }
}

fn default_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.shadow = ShadowSettings { plane_y: -0.5, falloff: 0.3 };
    config.camera.position = Vec3::new(1.0, 1.0, 2.0);
    config.frame.max_frames = Some(600);
    config
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();
    log::info!("Starting floating shadow demo");

    let config = common::load_config(default_config())?;
    let assets = AssetRegistry::new()
        .with_mesh("sphere")
        .with_mesh("plane")
        .with_material("standard");

    let mut app = ShadowDemo::new();
    let frames = common::run_headless(config, &mut app, &assets)?;

    log::info!("Floating shadow demo finished after {} frames", frames);
    Ok(())
}
