//! A ball on a circular path bouncing over its shadow

use super::{manual_engine, stepping_host};
use crate::application::{AppError, Application, SetupContext};
use crate::assets::AssetRegistry;
use crate::config::EngineConfig;
use crate::foundation::math::Vec3;
use crate::render::RecordingRenderer;
use crate::scene::{Bounds, ObjectFlags, ObjectId, SceneContext, TrackedObject};
use crate::scheduler::{FrameContext, SceneDriver};
use crate::shadow::ShadowSettings;
use approx::assert_relative_eq;

#[derive(Default)]
struct Bouncer {
    ball: Option<ObjectId>,
}

impl SceneDriver for Bouncer {
    fn update(&mut self, frame: &FrameContext, scene: &mut SceneContext) {
        if let Some(ball) = self.ball {
            let t = frame.elapsed;
            scene.objects.set_position(ball, Vec3::new(t.cos(), (t * 4.0).sin().abs(), t.sin()));
        }
    }
}

impl Application for Bouncer {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), AppError> {
        let sphere = ctx.assets.get_mesh("sphere")?;
        let plane = ctx.assets.get_mesh("plane")?;
        let material = ctx.assets.get_material("standard")?;

        ctx.scene.track(
            TrackedObject::new("plane", plane, material, Bounds::Box { half_extents: Vec3::new(2.5, 0.01, 2.5) })
                .with_position(Vec3::new(0.0, -0.5, 0.0))
                .with_flags(ObjectFlags::empty()),
        );
        self.ball = Some(ctx.scene.track(TrackedObject::new("sphere", sphere, material, Bounds::Sphere { radius: 0.5 })));
        Ok(())
    }
}

#[test]
fn test_decal_follows_circular_path() {
    let config = EngineConfig {
        shadow: ShadowSettings { plane_y: -0.5, falloff: 0.3 },
        ..EngineConfig::default()
    };
    let (mut engine, time) = manual_engine(config);
    let mut renderer = RecordingRenderer::new().with_history(120);
    let mut app = Bouncer::default();
    let assets = AssetRegistry::new()
        .with_mesh("sphere")
        .with_mesh("plane")
        .with_material("standard");
    let dt = 1.0 / 30.0;

    engine.execute(&mut app, &assets, &mut stepping_host(&time, 120, dt), &mut renderer).unwrap();

    for (n, frame) in renderer.history().enumerate() {
        let t = (n + 1) as f32 * dt;
        let decal = frame.object("sphere").and_then(|ball| ball.decal).unwrap();

        assert_relative_eq!(decal.position.x, t.cos(), epsilon = 1.0e-4);
        assert_relative_eq!(decal.position.z, t.sin(), epsilon = 1.0e-4);
        assert_relative_eq!(decal.position.y, -0.49, epsilon = 1.0e-6);
        assert_relative_eq!(decal.opacity, (1.0 - (t * 4.0).sin().abs()) * 0.3, epsilon = 1.0e-4);

        // The ground never owns a decal
        assert!(frame.object("plane").unwrap().decal.is_none());
    }
}
