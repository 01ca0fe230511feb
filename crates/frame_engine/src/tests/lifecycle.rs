//! Session lifecycle: setup failures, cleanup and stopping

use super::{manual_engine, stepping_host};
use crate::application::{AppError, Application, SetupContext};
use crate::assets::{AssetError, AssetKind, AssetRegistry};
use crate::config::{ConfigError, EngineConfig};
use crate::engine::EngineError;
use crate::render::RecordingRenderer;
use crate::scene::{Bounds, SceneContext, TrackedObject};
use crate::scheduler::{FrameContext, ManualHost, SceneDriver, StopHandle};

#[derive(Default)]
struct Minimal {
    frames_seen: u64,
    cleaned_up: bool,
    stop_at: Option<(u64, StopHandle)>,
}

impl SceneDriver for Minimal {
    fn update(&mut self, frame: &FrameContext, _scene: &mut SceneContext) {
        self.frames_seen += 1;
        if let Some((at, stop)) = &self.stop_at {
            if frame.frame == *at {
                stop.stop();
            }
        }
    }
}

impl Application for Minimal {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), AppError> {
        let mesh = ctx.assets.get_mesh("sphere")?;
        let material = ctx.assets.get_material("basic")?;
        ctx.scene.track(TrackedObject::new("ball", mesh, material, Bounds::Sphere { radius: 0.5 }));
        Ok(())
    }

    fn cleanup(&mut self, _scene: &mut SceneContext) {
        self.cleaned_up = true;
    }
}

#[test]
fn test_missing_asset_aborts_before_first_frame() {
    let (mut engine, time) = manual_engine(EngineConfig::default());
    let mut renderer = RecordingRenderer::new();
    let mut app = Minimal::default();
    let assets = AssetRegistry::new().with_mesh("sphere");

    let err = engine
        .execute(&mut app, &assets, &mut stepping_host(&time, 10, 0.1), &mut renderer)
        .unwrap_err();

    match err {
        EngineError::Application(AppError::Asset(AssetError::NotFound { kind, name })) => {
            assert_eq!(kind, AssetKind::Material);
            assert_eq!(name, "basic");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(renderer.frames_rendered(), 0);
    assert_eq!(app.frames_seen, 0);
    assert!(!app.cleaned_up);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = EngineConfig::default();
    config.shadow.falloff = f32::NAN;
    let (mut engine, time) = manual_engine(config);
    let mut app = Minimal::default();

    let err = engine
        .execute(
            &mut app,
            &AssetRegistry::new(),
            &mut stepping_host(&time, 1, 0.1),
            &mut RecordingRenderer::new(),
        )
        .unwrap_err();

    assert!(matches!(err, EngineError::Config(ConfigError::Invalid { .. })));
}

#[test]
fn test_cleanup_after_host_ends() {
    let (mut engine, time) = manual_engine(EngineConfig::default());
    let mut renderer = RecordingRenderer::new();
    let mut app = Minimal::default();
    let assets = AssetRegistry::new().with_mesh("sphere").with_material("basic");

    let frames = engine
        .execute(&mut app, &assets, &mut stepping_host(&time, 5, 0.1), &mut renderer)
        .unwrap();

    assert_eq!(frames, 5);
    assert_eq!(app.frames_seen, 5);
    assert_eq!(renderer.frames_rendered(), 5);
    assert!(app.cleaned_up);
}

#[test]
fn test_stop_handle_ends_session() {
    let (mut engine, _time) = manual_engine(EngineConfig::default());
    let mut app = Minimal {
        stop_at: Some((7, engine.stop_handle())),
        ..Minimal::default()
    };
    let assets = AssetRegistry::new().with_mesh("sphere").with_material("basic");

    let frames = engine
        .execute(&mut app, &assets, &mut ManualHost::new(1_000), &mut RecordingRenderer::new())
        .unwrap();

    assert_eq!(frames, 7);
    assert!(app.cleaned_up);
}
