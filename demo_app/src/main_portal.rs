//! Fancy portal demo
//!
//! The portal and firefly shaders both animate from `uTime`. Their colors,
//! the firefly size and the clear color are exposed as controls, and a
//! scripted "user" twiddles them at random while the scene runs.

mod common;

use frame_engine::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Frames between scripted control edits
const EDIT_INTERVAL: u64 = 90;

struct PortalDemo {
    panel: LocalControlPanel,
    rng: StdRng,
    edits: u32,
}

impl PortalDemo {
    fn new(seed: u64) -> Self {
        Self {
            panel: LocalControlPanel::new(),
            rng: StdRng::seed_from_u64(seed),
            edits: 0,
        }
    }

    fn random_color(&mut self) -> Color {
        Color::new(self.rng.gen(), self.rng.gen(), self.rng.gen())
    }

    /// Pick a control and change it the way someone dragging a slider would
    fn scripted_edit(&mut self) -> Result<ControlValue, frame_engine::control::ControlError> {
        match self.rng.gen_range(0..4) {
            0 => {
                let color = self.random_color();
                self.panel.set("portal", "uColorStart", ControlValue::Color(color))
            }
            1 => {
                let color = self.random_color();
                self.panel.set("portal", "uColorEnd", ControlValue::Color(color))
            }
            2 => {
                // Deliberately overshoots the range now and then
                let size = self.rng.gen_range(-10.0..70.0);
                self.panel.set("fireflies", "uSize", ControlValue::Float(size))
            }
            _ => {
                let shade = self.rng.gen_range(0.0..0.2);
                self.panel.set("renderer", "clearColor", ControlValue::Color(Color::new(shade, 0.0, shade * 1.5)))
            }
        }
    }
}

impl SceneDriver for PortalDemo {
    fn update(&mut self, frame: &FrameContext, _scene: &mut SceneContext) {
        if frame.frame % EDIT_INTERVAL != 0 {
            return;
        }
        match self.scripted_edit() {
            Ok(value) => {
                self.edits += 1;
                log::info!("Frame {}: control edit #{} applied {:?}", frame.frame, self.edits, value);
            }
            Err(err) => log::warn!("Control edit failed: {}", err),
        }
    }
}

impl Application for PortalDemo {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), AppError> {
        log::info!("Setting up portal scene...");
        let portal = ctx.assets.get_material("portalLight")?;
        let fireflies = ctx.assets.get_material("fireflies")?;
        let baked = ctx.assets.get_material("baked")?;
        let scene_mesh = ctx.assets.get_mesh("portalScene")?;
        let points = ctx.assets.get_mesh("firefliesPoints")?;

        ctx.scene.track(
            TrackedObject::new("portal", scene_mesh, baked, Bounds::Box { half_extents: Vec3::new(2.0, 1.0, 2.0) })
                .with_flags(ObjectFlags::empty()),
        );
        ctx.scene.track(
            TrackedObject::new("fireflies", points, fireflies, Bounds::Box { half_extents: Vec3::new(2.0, 0.75, 2.0) })
                .with_position(Vec3::new(0.0, 0.75, 0.0))
                .with_flags(ObjectFlags::empty()),
        );

        let uniforms = &mut ctx.scene.uniforms;
        uniforms.register(
            UniformBinding::new(UniformKey::new(portal, "uTime"), UniformValue::Float(0.0))
                .with_rule(UniformRule::elapsed()),
        )?;
        let color_start = uniforms.register(UniformBinding::new(
            UniformKey::new(portal, "uColorStart"),
            UniformValue::Color(Color::from_hex(0xFFFF00)),
        ))?;
        let color_end = uniforms.register(UniformBinding::new(
            UniformKey::new(portal, "uColorEnd"),
            UniformValue::Color(Color::from_hex(0x0000FF)),
        ))?;
        uniforms.register(
            UniformBinding::new(UniformKey::new(fireflies, "uTime"), UniformValue::Float(0.0))
                .with_rule(UniformRule::elapsed()),
        )?;
        uniforms.register(UniformBinding::new(
            UniformKey::new(fireflies, "uPixelRatio"),
            UniformValue::Float(device_pixel_ratio().min(2.0)),
        ))?;
        let size = uniforms.register(UniformBinding::new(
            UniformKey::new(fireflies, "uSize"),
            UniformValue::Float(100.0),
        ))?;

        ControlBinding::uniform(
            &mut self.panel,
            ControlSpec::color("portal", "uColorStart", Color::from_hex(0xFFFF00)).with_label("portalColorStart"),
            color_start,
        )?;
        ControlBinding::uniform(
            &mut self.panel,
            ControlSpec::color("portal", "uColorEnd", Color::from_hex(0x0000FF)).with_label("portalColorEnd"),
            color_end,
        )?;
        ControlBinding::uniform(
            &mut self.panel,
            ControlSpec::float("fireflies", "uSize", 100.0)
                .with_step(0.0, 50.0, 1.0)
                .with_label("firefliesSize"),
            size,
        )?;
        ControlBinding::color(
            &mut self.panel,
            ControlSpec::color("renderer", "clearColor", ctx.config.clear_color).with_label("clearColor"),
            ctx.scene.clear_color.clone(),
        )?;

        log::info!(
            "Portal block packs to {} bytes, fireflies block to {} bytes",
            ctx.scene.uniforms.pack_material(portal).len(),
            ctx.scene.uniforms.pack_material(fireflies).len()
        );
        Ok(())
    }

    fn cleanup(&mut self, _scene: &mut SceneContext) {
        log::info!("Applied {} scripted control edits", self.edits);
        for spec in self.panel.controls() {
            if let Some(value) = self.panel.value(&spec.target, &spec.key) {
                log::info!("  {} = {:?}", spec.display_label(), value);
            }
        }
    }
}

/// Display scale reported by the environment, 1.0 when unknown
fn device_pixel_ratio() -> f32 {
    std::env::var("DEVICE_PIXEL_RATIO")
        .ok()
        .and_then(|raw| raw.parse::<f32>().ok())
        .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
        .unwrap_or(1.0)
}

fn default_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.clear_color = Color::from_hex(0x000000);
    config.camera.position = Vec3::new(4.0, 2.0, 4.0);
    config.camera.fov_degrees = 45.0;
    config.frame.max_frames = Some(900);
    config
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();
    log::info!("Starting portal demo");

    let config = common::load_config(default_config())?;
    let assets = AssetRegistry::new()
        .with_mesh("portalScene")
        .with_mesh("firefliesPoints")
        .with_material("baked")
        .with_material("portalLight")
        .with_material("fireflies");

    let seed = std::env::var("PORTAL_SEED").ok().and_then(|s| s.parse().ok()).unwrap_or(7);
    let mut app = PortalDemo::new(seed);
    let frames = common::run_headless(config, &mut app, &assets)?;

    log::info!("Portal demo finished after {} frames", frames);
    Ok(())
}
