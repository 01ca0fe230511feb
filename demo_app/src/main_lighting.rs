//! Lighting study demo
//!
//! A sphere, cube and donut spin over a plane while a pointer sweeps across
//! the viewport picking whatever it passes over. Light intensities, the key
//! light position, helper visibility and the shared material's surface
//! parameters are all controls, nudged on a fixed schedule.

mod common;

use frame_engine::prelude::*;

/// Lights the renderer would read every frame
struct LightRig {
    ambient: Shared<f32>,
    directional: Shared<f32>,
    spot: Shared<f32>,
    point: Shared<f32>,
    key_position: [Shared<f32>; 3],
    helpers_visible: Shared<bool>,
}

impl LightRig {
    fn new() -> Self {
        Self {
            ambient: shared(0.5),
            directional: shared(0.5),
            spot: shared(0.4),
            point: shared(0.3),
            key_position: [shared(2.0), shared(2.0), shared(-1.0)],
            helpers_visible: shared(false),
        }
    }

    fn describe(&self) -> String {
        format!(
            "ambient {:.3} directional {:.3} spot {:.3} point {:.3} key at ({:.2}, {:.2}, {:.2}) helpers {}",
            self.ambient.get(),
            self.directional.get(),
            self.spot.get(),
            self.point.get(),
            self.key_position[0].get(),
            self.key_position[1].get(),
            self.key_position[2].get(),
            if self.helpers_visible.get() { "on" } else { "off" },
        )
    }
}

struct Spinner {
    id: ObjectId,
    spin: fn(f32) -> Vec3,
}

struct LightingDemo {
    panel: LocalControlPanel,
    lights: LightRig,
    spinners: Vec<Spinner>,
    last_nearest: Option<ObjectId>,
}

impl LightingDemo {
    fn new() -> Self {
        Self {
            panel: LocalControlPanel::new(),
            lights: LightRig::new(),
            spinners: Vec::new(),
            last_nearest: None,
        }
    }

    /// Edits applied at fixed frames, as a user at the panel would
    fn scheduled_edit(frame: u64) -> Option<(&'static str, &'static str, ControlValue)> {
        match frame {
            120 => Some(("ambientLight", "intensity", ControlValue::Float(0.25))),
            240 => Some(("directionalLight", "x", ControlValue::Float(-3.3337))),
            300 => Some(("directionalLightCameraHelper", "visible", ControlValue::Bool(true))),
            360 => Some(("material", "uRoughness", ControlValue::Float(0.15))),
            420 => Some(("pointLight", "intensity", ControlValue::Float(1.8))),
            _ => None,
        }
    }

    fn bind_intensity(&mut self, light: &str, target: Shared<f32>) -> Result<(), AppError> {
        let spec = ControlSpec::float(light, "intensity", target.get())
            .with_step(0.0, 1.0, 0.001)
            .with_label(light);
        ControlBinding::float(&mut self.panel, spec, target)?;
        Ok(())
    }
}

impl SceneDriver for LightingDemo {
    fn update(&mut self, frame: &FrameContext, scene: &mut SceneContext) {
        if let Some((target, key, value)) = Self::scheduled_edit(frame.frame) {
            match self.panel.set(target, key, value) {
                Ok(applied) => log::info!("Frame {}: {}.{} = {:?}", frame.frame, target, key, applied),
                Err(err) => log::warn!("Frame {}: {}", frame.frame, err),
            }
        }

        let nearest = scene.last_hits.nearest().map(|hit| hit.object);
        if nearest != self.last_nearest {
            let name = nearest
                .and_then(|id| scene.objects.get(id))
                .map_or("nothing", |object| object.name.as_str());
            log::info!("Frame {}: pointer over {}", frame.frame, name);
            self.last_nearest = nearest;
        }

        for spinner in &self.spinners {
            if let Some(object) = scene.objects.get_mut(spinner.id) {
                object.rotation = (spinner.spin)(frame.elapsed);
            }
        }

        // Sweep the pointer left to right across the middle of the viewport
        if let Some(PickSource::Pointer(pointer)) = scene.pick_source.as_mut() {
            let sweep = f64::from((frame.elapsed * 0.4).sin()) * 0.5 + 0.5;
            let x = sweep * f64::from(pointer.viewport_width);
            let y = f64::from(pointer.viewport_height) * 0.5;
            pointer.update_position(x, y);
        }
    }
}

impl Application for LightingDemo {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), AppError> {
        log::info!("Setting up lighting study...");
        let standard = ctx.assets.get_material("standard")?;
        let sphere = ctx.assets.get_mesh("sphere")?;
        let cube = ctx.assets.get_mesh("cube")?;
        let torus = ctx.assets.get_mesh("torus")?;
        let plane = ctx.assets.get_mesh("plane")?;

        let shaped = [
            ("sphere", sphere, Bounds::Sphere { radius: 0.5 }, -1.5),
            ("cube", cube, Bounds::Box { half_extents: Vec3::new(0.375, 0.375, 0.375) }, 0.0),
            ("donut", torus, Bounds::Sphere { radius: 0.5 }, 1.5),
        ];
        for (name, mesh, bounds, x) in shaped {
            let id = ctx
                .scene
                .track(TrackedObject::new(name, mesh, standard, bounds).with_position(Vec3::new(x, 0.0, 0.0)));
            let spin: fn(f32) -> Vec3 = if name == "donut" {
                |t| Vec3::new(2.0 * t, 0.0, 0.0)
            } else {
                |t| Vec3::new(0.15 * t, 0.1 * t, 0.0)
            };
            self.spinners.push(Spinner { id, spin });
        }
        ctx.scene.track(
            TrackedObject::new("plane", plane, standard, Bounds::Box { half_extents: Vec3::new(2.5, 0.01, 2.5) })
                .with_position(Vec3::new(0.0, ctx.config.shadow.plane_y, 0.0))
                .with_flags(ObjectFlags::empty()),
        );

        let mut pointer = PointerState::new(800, 600);
        pointer.update_position(0.0, 300.0);
        ctx.scene.pick_source = Some(PickSource::Pointer(pointer));

        let lights = [
            ("ambientLight", self.lights.ambient.clone()),
            ("directionalLight", self.lights.directional.clone()),
            ("spotLight", self.lights.spot.clone()),
            ("pointLight", self.lights.point.clone()),
        ];
        for (light, target) in lights {
            self.bind_intensity(light, target)?;
        }
        for (axis, target) in ["x", "y", "z"].into_iter().zip(self.lights.key_position.clone()) {
            let spec = ControlSpec::float("directionalLight", axis, target.get()).with_step(-5.0, 5.0, 0.001);
            ControlBinding::float(&mut self.panel, spec, target)?;
        }
        ControlBinding::toggle(
            &mut self.panel,
            ControlSpec::toggle("directionalLightCameraHelper", "visible", false),
            self.lights.helpers_visible.clone(),
        )?;

        for (name, initial) in [("uMetalness", 0.0), ("uRoughness", 0.7)] {
            let handle = ctx.scene.uniforms.register(
                UniformBinding::new(UniformKey::new(standard, name), UniformValue::Float(initial))
                    .with_domain(UniformDomain::new(0.0, 1.0)),
            )?;
            ControlBinding::uniform(
                &mut self.panel,
                ControlSpec::float("material", name, initial).with_step(0.0, 1.0, 0.001),
                handle,
            )?;
        }

        log::info!("Registered {} controls", self.panel.len());
        Ok(())
    }

    fn cleanup(&mut self, _scene: &mut SceneContext) {
        log::info!("Final lights: {}", self.lights.describe());
    }
}

fn default_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.shadow = ShadowSettings { plane_y: -0.65, falloff: 0.4 };
    config.camera.position = Vec3::new(1.0, 1.0, 6.0);
    config.camera.aspect = 800.0 / 600.0;
    config.frame.max_frames = Some(600);
    config
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logging();
    log::info!("Starting lighting study demo");

    let config = common::load_config(default_config())?;
    let assets = AssetRegistry::new()
        .with_mesh("sphere")
        .with_mesh("cube")
        .with_mesh("torus")
        .with_mesh("plane")
        .with_material("standard");

    let mut app = LightingDemo::new();
    let frames = common::run_headless(config, &mut app, &assets)?;

    log::info!("Lighting study finished after {} frames", frames);
    Ok(())
}
