//! Waypoint demo application
//!
//! A ring of lit cubes spins around the origin while a runner cube laps a
//! square. Each corner of the square is a waypoint that snaps the runner onto
//! the corner and turns it towards the next one.
//!
//! Controls:
//! - Space pauses and resumes
//! - R puts the runner back at its start
//! - Left and right arrows orbit the camera
//! - Escape quits
//!
//! Pass a path to a Wavefront OBJ file to add it to the scene. A `demo.toml`
//! or `demo.ron` next to the working directory overrides the engine config.

use scene_engine::foundation::math::utils::deg_to_rad;
use scene_engine::prelude::*;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

const RING_SIZE: usize = 6;
const RING_RADIUS: f32 = 1.5;
const RING_SPEED: f32 = 0.6;
const LAP_HALF_WIDTH: f32 = 3.0;
const RUNNER_SPEED: f32 = 2.0;
const CORNER_RADIUS: f32 = 0.3;
const ORBIT_STEP: f32 = 5.0;

/// Corners of the lap, each paired with the heading the runner takes from it
fn corners() -> [(Vec3, f32); 4] {
    let w = LAP_HALF_WIDTH;
    [
        (Vec3::new(w, 0.0, -w), -90.0),
        (Vec3::new(w, 0.0, w), -180.0),
        (Vec3::new(-w, 0.0, w), -270.0),
        (Vec3::new(-w, 0.0, -w), 0.0),
    ]
}

struct WaypointDemo {
    paused: Rc<Cell<bool>>,
    reset_requested: Rc<Cell<bool>>,
    model_path: Option<String>,
    ring: Option<NodeId>,
    runner: Option<NodeId>,
    orbit_angle: f32,
    elapsed: f32,
}

impl WaypointDemo {
    fn new(model_path: Option<String>) -> Self {
        Self {
            paused: Rc::new(Cell::new(false)),
            reset_requested: Rc::new(Cell::new(false)),
            model_path,
            ring: None,
            runner: None,
            orbit_angle: 45.0,
            elapsed: 0.0,
        }
    }

    fn build_ring(scene: &mut Scene) -> Result<NodeId, AppError> {
        let ring = scene.create_group();
        let cube = MeshData::cube();

        let mut cubes = Vec::with_capacity(RING_SIZE);
        for i in 0..RING_SIZE {
            let angle = i as f32 / RING_SIZE as f32 * std::f32::consts::TAU;
            let id = scene.create_component();
            let component = scene.try_component_mut(id)?;
            component.set_mesh(&cube)?;
            component.set_colour(Vec3::new(0.2 + 0.8 * (i as f32 / RING_SIZE as f32), 0.4, 0.9));
            component.set_init_model(
                Mat4::translation(Vec3::new(RING_RADIUS * angle.cos(), 1.5, RING_RADIUS * angle.sin()))
                    * Mat4::new_scaling(0.3),
            );
            cubes.push(id);
        }
        scene.add_components(ring, cubes)?;
        Ok(ring)
    }

    fn build_runner(scene: &mut Scene, waypoints: &mut WaypointSet) -> Result<NodeId, AppError> {
        let runner = scene.create_component();
        let component = scene.try_component_mut(runner)?;
        component.set_mesh(&MeshData::cube())?;
        component.set_colour(Vec3::new(0.9, 0.3, 0.2));
        component.set_init_model(Mat4::translation(Vec3::new(-LAP_HALF_WIDTH, 0.0, -LAP_HALF_WIDTH)) * Mat4::new_scaling(0.4));

        for (corner, heading) in corners() {
            let mut waypoint = Waypoint::new(corner, CORNER_RADIUS).with_trigger(Trigger::OnEnter);
            waypoint.add_action(runner, move |c: &mut Component| {
                log::debug!("Runner reached corner {:?}", corner);
                c.set_model(
                    Mat4::translation(corner)
                        * Mat4::rotation_y(deg_to_rad(heading))
                        * Mat4::new_scaling(0.4),
                );
            });
            waypoints.add(waypoint);
        }
        Ok(runner)
    }

    fn place_camera(&self, camera: &mut Camera) {
        let angle = deg_to_rad(self.orbit_angle);
        camera.set_position(Vec3::new(10.0 * angle.cos(), 6.0, 10.0 * angle.sin()));
        camera.look_at(Vec3::zeros(), Vec3::y());
    }
}

impl Application for WaypointDemo {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Initializing waypoint demo...");

        let shader = ShaderProgram::colour_shader(engine.api())
            .map_err(|e| AppError::Custom(format!("Colour shader: {}", e)))?;

        let root = engine.scene_mut().create_group();
        {
            let scene = engine.scene_mut();
            scene.set_shader(root, Rc::clone(&shader))?;
            scene.set_ambient_light_colour(root, Vec3::new(0.15, 0.15, 0.2))?;
            scene.add_point_source(root, Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 0.95, 0.8), 30.0)?;
            scene.add_point_source(root, Vec3::new(6.0, 2.0, 6.0), Vec3::new(0.3, 0.3, 1.0), 15.0)?;
        }

        let ring = Self::build_ring(engine.scene_mut())?;
        let runner = {
            let (scene, waypoints) = engine.scene_and_waypoints_mut();
            Self::build_runner(scene, waypoints)?
        };
        engine.scene_mut().add_components(root, [ring, runner])?;

        if let Some(path) = &self.model_path {
            let scene = engine.scene_mut();
            let model = scene.create_component();
            let component = scene.try_component_mut(model)?;
            component.load_wavefront(path)?;
            component.set_colour(Vec3::new(0.8, 0.7, 0.5));
            scene.add_component(root, model)?;
            log::info!("Loaded {} into the scene", path);
        }

        let paused = Rc::clone(&self.paused);
        engine.input_mut().bind_key(Action::Press, KeyCode::Space, move || {
            paused.set(!paused.get());
            log::info!("{}", if paused.get() { "Paused" } else { "Resumed" });
        });
        let reset = Rc::clone(&self.reset_requested);
        engine.input_mut().bind_key(Action::Press, KeyCode::R, move || reset.set(true));

        self.place_camera(engine.camera_mut());
        self.ring = Some(ring);
        self.runner = Some(runner);

        log::info!("Waypoint demo ready with {} nodes", engine.scene().len());
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        if let Some(runner) = self.runner {
            if self.reset_requested.replace(false) {
                engine.scene_mut().reset_to_initial(runner)?;
            }
        }
        if self.paused.get() {
            return Ok(());
        }

        if let Some(ring) = self.ring {
            engine.scene_mut().update_model(ring, &Mat4::rotation_y(RING_SPEED * delta_time))?;
        }
        if let Some(runner) = self.runner {
            // Unit cube scaled by 0.4, so local steps are divided back out
            let step = Mat4::translation(Vec3::new(RUNNER_SPEED * delta_time / 0.4, 0.0, 0.0));
            engine.scene_mut().apply_fp_transformation(runner, &step)?;
        }

        self.elapsed += delta_time;
        if self.elapsed >= 5.0 {
            self.elapsed = 0.0;
            log::debug!("{:.2} ms/frame", engine.ms_per_frame());
        }
        Ok(())
    }

    fn handle_event(&mut self, engine: &mut Engine, event: &InputEvent) -> Result<(), AppError> {
        if let InputEvent::Key(key) = event {
            if key.action == Action::Release {
                return Ok(());
            }
            match key.key {
                KeyCode::Left => self.orbit_angle -= ORBIT_STEP,
                KeyCode::Right => self.orbit_angle += ORBIT_STEP,
                _ => return Ok(()),
            }
            self.place_camera(engine.camera_mut());
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Cleaning up waypoint demo after {} frames",
            engine.timer().frame_count()
        );
    }
}

fn load_config() -> Result<EngineConfig, Box<dyn std::error::Error>> {
    for path in ["demo.toml", "demo.ron"] {
        if Path::new(path).exists() {
            return Ok(EngineConfig::load_from_file(path)?);
        }
    }
    Ok(EngineConfig::new("Scene Engine - Waypoint Demo"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let mut app = WaypointDemo::new(std::env::args().nth(1));
    Engine::run(config, &mut app)?;
    Ok(())
}
