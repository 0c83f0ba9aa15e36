// scene/scene.rs
use std::sync::Arc;

use glam::{Quat, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use winit::keyboard::KeyCode;

use crate::asset::Mesh;
use crate::input::InputState;
use crate::renderer::{primitives, LightsData, PointLightData, Renderer};
use crate::scene::{Camera, Transform};
use crate::settings::RenderSettings;

/// Degrees per second the transparent centerpiece turns about +Y.
const SPIN_RATE_DEG: f32 = 15.0;

pub struct RenderObject {
    pub mesh: Arc<Mesh>,
    pub transform: Transform,
    pub color: [f32; 4],
}

/// Exactly two object sets: one opaque environment, one transparent
/// centerpiece. The centerpiece spins, so the transparent fragment count
/// drifts from frame to frame and exercises the store's resize path.
pub struct Scene {
    camera: Camera,
    lights: LightsData,
    sky_color: Vec3,
    opaque: Vec<RenderObject>,
    transparent: Vec<RenderObject>,
    centerpiece_locals: Vec<Transform>,
    centerpiece_origin: Vec3,
    spin: f32,
}

impl Scene {
    pub fn new() -> Self {
        let mut lights = LightsData::new();
        lights.set_ambient(Vec3::splat(0.05));
        lights.add_point(PointLightData {
            position: Vec3::new(0.0, 14.0, 0.0),
            color: Vec3::ONE,
            strength: 120.0,
        });
        lights.add_point(PointLightData {
            position: Vec3::new(18.0, 10.0, 6.0),
            color: Vec3::new(1.0, 1.0, 0.9),
            strength: 220.0,
        });
        lights.add_point(PointLightData {
            position: Vec3::new(-18.0, 10.0, -6.0),
            color: Vec3::new(0.9, 1.0, 1.0),
            strength: 220.0,
        });

        Self {
            camera: Camera {
                position: Vec3::new(0.0, 7.0, -18.0),
                rotation: Vec3::new(-0.12, 0.0, 0.0),
                ..Camera::default()
            },
            lights,
            sky_color: Vec3::new(0.812, 0.992, 1.0),
            opaque: Vec::new(),
            transparent: Vec::new(),
            centerpiece_locals: Vec::new(),
            centerpiece_origin: Vec3::new(0.0, 5.0, 0.0),
            spin: 0.0,
        }
    }

    /// Builds the GPU meshes and populates both object sets.
    pub fn setup(&mut self, renderer: &Renderer) {
        let (verts, indices) = primitives::plane_mesh();
        let plane = Arc::new(renderer.create_mesh(&verts, &indices));
        let (verts, indices) = primitives::cube_mesh();
        let cube = Arc::new(renderer.create_mesh(&verts, &indices));
        let (verts, indices) = primitives::sphere_mesh(32, 24);
        let sphere = Arc::new(renderer.create_mesh(&verts, &indices));

        // Opaque environment: floor, a ring of pillars, a couple of crates
        self.opaque.push(RenderObject {
            mesh: plane,
            transform: Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(60.0)),
            color: [0.55, 0.52, 0.48, 1.0],
        });

        for i in 0..6 {
            let angle = std::f32::consts::TAU * i as f32 / 6.0;
            let radius = 14.0;
            self.opaque.push(RenderObject {
                mesh: cube.clone(),
                transform: Transform::from_trs(
                    Vec3::new(angle.cos() * radius, 4.0, angle.sin() * radius),
                    Quat::IDENTITY,
                    Vec3::new(1.4, 8.0, 1.4),
                ),
                color: [0.75, 0.73, 0.70, 1.0],
            });
        }

        self.opaque.push(RenderObject {
            mesh: cube.clone(),
            transform: Transform::from_trs(
                Vec3::new(6.0, 1.0, 8.0),
                Quat::from_rotation_y(0.6),
                Vec3::splat(2.0),
            ),
            color: [0.45, 0.30, 0.20, 1.0],
        });
        self.opaque.push(RenderObject {
            mesh: cube.clone(),
            transform: Transform::from_trs(
                Vec3::new(-7.0, 0.75, 6.0),
                Quat::from_rotation_y(-0.3),
                Vec3::splat(1.5),
            ),
            color: [0.30, 0.40, 0.25, 1.0],
        });

        // Transparent centerpiece: overlapping shells so most covered
        // pixels hold several list entries
        let mut rng = SmallRng::seed_from_u64(7);
        self.centerpiece_locals.clear();
        self.transparent.clear();

        self.add_centerpiece_part(
            &sphere,
            Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(4.5)),
            [0.85, 0.25, 0.25, 0.35],
        );

        for _ in 0..5 {
            let offset = Vec3::new(
                rng.gen_range(-2.5..2.5),
                rng.gen_range(-1.5..1.5),
                rng.gen_range(-2.5..2.5),
            );
            let scale = rng.gen_range(1.2..2.6);
            let color = [
                rng.gen_range(0.2..0.9),
                rng.gen_range(0.2..0.9),
                rng.gen_range(0.2..0.9),
                rng.gen_range(0.3..0.55),
            ];
            let mesh = if rng.gen_bool(0.5) { &sphere } else { &cube };
            self.add_centerpiece_part(
                mesh,
                Transform::from_trs(
                    offset,
                    Quat::from_rotation_y(rng.gen_range(0.0..1.0)),
                    Vec3::splat(scale),
                ),
                color,
            );
        }

        self.apply_spin();
    }

    fn add_centerpiece_part(&mut self, mesh: &Arc<Mesh>, local: Transform, color: [f32; 4]) {
        self.centerpiece_locals.push(local);
        self.transparent.push(RenderObject {
            mesh: mesh.clone(),
            transform: local,
            color,
        });
    }

    pub fn update(&mut self, dt: f64, input: &mut InputState, settings: &RenderSettings) {
        self.spin += dt as f32 * SPIN_RATE_DEG.to_radians();
        self.apply_spin();
        self.move_camera(dt, input, settings);
    }

    fn apply_spin(&mut self) {
        let rot = Quat::from_rotation_y(-self.spin);
        for (object, local) in self.transparent.iter_mut().zip(&self.centerpiece_locals) {
            object.transform.translation = self.centerpiece_origin + rot * local.translation;
            object.transform.rotation = rot * local.rotation;
        }
    }

    fn move_camera(&mut self, dt: f64, input: &mut InputState, settings: &RenderSettings) {
        let (dx, dy) = input.take_mouse_delta();
        if input.right_mouse_down() {
            let mouse = f64::from(settings.mouse_speed);
            self.camera.rotation.x += ((-dy / 16.0) * mouse).to_radians() as f32;
            self.camera.rotation.y += ((-dx / 16.0) * mouse * 0.666).to_radians() as f32;
            self.camera.clamp_pitch();
        }

        let mut speed = settings.movement_speed;
        if input.is_pressed(KeyCode::ShiftLeft) {
            speed *= 1.5;
        }
        let step = dt as f32 * speed;

        let forward = self.camera.forward();
        let right = self.camera.right();
        let up = self.camera.up();

        if input.is_pressed(KeyCode::KeyW) {
            self.camera.position += forward * step;
        }
        if input.is_pressed(KeyCode::KeyS) {
            self.camera.position -= forward * step;
        }
        if input.is_pressed(KeyCode::KeyD) {
            self.camera.position += right * step;
        }
        if input.is_pressed(KeyCode::KeyA) {
            self.camera.position -= right * step;
        }
        if input.is_pressed(KeyCode::KeyE) {
            self.camera.position += up * step;
        }
        if input.is_pressed(KeyCode::KeyQ) {
            self.camera.position -= up * step;
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn lights(&self) -> &LightsData {
        &self.lights
    }

    pub fn sky_color(&self) -> Vec3 {
        self.sky_color
    }

    pub fn opaque_objects(&self) -> &[RenderObject] {
        &self.opaque
    }

    pub fn transparent_objects(&self) -> &[RenderObject] {
        &self.transparent
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
