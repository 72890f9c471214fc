use glam::Vec3;
use rand::Rng;
use rand::rngs::StdRng;

use stillpoint_core::audio::AudioChannel;
use stillpoint_core::host::{RenderSurface, Viewport};
use stillpoint_core::input::InputSource;
use stillpoint_core::scene::{CameraView, Material, MeshType, ObjectId, Scene, Transform, hex_color};

use crate::city_gen::ColorState;
use crate::{World, WorldEvent};

const BUILDING_WHITE: u32 = 0xffffff;
const GLITCH_GRAY: u32 = 0x444444;
const TARGET_BLACK: u32 = 0x000000;
const STABLE_GREEN: u32 = 0x00ff00;
const DUST_GRAY: u32 = 0x666666;
const FLOOR_WHITE: u32 = 0xffffff;
const GRID_BLACK: u32 = 0x000000;

/// Edge length of the target cube at scale 1.
pub const TARGET_SIZE: f32 = 1.2;
const FLOOR_SIZE: f32 = 100.0;
const GRID_DIVISIONS: u16 = 50;
/// Lifted above the floor to avoid z-fighting.
const GRID_LIFT: f32 = 0.01;
const DUST_POINT_SIZE: f32 = 0.3;
const DUST_OPACITY: f32 = 0.5;
const STABILIZER_RADIUS: f32 = 3.0;
const STABILIZER_SEGMENTS: u16 = 32;
const STABILIZER_OPACITY: f32 = 0.3;

/// Scene name of the sphere that appears once the chaos has stopped.
pub const STABILIZER_NAME: &str = "stabilization_sphere";
/// Scene name of the target cube.
pub const TARGET_NAME: &str = "target_cube";

/// Scene ids of everything the per-frame sync touches.
struct SceneIds {
    buildings: Vec<ObjectId>,
    target: ObjectId,
    stabilizer: Option<ObjectId>,
}

/// Owns the world and its collaborators and runs them in a fixed order each frame.
pub struct FrameDriver<S, A, R = StdRng>
where
    R: Rng,
{
    world: World<R>,
    surface: S,
    audio: A,
    scene: Scene,
    ids: SceneIds,
    viewport: Viewport,
}

impl<S, A, R> FrameDriver<S, A, R>
where
    S: RenderSurface,
    A: AudioChannel,
    R: Rng,
{
    pub fn new(world: World<R>, mut surface: S, audio: A, viewport: Viewport) -> Self {
        let (scene, ids) = build_scene(&world);
        surface.configure_viewport(viewport);
        Self {
            world,
            surface,
            audio,
            scene,
            ids,
            viewport,
        }
    }

    /// Host window resized; forwarded to the surface and the camera aspect.
    pub fn resize(&mut self, viewport: Viewport) {
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "Viewport resized"
        );
        self.viewport = viewport;
        self.surface.configure_viewport(viewport);
    }

    /// Run one frame: poll input, movement, proximity, glitches, then present.
    pub fn frame<I: InputSource + ?Sized>(&mut self, input: &mut I) -> Vec<WorldEvent> {
        let snapshot = input.snapshot();
        let events = self.world.tick(&snapshot, &mut self.audio);
        self.sync_scene();
        let camera = self.camera();
        self.surface.present(&self.scene, &camera);
        events
    }

    pub fn camera(&self) -> CameraView {
        let mut camera = self.world.viewer().camera();
        camera.aspect = self.viewport.aspect();
        camera
    }

    pub fn world(&self) -> &World<R> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<R> {
        &mut self.world
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// For the host's audio toggle button.
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn sync_scene(&mut self) {
        let env = self.world.environment();

        for (building, &id) in env.buildings.iter().zip(&self.ids.buildings) {
            if let Some(obj) = self.scene.get_mut(id) {
                obj.transform.translation = building.current_position;
                obj.material.set_rgb(match building.color_state {
                    ColorState::Normal => BUILDING_WHITE,
                    ColorState::GlitchGray => GLITCH_GRAY,
                });
            }
        }

        let visual = env.target;
        if let Some(obj) = self.scene.get_mut(self.ids.target) {
            obj.transform.scale = Vec3::splat(TARGET_SIZE * visual.scale);
            obj.material.set_rgb(if visual.stabilized {
                STABLE_GREEN
            } else {
                TARGET_BLACK
            });
            obj.material.set_opacity(visual.opacity);
        }

        if env.chaos_stopped() && self.ids.stabilizer.is_none() {
            let id = self.scene.add_named(
                STABILIZER_NAME,
                MeshType::Sphere {
                    radius: STABILIZER_RADIUS,
                    segments: STABILIZER_SEGMENTS,
                },
                Material::unlit(hex_color(STABLE_GREEN, STABILIZER_OPACITY)).with_wireframe(true),
                Transform::from_translation(env.target_point()),
            );
            self.ids.stabilizer = Some(id);
        }

        self.scene.background = hex_color(env.background.hex(), 1.0);
    }
}

fn build_scene<R: Rng>(world: &World<R>) -> (Scene, SceneIds) {
    let env = world.environment();
    let mut scene = Scene::new();

    scene.add(
        MeshType::Plane,
        Material::unlit(hex_color(FLOOR_WHITE, 1.0)),
        Transform::default().with_scale(Vec3::new(FLOOR_SIZE, 1.0, FLOOR_SIZE)),
    );
    scene.add(
        MeshType::Grid {
            size: FLOOR_SIZE,
            divisions: GRID_DIVISIONS,
        },
        Material::unlit(hex_color(GRID_BLACK, 1.0)),
        Transform::from_translation(Vec3::new(0.0, GRID_LIFT, 0.0)),
    );

    let buildings = env
        .buildings
        .iter()
        .map(|b| {
            scene.add(
                MeshType::Cuboid,
                Material::unlit(hex_color(BUILDING_WHITE, 1.0))
                    .with_wireframe(b.wireframe)
                    .with_outline(!b.wireframe),
                Transform::from_translation(b.current_position).with_scale(b.dimensions.as_vec3()),
            )
        })
        .collect();

    scene.add(
        MeshType::Points {
            positions: env.particles.clone(),
            size: DUST_POINT_SIZE,
        },
        Material::unlit(hex_color(DUST_GRAY, DUST_OPACITY)),
        Transform::default(),
    );

    let target = scene.add_named(
        TARGET_NAME,
        MeshType::Cuboid,
        Material::unlit(hex_color(TARGET_BLACK, env.target.opacity)),
        Transform::from_translation(env.target_point())
            .with_scale(Vec3::splat(TARGET_SIZE * env.target.scale)),
    );

    (
        scene,
        SceneIds {
            buildings,
            target,
            stabilizer: None,
        },
    )
}
