use glam::{Mat4, Quat, Vec3, Vec4};

/// Unique identifier for a render object.
pub type ObjectId = u32;

/// Convert a `0xRRGGBB` color plus alpha into linear RGBA components.
pub fn hex_color(hex: u32, alpha: f32) -> Vec4 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec4::new(r, g, b, alpha)
}

/// Transform for positioning objects in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(t: Vec3) -> Self {
        Self {
            translation: t,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Build the model matrix (Translation * Rotation * Scale).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Mesh primitive types.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshType {
    /// Unit cube, sized through the transform scale.
    Cuboid,
    Sphere { radius: f32, segments: u16 },
    /// Unit plane on the XZ axes, double-sided.
    Plane,
    /// Square line grid on the XZ plane.
    Grid { size: f32, divisions: u16 },
    /// Point cloud in world coordinates.
    Points { positions: Vec<Vec3>, size: f32 },
}

/// Flat-shaded material. Opacity below 1 means the object is blended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec4,
    pub wireframe: bool,
    /// Draw an edge outline on top of the solid faces.
    pub outlined: bool,
}

impl Material {
    pub fn unlit(color: Vec4) -> Self {
        Self {
            color,
            wireframe: false,
            outlined: false,
        }
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    pub fn with_outline(mut self, outlined: bool) -> Self {
        self.outlined = outlined;
        self
    }

    pub fn opacity(&self) -> f32 {
        self.color.w
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.color.w = opacity.clamp(0.0, 1.0);
    }

    /// Replace the RGB part and keep the current opacity.
    pub fn set_rgb(&mut self, hex: u32) {
        let alpha = self.color.w;
        self.color = hex_color(hex, alpha);
    }
}

/// A renderable object in the scene.
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub id: ObjectId,
    pub name: Option<&'static str>,
    pub mesh: MeshType,
    pub material: Material,
    pub transform: Transform,
    pub visible: bool,
}

/// Flat scene graph, no hierarchy.
pub struct Scene {
    objects: Vec<RenderObject>,
    next_id: ObjectId,
    /// Clear color presented behind every object.
    pub background: Vec4,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(512),
            next_id: 1,
            background: hex_color(0x000000, 1.0),
        }
    }

    /// Add an object to the scene, returning its ID.
    pub fn add(&mut self, mesh: MeshType, material: Material, transform: Transform) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(RenderObject {
            id,
            name: None,
            mesh,
            material,
            transform,
            visible: true,
        });
        id
    }

    /// Add an object that can later be found with [`Scene::find_by_name`].
    pub fn add_named(
        &mut self,
        name: &'static str,
        mesh: MeshType,
        material: Material,
        transform: Transform,
    ) -> ObjectId {
        let id = self.add(mesh, material, transform);
        if let Some(obj) = self.get_mut(id) {
            obj.name = Some(name);
        }
        id
    }

    /// Get a mutable reference to an object by ID.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut RenderObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Get an object by ID.
    pub fn get(&self, id: ObjectId) -> Option<&RenderObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// First object added under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&RenderObject> {
        self.objects.iter().find(|o| o.name == Some(name))
    }

    /// Iterate over all visible objects.
    pub fn visible_objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.objects.iter().filter(|o| o.visible)
    }

    /// Number of objects, hidden ones included.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// First-person camera: eye position plus yaw around +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub yaw: f32,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraView {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            fov_deg: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.yaw), self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space direction the camera looks along (local -Z).
    pub fn look_direction(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_add_and_get() {
        let mut scene = Scene::new();
        let id = scene.add(
            MeshType::Cuboid,
            Material::unlit(Vec4::ONE),
            Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        );
        let obj = scene.get(id).expect("object should exist");
        assert_eq!(obj.transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.object_count(), 1);
    }

    #[test]
    fn named_objects_are_findable() {
        let mut scene = Scene::new();
        scene.add(MeshType::Plane, Material::unlit(Vec4::ONE), Transform::default());
        let id = scene.add_named(
            "marker",
            MeshType::Sphere {
                radius: 3.0,
                segments: 32,
            },
            Material::unlit(Vec4::ONE),
            Transform::default(),
        );
        assert_eq!(scene.find_by_name("marker").map(|o| o.id), Some(id));
        assert!(scene.find_by_name("missing").is_none());
    }

    #[test]
    fn visible_objects_filters() {
        let mut scene = Scene::new();
        let a = scene.add(MeshType::Cuboid, Material::unlit(Vec4::ONE), Transform::default());
        scene.add(MeshType::Cuboid, Material::unlit(Vec4::ONE), Transform::default());
        if let Some(obj) = scene.get_mut(a) {
            obj.visible = false;
        }
        assert_eq!(scene.visible_objects().count(), 1);
    }

    #[test]
    fn hex_color_components() {
        let c = hex_color(0x00ff00, 0.3);
        assert_eq!(c, Vec4::new(0.0, 1.0, 0.0, 0.3));
        let gray = hex_color(0x444444, 1.0);
        assert!((gray.x - 68.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn material_set_rgb_keeps_opacity() {
        let mut m = Material::unlit(hex_color(0x000000, 0.2));
        m.set_rgb(0x00ff00);
        assert_eq!(m.opacity(), 0.2);
        m.set_opacity(4.0);
        assert_eq!(m.opacity(), 1.0);
    }

    #[test]
    fn transform_matrix_translation() {
        let t = Transform::from_translation(Vec3::new(5.0, 0.0, -2.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(5.0, 0.0, -2.0)).length() < 1e-6);
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let cam = CameraView::new(Vec3::new(3.0, 1.7, -4.0), 0.8);
        let p = cam.view_matrix().transform_point3(cam.position);
        assert!(p.length() < 1e-5, "eye should map to origin, got {p}");
    }

    #[test]
    fn look_direction_follows_yaw() {
        let cam = CameraView::new(Vec3::ZERO, 0.0);
        assert!((cam.look_direction() - Vec3::NEG_Z).length() < 1e-6);

        let turned = CameraView::new(Vec3::ZERO, std::f32::consts::FRAC_PI_2);
        assert!((turned.look_direction() - Vec3::NEG_X).length() < 1e-5);
    }
}
