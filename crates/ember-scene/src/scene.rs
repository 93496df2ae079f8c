//! Retained-mode scene: objects registered by handle, drawn by a `Renderer`

use ember_core::{Color, ObjectId, Vec3};
use std::collections::BTreeMap;

/// Which group an object belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// One object per live particle
    Particles,
    /// Editor-style helpers such as the spawn volume box
    Helpers,
}

/// Geometry of a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Flat disc of unit radius (scaled by the object's scale), facing `SceneObject::facing`
    Disc,
    /// Unit cube outline centred on the object's position
    WireBox,
}

/// Everything needed to register a new object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualDesc {
    pub shape: Shape,
    pub layer: Layer,
    pub position: Vec3,
    pub scale: Vec3,
    pub color: Color,
    pub visible: bool,
}

impl VisualDesc {
    /// A visible disc in the particle layer
    pub fn disc(position: Vec3, radius: f32, color: Color) -> Self {
        Self {
            shape: Shape::Disc,
            layer: Layer::Particles,
            position,
            scale: Vec3::splat(radius),
            color,
            visible: true,
        }
    }

    /// A hidden wireframe box in the helper layer
    pub fn wire_box(center: Vec3, extents: Vec3, color: Color) -> Self {
        Self {
            shape: Shape::WireBox,
            layer: Layer::Helpers,
            position: center,
            scale: extents,
            color,
            visible: false,
        }
    }
}

/// Owned handle to an object registered with a scene.
///
/// Not `Clone`: exactly one owner can hand it back to `SceneGraph::remove`,
/// which consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a VisualHandle leaves its object in the scene"]
pub struct VisualHandle {
    id: ObjectId,
}

impl VisualHandle {
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

/// State of one registered object
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub shape: Shape,
    pub layer: Layer,
    pub position: Vec3,
    pub scale: Vec3,
    /// Unit normal of the object's front face
    pub facing: Vec3,
    pub color: Color,
    pub visible: bool,
}

impl SceneObject {
    fn from_desc(desc: VisualDesc) -> Self {
        Self {
            shape: desc.shape,
            layer: desc.layer,
            position: desc.position,
            scale: desc.scale,
            facing: Vec3::FORWARD,
            color: desc.color,
            visible: desc.visible,
        }
    }

    /// Right and up axes of the object's front face, scaled by its size
    pub fn billboard_axes(&self) -> (Vec3, Vec3) {
        let (right, up) = self.facing.plane_axes();
        (right * self.scale.x, up * self.scale.y)
    }
}

/// The contract the particle core needs from a scene graph
pub trait SceneGraph {
    /// Register a new object and return its owned handle
    fn add(&mut self, desc: VisualDesc) -> VisualHandle;

    /// Unregister an object, consuming its handle
    fn remove(&mut self, handle: VisualHandle);

    fn set_position(&mut self, handle: &VisualHandle, position: Vec3);

    /// Turn the object's front face toward `point`
    fn orient_towards(&mut self, handle: &VisualHandle, point: Vec3);

    fn set_scale(&mut self, handle: &VisualHandle, scale: Vec3);

    fn set_color(&mut self, handle: &VisualHandle, color: Color);

    fn set_visible(&mut self, handle: &VisualHandle, visible: bool);
}

/// In-memory retained scene, iterated in registration order
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    next_id: ObjectId,
    clear_color: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: ObjectId::from_raw(1),
            clear_color: Color::BLACK,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// All registered objects, oldest first
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(&id, obj)| (id, obj))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects registered in `layer`
    pub fn count(&self, layer: Layer) -> usize {
        self.objects.values().filter(|o| o.layer == layer).count()
    }

    /// Number of visible objects in `layer`
    pub fn visible_count(&self, layer: Layer) -> usize {
        self.objects
            .values()
            .filter(|o| o.layer == layer && o.visible)
            .count()
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn object_mut(&mut self, handle: &VisualHandle) -> Option<&mut SceneObject> {
        let obj = self.objects.get_mut(&handle.id);
        if obj.is_none() {
            tracing::warn!("handle {} does not belong to this scene", handle.id);
        }
        obj
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for Scene {
    fn add(&mut self, desc: VisualDesc) -> VisualHandle {
        let id = self.next_id;
        self.next_id = id.next();
        self.objects.insert(id, SceneObject::from_desc(desc));
        VisualHandle { id }
    }

    fn remove(&mut self, handle: VisualHandle) {
        if self.objects.remove(&handle.id).is_none() {
            tracing::warn!("removing unknown scene object {}", handle.id);
        }
    }

    fn set_position(&mut self, handle: &VisualHandle, position: Vec3) {
        if let Some(obj) = self.object_mut(handle) {
            obj.position = position;
        }
    }

    fn orient_towards(&mut self, handle: &VisualHandle, point: Vec3) {
        let Some(obj) = self.object_mut(handle) else {
            return;
        };
        let dir = (point - obj.position).normalized();
        // Leave the orientation alone when the target sits on the object
        if dir != Vec3::ZERO {
            obj.facing = dir;
        }
    }

    fn set_scale(&mut self, handle: &VisualHandle, scale: Vec3) {
        if let Some(obj) = self.object_mut(handle) {
            obj.scale = scale;
        }
    }

    fn set_color(&mut self, handle: &VisualHandle, color: Color) {
        if let Some(obj) = self.object_mut(handle) {
            obj.color = color;
        }
    }

    fn set_visible(&mut self, handle: &VisualHandle, visible: bool) {
        if let Some(obj) = self.object_mut(handle) {
            obj.visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut scene = Scene::new();
        let a = scene.add(VisualDesc::disc(Vec3::ZERO, 0.1, Color::RED));
        let b = scene.add(VisualDesc::disc(Vec3::ONE, 0.1, Color::GREEN));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.count(Layer::Particles), 2);

        let a_id = a.id();
        scene.remove(a);
        assert!(scene.get(a_id).is_none());
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(b.id()).unwrap().color, Color::GREEN);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut scene = Scene::new();
        let a = scene.add(VisualDesc::disc(Vec3::ZERO, 0.1, Color::RED));
        let first = a.id();
        scene.remove(a);
        let b = scene.add(VisualDesc::disc(Vec3::ZERO, 0.1, Color::RED));
        assert!(b.id() > first);
    }

    #[test]
    fn objects_iterate_in_registration_order() {
        let mut scene = Scene::new();
        let handles: Vec<_> = (0..5)
            .map(|i| scene.add(VisualDesc::disc(Vec3::new(i as f32, 0.0, 0.0), 0.1, Color::RED)))
            .collect();
        let xs: Vec<f32> = scene.objects().map(|(_, o)| o.position.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        for h in handles {
            scene.remove(h);
        }
        assert!(scene.is_empty());
    }

    #[test]
    fn orient_towards_faces_target() {
        let mut scene = Scene::new();
        let h = scene.add(VisualDesc::disc(Vec3::new(0.0, 0.0, 0.0), 1.0, Color::RED));
        scene.orient_towards(&h, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(scene.get(h.id()).unwrap().facing, Vec3::RIGHT);

        // Target on top of the object keeps the previous facing
        scene.orient_towards(&h, Vec3::ZERO);
        assert_eq!(scene.get(h.id()).unwrap().facing, Vec3::RIGHT);
        scene.remove(h);
    }

    #[test]
    fn visibility_is_tracked_per_layer() {
        let mut scene = Scene::new();
        let particle = scene.add(VisualDesc::disc(Vec3::ZERO, 0.1, Color::RED));
        let helper = scene.add(VisualDesc::wire_box(Vec3::ZERO, Vec3::ONE, Color::WHITE));
        assert_eq!(scene.visible_count(Layer::Particles), 1);
        assert_eq!(scene.visible_count(Layer::Helpers), 0);

        scene.set_visible(&helper, true);
        scene.set_visible(&particle, false);
        assert_eq!(scene.visible_count(Layer::Particles), 0);
        assert_eq!(scene.visible_count(Layer::Helpers), 1);
        assert_eq!(scene.count(Layer::Particles), 1);
        scene.remove(particle);
        scene.remove(helper);
    }

    #[test]
    fn billboard_axes_scale_with_object() {
        let mut scene = Scene::new();
        let h = scene.add(VisualDesc::disc(Vec3::ZERO, 0.5, Color::RED));
        let (right, up) = scene.get(h.id()).unwrap().billboard_axes();
        assert!((right - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
        assert!((up - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);
        scene.remove(h);
    }
}
