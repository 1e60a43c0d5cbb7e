use std::collections::{HashMap, VecDeque};
use cgmath::SquareMatrix;

use super::model::{DrawModel, Material, MeshUniform};
use super::object::Object;

pub struct Scene {
    objects: HashMap<String, Object>,
    root: String,
    materials: Vec<Material>,
}

impl Scene {
    pub fn new() -> Self {
        let mut objects = HashMap::new();
        let root_object = Object::new();
        let root = root_object.id.clone();
        objects.insert(root.clone(), root_object);
        Self {
            objects,
            root,
            materials: Vec::new(),
        }
    }
    /// Add `Object` to internal Scene HashMap, it will set `root` as parent if None was defined
    pub fn add(&mut self, mut object: Object) {
        if object.parent.is_none() {
            object.parent = Some(self.root.clone());
            if let Some(root) = self.objects.get_mut(&self.root) {
                root.childrens.push(object.id.clone());
            }
        }
        self.objects.insert(object.id.clone(), object);
    }
    pub fn add_materials(&mut self, materials: Vec<Material>) {
        self.materials.extend(materials);
    }
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }
    pub fn get(&self, object_id: &str) -> Option<&Object> {
        self.objects.get(object_id)
    }
    pub fn find_by_name(&self, name: &str) -> Option<&Object> {
        self.objects
            .values()
            .find(|object| object.name.as_deref() == Some(name))
    }
    pub fn len(&self) -> usize {
        self.objects.len()
    }
    pub fn traverse_mut(&mut self, mut callback: impl FnMut(&mut Object)) {
        for object in self.objects.values_mut() {
            callback(object);
        }
    }
    /// Flags named objects, returns how many objects were matched.
    pub fn apply_shadow_flags(&mut self, casters: &[String], receivers: &[String]) -> usize {
        let mut matched = 0;
        self.traverse_mut(|object| {
            let Some(name) = object.name.as_ref() else { return };
            if casters.contains(name) {
                object.cast_shadow = true;
                object.receive_shadow = true;
                matched += 1;
            }
            if receivers.contains(name) {
                object.receive_shadow = true;
                matched += 1;
            }
        });
        matched
    }
    pub fn compute_world_matrices(&mut self) {
        let mut queue = VecDeque::new();
        queue.push_back((self.root.clone(), cgmath::Matrix4::<f32>::identity().into()));
        while let Some((current_id, parent_world)) = queue.pop_front() {
            if let Some(current_object) = self.objects.get_mut(&current_id) {
                current_object.compute_matrix_world(Some(parent_world));
                for child_id in &current_object.childrens {
                    queue.push_back((child_id.clone(), current_object.matrix_world));
                }
            }
        }
    }
    pub fn update_objects_buffers(&self, queue: &wgpu::Queue) {
        for object in self.objects.values() {
            if let Some(model) = object.get_model() {
                for mesh in &model.meshes {
                    let uniform = MeshUniform::new(object.matrix_world, mesh.base_color, object.receive_shadow);
                    queue.write_buffer(&mesh.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
                }
            }
        }
    }
}

pub trait DrawScene<'a> {
    fn draw_scene(&mut self, scene: &'a Scene);
    /// Only draws shadow casters.
    fn draw_scene_shadows(&mut self, scene: &'a Scene);
}

impl<'a, 'b> DrawScene<'b> for wgpu::RenderPass<'a>
where 
    'b: 'a,
{
    fn draw_scene(&mut self, scene: &'b Scene) {
        for object in scene.objects.values() {
            if let Some(model) = object.get_model() {
                self.draw_model(model);
            }
        }
    }

    fn draw_scene_shadows(&mut self, scene: &'b Scene) {
        for object in scene.objects.values().filter(|object| object.cast_shadow) {
            if let Some(model) = object.get_model() {
                self.draw_model_shadow(model);
            }
        }
    }
}
