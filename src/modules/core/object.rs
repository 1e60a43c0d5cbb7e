use cgmath::SquareMatrix;

use super::model::Model;

pub fn generate_unique_string() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub struct Object {
    pub id: String,
    pub name: Option<String>,
    pub parent: Option<String>,
    pub childrens: Vec<String>,
    pub matrix: [[f32; 4]; 4],
    pub matrix_world: [[f32; 4]; 4],
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    model: Option<Model>,
}

impl Object {
    pub fn new() -> Self {
        Self {
            id: generate_unique_string(),
            name: None,
            parent: None,
            childrens: Vec::new(),
            matrix: cgmath::Matrix4::identity().into(),
            matrix_world: cgmath::Matrix4::identity().into(),
            cast_shadow: false,
            receive_shadow: false,
            model: None,
        }
    }
    pub fn named(name: &str) -> Self {
        let mut object = Self::new();
        object.name = Some(name.to_string());
        object
    }
    pub fn set_model(&mut self, model: Model) {
        self.model = Some(model);
    }
    pub fn get_model(&self) -> Option<&Model> {
        self.model.as_ref()
    }
    pub fn add_child(&mut self, child: &mut Object) {
        child.parent = Some(self.id.clone());
        self.childrens.push(child.id.clone());
    }
    pub fn compute_matrix_world(&mut self, parent_matrix: Option<[[f32; 4]; 4]>) {
        if let Some(parent_matrix) = parent_matrix {
            let parent_matrix_world = cgmath::Matrix4::from(parent_matrix);
            let local_matrix = cgmath::Matrix4::from(self.matrix);
            self.matrix_world = (parent_matrix_world * local_matrix).into();
        } else {
            self.matrix_world = self.matrix;
        }
    }
}
