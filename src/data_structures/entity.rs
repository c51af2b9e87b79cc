//! The game object components attach to.

use std::{cell::RefCell, rc::Rc};

use crate::data_structures::instance::Instance;

/// Entities are shared between the components attached to them.
pub type EntityRef = Rc<RefCell<Entity>>;

#[derive(Clone, Debug, Default)]
pub struct Entity {
    name: String,
    transform: Instance,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Instance::new(),
        }
    }

    pub fn into_ref(self) -> EntityRef {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Instance {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Instance) {
        self.transform = transform;
    }

    pub fn position(&self) -> cgmath::Vector3<f32> {
        self.transform.position
    }

    pub fn world_transform(&self) -> cgmath::Matrix4<f32> {
        self.transform.to_matrix()
    }

    pub fn translate(&mut self, delta: cgmath::Vector3<f32>) {
        self.transform.position += delta;
    }
}
