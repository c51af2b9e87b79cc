//! Per-entity behavior updated once per frame.
//!
//! - `model` renders an imported model attached to the entity
//! - `script` drives the entity from a Lua script

use crate::{data_structures::entity::EntityRef, frame::FrameParams};

pub mod model;
pub mod script;

pub trait Component {
    /// The entity this component is attached to.
    fn entity(&self) -> &EntityRef;

    fn update(&mut self, params: &FrameParams);
}
