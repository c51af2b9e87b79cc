//! Opaque references handed to scripts.
//!
//! Scripts only ever see a handle as userdata they can pass back. Every
//! handle carries its kind, so a native function can tell an entity from a
//! frame record instead of trusting argument positions.

use std::fmt;

use mlua::{MetaMethod, UserData, UserDataMethods};

use crate::{data_structures::entity::EntityRef, frame::FrameParams};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
    Component,
    Entity,
    FrameParams,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandleKind::Component => "component",
            HandleKind::Entity => "entity",
            HandleKind::FrameParams => "frame params",
        })
    }
}

#[derive(Clone)]
pub enum Handle {
    /// The script component itself; resolves to the entity it is attached to.
    Component(EntityRef),
    Entity(EntityRef),
    /// Copy of the current frame's parameters.
    FrameParams(FrameParams),
}

impl Handle {
    pub fn kind(&self) -> HandleKind {
        match self {
            Handle::Component(_) => HandleKind::Component,
            Handle::Entity(_) => HandleKind::Entity,
            Handle::FrameParams(_) => HandleKind::FrameParams,
        }
    }
}

impl UserData for Handle {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!("{} handle", this.kind()))
        });
    }
}
