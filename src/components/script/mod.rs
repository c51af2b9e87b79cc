//! Lua scripts attached to entities.
//!
//! A script is a Lua chunk that defines a global `update(component, params)`
//! function. The chunk runs once when the component is created; afterwards
//! `update` is looked up and called once per frame, so a script may redefine
//! it while running. Scripts talk to the engine through the functions in
//! [`bindings`] and the opaque [`handle::Handle`]s passed to them.

use std::rc::Rc;

use log::{error, info, warn};
use mlua::{AnyUserData, Lua, LuaOptions, StdLib, Value};
use thiserror::Error;

use crate::{
    components::Component,
    context::{Context, ScriptErrorPolicy},
    data_structures::entity::EntityRef,
    frame::FrameParams,
    resources,
};

pub mod bindings;
pub mod handle;

use handle::Handle;

/// Name of the global function called every frame.
pub const ENTRY_POINT: &str = "update";

/// Standard libraries opened for scripts. `io` and `os` stay closed so a
/// script can't reach the file system or spawn processes.
pub fn sandbox_libs() -> StdLib {
    StdLib::ALL_SAFE ^ (StdLib::IO | StdLib::OS)
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to load script {path}: {cause:#}")]
    Read { path: String, cause: anyhow::Error },
    #[error("Couldn't create an interpreter for script {path}: {source}")]
    Interpreter {
        path: String,
        #[source]
        source: mlua::Error,
    },
    #[error("Failed to compile script {path}: {source}")]
    Compile {
        path: String,
        #[source]
        source: mlua::Error,
    },
    #[error("Script {path} does not contain an 'update' function.")]
    MissingEntryPoint { path: String },
    #[error("Couldn't expose the engine to script {path}: {source}")]
    Bind {
        path: String,
        #[source]
        source: mlua::Error,
    },
    #[error("Error in script {path}: {source}")]
    Runtime {
        path: String,
        #[source]
        source: mlua::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStatus {
    Loaded,
    Failed,
}

struct LoadedScript {
    lua: Lua,
    /// Created once so scripts see the same component handle every frame.
    component: AnyUserData,
}

enum ScriptState {
    Loaded(LoadedScript),
    Failed,
}

impl LoadedScript {
    fn load(path: &str, source: &str, entity: &EntityRef) -> Result<Self, ScriptError> {
        let lua = Lua::new_with(sandbox_libs(), LuaOptions::default()).map_err(|source| {
            ScriptError::Interpreter {
                path: path.to_string(),
                source,
            }
        })?;
        let chunk = lua
            .load(source)
            .set_name(format!("@{path}"))
            .into_function()
            .map_err(|source| ScriptError::Compile {
                path: path.to_string(),
                source,
            })?;
        // the chunk may fail halfway and still have defined `update`
        if let Err(e) = chunk.call::<()>(()) {
            error!("Error while running script {path}: {e}");
        }
        if !matches!(lua.globals().get::<Value>(ENTRY_POINT), Ok(Value::Function(_))) {
            return Err(ScriptError::MissingEntryPoint {
                path: path.to_string(),
            });
        }

        let bind = |source| ScriptError::Bind {
            path: path.to_string(),
            source,
        };
        bindings::register(&lua, path).map_err(bind)?;
        let component = lua
            .create_userdata(Handle::Component(Rc::clone(entity)))
            .map_err(bind)?;
        Ok(Self { lua, component })
    }

    fn call_update(&self, params: &FrameParams) -> mlua::Result<()> {
        let update = match self.lua.globals().get::<Value>(ENTRY_POINT)? {
            Value::Function(update) => update,
            other => {
                return Err(mlua::Error::RuntimeError(format!(
                    "global '{ENTRY_POINT}' is a {} instead of a function",
                    other.type_name()
                )));
            }
        };
        let params = self.lua.create_userdata(Handle::FrameParams(*params))?;
        update.call::<()>((self.component.clone(), params))
    }
}

/// Runs one script against the entity it is attached to.
///
/// Loading never fails outright: an unreadable file, a syntax error or a
/// missing `update` is logged and leaves the component permanently inert.
/// What a runtime error in `update` does is decided by the
/// [`ScriptErrorPolicy`].
pub struct LuaComponent {
    entity: EntityRef,
    path: String,
    policy: ScriptErrorPolicy,
    state: ScriptState,
}

impl LuaComponent {
    /// Loads `path` relative to the context's asset root.
    pub fn new(entity: EntityRef, ctx: &Context, path: &str) -> Self {
        let script = resources::load_string(ctx, path)
            .map_err(|cause| ScriptError::Read {
                path: path.to_string(),
                cause,
            })
            .and_then(|source| LoadedScript::load(path, &source, &entity));
        Self::with_script(entity, path, ctx.script_error_policy(), script)
    }

    /// Loads a script from memory; `name` is used in diagnostics.
    pub fn from_source(
        entity: EntityRef,
        name: &str,
        source: &str,
        policy: ScriptErrorPolicy,
    ) -> Self {
        let script = LoadedScript::load(name, source, &entity);
        Self::with_script(entity, name, policy, script)
    }

    fn with_script(
        entity: EntityRef,
        path: &str,
        policy: ScriptErrorPolicy,
        script: Result<LoadedScript, ScriptError>,
    ) -> Self {
        let state = match script {
            Ok(script) => {
                info!("Loaded script {path}");
                ScriptState::Loaded(script)
            }
            Err(e) => {
                error!("{e}");
                ScriptState::Failed
            }
        };
        Self {
            entity,
            path: path.to_string(),
            policy,
            state,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status(&self) -> ScriptStatus {
        match self.state {
            ScriptState::Loaded(_) => ScriptStatus::Loaded,
            ScriptState::Failed => ScriptStatus::Failed,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status() == ScriptStatus::Loaded
    }

    /// The interpreter of a loaded script, for inspecting its globals.
    pub fn lua(&self) -> Option<&Lua> {
        match &self.state {
            ScriptState::Loaded(script) => Some(&script.lua),
            ScriptState::Failed => None,
        }
    }
}

impl Component for LuaComponent {
    fn entity(&self) -> &EntityRef {
        &self.entity
    }

    fn update(&mut self, params: &FrameParams) {
        let ScriptState::Loaded(script) = &self.state else {
            return;
        };
        let Err(source) = script.call_update(params) else {
            return;
        };
        let e = ScriptError::Runtime {
            path: self.path.clone(),
            source,
        };
        error!("{e}");
        match self.policy {
            ScriptErrorPolicy::Panic => panic!("{e}"),
            ScriptErrorPolicy::Disable => {
                warn!("Disabling script {}", self.path);
                self.state = ScriptState::Failed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::entity::Entity;

    fn load(source: &str) -> LuaComponent {
        LuaComponent::from_source(
            Entity::new("e").into_ref(),
            "test.lua",
            source,
            ScriptErrorPolicy::Disable,
        )
    }

    #[test]
    fn syntax_error_fails_loading() {
        let script = load("function update(c, p) end end");
        assert_eq!(script.status(), ScriptStatus::Failed);
        assert!(script.lua().is_none());
    }

    #[test]
    fn script_without_update_fails_loading() {
        let script = load("x = 1");
        assert_eq!(script.status(), ScriptStatus::Failed);
    }

    #[test]
    fn update_defined_before_a_chunk_error_still_loads() {
        let script = load("function update(c, p) end\nerror('boom')");
        assert_eq!(script.status(), ScriptStatus::Loaded);
    }

    #[test]
    fn io_and_os_are_not_reachable() {
        let script = load("function update(c, p) end\nsandboxed = io == nil and os == nil");
        let lua = script.lua().unwrap();
        assert!(lua.globals().get::<bool>("sandboxed").unwrap());
        assert!(lua.globals().get::<mlua::Value>("string").unwrap().is_table());
    }

    #[test]
    fn update_that_is_not_a_function_fails_loading() {
        let script = load("update = 3");
        assert_eq!(script.status(), ScriptStatus::Failed);
    }
}
