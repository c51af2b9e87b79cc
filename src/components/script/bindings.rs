//! Native functions callable from scripts.
//!
//! Each binding checks its argument count and handle kinds. A mismatch is
//! logged and the script gets a harmless default back (`false`, `nil` or
//! nothing) so one bad call does not abort the whole `update`.

use std::rc::Rc;

use log::warn;
use mlua::{Function, IntoLuaMulti, Lua, MultiValue, Value};
use thiserror::Error;

use crate::{
    components::script::handle::{Handle, HandleKind},
    data_structures::entity::EntityRef,
    frame::{Buttons, FrameParams},
};

pub const FRAME_PARAMS_GET_INPUT_LEFT: &str = "frame_params_get_input_left";
pub const FRAME_PARAMS_GET_INPUT_RIGHT: &str = "frame_params_get_input_right";
pub const COMPONENT_GET_ENTITY: &str = "component_get_entity";
pub const ENTITY_TRANSLATE: &str = "entity_translate";

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("Function {function} expected {expected} argument(s) but got {got}.")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Function {function} expected a {expected} handle as argument {position} but got {found}.")]
    WrongHandle {
        function: &'static str,
        position: usize,
        expected: HandleKind,
        found: String,
    },
    #[error("Function {function} couldn't modify the entity, it is borrowed elsewhere.")]
    EntityBusy { function: &'static str },
    #[error(transparent)]
    Lua(#[from] mlua::Error),
}

type Binding<R> = fn(&Lua, &[Value]) -> Result<R, BindingError>;

/// Installs all bindings as globals of `lua`. `script` names the script in
/// diagnostics.
pub(crate) fn register(lua: &Lua, script: &str) -> mlua::Result<()> {
    let script: Rc<str> = Rc::from(script);
    let globals = lua.globals();
    globals.set(
        FRAME_PARAMS_GET_INPUT_LEFT,
        native(lua, &script, frame_params_get_input_left, false)?,
    )?;
    globals.set(
        FRAME_PARAMS_GET_INPUT_RIGHT,
        native(lua, &script, frame_params_get_input_right, false)?,
    )?;
    globals.set(
        COMPONENT_GET_ENTITY,
        native(lua, &script, component_get_entity, Value::Nil)?,
    )?;
    globals.set(ENTITY_TRANSLATE, native(lua, &script, entity_translate, ())?)?;
    Ok(())
}

fn native<R>(lua: &Lua, script: &Rc<str>, binding: Binding<R>, fallback: R) -> mlua::Result<Function>
where
    R: IntoLuaMulti + Clone + 'static,
{
    let script = Rc::clone(script);
    lua.create_function(move |lua, args: MultiValue| {
        let args = args.into_iter().collect::<Vec<Value>>();
        match binding(lua, &args) {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("{}", diagnostic(&script, &e));
                Ok(fallback.clone())
            }
        }
    })
}

/// Warning logged when a script misuses a binding.
pub fn diagnostic(script: &str, error: &BindingError) -> String {
    format!("Script {script}: {error}")
}

pub fn frame_params_get_input_left(_: &Lua, args: &[Value]) -> Result<bool, BindingError> {
    expect_args(FRAME_PARAMS_GET_INPUT_LEFT, 1, args)?;
    let params = frame_params(FRAME_PARAMS_GET_INPUT_LEFT, &args[0])?;
    Ok(params.is_pressed(Buttons::LEFT))
}

pub fn frame_params_get_input_right(_: &Lua, args: &[Value]) -> Result<bool, BindingError> {
    expect_args(FRAME_PARAMS_GET_INPUT_RIGHT, 1, args)?;
    let params = frame_params(FRAME_PARAMS_GET_INPUT_RIGHT, &args[0])?;
    Ok(params.is_pressed(Buttons::RIGHT))
}

pub fn component_get_entity(lua: &Lua, args: &[Value]) -> Result<Value, BindingError> {
    expect_args(COMPONENT_GET_ENTITY, 1, args)?;
    let entity = expect_handle(COMPONENT_GET_ENTITY, 1, &args[0], HandleKind::Component, |h| match h {
        Handle::Component(entity) => Some(entity.clone()),
        _ => None,
    })?;
    Ok(Value::UserData(lua.create_userdata(Handle::Entity(entity))?))
}

pub fn entity_translate(lua: &Lua, args: &[Value]) -> Result<(), BindingError> {
    expect_args(ENTITY_TRANSLATE, 4, args)?;
    let entity: EntityRef = expect_handle(ENTITY_TRANSLATE, 1, &args[0], HandleKind::Entity, |h| match h {
        Handle::Entity(entity) => Some(entity.clone()),
        _ => None,
    })?;
    let delta = cgmath::Vector3::new(
        to_number(lua, &args[1])?,
        to_number(lua, &args[2])?,
        to_number(lua, &args[3])?,
    );
    entity
        .try_borrow_mut()
        .map_err(|_| BindingError::EntityBusy {
            function: ENTITY_TRANSLATE,
        })?
        .translate(delta);
    Ok(())
}

fn expect_args(function: &'static str, expected: usize, args: &[Value]) -> Result<(), BindingError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(BindingError::ArgumentCount {
            function,
            expected,
            got: args.len(),
        })
    }
}

/// Unwraps the handle passed as argument `position` (1-based, like Lua's
/// own argument numbers) with `extract`, which yields `None` for every kind
/// but `expected`.
fn expect_handle<T>(
    function: &'static str,
    position: usize,
    value: &Value,
    expected: HandleKind,
    extract: impl Fn(&Handle) -> Option<T>,
) -> Result<T, BindingError> {
    let wrong = |found: String| BindingError::WrongHandle {
        function,
        position,
        expected,
        found,
    };
    let Value::UserData(userdata) = value else {
        return Err(wrong(value.type_name().to_string()));
    };
    let handle = userdata
        .borrow::<Handle>()
        .map_err(|_| wrong("foreign userdata".to_string()))?;
    extract(&*handle).ok_or_else(|| wrong(format!("{} handle", handle.kind())))
}

fn frame_params(function: &'static str, value: &Value) -> Result<FrameParams, BindingError> {
    expect_handle(function, 1, value, HandleKind::FrameParams, |h| match h {
        Handle::FrameParams(params) => Some(*params),
        _ => None,
    })
}

/// Converts like `lua_tonumber`; values without a number reading become 0.
fn to_number(lua: &Lua, value: &Value) -> Result<f32, BindingError> {
    Ok(lua.coerce_number(value.clone())?.unwrap_or(0.0) as f32)
}
