use cgmath::Vector3;
use scene_ngin::{
    components::{
        Component,
        script::{LuaComponent, ScriptStatus},
    },
    context::ScriptErrorPolicy,
    frame::Buttons,
};

use crate::common::test_utils::{entity, fixtures, frame, init_logger};

mod common;

fn from_source(source: &str, policy: ScriptErrorPolicy) -> LuaComponent {
    init_logger();
    LuaComponent::from_source(entity("scripted"), "inline.lua", source, policy)
}

fn global<T: mlua::FromLua>(script: &LuaComponent, name: &str) -> T {
    script.lua().unwrap().globals().get::<T>(name).unwrap()
}

#[test]
fn script_steers_its_entity_with_input() {
    let owner = entity("ship");
    let mut script = LuaComponent::new(owner.clone(), &fixtures(), "scripts/steer.lua");
    assert_eq!(script.status(), ScriptStatus::Loaded);

    script.update(&frame(Buttons::RIGHT));
    script.update(&frame(Buttons::RIGHT));
    script.update(&frame(Buttons::empty()));
    script.update(&frame(Buttons::LEFT));

    assert_eq!(owner.borrow().position(), Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn update_runs_once_per_frame_with_a_stable_component_handle() {
    let mut script = LuaComponent::new(entity("counted"), &fixtures(), "scripts/counter.lua");

    for _ in 0..3 {
        script.update(&frame(Buttons::empty()));
    }

    assert_eq!(global::<i64>(&script, "calls"), 3);
    assert!(global::<bool>(&script, "same_component"));
}

#[test]
fn script_without_update_is_inert() {
    let owner = entity("idle");
    let mut script = LuaComponent::new(owner.clone(), &fixtures(), "scripts/no_update.lua");

    assert_eq!(script.status(), ScriptStatus::Failed);
    script.update(&frame(Buttons::LEFT));
    assert_eq!(owner.borrow().position(), Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn syntax_error_leaves_the_component_inert() {
    let script = LuaComponent::new(entity("broken"), &fixtures(), "scripts/broken.lua");
    assert_eq!(script.status(), ScriptStatus::Failed);
    assert!(!script.is_enabled());
}

#[test]
fn missing_script_file_leaves_the_component_inert() {
    let mut script = LuaComponent::new(entity("lost"), &fixtures(), "scripts/nope.lua");
    assert_eq!(script.status(), ScriptStatus::Failed);
    script.update(&frame(Buttons::empty()));
}

#[test]
fn bad_binding_call_is_skipped_and_the_script_continues() {
    let mut script = from_source(
        r#"
        function update(component, params)
            local entity = component_get_entity(component)
            entity_translate(entity, 1, 2)
            entity_translate(params, 1, 2, 3)
            missing = component_get_entity()
            left = frame_params_get_input_left(component)
            entity_translate(entity, 0, "2", 0)
            reached_end = true
        end
        "#,
        ScriptErrorPolicy::Disable,
    );
    let owner = script.entity().clone();

    script.update(&frame(Buttons::LEFT));

    assert!(script.is_enabled());
    assert!(global::<bool>(&script, "reached_end"));
    assert!(!global::<bool>(&script, "left"));
    assert!(global::<mlua::Value>(&script, "missing").is_nil());
    assert_eq!(owner.borrow().position(), Vector3::new(0.0, 2.0, 0.0));
}

#[test]
fn redefined_update_takes_effect_next_frame() {
    let mut script = from_source(
        r#"
        version = 0
        function update(component, params)
            version = 1
            function update(component, params)
                version = 2
            end
        end
        "#,
        ScriptErrorPolicy::Disable,
    );

    script.update(&frame(Buttons::empty()));
    assert_eq!(global::<i64>(&script, "version"), 1);
    script.update(&frame(Buttons::empty()));
    assert_eq!(global::<i64>(&script, "version"), 2);
}

#[test]
fn runtime_error_disables_the_script_by_default() {
    let mut script = from_source(
        r#"
        calls = 0
        function update(component, params)
            calls = calls + 1
            error("boom")
        end
        "#,
        ScriptErrorPolicy::Disable,
    );

    script.update(&frame(Buttons::empty()));
    assert_eq!(script.status(), ScriptStatus::Failed);
    // no further calls once disabled
    script.update(&frame(Buttons::empty()));
    assert!(script.lua().is_none());
}

#[test]
fn update_replaced_by_a_value_counts_as_runtime_error() {
    let mut script = from_source(
        "function update(component, params) update = 42 end",
        ScriptErrorPolicy::Disable,
    );

    script.update(&frame(Buttons::empty()));
    assert!(script.is_enabled());
    script.update(&frame(Buttons::empty()));
    assert!(!script.is_enabled());
}

#[test]
#[should_panic(expected = "boom")]
fn runtime_error_panics_when_asked_to() {
    let mut script = from_source(
        "function update(component, params) error('boom') end",
        ScriptErrorPolicy::Panic,
    );
    script.update(&frame(Buttons::empty()));
}

#[test]
fn context_policy_is_applied_to_file_scripts() {
    let ctx = fixtures().with_script_error_policy(ScriptErrorPolicy::Panic);
    let script = LuaComponent::new(entity("ship"), &ctx, "scripts/steer.lua");
    assert_eq!(script.path(), "scripts/steer.lua");
    assert!(script.is_enabled());
}

#[test]
fn translate_coerces_hex_strings_like_lua() {
    let mut script = from_source(
        r#"
        function update(component, params)
            local entity = component_get_entity(component)
            entity_translate(entity, '0x10', tonumber('0x10'), 0)
        end
        "#,
        ScriptErrorPolicy::Disable,
    );
    let owner = script.entity().clone();

    script.update(&frame(Buttons::empty()));

    assert_eq!(owner.borrow().position(), Vector3::new(16.0, 16.0, 0.0));
}

#[test]
fn scripts_cannot_reach_io_or_os() {
    let mut script = from_source(
        r#"
        function update(component, params)
            os.execute("true")
        end
        "#,
        ScriptErrorPolicy::Disable,
    );

    script.update(&frame(Buttons::empty()));

    assert_eq!(script.status(), ScriptStatus::Failed);
}
