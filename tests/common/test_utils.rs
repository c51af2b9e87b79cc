use std::time::Duration;

use scene_ngin::{
    context::Context,
    data_structures::entity::{Entity, EntityRef},
    frame::{Buttons, FrameParams},
};

/// Routes `log` output through the test harness. Safe to call from every test.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Context rooted at `tests/fixtures`.
pub fn fixtures() -> Context {
    init_logger();
    Context::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

pub fn entity(name: &str) -> EntityRef {
    Entity::new(name).into_ref()
}

pub fn frame(buttons: Buttons) -> FrameParams {
    FrameParams::new(Duration::from_millis(16), buttons)
}
