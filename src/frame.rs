//! Per-frame input and timing record.

use std::time::Duration;

bitflags::bitflags! {
    /// Buttons held down during the frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Buttons: u32 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameParams {
    pub delta_time: Duration,
    pub buttons: Buttons,
}

impl FrameParams {
    pub fn new(delta_time: Duration, buttons: Buttons) -> Self {
        Self {
            delta_time,
            buttons,
        }
    }

    pub fn is_pressed(&self, button: Buttons) -> bool {
        self.buttons.contains(button)
    }
}

impl Default for FrameParams {
    fn default() -> Self {
        Self::new(Duration::ZERO, Buttons::empty())
    }
}
