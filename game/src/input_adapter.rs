use engine::app::InputFrame;
use glam::Vec2;
use winit::event::VirtualKeyCode;

use crate::camera::Camera;
use crate::session::PointerInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// Throw away the current puzzle and generate a new one.
    NewPuzzle,
}

pub fn map_key_to_action(key: VirtualKeyCode) -> Option<FrameAction> {
    match key {
        VirtualKeyCode::R | VirtualKeyCode::N => Some(FrameAction::NewPuzzle),
        _ => None,
    }
}

/// Turns window input into world-space pointer input.
///
/// The last known cursor position is kept so a release that happens after the cursor left the
/// window still drops the held piece where it was last seen.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    last_world: Option<Vec2>,
}

impl PointerTracker {
    pub fn last_world(&self) -> Option<Vec2> {
        self.last_world
    }

    pub fn pointer_from_frame(&mut self, input: &InputFrame, camera: &Camera) -> PointerInput {
        if let Some((x, y)) = input.mouse_pos {
            self.last_world = Some(camera.screen_to_world(Vec2::new(x as f32, y as f32)));
        }
        PointerInput {
            world: self.last_world,
            pressed: input.mouse_down,
            released: input.mouse_up,
        }
    }
}

pub fn actions_from_frame(input: &InputFrame) -> Vec<FrameAction> {
    input
        .keys_pressed
        .iter()
        .filter_map(|key| map_key_to_action(*key))
        .collect()
}
