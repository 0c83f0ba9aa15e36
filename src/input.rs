use std::collections::HashSet;

use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard and mouse state fed from window events and consumed by the
/// scene's camera controls once per frame.
#[derive(Default)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
    right_mouse: bool,
    cursor: Option<(f64, f64)>,
    mouse_delta: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the event was consumed as input.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            let _ = self.pressed.insert(code);
                        }
                        ElementState::Released => {
                            let _ = self.pressed.remove(&code);
                        }
                    }
                    return true;
                }
                false
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.right_mouse = *state == ElementState::Pressed;
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current = (position.x, position.y);
                if let Some(last) = self.cursor {
                    self.mouse_delta.0 += last.0 - current.0;
                    self.mouse_delta.1 += last.1 - current.1;
                }
                self.cursor = Some(current);
                true
            }
            _ => false,
        }
    }

    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    pub fn right_mouse_down(&self) -> bool {
        self.right_mouse
    }

    /// Mouse movement accumulated since the previous call, zeroed on read.
    pub fn take_mouse_delta(&mut self) -> (f64, f64) {
        std::mem::take(&mut self.mouse_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_delta_is_drained_on_read() {
        let mut input = InputState::new();
        input.mouse_delta = (3.0, -2.0);
        assert_eq!(input.take_mouse_delta(), (3.0, -2.0));
        assert_eq!(input.take_mouse_delta(), (0.0, 0.0));
    }
}
