//! Input handling: window events are folded into `InputState` as they arrive,
//! then sampled once per frame into an immutable `FrameInput`.

use std::collections::HashSet;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Input events the simulation cares about, decoupled from winit's event enum
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    CursorMoved { x: f64, y: f64 },
    MouseButton { button: MouseButton, pressed: bool },
    FocusLost,
}

/// Cursor movement between two samples, in pixels (current minus last)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorDelta {
    pub dx: f32,
    pub dy: f32,
}

impl CursorDelta {
    pub fn between(last: (f64, f64), current: (f64, f64)) -> Self {
        Self {
            dx: (current.0 - last.0) as f32,
            dy: (current.1 - last.1) as f32,
        }
    }
}

/// An in-progress drag gesture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    pub is_dragging: bool,
    pub last_cursor: (f64, f64),
    pub last_timestamp: f64,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, cursor: (f64, f64), now: f64) {
        self.is_dragging = true;
        self.last_cursor = cursor;
        self.last_timestamp = now;
    }

    /// Delta since the previous sample; the new sample becomes the reference
    pub fn update(&mut self, cursor: (f64, f64), now: f64) -> CursorDelta {
        let delta = CursorDelta::between(self.last_cursor, cursor);
        self.last_cursor = cursor;
        self.last_timestamp = now;
        delta
    }

    pub fn clear(&mut self) {
        self.is_dragging = false;
    }
}

/// What one frame consumes from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub drag: Option<CursorDelta>,
    pub zoom: bool,
    pub reset: bool,
    pub drag_released: bool,
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub zoom_modifier: KeyCode,
    pub reset: KeyCode,
    pub quit: KeyCode,
    pub drag_button: MouseButton,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            zoom_modifier: KeyCode::ShiftLeft,
            reset: KeyCode::KeyR,
            quit: KeyCode::Escape,
            drag_button: MouseButton::Left,
        }
    }
}

/// Accumulated input between frames
pub struct InputState {
    pub bindings: KeyBindings,
    pub pressed_keys: HashSet<KeyCode>,
    pub drag_button_down: bool,
    pub cursor: (f64, f64),
    pub reset_requested: bool,
    pub quit_requested: bool,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            pressed_keys: HashSet::new(),
            drag_button_down: false,
            cursor: (0.0, 0.0),
            reset_requested: false,
            quit_requested: false,
        }
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                // Key repeat arrives as repeated presses; only the first counts
                let newly_pressed = self.pressed_keys.insert(*key);
                if newly_pressed && *key == self.bindings.reset {
                    self.reset_requested = true;
                }
                if *key == self.bindings.quit {
                    self.quit_requested = true;
                }
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key);
            }
            InputEvent::CursorMoved { x, y } => {
                self.cursor = (*x, *y);
            }
            InputEvent::MouseButton { button, pressed } => {
                if *button == self.bindings.drag_button {
                    self.drag_button_down = *pressed;
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
                self.drag_button_down = false;
            }
        }
    }

    /// Events that must reach the scene even when the overlay consumed them:
    /// releases, so a drag or key cannot stick, and the quit key.
    pub fn bypasses_overlay(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(key) => *key == self.bindings.quit,
            InputEvent::KeyUp(_) | InputEvent::FocusLost => true,
            InputEvent::MouseButton { pressed, .. } => !*pressed,
            InputEvent::CursorMoved { .. } => false,
        }
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn is_zoom_modifier_held(&self) -> bool {
        self.is_key_pressed(self.bindings.zoom_modifier)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    /// Sample the state for one frame.
    ///
    /// The first frame of a drag only records the cursor, so its delta is
    /// zero. Reset is an edge trigger and is consumed here.
    pub fn sample(&mut self, drag: &mut DragState, now: f64) -> FrameInput {
        let mut frame = FrameInput {
            zoom: self.is_zoom_modifier_held(),
            reset: std::mem::take(&mut self.reset_requested),
            ..FrameInput::default()
        };

        if self.drag_button_down {
            if !drag.is_dragging {
                drag.begin(self.cursor, now);
            }
            frame.drag = Some(drag.update(self.cursor, now));
        } else if drag.is_dragging {
            drag.clear();
            frame.drag_released = true;
        }

        frame
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

/// winit event translation
pub mod native {
    use super::*;
    use winit::event::{ElementState, KeyEvent, WindowEvent};
    use winit::keyboard::PhysicalKey;

    pub fn window_event_to_input(event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => Some(match state {
                ElementState::Pressed => InputEvent::KeyDown(*code),
                ElementState::Released => InputEvent::KeyUp(*code),
            }),
            WindowEvent::CursorMoved { position, .. } => {
                Some(InputEvent::CursorMoved { x: position.x, y: position.y })
            }
            WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
                button: *button,
                pressed: *state == ElementState::Pressed,
            }),
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_left(input: &mut InputState, pressed: bool) {
        input.process_event(&InputEvent::MouseButton { button: MouseButton::Left, pressed });
    }

    #[test]
    fn test_first_drag_frame_has_zero_delta() {
        let mut input = InputState::default();
        let mut drag = DragState::new();
        input.process_event(&InputEvent::CursorMoved { x: 40.0, y: 60.0 });
        press_left(&mut input, true);

        let frame = input.sample(&mut drag, 0.0);
        assert_eq!(frame.drag, Some(CursorDelta::default()));
        assert!(drag.is_dragging);
        assert_eq!(drag.last_cursor, (40.0, 60.0));
    }

    #[test]
    fn test_drag_deltas_follow_cursor() {
        let mut input = InputState::default();
        let mut drag = DragState::new();
        input.process_event(&InputEvent::CursorMoved { x: 0.0, y: 100.0 });
        press_left(&mut input, true);
        input.sample(&mut drag, 0.0);

        input.process_event(&InputEvent::CursorMoved { x: 5.0, y: 150.0 });
        let frame = input.sample(&mut drag, 0.016);
        assert_eq!(frame.drag, Some(CursorDelta { dx: 5.0, dy: 50.0 }));
        assert_eq!(drag.last_timestamp, 0.016);

        // no movement, no delta
        let frame = input.sample(&mut drag, 0.032);
        assert_eq!(frame.drag, Some(CursorDelta::default()));
    }

    #[test]
    fn test_release_clears_drag_once() {
        let mut input = InputState::default();
        let mut drag = DragState::new();
        press_left(&mut input, true);
        input.sample(&mut drag, 0.0);
        press_left(&mut input, false);

        let frame = input.sample(&mut drag, 0.1);
        assert!(frame.drag.is_none());
        assert!(frame.drag_released);
        assert!(!drag.is_dragging);

        let frame = input.sample(&mut drag, 0.2);
        assert!(!frame.drag_released);
    }

    #[test]
    fn test_other_buttons_do_not_drag() {
        let mut input = InputState::default();
        let mut drag = DragState::new();
        input.process_event(&InputEvent::MouseButton { button: MouseButton::Right, pressed: true });
        assert!(input.sample(&mut drag, 0.0).drag.is_none());
    }

    #[test]
    fn test_reset_is_consumed_once() {
        let mut input = InputState::default();
        let mut drag = DragState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyR));
        // held key repeating
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyR));
        assert!(input.sample(&mut drag, 0.0).reset);
        assert!(!input.sample(&mut drag, 0.0).reset);

        input.process_event(&InputEvent::KeyUp(KeyCode::KeyR));
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyR));
        assert!(input.sample(&mut drag, 0.0).reset);
    }

    #[test]
    fn test_shift_selects_zoom() {
        let mut input = InputState::default();
        let mut drag = DragState::new();
        assert!(!input.sample(&mut drag, 0.0).zoom);
        input.process_event(&InputEvent::KeyDown(KeyCode::ShiftLeft));
        assert!(input.sample(&mut drag, 0.0).zoom);
        input.process_event(&InputEvent::KeyUp(KeyCode::ShiftLeft));
        assert!(!input.sample(&mut drag, 0.0).zoom);
    }

    #[test]
    fn test_focus_loss_releases_everything() {
        let mut input = InputState::default();
        let mut drag = DragState::new();
        input.process_event(&InputEvent::KeyDown(KeyCode::ShiftLeft));
        press_left(&mut input, true);
        input.sample(&mut drag, 0.0);

        input.process_event(&InputEvent::FocusLost);
        let frame = input.sample(&mut drag, 0.1);
        assert!(!frame.zoom);
        assert!(frame.drag_released);
    }

    #[test]
    fn test_escape_requests_quit() {
        let mut input = InputState::default();
        input.process_event(&InputEvent::KeyDown(KeyCode::Escape));
        assert!(input.quit_requested);
    }

    #[test]
    fn test_quit_and_releases_bypass_overlay() {
        let input = InputState::default();
        assert!(input.bypasses_overlay(&InputEvent::KeyDown(KeyCode::Escape)));
        assert!(input.bypasses_overlay(&InputEvent::KeyUp(KeyCode::KeyR)));
        assert!(input.bypasses_overlay(&InputEvent::MouseButton { button: MouseButton::Left, pressed: false }));
        assert!(input.bypasses_overlay(&InputEvent::FocusLost));

        assert!(!input.bypasses_overlay(&InputEvent::KeyDown(KeyCode::KeyR)));
        assert!(!input.bypasses_overlay(&InputEvent::MouseButton { button: MouseButton::Left, pressed: true }));
        assert!(!input.bypasses_overlay(&InputEvent::CursorMoved { x: 1.0, y: 2.0 }));
    }
}
