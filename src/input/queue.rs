use glam::Vec2;

use super::event::{InputEvent, PointerButton};

/// Camera motion distilled from raw pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMotion {
    /// Orbit by a screen-space delta.
    Rotate(Vec2),
    /// Pan the focus point by a screen-space delta.
    Pan(Vec2),
    /// Zoom by a wheel delta.
    Zoom(f32),
}

/// Buffer of input events accumulated between ticks.
///
/// The shell pushes from the event loop; the engine drains exactly once per
/// tick, so input is applied at one deterministic point in the frame.
#[derive(Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event from the windowing shell.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every queued event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Tracks cursor position and held buttons across events, turning drags
/// into [`CameraMotion`] values.
#[derive(Default)]
pub struct PointerState {
    cursor: Vec2,
    rotating: bool,
    panning: bool,
}

impl PointerState {
    /// Fresh state: no buttons held, cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event through the state machine.
    ///
    /// Returns the camera motion it implies, if any. Cursor moves while no
    /// button is held produce nothing.
    pub fn interpret(&mut self, event: InputEvent) -> Option<CameraMotion> {
        match event {
            InputEvent::CursorMoved(pos) => {
                let delta = pos - self.cursor;
                self.cursor = pos;
                if self.rotating {
                    Some(CameraMotion::Rotate(delta))
                } else if self.panning {
                    Some(CameraMotion::Pan(Vec2::new(-delta.x, delta.y)))
                } else {
                    None
                }
            }
            InputEvent::Button { button, pressed } => {
                match button {
                    PointerButton::Primary => self.rotating = pressed,
                    PointerButton::Secondary => self.panning = pressed,
                }
                None
            }
            InputEvent::Scroll(delta) => Some(CameraMotion::Zoom(delta)),
        }
    }
}
