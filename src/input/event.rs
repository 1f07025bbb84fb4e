use glam::Vec2;

/// Platform-agnostic input events.
///
/// The windowing shell translates raw window events into these; the engine
/// consumes them from the [`InputQueue`](super::InputQueue) once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute position in physical pixels.
    CursorMoved(Vec2),
    /// Pointer button pressed or released.
    Button {
        /// Which button changed.
        button: PointerButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel delta (positive = zoom in).
    Scroll(f32),
}

/// Platform-agnostic pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary button: orbit.
    Primary,
    /// Secondary button: pan.
    Secondary,
}
