use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Presentation and pacing settings.
pub struct DisplayOptions {
    /// Target frames per second (0 = unlimited).
    pub target_fps: u32,
    /// Synchronize presentation with the display refresh. Off selects
    /// immediate presentation where the surface supports it.
    pub vsync: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            target_fps: 0,
            vsync: true,
        }
    }
}
