//! Centralized runtime options with TOML preset support.
//!
//! All startup-time knobs (simulation constants, camera projection and
//! control sensitivity, presentation pacing) are consolidated here. Options
//! serialize to/from TOML; partial files fill the rest from defaults.
//!
//! The frame-ring depth is deliberately not an option — it is the
//! compile-time constant [`crate::frame::FRAME_RING_DEPTH`].

mod camera;
mod display;
mod simulation;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
use serde::{Deserialize, Serialize};
pub use simulation::SimulationOptions;

use crate::error::SphereFieldError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[simulation]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Simulation constants (instance count, speed, spawn geometry).
    pub simulation: SimulationOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Presentation and pacing settings.
    pub display: DisplayOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SphereFieldError::Io`] if the file cannot be read and
    /// [`SphereFieldError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, SphereFieldError> {
        let content =
            std::fs::read_to_string(path).map_err(SphereFieldError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SphereFieldError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`SphereFieldError::OptionsParse`] on serialization failure
    /// and [`SphereFieldError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SphereFieldError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SphereFieldError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SphereFieldError::Io)?;
        }
        std::fs::write(path, content).map_err(SphereFieldError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[simulation]
instance_count = 128
speed = 250.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.simulation.instance_count, 128);
        assert_eq!(opts.simulation.speed, 250.0);
        // Everything else should be default
        assert_eq!(opts.simulation.spawn_radius, 1000.0);
        assert_eq!(opts.camera.fovy, 45.0);
        assert!(opts.display.vsync);
    }

    #[test]
    fn sim_params_mirror_simulation_options() {
        let opts = SimulationOptions::default();
        let params = opts.sim_params();
        assert_eq!(params.speed, opts.speed);
        assert_eq!(params.spawn_radius, opts.spawn_radius);
        assert_eq!(params.respawn_distance, opts.respawn_distance);
        assert_eq!(params.seed, opts.seed);
    }
}
