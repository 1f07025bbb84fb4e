use serde::{Deserialize, Serialize};

use crate::sim::SimParams;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Simulation parameters, all fixed at startup.
pub struct SimulationOptions {
    /// Number of sphere instances. Fixed for the whole run; must be
    /// nonzero.
    pub instance_count: usize,
    /// Simulation worker threads (0 = use available hardware concurrency).
    pub worker_threads: usize,
    /// Units per second an instance travels toward the camera.
    pub speed: f32,
    /// Radius of the ball respawned instances are sampled inside.
    pub spawn_radius: f32,
    /// Distance in z added on respawn so instances reappear far from the
    /// camera.
    pub respawn_distance: f32,
    /// Rendered radius of each sphere.
    pub sphere_radius: f32,
    /// Base seed for deterministic initial state.
    pub seed: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            instance_count: 4096,
            worker_threads: 0,
            speed: 500.0,
            spawn_radius: 1000.0,
            respawn_distance: 1000.0,
            sphere_radius: 10.0,
            seed: 0x5EED_BA11,
        }
    }
}

impl SimulationOptions {
    /// The subset of these options the per-tick update consumes.
    #[must_use]
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            speed: self.speed,
            spawn_radius: self.spawn_radius,
            respawn_distance: self.respawn_distance,
            sphere_radius: self.sphere_radius,
            seed: self.seed,
        }
    }
}
