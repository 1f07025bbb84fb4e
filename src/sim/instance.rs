//! Contiguous per-instance simulation state.
//!
//! All state lives in parallel arrays indexed by instance id. Instances are
//! never created or destroyed at runtime — "respawn" is in-place mutation
//! of an existing index — so identities are stable for the whole run and
//! GPU-side resource offsets can be keyed by index once at startup.

use std::ops::Range;

use glam::{Mat4, Quat, Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulation constants, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    /// Units per second an instance travels toward the camera (-z).
    pub speed: f32,
    /// Radius of the spawn ball instances are resampled inside.
    pub spawn_radius: f32,
    /// Distance added to the (rebiased) sampled z so respawned instances
    /// reappear far from the camera.
    pub respawn_distance: f32,
    /// Rendered radius of each sphere; baked into the world transform.
    pub sphere_radius: f32,
    /// Base seed for all pseudo-random state.
    pub seed: u64,
}

/// Per-instance shading parameters, resampled alongside color on respawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    /// Diffuse intensity multiplier.
    pub intensity: f32,
    /// Specular exponent.
    pub shininess: f32,
}

/// Disjoint mutable window over every per-instance array, handed to one
/// range task. Two slices from the same split never alias.
pub struct InstanceSlice<'a> {
    /// World positions.
    pub positions: &'a mut [Vec3],
    /// RGBA colors (alpha fixed at 1).
    pub colors: &'a mut [Vec4],
    /// World transforms, recomputed from position every tick.
    pub transforms: &'a mut [Mat4],
    /// Per-instance shading parameters.
    pub lights: &'a mut [LightParams],
}

impl InstanceSlice<'_> {
    /// Number of instances in this window.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Advance every instance in this window by `dt` seconds.
    ///
    /// An instance whose z has crossed below zero respawns (position,
    /// color, and light params resampled); every other instance decays by
    /// exactly `speed * dt`. The world transform is rebuilt from the
    /// resulting position either way.
    pub fn advance(
        &mut self,
        dt: f32,
        params: &SimParams,
        rng: &mut impl Rng,
    ) {
        for i in 0..self.len() {
            if self.positions[i].z < 0.0 {
                self.respawn(i, params, rng);
            } else {
                self.positions[i].z -= params.speed * dt;
            }
            self.transforms[i] = Mat4::from_scale_rotation_translation(
                Vec3::splat(params.sphere_radius),
                Quat::IDENTITY,
                self.positions[i],
            );
        }
    }

    /// In-place reset of one instance: position resampled inside the spawn
    /// ball, rebiased in z to reappear far from the camera; color and light
    /// params redrawn.
    fn respawn(&mut self, i: usize, params: &SimParams, rng: &mut impl Rng) {
        let p = sample_unit_ball(rng) * params.spawn_radius;
        self.positions[i] =
            Vec3::new(p.x, p.y, p.z.abs() + params.respawn_distance);
        self.colors[i] = sample_color(rng);
        self.lights[i] = sample_light(rng);
    }
}

/// Uniform point inside the unit ball via rejection sampling: draw three
/// independent uniforms in [-1, 1] until the squared norm is at most 1.
fn sample_unit_ball(rng: &mut impl Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0f32..=1.0),
            rng.random_range(-1.0f32..=1.0),
            rng.random_range(-1.0f32..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

fn sample_color(rng: &mut impl Rng) -> Vec4 {
    Vec4::new(
        rng.random::<f32>(),
        rng.random::<f32>(),
        rng.random::<f32>(),
        1.0,
    )
}

fn sample_light(rng: &mut impl Rng) -> LightParams {
    LightParams {
        intensity: rng.random_range(0.7f32..=1.3),
        shininess: rng.random_range(16.0f32..=64.0),
    }
}

/// Owner of all per-instance simulation state.
///
/// Exclusively owned by the engine's tick loop; worker tasks only ever see
/// disjoint [`InstanceSlice`] windows produced by
/// [`split_ranges_mut`](Self::split_ranges_mut).
pub struct InstanceStore {
    positions: Vec<Vec3>,
    colors: Vec<Vec4>,
    transforms: Vec<Mat4>,
    lights: Vec<LightParams>,
    params: SimParams,
}

impl InstanceStore {
    /// Allocate `count` instances with deterministic pseudo-random initial
    /// state: same `count` and `params.seed` always produce the same store.
    ///
    /// Initial positions are distributed through the whole flight corridor
    /// (z offset uniform in `[0, respawn_distance]`) so the field starts
    /// mid-flow instead of respawning in lockstep.
    pub fn new(count: usize, params: SimParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut transforms = Vec::with_capacity(count);
        let mut lights = Vec::with_capacity(count);

        for _ in 0..count {
            let p = sample_unit_ball(&mut rng) * params.spawn_radius;
            let z_offset = rng.random_range(0.0..=params.respawn_distance);
            let position = Vec3::new(p.x, p.y, p.z.abs() + z_offset);
            positions.push(position);
            colors.push(sample_color(&mut rng));
            transforms.push(Mat4::from_scale_rotation_translation(
                Vec3::splat(params.sphere_radius),
                Quat::IDENTITY,
                position,
            ));
            lights.push(sample_light(&mut rng));
        }

        Self {
            positions,
            colors,
            transforms,
            lights,
            params,
        }
    }

    /// Number of instances. Fixed for the lifetime of the store.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the store holds no instances.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The simulation constants this store was built with.
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// World position of instance `i`.
    pub fn position(&self, i: usize) -> Vec3 {
        self.positions[i]
    }

    /// RGBA color of instance `i`.
    pub fn color(&self, i: usize) -> Vec4 {
        self.colors[i]
    }

    /// World transform of instance `i`.
    pub fn transform(&self, i: usize) -> &Mat4 {
        &self.transforms[i]
    }

    /// Shading parameters of instance `i`.
    pub fn light(&self, i: usize) -> LightParams {
        self.lights[i]
    }

    /// Directly set one instance's position. Test scaffolding for
    /// exercising decay/respawn edge cases from a known state.
    #[cfg(test)]
    pub(crate) fn set_position(&mut self, i: usize, position: Vec3) {
        self.positions[i] = position;
    }

    /// Split the store into disjoint mutable windows, one per range.
    ///
    /// Gaps between ranges are allowed and simply left out of the
    /// returned windows.
    ///
    /// # Panics
    ///
    /// Ranges must be ascending and non-overlapping with `end <= len`;
    /// anything else means two workers were handed the same instance —
    /// a scheduler bug, fatal by design rather than a runtime condition.
    pub fn split_ranges_mut(
        &mut self,
        ranges: &[Range<usize>],
    ) -> Vec<InstanceSlice<'_>> {
        let len = self.positions.len();
        let mut out = Vec::with_capacity(ranges.len());
        let mut cursor = 0usize;
        let mut positions = self.positions.as_mut_slice();
        let mut colors = self.colors.as_mut_slice();
        let mut transforms = self.transforms.as_mut_slice();
        let mut lights = self.lights.as_mut_slice();

        for range in ranges {
            assert!(
                range.start >= cursor,
                "overlapping update ranges: {range:?} begins before {cursor}"
            );
            assert!(
                range.end >= range.start && range.end <= len,
                "update range {range:?} outside store of len {len}"
            );

            // Skip any gap before this range, then carve the window off
            // the front. mem::take moves the remainder out so the carved
            // heads keep the store's full borrow lifetime.
            let gap = range.start - cursor;
            let take = range.end - range.start;

            let (_, rest) = std::mem::take(&mut positions).split_at_mut(gap);
            let (p_head, p_tail) = rest.split_at_mut(take);
            positions = p_tail;

            let (_, rest) = std::mem::take(&mut colors).split_at_mut(gap);
            let (c_head, c_tail) = rest.split_at_mut(take);
            colors = c_tail;

            let (_, rest) = std::mem::take(&mut transforms).split_at_mut(gap);
            let (t_head, t_tail) = rest.split_at_mut(take);
            transforms = t_tail;

            let (_, rest) = std::mem::take(&mut lights).split_at_mut(gap);
            let (l_head, l_tail) = rest.split_at_mut(take);
            lights = l_tail;

            out.push(InstanceSlice {
                positions: p_head,
                colors: c_head,
                transforms: t_head,
                lights: l_head,
            });
            cursor = range.end;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> SimParams {
        SimParams {
            speed: 500.0,
            spawn_radius: 1000.0,
            respawn_distance: 1000.0,
            sphere_radius: 10.0,
            seed: 0x5EED,
        }
    }

    #[test]
    fn same_seed_gives_identical_stores() {
        let a = InstanceStore::new(64, test_params());
        let b = InstanceStore::new(64, test_params());
        for i in 0..64 {
            assert_eq!(a.position(i), b.position(i));
            assert_eq!(a.color(i), b.color(i));
            assert_eq!(a.transform(i), b.transform(i));
        }
    }

    #[test]
    fn initial_state_lies_in_the_corridor() {
        let params = test_params();
        let store = InstanceStore::new(256, params);
        for i in 0..store.len() {
            let p = store.position(i);
            assert!(p.x * p.x + p.y * p.y <= params.spawn_radius.powi(2));
            assert!(p.z >= 0.0);
            assert!(p.z <= params.spawn_radius + params.respawn_distance);
            assert_eq!(store.color(i).w, 1.0);
        }
    }

    #[test]
    fn decay_is_exact_for_nonnegative_z() {
        let params = test_params();
        let mut store = InstanceStore::new(8, params);
        let pre: Vec<Vec3> = (0..8).map(|i| store.position(i)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let mut slices = store.split_ranges_mut(&[0..8]);
        slices[0].advance(0.25, &params, &mut rng);
        drop(slices);
        for (i, before) in pre.iter().enumerate() {
            if before.z >= 0.0 {
                let after = store.position(i);
                assert_eq!(after.z, before.z - params.speed * 0.25);
                assert_eq!(after.x, before.x);
                assert_eq!(after.y, before.y);
            }
        }
    }

    #[test]
    fn crossing_zero_respawns_far_from_camera() {
        // The spec scenario: speed=500, dt=1.0, an instance at z=400 decays
        // to -100, then the next tick triggers a respawn.
        let params = test_params();
        let mut store = InstanceStore::new(4, params);
        store.set_position(0, Vec3::new(3.0, 4.0, 400.0));
        let mut rng = StdRng::seed_from_u64(2);

        let mut slices = store.split_ranges_mut(&[0..4]);
        slices[0].advance(1.0, &params, &mut rng);
        drop(slices);
        assert_eq!(store.position(0).z, -100.0);

        let mut slices = store.split_ranges_mut(&[0..4]);
        let mut rng = StdRng::seed_from_u64(3);
        slices[0].advance(1.0, &params, &mut rng);
        drop(slices);

        let p = store.position(0);
        assert!(p.z > params.respawn_distance);
        assert!(p.z <= params.respawn_distance + params.spawn_radius);
        assert!(p.x * p.x + p.y * p.y <= params.spawn_radius.powi(2));
        // The sampled point (before the z rebias) lies inside the ball.
        let sampled_z = p.z - params.respawn_distance;
        assert!(
            p.x * p.x + p.y * p.y + sampled_z * sampled_z
                <= params.spawn_radius.powi(2) * 1.0001
        );
    }

    #[test]
    fn respawn_resamples_color_and_light() {
        let params = test_params();
        let mut store = InstanceStore::new(1, params);
        store.set_position(0, Vec3::new(0.0, 0.0, -1.0));
        let before_color = store.color(0);
        let before_light = store.light(0);
        let mut rng = StdRng::seed_from_u64(7);

        let mut slices = store.split_ranges_mut(&[0..1]);
        slices[0].advance(1.0, &params, &mut rng);
        drop(slices);

        // Independent uniform draws; collision with the old values would be
        // a measure-zero accident for this seed.
        assert_ne!(store.color(0), before_color);
        assert_ne!(store.light(0), before_light);
        assert_eq!(store.color(0).w, 1.0);
        assert!(store.light(0).intensity >= 0.7);
        assert!(store.light(0).intensity <= 1.3);
    }

    #[test]
    fn transform_tracks_position() {
        let params = test_params();
        let mut store = InstanceStore::new(2, params);
        let mut rng = StdRng::seed_from_u64(4);
        let mut slices = store.split_ranges_mut(&[0..2]);
        slices[0].advance(0.5, &params, &mut rng);
        drop(slices);
        for i in 0..2 {
            let expected = Mat4::from_scale_rotation_translation(
                Vec3::splat(params.sphere_radius),
                Quat::IDENTITY,
                store.position(i),
            );
            assert_eq!(*store.transform(i), expected);
        }
    }

    #[test]
    fn split_covers_requested_ranges_disjointly() {
        let params = test_params();
        let mut store = InstanceStore::new(10, params);
        let slices = store.split_ranges_mut(&[0..3, 3..7, 7..10]);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].len(), 3);
        assert_eq!(slices[1].len(), 4);
        assert_eq!(slices[2].len(), 3);
    }

    #[test]
    fn split_allows_gaps() {
        let params = test_params();
        let mut store = InstanceStore::new(10, params);
        let slices = store.split_ranges_mut(&[2..4, 8..10]);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].len(), 2);
        assert_eq!(slices[1].len(), 2);
    }

    #[test]
    #[should_panic(expected = "overlapping update ranges")]
    fn overlapping_ranges_are_fatal() {
        let params = test_params();
        let mut store = InstanceStore::new(10, params);
        let _ = store.split_ranges_mut(&[0..5, 4..10]);
    }
}
