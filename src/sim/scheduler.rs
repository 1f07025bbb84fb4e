//! Range-partitioned parallel update dispatch.
//!
//! One fixed-size worker pool is built at startup; every tick fans one task
//! per contiguous index range out to it and joins before returning. No task
//! outlives a single [`UpdateScheduler::update`] call and no background
//! work persists across ticks.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::instance::{InstanceSlice, InstanceStore};
use crate::error::SphereFieldError;

/// Partition `[0, len)` into at most `workers` contiguous, disjoint ranges
/// covering every index exactly once.
///
/// Sizes differ by at most one: the first `len % workers` ranges carry one
/// extra index. When `workers > len`, only `len` single-index ranges are
/// emitted — empty ranges are never produced.
///
/// # Panics
///
/// Panics if `workers` is zero.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    assert!(workers > 0, "partition requires at least one worker");
    let tasks = workers.min(len);
    let mut ranges = Vec::with_capacity(tasks);
    if tasks == 0 {
        return ranges;
    }
    let base = len / tasks;
    let extra = len % tasks;
    let mut start = 0;
    for i in 0..tasks {
        let size = base + usize::from(i < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Mix a per-task RNG seed from the base seed, the tick, and the range
/// start, so a given tick's respawn draws are reproducible for a fixed
/// partition.
fn task_seed(seed: u64, tick: u64, start: usize) -> u64 {
    seed.wrapping_add(tick.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add((start as u64).wrapping_mul(0xD1B5_4A32_D192_ED03))
}

/// Dispatches the per-tick instance update across a bounded worker pool.
pub struct UpdateScheduler {
    pool: rayon::ThreadPool,
    worker_count: usize,
}

impl UpdateScheduler {
    /// Build the fixed worker pool.
    ///
    /// `worker_threads == 0` selects the available hardware concurrency;
    /// any other value is capped by it. The count is always at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`SphereFieldError::WorkerPool`] if the pool cannot be
    /// built — fatal at startup, there is no degraded single-threaded
    /// fallback.
    pub fn new(worker_threads: usize) -> Result<Self, SphereFieldError> {
        let available = std::thread::available_parallelism()
            .map_or(1, std::num::NonZeroUsize::get);
        let worker_count = if worker_threads == 0 {
            available
        } else {
            worker_threads.min(available)
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("sim-worker-{i}"))
            .build()
            .map_err(|e| SphereFieldError::WorkerPool(e.to_string()))?;
        log::debug!("update scheduler: {worker_count} workers");
        Ok(Self { pool, worker_count })
    }

    /// Number of workers the pool was built with.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Advance the whole store by `dt` seconds.
    ///
    /// Partitions the index space, fans one task per range out to the
    /// pool, and blocks until every task has completed — a full
    /// fan-out/fan-in barrier. A panicking worker propagates out of the
    /// join and aborts the tick.
    pub fn update(&self, store: &mut InstanceStore, dt: f32, tick: u64) {
        let params = *store.params();
        self.dispatch(store, |range, mut slice| {
            let mut rng =
                StdRng::seed_from_u64(task_seed(params.seed, tick, range.start));
            slice.advance(dt, &params, &mut rng);
        });
    }

    /// Run an arbitrary range task over the store through the same
    /// partition/fan-out/join machinery [`update`](Self::update) uses.
    ///
    /// `f` is called once per range with a mutable window that never
    /// aliases another task's window.
    pub fn dispatch<F>(&self, store: &mut InstanceStore, f: F)
    where
        F: Fn(Range<usize>, InstanceSlice<'_>) + Sync,
    {
        let ranges = partition(store.len(), self.worker_count);
        let slices = store.split_ranges_mut(&ranges);
        self.pool.scope(|scope| {
            for (range, slice) in ranges.iter().cloned().zip(slices) {
                let f = &f;
                scope.spawn(move |_| f(range, slice));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use glam::Vec3;

    use super::*;
    use crate::sim::instance::SimParams;

    fn test_params() -> SimParams {
        SimParams {
            speed: 500.0,
            spawn_radius: 1000.0,
            respawn_distance: 1000.0,
            sphere_radius: 10.0,
            seed: 42,
        }
    }

    #[test]
    fn partition_covers_exactly_once() {
        for len in [0usize, 1, 2, 7, 64, 1000, 10_240] {
            for workers in [1usize, 2, 3, 8, 13, 64] {
                let ranges = partition(len, workers);
                let mut covered = vec![0u8; len];
                for r in &ranges {
                    assert!(!r.is_empty(), "empty range for {len}/{workers}");
                    for i in r.clone() {
                        covered[i] += 1;
                    }
                }
                assert!(
                    covered.iter().all(|&c| c == 1),
                    "gap or overlap for {len}/{workers}"
                );
            }
        }
    }

    #[test]
    fn partition_sizes_differ_by_at_most_one() {
        for len in [1usize, 9, 10, 100, 10_241] {
            for workers in [1usize, 2, 4, 7, 8] {
                let ranges = partition(len, workers);
                let min = ranges.iter().map(ExactSizeIterator::len).min();
                let max = ranges.iter().map(ExactSizeIterator::len).max();
                if let (Some(min), Some(max)) = (min, max) {
                    assert!(max - min <= 1, "unbalanced for {len}/{workers}");
                }
            }
        }
    }

    #[test]
    fn partition_never_exceeds_worker_count() {
        assert_eq!(partition(3, 8).len(), 3);
        assert_eq!(partition(8, 8).len(), 8);
        assert_eq!(partition(9, 8).len(), 8);
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn every_index_updates_exactly_once_per_tick() {
        let scheduler = UpdateScheduler::new(8).unwrap();
        let mut store = InstanceStore::new(10_240, test_params());
        let counters: Vec<AtomicU32> =
            (0..10_240).map(|_| AtomicU32::new(0)).collect();

        scheduler.dispatch(&mut store, |range, slice| {
            assert_eq!(range.len(), slice.len());
            for i in range {
                let _ = counters[i].fetch_add(1, Ordering::Relaxed);
            }
        });

        assert!(counters
            .iter()
            .all(|c| c.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn update_joins_before_returning() {
        // All mutation must be visible as soon as update returns.
        let params = test_params();
        let scheduler = UpdateScheduler::new(4).unwrap();
        let mut store = InstanceStore::new(1024, params);
        let pre: Vec<Vec3> = (0..1024).map(|i| store.position(i)).collect();

        scheduler.update(&mut store, 0.1, 0);

        for (i, before) in pre.iter().enumerate() {
            let after = store.position(i);
            if before.z >= 0.0 {
                assert_eq!(after.z, before.z - params.speed * 0.1);
            } else {
                assert!(after.z > params.respawn_distance);
            }
        }
    }

    #[test]
    fn update_is_deterministic_for_fixed_worker_count() {
        let params = test_params();
        let scheduler = UpdateScheduler::new(4).unwrap();
        let mut a = InstanceStore::new(512, params);
        let mut b = InstanceStore::new(512, params);
        for tick in 0..20 {
            scheduler.update(&mut a, 1.0, tick);
            scheduler.update(&mut b, 1.0, tick);
        }
        for i in 0..512 {
            assert_eq!(a.position(i), b.position(i));
            assert_eq!(a.color(i), b.color(i));
        }
    }

    #[test]
    fn zero_worker_config_resolves_to_hardware_concurrency() {
        let scheduler = UpdateScheduler::new(0).unwrap();
        assert!(scheduler.worker_count() >= 1);
    }
}
