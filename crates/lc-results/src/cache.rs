//! Bounded compute-once trajectory cache.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use lc_sim::Trajectory;

use crate::hash::{ENGINE_VERSION, compute_trajectory_id};
use crate::types::{TrajectoryId, TrajectoryKey};
use crate::{CacheError, CacheResult};

pub const DEFAULT_CAPACITY: usize = 16;

type Slot = Arc<Mutex<Option<Arc<Trajectory>>>>;

#[derive(Debug, Clone)]
pub struct CachedTrajectory {
    pub id: TrajectoryId,
    pub trajectory: Arc<Trajectory>,
    pub from_cache: bool,
}

#[derive(Default)]
struct Entries {
    slots: HashMap<TrajectoryId, Slot>,
    /// Least recently used first.
    order: VecDeque<TrajectoryId>,
}

impl Entries {
    fn touch(&mut self, id: &TrajectoryId) {
        if let Some(pos) = self.order.iter().position(|x| x == id) {
            self.order.remove(pos);
        }
        self.order.push_back(id.clone());
    }

    fn remove(&mut self, id: &TrajectoryId) -> bool {
        if let Some(pos) = self.order.iter().position(|x| x == id) {
            self.order.remove(pos);
        }
        self.slots.remove(id).is_some()
    }
}

/// Maps trajectory keys to shared, immutable trajectories.
///
/// Concurrent requests for one key run the provider once: the map lock is
/// only held to find or create the key's slot, and the slot's own lock
/// serializes the computation. Failed computations leave nothing behind.
pub struct TrajectoryCache {
    entries: Mutex<Entries>,
    capacity: usize,
    computations: AtomicU64,
}

impl Default for TrajectoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TrajectoryCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            capacity: capacity.max(1),
            computations: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of provider runs that completed successfully.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &TrajectoryKey) -> bool {
        let id = compute_trajectory_id(key, ENGINE_VERSION);
        let Some(slot) = self
            .entries
            .lock()
            .ok()
            .and_then(|e| e.slots.get(&id).cloned())
        else {
            return false;
        };
        slot.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    pub fn get_or_compute(&self, key: &TrajectoryKey) -> CacheResult<CachedTrajectory> {
        key.validate()?;
        let id = compute_trajectory_id(key, ENGINE_VERSION);
        let slot = self.slot_for(&id)?;

        let mut guard = slot.lock().map_err(|_| CacheError::Poisoned)?;
        if let Some(trajectory) = guard.as_ref() {
            tracing::debug!(id = %short(&id), "trajectory cache hit");
            return Ok(CachedTrajectory {
                id,
                trajectory: Arc::clone(trajectory),
                from_cache: true,
            });
        }

        tracing::debug!(id = %short(&id), mode = key.mode().label(), "trajectory cache miss");
        match key.compute() {
            Ok(trajectory) => {
                let trajectory = Arc::new(trajectory);
                *guard = Some(Arc::clone(&trajectory));
                self.computations.fetch_add(1, Ordering::Relaxed);
                Ok(CachedTrajectory {
                    id,
                    trajectory,
                    from_cache: false,
                })
            }
            Err(err) => {
                drop(guard);
                self.discard_if_empty(&id, &slot)?;
                tracing::warn!(id = %short(&id), error = %err, "trajectory computation failed");
                Err(err.into())
            }
        }
    }

    /// Drop one entry; returns whether it was present.
    pub fn invalidate(&self, key: &TrajectoryKey) -> CacheResult<bool> {
        let id = compute_trajectory_id(key, ENGINE_VERSION);
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.remove(&id))
    }

    pub fn clear(&self) -> CacheResult<()> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.slots.clear();
        entries.order.clear();
        Ok(())
    }

    fn slot_for(&self, id: &TrajectoryId) -> CacheResult<Slot> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let slot = Arc::clone(
            entries
                .slots
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(None))),
        );
        entries.touch(id);

        while entries.slots.len() > self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.slots.remove(&oldest);
            tracing::debug!(id = %short(&oldest), "trajectory evicted");
        }
        Ok(slot)
    }

    fn discard_if_empty(&self, id: &TrajectoryId, slot: &Slot) -> CacheResult<()> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let same_slot = entries.slots.get(id).is_some_and(|s| Arc::ptr_eq(s, slot));
        let empty = slot.lock().map(|s| s.is_none()).unwrap_or(true);
        if same_slot && empty {
            entries.remove(id);
        }
        Ok(())
    }
}

fn short(id: &str) -> &str {
    &id[..id.len().min(12)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_holds_one() {
        let cache = TrajectoryCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache
            .get_or_compute(&TrajectoryKey::analytical(1.0, 8))
            .unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn recently_used_entry_survives_eviction() {
        let cache = TrajectoryCache::new(2);
        let a = TrajectoryKey::analytical(1.0, 8);
        let b = TrajectoryKey::analytical(2.0, 8);
        let c = TrajectoryKey::analytical(3.0, 8);

        cache.get_or_compute(&a).unwrap();
        cache.get_or_compute(&b).unwrap();
        // Touch `a` so `b` becomes the oldest.
        assert!(cache.get_or_compute(&a).unwrap().from_cache);
        cache.get_or_compute(&c).unwrap();

        assert!(cache.contains(&a));
        assert!(!cache.contains(&b));
        assert!(cache.contains(&c));
    }

    #[test]
    fn nan_and_infinite_domains_never_share_an_entry() {
        let cache = TrajectoryCache::default();
        for tau_end in [f64::NAN, f64::INFINITY] {
            let err = cache
                .get_or_compute(&TrajectoryKey::analytical(tau_end, 8))
                .unwrap_err();
            assert!(matches!(err, CacheError::Sim(_)));
        }
        assert!(cache.is_empty());
        assert_eq!(cache.computations(), 0);
    }
}
