//! Bounded object pool with pre-warming and identity-preserving reuse.
//!
//! The pool keeps at most `capacity` inactive instances in a FIFO queue.
//! Acquisitions beyond what is queued are served by the factory and are not
//! retained when released into a full queue; those instances are destroyed.

use std::collections::{HashSet, VecDeque};
use std::ops::{Deref, DerefMut};

use uuid::Uuid;

use crate::core::{AppResult, PoolError};

/// A resource that can be recycled by an [`ObjectPool`].
pub trait Poolable {
    /// Toggle the externally visible active flag.
    fn set_active(&mut self, active: bool);

    /// Whether the instance is currently active.
    fn is_active(&self) -> bool;

    /// Permanently release the instance. The default simply drops it.
    fn destroy(self)
    where
        Self: Sized,
    {
    }
}

/// Produces new resource instances on demand.
///
/// Implemented for any `FnMut() -> AppResult<T>` closure, so a pool can be
/// built from a plain closure:
///
/// ```rust
/// use orchard_pool::core::{ObjectPool, Poolable};
///
/// #[derive(Default)]
/// struct Bullet { live: bool }
///
/// impl Poolable for Bullet {
///     fn set_active(&mut self, active: bool) { self.live = active; }
///     fn is_active(&self) -> bool { self.live }
/// }
///
/// let pool = ObjectPool::new(4, || anyhow::Ok(Bullet::default())).unwrap();
/// assert_eq!(pool.available(), 4);
/// ```
pub trait ResourceFactory<T> {
    /// Create one new instance.
    fn create(&mut self) -> AppResult<T>;
}

impl<T, F> ResourceFactory<T> for F
where
    F: FnMut() -> AppResult<T>,
{
    fn create(&mut self) -> AppResult<T> {
        self()
    }
}

/// A resource checked out of a pool.
///
/// Carries the identity of the originating pool and the instance so that the
/// pool can reject foreign releases.
#[derive(Debug)]
pub struct Pooled<T> {
    pool: Uuid,
    id: u64,
    resource: T,
}

impl<T> Pooled<T> {
    /// Identifier of the instance within its pool. Stable across reuse.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Identifier of the pool that produced this instance.
    pub const fn pool_id(&self) -> Uuid {
        self.pool
    }
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.resource
    }
}

/// What happened to an instance handed back with [`ObjectPool::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Deactivated and queued for reuse.
    Pooled,
    /// Queue was full; the instance was destroyed.
    Destroyed,
}

/// Counters describing pool activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct PoolStats {
    /// Maximum number of queued instances.
    pub capacity: usize,
    /// Instances currently queued.
    pub available: usize,
    /// Instances currently checked out.
    pub outstanding: usize,
    /// Total factory calls.
    pub created: u64,
    /// Total instances destroyed.
    pub destroyed: u64,
    /// Acquisitions served from the queue.
    pub reused: u64,
}

/// Object pool recycling instances produced by a [`ResourceFactory`].
pub struct ObjectPool<T, F> {
    id: Uuid,
    capacity: usize,
    factory: F,
    available: VecDeque<(u64, T)>,
    outstanding: HashSet<u64>,
    next_id: u64,
    created: u64,
    destroyed: u64,
    reused: u64,
}

impl<T, F> ObjectPool<T, F>
where
    T: Poolable,
    F: ResourceFactory<T>,
{
    /// Create a pool and pre-warm it with `capacity` inactive instances.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Factory`] if the factory fails during pre-warm.
    pub fn new(capacity: usize, factory: F) -> Result<Self, PoolError> {
        let mut pool = Self::lazy(capacity, factory);
        for _ in 0..capacity {
            let slot = pool.spawn(false)?;
            pool.available.push_back(slot);
        }
        tracing::info!("pool {} pre-warmed with {} instances", pool.id, capacity);
        Ok(pool)
    }

    /// Create a pool without pre-warming; instances are created on demand.
    pub fn lazy(capacity: usize, factory: F) -> Self {
        Self {
            id: Uuid::new_v4(),
            capacity,
            factory,
            available: VecDeque::with_capacity(capacity),
            outstanding: HashSet::new(),
            next_id: 0,
            created: 0,
            destroyed: 0,
            reused: 0,
        }
    }

    /// Take an instance and mark it active.
    ///
    /// Serves the head of the queue when one is available, otherwise asks the
    /// factory for a new instance.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Factory`] if a new instance was needed and the
    /// factory failed.
    pub fn acquire_active(&mut self) -> Result<Pooled<T>, PoolError> {
        self.acquire(true)
    }

    /// Take an instance and leave it inactive, for configuration before use.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Factory`] if a new instance was needed and the
    /// factory failed.
    pub fn acquire_inactive(&mut self) -> Result<Pooled<T>, PoolError> {
        self.acquire(false)
    }

    /// Hand an instance back to the pool.
    ///
    /// The instance is deactivated and queued, or destroyed when the queue
    /// already holds `capacity` instances.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidRelease`] when the instance is not
    /// currently checked out from this pool. The instance is dropped.
    pub fn release(&mut self, item: Pooled<T>) -> Result<ReleaseOutcome, PoolError> {
        if !self.owns(&item) {
            tracing::warn!(
                "pool {} rejected release of instance {} from pool {}",
                self.id,
                item.id,
                item.pool
            );
            return Err(PoolError::InvalidRelease {
                pool: self.id,
                instance: item.id,
            });
        }
        self.outstanding.remove(&item.id);

        let Pooled { id, mut resource, .. } = item;
        if self.available.len() >= self.capacity {
            resource.destroy();
            self.destroyed += 1;
            tracing::debug!("pool {} full, destroyed instance {}", self.id, id);
            return Ok(ReleaseOutcome::Destroyed);
        }

        resource.set_active(false);
        self.available.push_back((id, resource));
        tracing::debug!("pool {} queued instance {}", self.id, id);
        Ok(ReleaseOutcome::Pooled)
    }

    /// Whether `item` is currently checked out from this pool.
    pub fn owns(&self, item: &Pooled<T>) -> bool {
        item.pool == self.id && self.outstanding.contains(&item.id)
    }

    /// Stop tracking a checked-out instance and return the bare resource.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidRelease`] when the instance is not
    /// currently checked out from this pool.
    pub fn detach(&mut self, item: Pooled<T>) -> Result<T, PoolError> {
        if !self.owns(&item) {
            return Err(PoolError::InvalidRelease {
                pool: self.id,
                instance: item.id,
            });
        }
        self.outstanding.remove(&item.id);
        Ok(item.resource)
    }

    /// Destroy every queued instance. Returns how many were destroyed.
    pub fn drain(&mut self) -> usize {
        let count = self.available.len();
        for (_, resource) in self.available.drain(..) {
            resource.destroy();
        }
        self.destroyed += count as u64;
        if count > 0 {
            tracing::debug!("pool {} drained {} instances", self.id, count);
        }
        count
    }

    fn acquire(&mut self, active: bool) -> Result<Pooled<T>, PoolError> {
        let (id, resource) = match self.available.pop_front() {
            Some((id, mut resource)) => {
                resource.set_active(active);
                self.reused += 1;
                (id, resource)
            }
            None => {
                tracing::debug!("pool {} empty, creating new instance", self.id);
                self.spawn(active)?
            }
        };
        self.outstanding.insert(id);
        Ok(Pooled {
            pool: self.id,
            id,
            resource,
        })
    }

    fn spawn(&mut self, active: bool) -> Result<(u64, T), PoolError> {
        let mut resource = self.factory.create().map_err(PoolError::Factory)?;
        resource.set_active(active);
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        Ok((id, resource))
    }
}

impl<T, F> ObjectPool<T, F> {
    /// Pool identifier.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Maximum number of queued instances.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of queued instances ready for reuse.
    pub fn available(&self) -> usize {
        self.available.len()
    }

    /// Number of instances currently checked out.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Snapshot of pool counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            available: self.available.len(),
            outstanding: self.outstanding.len(),
            created: self.created,
            destroyed: self.destroyed,
            reused: self.reused,
        }
    }
}
