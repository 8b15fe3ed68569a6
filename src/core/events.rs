//! Typed publish/subscribe dispatcher keyed by event type.
//!
//! Listeners are registered per event type and notified synchronously, in
//! registration order, on the publishing thread. The listener sequence is
//! snapshotted when a publish starts and no registry lock is held while
//! listeners run, so listeners may add, remove, or publish re-entrantly;
//! such changes apply from the next publish onwards.
//!
//! ```rust
//! use orchard_pool::core::EventDispatcher;
//!
//! struct Scored(u32);
//!
//! let dispatcher = EventDispatcher::new();
//! let _handle = dispatcher.subscribe_fn(|e: &Scored| {
//!     assert_eq!(e.0, 10);
//!     Ok(())
//! });
//! let report = dispatcher.publish(&Scored(10));
//! assert_eq!(report.delivered, 1);
//! ```

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::core::{AppResult, DispatchError};

/// Marker for types that can be published through an [`EventDispatcher`].
pub trait Event: Any + Send + Sync {}

/// Blanket implementation: any `'static` thread-safe type is an event.
impl<T> Event for T where T: Any + Send + Sync {}

/// Receives events of type `E`.
pub trait Listener<E: Event>: Send {
    /// Handle one published event.
    ///
    /// # Errors
    ///
    /// A failure is reported to the publisher; other listeners are still
    /// notified.
    fn on_event(&mut self, event: &E) -> AppResult<()>;
}

/// Registered listener handle. Identity is the `Arc` allocation.
pub type SharedListener<E> = Arc<Mutex<dyn Listener<E>>>;

/// Adapter turning a closure into a [`Listener`].
pub struct FnListener<F>(F);

impl<E, F> Listener<E> for FnListener<F>
where
    E: Event,
    F: FnMut(&E) -> AppResult<()> + Send,
{
    fn on_event(&mut self, event: &E) -> AppResult<()> {
        (self.0)(event)
    }
}

/// Why a listener was not notified successfully.
#[derive(Debug)]
pub enum ListenerFailure {
    /// The listener returned an error.
    Failed {
        /// Position in the notification order.
        position: usize,
        /// Error returned by the listener.
        error: anyhow::Error,
    },
    /// The listener was already being notified further up this thread's
    /// call stack (re-entrant publish) and was skipped.
    Busy {
        /// Position in the notification order.
        position: usize,
    },
}

impl std::fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed { position, error } => write!(f, "listener #{position} failed: {error}"),
            Self::Busy { position } => write!(f, "listener #{position} busy (re-entrant publish)"),
        }
    }
}

/// Outcome of a single [`EventDispatcher::publish`] call.
#[derive(Debug)]
pub struct PublishReport {
    /// Event type name.
    pub event: &'static str,
    /// Listeners notified successfully.
    pub delivered: usize,
    /// Listeners that failed or were skipped.
    pub failures: Vec<ListenerFailure>,
}

impl PublishReport {
    const fn new(event: &'static str) -> Self {
        Self {
            event,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    /// True when every listener was notified successfully.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Convert into a result carrying the delivered count.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ListenerFailures`] if any listener failed.
    pub fn into_result(self) -> Result<usize, DispatchError> {
        match self.failures.first() {
            None => Ok(self.delivered),
            Some(first) => Err(DispatchError::ListenerFailures {
                event: self.event,
                failed: self.failures.len(),
                delivered: self.delivered,
                first: first.to_string(),
            }),
        }
    }
}

thread_local! {
    static IN_FLIGHT: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a listener as being notified on the current thread.
struct InFlight(usize);

impl InFlight {
    fn enter(addr: usize) -> Option<Self> {
        IN_FLIGHT.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&addr) {
                return None;
            }
            stack.push(addr);
            Some(Self(addr))
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        IN_FLIGHT.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|a| *a == self.0) {
                stack.remove(pos);
            }
        });
    }
}

fn listener_addr<L: ?Sized>(listener: &Arc<Mutex<L>>) -> usize {
    Arc::as_ptr(listener).cast::<()>() as usize
}

/// Registry of listeners keyed by event [`TypeId`].
#[derive(Default)]
pub struct EventDispatcher {
    registry: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the sequence for `E`.
    ///
    /// Returns `false` without registering when the same listener is already
    /// registered for `E`.
    pub fn add_listener<E: Event>(&self, listener: SharedListener<E>) -> bool {
        let mut registry = self.registry.write();
        let entry = registry
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<SharedListener<E>>::new()));
        let Some(list) = entry.downcast_mut::<Vec<SharedListener<E>>>() else {
            return false;
        };

        let addr = listener_addr(&listener);
        if list.iter().any(|l| listener_addr(l) == addr) {
            tracing::debug!("listener already registered for {}", type_name::<E>());
            return false;
        }
        list.push(listener);
        tracing::debug!(
            "listener added for {} ({} total)",
            type_name::<E>(),
            list.len()
        );
        true
    }

    /// Remove `listener` from the sequence for `E`.
    ///
    /// Accepts the concrete `Arc` as well as the coerced [`SharedListener`].
    /// Returns `false` when it was not registered.
    pub fn remove_listener<E: Event, L: ?Sized>(&self, listener: &Arc<Mutex<L>>) -> bool {
        let mut registry = self.registry.write();
        let Some(list) = registry
            .get_mut(&TypeId::of::<E>())
            .and_then(|b| b.downcast_mut::<Vec<SharedListener<E>>>())
        else {
            return false;
        };

        let addr = listener_addr(listener);
        match list.iter().position(|l| listener_addr(l) == addr) {
            Some(index) => {
                list.remove(index);
                tracing::debug!("listener removed for {}", type_name::<E>());
                true
            }
            None => false,
        }
    }

    /// Whether `listener` is registered for `E`.
    pub fn contains_listener<E: Event, L: ?Sized>(&self, listener: &Arc<Mutex<L>>) -> bool {
        let addr = listener_addr(listener);
        self.registry
            .read()
            .get(&TypeId::of::<E>())
            .and_then(|b| b.downcast_ref::<Vec<SharedListener<E>>>())
            .is_some_and(|list| list.iter().any(|l| listener_addr(l) == addr))
    }

    /// Register a closure as a listener for `E` and return its handle.
    pub fn subscribe_fn<E, F>(&self, f: F) -> SharedListener<E>
    where
        E: Event,
        F: FnMut(&E) -> AppResult<()> + Send + 'static,
    {
        let listener: SharedListener<E> = Arc::new(Mutex::new(FnListener(f)));
        self.add_listener(Arc::clone(&listener));
        listener
    }

    /// Notify every listener registered for `E`, in registration order.
    ///
    /// Publishing with no listeners is a no-op. Listener failures are
    /// isolated and collected in the returned report.
    pub fn publish<E: Event>(&self, event: &E) -> PublishReport {
        let mut report = PublishReport::new(type_name::<E>());
        let snapshot: Vec<SharedListener<E>> = {
            let registry = self.registry.read();
            match registry
                .get(&TypeId::of::<E>())
                .and_then(|b| b.downcast_ref::<Vec<SharedListener<E>>>())
            {
                Some(list) => list.clone(),
                None => return report,
            }
        };

        tracing::debug!(
            "publishing {} to {} listener(s)",
            report.event,
            snapshot.len()
        );

        for (position, listener) in snapshot.iter().enumerate() {
            let Some(_in_flight) = InFlight::enter(listener_addr(listener)) else {
                tracing::warn!(
                    "skipping listener #{} for {}: already notifying",
                    position,
                    report.event
                );
                report.failures.push(ListenerFailure::Busy { position });
                continue;
            };

            let result = listener.lock().on_event(event);
            match result {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    tracing::warn!(
                        "listener #{} for {} failed: {:#}",
                        position,
                        report.event,
                        error
                    );
                    report.failures.push(ListenerFailure::Failed { position, error });
                }
            }
        }
        report
    }

    /// Number of listeners registered for `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        self.registry
            .read()
            .get(&TypeId::of::<E>())
            .and_then(|b| b.downcast_ref::<Vec<SharedListener<E>>>())
            .map_or(0, Vec::len)
    }

    /// Drop every registration.
    pub fn clear(&self) {
        let mut registry = self.registry.write();
        let kinds = registry.len();
        registry.clear();
        tracing::debug!("dispatcher cleared ({} event types)", kinds);
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("event_types", &self.registry.read().len())
            .finish()
    }
}
