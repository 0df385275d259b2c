// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-shot asynchronous producers.
//!
//! A [`Producer`] represents a result that is not known yet: a network request in
//! flight, a cache lookup, or a composition of other producers. It resolves at most
//! once, to `Ok(value)` or `Err(StreamError)`, and hands that outcome to every
//! registered observer in registration order.
//!
//! ## Characteristics
//!
//! - **Single assignment**: the first [`Resolver::resolve`] wins, later calls are ignored.
//! - **Synchronous delivery**: observers run on the thread that resolves the producer,
//!   before `resolve` returns.
//! - **Replay**: observers registered after resolution are called immediately with a
//!   clone of the stored outcome.
//! - **Re-entrant**: no lock is held while observers run, so an observer may register
//!   further observers or resolve other producers.
//!
//! ## Example
//!
//! ```
//! use backstream_core::Producer;
//! use std::sync::{Arc, Mutex};
//!
//! let (producer, resolver) = Producer::<u32>::pending();
//! let seen = Arc::new(Mutex::new(None));
//!
//! let sink = seen.clone();
//! producer.register_observer(move |outcome| {
//!     *sink.lock().unwrap() = Some(outcome.ok());
//! });
//!
//! assert!(resolver.succeed(7));
//! assert!(!resolver.succeed(8)); // already resolved
//! assert_eq!(*seen.lock().unwrap(), Some(Some(7)));
//! ```

use crate::Outcome;
use backstream_error::StreamError;
use parking_lot::Mutex;
use std::fmt;
use std::mem;
use std::sync::Arc;

type Observer<T> = Box<dyn FnOnce(Outcome<T>) + Send + 'static>;

/// Identifies an observer registered on a [`Producer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct ProducerState<T> {
    outcome: Option<Outcome<T>>,
    observers: Vec<(ObserverId, Observer<T>)>,
    next_observer: u64,
    resolvers: usize,
}

impl<T> ProducerState<T> {
    fn pending(resolvers: usize) -> Self {
        Self {
            outcome: None,
            observers: Vec::new(),
            next_observer: 0,
            resolvers,
        }
    }

    // No outcome and nobody left who could produce one.
    fn is_abandoned(&self) -> bool {
        self.outcome.is_none() && self.resolvers == 0
    }
}

/// Read half of a single-shot asynchronous result.
///
/// Cheap to clone; all clones observe the same outcome. See the
/// [module documentation](self) for details.
pub struct Producer<T> {
    state: Arc<Mutex<ProducerState<T>>>,
}

impl<T: Clone + Send + 'static> Producer<T> {
    /// Creates an unresolved producer together with the resolver that completes it.
    #[must_use]
    pub fn pending() -> (Self, Resolver<T>) {
        let state = Arc::new(Mutex::new(ProducerState::pending(1)));
        let resolver = Resolver {
            state: Arc::clone(&state),
        };
        (Self { state }, resolver)
    }

    /// Creates a producer that is already resolved with `outcome`.
    #[must_use]
    pub fn ready(outcome: Outcome<T>) -> Self {
        let mut state = ProducerState::pending(0);
        state.outcome = Some(outcome);
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Creates a producer already resolved to `Ok(value)`.
    #[must_use]
    pub fn succeeded(value: T) -> Self {
        Self::ready(Ok(value))
    }

    /// Creates a producer already resolved to `Err(error)`.
    #[must_use]
    pub fn failed(error: StreamError) -> Self {
        Self::ready(Err(error))
    }

    /// Registers an observer for the terminal outcome.
    ///
    /// If the producer is already resolved the observer runs immediately, on the
    /// calling thread, before this method returns. If every resolver has been dropped
    /// without resolving, the observer is discarded without being called.
    pub fn register_observer<F>(&self, observer: F) -> ObserverId
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        let mut state = self.state.lock();
        let id = ObserverId(state.next_observer);
        state.next_observer += 1;

        let stored = state.outcome.clone();
        if let Some(outcome) = stored {
            drop(state);
            observer(outcome);
        } else if state.is_abandoned() {
            drop(state);
            drop(observer);
        } else {
            state.observers.push((id, Box::new(observer)));
        }
        id
    }

    /// Removes a pending observer. Returns `false` if it already ran or was never
    /// registered here.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let removed = {
            let mut state = self.state.lock();
            state
                .observers
                .iter()
                .position(|(observer_id, _)| *observer_id == id)
                .map(|index| state.observers.remove(index))
        };
        // The boxed observer may own resolvers of other producers; drop it unlocked.
        removed.is_some()
    }

    /// Returns `true` once an outcome has been stored.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state.lock().outcome.is_some()
    }

    /// Returns a clone of the outcome, if resolved.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome<T>> {
        self.state.lock().outcome.clone()
    }

    /// Number of observers still waiting for the outcome.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.state.lock().observers.len()
    }
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Producer")
            .field("resolved", &state.outcome.is_some())
            .field("observers", &state.observers.len())
            .finish()
    }
}

/// Write half of a pending [`Producer`].
///
/// Clones share the same producer; whichever clone resolves first wins. When the
/// last resolver is dropped without resolving, waiting observers are released
/// without being called and the producer stays pending forever.
pub struct Resolver<T> {
    state: Arc<Mutex<ProducerState<T>>>,
}

impl<T: Clone + Send + 'static> Resolver<T> {
    /// Stores `outcome` and delivers it to every registered observer in
    /// registration order.
    ///
    /// Returns `false`, delivering nothing, if the producer was already resolved.
    pub fn resolve(&self, outcome: Outcome<T>) -> bool {
        let mut observers = {
            let mut state = self.state.lock();
            if state.outcome.is_some() {
                return false;
            }
            state.outcome = Some(outcome.clone());
            mem::take(&mut state.observers)
        };

        let Some((_, last)) = observers.pop() else {
            return true;
        };
        for (_, observer) in observers {
            observer(outcome.clone());
        }
        last(outcome);
        true
    }

    /// Resolves to `Ok(value)`.
    pub fn succeed(&self, value: T) -> bool {
        self.resolve(Ok(value))
    }

    /// Resolves to `Err(error)`.
    pub fn fail(&self, error: StreamError) -> bool {
        self.resolve(Err(error))
    }

    /// Returns `true` once the producer has an outcome.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state.lock().outcome.is_some()
    }
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        self.state.lock().resolvers += 1;
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Drop for Resolver<T> {
    fn drop(&mut self) {
        let released = {
            let mut state = self.state.lock();
            state.resolvers -= 1;
            if state.is_abandoned() {
                mem::take(&mut state.observers)
            } else {
                Vec::new()
            }
        };
        if !released.is_empty() {
            debug!(
                observers = released.len(),
                "producer abandoned before resolving"
            );
        }
        drop(released);
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("resolved", &self.state.lock().outcome.is_some())
            .finish()
    }
}
