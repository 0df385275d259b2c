// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A reactive value whose upstream producer can be replaced.
//!
//! A [`BackedStream`] lets a consumer register its callbacks once and then swap the
//! producer feeding them on every reload. Each [`back_with`](BackedStream::back_with)
//! starts a new *generation*; the previous producer is unhooked and anything it
//! delivers afterwards is dropped.
//!
//! ## Characteristics
//!
//! - **One delivery per generation**: listeners see at most one outcome per backing.
//! - **Replay**: a listener registered after the current backing resolved is called
//!   once with that outcome; the outcome is forgotten when the stream is re-backed.
//! - **Synchronous**: delivery runs on the thread that resolves the backing. A backing
//!   that is already resolved is delivered before `back_with` returns.
//! - **Owner teardown**: after [`remove_owner`](BackedStream::remove_owner) returns, no
//!   further callbacks run for that owner, including the rest of a delivery round on
//!   the same thread. A callback that another thread is already running, or has
//!   already checked, may still complete.
//! - **Non-owning**: the backing producer only holds a weak handle to the stream, and
//!   [`listen_weak`](BackedStream::listen_weak) holds only a weak handle to the consumer.
//!
//! ## Example
//!
//! ```
//! use backstream_core::{BackedStream, OwnerToken, Producer};
//! use std::sync::{Arc, Mutex};
//!
//! let stream = BackedStream::<u32>::new();
//! let owner = OwnerToken::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = seen.clone();
//! stream.listen(owner, move |value| sink.lock().unwrap().push(value), |_| {});
//!
//! let (stale, stale_tx) = Producer::pending();
//! stream.back_with(stale);
//! stream.back_with(Producer::succeeded(2));
//!
//! stale_tx.succeed(1); // superseded, never delivered
//! assert_eq!(*seen.lock().unwrap(), vec![2]);
//! ```

use crate::owner::{ListenerId, OwnerToken, Subscription};
use crate::producer::{ObserverId, Producer};
use crate::Outcome;
use backstream_error::StreamError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// Result of handing an outcome to one listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Delivered,
    /// The consumer behind the listener no longer exists; prune it.
    OwnerGone,
}

pub(crate) type ListenerFn<T> = Arc<dyn Fn(Outcome<T>) -> Delivery + Send + Sync>;

struct Listener<T> {
    id: ListenerId,
    owner: OwnerToken,
    callback: ListenerFn<T>,
}

struct Backing<T> {
    producer: Producer<T>,
    observer: ObserverId,
}

struct BackedState<T> {
    generation: u64,
    backing: Option<Backing<T>>,
    last: Option<Outcome<T>>,
    listeners: Vec<Listener<T>>,
    next_listener: u64,
}

impl<T> BackedState<T> {
    fn is_live(&self, generation: u64, id: ListenerId) -> bool {
        self.generation == generation && self.listeners.iter().any(|l| l.id == id)
    }
}

/// A consumer-owned reactive value backed by a replaceable [`Producer`].
///
/// Cheap to clone; all clones share listeners and backing. See the
/// [module documentation](self) for the delivery rules.
pub struct BackedStream<T> {
    state: Arc<Mutex<BackedState<T>>>,
}

impl<T: Clone + Send + 'static> BackedStream<T> {
    /// Creates an unbacked stream with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BackedState {
                generation: 0,
                backing: None,
                last: None,
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    /// Replaces the current backing with `source`.
    ///
    /// The observer held on the previous backing is unregistered and its generation
    /// retired, so a late outcome from it never reaches a listener. If `source` has
    /// already resolved, its outcome is delivered to the current listeners before
    /// this call returns.
    pub fn back_with(&self, source: Producer<T>) {
        let (generation, previous) = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.last = None;
            (state.generation, state.backing.take())
        };
        if let Some(previous) = previous {
            previous.producer.unregister(previous.observer);
        }
        trace!(generation, "backing replaced");

        let weak = Arc::downgrade(&self.state);
        let observer = source.register_observer(move |outcome| {
            if let Some(state) = weak.upgrade() {
                deliver(&state, generation, outcome);
            }
        });

        let mut state = self.state.lock();
        if state.generation == generation {
            state.backing = Some(Backing {
                producer: source,
                observer,
            });
        } else {
            // A listener re-backed the stream during synchronous delivery.
            drop(state);
            source.unregister(observer);
        }
    }

    /// Drops the current backing without supplying a new one.
    ///
    /// Retires the current generation like [`back_with`](Self::back_with) does.
    /// Returns `true` if a backing was attached.
    pub fn detach(&self) -> bool {
        let previous = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.last = None;
            state.backing.take()
        };
        match previous {
            Some(previous) => {
                previous.producer.unregister(previous.observer);
                true
            }
            None => false,
        }
    }

    /// Registers callbacks for every future delivery under `owner`.
    ///
    /// If the current backing already resolved, the matching callback runs once
    /// with that outcome before this call returns.
    pub fn listen<S, F>(&self, owner: OwnerToken, on_success: S, on_failure: F) -> Subscription
    where
        S: Fn(T) + Send + Sync + 'static,
        F: Fn(StreamError) + Send + Sync + 'static,
    {
        self.listen_with(
            owner,
            Arc::new(move |outcome: Outcome<T>| {
                match outcome {
                    Ok(value) => on_success(value),
                    Err(error) => on_failure(error),
                }
                Delivery::Delivered
            }),
        )
    }

    /// Like [`listen`](Self::listen), but the callbacks receive `consumer` through a
    /// weak handle.
    ///
    /// The stream never keeps `consumer` alive. Once it has been dropped the
    /// callbacks are skipped and the listener is removed on the next delivery.
    pub fn listen_weak<C, S, F>(
        &self,
        owner: OwnerToken,
        consumer: &Arc<C>,
        on_success: S,
        on_failure: F,
    ) -> Subscription
    where
        C: Send + Sync + 'static,
        S: Fn(&C, T) + Send + Sync + 'static,
        F: Fn(&C, StreamError) + Send + Sync + 'static,
    {
        let consumer: Weak<C> = Arc::downgrade(consumer);
        self.listen_with(
            owner,
            Arc::new(move |outcome: Outcome<T>| {
                let Some(consumer) = consumer.upgrade() else {
                    return Delivery::OwnerGone;
                };
                match outcome {
                    Ok(value) => on_success(&consumer, value),
                    Err(error) => on_failure(&consumer, error),
                }
                Delivery::Delivered
            }),
        )
    }

    pub(crate) fn listen_with(&self, owner: OwnerToken, callback: ListenerFn<T>) -> Subscription {
        let (id, replay) = {
            let mut state = self.state.lock();
            let id = ListenerId(state.next_listener);
            state.next_listener += 1;
            state.listeners.push(Listener {
                id,
                owner,
                callback: Arc::clone(&callback),
            });
            let generation = state.generation;
            let replay = state.last.clone().map(|outcome| (generation, outcome));
            (id, replay)
        };

        if let Some((generation, outcome)) = replay {
            dispatch(&self.state, generation, vec![(id, callback)], &outcome);
        }
        Subscription { id, owner }
    }

    /// Removes a single listener. Returns `false` if it was already gone.
    pub fn unlisten(&self, subscription: &Subscription) -> bool {
        let mut state = self.state.lock();
        let before = state.listeners.len();
        state.listeners.retain(|l| l.id != subscription.id);
        state.listeners.len() != before
    }

    /// Removes every listener registered under `owner` and returns how many were
    /// removed.
    ///
    /// None of them is called by any delivery that starts afterwards, nor by the rest
    /// of a round this thread is currently running. A delivery in progress on another
    /// thread may still invoke a callback it checked before the removal.
    pub fn remove_owner(&self, owner: OwnerToken) -> usize {
        let mut state = self.state.lock();
        let before = state.listeners.len();
        state.listeners.retain(|l| l.owner != owner);
        let removed = before - state.listeners.len();
        debug!(removed, "owner listeners removed");
        removed
    }

    /// The outcome delivered for the current generation, if any.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome<T>> {
        self.state.lock().last.clone()
    }

    /// Number of `back_with`/`detach` calls so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    #[must_use]
    pub fn is_backed(&self) -> bool {
        self.state.lock().backing.is_some()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }
}

fn deliver<T: Clone>(state: &Arc<Mutex<BackedState<T>>>, generation: u64, outcome: Outcome<T>) {
    let listeners = {
        let mut guard = state.lock();
        if guard.generation != generation {
            debug!(
                generation,
                current = guard.generation,
                "dropping delivery from superseded backing"
            );
            return;
        }
        guard.last = Some(outcome.clone());
        guard
            .listeners
            .iter()
            .map(|l| (l.id, Arc::clone(&l.callback)))
            .collect::<Vec<_>>()
    };
    dispatch(state, generation, listeners, &outcome);
}

// Callbacks run unlocked so they may re-enter the stream. Before each call the
// listener is re-checked: it may have been removed, or the stream re-backed, by an
// earlier callback in the same round. The check and the call are not atomic with
// respect to other threads.
fn dispatch<T: Clone>(
    state: &Arc<Mutex<BackedState<T>>>,
    generation: u64,
    listeners: Vec<(ListenerId, ListenerFn<T>)>,
    outcome: &Outcome<T>,
) {
    for (id, callback) in listeners {
        {
            let guard = state.lock();
            if guard.generation != generation {
                return;
            }
            if !guard.is_live(generation, id) {
                continue;
            }
        }

        if callback(outcome.clone()) == Delivery::OwnerGone {
            state.lock().listeners.retain(|l| l.id != id);
            debug!("pruned listener whose consumer was dropped");
        }
    }
}

impl<T: Clone + Send + 'static> Default for BackedStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BackedStream<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for BackedStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BackedStream")
            .field("generation", &state.generation)
            .field("backed", &state.backing.is_some())
            .field("resolved", &state.last.is_some())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}
