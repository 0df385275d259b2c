// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::producer::{Producer, Resolver};
use crate::Outcome;
use parking_lot::Mutex;
use std::sync::Arc;

struct JoinSlots<A, B> {
    left: Option<A>,
    right: Option<B>,
}

impl<A, B> JoinSlots<A, B> {
    fn take_pair(&mut self) -> Option<(A, B)> {
        if self.left.is_some() && self.right.is_some() {
            self.left.take().zip(self.right.take())
        } else {
            None
        }
    }
}

/// Combines two producers into one that resolves with both values.
///
/// The joined producer resolves to `Ok((a, b))` once both inputs succeeded, and to
/// the first `Err` observed as soon as either input fails, even while the other is
/// still pending. The pending side is left running; whatever it resolves to later
/// is ignored. Exactly one observer is registered on each input.
///
/// # Example
///
/// ```
/// use backstream_core::{join, Producer};
///
/// let (course, course_tx) = Producer::<&str>::pending();
/// let (enrolled, enrolled_tx) = Producer::<bool>::pending();
/// let joined = join(course, enrolled);
///
/// course_tx.succeed("CourseX");
/// assert!(!joined.is_resolved());
///
/// enrolled_tx.succeed(true);
/// assert_eq!(joined.outcome().unwrap().unwrap(), ("CourseX", true));
/// ```
pub fn join<A, B>(left: Producer<A>, right: Producer<B>) -> Producer<(A, B)>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
{
    let (joined, resolver) = Producer::pending();
    let slots = Arc::new(Mutex::new(JoinSlots {
        left: None,
        right: None,
    }));

    {
        let slots = Arc::clone(&slots);
        let resolver = resolver.clone();
        left.register_observer(move |outcome| {
            on_input(&resolver, outcome, |value| {
                let mut slots = slots.lock();
                slots.left = Some(value);
                slots.take_pair()
            });
        });
    }

    right.register_observer(move |outcome| {
        on_input(&resolver, outcome, |value| {
            let mut slots = slots.lock();
            slots.right = Some(value);
            slots.take_pair()
        });
    });

    joined
}

fn on_input<V, P, F>(resolver: &Resolver<P>, outcome: Outcome<V>, store: F)
where
    P: Clone + Send + 'static,
    F: FnOnce(V) -> Option<P>,
{
    match outcome {
        Ok(value) => {
            if resolver.is_resolved() {
                trace!("join already resolved, dropping late value");
                return;
            }
            if let Some(pair) = store(value) {
                resolver.succeed(pair);
            }
        }
        Err(error) => {
            if !resolver.fail(error) {
                trace!("join already resolved, dropping late failure");
            }
        }
    }
}

impl<A: Clone + Send + 'static> Producer<A> {
    /// Method form of [`join`].
    #[must_use]
    pub fn join<B>(self, other: Producer<B>) -> Producer<(A, B)>
    where
        B: Clone + Send + 'static,
    {
        join(self, other)
    }
}
