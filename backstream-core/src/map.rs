// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::producer::Producer;
use crate::Outcome;
use backstream_error::StreamError;

impl<T: Clone + Send + 'static> Producer<T> {
    /// Transforms the whole outcome once the source resolves.
    ///
    /// `transform` runs at most once, synchronously inside the source's delivery.
    /// This is the general form behind [`map`](Self::map) and
    /// [`map_err`](Self::map_err); use it to turn failures into values:
    ///
    /// ```
    /// use backstream_core::{Producer, StreamError};
    ///
    /// let enrollment = Producer::<u32>::failed(StreamError::upstream("404"));
    /// let enrolled = enrollment.map_outcome(|outcome| Ok(outcome.is_ok()));
    ///
    /// assert!(!enrolled.outcome().unwrap().unwrap());
    /// ```
    #[must_use]
    pub fn map_outcome<U, F>(self, transform: F) -> Producer<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Outcome<T>) -> Outcome<U> + Send + 'static,
    {
        let (mapped, resolver) = Producer::pending();
        self.register_observer(move |outcome| {
            resolver.resolve(transform(outcome));
        });
        mapped
    }

    /// Transforms a successful value; failures pass through unchanged.
    #[must_use]
    pub fn map<U, F>(self, transform: F) -> Producer<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.map_outcome(move |outcome| outcome.map(transform))
    }

    /// Transforms a failure; successful values pass through unchanged.
    #[must_use]
    pub fn map_err<F>(self, transform: F) -> Producer<T>
    where
        F: FnOnce(StreamError) -> StreamError + Send + 'static,
    {
        self.map_outcome(move |outcome| outcome.map_err(transform))
    }
}

/// Free-function form of [`Producer::map`].
#[must_use]
pub fn map<T, U, F>(producer: Producer<T>, transform: F) -> Producer<U>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
    F: FnOnce(T) -> U + Send + 'static,
{
    producer.map(transform)
}
