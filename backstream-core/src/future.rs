// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridges between producers and `async` code.

use crate::producer::Producer;
use crate::Outcome;
use backstream_error::StreamError;
use futures::channel::oneshot;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future returned by awaiting a [`Producer`].
///
/// Completes with the producer's outcome, or with [`StreamError::Abandoned`] if every
/// resolver was dropped before resolving.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct ProducerFuture<T> {
    receiver: oneshot::Receiver<Outcome<T>>,
}

impl<T> Future for ProducerFuture<T> {
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(StreamError::Abandoned)))
    }
}

impl<T: Clone + Send + 'static> IntoFuture for Producer<T> {
    type Output = Outcome<T>;
    type IntoFuture = ProducerFuture<T>;

    fn into_future(self) -> Self::IntoFuture {
        let (sender, receiver) = oneshot::channel();
        self.register_observer(move |outcome| {
            let _ = sender.send(outcome);
        });
        ProducerFuture { receiver }
    }
}

#[cfg(feature = "runtime-tokio")]
impl<T: Clone + Send + 'static> Producer<T> {
    /// Runs `future` on the Tokio runtime and resolves the returned producer with
    /// its output.
    ///
    /// This is the adapter for async collaborators such as HTTP clients. Observers
    /// run on whichever runtime thread completes the future.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    ///
    /// ```
    /// use backstream_core::Producer;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let producer = Producer::spawn(async { Ok(40 + 2) });
    /// assert_eq!(producer.await.unwrap(), 42);
    /// # }
    /// ```
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        let (producer, resolver) = Self::pending();
        tokio::spawn(async move {
            resolver.resolve(future.await);
        });
        producer
    }
}
