// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::backed_stream::{BackedStream, Delivery};
use crate::owner::OwnerToken;
use crate::Outcome;
use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Async view of a [`BackedStream`]: one item per delivered generation.
///
/// Created by [`BackedStream::outcomes`]. The stream never ends on its own; drop it
/// to stop listening. The underlying listener is pruned on the first delivery after
/// the drop.
#[derive(Debug)]
pub struct Outcomes<T> {
    receiver: UnboundedReceiver<Outcome<T>>,
    owner: OwnerToken,
}

impl<T> Outcomes<T> {
    /// Token under which the backing listener is registered.
    #[must_use]
    pub const fn owner(&self) -> OwnerToken {
        self.owner
    }
}

impl<T> Stream for Outcomes<T> {
    type Item = Outcome<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().receiver).poll_next(cx)
    }
}

impl<T: Clone + Send + 'static> BackedStream<T> {
    /// Subscribes with a channel instead of callbacks.
    ///
    /// Follows the same rules as [`listen`](Self::listen), including replay of an
    /// outcome the current backing already delivered.
    ///
    /// ```
    /// use backstream_core::{BackedStream, Producer};
    /// use futures::StreamExt;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let stream = BackedStream::<u32>::new();
    /// let mut outcomes = stream.outcomes();
    ///
    /// stream.back_with(Producer::succeeded(5));
    /// assert_eq!(outcomes.next().await.unwrap().unwrap(), 5);
    /// # }
    /// ```
    #[must_use]
    pub fn outcomes(&self) -> Outcomes<T> {
        let (sender, receiver) = mpsc::unbounded();
        let owner = OwnerToken::new();
        self.listen_with(
            owner,
            Arc::new(move |outcome: Outcome<T>| {
                if sender.unbounded_send(outcome).is_ok() {
                    Delivery::Delivered
                } else {
                    Delivery::OwnerGone
                }
            }),
        );
        Outcomes { receiver, owner }
    }
}
