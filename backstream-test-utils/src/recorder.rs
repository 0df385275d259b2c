// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use backstream_core::Outcome;
use backstream_error::StreamError;
use parking_lot::Mutex;
use std::sync::Arc;

/// One delivery seen by a [`Recorder`].
#[derive(Debug, Clone)]
pub enum Recorded<T> {
    Success(T),
    Failure(StreamError),
}

impl<T> Recorded<T> {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Thread-safe log of deliveries, in arrival order.
///
/// Clones share the same log.
#[derive(Debug)]
pub struct Recorder<T> {
    log: Arc<Mutex<Vec<Recorded<T>>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Success callback for `BackedStream::listen`.
    pub fn on_success(&self) -> impl Fn(T) + Send + Sync + 'static {
        let log = Arc::clone(&self.log);
        move |value| log.lock().push(Recorded::Success(value))
    }

    /// Failure callback for `BackedStream::listen`.
    pub fn on_failure(&self) -> impl Fn(StreamError) + Send + Sync + 'static {
        let log = Arc::clone(&self.log);
        move |error| log.lock().push(Recorded::Failure(error))
    }

    /// Observer for `Producer::register_observer`.
    pub fn observer(&self) -> impl FnOnce(Outcome<T>) + Send + 'static {
        let log = Arc::clone(&self.log);
        move |outcome| {
            log.lock().push(match outcome {
                Ok(value) => Recorded::Success(value),
                Err(error) => Recorded::Failure(error),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    pub fn entries(&self) -> Vec<Recorded<T>> {
        self.log.lock().clone()
    }

    pub fn successes(&self) -> Vec<T> {
        self.log
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                Recorded::Success(value) => Some(value.clone()),
                Recorded::Failure(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<StreamError> {
        self.log
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                Recorded::Success(_) => None,
                Recorded::Failure(error) => Some(error.clone()),
            })
            .collect()
    }
}

impl<T: Clone + Send + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}
