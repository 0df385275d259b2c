// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Single-shot reactive values.
//!
//! This crate provides the building blocks for loading a value from several
//! asynchronous sources and presenting it to a consumer that may reload at any time:
//!
//! - **[`Producer`]**: a single-shot asynchronous result with observer registration
//! - **[`join`]** / **[`Producer::map`]**: combinators that build new producers
//! - **[`BackedStream`]**: a consumer-owned value whose producer can be swapped
//!   without re-subscribing
//!
//! # Example
//!
//! ```
//! use backstream_core::{join, BackedStream, OwnerToken, Producer, StreamError};
//! use std::sync::{Arc, Mutex};
//!
//! let detail = BackedStream::<(String, bool)>::new();
//! let failures = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = failures.clone();
//! detail.listen(
//!     OwnerToken::new(),
//!     |_| {},
//!     move |error| sink.lock().unwrap().push(error.to_string()),
//! );
//!
//! let (course, course_tx) = Producer::pending();
//! let (enrolled, _enrolled_tx) = Producer::pending();
//! detail.back_with(join(course, enrolled));
//!
//! course_tx.fail(StreamError::timeout("network"));
//! assert_eq!(*failures.lock().unwrap(), vec!["Timeout error: network"]);
//! ```
//!
//! # Threading
//!
//! Delivery is synchronous on the thread that resolves a producer. State is guarded
//! by `parking_lot` mutexes that are never held while user callbacks run, so the
//! types are `Send + Sync` and callbacks may call back into them.

#[macro_use]
mod logging;

pub mod backed_stream;
pub mod future;
pub mod join;
pub mod map;
pub mod outcomes;
pub mod owner;
pub mod producer;

pub use self::backed_stream::BackedStream;
pub use self::future::ProducerFuture;
pub use self::join::join;
pub use self::map::map;
pub use self::outcomes::Outcomes;
pub use self::owner::{ListenerId, OwnerToken, Subscription};
pub use self::producer::{ObserverId, Producer, Resolver};
pub use backstream_error::{IntoStreamError, Result, ResultExt, StreamError};

/// Terminal result of a producer.
pub type Outcome<T> = Result<T>;
