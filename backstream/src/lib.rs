// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Backstream
//!
//! Load a value from several asynchronous sources and hand it to a consumer that may
//! reload at any time, without ever showing it a stale answer.
//!
//! ## Overview
//!
//! - **Production code**: build [`Producer`]s from your requests, combine them with
//!   [`join`] and [`Producer::map`], and feed the result into a [`BackedStream`] that
//!   your screen or service listens to once.
//! - **Reloading**: call [`BackedStream::back_with`] with the new producer. Listeners
//!   stay registered; the old producer's answer is dropped.
//! - **Teardown**: register listeners under an [`OwnerToken`] and remove them all with
//!   [`BackedStream::remove_owner`].
//!
//! ## Quick Start
//!
//! ```rust
//! use backstream::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let profile = BackedStream::<(String, u32)>::new();
//! let owner = OwnerToken::new();
//! let shown = Arc::new(Mutex::new(None));
//!
//! let sink = shown.clone();
//! profile.listen(owner, move |value| *sink.lock().unwrap() = Some(value), |_| {});
//!
//! let (name, name_tx) = Producer::pending();
//! let (age, age_tx) = Producer::pending();
//! profile.back_with(join(name, age));
//!
//! age_tx.succeed(41);
//! name_tx.succeed("Ada".to_string());
//! assert_eq!(*shown.lock().unwrap(), Some(("Ada".to_string(), 41)));
//!
//! profile.remove_owner(owner);
//! ```

pub use backstream_core::{
    join, map, BackedStream, ListenerId, ObserverId, Outcome, Outcomes, OwnerToken, Producer,
    ProducerFuture, Resolver, Subscription,
};
pub use backstream_error::{IntoStreamError, Result, ResultExt, StreamError};

#[cfg(feature = "catalog")]
pub use backstream_catalog as catalog;

/// Prelude module for convenient imports
pub mod prelude {
    pub use backstream_core::{join, BackedStream, Outcome, OwnerToken, Producer, Resolver};
    pub use backstream_error::{ResultExt, StreamError};
}
