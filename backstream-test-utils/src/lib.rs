// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the backstream workspace.
//!
//! Not intended for production code.
//!
//! # Key Types
//!
//! ## `Recorder<T>`
//!
//! Collects every delivery made to the callbacks it hands out, so tests can assert
//! on exact delivery counts:
//!
//! ```rust
//! use backstream_core::{BackedStream, OwnerToken, Producer};
//! use backstream_test_utils::Recorder;
//!
//! let stream = BackedStream::<u32>::new();
//! let recorder = Recorder::new();
//! stream.listen(OwnerToken::new(), recorder.on_success(), recorder.on_failure());
//!
//! stream.back_with(Producer::succeeded(3));
//! assert_eq!(recorder.successes(), vec![3]);
//! ```
//!
//! ## Fixtures
//!
//! - [`Course`] (the catalog's own type) and [`course_x`](test_data::course_x) /
//!   [`course_y`](test_data::course_y)
//! - [`network_timeout`](test_data::network_timeout) and
//!   [`server_error`](test_data::server_error)

pub mod recorder;
pub mod test_data;

pub use backstream_catalog::Course;
pub use recorder::{Recorded, Recorder};
