// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Course-detail screen logic on top of backstream.
//!
//! [`CourseDetailController`] fetches a course's catalog entry and the user's
//! enrollment status, joins them, and exposes the resulting load state and
//! primary action (view the course, or enroll). Rendering, navigation and
//! networking are supplied by the host through the traits in [`environment`].

#[macro_use]
mod logging;

pub mod controller;
pub mod domain;
pub mod environment;

pub use controller::CourseDetailController;
pub use domain::{
    Course, CourseAction, CourseDetail, EnrollResponse, Enrollment, EnrollmentNotice, LoadState,
};
pub use environment::{CatalogEnvironment, CourseCatalog, EnrollmentService, Navigator, Session};
