// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Collaborators the course-detail controller talks to.
//!
//! Networking, session storage and navigation live outside this crate; the
//! controller only sees these traits.

use crate::domain::{Course, EnrollResponse, Enrollment, EnrollmentNotice};
use backstream_core::Producer;
use std::sync::Arc;

pub trait CourseCatalog: Send + Sync {
    /// Fetches the catalog entry of `course_id` as seen by `username`.
    fn course(&self, course_id: &str, username: &str) -> Producer<Course>;
}

pub trait EnrollmentService: Send + Sync {
    /// Fetches the user's enrollment in `course_id`; fails when not enrolled.
    fn enrollment(&self, course_id: &str) -> Producer<Enrollment>;

    /// Cached lookup, answered without a request.
    fn is_enrolled(&self, course_id: &str) -> bool;

    fn enroll(&self, course_id: &str) -> Producer<EnrollResponse>;
}

pub trait Session: Send + Sync {
    fn username(&self) -> Option<String>;
}

pub trait Navigator: Send + Sync {
    fn show_my_courses(&self, course_id: &str, notice: Option<EnrollmentNotice>);

    fn show_overlay(&self, notice: EnrollmentNotice);
}

#[derive(Clone)]
pub struct CatalogEnvironment {
    pub catalog: Arc<dyn CourseCatalog>,
    pub enrollments: Arc<dyn EnrollmentService>,
    pub session: Arc<dyn Session>,
    pub navigator: Arc<dyn Navigator>,
}
