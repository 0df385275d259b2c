// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use backstream_core::StreamError;
use std::fmt::{self, Display};

/// Catalog entry of a single course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub organization: String,
}

impl Course {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        organization: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            organization: organization.into(),
        }
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.organization)
    }
}

/// The user's enrollment record for a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub course_id: String,
    pub mode: String,
}

/// Reply to an enroll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollResponse {
    pub status: u16,
}

impl EnrollResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Course entry joined with the user's enrollment status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetail {
    pub course: Course,
    pub enrolled: bool,
}

/// What the primary button of the detail screen does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseAction {
    ViewCourse,
    EnrollNow,
}

impl CourseAction {
    #[must_use]
    pub const fn for_enrollment(enrolled: bool) -> Self {
        if enrolled {
            Self::ViewCourse
        } else {
            Self::EnrollNow
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoadState {
    Initial,
    Loading,
    Loaded(CourseDetail),
    Failed(StreamError),
}

impl LoadState {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Message shown to the user after an enroll attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentNotice {
    AlreadyEnrolled,
    Enrolled,
    EnrollmentFailed,
}
