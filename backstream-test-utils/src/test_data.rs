// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use backstream_catalog::Course;
use backstream_error::StreamError;

#[derive(Debug, thiserror::Error)]
#[error("Test error: {0}")]
pub struct TestError(pub String);

impl TestError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub fn course_x() -> Course {
    Course::new("course-v1:edX+X101+2025", "CourseX", "edX")
}

pub fn course_y() -> Course {
    Course::new("course-v1:edX+Y202+2025", "CourseY", "edX")
}

pub fn network_timeout() -> StreamError {
    StreamError::timeout("NetworkTimeout")
}

pub fn server_error() -> StreamError {
    StreamError::upstream("HTTP 500")
}

pub fn user_error(msg: &str) -> StreamError {
    StreamError::user(TestError::new(msg))
}

/// True when both errors have the same variant and message.
pub fn same_error(left: &StreamError, right: &StreamError) -> bool {
    std::mem::discriminant(left) == std::mem::discriminant(right)
        && left.to_string() == right.to_string()
}
