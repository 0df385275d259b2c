// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::domain::{CourseAction, CourseDetail, EnrollResponse, EnrollmentNotice, LoadState};
use crate::environment::CatalogEnvironment;
use backstream_core::{join, BackedStream, Outcome, OwnerToken, Producer, StreamError};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

struct ViewState {
    load_state: LoadState,
    action: Option<CourseAction>,
}

/// Headless course-detail screen.
///
/// Loads the catalog entry and the enrollment status of one course, joins them
/// into a single [`BackedStream`], and derives the load state and primary action
/// from whatever that stream delivers. Every [`load`](Self::load) re-backs the
/// stream, so an answer from an earlier load can never overwrite a newer one.
pub struct CourseDetailController {
    course_id: String,
    environment: CatalogEnvironment,
    owner: OwnerToken,
    detail: BackedStream<CourseDetail>,
    view: Mutex<ViewState>,
}

impl CourseDetailController {
    #[must_use]
    pub fn new(environment: CatalogEnvironment, course_id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            course_id: course_id.into(),
            environment,
            owner: OwnerToken::new(),
            detail: BackedStream::new(),
            view: Mutex::new(ViewState {
                load_state: LoadState::Initial,
                action: None,
            }),
        })
    }

    /// Subscribes to the detail stream and issues the first load.
    pub fn start(self: &Arc<Self>) {
        self.detail.listen_weak(
            self.owner,
            self,
            |controller, detail| controller.apply(detail),
            |controller, error| controller.fail(error),
        );
        self.load();
    }

    /// Starts fresh course and enrollment requests and re-backs the detail stream
    /// with their join.
    pub fn load(&self) {
        self.view.lock().load_state = LoadState::Loading;

        let Some(username) = self.environment.session.username() else {
            warn!(course_id = %self.course_id, "cannot load course detail without a signed-in user");
            self.detail
                .back_with(Producer::failed(StreamError::upstream("no signed-in user")));
            return;
        };

        let course = self.environment.catalog.course(&self.course_id, &username);
        let enrolled = self
            .environment
            .enrollments
            .enrollment(&self.course_id)
            .map_outcome(|outcome| Ok(outcome.is_ok()));
        let detail =
            join(course, enrolled).map(|(course, enrolled)| CourseDetail { course, enrolled });

        debug!(course_id = %self.course_id, "loading course detail");
        self.detail.back_with(detail);
    }

    fn apply(&self, detail: CourseDetail) {
        let mut view = self.view.lock();
        view.action = Some(CourseAction::for_enrollment(detail.enrolled));
        view.load_state = LoadState::Loaded(detail);
    }

    fn fail(&self, error: StreamError) {
        warn!(course_id = %self.course_id, %error, "course detail failed to load");
        let mut view = self.view.lock();
        view.action = None;
        view.load_state = LoadState::Failed(error);
    }

    /// Runs the primary action. `completion` is called exactly once, after any
    /// navigation the action triggers.
    pub fn perform_action<F>(self: &Arc<Self>, completion: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let action = self.view.lock().action;
        match action {
            Some(CourseAction::ViewCourse) => {
                self.environment
                    .navigator
                    .show_my_courses(&self.course_id, None);
                completion();
            }
            Some(CourseAction::EnrollNow) => self.enroll_in_course(completion),
            None => {
                debug!(course_id = %self.course_id, "no action available before load");
                completion();
            }
        }
    }

    /// Enrolls the user unless the cached enrollment says they already are.
    ///
    /// `completion` runs once the request has been answered, even if the
    /// controller has been dropped by then.
    pub fn enroll_in_course<F>(self: &Arc<Self>, completion: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.environment.enrollments.is_enrolled(&self.course_id) {
            self.environment
                .navigator
                .show_my_courses(&self.course_id, Some(EnrollmentNotice::AlreadyEnrolled));
            completion();
            return;
        }

        let controller: Weak<Self> = Arc::downgrade(self);
        self.environment
            .enrollments
            .enroll(&self.course_id)
            .register_observer(move |outcome| {
                if let Some(controller) = controller.upgrade() {
                    controller.finish_enrollment(&outcome);
                }
                completion();
            });
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn finish_enrollment(&self, outcome: &Outcome<EnrollResponse>) {
        let navigator = &self.environment.navigator;
        match outcome {
            Ok(response) if response.is_success() => {
                info!(course_id = %self.course_id, "user enrolled in course");
                navigator.show_my_courses(&self.course_id, Some(EnrollmentNotice::Enrolled));
            }
            Ok(response) => {
                warn!(course_id = %self.course_id, status = response.status, "enroll request rejected");
                navigator.show_overlay(EnrollmentNotice::EnrollmentFailed);
            }
            Err(error) => {
                warn!(course_id = %self.course_id, %error, "enroll request failed");
                navigator.show_overlay(EnrollmentNotice::EnrollmentFailed);
            }
        }
    }

    /// Removes this controller's listeners; later deliveries reach nobody.
    pub fn teardown(&self) -> usize {
        self.detail.remove_owner(self.owner)
    }

    #[must_use]
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.view.lock().load_state.clone()
    }

    #[must_use]
    pub fn action(&self) -> Option<CourseAction> {
        self.view.lock().action
    }

    /// The detail stream, for additional observers.
    #[must_use]
    pub const fn detail(&self) -> &BackedStream<CourseDetail> {
        &self.detail
    }
}
