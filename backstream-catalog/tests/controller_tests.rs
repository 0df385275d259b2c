// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use backstream_catalog::{
    CatalogEnvironment, Course, CourseAction, CourseCatalog, CourseDetailController,
    EnrollResponse, Enrollment, EnrollmentNotice, EnrollmentService, LoadState, Navigator,
    Session,
};
use backstream_core::{Producer, Resolver, StreamError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const COURSE_ID: &str = "course-v1:edX+DemoX+2025";

fn demo_course() -> Course {
    Course::new(COURSE_ID, "Demo Course", "edX")
}

fn demo_enrollment() -> Enrollment {
    Enrollment {
        course_id: COURSE_ID.to_string(),
        mode: "audit".to_string(),
    }
}

#[derive(Default)]
struct FakeCatalog {
    requests: Mutex<Vec<(String, String)>>,
    pending: Mutex<Vec<Resolver<Course>>>,
}

impl FakeCatalog {
    fn resolve_latest(&self, outcome: Result<Course, StreamError>) {
        let resolver = self.pending.lock().pop().expect("a course request");
        resolver.resolve(outcome);
    }

    fn resolve_oldest(&self, outcome: Result<Course, StreamError>) {
        let resolver = self.pending.lock().remove(0);
        resolver.resolve(outcome);
    }
}

impl CourseCatalog for FakeCatalog {
    fn course(&self, course_id: &str, username: &str) -> Producer<Course> {
        self.requests
            .lock()
            .push((course_id.to_string(), username.to_string()));
        let (producer, resolver) = Producer::pending();
        self.pending.lock().push(resolver);
        producer
    }
}

#[derive(Default)]
struct FakeEnrollments {
    cached: AtomicBool,
    pending: Mutex<Vec<Resolver<Enrollment>>>,
    enroll_reply: Mutex<Option<Result<EnrollResponse, StreamError>>>,
    enroll_calls: AtomicUsize,
}

impl FakeEnrollments {
    fn resolve_latest(&self, outcome: Result<Enrollment, StreamError>) {
        let resolver = self.pending.lock().pop().expect("an enrollment request");
        resolver.resolve(outcome);
    }
}

impl EnrollmentService for FakeEnrollments {
    fn enrollment(&self, _course_id: &str) -> Producer<Enrollment> {
        let (producer, resolver) = Producer::pending();
        self.pending.lock().push(resolver);
        producer
    }

    fn is_enrolled(&self, _course_id: &str) -> bool {
        self.cached.load(Ordering::SeqCst)
    }

    fn enroll(&self, _course_id: &str) -> Producer<EnrollResponse> {
        self.enroll_calls.fetch_add(1, Ordering::SeqCst);
        match self.enroll_reply.lock().clone() {
            Some(reply) => Producer::ready(reply),
            None => Producer::pending().0,
        }
    }
}

struct FakeSession(Option<String>);

impl Session for FakeSession {
    fn username(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NavEvent {
    MyCourses(String, Option<EnrollmentNotice>),
    Overlay(EnrollmentNotice),
}

#[derive(Default)]
struct FakeNavigator {
    events: Mutex<Vec<NavEvent>>,
}

impl Navigator for FakeNavigator {
    fn show_my_courses(&self, course_id: &str, notice: Option<EnrollmentNotice>) {
        self.events
            .lock()
            .push(NavEvent::MyCourses(course_id.to_string(), notice));
    }

    fn show_overlay(&self, notice: EnrollmentNotice) {
        self.events.lock().push(NavEvent::Overlay(notice));
    }
}

struct Fixture {
    catalog: Arc<FakeCatalog>,
    enrollments: Arc<FakeEnrollments>,
    navigator: Arc<FakeNavigator>,
    controller: Arc<CourseDetailController>,
}

impl Fixture {
    fn new(username: Option<&str>) -> Self {
        let catalog = Arc::new(FakeCatalog::default());
        let enrollments = Arc::new(FakeEnrollments::default());
        let navigator = Arc::new(FakeNavigator::default());
        let environment = CatalogEnvironment {
            catalog: catalog.clone(),
            enrollments: enrollments.clone(),
            session: Arc::new(FakeSession(username.map(str::to_string))),
            navigator: navigator.clone(),
        };
        let controller = CourseDetailController::new(environment, COURSE_ID);
        Self {
            catalog,
            enrollments,
            navigator,
            controller,
        }
    }

    fn signed_in() -> Self {
        Self::new(Some("staff"))
    }

    fn nav_events(&self) -> Vec<NavEvent> {
        self.navigator.events.lock().clone()
    }
}

fn completion_counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move || {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_start_requests_course_for_signed_in_user() {
    // Arrange
    let fixture = Fixture::signed_in();

    // Act
    fixture.controller.start();

    // Assert
    assert!(matches!(fixture.controller.load_state(), LoadState::Loading));
    assert_eq!(
        *fixture.catalog.requests.lock(),
        vec![(COURSE_ID.to_string(), "staff".to_string())]
    );
    assert_eq!(fixture.controller.course_id(), COURSE_ID);
}

#[test]
fn test_enrolled_user_gets_view_course_action() {
    // Arrange
    let fixture = Fixture::signed_in();
    fixture.controller.start();

    // Act
    fixture.catalog.resolve_latest(Ok(demo_course()));
    fixture.enrollments.resolve_latest(Ok(demo_enrollment()));

    // Assert
    match fixture.controller.load_state() {
        LoadState::Loaded(detail) => {
            assert_eq!(detail.course, demo_course());
            assert!(detail.enrolled);
        }
        other => panic!("expected loaded state, got {other:?}"),
    }
    assert_eq!(fixture.controller.action(), Some(CourseAction::ViewCourse));
}

#[test]
fn test_failed_enrollment_lookup_means_not_enrolled() {
    // Arrange
    let fixture = Fixture::signed_in();
    fixture.controller.start();

    // Act
    fixture
        .enrollments
        .resolve_latest(Err(StreamError::upstream("HTTP 404")));
    fixture.catalog.resolve_latest(Ok(demo_course()));

    // Assert
    assert!(fixture.controller.load_state().is_loaded());
    assert_eq!(fixture.controller.action(), Some(CourseAction::EnrollNow));
}

#[test]
fn test_course_failure_shows_failed_state() {
    // Arrange
    let fixture = Fixture::signed_in();
    fixture.controller.start();

    // Act
    fixture
        .catalog
        .resolve_latest(Err(StreamError::timeout("NetworkTimeout")));

    // Assert
    assert!(matches!(
        fixture.controller.load_state(),
        LoadState::Failed(StreamError::Timeout { .. })
    ));
    assert_eq!(fixture.controller.action(), None);
}

#[test]
fn test_missing_user_fails_without_requests() {
    // Arrange
    let fixture = Fixture::new(None);

    // Act
    fixture.controller.start();

    // Assert
    assert!(fixture.controller.load_state().is_failed());
    assert!(fixture.catalog.requests.lock().is_empty());
}

#[test]
fn test_reload_ignores_answers_to_superseded_load() {
    // Arrange
    let fixture = Fixture::signed_in();
    fixture.controller.start();
    fixture.controller.load();

    // Act: the second load completes first
    fixture.catalog.resolve_latest(Ok(demo_course()));
    fixture.enrollments.resolve_latest(Ok(demo_enrollment()));
    fixture
        .catalog
        .resolve_oldest(Err(StreamError::upstream("stale")));

    // Assert
    assert!(fixture.controller.load_state().is_loaded());
    assert_eq!(fixture.controller.detail().generation(), 2);
}

#[test]
fn test_view_course_action_navigates_without_notice() {
    // Arrange
    let fixture = Fixture::signed_in();
    fixture.controller.start();
    fixture.catalog.resolve_latest(Ok(demo_course()));
    fixture.enrollments.resolve_latest(Ok(demo_enrollment()));
    let (completions, completion) = completion_counter();

    // Act
    fixture.controller.perform_action(completion);

    // Assert
    assert_eq!(
        fixture.nav_events(),
        vec![NavEvent::MyCourses(COURSE_ID.to_string(), None)]
    );
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.enrollments.enroll_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_enroll_when_cache_says_enrolled_skips_request() {
    // Arrange
    let fixture = Fixture::signed_in();
    fixture.enrollments.cached.store(true, Ordering::SeqCst);
    let (completions, completion) = completion_counter();

    // Act
    fixture.controller.enroll_in_course(completion);

    // Assert
    assert_eq!(
        fixture.nav_events(),
        vec![NavEvent::MyCourses(
            COURSE_ID.to_string(),
            Some(EnrollmentNotice::AlreadyEnrolled)
        )]
    );
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.enrollments.enroll_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_successful_enroll_navigates_with_notice() {
    // Arrange
    let fixture = Fixture::signed_in();
    *fixture.enrollments.enroll_reply.lock() = Some(Ok(EnrollResponse { status: 201 }));
    fixture.controller.start();
    fixture.catalog.resolve_latest(Ok(demo_course()));
    fixture
        .enrollments
        .resolve_latest(Err(StreamError::upstream("HTTP 404")));
    let (completions, completion) = completion_counter();

    // Act
    fixture.controller.perform_action(completion);

    // Assert
    assert_eq!(
        fixture.nav_events(),
        vec![NavEvent::MyCourses(
            COURSE_ID.to_string(),
            Some(EnrollmentNotice::Enrolled)
        )]
    );
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_rejected_enroll_shows_overlay() {
    // Arrange
    let fixture = Fixture::signed_in();
    *fixture.enrollments.enroll_reply.lock() = Some(Ok(EnrollResponse { status: 403 }));
    let (completions, completion) = completion_counter();

    // Act
    fixture.controller.enroll_in_course(completion);

    // Assert
    assert_eq!(
        fixture.nav_events(),
        vec![NavEvent::Overlay(EnrollmentNotice::EnrollmentFailed)]
    );
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_enroll_request_shows_overlay() {
    // Arrange
    let fixture = Fixture::signed_in();
    *fixture.enrollments.enroll_reply.lock() =
        Some(Err(StreamError::timeout("NetworkTimeout")));
    let (completions, completion) = completion_counter();

    // Act
    fixture.controller.enroll_in_course(completion);

    // Assert
    assert_eq!(
        fixture.nav_events(),
        vec![NavEvent::Overlay(EnrollmentNotice::EnrollmentFailed)]
    );
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_teardown_stops_state_updates() {
    // Arrange
    let fixture = Fixture::signed_in();
    fixture.controller.start();

    // Act
    let removed = fixture.controller.teardown();
    fixture.catalog.resolve_latest(Ok(demo_course()));
    fixture.enrollments.resolve_latest(Ok(demo_enrollment()));

    // Assert
    assert_eq!(removed, 1);
    assert!(matches!(fixture.controller.load_state(), LoadState::Loading));
    assert!(fixture.controller.detail().outcome().is_some());
}

#[test]
fn test_dropped_controller_is_not_kept_alive_by_pending_requests() {
    // Arrange
    let fixture = Fixture::signed_in();
    fixture.controller.start();
    let weak = Arc::downgrade(&fixture.controller);
    let Fixture {
        catalog,
        enrollments,
        controller,
        ..
    } = fixture;

    // Act
    drop(controller);
    catalog.resolve_latest(Ok(demo_course()));
    enrollments.resolve_latest(Ok(demo_enrollment()));

    // Assert
    assert!(weak.upgrade().is_none());
}

#[tokio::test]
async fn test_enroll_completion_runs_after_async_reply() -> anyhow::Result<()> {
    // Arrange
    let fixture = Fixture::signed_in();
    let (reply, reply_tx) = Producer::<EnrollResponse>::pending();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();

    struct AsyncEnrollments {
        reply: Producer<EnrollResponse>,
    }
    impl EnrollmentService for AsyncEnrollments {
        fn enrollment(&self, _course_id: &str) -> Producer<Enrollment> {
            Producer::pending().0
        }
        fn is_enrolled(&self, _course_id: &str) -> bool {
            false
        }
        fn enroll(&self, _course_id: &str) -> Producer<EnrollResponse> {
            self.reply.clone()
        }
    }

    let environment = CatalogEnvironment {
        catalog: fixture.catalog.clone(),
        enrollments: Arc::new(AsyncEnrollments { reply }),
        session: Arc::new(FakeSession(Some("staff".to_string()))),
        navigator: fixture.navigator.clone(),
    };
    let controller = CourseDetailController::new(environment, COURSE_ID);

    // Act
    controller.enroll_in_course(move || {
        let _ = done_tx.send(());
    });
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        reply_tx.succeed(EnrollResponse { status: 200 });
    });
    tokio::time::timeout(Duration::from_secs(5), done_rx).await??;

    // Assert
    assert_eq!(
        fixture.nav_events(),
        vec![NavEvent::MyCourses(
            COURSE_ID.to_string(),
            Some(EnrollmentNotice::Enrolled)
        )]
    );
    Ok(())
}
