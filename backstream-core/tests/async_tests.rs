// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use backstream_core::{join, BackedStream, Producer, StreamError};
use backstream_test_utils::test_data::{course_x, course_y, network_timeout};
use backstream_test_utils::Course;
use futures::StreamExt;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn test_awaiting_producer_yields_outcome() -> anyhow::Result<()> {
    // Arrange
    let (course, course_tx) = Producer::<Course>::pending();
    let waiter = tokio::spawn(async move { course.await });

    // Act
    course_tx.succeed(course_x());

    // Assert
    assert_eq!(waiter.await??, course_x());
    Ok(())
}

#[tokio::test]
async fn test_awaiting_abandoned_producer_yields_abandoned() {
    // Arrange
    let (course, course_tx) = Producer::<Course>::pending();
    let future = course.into_future();

    // Act
    drop(course_tx);

    // Assert
    assert!(matches!(future.await, Err(StreamError::Abandoned)));
}

#[tokio::test]
async fn test_spawned_producers_join_in_any_order() -> anyhow::Result<()> {
    // Arrange
    let course = Producer::spawn(async {
        sleep(Duration::from_millis(10)).await;
        Ok(course_x())
    });
    let enrolled = Producer::spawn(async {
        sleep(Duration::from_millis(15)).await;
        Ok(true)
    });

    // Act
    let detail = join(course, enrolled).await?;

    // Assert
    assert_eq!(detail, (course_x(), true));
    Ok(())
}

#[tokio::test]
async fn test_spawned_failure_short_circuits_join() {
    // Arrange
    let course = Producer::<Course>::spawn(async {
        sleep(Duration::from_millis(5)).await;
        Err(network_timeout())
    });
    let enrolled = Producer::<bool>::spawn(async {
        sleep(Duration::from_secs(30)).await;
        Ok(true)
    });

    // Act
    let joined = join(course, enrolled).into_future();
    let outcome = tokio::time::timeout(Duration::from_secs(5), joined).await;

    // Assert
    assert!(matches!(outcome, Ok(Err(StreamError::Timeout { .. }))));
}

#[tokio::test]
async fn test_outcomes_stream_yields_one_item_per_generation() -> anyhow::Result<()> {
    // Arrange
    let stream = BackedStream::<Course>::new();
    let mut outcomes = stream.outcomes();
    let (stale, stale_tx) = Producer::pending();
    stream.back_with(stale);

    // Act
    stream.back_with(Producer::succeeded(course_x()));
    stale_tx.succeed(course_y());
    stream.back_with(Producer::failed(network_timeout()));

    // Assert
    assert_eq!(outcomes.next().await.expect("first item")?, course_x());
    assert!(matches!(
        outcomes.next().await,
        Some(Err(StreamError::Timeout { .. }))
    ));
    Ok(())
}

#[tokio::test]
async fn test_dropped_outcomes_stream_is_pruned() {
    // Arrange
    let stream = BackedStream::<Course>::new();
    let outcomes = stream.outcomes();
    assert_eq!(stream.listener_count(), 1);

    // Act
    drop(outcomes);
    stream.back_with(Producer::succeeded(course_x()));

    // Assert
    assert_eq!(stream.listener_count(), 0);
}
