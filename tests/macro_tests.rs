//! Integration tests for the `#[actor_testkit::test]` macro.

#![cfg(feature = "macros")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use actor_testkit::actor::{ActorHandle, Command, SpawnOptions};
use actor_testkit::assert::Eventual;
use actor_testkit::harness::ActorHarness;
use actor_testkit::mock::MockActorRuntime;

/// Basic async test through the macro.
#[actor_testkit::test]
async fn basic_async() {
    assert_eq!(2 + 2, 4);
}

/// A generous timeout does not interfere with a fast test.
#[actor_testkit::test(timeout = 30)]
async fn finishes_well_inside_the_timeout() {
    tokio::task::yield_now().await;
}

/// The timeout wrapper aborts a hung test.
#[actor_testkit::test(timeout = 1)]
#[should_panic(expected = "test timed out after 1s")]
async fn hung_test_is_aborted() {
    std::future::pending::<()>().await;
}

/// Multi-thread flavor is accepted.
#[actor_testkit::test(flavor = "multi_thread")]
async fn multi_thread_flavor() {
    let joined = tokio::spawn(async { 21 * 2 }).await.unwrap();
    assert_eq!(joined, 42);
}

static SEQUENTIAL_SECTION_BUSY: AtomicBool = AtomicBool::new(false);

async fn enter_sequential_section() {
    let was_busy = SEQUENTIAL_SECTION_BUSY.swap(true, Ordering::SeqCst);
    assert!(!was_busy, "sequential tests overlapped");
    tokio::time::sleep(Duration::from_millis(20)).await;
    SEQUENTIAL_SECTION_BUSY.store(false, Ordering::SeqCst);
}

/// Sequential tests hold the process-wide guard and never overlap,
/// even when the test binary runs them on different threads.
#[actor_testkit::test(sequential = true)]
async fn sequential_first() {
    enter_sequential_section().await;
}

/// See [`sequential_first`].
#[actor_testkit::test(sequential = true)]
async fn sequential_second() {
    enter_sequential_section().await;
}

/// End-to-end: spawn through a harness scope, assert on a pending
/// value, all inside a macro-generated test. The scope issues the
/// stops itself.
#[actor_testkit::test(timeout = 10)]
async fn harness_end_to_end() {
    let runtime = MockActorRuntime::new();
    let observer = runtime.clone();

    ActorHarness::scope(runtime, |harness| async move {
        harness.spawn_actor(None, SpawnOptions::new()).await?;
        let second = harness
            .spawn_actor(None, SpawnOptions::new().name("worker"))
            .await?;

        harness
            .check()
            .assert_eq(
                "worker".to_owned(),
                Eventual::pending({
                    let aid = second.aid().to_owned();
                    async move {
                        tokio::task::yield_now().await;
                        aid
                    }
                }),
            )
            .await
    })
    .await
    .unwrap();

    let send_log = observer.send_log();
    assert_eq!(send_log.len(), 2);
    assert_eq!(send_log[0], ("actor-1".to_owned(), Command::Stop));
    assert_eq!(send_log[1], ("worker".to_owned(), Command::Stop));
}

/// A failing scope body still stops every tracked actor before the
/// error reaches the caller.
#[actor_testkit::test(timeout = 10)]
async fn failing_scope_body_still_stops_actors() {
    let runtime = MockActorRuntime::new();
    let observer = runtime.clone();

    let error = ActorHarness::scope::<_, _, ()>(runtime, |harness| async move {
        harness.spawn_actor(None, SpawnOptions::new()).await?;
        harness
            .check()
            .assert_eq(1, Eventual::pending(async { 2 }))
            .await
    })
    .await
    .unwrap_err();

    assert!(error.is_assertion_failure());
    assert_eq!(
        observer.send_log(),
        vec![("actor-1".to_owned(), Command::Stop)],
    );
}
