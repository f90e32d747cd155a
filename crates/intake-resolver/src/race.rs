//! First-success race between two fallible futures.

use std::future::{Future, poll_fn};
use std::task::Poll;

/// Result of [`first_ok`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Race<L, R, E> {
    /// The left future succeeded first.
    Left(L),
    /// The right future succeeded first.
    Right(R),
    /// Neither future succeeded.
    BothFailed {
        /// Error from the left future.
        left: E,
        /// Error from the right future.
        right: E,
    },
}

/// Drive both futures until one succeeds.
///
/// Both sides are polled on every wake-up before a winner is picked, so each
/// side has started by the time the race settles. The loser is dropped as soon
/// as a winner is known; when both succeed in the same poll the left side
/// wins. A failure on one side only settles the race once the other side has
/// also finished.
pub(crate) async fn first_ok<L, R, E, FL, FR>(left: FL, right: FR) -> Race<L, R, E>
where
    FL: Future<Output = Result<L, E>>,
    FR: Future<Output = Result<R, E>>,
{
    tokio::pin!(left);
    tokio::pin!(right);
    let mut left_done: Option<Result<L, E>> = None;
    let mut right_done: Option<Result<R, E>> = None;

    poll_fn(|cx| {
        if left_done.is_none()
            && let Poll::Ready(result) = left.as_mut().poll(cx)
        {
            left_done = Some(result);
        }
        if right_done.is_none()
            && let Poll::Ready(result) = right.as_mut().poll(cx)
        {
            right_done = Some(result);
        }

        match (left_done.take(), right_done.take()) {
            (Some(Ok(value)), _) => Poll::Ready(Race::Left(value)),
            (_, Some(Ok(value))) => Poll::Ready(Race::Right(value)),
            (Some(Err(left)), Some(Err(right))) => Poll::Ready(Race::BothFailed { left, right }),
            (pending_left, pending_right) => {
                left_done = pending_left;
                right_done = pending_right;
                Poll::Pending
            }
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    async fn after<T>(ms: u64, value: T) -> T {
        sleep(Duration::from_millis(ms)).await;
        value
    }

    #[tokio::test(start_paused = true)]
    async fn faster_success_wins() {
        let race = first_ok(
            after(20, Ok::<_, &str>("left")),
            after(10, Ok::<_, &str>("right")),
        )
        .await;
        assert_eq!(race, Race::Right("right"));
    }

    #[tokio::test(start_paused = true)]
    async fn early_failure_waits_for_the_other_side() {
        let race = first_ok(
            after(1, Err::<&str, _>("left broke")),
            after(50, Ok::<_, &str>("right")),
        )
        .await;
        assert_eq!(race, Race::Right("right"));

        let race = first_ok(
            after(50, Ok::<_, &str>("left")),
            after(1, Err::<&str, _>("right broke")),
        )
        .await;
        assert_eq!(race, Race::Left("left"));
    }

    #[tokio::test(start_paused = true)]
    async fn both_failures_are_reported() {
        let race = first_ok(
            after(5, Err::<(), _>("left broke")),
            after(1, Err::<(), _>("right broke")),
        )
        .await;
        assert_eq!(
            race,
            Race::BothFailed {
                left: "left broke",
                right: "right broke",
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn loser_is_dropped_before_it_completes() {
        let loser_finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&loser_finished);
        let loser = async move {
            sleep(Duration::from_millis(100)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, &str>("late")
        };

        let race = first_ok(after(10, Ok::<_, &str>("early")), loser).await;
        assert_eq!(race, Race::Left("early"));

        sleep(Duration::from_millis(500)).await;
        assert!(!loser_finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn immediate_winner_still_starts_the_other_side() {
        let started = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&started);
        let slow = async move {
            flag.store(true, Ordering::SeqCst);
            std::future::pending::<Result<(), &str>>().await
        };

        let race = first_ok(async { Ok::<_, &str>("ready") }, slow).await;
        assert_eq!(race, Race::Left("ready"));
        assert!(started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn simultaneous_successes_prefer_the_left_side() {
        let race = first_ok(async { Ok::<_, &str>("left") }, async {
            Ok::<_, &str>("right")
        })
        .await;
        assert_eq!(race, Race::Left("left"));
    }
}
