//! # Fan-Out Executor
//!
//! Runs N independent units of work concurrently and returns exactly N
//! outcomes, index-aligned with the input.
//!
//! Every unit is spawned onto its own tokio task before anything is awaited,
//! so units make progress in parallel. The executor then waits for each task
//! against one shared deadline. A task still running at the deadline is
//! aborted and reported as `NodeOutcome::TimedOut`; tasks that already
//! finished keep their result even if the executor only looks at them after
//! the deadline.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};

use crate::domain::{NodeError, NodeOutcome};

/// Deadline used when `now + timeout` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Run `units` concurrently, bounded by `timeout`.
///
/// `outcomes[i]` corresponds to `units[i]` regardless of completion order.
/// An empty input returns an empty vector without touching the runtime.
///
/// Each unit must own everything it touches (`'static`); bind per-node
/// state by moving it into the future, never by sharing a loop variable.
pub async fn fan_out<T, Fut>(units: Vec<Fut>, timeout: Duration) -> Vec<NodeOutcome<T>>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, NodeError>> + Send + 'static,
{
    if units.is_empty() {
        return Vec::new();
    }

    let now = Instant::now();
    let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
    let handles: Vec<JoinHandle<Result<T, NodeError>>> =
        units.into_iter().map(tokio::spawn).collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for mut handle in handles {
        let outcome = match timeout_at(deadline, &mut handle).await {
            Ok(Ok(result)) => NodeOutcome::from(result),
            Ok(Err(join_error)) => NodeOutcome::Failed(NodeError::TaskAborted(
                if join_error.is_panic() {
                    "callback panicked".to_string()
                } else {
                    join_error.to_string()
                },
            )),
            Err(_elapsed) => {
                handle.abort();
                NodeOutcome::TimedOut(timeout)
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}
