//! Network fetch raced against a soft deadline.
//!
//! The fetch runs in its own task, so losing the race only stops the caller's
//! wait. The task keeps running and its result can still be collected later.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::fetch::Fetch;
use netfirst_core::{Error, Request, Response};

/// A network fetch that has been started and not yet collected.
#[derive(Debug)]
pub struct InFlight {
    handle: JoinHandle<Result<Response, Error>>,
}

impl InFlight {
    /// Start fetching `request` in a background task.
    pub fn spawn(network: Arc<dyn Fetch>, request: Arc<Request>) -> Self {
        let handle = tokio::spawn(async move { network.fetch(&request).await });
        Self { handle }
    }

    /// Wait for the fetch to settle.
    pub async fn settle(self) -> Result<Response, Error> {
        flatten(self.handle.await)
    }
}

fn flatten(joined: Result<Result<Response, Error>, tokio::task::JoinError>) -> Result<Response, Error> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(Error::Network(format!("fetch task failed: {e}"))),
    }
}

/// How the race between the network and the deadline ended.
#[derive(Debug)]
pub enum RaceOutcome {
    /// The fetch resolved before the deadline.
    NetworkWon(Response),
    /// The fetch failed before the deadline.
    NetworkLost(Error),
    /// The deadline passed first; the fetch is still running.
    TimedOut(InFlight),
}

/// Race `in_flight` against `timeout`.
///
/// A fetch that settles on the deadline itself wins. The timer is dropped as
/// soon as this returns.
pub async fn race(mut in_flight: InFlight, timeout: Duration) -> RaceOutcome {
    match tokio::time::timeout(timeout, &mut in_flight.handle).await {
        Ok(joined) => match flatten(joined) {
            Ok(response) => RaceOutcome::NetworkWon(response),
            Err(e) => RaceOutcome::NetworkLost(e),
        },
        Err(_) => RaceOutcome::TimedOut(in_flight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::testing::{FakeNetwork, network_response};
    use tokio::time::Instant;

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn start(network: FakeNetwork) -> InFlight {
        InFlight::spawn(Arc::new(network), Arc::new(Request::get("https://example.com/")))
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_wins_before_deadline() {
        let response = network_response("fast");
        let outcome = race(start(FakeNetwork::respond_after(Duration::from_millis(90), response.clone())), TIMEOUT).await;
        assert!(matches!(outcome, RaceOutcome::NetworkWon(r) if r == response));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_before_deadline() {
        let clock = Instant::now();
        let outcome = race(start(FakeNetwork::fail("offline")), TIMEOUT).await;
        assert!(matches!(outcome, RaceOutcome::NetworkLost(Error::Network(msg)) if msg == "offline"));
        assert!(clock.elapsed() < TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_first_keeps_fetch_running() {
        let response = network_response("slow");
        let outcome = race(start(FakeNetwork::respond_after(Duration::from_millis(105), response.clone())), TIMEOUT).await;

        let RaceOutcome::TimedOut(in_flight) = outcome else {
            panic!("expected the deadline to win");
        };
        assert_eq!(in_flight.settle().await.unwrap(), response);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_fires_on_time_when_network_hangs() {
        let clock = Instant::now();
        let outcome = race(start(FakeNetwork::never()), TIMEOUT).await;
        assert!(matches!(outcome, RaceOutcome::TimedOut(_)));
        assert!(clock.elapsed() >= TIMEOUT);
        assert!(clock.elapsed() < TIMEOUT + Duration::from_millis(5));
    }
}
