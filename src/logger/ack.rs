// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use futures_util::future::join_all;

use crate::Error;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// A handle that resolves once a message has been accepted by its sink.
///
/// Await it to learn about delivery failures. Dropping or [detaching](Ack::detach) it does
/// not cancel anything: delivery was already underway when the handle was returned.
#[must_use = "await the ack to observe delivery, or call `detach` to ignore it"]
pub struct Ack {
    state: State,
}

enum State {
    // `None` once the result has been taken by a poll
    Ready(Option<Result<(), Error>>),
    Pending(BoxFuture<'static, Result<(), Error>>),
}

impl fmt::Debug for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Ready(result) => f.debug_tuple("Ack::Ready").field(result).finish(),
            State::Pending(_) => f.write_str("Ack::Pending"),
        }
    }
}

impl Ack {
    /// An ack that has already succeeded.
    pub fn done() -> Ack {
        Ack::ready(Ok(()))
    }

    /// An ack that has already completed with `result`.
    pub fn ready(result: Result<(), Error>) -> Ack {
        Ack {
            state: State::Ready(Some(result)),
        }
    }

    /// An ack that completes when `future` does.
    pub fn from_future<F>(future: F) -> Ack
    where
        F: Future<Output = Result<(), Error>> + Send + 'static,
    {
        Ack {
            state: State::Pending(future.boxed()),
        }
    }

    /// An ack that completes when another ack, sent later through `receiver`, completes.
    ///
    /// Resolves to an error if the sender is dropped without sending.
    pub fn from_receiver(receiver: oneshot::Receiver<Ack>) -> Ack {
        Ack::from_future(async move {
            match receiver.await {
                Ok(ack) => ack.await,
                Err(_) => Err(Error::delivery_abandoned()),
            }
        })
    }

    /// An ack that completes once every ack in `acks` has completed.
    ///
    /// Succeeds when all of them succeed. Otherwise, fails with an error listing every
    /// failure as a source, in the order of `acks`.
    pub fn join(acks: impl IntoIterator<Item = Ack>) -> Ack {
        let acks: Vec<Ack> = acks.into_iter().collect();
        if acks.iter().all(Ack::is_ready) {
            let results = acks.into_iter().filter_map(FutureExt::now_or_never);
            return Ack::ready(aggregate(results.collect()));
        }
        Ack::from_future(async move { aggregate(join_all(acks).await) })
    }

    /// Whether the outcome is already known.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Stop observing the delivery. A failure already known is reported to the default trap.
    pub fn detach(self) {
        self.detach_with(&DefaultTrap::default());
    }

    /// Stop observing the delivery. A failure already known is reported to `trap`.
    pub fn detach_with(self, trap: &dyn Trap) {
        if let State::Ready(Some(Err(err))) = self.state {
            trap.trap(&err);
        }
    }
}

impl Future for Ack {
    type Output = Result<(), Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            State::Ready(result) => Poll::Ready(result.take().unwrap_or(Ok(()))),
            State::Pending(future) => future.as_mut().poll(cx),
        }
    }
}

fn aggregate(results: Vec<Result<(), Error>>) -> Result<(), Error> {
    let total = results.len();
    let failures: Vec<Error> = results.into_iter().filter_map(Result::err).collect();
    if failures.is_empty() {
        return Ok(());
    }

    let err = Error::delivery_failed(failures.len(), total);
    Err(failures.into_iter().fold(err, Error::with_source))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::Ack;
    use crate::Error;
    use crate::ErrorKind;
    use crate::trap::Trap;

    #[derive(Debug, Default)]
    struct RecordingTrap(Mutex<Vec<String>>);

    impl Trap for RecordingTrap {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.message().to_owned());
        }
    }

    #[tokio::test]
    async fn join_of_ready_acks_is_ready() {
        let ack = Ack::join([Ack::done(), Ack::done()]);
        assert!(ack.is_ready());
        assert!(ack.await.is_ok());

        let ack = Ack::join([]);
        assert!(ack.is_ready());
        assert!(ack.await.is_ok());
    }

    #[tokio::test]
    async fn join_aggregates_failures_in_order() {
        let (tx, rx) = oneshot::channel();
        let ack = Ack::join([
            Ack::ready(Err(Error::new("disk full"))),
            Ack::done(),
            Ack::from_receiver(rx),
        ]);
        assert!(!ack.is_ready());

        tx.send(Ack::ready(Err(Error::new("broken pipe")))).unwrap();
        let err = ack.await.unwrap_err();
        assert_eq!(err.message(), "failed to deliver to 2 of 3 targets");
        assert_eq!(err.kind(), ErrorKind::Delivery);
        let sources: Vec<String> = err.sources().map(|s| s.to_string()).collect();
        assert_eq!(sources, ["disk full", "broken pipe"]);
    }

    #[tokio::test]
    async fn abandoned_receiver_fails() {
        let (tx, rx) = oneshot::channel::<Ack>();
        drop(tx);
        let err = Ack::from_receiver(rx).await.unwrap_err();
        assert_eq!(err.message(), "delivery was abandoned before completion");
        assert_eq!(err.kind(), ErrorKind::Abandoned);
    }

    #[test]
    fn detach_reports_known_failures() {
        let trap = RecordingTrap::default();
        Ack::done().detach_with(&trap);
        Ack::ready(Err(Error::new("closed"))).detach_with(&trap);
        Ack::from_future(async { Err(Error::new("unobserved")) }).detach_with(&trap);
        assert_eq!(*trap.0.lock().unwrap(), ["closed"]);
    }
}
