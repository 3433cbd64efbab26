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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

use logforth_facade::Ack;
use logforth_facade::Error;
use logforth_facade::Level;
use logforth_facade::Logger;
use logforth_facade::Message;
use logforth_facade::MessageFactory;
use logforth_facade::append::AsyncBuilder;
use logforth_facade::append::CombiningTarget;
use rand::Rng;

/// Acknowledges each message from another thread after a delay.
#[derive(Debug)]
struct Delayed {
    delay: Duration,
    fail: bool,
    acked: Arc<AtomicUsize>,
}

impl Logger for Delayed {
    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        let _ = factory(level);
        let (done, receiver) = oneshot::channel();
        let delay = self.delay;
        let fail = self.fail;
        let acked = self.acked.clone();
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            acked.fetch_add(1, Ordering::SeqCst);
            let result = if fail {
                Err(Error::new("member timed out"))
            } else {
                Ok(())
            };
            let _ = done.send(Ack::ready(result));
        });
        Ack::from_receiver(receiver)
    }
}

/// Blocks the calling thread for `delay`, then records when and what it delivered.
#[derive(Debug)]
struct Blocking {
    delay: Duration,
    delivered: Arc<Mutex<Vec<(Instant, i64)>>>,
}

impl Logger for Blocking {
    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        let message = factory(level);
        std::thread::sleep(self.delay);
        let entry = (Instant::now(), message.timestamp());
        self.delivered.lock().unwrap().push(entry);
        Ack::done()
    }
}

fn delayed(millis: u64, fail: bool, acked: &Arc<AtomicUsize>) -> Delayed {
    Delayed {
        delay: Duration::from_millis(millis),
        fail,
        acked: acked.clone(),
    }
}

fn message(level: Level) -> Message {
    Message::event(level, "fan {out}").with_field("out", 2)
}

#[tokio::test]
async fn test_ack_waits_for_every_member() {
    let mut rng = rand::rng();
    for _ in 0..10 {
        let acked = Arc::new(AtomicUsize::new(0));
        let first = rng.random_range(1..30);
        let second = rng.random_range(1..30);
        let target = CombiningTarget::default()
            .chain(delayed(first, false, &acked))
            .chain(delayed(second, false, &acked));

        let ack = target.log_with_ack(Level::Info, &message);
        assert!(!ack.is_ready());
        ack.await.unwrap();
        assert_eq!(acked.load(Ordering::SeqCst), 2, "delays {first}ms and {second}ms");
    }
}

#[tokio::test]
async fn test_slow_member_does_not_hold_back_others() {
    let acked = Arc::new(AtomicUsize::new(0));
    let target = CombiningTarget::default()
        .chain(delayed(200, false, &acked))
        .chain(
            AsyncBuilder::new("combining-fast-member")
                .target(delayed(0, false, &acked))
                .build(),
        );

    let ack = target.log_with_ack(Level::Info, &message);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(acked.load(Ordering::SeqCst), 1);
    ack.await.unwrap();
    assert_eq!(acked.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failures_are_aggregated_after_all_members_finish() {
    let acked = Arc::new(AtomicUsize::new(0));
    let target = CombiningTarget::default()
        .chain(delayed(20, true, &acked))
        .chain(delayed(5, false, &acked))
        .chain(delayed(10, true, &acked));

    let err = target
        .log_with_ack(Level::Error, &message)
        .await
        .unwrap_err();
    assert_eq!(acked.load(Ordering::SeqCst), 3);
    assert_eq!(err.message(), "failed to deliver to 2 of 3 targets");
    assert_eq!(err.sources().len(), 2);
}

#[tokio::test]
async fn test_blocking_member_does_not_delay_the_others() {
    let slow = Arc::new(Mutex::new(vec![]));
    let fast = Arc::new(Mutex::new(vec![]));
    let target = CombiningTarget::default()
        .chain(Blocking {
            delay: Duration::from_millis(300),
            delivered: slow.clone(),
        })
        .chain(Blocking {
            delay: Duration::ZERO,
            delivered: fast.clone(),
        });

    let built = AtomicUsize::new(0);
    let start = Instant::now();
    target
        .log_with_ack(Level::Info, &|level| {
            let n = built.fetch_add(1, Ordering::SeqCst) as i64;
            message(level).with_timestamp(1_000 + n)
        })
        .await
        .unwrap();

    assert_eq!(built.load(Ordering::SeqCst), 1);
    let (fast_at, fast_timestamp) = fast.lock().unwrap()[0];
    let (slow_at, slow_timestamp) = slow.lock().unwrap()[0];
    assert!(fast_at.duration_since(start) < Duration::from_millis(150));
    assert!(slow_at.duration_since(start) >= Duration::from_millis(300));
    assert_eq!(fast_timestamp, slow_timestamp);
}
