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
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::TrySendError;

use crate::Ack;
use crate::Error;
use crate::Level;
use crate::Logger;
use crate::Message;
use crate::append::CombiningTarget;
use crate::logger::MessageFactory;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// A target that delivers messages to its members on a dedicated thread.
///
/// Messages are still built on the caller's thread, and only when a member is enabled for
/// the level. The [`Ack`] returned by [`log_with_ack`](Logger::log_with_ack) resolves once the
/// members acknowledged the message. Failures of fire-and-forget calls are sent to the
/// configured [`Trap`].
///
/// With [`overflow_drop_incoming`](AsyncBuilder::overflow_drop_incoming), a message that
/// finds the queue full is dropped and reported as [`ErrorKind::QueueFull`](crate::ErrorKind).
///
/// Dropping the target delivers every queued message before returning.
#[derive(Debug)]
pub struct AsyncTarget {
    target: Arc<CombiningTarget>,
    overflow: Overflow,
    trap: Arc<dyn Trap>,
    state: Option<State>,
}

#[derive(Debug)]
struct State {
    sender: Sender<Task>,
    handle: JoinHandle<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overflow {
    /// Block until the queue has room.
    Block,
    /// Drop incoming messages while the queue is full.
    DropIncoming,
}

struct Task {
    level: Level,
    message: Message,
    // `None` when nobody waits for the outcome
    done: Option<oneshot::Sender<Ack>>,
}

impl AsyncTarget {
    fn send_task(&self, task: Task) -> Result<(), Error> {
        let Some(State { sender, .. }) = &self.state else {
            return Err(Error::async_target_closed());
        };

        match self.overflow {
            Overflow::Block => sender.send(task).map_err(|_| Error::async_send_failed()),
            Overflow::DropIncoming => match sender.try_send(task) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Err(Error::async_queue_full()),
                Err(TrySendError::Disconnected(_)) => Err(Error::async_send_failed()),
            },
        }
    }
}

impl Logger for AsyncTarget {
    fn enabled(&self, level: Level) -> bool {
        self.target.enabled(level)
    }

    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        if !self.enabled(level) {
            return Ack::done();
        }

        let (done, receiver) = oneshot::channel();
        let task = Task {
            level,
            message: factory(level),
            done: Some(done),
        };
        match self.send_task(task) {
            Ok(()) => Ack::from_receiver(receiver),
            Err(err) => Ack::ready(Err(err)),
        }
    }

    fn log(&self, level: Level, factory: MessageFactory<'_>) {
        if !self.enabled(level) {
            return;
        }

        let task = Task {
            level,
            message: factory(level),
            done: None,
        };
        if let Err(err) = self.send_task(task) {
            self.trap.trap(&err);
        }
    }
}

impl Drop for AsyncTarget {
    fn drop(&mut self) {
        if let Some(State { sender, handle }) = self.state.take() {
            // drop our sender, the worker breaks its loop once the queue is drained
            drop(sender);
            handle.join().expect("failed to join async target thread");
        }
    }
}

struct Worker {
    target: Arc<CombiningTarget>,
    receiver: Receiver<Task>,
    trap: Arc<dyn Trap>,
}

impl Worker {
    fn run(self) {
        let Self {
            target,
            receiver,
            trap,
        } = self;

        while let Ok(task) = receiver.recv() {
            let Task {
                level,
                message,
                done,
            } = task;
            let ack = target.log_with_ack(level, &|_| message.clone());
            match done {
                Some(done) => {
                    if let Err(err) = done.send(ack) {
                        err.into_inner().detach_with(trap.as_ref());
                    }
                }
                None => ack.detach_with(trap.as_ref()),
            }
        }
    }
}

/// A builder for configuring an [`AsyncTarget`].
///
/// # Examples
///
/// ```
/// use logforth_facade::Level;
/// use logforth_facade::append::AsyncBuilder;
/// use logforth_facade::append::ConsoleTarget;
///
/// let target = AsyncBuilder::new("logforth-facade-async")
///     .target(ConsoleTarget::stderr(Level::Info))
///     .buffered_messages_limit(Some(1024))
///     .overflow_drop_incoming()
///     .build();
/// ```
#[must_use = "call `build` to create the async target"]
#[derive(Debug)]
pub struct AsyncBuilder {
    thread_name: String,
    target: CombiningTarget,
    buffered_messages_limit: Option<usize>,
    trap: Box<dyn Trap>,
    overflow: Overflow,
}

impl AsyncBuilder {
    /// Create a new async target builder.
    pub fn new(thread_name: impl Into<String>) -> AsyncBuilder {
        AsyncBuilder {
            thread_name: thread_name.into(),
            target: CombiningTarget::default(),
            buffered_messages_limit: None,
            trap: Box::new(DefaultTrap::default()),
            overflow: Overflow::Block,
        }
    }

    /// Set the buffer size of pending messages. Unbounded if `None`.
    pub fn buffered_messages_limit(mut self, buffered_messages_limit: Option<usize>) -> Self {
        self.buffered_messages_limit = buffered_messages_limit;
        self
    }

    /// Set the overflow policy to block when the buffer is full.
    pub fn overflow_block(mut self) -> Self {
        self.overflow = Overflow::Block;
        self
    }

    /// Set the overflow policy to drop incoming messages when the buffer is full.
    pub fn overflow_drop_incoming(mut self) -> Self {
        self.overflow = Overflow::DropIncoming;
        self
    }

    /// Set the trap for failures nobody waits for.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Add a member target.
    pub fn target(mut self, target: impl Into<Box<dyn Logger>>) -> Self {
        self.target = self.target.chain(target);
        self
    }

    /// Build the async target.
    pub fn build(self) -> AsyncTarget {
        let Self {
            thread_name,
            target,
            buffered_messages_limit,
            trap,
            overflow,
        } = self;

        let target = Arc::new(target);
        let trap: Arc<dyn Trap> = Arc::from(trap);
        let (sender, receiver) = match buffered_messages_limit {
            Some(limit) => crossbeam_channel::bounded(limit),
            None => crossbeam_channel::unbounded(),
        };

        let worker = Worker {
            target: target.clone(),
            receiver,
            trap: trap.clone(),
        };
        let handle = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || worker.run())
            .expect("failed to spawn async target thread");

        AsyncTarget {
            target,
            overflow,
            trap,
            state: Some(State { sender, handle }),
        }
    }
}
