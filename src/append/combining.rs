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

use std::panic;
use std::thread;

use crate::Ack;
use crate::Level;
use crate::Logger;
use crate::Message;
use crate::logger::MessageFactory;

/// A target that fans each message out to an ordered list of member targets.
///
/// The message is built once and every member receives a copy of it.
///
/// [`log`](Logger::log) and [`log_simple`](Logger::log_simple) hand the message to every
/// member in order. [`log_with_ack`](Logger::log_with_ack) hands it to all enabled members
/// concurrently, one scoped thread each, and joins their acks, so a member that blocks only
/// delays the joined ack. The joined ack fails when any member fails, listing every failure
/// as a source in member order.
///
/// # Examples
///
/// ```
/// use logforth_facade::Level;
/// use logforth_facade::append::CombiningTarget;
/// use logforth_facade::append::ConsoleTarget;
/// use logforth_facade::append::DebugOutputTarget;
///
/// let target = CombiningTarget::default()
///     .chain(ConsoleTarget::stdout(Level::Info))
///     .chain(DebugOutputTarget::new(Level::Verbose));
/// ```
#[derive(Debug, Default)]
pub struct CombiningTarget {
    targets: Vec<Box<dyn Logger>>,
}

impl CombiningTarget {
    /// Create a combining target over `targets`.
    pub fn new(targets: impl IntoIterator<Item = Box<dyn Logger>>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// Append a member target.
    pub fn chain(mut self, target: impl Into<Box<dyn Logger>>) -> Self {
        self.targets.push(target.into());
        self
    }

    /// The member targets, in order.
    pub fn targets(&self) -> &[Box<dyn Logger>] {
        &self.targets
    }
}

impl Logger for CombiningTarget {
    fn enabled(&self, level: Level) -> bool {
        self.targets.iter().any(|target| target.enabled(level))
    }

    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        if !self.enabled(level) {
            return Ack::done();
        }

        let message = factory(level);
        let copy = &|_: Level| message.clone();
        let enabled = self
            .targets
            .iter()
            .filter(|target| target.enabled(level))
            .count();
        if enabled == 1 {
            // no other member to wait on
            return Ack::join(self.targets.iter().map(|target| match target.enabled(level) {
                true => target.log_with_ack(level, copy),
                false => Ack::done(),
            }));
        }

        let acks = thread::scope(|scope| {
            let handles = self
                .targets
                .iter()
                .map(|target| match target.enabled(level) {
                    true => Some(scope.spawn(move || target.log_with_ack(level, copy))),
                    false => None,
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| match handle {
                    Some(handle) => match handle.join() {
                        Ok(ack) => ack,
                        Err(payload) => panic::resume_unwind(payload),
                    },
                    None => Ack::done(),
                })
                .collect::<Vec<_>>()
        });
        Ack::join(acks)
    }

    fn log(&self, level: Level, factory: MessageFactory<'_>) {
        if !self.enabled(level) {
            return;
        }

        let message = factory(level);
        for target in &self.targets {
            target.log(level, &|_| message.clone());
        }
    }

    fn log_simple(&self, message: Message) {
        for target in &self.targets {
            target.log_simple(message.clone());
        }
    }
}
