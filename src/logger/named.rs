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

use crate::Level;
use crate::Message;
use crate::PointName;
use crate::logger::Ack;
use crate::logger::Logger;
use crate::logger::MessageFactory;

/// A logger bound to a name path.
///
/// Messages without a name are stamped with this logger's name before they reach the target.
/// Cloning is cheap and clones share the target.
#[derive(Debug, Clone)]
pub struct NamedLogger {
    name: PointName,
    target: Arc<dyn Logger>,
}

impl NamedLogger {
    /// Bind `target` to `name`.
    pub fn new(name: PointName, target: Arc<dyn Logger>) -> NamedLogger {
        NamedLogger { name, target }
    }

    /// The name stamped onto messages.
    pub fn name(&self) -> &PointName {
        &self.name
    }

    /// The logger that receives the stamped messages.
    pub fn target(&self) -> &Arc<dyn Logger> {
        &self.target
    }

    fn stamp(&self, message: Message) -> Message {
        if message.name().is_empty() {
            message.with_name(self.name.clone())
        } else {
            message
        }
    }
}

impl Logger for NamedLogger {
    fn enabled(&self, level: Level) -> bool {
        self.target.enabled(level)
    }

    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        self.target
            .log_with_ack(level, &|level| self.stamp(factory(level)))
    }

    fn log(&self, level: Level, factory: MessageFactory<'_>) {
        self.target.log(level, &|level| self.stamp(factory(level)))
    }

    fn log_simple(&self, message: Message) {
        self.target.log_simple(self.stamp(message))
    }
}
