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

use crate::Ack;
use crate::Level;
use crate::Logger;
use crate::layout::PlainTextLayout;
use crate::logger::MessageFactory;

/// A target that forwards plain text lines to the [`log`] crate.
///
/// Lines use the same format as [`ConsoleTarget`](crate::append::ConsoleTarget), without
/// colors. Each line is logged with the message's dotted name as the `log` target, or
/// `logforth_facade` for unnamed messages. [`Level::Fatal`] maps to [`log::Level::Error`].
///
/// # Examples
///
/// ```
/// use logforth_facade::Level;
/// use logforth_facade::append::DebugOutputTarget;
///
/// let target = DebugOutputTarget::new(Level::Debug);
/// ```
#[derive(Debug)]
pub struct DebugOutputTarget {
    min_level: Level,
    layout: PlainTextLayout,
}

impl DebugOutputTarget {
    /// Forward messages at `min_level` or above.
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level,
            layout: PlainTextLayout::default(),
        }
    }

    /// Set the layout of the lines.
    pub fn layout(mut self, layout: PlainTextLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Logger for DebugOutputTarget {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level && log::Level::from(level) <= log::max_level()
    }

    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        if !self.enabled(level) {
            return Ack::done();
        }

        let message = factory(level);
        let line = self.layout.format(&message);
        let target = if message.name().is_empty() {
            "logforth_facade".to_owned()
        } else {
            message.name().to_string()
        };
        log::log!(target: target.as_str(), log::Level::from(level), "{line}");
        Ack::done()
    }
}
