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

//! The logger capability and the process-wide registry of named loggers.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::Level;
use crate::Message;

mod ack;
mod builder;
mod named;
mod registry;

pub use self::ack::Ack;
pub use self::builder::ConfigBuilder;
pub use self::builder::builder;
pub use self::named::NamedLogger;
pub use self::registry::Config;
pub use self::registry::Registry;
pub use self::registry::create;
pub use self::registry::get_logger;
pub use self::registry::initialise;
pub use self::registry::registry;
pub use self::registry::timestamp;
pub use self::registry::try_create;

/// Builds the message to log, given the level it is logged at.
pub type MessageFactory<'a> = &'a dyn Fn(Level) -> Message;

/// A destination for log messages.
///
/// Every operation is gated on the level: when the logger is not enabled for `level`, the call
/// does nothing and the message factory is never invoked.
pub trait Logger: fmt::Debug + Send + Sync + 'static {
    /// Whether a message at `level` would be delivered.
    ///
    /// Default to `true`.
    fn enabled(&self, level: Level) -> bool {
        let _ = level;
        true
    }

    /// Build and deliver a message, returning an [`Ack`] that resolves once the sink
    /// accepted it.
    ///
    /// Delivery starts before this method returns; the [`Ack`] only observes it.
    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack;

    /// Build and deliver a message without waiting for it.
    ///
    /// A failure already known when this returns is reported to the default
    /// [`Trap`](crate::trap::Trap); later failures are lost.
    fn log(&self, level: Level, factory: MessageFactory<'_>) {
        self.log_with_ack(level, factory).detach();
    }

    /// Deliver an already built message without waiting for it.
    fn log_simple(&self, message: Message) {
        let level = message.level();
        self.log(level, &|_| message.clone());
    }
}

impl<T: Logger + ?Sized> Logger for Arc<T> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        (**self).log_with_ack(level, factory)
    }

    fn log(&self, level: Level, factory: MessageFactory<'_>) {
        (**self).log(level, factory)
    }

    fn log_simple(&self, message: Message) {
        (**self).log_simple(message)
    }
}

impl<T: Logger> From<T> for Box<dyn Logger> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// Shorthands available on every [`Logger`].
pub trait LoggerExt: Logger {
    /// Log at [`Level::Verbose`].
    fn verbose(&self, factory: MessageFactory<'_>) {
        self.log(Level::Verbose, factory)
    }

    /// Log at [`Level::Debug`].
    fn debug(&self, factory: MessageFactory<'_>) {
        self.log(Level::Debug, factory)
    }

    /// Log at [`Level::Info`].
    fn info(&self, factory: MessageFactory<'_>) {
        self.log(Level::Info, factory)
    }

    /// Log at [`Level::Warn`].
    fn warn(&self, factory: MessageFactory<'_>) {
        self.log(Level::Warn, factory)
    }

    /// Log at [`Level::Error`].
    fn error(&self, factory: MessageFactory<'_>) {
        self.log(Level::Error, factory)
    }

    /// Log at [`Level::Fatal`].
    fn fatal(&self, factory: MessageFactory<'_>) {
        self.log(Level::Fatal, factory)
    }

    /// Log an event without fields.
    fn event(&self, level: Level, template: &str) {
        self.log(level, &|level| Message::event(level, template))
    }

    /// Log a gauge.
    fn gauge(&self, level: Level, value: i64, unit: &str) {
        self.log(level, &|level| Message::gauge(value, unit).with_level(level))
    }

    /// Run `f` and log how long it took as a gauge in nanoseconds, tagged with `measurement`.
    fn time<T>(&self, level: Level, measurement: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        let elapsed = i64::try_from(start.elapsed().as_nanos()).unwrap_or(i64::MAX);
        self.log(level, &|level| {
            Message::gauge(elapsed, "ns")
                .with_level(level)
                .with_field("measurement", measurement)
        });
        result
    }
}

impl<T: Logger + ?Sized> LoggerExt for T {}
