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
use std::io;

/// The kind of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A level code outside `1..=6`.
    InvalidLevelCode,
    /// A logger name or name path without any non-empty segment.
    InvalidName,
    /// A sink failed to write or flush.
    Io,
    /// A background target's queue was full and the message was dropped.
    QueueFull,
    /// A background target no longer accepts messages.
    Closed,
    /// A delivery was dropped before it reported an outcome.
    Abandoned,
    /// One or more members of a fan-out failed.
    Delivery,
    /// Any other failure, typically raised by a user-defined target.
    Unexpected,
}

impl ErrorKind {
    /// A short lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidLevelCode => "invalid level code",
            ErrorKind::InvalidName => "invalid name",
            ErrorKind::Io => "io",
            ErrorKind::QueueFull => "queue full",
            ErrorKind::Closed => "closed",
            ErrorKind::Abandoned => "abandoned",
            ErrorKind::Delivery => "delivery",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error struct of logforth-facade.
///
/// Carries a kind, a message, ordered context pairs and any number of underlying sources. Sink
/// failures reach callers through an awaited [`Ack`](crate::Ack); invalid names and level
/// codes are reported through the `try_*` constructors.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    sources: Vec<anyhow::Error>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        for (i, (k, v)) in self.context.iter().enumerate() {
            let sep = if i == 0 { ", context: { " } else { ", " };
            write!(f, "{sep}{k}: {v}")?;
        }
        if !self.context.is_empty() {
            f.write_str(" }")?;
        }

        for (i, source) in self.sources.iter().enumerate() {
            let sep = if i == 0 { ", sources: [" } else { ", " };
            write!(f, "{sep}{source}")?;
        }
        if !self.sources.is_empty() {
            f.write_str("]")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .field("sources", &self.sources)
                .finish();
        }

        writeln!(f, "{} ({})", self.message, self.kind)?;
        if !self.context.is_empty() {
            writeln!(f, "\nContext:")?;
            for (k, v) in &self.context {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        if !self.sources.is_empty() {
            writeln!(f, "\nSources:")?;
            for source in &self.sources {
                writeln!(f, "   {source:#}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create a new [`ErrorKind::Unexpected`] error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Unexpected, message)
    }

    /// Create a new error of the given kind.
    pub fn with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
            sources: vec![],
        }
    }

    /// Return the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the message of this error, without context and sources.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Add one more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Add one more source in error.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }

    /// Return an iterator over all sources of this error.
    pub fn sources(&self) -> impl ExactSizeIterator<Item = &(dyn std::error::Error + 'static)> {
        self.sources.iter().map(|v| v.as_ref())
    }

    /// A sink failed to write an entry.
    pub fn from_io_error(err: io::Error) -> Error {
        Error::with_kind(ErrorKind::Io, "failed to write log entry").with_source(err)
    }

    pub(crate) fn invalid_level_code(code: i64) -> Error {
        Error::with_kind(ErrorKind::InvalidLevelCode, "invalid level code")
            .with_context("code", code)
    }

    pub(crate) fn empty_name(name: &str) -> Error {
        Error::with_kind(ErrorKind::InvalidName, "logger name must not be empty")
            .with_context("name", name)
    }

    pub(crate) fn empty_name_path() -> Error {
        Error::with_kind(ErrorKind::InvalidName, "name path must not be empty")
    }

    pub(crate) fn empty_name_segment(index: usize) -> Error {
        Error::with_kind(ErrorKind::InvalidName, "name path segment must not be empty")
            .with_context("index", index)
    }

    pub(crate) fn delivery_abandoned() -> Error {
        Error::with_kind(ErrorKind::Abandoned, "delivery was abandoned before completion")
    }

    pub(crate) fn delivery_failed(failed: usize, total: usize) -> Error {
        let message = format!("failed to deliver to {failed} of {total} targets");
        Error::with_kind(ErrorKind::Delivery, message)
    }

    pub(crate) fn async_target_closed() -> Error {
        Error::with_kind(ErrorKind::Closed, "async target is shut down")
    }

    pub(crate) fn async_send_failed() -> Error {
        Error::with_kind(ErrorKind::Closed, "failed to send message to async target")
    }

    pub(crate) fn async_queue_full() -> Error {
        Error::with_kind(ErrorKind::QueueFull, "async target queue is full")
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::Error;
    use super::ErrorKind;

    #[test]
    fn display_lists_context_and_sources() {
        let err = Error::new("failed to deliver")
            .with_context("target", "console")
            .with_context("level", "warn")
            .with_source(Error::new("broken pipe"));

        assert_eq!(
            err.to_string(),
            "failed to deliver, context: { target: console, level: warn }, sources: [broken pipe]"
        );
        assert_eq!(err.sources().len(), 1);
        assert_eq!(err.message(), "failed to deliver");
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn named_constructors_carry_their_kind() {
        assert_eq!(
            Error::invalid_level_code(9).to_string(),
            "invalid level code, context: { code: 9 }"
        );
        assert_eq!(Error::empty_name("..").kind(), ErrorKind::InvalidName);
        assert_eq!(Error::async_queue_full().kind(), ErrorKind::QueueFull);

        let io = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::from_io_error(io);
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.to_string(), "failed to write log entry, sources: [pipe closed]");
    }
}
