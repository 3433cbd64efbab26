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
use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;

use colored::Colorize;

use crate::Ack;
use crate::Error;
use crate::Level;
use crate::Logger;
use crate::color::LevelColor;
use crate::color::Theme;
use crate::layout::LiterateLayout;
use crate::layout::PlainTextLayout;
use crate::logger::MessageFactory;

/// An output stream shared by the messages of one target.
///
/// Each entry is written and flushed under the lock, so entries from concurrent callers never
/// interleave.
pub(crate) struct Sink(Mutex<Box<dyn Write + Send>>);

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sink").finish_non_exhaustive()
    }
}

impl Sink {
    pub(crate) fn new(writer: impl Write + Send + 'static) -> Sink {
        Sink(Mutex::new(Box::new(writer)))
    }

    pub(crate) fn write_entry(&self, entry: &str) -> Result<(), Error> {
        let mut bytes = Vec::with_capacity(entry.len() + 1);
        bytes.extend_from_slice(entry.as_bytes());
        if !entry.ends_with('\n') {
            bytes.push(b'\n');
        }

        let mut writer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(Error::from_io_error)
    }
}

/// A target that writes plain text lines to a console stream, colored by level.
///
/// # Examples
///
/// ```
/// use logforth_facade::Level;
/// use logforth_facade::append::ConsoleTarget;
///
/// let target = ConsoleTarget::stderr(Level::Warn).no_color();
/// ```
#[derive(Debug)]
pub struct ConsoleTarget {
    min_level: Level,
    layout: PlainTextLayout,
    colors: LevelColor,
    no_color: bool,
    sink: Sink,
}

impl ConsoleTarget {
    /// Write to standard output messages at `min_level` or above.
    pub fn stdout(min_level: Level) -> Self {
        Self::with_writer(min_level, io::stdout())
    }

    /// Write to standard error messages at `min_level` or above.
    pub fn stderr(min_level: Level) -> Self {
        Self::with_writer(min_level, io::stderr())
    }

    /// Write to `writer` messages at `min_level` or above.
    pub fn with_writer(min_level: Level, writer: impl Write + Send + 'static) -> Self {
        Self {
            min_level,
            layout: PlainTextLayout::default(),
            colors: LevelColor::default(),
            no_color: false,
            sink: Sink::new(writer),
        }
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Set the colors of each level.
    pub fn colors(mut self, colors: LevelColor) -> Self {
        self.colors = colors;
        self
    }

    /// Set the layout of the lines.
    pub fn layout(mut self, layout: PlainTextLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Logger for ConsoleTarget {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        if !self.enabled(level) {
            return Ack::done();
        }

        let message = factory(level);
        let line = self.layout.format(&message);
        let line = self.colors.colorize_line(self.no_color, level, line);
        Ack::ready(self.sink.write_entry(&line))
    }
}

/// A target that writes token-colored text to a console stream.
///
/// Every fragment of the rendered message is colored by its kind through a [`Theme`].
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use logforth_facade::Level;
/// use logforth_facade::append::LiterateConsoleTarget;
/// use logforth_facade::layout::LiterateLayout;
///
/// let target = LiterateConsoleTarget::stdout(Level::Info)
///     .layout(LiterateLayout::default().timezone(TimeZone::UTC));
/// ```
#[derive(Debug)]
pub struct LiterateConsoleTarget {
    min_level: Level,
    layout: LiterateLayout,
    theme: Theme,
    no_color: bool,
    sink: Sink,
}

impl LiterateConsoleTarget {
    /// Write to standard output messages at `min_level` or above.
    pub fn stdout(min_level: Level) -> Self {
        Self::with_writer(min_level, io::stdout())
    }

    /// Write to standard error messages at `min_level` or above.
    pub fn stderr(min_level: Level) -> Self {
        Self::with_writer(min_level, io::stderr())
    }

    /// Write to `writer` messages at `min_level` or above.
    pub fn with_writer(min_level: Level, writer: impl Write + Send + 'static) -> Self {
        Self {
            min_level,
            layout: LiterateLayout::default(),
            theme: Theme::default(),
            no_color: false,
            sink: Sink::new(writer),
        }
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Set the theme that colors each fragment.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the layout of the entries.
    pub fn layout(mut self, layout: LiterateLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Logger for LiterateConsoleTarget {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        if !self.enabled(level) {
            return Ack::done();
        }

        let message = factory(level);
        let mut entry = String::new();
        for token in self.layout.tokens(&message) {
            match self.theme.color(token.kind) {
                Some(color) if !self.no_color => {
                    entry.push_str(&token.text.as_str().color(color).to_string())
                }
                _ => entry.push_str(&token.text),
            }
        }
        Ack::ready(self.sink.write_entry(&entry))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use colored::Color;
    use jiff::tz::TimeZone;

    use super::ConsoleTarget;
    use super::LiterateConsoleTarget;
    use crate::FIELD_ERRORS;
    use crate::FIELD_EXN;
    use crate::Level;
    use crate::Logger;
    use crate::Message;
    use crate::PointName;
    use crate::color::Theme;
    use crate::layout::LiterateLayout;
    use crate::layout::LiterateToken;
    use crate::value::ErrorValue;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn message(level: Level) -> Message {
        Message::event(level, "user {user} logged in")
            .with_field("user", "haf")
            .with_name(PointName::parse("app.auth"))
            .with_timestamp(0)
    }

    #[test]
    fn gated_levels_never_build_the_message() {
        let calls = AtomicUsize::new(0);
        let target = ConsoleTarget::with_writer(Level::Warn, Buffer::default());
        let factory = |level| {
            calls.fetch_add(1, Ordering::SeqCst);
            message(level)
        };

        target.log(Level::Debug, &factory);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        target.log(Level::Error, &factory);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!target.enabled(Level::Info));
    }

    #[tokio::test]
    async fn plain_lines_are_written_whole() {
        let buffer = Buffer::default();
        let target = ConsoleTarget::with_writer(Level::Info, buffer.clone()).no_color();

        target.log_simple(message(Level::Info));
        target
            .log_with_ack(Level::Warn, &message)
            .await
            .unwrap();

        assert_eq!(
            buffer.contents(),
            "[I] 1970-01-01T00:00:00Z: user haf logged in [app.auth]\n\
             [W] 1970-01-01T00:00:00Z: user haf logged in [app.auth]\n"
        );
    }

    #[test]
    fn literate_entries_follow_the_theme() {
        colored::control::set_override(true);

        let buffer = Buffer::default();
        let theme = Theme::new(|token| match token {
            LiterateToken::StringSymbol => Some(Color::Cyan),
            _ => None,
        });
        let target = LiterateConsoleTarget::with_writer(Level::Verbose, buffer.clone())
            .layout(LiterateLayout::default().timezone(TimeZone::UTC))
            .theme(theme);

        target.log_simple(message(Level::Info));
        assert_eq!(
            buffer.contents(),
            "[00:00:00 INF] user \u{1b}[36mhaf\u{1b}[0m logged in <app.auth>\n"
        );
    }

    #[test]
    fn literate_entries_without_color() {
        let buffer = Buffer::default();
        let target = LiterateConsoleTarget::with_writer(Level::Verbose, buffer.clone())
            .layout(LiterateLayout::default().timezone(TimeZone::UTC))
            .no_color();

        target.log_simple(message(Level::Info).with_field("attempt", 2));
        assert_eq!(
            buffer.contents(),
            "[00:00:00 INF] user haf logged in <app.auth>\n - attempt: 2\n"
        );
    }

    #[tokio::test]
    async fn literate_entries_render_captured_errors() {
        let buffer = Buffer::default();
        let target = LiterateConsoleTarget::with_writer(Level::Verbose, buffer.clone())
            .layout(LiterateLayout::default().timezone(TimeZone::UTC))
            .no_color();

        let failed = |level| {
            message(level)
                .with_field("attempt", 2)
                .with_field(FIELD_EXN, ErrorValue::from_text("boom\n    at main"))
                .with_field(FIELD_ERRORS, vec![ErrorValue::from_text("retry failed")])
        };
        target.log_with_ack(Level::Error, &failed).await.unwrap();
        target.log_simple(message(Level::Info));

        assert_eq!(
            buffer.contents(),
            "[00:00:00 ERR] user haf logged in <app.auth>\n - attempt: 2\n\
             boom\n    at main\nretry failed\n\
             [00:00:00 INF] user haf logged in <app.auth>\n"
        );
    }

    #[test]
    fn concurrent_lines_do_not_interleave() {
        let buffer = Buffer::default();
        let target = ConsoleTarget::with_writer(Level::Info, buffer.clone()).no_color();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        target.log_simple(message(Level::Info));
                    }
                });
            }
        });

        let contents = buffer.contents();
        assert_eq!(contents.lines().count(), 200);
        assert!(
            contents
                .lines()
                .all(|line| line == "[I] 1970-01-01T00:00:00Z: user haf logged in [app.auth]")
        );
    }
}
