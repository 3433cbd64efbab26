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

//! Color utilities.

use std::fmt;
use std::sync::Arc;

use colored::Color;
use colored::Colorize;

use crate::Level;
use crate::layout::LiterateToken;

/// Colors for different log levels.
#[derive(Debug, Clone)]
pub struct LevelColor {
    /// Color for fatal level logs.
    pub fatal: Color,
    /// Color for error level logs.
    pub error: Color,
    /// Color for warning level logs.
    pub warn: Color,
    /// Color for info level logs.
    pub info: Color,
    /// Color for debug level logs.
    pub debug: Color,
    /// Color for verbose level logs.
    pub verbose: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            fatal: Color::BrightRed,
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::Green,
            debug: Color::Blue,
            verbose: Color::Magenta,
        }
    }
}

impl LevelColor {
    /// The color of `level`.
    pub fn of(&self, level: Level) -> Color {
        match level {
            Level::Fatal => self.fatal,
            Level::Error => self.error,
            Level::Warn => self.warn,
            Level::Info => self.info,
            Level::Debug => self.debug,
            Level::Verbose => self.verbose,
        }
    }

    /// Colorize a whole line with the color of `level`.
    ///
    /// The colored line ends with a reset sequence, restoring the previous terminal color.
    pub fn colorize_line(&self, no_color: bool, level: Level, line: String) -> String {
        if no_color {
            line
        } else {
            line.color(self.of(level)).to_string()
        }
    }
}

/// Maps each [`LiterateToken`] kind to a color; `None` leaves the fragment uncolored.
///
/// # Examples
///
/// ```
/// use colored::Color;
/// use logforth_facade::color::Theme;
/// use logforth_facade::layout::LiterateToken;
///
/// let theme = Theme::new(|token| match token {
///     LiterateToken::MissingTemplateField => Some(Color::Red),
///     _ => None,
/// });
/// assert_eq!(theme.color(LiterateToken::Text), None);
/// ```
#[derive(Clone)]
pub struct Theme(Arc<dyn Fn(LiterateToken) -> Option<Color> + Send + Sync>);

impl Theme {
    /// Create a theme from a mapping function.
    pub fn new(f: impl Fn(LiterateToken) -> Option<Color> + Send + Sync + 'static) -> Theme {
        Theme(Arc::new(f))
    }

    /// The color of `token`.
    pub fn color(&self, token: LiterateToken) -> Option<Color> {
        (self.0)(token)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::new(default_theme)
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Theme").finish_non_exhaustive()
    }
}

/// The default theme.
pub fn default_theme(token: LiterateToken) -> Option<Color> {
    let levels = LevelColor::default();
    match token {
        LiterateToken::Text | LiterateToken::OtherSymbol => None,
        LiterateToken::Subtext | LiterateToken::Punctuation | LiterateToken::NameSymbol => {
            Some(Color::BrightBlack)
        }
        LiterateToken::LevelVerbose => Some(levels.verbose),
        LiterateToken::LevelDebug => Some(levels.debug),
        LiterateToken::LevelInfo => Some(levels.info),
        LiterateToken::LevelWarn => Some(levels.warn),
        LiterateToken::LevelError => Some(levels.error),
        LiterateToken::LevelFatal => Some(levels.fatal),
        LiterateToken::KeywordSymbol => Some(Color::Blue),
        LiterateToken::NumericSymbol => Some(Color::Magenta),
        LiterateToken::StringSymbol => Some(Color::Cyan),
        LiterateToken::MissingTemplateField => Some(Color::Red),
    }
}
