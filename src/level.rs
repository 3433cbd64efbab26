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

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::str::FromStr;

use crate::Error;

/// The severity of a log message.
///
/// Levels are totally ordered by their rank, from [`Level::Verbose`] (1) to [`Level::Fatal`]
/// (6). Equality, ordering and hashing all go through [`Level::to_int`].
#[derive(Clone, Copy)]
pub enum Level {
    /// Designates very low priority, often extremely verbose, information.
    Verbose,
    /// Designates lower priority information.
    Debug,
    /// Designates useful information.
    Info,
    /// Designates hazardous situations.
    Warn,
    /// Designates errors the application can recover from.
    Error,
    /// Designates errors the application cannot recover from.
    Fatal,
}

impl Level {
    /// All levels, from the most verbose to the most severe.
    pub const ALL: [Level; 6] = [
        Level::Verbose,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Return the rank of this level, from 1 to 6.
    pub const fn to_int(self) -> u8 {
        match self {
            Level::Verbose => 1,
            Level::Debug => 2,
            Level::Info => 3,
            Level::Warn => 4,
            Level::Error => 5,
            Level::Fatal => 6,
        }
    }

    /// Convert a rank back into a level.
    ///
    /// # Errors
    ///
    /// Return an error if `code` is outside `1..=6`.
    pub fn try_from_int(code: i64) -> Result<Level, Error> {
        match code {
            1 => Ok(Level::Verbose),
            2 => Ok(Level::Debug),
            3 => Ok(Level::Info),
            4 => Ok(Level::Warn),
            5 => Ok(Level::Error),
            6 => Ok(Level::Fatal),
            _ => Err(Error::invalid_level_code(code)),
        }
    }

    /// Convert a rank back into a level.
    ///
    /// # Panics
    ///
    /// Panic if `code` is outside `1..=6`; an out-of-range code is a programming error.
    pub fn from_int(code: i64) -> Level {
        match Level::try_from_int(code) {
            Ok(level) => level,
            Err(err) => panic!("{err}"),
        }
    }

    /// Return the lowercase name of the level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Verbose => "verbose",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Parse a level name, ignoring case.
    ///
    /// Unrecognized names map to [`Level::Info`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_facade::Level;
    ///
    /// assert_eq!(Level::parse("WARN"), Level::Warn);
    /// assert_eq!(Level::parse("loud"), Level::Info);
    /// ```
    pub fn parse(s: &str) -> Level {
        Level::ALL
            .into_iter()
            .find(|level| s.eq_ignore_ascii_case(level.as_str()))
            .unwrap_or(Level::Info)
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.to_int() == other.to_int()
    }
}

impl Eq for Level {}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_int().cmp(&other.to_int())
    }
}

impl Hash for Level {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_int().hash(state)
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        Ok(Level::parse(s))
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Verbose,
        }
    }
}

impl From<Level> for log::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Fatal | Level::Error => log::Level::Error,
            Level::Warn => log::Level::Warn,
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
            Level::Verbose => log::Level::Trace,
        }
    }
}
