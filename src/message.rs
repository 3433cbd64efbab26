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

//! Log messages and their names.

use std::collections::BTreeMap;
use std::fmt;

use crate::Error;
use crate::Level;
use crate::Value;
use crate::value::ErrorValue;

/// The reserved field key holding a single error.
pub const FIELD_EXN: &str = "exn";

/// The reserved field key holding a list of errors.
pub const FIELD_ERRORS: &str = "errors";

/// A dotted name path, such as `app.http.server`.
///
/// Built from [`PointName::parse`], every segment is non-empty.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointName(Vec<String>);

impl PointName {
    /// Create a name path from its segments.
    ///
    /// # Errors
    ///
    /// Return an error if there are no segments or any segment is empty.
    pub fn new<I, S>(segments: I) -> Result<PointName, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(Error::empty_name_path());
        }
        if let Some(i) = segments.iter().position(String::is_empty) {
            return Err(Error::empty_name_segment(i));
        }
        Ok(PointName(segments))
    }

    /// Split a dotted name on `.`, dropping empty segments.
    ///
    /// # Errors
    ///
    /// Return an error if no segment remains.
    pub fn try_parse(name: &str) -> Result<PointName, Error> {
        let segments: Vec<String> = name
            .split('.')
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        if segments.is_empty() {
            return Err(Error::empty_name(name));
        }
        Ok(PointName(segments))
    }

    /// Split a dotted name on `.`, dropping empty segments.
    ///
    /// # Panics
    ///
    /// Panic if no segment remains; an empty logger name is a programming error.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_facade::PointName;
    ///
    /// let name = PointName::parse("a..b.c");
    /// assert_eq!(name.segments(), ["a", "b", "c"]);
    /// ```
    pub fn parse(name: &str) -> PointName {
        match PointName::try_parse(name) {
            Ok(name) => name,
            Err(err) => panic!("{err}"),
        }
    }

    /// The segments of the path.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether the path has no segments. Only unnamed messages carry an empty path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl fmt::Debug for PointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

/// What a message measures or says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointValue {
    /// A human-readable event rendered from a message template.
    Event {
        /// The message template.
        template: String,
    },
    /// A numeric measurement.
    Gauge {
        /// The measured value.
        value: i64,
        /// The unit of the value.
        unit: String,
    },
}

/// An immutable structured log message.
///
/// All `with_*` methods consume the message and return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    name: PointName,
    value: PointValue,
    fields: BTreeMap<String, Value>,
    timestamp: i64,
    level: Level,
}

impl Message {
    /// Create a message from all of its parts.
    pub fn new(
        name: PointName,
        value: PointValue,
        fields: BTreeMap<String, Value>,
        timestamp: i64,
        level: Level,
    ) -> Message {
        Message {
            name,
            value,
            fields,
            timestamp,
            level,
        }
    }

    /// Create an unnamed event stamped with the registry's current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_facade::Level;
    /// use logforth_facade::Message;
    ///
    /// let message = Message::event(Level::Info, "user {user} logged in").with_field("user", "haf");
    /// assert_eq!(message.field("user"), Some(&"haf".into()));
    /// ```
    pub fn event(level: Level, template: impl Into<String>) -> Message {
        Message::new(
            PointName::default(),
            PointValue::Event {
                template: template.into(),
            },
            BTreeMap::new(),
            crate::timestamp(),
            level,
        )
    }

    /// Create an unnamed gauge at [`Level::Debug`] stamped with the registry's current time.
    pub fn gauge(value: i64, unit: impl Into<String>) -> Message {
        Message::new(
            PointName::default(),
            PointValue::Gauge {
                value,
                unit: unit.into(),
            },
            BTreeMap::new(),
            crate::timestamp(),
            Level::Debug,
        )
    }

    /// The name path of the message; empty until a named logger stamps it.
    pub fn name(&self) -> &PointName {
        &self.name
    }

    /// The value of the message.
    pub fn value(&self) -> &PointValue {
        &self.value
    }

    /// All fields, ordered by key.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// A single field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Nanoseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Return the message with a new name.
    pub fn with_name(mut self, name: PointName) -> Message {
        self.name = name;
        self
    }

    /// Return the message with a new value.
    pub fn with_value(mut self, value: PointValue) -> Message {
        self.value = value;
        self
    }

    /// Return the message with a new level.
    pub fn with_level(mut self, level: Level) -> Message {
        self.level = level;
        self
    }

    /// Return the message with a new timestamp.
    pub fn with_timestamp(mut self, timestamp: i64) -> Message {
        self.timestamp = timestamp;
        self
    }

    /// Return the message with one field set, replacing any previous value under `key`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Message {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Return the message with several fields set.
    pub fn with_fields<I, K, V>(mut self, fields: I) -> Message
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Return the message carrying `err` under the reserved [`FIELD_EXN`] key.
    pub fn add_exn(self, err: &(dyn std::error::Error + 'static)) -> Message {
        self.with_field(FIELD_EXN, ErrorValue::new(err))
    }

    /// Return the message with `errs` appended to the reserved [`FIELD_ERRORS`] list.
    pub fn add_exns<'a, I>(mut self, errs: I) -> Message
    where
        I: IntoIterator<Item = &'a (dyn std::error::Error + 'static)>,
    {
        let mut list = match self.fields.remove(FIELD_ERRORS) {
            Some(Value::List(list)) => list,
            Some(other) => vec![other],
            None => vec![],
        };
        list.extend(errs.into_iter().map(Value::error));
        self.with_field(FIELD_ERRORS, Value::List(list))
    }

    /// All captured errors, the single [`FIELD_EXN`] one first.
    pub fn errors(&self) -> Vec<&ErrorValue> {
        let mut errors = vec![];
        if let Some(Value::Error(err)) = self.fields.get(FIELD_EXN) {
            errors.push(err);
        }
        if let Some(Value::List(list)) = self.fields.get(FIELD_ERRORS) {
            errors.extend(list.iter().filter_map(|v| match v {
                Value::Error(err) => Some(err),
                _ => None,
            }));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::FIELD_ERRORS;
    use super::Message;
    use super::PointName;
    use crate::Error;
    use crate::ErrorKind;
    use crate::Level;
    use crate::Value;

    #[test]
    fn parse_dotted_names() {
        assert_eq!(PointName::parse("a.b.c").segments(), ["a", "b", "c"]);
        assert_eq!(PointName::parse(".a..b.").segments(), ["a", "b"]);
        assert_eq!(PointName::parse("a.b.c").to_string(), "a.b.c");
        let err = PointName::try_parse("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName);
        assert!(PointName::try_parse("...").is_err());
        assert!(PointName::new(["a", ""]).is_err());
        assert!(PointName::new(Vec::<String>::new()).is_err());
    }

    #[test]
    #[should_panic(expected = "logger name must not be empty")]
    fn parse_empty_name_panics() {
        PointName::parse("");
    }

    #[test]
    fn setters_return_new_values() {
        let original = Message::event(Level::Info, "hello").with_timestamp(7);
        let changed = original
            .clone()
            .with_level(Level::Warn)
            .with_field("k", 1)
            .with_fields([("a", "x"), ("b", "y")]);

        assert_eq!(original.level(), Level::Info);
        assert!(original.fields().is_empty());
        assert_eq!(changed.level(), Level::Warn);
        assert_eq!(changed.timestamp(), 7);
        assert_eq!(changed.fields().len(), 3);
        assert_eq!(changed.field("k"), Some(&Value::Int(1)));
    }

    #[test]
    fn collect_errors() {
        let first = Error::new("first");
        let second = Error::new("second");
        let third = Error::new("third");
        let message = Message::event(Level::Error, "failed")
            .add_exn(&first)
            .add_exns([&second as &(dyn std::error::Error + 'static)])
            .add_exns([&third as &(dyn std::error::Error + 'static)]);

        let messages: Vec<&str> = message.errors().iter().map(|e| e.message()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert!(matches!(message.field(FIELD_ERRORS), Some(Value::List(l)) if l.len() == 2));
    }
}
