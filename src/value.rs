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

//! Structured field values.

use std::fmt;
use std::fmt::Write;

/// A field value attached to a [`Message`](crate::Message).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A single character.
    Char(char),
    /// A string.
    Str(String),
    /// A captured error.
    Error(ErrorValue),
    /// A list of values.
    List(Vec<Value>),
    /// Anything else, captured through its [`Display`](fmt::Display) output.
    Other(String),
}

/// The display classification of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Booleans.
    Keyword,
    /// Any numeric value.
    Numeric,
    /// Strings and characters.
    String,
    /// Everything else.
    Other,
}

impl Value {
    /// Capture any displayable value.
    pub fn display(value: impl fmt::Display) -> Value {
        Value::Other(value.to_string())
    }

    /// Capture an error with its source chain.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Value {
        Value::Error(ErrorValue::new(err))
    }

    /// Classify the value by its runtime kind.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Keyword,
            Value::Int(_) | Value::UInt(_) | Value::Float(_) => ValueKind::Numeric,
            Value::Str(_) | Value::Char(_) => ValueKind::String,
            Value::Error(_) | Value::List(_) | Value::Other(_) => ValueKind::Other,
        }
    }

    /// Render the value, honoring an optional format specifier.
    ///
    /// The specifier follows the shape `[[fill]align][0][width][.precision][type]` where align
    /// is one of `<`, `^`, `>` and type is one of `x`, `X`, `o`, `b`, `e`, `E`, `?`. A type
    /// that does not apply to the value is ignored and a specifier that cannot be parsed is
    /// treated as absent, so rendering never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_facade::Value;
    ///
    /// assert_eq!(Value::Float(1.23456).render(Some(".2")), "1.23");
    /// assert_eq!(Value::Int(255).render(Some("#>6x")), "####ff");
    /// assert_eq!(Value::from("ab").render(Some("not a spec")), "ab");
    /// ```
    pub fn render(&self, format: Option<&str>) -> String {
        match format.and_then(FormatSpec::parse) {
            Some(spec) => spec.apply(self),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Error(v) => f.write_str(v.message()),
            Value::List(values) => {
                f.write_char('[')?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_char(']')
            }
            Value::Other(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident, $target:ty; $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from!(Int, i64; i8, i16, i32, i64, isize);
impl_from!(UInt, u64; u8, u16, u32, u64, usize);
impl_from!(Float, f64; f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<ErrorValue> for Value {
    fn from(value: ErrorValue) -> Self {
        Value::Error(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// The captured textual representation of an error.
///
/// The text is the full multi-line report: the error message, followed by its causes (and a
/// backtrace, if the error carried one). Indented lines are treated as frames when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    message: String,
    text: String,
}

impl ErrorValue {
    /// Capture an error and its source chain.
    pub fn new(err: &(dyn std::error::Error + 'static)) -> ErrorValue {
        let message = err.to_string();
        let mut text = message.clone();
        let mut source = err.source();
        if source.is_some() {
            text.push_str("\n\nCaused by:");
        }
        while let Some(cause) = source {
            // SAFETY: write to a string always succeeds
            write!(&mut text, "\n    {cause}").unwrap();
            source = cause.source();
        }
        ErrorValue { message, text }
    }

    /// Capture an [`anyhow::Error`] through its report form, which includes the backtrace
    /// when one was captured.
    pub fn from_anyhow(err: &anyhow::Error) -> ErrorValue {
        ErrorValue {
            message: err.to_string(),
            text: format!("{err:?}"),
        }
    }

    /// Build an error value from pre-rendered text; the first line becomes the message.
    pub fn from_text(text: impl Into<String>) -> ErrorValue {
        let text = text.into();
        let message = text.lines().next().unwrap_or_default().to_owned();
        ErrorValue { message, text }
    }

    /// The top-level message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The full textual representation.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FormatSpec {
    fill: char,
    align: Option<Align>,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    ty: Option<char>,
}

fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '^' => Some(Align::Center),
        '>' => Some(Align::Right),
        _ => None,
    }
}

fn take_number(chars: &[char], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if start == *pos {
        return None;
    }
    chars[start..*pos].iter().collect::<String>().parse().ok()
}

impl FormatSpec {
    fn parse(spec: &str) -> Option<FormatSpec> {
        let chars: Vec<char> = spec.chars().collect();
        let mut result = FormatSpec {
            fill: ' ',
            align: None,
            zero: false,
            width: 0,
            precision: None,
            ty: None,
        };

        let mut pos = 0;
        if let Some(align) = chars.get(1).copied().and_then(align_of) {
            result.fill = chars[0];
            result.align = Some(align);
            pos = 2;
        } else if let Some(align) = chars.first().copied().and_then(align_of) {
            result.align = Some(align);
            pos = 1;
        }

        if chars.get(pos) == Some(&'0') {
            result.zero = true;
            pos += 1;
        }
        if let Some(width) = take_number(&chars, &mut pos) {
            result.width = width;
        }
        if chars.get(pos) == Some(&'.') {
            pos += 1;
            result.precision = Some(take_number(&chars, &mut pos)?);
        }
        if let Some(&ty) = chars.get(pos) {
            if !matches!(ty, 'x' | 'X' | 'o' | 'b' | 'e' | 'E' | '?') {
                return None;
            }
            result.ty = Some(ty);
            pos += 1;
        }

        (pos == chars.len()).then_some(result)
    }

    fn apply(&self, value: &Value) -> String {
        let body = self.body(value);
        let numeric = value.kind() == ValueKind::Numeric;
        self.pad(body, numeric)
    }

    fn body(&self, value: &Value) -> String {
        match (value, self.ty) {
            (Value::Int(v), Some('x')) => format!("{v:x}"),
            (Value::Int(v), Some('X')) => format!("{v:X}"),
            (Value::Int(v), Some('o')) => format!("{v:o}"),
            (Value::Int(v), Some('b')) => format!("{v:b}"),
            (Value::UInt(v), Some('x')) => format!("{v:x}"),
            (Value::UInt(v), Some('X')) => format!("{v:X}"),
            (Value::UInt(v), Some('o')) => format!("{v:o}"),
            (Value::UInt(v), Some('b')) => format!("{v:b}"),
            (Value::Int(_) | Value::UInt(_) | Value::Float(_), Some(ty @ ('e' | 'E'))) => {
                let v = as_f64(value);
                let upper = ty == 'E';
                match (self.precision, upper) {
                    (Some(p), false) => format!("{v:.p$e}"),
                    (Some(p), true) => format!("{v:.p$E}"),
                    (None, false) => format!("{v:e}"),
                    (None, true) => format!("{v:E}"),
                }
            }
            (Value::Int(_) | Value::UInt(_) | Value::Float(_), _) => match self.precision {
                Some(p) => format!("{:.p$}", as_f64(value)),
                None => value.to_string(),
            },
            (Value::Str(v), Some('?')) => format!("{v:?}"),
            (Value::Char(v), Some('?')) => format!("{v:?}"),
            (Value::Str(v), _) => match self.precision {
                Some(p) => v.chars().take(p).collect(),
                None => v.clone(),
            },
            _ => value.to_string(),
        }
    }

    fn pad(&self, body: String, numeric: bool) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let missing = self.width - len;

        if numeric && self.zero && self.align.is_none() {
            let (sign, digits) = match body.strip_prefix('-') {
                Some(digits) => ("-", digits),
                None => ("", body.as_str()),
            };
            return format!("{sign}{}{digits}", "0".repeat(missing));
        }

        let align = self
            .align
            .unwrap_or(if numeric { Align::Right } else { Align::Left });
        let (before, after) = match align {
            Align::Left => (0, missing),
            Align::Right => (missing, 0),
            Align::Center => (missing / 2, missing - missing / 2),
        };
        let fill = |n: usize| std::iter::repeat_n(self.fill, n).collect::<String>();
        format!("{}{body}{}", fill(before), fill(after))
    }
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(v) => *v as f64,
        Value::UInt(v) => *v as f64,
        Value::Float(v) => *v,
        _ => f64::NAN,
    }
}
