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

//! Layouts for formatting log messages.
//!
//! Both layouts share the same engine: the message value is rendered into a stream of
//! [`Token`]s, each tagged with a [`LiterateToken`] kind that colored targets map to a color.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use jiff::Timestamp;

use crate::Level;
use crate::Message;
use crate::PointValue;
use crate::Value;
use crate::ValueKind;
use crate::message::FIELD_ERRORS;
use crate::message::FIELD_EXN;
use crate::template::Property;
use crate::template::TemplateVisitor;
use crate::template::parse_template;

mod literate;
mod plain_text;

pub use self::literate::LiterateLayout;
pub use self::plain_text::PlainTextLayout;

/// The kind of a rendered fragment, used to pick its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiterateToken {
    /// Regular text.
    Text,
    /// Secondary text such as timestamps, names and stack frames.
    Subtext,
    /// Brackets, separators and the like.
    Punctuation,
    /// The [`Level::Verbose`] tag.
    LevelVerbose,
    /// The [`Level::Debug`] tag.
    LevelDebug,
    /// The [`Level::Info`] tag.
    LevelInfo,
    /// The [`Level::Warn`] tag.
    LevelWarn,
    /// The [`Level::Error`] tag.
    LevelError,
    /// The [`Level::Fatal`] tag.
    LevelFatal,
    /// A boolean value.
    KeywordSymbol,
    /// A numeric value.
    NumericSymbol,
    /// A string or character value.
    StringSymbol,
    /// Any other value.
    OtherSymbol,
    /// A field name.
    NameSymbol,
    /// A template property without a matching field.
    MissingTemplateField,
}

impl LiterateToken {
    /// The token for the tag of `level`.
    pub fn of_level(level: Level) -> LiterateToken {
        match level {
            Level::Verbose => LiterateToken::LevelVerbose,
            Level::Debug => LiterateToken::LevelDebug,
            Level::Info => LiterateToken::LevelInfo,
            Level::Warn => LiterateToken::LevelWarn,
            Level::Error => LiterateToken::LevelError,
            Level::Fatal => LiterateToken::LevelFatal,
        }
    }

    /// The token for a value of the given kind.
    pub fn of_value_kind(kind: ValueKind) -> LiterateToken {
        match kind {
            ValueKind::Keyword => LiterateToken::KeywordSymbol,
            ValueKind::Numeric => LiterateToken::NumericSymbol,
            ValueKind::String => LiterateToken::StringSymbol,
            ValueKind::Other => LiterateToken::OtherSymbol,
        }
    }
}

/// A rendered fragment and its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The rendered text.
    pub text: String,
    /// The kind of the text.
    pub kind: LiterateToken,
}

impl Token {
    /// Create a new token.
    pub fn new(text: impl Into<String>, kind: LiterateToken) -> Token {
        Token {
            text: text.into(),
            kind,
        }
    }
}

/// Options shared by the layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct FormatOptions {
    /// Prefix every rendered template property with its field name, as in `[user] haf`.
    pub echo_field_names: bool,
}

/// The rendered value of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedValue {
    /// The rendered tokens.
    pub tokens: Vec<Token>,
    /// The fields the template rendered.
    pub consumed: BTreeSet<String>,
}

/// Render the value of `message`.
///
/// Events go through the template parser; each property is looked up in the message fields
/// and a property without a field is rendered verbatim as
/// [`MissingTemplateField`](LiterateToken::MissingTemplateField). Gauges render as exactly two
/// tokens, the value and the unit.
///
/// # Examples
///
/// ```
/// use logforth_facade::Level;
/// use logforth_facade::Message;
/// use logforth_facade::layout::FormatOptions;
/// use logforth_facade::layout::LiterateToken;
/// use logforth_facade::layout::tokenize_value;
///
/// let message = Message::event(Level::Info, "Value is {X}");
/// let value = tokenize_value(&message, FormatOptions::default());
/// assert_eq!(value.tokens[1].text, "{X}");
/// assert_eq!(value.tokens[1].kind, LiterateToken::MissingTemplateField);
/// ```
pub fn tokenize_value(message: &Message, options: FormatOptions) -> TokenizedValue {
    match message.value() {
        PointValue::Event { template } => {
            let mut tokenizer = ValueTokenizer {
                fields: message.fields(),
                options,
                value: TokenizedValue::default(),
            };
            parse_template(template, &mut tokenizer);
            tokenizer.value
        }
        PointValue::Gauge { value, unit } => TokenizedValue {
            tokens: vec![
                Token::new(value.to_string(), LiterateToken::NumericSymbol),
                Token::new(unit.as_str(), LiterateToken::KeywordSymbol),
            ],
            consumed: BTreeSet::new(),
        },
    }
}

struct ValueTokenizer<'a> {
    fields: &'a BTreeMap<String, Value>,
    options: FormatOptions,
    value: TokenizedValue,
}

impl TemplateVisitor for ValueTokenizer<'_> {
    fn visit_text(&mut self, text: &str) {
        self.value.tokens.push(Token::new(text, LiterateToken::Text));
    }

    fn visit_property(&mut self, property: Property<'_>) {
        let tokens = &mut self.value.tokens;
        match self.fields.get(property.name) {
            Some(value) => {
                if self.options.echo_field_names {
                    let name = format!("[{}] ", property.name);
                    tokens.push(Token::new(name, LiterateToken::Subtext));
                }
                let kind = LiterateToken::of_value_kind(value.kind());
                tokens.push(Token::new(value.render(property.format), kind));
                self.value.consumed.insert(property.name.to_owned());
            }
            None => {
                let placeholder = property.to_string();
                tokens.push(Token::new(placeholder, LiterateToken::MissingTemplateField));
            }
        }
    }
}

/// Render the errors of `message`, one line per token.
///
/// Indented lines are stack frames and render as [`Subtext`](LiterateToken::Subtext); every
/// line, and so every error, ends with a line break.
pub fn tokenize_exceptions(message: &Message) -> Vec<Token> {
    let mut tokens = vec![];
    for err in message.errors() {
        for line in err.text().lines() {
            let kind = if is_frame(line) {
                LiterateToken::Subtext
            } else {
                LiterateToken::Text
            };
            tokens.push(Token::new(line, kind));
            tokens.push(Token::new("\n", LiterateToken::Text));
        }
    }
    tokens
}

fn is_frame(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// The fields the template did not render, without the reserved error fields.
pub fn remaining_fields<'a>(
    message: &'a Message,
    consumed: &'a BTreeSet<String>,
) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
    message.fields().iter().filter(|(key, _)| {
        key.as_str() != FIELD_EXN && key.as_str() != FIELD_ERRORS && !consumed.contains(*key)
    })
}

// ISO-8601 in UTC; values jiff cannot represent fall back to raw nanoseconds
fn format_instant(timestamp: i64) -> String {
    match Timestamp::from_nanosecond(timestamp as i128) {
        Ok(ts) => ts.to_string(),
        Err(_) => timestamp.to_string(),
    }
}
