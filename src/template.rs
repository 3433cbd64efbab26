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

//! Message template parsing.
//!
//! A template mixes literal text with `{name}` and `{name:format}` properties. `{{` and `}}`
//! stand for a literal brace. Names are made of `[A-Za-z0-9_]` and formats of any printable
//! character but `}`.
//!
//! Parsing never fails: anything that is not a well-formed property is passed on as literal
//! text, exactly as written.

use std::fmt;

/// A property placeholder found in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Property<'a> {
    /// The name of the property.
    pub name: &'a str,
    /// The format specifier, if any.
    pub format: Option<&'a str>,
}

impl fmt::Display for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            Some(format) => write!(f, "{{{}:{}}}", self.name, format),
            None => write!(f, "{{{}}}", self.name),
        }
    }
}

/// Receive the pieces of a template in order.
pub trait TemplateVisitor {
    /// Visit a run of literal text, with escapes already resolved.
    fn visit_text(&mut self, text: &str);

    /// Visit a property.
    fn visit_property(&mut self, property: Property<'_>);
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateToken {
    /// Literal text.
    Text(String),
    /// A property, with its name and optional format.
    Property {
        /// The name of the property.
        name: String,
        /// The format specifier, if any.
        format: Option<String>,
    },
}

/// Parse `template` in a single pass, feeding every piece to `visitor`.
///
/// Adjacent literal text, including escaped braces and malformed property spans, is
/// delivered as one text run.
pub fn parse_template(template: &str, visitor: &mut dyn TemplateVisitor) {
    let bytes = template.as_bytes();
    let mut text = String::new();
    // start of the literal slice not yet copied into `text`
    let mut run = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' | b'}' if bytes.get(pos + 1) == Some(&bytes[pos]) => {
                text.push_str(&template[run..=pos]);
                pos += 2;
                run = pos;
            }
            b'{' => {
                text.push_str(&template[run..pos]);
                match scan_property(template, pos) {
                    Scan::Property(property, end) => {
                        if !text.is_empty() {
                            visitor.visit_text(&text);
                            text.clear();
                        }
                        visitor.visit_property(property);
                        pos = end;
                    }
                    Scan::Text(end) => {
                        text.push_str(&template[pos..end]);
                        pos = end;
                    }
                }
                run = pos;
            }
            _ => pos += 1,
        }
    }

    text.push_str(&template[run..]);
    if !text.is_empty() {
        visitor.visit_text(&text);
    }
}

/// Parse `template` into a list of tokens.
///
/// # Examples
///
/// ```
/// use logforth_facade::template::TemplateToken;
/// use logforth_facade::template::tokenize_template;
///
/// let tokens = tokenize_template("Hello, {Name}!");
/// assert_eq!(
///     tokens,
///     [
///         TemplateToken::Text("Hello, ".to_string()),
///         TemplateToken::Property {
///             name: "Name".to_string(),
///             format: None
///         },
///         TemplateToken::Text("!".to_string()),
///     ]
/// );
/// ```
pub fn tokenize_template(template: &str) -> Vec<TemplateToken> {
    struct Collector(Vec<TemplateToken>);

    impl TemplateVisitor for Collector {
        fn visit_text(&mut self, text: &str) {
            self.0.push(TemplateToken::Text(text.to_owned()));
        }

        fn visit_property(&mut self, property: Property<'_>) {
            self.0.push(TemplateToken::Property {
                name: property.name.to_owned(),
                format: property.format.map(ToOwned::to_owned),
            });
        }
    }

    let mut collector = Collector(vec![]);
    parse_template(template, &mut collector);
    collector.0
}

enum Scan<'a> {
    // a property and the position right after its closing brace
    Property(Property<'a>, usize),
    // a malformed span that ends right before the given position
    Text(usize),
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// `start` points at an unescaped `{`
fn scan_property(template: &str, start: usize) -> Scan<'_> {
    let name_start = start + 1;
    let name_len = template.as_bytes()[name_start..]
        .iter()
        .take_while(|b| is_name_byte(**b))
        .count();
    let name_end = name_start + name_len;
    let name = &template[name_start..name_end];

    match template.as_bytes().get(name_end) {
        None => Scan::Text(template.len()),
        Some(b'}') if name_len > 0 => Scan::Property(Property { name, format: None }, name_end + 1),
        Some(b'}') => Scan::Text(name_end + 1),
        Some(b':') if name_len > 0 => {
            let format_start = name_end + 1;
            for (i, c) in template[format_start..].char_indices() {
                if c == '}' {
                    let format = &template[format_start..format_start + i];
                    let property = Property {
                        name,
                        format: Some(format),
                    };
                    return Scan::Property(property, format_start + i + 1);
                }
                if c.is_control() {
                    return Scan::Text(format_start + i);
                }
            }
            Scan::Text(template.len())
        }
        Some(_) => Scan::Text(name_end),
    }
}
