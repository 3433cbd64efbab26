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

use std::fmt::Write;

use crate::Message;
use crate::PointValue;
use crate::layout::FormatOptions;
use crate::layout::format_instant;
use crate::layout::remaining_fields;
use crate::layout::tokenize_exceptions;
use crate::layout::tokenize_value;

/// A layout that formats a message as one plain text entry.
///
/// Output format:
///
/// ```text
/// [I] 2024-08-11T14:44:57.172105Z: user haf logged in [app.auth]
/// [W] 2024-08-11T14:44:57.172219Z: disk almost full [app.storage]
///  - free: 1024
/// [E] 2024-08-11T14:44:57.172276Z: request failed [app.http] exn:
/// connection reset
/// ```
///
/// Fields the template does not mention follow as ` - key: value` lines; captured errors follow
/// after ` exn:`, one line per line of their report.
///
/// # Examples
///
/// ```
/// use logforth_facade::layout::PlainTextLayout;
///
/// let layout = PlainTextLayout::default().echo_field_names(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlainTextLayout {
    options: FormatOptions,
}

impl PlainTextLayout {
    /// Prefix rendered template properties with their field names.
    pub fn echo_field_names(mut self, echo: bool) -> Self {
        self.options.echo_field_names = echo;
        self
    }

    /// Format `message` without a trailing line break.
    pub fn format(&self, message: &Message) -> String {
        let level = message.level().as_str()[..1].to_ascii_uppercase();
        let instant = format_instant(message.timestamp());

        let mut text = format!("[{level}] {instant}: ");
        let value = tokenize_value(message, self.options);
        // SAFETY: write to a string always succeeds
        match message.value() {
            PointValue::Event { .. } => {
                for token in &value.tokens {
                    text.push_str(&token.text);
                }
            }
            PointValue::Gauge { value, unit } => write!(&mut text, "{value} {unit}").unwrap(),
        }
        if !message.name().is_empty() {
            write!(&mut text, " [{}]", message.name()).unwrap();
        }

        for (key, value) in remaining_fields(message, &value.consumed) {
            write!(&mut text, "\n - {key}: {value}").unwrap();
        }

        let exceptions = tokenize_exceptions(message);
        if !exceptions.is_empty() {
            text.push_str(" exn:\n");
            for token in exceptions {
                text.push_str(&token.text);
            }
        }

        text
    }
}
