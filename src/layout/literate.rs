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

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Level;
use crate::Message;
use crate::PointValue;
use crate::layout::FormatOptions;
use crate::layout::LiterateToken;
use crate::layout::Token;
use crate::layout::TokenizedValue;
use crate::layout::remaining_fields;
use crate::layout::tokenize_exceptions;
use crate::layout::tokenize_value;

/// A layout that renders a message as a stream of tagged tokens, for colored consoles.
///
/// Output format, once the tokens are joined:
///
/// ```text
/// [22:44:57 INF] user haf logged in <app.auth>
/// [22:44:57 WRN] disk almost full <app.storage>
///  - free: 1024
/// ```
#[derive(Debug, Clone)]
pub struct LiterateLayout {
    options: FormatOptions,
    timezone: TimeZone,
}

impl Default for LiterateLayout {
    fn default() -> Self {
        Self {
            options: FormatOptions::default(),
            timezone: TimeZone::system(),
        }
    }
}

impl LiterateLayout {
    /// Prefix rendered template properties with their field names.
    pub fn echo_field_names(mut self, echo: bool) -> Self {
        self.options.echo_field_names = echo;
        self
    }

    /// Set the timezone for the time of day.
    ///
    /// Defaults to the system timezone if not set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logforth_facade::layout::LiterateLayout;
    ///
    /// let layout = LiterateLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Render `message` into tokens.
    pub fn tokens(&self, message: &Message) -> Vec<Token> {
        let level = message.level();
        let mut tokens = vec![
            Token::new("[", LiterateToken::Punctuation),
            Token::new(self.time_of_day(message.timestamp()), LiterateToken::Subtext),
            Token::new(" ", LiterateToken::Subtext),
            Token::new(abbreviation(level), LiterateToken::of_level(level)),
            Token::new("] ", LiterateToken::Punctuation),
        ];

        let TokenizedValue {
            tokens: value,
            consumed,
        } = tokenize_value(message, self.options);
        match message.value() {
            PointValue::Event { .. } => tokens.extend(value),
            PointValue::Gauge { .. } => {
                for (i, token) in value.into_iter().enumerate() {
                    if i > 0 {
                        tokens.push(Token::new(" ", LiterateToken::Subtext));
                    }
                    tokens.push(token);
                }
            }
        }

        if !message.name().is_empty() {
            tokens.push(Token::new(" <", LiterateToken::Punctuation));
            tokens.push(Token::new(message.name().to_string(), LiterateToken::Subtext));
            tokens.push(Token::new(">", LiterateToken::Punctuation));
        }

        for (key, value) in remaining_fields(message, &consumed) {
            let kind = LiterateToken::of_value_kind(value.kind());
            tokens.push(Token::new("\n - ", LiterateToken::Punctuation));
            tokens.push(Token::new(key.as_str(), LiterateToken::NameSymbol));
            tokens.push(Token::new(": ", LiterateToken::Punctuation));
            tokens.push(Token::new(value.to_string(), kind));
        }

        let exceptions = tokenize_exceptions(message);
        if !exceptions.is_empty() {
            tokens.push(Token::new("\n", LiterateToken::Text));
            tokens.extend(exceptions);
        }

        tokens
    }

    fn time_of_day(&self, timestamp: i64) -> String {
        match Timestamp::from_nanosecond(timestamp as i128) {
            Ok(ts) => ts
                .to_zoned(self.timezone.clone())
                .strftime("%H:%M:%S")
                .to_string(),
            Err(_) => timestamp.to_string(),
        }
    }
}

fn abbreviation(level: Level) -> &'static str {
    match level {
        Level::Verbose => "VRB",
        Level::Debug => "DBG",
        Level::Info => "INF",
        Level::Warn => "WRN",
        Level::Error => "ERR",
        Level::Fatal => "FTL",
    }
}

#[cfg(test)]
mod tests {
    use jiff::tz::TimeZone;

    use super::LiterateLayout;
    use crate::Level;
    use crate::Message;
    use crate::PointName;
    use crate::layout::LiterateToken;
    use crate::layout::Token;

    fn layout() -> LiterateLayout {
        LiterateLayout::default().timezone(TimeZone::UTC)
    }

    fn join(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn render_event() {
        let message = Message::event(Level::Warn, "disk {disk} almost full")
            .with_name(PointName::parse("app.storage"))
            .with_field("disk", "sda")
            .with_field("free", 1024)
            .with_timestamp(3_723_000_000_000);
        let tokens = layout().tokens(&message);

        assert_eq!(
            join(&tokens),
            "[01:02:03 WRN] disk sda almost full <app.storage>\n - free: 1024"
        );
        assert_eq!(tokens[3], Token::new("WRN", LiterateToken::LevelWarn));
        assert!(tokens.contains(&Token::new("free", LiterateToken::NameSymbol)));
        assert!(tokens.contains(&Token::new("1024", LiterateToken::NumericSymbol)));
    }

    #[test]
    fn render_gauge() {
        let message = Message::gauge(7, "ms").with_timestamp(0);
        assert_eq!(join(&layout().tokens(&message)), "[00:00:00 DBG] 7 ms");
    }
}
