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

use std::sync::Arc;

use crate::Level;
use crate::PointName;
use crate::append::LiterateConsoleTarget;
use crate::logger::Config;
use crate::logger::Logger;
use crate::logger::Registry;
use crate::logger::registry::LoggerFactory;
use crate::logger::registry::TimestampSource;
use crate::logger::registry::system_timestamp;

/// Create a new empty [`ConfigBuilder`].
///
/// # Examples
///
/// ```
/// use logforth_facade::Level;
/// use logforth_facade::append::CombiningTarget;
/// use logforth_facade::append::ConsoleTarget;
/// use logforth_facade::append::DebugOutputTarget;
///
/// logforth_facade::builder()
///     .logger(
///         CombiningTarget::default()
///             .chain(ConsoleTarget::stderr(Level::Warn))
///             .chain(DebugOutputTarget::new(Level::Debug)),
///     )
///     .apply();
/// ```
pub fn builder() -> ConfigBuilder {
    ConfigBuilder::default()
}

/// A builder for a registry [`Config`]. See also [`builder`] for a fluent API.
///
/// Unset parts fall back to the system clock and to one literate console target on standard
/// output, shared by every name.
#[must_use = "call `build` to get the config or `apply` to install it process-wide"]
#[derive(Default)]
pub struct ConfigBuilder {
    timestamp_source: Option<TimestampSource>,
    logger_factory: Option<LoggerFactory>,
}

impl std::fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("timestamp_source", &self.timestamp_source.is_some())
            .field("logger_factory", &self.logger_factory.is_some())
            .finish()
    }
}

impl ConfigBuilder {
    /// Set the clock messages are stamped with, in nanoseconds since the Unix epoch.
    pub fn timestamp_source(mut self, source: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.timestamp_source = Some(Arc::new(source));
        self
    }

    /// Set the function that builds the logger of a name when it is first looked up.
    pub fn logger_factory(
        mut self,
        factory: impl Fn(&PointName) -> Arc<dyn Logger> + Send + Sync + 'static,
    ) -> Self {
        self.logger_factory = Some(Arc::new(factory));
        self
    }

    /// Share one logger among every name.
    pub fn logger(self, logger: impl Logger) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(logger);
        self.logger_factory(move |_| logger.clone())
    }

    /// Build the config.
    pub fn build(self) -> Config {
        let timestamp_source = self.timestamp_source.unwrap_or_else(|| {
            let source: TimestampSource = Arc::new(system_timestamp);
            source
        });
        let logger_factory = self.logger_factory.unwrap_or_else(|| {
            let logger: Arc<dyn Logger> = Arc::new(LiterateConsoleTarget::stdout(Level::Info));
            let factory: LoggerFactory = Arc::new(move |_: &PointName| logger.clone());
            factory
        });

        Config {
            timestamp_source,
            logger_factory,
        }
    }

    /// Install the config into `registry`.
    pub fn apply_to(self, registry: &Registry) {
        registry.initialise(self.build())
    }

    /// Install the config process-wide.
    pub fn apply(self) {
        crate::initialise(self.build())
    }
}
