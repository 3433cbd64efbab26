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

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;

use arc_swap::ArcSwapOption;

use crate::Error;
use crate::Level;
use crate::PointName;
use crate::append::LiterateConsoleTarget;
use crate::logger::Logger;
use crate::logger::NamedLogger;

pub(crate) type TimestampSource = Arc<dyn Fn() -> i64 + Send + Sync>;
pub(crate) type LoggerFactory = Arc<dyn Fn(&PointName) -> Arc<dyn Logger> + Send + Sync>;

/// The configuration of a [`Registry`]. Build one with [`builder`](crate::builder).
pub struct Config {
    pub(crate) timestamp_source: TimestampSource,
    pub(crate) logger_factory: LoggerFactory,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config").finish_non_exhaustive()
    }
}

/// Hands out one shared logger per name path.
///
/// A name is materialized once, on first lookup, by the factory of the configuration current
/// at that moment, and then cached for the life of the registry. Installing a new
/// configuration with [`Registry::initialise`] only affects names first looked up afterwards;
/// loggers already cached keep their targets.
///
/// Until a configuration is installed, every name resolves to the same default logger.
pub struct Registry {
    default: Arc<dyn Logger>,
    config: ArcSwapOption<Config>,
    cache: RwLock<HashMap<PointName, Arc<dyn Logger>>>,
    // held while a name is materialized, so each name is built at most once
    materialize: Mutex<()>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("default", &self.default)
            .field("initialised", &self.is_initialised())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an unconfigured registry whose names all resolve to `default`.
    pub fn new(default: Arc<dyn Logger>) -> Registry {
        Registry {
            default,
            config: ArcSwapOption::empty(),
            cache: RwLock::new(HashMap::new()),
            materialize: Mutex::new(()),
        }
    }

    /// Replace the configuration wholesale. The last call wins.
    pub fn initialise(&self, config: Config) {
        self.config.store(Some(Arc::new(config)));
    }

    /// Whether a configuration has been installed.
    pub fn is_initialised(&self) -> bool {
        self.config.load().is_some()
    }

    /// The current time according to the configured timestamp source, in nanoseconds since the
    /// Unix epoch.
    pub fn timestamp(&self) -> i64 {
        match &*self.config.load() {
            Some(config) => (config.timestamp_source)(),
            None => system_timestamp(),
        }
    }

    /// Return the logger cached for `name`, materializing it on first use.
    ///
    /// The factory runs while the registry is locked and must not look up loggers itself.
    pub fn get(&self, name: &PointName) -> Arc<dyn Logger> {
        if let Some(logger) = self.cached(name) {
            return logger;
        }

        let _guard = self
            .materialize
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(logger) = self.cached(name) {
            return logger;
        }

        let logger = match self.config.load_full() {
            None => self.default.clone(),
            Some(config) => (config.logger_factory)(name),
        };
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), logger.clone());
        logger
    }

    /// Return a logger that stamps `name` onto the messages it logs.
    pub fn logger(&self, name: PointName) -> NamedLogger {
        let target = self.get(&name);
        NamedLogger::new(name, target)
    }

    /// Return a logger for a dotted name such as `app.http.server`.
    ///
    /// # Errors
    ///
    /// Return an error if the name has no non-empty segment.
    pub fn try_create(&self, name: &str) -> Result<NamedLogger, Error> {
        let name = PointName::try_parse(name)?;
        Ok(self.logger(name))
    }

    /// Return a logger for a dotted name such as `app.http.server`.
    ///
    /// # Panics
    ///
    /// Panic if the name has no non-empty segment.
    pub fn create(&self, name: &str) -> NamedLogger {
        self.logger(PointName::parse(name))
    }

    fn cached(&self, name: &PointName) -> Option<Arc<dyn Logger>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

pub(crate) fn system_timestamp() -> i64 {
    i64::try_from(jiff::Timestamp::now().as_nanosecond()).unwrap_or(i64::MAX)
}

static REGISTRY: LazyLock<Registry> =
    LazyLock::new(|| Registry::new(Arc::new(LiterateConsoleTarget::stdout(Level::Info))));

/// The process-wide registry.
///
/// Until [`initialise`] is called, every name shares a literate console target on standard
/// output that lets through [`Level::Info`] and above.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Replace the process-wide configuration. See [`Registry::initialise`].
pub fn initialise(config: Config) {
    registry().initialise(config)
}

/// The current time according to the process-wide configuration.
pub fn timestamp() -> i64 {
    registry().timestamp()
}

/// Return the process-wide logger cached for `name`. See [`Registry::get`].
pub fn get_logger(name: &PointName) -> Arc<dyn Logger> {
    registry().get(name)
}

/// Return a process-wide logger for a dotted name.
///
/// # Errors
///
/// Return an error if the name has no non-empty segment.
pub fn try_create(name: &str) -> Result<NamedLogger, Error> {
    registry().try_create(name)
}

/// Return a process-wide logger for a dotted name.
///
/// # Panics
///
/// Panic if the name has no non-empty segment.
///
/// # Examples
///
/// ```
/// use logforth_facade::LoggerExt;
///
/// let logger = logforth_facade::create("app.http");
/// logger.event(logforth_facade::Level::Info, "listening");
/// ```
pub fn create(name: &str) -> NamedLogger {
    registry().create(name)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::Registry;
    use crate::Level;
    use crate::Logger;
    use crate::LoggerExt;
    use crate::Message;
    use crate::PointName;
    use crate::logger::Ack;
    use crate::logger::MessageFactory;

    #[derive(Debug, Default)]
    struct Counter {
        names: Mutex<Vec<PointName>>,
    }

    impl Counter {
        fn hits(&self) -> usize {
            self.names.lock().unwrap().len()
        }
    }

    impl Logger for Counter {
        fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
            let message = factory(level);
            self.names.lock().unwrap().push(message.name().clone());
            Ack::done()
        }
    }

    fn fixed_clock() -> i64 {
        42
    }

    #[test]
    fn unconfigured_names_share_the_default() {
        let default = Arc::new(Counter::default());
        let registry = Registry::new(default.clone());

        let a = registry.get(&PointName::parse("a"));
        let b = registry.get(&PointName::parse("b.c"));
        assert!(Arc::ptr_eq(&a, &b));

        registry.create("a").event(Level::Info, "one");
        registry.create("b.c").event(Level::Info, "two");
        assert_eq!(default.hits(), 2);
        assert!(!registry.is_initialised());
    }

    #[test]
    fn initialise_affects_only_new_names() {
        let default = Arc::new(Counter::default());
        let custom = Arc::new(Counter::default());
        let registry = Registry::new(default.clone());

        let before = registry.create("early");
        registry.initialise(
            crate::builder()
                .timestamp_source(fixed_clock)
                .logger(custom.clone())
                .build(),
        );
        let after = registry.create("late");
        let again = registry.create("early");

        before.event(Level::Info, "a");
        again.event(Level::Info, "b");
        after.event(Level::Info, "c");

        assert_eq!(default.hits(), 2);
        assert_eq!(custom.hits(), 1);
        assert_eq!(registry.timestamp(), 42);
    }

    #[test]
    fn each_name_is_materialized_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Registry::new(Arc::new(Counter::default()));
        registry.initialise(
            crate::builder()
                .logger_factory({
                    let calls = calls.clone();
                    move |_| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Arc::new(Counter::default()) as Arc<dyn Logger>
                    }
                })
                .build(),
        );

        let name = PointName::parse("hot.path");
        let loggers: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| registry.get(&name))).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(loggers.iter().all(|l| Arc::ptr_eq(l, &loggers[0])));
        registry.get(&PointName::parse("other"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn create_stamps_the_name() {
        let default = Arc::new(Counter::default());
        let registry = Registry::new(default.clone());

        let logger = registry.create("a.b.c");
        logger.info(&|level| Message::event(level, "hello"));
        logger.log_simple(Message::event(Level::Warn, "named").with_name(PointName::parse("x")));

        let names = default.names.lock().unwrap();
        assert_eq!(names[0].segments(), ["a", "b", "c"]);
        assert_eq!(names[1].segments(), ["x"]);
        assert!(registry.try_create("..").is_err());
    }

    #[test]
    #[should_panic(expected = "logger name must not be empty")]
    fn create_empty_name_panics() {
        let registry = Registry::new(Arc::new(Counter::default()));
        registry.create("");
    }
}
