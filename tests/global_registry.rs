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
use std::sync::Mutex;

use logforth_facade::Ack;
use logforth_facade::Level;
use logforth_facade::Logger;
use logforth_facade::LoggerExt;
use logforth_facade::Message;
use logforth_facade::MessageFactory;
use logforth_facade::PointName;

#[derive(Debug, Default)]
struct Capture(Mutex<Vec<Message>>);

impl Logger for Capture {
    fn log_with_ack(&self, level: Level, factory: MessageFactory<'_>) -> Ack {
        self.0.lock().unwrap().push(factory(level));
        Ack::done()
    }
}

// the registry is process-wide, so every step runs in one test, in order
#[test]
fn test_global_registry_lifecycle() {
    let registry = logforth_facade::registry();
    assert!(!registry.is_initialised());

    // before initialisation, every name shares the default target
    let a = logforth_facade::get_logger(&PointName::parse("lib.a"));
    let b = logforth_facade::get_logger(&PointName::parse("lib.b"));
    assert!(Arc::ptr_eq(&a, &b));
    let early = logforth_facade::create("lib.a");
    assert!(Arc::ptr_eq(early.target(), &a));

    let capture = Arc::new(Capture::default());
    logforth_facade::builder()
        .timestamp_source(|| 1_000)
        .logger_factory({
            let capture = capture.clone();
            move |_| capture.clone() as Arc<dyn Logger>
        })
        .apply();
    assert!(registry.is_initialised());
    assert_eq!(logforth_facade::timestamp(), 1_000);

    // names resolved before keep their logger; new names use the factory
    assert!(Arc::ptr_eq(logforth_facade::create("lib.a").target(), &a));
    let late = logforth_facade::create("app..http.");
    late.event(Level::Info, "listening on {port}");
    late.gauge(Level::Warn, 3, "conns");
    late.debug(&|level| Message::event(level, "kept"));

    let messages = capture.0.lock().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].name().segments(), ["app", "http"]);
    assert_eq!(messages[0].timestamp(), 1_000);
    assert_eq!(messages[1].level(), Level::Warn);
    assert_eq!(messages[2].level(), Level::Debug);
    drop(messages);

    assert!(logforth_facade::try_create("").is_err());
    assert!(std::panic::catch_unwind(|| logforth_facade::create("...")).is_err());
}
