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

use std::sync::Mutex;

use logforth_facade::Level;
use logforth_facade::Logger;
use logforth_facade::Message;
use logforth_facade::PointName;
use logforth_facade::append::DebugOutputTarget;

static CAPTURED: Mutex<Vec<(String, log::Level, String)>> = Mutex::new(Vec::new());

struct CaptureLog;

impl log::Log for CaptureLog {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.lock().unwrap().push((
            record.target().to_owned(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

// the `log` logger is process-wide, so every step runs in one test, in order
#[test]
fn test_debug_output_forwards_plain_lines() {
    log::set_logger(&CaptureLog).unwrap();
    log::set_max_level(log::LevelFilter::Trace);

    let target = DebugOutputTarget::new(Level::Debug);
    assert!(!target.enabled(Level::Verbose));

    let message = |level| {
        Message::event(level, "query took {ms} ms")
            .with_field("ms", 12)
            .with_name(PointName::parse("app.db"))
            .with_timestamp(0)
    };
    target.log(Level::Verbose, &message);
    target.log(Level::Info, &message);
    target.log(Level::Fatal, &message);
    target.log_simple(Message::event(Level::Warn, "unnamed").with_timestamp(0));

    let captured = CAPTURED.lock().unwrap();
    assert_eq!(
        *captured,
        [
            (
                "app.db".to_owned(),
                log::Level::Info,
                "[I] 1970-01-01T00:00:00Z: query took 12 ms [app.db]".to_owned()
            ),
            (
                "app.db".to_owned(),
                log::Level::Error,
                "[F] 1970-01-01T00:00:00Z: query took 12 ms [app.db]".to_owned()
            ),
            (
                "logforth_facade".to_owned(),
                log::Level::Warn,
                "[W] 1970-01-01T00:00:00Z: unnamed".to_owned()
            ),
        ]
    );
}
