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

//! A structured logging facade with message templates and pluggable targets.
//!
//! # Overview
//!
//! Application code asks for a logger by dotted name and logs leveled, structured messages
//! through it. A message is either an event rendered from a template such as
//! `"user {user} logged in"`, or a numeric gauge. Where messages go is decided once, at
//! startup, by installing a [`Config`] whose factory builds the logger of each name out of
//! [targets](append).
//!
//! Every logging call takes a function that builds the message. It only runs when the target
//! is enabled for the level, so disabled levels cost nothing.
//!
//! # Examples
//!
//! Log through the default literate console target:
//!
//! ```
//! use logforth_facade::Level;
//! use logforth_facade::LoggerExt;
//! use logforth_facade::Message;
//!
//! let logger = logforth_facade::create("app.auth");
//! logger.info(&|level| Message::event(level, "user {user} logged in").with_field("user", "haf"));
//! logger.gauge(Level::Debug, 512, "KiB");
//! ```
//!
//! Fan out to several targets and wait until every one has accepted the message:
//!
//! ```
//! use logforth_facade::Level;
//! use logforth_facade::Logger;
//! use logforth_facade::Message;
//! use logforth_facade::append::CombiningTarget;
//! use logforth_facade::append::ConsoleTarget;
//! use logforth_facade::append::DebugOutputTarget;
//!
//! logforth_facade::builder()
//!     .logger(
//!         CombiningTarget::default()
//!             .chain(ConsoleTarget::stderr(Level::Warn))
//!             .chain(DebugOutputTarget::new(Level::Debug)),
//!     )
//!     .apply();
//!
//! # async fn run() -> Result<(), logforth_facade::Error> {
//! let logger = logforth_facade::create("app.storage");
//! logger
//!     .log_with_ack(Level::Warn, &|level| {
//!         Message::event(level, "disk {disk} almost full").with_field("disk", "sda")
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod color;
pub mod layout;
pub mod template;
pub mod trap;

mod error;
mod level;
mod logger;
mod message;
mod value;

pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::level::Level;
pub use self::logger::*;
pub use self::message::FIELD_ERRORS;
pub use self::message::FIELD_EXN;
pub use self::message::Message;
pub use self::message::PointName;
pub use self::message::PointValue;
pub use self::value::ErrorValue;
pub use self::value::Value;
pub use self::value::ValueKind;
