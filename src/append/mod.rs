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

//! Targets that deliver log messages.
//!
//! Every target implements [`Logger`](crate::Logger) and gates on the level before building
//! the message.

mod asynchronous;
mod combining;
mod console;
mod debug;

pub use self::asynchronous::AsyncBuilder;
pub use self::asynchronous::AsyncTarget;
pub use self::combining::CombiningTarget;
pub use self::console::ConsoleTarget;
pub use self::console::LiterateConsoleTarget;
pub use self::debug::DebugOutputTarget;
