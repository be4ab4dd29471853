// Copyright 2024, The Android Open Source Project
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

//! Audio Input Control Service (AICS) of the Bluetooth tester
//!
//! The module exposes the AICS control library to a test tool, through BTP.
//! Commands are fanned-out to the AICS instances of the client or server
//! registry; callbacks of the library are reported back as BTP events:
//!
//! ```text
//!            BTP | ^ BTP
//!       Commands | | Events
//!        ________|_|________                       ___________
//!       |        : :        |                     |   AICS    |
//!       |        : : tester |      registries     |  library  |
//!       |        v :        |   ______________    |           |
//!       |   handlers -------|->| client (any) |-->|           |
//!       |          :        |  | server (ANY) |   |           |
//!       |          :        |  |______________|   |           |
//!       |    callbacks <----|---------------------|           |
//!       |___________________|                     |___________|
//! ```

mod aics;
mod callbacks;
mod command;
mod event;
mod handlers;

#[cfg(test)]
mod tests;

pub use aics::{Aics, AicsCallbacks, AicsInstances, Connection, Error};
pub use command::*;
pub use event::*;
pub use handlers::AicsTester;
