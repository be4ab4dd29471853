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

//! Bluetooth Test Protocol (BTP) core: packet framing, status codes,
//! reading / writing helpers of fixed-layout parameters, and the registry
//! dispatching commands to the handler table of each tested service.

use bluetooth_tester_btp_derive as derive;

mod address;
mod packet;
mod reader;
mod status;
mod tester;
mod writer;

pub use address::*;
pub use packet::*;
pub use reader::{parse_payload, Read, Reader};
pub use status::*;
pub use tester::*;
pub use writer::{set_bit, Write, Writer};

pub use derive::{Read, Write};

/// Inits logging for Android
#[cfg(target_os = "android")]
pub fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_tag("bttester")
            .with_max_level(log::LevelFilter::Debug),
    );
}

/// Inits logging for host
#[cfg(not(target_os = "android"))]
pub fn init_logging() {
    env_logger::Builder::new().parse_default_env().try_init().ok();
}
