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

use crate::aics::{Aics, AicsCallbacks, Error};
use crate::event::*;
use crate::handlers::AicsTester;
use bluetooth_tester_btp::Address;
use std::ffi::CStr;

/// Peer address of the connection of `inst`, resolved at each event
fn peer_address(inst: &dyn Aics) -> Option<Address> {
    match inst.client_conn() {
        Ok(conn) => Some(conn.peer_address()),
        Err(err) => {
            log::error!("Cannot get the connection of the AICS instance: {}", err);
            None
        }
    }
}

fn log_callback(name: &str, err: Result<(), Error>) {
    match err {
        Ok(()) => log::debug!("AICS {} callback", name),
        Err(err) => log::warn!("AICS {} callback ({})", name, err),
    }
}

impl AicsCallbacks for AicsTester {
    fn state(&self, inst: &dyn Aics, err: Result<(), Error>, gain: i8, mute: u8, mode: u8) {
        if let Some(address) = peer_address(inst) {
            self.send_event(&StateEvent { address, gain, mute, mode });
        }
        log_callback("state", err);
    }

    fn gain_setting(
        &self,
        inst: &dyn Aics,
        err: Result<(), Error>,
        units: u8,
        minimum: i8,
        maximum: i8,
    ) {
        if let Some(address) = peer_address(inst) {
            self.send_event(&GainSettingPropertiesEvent { address, units, minimum, maximum });
        }
        log_callback("gain setting", err);
    }

    fn input_type(&self, inst: &dyn Aics, err: Result<(), Error>, input_type: u8) {
        if let Some(address) = peer_address(inst) {
            self.send_event(&InputTypeEvent { address, input_type });
        }
        log_callback("input type", err);
    }

    fn status(&self, inst: &dyn Aics, err: Result<(), Error>, active: bool) {
        if let Some(address) = peer_address(inst) {
            self.send_event(&StatusEvent { address, active });
        }
        log_callback("status", err);
    }

    fn description(&self, inst: &dyn Aics, err: Result<(), Error>, description: &CStr) {
        let max_len = usize::from(u8::MAX);
        let mut data = description.to_bytes();
        if data.len() > max_len {
            log::warn!("AICS description of {} octets truncated", data.len());
            data = &data[..max_len];
        }

        // Allocated per event, no buffer is shared between callbacks
        if let Some(address) = peer_address(inst) {
            self.send_event(&DescriptionEvent { address, description: data.to_vec() });
        }
        log_callback("description", err);
    }
}
