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

use bluetooth_tester_btp::{
    Address, CommandOpCode, Read, Reader, ServiceId, Write, Writer, INDEX_NONE,
};

/// Size of the description buffer, including the NUL terminator
pub const MAX_DESCRIPTION_SIZE: usize = 16;

pub use defs::*;

#[allow(missing_docs)]
#[rustfmt::skip]
mod defs {

use super::*;

#[cfg(test)]
use bluetooth_tester_btp::{parse_payload, CommandToBytes, Packet};


// Read Supported Commands

impl CommandOpCode for ReadSupportedCommands {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x01;
    const INDEX: u8 = INDEX_NONE;
}

#[derive(Debug, Read, Write)]
pub struct ReadSupportedCommands {}

#[derive(Debug, Read, Write)]
pub struct ReadSupportedCommandsComplete {
    pub data: [u8; 2],
}

#[test]
fn test_read_supported_commands() {
    let dump = [0x0a, 0x01, 0xff, 0x00, 0x00];
    let Some(p) = Packet::from_bytes(&dump) else { panic!() };
    assert_eq!(p.opcode, ReadSupportedCommands::OPCODE);
    assert!(parse_payload::<ReadSupportedCommands>(p.data).is_some());
    assert_eq!(ReadSupportedCommands {}.to_bytes(), &dump[..]);
}


// Set Gain

impl CommandOpCode for SetGain {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x02;
}

#[derive(Debug, Read, Write)]
pub struct SetGain {
    pub address: Address,
    pub gain: i8,
}

#[test]
fn test_set_gain() {
    let dump = [0x0a, 0x02, 0x00, 0x08, 0x00, 0x00, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, 0xf6];
    let Some(p) = Packet::from_bytes(&dump) else { panic!() };
    let Some(c) = parse_payload::<SetGain>(p.data) else { panic!() };
    assert_eq!(c.address, Address::new(Address::PUBLIC, [0x06, 0x05, 0x04, 0x03, 0x02, 0x01]));
    assert_eq!(c.gain, -10);
    assert_eq!(c.to_bytes(), &dump[..]);
}


// Mute

impl CommandOpCode for Mute {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x03;
}

#[derive(Debug, Read, Write)]
pub struct Mute {
    pub address: Address,
}


// Unmute

impl CommandOpCode for Unmute {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x04;
}

#[derive(Debug, Read, Write)]
pub struct Unmute {
    pub address: Address,
}


// Gain Setting Properties

impl CommandOpCode for GainSettingProperties {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x05;
}

#[derive(Debug, Read, Write)]
pub struct GainSettingProperties {
    pub address: Address,
}


// Mute Disable

impl CommandOpCode for MuteDisable {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x06;
}

#[derive(Debug, Read, Write)]
pub struct MuteDisable {}

#[test]
fn test_mute_disable() {
    let dump = [0x0a, 0x06, 0x00, 0x00, 0x00];
    assert_eq!(MuteDisable {}.to_bytes(), &dump[..]);
}


// Manual Gain Mode

impl CommandOpCode for ManualGain {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x07;
}

#[derive(Debug, Read, Write)]
pub struct ManualGain {
    pub address: Address,
}


// Automatic Gain Mode

impl CommandOpCode for AutoGain {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x08;
}

#[derive(Debug, Read, Write)]
pub struct AutoGain {
    pub address: Address,
}


// Automatic Gain Only

impl CommandOpCode for AutoGainOnly {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x09;
}

#[derive(Debug, Read, Write)]
pub struct AutoGainOnly {}


// Manual Gain Only

impl CommandOpCode for ManualGainOnly {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x0a;
}

#[derive(Debug, Read, Write)]
pub struct ManualGainOnly {}


// Set Description

impl CommandOpCode for SetDescription {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x0b;
}

#[derive(Debug, Read, Write)]
pub struct SetDescription {
    pub address: Address,
    pub description: Vec<u8>,
}

impl SetDescription {
    /// Length of the fixed part, preceding the description
    pub const HEADER_LEN: usize = Address::LEN + 1;
}

#[test]
fn test_set_description() {
    let dump = [
        0x0a, 0x0b, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x4d, 0x69, 0x63,
        0x31
    ];
    let Some(p) = Packet::from_bytes(&dump) else { panic!() };
    let Some(c) = parse_payload::<SetDescription>(p.data) else { panic!() };
    assert!(c.address.is_any());
    assert_eq!(c.description, b"Mic1");
    assert_eq!(c.to_bytes(), &dump[..]);
}

#[test]
fn test_set_description_length_mismatch() {
    let data = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x4d, 0x69, 0x63];
    assert!(parse_payload::<SetDescription>(&data).is_none());
    let data = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x4d, 0x69, 0x63];
    assert!(parse_payload::<SetDescription>(&data).is_none());
    assert!(parse_payload::<SetDescription>(&data[..SetDescription::HEADER_LEN - 1]).is_none());
}


// Description

impl CommandOpCode for Description {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x0c;
}

#[derive(Debug, Read, Write)]
pub struct Description {
    pub address: Address,
}


// Input Type

impl CommandOpCode for InputType {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x0d;
}

#[derive(Debug, Read, Write)]
pub struct InputType {
    pub address: Address,
}


// Input Status

impl CommandOpCode for InputStatus {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x0e;
}

#[derive(Debug, Read, Write)]
pub struct InputStatus {
    pub address: Address,
}


// State

impl CommandOpCode for State {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x0f;
}

#[derive(Debug, Read, Write)]
pub struct State {
    pub address: Address,
}

#[test]
fn test_state() {
    let dump = [0x0a, 0x0f, 0x00, 0x07, 0x00, 0x01, 0x11, 0x22, 0x33, 0x44, 0x55, 0xc6];
    let Some(p) = Packet::from_bytes(&dump) else { panic!() };
    let Some(c) = parse_payload::<State>(p.data) else { panic!() };
    assert_eq!(c.address, Address::new(Address::RANDOM, [0x11, 0x22, 0x33, 0x44, 0x55, 0xc6]));
    assert_eq!(c.to_bytes(), &dump[..]);
}

}
