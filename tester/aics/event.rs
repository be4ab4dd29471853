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

use bluetooth_tester_btp::{parse_payload, EventCode, Packet, ServiceId};

/// AICS event packet, as received by the test tool
#[derive(Debug)]
pub enum Event {
    /// Audio Input State
    State(StateEvent),
    /// Gain Setting Properties
    GainSettingProperties(GainSettingPropertiesEvent),
    /// Audio Input Type
    InputType(InputTypeEvent),
    /// Audio Input Status
    Status(StatusEvent),
    /// Audio Input Description
    Description(DescriptionEvent),
    /// Unknown event
    Unknown(u8),
}

impl Event {
    /// Read an AICS event packet. On error, returns the opcode when the
    /// header could be parsed.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Option<u8>> {
        let Some(p) = Packet::from_bytes(data).filter(|p| p.service == ServiceId::AICS) else {
            return Err(None);
        };
        Self::dispatch_read(p.opcode, p.data).ok_or(Some(p.opcode))
    }

    fn dispatch_read(opcode: u8, data: &[u8]) -> Option<Event> {
        Some(match opcode {
            StateEvent::OPCODE => Self::State(parse_payload(data)?),
            GainSettingPropertiesEvent::OPCODE => Self::GainSettingProperties(parse_payload(data)?),
            InputTypeEvent::OPCODE => Self::InputType(parse_payload(data)?),
            StatusEvent::OPCODE => Self::Status(parse_payload(data)?),
            DescriptionEvent::OPCODE => Self::Description(parse_payload(data)?),
            opcode => Self::Unknown(opcode),
        })
    }
}

pub use defs::*;

#[allow(missing_docs)]
#[rustfmt::skip]
mod defs {

use bluetooth_tester_btp::{Address, EventCode, Read, Reader, ServiceId, Write, Writer};

#[cfg(test)]
use super::Event;
#[cfg(test)]
use bluetooth_tester_btp::EventToBytes;


// Audio Input State

impl EventCode for StateEvent {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x80;
}

#[derive(Debug, Clone, PartialEq, Read, Write)]
pub struct StateEvent {
    pub address: Address,
    pub gain: i8,
    pub mute: u8,
    pub mode: u8,
}

#[test]
fn test_state_event() {
    let dump = [0x0a, 0x80, 0x00, 0x0a, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0xec, 0x01, 0x02];
    let Ok(Event::State(e)) = Event::from_bytes(&dump) else { panic!() };
    assert_eq!(e.address, Address::new(Address::PUBLIC, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]));
    assert_eq!(e.gain, -20);
    assert_eq!(e.mute, 0x01);
    assert_eq!(e.mode, 0x02);
    assert_eq!(e.to_bytes(), &dump[..]);
}


// Gain Setting Properties

impl EventCode for GainSettingPropertiesEvent {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x81;
}

#[derive(Debug, Clone, PartialEq, Read, Write)]
pub struct GainSettingPropertiesEvent {
    pub address: Address,
    pub units: u8,
    pub minimum: i8,
    pub maximum: i8,
}

#[test]
fn test_gain_setting_properties_event() {
    let dump = [0x0a, 0x81, 0x00, 0x0a, 0x00, 0x01, 0x01, 0x02, 0x03, 0x04, 0x05, 0xc6, 0x01, 0x80, 0x7f];
    let Ok(Event::GainSettingProperties(e)) = Event::from_bytes(&dump) else { panic!() };
    assert_eq!(e.units, 1);
    assert_eq!(e.minimum, -128);
    assert_eq!(e.maximum, 127);
    assert_eq!(e.to_bytes(), &dump[..]);
}


// Audio Input Type

impl EventCode for InputTypeEvent {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x82;
}

#[derive(Debug, Clone, PartialEq, Read, Write)]
pub struct InputTypeEvent {
    pub address: Address,
    pub input_type: u8,
}


// Audio Input Status

impl EventCode for StatusEvent {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x83;
}

#[derive(Debug, Clone, PartialEq, Read, Write)]
pub struct StatusEvent {
    pub address: Address,
    pub active: bool,
}

#[test]
fn test_status_event() {
    let dump = [0x0a, 0x83, 0x00, 0x08, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x01];
    let Ok(Event::Status(e)) = Event::from_bytes(&dump) else { panic!() };
    assert!(e.active);
    assert_eq!(e.to_bytes(), &dump[..]);
}


// Audio Input Description

impl EventCode for DescriptionEvent {
    const SERVICE: ServiceId = ServiceId::AICS;
    const OPCODE: u8 = 0x84;
}

#[derive(Debug, Clone, PartialEq, Read, Write)]
pub struct DescriptionEvent {
    pub address: Address,
    pub description: Vec<u8>,
}

#[test]
fn test_description_event() {
    let dump = [
        0x0a, 0x84, 0x00, 0x0d, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x05, 0x4c, 0x69, 0x6e,
        0x65, 0x31
    ];
    let Ok(Event::Description(e)) = Event::from_bytes(&dump) else { panic!() };
    assert_eq!(e.description, b"Line1");
    assert_eq!(e.to_bytes(), &dump[..]);
}

#[test]
fn test_event_errors() {
    assert!(matches!(Event::from_bytes(&[0x0a, 0x90, 0x00, 0x00, 0x00]), Ok(Event::Unknown(0x90))));
    assert!(matches!(Event::from_bytes(&[0x0a, 0x83, 0x00, 0x01, 0x00, 0x01]), Err(Some(0x83))));
    assert!(matches!(Event::from_bytes(&[0x08, 0x80, 0x00, 0x00, 0x00]), Err(None)));
}

}
