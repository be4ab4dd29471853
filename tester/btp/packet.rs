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

use crate::reader::Reader;
use crate::writer::{Write, Writer};

/// Identifier of a BTP service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(pub u8);

#[allow(missing_docs)]
impl ServiceId {
    pub const CORE: ServiceId = ServiceId(0x00);
    pub const GAP: ServiceId = ServiceId(0x01);
    pub const GATT: ServiceId = ServiceId(0x02);
    pub const L2CAP: ServiceId = ServiceId(0x03);
    pub const MESH: ServiceId = ServiceId(0x04);
    pub const VCS: ServiceId = ServiceId(0x08);
    pub const AICS: ServiceId = ServiceId(0x0a);
    pub const VOCS: ServiceId = ServiceId(0x0b);
    pub const MICP: ServiceId = ServiceId(0x10);
}

/// Controller index of commands and events bound to the default controller
pub const INDEX_DEFAULT: u8 = 0x00;

/// Controller index of commands not bound to a controller
pub const INDEX_NONE: u8 = 0xff;

/// Opcode of the status response, common to all services
pub const STATUS_OPCODE: u8 = 0x00;

/// Length of the BTP packet header
pub const HEADER_LEN: usize = 5;

/// BTP packet: command, response or event
#[derive(Debug, Clone, PartialEq)]
pub struct Packet<'a> {
    /// Service the packet belongs to
    pub service: ServiceId,
    /// Opcode, local to the service
    pub opcode: u8,
    /// Controller index
    pub index: u8,
    /// Parameters
    pub data: &'a [u8],
}

impl<'a> Packet<'a> {
    /// Read a BTP packet, the payload spans the length given by the header
    pub fn from_bytes(data: &'a [u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        let service = ServiceId(r.read_u8()?);
        let opcode = r.read_u8()?;
        let index = r.read_u8()?;
        let len = r.read_u16()? as usize;
        Some(Self { service, opcode, index, data: r.get(len)? })
    }

    /// Output the BTP packet
    pub fn to_bytes(&self) -> Vec<u8> {
        frame(self.service, self.opcode, self.index, |w| w.put(self.data))
    }
}

fn frame(service: ServiceId, opcode: u8, index: u8, params: impl FnOnce(&mut Writer)) -> Vec<u8> {
    let mut w = Writer::new(Vec::with_capacity(HEADER_LEN + 32));
    w.write_u8(service.0);
    w.write_u8(opcode);
    w.write_u8(index);
    w.write_u16(0);
    params(&mut w);

    let mut vec = w.into_vec();
    let len = u16::try_from(vec.len() - HEADER_LEN).expect("BTP payload over 65535 octets");
    vec[3..HEADER_LEN].copy_from_slice(&len.to_le_bytes());
    vec
}

/// Define command service and opcode
pub trait CommandOpCode {
    /// Service of the command
    const SERVICE: ServiceId;
    /// OpCode of the command
    const OPCODE: u8;
    /// Controller index the command is expected on
    const INDEX: u8 = INDEX_DEFAULT;
}

/// Build command packet from definition
pub trait CommandToBytes {
    /// Output the BTP command packet
    fn to_bytes(&self) -> Vec<u8>;
}

impl<T: CommandOpCode + Write> CommandToBytes for T {
    fn to_bytes(&self) -> Vec<u8> {
        frame(T::SERVICE, T::OPCODE, T::INDEX, |w| w.write(self))
    }
}

/// Define event service and opcode
pub trait EventCode {
    /// Service of the event
    const SERVICE: ServiceId;
    /// OpCode of the event
    const OPCODE: u8;
}

/// Build event packet from definition
pub trait EventToBytes {
    /// Output the BTP event packet
    fn to_bytes(&self) -> Vec<u8>;
}

impl<T: EventCode + Write> EventToBytes for T {
    fn to_bytes(&self) -> Vec<u8> {
        frame(T::SERVICE, T::OPCODE, INDEX_DEFAULT, |w| w.write(self))
    }
}

#[test]
fn test_packet() {
    let dump = [0x0a, 0x02, 0x00, 0x08, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0xf6];
    let Some(p) = Packet::from_bytes(&dump) else { panic!() };
    assert_eq!(p.service, ServiceId::AICS);
    assert_eq!(p.opcode, 0x02);
    assert_eq!(p.index, INDEX_DEFAULT);
    assert_eq!(p.data.len(), 8);
    assert_eq!(p.to_bytes(), &dump[..]);
}

#[test]
fn test_packet_truncated() {
    assert!(Packet::from_bytes(&[0x0a, 0x02, 0x00, 0x08]).is_none());
    assert!(Packet::from_bytes(&[0x0a, 0x02, 0x00, 0x02, 0x00, 0x01]).is_none());
}

#[test]
fn test_packet_empty_payload() {
    let p = Packet { service: ServiceId::AICS, opcode: 0x06, index: INDEX_DEFAULT, data: &[] };
    assert_eq!(p.to_bytes(), &[0x0a, 0x06, 0x00, 0x00, 0x00][..]);
}
