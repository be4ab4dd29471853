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

use crate::derive::{Read, Write};
use crate::reader::{Read, Reader};
use crate::writer::{Write, Writer};
use std::fmt;

/// LE device address, with its type (`bt_addr_le_t` layout)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Read, Write)]
pub struct Address {
    /// Public (`0x00`) or random (`0x01`) address
    pub addr_type: u8,
    /// Address value, least significant octet first
    pub val: [u8; 6],
}

impl Address {
    /// Encoded length
    pub const LEN: usize = 7;

    /// Wildcard address, designates the local (server) side in commands
    pub const ANY: Address = Address { addr_type: Self::PUBLIC, val: [0; 6] };

    /// Public device address type
    pub const PUBLIC: u8 = 0x00;
    /// Random device address type
    pub const RANDOM: u8 = 0x01;

    /// Address from its type and value
    pub const fn new(addr_type: u8, val: [u8; 6]) -> Self {
        Self { addr_type, val }
    }

    /// Return `true` for the wildcard address
    pub fn is_any(&self) -> bool {
        *self == Self::ANY
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.val;
        write!(f, "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}", v[5], v[4], v[3], v[2], v[1], v[0])?;
        match self.addr_type {
            Self::PUBLIC => write!(f, " (public)"),
            Self::RANDOM => write!(f, " (random)"),
            t => write!(f, " (0x{:02x})", t),
        }
    }
}

#[test]
fn test_address() {
    let dump = [0x01, 0x66, 0x55, 0x44, 0x33, 0x22, 0xc1];
    let Some(a) = crate::parse_payload::<Address>(&dump) else { panic!() };
    assert_eq!(a, Address::new(Address::RANDOM, [0x66, 0x55, 0x44, 0x33, 0x22, 0xc1]));
    assert!(!a.is_any());
    assert_eq!(a.to_string(), "C1:22:33:44:55:66 (random)");

    let mut w = Writer::new(Vec::new());
    w.write(&a);
    assert_eq!(w.into_vec(), &dump[..]);
}

#[test]
fn test_address_any() {
    let Some(a) = crate::parse_payload::<Address>(&[0; 7]) else { panic!() };
    assert!(a.is_any());
    assert!(!Address::new(Address::RANDOM, [0; 6]).is_any());
}
