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

/// Decoding of a BTP parameter structure
pub trait Read {
    /// Read the value, `None` when the data is truncated or invalid
    fn read(r: &mut Reader) -> Option<Self>
    where
        Self: Sized;
}

/// Cursor over the payload of a BTP packet
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Reader starting at the beginning of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of octets not consumed yet
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take the next `n` octets
    pub fn get(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            return None;
        }
        let old_pos = self.pos;
        self.pos += n;
        Some(&self.data[old_pos..self.pos])
    }

    /// Read a value implementing `Read`
    pub fn read<T: Read>(&mut self) -> Option<T> {
        T::read(self)
    }

    /// Read an octet
    pub fn read_u8(&mut self) -> Option<u8> {
        Some(self.get(1)?[0])
    }

    /// Read an octet, as two's complement
    pub fn read_i8(&mut self) -> Option<i8> {
        Some(self.read_u8()? as i8)
    }

    /// Read a boolean octet, any non-zero value is `true`
    pub fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    /// Read a little endian 16 bits value
    pub fn read_u16(&mut self) -> Option<u16> {
        Some(u16::from_le_bytes(self.read_bytes()?))
    }

    /// Read a little endian 32 bits value
    pub fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.read_bytes()?))
    }

    /// Read a fixed size array of octets
    pub fn read_bytes<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.get(N)?.try_into().ok()
    }
}

/// Length prefixed octets, the length is encoded on one octet
impl Read for Vec<u8> {
    fn read(r: &mut Reader) -> Option<Self> {
        let len = r.read_u8()? as usize;
        Some(Vec::from(r.get(len)?))
    }
}

/// Decode the parameters of a command, which must span the whole payload
pub fn parse_payload<T: Read>(data: &[u8]) -> Option<T> {
    let mut r = Reader::new(data);
    let v = r.read()?;
    (r.remaining() == 0).then_some(v)
}

#[test]
fn test_read_scalars() {
    let dump = [0x01, 0xfe, 0x02, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xaa];
    let mut r = Reader::new(&dump);
    assert_eq!(r.read_u8(), Some(1));
    assert_eq!(r.read_i8(), Some(-2));
    assert_eq!(r.read_bool(), Some(true));
    assert_eq!(r.read_u16(), Some(0x1234));
    assert_eq!(r.read_u32(), Some(0x1234_5678));
    assert_eq!(r.remaining(), 1);
    assert_eq!(r.read_u16(), None);
    assert_eq!(r.read_u8(), Some(0xaa));
    assert_eq!(r.read_u8(), None);
}

#[test]
fn test_read_length_prefixed() {
    let Some(v) = parse_payload::<Vec<u8>>(&[0x03, b'a', b'b', b'c']) else { panic!() };
    assert_eq!(v, b"abc");
    assert!(parse_payload::<Vec<u8>>(&[0x03, b'a', b'b']).is_none());
    assert!(parse_payload::<Vec<u8>>(&[0x01, b'a', b'b']).is_none());
}
