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

/// Encoding of a BTP parameter structure
pub trait Write {
    /// Append the encoded value to the writer
    fn write(&self, w: &mut Writer)
    where
        Self: Sized;
}

/// Growing buffer receiving encoded values
pub struct Writer {
    vec: Vec<u8>,
}

impl Writer {
    /// Writer appending to `vec`
    pub fn new(vec: Vec<u8>) -> Self {
        Self { vec }
    }

    /// Number of octets written so far
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    /// Return `true` when nothing has been written
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Give back the underlying buffer
    pub fn into_vec(self) -> Vec<u8> {
        self.vec
    }

    /// Append raw octets
    pub fn put(&mut self, slice: &[u8]) {
        self.vec.extend_from_slice(slice);
    }

    /// Write a value implementing `Write`
    pub fn write<T: Write>(&mut self, v: &T) {
        v.write(self)
    }

    /// Write an octet
    pub fn write_u8(&mut self, v: u8) {
        self.vec.push(v);
    }

    /// Write an octet, as two's complement
    pub fn write_i8(&mut self, v: i8) {
        self.write_u8(v as u8);
    }

    /// Write a boolean as `0x00` or `0x01`
    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(v.into());
    }

    /// Write a little endian 16 bits value
    pub fn write_u16(&mut self, v: u16) {
        self.put(&v.to_le_bytes());
    }

    /// Write a little endian 32 bits value
    pub fn write_u32(&mut self, v: u32) {
        self.put(&v.to_le_bytes());
    }

    /// Write a fixed size array of octets
    pub fn write_bytes<const N: usize>(&mut self, bytes: &[u8; N]) {
        self.put(bytes);
    }
}

/// Length prefixed octets. The length must fit in one octet, larger vectors
/// are a programming error.
impl Write for Vec<u8> {
    fn write(&self, w: &mut Writer) {
        w.write_u8(self.len().try_into().expect("Length prefixed data over 255 octets"));
        w.put(self);
    }
}

/// Set `bit` in a little endian bitmask, as used by the
/// "Read Supported Commands" responses.
pub fn set_bit(data: &mut [u8], bit: u8) {
    data[(bit / 8) as usize] |= 1 << (bit % 8);
}

#[test]
fn test_write_scalars() {
    let mut w = Writer::new(Vec::new());
    w.write_u8(1);
    w.write_i8(-2);
    w.write_bool(true);
    w.write_u16(0x1234);
    w.write_u32(0x1234_5678);
    w.write(&b"ab".to_vec());
    assert_eq!(
        w.into_vec(),
        &[0x01, 0xfe, 0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0x02, b'a', b'b'][..]
    );
}

#[test]
fn test_set_bit() {
    let mut data = [0u8; 2];
    set_bit(&mut data, 1);
    set_bit(&mut data, 7);
    set_bit(&mut data, 8);
    set_bit(&mut data, 15);
    assert_eq!(data, [0x82, 0x81]);
}
