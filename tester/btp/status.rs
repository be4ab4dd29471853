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

/// Status of a BTP command, carried by the status response (opcode `0x00`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Read, Write)]
pub enum Status {
    /// Command completed; never sent in a status response
    Success = 0x00,
    /// Command failed
    Failed = 0x01,
    /// Service or opcode not handled
    UnknownCommand = 0x02,
    /// Service not ready to handle the command
    NotReady = 0x03,
}

#[test]
fn test_status() {
    let mut r = Reader::new(&[0x01, 0x02, 0x04]);
    assert_eq!(r.read::<Status>(), Some(Status::Failed));
    assert_eq!(r.read::<Status>(), Some(Status::UnknownCommand));
    assert_eq!(r.read::<Status>(), None);

    let mut w = Writer::new(Vec::new());
    w.write(&Status::NotReady);
    assert_eq!(w.into_vec(), &[0x03][..]);
}
