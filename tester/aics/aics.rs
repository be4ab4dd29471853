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

use bluetooth_tester_btp::Address;
use std::ffi::CStr;
use std::sync::{Arc, RwLock};

/// Errors returned by the AICS control library
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid parameter, or operation not supported by the instance
    #[error("invalid argument")]
    InvalidArgument,
    /// The instance is not bound to a connection
    #[error("not connected")]
    NotConnected,
    /// The operation is not permitted in the current state
    #[error("operation not permitted")]
    NotPermitted,
    /// A procedure is already in progress
    #[error("busy")]
    Busy,
    /// Any other error reported by the stack
    #[error("errno {0}")]
    Errno(i32),
}

impl Error {
    /// Error from a negative errno value, as returned by C implementations
    pub fn from_errno(err: i32) -> Self {
        match err {
            -1 => Error::NotPermitted,
            -16 => Error::Busy,
            -22 => Error::InvalidArgument,
            -107 => Error::NotConnected,
            _ => Error::Errno(err),
        }
    }
}

/// Connection established with a peer
pub trait Connection: Send + Sync {
    /// Current LE address of the peer
    fn peer_address(&self) -> Address;
}

/// Instance of the AICS control library, either a local (server) instance
/// or a remote instance discovered by the client.
///
/// Reads complete asynchronously, through `AicsCallbacks`.
pub trait Aics: Send + Sync {
    /// Set the gain setting
    fn gain_set(&self, gain: i8) -> Result<(), Error>;
    /// Mute the input
    fn mute(&self) -> Result<(), Error>;
    /// Unmute the input
    fn unmute(&self) -> Result<(), Error>;
    /// Disable the mute control (server only)
    fn disable_mute(&self) -> Result<(), Error>;
    /// Select the manual gain mode
    fn manual_gain_set(&self) -> Result<(), Error>;
    /// Select the automatic gain mode
    fn automatic_gain_set(&self) -> Result<(), Error>;
    /// Lock the gain mode to manual only (server only)
    fn gain_set_manual_only(&self) -> Result<(), Error>;
    /// Lock the gain mode to automatic only (server only)
    fn gain_set_auto_only(&self) -> Result<(), Error>;
    /// Set the audio input description
    fn description_set(&self, description: &CStr) -> Result<(), Error>;
    /// Read the audio input description
    fn description_get(&self) -> Result<(), Error>;
    /// Read the audio input state
    fn state_get(&self) -> Result<(), Error>;
    /// Read the gain setting properties
    fn gain_setting_get(&self) -> Result<(), Error>;
    /// Read the audio input type
    fn type_get(&self) -> Result<(), Error>;
    /// Read the audio input status
    fn status_get(&self) -> Result<(), Error>;
    /// Connection the instance belongs to (client instances)
    fn client_conn(&self) -> Result<Arc<dyn Connection>, Error>;
}

/// Callbacks of the AICS control library. The payload is given along
/// with the error, even when the procedure failed.
pub trait AicsCallbacks: Send + Sync {
    /// Audio input state
    fn state(&self, inst: &dyn Aics, err: Result<(), Error>, gain: i8, mute: u8, mode: u8);

    /// Gain setting properties
    fn gain_setting(
        &self,
        inst: &dyn Aics,
        err: Result<(), Error>,
        units: u8,
        minimum: i8,
        maximum: i8,
    );

    /// Audio input type
    fn input_type(&self, inst: &dyn Aics, err: Result<(), Error>, input_type: u8);

    /// Audio input status
    fn status(&self, inst: &dyn Aics, err: Result<(), Error>, active: bool);

    /// Audio input description
    fn description(&self, inst: &dyn Aics, err: Result<(), Error>, description: &CStr);
}

/// Ordered registry of AICS instances. It is populated by the owner of the
/// instances (profile discovery, service registration), the tester only
/// iterates it.
#[derive(Default)]
pub struct AicsInstances {
    aics: RwLock<Vec<Arc<dyn Aics>>>,
}

impl AicsInstances {
    /// Registry initialized with `aics`
    pub fn new(aics: Vec<Arc<dyn Aics>>) -> Self {
        Self { aics: RwLock::new(aics) }
    }

    /// Replace the registered instances
    pub fn set(&self, aics: Vec<Arc<dyn Aics>>) {
        *self.aics.write().unwrap() = aics;
    }

    /// Append an instance
    pub fn push(&self, aics: Arc<dyn Aics>) {
        self.aics.write().unwrap().push(aics);
    }

    /// Remove all instances
    pub fn clear(&self) {
        self.aics.write().unwrap().clear();
    }

    /// Count of instances
    pub fn len(&self) -> usize {
        self.aics.read().unwrap().len()
    }

    /// Return `true` when no instance is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Aics>> {
        self.aics.read().unwrap().clone()
    }
}

#[test]
fn test_error_from_errno() {
    assert_eq!(Error::from_errno(-22), Error::InvalidArgument);
    assert_eq!(Error::from_errno(-107), Error::NotConnected);
    assert_eq!(Error::from_errno(-1), Error::NotPermitted);
    assert_eq!(Error::from_errno(-16), Error::Busy);
    assert_eq!(Error::from_errno(-5), Error::Errno(-5));
    assert_eq!(Error::Errno(-5).to_string(), "errno -5");
}
