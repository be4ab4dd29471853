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

use crate::packet::{Packet, ServiceId, STATUS_OPCODE};
use crate::status::Status;
use crate::writer::Writer;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Link toward the test tool, carrying responses and events
pub trait Transport: Send + Sync {
    /// Send a complete BTP packet
    fn send(&self, data: &[u8]);
}

/// Expected length of the command parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectLen {
    /// Checked before calling the handler
    Fixed(usize),
    /// Left to the handler
    Variable,
}

/// Handler of a command opcode, operating on the service context `T`.
///
/// `func` receives the command parameters and a writer for the response
/// parameters. A response is sent with the parameters written when the
/// returned status is `Success`, and a status response otherwise.
pub struct Handler<T> {
    /// Opcode handled
    pub opcode: u8,
    /// Controller index the command must be received on
    pub index: u8,
    /// Length check of the parameters
    pub expect_len: ExpectLen,
    /// Handling function
    pub func: fn(&T, &[u8], &mut Writer) -> Status,
}

trait Service: Send + Sync {
    fn handle(&self, opcode: u8, index: u8, data: &[u8], rsp: &mut Writer) -> Status;
}

struct HandlerTable<T: 'static> {
    ctx: Arc<T>,
    handlers: &'static [Handler<T>],
}

impl<T: Send + Sync + 'static> Service for HandlerTable<T> {
    fn handle(&self, opcode: u8, index: u8, data: &[u8], rsp: &mut Writer) -> Status {
        let Some(handler) = self.handlers.iter().find(|h| h.opcode == opcode) else {
            return Status::UnknownCommand;
        };
        if handler.index != index {
            log::warn!("Opcode 0x{:02x} received on index 0x{:02x}", opcode, index);
            return Status::Failed;
        }
        if let ExpectLen::Fixed(len) = handler.expect_len {
            if len != data.len() {
                log::warn!(
                    "Opcode 0x{:02x}: invalid length {} (expected {})",
                    opcode,
                    data.len(),
                    len
                );
                return Status::Failed;
            }
        }
        (handler.func)(&self.ctx, data, rsp)
    }
}

/// Registry of the tested services, dispatching BTP commands to their
/// handler tables.
pub struct Tester {
    transport: Arc<dyn Transport>,
    services: RwLock<HashMap<ServiceId, Arc<dyn Service>>>,
}

impl Tester {
    /// Create the registry, responses are sent on `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, services: RwLock::new(HashMap::new()) }
    }

    /// Link toward the test tool
    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    /// Register the handler table of `service`, called with `ctx`.
    /// A table previously registered for the service is replaced.
    pub fn register_command_handlers<T: Send + Sync + 'static>(
        &self,
        service: ServiceId,
        ctx: Arc<T>,
        handlers: &'static [Handler<T>],
    ) {
        let table = Arc::new(HandlerTable { ctx, handlers });
        if self.services.write().unwrap().insert(service, table).is_some() {
            log::warn!("Handlers of service {:?} replaced", service);
        }
    }

    /// Remove the handler table of `service`, returns `false` when none was registered
    pub fn unregister_command_handlers(&self, service: ServiceId) -> bool {
        self.services.write().unwrap().remove(&service).is_some()
    }

    /// Return `true` when handlers are registered for `service`
    pub fn is_registered(&self, service: ServiceId) -> bool {
        self.services.read().unwrap().contains_key(&service)
    }

    /// Handle a BTP command packet, and send back its response
    pub fn handle_command(&self, data: &[u8]) {
        let Some(cmd) = Packet::from_bytes(data) else {
            log::error!("Malformed command packet: {:02x?}", data);
            return;
        };

        let service = self.services.read().unwrap().get(&cmd.service).cloned();
        let mut rsp = Writer::new(Vec::new());
        let status = match service {
            Some(service) => service.handle(cmd.opcode, cmd.index, cmd.data, &mut rsp),
            None => Status::UnknownCommand,
        };
        if status == Status::UnknownCommand {
            log::warn!("Unknown command {:?} opcode 0x{:02x}", cmd.service, cmd.opcode);
        }

        let (rsp, code) = (rsp.into_vec(), [status as u8]);
        let rsp = match status {
            Status::Success => Packet { data: &rsp, ..cmd },
            _ => Packet { opcode: STATUS_OPCODE, data: &code, ..cmd },
        };
        self.transport.send(&rsp.to_bytes());
    }
}
