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

use crate::aics::{Aics, AicsInstances, Error};
use crate::command::*;
use bluetooth_tester_btp::{
    parse_payload, set_bit, Address, CommandOpCode, EventToBytes, ExpectLen, Handler, ServiceId,
    Status, Tester, Transport, Writer, INDEX_DEFAULT,
};
use std::ffi::CStr;
use std::sync::Arc;

/// AICS service of the tester.
///
/// Commands addressed to `Address::ANY` target the local instances of the
/// `server` registry, any other address targets all the instances of the
/// `client` registry; the address is not matched against the connections
/// of the instances.
pub struct AicsTester {
    transport: Arc<dyn Transport>,
    client: Arc<AicsInstances>,
    server: Arc<AicsInstances>,
}

impl AicsTester {
    /// Create the service, events are sent on `transport`
    pub fn new(
        transport: Arc<dyn Transport>,
        client: Arc<AicsInstances>,
        server: Arc<AicsInstances>,
    ) -> Self {
        Self { transport, client, server }
    }

    /// Register the AICS handlers, then initialize the Volume Control
    /// service through `init_vcs`, whose status is returned.
    pub fn init(self: &Arc<Self>, tester: &Tester, init_vcs: impl FnOnce() -> Status) -> Status {
        tester.register_command_handlers(ServiceId::AICS, self.clone(), HANDLERS);
        init_vcs()
    }

    /// Unregister the service, nothing is owned by the tester
    pub fn unregister(&self) -> Status {
        Status::Success
    }

    pub(crate) fn send_event<T: EventToBytes>(&self, event: &T) {
        self.transport.send(&event.to_bytes());
    }

    fn instances(&self, address: &Address) -> &AicsInstances {
        if address.is_any() {
            &self.server
        } else {
            &self.client
        }
    }

    /// Apply `op` to each instance, stopping at the first failure.
    /// Instances already processed are not rolled back.
    fn fan_out(instances: &AicsInstances, op: impl Fn(&dyn Aics) -> Result<(), Error>) -> Status {
        for (i, aics) in instances.snapshot().iter().enumerate() {
            if let Err(err) = op(aics.as_ref()) {
                log::debug!("AICS instance {} failed: {}", i, err);
                return Status::Failed;
            }
        }
        Status::Success
    }

    fn routed(&self, address: &Address, op: impl Fn(&dyn Aics) -> Result<(), Error>) -> Status {
        Self::fan_out(self.instances(address), op)
    }
}

fn read_supported_commands(_: &AicsTester, _: &[u8], rsp: &mut Writer) -> Status {
    let mut data = [0u8; 2];
    for handler in HANDLERS {
        set_bit(&mut data, handler.opcode);
    }
    rsp.write(&ReadSupportedCommandsComplete { data });
    Status::Success
}

fn set_gain(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<SetGain>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS set gain {}", cp.gain);
    t.routed(&cp.address, |aics| aics.gain_set(cp.gain))
}

fn mute(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<Mute>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS mute");
    t.routed(&cp.address, |aics| aics.mute())
}

fn unmute(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<Unmute>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS unmute");
    t.routed(&cp.address, |aics| aics.unmute())
}

fn gain_setting_properties(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<GainSettingProperties>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS gain setting properties");
    t.routed(&cp.address, |aics| aics.gain_setting_get())
}

fn mute_disable(t: &AicsTester, _: &[u8], _: &mut Writer) -> Status {
    log::debug!("AICS disable mute");
    AicsTester::fan_out(&t.server, |aics| aics.disable_mute())
}

fn manual_gain(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<ManualGain>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS set manual gain mode");
    t.routed(&cp.address, |aics| aics.manual_gain_set())
}

fn auto_gain(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<AutoGain>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS set automatic gain mode");
    t.routed(&cp.address, |aics| aics.automatic_gain_set())
}

fn auto_gain_only(t: &AicsTester, _: &[u8], _: &mut Writer) -> Status {
    log::debug!("AICS automatic gain only");
    AicsTester::fan_out(&t.server, |aics| aics.gain_set_auto_only())
}

fn manual_gain_only(t: &AicsTester, _: &[u8], _: &mut Writer) -> Status {
    log::debug!("AICS manual gain only");
    AicsTester::fan_out(&t.server, |aics| aics.gain_set_manual_only())
}

fn set_description(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    // The payload must end with the description, as sized by its length field
    let Some(cp) = parse_payload::<SetDescription>(data) else {
        log::warn!("AICS set description: invalid length {}", data.len());
        return Status::Failed;
    };

    let len = cp.description.len();
    if len >= MAX_DESCRIPTION_SIZE {
        log::warn!("AICS set description: {} octets too long", len);
        return Status::Failed;
    }

    let mut buf = [0u8; MAX_DESCRIPTION_SIZE];
    buf[..len].copy_from_slice(&cp.description);
    let Ok(description) = CStr::from_bytes_until_nul(&buf) else {
        return Status::Failed;
    };

    log::debug!("AICS set description {:?}", description);
    AicsTester::fan_out(&t.server, |aics| aics.description_set(description))
}

fn description(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<Description>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS description");
    t.routed(&cp.address, |aics| aics.description_get())
}

fn input_type(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<InputType>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS type");
    t.routed(&cp.address, |aics| aics.type_get())
}

fn input_status(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<InputStatus>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS status");
    t.routed(&cp.address, |aics| aics.status_get())
}

fn state(t: &AicsTester, data: &[u8], _: &mut Writer) -> Status {
    let Some(cp) = parse_payload::<State>(data) else {
        return Status::Failed;
    };
    log::debug!("AICS state");
    t.routed(&cp.address, |aics| aics.state_get())
}

static HANDLERS: &[Handler<AicsTester>] = &[
    Handler {
        opcode: ReadSupportedCommands::OPCODE,
        index: ReadSupportedCommands::INDEX,
        expect_len: ExpectLen::Fixed(0),
        func: read_supported_commands,
    },
    Handler {
        opcode: SetGain::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN + 1),
        func: set_gain,
    },
    Handler {
        opcode: Mute::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: mute,
    },
    Handler {
        opcode: Unmute::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: unmute,
    },
    Handler {
        opcode: GainSettingProperties::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: gain_setting_properties,
    },
    Handler {
        opcode: MuteDisable::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(0),
        func: mute_disable,
    },
    Handler {
        opcode: ManualGain::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: manual_gain,
    },
    Handler {
        opcode: AutoGain::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: auto_gain,
    },
    Handler {
        opcode: AutoGainOnly::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(0),
        func: auto_gain_only,
    },
    Handler {
        opcode: ManualGainOnly::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(0),
        func: manual_gain_only,
    },
    Handler {
        opcode: SetDescription::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Variable,
        func: set_description,
    },
    Handler {
        opcode: Description::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: description,
    },
    Handler {
        opcode: InputType::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: input_type,
    },
    Handler {
        opcode: InputStatus::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: input_status,
    },
    Handler {
        opcode: State::OPCODE,
        index: INDEX_DEFAULT,
        expect_len: ExpectLen::Fixed(Address::LEN),
        func: state,
    },
];
