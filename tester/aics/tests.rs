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

use crate::*;
use bluetooth_tester_btp::{
    Address, CommandOpCode, CommandToBytes, EventToBytes, Packet, ServiceId, Status, Tester,
    Transport, INDEX_DEFAULT,
};
use std::ffi::{CStr, CString};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

const PEER_1: Address = Address::new(Address::RANDOM, [0x01, 0x02, 0x03, 0x04, 0x05, 0xc6]);
const PEER_2: Address = Address::new(Address::PUBLIC, [0x11, 0x12, 0x13, 0x14, 0x15, 0x16]);
const UNKNOWN_PEER: Address = Address::new(Address::PUBLIC, [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);

#[derive(Default)]
struct TransportSink {
    sent: Mutex<Vec<Vec<u8>>>,
}

impl Transport for TransportSink {
    fn send(&self, data: &[u8]) {
        self.sent.lock().unwrap().push(data.to_vec());
    }
}

impl TransportSink {
    fn take(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    GainSet(i8),
    Mute,
    Unmute,
    DisableMute,
    ManualGain,
    AutoGain,
    ManualGainOnly,
    AutoGainOnly,
    DescriptionSet(CString),
    DescriptionGet,
    StateGet,
    GainSettingGet,
    TypeGet,
    StatusGet,
}

struct MockConnection {
    address: Mutex<Address>,
}

impl Connection for MockConnection {
    fn peer_address(&self) -> Address {
        *self.address.lock().unwrap()
    }
}

struct MockAics {
    id: usize,
    calls: Arc<Mutex<Vec<(usize, Call)>>>,
    fail: bool,
    conn: Option<Arc<MockConnection>>,
}

impl MockAics {
    fn record(&self, call: Call) -> Result<(), Error> {
        self.calls.lock().unwrap().push((self.id, call));
        if self.fail {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    fn set_peer_address(&self, address: Address) {
        *self.conn.as_ref().unwrap().address.lock().unwrap() = address;
    }
}

impl Aics for MockAics {
    fn gain_set(&self, gain: i8) -> Result<(), Error> {
        self.record(Call::GainSet(gain))
    }
    fn mute(&self) -> Result<(), Error> {
        self.record(Call::Mute)
    }
    fn unmute(&self) -> Result<(), Error> {
        self.record(Call::Unmute)
    }
    fn disable_mute(&self) -> Result<(), Error> {
        self.record(Call::DisableMute)
    }
    fn manual_gain_set(&self) -> Result<(), Error> {
        self.record(Call::ManualGain)
    }
    fn automatic_gain_set(&self) -> Result<(), Error> {
        self.record(Call::AutoGain)
    }
    fn gain_set_manual_only(&self) -> Result<(), Error> {
        self.record(Call::ManualGainOnly)
    }
    fn gain_set_auto_only(&self) -> Result<(), Error> {
        self.record(Call::AutoGainOnly)
    }
    fn description_set(&self, description: &CStr) -> Result<(), Error> {
        self.record(Call::DescriptionSet(description.to_owned()))
    }
    fn description_get(&self) -> Result<(), Error> {
        self.record(Call::DescriptionGet)
    }
    fn state_get(&self) -> Result<(), Error> {
        self.record(Call::StateGet)
    }
    fn gain_setting_get(&self) -> Result<(), Error> {
        self.record(Call::GainSettingGet)
    }
    fn type_get(&self) -> Result<(), Error> {
        self.record(Call::TypeGet)
    }
    fn status_get(&self) -> Result<(), Error> {
        self.record(Call::StatusGet)
    }
    fn client_conn(&self) -> Result<Arc<dyn Connection>, Error> {
        match self.conn {
            Some(ref conn) => Ok(conn.clone()),
            None => Err(Error::NotConnected),
        }
    }
}

struct Fixture {
    sink: Arc<TransportSink>,
    calls: Arc<Mutex<Vec<(usize, Call)>>>,
    client: Arc<AicsInstances>,
    server: Arc<AicsInstances>,
    aics: Arc<AicsTester>,
    tester: Tester,
}

impl Fixture {
    fn new() -> Self {
        let sink = Arc::new(TransportSink::default());
        let client = Arc::new(AicsInstances::default());
        let server = Arc::new(AicsInstances::default());
        let aics = Arc::new(AicsTester::new(sink.clone(), client.clone(), server.clone()));
        let tester = Tester::new(sink.clone());
        assert_eq!(aics.init(&tester, || Status::Success), Status::Success);

        Self { sink, calls: Default::default(), client, server, aics, tester }
    }

    fn instance(&self, id: usize, fail: bool, peer: Option<Address>) -> Arc<MockAics> {
        Arc::new(MockAics {
            id,
            calls: self.calls.clone(),
            fail,
            conn: peer.map(|address| Arc::new(MockConnection { address: Mutex::new(address) })),
        })
    }

    fn add_client(&self, id: usize, fail: bool) -> Arc<MockAics> {
        let aics = self.instance(id, fail, Some(PEER_1));
        self.client.push(aics.clone());
        aics
    }

    fn add_server(&self, id: usize, fail: bool) -> Arc<MockAics> {
        let aics = self.instance(id, fail, Some(PEER_2));
        self.server.push(aics.clone());
        aics
    }

    fn calls(&self) -> Vec<(usize, Call)> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn send_raw(&self, data: &[u8]) -> Vec<u8> {
        self.tester.handle_command(data);
        let mut sent = self.sink.take();
        assert_eq!(sent.len(), 1);
        sent.pop().unwrap()
    }

    fn send<T: CommandToBytes>(&self, cmd: &T) -> Vec<u8> {
        self.send_raw(&cmd.to_bytes())
    }
}

fn success<T: CommandOpCode>() -> Vec<u8> {
    Packet { service: ServiceId::AICS, opcode: T::OPCODE, index: T::INDEX, data: &[] }.to_bytes()
}

fn failed() -> Vec<u8> {
    vec![0x0a, 0x00, INDEX_DEFAULT, 0x01, 0x00, 0x01]
}

#[test]
fn init_registers_handlers_and_vcs() {
    let sink = Arc::new(TransportSink::default());
    let aics = Arc::new(AicsTester::new(
        sink.clone(),
        Arc::new(AicsInstances::default()),
        Arc::new(AicsInstances::default()),
    ));
    let tester = Tester::new(sink.clone());
    let vcs_initialized = AtomicBool::new(false);

    let status = aics.init(&tester, || {
        vcs_initialized.store(true, Ordering::Relaxed);
        Status::Failed
    });
    assert_eq!(status, Status::Failed);
    assert!(vcs_initialized.load(Ordering::Relaxed));
    assert!(tester.is_registered(ServiceId::AICS));
    assert_eq!(aics.unregister(), Status::Success);
    assert!(sink.take().is_empty());
}

#[test]
fn read_supported_commands() {
    let f = Fixture::new();
    assert_eq!(f.send(&ReadSupportedCommands {}), &[0x0a, 0x01, 0xff, 0x02, 0x00, 0xfe, 0xff][..]);
}

#[test]
fn any_address_targets_server_instances() {
    let f = Fixture::new();
    f.add_client(0, false);
    f.add_server(1, false);
    f.add_server(2, false);

    assert_eq!(f.send(&SetGain { address: Address::ANY, gain: -5 }), success::<SetGain>());
    assert_eq!(f.calls(), vec![(1, Call::GainSet(-5)), (2, Call::GainSet(-5))]);
}

#[test]
fn peer_address_targets_all_client_instances() {
    let f = Fixture::new();
    f.add_client(0, false);
    f.add_client(1, false);
    f.add_server(2, false);

    assert_eq!(f.send(&Mute { address: UNKNOWN_PEER }), success::<Mute>());
    assert_eq!(f.calls(), vec![(0, Call::Mute), (1, Call::Mute)]);

    assert_eq!(f.send(&Unmute { address: PEER_1 }), success::<Unmute>());
    assert_eq!(f.calls(), vec![(0, Call::Unmute), (1, Call::Unmute)]);
}

#[test]
fn routed_commands() {
    let f = Fixture::new();
    f.add_client(0, false);
    f.add_server(1, false);

    assert_eq!(
        f.send(&GainSettingProperties { address: PEER_1 }),
        success::<GainSettingProperties>()
    );
    assert_eq!(f.send(&ManualGain { address: PEER_1 }), success::<ManualGain>());
    assert_eq!(f.send(&AutoGain { address: PEER_1 }), success::<AutoGain>());
    assert_eq!(f.send(&Description { address: PEER_1 }), success::<Description>());
    assert_eq!(f.send(&InputType { address: PEER_1 }), success::<InputType>());
    assert_eq!(f.send(&InputStatus { address: PEER_1 }), success::<InputStatus>());
    assert_eq!(f.send(&State { address: PEER_1 }), success::<State>());
    assert_eq!(
        f.calls(),
        vec![
            (0, Call::GainSettingGet),
            (0, Call::ManualGain),
            (0, Call::AutoGain),
            (0, Call::DescriptionGet),
            (0, Call::TypeGet),
            (0, Call::StatusGet),
            (0, Call::StateGet),
        ]
    );

    assert_eq!(f.send(&State { address: Address::ANY }), success::<State>());
    assert_eq!(f.send(&AutoGain { address: Address::ANY }), success::<AutoGain>());
    assert_eq!(f.calls(), vec![(1, Call::StateGet), (1, Call::AutoGain)]);
}

#[test]
fn unaddressed_commands_target_server_instances() {
    let f = Fixture::new();
    f.add_client(0, false);
    f.add_server(1, false);

    assert_eq!(f.send(&MuteDisable {}), success::<MuteDisable>());
    assert_eq!(f.send(&ManualGainOnly {}), success::<ManualGainOnly>());
    assert_eq!(f.send(&AutoGainOnly {}), success::<AutoGainOnly>());
    assert_eq!(
        f.calls(),
        vec![(1, Call::DisableMute), (1, Call::ManualGainOnly), (1, Call::AutoGainOnly)]
    );
}

#[test]
fn fan_out_stops_at_first_failure() {
    let f = Fixture::new();
    f.add_client(0, false);
    f.add_client(1, true);
    f.add_client(2, false);

    assert_eq!(f.send(&SetGain { address: PEER_1, gain: 10 }), failed());
    assert_eq!(f.calls(), vec![(0, Call::GainSet(10)), (1, Call::GainSet(10))]);
}

#[test]
fn fan_out_failure_on_first_instance() {
    let f = Fixture::new();
    f.add_server(0, true);
    f.add_server(1, false);

    assert_eq!(f.send(&MuteDisable {}), failed());
    assert_eq!(f.calls(), vec![(0, Call::DisableMute)]);
}

#[test]
fn empty_registry_succeeds() {
    let f = Fixture::new();
    assert_eq!(f.send(&State { address: PEER_1 }), success::<State>());
    assert_eq!(f.send(&State { address: Address::ANY }), success::<State>());
    assert!(f.calls().is_empty());
}

#[test]
fn registry_populated_after_init() {
    let f = Fixture::new();
    f.server.set(vec![f.instance(4, false, None) as Arc<dyn Aics>, f.instance(5, false, None)]);
    assert_eq!(f.server.len(), 2);

    assert_eq!(f.send(&Mute { address: Address::ANY }), success::<Mute>());
    assert_eq!(f.calls(), vec![(4, Call::Mute), (5, Call::Mute)]);

    f.server.clear();
    assert!(f.server.is_empty());
    assert_eq!(f.send(&Mute { address: Address::ANY }), success::<Mute>());
    assert!(f.calls().is_empty());
}

#[test]
fn fixed_length_mismatch() {
    let f = Fixture::new();
    f.add_client(0, false);
    f.add_server(1, false);

    // Set Gain without the gain parameter
    let dump = [0x0a, 0x02, 0x00, 0x07, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0xc6];
    assert_eq!(f.send_raw(&dump), failed());
    // Mute Disable with a parameter
    assert_eq!(f.send_raw(&[0x0a, 0x06, 0x00, 0x01, 0x00, 0x00]), failed());
    assert!(f.calls().is_empty());
}

#[test]
fn set_description() {
    let f = Fixture::new();
    f.add_client(0, false);
    f.add_server(1, false);

    let cmd = SetDescription { address: PEER_1, description: b"0123456789abcde".to_vec() };
    assert_eq!(f.send(&cmd), success::<SetDescription>());

    let cmd = SetDescription { address: Address::ANY, description: b"Mic".to_vec() };
    assert_eq!(f.send(&cmd), success::<SetDescription>());

    let cmd = SetDescription { address: Address::ANY, description: vec![] };
    assert_eq!(f.send(&cmd), success::<SetDescription>());

    assert_eq!(
        f.calls(),
        vec![
            (1, Call::DescriptionSet(CString::new("0123456789abcde").unwrap())),
            (1, Call::DescriptionSet(CString::new("Mic").unwrap())),
            (1, Call::DescriptionSet(CString::default())),
        ]
    );
}

#[test]
fn set_description_with_nul() {
    let f = Fixture::new();
    f.add_server(0, false);

    let cmd = SetDescription { address: Address::ANY, description: b"ab\0cd".to_vec() };
    assert_eq!(f.send(&cmd), success::<SetDescription>());
    assert_eq!(f.calls(), vec![(0, Call::DescriptionSet(CString::new("ab").unwrap()))]);
}

#[test]
fn set_description_too_long() {
    let f = Fixture::new();
    f.add_server(0, false);

    let description = vec![b'a'; MAX_DESCRIPTION_SIZE];
    let cmd = SetDescription { address: Address::ANY, description };
    assert_eq!(f.send(&cmd), failed());
    assert!(f.calls().is_empty());
}

#[test]
fn set_description_length_mismatch() {
    let f = Fixture::new();
    f.add_server(0, false);

    // Declared description length of 5, with 4 octets given
    let dump = [
        0x0a, 0x0b, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x4d, 0x69,
        0x63, 0x31,
    ];
    assert_eq!(f.send_raw(&dump), failed());

    // Declared description length of 3, with 4 octets given
    let dump = [
        0x0a, 0x0b, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x4d, 0x69,
        0x63, 0x31,
    ];
    assert_eq!(f.send_raw(&dump), failed());

    // Shorter than the fixed part
    let dump = [0x0a, 0x0b, 0x00, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(f.send_raw(&dump), failed());

    assert!(f.calls().is_empty());
}

#[test]
fn state_callback() {
    let f = Fixture::new();
    let inst = f.add_client(0, false);

    f.aics.state(&*inst, Ok(()), -3, 1, 2);

    let sent = f.sink.take();
    assert_eq!(sent.len(), 1);
    let Ok(Event::State(e)) = Event::from_bytes(&sent[0]) else { panic!() };
    assert_eq!(e, StateEvent { address: PEER_1, gain: -3, mute: 1, mode: 2 });
}

#[test]
fn gain_setting_and_input_type_callbacks() {
    let f = Fixture::new();
    let inst = f.add_server(0, false);

    f.aics.gain_setting(&*inst, Ok(()), 1, -128, 127);
    f.aics.input_type(&*inst, Ok(()), 0x05);

    assert_eq!(
        f.sink.take(),
        vec![
            GainSettingPropertiesEvent { address: PEER_2, units: 1, minimum: -128, maximum: 127 }
                .to_bytes(),
            InputTypeEvent { address: PEER_2, input_type: 0x05 }.to_bytes(),
        ]
    );
}

#[test]
fn callback_error_still_reported() {
    let f = Fixture::new();
    let inst = f.add_client(0, false);

    f.aics.status(&*inst, Err(Error::Busy), true);
    f.aics.state(&*inst, Err(Error::Errno(-5)), 0, 0, 0);

    assert_eq!(
        f.sink.take(),
        vec![
            StatusEvent { address: PEER_1, active: true }.to_bytes(),
            StateEvent { address: PEER_1, gain: 0, mute: 0, mode: 0 }.to_bytes(),
        ]
    );
}

#[test]
fn callback_address_resolved_at_emission() {
    let f = Fixture::new();
    let inst = f.add_client(0, false);

    assert_eq!(f.send(&InputStatus { address: UNKNOWN_PEER }), success::<InputStatus>());
    f.aics.status(&*inst, Ok(()), false);

    inst.set_peer_address(PEER_2);
    f.aics.status(&*inst, Ok(()), true);

    assert_eq!(
        f.sink.take(),
        vec![
            StatusEvent { address: PEER_1, active: false }.to_bytes(),
            StatusEvent { address: PEER_2, active: true }.to_bytes(),
        ]
    );
}

#[test]
fn callback_without_connection() {
    let f = Fixture::new();
    let inst = f.instance(0, false, None);

    f.aics.state(&*inst, Ok(()), 0, 0, 0);
    f.aics.description(&*inst, Ok(()), c"Mic");
    assert!(f.sink.take().is_empty());
}

#[test]
fn description_callback() {
    let f = Fixture::new();
    let inst = f.add_client(0, false);

    f.aics.description(&*inst, Ok(()), c"Line In");
    f.aics.description(&*inst, Ok(()), c"");

    let sent = f.sink.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        &[
            0x0a, 0x84, 0x00, 0x0f, 0x00, 0x01, 0x01, 0x02, 0x03, 0x04, 0x05, 0xc6, 0x07, 0x4c,
            0x69, 0x6e, 0x65, 0x20, 0x49, 0x6e
        ][..]
    );
    let Ok(Event::Description(e)) = Event::from_bytes(&sent[1]) else { panic!() };
    assert!(e.description.is_empty());
}

#[test]
fn description_callback_truncated() {
    let f = Fixture::new();
    let inst = f.add_client(0, false);
    let description = CString::new(vec![b'x'; 300]).unwrap();

    f.aics.description(&*inst, Ok(()), &description);

    let sent = f.sink.take();
    let Ok(Event::Description(e)) = Event::from_bytes(&sent[0]) else { panic!() };
    assert_eq!(e.description, vec![b'x'; 255]);
}

#[test]
fn concurrent_description_callbacks() {
    let f = Arc::new(Fixture::new());
    let inst_1 = f.add_client(0, false);
    let inst_2 = f.add_server(1, false);

    let expected = [
        DescriptionEvent { address: PEER_1, description: b"First input".to_vec() }.to_bytes(),
        DescriptionEvent { address: PEER_2, description: b"2nd".to_vec() }.to_bytes(),
    ];

    let threads: Vec<_> = [(inst_1, c"First input"), (inst_2, c"2nd")]
        .into_iter()
        .map(|(inst, description)| {
            let f = f.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    f.aics.description(&*inst, Ok(()), description);
                }
            })
        })
        .collect();
    for t in threads {
        t.join().expect("End of callback thread");
    }

    let sent = f.sink.take();
    assert_eq!(sent.len(), 400);
    assert_eq!(sent.iter().filter(|e| **e == expected[0]).count(), 200);
    assert_eq!(sent.iter().filter(|e| **e == expected[1]).count(), 200);
}
