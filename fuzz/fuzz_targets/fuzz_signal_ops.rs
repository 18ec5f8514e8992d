#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tether_core::{Signal, Slot, SlotKey};

const SLOTS: usize = 4;

#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Connect { sig: bool, slot: u8 },
    ConnectOwned { sig: bool },
    ConnectOwnedSlot { sig: bool, slot: u8 },
    DisconnectKey { sig: bool, raw: u8 },
    DisconnectSlot { sig: bool, slot: u8 },
    SlotDisconnect { slot: u8 },
    TakeSlot { slot: u8 },
    DropSlot { slot: u8 },
    Clear { sig: bool },
    Emit { sig: bool },
    Take { from: bool },
}

fuzz_target!(|ops: Vec<FuzzOp>| {
    let hits = Rc::new(Cell::new(0u64));
    let make = |hits: &Rc<Cell<u64>>| {
        let hits = Rc::clone(hits);
        Slot::new(move |()| hits.set(hits.get() + 1))
    };

    let mut signals = [Signal::<()>::new(), Signal::<()>::new()];
    let mut slots: Vec<Slot<()>> = (0..SLOTS).map(|_| make(&hits)).collect();

    for op in ops.into_iter().take(512) {
        match op {
            FuzzOp::Connect { sig, slot } => {
                let slot = &slots[usize::from(slot) % SLOTS];
                let key = signals[usize::from(sig)].connect(slot);
                assert!(key.is_some());
                assert_eq!(slot.key(), key);
            }
            FuzzOp::ConnectOwned { sig } => {
                let key = signals[usize::from(sig)].connect_owned(make(&hits));
                assert!(signals[usize::from(sig)].owns(key));
            }
            FuzzOp::ConnectOwnedSlot { sig, slot } => {
                let sig = usize::from(sig);
                let index = usize::from(slot) % SLOTS;
                let prior = slots[index].is_connected_to(&signals[sig]).then(|| slots[index].key());
                let given = std::mem::replace(&mut slots[index], make(&hits));
                let key = signals[sig].connect_owned(given);
                assert!(signals[sig].owns(key));
                if let Some(prior) = prior {
                    assert_eq!(key, prior);
                }
            }
            FuzzOp::DisconnectKey { sig, raw } => {
                signals[usize::from(sig)].disconnect(SlotKey::new(u64::from(raw)));
            }
            FuzzOp::DisconnectSlot { sig, slot } => {
                signals[usize::from(sig)].disconnect_slot(&slots[usize::from(slot) % SLOTS]);
            }
            FuzzOp::SlotDisconnect { slot } => {
                slots[usize::from(slot) % SLOTS].disconnect();
            }
            FuzzOp::TakeSlot { slot } => {
                let index = usize::from(slot) % SLOTS;
                let moved = slots[index].take();
                slots[index] = moved;
            }
            FuzzOp::DropSlot { slot } => {
                slots[usize::from(slot) % SLOTS] = make(&hits);
            }
            FuzzOp::Clear { sig } => signals[usize::from(sig)].clear(),
            FuzzOp::Emit { sig } => {
                let before = hits.get();
                let expected = signals[usize::from(sig)].len() as u64;
                signals[usize::from(sig)].emit(());
                assert_eq!(hits.get() - before, expected);
            }
            FuzzOp::Take { from } => {
                let from = usize::from(from);
                let moved = signals[from].take();
                signals[1 - from] = moved;
                assert!(signals[from].is_empty());
            }
        }

        for slot in &slots {
            let owners = signals.iter().filter(|s| slot.is_connected_to(s)).count();
            assert_eq!(owners, usize::from(slot.is_connected()));
        }
    }
});
