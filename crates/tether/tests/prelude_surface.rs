//! The facade exposes the full signal/slot surface through its prelude.

use std::cell::RefCell;
use std::rc::Rc;

use tether::prelude::*;

#[derive(Default)]
struct Thermostat {
    readings: Vec<f32>,
}

impl Thermostat {
    fn on_reading(&mut self, celsius: f32) {
        self.readings.push(celsius);
    }
}

#[test]
fn bound_method_through_prelude() {
    let thermostat = Rc::new(RefCell::new(Thermostat::default()));
    let sensor: Signal<f32> = Signal::new();
    let slot = Slot::from_method_mut(&thermostat, Thermostat::on_reading);

    let key = sensor.connect(&slot);
    sensor.emit(21.5);
    sensor.emit(22.0);
    assert_eq!(thermostat.borrow().readings, vec![21.5_f32, 22.0]);

    assert_eq!(sensor.try_disconnect(key), Ok(()));
    assert_eq!(
        sensor.try_disconnect(key),
        Err(SignalError::UnknownKey(key))
    );
}

#[test]
fn signal_drop_leaves_slot_reusable() {
    let hits = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&hits);
    let slot = Slot::new(move |()| *sink.borrow_mut() += 1);

    {
        let first: Signal<()> = Signal::new();
        first.connect(&slot);
        first.emit(());
    }
    assert!(!slot.is_connected());
    assert_eq!(slot.key(), SlotKey::NONE);

    let second: Signal<()> = Signal::new();
    second.connect(&slot);
    second.emit(());
    assert_eq!(*hits.borrow(), 2);
}
