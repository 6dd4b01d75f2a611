#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use binclock_firmware::drivers::OutputGroup;
use binclock_firmware::{Halt, SleepMode};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use embedded_hal::PwmPin;

/// Push button with a steady level plus an optional script of raw reads
/// that are consumed first (to model bounce or a release after N reads).
#[derive(Clone, Default)]
pub struct FakeButton {
    held: Rc<Cell<bool>>,
    script: Rc<RefCell<VecDeque<bool>>>,
}

impl FakeButton {
    pub fn press(&self) {
        self.held.set(true);
    }

    pub fn release(&self) {
        self.held.set(false);
    }

    /// Raw levels (true = pressed) returned by the next reads.
    pub fn queue(&self, levels: &[bool]) {
        self.script.borrow_mut().extend(levels.iter().copied());
    }

    pub fn pending_reads(&self) -> usize {
        self.script.borrow().len()
    }

    fn pressed(&self) -> bool {
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.held.get())
    }
}

impl InputPin for FakeButton {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(!self.pressed())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(self.pressed())
    }
}

#[derive(Default)]
pub struct PortState {
    pub value: u8,
    pub writes: usize,
}

/// Output group that applies masked writes to an in-memory port.
#[derive(Clone, Default)]
pub struct FakePort {
    pub state: Rc<RefCell<PortState>>,
}

impl FakePort {
    pub fn with_value(value: u8) -> Self {
        let port = Self::default();
        port.state.borrow_mut().value = value;
        port
    }

    pub fn value(&self) -> u8 {
        self.state.borrow().value
    }

    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }
}

impl OutputGroup for FakePort {
    fn write_masked(&mut self, mask: u8, bits: u8) {
        let mut state = self.state.borrow_mut();
        state.value = (state.value & !mask) | (bits & mask);
        state.writes += 1;
    }
}

#[derive(Default)]
pub struct PwmState {
    pub enabled: bool,
    pub duty: u8,
}

#[derive(Clone, Default)]
pub struct FakePwm {
    pub state: Rc<RefCell<PwmState>>,
}

impl FakePwm {
    pub fn enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn duty(&self) -> u8 {
        self.state.borrow().duty
    }
}

impl PwmPin for FakePwm {
    type Duty = u8;

    fn disable(&mut self) {
        self.state.borrow_mut().enabled = false;
    }

    fn enable(&mut self) {
        self.state.borrow_mut().enabled = true;
    }

    fn get_duty(&self) -> u8 {
        self.state.borrow().duty
    }

    fn get_max_duty(&self) -> u8 {
        u8::MAX
    }

    fn set_duty(&mut self, duty: u8) {
        self.state.borrow_mut().duty = duty;
    }
}

/// Records every halt request instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingHalt {
    pub modes: Rc<RefCell<Vec<SleepMode>>>,
}

impl RecordingHalt {
    pub fn last(&self) -> Option<SleepMode> {
        self.modes.borrow().last().copied()
    }
}

impl Halt for RecordingHalt {
    fn halt(&mut self, mode: SleepMode) {
        self.modes.borrow_mut().push(mode);
    }
}

pub struct NullPin;

impl OutputPin for NullPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
