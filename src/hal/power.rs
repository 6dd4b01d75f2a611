use avr_device::atmega128a::{CPU, EXINT, PORTE};

use super::gpio::board::BUTTON_MASK;
use super::gpio::Port;
use crate::power::{Halt, SleepMode};

// MCUCR
const SE: u8 = 1 << 5;
const SM_MASK: u8 = 0x1C; // SM1 SM0 SM2
const SM_IDLE: u8 = 0x00;
const SM_POWER_SAVE: u8 = 0x18;

/// Halt-until-interrupt on the ATmega128 sleep controller.
pub struct Sleep {
    _private: (),
}

impl Sleep {
    pub fn new() -> Self {
        unsafe {
            // INT4..INT6 low-level triggered; the only sense mode that can
            // wake INT7:4 from power-save.
            (*EXINT::ptr()).eicrb.modify(|r, w| w.bits(r.bits() & !0x3F));
        }
        Self { _private: () }
    }

    #[inline]
    fn set_sleep_mode(&mut self, bits: u8) {
        unsafe {
            let p = CPU::ptr();
            (*p).mcucr
                .modify(|r, w| w.bits((r.bits() & !SM_MASK) | bits));
        }
    }

    #[inline]
    fn enable_sleep(&mut self) {
        unsafe {
            let p = CPU::ptr();
            (*p).mcucr.modify(|r, w| w.bits(r.bits() | SE));
        }
    }

    #[inline]
    fn disable_sleep(&mut self) {
        unsafe {
            let p = CPU::ptr();
            (*p).mcucr.modify(|r, w| w.bits(r.bits() & !SE));
        }
    }

    /// Lets a button press end power-save. The INTn handlers disarm it again.
    fn arm_button_wake(&mut self) {
        unsafe {
            let p = EXINT::ptr();
            (*p).eifr.write(|w| w.bits(BUTTON_MASK));
            (*p).eimsk.modify(|r, w| w.bits(r.bits() | BUTTON_MASK));
        }
    }
}

impl Default for Sleep {
    fn default() -> Self {
        Self::new()
    }
}

/// Called from the INT4..INT6 handlers. A level interrupt keeps firing while
/// the button is held, so it has to be masked on the first one.
pub fn disarm_button_wake() {
    unsafe {
        let p = EXINT::ptr();
        (*p).eimsk.modify(|r, w| w.bits(r.bits() & !BUTTON_MASK));
    }
}

impl Halt for Sleep {
    fn halt(&mut self, mode: SleepMode) {
        // A press between the level check and the sleep instruction would
        // be consumed by INTn while still awake, so both run masked.
        avr_device::interrupt::disable();

        // A held button would retrigger its level interrupt at once. Stay in
        // idle so the frame timer keeps pacing the loop until it is released.
        let held = PORTE::read_pins() & BUTTON_MASK != BUTTON_MASK;

        let bits = match mode {
            SleepMode::PowerSave if !held => {
                self.arm_button_wake();
                SM_POWER_SAVE
            }
            _ => SM_IDLE,
        };

        self.set_sleep_mode(bits);
        self.enable_sleep();

        // SEI takes effect after the next instruction, so a pending
        // interrupt wakes the sleep rather than running before it.
        unsafe { avr_device::interrupt::enable() };
        avr_device::asm::sleep();
        self.disable_sleep();
    }
}
