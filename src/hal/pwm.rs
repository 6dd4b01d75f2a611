//! Brightness PWM on Timer/Counter1
//!
//! 8-bit fast PWM, prescaler 8 (about 7.8 kHz at 16 MHz). OC1A (PB5) drives
//! the hours anodes, OC1B (PB6) the minutes anodes. A disabled channel is
//! disconnected from the timer and falls back to its PORTB level, which is
//! kept low.

use avr_device::atmega128a::{PORTB, TC1};
use embedded_hal::PwmPin;

use super::gpio::{Output, Pin};

const WGM10: u8 = 1 << 0; // TCCR1A
const WGM12: u8 = 1 << 3; // TCCR1B
const CS11: u8 = 1 << 1; // TCCR1B, clk/8

/// PWM channel configuration
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PwmChannel {
    Timer1A,
    Timer1B,
}

impl PwmChannel {
    fn com_bit(self) -> u8 {
        match self {
            PwmChannel::Timer1A => 1 << 7, // COM1A1
            PwmChannel::Timer1B => 1 << 5, // COM1B1
        }
    }

    fn pin_bit(self) -> u8 {
        match self {
            PwmChannel::Timer1A => 5,
            PwmChannel::Timer1B => 6,
        }
    }
}

/// Timer/Counter1 set up for brightness control.
pub struct Pwm1 {
    _private: (),
}

impl Pwm1 {
    pub fn new() -> Self {
        unsafe {
            let p = &*TC1::ptr();
            p.tccr1a.write(|w| w.bits(WGM10));
            p.tccr1b.write(|w| w.bits(WGM12 | CS11));
            p.ocr1a.write(|w| w.bits(0));
            p.ocr1b.write(|w| w.bits(0));
        }
        Self { _private: () }
    }

    /// Hours (OC1A) and minutes (OC1B) channels, both disabled.
    pub fn split(self) -> (Pwm1Pin, Pwm1Pin) {
        (
            Pwm1Pin::new(PwmChannel::Timer1A),
            Pwm1Pin::new(PwmChannel::Timer1B),
        )
    }
}

impl Default for Pwm1 {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Pwm1Pin {
    channel: PwmChannel,
    _pin: Pin<PORTB, Output>,
}

impl Pwm1Pin {
    fn new(channel: PwmChannel) -> Self {
        Self {
            channel,
            _pin: Pin::output(channel.pin_bit()),
        }
    }
}

impl PwmPin for Pwm1Pin {
    type Duty = u8;

    fn disable(&mut self) {
        let com = self.channel.com_bit();
        unsafe {
            (*TC1::ptr())
                .tccr1a
                .modify(|r, w| w.bits(r.bits() & !com));
        }
    }

    fn enable(&mut self) {
        let com = self.channel.com_bit();
        unsafe {
            (*TC1::ptr())
                .tccr1a
                .modify(|r, w| w.bits(r.bits() | com));
        }
    }

    fn get_duty(&self) -> u8 {
        unsafe {
            let p = &*TC1::ptr();
            let raw = match self.channel {
                PwmChannel::Timer1A => p.ocr1a.read().bits(),
                PwmChannel::Timer1B => p.ocr1b.read().bits(),
            };
            raw as u8
        }
    }

    fn get_max_duty(&self) -> u8 {
        u8::MAX
    }

    fn set_duty(&mut self, duty: u8) {
        unsafe {
            let p = &*TC1::ptr();
            match self.channel {
                PwmChannel::Timer1A => p.ocr1a.write(|w| w.bits(duty as u16)),
                PwmChannel::Timer1B => p.ocr1b.write(|w| w.bits(duty as u16)),
            }
        }
    }
}
