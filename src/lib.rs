//! Binary LED wall clock firmware for the ATmega128.
//!
//! Hours and minutes are shown in binary on two LED groups. A 32.768 kHz
//! watch crystal ticks the clock once per second; three buttons adjust the
//! time, reset it, and put the clock to sleep.
//!
//! Everything in this crate except [`hal`] is target independent and is
//! exercised on the host through `embedded-hal` mocks.

#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod clock;
pub mod config;
pub mod drivers;
pub mod power;
pub mod testing;

#[cfg(target_arch = "avr")]
pub mod hal;

pub use application::Application;
pub use clock::{ClockTime, SharedClock};
pub use power::{Halt, PowerController, PowerMode, SleepMode};
