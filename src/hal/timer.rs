use avr_device::atmega128a::{TC0, TC2, TC3};
use embedded_hal::blocking::delay::DelayMs;

use crate::config::{CPU_FREQ_HZ, TICK_PRESCALER, TICK_XTAL_HZ};

// TIMSK
const TOIE0: u8 = 1 << 0;
const OCIE2: u8 = 1 << 7;

// ASSR
const AS0: u8 = 1 << 3;
const ASSR_BUSY: u8 = 0x07; // TCN0UB | OCR0UB | TCR0UB

/// Timer/Counter0 clock select. Timer0 has its own table, with /32 and /128.
#[derive(Clone, Copy)]
pub enum Prescaler0 {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div32 = 3,
    Div64 = 4,
    Div128 = 5,
    Div256 = 6,
    Div1024 = 7,
}

/// Timer/Counter2 clock select.
#[derive(Clone, Copy)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

/// Clock tick source: Timer/Counter0 running asynchronously from the watch
/// crystal on TOSC1/TOSC2. Overflows (TIMER0_OVF) once per second and keeps
/// counting in power-save.
pub struct TickTimer {
    _private: (),
}

impl TickTimer {
    pub fn start() -> Self {
        const _: () = assert!(TICK_XTAL_HZ / TICK_PRESCALER / 256 == 1);

        unsafe {
            let p = &*TC0::ptr();
            p.timsk.modify(|r, w| w.bits(r.bits() & !TOIE0));

            p.assr.write(|w| w.bits(AS0));
            p.tcnt0.write(|w| w.bits(0));
            p.tccr0.write(|w| w.bits(Prescaler0::Div128 as u8));

            // Asynchronous registers update two crystal cycles later.
            while p.assr.read().bits() & ASSR_BUSY != 0 {}

            p.tifr.write(|w| w.bits(TOIE0));
            p.timsk.modify(|r, w| w.bits(r.bits() | TOIE0));
        }
        Self { _private: () }
    }
}

/// Frame pacing: Timer/Counter2 in CTC mode raising TIMER2_COMP every
/// `period_ms`, so an idle halt ends at a steady rate. Clocked from the CPU,
/// so it stops in power-save.
pub struct FrameTimer {
    _private: (),
}

impl FrameTimer {
    pub fn start(period_ms: u16) -> Self {
        const WGM21: u8 = 1 << 3;
        let counts = (CPU_FREQ_HZ / 1024 * period_ms as u32 / 1000).clamp(1, 256);

        unsafe {
            let p = &*TC2::ptr();
            p.tcnt2.write(|w| w.bits(0));
            p.ocr2.write(|w| w.bits((counts - 1) as u8));
            p.tccr2.write(|w| w.bits(WGM21 | Prescaler::Div1024 as u8));
            p.timsk.modify(|r, w| w.bits(r.bits() | OCIE2));
        }
        Self { _private: () }
    }
}

/// Blocking millisecond delay on Timer/Counter3.
pub struct Delay {
    _private: (),
}

impl Delay {
    // 16MHz/64 = 250kHz, 250 counts = 1ms
    const COUNTS_PER_MS: u16 = (CPU_FREQ_HZ / 64 / 1000) as u16;

    pub fn new() -> Self {
        unsafe {
            let p = &*TC3::ptr();
            p.tccr3a.write(|w| w.bits(0));
            p.tccr3b.write(|w| w.bits(Prescaler::Stop as u8));
        }
        Self { _private: () }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        unsafe {
            let p = &*TC3::ptr();
            p.tccr3b.write(|w| w.bits(Prescaler::Div64 as u8));

            for _ in 0..ms {
                p.tcnt3.write(|w| w.bits(0));
                while p.tcnt3.read().bits() < Self::COUNTS_PER_MS {}
            }

            p.tccr3b.write(|w| w.bits(Prescaler::Stop as u8));
        }
    }
}

impl DelayMs<u8> for Delay {
    fn delay_ms(&mut self, ms: u8) {
        DelayMs::<u16>::delay_ms(self, ms as u16);
    }
}
