//! Tick-driven time keeping shared between the tick interrupt and the main loop

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::digital::v2::OutputPin;

use super::ClockTime;
use crate::drivers::Heartbeat;

/// Raw counters as the tick handler sees them.
///
/// `seconds` may briefly read 60 between counting and carrying inside
/// [`SharedClock::on_tick`]; it never leaves the critical section that way.
#[derive(Clone, Copy, Debug, Default)]
struct ClockState {
    seconds: u8,
    minutes: u8,
    hours: u8,
    drift: u32,
}

impl ClockState {
    const ZERO: Self = Self {
        seconds: 0,
        minutes: 0,
        hours: 0,
        drift: 0,
    };

    fn from_time(time: ClockTime, drift: u32) -> Self {
        Self {
            seconds: time.seconds(),
            minutes: time.minutes(),
            hours: time.hours(),
            drift,
        }
    }

    fn time(&self) -> ClockTime {
        ClockTime::new(self.hours, self.minutes, self.seconds)
    }

    /// Counts one tick and retires a second when the calibration period is up.
    fn count_second(&mut self, calibration: Option<u32>) -> bool {
        self.seconds += 1;
        self.drift = self.drift.saturating_add(1);

        match calibration {
            Some(threshold) if self.drift >= threshold && self.seconds >= 1 => {
                self.seconds -= 1;
                self.drift = 0;
                true
            }
            _ => false,
        }
    }

    fn carry(&mut self) {
        if self.seconds >= 60 {
            self.seconds = 0;
            self.minutes += 1;

            if self.minutes >= 60 {
                self.minutes = 0;
                self.hours = (self.hours + 1) % 24;
            }
        }
    }
}

/// Clock state owned by the whole program.
///
/// The tick interrupt is the only asynchronous writer. Every access from the
/// main loop goes through a critical section so a multi-field read or update
/// can never interleave with a tick.
pub struct SharedClock {
    state: Mutex<Cell<ClockState>>,
    calibration: Option<u32>,
}

impl SharedClock {
    /// `calibration` is the number of ticks between drift corrections, or
    /// `None` to run uncompensated.
    pub const fn new(calibration: Option<u32>) -> Self {
        Self {
            state: Mutex::new(Cell::new(ClockState::ZERO)),
            calibration,
        }
    }

    /// Tick handler body. Call once per timing-reference tick.
    ///
    /// Returns `true` when this tick retired a second for drift compensation.
    pub fn on_tick<P: OutputPin>(&self, heartbeat: &mut Heartbeat<P>) -> bool {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();

            let corrected = state.count_second(self.calibration);
            heartbeat.toggle();
            state.carry();

            cell.set(state);
            corrected
        })
    }

    /// Consistent snapshot of the time of day.
    pub fn now(&self) -> ClockTime {
        critical_section::with(|cs| self.state.borrow(cs).get().time())
    }

    pub fn increment_hours(&self) {
        self.update(ClockTime::increment_hours);
    }

    pub fn increment_minutes(&self) {
        self.update(ClockTime::increment_minutes);
    }

    /// Zeroes the time of day. The drift accumulator keeps counting.
    pub fn reset(&self) {
        self.update(ClockTime::reset);
    }

    pub fn set(&self, time: ClockTime) {
        self.update(|t| *t = time);
    }

    /// Ticks counted since the last drift correction.
    pub fn drift_ticks(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow(cs).get().drift)
    }

    fn update<F: FnOnce(&mut ClockTime)>(&self, f: F) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let state = cell.get();
            let mut time = state.time();
            f(&mut time);
            cell.set(ClockState::from_time(time, state.drift));
        });
    }
}
