mod common;

use binclock_firmware::drivers::Heartbeat;
use binclock_firmware::{ClockTime, SharedClock};
use common::NullPin;
use embedded_hal_mock::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

fn tick(clock: &SharedClock, heartbeat: &mut Heartbeat<NullPin>, n: u32) -> u32 {
    (0..n).filter(|_| clock.on_tick(heartbeat)).count() as u32
}

#[test]
fn a_full_day_of_ticks_returns_to_midnight() {
    let clock = SharedClock::new(None);
    let mut heartbeat = Heartbeat::new(NullPin);

    assert_eq!(tick(&clock, &mut heartbeat, 86_400), 0);
    assert_eq!(clock.now(), ClockTime::MIDNIGHT);
    assert!(!heartbeat.is_lit());
}

#[test]
fn last_second_of_the_day_cascades_to_midnight() {
    let clock = SharedClock::new(None);
    let mut heartbeat = Heartbeat::new(NullPin);
    clock.set(ClockTime::new(23, 59, 59));

    clock.on_tick(&mut heartbeat);
    assert_eq!(clock.now(), ClockTime::MIDNIGHT);
}

#[test]
fn minute_rollover_carries_into_hours() {
    let clock = SharedClock::new(None);
    let mut heartbeat = Heartbeat::new(NullPin);
    clock.set(ClockTime::new(4, 59, 59));

    clock.on_tick(&mut heartbeat);
    assert_eq!(clock.now(), ClockTime::new(5, 0, 0));
}

#[test]
fn drift_correction_fires_once_per_calibration_period() {
    let clock = SharedClock::new(Some(100));
    let mut heartbeat = Heartbeat::new(NullPin);

    assert_eq!(tick(&clock, &mut heartbeat, 99), 0);
    assert_eq!(clock.drift_ticks(), 99);

    assert_eq!(tick(&clock, &mut heartbeat, 1), 1);
    assert_eq!(clock.drift_ticks(), 0);
    // 100 ticks, one retired
    assert_eq!(clock.now(), ClockTime::new(0, 1, 39));

    assert_eq!(tick(&clock, &mut heartbeat, 900), 9);
    assert_eq!(clock.now(), ClockTime::new(0, 16, 30));
}

#[test]
fn drift_correction_never_takes_seconds_below_zero() {
    let clock = SharedClock::new(Some(1));
    let mut heartbeat = Heartbeat::new(NullPin);

    assert_eq!(tick(&clock, &mut heartbeat, 5), 5);
    assert_eq!(clock.now(), ClockTime::MIDNIGHT);
}

#[test]
fn manual_adjustments_do_not_cascade() {
    let clock = SharedClock::new(None);

    clock.set(ClockTime::new(10, 59, 12));
    clock.increment_minutes();
    assert_eq!(clock.now(), ClockTime::new(10, 0, 12));

    clock.set(ClockTime::new(23, 30, 0));
    clock.increment_hours();
    assert_eq!(clock.now(), ClockTime::new(0, 30, 0));
}

#[test]
fn reset_zeroes_time_but_keeps_drift_count() {
    let clock = SharedClock::new(Some(10));
    let mut heartbeat = Heartbeat::new(NullPin);
    clock.set(ClockTime::new(17, 42, 3));

    tick(&clock, &mut heartbeat, 3);
    clock.reset();

    assert_eq!(clock.now(), ClockTime::MIDNIGHT);
    assert_eq!(clock.drift_ticks(), 3);
}

#[test]
fn heartbeat_toggles_once_per_tick() {
    let expectations = [
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];
    let mut pin = PinMock::new(&expectations);
    let clock = SharedClock::new(None);
    let mut heartbeat = Heartbeat::new(pin.clone());

    for _ in 0..3 {
        clock.on_tick(&mut heartbeat);
    }

    assert!(heartbeat.is_lit());
    pin.done();
}
