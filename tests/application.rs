mod common;

use binclock_firmware::config::{COMBO_HOLD_ITERATIONS, PWM_BRIGHTNESS};
use binclock_firmware::drivers::{
    Brightness, ButtonHandler, DisplayLayout, Independent, Intent, LedDisplay, Polarity,
};
use binclock_firmware::{Application, ClockTime, PowerController, PowerMode, SharedClock, SleepMode};
use common::{FakeButton, FakePort, FakePwm, RecordingHalt};
use embedded_hal_mock::delay::MockNoop;

const LAYOUT: DisplayLayout = DisplayLayout {
    hour_lines: [0, 1, 5, 6, 7],
    minute_lines: [0, 1, 2, 3, 4, 5],
};

type App<'a> =
    Application<'a, FakeButton, FakePwm, Independent<FakePort, FakePort>, RecordingHalt, MockNoop>;

struct Board {
    hours: FakeButton,
    minutes: FakeButton,
    sleep: FakeButton,
    hours_port: FakePort,
    minutes_port: FakePort,
    hours_pwm: FakePwm,
    halt: RecordingHalt,
}

fn boot(clock: &SharedClock) -> (App<'_>, Board) {
    let board = Board {
        hours: FakeButton::default(),
        minutes: FakeButton::default(),
        sleep: FakeButton::default(),
        hours_port: FakePort::default(),
        minutes_port: FakePort::default(),
        hours_pwm: FakePwm::default(),
        halt: RecordingHalt::default(),
    };

    let app = Application::new(
        clock,
        ButtonHandler::new(board.hours.clone(), board.minutes.clone(), board.sleep.clone()),
        PowerController::new(board.halt.clone()),
        Brightness::new(board.hours_pwm.clone(), FakePwm::default(), PWM_BRIGHTNESS),
        LedDisplay::new(
            Independent::new(
                board.hours_port.clone(),
                board.minutes_port.clone(),
                Polarity::ActiveLow,
            ),
            LAYOUT,
        ),
        MockNoop::new(),
    );

    (app, board)
}

/// Cathode levels the board should show for `time`.
fn expected(time: ClockTime) -> (u8, u8) {
    let pattern = LAYOUT.pattern(&time);
    (
        LAYOUT.hours_mask() & !pattern.hours,
        LAYOUT.minutes_mask() & !pattern.minutes,
    )
}

#[test]
fn hours_press_advances_and_redraws() {
    let clock = SharedClock::new(None);
    clock.set(ClockTime::new(5, 0, 0));
    let (mut app, board) = boot(&clock);

    board.hours.press();
    assert_eq!(app.update(), Some(Intent::IncrementHours));
    assert_eq!(clock.now(), ClockTime::new(6, 0, 0));
    assert_eq!(
        (board.hours_port.value(), board.minutes_port.value()),
        expected(ClockTime::new(6, 0, 0))
    );

    // Still held: no repeat.
    assert_eq!(app.update(), None);
    assert_eq!(clock.now().hours(), 6);
}

#[test]
fn hours_wrap_from_23_to_0() {
    let clock = SharedClock::new(None);
    clock.set(ClockTime::new(23, 17, 0));
    let (mut app, board) = boot(&clock);

    board.hours.press();
    app.update();

    assert_eq!(clock.now(), ClockTime::new(0, 17, 0));
}

#[test]
fn minutes_wrap_without_touching_hours() {
    let clock = SharedClock::new(None);
    clock.set(ClockTime::new(8, 59, 0));
    let (mut app, board) = boot(&clock);

    board.minutes.press();
    assert_eq!(app.update(), Some(Intent::IncrementMinutes));

    assert_eq!(clock.now(), ClockTime::new(8, 0, 0));
}

#[test]
fn sleep_toggle_blanks_then_restores() {
    let clock = SharedClock::new(None);
    clock.set(ClockTime::new(12, 34, 0));
    let (mut app, board) = boot(&clock);

    app.update();
    assert!(board.hours_pwm.enabled());
    assert_eq!(board.halt.last(), Some(SleepMode::Idle));

    board.sleep.queue(&[true, true, false]);
    assert_eq!(app.update(), Some(Intent::ToggleSleep));
    assert_eq!(app.mode(), PowerMode::Sleeping);
    assert!(!board.hours_pwm.enabled());
    assert!(!app.brightness().is_enabled());
    assert_eq!(board.halt.last(), Some(SleepMode::PowerSave));
    assert_eq!(board.hours_port.value(), LAYOUT.hours_mask());
    assert_eq!(board.minutes_port.value(), LAYOUT.minutes_mask());

    // Time keeps running underneath; a sleeping render draws nothing.
    clock.set(ClockTime::new(12, 35, 0));
    let writes = board.minutes_port.writes();
    app.update();
    assert_eq!(board.minutes_port.writes(), writes + 1); // blank only
    assert_eq!(board.minutes_port.value(), LAYOUT.minutes_mask());

    board.sleep.queue(&[true, true, false]);
    assert_eq!(app.update(), Some(Intent::ToggleSleep));
    assert_eq!(app.mode(), PowerMode::Active);
    assert!(board.hours_pwm.enabled());
    assert_eq!(board.hours_pwm.duty(), PWM_BRIGHTNESS);
    assert_eq!(
        (board.hours_port.value(), board.minutes_port.value()),
        expected(ClockTime::new(12, 35, 0))
    );
}

#[test]
fn adjust_press_while_sleeping_only_wakes() {
    let clock = SharedClock::new(None);
    clock.set(ClockTime::new(7, 45, 0));
    let (mut app, board) = boot(&clock);

    board.sleep.queue(&[true, true, false]);
    app.update();
    assert_eq!(app.mode(), PowerMode::Sleeping);

    board.hours.press();
    assert_eq!(app.update(), Some(Intent::Wake));
    assert_eq!(app.mode(), PowerMode::Active);
    assert_eq!(clock.now(), ClockTime::new(7, 45, 0));
}

#[test]
fn combo_hold_resets_to_midnight() {
    let clock = SharedClock::new(Some(1000));
    clock.set(ClockTime::new(19, 20, 21));
    let (mut app, board) = boot(&clock);

    board.hours.press();
    board.minutes.press();
    for _ in 0..COMBO_HOLD_ITERATIONS {
        assert_eq!(app.update(), None);
    }
    assert_eq!(app.buttons().combo_progress(), COMBO_HOLD_ITERATIONS);

    assert_eq!(app.update(), Some(Intent::ResetTime));
    assert_eq!(clock.now(), ClockTime::MIDNIGHT);
    assert_eq!(app.mode(), PowerMode::Active);
    assert_eq!(
        (board.hours_port.value(), board.minutes_port.value()),
        expected(ClockTime::MIDNIGHT)
    );
}
