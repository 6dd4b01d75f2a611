use core::cell::RefCell;

use avr_device::interrupt::{self, Mutex};
use panic_halt as _;

use binclock_firmware::config::{DRIFT_CALIBRATION_TICKS, FRAME_MS, PWM_BRIGHTNESS};
use binclock_firmware::drivers::{Brightness, ButtonHandler, Heartbeat, LedDisplay};
use binclock_firmware::hal::{board, power, Delay, FrameTimer, Pwm1, Sleep, TickTimer};
use binclock_firmware::{Application, PowerController, SharedClock};

#[cfg(any(feature = "debug", feature = "self-test"))]
use binclock_firmware::{config::UART_BAUD, drivers::SerialConsole, hal::Uart};

static CLOCK: SharedClock = SharedClock::new(Some(DRIFT_CALIBRATION_TICKS));

// Owned by the tick interrupt once main hands it over
static HEARTBEAT: Mutex<RefCell<Option<Heartbeat<board::HeartbeatPin>>>> =
    Mutex::new(RefCell::new(None));

#[avr_device::entry]
fn main() -> ! {
    let heartbeat = Heartbeat::new(board::HeartbeatPin::output(board::HEARTBEAT_BIT));
    interrupt::free(|cs| {
        HEARTBEAT.borrow(cs).replace(Some(heartbeat));
    });

    let buttons = [
        board::ButtonPin::pull_up(board::HOURS_BUTTON_BIT),
        board::ButtonPin::pull_up(board::MINUTES_BUTTON_BIT),
        board::ButtonPin::pull_up(board::SLEEP_BUTTON_BIT),
    ];

    let (hours_pwm, minutes_pwm) = Pwm1::new().split();
    let brightness = Brightness::new(hours_pwm, minutes_pwm, PWM_BRIGHTNESS);
    let display = LedDisplay::new(board::digit_driver(), board::LAYOUT);

    #[cfg(any(feature = "debug", feature = "self-test"))]
    let console = SerialConsole::new(Uart::new(UART_BAUD));

    #[cfg(all(feature = "self-test", feature = "debug"))]
    let console = power_on_self_test(console, &buttons);

    #[cfg(all(feature = "self-test", not(feature = "debug")))]
    power_on_self_test(console, &buttons);

    #[cfg(feature = "debug")]
    let mut console = console;

    let _tick = TickTimer::start();
    let _frame = FrameTimer::start(FRAME_MS);

    let [hours, minutes, sleep] = buttons;
    let mut app = Application::new(
        &CLOCK,
        ButtonHandler::new(hours, minutes, sleep),
        PowerController::new(Sleep::new()),
        brightness,
        display,
        Delay::new(),
    );

    // Enable interrupts globally
    unsafe { avr_device::interrupt::enable() };

    #[cfg(feature = "debug")]
    console.write_line("binclock v0.1.0").ok();

    loop {
        #[cfg_attr(not(feature = "debug"), allow(unused_variables))]
        let intent = app.update();

        #[cfg(feature = "debug")]
        if let Some(intent) = intent {
            console.log_intent(intent, CLOCK.now(), app.mode()).ok();
        }
    }
}

/// Runs the POST suite and hands the console back once the report is out.
#[cfg(feature = "self-test")]
fn power_on_self_test(
    console: SerialConsole<Uart>,
    buttons: &[board::ButtonPin],
) -> SerialConsole<Uart> {
    use binclock_firmware::testing::{
        ClockRolloverTest, HoursMapTest, InputsReleasedTest, TestRunner,
    };

    let mut runner = TestRunner::new(console);
    runner.run_suite(
        "Power-on self test",
        &[
            &ClockRolloverTest,
            &HoursMapTest {
                layout: &board::LAYOUT,
            },
            &InputsReleasedTest { inputs: buttons },
        ],
    );

    let mut console = runner.into_console();
    console.flush().ok();
    console
}

#[avr_device::interrupt(atmega128a)]
fn TIMER0_OVF() {
    interrupt::free(|cs| {
        if let Some(heartbeat) = HEARTBEAT.borrow(cs).borrow_mut().as_mut() {
            CLOCK.on_tick(heartbeat);
        }
    });
}

// Frame pacing only; waking the CPU is the whole job.
#[avr_device::interrupt(atmega128a)]
fn TIMER2_COMP() {}

#[avr_device::interrupt(atmega128a)]
fn INT4() {
    power::disarm_button_wake();
}

#[avr_device::interrupt(atmega128a)]
fn INT5() {
    power::disarm_button_wake();
}

#[avr_device::interrupt(atmega128a)]
fn INT6() {
    power::disarm_button_wake();
}
