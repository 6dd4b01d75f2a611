//! Power-on self-test suite, reported over the debug console

use embedded_hal::digital::v2::InputPin;
use ufmt::{uWrite, uwrite};

use crate::clock::{ClockTime, SharedClock};
use crate::drivers::{DisplayLayout, Heartbeat};

pub struct TestRunner<W> {
    console: W,
    total_tests: u32,
    passed_tests: u32,
    current_suite: &'static str,
}

pub trait TestCase {
    fn run(&self) -> TestResult;
    fn name(&self) -> &'static str;
}

#[derive(Debug, PartialEq)]
pub enum TestResult {
    Pass,
    Fail(TestError),
}

#[derive(Debug, PartialEq)]
pub enum TestError {
    AssertionFailed(&'static str),
    HardwareFault,
}

impl ufmt::uDisplay for TestError {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            TestError::AssertionFailed(what) => {
                f.write_str("assertion failed: ")?;
                f.write_str(what)
            }
            TestError::HardwareFault => f.write_str("hardware fault"),
        }
    }
}

macro_rules! check_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return TestResult::Fail(TestError::AssertionFailed(concat!(
                "`",
                stringify!($left),
                " == ",
                stringify!($right),
                "`"
            )));
        }
    };
}

impl<W: uWrite> TestRunner<W> {
    pub fn new(console: W) -> Self {
        Self {
            console,
            total_tests: 0,
            passed_tests: 0,
            current_suite: "",
        }
    }

    /// Runs `tests` in order. Returns `true` when all of them passed.
    pub fn run_suite(&mut self, name: &'static str, tests: &[&dyn TestCase]) -> bool {
        self.current_suite = name;
        self.total_tests = 0;
        self.passed_tests = 0;
        uwrite!(self.console, "\r\n=== Test Suite: {} ===\r\n", name).ok();

        for test in tests {
            self.total_tests += 1;
            uwrite!(self.console, "Running {}: ", test.name()).ok();

            match test.run() {
                TestResult::Pass => {
                    self.passed_tests += 1;
                    self.console.write_str("PASS\r\n").ok();
                }
                TestResult::Fail(err) => {
                    uwrite!(self.console, "FAIL - {}\r\n", err).ok();
                }
            }
        }

        self.print_summary();
        self.passed_tests == self.total_tests
    }

    pub fn into_console(self) -> W {
        self.console
    }

    fn print_summary(&mut self) {
        uwrite!(
            self.console,
            "Passed: {}/{} in {}\r\n",
            self.passed_tests,
            self.total_tests,
            self.current_suite
        )
        .ok();
    }
}

/// Drives a private clock across midnight and through a drift correction.
pub struct ClockRolloverTest;

impl TestCase for ClockRolloverTest {
    fn name(&self) -> &'static str {
        "Clock rollover"
    }

    fn run(&self) -> TestResult {
        let clock = SharedClock::new(Some(2));
        let mut heartbeat = Heartbeat::new(NullPin);

        clock.set(ClockTime::new(23, 59, 58));
        clock.on_tick(&mut heartbeat);
        check_eq!(clock.now(), ClockTime::new(23, 59, 59));

        // Second tick is the calibration tick and is swallowed.
        check_eq!(clock.on_tick(&mut heartbeat), true);
        check_eq!(clock.now(), ClockTime::new(23, 59, 59));

        clock.on_tick(&mut heartbeat);
        check_eq!(clock.now(), ClockTime::MIDNIGHT);
        check_eq!(heartbeat.is_lit(), true);

        TestResult::Pass
    }
}

/// Every hour of the day must light a distinct set of lines.
pub struct HoursMapTest<'a> {
    pub layout: &'a DisplayLayout,
}

impl TestCase for HoursMapTest<'_> {
    fn name(&self) -> &'static str {
        "Hours line map"
    }

    fn run(&self) -> TestResult {
        let mut seen = [0u8; 24];
        for hour in 0..24u8 {
            let lines = self.layout.pattern(&ClockTime::new(hour, 0, 0)).hours;
            if seen[..hour as usize].contains(&lines) {
                return TestResult::Fail(TestError::AssertionFailed("hour patterns collide"));
            }
            seen[hour as usize] = lines;
        }
        check_eq!(self.layout.hours_mask().count_ones(), 5);
        TestResult::Pass
    }
}

/// Buttons must read released at boot; a held input means a short or a
/// missing pull-up.
pub struct InputsReleasedTest<'a, I> {
    pub inputs: &'a [I],
}

impl<I: InputPin> TestCase for InputsReleasedTest<'_, I> {
    fn name(&self) -> &'static str {
        "Buttons released"
    }

    fn run(&self) -> TestResult {
        for input in self.inputs {
            match input.is_high() {
                Ok(true) => {}
                _ => return TestResult::Fail(TestError::HardwareFault),
            }
        }
        TestResult::Pass
    }
}

struct NullPin;

impl embedded_hal::digital::v2::OutputPin for NullPin {
    type Error = core::convert::Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
