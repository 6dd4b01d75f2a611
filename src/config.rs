//! Configuration constants for the binary clock firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Watch crystal driving the asynchronous tick timer
pub const TICK_XTAL_HZ: u32 = 32_768;

/// Tick timer prescaler; 32768 / 128 / 256 overflows once per second
pub const TICK_PRESCALER: u32 = 128;

/// Ticks between two drift corrections.
///
/// The crystal on this board runs about 11.6 ppm fast, so one second is
/// retired per day of ticks.
pub const DRIFT_CALIBRATION_TICKS: u32 = 86_400;

/// Button debounce time in milliseconds
pub const BUTTON_DEBOUNCE_MS: u16 = 20;

/// Main loop frame period in milliseconds, also the multiplex interval
pub const FRAME_MS: u16 = 5;

/// Loop iterations both adjust buttons must be held before the combo fires (~300 ms)
pub const COMBO_HOLD_ITERATIONS: u16 = 300 / FRAME_MS;

/// Upper bound on any wait-for-release spin, in milliseconds
pub const RELEASE_TIMEOUT_MS: u16 = 10_000;

/// Poll interval inside a wait-for-release spin
pub const RELEASE_POLL_MS: u16 = 1;

/// PWM duty for both digit-group anodes (0-255)
pub const PWM_BRIGHTNESS: u8 = 64;

/// UART baud rate for the debug console
pub const UART_BAUD: u32 = 9600;
