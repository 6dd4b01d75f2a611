pub mod brightness;
pub mod button_handler;
pub mod heartbeat;
pub mod led_display;
pub mod serial_console;

pub use brightness::{Brightness, Group};
pub use button_handler::{Button, ButtonHandler, Intent};
pub use heartbeat::Heartbeat;
pub use led_display::{
    DigitDriver, DisplayLayout, DisplayPattern, Independent, LedDisplay, Multiplexed,
    OutputGroup, Polarity,
};
pub use serial_console::SerialConsole;
