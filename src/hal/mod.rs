pub mod gpio;
pub mod power;
pub mod pwm;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use gpio::board;
pub use gpio::{Input, Output, Pin, PortGroup};
pub use power::Sleep;
pub use pwm::{Pwm1, Pwm1Pin};
pub use timer::{Delay, FrameTimer, TickTimer};
pub use uart::Uart;
