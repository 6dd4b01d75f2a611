pub mod engine;
pub mod time;

pub use engine::SharedClock;
pub use time::ClockTime;
