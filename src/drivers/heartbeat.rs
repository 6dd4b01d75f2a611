use embedded_hal::digital::v2::OutputPin;

/// Tick activity indicator, flipped once per clock tick.
pub struct Heartbeat<P> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> Heartbeat<P> {
    pub fn new(mut pin: P) -> Self {
        pin.set_low().ok();
        Self { pin, lit: false }
    }

    pub fn toggle(&mut self) {
        self.lit = !self.lit;
        if self.lit {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
