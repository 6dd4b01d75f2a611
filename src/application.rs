//! Main-loop body: input, power enforcement, rendering

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::InputPin;
use embedded_hal::PwmPin;

use crate::clock::SharedClock;
use crate::drivers::{Brightness, ButtonHandler, DigitDriver, Intent, LedDisplay};
use crate::power::{Halt, PowerController, PowerMode};

/// Everything the main loop owns, plus a view of the shared clock.
pub struct Application<'a, I, P, D, H, Dl>
where
    P: PwmPin,
{
    clock: &'a SharedClock,
    buttons: ButtonHandler<I>,
    power: PowerController<H>,
    brightness: Brightness<P>,
    display: LedDisplay<D>,
    delay: Dl,
}

impl<'a, I, P, D, H, Dl> Application<'a, I, P, D, H, Dl>
where
    I: InputPin,
    P: PwmPin,
    P::Duty: Copy,
    D: DigitDriver,
    H: Halt,
    Dl: DelayMs<u16>,
{
    pub fn new(
        clock: &'a SharedClock,
        buttons: ButtonHandler<I>,
        power: PowerController<H>,
        brightness: Brightness<P>,
        display: LedDisplay<D>,
        delay: Dl,
    ) -> Self {
        Self {
            clock,
            buttons,
            power,
            brightness,
            display,
            delay,
        }
    }

    /// One main-loop iteration. Returns the intent applied, if any.
    ///
    /// Halts inside [`PowerController::enforce`] until the next interrupt.
    pub fn update(&mut self) -> Option<Intent> {
        let intent = self.buttons.poll(self.power.mode(), &mut self.delay);
        if let Some(intent) = intent {
            self.apply(intent);
        }

        self.power.enforce(&mut self.brightness, &mut self.display);

        self.display
            .render(self.power.mode(), self.clock.now(), &mut self.brightness);

        intent
    }

    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::IncrementHours => self.clock.increment_hours(),
            Intent::IncrementMinutes => self.clock.increment_minutes(),
            Intent::ResetTime => self.clock.reset(),
            Intent::ToggleSleep => self.power.toggle(),
            Intent::Wake => self.power.wake(),
        }
    }

    #[inline]
    pub fn mode(&self) -> PowerMode {
        self.power.mode()
    }

    pub fn brightness(&self) -> &Brightness<P> {
        &self.brightness
    }

    pub fn buttons(&self) -> &ButtonHandler<I> {
        &self.buttons
    }
}
