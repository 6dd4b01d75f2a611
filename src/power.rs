//! Active/sleep mode control

use embedded_hal::PwmPin;

use crate::drivers::{Brightness, DigitDriver, LedDisplay};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PowerMode {
    #[default]
    Active,
    Sleeping,
}

impl ufmt::uDisplay for PowerMode {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(match self {
            PowerMode::Active => "active",
            PowerMode::Sleeping => "sleeping",
        })
    }
}

/// CPU halt depth requested from the [`Halt`] primitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SleepMode {
    /// Core halted, peripherals clocked. Used between frames while active.
    Idle,
    /// Everything stopped except the asynchronous tick timer.
    PowerSave,
}

/// Halt-until-interrupt primitive.
pub trait Halt {
    /// Suspends the CPU in `mode` and returns once any enabled interrupt fires.
    fn halt(&mut self, mode: SleepMode);
}

pub struct PowerController<H> {
    mode: PowerMode,
    halt: H,
}

impl<H: Halt> PowerController<H> {
    pub fn new(halt: H) -> Self {
        Self {
            mode: PowerMode::default(),
            halt,
        }
    }

    #[inline]
    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            PowerMode::Active => PowerMode::Sleeping,
            PowerMode::Sleeping => PowerMode::Active,
        };
    }

    pub fn wake(&mut self) {
        self.mode = PowerMode::Active;
    }

    /// Applies the current mode's outputs, then halts until the next interrupt.
    ///
    /// Idempotent; runs every main-loop iteration.
    pub fn enforce<P, D>(&mut self, brightness: &mut Brightness<P>, display: &mut LedDisplay<D>)
    where
        P: PwmPin,
        P::Duty: Copy,
        D: DigitDriver,
    {
        match self.mode {
            PowerMode::Sleeping => {
                brightness.disable();
                display.blank();
                self.halt.halt(SleepMode::PowerSave);
            }
            PowerMode::Active => {
                brightness.enable();
                self.halt.halt(SleepMode::Idle);
            }
        }
    }
}
