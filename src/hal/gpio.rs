use avr_device::atmega128a::{PORTB, PORTC, PORTD, PORTE};
use avr_device::interrupt;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::drivers::OutputGroup;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

/// Register access for one I/O port.
pub trait Port {
    fn set_direction(mask: u8, output: bool);
    /// Read-modify-write of PORTx: bits under `mask` take `value`.
    fn write(mask: u8, value: u8);
    fn read_pins() -> u8;
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident, $ddr:ident, $pin:ident) => {
        impl Port for $PORT {
            #[inline]
            fn set_direction(mask: u8, output: bool) {
                interrupt::free(|_| unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| {
                        if output {
                            w.bits(r.bits() | mask)
                        } else {
                            w.bits(r.bits() & !mask)
                        }
                    });
                });
            }

            #[inline]
            fn write(mask: u8, value: u8) {
                // The tick interrupt writes the heartbeat line; keep the
                // read-modify-write atomic with respect to it.
                interrupt::free(|_| unsafe {
                    (*$PORT::ptr())
                        .$port
                        .modify(|r, w| w.bits((r.bits() & !mask) | (value & mask)));
                });
            }

            #[inline]
            fn read_pins() -> u8 {
                unsafe { (*$PORT::ptr()).$pin.read().bits() }
            }
        }
    };
}

impl_port!(PORTB, portb, ddrb, pinb);
impl_port!(PORTC, portc, ddrc, pinc);
impl_port!(PORTD, portd, ddrd, pind);
impl_port!(PORTE, porte, ddre, pine);

/// A single line of `PORT`.
pub struct Pin<PORT, MODE> {
    bit: u8,
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT: Port> Pin<PORT, Output> {
    /// Push-pull output, starting low.
    pub fn output(bit: u8) -> Self {
        PORT::write(1 << bit, 0);
        PORT::set_direction(1 << bit, true);
        Self {
            bit,
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

impl<PORT: Port> Pin<PORT, Input> {
    /// Input with the internal pull-up enabled.
    pub fn pull_up(bit: u8) -> Self {
        PORT::set_direction(1 << bit, false);
        PORT::write(1 << bit, 0xFF);
        Self {
            bit,
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

impl<PORT: Port> OutputPin for Pin<PORT, Output> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        PORT::write(1 << self.bit, 0xFF);
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        PORT::write(1 << self.bit, 0);
        Ok(())
    }
}

impl<PORT: Port> InputPin for Pin<PORT, Input> {
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(PORT::read_pins() & (1 << self.bit) != 0)
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Reserved lines of one port, driven together as a digit group.
pub struct PortGroup<PORT> {
    reserved: u8,
    _port: PhantomData<PORT>,
}

impl<PORT: Port> PortGroup<PORT> {
    /// Takes the lines in `reserved` as outputs. Other lines of the port are
    /// never written through this group.
    pub fn new(reserved: u8) -> Self {
        PORT::set_direction(reserved, true);
        Self {
            reserved,
            _port: PhantomData,
        }
    }
}

impl<PORT: Port> OutputGroup for PortGroup<PORT> {
    fn write_masked(&mut self, mask: u8, bits: u8) {
        PORT::write(mask & self.reserved, bits);
    }
}

// Binary clock board pin definitions
pub mod board {
    use super::*;
    use crate::drivers::{DisplayLayout, Polarity};

    pub type HeartbeatPin = Pin<PORTB, Output>;
    pub const HEARTBEAT_BIT: u8 = 0;

    // Buttons double as INT4..INT6 for waking from power-save
    pub type ButtonPin = Pin<PORTE, Input>;
    pub const HOURS_BUTTON_BIT: u8 = 4;
    pub const MINUTES_BUTTON_BIT: u8 = 5;
    pub const SLEEP_BUTTON_BIT: u8 = 6;
    pub const BUTTON_MASK: u8 =
        (1 << HOURS_BUTTON_BIT) | (1 << MINUTES_BUTTON_BIT) | (1 << SLEEP_BUTTON_BIT);

    // Common anode: OC1A/OC1B drive the anodes, cathodes sink
    pub const POLARITY: Polarity = Polarity::ActiveLow;

    #[cfg(not(feature = "multiplexed"))]
    pub const LAYOUT: DisplayLayout = DisplayLayout {
        hour_lines: [0, 1, 5, 6, 7], // PD0, PD1, PD5, PD6, PD7
        minute_lines: [0, 1, 2, 3, 4, 5], // PC0-PC5
    };

    #[cfg(not(feature = "multiplexed"))]
    pub type Driver = crate::drivers::Independent<PortGroup<PORTD>, PortGroup<PORTC>>;

    #[cfg(not(feature = "multiplexed"))]
    pub fn digit_driver() -> Driver {
        crate::drivers::Independent::new(
            PortGroup::new(LAYOUT.hours_mask()),
            PortGroup::new(LAYOUT.minutes_mask()),
            POLARITY,
        )
    }

    // Both groups share PC0-PC5; the anode PWM picks which one is lit
    #[cfg(feature = "multiplexed")]
    pub const LAYOUT: DisplayLayout = DisplayLayout {
        hour_lines: [0, 1, 2, 3, 4],
        minute_lines: [0, 1, 2, 3, 4, 5],
    };

    #[cfg(feature = "multiplexed")]
    pub type Driver = crate::drivers::Multiplexed<PortGroup<PORTC>>;

    #[cfg(feature = "multiplexed")]
    pub fn digit_driver() -> Driver {
        crate::drivers::Multiplexed::new(
            PortGroup::new(LAYOUT.hours_mask() | LAYOUT.minutes_mask()),
            POLARITY,
        )
    }
}
