use avr_device::atmega128a::USART0;
use core::convert::Infallible;
use embedded_hal::serial;

use crate::config::CPU_FREQ_HZ;

// UCSR0A
const UDRE0: u8 = 1 << 5;
const TXC0: u8 = 1 << 6;
// UCSR0B
const TXEN0: u8 = 1 << 3;
// UCSR0C, 8N1
const UCSZ_8BIT: u8 = 0x06;

/// Transmit-only, polled USART0 (TXD0 on PE1).
pub struct Uart {
    _private: (),
}

impl Uart {
    pub fn new(baud: u32) -> Self {
        let ubrr = (CPU_FREQ_HZ / (16 * baud) - 1) as u16;

        unsafe {
            let p = &*USART0::ptr();
            p.ubrr0h.write(|w| w.bits((ubrr >> 8) as u8));
            p.ubrr0l.write(|w| w.bits(ubrr as u8));
            p.ucsr0c.write(|w| w.bits(UCSZ_8BIT));
            p.ucsr0b.write(|w| w.bits(TXEN0));
        }

        Self { _private: () }
    }
}

impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        unsafe {
            let p = &*USART0::ptr();
            if p.ucsr0a.read().bits() & UDRE0 == 0 {
                return Err(nb::Error::WouldBlock);
            }
            // Writing a one clears TXC0 so flush() sees this byte go out.
            p.ucsr0a.modify(|r, w| w.bits(r.bits() | TXC0));
            p.udr0.write(|w| w.bits(word));
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        unsafe {
            let p = &*USART0::ptr();
            let status = p.ucsr0a.read().bits();
            if status & UDRE0 == 0 || status & TXC0 == 0 {
                return Err(nb::Error::WouldBlock);
            }
        }
        Ok(())
    }
}
