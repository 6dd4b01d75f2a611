use embedded_hal::serial;

use crate::clock::ClockTime;
use crate::drivers::Intent;
use crate::power::PowerMode;

/// Line-oriented debug output on a blocking serial writer.
pub struct SerialConsole<W> {
    serial: W,
}

impl<W: serial::Write<u8>> SerialConsole<W> {
    pub fn new(serial: W) -> Self {
        Self { serial }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), W::Error> {
        nb::block!(self.serial.write(byte))
    }

    pub fn write_line(&mut self, s: &str) -> Result<(), W::Error> {
        ufmt::uWrite::write_str(self, s)?;
        ufmt::uWrite::write_str(self, "\r\n")
    }

    // Debug helper - print hex value
    pub fn write_hex(&mut self, val: u8) -> Result<(), W::Error> {
        const HEX_CHARS: [u8; 16] = *b"0123456789ABCDEF";
        self.write_byte(HEX_CHARS[(val >> 4) as usize])?;
        self.write_byte(HEX_CHARS[(val & 0xF) as usize])
    }

    pub fn debug(&mut self, msg: &str, val: u8) -> Result<(), W::Error> {
        ufmt::uwrite!(self, "[DBG] {}: 0x", msg)?;
        self.write_hex(val)?;
        ufmt::uWrite::write_str(self, "\r\n")
    }

    /// One line per applied intent: `[clk] <intent> -> HH:MM:SS (<mode>)`.
    pub fn log_intent(&mut self, intent: Intent, time: ClockTime, mode: PowerMode) -> Result<(), W::Error> {
        ufmt::uwrite!(self, "[clk] {} -> {} ({})\r\n", intent, time, mode)
    }

    pub fn flush(&mut self) -> Result<(), W::Error> {
        nb::block!(self.serial.flush())
    }
}

impl<W: serial::Write<u8>> ufmt::uWrite for SerialConsole<W> {
    type Error = W::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}
