//! Binary rendering of the time of day onto the LED digit groups.
//!
//! Two drive strategies sit behind [`LedDisplay`]:
//! - [`Independent`]: hours and minutes each own a set of cathode lines,
//!   both anodes stay lit.
//! - [`Multiplexed`]: both groups share one set of lines; every render
//!   shows the other group and switches the anode PWM over to it, so each
//!   group is lit for one frame at a time.

use embedded_hal::PwmPin;

use super::brightness::{Brightness, Group};
use crate::clock::ClockTime;
use crate::power::PowerMode;

pub const HOUR_BITS: usize = 5;
pub const MINUTE_BITS: usize = 6;

/// A port (or part of one) driven as a unit.
pub trait OutputGroup {
    /// Replaces the bits selected by `mask` with `bits`. Bits outside
    /// `mask` keep their current value.
    fn write_masked(&mut self, mask: u8, bits: u8);
}

/// Electrical level that lights an LED on a cathode line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    /// Common-anode wiring: a lit segment is driven low.
    ActiveLow,
}

impl Polarity {
    fn encode(self, mask: u8, lit: u8) -> u8 {
        match self {
            Polarity::ActiveHigh => lit & mask,
            Polarity::ActiveLow => !lit & mask,
        }
    }
}

/// Which output line shows which bit of the value.
///
/// `hour_lines[n]` is the line index of bit `n` of the hours value; the
/// board's pin order need not follow the numeric bit order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayLayout {
    pub hour_lines: [u8; HOUR_BITS],
    pub minute_lines: [u8; MINUTE_BITS],
}

impl DisplayLayout {
    pub fn hours_mask(&self) -> u8 {
        line_mask(&self.hour_lines)
    }

    pub fn minutes_mask(&self) -> u8 {
        line_mask(&self.minute_lines)
    }

    pub fn pattern(&self, time: &ClockTime) -> DisplayPattern {
        DisplayPattern {
            hours: spread(time.hours(), &self.hour_lines),
            minutes: spread(time.minutes(), &self.minute_lines),
        }
    }
}

/// Lit lines for one render, in line space and before polarity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayPattern {
    pub hours: u8,
    pub minutes: u8,
}

fn line_mask(lines: &[u8]) -> u8 {
    lines.iter().fold(0, |acc, &line| acc | (1 << line))
}

fn spread(value: u8, lines: &[u8]) -> u8 {
    lines
        .iter()
        .enumerate()
        .filter(|&(bit, _)| value & (1 << bit) != 0)
        .fold(0, |acc, (_, &line)| acc | (1 << line))
}

/// Puts a [`DisplayPattern`] on the hardware.
pub trait DigitDriver {
    /// Shows `pattern`. Must return without waiting.
    fn show<P>(&mut self, pattern: DisplayPattern, layout: &DisplayLayout, brightness: &mut Brightness<P>)
    where
        P: PwmPin,
        P::Duty: Copy;

    /// Switches every segment off.
    fn blank(&mut self, layout: &DisplayLayout);
}

pub struct Independent<H, M> {
    hours: H,
    minutes: M,
    polarity: Polarity,
}

impl<H: OutputGroup, M: OutputGroup> Independent<H, M> {
    pub fn new(hours: H, minutes: M, polarity: Polarity) -> Self {
        Self {
            hours,
            minutes,
            polarity,
        }
    }
}

impl<H: OutputGroup, M: OutputGroup> DigitDriver for Independent<H, M> {
    fn show<P>(&mut self, pattern: DisplayPattern, layout: &DisplayLayout, _brightness: &mut Brightness<P>)
    where
        P: PwmPin,
        P::Duty: Copy,
    {
        let hours_mask = layout.hours_mask();
        let minutes_mask = layout.minutes_mask();
        self.hours
            .write_masked(hours_mask, self.polarity.encode(hours_mask, pattern.hours));
        self.minutes
            .write_masked(minutes_mask, self.polarity.encode(minutes_mask, pattern.minutes));
    }

    fn blank(&mut self, layout: &DisplayLayout) {
        let hours_mask = layout.hours_mask();
        let minutes_mask = layout.minutes_mask();
        self.hours.write_masked(hours_mask, self.polarity.encode(hours_mask, 0));
        self.minutes
            .write_masked(minutes_mask, self.polarity.encode(minutes_mask, 0));
    }
}

pub struct Multiplexed<G> {
    lines: G,
    polarity: Polarity,
    next: Group,
}

impl<G: OutputGroup> Multiplexed<G> {
    pub fn new(lines: G, polarity: Polarity) -> Self {
        Self {
            lines,
            polarity,
            next: Group::Hours,
        }
    }
}

impl<G: OutputGroup> DigitDriver for Multiplexed<G> {
    fn show<P>(&mut self, pattern: DisplayPattern, layout: &DisplayLayout, brightness: &mut Brightness<P>)
    where
        P: PwmPin,
        P::Duty: Copy,
    {
        let mask = layout.hours_mask() | layout.minutes_mask();
        let (group, lit) = match self.next {
            Group::Hours => (Group::Hours, pattern.hours),
            Group::Minutes => (Group::Minutes, pattern.minutes),
        };

        self.lines.write_masked(mask, self.polarity.encode(mask, lit));
        brightness.select(Some(group));

        self.next = match group {
            Group::Hours => Group::Minutes,
            Group::Minutes => Group::Hours,
        };
    }

    fn blank(&mut self, layout: &DisplayLayout) {
        let mask = layout.hours_mask() | layout.minutes_mask();
        self.lines.write_masked(mask, self.polarity.encode(mask, 0));
        self.next = Group::Hours;
    }
}

/// Display renderer: derives a fresh pattern from the time on every call.
pub struct LedDisplay<D> {
    driver: D,
    layout: DisplayLayout,
}

impl<D: DigitDriver> LedDisplay<D> {
    pub fn new(driver: D, layout: DisplayLayout) -> Self {
        Self { driver, layout }
    }

    /// Draws `time`. Touches no output while sleeping.
    pub fn render<P>(&mut self, mode: PowerMode, time: ClockTime, brightness: &mut Brightness<P>)
    where
        P: PwmPin,
        P::Duty: Copy,
    {
        if mode == PowerMode::Sleeping {
            return;
        }
        let pattern = self.layout.pattern(&time);
        self.driver.show(pattern, &self.layout, brightness);
    }

    pub fn blank(&mut self) {
        self.driver.blank(&self.layout);
    }

    pub fn layout(&self) -> &DisplayLayout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: DisplayLayout = DisplayLayout {
        hour_lines: [0, 1, 5, 6, 7],
        minute_lines: [0, 1, 2, 3, 4, 5],
    };

    #[test]
    fn hours_follow_the_line_table() {
        let p = BOARD.pattern(&ClockTime::new(0b10101, 0, 0));
        assert_eq!(p.hours, (1 << 0) | (1 << 5) | (1 << 7));
        assert_eq!(BOARD.hours_mask(), 0b1110_0011);
    }

    #[test]
    fn minutes_are_the_low_six_bits() {
        let p = BOARD.pattern(&ClockTime::new(0, 45, 0));
        assert_eq!(p.minutes, 45);
        assert_eq!(BOARD.minutes_mask(), 0x3F);
    }

    #[test]
    fn active_low_inverts_inside_the_mask_only() {
        assert_eq!(Polarity::ActiveLow.encode(0x3F, 0b000101), 0b111010);
        assert_eq!(Polarity::ActiveHigh.encode(0x0F, 0xFF), 0x0F);
    }
}
