//! Wall-clock time of day

/// Hours, minutes and seconds of the current day.
///
/// Every field is kept within its bound: hours 0-23, minutes and seconds
/// 0-59. Out-of-range input is folded back with modulo arithmetic instead
/// of being rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockTime {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl ClockTime {
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours: hours % 24,
            minutes: minutes % 60,
            seconds: seconds % 60,
        }
    }

    #[inline]
    pub fn hours(&self) -> u8 {
        self.hours
    }

    #[inline]
    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    #[inline]
    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Manual hour adjustment. Wraps at 24 and leaves minutes alone.
    pub fn increment_hours(&mut self) {
        self.hours = (self.hours + 1) % 24;
    }

    /// Manual minute adjustment. Wraps at 60 without carrying into hours.
    pub fn increment_minutes(&mut self) {
        self.minutes = (self.minutes + 1) % 60;
    }

    pub fn reset(&mut self) {
        *self = Self::MIDNIGHT;
    }
}

impl ufmt::uDisplay for ClockTime {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        write_two_digits(f, self.hours)?;
        f.write_str(":")?;
        write_two_digits(f, self.minutes)?;
        f.write_str(":")?;
        write_two_digits(f, self.seconds)
    }
}

fn write_two_digits<W>(f: &mut ufmt::Formatter<'_, W>, value: u8) -> Result<(), W::Error>
where
    W: ufmt::uWrite + ?Sized,
{
    if value < 10 {
        f.write_str("0")?;
    }
    <u8 as ufmt::uDisplay>::fmt(&value, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_folds_out_of_range_fields() {
        let t = ClockTime::new(25, 61, 60);
        assert_eq!((t.hours(), t.minutes(), t.seconds()), (1, 1, 0));
    }

    #[test]
    fn manual_increments_do_not_cascade() {
        let mut t = ClockTime::new(10, 59, 30);
        t.increment_minutes();
        assert_eq!((t.hours(), t.minutes()), (10, 0));

        let mut t = ClockTime::new(23, 15, 0);
        t.increment_hours();
        assert_eq!((t.hours(), t.minutes()), (0, 15));
    }
}
