use embedded_hal::PwmPin;

/// One of the two LED digit groups.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Group {
    Hours,
    Minutes,
}

/// PWM anode drive for the hours and minutes groups.
///
/// Starts disabled. While enabled, either both groups are driven or, when
/// multiplexing, only the selected one.
pub struct Brightness<P: PwmPin> {
    hours: P,
    minutes: P,
    duty: P::Duty,
    enabled: bool,
    selected: Option<Group>,
}

impl<P> Brightness<P>
where
    P: PwmPin,
    P::Duty: Copy,
{
    pub fn new(hours: P, minutes: P, duty: P::Duty) -> Self {
        Self {
            hours,
            minutes,
            duty,
            enabled: false,
            selected: None,
        }
    }

    /// (Re)starts PWM at the configured duty on the selected group(s).
    pub fn enable(&mut self) {
        self.enabled = true;
        self.apply();
    }

    /// Stops PWM on both channels; the anode lines fall low.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.hours.disable();
        self.minutes.disable();
    }

    /// Limits drive to `group`, or to both groups with `None`.
    pub fn select(&mut self, group: Option<Group>) {
        if self.selected == group {
            return;
        }
        self.selected = group;
        if self.enabled {
            self.apply();
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn selected(&self) -> Option<Group> {
        self.selected
    }

    fn apply(&mut self) {
        let duty = self.duty;
        let selected = self.selected;
        let lit = |group: Group| selected.map_or(true, |s| s == group);

        Self::drive(&mut self.hours, duty, lit(Group::Hours));
        Self::drive(&mut self.minutes, duty, lit(Group::Minutes));
    }

    fn drive(pin: &mut P, duty: P::Duty, on: bool) {
        if on {
            pin.set_duty(duty);
            pin.enable();
        } else {
            pin.disable();
        }
    }
}
