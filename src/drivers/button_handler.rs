use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::InputPin;

use crate::config::{
    BUTTON_DEBOUNCE_MS, COMBO_HOLD_ITERATIONS, RELEASE_POLL_MS, RELEASE_TIMEOUT_MS,
};
use crate::power::PowerMode;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Hours,
    Minutes,
    Sleep,
}

impl Button {
    const ALL: [Button; 3] = [Button::Hours, Button::Minutes, Button::Sleep];

    fn index(self) -> usize {
        match self {
            Button::Hours => 0,
            Button::Minutes => 1,
            Button::Sleep => 2,
        }
    }
}

/// What a confirmed press asks the clock to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    IncrementHours,
    IncrementMinutes,
    ToggleSleep,
    Wake,
    ResetTime,
}

impl ufmt::uDisplay for Intent {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(match self {
            Intent::IncrementHours => "hours+1",
            Intent::IncrementMinutes => "minutes+1",
            Intent::ToggleSleep => "toggle sleep",
            Intent::Wake => "wake",
            Intent::ResetTime => "reset",
        })
    }
}

/// Polled decoder for the hours, minutes and sleep buttons.
///
/// Buttons are active low. A press is confirmed by re-reading the input
/// after [`BUTTON_DEBOUNCE_MS`]; each confirmed press latches until release
/// so it yields at most one [`Intent`]. Holding hours and minutes together
/// for more than [`COMBO_HOLD_ITERATIONS`] polls is the combo gesture.
pub struct ButtonHandler<I> {
    buttons: [I; 3],
    latched: [bool; 3],
    combo_ticks: u16,
    // Set once the current hours+minutes press has been used (combo fired,
    // or a single press woke the clock). Cleared when both are released.
    combo_spent: bool,
}

impl<I: InputPin> ButtonHandler<I> {
    pub fn new(hours: I, minutes: I, sleep: I) -> Self {
        Self {
            buttons: [hours, minutes, sleep],
            latched: [false; 3],
            combo_ticks: 0,
            combo_spent: false,
        }
    }

    /// Runs one main-loop iteration of input handling.
    ///
    /// May block for a debounce delay, and after a sleep toggle or combo for
    /// as long as the buttons stay held (bounded by [`RELEASE_TIMEOUT_MS`]).
    pub fn poll<D: DelayMs<u16>>(&mut self, mode: PowerMode, delay: &mut D) -> Option<Intent> {
        let mut levels = Button::ALL.map(|button| self.is_active(button));
        let hours = levels[Button::Hours.index()];
        let minutes = levels[Button::Minutes.index()];
        let both = hours && minutes;

        if both {
            if let Some(intent) = self.poll_combo(mode, delay) {
                return Some(intent);
            }
        } else {
            self.combo_ticks = 0;
            if !hours && !minutes {
                self.combo_spent = false;
            }
        }

        for button in Button::ALL {
            if both && button != Button::Sleep {
                continue;
            }
            if let Some(intent) = self.poll_single(button, &mut levels, mode, delay) {
                return Some(intent);
            }
        }

        None
    }

    /// Whether `button` is latched as pressed.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.latched[button.index()]
    }

    /// Consecutive polls the combo has been held so far.
    pub fn combo_progress(&self) -> u16 {
        self.combo_ticks
    }

    fn poll_combo<D: DelayMs<u16>>(&mut self, mode: PowerMode, delay: &mut D) -> Option<Intent> {
        // Both halves of a combo are consumed by it, never by single presses.
        self.latched[Button::Hours.index()] = true;
        self.latched[Button::Minutes.index()] = true;

        if self.combo_spent {
            return None;
        }

        self.combo_ticks = self.combo_ticks.saturating_add(1);
        if self.combo_ticks <= COMBO_HOLD_ITERATIONS {
            return None;
        }

        delay.delay_ms(BUTTON_DEBOUNCE_MS);
        if !(self.is_active(Button::Hours) && self.is_active(Button::Minutes)) {
            return None;
        }

        self.combo_ticks = 0;
        self.combo_spent = true;
        self.wait_for_release(&[Button::Hours, Button::Minutes], delay);

        Some(match mode {
            PowerMode::Sleeping => Intent::Wake,
            PowerMode::Active => Intent::ResetTime,
        })
    }

    /// `levels` is this poll's sample. A partner claimed during debounce is
    /// marked active in it so the rest of the poll does not release it.
    fn poll_single<D: DelayMs<u16>>(
        &mut self,
        button: Button,
        levels: &mut [bool; 3],
        mode: PowerMode,
        delay: &mut D,
    ) -> Option<Intent> {
        let idx = button.index();

        if !levels[idx] {
            self.latched[idx] = false;
            return None;
        }
        if self.latched[idx] {
            return None;
        }

        delay.delay_ms(BUTTON_DEBOUNCE_MS);
        if !self.is_active(button) {
            return None;
        }
        self.latched[idx] = true;

        let intent = match (button, mode) {
            (Button::Sleep, _) => {
                self.wait_for_release(&[Button::Sleep], delay);
                Intent::ToggleSleep
            }
            (_, _) if self.is_active(Self::partner(button)) => {
                // The other adjust button landed during debounce: this press
                // opens a combo.
                let partner = Self::partner(button).index();
                self.latched[partner] = true;
                levels[partner] = true;
                return None;
            }
            (_, PowerMode::Sleeping) => {
                self.combo_spent = true;
                Intent::Wake
            }
            (Button::Hours, PowerMode::Active) => Intent::IncrementHours,
            (Button::Minutes, PowerMode::Active) => Intent::IncrementMinutes,
        };

        Some(intent)
    }

    fn partner(button: Button) -> Button {
        match button {
            Button::Hours => Button::Minutes,
            _ => Button::Hours,
        }
    }

    fn wait_for_release<D: DelayMs<u16>>(&mut self, buttons: &[Button], delay: &mut D) {
        let mut waited: u16 = 0;
        while buttons.iter().any(|&b| self.is_active(b)) {
            if waited >= RELEASE_TIMEOUT_MS {
                // Stuck input: give the loop back. The latches stay set, so
                // nothing fires again until a real release.
                return;
            }
            delay.delay_ms(RELEASE_POLL_MS);
            waited = waited.saturating_add(RELEASE_POLL_MS);
        }
    }

    fn is_active(&self, button: Button) -> bool {
        // Buttons are active low; an unreadable input counts as released.
        self.buttons[button.index()].is_low().unwrap_or(false)
    }
}
