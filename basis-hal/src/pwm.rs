//! Pulse Width Modulation (PWM)
//!
//! A [`Pwm`] drives one PWM slice made of an 8-bit integer clock divider, a
//! 16-bit counter wrapping at TOP and a compare level. The output is high
//! while the counter is below the compare level, so a level of `TOP + 1`
//! keeps it high for the whole period.
//!
//! Hardware support is provided by implementing [`PwmSlice`] for the slice
//! registers of a device:
//!
//! ```
//! use basis_hal::driver::Driver;
//! use basis_hal::pwm::{Pwm, PwmSlice};
//! use basis_hal::{Frequency, Percent};
//!
//! #[derive(Default)]
//! struct Slice {
//!     div: u8,
//!     top: u16,
//!     level: u16,
//! }
//!
//! impl PwmSlice for Slice {
//!     fn input_clock(&self) -> Frequency {
//!         Frequency::from_hz(125_000_000)
//!     }
//!     fn write_div_int(&mut self, value: u8) {
//!         self.div = value;
//!     }
//!     fn write_top(&mut self, value: u16) {
//!         self.top = value;
//!     }
//!     fn write_level(&mut self, value: u16) {
//!         self.level = value;
//!     }
//!     fn write_enable(&mut self, _: bool) {}
//! }
//!
//! let mut pwm = Driver::new(Pwm::new(Slice::default()));
//! pwm.settings().frequency = Frequency::from_hz(50);
//! pwm.settings().duty = Percent::from_ratio(1, 4);
//! pwm.initialize().unwrap();
//!
//! let slice = pwm.peripheral().slice();
//! assert_eq!(slice.div, 39);
//! assert_eq!(slice.top, 64_102);
//! assert_eq!(slice.level, 16_025);
//! ```

use core::fmt;

use basis_hal_common::frequency::{calculate_duty_cycle, closest, DividerRule};
use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};

use crate::driver::Initialize;
use crate::{Frequency, Percent};

/// Longest period the 16-bit counter can produce, in counter cycles.
///
/// TOP is at most `0xfffe`, so a compare level of `0xffff` can express a
/// 100% duty cycle.
const MAX_PERIOD: u16 = u16::MAX;

/// Register interface of a PWM slice.
pub trait PwmSlice {
    /// Frequency of the clock feeding the slice divider.
    fn input_clock(&self) -> Frequency;

    /// Sets the integer part of the clock divider.
    fn write_div_int(&mut self, value: u8);

    /// Sets the TOP register, the counter wraps after reaching it.
    fn write_top(&mut self, value: u16);

    /// Sets the compare level of the output channel.
    fn write_level(&mut self, value: u16);

    /// Enables or disables the slice.
    fn write_enable(&mut self, value: bool);
}

/// Generic settings of a PWM driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmSettings {
    /// Frequency of the output signal.
    pub frequency: Frequency,
    /// Share of each period the output is high.
    pub duty: Percent,
}

impl Default for PwmSettings {
    /// 1 kHz, 50%
    fn default() -> Self {
        Self {
            frequency: Frequency::from_hz(1_000),
            duty: Percent::from_ratio(1, 2),
        }
    }
}

/// Error type for PWM operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The requested frequency is zero.
    ZeroFrequency,
    /// No divider produces the requested frequency from the input clock.
    NoDivider,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroFrequency => f.write_str("pwm: zero frequency requested"),
            Error::NoDivider => f.write_str("pwm: frequency out of reach of the divider"),
        }
    }
}

impl embedded_hal::pwm::Error for Error {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// PWM driver for a single slice.
pub struct Pwm<S> {
    slice: S,
    period: u16,
}

impl<S: PwmSlice> Pwm<S> {
    /// Create a driver for `slice`. The slice is not touched until
    /// [`Driver::initialize`](crate::driver::Driver::initialize).
    pub fn new(slice: S) -> Self {
        Self { slice, period: 0 }
    }

    /// Counter cycles in one output period, 0 before initialization.
    pub fn period_cycles(&self) -> u16 {
        self.period
    }

    /// Set the duty cycle as a share of the period.
    pub fn set_percent(&mut self, duty: Percent) {
        let high = calculate_duty_cycle(u32::from(self.period), duty).high;
        // high <= period <= u16::MAX
        self.slice.write_level(high as u16);
    }

    /// Shared access to the slice registers.
    pub fn slice(&self) -> &S {
        &self.slice
    }

    /// Releases the slice.
    pub fn free(self) -> S {
        self.slice
    }
}

impl<S: PwmSlice> Initialize for Pwm<S> {
    type Settings = PwmSettings;
    type Error = Error;

    fn driver_initialize(&mut self, settings: &PwmSettings) -> Result<(), Error> {
        let input = self.slice.input_clock();

        if settings.frequency.hz() == 0 {
            return Err(Error::ZeroFrequency);
        }

        // Fastest counter whose period still fits the 16-bit counter. A limit
        // beyond 32 bits constrains no input clock.
        let counter_limit =
            (settings.frequency * MAX_PERIOD).unwrap_or(Frequency::from_hz(u32::MAX));
        let divider = closest(input, 1u8..=u8::MAX, counter_limit, DividerRule::Lower)
            .ok_or(Error::NoDivider)?;

        // a single cycle period cannot toggle the output
        let cycles = divider.frequency / settings.frequency;
        if cycles < 2 {
            return Err(Error::NoDivider);
        }
        // counter <= frequency * MAX_PERIOD, so cycles <= MAX_PERIOD
        let period = cycles as u16;

        self.slice.write_enable(false);
        self.slice.write_div_int(divider.divider);
        self.slice.write_top(period - 1);
        self.period = period;
        self.set_percent(settings.duty);
        self.slice.write_enable(true);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "pwm: {} Hz from {} Hz, div {}, period {}",
            settings.frequency.hz(),
            input.hz(),
            divider.divider,
            period
        );
        Ok(())
    }
}

impl<S: PwmSlice> ErrorType for Pwm<S> {
    type Error = Error;
}

impl<S: PwmSlice> SetDutyCycle for Pwm<S> {
    fn max_duty_cycle(&self) -> u16 {
        self.period
    }

    /// Values above [`max_duty_cycle`](SetDutyCycle::max_duty_cycle) are
    /// clamped to a fully-on output.
    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.slice.write_level(duty.min(self.period));
        Ok(())
    }
}
