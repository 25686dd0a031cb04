//! Useful UART types and the PL011 style fractional baud rate divider

use fugit::HertzU32;

use crate::error::Error;
use crate::frequency::Frequency;
use crate::math::{multiply, rounding_division};

/// Data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 5 bits
    Five,
    /// 6 bits
    Six,
    /// 7 bits
    Seven,
    /// 8 bits
    Eight,
}

/// Stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 bit
    One,
    /// 2 bits
    Two,
}

/// Parity
///
/// The "none" state of parity is represented with the Option type (None).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// Odd parity
    Odd,
    /// Even parity
    Even,
}

/// Generic settings of a UART driver.
///
/// The `Default` implementation is 115 200 baud, 8 data bits, no parity and
/// one stop bit.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// The baudrate the uart will run at.
    pub baudrate: HertzU32,

    /// The amount of data bits the uart should be configured to.
    pub data_bits: DataBits,

    /// The amount of stop bits the uart should be configured to.
    pub stop_bits: StopBits,

    /// The parity that this uart should have
    pub parity: Option<Parity>,
}

impl UartConfig {
    /// Create a new instance of UartConfig
    pub const fn new(
        baudrate: HertzU32,
        data_bits: DataBits,
        parity: Option<Parity>,
        stop_bits: StopBits,
    ) -> UartConfig {
        UartConfig {
            baudrate,
            data_bits,
            stop_bits,
            parity,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: HertzU32::from_raw(115_200),
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: None,
        }
    }
}

/// Fractional baud rate divider: `clock / (16 * baud) = integer + fraction / 64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudDivider {
    /// Integer part, `1..=65535`
    pub integer: u16,
    /// Fractional part in 64ths, `0..=63`
    pub fraction: u8,
}

impl BaudDivider {
    const FRACTION_BITS: u32 = 6;

    /// Find the divider that gets `clock` closest to `baudrate`.
    ///
    /// Dividers below 1 are clamped to 1 and dividers above 65535 to 65535,
    /// as the hardware cannot express them. Fails with [`Error::Overflow`] if
    /// `clock * 4` does not fit 32 bits.
    ///
    /// # Panics
    /// If `baudrate` is zero.
    pub fn calculate(clock: Frequency, baudrate: Frequency) -> Result<BaudDivider, Error> {
        // 16x oversampling and 6 fractional bits: 64 / 16 = 4
        let scaled_clock = multiply(clock.hz(), 4)?;
        let divider = rounding_division(scaled_clock, baudrate.hz());

        Ok(match divider >> Self::FRACTION_BITS {
            0 => BaudDivider {
                integer: 1,
                fraction: 0,
            },
            integer if integer >= u16::MAX as u32 => BaudDivider {
                integer: u16::MAX,
                fraction: 0,
            },
            integer => BaudDivider {
                integer: integer as u16,
                fraction: (divider & 0x3f) as u8,
            },
        })
    }

    /// Baud rate produced by this divider when fed with `clock`.
    pub fn baudrate(&self, clock: Frequency) -> Result<Frequency, Error> {
        let scaled_clock = multiply(clock.hz(), 4)?;
        let divider = (u32::from(self.integer) << Self::FRACTION_BITS) | u32::from(self.fraction);
        Ok(Frequency::from_hz(rounding_division(scaled_clock, divider)))
    }
}
