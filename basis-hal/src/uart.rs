//! Universal Asynchronous Receiver Transmitter (UART)
//!
//! A [`Uart`] programs a PL011 style UART with a fractional baud rate divider
//! and 16x oversampling. Hardware support is provided by implementing
//! [`UartRegisters`] for the UART block of a device.
//!
//! ```
//! use basis_hal::driver::Driver;
//! use basis_hal::uart::{common_configs, Uart, UartRegisters};
//! use basis_hal::Frequency;
//! use basis_hal_common::uart::{DataBits, Parity, StopBits};
//!
//! #[derive(Default)]
//! struct Block {
//!     divisors: (u16, u8),
//! }
//!
//! impl UartRegisters for Block {
//!     fn input_clock(&self) -> Frequency {
//!         Frequency::from_hz(125_000_000)
//!     }
//!     fn write_divisors(&mut self, integer: u16, fraction: u8) {
//!         self.divisors = (integer, fraction);
//!     }
//!     fn write_format(&mut self, _: DataBits, _: StopBits, _: Option<Parity>) {}
//!     fn write_enable(&mut self, _: bool) {}
//!     fn is_writable(&self) -> bool {
//!         true
//!     }
//!     fn write_data(&mut self, _: u8) {}
//! }
//!
//! let mut uart = Driver::new(Uart::new(Block::default()));
//! *uart.settings() = common_configs::_9600_8_N_1;
//! uart.initialize().unwrap();
//! assert_eq!(uart.peripheral().registers().divisors, (813, 51));
//! uart.peripheral_mut().write_full_blocking(b"Hello World!\r\n");
//! ```

use core::convert::Infallible;
use core::fmt;

use basis_hal_common::uart::BaudDivider;
use nb::Error::WouldBlock;

#[doc(inline)]
pub use basis_hal_common::uart::{DataBits, Parity, StopBits, UartConfig};

use crate::driver::Initialize;
use crate::Frequency;

pub mod common_configs;

/// Register interface of a UART block.
pub trait UartRegisters {
    /// Frequency of the clock feeding the baud rate generator.
    fn input_clock(&self) -> Frequency;

    /// Load the integer and fractional (64ths) baud rate divisors.
    fn write_divisors(&mut self, integer: u16, fraction: u8);

    /// Set the frame format.
    fn write_format(&mut self, data_bits: DataBits, stop_bits: StopBits, parity: Option<Parity>);

    /// Enable or disable the UART.
    fn write_enable(&mut self, value: bool);

    /// Whether the transmit FIFO can take another byte.
    fn is_writable(&self) -> bool;

    /// Push a byte into the transmit FIFO.
    fn write_data(&mut self, byte: u8);
}

/// Error type for UART operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bad argument : a zero baud rate, ...
    BadArgument,
    /// The baud rate divider cannot be computed for the input clock.
    Arithmetic(basis_hal_common::Error),
}

impl From<basis_hal_common::Error> for Error {
    fn from(error: basis_hal_common::Error) -> Self {
        Error::Arithmetic(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadArgument => f.write_str("uart: bad argument"),
            Error::Arithmetic(error) => write!(f, "uart: {}", error),
        }
    }
}

/// UART driver.
pub struct Uart<R> {
    registers: R,
    baudrate: Option<Frequency>,
}

impl<R: UartRegisters> Uart<R> {
    /// Create a driver for `registers`. The UART is not touched until
    /// [`Driver::initialize`](crate::driver::Driver::initialize).
    pub fn new(registers: R) -> Self {
        Self {
            registers,
            baudrate: None,
        }
    }

    /// Baud rate actually produced by the programmed divider, `None` before
    /// the first successful initialization.
    pub fn baudrate(&self) -> Option<Frequency> {
        self.baudrate
    }

    /// Shared access to the UART registers.
    pub fn registers(&self) -> &R {
        &self.registers
    }

    /// Releases the UART registers.
    pub fn free(self) -> R {
        self.registers
    }

    /// Writes a single byte, `WouldBlock` while the FIFO is full.
    pub fn write_byte(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if !self.registers.is_writable() {
            return Err(WouldBlock);
        }
        self.registers.write_data(byte);
        Ok(())
    }

    /// Writes bytes to the UART.
    /// This function writes as long as it can. As soon that the FIFO is full, if :
    /// - 0 bytes were written, a WouldBlock Error is returned
    /// - some bytes were written, it is deemed to be a success
    /// Upon success, the remaining slice is returned.
    pub fn write_raw<'d>(&mut self, data: &'d [u8]) -> nb::Result<&'d [u8], Infallible> {
        let mut bytes_written = 0;

        for byte in data {
            if !self.registers.is_writable() {
                if bytes_written == 0 {
                    return Err(WouldBlock);
                } else {
                    return Ok(&data[bytes_written..]);
                }
            }

            self.registers.write_data(*byte);
            bytes_written += 1;
        }
        Ok(&data[bytes_written..])
    }

    /// Writes bytes to the UART.
    /// This function blocks until the full buffer has been sent.
    pub fn write_full_blocking(&mut self, data: &[u8]) {
        let mut temp = data;

        while !temp.is_empty() {
            temp = match self.write_raw(temp) {
                Ok(remaining) => remaining,
                Err(WouldBlock) => continue,
                Err(nb::Error::Other(infallible)) => match infallible {},
            }
        }
    }
}

impl<R: UartRegisters> Initialize for Uart<R> {
    type Settings = UartConfig;
    type Error = Error;

    fn driver_initialize(&mut self, config: &UartConfig) -> Result<(), Error> {
        let wanted = Frequency::from(config.baudrate);
        if wanted.hz() == 0 {
            return Err(Error::BadArgument);
        }

        let clock = self.registers.input_clock();
        let divider = BaudDivider::calculate(clock, wanted)?;
        let achieved = divider.baudrate(clock)?;

        self.registers.write_enable(false);
        self.registers.write_divisors(divider.integer, divider.fraction);
        self.registers
            .write_format(config.data_bits, config.stop_bits, config.parity);
        self.registers.write_enable(true);
        self.baudrate = Some(achieved);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "uart: wanted {} baud, got {} baud",
            wanted.hz(),
            achieved.hz()
        );
        Ok(())
    }
}

impl<R: UartRegisters> fmt::Write for Uart<R> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.bytes()
            .try_for_each(|c| nb::block!(self.write_byte(c)))
            .map_err(|_| fmt::Error)
    }
}
