//! Peripheral drivers built on [`basis_hal_common`]
//!
//! This crate provides the generic [`driver`] lifecycle and drivers whose
//! registers are programmed from a requested frequency:
//!
//! - [`pwm`]: output frequency and duty cycle of a PWM slice
//! - [`uart`]: baud rate and frame format of a PL011 style UART
//!
//! Drivers talk to hardware through small register traits
//! ([`pwm::PwmSlice`], [`uart::UartRegisters`]) so the same code runs against
//! a device PAC or a test double.
//!
//! ## Crate features
//!
//! * **defmt** -
//!   Implement `defmt::Format` for several types and log driver initialization.

#![deny(missing_docs)]
#![no_std]

pub use basis_hal_common as common;
pub use fugit;

pub mod driver;
pub mod pwm;
pub mod uart;

pub use basis_hal_common::{DutyCycle, Frequency, Percent};
