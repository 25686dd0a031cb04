//! Common HAL code
//!
//! This library contains the timing and frequency arithmetic shared by every
//! basis-hal driver: rounding and overflow-checked integer primitives, the
//! [`Frequency`] and [`DutyCycle`] value types, and the divider search used to
//! program hardware clock dividers.
//!
//! Nothing in here touches hardware, allocates or blocks, so every function
//! can be called from interrupt context.
//!
//! ```
//! use basis_hal_common::frequency::{closest, DividerRule, Frequency};
//!
//! let source = Frequency::from_hz(1_000_000);
//! let target = Frequency::from_hz(70_000);
//! let best = closest(source, [1u8, 2, 4, 8, 16], target, DividerRule::Closest).unwrap();
//! assert_eq!(best.divider, 16);
//! assert_eq!(best.frequency, Frequency::from_hz(62_500));
//! ```

#![deny(missing_docs)]
#![no_std]

pub mod error;
pub mod frequency;
pub mod math;
pub mod percent;
pub mod period;
pub mod uart;

mod sealed {
    pub trait Sealed {}
}

pub use error::{Error, ResultExt, Tagged};
pub use frequency::{DutyCycle, Frequency};
pub use percent::Percent;
