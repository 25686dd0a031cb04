//! Unit periods accepted by [`wavelength`](crate::frequency::wavelength)
//!
//! Wavelength arithmetic assumes a period of `1 / DEN` seconds. [`Period`] is
//! sealed and only implemented for the types below, each of which is checked
//! when this crate is built.

use crate::sealed::Sealed;

/// Largest supported period denominator.
pub const MAX_DEN: u64 = 1_000_000_000_000_000_000;

/// A period of `NUM / DEN` seconds with `NUM == 1` and `DEN <= 10^18`.
pub trait Period: Sealed {
    /// Numerator of the period in seconds, always 1.
    const NUM: u64;
    /// Denominator of the period in seconds.
    const DEN: u64;
}

macro_rules! unit_period {
    ($($(#[$attr:meta])* $name:ident => $den:expr),+ $(,)?) => {
        $(
            $(#[$attr])*
            #[derive(Debug)]
            pub enum $name {}

            impl Sealed for $name {}

            impl Period for $name {
                const NUM: u64 = 1;
                const DEN: u64 = $den;
            }

            const _: () = assert!(
                <$name as Period>::NUM == 1 && <$name as Period>::DEN <= MAX_DEN,
                "unit periods need a numerator of 1 and a denominator of at most 10^18",
            );
        )+
    };
}

unit_period! {
    /// 1 s
    Seconds => 1,
    /// 10^-3 s
    Milliseconds => 1_000,
    /// 10^-6 s
    Microseconds => 1_000_000,
    /// 10^-9 s
    Nanoseconds => 1_000_000_000,
    /// 10^-12 s
    Picoseconds => 1_000_000_000_000,
    /// 10^-15 s
    Femtoseconds => 1_000_000_000_000_000,
    /// 10^-18 s
    Attoseconds => MAX_DEN,
}
