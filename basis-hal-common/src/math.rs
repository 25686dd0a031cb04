//! Rounding and overflow-checked integer primitives
//!
//! Every division in this crate goes through [`rounding_division`], which
//! rounds to the nearest integer instead of truncating. Truncation would bias
//! every derived period and duty cycle low.

use crate::error::Error;
use crate::sealed::Sealed;

/// Integer types supported by the arithmetic primitives.
///
/// This trait is sealed and implemented for all primitive integers.
pub trait Integer: Copy + Ord + Sealed {
    /// Unsigned type of the same width, used for distances.
    type Unsigned: Copy + Ord;

    /// Divide and round to the nearest integer, ties away from zero.
    fn rounding_div(self, rhs: Self) -> Self;

    /// Unsigned absolute difference.
    fn distance(self, other: Self) -> Self::Unsigned;

    /// Multiplication returning `None` instead of wrapping.
    fn checked_multiply(self, rhs: Self) -> Option<Self>;
}

macro_rules! unsigned_integer {
    ($($t:ty),+) => {
        $(
            impl Sealed for $t {}

            impl Integer for $t {
                type Unsigned = $t;

                #[inline]
                fn rounding_div(self, rhs: Self) -> Self {
                    let quotient = self / rhs;
                    let remainder = self % rhs;
                    // `remainder * 2 >= rhs` without the doubling
                    if remainder >= rhs - remainder {
                        quotient + 1
                    } else {
                        quotient
                    }
                }

                #[inline]
                fn distance(self, other: Self) -> Self::Unsigned {
                    self.abs_diff(other)
                }

                #[inline]
                fn checked_multiply(self, rhs: Self) -> Option<Self> {
                    self.checked_mul(rhs)
                }
            }
        )+
    };
}

macro_rules! signed_integer {
    ($($t:ty => $u:ty),+) => {
        $(
            impl Sealed for $t {}

            impl Integer for $t {
                type Unsigned = $u;

                #[inline]
                fn rounding_div(self, rhs: Self) -> Self {
                    let negative = (self < 0) != (rhs < 0);
                    let magnitude = self.unsigned_abs().rounding_div(rhs.unsigned_abs());
                    // A magnitude of `MAX + 1` is `MIN` after the cast and survives
                    // `wrapping_neg`. Only `MIN / -1` wraps, as with native division.
                    if negative {
                        (magnitude as $t).wrapping_neg()
                    } else {
                        magnitude as $t
                    }
                }

                #[inline]
                fn distance(self, other: Self) -> Self::Unsigned {
                    self.abs_diff(other)
                }

                #[inline]
                fn checked_multiply(self, rhs: Self) -> Option<Self> {
                    self.checked_mul(rhs)
                }
            }
        )+
    };
}

unsigned_integer!(u8, u16, u32, u64, u128, usize);
signed_integer!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

/// Divide `numerator` by `denominator`, rounding to the nearest integer.
///
/// Ties round away from zero, so `rounding_division(5, 2) == 3` and
/// `rounding_division(-5, 2) == -3`. The computation never overflows.
///
/// # Panics
/// If `denominator` is zero, like native integer division.
#[inline]
pub fn rounding_division<T: Integer>(numerator: T, denominator: T) -> T {
    numerator.rounding_div(denominator)
}

/// Unsigned absolute difference between `a` and `b`.
#[inline]
pub fn distance<T: Integer>(a: T, b: T) -> T::Unsigned {
    a.distance(b)
}

/// Multiply `a` by `b`, failing with [`Error::Overflow`] instead of wrapping.
#[inline]
pub fn multiply<T: Integer>(a: T, b: T) -> Result<T, Error> {
    a.checked_multiply(b).ok_or(Error::Overflow)
}
