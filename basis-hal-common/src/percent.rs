//! Saturating ratio in the range `[0, 1]`

use core::fmt;
use core::ops::Mul;

/// A ratio between 0 and 1, used to split a signal period.
///
/// Stored as a fixed-point value with 31 fractional bits, so 1.0 is
/// `1 << 31` and every ratio of two `u32` values is representable to within
/// one part in 2^31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Percent(u32);

impl Percent {
    const FRACTIONAL_BITS: u32 = 31;

    /// 0%
    pub const ZERO: Percent = Percent(0);
    /// 100%
    pub const MAX: Percent = Percent(1 << Self::FRACTIONAL_BITS);

    /// Create a percent from `numerator / denominator`.
    ///
    /// Ratios above 1 saturate to [`Percent::MAX`]. A zero denominator gives
    /// [`Percent::ZERO`] for a zero numerator and [`Percent::MAX`] otherwise.
    pub const fn from_ratio(numerator: u32, denominator: u32) -> Percent {
        if numerator >= denominator {
            if numerator == 0 {
                return Percent::ZERO;
            }
            return Percent::MAX;
        }
        // numerator < denominator, so the quotient is below 1 << 31
        let raw = ((numerator as u64) << Self::FRACTIONAL_BITS) / denominator as u64;
        Percent(raw as u32)
    }

    /// Create a percent from its raw fixed-point representation, saturating
    /// at [`Percent::MAX`].
    pub const fn from_raw(raw: u32) -> Percent {
        if raw > Self::MAX.0 {
            Self::MAX
        } else {
            Percent(raw)
        }
    }

    /// Raw fixed-point representation, `1 << 31` being 100%.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Scale `count` by this ratio, rounding down.
    ///
    /// The result never exceeds `count`.
    pub const fn scale(self, count: u32) -> u32 {
        ((count as u64 * self.0 as u64) >> Self::FRACTIONAL_BITS) as u32
    }

    /// The ratio as a floating point scaling factor in `[0.0, 1.0]`.
    pub fn as_f32(self) -> f32 {
        self.0 as f32 / Self::MAX.0 as f32
    }
}

impl Mul<Percent> for u32 {
    type Output = u32;

    #[inline]
    fn mul(self, rhs: Percent) -> u32 {
        rhs.scale(self)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // hundredths of a percent
        let basis_points = (self.0 as u64 * 10_000) >> Self::FRACTIONAL_BITS;
        write!(f, "{}.{:02}%", basis_points / 100, basis_points % 100)
    }
}
