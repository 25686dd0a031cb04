//! Frequencies, duty cycles and clock divider selection
//!
//! All conversions round to nearest through
//! [`rounding_division`](crate::math::rounding_division).

use core::fmt;
use core::ops::{Div, Mul};

use fugit::{Duration, NanosDurationU64, Rate};

use crate::error::Error;
use crate::math::{distance, multiply, rounding_division};
use crate::percent::Percent;
use crate::period::Period;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Cycle counts of the high and low side of one signal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyCycle {
    /// Number of cycles the signal stays in the HIGH state
    pub high: u32,
    /// Number of cycles the signal stays in the LOW state
    pub low: u32,
}

impl DutyCycle {
    /// Total cycles in one period.
    pub const fn total(&self) -> u64 {
        self.high as u64 + self.low as u64
    }
}

impl From<DutyCycle> for Percent {
    /// Ratio of high cycles to the total cycle count.
    ///
    /// When `high + low` does not fit a `u32` both sides are halved first.
    /// Halving keeps the ratio but drops the lowest bit of each side, so for
    /// odd inputs the result is off by at most one part in 2^31.
    fn from(cycle: DutyCycle) -> Percent {
        let total = cycle.total();
        if total > u32::MAX as u64 {
            Percent::from_ratio(cycle.high >> 1, (total >> 1) as u32)
        } else {
            Percent::from_ratio(cycle.high, total as u32)
        }
    }
}

/// Frequency of a periodic signal in hertz.
///
/// The default is 100 kHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frequency(u32);

impl Default for Frequency {
    fn default() -> Self {
        Frequency(100_000)
    }
}

impl Frequency {
    /// Create a frequency of `hz` hertz.
    pub const fn from_hz(hz: u32) -> Frequency {
        Frequency(hz)
    }

    /// Create a frequency of `khz` kilohertz, `None` if it does not fit.
    pub const fn from_khz(khz: u32) -> Option<Frequency> {
        match khz.checked_mul(1_000) {
            Some(hz) => Some(Frequency(hz)),
            None => None,
        }
    }

    /// Create a frequency of `mhz` megahertz, `None` if it does not fit.
    pub const fn from_mhz(mhz: u32) -> Option<Frequency> {
        match mhz.checked_mul(1_000_000) {
            Some(hz) => Some(Frequency(hz)),
            None => None,
        }
    }

    /// The frequency in hertz.
    pub const fn hz(self) -> u32 {
        self.0
    }

    /// Length of one cycle as a `fugit` duration of `1 / DENOM` seconds.
    ///
    /// # Panics
    /// If the frequency is zero.
    pub fn period<const DENOM: u32>(self) -> Duration<u64, 1, DENOM> {
        Duration::<u64, 1, DENOM>::from_ticks(rounding_division(DENOM as u64, self.0 as u64))
    }
}

impl<const NOM: u32, const DENOM: u32> From<Rate<u32, NOM, DENOM>> for Frequency {
    fn from(rate: Rate<u32, NOM, DENOM>) -> Self {
        Frequency(rate.to_Hz())
    }
}

impl From<Frequency> for fugit::HertzU32 {
    fn from(frequency: Frequency) -> Self {
        fugit::HertzU32::from_raw(frequency.0)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// Scale a frequency down by an integer divider.
///
/// # Panics
/// If the divider is zero.
impl Div<u32> for Frequency {
    type Output = Frequency;

    #[inline]
    fn div(self, divider: u32) -> Frequency {
        Frequency(rounding_division(self.0, divider))
    }
}

/// Divider needed to reach the right hand frequency from the left hand one,
/// i.e. the number of source cycles in one target cycle.
///
/// # Panics
/// If the target frequency is zero.
impl Div<Frequency> for Frequency {
    type Output = u32;

    #[inline]
    fn div(self, target: Frequency) -> u32 {
        rounding_division(self.0, target.0)
    }
}

macro_rules! scale_up {
    ($($t:ty),+) => {
        $(
            /// Scale a frequency up, failing with [`Error::Overflow`] if the
            /// result does not fit.
            impl Mul<$t> for Frequency {
                type Output = Result<Frequency, Error>;

                #[inline]
                fn mul(self, scalar: $t) -> Result<Frequency, Error> {
                    multiply(self.0, u32::from(scalar)).map(Frequency)
                }
            }
        )+
    };
}

scale_up!(u8, u16, u32);

macro_rules! scale_up_wide {
    ($($t:ty),+) => {
        $(
            /// Scale a frequency up, failing with [`Error::Overflow`] if the
            /// result does not fit.
            impl Mul<$t> for Frequency {
                type Output = Result<Frequency, Error>;

                #[inline]
                fn mul(self, scalar: $t) -> Result<Frequency, Error> {
                    // lossless, no scalar is wider than 128 bits
                    let hz = multiply(u128::from(self.0), scalar as u128)?;
                    u32::try_from(hz)
                        .map(Frequency)
                        .map_err(|_| Error::Overflow)
                }
            }
        )+
    };
}

scale_up_wide!(u64, u128, usize);

/// Number of cycles of `source` within `duration`.
///
/// This is what a timer needs to count to for the duration to elapse:
///
/// ```text
///                             / NOM   \
///   cycles = hz * |ticks| *  | ------- |
///                             \ DENOM /
/// ```
///
/// `fugit` durations are unsigned, so the tick count already is a magnitude
/// and the result is a `u64`. Negative cycle counts cannot be represented.
/// The product is carried in 128 bits and cannot overflow; a quotient that
/// does not fit 64 bits saturates to `u64::MAX`, which needs a duration of
/// more than 136 years at 4 GHz.
pub fn cycles_per<const NOM: u32, const DENOM: u32>(
    source: Frequency,
    duration: Duration<u64, NOM, DENOM>,
) -> u64 {
    let count = u128::from(duration.ticks()) * u128::from(source.0) * u128::from(NOM);
    let cycles = rounding_division(count, u128::from(DENOM));
    u64::try_from(cycles).unwrap_or(u64::MAX)
}

/// Length of a single cycle of `source`, in ticks of `P`.
///
/// ```
/// use basis_hal_common::frequency::{wavelength, Frequency};
/// use basis_hal_common::period::{Femtoseconds, Nanoseconds};
///
/// let clock = Frequency::from_hz(1_000_000);
/// assert_eq!(wavelength::<Femtoseconds>(clock), 1_000_000_000);
/// assert_eq!(wavelength::<Nanoseconds>(clock), 1_000);
/// ```
///
/// # Panics
/// If the frequency is zero.
pub fn wavelength<P: Period>(source: Frequency) -> u64 {
    // P::NUM is 1 for every period
    rounding_division(P::DEN, u64::from(source.0))
}

/// Time it takes `source` to oscillate `cycles` times.
///
/// `cycles` is unsigned like the returned `fugit` duration, so negative
/// counts cannot be represented.
///
/// # Panics
/// If the frequency is zero.
pub fn duration_from_cycles(source: Frequency, cycles: u32) -> NanosDurationU64 {
    // u32::MAX * 10^9 < 2^62
    let numerator = u64::from(cycles) * NANOS_PER_SECOND;
    NanosDurationU64::from_ticks(rounding_division(numerator, u64::from(source.0)))
}

/// Split `cycles` into a duty cycle with `percent` of them high.
///
/// The high side is rounded down, so `high <= cycles` always holds.
pub fn calculate_duty_cycle(cycles: u32, percent: Percent) -> DutyCycle {
    let high = cycles * percent;
    DutyCycle {
        high,
        low: cycles - high,
    }
}

/// Duty cycle of a signal with a period of `duration`, clocked by `source`.
///
/// Fails with [`Error::ValueTooLarge`] if the period is longer than
/// `u32::MAX` cycles of `source`.
pub fn calculate_duty_cycle_for_duration<const NOM: u32, const DENOM: u32>(
    source: Frequency,
    duration: Duration<u64, NOM, DENOM>,
    percent: Percent,
) -> Result<DutyCycle, Error> {
    let cycles = cycles_per(source, duration);
    let cycles = u32::try_from(cycles).map_err(|_| Error::ValueTooLarge)?;
    Ok(calculate_duty_cycle(cycles, percent))
}

/// Which divided-down frequencies a divider search may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DividerRule {
    /// Only frequencies at or above the target.
    Higher,
    /// Only frequencies at or below the target.
    Lower,
    /// Any frequency.
    #[default]
    Closest,
}

impl DividerRule {
    /// Whether `candidate` is eligible when aiming for `target`.
    pub fn accepts(self, candidate: Frequency, target: Frequency) -> bool {
        match self {
            DividerRule::Higher => candidate >= target,
            DividerRule::Lower => candidate <= target,
            DividerRule::Closest => true,
        }
    }
}

/// A divider picked by [`closest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Candidate<D> {
    /// Position of the divider in the searched sequence.
    pub index: usize,
    /// The divider itself.
    pub divider: D,
    /// `source / divider`
    pub frequency: Frequency,
}

/// Find the divider that brings `source` closest to `target` under `rule`.
///
/// Dividers are scanned in order and the first one with the smallest distance
/// to the target wins. A divider of zero is never eligible. Returns `None`
/// if `dividers` is empty or no divider satisfies `rule`.
///
/// ```
/// use basis_hal_common::frequency::{closest, DividerRule, Frequency};
///
/// let source = Frequency::from_hz(1_000_000);
/// let target = Frequency::from_hz(70_000);
/// let best = closest(source, [1u8, 2, 4, 8, 16], target, DividerRule::Higher).unwrap();
/// assert_eq!(best.index, 3);
/// assert_eq!(best.divider, 8);
/// ```
pub fn closest<I>(
    source: Frequency,
    dividers: I,
    target: Frequency,
    rule: DividerRule,
) -> Option<Candidate<I::Item>>
where
    I: IntoIterator,
    I::Item: Copy + Into<u32>,
{
    let mut best: Option<(u32, Candidate<I::Item>)> = None;

    for (index, divider) in dividers.into_iter().enumerate() {
        let raw: u32 = divider.into();
        if raw == 0 {
            continue;
        }

        let frequency = source / raw;
        if !rule.accepts(frequency, target) {
            continue;
        }

        let cost = distance(frequency.hz(), target.hz());
        if best.as_ref().map_or(true, |(best_cost, _)| cost < *best_cost) {
            best = Some((
                cost,
                Candidate {
                    index,
                    divider,
                    frequency,
                },
            ));
        }
    }

    best.map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{Attoseconds, Femtoseconds, Nanoseconds, Seconds};
    use fugit::{MillisDurationU64, SecsDurationU64};

    const DIVIDERS: [u32; 5] = [1, 2, 4, 8, 16];

    fn hz(value: u32) -> Frequency {
        Frequency::from_hz(value)
    }

    #[test]
    fn default_is_100_khz() {
        assert_eq!(Frequency::default().hz(), 100_000);
    }

    #[test]
    fn unit_constructors() {
        assert_eq!(Frequency::from_khz(20), Some(hz(20_000)));
        assert_eq!(Frequency::from_mhz(42), Some(hz(42_000_000)));
        assert_eq!(Frequency::from_mhz(5_000), None);
    }

    #[test]
    fn fugit_conversions() {
        let rate = fugit::HertzU32::from_raw(48_000_000);
        assert_eq!(Frequency::from(rate), hz(48_000_000));
        assert_eq!(fugit::HertzU32::from(hz(12_000)).raw(), 12_000);
    }

    #[test]
    fn ordered_by_value() {
        assert!(hz(62_500) < hz(70_000));
        assert!(hz(125_000) > hz(70_000));
        assert_eq!(hz(1).max(hz(2)), hz(2));
    }

    #[test]
    fn scale_down_rounds() {
        assert_eq!(hz(1_000_000) / 3, hz(333_333));
        assert_eq!(hz(1_000_001) / 2, hz(500_001));
        assert_eq!(hz(1_000_000) / 16, hz(62_500));
    }

    #[test]
    fn divider_between_frequencies_rounds() {
        assert_eq!(hz(12_000_000) / hz(115_200), 104);
        assert_eq!(hz(12_000_000) / hz(1_000_000), 12);
        assert_eq!(hz(10) / hz(4), 3);
    }

    #[test]
    fn scale_up_is_checked() {
        assert_eq!(hz(100_000) * 2u8, Ok(hz(200_000)));
        assert_eq!(hz(1_000) * 1_000u16, Ok(hz(1_000_000)));
        assert_eq!(hz(u32::MAX) * 1u32, Ok(hz(u32::MAX)));
        assert_eq!(hz(u32::MAX) * 2u32, Err(Error::Overflow));
        assert_eq!(hz(2) * (1u64 << 31), Err(Error::Overflow));
        assert_eq!(hz(1) * u64::MAX, Err(Error::Overflow));
        assert_eq!(hz(3) * 5u64, Ok(hz(15)));
        assert_eq!(hz(0) * u128::MAX, Ok(hz(0)));
        assert_eq!(hz(1) * (1u128 << 32), Err(Error::Overflow));
        assert_eq!(hz(1_000) * 48usize, Ok(hz(48_000)));
        assert_eq!(hz(u32::MAX) * 2usize, Err(Error::Overflow));
    }

    #[test]
    fn cycles_per_duration() {
        assert_eq!(cycles_per(hz(12_000_000), MillisDurationU64::from_ticks(1)), 12_000);
        assert_eq!(cycles_per(hz(100_000), SecsDurationU64::from_ticks(5)), 500_000);
        // 1.5 cycles rounds up
        assert_eq!(cycles_per(hz(1_000_000), NanosDurationU64::from_ticks(1_500)), 2);
        assert_eq!(cycles_per(hz(1_000_000), NanosDurationU64::from_ticks(1_499)), 1);
        assert_eq!(cycles_per(hz(1_000_000), NanosDurationU64::from_ticks(0)), 0);
    }

    #[test]
    fn cycles_per_duration_with_numerator() {
        let minutes = Duration::<u64, 60, 1>::from_ticks(2);
        assert_eq!(cycles_per(hz(10), minutes), 1_200);
    }

    #[test]
    fn cycles_per_saturates() {
        let forever = SecsDurationU64::from_ticks(u64::MAX);
        assert_eq!(cycles_per(hz(u32::MAX), forever), u64::MAX);
    }

    #[test]
    fn wavelength_in_unit_periods() {
        assert_eq!(wavelength::<Femtoseconds>(hz(1_000_000)), 1_000_000_000);
        assert_eq!(wavelength::<Nanoseconds>(hz(3)), 333_333_333);
        assert_eq!(wavelength::<Seconds>(hz(1)), 1);
        assert_eq!(wavelength::<Seconds>(hz(3)), 0);
        assert_eq!(wavelength::<Attoseconds>(hz(1)), 1_000_000_000_000_000_000);
    }

    #[test]
    fn period_as_fugit_duration() {
        assert_eq!(hz(1_000).period::<1_000_000>().ticks(), 1_000);
        assert_eq!(hz(3).period::<1_000_000_000>().ticks(), 333_333_333);
    }

    #[test]
    fn duration_from_cycle_count() {
        assert_eq!(duration_from_cycles(hz(12_000_000), 12).ticks(), 1_000);
        assert_eq!(duration_from_cycles(hz(3), 1).ticks(), 333_333_333);
        assert_eq!(
            duration_from_cycles(hz(1), u32::MAX).ticks(),
            u32::MAX as u64 * 1_000_000_000
        );
    }

    #[test]
    fn duty_cycle_from_cycles() {
        assert_eq!(
            calculate_duty_cycle(10, Percent::from_ratio(1, 2)),
            DutyCycle { high: 5, low: 5 }
        );
        assert_eq!(
            calculate_duty_cycle(10, Percent::from_ratio(1, 3)),
            DutyCycle { high: 3, low: 7 }
        );
        assert_eq!(
            calculate_duty_cycle(u32::MAX, Percent::MAX),
            DutyCycle {
                high: u32::MAX,
                low: 0
            }
        );
        assert_eq!(
            calculate_duty_cycle(0, Percent::from_ratio(1, 2)),
            DutyCycle { high: 0, low: 0 }
        );
    }

    #[test]
    fn duty_cycle_from_duration() {
        assert_eq!(
            calculate_duty_cycle_for_duration(
                hz(12_000_000),
                MillisDurationU64::from_ticks(1),
                Percent::from_ratio(1, 4)
            ),
            Ok(DutyCycle {
                high: 3_000,
                low: 9_000
            })
        );
    }

    #[test]
    fn duty_cycle_from_long_duration_is_rejected() {
        assert_eq!(
            calculate_duty_cycle_for_duration(
                hz(u32::MAX),
                SecsDurationU64::from_ticks(2),
                Percent::from_ratio(1, 2)
            ),
            Err(Error::ValueTooLarge)
        );
        // exactly u32::MAX cycles still fits
        assert_eq!(
            calculate_duty_cycle_for_duration(
                hz(u32::MAX),
                SecsDurationU64::from_ticks(1),
                Percent::ZERO
            ),
            Ok(DutyCycle {
                high: 0,
                low: u32::MAX
            })
        );
    }

    #[test]
    fn duty_cycle_to_percent() {
        let percent = Percent::from(DutyCycle { high: 1, low: 3 });
        assert_eq!(percent, Percent::from_ratio(1, 4));
        assert_eq!(Percent::from(DutyCycle { high: 0, low: 0 }), Percent::ZERO);
        assert_eq!(Percent::from(DutyCycle { high: 7, low: 0 }), Percent::MAX);
    }

    #[test]
    fn duty_cycle_to_percent_halves_on_overflow() {
        let percent = Percent::from(DutyCycle {
            high: u32::MAX,
            low: u32::MAX,
        });
        let half = Percent::from_ratio(1, 2);
        assert!(percent.raw().abs_diff(half.raw()) <= 1);

        let percent = Percent::from(DutyCycle {
            high: u32::MAX,
            low: 1,
        });
        assert!(percent.raw() > Percent::from_ratio(999_999, 1_000_000).raw());
    }

    #[test]
    fn duty_cycle_round_trip() {
        let cycles = [
            (5, 5),
            (3, 7),
            (1, 0),
            (0, 9),
            (12_345, 67_890),
            (1_000_000, 3),
            (1 << 30, (1 << 30) - 1),
        ];
        for (high, low) in cycles {
            let duty = DutyCycle { high, low };
            let percent = Percent::from(duty);
            let back = calculate_duty_cycle(high + low, percent);
            assert!(back.high.abs_diff(high) <= 1, "{:?} became {:?}", duty, back);
            assert_eq!(back.high + back.low, high + low);
        }
    }

    #[test]
    fn closest_picks_nearest_divider() {
        let best = closest(hz(1_000_000), DIVIDERS, hz(70_000), DividerRule::Closest).unwrap();
        assert_eq!(best.divider, 16);
        assert_eq!(best.index, 4);
        assert_eq!(best.frequency, hz(62_500));
    }

    #[test]
    fn closest_lower_only_accepts_slower_candidates() {
        let best = closest(hz(1_000_000), DIVIDERS, hz(70_000), DividerRule::Lower).unwrap();
        assert_eq!(best.divider, 16);
    }

    #[test]
    fn closest_higher_only_accepts_faster_candidates() {
        let best = closest(hz(1_000_000), DIVIDERS, hz(70_000), DividerRule::Higher).unwrap();
        assert_eq!(best.divider, 8);
        assert_eq!(best.frequency, hz(125_000));
    }

    #[test]
    fn closest_exact_match() {
        let best = closest(hz(12_000_000), 1u8..=255, hz(1_000_000), DividerRule::Higher).unwrap();
        assert_eq!(best.divider, 12);
        assert_eq!(best.index, 11);
    }

    #[test]
    fn closest_without_solution() {
        let empty: [u16; 0] = [];
        assert_eq!(closest(hz(1_000_000), empty, hz(70_000), DividerRule::Closest), None);
        assert_eq!(closest(hz(1_000_000), [1u32, 2], hz(1_000), DividerRule::Lower), None);
        assert_eq!(closest(hz(1_000), [1u32, 2], hz(2_000), DividerRule::Higher), None);
    }

    #[test]
    fn closest_first_seen_wins_ties() {
        // 100 / 3 = 33 and 100 / 4 = 25 are both 4 away from 29
        let best = closest(hz(100), [3u8, 4], hz(29), DividerRule::Closest).unwrap();
        assert_eq!(best.divider, 3);
        let best = closest(hz(100), [4u8, 3], hz(29), DividerRule::Closest).unwrap();
        assert_eq!(best.divider, 4);
    }

    #[test]
    fn closest_skips_zero_divider() {
        let best = closest(hz(1_000), [0u8, 2], hz(1_000), DividerRule::Closest).unwrap();
        assert_eq!(best.index, 1);
    }
}
