//! Exact rational duration algebra.
//!
//! Every timing value in a compiled pattern is a [`Duration`] — an exact
//! fraction, never a float. Nested subdivision routinely needs values like
//! `1/3` that have no exact binary floating-point representation, so all
//! arithmetic here is delegated to `num_rational::Rational64`: reduction to
//! lowest terms, least-common-multiple denominators on addition, and
//! ordering all come from the crate rather than a hand-rolled `gcd`.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// An exact non-negative* rational duration `num / den`, `den > 0`, always
/// kept in lowest terms.
///
/// (*Signed intermediates can appear transiently inside subtraction; a
/// well-formed pattern never exposes a negative `Duration` externally.)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Duration {
    pub num: i64,
    pub den: i64,
}

impl Duration {
    /// Constructs a reduced `Duration`. Panics if `den == 0` — this is a
    /// programmer error, not a recoverable condition, matching
    /// `num_rational::Ratio::new`'s own panic on a zero denominator.
    pub fn new(num: i64, den: i64) -> Self {
        Self::from_ratio(Rational64::new(num, den))
    }

    fn from_ratio(r: Rational64) -> Self {
        Self {
            num: *r.numer(),
            den: *r.denom(),
        }
    }

    /// Reconstitutes the already-reduced `(num, den)` pair as a `Rational64`
    /// for arithmetic, without paying for another reduction pass.
    fn as_ratio(self) -> Rational64 {
        Rational64::new_raw(self.num, self.den)
    }

    /// Divide an integer by a duration: `n / self`.
    pub fn rdiv(self, n: i64) -> Duration {
        Duration::from_ratio(Rational64::from_integer(n) / self.as_ratio())
    }

    pub fn is_zero(self) -> bool {
        self.num == 0
    }
}

pub const BAR: Duration = Duration { num: 1, den: 1 };
pub const HALF: Duration = Duration { num: 1, den: 2 };
pub const QUARTER: Duration = Duration { num: 1, den: 4 };
pub const EIGHTH: Duration = Duration { num: 1, den: 8 };
pub const SIXTEENTH: Duration = Duration { num: 1, den: 16 };
pub const ZERO: Duration = Duration { num: 0, den: 1 };

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_ratio(self.as_ratio() + rhs.as_ratio())
    }
}

impl Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration::from_ratio(self.as_ratio() - rhs.as_ratio())
    }
}

impl Mul for Duration {
    type Output = Duration;
    fn mul(self, rhs: Duration) -> Duration {
        Duration::from_ratio(self.as_ratio() * rhs.as_ratio())
    }
}

impl Mul<i64> for Duration {
    type Output = Duration;
    fn mul(self, rhs: i64) -> Duration {
        Duration::from_ratio(self.as_ratio() * rhs)
    }
}

impl Div for Duration {
    type Output = Duration;
    fn div(self, rhs: Duration) -> Duration {
        Duration::from_ratio(self.as_ratio() / rhs.as_ratio())
    }
}

impl Div<i64> for Duration {
    type Output = Duration;
    fn div(self, rhs: i64) -> Duration {
        assert!(rhs > 0, "Duration divisor must be a positive integer");
        Duration::from_ratio(self.as_ratio() / rhs)
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.as_ratio() == other.as_ratio()
    }
}
impl Eq for Duration {}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_ratio().cmp(&other.as_ratio())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Self {
        iter.fold(ZERO, |acc, d| acc + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_on_construction() {
        assert_eq!(Duration::new(2, 4), Duration::new(1, 2));
    }

    #[test]
    fn equality_ignores_representation() {
        assert_eq!(Duration::new(2, 4), HALF);
    }

    #[test]
    fn add_sub_mul_div() {
        assert_eq!(Duration::new(1, 3) + Duration::new(1, 3) + Duration::new(1, 3), BAR);
        assert_eq!(BAR - HALF, HALF);
        assert_eq!(HALF * Duration::new(2, 1), BAR);
        assert_eq!(BAR / 4, QUARTER);
        assert_eq!(BAR / Duration::new(1, 3), Duration::new(3, 1));
    }

    #[test]
    fn division_distributes_and_inverts() {
        let a = Duration::new(2, 3);
        let b = Duration::new(5, 7);
        assert_eq!((a / b) * b, a);
    }

    #[test]
    fn addition_is_commutative_and_associative() {
        let a = Duration::new(1, 3);
        let b = Duration::new(1, 4);
        let c = Duration::new(1, 6);
        assert_eq!(a + b, b + a);
        assert_eq!((a + b) + c, a + (b + c));
    }

    #[test]
    fn multiplication_distributes_over_addition() {
        let a = Duration::new(2, 5);
        let b = Duration::new(1, 3);
        let c = Duration::new(1, 6);
        assert_eq!(a * (b + c), (a * b) + (a * c));
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Duration::new(1, 3) > Duration::new(1, 4));
        assert!(Duration::new(1, 2) == Duration::new(2, 4));
    }

    #[test]
    fn rdiv_matches_int_over_duration() {
        assert_eq!(HALF.rdiv(1), Duration::new(2, 1));
    }

    #[test]
    #[should_panic]
    fn zero_denominator_panics() {
        let _ = Duration::new(1, 0);
    }

    #[test]
    fn addition_does_not_overflow_on_large_equal_denominators() {
        // A naive `self.den * rhs.den` cross-multiply would compute a 2^64
        // denominator here and overflow `i64`; `Rational64`'s LCM-based add
        // recognizes the shared denominator and keeps it at 2^32.
        let big = 1_i64 << 32;
        let a = Duration::new(1, big);
        let b = Duration::new(1, big);
        assert_eq!(a + b, Duration::new(1, big / 2));
    }
}
