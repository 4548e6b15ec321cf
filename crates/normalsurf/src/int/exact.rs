//! `ExactInt`: signed integer with a machine-word fast path.
//!
//! Invariant: a value is stored as `Large` only if it does not fit in an
//! `i64`. Every constructor goes through [`ExactInt::from_big`], which makes
//! the derived `PartialEq`/`Hash` agree with numeric equality.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Rem, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ExactInt {
    Native(i64),
    Large(BigInt),
}

impl ExactInt {
    pub const ZERO: ExactInt = ExactInt::Native(0);
    pub const ONE: ExactInt = ExactInt::Native(1);

    pub fn from_big(b: BigInt) -> Self {
        match b.to_i64() {
            Some(v) => ExactInt::Native(v),
            None => ExactInt::Large(b),
        }
    }

    pub fn to_big(&self) -> BigInt {
        match self {
            ExactInt::Native(v) => BigInt::from(*v),
            ExactInt::Large(b) => b.clone(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, ExactInt::Native(_))
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            ExactInt::Native(v) => Some(*v),
            ExactInt::Large(_) => None,
        }
    }

    pub fn to_i128(&self) -> Option<i128> {
        match self {
            ExactInt::Native(v) => Some(*v as i128),
            ExactInt::Large(b) => b.to_i128(),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, ExactInt::Native(0))
    }

    pub fn signum(&self) -> i32 {
        match self {
            ExactInt::Native(v) => v.signum() as i32,
            ExactInt::Large(b) => {
                if b.is_negative() {
                    -1
                } else {
                    1
                }
            }
        }
    }

    pub fn is_positive(&self) -> bool {
        self.signum() > 0
    }

    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    pub fn abs(&self) -> Self {
        match self {
            ExactInt::Native(v) => match v.checked_abs() {
                Some(a) => ExactInt::Native(a),
                None => ExactInt::from_big(BigInt::from(*v).abs()),
            },
            ExactInt::Large(b) => ExactInt::from_big(b.abs()),
        }
    }

    /// Non-negative gcd; `gcd(0, 0) == 0`.
    pub fn gcd(&self, other: &Self) -> Self {
        match (self, other) {
            (ExactInt::Native(a), ExactInt::Native(b)) if *a != i64::MIN && *b != i64::MIN => {
                ExactInt::Native(a.gcd(b))
            }
            _ => ExactInt::from_big(self.to_big().gcd(&other.to_big())),
        }
    }

    /// Least common multiple of absolute values.
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return ExactInt::ZERO;
        }
        let g = self.gcd(other);
        (self.abs() / &g) * other.abs()
    }

    /// Division known to be exact.
    pub fn div_exact(&self, other: &Self) -> Self {
        debug_assert!((self % other).is_zero());
        self / other
    }

    fn add_ref(&self, o: &Self) -> Self {
        if let (ExactInt::Native(a), ExactInt::Native(b)) = (self, o) {
            if let Some(v) = a.checked_add(*b) {
                return ExactInt::Native(v);
            }
        }
        ExactInt::from_big(self.to_big() + o.to_big())
    }

    fn sub_ref(&self, o: &Self) -> Self {
        if let (ExactInt::Native(a), ExactInt::Native(b)) = (self, o) {
            if let Some(v) = a.checked_sub(*b) {
                return ExactInt::Native(v);
            }
        }
        ExactInt::from_big(self.to_big() - o.to_big())
    }

    fn mul_ref(&self, o: &Self) -> Self {
        if let (ExactInt::Native(a), ExactInt::Native(b)) = (self, o) {
            if let Some(v) = a.checked_mul(*b) {
                return ExactInt::Native(v);
            }
        }
        ExactInt::from_big(self.to_big() * o.to_big())
    }

    // Truncating division, like the primitive types.
    fn div_ref(&self, o: &Self) -> Self {
        if let (ExactInt::Native(a), ExactInt::Native(b)) = (self, o) {
            if let Some(v) = a.checked_div(*b) {
                return ExactInt::Native(v);
            }
        }
        ExactInt::from_big(self.to_big() / o.to_big())
    }

    fn rem_ref(&self, o: &Self) -> Self {
        if let (ExactInt::Native(a), ExactInt::Native(b)) = (self, o) {
            if let Some(v) = a.checked_rem(*b) {
                return ExactInt::Native(v);
            }
        }
        ExactInt::from_big(self.to_big() % o.to_big())
    }

    fn neg_ref(&self) -> Self {
        match self {
            ExactInt::Native(v) => match v.checked_neg() {
                Some(n) => ExactInt::Native(n),
                None => ExactInt::from_big(-BigInt::from(*v)),
            },
            ExactInt::Large(b) => ExactInt::from_big(-b),
        }
    }
}

impl Default for ExactInt {
    fn default() -> Self {
        ExactInt::ZERO
    }
}

impl Ord for ExactInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ExactInt::Native(a), ExactInt::Native(b)) => a.cmp(b),
            _ => self.to_big().cmp(&other.to_big()),
        }
    }
}

impl PartialOrd for ExactInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

macro_rules! forward_binop {
    ($tr:ident, $method:ident, $inner:ident) => {
        impl $tr<&ExactInt> for &ExactInt {
            type Output = ExactInt;
            fn $method(self, rhs: &ExactInt) -> ExactInt {
                self.$inner(rhs)
            }
        }
        impl $tr<ExactInt> for ExactInt {
            type Output = ExactInt;
            fn $method(self, rhs: ExactInt) -> ExactInt {
                self.$inner(&rhs)
            }
        }
        impl $tr<&ExactInt> for ExactInt {
            type Output = ExactInt;
            fn $method(self, rhs: &ExactInt) -> ExactInt {
                self.$inner(rhs)
            }
        }
        impl $tr<ExactInt> for &ExactInt {
            type Output = ExactInt;
            fn $method(self, rhs: ExactInt) -> ExactInt {
                self.$inner(&rhs)
            }
        }
        impl $tr<i64> for ExactInt {
            type Output = ExactInt;
            fn $method(self, rhs: i64) -> ExactInt {
                self.$inner(&ExactInt::Native(rhs))
            }
        }
        impl $tr<i64> for &ExactInt {
            type Output = ExactInt;
            fn $method(self, rhs: i64) -> ExactInt {
                self.$inner(&ExactInt::Native(rhs))
            }
        }
    };
}

forward_binop!(Add, add, add_ref);
forward_binop!(Sub, sub, sub_ref);
forward_binop!(Mul, mul, mul_ref);
forward_binop!(Div, div, div_ref);
forward_binop!(Rem, rem, rem_ref);

impl AddAssign<&ExactInt> for ExactInt {
    fn add_assign(&mut self, rhs: &ExactInt) {
        *self = self.add_ref(rhs);
    }
}

impl AddAssign<ExactInt> for ExactInt {
    fn add_assign(&mut self, rhs: ExactInt) {
        *self = self.add_ref(&rhs);
    }
}

impl AddAssign<i64> for ExactInt {
    fn add_assign(&mut self, rhs: i64) {
        *self = self.add_ref(&ExactInt::Native(rhs));
    }
}

impl SubAssign<&ExactInt> for ExactInt {
    fn sub_assign(&mut self, rhs: &ExactInt) {
        *self = self.sub_ref(rhs);
    }
}

impl SubAssign<ExactInt> for ExactInt {
    fn sub_assign(&mut self, rhs: ExactInt) {
        *self = self.sub_ref(&rhs);
    }
}

impl MulAssign<&ExactInt> for ExactInt {
    fn mul_assign(&mut self, rhs: &ExactInt) {
        *self = self.mul_ref(rhs);
    }
}

impl Neg for ExactInt {
    type Output = ExactInt;
    fn neg(self) -> ExactInt {
        self.neg_ref()
    }
}

impl Neg for &ExactInt {
    type Output = ExactInt;
    fn neg(self) -> ExactInt {
        self.neg_ref()
    }
}

impl Zero for ExactInt {
    fn zero() -> Self {
        ExactInt::ZERO
    }
    fn is_zero(&self) -> bool {
        ExactInt::is_zero(self)
    }
}

impl One for ExactInt {
    fn one() -> Self {
        ExactInt::ONE
    }
}

impl Sum for ExactInt {
    fn sum<I: Iterator<Item = ExactInt>>(iter: I) -> Self {
        iter.fold(ExactInt::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a ExactInt> for ExactInt {
    fn sum<I: Iterator<Item = &'a ExactInt>>(iter: I) -> Self {
        iter.fold(ExactInt::ZERO, |acc, x| acc + x)
    }
}

impl From<i64> for ExactInt {
    fn from(v: i64) -> Self {
        ExactInt::Native(v)
    }
}

impl From<i32> for ExactInt {
    fn from(v: i32) -> Self {
        ExactInt::Native(v as i64)
    }
}

impl From<usize> for ExactInt {
    fn from(v: usize) -> Self {
        ExactInt::from_big(BigInt::from(v))
    }
}

impl From<i128> for ExactInt {
    fn from(v: i128) -> Self {
        ExactInt::from_big(BigInt::from(v))
    }
}

impl From<BigInt> for ExactInt {
    fn from(b: BigInt) -> Self {
        ExactInt::from_big(b)
    }
}

impl fmt::Display for ExactInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExactInt::Native(v) => write!(f, "{v}"),
            ExactInt::Large(b) => write!(f, "{b}"),
        }
    }
}

impl FromStr for ExactInt {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Ok(v) = t.parse::<i64>() {
            return Ok(ExactInt::Native(v));
        }
        t.parse::<BigInt>()
            .map(ExactInt::from_big)
            .map_err(|_| crate::Error::invalid(format!("not an integer: {s:?}")))
    }
}

impl From<ExactInt> for String {
    fn from(v: ExactInt) -> String {
        v.to_string()
    }
}

impl TryFrom<String> for ExactInt {
    type Error = crate::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
