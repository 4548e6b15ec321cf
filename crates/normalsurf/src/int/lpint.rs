//! Integer types the LP tableau can run in.
//!
//! Every operation is checked: a fixed-width type reports
//! `Error::IntegerOverflow` instead of wrapping, so the caller can retry in a
//! wider type.

use std::fmt::Debug;

use num_integer::Integer;

use super::ExactInt;
use crate::{Error, Result};

pub trait LpInt: Clone + Debug + PartialEq + Eq + PartialOrd + Ord + Send + Sync + 'static {
    const NAME: &'static str;

    fn from_i64(v: i64) -> Self;
    /// `None` if the value does not fit.
    fn from_exact(v: &ExactInt) -> Option<Self>;
    fn to_exact(&self) -> ExactInt;

    fn is_zero(&self) -> bool;
    fn signum(&self) -> i32;

    fn try_add(&self, o: &Self) -> Result<Self>;
    fn try_sub(&self, o: &Self) -> Result<Self>;
    fn try_mul(&self, o: &Self) -> Result<Self>;
    fn try_div_exact(&self, o: &Self) -> Result<Self>;
    fn try_neg(&self) -> Result<Self>;
    /// Non-negative gcd.
    fn try_gcd(&self, o: &Self) -> Result<Self>;

    fn zero() -> Self {
        Self::from_i64(0)
    }

    fn one() -> Self {
        Self::from_i64(1)
    }

    /// `a*b - c*d`, the step every fraction-free pivot performs.
    fn cross(a: &Self, b: &Self, c: &Self, d: &Self) -> Result<Self> {
        a.try_mul(b)?.try_sub(&c.try_mul(d)?)
    }
}

macro_rules! native_lp_int {
    ($t:ty, $name:expr, $from_exact:ident) => {
        impl LpInt for $t {
            const NAME: &'static str = $name;

            fn from_i64(v: i64) -> Self {
                v as $t
            }

            fn from_exact(v: &ExactInt) -> Option<Self> {
                v.$from_exact()
            }

            fn to_exact(&self) -> ExactInt {
                ExactInt::from(*self)
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn signum(&self) -> i32 {
                <$t>::signum(*self) as i32
            }

            fn try_add(&self, o: &Self) -> Result<Self> {
                self.checked_add(*o).ok_or(Error::IntegerOverflow($name))
            }

            fn try_sub(&self, o: &Self) -> Result<Self> {
                self.checked_sub(*o).ok_or(Error::IntegerOverflow($name))
            }

            fn try_mul(&self, o: &Self) -> Result<Self> {
                self.checked_mul(*o).ok_or(Error::IntegerOverflow($name))
            }

            fn try_div_exact(&self, o: &Self) -> Result<Self> {
                debug_assert!(*o != 0 && *self % *o == 0);
                self.checked_div(*o).ok_or(Error::IntegerOverflow($name))
            }

            fn try_neg(&self) -> Result<Self> {
                self.checked_neg().ok_or(Error::IntegerOverflow($name))
            }

            fn try_gcd(&self, o: &Self) -> Result<Self> {
                if *self == <$t>::MIN || *o == <$t>::MIN {
                    return Err(Error::IntegerOverflow($name));
                }
                Ok(Integer::gcd(self, o))
            }
        }
    };
}

native_lp_int!(i64, "i64", to_i64);
native_lp_int!(i128, "i128", to_i128);

impl LpInt for ExactInt {
    const NAME: &'static str = "exact";

    fn from_i64(v: i64) -> Self {
        ExactInt::Native(v)
    }

    fn from_exact(v: &ExactInt) -> Option<Self> {
        Some(v.clone())
    }

    fn to_exact(&self) -> ExactInt {
        self.clone()
    }

    fn is_zero(&self) -> bool {
        ExactInt::is_zero(self)
    }

    fn signum(&self) -> i32 {
        ExactInt::signum(self)
    }

    fn try_add(&self, o: &Self) -> Result<Self> {
        Ok(self + o)
    }

    fn try_sub(&self, o: &Self) -> Result<Self> {
        Ok(self - o)
    }

    fn try_mul(&self, o: &Self) -> Result<Self> {
        Ok(self * o)
    }

    fn try_div_exact(&self, o: &Self) -> Result<Self> {
        Ok(self.div_exact(o))
    }

    fn try_neg(&self) -> Result<Self> {
        Ok(-self)
    }

    fn try_gcd(&self, o: &Self) -> Result<Self> {
        Ok(self.gcd(o))
    }
}
