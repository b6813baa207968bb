use crate::SymbolicError;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use std::{fmt, ops};

/// Exact rational number of arbitrary size, in lowest terms with a positive
/// denominator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rational(BigRational);

impl Rational {
  pub fn new(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Result<Self, SymbolicError> {
    let den = den.into();
    if den.is_zero() {
      return Err(SymbolicError::DivisionByZero);
    }
    Ok(Self(BigRational::new(num.into(), den)))
  }

  pub fn integer(num: impl Into<BigInt>) -> Self {
    Self(BigRational::from_integer(num.into()))
  }

  pub fn numer(&self) -> &BigInt {
    self.0.numer()
  }
  pub fn denom(&self) -> &BigInt {
    self.0.denom()
  }

  pub fn is_integer(&self) -> bool {
    self.0.is_integer()
  }
  pub fn is_negative(&self) -> bool {
    self.0.is_negative()
  }

  pub fn abs(&self) -> Self {
    Self(self.0.abs())
  }

  pub fn recip(&self) -> Result<Self, SymbolicError> {
    if self.is_zero() {
      return Err(SymbolicError::DivisionByZero);
    }
    Ok(self.recip_nonzero())
  }

  /// Caller guarantees `self` is nonzero.
  pub(crate) fn recip_nonzero(&self) -> Self {
    debug_assert!(!self.is_zero());
    Self(self.0.recip())
  }

  pub fn checked_div(&self, divisor: &Self) -> Result<Self, SymbolicError> {
    Ok(self * &divisor.recip()?)
  }

  pub fn powi(&self, n: i32) -> Result<Self, SymbolicError> {
    let base = if n < 0 { self.recip()? } else { self.clone() };
    Ok(Self(base.0.pow(n.saturating_abs())))
  }

  /// Largest nonnegative rational dividing both operands into integer multiples,
  /// i.e. `gcd(numerators) / lcm(denominators)`.
  pub fn content_gcd(&self, other: &Self) -> Self {
    Self(BigRational::new(
      self.numer().gcd(other.numer()),
      self.denom().lcm(other.denom()),
    ))
  }
}

impl Zero for Rational {
  fn zero() -> Self {
    Self(BigRational::zero())
  }
  fn is_zero(&self) -> bool {
    self.0.is_zero()
  }
}
impl One for Rational {
  fn one() -> Self {
    Self(BigRational::one())
  }
}

macro_rules! impl_binop {
  ($trait:ident, $method:ident) => {
    impl ops::$trait for Rational {
      type Output = Rational;
      fn $method(self, rhs: Rational) -> Rational {
        Rational(ops::$trait::$method(self.0, rhs.0))
      }
    }
    impl ops::$trait<&Rational> for &Rational {
      type Output = Rational;
      fn $method(self, rhs: &Rational) -> Rational {
        Rational(ops::$trait::$method(&self.0, &rhs.0))
      }
    }
  };
}
impl_binop!(Add, add);
impl_binop!(Sub, sub);
impl_binop!(Mul, mul);

impl ops::Neg for Rational {
  type Output = Rational;
  fn neg(self) -> Rational {
    Rational(-self.0)
  }
}
impl ops::Neg for &Rational {
  type Output = Rational;
  fn neg(self) -> Rational {
    Rational(-&self.0)
  }
}
impl ops::AddAssign<&Rational> for Rational {
  fn add_assign(&mut self, rhs: &Rational) {
    self.0 += &rhs.0;
  }
}
impl ops::MulAssign<&Rational> for Rational {
  fn mul_assign(&mut self, rhs: &Rational) {
    self.0 *= &rhs.0;
  }
}

impl From<i32> for Rational {
  fn from(value: i32) -> Self {
    Self::integer(value)
  }
}
impl From<i64> for Rational {
  fn from(value: i64) -> Self {
    Self::integer(value)
  }
}
impl From<BigInt> for Rational {
  fn from(value: BigInt) -> Self {
    Self::integer(value)
  }
}

impl fmt::Display for Rational {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
