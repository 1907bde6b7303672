use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt as BigInteger;
use num_rational::BigRational;
use num_traits::{Num, Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};
use crate::hash;

// ============================================================================
// Numeric Type System
// ============================================================================

#[derive(Debug, Clone)]
pub enum Number {
    /// Fixed-width integer - widens to BigInt on overflow
    Integer(i64),

    /// Arbitrary precision integer
    BigInt(Arc<BigInteger>),

    /// IEEE 754 double precision floating point
    Float(f64),

    /// Arbitrary precision rational, always kept in reduced form
    Ratio(Arc<BigRational>),
}

/// Outcome of comparing two numbers. NaN is not ordered against anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    EqualTo,
    GreaterThan,
    Incomparable,
}

impl From<Option<Ordering>> for Comparison {
    fn from(ordering: Option<Ordering>) -> Self {
        match ordering {
            Some(Ordering::Less) => Comparison::LessThan,
            Some(Ordering::Equal) => Comparison::EqualTo,
            Some(Ordering::Greater) => Comparison::GreaterThan,
            None => Comparison::Incomparable,
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Integer(n)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl From<BigInteger> for Number {
    fn from(n: BigInteger) -> Self {
        Number::BigInt(Arc::new(n))
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number::Ratio(Arc::new(r))
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{n}"),
            Number::BigInt(n) => write!(f, "{n}"),
            Number::Ratio(r) => write!(f, "{r}"),
            Number::Float(x) => {
                if x.is_nan() {
                    write!(f, "NaN")
                } else if x.is_infinite() {
                    let sign = if *x > 0.0 { "+Inf" } else { "-Inf" };
                    write!(f, "{sign}")
                } else {
                    write!(f, "{x}")
                }
            }
        }
    }
}

// ============================================================================
// Promotion ("purification")
// ============================================================================

/// Position of each representation in the promotion lattice. Combining two
/// numbers always promotes to the higher-ranked representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Integer,
    BigInt,
    Ratio,
    Float,
}

impl Number {
    /// Construct a reduced ratio.
    pub fn ratio(numer: BigInteger, denom: BigInteger) -> Result<Number> {
        if denom.is_zero() {
            return Err(Error::division_by_zero(numer));
        }
        Ok(Number::Ratio(Arc::new(BigRational::new(numer, denom))))
    }

    fn rank(&self) -> Rank {
        match self {
            Number::Integer(_) => Rank::Integer,
            Number::BigInt(_) => Rank::BigInt,
            Number::Ratio(_) => Rank::Ratio,
            Number::Float(_) => Rank::Float,
        }
    }

    fn promote(&self, rank: Rank) -> Number {
        match (self, rank) {
            (n, r) if n.rank() == r => n.clone(),
            (Number::Integer(n), Rank::BigInt) => Number::from(BigInteger::from(*n)),
            (Number::Integer(n), Rank::Ratio) => Number::from(BigRational::from_integer(
                BigInteger::from(*n),
            )),
            (Number::BigInt(n), Rank::Ratio) => {
                Number::from(BigRational::from_integer(n.as_ref().clone()))
            }
            (n, Rank::Float) => Number::Float(n.to_float()),
            (n, r) => unreachable!("no promotion from {:?} to {r:?}", n.rank()),
        }
    }

    /// Promote both operands to their common representation.
    pub fn purify(&self, other: &Number) -> (Number, Number) {
        let rank = self.rank().max(other.rank());
        (self.promote(rank), other.promote(rank))
    }

    /// Convert to float (may lose precision)
    pub fn to_float(&self) -> f64 {
        match self {
            Number::Integer(n) => *n as f64,
            Number::BigInt(n) => n.to_f64().unwrap_or_else(|| {
                if n.is_negative() {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }),
            Number::Ratio(r) => r.to_f64().unwrap_or(f64::NAN),
            Number::Float(x) => *x,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(n) => *n == 0,
            Number::BigInt(n) => n.is_zero(),
            Number::Ratio(r) => r.is_zero(),
            Number::Float(x) => *x == 0.0,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Number::Float(x) if x.is_nan())
    }

    pub fn is_pos_infinity(&self) -> bool {
        matches!(self, Number::Float(x) if *x == f64::INFINITY)
    }

    pub fn is_neg_infinity(&self) -> bool {
        matches!(self, Number::Float(x) if *x == f64::NEG_INFINITY)
    }
}

// ============================================================================
// Equality and Hashing
// ============================================================================

impl Number {
    /// Value equality. Integer and BigInt compare by magnitude; the other
    /// representations are only equal to themselves. NaN equals NaN so that
    /// numbers can serve as map keys.
    pub fn equal(&self, other: &Number) -> bool {
        use Number::*;

        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (BigInt(a), BigInt(b)) => a == b,
            (Integer(a), BigInt(b)) | (BigInt(b), Integer(a)) => {
                b.to_i64().is_some_and(|b| b == *a)
            }
            (Ratio(a), Ratio(b)) => a == b,
            (Float(a), Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }

    /// Hash of the canonical form: integers by their decimal text (so an
    /// Integer and an equal BigInt agree), ratios by their reduced text, and
    /// floats by their bit pattern with -0.0 and NaN canonicalized.
    pub fn hash_code(&self) -> u64 {
        match self {
            Number::Integer(n) => hash::hash_str(&n.to_string()),
            Number::BigInt(n) => hash::hash_str(&n.to_string()),
            Number::Ratio(r) => hash::hash_str(&r.to_string()),
            Number::Float(x) => {
                let bits = if x.is_nan() {
                    f64::NAN.to_bits()
                } else if *x == 0.0 {
                    0.0f64.to_bits()
                } else {
                    x.to_bits()
                };
                hash::hash_bytes(&bits.to_le_bytes())
            }
        }
    }
}

// ============================================================================
// Arithmetic Operations
// ============================================================================

impl Number {
    pub fn compare(&self, other: &Number) -> Comparison {
        use Number::*;

        match (self, other) {
            (Integer(a), Integer(b)) => Some(a.cmp(b)).into(),
            (BigInt(a), BigInt(b)) => Some(a.cmp(b)).into(),
            (Ratio(a), Ratio(b)) => Some(a.cmp(b)).into(),
            (Float(a), Float(b)) => a.partial_cmp(b).into(),
            _ => {
                let (a, b) = self.purify(other);
                a.compare(&b)
            }
        }
    }

    /// Addition with automatic type promotion
    pub fn add(&self, other: &Number) -> Number {
        use Number::*;

        match (self, other) {
            (Integer(a), Integer(b)) => match a.checked_add(*b) {
                Some(result) => Integer(result),
                None => Number::from(BigInteger::from(*a) + BigInteger::from(*b)),
            },
            (BigInt(a), BigInt(b)) => Number::from(a.as_ref() + b.as_ref()),
            (Ratio(a), Ratio(b)) => Number::from(a.as_ref() + b.as_ref()),
            (Float(a), Float(b)) => Float(a + b),
            _ => {
                let (a, b) = self.purify(other);
                a.add(&b)
            }
        }
    }

    /// Subtraction with automatic type promotion
    pub fn sub(&self, other: &Number) -> Number {
        use Number::*;

        match (self, other) {
            (Integer(a), Integer(b)) => match a.checked_sub(*b) {
                Some(result) => Integer(result),
                None => Number::from(BigInteger::from(*a) - BigInteger::from(*b)),
            },
            (BigInt(a), BigInt(b)) => Number::from(a.as_ref() - b.as_ref()),
            (Ratio(a), Ratio(b)) => Number::from(a.as_ref() - b.as_ref()),
            (Float(a), Float(b)) => Float(a - b),
            _ => {
                let (a, b) = self.purify(other);
                a.sub(&b)
            }
        }
    }

    /// Multiplication with automatic type promotion
    pub fn mul(&self, other: &Number) -> Number {
        use Number::*;

        match (self, other) {
            (Integer(a), Integer(b)) => match a.checked_mul(*b) {
                Some(result) => Integer(result),
                None => Number::from(BigInteger::from(*a) * BigInteger::from(*b)),
            },
            (BigInt(a), BigInt(b)) => Number::from(a.as_ref() * b.as_ref()),
            (Ratio(a), Ratio(b)) => Number::from(a.as_ref() * b.as_ref()),
            (Float(a), Float(b)) => Float(a * b),
            _ => {
                let (a, b) = self.purify(other);
                a.mul(&b)
            }
        }
    }

    /// Division - exact for Integer, BigInt and Ratio, IEEE for Float.
    ///
    /// An inexact Integer or BigInt quotient yields a Ratio.
    pub fn div(&self, other: &Number) -> Result<Number> {
        use Number::*;

        match (self, other) {
            (Float(a), Float(b)) => Ok(Float(a / b)),
            (Integer(a), Integer(0)) => Err(Error::division_by_zero(a)),
            (Integer(a), Integer(b)) => match (a.checked_rem(*b), a.checked_div(*b)) {
                (Some(0), Some(q)) => Ok(Integer(q)),
                (Some(_), _) => Self::ratio(BigInteger::from(*a), BigInteger::from(*b)),
                // i64::MIN / -1
                _ => Ok(Number::from(BigInteger::from(*a) / BigInteger::from(*b))),
            },
            (BigInt(a), BigInt(b)) => {
                if b.is_zero() {
                    return Err(Error::division_by_zero(a));
                }
                let ratio = BigRational::new(a.as_ref().clone(), b.as_ref().clone());
                if ratio.is_integer() {
                    Ok(Number::from(ratio.to_integer()))
                } else {
                    Ok(Number::from(ratio))
                }
            }
            (Ratio(a), Ratio(b)) => {
                if b.is_zero() {
                    return Err(Error::division_by_zero(a));
                }
                Ok(Number::from(a.as_ref() / b.as_ref()))
            }
            _ => {
                let (a, b) = self.purify(other);
                a.div(&b)
            }
        }
    }

    /// Floored modulo: the result takes the sign of the divisor.
    pub fn modulo(&self, other: &Number) -> Result<Number> {
        use Number::*;

        match (self, other) {
            (Integer(a), Integer(0)) => Err(Error::division_by_zero(a)),
            (Integer(a), Integer(b)) => {
                let r = a.wrapping_rem(*b);
                if r != 0 && ((r < 0) != (*b < 0)) {
                    Ok(Integer(r + b))
                } else {
                    Ok(Integer(r))
                }
            }
            (BigInt(a), BigInt(b)) => {
                if b.is_zero() {
                    return Err(Error::division_by_zero(a));
                }
                let r = a.as_ref() % b.as_ref();
                if !r.is_zero() && (r.is_negative() != b.is_negative()) {
                    Ok(Number::from(r + b.as_ref()))
                } else {
                    Ok(Number::from(r))
                }
            }
            (Ratio(a), Ratio(b)) => {
                if b.is_zero() {
                    return Err(Error::division_by_zero(a));
                }
                let quotient = (a.as_ref() / b.as_ref()).floor();
                Ok(Number::from(a.as_ref() - b.as_ref() * quotient))
            }
            (Float(a), Float(b)) => {
                let r = a % b;
                if r != 0.0 && ((r < 0.0) != (*b < 0.0)) {
                    Ok(Float(r + b))
                } else {
                    Ok(Float(r))
                }
            }
            _ => {
                let (a, b) = self.purify(other);
                a.modulo(&b)
            }
        }
    }

    /// Negation
    pub fn neg(&self) -> Number {
        match self {
            Number::Integer(n) => match n.checked_neg() {
                Some(result) => Number::Integer(result),
                None => Number::from(-BigInteger::from(*n)),
            },
            Number::BigInt(n) => Number::from(-n.as_ref()),
            Number::Ratio(r) => Number::from(-r.as_ref()),
            Number::Float(x) => Number::Float(-x),
        }
    }
}

// ============================================================================
// Literal Parsing
// ============================================================================

/// Split an optional sign and radix prefix off an integer literal.
fn integer_parts(text: &str) -> Option<(bool, u32, &str)> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let lower = body.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &body[2..]),
        Some("0o") => (8, &body[2..]),
        Some("0b") => (2, &body[2..]),
        _ => (10, body),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some((negative, radix, digits))
}

fn parse_big_integer(text: &str) -> Option<BigInteger> {
    let (negative, radix, digits) = integer_parts(text)?;
    let magnitude = BigInteger::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse an integer literal (decimal, or `0x`/`0o`/`0b` prefixed). Values
/// outside the fixed-width range become BigInt.
pub fn parse_integer(text: &str) -> Result<Number> {
    let big = parse_big_integer(text).ok_or_else(|| Error::expected_integer(text))?;
    Ok(match big.to_i64() {
        Some(n) => Number::Integer(n),
        None => Number::from(big),
    })
}

pub fn parse_float(text: &str) -> Result<Number> {
    text.parse::<f64>()
        .map(Number::Float)
        .map_err(|_| Error::expected_float(text))
}

/// Parse a `numerator/denominator` literal into a reduced Ratio.
pub fn parse_ratio(text: &str) -> Result<Number> {
    let (numer, denom) = text.split_once('/').ok_or_else(|| Error::expected_ratio(text))?;
    let numer = parse_big_integer(numer).ok_or_else(|| Error::expected_ratio(text))?;
    let denom = match denom.as_bytes().first() {
        Some(b'-' | b'+') => None,
        _ => parse_big_integer(denom),
    }
    .ok_or_else(|| Error::expected_ratio(text))?;
    Number::ratio(numer, denom).map_err(|e| e.with_text(text))
}
