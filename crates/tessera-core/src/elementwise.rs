//! Elementwise combination functions.
//!
//! Every function here is pure: it takes one or two arrays, broadcasts them,
//! promotes both operands to a common [`DataType`] and returns a new array.
//! Failures (unbroadcastable shapes, unsupported element types, integer
//! powers with negative exponents) are returned as [`Error::Combination`] or
//! [`Error::Shape`] and are meant to reach the caller unchanged.

use crate::broadcast::{broadcast_index, broadcast_shape};
use crate::types::{Array, ArrayData, DataType};
use crate::{Error, Result};

/// How an arithmetic function treats two boolean operands.
#[derive(Clone, Copy)]
enum BoolRule {
    /// Stay boolean and apply this function.
    Native(fn(bool, bool) -> bool),
    /// Promote both operands to i64.
    Promote,
    /// Booleans are not accepted.
    Reject,
}

/// Per-type kernels for one arithmetic function.
struct Arithmetic {
    name: &'static str,
    boolean: BoolRule,
    u8: fn(u8, u8) -> Result<u8>,
    i64: fn(i64, i64) -> Result<i64>,
    f64: fn(f64, f64) -> f64,
}

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl Comparison {
    fn apply<T: PartialOrd>(self, x: T, y: T) -> bool {
        match self {
            Comparison::Equal => x == y,
            Comparison::NotEqual => x != y,
            Comparison::Less => x < y,
            Comparison::Greater => x > y,
            Comparison::LessEqual => x <= y,
            Comparison::GreaterEqual => x >= y,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Bitwise {
    And,
    Or,
    Xor,
}

impl Bitwise {
    fn name(self) -> &'static str {
        match self {
            Bitwise::And => "bitwise_and",
            Bitwise::Or => "bitwise_or",
            Bitwise::Xor => "bitwise_xor",
        }
    }

    fn apply<T>(self, x: T, y: T) -> T
    where
        T: std::ops::BitAnd<Output = T> + std::ops::BitOr<Output = T> + std::ops::BitXor<Output = T>,
    {
        match self {
            Bitwise::And => x & y,
            Bitwise::Or => x | y,
            Bitwise::Xor => x ^ y,
        }
    }
}

// ================================================================================
// Arithmetic
// ================================================================================

/// Elementwise `a + b`. Two boolean operands combine with logical or.
pub fn add(a: &Array, b: &Array) -> Result<Array> {
    arithmetic(
        a,
        b,
        &Arithmetic {
            name: "add",
            boolean: BoolRule::Native(|x, y| x | y),
            u8: |x, y| Ok(x.wrapping_add(y)),
            i64: |x, y| Ok(x.wrapping_add(y)),
            f64: |x, y| x + y,
        },
    )
}

/// Elementwise `a - b`. Booleans are rejected.
pub fn subtract(a: &Array, b: &Array) -> Result<Array> {
    arithmetic(
        a,
        b,
        &Arithmetic {
            name: "subtract",
            boolean: BoolRule::Reject,
            u8: |x, y| Ok(x.wrapping_sub(y)),
            i64: |x, y| Ok(x.wrapping_sub(y)),
            f64: |x, y| x - y,
        },
    )
}

/// Elementwise `a * b`. Two boolean operands combine with logical and.
pub fn multiply(a: &Array, b: &Array) -> Result<Array> {
    arithmetic(
        a,
        b,
        &Arithmetic {
            name: "multiply",
            boolean: BoolRule::Native(|x, y| x & y),
            u8: |x, y| Ok(x.wrapping_mul(y)),
            i64: |x, y| Ok(x.wrapping_mul(y)),
            f64: |x, y| x * y,
        },
    )
}

/// Elementwise `a ** b`.
pub fn power(a: &Array, b: &Array) -> Result<Array> {
    arithmetic(
        a,
        b,
        &Arithmetic {
            name: "power",
            boolean: BoolRule::Promote,
            u8: |x, y| Ok(x.wrapping_pow(u32::from(y))),
            i64: |x, y| {
                if y < 0 {
                    return Err(Error::Combination(
                        "integers to negative integer powers are not allowed".to_string(),
                    ));
                }
                Ok(wrapping_pow_i64(x, y.unsigned_abs()))
            },
            f64: f64::powf,
        },
    )
}

/// `base ** exp` modulo 2^64, by repeated squaring over the full exponent.
fn wrapping_pow_i64(mut base: i64, mut exp: u64) -> i64 {
    let mut acc: i64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    acc
}

/// Elementwise remainder with the sign of the divisor.
///
/// Integer division by zero yields 0; float division by zero yields NaN.
pub fn modulo(a: &Array, b: &Array) -> Result<Array> {
    arithmetic(
        a,
        b,
        &Arithmetic {
            name: "modulo",
            boolean: BoolRule::Promote,
            u8: |x, y| Ok(if y == 0 { 0 } else { x % y }),
            i64: |x, y| {
                if y == 0 {
                    return Ok(0);
                }
                let r = x.wrapping_rem(y);
                Ok(if r != 0 && ((r < 0) != (y < 0)) { r + y } else { r })
            },
            f64: |x, y| {
                let r = x % y;
                if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                    r + y
                } else {
                    r
                }
            },
        },
    )
}

/// Elementwise division rounded toward negative infinity.
///
/// Integer division by zero yields 0.
pub fn floor_divide(a: &Array, b: &Array) -> Result<Array> {
    arithmetic(
        a,
        b,
        &Arithmetic {
            name: "floor_divide",
            boolean: BoolRule::Promote,
            u8: |x, y| Ok(if y == 0 { 0 } else { x / y }),
            i64: |x, y| {
                if y == 0 {
                    return Ok(0);
                }
                let q = x.wrapping_div(y);
                let r = x.wrapping_rem(y);
                Ok(if r != 0 && ((r < 0) != (y < 0)) { q - 1 } else { q })
            },
            f64: |x, y| (x / y).floor(),
        },
    )
}

/// Elementwise `a / b`, always producing f64.
pub fn true_divide(a: &Array, b: &Array) -> Result<Array> {
    let a = a.cast(DataType::F64);
    let b = b.cast(DataType::F64);
    arithmetic(
        &a,
        &b,
        &Arithmetic {
            name: "true_divide",
            boolean: BoolRule::Promote,
            u8: |x, y| Ok(if y == 0 { 0 } else { x / y }),
            i64: |x, y| Ok(if y == 0 { 0 } else { x / y }),
            f64: |x, y| x / y,
        },
    )
}

fn arithmetic(a: &Array, b: &Array, kernels: &Arithmetic) -> Result<Array> {
    let out_shape = broadcast_shape(a.shape(), b.shape())?;
    let mut dtype = a.dtype().promote(b.dtype());

    if dtype == DataType::Bool {
        match kernels.boolean {
            BoolRule::Native(f) => {
                let (x, y) = (a.cast(DataType::Bool), b.cast(DataType::Bool));
                if let (Some(x), Some(y)) = (x.as_bool(), y.as_bool()) {
                    let out = zip_broadcast(x, a.shape(), y, b.shape(), &out_shape, |p, q| {
                        Ok(f(p, q))
                    })?;
                    return Array::new(ArrayData::Bool(out), out_shape);
                }
            }
            BoolRule::Promote => dtype = DataType::I64,
            BoolRule::Reject => {
                return Err(Error::Combination(format!(
                    "{} is not supported for boolean operands",
                    kernels.name
                )));
            }
        }
    }

    let (x, y) = (a.data().cast(dtype), b.data().cast(dtype));
    let data = match (&x, &y) {
        (ArrayData::U8(x), ArrayData::U8(y)) => ArrayData::U8(zip_broadcast(
            x,
            a.shape(),
            y,
            b.shape(),
            &out_shape,
            kernels.u8,
        )?),
        (ArrayData::I64(x), ArrayData::I64(y)) => ArrayData::I64(zip_broadcast(
            x,
            a.shape(),
            y,
            b.shape(),
            &out_shape,
            kernels.i64,
        )?),
        (ArrayData::F64(x), ArrayData::F64(y)) => {
            let f = kernels.f64;
            ArrayData::F64(zip_broadcast(
                x,
                a.shape(),
                y,
                b.shape(),
                &out_shape,
                |p, q| Ok(f(p, q)),
            )?)
        }
        _ => {
            return Err(Error::Unsupported(format!(
                "{} on {:?} and {:?}",
                kernels.name,
                x.dtype(),
                y.dtype()
            )));
        }
    };

    Array::new(data, out_shape)
}

// ================================================================================
// Comparison
// ================================================================================

pub fn equal(a: &Array, b: &Array) -> Result<Array> {
    compare(a, b, Comparison::Equal)
}

pub fn not_equal(a: &Array, b: &Array) -> Result<Array> {
    compare(a, b, Comparison::NotEqual)
}

pub fn less(a: &Array, b: &Array) -> Result<Array> {
    compare(a, b, Comparison::Less)
}

pub fn greater(a: &Array, b: &Array) -> Result<Array> {
    compare(a, b, Comparison::Greater)
}

pub fn less_equal(a: &Array, b: &Array) -> Result<Array> {
    compare(a, b, Comparison::LessEqual)
}

pub fn greater_equal(a: &Array, b: &Array) -> Result<Array> {
    compare(a, b, Comparison::GreaterEqual)
}

fn compare(a: &Array, b: &Array, op: Comparison) -> Result<Array> {
    let out_shape = broadcast_shape(a.shape(), b.shape())?;
    let dtype = a.dtype().promote(b.dtype());
    let (x, y) = (a.data().cast(dtype), b.data().cast(dtype));

    let out = match (&x, &y) {
        (ArrayData::Bool(x), ArrayData::Bool(y)) => {
            zip_broadcast(x, a.shape(), y, b.shape(), &out_shape, |p, q| {
                Ok(op.apply(p, q))
            })?
        }
        (ArrayData::U8(x), ArrayData::U8(y)) => {
            zip_broadcast(x, a.shape(), y, b.shape(), &out_shape, |p, q| {
                Ok(op.apply(p, q))
            })?
        }
        (ArrayData::I64(x), ArrayData::I64(y)) => {
            zip_broadcast(x, a.shape(), y, b.shape(), &out_shape, |p, q| {
                Ok(op.apply(p, q))
            })?
        }
        (ArrayData::F64(x), ArrayData::F64(y)) => {
            zip_broadcast(x, a.shape(), y, b.shape(), &out_shape, |p, q| {
                Ok(op.apply(p, q))
            })?
        }
        _ => {
            return Err(Error::Unsupported(format!(
                "{:?} on {:?} and {:?}",
                op,
                x.dtype(),
                y.dtype()
            )));
        }
    };

    Array::new(ArrayData::Bool(out), out_shape)
}

// ================================================================================
// Bitwise
// ================================================================================

pub fn bitwise_and(a: &Array, b: &Array) -> Result<Array> {
    bitwise(a, b, Bitwise::And)
}

pub fn bitwise_or(a: &Array, b: &Array) -> Result<Array> {
    bitwise(a, b, Bitwise::Or)
}

pub fn bitwise_xor(a: &Array, b: &Array) -> Result<Array> {
    bitwise(a, b, Bitwise::Xor)
}

fn bitwise(a: &Array, b: &Array, op: Bitwise) -> Result<Array> {
    let out_shape = broadcast_shape(a.shape(), b.shape())?;
    let dtype = a.dtype().promote(b.dtype());
    if !dtype.is_integral() {
        return Err(Error::Combination(format!(
            "{} is not supported for {:?} operands",
            op.name(),
            dtype
        )));
    }

    let (x, y) = (a.data().cast(dtype), b.data().cast(dtype));
    let data = match (&x, &y) {
        (ArrayData::Bool(x), ArrayData::Bool(y)) => ArrayData::Bool(zip_broadcast(
            x,
            a.shape(),
            y,
            b.shape(),
            &out_shape,
            |p, q| Ok(op.apply(p, q)),
        )?),
        (ArrayData::U8(x), ArrayData::U8(y)) => ArrayData::U8(zip_broadcast(
            x,
            a.shape(),
            y,
            b.shape(),
            &out_shape,
            |p, q| Ok(op.apply(p, q)),
        )?),
        (ArrayData::I64(x), ArrayData::I64(y)) => ArrayData::I64(zip_broadcast(
            x,
            a.shape(),
            y,
            b.shape(),
            &out_shape,
            |p, q| Ok(op.apply(p, q)),
        )?),
        _ => {
            return Err(Error::Unsupported(format!(
                "{} on {:?} and {:?}",
                op.name(),
                x.dtype(),
                y.dtype()
            )));
        }
    };

    Array::new(data, out_shape)
}

// ================================================================================
// Unary
// ================================================================================

/// Elementwise `-a`. Booleans are rejected.
pub fn negative(a: &Array) -> Result<Array> {
    let data = match a.data() {
        ArrayData::Bool(_) => {
            return Err(Error::Combination(
                "negative is not supported for boolean operands".to_string(),
            ));
        }
        ArrayData::U8(v) => ArrayData::U8(v.iter().map(|x| x.wrapping_neg()).collect()),
        ArrayData::I64(v) => ArrayData::I64(v.iter().map(|x| x.wrapping_neg()).collect()),
        ArrayData::F64(v) => ArrayData::F64(v.iter().map(|x| -x).collect()),
    };
    Array::new(data, a.shape().to_vec())
}

/// Elementwise `+a` (a copy). Booleans are rejected.
pub fn positive(a: &Array) -> Result<Array> {
    if a.dtype() == DataType::Bool {
        return Err(Error::Combination(
            "positive is not supported for boolean operands".to_string(),
        ));
    }
    Ok(a.clone())
}

/// Elementwise absolute value.
pub fn absolute(a: &Array) -> Result<Array> {
    let data = match a.data() {
        ArrayData::Bool(v) => ArrayData::Bool(v.clone()),
        ArrayData::U8(v) => ArrayData::U8(v.clone()),
        ArrayData::I64(v) => ArrayData::I64(v.iter().map(|x| x.wrapping_abs()).collect()),
        ArrayData::F64(v) => ArrayData::F64(v.iter().map(|x| x.abs()).collect()),
    };
    Array::new(data, a.shape().to_vec())
}

/// Elementwise bitwise not; logical not for booleans. Floats are rejected.
pub fn invert(a: &Array) -> Result<Array> {
    let data = match a.data() {
        ArrayData::Bool(v) => ArrayData::Bool(v.iter().map(|x| !x).collect()),
        ArrayData::U8(v) => ArrayData::U8(v.iter().map(|x| !x).collect()),
        ArrayData::I64(v) => ArrayData::I64(v.iter().map(|x| !x).collect()),
        ArrayData::F64(_) => {
            return Err(Error::Combination(
                "invert is not supported for F64 operands".to_string(),
            ));
        }
    };
    Array::new(data, a.shape().to_vec())
}

/// Apply `f` pairwise over two broadcast-compatible slices.
fn zip_broadcast<T, U, F>(
    a: &[T],
    a_shape: &[usize],
    b: &[T],
    b_shape: &[usize],
    out_shape: &[usize],
    mut f: F,
) -> Result<Vec<U>>
where
    T: Copy,
    F: FnMut(T, T) -> Result<U>,
{
    // Fast path: identical shapes need no index mapping
    if a_shape == b_shape {
        return a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect();
    }

    let total: usize = out_shape.iter().product();
    (0..total)
        .map(|i| {
            let x = a[broadcast_index(i, out_shape, a_shape)];
            let y = b[broadcast_index(i, out_shape, b_shape)];
            f(x, y)
        })
        .collect()
}
