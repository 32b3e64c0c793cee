//! Common test utilities for operator attachment tests.
//!
//! Provides a minimal domain type that wraps an [`Array`] and the translate
//! functions that unwrap it for the combination functions.

#![allow(dead_code)]

use tessera_ops::{Array, BinaryCombine, Result, UnaryCombine};

/// Domain type used as the attachment target.
#[derive(Debug, Clone, PartialEq)]
pub struct Wrapped(pub Array);

impl Wrapped {
    pub fn int(value: i64) -> Self {
        Wrapped(Array::scalar_i64(value))
    }

    pub fn ints(values: Vec<i64>) -> Self {
        Wrapped(Array::from_i64(values))
    }

    pub fn floats(values: Vec<f64>) -> Self {
        Wrapped(Array::from_f64(values))
    }

    pub fn bools(values: Vec<bool>) -> Self {
        Wrapped(Array::from_bool(values))
    }
}

/// Unwrap both operands, combine, re-wrap.
pub fn translate_binary(this: &Wrapped, other: &Wrapped, func: &BinaryCombine) -> Result<Wrapped> {
    Ok(Wrapped(func.call(&this.0, &other.0)?))
}

/// Unwrap the operand, combine, re-wrap.
pub fn translate_unary(this: &Wrapped, func: &UnaryCombine) -> Result<Wrapped> {
    Ok(Wrapped(func.call(&this.0)?))
}

/// Operand pairs exercised by the property tests.
pub fn operand_pairs() -> Vec<(Wrapped, Wrapped)> {
    vec![
        (Wrapped::ints(vec![7, -3, 12]), Wrapped::ints(vec![2, 5, -4])),
        (Wrapped::ints(vec![1, 2, 3]), Wrapped::int(3)),
        (Wrapped::int(9), Wrapped::ints(vec![1, 4, 9])),
        (Wrapped::ints(vec![0, 255, 64]), Wrapped::ints(vec![255, 15, 64])),
    ]
}

/// Initialize a tracing subscriber for tests that want log output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_test_writer()
        .try_init();
}
