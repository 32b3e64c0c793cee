//! Shared handles to elementwise combination functions.

use std::fmt;
use std::sync::Arc;

use tessera_core::{Array, Result};

/// Signature of a two-operand combination function.
pub type BinaryFn = dyn Fn(&Array, &Array) -> Result<Array> + Send + Sync;

/// Signature of a one-operand combination function.
pub type UnaryFn = dyn Fn(&Array) -> Result<Array> + Send + Sync;

/// A named, immutable handle to a binary combination function.
///
/// Cloning is cheap and every clone calls the same function. A reflected
/// handle (see [`BinaryCombine::swapped`]) also shares the function and only
/// swaps the argument order.
#[derive(Clone)]
pub struct BinaryCombine {
    name: Arc<str>,
    func: Arc<BinaryFn>,
    swapped: bool,
}

impl BinaryCombine {
    /// Wrap a combination function under `name`.
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Array, &Array) -> Result<Array> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
            swapped: false,
        }
    }

    /// Same function with the operand order reversed.
    ///
    /// `c.swapped().call(a, b)` evaluates `c.call(b, a)`. Swapping twice
    /// restores the original order.
    pub fn swapped(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            func: Arc::clone(&self.func),
            swapped: !self.swapped,
        }
    }

    /// Name of the underlying function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this handle reverses its operands.
    pub fn is_swapped(&self) -> bool {
        self.swapped
    }

    /// Check if both handles call the same function in the same order.
    pub fn same_as(&self, other: &BinaryCombine) -> bool {
        Arc::ptr_eq(&self.func, &other.func) && self.swapped == other.swapped
    }

    /// Combine two operands.
    pub fn call(&self, a: &Array, b: &Array) -> Result<Array> {
        if self.swapped {
            (self.func)(b, a)
        } else {
            (self.func)(a, b)
        }
    }
}

impl fmt::Debug for BinaryCombine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryCombine")
            .field("name", &self.name)
            .field("swapped", &self.swapped)
            .finish()
    }
}

impl fmt::Display for BinaryCombine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.swapped {
            write!(f, "{}(other, self)", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A named, immutable handle to a unary combination function.
#[derive(Clone)]
pub struct UnaryCombine {
    name: Arc<str>,
    func: Arc<UnaryFn>,
}

impl UnaryCombine {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Array) -> Result<Array> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if both handles call the same function.
    pub fn same_as(&self, other: &UnaryCombine) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub fn call(&self, a: &Array) -> Result<Array> {
        (self.func)(a)
    }
}

impl fmt::Debug for UnaryCombine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryCombine")
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for UnaryCombine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
