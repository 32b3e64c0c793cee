//! Static operator conformance for target types.
//!
//! A type opts in by implementing [`AttachedOperators`], which exposes the
//! type's [`OperatorTable`] (usually built once in a `OnceLock`). The
//! [`impl_operators!`](crate::impl_operators) macro then generates `std::ops`
//! impls that look up the table entry of the matching name.

use crate::table::OperatorTable;

/// A type whose operators live in a static [`OperatorTable`].
///
/// # Example
///
/// ```ignore
/// impl AttachedOperators for Wrapped {
///     type Other = Wrapped;
///     type Output = Result<Wrapped>;
///
///     fn operator_table() -> &'static OperatorTable<Self, Self::Other, Self::Output> {
///         static TABLE: OnceLock<OperatorTable<Wrapped, Wrapped, Result<Wrapped>>> =
///             OnceLock::new();
///         TABLE.get_or_init(|| build_table())
///     }
/// }
/// ```
pub trait AttachedOperators: Sized + 'static {
    /// Right-hand operand of binary operators.
    type Other;

    /// Result of every operator.
    type Output;

    fn operator_table() -> &'static OperatorTable<Self, Self::Other, Self::Output>;
}

/// Name-based operator calls for every [`AttachedOperators`] type.
pub trait OperatorMethods: AttachedOperators {
    /// Invoke a binary operator by name, or `None` if it is not installed.
    fn binary_op(&self, name: &str, other: &Self::Other) -> Option<Self::Output> {
        Self::operator_table().call_binary(name, self, other)
    }

    /// Invoke a unary operator by name, or `None` if it is not installed.
    fn unary_op(&self, name: &str) -> Option<Self::Output> {
        Self::operator_table().call_unary(name, self)
    }
}

impl<T: AttachedOperators> OperatorMethods for T {}

/// Invoke an installed binary operator.
///
/// # Panics
///
/// Panics if `name` is not installed for `T`. Use
/// [`OperatorTable::require`] when building the table to rule this out.
#[doc(hidden)]
pub fn dispatch_binary<T: AttachedOperators>(name: &str, this: &T, other: &T::Other) -> T::Output {
    let table = T::operator_table();
    match table.binary(name) {
        Some(method) => method.call(this, other),
        None => panic!(
            "binary operator `{name}` is not attached to {}",
            table.type_name()
        ),
    }
}

/// Invoke an installed unary operator.
///
/// # Panics
///
/// Panics if `name` is not installed for `T`.
#[doc(hidden)]
pub fn dispatch_unary<T: AttachedOperators>(name: &str, this: &T) -> T::Output {
    let table = T::operator_table();
    match table.unary(name) {
        Some(method) => method.call(this),
        None => panic!(
            "unary operator `{name}` is not attached to {}",
            table.type_name()
        ),
    }
}

/// Implement `std::ops` traits on references of an [`AttachedOperators`] type.
///
/// Each listed trait method forwards to the table entry with the given name.
/// The right-hand type of `binary` and the left-hand type of `reflected` must
/// be `<Wrapped as AttachedOperators>::Other`.
///
/// ```ignore
/// // &a + &b, &a - &b, ...
/// impl_operators!(binary Wrapped, Wrapped {
///     Add::add => "add",
///     Sub::sub => "sub",
/// });
///
/// // -&a, !&a
/// impl_operators!(unary Wrapped {
///     Neg::neg => "neg",
///     Not::not => "invert",
/// });
///
/// // &2.0 - &s, evaluated as s.rsub(2.0)
/// impl_operators!(reflected Scaled, f64 {
///     Sub::sub => "rsub",
/// });
/// ```
#[macro_export]
macro_rules! impl_operators {
    (binary $ty:ty, $rhs:ty { $($op:ident :: $method:ident => $name:literal),* $(,)? }) => {
        $(
            impl<'a> ::std::ops::$op<&'a $rhs> for &'a $ty {
                type Output = <$ty as $crate::AttachedOperators>::Output;

                fn $method(self, rhs: &'a $rhs) -> Self::Output {
                    $crate::conformance::dispatch_binary::<$ty>($name, self, rhs)
                }
            }
        )*
    };
    (unary $ty:ty { $($op:ident :: $method:ident => $name:literal),* $(,)? }) => {
        $(
            impl<'a> ::std::ops::$op for &'a $ty {
                type Output = <$ty as $crate::AttachedOperators>::Output;

                fn $method(self) -> Self::Output {
                    $crate::conformance::dispatch_unary::<$ty>($name, self)
                }
            }
        )*
    };
    (reflected $ty:ty, $lhs:ty { $($op:ident :: $method:ident => $name:literal),* $(,)? }) => {
        $(
            impl<'a> ::std::ops::$op<&'a $ty> for &'a $lhs {
                type Output = <$ty as $crate::AttachedOperators>::Output;

                fn $method(self, rhs: &'a $ty) -> Self::Output {
                    $crate::conformance::dispatch_binary::<$ty>($name, rhs, self)
                }
            }
        )*
    };
}
