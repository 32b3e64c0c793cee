//! Per-type operator table.

use std::collections::HashMap;

use tessera_core::{Error, Result};

use crate::attach::{BinaryMethod, UnaryMethod};

/// Operators installed for one target type.
///
/// The table is the attribute namespace of the target type `T`: type modifiers
/// install [`BinaryMethod`]s and [`UnaryMethod`]s into it by name, and the
/// type's operator implementations look them up. Binary and unary operators
/// share one namespace, so installing a name removes any previous operator of
/// the other arity under that name.
///
/// `O` is the type of the right-hand operand and `R` the result type that the
/// translate functions produce.
///
/// # Example
///
/// ```ignore
/// let table = OperatorTable::for_type();
/// let table = attach_binary_operators(translate, None)?.apply(table);
///
/// let sum = table.call_binary("add", &a, &b);
/// ```
pub struct OperatorTable<T, O, R> {
    type_name: String,
    /// Map from operator name to installed binary method.
    binary: HashMap<String, BinaryMethod<T, O, R>>,
    /// Map from operator name to installed unary method.
    unary: HashMap<String, UnaryMethod<T, R>>,
}

impl<T, O, R> OperatorTable<T, O, R> {
    /// Create an empty table labelled `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            binary: HashMap::new(),
            unary: HashMap::new(),
        }
    }

    /// Create an empty table labelled with the short name of `T`.
    pub fn for_type() -> Self {
        let full = std::any::type_name::<T>();
        // Drop generic arguments before taking the last path segment
        let base = full.split('<').next().unwrap_or(full);
        let short = base.rsplit("::").next().unwrap_or(base);
        Self::new(short)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn install_binary(&mut self, method: BinaryMethod<T, O, R>) {
        self.unary.remove(method.name());
        self.binary.insert(method.name().to_string(), method);
    }

    pub(crate) fn install_unary(&mut self, method: UnaryMethod<T, R>) {
        self.binary.remove(method.name());
        self.unary.insert(method.name().to_string(), method);
    }

    /// Look up a binary operator by name.
    ///
    /// Returns `None` if no binary operator is installed under the name.
    pub fn binary(&self, name: &str) -> Option<&BinaryMethod<T, O, R>> {
        self.binary.get(name)
    }

    /// Look up a unary operator by name.
    pub fn unary(&self, name: &str) -> Option<&UnaryMethod<T, R>> {
        self.unary.get(name)
    }

    /// Invoke a binary operator, or return `None` if it is not installed.
    pub fn call_binary(&self, name: &str, this: &T, other: &O) -> Option<R> {
        self.binary(name).map(|method| method.call(this, other))
    }

    /// Invoke a unary operator, or return `None` if it is not installed.
    pub fn call_unary(&self, name: &str, this: &T) -> Option<R> {
        self.unary(name).map(|method| method.call(this))
    }

    /// Check if an operator of either arity is installed.
    pub fn contains(&self, name: &str) -> bool {
        self.binary.contains_key(name) || self.unary.contains_key(name)
    }

    /// Fail with [`Error::Configuration`] unless every name is installed.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration(format!(
                "{} is missing operators: {}",
                self.type_name,
                missing.join(", ")
            )))
        }
    }

    /// Iterate over installed binary operator names.
    pub fn binary_names(&self) -> impl Iterator<Item = &str> {
        self.binary.keys().map(|s| s.as_str())
    }

    /// Iterate over installed unary operator names.
    pub fn unary_names(&self) -> impl Iterator<Item = &str> {
        self.unary.keys().map(|s| s.as_str())
    }

    /// Get the number of installed operators.
    pub fn len(&self) -> usize {
        self.binary.len() + self.unary.len()
    }

    /// Check if no operators are installed.
    pub fn is_empty(&self) -> bool {
        self.binary.is_empty() && self.unary.is_empty()
    }
}

impl<T, O, R> Default for OperatorTable<T, O, R> {
    fn default() -> Self {
        Self::for_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attach::{attach_binary_operators, attach_unary_operators};
    use crate::catalog::Catalog;
    use crate::combine::{BinaryCombine, UnaryCombine};
    use tessera_core::{Array, elementwise};

    struct Probe;

    fn binary_table() -> OperatorTable<Array, Array, Result<Array>> {
        let modifier = attach_binary_operators(
            |a: &Array, b: &Array, f: &BinaryCombine| f.call(a, b),
            None,
        )
        .unwrap();
        modifier.apply(OperatorTable::new("Array"))
    }

    #[test]
    fn test_for_type_uses_short_name() {
        let table: OperatorTable<Probe, Probe, ()> = OperatorTable::for_type();
        assert_eq!(table.type_name(), "Probe");

        let table: OperatorTable<Vec<u8>, (), ()> = OperatorTable::for_type();
        assert_eq!(table.type_name(), "Vec");
    }

    #[test]
    fn test_empty_table() {
        let table: OperatorTable<Probe, Probe, ()> = OperatorTable::new("Probe");
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.binary("add").is_none());
        assert!(table.call_unary("neg", &Probe).is_none());
    }

    #[test]
    fn test_call_binary() {
        let table = binary_table();
        let a = Array::from_i64(vec![1, 2]);
        let b = Array::from_i64(vec![10, 20]);

        let sum = table.call_binary("add", &a, &b).unwrap().unwrap();
        assert_eq!(sum.as_i64().unwrap(), &[11, 22]);
        assert!(table.call_binary("missing", &a, &b).is_none());
    }

    #[test]
    fn test_qualname_uses_table_type_name() {
        let table = binary_table();
        let method = table.binary("rsub").unwrap();
        assert_eq!(method.name(), "rsub");
        assert_eq!(method.qualname(), "Array.rsub");
    }

    #[test]
    fn test_require() {
        let table = binary_table();
        assert!(table.require(&["add", "sub", "eq"]).is_ok());

        let err = table.require(&["add", "neg", "abs"]).unwrap_err();
        assert_eq!(
            err,
            Error::Configuration("Array is missing operators: neg, abs".to_string())
        );
    }

    #[test]
    fn test_names_share_one_namespace() {
        let mut table = binary_table();
        assert!(table.binary("abs").is_none());

        let catalog = Catalog::builder()
            .operator("add", UnaryCombine::new("absolute", elementwise::absolute))
            .build();
        attach_unary_operators(|a: &Array, f: &UnaryCombine| f.call(a), Some(&catalog))
            .unwrap()
            .apply_to(&mut table);

        assert!(table.binary("add").is_none());
        assert_eq!(table.unary("add").unwrap().qualname(), "Array.add");
        assert_eq!(table.len(), 26);
    }
}
