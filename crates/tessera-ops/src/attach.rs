//! Operator attachment.
//!
//! [`attach_binary_operators`] and [`attach_unary_operators`] validate a
//! catalog and return a type modifier. Applying the modifier installs one
//! method descriptor per catalog entry into an [`OperatorTable`].
//!
//! Every descriptor owns its own handle to the translate function and its own
//! combination function; nothing is shared mutably between descriptors, so
//! installing one operator can never change what another one calls.

use std::fmt;
use std::sync::Arc;

use tessera_core::{Error, Result};
use tracing::{debug, warn};

use crate::catalog::{
    BinaryCatalog, Catalog, UnaryCatalog, default_binary_catalog, default_unary_catalog,
};
use crate::combine::{BinaryCombine, UnaryCombine};
use crate::table::OperatorTable;

/// Binary translate function: `(self, other, combine) -> result`.
pub type BinaryTranslate<T, O, R> = dyn Fn(&T, &O, &BinaryCombine) -> R + Send + Sync;

/// Unary translate function: `(self, combine) -> result`.
pub type UnaryTranslate<T, R> = dyn Fn(&T, &UnaryCombine) -> R + Send + Sync;

/// An installed binary operator.
pub struct BinaryMethod<T, O, R> {
    name: String,
    qualname: String,
    translate: Arc<BinaryTranslate<T, O, R>>,
    func: BinaryCombine,
}

impl<T, O, R> BinaryMethod<T, O, R> {
    /// Catalog key this method was installed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `"<TypeName>.<name>"`.
    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    /// Combination function captured at installation.
    pub fn combine(&self) -> &BinaryCombine {
        &self.func
    }

    /// Invoke the operator: `translate(this, other, func)`.
    pub fn call(&self, this: &T, other: &O) -> R {
        (self.translate)(this, other, &self.func)
    }

    fn bind(&self, type_name: &str) -> Self {
        Self {
            name: self.name.clone(),
            qualname: format!("{type_name}.{}", self.name),
            translate: Arc::clone(&self.translate),
            func: self.func.clone(),
        }
    }
}

impl<T, O, R> Clone for BinaryMethod<T, O, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            qualname: self.qualname.clone(),
            translate: Arc::clone(&self.translate),
            func: self.func.clone(),
        }
    }
}

impl<T, O, R> fmt::Debug for BinaryMethod<T, O, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryMethod")
            .field("qualname", &self.qualname)
            .field("func", &self.func)
            .finish()
    }
}

/// An installed unary operator.
pub struct UnaryMethod<T, R> {
    name: String,
    qualname: String,
    translate: Arc<UnaryTranslate<T, R>>,
    func: UnaryCombine,
}

impl<T, R> UnaryMethod<T, R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    pub fn combine(&self) -> &UnaryCombine {
        &self.func
    }

    /// Invoke the operator: `translate(this, func)`.
    pub fn call(&self, this: &T) -> R {
        (self.translate)(this, &self.func)
    }

    fn bind(&self, type_name: &str) -> Self {
        Self {
            name: self.name.clone(),
            qualname: format!("{type_name}.{}", self.name),
            translate: Arc::clone(&self.translate),
            func: self.func.clone(),
        }
    }
}

impl<T, R> Clone for UnaryMethod<T, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            qualname: self.qualname.clone(),
            translate: Arc::clone(&self.translate),
            func: self.func.clone(),
        }
    }
}

impl<T, R> fmt::Debug for UnaryMethod<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryMethod")
            .field("qualname", &self.qualname)
            .field("func", &self.func)
            .finish()
    }
}

/// Type modifier installing binary operators.
pub struct BinaryModifier<T, O, R> {
    methods: Vec<BinaryMethod<T, O, R>>,
}

impl<T, O, R> BinaryModifier<T, O, R> {
    /// Install every operator into `table` and return it.
    pub fn apply(&self, mut table: OperatorTable<T, O, R>) -> OperatorTable<T, O, R> {
        self.apply_to(&mut table);
        table
    }

    /// Install every operator into `table` in place.
    ///
    /// Existing operators with the same names are replaced; other entries are
    /// left alone.
    pub fn apply_to(&self, table: &mut OperatorTable<T, O, R>) {
        for method in &self.methods {
            let bound = method.bind(table.type_name());
            debug!(qualname = bound.qualname(), func = %bound.combine(), "installing binary operator");
            table.install_binary(bound);
        }
        debug!(
            type_name = table.type_name(),
            count = self.methods.len(),
            "binary operators attached"
        );
    }

    /// Names this modifier installs, in catalog order.
    pub fn operator_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.name())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Type modifier installing unary operators.
pub struct UnaryModifier<T, R> {
    methods: Vec<UnaryMethod<T, R>>,
}

impl<T, R> UnaryModifier<T, R> {
    /// Install every operator into `table` and return it.
    pub fn apply<O>(&self, mut table: OperatorTable<T, O, R>) -> OperatorTable<T, O, R> {
        self.apply_to(&mut table);
        table
    }

    /// Install every operator into `table` in place.
    pub fn apply_to<O>(&self, table: &mut OperatorTable<T, O, R>) {
        for method in &self.methods {
            let bound = method.bind(table.type_name());
            debug!(qualname = bound.qualname(), func = %bound.combine(), "installing unary operator");
            table.install_unary(bound);
        }
        debug!(
            type_name = table.type_name(),
            count = self.methods.len(),
            "unary operators attached"
        );
    }

    pub fn operator_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.name())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Build a type modifier that installs binary operators.
///
/// `translate` receives the receiver, the other operand and the combination
/// function of the invoked operator, and decides how operands are unwrapped
/// and how the result is wrapped. `catalog` defaults to
/// [`default_binary_catalog`].
///
/// Every catalog entry is validated here, before anything is installed: an
/// entry with an empty name or without `func` fails with
/// [`Error::Configuration`].
pub fn attach_binary_operators<T, O, R, F>(
    translate: F,
    catalog: Option<&BinaryCatalog>,
) -> Result<BinaryModifier<T, O, R>>
where
    F: Fn(&T, &O, &BinaryCombine) -> R + Send + Sync + 'static,
{
    let catalog = match catalog {
        Some(catalog) => catalog,
        None => default_binary_catalog(),
    };
    let funcs = validate(catalog, "binary")?;

    let translate: Arc<BinaryTranslate<T, O, R>> = Arc::new(translate);
    let methods = funcs
        .into_iter()
        .map(|(name, func)| BinaryMethod {
            name: name.to_string(),
            qualname: name.to_string(),
            translate: Arc::clone(&translate),
            func: func.clone(),
        })
        .collect();

    Ok(BinaryModifier { methods })
}

/// Build a type modifier that installs unary operators.
///
/// Same contract as [`attach_binary_operators`] with a one-operand translate
/// function; `catalog` defaults to [`default_unary_catalog`].
pub fn attach_unary_operators<T, R, F>(
    translate: F,
    catalog: Option<&UnaryCatalog>,
) -> Result<UnaryModifier<T, R>>
where
    F: Fn(&T, &UnaryCombine) -> R + Send + Sync + 'static,
{
    let catalog = match catalog {
        Some(catalog) => catalog,
        None => default_unary_catalog(),
    };
    let funcs = validate(catalog, "unary")?;

    let translate: Arc<UnaryTranslate<T, R>> = Arc::new(translate);
    let methods = funcs
        .into_iter()
        .map(|(name, func)| UnaryMethod {
            name: name.to_string(),
            qualname: name.to_string(),
            translate: Arc::clone(&translate),
            func: func.clone(),
        })
        .collect();

    Ok(UnaryModifier { methods })
}

/// Check every entry and collect `(name, func)` pairs in catalog order.
fn validate<'a, F>(catalog: &'a Catalog<F>, kind: &str) -> Result<Vec<(&'a str, &'a F)>> {
    let mut funcs = Vec::with_capacity(catalog.len());
    for (name, settings) in catalog.iter() {
        if name.is_empty() {
            warn!(kind, "rejecting catalog entry with an empty name");
            return Err(Error::Configuration(format!(
                "{kind} catalog contains an entry with an empty name"
            )));
        }
        let Some(func) = settings.func() else {
            warn!(kind, operator = name, "rejecting catalog entry without func");
            return Err(Error::Configuration(format!(
                "{kind} catalog entry `{name}` has no `func`"
            )));
        };
        funcs.push((name, func));
    }
    Ok(funcs)
}
