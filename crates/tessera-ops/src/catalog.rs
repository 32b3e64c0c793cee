//! Operator catalogs.
//!
//! A catalog is an ordered, frozen mapping from operator name to the settings
//! used to install that operator. Catalogs are assembled with a
//! [`CatalogBuilder`] and have no mutating API once built; derive a new one
//! with [`Catalog::to_builder`].

use std::fmt;
use std::sync::OnceLock;

use serde_json::{Map, Value};
use tessera_core::elementwise;

use crate::combine::{BinaryCombine, UnaryCombine};

/// Settings for one catalog entry.
///
/// `func` is optional so that catalogs assembled from dynamic sources can be
/// represented and then rejected when a modifier is constructed.
#[derive(Debug, Clone)]
pub struct OperatorSettings<F> {
    func: Option<F>,
    doc: Option<String>,
}

impl<F> OperatorSettings<F> {
    /// Settings with a combination function.
    pub fn new(func: F) -> Self {
        Self {
            func: Some(func),
            doc: None,
        }
    }

    /// Settings without a combination function.
    pub fn empty() -> Self {
        Self {
            func: None,
            doc: None,
        }
    }

    /// Attach a one-line description.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn func(&self) -> Option<&F> {
        self.func.as_ref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

impl<F> Default for OperatorSettings<F> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Ordered, read-only mapping from operator name to settings.
#[derive(Debug, Clone)]
pub struct Catalog<F> {
    entries: Vec<(String, OperatorSettings<F>)>,
}

/// Catalog of binary operators.
pub type BinaryCatalog = Catalog<BinaryCombine>;

/// Catalog of unary operators.
pub type UnaryCatalog = Catalog<UnaryCombine>;

impl<F> Catalog<F> {
    /// Start building a new catalog.
    pub fn builder() -> CatalogBuilder<F> {
        CatalogBuilder::new()
    }

    /// Look up settings by operator name.
    pub fn get(&self, name: &str) -> Option<&OperatorSettings<F>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, settings)| settings)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operator names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperatorSettings<F>)> {
        self.entries
            .iter()
            .map(|(key, settings)| (key.as_str(), settings))
    }
}

impl<F: Clone> Catalog<F> {
    /// Copy this catalog into a builder to derive a new one.
    pub fn to_builder(&self) -> CatalogBuilder<F> {
        CatalogBuilder {
            entries: self.entries.clone(),
        }
    }
}

impl<F: fmt::Display> Catalog<F> {
    /// Render the catalog as a pretty-printed JSON object of
    /// `name -> function`, in catalog order.
    ///
    /// ```text
    /// {
    ///   "add": "add",
    ///   "radd": "add(other, self)"
    /// }
    /// ```
    pub fn to_doc(&self) -> String {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, settings)| {
                let func = settings
                    .func()
                    .map_or_else(|| "<missing>".to_string(), |f| f.to_string());
                (key.clone(), Value::String(func))
            })
            .collect();
        format!("{:#}", Value::Object(map))
    }
}

/// Builder for [`Catalog`].
///
/// Inserting a name that already exists replaces its settings and keeps the
/// position of the first insertion.
#[derive(Debug, Clone)]
pub struct CatalogBuilder<F> {
    entries: Vec<(String, OperatorSettings<F>)>,
}

impl<F> CatalogBuilder<F> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace an entry.
    pub fn insert(mut self, name: impl Into<String>, settings: OperatorSettings<F>) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = settings,
            None => self.entries.push((name, settings)),
        }
        self
    }

    /// Insert or replace an entry with just a combination function.
    pub fn operator(self, name: impl Into<String>, func: F) -> Self {
        self.insert(name, OperatorSettings::new(func))
    }

    /// Remove an entry if present.
    pub fn remove(mut self, name: &str) -> Self {
        self.entries.retain(|(key, _)| key != name);
        self
    }

    /// Freeze the entries into a catalog.
    pub fn build(self) -> Catalog<F> {
        Catalog {
            entries: self.entries,
        }
    }
}

impl<F> Default for CatalogBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

static BINARY_CATALOG: OnceLock<BinaryCatalog> = OnceLock::new();
static UNARY_CATALOG: OnceLock<UnaryCatalog> = OnceLock::new();

/// Built-in catalog of comparison, arithmetic and bitwise binary operators.
///
/// Reflected entries (`radd`, `rsub`, ...) reuse the function of their
/// forward entry with the operands swapped.
pub fn default_binary_catalog() -> &'static BinaryCatalog {
    BINARY_CATALOG.get_or_init(build_binary_catalog)
}

/// Built-in catalog of unary operators.
pub fn default_unary_catalog() -> &'static UnaryCatalog {
    UNARY_CATALOG.get_or_init(build_unary_catalog)
}

fn build_binary_catalog() -> BinaryCatalog {
    let add = BinaryCombine::new("add", elementwise::add);
    let sub = BinaryCombine::new("subtract", elementwise::subtract);
    let mul = BinaryCombine::new("multiply", elementwise::multiply);
    let pow = BinaryCombine::new("power", elementwise::power);
    let rem = BinaryCombine::new("modulo", elementwise::modulo);
    let floordiv = BinaryCombine::new("floor_divide", elementwise::floor_divide);
    let truediv = BinaryCombine::new("true_divide", elementwise::true_divide);
    let and = BinaryCombine::new("bitwise_and", elementwise::bitwise_and);
    let or = BinaryCombine::new("bitwise_or", elementwise::bitwise_or);
    let xor = BinaryCombine::new("bitwise_xor", elementwise::bitwise_xor);

    Catalog::builder()
        .operator("eq", BinaryCombine::new("equal", elementwise::equal))
        .operator("ne", BinaryCombine::new("not_equal", elementwise::not_equal))
        .operator("lt", BinaryCombine::new("less", elementwise::less))
        .operator("gt", BinaryCombine::new("greater", elementwise::greater))
        .operator("le", BinaryCombine::new("less_equal", elementwise::less_equal))
        .operator(
            "ge",
            BinaryCombine::new("greater_equal", elementwise::greater_equal),
        )
        // arithmetic
        .operator("add", add.clone())
        .operator("sub", sub.clone())
        .operator("mul", mul.clone())
        .operator("pow", pow.clone())
        .operator("mod", rem.clone())
        .operator("floordiv", floordiv.clone())
        .operator("truediv", truediv.clone())
        .operator("radd", add.swapped())
        .operator("rsub", sub.swapped())
        .operator("rmul", mul.swapped())
        .operator("rpow", pow.swapped())
        .operator("rmod", rem.swapped())
        .operator("rfloordiv", floordiv.swapped())
        .operator("rtruediv", truediv.swapped())
        // masks
        .operator("and", and.clone())
        .operator("or", or.clone())
        .operator("xor", xor.clone())
        .operator("rand", and.swapped())
        .operator("ror", or.swapped())
        .operator("rxor", xor.swapped())
        .build()
}

fn build_unary_catalog() -> UnaryCatalog {
    Catalog::builder()
        .operator("neg", UnaryCombine::new("negative", elementwise::negative))
        .operator("pos", UnaryCombine::new("positive", elementwise::positive))
        .operator("abs", UnaryCombine::new("absolute", elementwise::absolute))
        .operator("invert", UnaryCombine::new("invert", elementwise::invert))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::Array;

    #[test]
    fn test_default_binary_names_in_order() {
        let names: Vec<_> = default_binary_catalog().names().collect();
        assert_eq!(
            names,
            vec![
                "eq", "ne", "lt", "gt", "le", "ge", "add", "sub", "mul", "pow", "mod",
                "floordiv", "truediv", "radd", "rsub", "rmul", "rpow", "rmod", "rfloordiv",
                "rtruediv", "and", "or", "xor", "rand", "ror", "rxor",
            ]
        );
    }

    #[test]
    fn test_default_unary_names_in_order() {
        let names: Vec<_> = default_unary_catalog().names().collect();
        assert_eq!(names, vec!["neg", "pos", "abs", "invert"]);
    }

    #[test]
    fn test_default_catalog_is_shared() {
        assert!(std::ptr::eq(default_binary_catalog(), default_binary_catalog()));
        assert!(std::ptr::eq(default_unary_catalog(), default_unary_catalog()));
    }

    #[test]
    fn test_reflected_entries_share_forward_function() {
        let catalog = default_binary_catalog();
        for (forward, reflected) in [
            ("add", "radd"),
            ("sub", "rsub"),
            ("mul", "rmul"),
            ("pow", "rpow"),
            ("mod", "rmod"),
            ("floordiv", "rfloordiv"),
            ("truediv", "rtruediv"),
            ("and", "rand"),
            ("or", "ror"),
            ("xor", "rxor"),
        ] {
            let f = catalog.get(forward).unwrap().func().unwrap();
            let r = catalog.get(reflected).unwrap().func().unwrap();
            assert!(r.same_as(&f.swapped()), "{reflected} is not {forward} swapped");
        }
    }

    #[test]
    fn test_builder_replaces_in_place() {
        let catalog = Catalog::builder()
            .operator("a", UnaryCombine::new("negative", elementwise::negative))
            .operator("b", UnaryCombine::new("absolute", elementwise::absolute))
            .operator("a", UnaryCombine::new("positive", elementwise::positive))
            .build();

        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, vec!["a", "b"]);

        let a = catalog.get("a").unwrap().func().unwrap();
        let out = a.call(&Array::from_i64(vec![-2])).unwrap();
        assert_eq!(out.as_i64().unwrap(), &[-2]);
    }

    #[test]
    fn test_to_builder_leaves_original_untouched() {
        let derived = default_unary_catalog().to_builder().remove("invert").build();
        assert_eq!(derived.len(), 3);
        assert!(!derived.contains("invert"));
        assert!(default_unary_catalog().contains("invert"));
    }

    #[test]
    fn test_to_doc() {
        let catalog = Catalog::builder()
            .operator("add", BinaryCombine::new("add", elementwise::add))
            .insert("broken", OperatorSettings::empty())
            .build();
        assert_eq!(
            catalog.to_doc(),
            "{\n  \"add\": \"add\",\n  \"broken\": \"<missing>\"\n}"
        );
    }

    #[test]
    fn test_to_doc_escapes_names() {
        let catalog = Catalog::builder()
            .operator("say \"hi\"", BinaryCombine::new("add", elementwise::add))
            .operator("zz", BinaryCombine::new("multiply", elementwise::multiply))
            .operator("aa", BinaryCombine::new("add", elementwise::add).swapped())
            .build();

        let doc = catalog.to_doc();
        let parsed: Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed["say \"hi\""], "add");
        assert_eq!(parsed["aa"], "add(other, self)");

        // catalog order, not key order
        let keys: Vec<_> = parsed.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["say \"hi\"", "zz", "aa"]);
    }
}
