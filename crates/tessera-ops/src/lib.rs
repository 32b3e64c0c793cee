//! Operator catalogs and operator attachment for array-like types.
//!
//! This crate installs arithmetic, comparison and bitwise operators on a
//! domain type without writing each operator by hand. The domain type supplies
//! a *translate* function that unwraps its operands into [`Array`]s, calls the
//! combination function of the invoked operator and wraps the result.
//!
//! # Catalogs
//!
//! - **Binary**: `eq ne lt gt le ge`, `add sub mul pow mod floordiv truediv`
//!   and their reflected forms (`radd`, `rsub`, ...), `and or xor` and
//!   `rand ror rxor`
//! - **Unary**: `neg pos abs invert`
//!
//! # Attaching
//!
//! ```ignore
//! let table = OperatorTable::for_type();
//! let table = attach_binary_operators(translate_binary, None)?.apply(table);
//! let table = attach_unary_operators(translate_unary, None)?.apply(table);
//! ```
//!
//! The resulting [`OperatorTable`] is exposed through [`AttachedOperators`]
//! and turned into `std::ops` impls with [`impl_operators!`].

pub mod attach;
pub mod catalog;
pub mod combine;
pub mod conformance;
pub mod table;

pub use attach::{
    BinaryMethod, BinaryModifier, UnaryMethod, UnaryModifier, attach_binary_operators,
    attach_unary_operators,
};
pub use catalog::{
    BinaryCatalog, Catalog, CatalogBuilder, OperatorSettings, UnaryCatalog,
    default_binary_catalog, default_unary_catalog,
};
pub use combine::{BinaryCombine, UnaryCombine};
pub use conformance::{AttachedOperators, OperatorMethods};
pub use table::OperatorTable;

pub use tessera_core::{Array, Error, Result};
