//! Core types for array shapes, values, and element types.

use crate::{Error, Result};

/// Element type of an [`Array`].
///
/// Variants are declared in promotion order: combining two arrays casts both
/// operands to the larger of their data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    Bool,
    U8,
    I64,
    F64,
}

impl DataType {
    /// Common type two operands are cast to before combination.
    pub fn promote(self, other: DataType) -> DataType {
        self.max(other)
    }

    /// Check if this is an integer or boolean type.
    pub fn is_integral(self) -> bool {
        !matches!(self, DataType::F64)
    }
}

/// Raw array storage.
///
/// Separated from metadata (shape) so combination functions can match on the
/// element type once and work on plain slices.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Bool(Vec<bool>),
    U8(Vec<u8>),
    I64(Vec<i64>),
    F64(Vec<f64>),
}

impl ArrayData {
    /// Get the number of elements in this data.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Bool(v) => v.len(),
            ArrayData::U8(v) => v.len(),
            ArrayData::I64(v) => v.len(),
            ArrayData::F64(v) => v.len(),
        }
    }

    /// Check if this data is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the data type of the stored elements.
    pub fn dtype(&self) -> DataType {
        match self {
            ArrayData::Bool(_) => DataType::Bool,
            ArrayData::U8(_) => DataType::U8,
            ArrayData::I64(_) => DataType::I64,
            ArrayData::F64(_) => DataType::F64,
        }
    }

    /// Convert every element to `target`.
    ///
    /// Float to integer conversion truncates toward zero (saturating at the
    /// integer bounds, NaN maps to 0).
    pub fn cast(&self, target: DataType) -> ArrayData {
        if self.dtype() == target {
            return self.clone();
        }

        match (self, target) {
            (ArrayData::Bool(v), DataType::U8) => ArrayData::U8(v.iter().map(|&x| x as u8).collect()),
            (ArrayData::Bool(v), DataType::I64) => {
                ArrayData::I64(v.iter().map(|&x| x as i64).collect())
            }
            (ArrayData::Bool(v), DataType::F64) => {
                ArrayData::F64(v.iter().map(|&x| if x { 1.0 } else { 0.0 }).collect())
            }
            (ArrayData::U8(v), DataType::Bool) => ArrayData::Bool(v.iter().map(|&x| x != 0).collect()),
            (ArrayData::U8(v), DataType::I64) => ArrayData::I64(v.iter().map(|&x| x as i64).collect()),
            (ArrayData::U8(v), DataType::F64) => ArrayData::F64(v.iter().map(|&x| x as f64).collect()),
            (ArrayData::I64(v), DataType::Bool) => {
                ArrayData::Bool(v.iter().map(|&x| x != 0).collect())
            }
            (ArrayData::I64(v), DataType::U8) => ArrayData::U8(v.iter().map(|&x| x as u8).collect()),
            (ArrayData::I64(v), DataType::F64) => {
                ArrayData::F64(v.iter().map(|&x| x as f64).collect())
            }
            (ArrayData::F64(v), DataType::Bool) => {
                ArrayData::Bool(v.iter().map(|&x| x != 0.0).collect())
            }
            (ArrayData::F64(v), DataType::U8) => ArrayData::U8(v.iter().map(|&x| x as u8).collect()),
            (ArrayData::F64(v), DataType::I64) => {
                ArrayData::I64(v.iter().map(|&x| x as i64).collect())
            }
            // Same-type pairs were handled above.
            _ => self.clone(),
        }
    }
}

/// An n-dimensional, row-major array operand.
///
/// Bundles data and shape so elementwise functions can broadcast. A scalar is
/// an array with shape `[]` and exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    data: ArrayData,
    shape: Vec<usize>,
}

impl Array {
    /// Create a new array, checking that the data length matches the shape.
    pub fn new(data: ArrayData, shape: Vec<usize>) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::Shape(format!(
                "data length {} doesn't match shape {:?} (product = {})",
                data.len(),
                shape,
                expected_len
            )));
        }
        Ok(Self { data, shape })
    }

    /// Create a one-dimensional f64 array.
    pub fn from_f64(values: Vec<f64>) -> Self {
        let shape = vec![values.len()];
        Self {
            data: ArrayData::F64(values),
            shape,
        }
    }

    /// Create a one-dimensional i64 array.
    pub fn from_i64(values: Vec<i64>) -> Self {
        let shape = vec![values.len()];
        Self {
            data: ArrayData::I64(values),
            shape,
        }
    }

    /// Create a one-dimensional bool array.
    pub fn from_bool(values: Vec<bool>) -> Self {
        let shape = vec![values.len()];
        Self {
            data: ArrayData::Bool(values),
            shape,
        }
    }

    /// Create a one-dimensional u8 array.
    pub fn from_u8(values: Vec<u8>) -> Self {
        let shape = vec![values.len()];
        Self {
            data: ArrayData::U8(values),
            shape,
        }
    }

    pub fn scalar_f64(value: f64) -> Self {
        Self {
            data: ArrayData::F64(vec![value]),
            shape: vec![],
        }
    }

    pub fn scalar_i64(value: i64) -> Self {
        Self {
            data: ArrayData::I64(vec![value]),
            shape: vec![],
        }
    }

    pub fn scalar_bool(value: bool) -> Self {
        Self {
            data: ArrayData::Bool(vec![value]),
            shape: vec![],
        }
    }

    /// Get the raw data.
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Consume the array and return its raw data.
    pub fn into_data(self) -> ArrayData {
        self.data
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DataType {
        self.data.dtype()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if this array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Try to get as f64 slice.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.data {
            ArrayData::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as i64 slice.
    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.data {
            ArrayData::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as bool slice.
    pub fn as_bool(&self) -> Option<&[bool]> {
        match &self.data {
            ArrayData::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as u8 slice.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            ArrayData::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Create a new array with a different shape (data unchanged).
    pub fn reshape(&self, new_shape: Vec<usize>) -> Result<Self> {
        Self::new(self.data.clone(), new_shape)
    }

    /// Cast this array to a different element type.
    pub fn cast(&self, target: DataType) -> Array {
        Self {
            data: self.data.cast(target),
            shape: self.shape.clone(),
        }
    }

    /// Read the only element of a single-element array as f64.
    pub fn item_f64(&self) -> Result<f64> {
        if self.len() != 1 {
            return Err(Error::Shape(format!(
                "can only convert an array of size 1 to a scalar, got shape {:?}",
                self.shape
            )));
        }
        match self.data.cast(DataType::F64) {
            ArrayData::F64(v) => Ok(v[0]),
            other => Err(Error::Unsupported(format!(
                "cast to F64 produced {:?}",
                other.dtype()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        let ok = Array::new(ArrayData::I64(vec![1, 2, 3, 4, 5, 6]), vec![2, 3]);
        assert!(ok.is_ok());

        let bad = Array::new(ArrayData::I64(vec![1, 2, 3]), vec![2, 3]);
        assert!(matches!(bad, Err(Error::Shape(_))));
    }

    #[test]
    fn test_scalar_has_empty_shape() {
        let s = Array::scalar_f64(2.5);
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.item_f64().unwrap(), 2.5);
    }

    #[test]
    fn test_promotion_order() {
        assert_eq!(DataType::Bool.promote(DataType::U8), DataType::U8);
        assert_eq!(DataType::I64.promote(DataType::U8), DataType::I64);
        assert_eq!(DataType::I64.promote(DataType::F64), DataType::F64);
        assert!(DataType::I64.is_integral());
        assert!(!DataType::F64.is_integral());
    }

    #[test]
    fn test_cast() {
        let a = Array::from_f64(vec![1.9, -2.7, 0.0]);
        assert_eq!(a.cast(DataType::I64).as_i64(), Some(&[1, -2, 0][..]));
        assert_eq!(
            a.cast(DataType::Bool).as_bool(),
            Some(&[true, true, false][..])
        );

        let b = Array::from_bool(vec![true, false]);
        assert_eq!(b.cast(DataType::F64).as_f64(), Some(&[1.0, 0.0][..]));
    }

    #[test]
    fn test_reshape() {
        let a = Array::from_i64(vec![1, 2, 3, 4]);
        let r = a.reshape(vec![2, 2]).unwrap();
        assert_eq!(r.shape(), &[2, 2]);
        assert!(a.reshape(vec![3]).is_err());
    }

    #[test]
    fn test_item_requires_single_element() {
        assert!(Array::from_i64(vec![1, 2]).item_f64().is_err());
        assert_eq!(Array::from_i64(vec![7]).item_f64().unwrap(), 7.0);
    }
}
