//! Array storage with row-major flat cells.

use std::collections::HashMap;

use crate::error::{BasicError, Result};
use crate::value::{BasicString, ValueType};
use crate::variables::VarName;

/// Maximum number of array dimensions
pub const MAX_DIMENSIONS: usize = 11;

/// Element count per dimension for arrays created by first reference
/// (legal indices 0..=10)
const DEFAULT_DIMENSION: usize = 11;

#[derive(Debug)]
enum Cells {
    Number(Vec<f64>),
    Str(Vec<BasicString>),
}

/// One array: its shape and flat cell storage
#[derive(Debug)]
pub struct Array {
    dims: Vec<usize>,
    cells: Cells,
}

impl Array {
    fn with_dims(ty: ValueType, dims: Vec<usize>) -> Self {
        let size = dims.iter().product();
        let cells = match ty {
            ValueType::Number => Cells::Number(vec![0.0; size]),
            ValueType::Str => Cells::Str(vec![BasicString::new(); size]),
        };
        Self { dims, cells }
    }

    /// The element counts per dimension
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    /// True when the array has no cells (a zero-sized dimension)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat offset for a full index tuple, row-major from the last
    /// dimension. The index count must match the dimension count and
    /// every index must be inside its dimension.
    fn offset(&self, indices: &[i32]) -> Result<usize> {
        if indices.len() != self.dims.len() {
            return Err(BasicError::BadSubscript);
        }

        let mut offset = 0;
        let mut stride = 1;
        for (&index, &dim) in indices.iter().zip(self.dims.iter()).rev() {
            if index < 0 || index as usize >= dim {
                return Err(BasicError::BadSubscript);
            }
            offset += index as usize * stride;
            stride *= dim;
        }
        Ok(offset)
    }
}

/// The array table. Reads and writes of undeclared arrays create them
/// with a single dimension of eleven cells.
#[derive(Debug, Default)]
pub struct Arrays {
    map: HashMap<VarName, Array>,
}

impl Arrays {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an array with explicit dimensions (element counts).
    /// Declaring a name twice is an error.
    pub fn dimension(&mut self, name: VarName, dims: &[usize]) -> Result<()> {
        if self.map.contains_key(&name) {
            return Err(BasicError::Redimensioned);
        }
        if dims.is_empty() || dims.len() > MAX_DIMENSIONS {
            return Err(BasicError::BadSubscript);
        }
        let array = Array::with_dims(name.ty, dims.to_vec());
        self.map.insert(name, array);
        Ok(())
    }

    fn entry(&mut self, name: &VarName) -> &mut Array {
        self.map
            .entry(name.clone())
            .or_insert_with(|| Array::with_dims(name.ty, vec![DEFAULT_DIMENSION]))
    }

    /// Read a numeric cell
    pub fn get_number(&mut self, name: &VarName, indices: &[i32]) -> Result<f64> {
        let array = self.entry(name);
        let offset = array.offset(indices)?;
        match &array.cells {
            Cells::Number(cells) => Ok(cells[offset]),
            Cells::Str(_) => Err(BasicError::TypeMismatch),
        }
    }

    /// Write a numeric cell
    pub fn set_number(&mut self, name: &VarName, indices: &[i32], value: f64) -> Result<()> {
        let array = self.entry(name);
        let offset = array.offset(indices)?;
        match &mut array.cells {
            Cells::Number(cells) => {
                cells[offset] = value;
                Ok(())
            }
            Cells::Str(_) => Err(BasicError::TypeMismatch),
        }
    }

    /// Read a string cell (an independent copy)
    pub fn get_string(&mut self, name: &VarName, indices: &[i32]) -> Result<BasicString> {
        let array = self.entry(name);
        let offset = array.offset(indices)?;
        match &array.cells {
            Cells::Str(cells) => Ok(cells[offset].clone()),
            Cells::Number(_) => Err(BasicError::TypeMismatch),
        }
    }

    /// Write a string cell
    pub fn set_string(
        &mut self,
        name: &VarName,
        indices: &[i32],
        value: BasicString,
    ) -> Result<()> {
        let array = self.entry(name);
        let offset = array.offset(indices)?;
        match &mut array.cells {
            Cells::Str(cells) => {
                cells[offset] = value;
                Ok(())
            }
            Cells::Number(_) => Err(BasicError::TypeMismatch),
        }
    }

    /// Look up an array without creating it
    pub fn get(&self, name: &VarName) -> Option<&Array> {
        self.map.get(name)
    }

    /// Remove every array
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
