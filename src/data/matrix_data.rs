//! Coordinate-format matrix data over a (global or local) index space.
//!
//! A matrix is an unordered bag of [`MatrixEntry`] triples. Duplicated
//! coordinates are legal; consumers sum them, and [`MatrixData::sum_duplicates`]
//! does so explicitly.

use std::ops::Add;

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::algs::executor::{Executor, SerialExec};
use crate::algs::sort::{reduce_by_key, sort_row_major};
use crate::dist_error::DistError;
use crate::index::{IndexLike, ValueLike, index_to_usize};

/// One `(row, column, value)` triple.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry<V, I> {
    pub row: I,
    pub column: I,
    pub value: V,
}

impl<V, I> MatrixEntry<V, I> {
    pub fn new(row: I, column: I, value: V) -> Self {
        Self { row, column, value }
    }
}

impl<V, I: Copy> MatrixEntry<V, I> {
    /// Row-major ordering key.
    #[inline]
    pub fn key(&self) -> (I, I) {
        (self.row, self.column)
    }
}

/// Dimensions plus coordinate entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixData<V, I> {
    /// `(rows, columns)`.
    pub size: (usize, usize),
    pub entries: Vec<MatrixEntry<V, I>>,
}

impl<V, I> MatrixData<V, I>
where
    V: ValueLike,
    I: IndexLike,
{
    pub fn new(size: (usize, usize)) -> Self {
        Self {
            size,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(size: (usize, usize), entries: Vec<MatrixEntry<V, I>>) -> Self {
        Self { size, entries }
    }

    pub fn push(&mut self, row: I, column: I, value: V) {
        self.entries.push(MatrixEntry::new(row, column, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if entries are sorted by `(row, column)`.
    pub fn is_row_major_ordered(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].key() <= w[1].key())
    }

    /// Stable sort by `(row, column)`.
    pub fn ensure_row_major_order(&mut self) {
        sort_row_major(&SerialExec, &mut self.entries);
    }

    /// Same as [`Self::ensure_row_major_order`] on a chosen executor.
    pub fn ensure_row_major_order_on<E: Executor>(&mut self, exec: &E) {
        sort_row_major(exec, &mut self.entries);
    }

    /// Drop entries whose value is exactly zero.
    pub fn remove_zeros(&mut self)
    where
        V: Zero,
    {
        self.entries.retain(|e| !e.value.is_zero());
    }

    /// Sort row-major and merge entries at the same coordinate by addition.
    pub fn sum_duplicates(&mut self)
    where
        V: Add<Output = V>,
    {
        self.ensure_row_major_order();
        let entries = std::mem::take(&mut self.entries);
        self.entries = reduce_by_key(entries, |e| e.key(), |acc, e| acc.value = acc.value + e.value);
    }

    /// Check every entry against `size`.
    ///
    /// # Errors
    /// [`DistError::OutOfRange`] for the first entry outside the matrix.
    pub fn validate_bounds(&self) -> Result<(), DistError> {
        let (rows, cols) = self.size;
        for e in &self.entries {
            let row = index_to_usize(e.row).map_err(|_| DistError::out_of_range(e.row, rows))?;
            if row >= rows {
                return Err(DistError::out_of_range(e.row, rows));
            }
            let col =
                index_to_usize(e.column).map_err(|_| DistError::out_of_range(e.column, cols))?;
            if col >= cols {
                return Err(DistError::out_of_range(e.column, cols));
            }
        }
        Ok(())
    }
}
