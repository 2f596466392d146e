//! Dense row-major 2D storage for sample, outcome and EVPPI matrices

use serde::{Deserialize, Serialize};

/// A fixed-shape 2D grid stored in row-major order.
///
/// The shape is set at construction and never changes; rows can be filled
/// in place through disjoint mutable chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    /// The data stored in row-major order
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

/// `n_samples x n_parameters` matrix of drawn input values
pub type SampleMatrix = Grid<f64>;

/// `n_samples x n_scenarios` matrix of model outcomes
pub type OutcomeMatrix = Grid<f64>;

impl<T: Clone> Grid<T> {
    /// Create a new grid filled with `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            data: vec![fill; rows * cols],
            rows,
            cols,
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(row, col)` for every cell in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let data = (0..rows * cols).map(|k| f(k / cols, k % cols)).collect();
        Self { data, rows, cols }
    }

    /// Parallel version of [`Grid::from_fn`]; cells are independent.
    #[cfg(feature = "parallel")]
    pub fn par_from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> T + Sync + Send) -> Self
    where
        T: Send,
    {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        let data = (0..rows * cols)
            .into_par_iter()
            .map(|k| f(k / cols, k % cols))
            .collect();
        Self { data, rows, cols }
    }

    /// Create a grid from existing row-major data.
    pub fn from_data(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> bool {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = value;
            true
        } else {
            false
        }
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row < self.rows {
            let start = row * self.cols;
            Some(&self.data[start..start + self.cols])
        } else {
            None
        }
    }

    /// Iterate over the values of one column, top to bottom
    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
        let cols = self.cols;
        let take = if col < cols { self.rows } else { 0 };
        self.data.iter().skip(col).step_by(cols.max(1)).take(take)
    }

    /// Mutable row-major data, for filling blocks of rows in place
    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl Grid<f64> {
    /// Copy one column out into a contiguous vector
    pub fn column_vec(&self, col: usize) -> Vec<f64> {
        self.column(col).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_indexing() {
        let grid = Grid::from_data(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.get(1, 2), Some(&6.0));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(grid.column_vec(1), vec![2.0, 5.0]);
    }

    #[test]
    fn test_out_of_range_column_is_empty() {
        let grid = Grid::new(3, 2, 0.0);
        assert_eq!(grid.column(5).count(), 0);
    }

    #[test]
    fn test_from_data_rejects_wrong_length() {
        assert!(Grid::from_data(2, 2, vec![1.0; 3]).is_none());
    }

    #[test]
    fn test_from_fn_row_major() {
        let grid = Grid::from_fn(2, 3, |r, c| (r * 10 + c) as f64);
        assert_eq!(grid.data(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_set() {
        let mut grid = Grid::new(2, 2, 0.0);
        assert!(grid.set(1, 0, 7.0));
        assert!(!grid.set(2, 0, 7.0));
        assert_eq!(grid.data(), &[0.0, 0.0, 7.0, 0.0]);
    }
}
