//! Row-major `f64` matrix used for draw batches and simulated paths.
//!
//! One row per path. Draw batches have one column per knot; the contracts in
//! [`crate::path_dependent`] return paths with the initial spot in column 0.

use pricer_core::types::PricingError;

use crate::rng::PricerRng;

/// Dense row-major matrix of shape `(rows, cols)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps row-major `data`.
    ///
    /// # Errors
    /// `InvalidConfiguration` when `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, PricingError> {
        if data.len() != rows * cols {
            return Err(PricingError::InvalidConfiguration(format!(
                "matrix data of length {} does not fit shape ({rows}, {cols})",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Antithetic standard normal batch `[Z; -Z]` of shape `(2 * half, cols)`.
    ///
    /// `Z` is drawn row by row from `rng`; row `i + half` is `-row(i)`.
    pub fn antithetic_normals(half: usize, cols: usize, rng: &mut PricerRng) -> Self {
        let n = half * cols;
        let mut data = vec![0.0; 2 * n];
        let (upper, lower) = data.split_at_mut(n);
        rng.fill_normal(upper);
        for (mirror, &z) in lower.iter_mut().zip(upper.iter()) {
            *mirror = -z;
        }
        Self {
            rows: 2 * half,
            cols,
            data,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    /// When out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(col < self.cols, "column {col} out of bounds ({})", self.cols);
        self.data[row * self.cols + col]
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterator over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact rejects 0; an empty-column matrix has no data anyway
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Mutable iterator over rows.
    pub fn iter_rows_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        let rows = self.rows;
        self.data.chunks_exact_mut(self.cols.max(1)).take(rows)
    }

    /// Row-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_vec_shape_check() {
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.get(0, 2), 3.0);
        assert!(matches!(
            Matrix::from_vec(2, 2, vec![1.0]),
            Err(PricingError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_row_iterators() {
        let mut m = Matrix::zeros(3, 2);
        for (i, row) in m.iter_rows_mut().enumerate() {
            row[0] = i as f64;
            row[1] = -(i as f64);
        }
        let firsts: Vec<f64> = m.iter_rows().map(|r| r[0]).collect();
        assert_eq!(firsts, vec![0.0, 1.0, 2.0]);
        assert_eq!(m.as_slice(), &[0.0, -0.0, 1.0, -1.0, 2.0, -2.0]);
    }

    #[test]
    fn test_zero_column_matrix_has_no_rows_to_iterate() {
        let m = Matrix::zeros(4, 0);
        assert_eq!(m.iter_rows().count(), 0);
    }

    #[test]
    fn test_antithetic_uses_upper_half_draws() {
        let mut rng = PricerRng::from_seed(11);
        let m = Matrix::antithetic_normals(3, 2, &mut rng);

        let mut replay = PricerRng::from_seed(11);
        let mut expected = [0.0; 6];
        replay.fill_normal(&mut expected);
        assert_eq!(&m.as_slice()[..6], &expected);
    }

    proptest! {
        #[test]
        fn prop_antithetic_rows_mirror(seed in any::<u64>(), half in 1usize..50, cols in 1usize..8) {
            let mut rng = PricerRng::from_seed(seed);
            let m = Matrix::antithetic_normals(half, cols, &mut rng);
            prop_assert_eq!(m.shape(), (2 * half, cols));
            for i in 0..half {
                for (a, b) in m.row(i).iter().zip(m.row(i + half)) {
                    prop_assert_eq!(*a, -*b);
                }
            }
        }
    }
}
