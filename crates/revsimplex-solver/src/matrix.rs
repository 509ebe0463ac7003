/// Pivots smaller than this in absolute value mark a matrix as singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Dense row-major matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<Vec<f64>>,
    cols: usize,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![vec![0.0; cols]; rows],
            cols,
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::zeros(size, size);
        for i in 0..size {
            matrix.data[i][i] = 1.0;
        }
        matrix
    }

    /// `cols` is kept explicitly so that a matrix with no rows still knows its width.
    pub fn from_rows(data: Vec<Vec<f64>>, cols: usize) -> Self {
        debug_assert!(data.iter().all(|row| row.len() == cols));
        Self { data, cols }
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        self.data.iter().map(|row| row[col]).collect()
    }

    pub fn set_column(&mut self, col: usize, values: &[f64]) {
        for (row, &value) in self.data.iter_mut().zip(values) {
            row[col] = value;
        }
    }

    /// `self * other`
    pub fn mul(&self, other: &Matrix) -> Matrix {
        debug_assert_eq!(self.cols, other.rows());
        let mut result = Matrix::zeros(self.rows(), other.cols);
        for (i, row) in self.data.iter().enumerate() {
            for (k, &a) in row.iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                for (j, &b) in other.data[k].iter().enumerate() {
                    result.data[i][j] += a * b;
                }
            }
        }
        result
    }

    /// `self * v`
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(self.cols, v.len());
        self.data.iter().map(|row| dot(row, v)).collect()
    }

    /// `v^T * self`
    pub fn vec_mul(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(self.rows(), v.len());
        let mut result = vec![0.0; self.cols];
        for (row, &scale) in self.data.iter().zip(v) {
            for (out, &value) in result.iter_mut().zip(row) {
                *out += scale * value;
            }
        }
        result
    }

    /// Gauss-Jordan inversion with partial pivoting.
    ///
    /// Returns `None` when a pivot falls below [`SINGULAR_TOLERANCE`].
    pub fn inverse(&self) -> Option<Matrix> {
        let size = self.rows();
        if size != self.cols {
            return None;
        }

        let mut work = self.data.clone();
        let mut inverse = Matrix::identity(size);

        for col in 0..size {
            // Largest magnitude entry at or below the diagonal
            let mut pivot_row = col;
            for row in (col + 1)..size {
                if work[row][col].abs() > work[pivot_row][col].abs() {
                    pivot_row = row;
                }
            }
            if work[pivot_row][col].abs() < SINGULAR_TOLERANCE {
                return None;
            }
            work.swap(col, pivot_row);
            inverse.data.swap(col, pivot_row);

            let pivot = work[col][col];
            for j in 0..size {
                work[col][j] /= pivot;
                inverse.data[col][j] /= pivot;
            }

            for row in 0..size {
                if row == col {
                    continue;
                }
                let factor = work[row][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..size {
                    work[row][j] -= factor * work[col][j];
                    inverse.data[row][j] -= factor * inverse.data[col][j];
                }
            }
        }

        Some(inverse)
    }
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.rows(), b.rows());
        assert_eq!(a.cols(), b.cols());
        for i in 0..a.rows() {
            for j in 0..a.cols() {
                assert!(
                    (a.get(i, j) - b.get(i, j)).abs() < 1e-12,
                    "mismatch at ({}, {}): {} vs {}",
                    i,
                    j,
                    a.get(i, j),
                    b.get(i, j)
                );
            }
        }
    }

    #[test]
    fn test_identity_is_its_own_inverse() {
        let identity = Matrix::identity(4);
        assert_eq!(identity.inverse(), Some(identity));
    }

    #[test]
    fn test_inverse_needs_row_swap() {
        let m = Matrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]], 2);
        let inverse = m.inverse().unwrap();
        assert_close(&inverse, &Matrix::from_rows(vec![vec![0.0, 0.5], vec![1.0, 0.0]], 2));
        assert_close(&m.mul(&inverse), &Matrix::identity(2));
    }

    #[test]
    fn test_inverse_three_by_three() {
        let m = Matrix::from_rows(
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 2.0, 0.0], vec![3.0, 2.0, 1.0]],
            3,
        );
        let inverse = m.inverse().unwrap();
        assert_close(&m.mul(&inverse), &Matrix::identity(3));
        assert_close(&inverse.mul(&m), &Matrix::identity(3));
    }

    #[test]
    fn test_singular_matrix() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 4.0]], 2);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_empty_matrix_inverse() {
        let m = Matrix::zeros(0, 0);
        assert_eq!(m.inverse(), Some(Matrix::zeros(0, 0)));
    }

    #[test]
    fn test_products() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 3);
        assert_eq!(m.mul_vec(&[1.0, 0.0, -1.0]), vec![-2.0, -2.0]);
        assert_eq!(m.vec_mul(&[1.0, 1.0]), vec![5.0, 7.0, 9.0]);
        assert_eq!(m.column(1), vec![2.0, 5.0]);
    }

    #[test]
    fn test_set_column() {
        let mut m = Matrix::zeros(2, 2);
        m.set_column(1, &[3.0, 4.0]);
        assert_eq!(m.row(0), &[0.0, 3.0]);
        assert_eq!(m.row(1), &[0.0, 4.0]);
    }
}
