use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::ops::{Add, Sub, Mul};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Uniform init in [low, high). Used for weight matrices.
    pub fn random_range(rows: usize, cols: usize, low: f64, high: f64) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * (high - low) + low;
            }
        }

        res
    }

    /// Uniform init in [0, 1). Used for bias rows.
    pub fn random_unit(rows: usize, cols: usize) -> Matrix {
        Matrix::random_range(rows, cols, 0.0, 1.0)
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data[0].len(),
            data
        }
    }

    /// Wraps a single vector as a [1, n] row matrix.
    pub fn from_row(row: Vec<f64>) -> Matrix {
        Matrix::from_data(vec![row])
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_data(
            (self.data)
                .clone()
                .into_iter()
                .map(|row| row.into_iter().map(|x| functor(x)).collect())
                .collect()
        )
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
            })
            .collect();
        Matrix::from_data(data)
    }

    /// Adds a [1, cols] row to every row of self (bias broadcast).
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        if row.rows != 1 || row.cols != self.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = self.clone();
        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] += row.data[0][j];
            }
        }

        res
    }

    /// Sums over the row (batch) dimension, yielding a [1, cols] matrix.
    pub fn column_sums(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[0][j] += self.data[i][j];
            }
        }
        res
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_shapes_and_values() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![5.0], vec![6.0]]);
        let c = a * b;
        assert_eq!(c.rows, 2);
        assert_eq!(c.cols, 1);
        assert_eq!(c.data, vec![vec![17.0], vec![39.0]]);
    }

    #[test]
    fn transpose_round_trip() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.rows, 3);
        assert_eq!(t.cols, 2);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn hadamard_is_element_wise() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![2.0, 0.5], vec![1.0, -1.0]]);
        let h = a.hadamard(&b);
        assert_eq!(h.data, vec![vec![2.0, 1.0], vec![3.0, -4.0]]);
    }

    #[test]
    fn add_row_broadcasts_over_batch() {
        let x = Matrix::from_data(vec![vec![1.0, 1.0], vec![2.0, 2.0]]);
        let b = Matrix::from_row(vec![0.5, -0.5]);
        let y = x.add_row(&b);
        assert_eq!(y.data, vec![vec![1.5, 0.5], vec![2.5, 1.5]]);
    }

    #[test]
    fn column_sums_collapses_batch() {
        let x = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let s = x.column_sums();
        assert_eq!(s.rows, 1);
        assert_eq!(s.data, vec![vec![4.0, 6.0]]);
    }

    #[test]
    fn random_range_respects_bounds() {
        let m = Matrix::random_range(10, 10, -0.1, 0.1);
        for row in &m.data {
            for &v in row {
                assert!(v >= -0.1 && v < 0.1);
            }
        }
    }

    #[test]
    #[should_panic]
    fn mul_with_mismatched_shapes_panics() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let _ = a * b;
    }
}
