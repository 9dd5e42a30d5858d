use rand::Rng;
use std::ops::{Index, IndexMut};

/// Dense row-major matrix backed by one contiguous buffer.
///
/// Weight matrices are laid out `[destination][source]`, so row `i` holds every
/// weight feeding neuron `i` of the destination layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Uniform values in [-1, 1].
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(-1.0f32..=1.0))
            .collect();
        Matrix { rows, cols, data }
    }

    /// Builds a matrix from nested rows. Returns `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Option<Matrix> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Matrix {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// `self += rhs`, element-wise. Shapes must already agree.
    pub fn add_assign(&mut self, rhs: &Matrix) {
        assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols), "Matrices are of incorrect sizes");
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a += b;
        }
    }

    /// `out[j] = Σ_i v[i] * self[i][j]`, i.e. `vᵀ · M`.
    pub fn transpose_mul_vec(&self, v: &[f32]) -> Vec<f32> {
        assert_eq!(v.len(), self.rows, "Matrices are of incorrect sizes");
        let mut out = vec![0.0; self.cols];
        for (i, &vi) in v.iter().enumerate() {
            for (o, w) in out.iter_mut().zip(self.row(i)) {
                *o += vi * w;
            }
        }
        out
    }

    /// Outer product `a · bᵀ` scaled by `scale`.
    pub fn outer(a: &[f32], b: &[f32], scale: f32) -> Matrix {
        let mut res = Matrix::zeros(a.len(), b.len());
        for (i, &ai) in a.iter().enumerate() {
            for (r, &bj) in res.row_mut(i).iter_mut().zip(b) {
                *r = scale * ai * bj;
            }
        }
        res
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        assert!(j < self.cols, "column {j} out of range");
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        assert!(j < self.cols, "column {j} out of range");
        &mut self.data[i * self.cols + j]
    }
}
