//! The design matrix abstraction. The solvers only need a handful of products
//! with X, so both dense ndarray matrices and sparse sprs matrices can be fit.

use crate::num::Float;
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, ArrayViewMut1, Data, Ix2};
use sprs::CsMatBase;
use std::ops::Deref;

/// A samples x features design matrix.
pub trait Design<F: Float> {
    fn n_samples(&self) -> usize;

    fn n_features(&self) -> usize;

    /// X * beta for a features x classes coefficient matrix.
    fn mul_coef(&self, beta: &Array2<F>) -> Array2<F>;

    /// X^T * d for a samples x classes matrix d.
    fn t_mul(&self, d: ArrayView2<F>) -> Array2<F>;

    /// The sums over samples of x_ij * d1_ik and x_ij^2 * d2_ik for feature j,
    /// one entry per class.
    fn column_moments(
        &self,
        j: usize,
        d1: ArrayView2<F>,
        d2: ArrayView2<F>,
    ) -> (Array1<F>, Array1<F>);

    /// z += delta * x_j
    fn scaled_add_column(&self, j: usize, delta: F, z: ArrayViewMut1<F>);

    /// Whether every stored entry is finite.
    fn all_finite(&self) -> bool;
}

impl<F, S> Design<F> for ArrayBase<S, Ix2>
where
    F: Float,
    S: Data<Elem = F>,
{
    fn n_samples(&self) -> usize {
        self.nrows()
    }

    fn n_features(&self) -> usize {
        self.ncols()
    }

    fn mul_coef(&self, beta: &Array2<F>) -> Array2<F> {
        self.dot(beta)
    }

    fn t_mul(&self, d: ArrayView2<F>) -> Array2<F> {
        self.t().dot(&d)
    }

    fn column_moments(
        &self,
        j: usize,
        d1: ArrayView2<F>,
        d2: ArrayView2<F>,
    ) -> (Array1<F>, Array1<F>) {
        let col = self.column(j);
        (d1.t().dot(&col), d2.t().dot(&col.mapv(|v| v * v)))
    }

    fn scaled_add_column(&self, j: usize, delta: F, mut z: ArrayViewMut1<F>) {
        z.scaled_add(delta, &self.column(j));
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }
}

/// Sparse matrices in either storage order. Column access is direct for CSC;
/// a CSR matrix scans its non-zeros for every column, so CSC is preferable for
/// coordinate descent.
impl<F, IpS, IS, DS> Design<F> for CsMatBase<F, usize, IpS, IS, DS>
where
    F: Float,
    IpS: Deref<Target = [usize]>,
    IS: Deref<Target = [usize]>,
    DS: Deref<Target = [F]>,
{
    fn n_samples(&self) -> usize {
        self.rows()
    }

    fn n_features(&self) -> usize {
        self.cols()
    }

    fn mul_coef(&self, beta: &Array2<F>) -> Array2<F> {
        let mut out = Array2::zeros((self.rows(), beta.ncols()));
        for (&v, (i, j)) in self.iter() {
            out.row_mut(i).scaled_add(v, &beta.row(j));
        }
        out
    }

    fn t_mul(&self, d: ArrayView2<F>) -> Array2<F> {
        let mut out = Array2::zeros((self.cols(), d.ncols()));
        for (&v, (i, j)) in self.iter() {
            out.row_mut(j).scaled_add(v, &d.row(i));
        }
        out
    }

    fn column_moments(
        &self,
        j: usize,
        d1: ArrayView2<F>,
        d2: ArrayView2<F>,
    ) -> (Array1<F>, Array1<F>) {
        let mut m1 = Array1::zeros(d1.ncols());
        let mut m2 = Array1::zeros(d2.ncols());
        visit_column(self, j, |i, v| {
            m1.scaled_add(v, &d1.row(i));
            m2.scaled_add(v * v, &d2.row(i));
        });
        (m1, m2)
    }

    fn scaled_add_column(&self, j: usize, delta: F, mut z: ArrayViewMut1<F>) {
        visit_column(self, j, |i, v| z[i] += delta * v);
    }

    fn all_finite(&self) -> bool {
        self.data().iter().all(|v| v.is_finite())
    }
}

/// Visit the (row, value) pairs of one column of a sparse matrix.
fn visit_column<F, IpS, IS, DS, G>(x: &CsMatBase<F, usize, IpS, IS, DS>, j: usize, mut visit: G)
where
    F: Float,
    IpS: Deref<Target = [usize]>,
    IS: Deref<Target = [usize]>,
    DS: Deref<Target = [F]>,
    G: FnMut(usize, F),
{
    if x.is_csc() {
        if let Some(col) = x.outer_view(j) {
            for (i, &v) in col.iter() {
                visit(i, v);
            }
        }
    } else {
        for (&v, (i, col)) in x.iter() {
            if col == j {
                visit(i, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sprs::{CsMat, TriMat};

    fn dense() -> Array2<f64> {
        array![[0., 1.5, 0.], [2., 0., 0.], [0., 0., -1.], [0.5, 0., 3.]]
    }

    fn sparse(csc: bool) -> CsMat<f64> {
        let x = dense();
        let mut tri = TriMat::new(x.dim());
        for ((i, j), &v) in x.indexed_iter() {
            if v != 0. {
                tri.add_triplet(i, j, v);
            }
        }
        if csc {
            tri.to_csc()
        } else {
            tri.to_csr()
        }
    }

    #[test]
    fn sparse_products_match_dense() {
        let x = dense();
        let beta = array![[1., -1.], [0.5, 2.], [-2., 0.]];
        let d1 = array![[1., 0.], [2., 1.], [-1., 1.], [0.5, -0.5]];
        let d2 = d1.mapv(f64::abs);
        for &csc in [true, false].iter() {
            let sp = sparse(csc);
            assert_eq!(sp.n_samples(), 4);
            assert_eq!(sp.n_features(), 3);
            assert_abs_diff_eq!(sp.mul_coef(&beta), x.mul_coef(&beta), epsilon = 1e-12);
            assert_abs_diff_eq!(sp.t_mul(d1.view()), x.t_mul(d1.view()), epsilon = 1e-12);
            for j in 0..3 {
                let (s1, s2) = sp.column_moments(j, d1.view(), d2.view());
                let (m1, m2) = x.column_moments(j, d1.view(), d2.view());
                assert_abs_diff_eq!(s1, m1, epsilon = 1e-12);
                assert_abs_diff_eq!(s2, m2, epsilon = 1e-12);

                let mut zs = Array1::ones(4);
                let mut zd = Array1::ones(4);
                sp.scaled_add_column(j, 0.5, zs.view_mut());
                x.scaled_add_column(j, 0.5, zd.view_mut());
                assert_abs_diff_eq!(zs, zd, epsilon = 1e-12);
            }
            assert!(sp.all_finite());
        }
    }
}
