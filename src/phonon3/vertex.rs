/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

//! The three-phonon vertex in normal-mode coordinates.

use crate::{PrimI, Idx, IndexVec};
use crate::error::InteractionError;
use crate::fourier::ReciprocalFc3;
use crate::tensor::C64;
use num_traits::Zero;

/// Eigenvectors of the dynamical matrix at one wavevector, one per band.
///
/// Each band's vector has `3 * num_prim` components, ordered `[atom][axis]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenvectors {
    num_bands: usize,
    // band-major
    data: Vec<C64>,
}

impl Eigenvectors {
    pub fn from_bands(bands: Vec<Vec<C64>>) -> Result<Self, InteractionError> {
        let num_bands = bands.len();
        let mut data = Vec::with_capacity(num_bands * num_bands);
        for (band, vector) in bands.into_iter().enumerate() {
            ensure_dims!(
                vector.len() == num_bands,
                "eigenvector for band {} has {} components, expected {}", band, vector.len(), num_bands,
            );
            data.extend(vector);
        }
        Ok(Eigenvectors { num_bands, data })
    }

    /// The layout produced by LAPACK's `zheev`, where column `j` is the eigenvector of band `j`.
    pub fn from_column_major(num_bands: usize, data: Vec<C64>) -> Result<Self, InteractionError> {
        ensure_dims!(
            data.len() == num_bands * num_bands,
            "eigenvector matrix has {} elements, expected {}^2", data.len(), num_bands,
        );
        Ok(Eigenvectors { num_bands, data })
    }

    /// Row-major storage of the same matrix (columns are still bands).
    pub fn from_row_major(num_bands: usize, data: &[C64]) -> Result<Self, InteractionError> {
        ensure_dims!(
            data.len() == num_bands * num_bands,
            "eigenvector matrix has {} elements, expected {}^2", data.len(), num_bands,
        );
        let mut transposed = Vec::with_capacity(data.len());
        for band in 0..num_bands {
            transposed.extend((0..num_bands).map(|row| data[row * num_bands + band]));
        }
        Ok(Eigenvectors { num_bands, data: transposed })
    }

    pub fn num_bands(&self) -> usize { self.num_bands }

    #[inline]
    pub fn band(&self, band: usize) -> &[C64]
    { &self.data[band * self.num_bands..(band + 1) * self.num_bands] }
}

/// Mass-normalized contraction of the reciprocal tensor with one eigenvector per leg.
///
/// ```text
/// Σ_{a0 a1 a2} Σ_{αβγ} Φ(a0α, a1β, a2γ) e0(a0α) e1(a1β) e2(a2γ) / sqrt(m(a0) m(a1) m(a2))
/// ```
///
/// None of the eigenvectors are conjugated.
pub fn sum_in_primitive(
    fc3_q: &ReciprocalFc3,
    evs: [&[C64]; 3],
    masses: &IndexVec<PrimI, f64>,
) -> Result<C64, InteractionError> {
    let num_prim = fc3_q.num_prim();
    ensure_dims!(
        masses.len() == num_prim,
        "{} masses given for {} primitive atoms", masses.len(), num_prim,
    );
    for (leg, ev) in evs.iter().enumerate() {
        ensure_dims!(
            ev.len() == 3 * num_prim,
            "eigenvector for leg {} has {} components, expected {}", leg, ev.len(), 3 * num_prim,
        );
    }

    let inv_sqrt_mass: IndexVec<PrimI, f64> = masses.iter().map(|m| 1.0 / m.sqrt()).collect();
    let component = |leg: usize, atom: PrimI, axis: usize| evs[leg][3 * atom.index() + axis];

    let mut sum = C64::zero();
    let prims = || masses.indices();
    for (a0, a1, a2) in iproduct!(prims(), prims(), prims()) {
        let block = fc3_q.block(a0, a1, a2);
        let mut block_sum = C64::zero();
        for (i, j, k) in iproduct!(0..3, 0..3, 0..3) {
            block_sum += block.get(i, j, k) * component(0, a0, i) * component(1, a1, j) * component(2, a2, k);
        }
        sum += block_sum * (inv_sqrt_mass[a0] * inv_sqrt_mass[a1] * inv_sqrt_mass[a2]);
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::ComplexBlock;
    use rand::Rng;

    fn random_vec(rng: &mut impl Rng, n: usize) -> Vec<C64> {
        (0..n).map(|_| C64::new(rng.next_f64() - 0.5, rng.next_f64() - 0.5)).collect()
    }

    fn random_fc3_q(rng: &mut impl Rng, num_prim: usize) -> ReciprocalFc3 {
        let mut fc3_q = ReciprocalFc3::zeros(num_prim).unwrap();
        let prims = || (0..num_prim).map(PrimI);
        for (a0, a1, a2) in iproduct!(prims(), prims(), prims()) {
            *fc3_q.block_mut(a0, a1, a2) = ComplexBlock::from_fn(|_, _, _| {
                C64::new(rng.next_f64() - 0.5, rng.next_f64() - 0.5)
            });
        }
        fc3_q
    }

    #[test]
    fn single_element() {
        let mut fc3_q = ReciprocalFc3::zeros(2).unwrap();
        *fc3_q.block_mut(PrimI(0), PrimI(1), PrimI(1)).get_mut(2, 0, 1) = C64::new(3.0, 0.0);

        let mut e0 = vec![C64::new(0.0, 0.0); 6];
        let mut e1 = e0.clone();
        let mut e2 = e0.clone();
        e0[2] = C64::new(0.5, 0.5);
        e1[3] = C64::new(0.0, 1.0);
        e2[4] = C64::new(2.0, 0.0);
        let masses = IndexVec::from_raw(vec![4.0, 9.0]);

        let value = sum_in_primitive(&fc3_q, [&e0, &e1, &e2], &masses).unwrap();
        // 3 * (0.5 + 0.5i) * i * 2 / sqrt(4 * 9 * 9)
        let expected = C64::new(0.5, 0.5) * C64::new(0.0, 1.0) * 6.0 / 18.0;
        assert_close!(abs=1e-14, value, expected);
    }

    #[test]
    fn mass_scaling() {
        let mut rng = crate::test_util::rng();
        let fc3_q = random_fc3_q(&mut rng, 2);
        let evs: Vec<_> = (0..3).map(|_| random_vec(&mut rng, 6)).collect();
        let masses = IndexVec::from_raw(vec![12.0, 28.0]);
        let heavy = IndexVec::from_raw(vec![12.0 * 4.0, 28.0 * 4.0]);

        let evs = [&evs[0][..], &evs[1][..], &evs[2][..]];
        let light = sum_in_primitive(&fc3_q, evs, &masses).unwrap().norm_sqr();
        let heavy = sum_in_primitive(&fc3_q, evs, &heavy).unwrap().norm_sqr();
        assert_close!(rel=1e-12, heavy, light / 64.0);
    }

    #[test]
    fn no_conjugation() {
        let mut fc3_q = ReciprocalFc3::zeros(1).unwrap();
        *fc3_q.block_mut(PrimI(0), PrimI(0), PrimI(0)).get_mut(0, 0, 0) = C64::new(1.0, 0.0);
        let ev = vec![C64::new(0.0, 1.0), C64::new(0.0, 0.0), C64::new(0.0, 0.0)];
        let masses = IndexVec::from_raw(vec![1.0]);
        // i^3 = -i
        let value = sum_in_primitive(&fc3_q, [&ev, &ev, &ev], &masses).unwrap();
        assert_close!(abs=1e-15, value, C64::new(0.0, -1.0));
    }

    #[test]
    fn bad_lengths() {
        let fc3_q = ReciprocalFc3::zeros(2).unwrap();
        let ev = vec![C64::new(0.0, 0.0); 6];
        let short = vec![C64::new(0.0, 0.0); 5];
        assert!(sum_in_primitive(&fc3_q, [&ev, &short, &ev], &IndexVec::from_raw(vec![1.0, 1.0])).is_err());
        assert!(sum_in_primitive(&fc3_q, [&ev, &ev, &ev], &IndexVec::from_raw(vec![1.0])).is_err());
    }

    #[test]
    fn eigenvector_layouts() {
        let n = 3;
        let row_major: Vec<_> = (0..n * n).map(|x| C64::new(x as f64, 0.0)).collect();
        let evs = Eigenvectors::from_row_major(n, &row_major).unwrap();
        // band 1 is column 1
        assert_eq!(evs.band(1), &[C64::new(1.0, 0.0), C64::new(4.0, 0.0), C64::new(7.0, 0.0)]);

        let evs = Eigenvectors::from_column_major(n, row_major.clone()).unwrap();
        assert_eq!(evs.band(1), &row_major[3..6]);

        assert!(Eigenvectors::from_bands(vec![vec![C64::new(0.0, 0.0); 2]; 3]).is_err());
        assert!(Eigenvectors::from_column_major(2, row_major).is_err());
    }
}
