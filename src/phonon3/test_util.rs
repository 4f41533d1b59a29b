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

//! Fixtures shared by the unit tests.

use crate::{PrimI, SuperI, Idx};
use crate::fc::ThirdOrderFcs;
use crate::geometry::{ShortestVectors, IndexMaps, PeriodicImages};
use crate::tensor::{V3, RealBlock};
use rand::{Rng, SeedableRng, XorShiftRng};

pub fn rng() -> XorShiftRng { XorShiftRng::from_seed([0x1234, 0xbeef, 0xcafe, 0x5678]) }

/// A one-dimensional chain along x, with wide empty space along y and z.
///
/// Supercell atom `cell * num_basis + b` is basis atom `b` in cell `cell`.
pub struct Chain {
    pub images: PeriodicImages,
    pub num_cells: usize,
    pub num_basis: usize,
}

const WIDTH: f64 = 10.0;

impl Chain {
    pub fn new(basis: &[f64], num_cells: usize) -> Chain { Chain::with_first_cell(basis, num_cells, 0) }

    /// Representatives live in cell `first_cell` instead of cell 0.
    pub fn with_first_cell(basis: &[f64], num_cells: usize, first_cell: usize) -> Chain {
        let num_basis = basis.len();
        let prim_lattice = [[1.0, 0.0, 0.0], [0.0, WIDTH, 0.0], [0.0, 0.0, WIDTH]];
        let super_lattice = [[num_cells as f64, 0.0, 0.0], [0.0, WIDTH, 0.0], [0.0, 0.0, WIDTH]];

        let fracs: Vec<_> = iproduct!(0..num_cells, basis)
            .map(|(cell, &x)| V3([(cell as f64 + x) / num_cells as f64, 0.0, 0.0]))
            .collect();
        let p2s: Vec<_> = (0..num_basis).map(|b| SuperI(first_cell * num_basis + b)).collect();
        let s2p: Vec<_> = (0..fracs.len()).map(|s| PrimI(s % num_basis)).collect();

        let svecs = ShortestVectors::compute(&super_lattice, &prim_lattice, &fracs, &p2s, 1e-8).unwrap();
        let maps = IndexMaps::new(p2s, s2p).unwrap();
        let images = PeriodicImages::new(svecs, maps).unwrap();
        Chain { images, num_cells, num_basis }
    }

    pub fn num_super(&self) -> usize { self.num_cells * self.num_basis }

    /// Move an atom `by` cells to the right.
    pub fn translate(&self, s: SuperI, by: usize) -> SuperI {
        let (cell, b) = (s.index() / self.num_basis, s.index() % self.num_basis);
        SuperI((cell + by) % self.num_cells * self.num_basis + b)
    }

    /// Project onto the translationally invariant subspace.
    pub fn translation_average(&self, fc3: &ThirdOrderFcs) -> ThirdOrderFcs {
        let n = self.num_super();
        let atoms = || (0..n).map(SuperI);
        let mut out = ThirdOrderFcs::zeros(n).unwrap();
        for (i, j, k) in iproduct!(atoms(), atoms(), atoms()) {
            let mut sum = RealBlock::zero();
            for by in 0..self.num_cells {
                let block = fc3.block(self.translate(i, by), self.translate(j, by), self.translate(k, by));
                sum = RealBlock::from_fn(|a, b, c| sum.get(a, b, c) + block.get(a, b, c));
            }
            *out.block_mut(i, j, k) = sum.map(|x| x / self.num_cells as f64);
        }
        out
    }
}

pub fn random_fc3(rng: &mut impl Rng, num_atoms: usize) -> ThirdOrderFcs {
    let mut out = ThirdOrderFcs::zeros(num_atoms).unwrap();
    let atoms = || (0..num_atoms).map(SuperI);
    for (i, j, k) in iproduct!(atoms(), atoms(), atoms()) {
        *out.block_mut(i, j, k) = RealBlock::from_fn(|_, _, _| 2.0 * rng.next_f64() - 1.0);
    }
    out
}

/// Project onto the subspace symmetric under exchange of any two legs.
pub fn permutation_average(fc3: &ThirdOrderFcs) -> ThirdOrderFcs {
    const PERMS: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    let n = fc3.num_atoms();
    let atoms = || (0..n).map(SuperI);
    let mut out = ThirdOrderFcs::zeros(n).unwrap();
    for (i, j, k) in iproduct!(atoms(), atoms(), atoms()) {
        let legs = [i, j, k];
        *out.block_mut(i, j, k) = RealBlock::from_fn(|a, b, c| {
            let axes = [a, b, c];
            PERMS.iter().map(|p| {
                let block = fc3.block(legs[p[0]], legs[p[1]], legs[p[2]]);
                block.get(axes[p[0]], axes[p[1]], axes[p[2]])
            }).sum::<f64>() / 6.0
        });
    }
    out
}
