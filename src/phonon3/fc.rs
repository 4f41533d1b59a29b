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

//! Real-space force constants over supercell atoms.
//!
//! These are dense, like phonopy's.  Both types are immutable inputs as far as the
//! kernel is concerned; any symmetrization must already have been done by the caller.

use crate::{SuperI, Idx};
use crate::error::{InteractionError, try_alloc};
use crate::tensor::{M33, RealBlock};
use slice_of_array::prelude::*;

/// Second-order force constants, one 3x3 block per ordered pair of supercell atoms.
///
/// The kernel never looks inside these; they are only handed to the phonon solver.
#[derive(Debug, Clone)]
pub struct SecondOrderFcs {
    num_atoms: usize,
    blocks: Vec<M33>,
}

impl SecondOrderFcs {
    pub fn new(num_atoms: usize, blocks: Vec<M33>) -> Result<Self, InteractionError> {
        ensure_dims!(
            Some(blocks.len()) == num_atoms.checked_mul(num_atoms),
            "second-order force constants have {} blocks, expected {}^2", blocks.len(), num_atoms,
        );
        Ok(SecondOrderFcs { num_atoms, blocks })
    }

    /// Row-major `[i][j][α][β]` data.
    pub fn from_flat(num_atoms: usize, flat: &[f64]) -> Result<Self, InteractionError> {
        ensure_dims!(
            Some(flat.len()) == num_atoms.checked_mul(num_atoms).and_then(|n| n.checked_mul(9)),
            "flat second-order force constants have {} elements, expected {}^2 * 9", flat.len(), num_atoms,
        );
        let mut blocks = try_alloc("second-order force constants", num_atoms * num_atoms, [[0.0; 3]; 3])?;
        for (block, chunk) in blocks.iter_mut().zip(flat.nest::<[f64; 3]>().nest::<[[f64; 3]; 3]>()) {
            *block = *chunk;
        }
        SecondOrderFcs::new(num_atoms, blocks)
    }

    pub fn num_atoms(&self) -> usize { self.num_atoms }

    #[inline]
    pub fn get(&self, i: SuperI, j: SuperI) -> &M33
    { &self.blocks[i.index() * self.num_atoms + j.index()] }
}

/// Third-order force constants, one 3x3x3 block per ordered triple of supercell atoms.
#[derive(Debug, Clone)]
pub struct ThirdOrderFcs {
    num_atoms: usize,
    blocks: Vec<RealBlock>,
}

fn num_triples(num_atoms: usize) -> Option<usize> {
    num_atoms.checked_mul(num_atoms)?.checked_mul(num_atoms)
}

impl ThirdOrderFcs {
    pub fn new(num_atoms: usize, blocks: Vec<RealBlock>) -> Result<Self, InteractionError> {
        ensure_dims!(
            Some(blocks.len()) == num_triples(num_atoms),
            "third-order force constants have {} blocks, expected {}^3", blocks.len(), num_atoms,
        );
        Ok(ThirdOrderFcs { num_atoms, blocks })
    }

    pub fn zeros(num_atoms: usize) -> Result<Self, InteractionError> {
        let len = match num_triples(num_atoms) {
            Some(len) => len,
            None => return Err(InteractionError::AllocationFailure { what: "third-order force constants", len: usize::max_value() }),
        };
        let blocks = try_alloc("third-order force constants", len, RealBlock::zero())?;
        Ok(ThirdOrderFcs { num_atoms, blocks })
    }

    /// Row-major `[i][j][k][α][β][γ]` data.
    pub fn from_flat(num_atoms: usize, flat: &[f64]) -> Result<Self, InteractionError> {
        ensure_dims!(
            Some(flat.len()) == num_triples(num_atoms).and_then(|n| n.checked_mul(27)),
            "flat third-order force constants have {} elements, expected {}^3 * 27", flat.len(), num_atoms,
        );
        let mut out = ThirdOrderFcs::zeros(num_atoms)?;
        for (block, chunk) in out.blocks.iter_mut().zip(flat.nest::<[f64; 27]>()) {
            *block = RealBlock::from_flat(chunk);
        }
        Ok(out)
    }

    /// All-zero force constants except for the listed blocks.
    ///
    /// Later entries for the same triple overwrite earlier ones.
    pub fn from_blocks(
        num_atoms: usize,
        entries: impl IntoIterator<Item=((SuperI, SuperI, SuperI), RealBlock)>,
    ) -> Result<Self, InteractionError> {
        let mut out = ThirdOrderFcs::zeros(num_atoms)?;
        for ((i, j, k), block) in entries {
            ensure_dims!(
                i.index() < num_atoms && j.index() < num_atoms && k.index() < num_atoms,
                "atom triple ({}, {}, {}) out of range for {} atoms", i, j, k, num_atoms,
            );
            *out.block_mut(i, j, k) = block;
        }
        Ok(out)
    }

    pub fn num_atoms(&self) -> usize { self.num_atoms }

    #[inline]
    fn flat_index(&self, i: SuperI, j: SuperI, k: SuperI) -> usize
    { (i.index() * self.num_atoms + j.index()) * self.num_atoms + k.index() }

    #[inline]
    pub fn block(&self, i: SuperI, j: SuperI, k: SuperI) -> &RealBlock
    { &self.blocks[self.flat_index(i, j, k)] }

    #[inline]
    pub fn block_mut(&mut self, i: SuperI, j: SuperI, k: SuperI) -> &mut RealBlock {
        let index = self.flat_index(i, j, k);
        &mut self.blocks[index]
    }

    pub fn is_zero(&self) -> bool { self.blocks.iter().all(|b| b.is_zero()) }

    /// Relabel atoms: the result has `new[f(i), f(j), f(k)] = old[i, j, k]`.
    ///
    /// `f` must be a permutation of the supercell atoms (e.g. a lattice translation).
    pub fn permuted_atoms(&self, f: impl Fn(SuperI) -> SuperI) -> Result<Self, InteractionError> {
        let mut out = ThirdOrderFcs::zeros(self.num_atoms)?;
        let atoms = || (0..self.num_atoms).map(SuperI);
        for (i, j, k) in iproduct!(atoms(), atoms(), atoms()) {
            *out.block_mut(f(i), f(j), f(k)) = *self.block(i, j, k);
        }
        Ok(out)
    }
}
