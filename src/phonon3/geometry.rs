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

//! The periodic image table: shortest vectors, multiplicities, and the maps
//! between primitive and supercell atoms.
//!
//! All of this is built once per crystal structure and then only ever read.

use crate::{PrimI, SuperI, Idx, IndexVec, FailResult};
use crate::error::InteractionError;
use crate::tensor::{self, V3, M33, C64};
use std::f64::consts::PI;

/// Width of the padded shortest-vector layout; one slot per neighboring cell.
pub const MAX_IMAGES: usize = 27;

/// For each (supercell atom, primitive atom) pair, every periodic image of the
/// displacement from the primitive atom's representative to the supercell atom
/// that ties for minimal length.
///
/// Vectors are in fractional coordinates of the primitive lattice, so that their dot
/// product with a reduced wavevector is a number of cycles.
#[derive(Debug, Clone)]
pub struct ShortestVectors {
    num_super: usize,
    num_prim: usize,
    // CSR-style dividers; the images of pair (s, p) are
    // `vectors[offsets[s * num_prim + p]..offsets[s * num_prim + p + 1]]`.
    offsets: Vec<usize>,
    vectors: Vec<V3>,
}

impl ShortestVectors {
    /// `images[s * num_prim + p]` holds the images for supercell atom `s` and primitive atom `p`.
    pub fn new(num_super: usize, num_prim: usize, images: Vec<Vec<V3>>) -> Result<Self, InteractionError> {
        ensure_dims!(
            images.len() == num_super * num_prim,
            "shortest vectors have {} pairs, but there are {} x {} atoms",
            images.len(), num_super, num_prim,
        );
        let mut offsets = Vec::with_capacity(images.len() + 1);
        let mut vectors = Vec::with_capacity(images.len());
        offsets.push(0);
        for (pair, list) in images.into_iter().enumerate() {
            ensure_dims!(
                !list.is_empty(),
                "multiplicity of (supercell atom {}, primitive atom {}) is zero",
                pair / num_prim, pair % num_prim,
            );
            vectors.extend(list);
            offsets.push(vectors.len());
        }
        Ok(ShortestVectors { num_super, num_prim, offsets, vectors })
    }

    /// Ingest the fixed-width layout, where each pair has `MAX_IMAGES` slots of which only
    /// the first `multiplicity[s * num_prim + p]` are meaningful.
    pub fn from_padded(
        num_super: usize,
        num_prim: usize,
        multiplicity: &[usize],
        padded: &[V3],
    ) -> Result<Self, InteractionError> {
        let num_pairs = num_super * num_prim;
        ensure_dims!(
            multiplicity.len() == num_pairs,
            "multiplicity table has {} entries, expected {}", multiplicity.len(), num_pairs,
        );
        ensure_dims!(
            padded.len() == num_pairs * MAX_IMAGES,
            "padded shortest vectors have {} entries, expected {}", padded.len(), num_pairs * MAX_IMAGES,
        );
        let mut images = Vec::with_capacity(num_pairs);
        for (pair, &multi) in multiplicity.iter().enumerate() {
            ensure_dims!(
                multi <= MAX_IMAGES,
                "multiplicity {} exceeds the {} available slots", multi, MAX_IMAGES,
            );
            let slots = &padded[pair * MAX_IMAGES..(pair + 1) * MAX_IMAGES];
            images.push(slots[..multi].to_vec());
        }
        ShortestVectors::new(num_super, num_prim, images)
    }

    /// Build the table from the geometry.
    ///
    /// * `super_lattice`, `prim_lattice`: lattice vectors as rows, in Cartesian units.
    /// * `super_fracs`: fractional positions of every supercell atom, in units of the supercell.
    /// * `p2s`: the representative supercell atom of each primitive atom.
    /// * `tol`: images whose length is within `tol` of the minimum count as ties. (Cartesian units)
    ///
    /// Only the 27 cells around the origin are searched, so the supercell must not be too skewed.
    pub fn compute(
        super_lattice: &M33,
        prim_lattice: &M33,
        super_fracs: &[V3],
        p2s: &[SuperI],
        tol: f64,
    ) -> FailResult<Self> {
        let finder = NearestImageFinder::new(super_lattice)?;
        let prim_inv = match tensor::inv(prim_lattice) {
            Some(inv) => inv,
            None => bail!("primitive lattice is singular: {:?}", prim_lattice),
        };
        for &SuperI(s) in p2s {
            ensure!(s < super_fracs.len(), "p2s entry {} is not a supercell atom", s);
        }

        let mut buf = vec![];
        let mut images = Vec::with_capacity(super_fracs.len() * p2s.len());
        for &frac_s in super_fracs {
            for &SuperI(rep) in p2s {
                finder.shortest_images_frac(&mut buf, frac_s - super_fracs[rep], tol);
                images.push({
                    buf.iter()
                        .map(|img| img.mat_mul(super_lattice).mat_mul(&prim_inv))
                        .collect()
                });
            }
        }
        Ok(ShortestVectors::new(super_fracs.len(), p2s.len(), images)?)
    }

    pub fn num_super(&self) -> usize { self.num_super }
    pub fn num_prim(&self) -> usize { self.num_prim }

    #[inline]
    pub fn images(&self, s: SuperI, p: PrimI) -> &[V3] {
        let pair = s.index() * self.num_prim + p.index();
        &self.vectors[self.offsets[pair]..self.offsets[pair + 1]]
    }

    #[inline]
    pub fn multiplicity(&self, s: SuperI, p: PrimI) -> usize { self.images(s, p).len() }
}

// ---------------------------------------------------------------------------

/// A helper type for locating nearest images under periodic boundary conditions.
#[derive(Debug, Clone)]
struct NearestImageFinder {
    lattice: M33,
    // (frac, cart) for the 27 lattice points around the origin
    lattice_points_around_origin: Vec<(V3, V3)>,
}

impl NearestImageFinder {
    fn new(lattice: &M33) -> FailResult<Self> {
        ensure!(tensor::inv(lattice).is_some(), "supercell lattice is singular: {:?}", lattice);

        let mut points = Vec::with_capacity(27);
        for &fa in &[-1.0, 0.0, 1.0] {
            for &fb in &[-1.0, 0.0, 1.0] {
                for &fc in &[-1.0, 0.0, 1.0] {
                    let frac = V3([fa, fb, fc]);
                    points.push((frac, frac.mat_mul(lattice)));
                }
            }
        }
        Ok(NearestImageFinder { lattice: *lattice, lattice_points_around_origin: points })
    }

    /// `out` will contain the shortest images (up to a tolerance of `tol` in units of
    /// length) of a fractional displacement.
    fn shortest_images_frac(&self, out: &mut Vec<V3>, frac: V3, tol: f64) {
        // not floored modulus; the result lies in (-1, 1), which the 27 cells cover
        let frac = frac.map(|x| x % 1.0);
        let cart = frac.mat_mul(&self.lattice);

        // norms instead of sqnorms for the sake of letting tol have units of length
        let mut norms = [0.0; 27];
        for (norm, &(_, point)) in norms.iter_mut().zip(&self.lattice_points_around_origin) {
            *norm = (cart + point).norm();
        }
        let minimum = norms.iter().cloned().fold(std::f64::INFINITY, f64::min);

        out.clear();
        for (&norm, &(point, _)) in norms.iter().zip(&self.lattice_points_around_origin) {
            if norm <= minimum + tol {
                out.push(frac + point);
            }
        }
    }
}

// ---------------------------------------------------------------------------

/// Maps between primitive atoms and supercell atoms.
#[derive(Debug, Clone)]
pub struct IndexMaps {
    p2s: IndexVec<PrimI, SuperI>,
    s2p: IndexVec<SuperI, PrimI>,
    // inverse of s2p
    images_of: IndexVec<PrimI, Vec<SuperI>>,
}

impl IndexMaps {
    /// `p2s[p]` is the supercell atom representing `p`; `s2p[s]` is the primitive atom
    /// that `s` is an image of.
    pub fn new(p2s: Vec<SuperI>, s2p: Vec<PrimI>) -> Result<Self, InteractionError> {
        let p2s = IndexVec::<PrimI, _>::from_raw(p2s);
        let s2p = IndexVec::<SuperI, _>::from_raw(s2p);
        ensure_dims!(!p2s.is_empty(), "there are no primitive atoms");
        ensure_dims!(
            s2p.len() >= p2s.len(),
            "{} supercell atoms cannot hold {} primitive atoms", s2p.len(), p2s.len(),
        );
        for (super_i, &prim) in s2p.iter_enumerated() {
            ensure_dims!(
                prim.index() < p2s.len(),
                "supercell atom {} maps to primitive atom {}, but there are only {}",
                super_i, prim, p2s.len(),
            );
        }
        for (prim, &super_i) in p2s.iter_enumerated() {
            ensure_dims!(
                super_i.index() < s2p.len(),
                "primitive atom {} maps to supercell atom {}, but there are only {}",
                prim, super_i, s2p.len(),
            );
            ensure_dims!(
                s2p[super_i] == prim,
                "p2s and s2p disagree: {} -> {} -> {}", prim, super_i, s2p[super_i],
            );
        }

        let mut images_of = IndexVec::<PrimI, _>::from_elem_n(vec![], p2s.len());
        for (super_i, &prim) in s2p.iter_enumerated() {
            images_of[prim].push(super_i);
        }
        Ok(IndexMaps { p2s, s2p, images_of })
    }

    /// Accepts maps in the style of phonopy, where `s2p` holds the supercell index of the
    /// representative rather than a primitive index.
    pub fn from_phonopy(p2s: &[usize], s2p: &[usize]) -> Result<Self, InteractionError> {
        let prim_of_rep = |rep: usize| p2s.iter().position(|&x| x == rep);

        let mut s2p_prim = Vec::with_capacity(s2p.len());
        for (super_i, &rep) in s2p.iter().enumerate() {
            match prim_of_rep(rep) {
                Some(prim) => s2p_prim.push(PrimI(prim)),
                None => return Err(InteractionError::DimensionMismatch(format!(
                    "supercell atom {} maps to {}, which does not represent a primitive atom",
                    super_i, rep,
                ))),
            }
        }
        IndexMaps::new(p2s.iter().map(|&s| SuperI(s)).collect(), s2p_prim)
    }

    pub fn num_prim(&self) -> usize { self.p2s.len() }
    pub fn num_super(&self) -> usize { self.s2p.len() }

    #[inline]
    pub fn p2s(&self, prim: PrimI) -> SuperI { self.p2s[prim] }

    #[inline]
    pub fn s2p(&self, super_i: SuperI) -> PrimI { self.s2p[super_i] }

    /// Every supercell atom that is an image of `prim`, in increasing order.
    #[inline]
    pub fn images_of(&self, prim: PrimI) -> &[SuperI] { &self.images_of[prim] }

    pub fn prim_indices(&self) -> impl Iterator<Item=PrimI> + Clone { self.p2s.indices() }
    pub fn super_indices(&self) -> impl Iterator<Item=SuperI> + Clone { self.s2p.indices() }
}

// ---------------------------------------------------------------------------

/// Everything geometric about one supercell.
///
/// The second- and third-order force constants may each have their own.
#[derive(Debug, Clone)]
pub struct PeriodicImages {
    svecs: ShortestVectors,
    maps: IndexMaps,
}

impl PeriodicImages {
    pub fn new(svecs: ShortestVectors, maps: IndexMaps) -> Result<Self, InteractionError> {
        ensure_dims!(
            (svecs.num_super(), svecs.num_prim()) == (maps.num_super(), maps.num_prim()),
            "shortest vectors are for {} x {} atoms, but the index maps are for {} x {}",
            svecs.num_super(), svecs.num_prim(), maps.num_super(), maps.num_prim(),
        );
        Ok(PeriodicImages { svecs, maps })
    }

    pub fn num_prim(&self) -> usize { self.maps.num_prim() }
    pub fn num_super(&self) -> usize { self.maps.num_super() }
    pub fn num_bands(&self) -> usize { 3 * self.num_prim() }

    pub fn maps(&self) -> &IndexMaps { &self.maps }
    pub fn shortest_vectors(&self) -> &ShortestVectors { &self.svecs }

    #[inline]
    pub fn p2s(&self, prim: PrimI) -> SuperI { self.maps.p2s(prim) }

    #[inline]
    pub fn s2p(&self, super_i: SuperI) -> PrimI { self.maps.s2p(super_i) }

    #[inline]
    pub fn images_of(&self, prim: PrimI) -> &[SuperI] { self.maps.images_of(prim) }

    /// `exp(2πi q·r)` averaged over the shortest images `r` of the displacement from
    /// the representative of `prim` to `super_i`.
    ///
    /// Dividing by the multiplicity keeps atoms on the boundary of the supercell from
    /// being counted once per tied image.
    #[inline]
    pub fn averaged_phase(&self, q: &V3, super_i: SuperI, prim: PrimI) -> C64 {
        let images = self.svecs.images(super_i, prim);
        let sum = images.iter()
            .map(|r| 2.0 * PI * q.dot(r))
            .map(|arg| C64::new(arg.cos(), arg.sin()))
            .fold(C64::new(0.0, 0.0), |acc, x| acc + x);
        sum / images.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EYE: M33 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    // simple cubic with one atom, in a 2x2x2 supercell
    fn cubic_222() -> (M33, Vec<V3>, Vec<PrimI>) {
        let super_lattice = [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]];
        let mut fracs = vec![];
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    fracs.push(V3([i as f64 / 2.0, j as f64 / 2.0, k as f64 / 2.0]));
                }
            }
        }
        let s2p = vec![PrimI(0); 8];
        (super_lattice, fracs, s2p)
    }

    #[test]
    fn computed_multiplicities() {
        let (super_lattice, fracs, _) = cubic_222();
        let svecs = ShortestVectors::compute(&super_lattice, &EYE, &fracs, &[SuperI(0)], 1e-5).unwrap();

        // origin, face, edge, corner of the surrounding cube
        assert_eq!(svecs.multiplicity(SuperI(0), PrimI(0)), 1);
        assert_eq!(svecs.multiplicity(SuperI(4), PrimI(0)), 2);
        assert_eq!(svecs.multiplicity(SuperI(6), PrimI(0)), 4);
        assert_eq!(svecs.multiplicity(SuperI(7), PrimI(0)), 8);

        assert_eq!(svecs.images(SuperI(0), PrimI(0)), &[V3::zero()]);
        let mut face = svecs.images(SuperI(4), PrimI(0)).to_vec();
        face.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
        assert_close!(abs=1e-12, face, vec![V3([-1.0, 0.0, 0.0]), V3([1.0, 0.0, 0.0])]);
    }

    #[test]
    fn padded_layout() {
        let mut padded = vec![V3([9.0; 3]); 2 * MAX_IMAGES];
        padded[0] = V3::zero();
        padded[MAX_IMAGES] = V3([0.5, 0.0, 0.0]);
        padded[MAX_IMAGES + 1] = V3([-0.5, 0.0, 0.0]);
        let svecs = ShortestVectors::from_padded(2, 1, &[1, 2], &padded).unwrap();
        assert_eq!(svecs.images(SuperI(1), PrimI(0)), &[V3([0.5, 0.0, 0.0]), V3([-0.5, 0.0, 0.0])]);

        match ShortestVectors::from_padded(2, 1, &[1, 0], &padded) {
            Err(InteractionError::DimensionMismatch(_)) => {},
            other => panic!("expected a dimension mismatch, got {:?}", other),
        }
        match ShortestVectors::from_padded(2, 1, &[1], &padded) {
            Err(InteractionError::DimensionMismatch(_)) => {},
            other => panic!("expected a dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn index_map_validation() {
        let maps = IndexMaps::new(vec![SuperI(0), SuperI(1)], vec![PrimI(0), PrimI(1), PrimI(0), PrimI(1)]).unwrap();
        assert_eq!(maps.images_of(PrimI(1)), &[SuperI(1), SuperI(3)]);
        assert_eq!(maps.p2s(PrimI(1)), SuperI(1));

        // p2s points at an atom that s2p says belongs elsewhere
        assert!(IndexMaps::new(vec![SuperI(0), SuperI(2)], vec![PrimI(0), PrimI(1), PrimI(0), PrimI(1)]).is_err());
        // out of range
        assert!(IndexMaps::new(vec![SuperI(0)], vec![PrimI(0), PrimI(1)]).is_err());
        assert!(IndexMaps::new(vec![SuperI(5)], vec![PrimI(0)]).is_err());
        assert!(IndexMaps::new(vec![], vec![]).is_err());
    }

    #[test]
    fn phonopy_style_maps() {
        let maps = IndexMaps::from_phonopy(&[0, 4], &[0, 0, 0, 0, 4, 4, 4, 4]).unwrap();
        assert_eq!(maps.s2p(SuperI(5)), PrimI(1));
        assert!(IndexMaps::from_phonopy(&[0, 4], &[0, 0, 1, 0, 4, 4, 4, 4]).is_err());
    }

    #[test]
    fn phase_average() {
        let (super_lattice, fracs, s2p) = cubic_222();
        let svecs = ShortestVectors::compute(&super_lattice, &EYE, &fracs, &[SuperI(0)], 1e-5).unwrap();
        let maps = IndexMaps::new(vec![SuperI(0)], s2p).unwrap();
        let images = PeriodicImages::new(svecs, maps).unwrap();

        // images at +x and -x
        let face = SuperI(4);
        assert_close!(abs=1e-12, images.averaged_phase(&V3([0.5, 0.0, 0.0]), face, PrimI(0)), C64::new(-1.0, 0.0));
        // the imaginary parts of the two images cancel
        assert_close!(abs=1e-12, images.averaged_phase(&V3([0.25, 0.0, 0.0]), face, PrimI(0)), C64::new(0.0, 0.0));
        assert_close!(abs=1e-12, images.averaged_phase(&V3([0.3, 0.1, 0.2]), SuperI(0), PrimI(0)), C64::new(1.0, 0.0));
    }

    #[test]
    fn mismatched_table() {
        let (super_lattice, fracs, _) = cubic_222();
        let svecs = ShortestVectors::compute(&super_lattice, &EYE, &fracs, &[SuperI(0)], 1e-5).unwrap();
        let maps = IndexMaps::new(vec![SuperI(0)], vec![PrimI(0); 4]).unwrap();
        assert!(PeriodicImages::new(svecs, maps).is_err());
    }
}
