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

//! Fourier interpolation of third-order force constants to a wavevector triplet.
//!
//! For an atom triple `(a0, a1, a2)` of the primitive cell, the reciprocal tensor is
//!
//! ```text
//! Φ(q0 a0, q1 a1, q2 a2) = Σ Φ(i, j, k) ⟨exp(2πi q·r)⟩ ⟨exp(2πi q'·r')⟩
//! ```
//!
//! where one of the three atoms (the *anchor*) is pinned to its representative image in
//! the supercell, the sum runs over every image of the other two, and each phase is
//! averaged over the tied shortest images of that atom's displacement from the anchor.
//! Translational invariance is what permits pinning the anchor; which leg gets pinned is
//! a free choice, and is what [`R2qConvention`] selects.
//!
//! Pinning the anchor at its representative drops its own phase, which is
//! `exp(2πi G·r_anchor)` with `G = q0 + q1 + q2`.  That is `1` for normal triplets, but not
//! for umklapp ones, so each block is multiplied by this *pre-phase*, with `r_anchor`
//! measured from the representative of primitive atom 0.
//!
//! Two evaluation orders are available. The *blockwise* one sums each atom triple
//! independently. The *staged* one first sums the middle leg with the anchor pinned
//! (producing a [`HalfReciprocalFc3`] still indexed by a supercell atom on the remaining
//! leg) and then performs the final supercell summation.

use crate::{PrimI, SuperI, Idx, IndexVec};
use crate::error::{InteractionError, try_alloc};
use crate::fc::ThirdOrderFcs;
use crate::geometry::PeriodicImages;
use crate::settings::TransformPath;
use crate::tensor::{V3, C64, ComplexBlock};
use rsp2_assert_close::{CheckClose, CheckCloseError, Tolerances};
use std::f64::consts::PI;

/// Which leg's atom is pinned to the representative image when interpolating.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum R2qConvention {
    /// Pin the atom of `q0`; phases come from `q1` and `q2`.
    AnchorFirst,
    /// Pin the atom of `q2`; phases come from `q0` and `q1`.
    AnchorLast,
}

impl Default for R2qConvention {
    fn default() -> Self { R2qConvention::AnchorFirst }
}

impl R2qConvention {
    pub const ALL: [R2qConvention; 2] = [R2qConvention::AnchorFirst, R2qConvention::AnchorLast];

    /// Accepts the integer "r2q TI index" flag: the index of the pinned leg.
    ///
    /// Only the outer legs can be pinned.  Leg 1 is the one summed in the first stage of
    /// the staged transform, so index 1 is rejected.
    pub fn from_ti_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(R2qConvention::AnchorFirst),
            2 => Some(R2qConvention::AnchorLast),
            _ => None,
        }
    }

    pub fn anchor_leg(self) -> usize { self.strategy().anchor_leg() }

    pub fn strategy(self) -> &'static dyn PhaseAnchor {
        match self {
            R2qConvention::AnchorFirst => &AnchorFirst,
            R2qConvention::AnchorLast => &AnchorLast,
        }
    }
}

// ---------------------------------------------------------------------------

/// Reciprocal-space third-order force constants for one wavevector triplet,
/// one 3x3x3 block per ordered triple of primitive atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct ReciprocalFc3 {
    num_prim: usize,
    blocks: Vec<ComplexBlock>,
}

impl ReciprocalFc3 {
    pub fn zeros(num_prim: usize) -> Result<Self, InteractionError> {
        let len = num_prim * num_prim * num_prim;
        let blocks = try_alloc("reciprocal force constants", len, ComplexBlock::zero())?;
        Ok(ReciprocalFc3 { num_prim, blocks })
    }

    pub fn num_prim(&self) -> usize { self.num_prim }

    #[inline]
    fn flat_index(&self, a0: PrimI, a1: PrimI, a2: PrimI) -> usize
    { (a0.index() * self.num_prim + a1.index()) * self.num_prim + a2.index() }

    #[inline]
    pub fn block(&self, a0: PrimI, a1: PrimI, a2: PrimI) -> &ComplexBlock
    { &self.blocks[self.flat_index(a0, a1, a2)] }

    #[inline]
    pub fn block_mut(&mut self, a0: PrimI, a1: PrimI, a2: PrimI) -> &mut ComplexBlock {
        let index = self.flat_index(a0, a1, a2);
        &mut self.blocks[index]
    }

    /// Elementwise mean, used to symmetrize over the two conventions.
    pub fn mean(&self, other: &ReciprocalFc3) -> Result<ReciprocalFc3, InteractionError> {
        ensure_dims!(
            self.num_prim == other.num_prim,
            "cannot average reciprocal tensors for {} and {} atoms", self.num_prim, other.num_prim,
        );
        let mut blocks = try_alloc("reciprocal force constants", self.blocks.len(), ComplexBlock::zero())?;
        for (out, (a, b)) in blocks.iter_mut().zip(self.blocks.iter().zip(&other.blocks)) {
            *out = a.mean(b);
        }
        Ok(ReciprocalFc3 { num_prim: self.num_prim, blocks })
    }

    /// Largest modulus of any elementwise difference.
    pub fn max_abs_diff(&self, other: &ReciprocalFc3) -> f64 {
        self.blocks.iter().zip(&other.blocks)
            .flat_map(|(a, b)| {
                let (a, b) = (a.to_flat(), b.to_flat());
                (0..27).map(move |i| (a[i] - b[i]).norm())
            })
            .fold(0.0, f64::max)
    }
}

impl CheckClose for ReciprocalFc3 {
    type Scalar = C64;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<C64>> {
        assert_eq!(self.num_prim, other.num_prim, "check_close on tensors of different size");
        self.blocks.check_close(&other.blocks, tol)
    }
}

/// The output of the first stage of the staged transform.
///
/// Indexed by `(anchor primitive atom, leg-1 primitive atom, free supercell atom)`, where
/// the anchor and free legs are determined by the convention.
#[derive(Debug, Clone)]
pub struct HalfReciprocalFc3 {
    convention: R2qConvention,
    num_prim: usize,
    num_super: usize,
    blocks: Vec<ComplexBlock>,
}

impl HalfReciprocalFc3 {
    #[inline]
    fn flat_index(&self, anchor: PrimI, middle: PrimI, free: SuperI) -> usize
    { (anchor.index() * self.num_prim + middle.index()) * self.num_super + free.index() }

    #[inline]
    pub fn block(&self, anchor: PrimI, middle: PrimI, free: SuperI) -> &ComplexBlock
    { &self.blocks[self.flat_index(anchor, middle, free)] }
}

// ---------------------------------------------------------------------------

/// Everything shared by the blocks of one transform: the inputs, plus every averaged
/// phase factor that the sums could ask for.
pub struct Fc3Context<'a> {
    fc3: &'a ThirdOrderFcs,
    images: &'a PeriodicImages,
    // [leg][super][prim]
    phases: Vec<C64>,
    pre_phases: IndexVec<PrimI, C64>,
}

impl<'a> Fc3Context<'a> {
    pub fn new(
        fc3: &'a ThirdOrderFcs,
        images: &'a PeriodicImages,
        qs: &[V3; 3],
    ) -> Result<Self, InteractionError> {
        ensure_dims!(
            fc3.num_atoms() == images.num_super(),
            "third-order force constants are for {} atoms, but the supercell has {}",
            fc3.num_atoms(), images.num_super(),
        );

        let (num_super, num_prim) = (images.num_super(), images.num_prim());
        let mut phases = try_alloc("phase factors", 3 * num_super * num_prim, C64::new(0.0, 0.0))?;
        for leg in 0..3 {
            for super_i in images.maps().super_indices() {
                for prim in images.maps().prim_indices() {
                    let index = (leg * num_super + super_i.index()) * num_prim + prim.index();
                    phases[index] = images.averaged_phase(&qs[leg], super_i, prim);
                }
            }
        }

        let total = qs[0] + qs[1] + qs[2];
        let svecs = images.shortest_vectors();
        let pre_phases = images.maps().prim_indices().map(|prim| {
            let r = svecs.images(images.p2s(prim), PrimI(0))[0];
            C64::from_polar(&1.0, &(2.0 * PI * total.dot(&r)))
        }).collect();
        Ok(Fc3Context { fc3, images, phases, pre_phases })
    }

    pub fn images(&self) -> &PeriodicImages { self.images }

    /// Averaged `exp(2πi q_leg·r)` for the displacement from `anchor` to `super_i`.
    #[inline]
    pub fn phase(&self, leg: usize, super_i: SuperI, anchor: PrimI) -> C64 {
        let (num_super, num_prim) = (self.images.num_super(), self.images.num_prim());
        self.phases[(leg * num_super + super_i.index()) * num_prim + anchor.index()]
    }

    /// `exp(2πi (q0 + q1 + q2)·r)` for the position of `anchor` relative to primitive atom 0.
    #[inline]
    pub fn pre_phase(&self, anchor: PrimI) -> C64 { self.pre_phases[anchor] }

    fn prim_triples(&self) -> impl Iterator<Item=(PrimI, PrimI, PrimI)> {
        let prims = || self.images.maps().prim_indices();
        iproduct!(prims(), prims(), prims())
    }

    /// One block of the reciprocal tensor, summed directly over the supercell.
    pub fn sum_in_supercell(&self, atoms: [PrimI; 3], convention: R2qConvention) -> ComplexBlock
    { convention.strategy().sum_in_supercell(self, atoms) }

    /// The whole reciprocal tensor, one block at a time.
    pub fn reciprocal_blockwise(&self, convention: R2qConvention) -> Result<ReciprocalFc3, InteractionError> {
        let strategy = convention.strategy();
        let mut out = ReciprocalFc3::zeros(self.images.num_prim())?;
        for (a0, a1, a2) in self.prim_triples() {
            *out.block_mut(a0, a1, a2) = strategy.sum_in_supercell(self, [a0, a1, a2]);
        }
        Ok(out)
    }

    /// First stage of the staged transform: pin the anchor and sum over the images
    /// of the middle leg.
    pub fn half_reciprocal(&self, convention: R2qConvention) -> Result<HalfReciprocalFc3, InteractionError> {
        let strategy = convention.strategy();
        let (num_prim, num_super) = (self.images.num_prim(), self.images.num_super());
        let blocks = try_alloc("half-transformed force constants", num_prim * num_prim * num_super, ComplexBlock::zero())?;
        let mut out = HalfReciprocalFc3 { convention, num_prim, num_super, blocks };

        let maps = self.images.maps();
        for (anchor, middle) in iproduct!(maps.prim_indices(), maps.prim_indices()) {
            for free in maps.super_indices() {
                let index = out.flat_index(anchor, middle, free);
                out.blocks[index] = strategy.half_sum(self, anchor, middle, free);
            }
        }
        Ok(out)
    }

    /// Second stage of the staged transform: the final supercell summation over the
    /// free leg, into a compact primitive-cell tensor.
    pub fn realspace_sum(&self, half: &HalfReciprocalFc3) -> Result<ReciprocalFc3, InteractionError> {
        ensure_dims!(
            (half.num_prim, half.num_super) == (self.images.num_prim(), self.images.num_super()),
            "half-transformed tensor is for {} x {} atoms, but the supercell has {} x {}",
            half.num_prim, half.num_super, self.images.num_prim(), self.images.num_super(),
        );
        let strategy = half.convention.strategy();
        let free_leg = strategy.free_leg();
        let mut out = ReciprocalFc3::zeros(half.num_prim)?;

        let maps = self.images.maps();
        for (anchor, middle) in iproduct!(maps.prim_indices(), maps.prim_indices()) {
            for free in maps.super_indices() {
                let [a0, a1, a2] = strategy.arrange(anchor, middle, maps.s2p(free));
                let phase = self.pre_phase(anchor) * self.phase(free_leg, free, anchor);
                out.block_mut(a0, a1, a2).add_phased_complex(half.block(anchor, middle, free), phase);
            }
        }
        Ok(out)
    }

    pub fn reciprocal(&self, convention: R2qConvention, path: TransformPath) -> Result<ReciprocalFc3, InteractionError> {
        match path {
            TransformPath::Blockwise => self.reciprocal_blockwise(convention),
            TransformPath::Staged => self.realspace_sum(&self.half_reciprocal(convention)?),
        }
    }

    /// The mean of the tensors produced under both conventions.
    pub fn reciprocal_symmetrized(&self, path: TransformPath) -> Result<ReciprocalFc3, InteractionError> {
        let first = self.reciprocal(R2qConvention::AnchorFirst, path)?;
        let last = self.reciprocal(R2qConvention::AnchorLast, path)?;
        first.mean(&last)
    }
}

/// Interpolate `fc3` to the triplet `qs` under one convention.
pub fn fc3_reciprocal(
    fc3: &ThirdOrderFcs,
    images: &PeriodicImages,
    qs: &[V3; 3],
    convention: R2qConvention,
) -> Result<ReciprocalFc3, InteractionError> {
    Fc3Context::new(fc3, images, qs)?.reciprocal_blockwise(convention)
}

// ---------------------------------------------------------------------------

/// A choice of which leg anchors the phase.
///
/// Leg 1 is always the "middle" leg, summed in the first stage of the staged transform;
/// the remaining leg is the "free" one.
pub trait PhaseAnchor: Sync {
    /// Leg whose atom is pinned to its representative image.
    fn anchor_leg(&self) -> usize;

    /// Leg left indexed by supercell atom after the first stage.
    fn free_leg(&self) -> usize;

    /// Put `(anchor, middle, free)` atoms back into leg order.
    fn arrange(&self, anchor: PrimI, middle: PrimI, free: PrimI) -> [PrimI; 3];

    /// Sum over the images of the middle leg's atom, with its phase, for a fixed
    /// supercell atom on the free leg.
    fn half_sum(&self, ctx: &Fc3Context<'_>, anchor: PrimI, middle: PrimI, free: SuperI) -> ComplexBlock;

    /// Sum over the images of both unpinned atoms for one primitive atom triple, in leg order.
    fn sum_in_supercell(&self, ctx: &Fc3Context<'_>, atoms: [PrimI; 3]) -> ComplexBlock;
}

#[derive(Debug, Copy, Clone)]
pub struct AnchorFirst;

#[derive(Debug, Copy, Clone)]
pub struct AnchorLast;

impl PhaseAnchor for AnchorFirst {
    fn anchor_leg(&self) -> usize { 0 }
    fn free_leg(&self) -> usize { 2 }

    #[inline]
    fn arrange(&self, anchor: PrimI, middle: PrimI, free: PrimI) -> [PrimI; 3] { [anchor, middle, free] }

    fn half_sum(&self, ctx: &Fc3Context<'_>, a0: PrimI, a1: PrimI, k: SuperI) -> ComplexBlock {
        let i = ctx.images.p2s(a0);
        let mut out = ComplexBlock::zero();
        for &j in ctx.images.images_of(a1) {
            out.add_phased(ctx.fc3.block(i, j, k), ctx.phase(1, j, a0));
        }
        out
    }

    fn sum_in_supercell(&self, ctx: &Fc3Context<'_>, [a0, a1, a2]: [PrimI; 3]) -> ComplexBlock {
        let i = ctx.images.p2s(a0);
        let mut out = ComplexBlock::zero();
        for &j in ctx.images.images_of(a1) {
            let phase_j = ctx.pre_phase(a0) * ctx.phase(1, j, a0);
            for &k in ctx.images.images_of(a2) {
                out.add_phased(ctx.fc3.block(i, j, k), phase_j * ctx.phase(2, k, a0));
            }
        }
        out
    }
}

impl PhaseAnchor for AnchorLast {
    fn anchor_leg(&self) -> usize { 2 }
    fn free_leg(&self) -> usize { 0 }

    #[inline]
    fn arrange(&self, anchor: PrimI, middle: PrimI, free: PrimI) -> [PrimI; 3] { [free, middle, anchor] }

    fn half_sum(&self, ctx: &Fc3Context<'_>, a2: PrimI, a1: PrimI, i: SuperI) -> ComplexBlock {
        let k = ctx.images.p2s(a2);
        let mut out = ComplexBlock::zero();
        for &j in ctx.images.images_of(a1) {
            out.add_phased(ctx.fc3.block(i, j, k), ctx.phase(1, j, a2));
        }
        out
    }

    fn sum_in_supercell(&self, ctx: &Fc3Context<'_>, [a0, a1, a2]: [PrimI; 3]) -> ComplexBlock {
        let k = ctx.images.p2s(a2);
        let mut out = ComplexBlock::zero();
        for &i in ctx.images.images_of(a0) {
            let phase_i = ctx.pre_phase(a2) * ctx.phase(0, i, a2);
            for &j in ctx.images.images_of(a1) {
                out.add_phased(ctx.fc3.block(i, j, k), phase_i * ctx.phase(1, j, a2));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{self, Chain};

    fn qx(x: f64) -> V3 { V3([x, 0.0, 0.0]) }

    #[test]
    fn staged_matches_blockwise() {
        let mut rng = test_util::rng();
        let chain = Chain::new(&[0.0, 0.37], 3);
        let fc3 = test_util::random_fc3(&mut rng, chain.num_super());
        // not momentum conserving; that doesn't matter here
        let qs = [qx(0.21), V3([0.13, 0.4, -0.2]), qx(-0.47)];
        let ctx = Fc3Context::new(&fc3, &chain.images, &qs).unwrap();

        for &convention in &R2qConvention::ALL {
            let blockwise = ctx.reciprocal(convention, TransformPath::Blockwise).unwrap();
            let staged = ctx.reciprocal(convention, TransformPath::Staged).unwrap();
            assert_close!(abs=1e-12, rel=1e-10, blockwise, staged, "{:?}", convention);
        }
    }

    #[test]
    fn conventions_agree_on_supercell_grid() {
        let mut rng = test_util::rng();
        let chain = Chain::new(&[0.0, 0.37], 3);
        let fc3 = chain.translation_average(&test_util::random_fc3(&mut rng, chain.num_super()));
        // commensurate with the supercell; the second triplet is umklapp
        let triplets = [
            [qx(1.0 / 3.0), qx(1.0 / 3.0), qx(-2.0 / 3.0)],
            [qx(1.0 / 3.0), qx(1.0 / 3.0), qx(1.0 / 3.0)],
        ];
        for qs in &triplets {
            let first = fc3_reciprocal(&fc3, &chain.images, qs, R2qConvention::AnchorFirst).unwrap();
            let last = fc3_reciprocal(&fc3, &chain.images, qs, R2qConvention::AnchorLast).unwrap();
            assert_close!(abs=1e-12, rel=1e-10, first, last, "{:?}", qs);

            let ctx = Fc3Context::new(&fc3, &chain.images, qs).unwrap();
            let staged = ctx.reciprocal(R2qConvention::AnchorLast, TransformPath::Staged).unwrap();
            assert_close!(abs=1e-12, rel=1e-10, first, staged, "{:?}", qs);
        }
    }

    #[test]
    fn umklapp_pre_phase() {
        let chain = Chain::new(&[0.0, 0.37], 3);
        let normal = [qx(1.0 / 3.0), qx(1.0 / 3.0), qx(-2.0 / 3.0)];
        let umklapp = [qx(1.0 / 3.0), qx(1.0 / 3.0), qx(1.0 / 3.0)];
        let fc3 = ThirdOrderFcs::zeros(chain.num_super()).unwrap();

        let ctx = Fc3Context::new(&fc3, &chain.images, &normal).unwrap();
        for prim in chain.images.maps().prim_indices() {
            assert_close!(abs=1e-14, ctx.pre_phase(prim), C64::new(1.0, 0.0));
        }

        let ctx = Fc3Context::new(&fc3, &chain.images, &umklapp).unwrap();
        let angle = 2.0 * PI * 0.37;
        assert_close!(abs=1e-14, ctx.pre_phase(PrimI(0)), C64::new(1.0, 0.0));
        assert_close!(abs=1e-14, ctx.pre_phase(PrimI(1)), C64::new(angle.cos(), angle.sin()));
    }

    #[test]
    fn conventions_differ_off_grid() {
        // with tied images and a wavevector between grid points, the choice of anchor
        // leaks into the result; this is what symmetrization is for.
        let mut rng = test_util::rng();
        let chain = Chain::new(&[0.0, 0.5], 2);
        let fc3 = chain.translation_average(&test_util::random_fc3(&mut rng, chain.num_super()));
        let qs = [qx(0.123), qx(0.2), qx(-0.323)];

        let first = fc3_reciprocal(&fc3, &chain.images, &qs, R2qConvention::AnchorFirst).unwrap();
        let last = fc3_reciprocal(&fc3, &chain.images, &qs, R2qConvention::AnchorLast).unwrap();
        assert!(first.max_abs_diff(&last) > 1e-6);
    }

    #[test]
    fn translating_atom_labels() {
        // Relabel every supercell atom by a lattice translation, and move the representatives
        // along with them.  No translational invariance is required of the force constants.
        let mut rng = test_util::rng();
        let chain = Chain::new(&[0.0, 0.37], 4);
        let moved = Chain::with_first_cell(&[0.0, 0.37], 4, 1);
        let fc3 = test_util::random_fc3(&mut rng, chain.num_super());
        let fc3_moved = fc3.permuted_atoms(|s| chain.translate(s, 1)).unwrap();
        let qs = [qx(0.1), qx(0.3), qx(0.6)];

        for &convention in &R2qConvention::ALL {
            let expected = fc3_reciprocal(&fc3, &chain.images, &qs, convention).unwrap();
            let actual = fc3_reciprocal(&fc3_moved, &moved.images, &qs, convention).unwrap();
            assert_close!(abs=1e-12, rel=1e-10, expected, actual, "{:?}", convention);
        }
    }

    #[test]
    fn symmetrization_is_idempotent() {
        let mut rng = test_util::rng();
        let chain = Chain::new(&[0.0, 0.5], 2);
        let fc3 = test_util::random_fc3(&mut rng, chain.num_super());
        let qs = [qx(0.123), qx(0.2), qx(-0.323)];
        let ctx = Fc3Context::new(&fc3, &chain.images, &qs).unwrap();

        let once = ctx.reciprocal_symmetrized(TransformPath::Blockwise).unwrap();
        let twice = once.mean(&once).unwrap();
        assert_eq!(once, twice);

        let first = ctx.reciprocal(R2qConvention::AnchorFirst, TransformPath::Blockwise).unwrap();
        let last = ctx.reciprocal(R2qConvention::AnchorLast, TransformPath::Blockwise).unwrap();
        assert_eq!(once, first.mean(&last).unwrap());
        assert_eq!(once, last.mean(&first).unwrap());
    }

    #[test]
    fn gamma_point_is_a_plain_sum() {
        let mut rng = test_util::rng();
        let chain = Chain::new(&[0.0, 0.37], 3);
        let fc3 = test_util::random_fc3(&mut rng, chain.num_super());
        let qs = [V3::zero(); 3];
        let recip = fc3_reciprocal(&fc3, &chain.images, &qs, R2qConvention::AnchorFirst).unwrap();

        let (a0, a1, a2) = (PrimI(1), PrimI(0), PrimI(1));
        let mut expected = ComplexBlock::zero();
        for &j in chain.images.images_of(a1) {
            for &k in chain.images.images_of(a2) {
                expected.add_phased(fc3.block(chain.images.p2s(a0), j, k), C64::new(1.0, 0.0));
            }
        }
        assert_close!(abs=1e-12, *recip.block(a0, a1, a2), expected);
    }

    #[test]
    fn wrong_supercell() {
        let chain = Chain::new(&[0.0], 3);
        let fc3 = ThirdOrderFcs::zeros(4).unwrap();
        match Fc3Context::new(&fc3, &chain.images, &[V3::zero(); 3]) {
            Err(InteractionError::DimensionMismatch(_)) => {},
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn ti_index_flag() {
        assert_eq!(R2qConvention::from_ti_index(0), Some(R2qConvention::AnchorFirst));
        assert_eq!(R2qConvention::from_ti_index(2), Some(R2qConvention::AnchorLast));
        assert_eq!(R2qConvention::from_ti_index(1), None);
        assert_eq!(R2qConvention::AnchorLast.anchor_leg(), 2);
    }
}
