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

//! Interaction strengths for every band combination of a single triplet.

use crate::{PrimI, IndexVec};
use crate::error::InteractionError;
use crate::fc::ThirdOrderFcs;
use crate::fourier::{Fc3Context, R2qConvention};
use crate::geometry::PeriodicImages;
use crate::settings::{Settings, TransformPath};
use crate::tensor::V3;
use crate::vertex::{self, Eigenvectors};

/// Phonons at the three wavevectors of a triplet, already solved.
#[derive(Debug, Copy, Clone)]
pub struct TripletPhonons<'a> {
    pub qpoints: [V3; 3],
    /// In the units that the cutoff is expressed in.
    pub frequencies: [&'a [f64]; 3],
    pub eigenvectors: [&'a Eigenvectors; 3],
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TripletOptions {
    /// Bands at or below this frequency do not participate.
    pub cutoff_frequency: f64,
    /// Average the reciprocal tensor over both conventions.  `convention` is then ignored.
    pub symmetrize: bool,
    pub convention: R2qConvention,
    pub transform: TransformPath,
}

impl Default for TripletOptions {
    fn default() -> Self { TripletOptions::from(&Settings::default()) }
}

impl<'a> From<&'a Settings> for TripletOptions {
    fn from(settings: &'a Settings) -> Self {
        TripletOptions {
            cutoff_frequency: settings.cutoff_frequency,
            symmetrize: settings.symmetrize_fc3_q,
            convention: settings.r2q_convention,
            transform: settings.transform,
        }
    }
}

/// Number of output elements written for one triplet.
pub fn slot_len(num_selected: usize, num_bands: usize) -> usize { num_selected * num_bands * num_bands }

/// Fill `out` with `|Φ(q0 b0, q1 b1, q2 b2)|²`, laid out as `[b0][b1][b2]` where `b0`
/// runs over `band_indices` and the other two legs run over every band.
///
/// Every element is overwritten.  Combinations where any of the three frequencies is
/// at or below the cutoff are set to exactly zero.
pub fn triplet_interaction_strength(
    out: &mut [f64],
    fc3: &ThirdOrderFcs,
    images: &PeriodicImages,
    masses: &IndexVec<PrimI, f64>,
    phonons: &TripletPhonons<'_>,
    band_indices: &[usize],
    opts: &TripletOptions,
) -> Result<(), InteractionError> {
    let num_bands = images.num_bands();
    ensure_dims!(
        out.len() == slot_len(band_indices.len(), num_bands),
        "output slot has {} elements, expected {} x {}^2", out.len(), band_indices.len(), num_bands,
    );
    ensure_dims!(
        masses.len() == images.num_prim(),
        "{} masses given for {} primitive atoms", masses.len(), images.num_prim(),
    );
    for leg in 0..3 {
        ensure_dims!(
            phonons.frequencies[leg].len() == num_bands,
            "leg {} has {} frequencies, expected {}", leg, phonons.frequencies[leg].len(), num_bands,
        );
        ensure_dims!(
            phonons.eigenvectors[leg].num_bands() == num_bands,
            "leg {} has {} eigenvectors, expected {}", leg, phonons.eigenvectors[leg].num_bands(), num_bands,
        );
    }
    for &band in band_indices {
        ensure_dims!(band < num_bands, "band index {} out of range for {} bands", band, num_bands);
    }

    let active = |leg: usize, band: usize| phonons.frequencies[leg][band] > opts.cutoff_frequency;

    for x in out.iter_mut() {
        *x = 0.0;
    }

    let any_active = {
        band_indices.iter().any(|&b| active(0, b))
            && (0..num_bands).any(|b| active(1, b))
            && (0..num_bands).any(|b| active(2, b))
    };
    if !any_active {
        trace!("every band combination is below the cutoff; skipping the transform");
        return Ok(());
    }

    let ctx = Fc3Context::new(fc3, images, &phonons.qpoints)?;
    let fc3_q = match opts.symmetrize {
        true => ctx.reciprocal_symmetrized(opts.transform)?,
        false => ctx.reciprocal(opts.convention, opts.transform)?,
    };

    let evs = &phonons.eigenvectors;
    for (i, &b0) in band_indices.iter().enumerate() {
        if !active(0, b0) {
            continue;
        }
        for b1 in (0..num_bands).filter(|&b| active(1, b)) {
            for b2 in (0..num_bands).filter(|&b| active(2, b)) {
                let triple = [evs[0].band(b0), evs[1].band(b1), evs[2].band(b2)];
                let vertex = vertex::sum_in_primitive(&fc3_q, triple, masses)?;
                out[(i * num_bands + b1) * num_bands + b2] = vertex.norm_sqr();
            }
        }
    }
    Ok(())
}
