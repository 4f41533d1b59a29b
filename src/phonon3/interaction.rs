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

//! Interaction strengths for a fixed phonon and many final-state pairs.
//!
//! Eigenvectors come from an external [`PhononSolver`]; this module never builds a
//! dynamical matrix, and the non-analytic correction parameters are only passed along.

use crate::{PrimI, IndexVec, FailResult};
use crate::error::{InteractionError, InteractionFailure};
use crate::fc::{SecondOrderFcs, ThirdOrderFcs};
use crate::geometry::PeriodicImages;
use crate::settings::{Settings, Threading, Uplo};
use crate::tensor::{V3, M33};
use crate::triplet::{self, TripletOptions, TripletPhonons};
use crate::vertex::Eigenvectors;

/// Parameters of the non-analytic correction near Γ.
#[derive(Debug, Clone, PartialEq)]
pub struct NacParams {
    /// Born effective charge tensor of each primitive atom.
    pub born: Vec<M33>,
    pub dielectric: M33,
    /// Reciprocal lattice vectors as rows.
    pub reciprocal_lattice: M33,
    /// Direction from which Γ is approached, if any.
    pub q_direction: Option<V3>,
    pub factor: f64,
}

/// Everything a solver needs to produce phonons at one wavevector.
#[derive(Debug, Copy, Clone)]
pub struct SolverRequest<'a> {
    pub qpoint: V3,
    pub fc2: &'a SecondOrderFcs,
    pub masses: &'a IndexVec<PrimI, f64>,
    pub images: &'a PeriodicImages,
    pub nac: Option<&'a NacParams>,
    pub uplo: Uplo,
}

/// Eigenvalues of the dynamical matrix, in the solver's units.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenvalues(pub Vec<f64>);

impl Eigenvalues {
    pub fn len(&self) -> usize { self.0.len() }

    /// `sign(λ) sqrt(|λ|) * unit_factor`, so that unstable modes come out negative.
    pub fn to_frequencies(&self, unit_factor: f64) -> Vec<f64> {
        self.0.iter()
            .map(|&x| x.signum() * x.abs().sqrt() * unit_factor)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Eigensolution {
    pub eigenvalues: Eigenvalues,
    pub eigenvectors: Eigenvectors,
}

/// Diagonalizes the dynamical matrix.  Must be safe to call from several threads at once.
pub trait PhononSolver: Sync {
    fn eigensolve(&self, request: &SolverRequest<'_>) -> FailResult<Eigensolution>;
}

impl<'a, S: PhononSolver + ?Sized> PhononSolver for &'a S {
    fn eigensolve(&self, request: &SolverRequest<'_>) -> FailResult<Eigensolution>
    { (**self).eigensolve(request) }
}

/// Inputs for one call to [`compute_interaction_strength`].
///
/// The second- and third-order force constants may live on different supercells, but
/// both must share the same primitive cell.
#[derive(Debug, Copy, Clone)]
pub struct InteractionInputs<'a> {
    /// The phonon shared by every triplet.
    pub q0: V3,
    pub q1s: &'a [V3],
    pub q2s: &'a [V3],
    pub fc2: &'a SecondOrderFcs,
    pub fc3: &'a ThirdOrderFcs,
    pub masses_fc2: &'a IndexVec<PrimI, f64>,
    pub masses_fc3: &'a IndexVec<PrimI, f64>,
    pub images_fc2: &'a PeriodicImages,
    pub images_fc3: &'a PeriodicImages,
    /// Bands of `q0` to compute.  The other two legs always use every band.
    pub band_indices: &'a [usize],
    pub nac: Option<&'a NacParams>,
}

impl<'a> InteractionInputs<'a> {
    pub fn num_triplets(&self) -> usize { self.q1s.len() }
    pub fn num_bands(&self) -> usize { self.images_fc3.num_bands() }

    /// Length of `amps` that [`compute_interaction_strength`] expects.
    pub fn amps_len(&self) -> usize
    { self.num_triplets() * triplet::slot_len(self.band_indices.len(), self.num_bands()) }

    /// Length of `freqs` that [`compute_interaction_strength`] expects.
    pub fn freqs_len(&self) -> usize { self.num_triplets() * 3 * self.num_bands() }

    fn validate(&self) -> Result<(), InteractionError> {
        ensure_dims!(
            self.q1s.len() == self.q2s.len(),
            "{} q1 points but {} q2 points", self.q1s.len(), self.q2s.len(),
        );
        ensure_dims!(
            self.images_fc2.num_prim() == self.images_fc3.num_prim(),
            "fc2 and fc3 tables disagree on the primitive cell ({} vs {} atoms)",
            self.images_fc2.num_prim(), self.images_fc3.num_prim(),
        );
        ensure_dims!(
            self.fc2.num_atoms() == self.images_fc2.num_super(),
            "second-order force constants are for {} atoms, but their supercell has {}",
            self.fc2.num_atoms(), self.images_fc2.num_super(),
        );
        ensure_dims!(
            self.fc3.num_atoms() == self.images_fc3.num_super(),
            "third-order force constants are for {} atoms, but their supercell has {}",
            self.fc3.num_atoms(), self.images_fc3.num_super(),
        );
        for &(name, masses) in &[("fc2", self.masses_fc2), ("fc3", self.masses_fc3)] {
            ensure_dims!(
                masses.len() == self.images_fc3.num_prim(),
                "{} {} masses given for {} primitive atoms", masses.len(), name, self.images_fc3.num_prim(),
            );
        }
        ensure_dims!(!self.band_indices.is_empty(), "no bands were selected");
        for &band in self.band_indices {
            ensure_dims!(
                band < self.num_bands(),
                "band index {} out of range for {} bands", band, self.num_bands(),
            );
        }
        if let Some(nac) = self.nac {
            ensure_dims!(
                nac.born.len() == self.images_fc2.num_prim(),
                "{} Born charges given for {} primitive atoms", nac.born.len(), self.images_fc2.num_prim(),
            );
        }
        Ok(())
    }
}

/// Phonons at one wavevector, as consumed by the triplet calculation.
struct SolvedPhonons {
    frequencies: Vec<f64>,
    eigenvectors: Eigenvectors,
}

struct Driver<'a, S: ?Sized> {
    inputs: &'a InteractionInputs<'a>,
    settings: &'a Settings,
    solver: &'a S,
    options: TripletOptions,
}

impl<'a, S: PhononSolver + ?Sized> Driver<'a, S> {
    fn solve(&self, qpoint: V3) -> Result<SolvedPhonons, InteractionError> {
        let inputs = self.inputs;
        let request = SolverRequest {
            qpoint,
            fc2: inputs.fc2,
            masses: inputs.masses_fc2,
            images: inputs.images_fc2,
            nac: inputs.nac,
            uplo: self.settings.uplo,
        };
        let Eigensolution { eigenvalues, eigenvectors } = {
            self.solver.eigensolve(&request)
                .map_err(|e| InteractionError::ExternalSolverFailure {
                    qpoint: qpoint.0,
                    message: e.to_string(),
                })?
        };

        let num_bands = inputs.num_bands();
        ensure_dims!(
            eigenvalues.len() == num_bands,
            "solver produced {} eigenvalues at {:?}, expected {}", eigenvalues.len(), qpoint, num_bands,
        );
        ensure_dims!(
            eigenvectors.num_bands() == num_bands,
            "solver produced {} eigenvectors at {:?}, expected {}", eigenvectors.num_bands(), qpoint, num_bands,
        );

        let frequencies = eigenvalues.to_frequencies(self.settings.frequency_unit_factor);
        if frequencies.iter().any(|&f| f < 0.0) {
            warn_once!(
                "Imaginary frequencies encountered (first at q = {:?}). \
                These modes are below the cutoff and will not contribute.",
                qpoint,
            );
        }
        Ok(SolvedPhonons { frequencies, eigenvectors })
    }

    fn compute_triplet(
        &self,
        index: usize,
        phonons_0: &SolvedPhonons,
        amps: &mut [f64],
        freqs: &mut [f64],
    ) -> Result<(), InteractionError> {
        let inputs = self.inputs;
        let (q1, q2) = (inputs.q1s[index], inputs.q2s[index]);
        trace!("triplet {}: q1 = {:?}, q2 = {:?}", index, q1, q2);

        let phonons_1 = self.solve(q1)?;
        let phonons_2 = self.solve(q2)?;

        let num_bands = inputs.num_bands();
        let solved = [phonons_0, &phonons_1, &phonons_2];
        for (dest, phonons) in freqs.chunks_mut(num_bands).zip(&solved) {
            dest.copy_from_slice(&phonons.frequencies);
        }

        let phonons = TripletPhonons {
            qpoints: [inputs.q0, q1, q2],
            frequencies: [&phonons_0.frequencies, &phonons_1.frequencies, &phonons_2.frequencies],
            eigenvectors: [&phonons_0.eigenvectors, &phonons_1.eigenvectors, &phonons_2.eigenvectors],
        };
        triplet::triplet_interaction_strength(
            amps, inputs.fc3, inputs.images_fc3, inputs.masses_fc3,
            &phonons, inputs.band_indices, &self.options,
        )
    }
}

/// Compute interaction strengths for the triplets `(q0, q1s[i], q2s[i])`.
///
/// * `amps` receives `|Φ|²` in `[triplet][b0][b1][b2]` order, where `b0` runs over the
///   selected bands and `b1`, `b2` over all bands.  (see [`InteractionInputs::amps_len`])
/// * `freqs` receives the frequencies used, in `[triplet][leg][band]` order.
///
/// Processing stops at the first failure; slots written before then are left as-is, and
/// should not be trusted.
pub fn compute_interaction_strength<S: PhononSolver + ?Sized>(
    amps: &mut [f64],
    freqs: &mut [f64],
    inputs: &InteractionInputs<'_>,
    settings: &Settings,
    solver: &S,
) -> Result<(), InteractionFailure> {
    settings.validate()
        .map_err(|e| InteractionFailure::setup(InteractionError::InvalidSettings(e.to_string())))?;
    inputs.validate().map_err(InteractionFailure::setup)?;
    check_len("amps", amps.len(), inputs.amps_len()).map_err(InteractionFailure::setup)?;
    check_len("freqs", freqs.len(), inputs.freqs_len()).map_err(InteractionFailure::setup)?;

    let options = TripletOptions::from(settings);
    debug!(
        "Computing interaction strengths for {} triplets ({} of {} bands, convention: {:?}, symmetrize: {}, {:?}, {:?})",
        inputs.num_triplets(), inputs.band_indices.len(), inputs.num_bands(),
        options.convention, options.symmetrize, options.transform, settings.threading,
    );

    let driver = Driver { inputs, settings, solver, options };
    let phonons_0 = driver.solve(inputs.q0).map_err(InteractionFailure::setup)?;

    let amps_chunk = triplet::slot_len(inputs.band_indices.len(), inputs.num_bands());
    let freqs_chunk = 3 * inputs.num_bands();
    match settings.threading {
        Threading::Serial => {
            let chunks = amps.chunks_mut(amps_chunk).zip(freqs.chunks_mut(freqs_chunk));
            for (index, (amps, freqs)) in chunks.enumerate() {
                driver.compute_triplet(index, &phonons_0, amps, freqs)
                    .map_err(|e| InteractionFailure::at(index, e))?;
            }
        },
        Threading::Rayon => {
            use rayon::prelude::*;

            amps.par_chunks_mut(amps_chunk)
                .zip(freqs.par_chunks_mut(freqs_chunk))
                .enumerate()
                .try_for_each(|(index, (amps, freqs))| {
                    driver.compute_triplet(index, &phonons_0, amps, freqs)
                        .map_err(|e| InteractionFailure::at(index, e))
                })?;
        },
    }

    debug!("Finished {} triplets", inputs.num_triplets());
    Ok(())
}

/// [`compute_interaction_strength`], reporting only an integer status.
///
/// `0` is success, `i + 1` means that triplet `i` failed, and `-1` means that the call
/// failed before reaching any triplet.  The error itself is logged.
pub fn get_interaction_strength<S: PhononSolver + ?Sized>(
    amps: &mut [f64],
    freqs: &mut [f64],
    inputs: &InteractionInputs<'_>,
    settings: &Settings,
    solver: &S,
) -> i32 {
    let result = compute_interaction_strength(amps, freqs, inputs, settings, solver);
    if let Err(e) = &result {
        error!("{}", e);
    }
    crate::error::status_code(&result)
}

fn check_len(what: &str, actual: usize, expected: usize) -> Result<(), InteractionError> {
    ensure_dims!(actual == expected, "{} has length {}, expected {}", what, actual, expected);
    Ok(())
}
