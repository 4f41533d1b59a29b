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

//! Three-phonon interaction strengths.
//!
//! Given a triplet of wavevectors and the real-space third-order force constants of a
//! supercell, this computes `|Φ(q0 λ0, q1 λ1, q2 λ2)|²` for every combination of bands.
//! The pipeline is:
//!
//! * [`fourier`]: interpolate the force constants to the wavevector triplet, using the
//!   shortest-image table in [`geometry`].
//! * [`vertex`]: contract the reciprocal tensor with three eigenvectors and the masses.
//! * [`triplet`]: do that for every band combination of a single triplet.
//! * [`interaction`]: drive the above over many triplets, asking an external
//!   [`PhononSolver`] for eigenvectors.
//!
//! [`PhononSolver`]: interaction::PhononSolver

#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;
#[macro_use] extern crate failure;
#[macro_use] extern crate itertools;
#[macro_use] extern crate rsp2_newtype_indices;
#[cfg(test)] #[macro_use] extern crate rsp2_assert_close;

#[macro_use]
mod macros;

pub mod error;
pub mod tensor;
pub mod geometry;
pub mod fc;
pub mod fourier;
pub mod vertex;
pub mod triplet;
pub mod interaction;
pub mod settings;

#[cfg(test)]
mod test_util;

pub type FailResult<T> = Result<T, failure::Error>;

// index types, to aid in reasoning
newtype_index!{PrimI}  // index of a primitive cell site
newtype_index!{SuperI} // index of a supercell site

pub use rsp2_newtype_indices::{Idx, IndexVec};

pub use crate::error::{InteractionError, InteractionFailure};
pub use crate::tensor::{V3, M33, C64, Block333, RealBlock, ComplexBlock};
pub use crate::geometry::{ShortestVectors, IndexMaps, PeriodicImages};
pub use crate::fc::{SecondOrderFcs, ThirdOrderFcs};
pub use crate::fourier::{R2qConvention, ReciprocalFc3, HalfReciprocalFc3, Fc3Context, fc3_reciprocal};
pub use crate::vertex::Eigenvectors;
pub use crate::triplet::{TripletPhonons, TripletOptions};
pub use crate::interaction::{
    PhononSolver, SolverRequest, Eigensolution, Eigenvalues, NacParams, InteractionInputs,
    compute_interaction_strength, get_interaction_strength,
};
pub use crate::settings::{Settings, Threading, TransformPath, Uplo};
