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

use std::convert::TryFrom;
use std::fmt;

/// Everything that can go wrong inside the kernel.
///
/// None of these are retried.  Once one is produced, the current call is over.
#[derive(Debug, Fail)]
pub enum InteractionError {
    /// An intermediate buffer could not be obtained.
    #[fail(display = "unable to allocate {} elements for {}", len, what)]
    AllocationFailure { what: &'static str, len: usize },

    /// Caller-supplied sizes disagree with the declared atom or band counts.
    #[fail(display = "dimension mismatch: {}", _0)]
    DimensionMismatch(String),

    /// A [`Settings`](crate::Settings) value that cannot produce meaningful frequencies.
    #[fail(display = "invalid settings: {}", _0)]
    InvalidSettings(String),

    /// The eigensolver could not produce phonons at some wavevector.
    #[fail(display = "phonon solver failed at q = {:?}: {}", qpoint, message)]
    ExternalSolverFailure { qpoint: [f64; 3], message: String },
}

/// A failed call to the orchestrator, remembering how far it got.
#[derive(Debug, Fail)]
pub struct InteractionFailure {
    /// `None` if the call failed before any triplet was started.
    pub triplet: Option<usize>,
    #[cause]
    pub error: InteractionError,
}

impl fmt::Display for InteractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.triplet {
            Some(i) => write!(f, "interaction strength failed at triplet {}: {}", i, self.error),
            None => write!(f, "interaction strength failed during setup: {}", self.error),
        }
    }
}

impl InteractionFailure {
    pub(crate) fn setup(error: InteractionError) -> Self
    { InteractionFailure { triplet: None, error } }

    pub(crate) fn at(triplet: usize, error: InteractionError) -> Self
    { InteractionFailure { triplet: Some(triplet), error } }

    /// `i + 1` for a failure at triplet `i`, and `-1` for a failure during setup.
    pub fn status_code(&self) -> i32 {
        match self.triplet {
            Some(i) => i32::try_from(i + 1).unwrap_or(i32::max_value()),
            None => -1,
        }
    }
}

/// Integer status for a call: `0` on success, otherwise see [`InteractionFailure::status_code`].
pub fn status_code(result: &Result<(), InteractionFailure>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.status_code(),
    }
}

/// `vec![fill; len]`, except that running out of memory is an error instead of an abort.
pub(crate) fn try_alloc<T: Clone>(what: &'static str, len: usize, fill: T) -> Result<Vec<T>, InteractionError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len)
        .map_err(|_| InteractionError::AllocationFailure { what, len })?;
    vec.resize(len, fill);
    Ok(vec)
}
