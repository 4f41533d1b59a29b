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

use crate::FailResult;
use crate::fourier::R2qConvention;

/// Per-call knobs for the interaction strength computation.
///
/// Every field has a default, so an empty YAML mapping is valid.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub threading: Threading,
    /// Multiplies `sign(λ) sqrt(|λ|)` to produce the frequencies compared against the cutoff.
    #[serde(default = "self::defaults::settings::frequency_unit_factor")]
    pub frequency_unit_factor: f64,
    /// Bands at or below this frequency get an interaction strength of zero.
    #[serde(default = "self::defaults::settings::cutoff_frequency")]
    pub cutoff_frequency: f64,
    /// Average the Fourier interpolation over both anchoring conventions.
    #[serde(default)]
    pub symmetrize_fc3_q: bool,
    #[serde(default)]
    pub r2q_convention: R2qConvention,
    #[serde(default)]
    pub transform: TransformPath,
    /// Forwarded to the phonon solver.
    #[serde(default)]
    pub uplo: Uplo,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            threading: Default::default(),
            frequency_unit_factor: self::defaults::settings::frequency_unit_factor(),
            cutoff_frequency: self::defaults::settings::cutoff_frequency(),
            symmetrize_fc3_q: false,
            r2q_convention: Default::default(),
            transform: Default::default(),
            uplo: Default::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(s: &str) -> FailResult<Settings> {
        let settings: Settings = serde_yaml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> FailResult<()> {
        ensure!(
            self.frequency_unit_factor.is_finite() && self.frequency_unit_factor > 0.0,
            "frequency-unit-factor must be positive and finite (got {})", self.frequency_unit_factor,
        );
        ensure!(
            self.cutoff_frequency.is_finite(),
            "cutoff-frequency must be finite (got {})", self.cutoff_frequency,
        );
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Threading {
    /// One triplet at a time, stopping at the first failure.
    Serial,
    /// Triplets in parallel on the global rayon pool.
    Rayon,
}

impl Default for Threading {
    fn default() -> Self { Threading::Serial }
}

/// How the reciprocal tensor is evaluated.  Both give the same result.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TransformPath {
    /// Sum each primitive atom triple directly over the supercell.
    Blockwise,
    /// Sum the middle leg into an intermediate tensor first.
    Staged,
}

impl Default for TransformPath {
    fn default() -> Self { TransformPath::Blockwise }
}

/// Which triangle of the Hermitian dynamical matrix the solver should read.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Uplo {
    Lower,
    Upper,
}

impl Default for Uplo {
    fn default() -> Self { Uplo::Lower }
}

impl Uplo {
    /// The LAPACK character flag.
    pub fn from_char(c: char) -> Option<Uplo> {
        match c {
            'L' | 'l' => Some(Uplo::Lower),
            'U' | 'u' => Some(Uplo::Upper),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Uplo::Lower => 'L',
            Uplo::Upper => 'U',
        }
    }
}

mod defaults {
    pub(crate) mod settings {
        pub(crate) fn frequency_unit_factor() -> f64 { 1.0 }
        pub(crate) fn cutoff_frequency() -> f64 { 1e-4 }
    }
}
