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

#[macro_use]
extern crate failure;

use num_complex::Complex64;
use std::fmt;

pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

/// Assert that two values are close, according to `CheckClose`.
///
/// ```ignore
/// assert_close!(a, b);
/// assert_close!(abs=1e-12, a, b);
/// assert_close!(rel=1e-8, abs=1e-12, a, b, "at band {}", band);
/// ```
///
/// The default is a relative tolerance of `DEFAULT_NONZERO_TOL` and no absolute
/// tolerance, which is useless for values that should be zero.
#[macro_export]
macro_rules! assert_close {
    (@go [$rel:expr, $abs:expr] $a:expr, $b:expr $(,)*) => {
        $crate::assert_close!(@go [$rel, $abs] $a, $b, "not nearly equal!")
    };
    (@go [$rel:expr, $abs:expr] $a:expr, $b:expr, $($fmt:tt)+) => {{
        let tol = $crate::Tolerances { rel: $rel, abs: $abs };
        match $crate::CheckClose::check_close(&$a, &$b, tol) {
            Ok(()) => {},
            Err(e) => panic!(
                "{} (tolerances: rel={}, abs={})\n{}",
                format!($($fmt)+), tol.rel, tol.abs, e,
            ),
        }
    }};
    (rel=$rel:expr, abs=$abs:expr, $($rest:tt)+) => {
        $crate::assert_close!(@go [$rel, $abs] $($rest)+)
    };
    (abs=$abs:expr, rel=$rel:expr, $($rest:tt)+) => {
        $crate::assert_close!(@go [$rel, $abs] $($rest)+)
    };
    (rel=$rel:expr, $($rest:tt)+) => {
        $crate::assert_close!(@go [$rel, 0.0] $($rest)+)
    };
    (abs=$abs:expr, $($rest:tt)+) => {
        $crate::assert_close!(@go [$crate::DEFAULT_NONZERO_TOL, $abs] $($rest)+)
    };
    ($($rest:tt)+) => {
        $crate::assert_close!(@go [$crate::DEFAULT_NONZERO_TOL, 0.0] $($rest)+)
    };
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

/// Python's `math.isclose`, applied to the magnitude of the difference.
#[inline]
pub fn is_close_by_magnitude(diff: f64, a_mag: f64, b_mag: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);
    diff < abs.max(rel * a_mag).max(rel * b_mag)
}

#[inline]
pub fn is_close(a: f64, b: f64, tol: Tolerances) -> bool {
    // catch infinities of same sign
    if a == b { return true; }

    // catch infinities of opposite sign, avoiding infinite relative tolerance
    if a.is_infinite() || b.is_infinite() { return false; }

    // NaN fails the comparison below
    is_close_by_magnitude((a - b).abs(), a.abs(), b.abs(), tol)
}

#[derive(Debug, Copy, Clone)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

#[derive(Debug, Fail)]
pub struct CheckCloseError<T: fmt::Debug + Send + Sync + 'static> {
    pub values: (T, T),
    pub tol: Tolerances,
}

impl<T: fmt::Debug + Send + Sync + 'static> fmt::Display for CheckCloseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ref left, ref right) = self.values;
        write!(f, "failed at:\n  left: {:?}\n right: {:?}\n   tol: {:?}", left, right, self.tol)
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    type Scalar: fmt::Debug + Send + Sync + 'static;

    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>;
}

impl CheckClose for f64 {
    type Scalar = f64;

    #[inline]
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError<f64>> {
        match is_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(CheckCloseError { values: (*self, *other), tol }),
        }
    }
}

// Complex numbers are compared by the modulus of their difference, so that a
// tiny imaginary part next to a large real part is not held to a relative
// tolerance of its own.
impl CheckClose for Complex64 {
    type Scalar = Complex64;

    #[inline]
    fn check_close(&self, other: &Complex64, tol: Tolerances) -> Result<(), CheckCloseError<Complex64>> {
        let ok = self == other || is_close_by_magnitude((self - other).norm(), self.norm(), other.norm(), tol);
        match ok {
            true => Ok(()),
            false => Err(CheckCloseError { values: (*self, *other), tol }),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { CheckClose::check_close(*self, *other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>> {
        assert_eq!(self.len(), other.len(), "length mismatch in check_close");
        self.iter().zip(other)
            .map(|(a, b)| a.check_close(b, tol))
            .collect()
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self[..].check_close(&other[..], tol) }
}

macro_rules! gen_array_impls {
    ($($n:tt)*) => {
        $(
        impl<T: CheckClose> CheckClose for [T; $n] {
            type Scalar = T::Scalar;

            fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
            { self[..].check_close(&other[..], tol) }
        }
        )*
    };
}

gen_array_impls! { 1 2 3 4 5 6 7 8 9 }
