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

//! Small fixed-size numeric types.

use rsp2_assert_close::{CheckClose, CheckCloseError, Tolerances};
use num_traits::Zero;
use std::fmt;
use std::ops::{Add, Sub, Neg, Mul, Index};

pub type C64 = num_complex::Complex64;

/// A dense 3x3 matrix, stored as rows.
pub type M33 = [[f64; 3]; 3];

/// Cartesian axes, for naming the indices of blocks.
pub const AXES: [usize; 3] = [0, 1, 2];

// ---------------------------------------------------------------------------

/// A 3-dimensional vector.  Fractional or Cartesian depending on context.
#[derive(Copy, Clone, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct V3(pub [f64; 3]);

impl V3 {
    #[inline]
    pub fn zero() -> V3 { V3([0.0; 3]) }

    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize) -> f64) -> V3 { V3([f(0), f(1), f(2)]) }

    #[inline]
    pub fn dot(&self, other: &V3) -> f64
    { self.0[0] * other.0[0] + self.0[1] * other.0[1] + self.0[2] * other.0[2] }

    #[inline]
    pub fn sqnorm(&self) -> f64 { self.dot(self) }

    #[inline]
    pub fn norm(&self) -> f64 { self.sqnorm().sqrt() }

    #[inline]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> V3 { V3::from_fn(|i| f(self.0[i])) }

    /// Row-vector times matrix.  (i.e. fractional coords times lattice rows gives carts)
    #[inline]
    pub fn mat_mul(&self, m: &M33) -> V3
    { V3::from_fn(|c| AXES.iter().map(|&r| self.0[r] * m[r][c]).sum()) }
}

impl fmt::Debug for V3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(&self.0, f) }
}

impl Index<usize> for V3 {
    type Output = f64;

    #[inline]
    fn index(&self, i: usize) -> &f64 { &self.0[i] }
}

impl Add for V3 {
    type Output = V3;

    #[inline]
    fn add(self, other: V3) -> V3 { V3::from_fn(|i| self.0[i] + other.0[i]) }
}

impl Sub for V3 {
    type Output = V3;

    #[inline]
    fn sub(self, other: V3) -> V3 { V3::from_fn(|i| self.0[i] - other.0[i]) }
}

impl Neg for V3 {
    type Output = V3;

    #[inline]
    fn neg(self) -> V3 { self.map(|x| -x) }
}

impl Mul<f64> for V3 {
    type Output = V3;

    #[inline]
    fn mul(self, s: f64) -> V3 { self.map(|x| x * s) }
}

impl CheckClose for V3 {
    type Scalar = f64;

    fn check_close(&self, other: &V3, tol: Tolerances) -> Result<(), CheckCloseError<f64>>
    { self.0.check_close(&other.0, tol) }
}

/// Determinant of a 3x3 matrix.
pub fn det(m: &M33) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Inverse of a 3x3 matrix, or `None` if it is singular.
pub fn inv(m: &M33) -> Option<M33> {
    let det = det(m);
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    // transposed cofactors
    let cof = |r: usize, c: usize| {
        let (r1, r2) = ((r + 1) % 3, (r + 2) % 3);
        let (c1, c2) = ((c + 1) % 3, (c + 2) % 3);
        m[r1][c1] * m[r2][c2] - m[r1][c2] * m[r2][c1]
    };
    let mut out = [[0.0; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            out[r][c] = cof(c, r) / det;
        }
    }
    Some(out)
}

// ---------------------------------------------------------------------------

/// A 3x3x3 block of a third-order tensor, indexed by the Cartesian axes of the three legs.
#[derive(Copy, Clone, PartialEq, Default)]
pub struct Block333<X>(pub [[[X; 3]; 3]; 3]);

/// One atom triple's worth of real-space third-order force constants.
pub type RealBlock = Block333<f64>;

/// One atom triple's worth of reciprocal-space third-order force constants.
pub type ComplexBlock = Block333<C64>;

impl<X: Copy> Block333<X> {
    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize, usize, usize) -> X) -> Self {
        let mut out = [[[f(0, 0, 0); 3]; 3]; 3];
        for (a, b, c) in iproduct!(AXES.iter(), AXES.iter(), AXES.iter()) {
            out[*a][*b][*c] = f(*a, *b, *c);
        }
        Block333(out)
    }

    /// Element for axis `a` of leg 0, axis `b` of leg 1, axis `c` of leg 2.
    #[inline]
    pub fn get(&self, a: usize, b: usize, c: usize) -> X { self.0[a][b][c] }

    #[inline]
    pub fn get_mut(&mut self, a: usize, b: usize, c: usize) -> &mut X { &mut self.0[a][b][c] }

    /// Flat row-major view, `[a][b][c]`.
    #[inline]
    pub fn to_flat(&self) -> [X; 27] {
        let mut out = [self.0[0][0][0]; 27];
        for (a, b, c) in iproduct!(0..3, 0..3, 0..3) {
            out[9 * a + 3 * b + c] = self.0[a][b][c];
        }
        out
    }

    #[inline]
    pub fn from_flat(flat: &[X; 27]) -> Self { Block333::from_fn(|a, b, c| flat[9 * a + 3 * b + c]) }

    #[inline]
    pub fn map<Y: Copy>(&self, mut f: impl FnMut(X) -> Y) -> Block333<Y>
    { Block333::from_fn(|a, b, c| f(self.0[a][b][c])) }
}

impl<X: fmt::Debug> fmt::Debug for Block333<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(&self.0, f) }
}

impl RealBlock {
    #[inline]
    pub fn zero() -> Self { Block333([[[0.0; 3]; 3]; 3]) }

    pub fn is_zero(&self) -> bool { self.to_flat().iter().all(|&x| x == 0.0) }
}

impl ComplexBlock {
    #[inline]
    pub fn zero() -> Self { Block333([[[C64::zero(); 3]; 3]; 3]) }

    /// `self += phase * real`
    #[inline]
    pub fn add_phased(&mut self, real: &RealBlock, phase: C64) {
        for (a, b, c) in iproduct!(0..3, 0..3, 0..3) {
            self.0[a][b][c] += phase * real.0[a][b][c];
        }
    }

    /// `self += phase * other`
    #[inline]
    pub fn add_phased_complex(&mut self, other: &ComplexBlock, phase: C64) {
        for (a, b, c) in iproduct!(0..3, 0..3, 0..3) {
            self.0[a][b][c] += phase * other.0[a][b][c];
        }
    }

    /// Elementwise mean of two blocks.
    #[inline]
    pub fn mean(&self, other: &ComplexBlock) -> ComplexBlock
    { Block333::from_fn(|a, b, c| (self.0[a][b][c] + other.0[a][b][c]) * 0.5) }
}

impl<X: Copy + CheckClose> CheckClose for Block333<X> {
    type Scalar = X::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<X::Scalar>>
    { self.to_flat()[..].check_close(&other.to_flat()[..], tol) }
}
