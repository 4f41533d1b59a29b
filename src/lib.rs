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

//! Three-phonon interaction strengths from real-space force constants.
//!
//! Everything lives in [`rsp2_phonon3`]; this crate only gathers it up and hosts the
//! integration tests.

pub use rsp2_phonon3::*;
