#![allow(dead_code)]

use rsp2_anharmonic::{
    V3, C64, PeriodicImages, ShortestVectors, IndexMaps, SuperI, SecondOrderFcs,
    PhononSolver, SolverRequest, Eigensolution, Eigenvalues, Eigenvectors, FailResult,
};

pub fn init_logger() {
    let _ = env_logger::try_init();
}

/// A one-dimensional chain of `num_cells` cells along x, with `basis` holding the x
/// coordinate of each atom in the cell.  Lots of vacuum along y and z.
///
/// Supercell atom `cell * basis.len() + b` is atom `b` of cell `cell`.
pub fn chain(basis: &[f64], num_cells: usize) -> PeriodicImages {
    let num_basis = basis.len();
    let prim_lattice = [[1.0, 0.0, 0.0], [0.0, 20.0, 0.0], [0.0, 0.0, 20.0]];
    let super_lattice = [[num_cells as f64, 0.0, 0.0], [0.0, 20.0, 0.0], [0.0, 0.0, 20.0]];

    let mut fracs = vec![];
    for cell in 0..num_cells {
        for &x in basis {
            fracs.push(V3([(cell as f64 + x) / num_cells as f64, 0.0, 0.0]));
        }
    }
    let p2s: Vec<usize> = (0..num_basis).collect();
    // phonopy style: each atom maps to the supercell index of its representative
    let s2p: Vec<usize> = (0..fracs.len()).map(|s| s % num_basis).collect();

    let p2s_super: Vec<_> = p2s.iter().map(|&s| SuperI(s)).collect();
    let svecs = ShortestVectors::compute(&super_lattice, &prim_lattice, &fracs, &p2s_super, 1e-8).unwrap();
    let maps = IndexMaps::from_phonopy(&p2s, &s2p).unwrap();
    PeriodicImages::new(svecs, maps).unwrap()
}

pub fn zero_fc2(num_atoms: usize) -> SecondOrderFcs {
    SecondOrderFcs::from_flat(num_atoms, &vec![0.0; num_atoms * num_atoms * 9]).unwrap()
}

/// Same eigenvalues at every wavevector, with the standard basis as eigenvectors.
pub struct IdentitySolver {
    pub eigenvalues: Vec<f64>,
    pub fail_at: Option<V3>,
}

impl IdentitySolver {
    pub fn new(eigenvalues: Vec<f64>) -> Self { IdentitySolver { eigenvalues, fail_at: None } }
}

impl PhononSolver for IdentitySolver {
    fn eigensolve(&self, request: &SolverRequest<'_>) -> FailResult<Eigensolution> {
        if Some(request.qpoint) == self.fail_at {
            failure::bail!("zheev failed to converge");
        }
        let n = self.eigenvalues.len();
        let mut matrix = vec![C64::new(0.0, 0.0); n * n];
        for i in 0..n {
            matrix[i * n + i] = C64::new(1.0, 0.0);
        }
        Ok(Eigensolution {
            eigenvalues: Eigenvalues(self.eigenvalues.clone()),
            eigenvectors: Eigenvectors::from_row_major(n, &matrix)?,
        })
    }
}
