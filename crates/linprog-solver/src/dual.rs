use crate::problem::{ConstraintOp, LpProblem};
use crate::standard::CanonicalForm;

/// Dual of a primal already rewritten with `<=` rows.
///
/// The constraint matrix is the transpose of the primal's, objective and
/// right-hand side trade places, and the direction is inverted. Every row
/// carries `relation`, which is `>=` when built from a canonical form.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DualProgram {
    pub minimize: bool,
    pub objective: Vec<f64>,
    pub matrix: Vec<Vec<f64>>,
    pub rhs: Vec<f64>,
    pub relation: ConstraintOp,
    /// Whether the primal had only nonnegative right-hand sides
    pub primal_canonical: bool,
}

impl DualProgram {
    pub fn from_canonical(primal: &CanonicalForm) -> Self {
        let mut dual = transpose_swap_invert(primal.minimize, &primal.objective, &primal.matrix, &primal.rhs);
        dual.primal_canonical = primal.is_canonical();
        dual
    }

    /// Applies the same structural transform to this program.
    ///
    /// Used to check that the construction is an involution on matrix,
    /// objective, right-hand side and direction.
    pub fn dual(&self) -> Self {
        let mut dual = transpose_swap_invert(self.minimize, &self.objective, &self.matrix, &self.rhs);
        dual.primal_canonical = self.rhs.iter().all(|&b| b >= 0.0);
        dual
    }

    /// Number of dual variables (one per primal row)
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.rhs.len()
    }

    /// Builds a solvable problem over `y1..ym` with nonnegative variables
    pub fn to_problem(&self) -> LpProblem {
        let mut problem = LpProblem::new((1..=self.num_variables()).map(|i| format!("y{}", i)).collect());
        problem.set_objective(self.objective.clone(), self.minimize);
        for (j, (row, &b)) in self.matrix.iter().zip(&self.rhs).enumerate() {
            problem.add_constraint(format!("d{}", j + 1), row.clone(), self.relation, b);
        }
        problem
    }
}

fn transpose_swap_invert(minimize: bool, objective: &[f64], matrix: &[Vec<f64>], rhs: &[f64]) -> DualProgram {
    let rows = matrix.len();
    let cols = objective.len();

    let transposed: Vec<Vec<f64>> = (0..cols)
        .map(|j| (0..rows).map(|i| matrix[i][j]).collect())
        .collect();

    DualProgram {
        minimize: !minimize,
        objective: rhs.to_vec(),
        matrix: transposed,
        rhs: objective.to_vec(),
        relation: ConstraintOp::Ge,
        primal_canonical: true,
    }
}
