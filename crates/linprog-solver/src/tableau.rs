use crate::standard::CanonicalForm;

/// Dense simplex tableau.
///
/// Columns are laid out as decision variables, then one slack per row, then
/// any artificial columns added for Phase 1. The reduced-cost row follows the
/// internal maximization convention: a negative entry marks an improving
/// column. The accumulator `objective` gains `cost * rhs` on every pivot, so
/// it tracks the negated internal objective.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    pub(crate) rows: Vec<Vec<f64>>,
    pub(crate) rhs: Vec<f64>,
    pub(crate) costs: Vec<f64>,
    pub(crate) objective: f64,
    pub(crate) basis: Vec<usize>,
    pub(crate) n_vars: usize,
    pub(crate) n_slack: usize,
    pub(crate) n_artificial: usize,
}

impl Tableau {
    /// Builds the initial tableau with an identity slack block.
    ///
    /// Every slack starts basic, which is a feasible basis only when all
    /// right-hand sides are nonnegative.
    pub fn from_canonical(form: &CanonicalForm) -> Self {
        let n = form.num_variables();
        let m = form.num_rows();
        let cols = n + m;

        let mut rows = vec![vec![0.0; cols]; m];
        for (i, row) in rows.iter_mut().enumerate() {
            row[..n].copy_from_slice(&form.matrix[i]);
            row[n + i] = 1.0;
        }

        let mut costs = vec![0.0; cols];
        for (j, c) in form.internal_objective().into_iter().enumerate() {
            costs[j] = -c;
        }

        Self {
            rows,
            rhs: form.rhs.clone(),
            costs,
            objective: 0.0,
            basis: (n..n + m).collect(),
            n_vars: n,
            n_slack: m,
            n_artificial: 0,
        }
    }

    /// Builds a Phase 1 tableau.
    ///
    /// Rows with a negative right-hand side are negated, which turns their
    /// slack into a surplus, and get an artificial column that starts basic.
    /// The reduced-cost row maximizes the negated sum of artificials and is
    /// already priced out against the starting basis.
    pub fn with_artificials(form: &CanonicalForm) -> Self {
        let n = form.num_variables();
        let m = form.num_rows();
        let negative: Vec<usize> = (0..m).filter(|&i| form.rhs[i] < 0.0).collect();
        let k = negative.len();
        let cols = n + m + k;

        let mut rows = vec![vec![0.0; cols]; m];
        let mut rhs = form.rhs.clone();
        let mut basis: Vec<usize> = (n..n + m).collect();

        for (i, row) in rows.iter_mut().enumerate() {
            row[..n].copy_from_slice(&form.matrix[i]);
            row[n + i] = 1.0;
        }

        for (a, &i) in negative.iter().enumerate() {
            for entry in rows[i].iter_mut() {
                *entry = -*entry;
            }
            rhs[i] = -rhs[i];
            let col = n + m + a;
            rows[i][col] = 1.0;
            basis[i] = col;
        }

        let mut tableau = Self {
            rows,
            rhs,
            costs: vec![0.0; cols],
            objective: 0.0,
            basis,
            n_vars: n,
            n_slack: m,
            n_artificial: k,
        };

        for col in tableau.artificial_columns() {
            tableau.costs[col] = 1.0;
        }
        tableau.price_out_basis();
        tableau
    }

    /// Replaces the reduced-cost row with `-objective` and prices out the
    /// current basis, resetting the accumulator.
    pub fn set_objective(&mut self, internal_objective: &[f64]) {
        self.costs = vec![0.0; self.num_columns()];
        for (j, &c) in internal_objective.iter().enumerate() {
            self.costs[j] = -c;
        }
        self.objective = 0.0;
        self.price_out_basis();
    }

    fn price_out_basis(&mut self) {
        for i in 0..self.rows.len() {
            let factor = self.costs[self.basis[i]];
            if factor == 0.0 {
                continue;
            }
            for (cost, a) in self.costs.iter_mut().zip(&self.rows[i]) {
                *cost -= factor * a;
            }
            self.objective += factor * self.rhs[i];
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.n_vars + self.n_slack + self.n_artificial
    }

    pub fn num_variables(&self) -> usize {
        self.n_vars
    }

    pub fn num_artificial(&self) -> usize {
        self.n_artificial
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Running accumulator (negated internal objective)
    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        col >= self.n_vars + self.n_slack
    }

    pub fn artificial_columns(&self) -> std::ops::Range<usize> {
        let start = self.n_vars + self.n_slack;
        start..start + self.n_artificial
    }

    /// `x1..xn`, `s1..sm`, `a1..ak`
    pub fn column_label(&self, col: usize) -> String {
        if col < self.n_vars {
            format!("x{}", col + 1)
        } else if col < self.n_vars + self.n_slack {
            format!("s{}", col - self.n_vars + 1)
        } else {
            format!("a{}", col - self.n_vars - self.n_slack + 1)
        }
    }

    pub fn basis_labels(&self) -> Vec<String> {
        self.basis.iter().map(|&col| self.column_label(col)).collect()
    }

    /// Sum of the values of artificial variables still in the basis
    pub fn artificial_infeasibility(&self) -> f64 {
        self.basis
            .iter()
            .zip(&self.rhs)
            .filter(|&(&col, _)| self.is_artificial(col))
            .map(|(_, b)| b.abs())
            .sum()
    }

    /// Returns the row holding the single 1 of column `col` when the column is
    /// a unit vector within `tolerance`.
    ///
    /// A column with several entries near 1 is not a unit vector.
    pub fn unit_row(&self, col: usize, tolerance: f64) -> Option<usize> {
        let mut found = None;
        for (i, row) in self.rows.iter().enumerate() {
            let a = row[col];
            if (a - 1.0).abs() < tolerance {
                if found.is_some() {
                    return None;
                }
                found = Some(i);
            } else if a.abs() > tolerance {
                return None;
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ConstraintOp, LpProblem};

    fn textbook() -> CanonicalForm {
        let mut problem = LpProblem::with_variable_count(2);
        problem.set_objective(vec![3.0, 5.0], false);
        problem.add_constraint("c1", vec![1.0, 0.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("c2", vec![0.0, 2.0], ConstraintOp::Le, 12.0);
        problem.add_constraint("c3", vec![3.0, 2.0], ConstraintOp::Le, 18.0);
        CanonicalForm::from_problem(&problem)
    }

    #[test]
    fn test_initial_tableau() {
        let tableau = Tableau::from_canonical(&textbook());

        assert_eq!(tableau.num_rows(), 3);
        assert_eq!(tableau.num_columns(), 5);
        assert_eq!(tableau.rows()[2], vec![3.0, 2.0, 0.0, 0.0, 1.0]);
        assert_eq!(tableau.costs(), &[-3.0, -5.0, 0.0, 0.0, 0.0]);
        assert_eq!(tableau.rhs(), &[4.0, 12.0, 18.0]);
        assert_eq!(tableau.basis_labels(), vec!["s1", "s2", "s3"]);
        assert_eq!(tableau.objective(), 0.0);
        for i in 0..3 {
            assert_eq!(tableau.unit_row(2 + i, 1e-6), Some(i));
        }
    }

    #[test]
    fn test_minimize_negates_costs() {
        let mut form = textbook();
        form.minimize = true;
        let tableau = Tableau::from_canonical(&form);
        assert_eq!(&tableau.costs()[..2], &[3.0, 5.0]);
    }

    #[test]
    fn test_phase_one_setup() {
        let mut problem = LpProblem::with_variable_count(2);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        let tableau = Tableau::with_artificials(&CanonicalForm::from_problem(&problem));

        assert_eq!(tableau.num_columns(), 5);
        assert_eq!(tableau.num_artificial(), 1);
        assert_eq!(tableau.rows()[0], vec![1.0, 1.0, -1.0, 0.0, 1.0]);
        assert_eq!(tableau.rhs(), &[4.0, 3.0]);
        assert_eq!(tableau.basis_labels(), vec!["a1", "s2"]);
        // priced out: artificial cost is zero, decision columns improve
        assert_eq!(tableau.costs(), &[-1.0, -1.0, 1.0, 0.0, 0.0]);
        assert_eq!(tableau.objective(), 4.0);
        assert_eq!(tableau.artificial_infeasibility(), 4.0);
    }

    #[test]
    fn test_unit_row_rejects_duplicate_ones() {
        let mut tableau = Tableau::from_canonical(&textbook());
        tableau.rows[0][0] = 1.0;
        tableau.rows[2][0] = 1.0;
        tableau.rows[1][0] = 0.0;
        assert_eq!(tableau.unit_row(0, 1e-6), None);
    }
}
