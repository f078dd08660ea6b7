use thiserror::Error;

use crate::tableau::Tableau;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PivotError {
    #[error("Degenerate pivot at row {row}, column {col}: value {value:e} is numerically zero")]
    Degenerate { row: usize, col: usize, value: f64 },
}

/// Dantzig's rule: the most negative reduced cost below `-tolerance`.
///
/// A later column only replaces the incumbent when it is lower by more than
/// `tolerance`, so ties go to the lowest index. Artificial columns never
/// enter. `None` means the tableau is optimal.
pub fn entering_column(tableau: &Tableau, tolerance: f64) -> Option<usize> {
    let mut min_val = 0.0;
    let mut min_col = None;

    for (j, &cost) in tableau.costs.iter().enumerate() {
        if tableau.is_artificial(j) {
            continue;
        }
        if cost < min_val - tolerance {
            min_val = cost;
            min_col = Some(j);
        }
    }

    min_col
}

/// Minimum-ratio test over rows whose entry in `col` exceeds `tolerance`.
///
/// Ties go to the lowest row index. `None` means the column is unbounded.
pub fn leaving_row(tableau: &Tableau, col: usize, tolerance: f64) -> Option<usize> {
    let mut min_ratio = f64::INFINITY;
    let mut min_row = None;

    for (i, row) in tableau.rows.iter().enumerate() {
        let val = row[col];
        if val > tolerance {
            let ratio = tableau.rhs[i] / val;
            if ratio < min_ratio - tolerance {
                min_ratio = ratio;
                min_row = Some(i);
            }
        }
    }

    min_row
}

impl Tableau {
    /// Gauss-Jordan step on `(row, col)`.
    ///
    /// Leaves the tableau untouched and reports [`PivotError::Degenerate`]
    /// when the pivot value is within `tolerance` of zero.
    pub fn pivot(&mut self, row: usize, col: usize, tolerance: f64) -> Result<(), PivotError> {
        let pivot_val = self.rows[row][col];
        if pivot_val.abs() < tolerance {
            return Err(PivotError::Degenerate { row, col, value: pivot_val });
        }

        // Scale pivot row
        for a in self.rows[row].iter_mut() {
            *a /= pivot_val;
        }
        self.rhs[row] /= pivot_val;
        self.rows[row][col] = 1.0;

        let pivot_row = self.rows[row].clone();
        let pivot_rhs = self.rhs[row];

        // Eliminate column in other rows
        for i in 0..self.rows.len() {
            if i == row {
                continue;
            }
            let factor = self.rows[i][col];
            if factor == 0.0 {
                continue;
            }
            for (a, p) in self.rows[i].iter_mut().zip(&pivot_row) {
                *a -= factor * p;
            }
            self.rows[i][col] = 0.0;
            self.rhs[i] -= factor * pivot_rhs;
        }

        let factor = self.costs[col];
        for (cost, p) in self.costs.iter_mut().zip(&pivot_row) {
            *cost -= factor * p;
        }
        self.costs[col] = 0.0;
        self.objective += factor * pivot_rhs;

        self.basis[row] = col;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ConstraintOp, LpProblem};
    use crate::standard::CanonicalForm;
    use proptest::prelude::*;

    const TOL: f64 = 1e-6;

    fn textbook() -> Tableau {
        let mut problem = LpProblem::with_variable_count(2);
        problem.set_objective(vec![3.0, 5.0], false);
        problem.add_constraint("c1", vec![1.0, 0.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("c2", vec![0.0, 2.0], ConstraintOp::Le, 12.0);
        problem.add_constraint("c3", vec![3.0, 2.0], ConstraintOp::Le, 18.0);
        Tableau::from_canonical(&CanonicalForm::from_problem(&problem))
    }

    #[test]
    fn test_entering_most_negative() {
        let tableau = textbook();
        assert_eq!(entering_column(&tableau, TOL), Some(1));
    }

    #[test]
    fn test_entering_tie_takes_first() {
        let mut tableau = textbook();
        tableau.costs = vec![-5.0, -5.0, 0.0, 0.0, 0.0];
        assert_eq!(entering_column(&tableau, TOL), Some(0));

        // within tolerance still counts as a tie
        tableau.costs = vec![-5.0, -5.0 - TOL / 2.0, 0.0, 0.0, 0.0];
        assert_eq!(entering_column(&tableau, TOL), Some(0));
    }

    #[test]
    fn test_entering_none_when_optimal() {
        let mut tableau = textbook();
        tableau.costs = vec![0.0, -TOL / 2.0, 1.5, 0.0, 1.0];
        assert_eq!(entering_column(&tableau, TOL), None);
    }

    #[test]
    fn test_entering_skips_artificials() {
        let mut problem = LpProblem::with_variable_count(1);
        problem.set_objective(vec![1.0], false);
        problem.add_constraint("low", vec![1.0], ConstraintOp::Ge, 2.0);
        let mut tableau = Tableau::with_artificials(&CanonicalForm::from_problem(&problem));
        tableau.costs = vec![0.0, 0.0, -3.0];
        assert_eq!(entering_column(&tableau, TOL), None);
    }

    #[test]
    fn test_ratio_test() {
        let tableau = textbook();
        // column x2: rows 1 (12/2 = 6) and 2 (18/2 = 9); row 0 has a zero entry
        assert_eq!(leaving_row(&tableau, 1, TOL), Some(1));
        // column x1: rows 0 (4/1) and 2 (18/3 = 6)
        assert_eq!(leaving_row(&tableau, 0, TOL), Some(0));
    }

    #[test]
    fn test_ratio_tie_takes_first() {
        let mut tableau = textbook();
        tableau.rhs = vec![4.0, 8.0, 8.0];
        assert_eq!(leaving_row(&tableau, 1, TOL), Some(1));
    }

    #[test]
    fn test_ratio_unbounded() {
        let mut tableau = textbook();
        for row in tableau.rows.iter_mut() {
            row[0] = -1.0;
        }
        assert_eq!(leaving_row(&tableau, 0, TOL), None);
    }

    #[test]
    fn test_pivot_step() {
        let mut tableau = textbook();
        tableau.pivot(1, 1, TOL).unwrap();

        assert_eq!(tableau.rows[1], vec![0.0, 1.0, 0.0, 0.5, 0.0]);
        assert_eq!(tableau.rhs, vec![4.0, 6.0, 6.0]);
        assert_eq!(tableau.rows[2], vec![3.0, 0.0, 0.0, -1.0, 1.0]);
        assert_eq!(tableau.costs, vec![-3.0, 0.0, 0.0, 2.5, 0.0]);
        assert_eq!(tableau.objective, -30.0);
        assert_eq!(tableau.basis_labels(), vec!["s1", "x2", "s3"]);
    }

    #[test]
    fn test_degenerate_pivot_is_reported() {
        let mut tableau = textbook();
        let before = tableau.clone();
        let err = tableau.pivot(0, 1, TOL).unwrap_err();
        assert_eq!(err, PivotError::Degenerate { row: 0, col: 1, value: 0.0 });
        assert_eq!(tableau, before);
    }

    fn random_tableau() -> impl Strategy<Value = (Tableau, usize, usize)> {
        (1usize..=4, 1usize..=4).prop_flat_map(|(n, m)| {
            (
                prop::collection::vec(prop::collection::vec(-9.0f64..9.0, n), m),
                prop::collection::vec(0.0f64..20.0, m),
                prop::collection::vec(-5.0f64..5.0, n),
                0..m,
                0..n,
            )
                .prop_filter_map("pivot entry too small", |(matrix, rhs, c, row, col)| {
                    if matrix[row][col].abs() < 0.1 {
                        return None;
                    }
                    let mut problem = LpProblem::with_variable_count(c.len());
                    problem.set_objective(c, false);
                    for (i, (a, b)) in matrix.into_iter().zip(rhs).enumerate() {
                        problem.add_constraint(format!("c{}", i + 1), a, ConstraintOp::Le, b);
                    }
                    let tableau = Tableau::from_canonical(&CanonicalForm::from_problem(&problem));
                    Some((tableau, row, col))
                })
        })
    }

    proptest! {
        #[test]
        fn pivot_makes_unit_column((tableau, row, col) in random_tableau()) {
            let mut after = tableau.clone();
            after.pivot(row, col, TOL).unwrap();

            prop_assert_eq!(after.unit_row(col, TOL), Some(row));
            prop_assert!(after.costs[col].abs() < TOL);

            // slack columns basic in other rows are untouched
            let n = tableau.num_variables();
            for i in 0..tableau.num_rows() {
                if i == row {
                    continue;
                }
                let slack = n + i;
                for r in 0..tableau.num_rows() {
                    prop_assert_eq!(after.rows[r][slack], tableau.rows[r][slack]);
                }
                prop_assert_eq!(after.unit_row(slack, TOL), Some(i));
            }
        }
    }
}
