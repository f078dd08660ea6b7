use crate::problem::{ConstraintOp, LpProblem};

/// A problem rewritten so that every row reads `a·x <= b`.
///
/// Right-hand sides may still be negative; [`CanonicalForm::is_canonical`]
/// tells whether a feasibility step is needed before pivoting.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalForm {
    pub variables: Vec<String>,
    /// Objective coefficients as given in the problem
    pub objective: Vec<f64>,
    pub minimize: bool,
    pub row_names: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    pub rhs: Vec<f64>,
}

impl CanonicalForm {
    /// Rewrites `>=` rows as negated `<=` rows and splits `=` rows into a
    /// `<=` pair. Expects a validated problem.
    pub fn from_problem(problem: &LpProblem) -> Self {
        let mut row_names = Vec::new();
        let mut matrix = Vec::new();
        let mut rhs = Vec::new();

        for c in &problem.constraints {
            let negated: Vec<f64> = c.coefficients.iter().map(|a| -a).collect();
            match c.op {
                ConstraintOp::Le => {
                    row_names.push(c.name.clone());
                    matrix.push(c.coefficients.clone());
                    rhs.push(c.rhs);
                }
                ConstraintOp::Ge => {
                    row_names.push(c.name.clone());
                    matrix.push(negated);
                    rhs.push(-c.rhs);
                }
                ConstraintOp::Eq => {
                    row_names.push(c.name.clone());
                    matrix.push(c.coefficients.clone());
                    rhs.push(c.rhs);
                    row_names.push(format!("{}'", c.name));
                    matrix.push(negated);
                    rhs.push(-c.rhs);
                }
            }
        }

        Self {
            variables: problem.variables.clone(),
            objective: problem.objective.coefficients.clone(),
            minimize: problem.objective.minimize,
            row_names,
            matrix,
            rhs,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rhs.len()
    }

    /// True when every right-hand side is nonnegative
    pub fn is_canonical(&self) -> bool {
        self.rhs.iter().all(|&b| b >= 0.0)
    }

    /// Objective the tableau maximizes: `c` for maximization, `-c` otherwise
    pub fn internal_objective(&self) -> Vec<f64> {
        if self.minimize {
            self.objective.iter().map(|c| -c).collect()
        } else {
            self.objective.clone()
        }
    }

    /// Flips every row with a negative right-hand side so that `b >= 0`.
    ///
    /// This only repairs signs: a flipped row describes a different half-space,
    /// so the result is not equivalent to the original problem in general.
    /// Returns the indices of the flipped rows.
    pub fn flip_negative_rows(&mut self) -> Vec<usize> {
        let mut flipped = Vec::new();
        for (i, (row, b)) in self.matrix.iter_mut().zip(self.rhs.iter_mut()).enumerate() {
            if *b < 0.0 {
                *b = -*b;
                for a in row.iter_mut() {
                    *a = -*a;
                }
                flipped.push(i);
            }
        }
        if !flipped.is_empty() {
            log::warn!("sign flip applied to rows {:?}; the feasible region may have changed", flipped);
        }
        flipped
    }
}
