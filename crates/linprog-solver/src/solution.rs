use crate::problem::LpProblem;
use crate::tableau::Tableau;

/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Values for each decision variable (empty when unbounded or infeasible)
    pub values: Vec<f64>,
    /// Objective recomputed from the original coefficients
    pub objective_value: f64,
    /// Left-hand side `a·x` of each original constraint
    pub activities: Vec<f64>,
    /// False unless the final tableau passed the optimality test
    pub verified_optimal: bool,
    /// Number of pivots performed across both phases
    pub iterations: usize,
    /// Tableau after construction and after every pivot
    pub snapshots: Vec<TableauSnapshot>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// The iteration cap was reached before the optimality test passed
    IterationLimit,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Searching for a feasible basis with artificial variables
    One,
    /// Optimizing the real objective
    Two,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TableauSnapshot {
    pub iteration: usize,
    pub phase: Phase,
    pub tableau: Tableau,
}

impl Solution {
    /// Reads variable values from a final tableau.
    ///
    /// A decision column counts as basic only when it is a unit vector and is
    /// the recorded basic variable of the row holding its 1; its value is then
    /// that row's right-hand side. Ambiguous columns, and duplicates of a basic
    /// column, are treated as non-basic. The objective is evaluated from the
    /// original coefficients, never from the tableau accumulator.
    pub fn extract(problem: &LpProblem, tableau: &Tableau, tolerance: f64) -> Self {
        let values: Vec<f64> = (0..problem.num_variables())
            .map(|j| match tableau.unit_row(j, tolerance) {
                Some(row) if tableau.basis()[row] == j => tableau.rhs()[row],
                _ => 0.0,
            })
            .collect();

        let objective_value = problem.objective_value(&values);

        let activities = problem.constraints.iter().map(|c| c.activity(&values)).collect();

        Self {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            activities,
            verified_optimal: true,
            iterations: 0,
            snapshots: Vec::new(),
        }
    }

    pub fn unbounded(minimize: bool) -> Self {
        let objective_value = if minimize { f64::NEG_INFINITY } else { f64::INFINITY };
        Self::without_values(SolutionStatus::Unbounded, objective_value)
    }

    pub fn infeasible() -> Self {
        Self::without_values(SolutionStatus::Infeasible, f64::NAN)
    }

    /// Iteration cap hit before Phase 1 reached a feasible basis
    pub fn no_feasible_basis() -> Self {
        Self::without_values(SolutionStatus::IterationLimit, f64::NAN)
    }

    fn without_values(status: SolutionStatus, objective_value: f64) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value,
            activities: Vec::new(),
            verified_optimal: false,
            iterations: 0,
            snapshots: Vec::new(),
        }
    }

    /// Final tableau, if snapshots were recorded
    pub fn final_tableau(&self) -> Option<&Tableau> {
        self.snapshots.last().map(|s| &s.tableau)
    }
}
