mod dual;
mod pivot;
mod problem;
pub mod report;
mod simplex;
mod solution;
mod standard;
mod tableau;

pub use dual::DualProgram;
pub use pivot::{entering_column, leaving_row, PivotError};
pub use problem::{Constraint, ConstraintOp, LpProblem, Objective, ProblemError, DEFAULT_MAX_DIMENSION};
pub use simplex::{FeasibilityMode, SolveError, Solver};
pub use solution::{Phase, Solution, SolutionStatus, TableauSnapshot};
pub use standard::CanonicalForm;
pub use tableau::Tableau;
