use thiserror::Error;

use crate::pivot::{entering_column, leaving_row, PivotError};
use crate::problem::{LpProblem, ProblemError, DEFAULT_MAX_DIMENSION};
use crate::solution::{Phase, Solution, SolutionStatus, TableauSnapshot};
use crate::standard::CanonicalForm;
use crate::tableau::Tableau;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] ProblemError),
    #[error(transparent)]
    DegeneratePivot(#[from] PivotError),
}

/// How a canonical form with negative right-hand sides is made pivotable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeasibilityMode {
    /// Negate offending rows. Cheap, but may solve a different problem.
    SignFlip,
    /// Artificial-variable Phase 1
    #[default]
    PhaseOne,
}

/// Simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Largest accepted variable or constraint count
    max_dimension: usize,
    feasibility: FeasibilityMode,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
            max_dimension: DEFAULT_MAX_DIMENSION,
            feasibility: FeasibilityMode::default(),
        }
    }
}

enum SimplexResult {
    Optimal,
    Unbounded,
    IterationLimit,
}

/// Pivot count and snapshots shared by both phases
#[derive(Default)]
struct Run {
    iterations: usize,
    snapshots: Vec<TableauSnapshot>,
}

impl Run {
    fn record(&mut self, phase: Phase, tableau: &Tableau) {
        self.snapshots.push(TableauSnapshot {
            iteration: self.iterations,
            phase,
            tableau: tableau.clone(),
        });
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_max_dimension(mut self, max: usize) -> Self {
        self.max_dimension = max;
        self
    }

    pub fn with_feasibility(mut self, mode: FeasibilityMode) -> Self {
        self.feasibility = mode;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    /// Solve the LP problem with the tableau simplex method
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ProblemError::InvalidTolerance(self.tolerance).into());
        }
        problem.validate(self.max_dimension)?;

        let mut form = CanonicalForm::from_problem(problem);
        let mut run = Run::default();

        let mut tableau = if form.is_canonical() {
            Tableau::from_canonical(&form)
        } else {
            match self.feasibility {
                FeasibilityMode::SignFlip => {
                    form.flip_negative_rows();
                    Tableau::from_canonical(&form)
                }
                FeasibilityMode::PhaseOne => {
                    let mut tableau = Tableau::with_artificials(&form);
                    if let Some(status) = self.phase1(&mut tableau, &mut run)? {
                        return Ok(self.finish(problem, &tableau, status, Phase::One, run));
                    }
                    tableau.set_objective(&form.internal_objective());
                    tableau
                }
            }
        };

        // Phase 2: Optimize
        run.record(Phase::Two, &tableau);
        let status = match self.iterate(&mut tableau, Phase::Two, &mut run)? {
            SimplexResult::Optimal => SolutionStatus::Optimal,
            SimplexResult::Unbounded => SolutionStatus::Unbounded,
            SimplexResult::IterationLimit => SolutionStatus::IterationLimit,
        };

        Ok(self.finish(problem, &tableau, status, Phase::Two, run))
    }

    /// Drives the artificial variables to zero.
    ///
    /// Returns a terminal status when the problem is infeasible or the
    /// iteration cap was hit, `None` when Phase 2 can start.
    fn phase1(&self, tableau: &mut Tableau, run: &mut Run) -> Result<Option<SolutionStatus>, SolveError> {
        run.record(Phase::One, tableau);

        match self.iterate(tableau, Phase::One, run)? {
            SimplexResult::Optimal => {}
            // Phase 1 is bounded below by zero
            SimplexResult::Unbounded => return Ok(Some(SolutionStatus::Infeasible)),
            SimplexResult::IterationLimit => return Ok(Some(SolutionStatus::IterationLimit)),
        }

        let residual = tableau.artificial_infeasibility();
        if residual > self.tolerance {
            log::info!("phase 1 ended with artificial residual {:e}; problem is infeasible", residual);
            return Ok(Some(SolutionStatus::Infeasible));
        }

        self.drive_out_artificials(tableau, run)?;
        Ok(None)
    }

    /// Pivots zero-valued artificials out of the basis where some real column
    /// can replace them. Rows with no such column are redundant and keep
    /// their artificial.
    fn drive_out_artificials(&self, tableau: &mut Tableau, run: &mut Run) -> Result<(), SolveError> {
        let first_artificial = tableau.artificial_columns().start;

        for row in 0..tableau.num_rows() {
            if !tableau.is_artificial(tableau.basis()[row]) {
                continue;
            }
            let replacement = (0..first_artificial).find(|&j| tableau.rows()[row][j].abs() > self.tolerance);
            match replacement {
                Some(col) => {
                    log::debug!("driving {} out of row {} with {}", tableau.column_label(tableau.basis()[row]), row, tableau.column_label(col));
                    tableau.pivot(row, col, self.tolerance)?;
                    run.iterations += 1;
                    run.record(Phase::One, tableau);
                }
                None => log::debug!("row {} is redundant", row),
            }
        }

        Ok(())
    }

    fn iterate(&self, tableau: &mut Tableau, phase: Phase, run: &mut Run) -> Result<SimplexResult, SolveError> {
        loop {
            let Some(pivot_col) = entering_column(tableau, self.tolerance) else {
                return Ok(SimplexResult::Optimal);
            };
            if run.iterations >= self.max_iterations {
                log::warn!("iteration limit of {} reached; result is not verified optimal", self.max_iterations);
                return Ok(SimplexResult::IterationLimit);
            }
            let Some(pivot_row) = leaving_row(tableau, pivot_col, self.tolerance) else {
                log::debug!("column {} has no leaving row", tableau.column_label(pivot_col));
                return Ok(SimplexResult::Unbounded);
            };

            log::debug!(
                "{:?} iteration {}: {} enters, {} leaves",
                phase,
                run.iterations + 1,
                tableau.column_label(pivot_col),
                tableau.column_label(tableau.basis()[pivot_row])
            );
            tableau.pivot(pivot_row, pivot_col, self.tolerance)?;
            run.iterations += 1;
            run.record(phase, tableau);
        }
    }

    /// Builds the result from the tableau the run stopped on.
    ///
    /// A Phase 1 tableau still carries artificials, so its basic point may
    /// violate the user's constraints and yields no values.
    fn finish(&self, problem: &LpProblem, tableau: &Tableau, status: SolutionStatus, phase: Phase, run: Run) -> Solution {
        let mut solution = match status {
            SolutionStatus::Optimal => Solution::extract(problem, tableau, self.tolerance),
            SolutionStatus::IterationLimit if phase == Phase::One => Solution::no_feasible_basis(),
            SolutionStatus::IterationLimit => {
                let mut solution = Solution::extract(problem, tableau, self.tolerance);
                solution.status = SolutionStatus::IterationLimit;
                solution.verified_optimal = false;
                solution
            }
            SolutionStatus::Unbounded => Solution::unbounded(problem.objective.minimize),
            SolutionStatus::Infeasible => Solution::infeasible(),
        };

        log::info!("solver finished: {:?} after {} iterations", status, run.iterations);
        solution.iterations = run.iterations;
        solution.snapshots = run.snapshots;
        solution
    }
}
