//! Plain-text rendering of tableaux, solutions and dual programs.

use crate::dual::DualProgram;
use crate::problem::LpProblem;
use crate::solution::{Phase, Solution, SolutionStatus, TableauSnapshot};

const RULE: &str = "-------------------------------------------------------------";

/// Keeps `-0.0` from printing as `-0.00`
fn clean(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x }
}

fn iterations(count: usize) -> String {
    if count == 1 {
        "1 iteration".to_string()
    } else {
        format!("{} iterations", count)
    }
}

pub fn render_snapshot(snapshot: &TableauSnapshot) -> String {
    let tableau = &snapshot.tableau;
    let phase = match snapshot.phase {
        Phase::One => "phase 1",
        Phase::Two => "phase 2",
    };

    let mut out = format!("Simplex tableau, iteration {} ({})\n{}\n", snapshot.iteration, phase, RULE);

    out.push_str("Base\t|");
    for j in 0..tableau.num_columns() {
        out.push_str(&format!(" {}\t", tableau.column_label(j)));
    }
    out.push_str(&format!("|  b\n{}\n", RULE));

    for (i, label) in tableau.basis_labels().iter().enumerate() {
        out.push_str(&format!("{}\t|", label));
        for a in &tableau.rows()[i] {
            out.push_str(&format!(" {:.2}\t", clean(*a)));
        }
        out.push_str(&format!("| {:.2}\n", clean(tableau.rhs()[i])));
    }
    out.push_str(RULE);

    out.push_str("\nZ\t|");
    for c in tableau.costs() {
        out.push_str(&format!(" {:.2}\t", clean(*c)));
    }
    out.push_str(&format!("| {:.2}\n{}\n", clean(tableau.objective()), RULE));

    out
}

pub fn render_solution(problem: &LpProblem, solution: &Solution) -> String {
    let mut out = String::from("=== Final result ===\n");

    match solution.status {
        SolutionStatus::Unbounded => {
            out.push_str("Status: UNBOUNDED\n");
            out.push_str("The problem has no finite optimal solution.\n");
            return out;
        }
        SolutionStatus::Infeasible => {
            out.push_str("Status: INFEASIBLE\n");
            out.push_str("No solution exists that satisfies all constraints.\n");
            return out;
        }
        SolutionStatus::Optimal => {
            out.push_str(&format!("Status: OPTIMAL ({})\n", iterations(solution.iterations)));
        }
        SolutionStatus::IterationLimit => {
            out.push_str(&format!("Status: ITERATION LIMIT ({})\n", iterations(solution.iterations)));
            if solution.values.is_empty() {
                out.push_str("No feasible basis was found before the limit.\n");
                return out;
            }
            out.push_str("Warning: the result below is not verified optimal.\n");
        }
    }

    for (name, value) in problem.variables.iter().zip(&solution.values) {
        out.push_str(&format!("{} = {:.4}\n", name, clean(*value)));
    }
    out.push_str(&format!("Z = {:.4}\n", solution.objective_value));

    if !solution.activities.is_empty() {
        out.push_str("\nConstraints:\n");
        for (c, lhs) in problem.constraints.iter().zip(&solution.activities) {
            out.push_str(&format!("  {:10} {:10.4} {} {:.4}\n", c.name, lhs, c.op, c.rhs));
        }
    }

    out
}

/// One `coef*yk` term per entry; every term after the first that is
/// nonnegative gets a leading `+`.
fn render_terms(coefficients: &[f64]) -> String {
    coefficients
        .iter()
        .enumerate()
        .map(|(k, &a)| {
            let sign = if k > 0 && a >= 0.0 { "+" } else { "" };
            format!("{}{:.2}*y{}", sign, clean(a), k + 1)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_dual(dual: &DualProgram) -> String {
    let mut out = String::from("=== Dual program ===\n");
    out.push_str(&format!("Type: {}\n\n", if dual.minimize { "Minimize" } else { "Maximize" }));
    out.push_str(&format!("Objective: {}\n\n", render_terms(&dual.objective)));
    out.push_str("Dual constraints:\n");
    for (row, b) in dual.matrix.iter().zip(&dual.rhs) {
        out.push_str(&format!("  {} {} {:.2}\n", render_terms(row), dual.relation, b));
    }
    out.push_str(&format!(
        "\nPrimal in canonical form: {}\n",
        if dual.primal_canonical { "yes" } else { "no" }
    ));
    out
}
