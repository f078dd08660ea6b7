//! JSON request form used by the web front end:
//!
//! ```json
//! { "type": "max", "nbVar": 2, "nbCtr": 1,
//!   "objective": [3, 2],
//!   "constraints": [{ "coeffs": [1, 1], "sign": "<=", "b": 4 }] }
//! ```

use linprog_solver::LpProblem;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::{is_maximize, parse_relation};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("{field} has {found} entries but {expected} were declared")]
    CountMismatch {
        field: String,
        expected: usize,
        found: usize,
    },
    #[error("Unknown relation {sign:?} in constraint {index}")]
    UnknownRelation { index: usize, sign: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRequest {
    /// `"max"` maximizes, anything else minimizes
    #[serde(rename = "type")]
    pub direction: String,
    #[serde(rename = "nbVar")]
    pub nb_var: usize,
    #[serde(rename = "nbCtr")]
    pub nb_ctr: usize,
    pub objective: Vec<f64>,
    pub constraints: Vec<ConstraintRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRequest {
    pub coeffs: Vec<f64>,
    pub sign: String,
    pub b: f64,
}

impl ProblemRequest {
    pub fn into_problem(self) -> Result<LpProblem, RequestError> {
        if self.objective.len() != self.nb_var {
            return Err(RequestError::CountMismatch {
                field: "objective".to_string(),
                expected: self.nb_var,
                found: self.objective.len(),
            });
        }
        if self.constraints.len() != self.nb_ctr {
            return Err(RequestError::CountMismatch {
                field: "constraints".to_string(),
                expected: self.nb_ctr,
                found: self.constraints.len(),
            });
        }

        let mut problem = LpProblem::with_variable_count(self.nb_var);
        problem.set_objective(self.objective, !is_maximize(&self.direction));

        for (i, c) in self.constraints.into_iter().enumerate() {
            if c.coeffs.len() != self.nb_var {
                return Err(RequestError::CountMismatch {
                    field: format!("constraints[{}].coeffs", i),
                    expected: self.nb_var,
                    found: c.coeffs.len(),
                });
            }
            let op = parse_relation(c.sign.trim()).ok_or_else(|| RequestError::UnknownRelation {
                index: i,
                sign: c.sign.clone(),
            })?;
            problem.add_constraint(format!("c{}", i + 1), c.coeffs, op, c.b);
        }

        Ok(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linprog_solver::ConstraintOp;

    const REQUEST: &str = r#"{
        "type": "max",
        "nbVar": 2,
        "nbCtr": 2,
        "objective": [3, 2],
        "constraints": [
            { "coeffs": [1, 1], "sign": "<=", "b": 4 },
            { "coeffs": [1, 3], "sign": ">=", "b": 6 }
        ]
    }"#;

    #[test]
    fn test_request_to_problem() {
        let request: ProblemRequest = serde_json::from_str(REQUEST).unwrap();
        let problem = request.into_problem().unwrap();

        assert!(!problem.objective.minimize);
        assert_eq!(problem.objective.coefficients, vec![3.0, 2.0]);
        assert_eq!(problem.constraints[1].op, ConstraintOp::Ge);
        assert_eq!(problem.constraints[1].rhs, 6.0);
    }

    #[test]
    fn test_min_direction() {
        let mut request: ProblemRequest = serde_json::from_str(REQUEST).unwrap();
        request.direction = "min".to_string();
        assert!(request.into_problem().unwrap().objective.minimize);
    }

    #[test]
    fn test_count_mismatch() {
        let mut request: ProblemRequest = serde_json::from_str(REQUEST).unwrap();
        request.nb_ctr = 3;
        assert_eq!(
            request.into_problem().unwrap_err(),
            RequestError::CountMismatch {
                field: "constraints".to_string(),
                expected: 3,
                found: 2
            }
        );

        let mut request: ProblemRequest = serde_json::from_str(REQUEST).unwrap();
        request.constraints[0].coeffs.push(1.0);
        let err = request.into_problem().unwrap_err();
        assert!(err.to_string().starts_with("constraints[0].coeffs has 3 entries"));
    }

    #[test]
    fn test_unknown_relation() {
        let mut request: ProblemRequest = serde_json::from_str(REQUEST).unwrap();
        request.constraints[1].sign = "<".to_string();
        assert_eq!(
            request.into_problem().unwrap_err(),
            RequestError::UnknownRelation {
                index: 1,
                sign: "<".to_string()
            }
        );
    }
}
