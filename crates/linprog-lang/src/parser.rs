use linprog_solver::{ConstraintOp, LpProblem};
use thiserror::Error;

use crate::lexer::{Span, Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found {found:?} at position {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Invalid count {text:?} for {what}: expected a nonnegative integer at position {span:?}")]
    InvalidCount { what: String, text: String, span: Span },
}

/// True for the direction words that select maximization: `m`, `max`,
/// `maximize` and `maximise`, in any case. Anything else minimizes.
pub fn is_maximize(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "m" | "max" | "maximize" | "maximise"
    )
}

pub fn parse_relation(text: &str) -> Option<ConstraintOp> {
    match text {
        "<=" | "≤" => Some(ConstraintOp::Le),
        ">=" | "≥" => Some(ConstraintOp::Ge),
        "=" => Some(ConstraintOp::Eq),
        _ => None,
    }
}

/// Reads the token-oriented problem input:
///
/// ```text
/// max        # direction
/// 2 3        # variable count, constraint count
/// 3 5        # objective
/// 1 0 <= 4   # one line per constraint
/// 0 2 <= 12
/// 3 2 <= 18
/// ```
///
/// Line breaks carry no meaning; only the token order does.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = tokens.into_iter().filter(|t| t.kind != TokenKind::Comment).collect();
        Self { tokens, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<LpProblem, ParseError> {
        let tokens = crate::lexer::Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_problem()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(t) if t.kind != TokenKind::Eof => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: t.text.clone(),
                span: t.span,
            },
            _ => ParseError::UnexpectedEof(expected.to_string()),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.peek_kind() == kind {
            self.advance().ok_or_else(|| ParseError::UnexpectedEof(expected.to_string()))
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn parse_number(&mut self, expected: &str) -> Result<f64, ParseError> {
        let token = self.expect(TokenKind::Number, expected)?;
        let value: f64 = token
            .text
            .parse()
            .map_err(|_| ParseError::InvalidNumber(token.text.clone()))?;
        if !value.is_finite() {
            return Err(ParseError::InvalidNumber(token.text));
        }
        Ok(value)
    }

    fn parse_count(&mut self, what: &str) -> Result<usize, ParseError> {
        let token = self.expect(TokenKind::Number, what)?;
        token.text.parse().map_err(|_| ParseError::InvalidCount {
            what: what.to_string(),
            text: token.text.clone(),
            span: token.span,
        })
    }

    fn parse_relation(&mut self) -> Result<ConstraintOp, ParseError> {
        match self.peek_kind() {
            TokenKind::Le | TokenKind::Ge | TokenKind::Eq => {}
            _ => return Err(self.unexpected("one of <=, =, >=")),
        }
        let token = self.advance().ok_or_else(|| ParseError::UnexpectedEof("relation".to_string()))?;
        parse_relation(&token.text).ok_or_else(|| ParseError::UnexpectedToken {
            expected: "one of <=, =, >=".to_string(),
            found: token.text.clone(),
            span: token.span,
        })
    }

    fn parse_problem(&mut self) -> Result<LpProblem, ParseError> {
        let direction = self.expect(TokenKind::Word, "direction (max or min)")?;
        let maximize = is_maximize(&direction.text);

        let n = self.parse_count("variable count")?;
        let m = self.parse_count("constraint count")?;

        let mut objective = Vec::new();
        for j in 0..n {
            objective.push(self.parse_number(&format!("objective coefficient {}", j + 1))?);
        }

        let mut problem = LpProblem::with_variable_count(n);
        problem.set_objective(objective, !maximize);

        for i in 0..m {
            let mut coefficients = Vec::new();
            for j in 0..n {
                coefficients.push(self.parse_number(&format!("coefficient {} of constraint {}", j + 1, i + 1))?);
            }
            let op = self.parse_relation()?;
            let rhs = self.parse_number(&format!("right-hand side of constraint {}", i + 1))?;
            problem.add_constraint(format!("c{}", i + 1), coefficients, op, rhs);
        }

        if self.peek_kind() != TokenKind::Eof {
            return Err(self.unexpected("end of input"));
        }

        log::debug!(
            "parsed {} problem with {} variables and {} constraints",
            if maximize { "max" } else { "min" },
            n,
            m
        );
        Ok(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXTBOOK: &str = "max
2 3
3 5
1 0 <= 4
0 2 <= 12
3 2 <= 18
";

    #[test]
    fn test_parse_textbook() {
        let problem = Parser::parse(TEXTBOOK).unwrap();
        assert!(!problem.objective.minimize);
        assert_eq!(problem.variables, vec!["x1", "x2"]);
        assert_eq!(problem.objective.coefficients, vec![3.0, 5.0]);
        assert_eq!(problem.constraints.len(), 3);
        assert_eq!(problem.constraints[2].name, "c3");
        assert_eq!(problem.constraints[2].coefficients, vec![3.0, 2.0]);
        assert_eq!(problem.constraints[2].op, ConstraintOp::Le);
        assert_eq!(problem.constraints[2].rhs, 18.0);
    }

    #[test]
    fn test_direction_words() {
        for word in ["M", "m", "MAX", "Maximize", "maximise"] {
            assert!(is_maximize(word), "{}", word);
        }
        for word in ["N", "min", "minimize", "maxx"] {
            assert!(!is_maximize(word), "{}", word);
        }

        let problem = Parser::parse("N 1 1 2 1 >= 3").unwrap();
        assert!(problem.objective.minimize);
        assert_eq!(problem.constraints[0].op, ConstraintOp::Ge);
    }

    #[test]
    fn test_single_line_with_comments() {
        let source = "M 2 1 # header\n 1.5 -2 # objective\n 1 1 = 4";
        let problem = Parser::parse(source).unwrap();
        assert_eq!(problem.objective.coefficients, vec![1.5, -2.0]);
        assert_eq!(problem.constraints[0].op, ConstraintOp::Eq);
    }

    #[test]
    fn test_missing_tokens() {
        let err = Parser::parse("max 2 1 3 5 1 0 <=").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEof("right-hand side of constraint 1".to_string())
        );
    }

    #[test]
    fn test_relation_in_wrong_place() {
        let err = Parser::parse("max 2 1 3 5 1 <= 0 4").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, found, span } => {
                assert_eq!(expected, "coefficient 2 of constraint 1");
                assert_eq!(found, "<=");
                assert_eq!(span, Span::new(14, 16));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bad_counts() {
        let err = Parser::parse("max 2.5 1").unwrap_err();
        assert!(matches!(err, ParseError::InvalidCount { ref what, .. } if what == "variable count"));

        let err = Parser::parse("max -1 1").unwrap_err();
        assert!(matches!(err, ParseError::InvalidCount { .. }));

        let err = Parser::parse("3 2 1").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_trailing_input() {
        let err = Parser::parse("max 1 1 1 1 <= 2 7").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, found, .. } => {
                assert_eq!(expected, "end of input");
                assert_eq!(found, "7");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token() {
        let err = Parser::parse("max 1 1 1 1 < 2").unwrap_err();
        assert!(err.to_string().contains("one of <=, =, >="));
    }

    #[test]
    fn test_huge_number_rejected() {
        let err = Parser::parse("max 1 1 1e400 1 <= 2").unwrap_err();
        assert_eq!(err, ParseError::InvalidNumber("1e400".to_string()));
    }
}
