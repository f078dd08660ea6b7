pub mod lexer;
pub mod parser;

#[cfg(feature = "serde")]
pub mod request;

pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{is_maximize, parse_relation, ParseError, Parser};

#[cfg(feature = "serde")]
pub use request::{ConstraintRequest, ProblemRequest, RequestError};
