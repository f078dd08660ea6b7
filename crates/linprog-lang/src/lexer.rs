use std::str::Chars;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Word,
    Number,

    // Relations
    Le,
    Ge,
    Eq,

    // Special
    Comment,
    Eof,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Chars<'a>,
    pos: usize,
    current: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            source,
            chars,
            pos: 0,
            current,
        }
    }

    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current;
        self.current = self.chars.next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.current
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) -> Token {
        let start = self.pos;
        self.advance(); // #
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        Token::new(
            TokenKind::Comment,
            Span::new(start, self.pos),
            &self.source[start..self.pos],
        )
    }

    fn eat_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;

        // Optional sign
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.advance();
        }

        let mut digits = self.eat_digits();

        // Decimal part
        if self.peek() == Some('.') {
            self.advance();
            digits += self.eat_digits();
        }

        // Exponent, only when digits follow
        if digits > 0 && matches!(self.peek(), Some('e') | Some('E')) {
            let mut chars = self.chars.clone();
            let next = chars.next();
            let has_exponent = match next {
                Some(d) if d.is_ascii_digit() => true,
                Some('-') | Some('+') => chars.next().is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                self.advance(); // e
                if matches!(self.peek(), Some('-') | Some('+')) {
                    self.advance();
                }
                self.eat_digits();
            }
        }

        let kind = if digits > 0 { TokenKind::Number } else { TokenKind::Error };
        Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
    }

    fn read_word(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Token::new(
            TokenKind::Word,
            Span::new(start, self.pos),
            &self.source[start..self.pos],
        )
    }

    fn relation(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.pos;
        for _ in 0..len {
            self.advance();
        }
        Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        };

        match c {
            '#' => self.skip_line_comment(),
            '<' if self.peek_next() == Some('=') => self.relation(TokenKind::Le, 2),
            '>' if self.peek_next() == Some('=') => self.relation(TokenKind::Ge, 2),
            '≤' => self.relation(TokenKind::Le, 1),
            '≥' => self.relation(TokenKind::Ge, 1),
            '=' => self.relation(TokenKind::Eq, 1),
            '-' | '+' | '.' => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_word(),
            _ => {
                self.advance();
                Token::new(
                    TokenKind::Error,
                    Span::new(start, self.pos),
                    &self.source[start..self.pos],
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_relations() {
        assert_eq!(
            kinds("<= = >= ≤ ≥"),
            vec![
                TokenKind::Le,
                TokenKind::Eq,
                TokenKind::Ge,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::tokenize("100 8.5 -20 0.005 +3 .5 1e3 2.5E-2");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["100", "8.5", "-20", "0.005", "+3", ".5", "1e3", "2.5E-2", ""]);
        assert!(tokens[..8].iter().all(|t| t.kind == TokenKind::Number));
    }

    #[test]
    fn test_exponent_needs_digits() {
        let tokens = Lexer::tokenize("3e");
        assert_eq!(tokens[0].text, "3");
        assert_eq!(tokens[1].kind, TokenKind::Word);
    }

    #[test]
    fn test_lone_sign_is_error() {
        assert_eq!(kinds("- 4"), vec![TokenKind::Error, TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("<"), vec![TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn test_words_and_comments() {
        let tokens = Lexer::tokenize("max # direction\n2 3\n");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Comment,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].text, "# direction");
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::tokenize("M 12 <=");
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(2, 4));
        assert_eq!(tokens[2].span, Span::new(5, 7));
    }
}
