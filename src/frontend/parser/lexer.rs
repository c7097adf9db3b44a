use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// item type consumed by the generated parser: (start offset, token, end offset)
pub type Spanned<TokT, LocT, ErrT> = Result<(LocT, TokT, LocT), ErrT>;

/// words reserved by the language that the grammar does not support
const RESERVED_WORDS: [&str; 10] = [
    "do", "switch", "case", "default", "struct", "typedef", "const", "static", "extern", "sizeof",
];

#[derive(Debug, PartialEq, Clone)]
pub enum Tok {
    // literals keep their source text
    Ident(String),
    IntLit(String),
    FloatLit(String),
    StrLit(String),
    CharLit(String),

    // type specifiers
    KwInt,
    KwChar,
    KwFloat,
    KwDouble,
    KwVoid,

    // control flow
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwReturn,
    KwBreak,
    KwContinue,

    // operators
    Assign,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Not,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Tok::Ident(s) | Tok::IntLit(s) | Tok::FloatLit(s) | Tok::StrLit(s) | Tok::CharLit(s) => {
                return write!(f, "{}", s);
            }
            Tok::KwInt => "int",
            Tok::KwChar => "char",
            Tok::KwFloat => "float",
            Tok::KwDouble => "double",
            Tok::KwVoid => "void",
            Tok::KwIf => "if",
            Tok::KwElse => "else",
            Tok::KwWhile => "while",
            Tok::KwFor => "for",
            Tok::KwReturn => "return",
            Tok::KwBreak => "break",
            Tok::KwContinue => "continue",
            Tok::Assign => "=",
            Tok::Equal => "==",
            Tok::NotEqual => "!=",
            Tok::Less => "<",
            Tok::LessEqual => "<=",
            Tok::Greater => ">",
            Tok::GreaterEqual => ">=",
            Tok::And => "&&",
            Tok::Or => "||",
            Tok::Not => "!",
            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Percent => "%",
            Tok::LParen => "(",
            Tok::RParen => ")",
            Tok::LBrace => "{",
            Tok::RBrace => "}",
            Tok::Semicolon => ";",
            Tok::Comma => ",",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum LexicalError {
    #[error("unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, location: usize },
    #[error("unterminated string literal")]
    UnterminatedString { location: usize },
    #[error("unterminated character literal")]
    UnterminatedChar { location: usize },
    #[error("unterminated comment")]
    UnterminatedComment { location: usize },
    #[error("integer literal {text} is out of range")]
    IntegerOverflow { text: String, location: usize },
    #[error("reserved word '{word}' is not supported")]
    ReservedWord { word: String, location: usize },
}

impl LexicalError {
    /// byte offset where the offending input starts
    pub fn location(&self) -> usize {
        match self {
            LexicalError::UnexpectedCharacter { location, .. }
            | LexicalError::UnterminatedString { location }
            | LexicalError::UnterminatedChar { location }
            | LexicalError::UnterminatedComment { location }
            | LexicalError::IntegerOverflow { location, .. }
            | LexicalError::ReservedWord { location, .. } => *location,
        }
    }
}

/// hand written lexer, produces the token stream for the generated parser
pub struct Lexer<'input> {
    source: &'input str,
    chars: Peekable<CharIndices<'input>>,
}

impl<'input> Lexer<'input> {
    pub fn new(source: &'input str) -> Self {
        Self { source, chars: source.char_indices().peekable() }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    /// offset of the next unread character (source length at the end of input)
    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some((idx, _)) => *idx,
            None => self.source.len(),
        }
    }

    /// consume next character if it is equal to `expected`
    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn skip_line(&mut self) {
        while let Some((_, ch)) = self.chars.next() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// skips whitespace, comments and preprocessor lines
    fn skip_trivia(&mut self) -> Result<(), LexicalError> {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.chars.next();
                }
                Some('#') => self.skip_line(),
                Some('/') => {
                    let start = self.offset();
                    let source = self.source;
                    match source[start + 1..].chars().next() {
                        Some('/') => self.skip_line(),
                        Some('*') => {
                            self.chars.next();
                            self.chars.next();
                            let mut previous = '\0';
                            loop {
                                match self.chars.next() {
                                    Some((_, '/')) if previous == '*' => break,
                                    Some((_, ch)) => previous = ch,
                                    None => return Err(LexicalError::UnterminatedComment { location: start }),
                                }
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, start: usize, predicate: F) -> &'input str {
        while let Some(ch) = self.peek_char() {
            if predicate(ch) {
                self.chars.next();
            } else {
                break;
            }
        }
        let end = self.offset();
        let source = self.source;
        &source[start..end]
    }

    fn word(&mut self, start: usize) -> Result<Tok, LexicalError> {
        let word = self.take_while(start, |ch| ch.is_ascii_alphanumeric() || ch == '_');
        let tok = match word {
            "int" => Tok::KwInt,
            "char" => Tok::KwChar,
            "float" => Tok::KwFloat,
            "double" => Tok::KwDouble,
            "void" => Tok::KwVoid,
            "if" => Tok::KwIf,
            "else" => Tok::KwElse,
            "while" => Tok::KwWhile,
            "for" => Tok::KwFor,
            "return" => Tok::KwReturn,
            "break" => Tok::KwBreak,
            "continue" => Tok::KwContinue,
            w if RESERVED_WORDS.contains(&w) => {
                return Err(LexicalError::ReservedWord { word: String::from(w), location: start });
            }
            w => Tok::Ident(String::from(w)),
        };
        Ok(tok)
    }

    fn number(&mut self, start: usize) -> Result<Tok, LexicalError> {
        self.take_while(start, |ch| ch.is_ascii_digit());
        let mut is_float = false;
        if self.eat('.') {
            is_float = true;
            self.take_while(start, |ch| ch.is_ascii_digit());
        }
        if let Some('e') | Some('E') = self.peek_char() {
            let exponent_start = self.offset();
            let source = self.source;
            let mut rest = source[exponent_start + 1..].chars();
            let has_digits = match rest.next() {
                Some('+') | Some('-') => rest.next().map_or(false, |ch| ch.is_ascii_digit()),
                Some(ch) => ch.is_ascii_digit(),
                None => false,
            };
            if has_digits {
                is_float = true;
                self.chars.next();
                if !self.eat('+') {
                    self.eat('-');
                }
                self.take_while(start, |ch| ch.is_ascii_digit());
            }
        }
        let end = self.offset();
        let source = self.source;
        let text = &source[start..end];
        if is_float {
            Ok(Tok::FloatLit(String::from(text)))
        } else {
            // integer values are normalized to their decimal representation
            match text.parse::<i64>() {
                Ok(val) => Ok(Tok::IntLit(val.to_string())),
                Err(_) => Err(LexicalError::IntegerOverflow { text: String::from(text), location: start }),
            }
        }
    }

    /// string and char literals, text is kept verbatim (quotes and escapes included)
    fn quoted(&mut self, start: usize, quote: char) -> Result<Tok, LexicalError> {
        let unterminated = || match quote {
            '"' => LexicalError::UnterminatedString { location: start },
            _ => LexicalError::UnterminatedChar { location: start },
        };
        loop {
            match self.chars.next() {
                Some((_, '\\')) => {
                    if self.chars.next().is_none() {
                        return Err(unterminated());
                    }
                }
                Some((_, '\n')) | None => return Err(unterminated()),
                Some((_, ch)) if ch == quote => break,
                Some(_) => (),
            }
        }
        let end = self.offset();
        let source = self.source;
        let text = String::from(&source[start..end]);
        if quote == '"' {
            Ok(Tok::StrLit(text))
        } else if end - start > 2 {
            Ok(Tok::CharLit(text))
        } else {
            // empty character literal ''
            Err(LexicalError::UnexpectedCharacter { ch: quote, location: start })
        }
    }

    fn next_token(&mut self, start: usize, ch: char) -> Result<Tok, LexicalError> {
        let source = self.source;
        let punct = match ch {
            'a'..='z' | 'A'..='Z' | '_' => return self.word(start),
            '0'..='9' => return self.number(start),
            '.' if source[start + 1..].starts_with(|c: char| c.is_ascii_digit()) => {
                return self.number(start);
            }
            '"' | '\'' => {
                self.chars.next();
                return self.quoted(start, ch);
            }
            _ => {
                self.chars.next();
                ch
            }
        };
        match punct {
            '=' => Ok(if self.eat('=') { Tok::Equal } else { Tok::Assign }),
            '!' => Ok(if self.eat('=') { Tok::NotEqual } else { Tok::Not }),
            '<' => Ok(if self.eat('=') { Tok::LessEqual } else { Tok::Less }),
            '>' => Ok(if self.eat('=') { Tok::GreaterEqual } else { Tok::Greater }),
            '&' if self.eat('&') => Ok(Tok::And),
            '|' if self.eat('|') => Ok(Tok::Or),
            '+' => Ok(Tok::Plus),
            '-' => Ok(Tok::Minus),
            '*' => Ok(Tok::Star),
            '/' => Ok(Tok::Slash),
            '%' => Ok(Tok::Percent),
            '(' => Ok(Tok::LParen),
            ')' => Ok(Tok::RParen),
            '{' => Ok(Tok::LBrace),
            '}' => Ok(Tok::RBrace),
            ';' => Ok(Tok::Semicolon),
            ',' => Ok(Tok::Comma),
            ch => Err(LexicalError::UnexpectedCharacter { ch, location: start }),
        }
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<Tok, usize, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.skip_trivia() {
            return Some(Err(e));
        }
        let start = self.offset();
        let ch = self.peek_char()?;
        let result = self.next_token(start, ch)
            .map(|tok| (start, tok, self.offset()));
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Tok> {
        Lexer::new(source)
            .map(|spanned| spanned.unwrap().1)
            .collect()
    }

    #[test]
    fn lexes_declaration() {
        assert_eq!(
            tokens("int x = 007;"),
            vec![Tok::KwInt, Tok::Ident(String::from("x")), Tok::Assign, Tok::IntLit(String::from("7")), Tok::Semicolon]
        );
    }

    #[test]
    fn lexes_two_char_operators() {
        assert_eq!(
            tokens("a<=b!=c&&d||!e==f>=g"),
            vec![
                Tok::Ident(String::from("a")), Tok::LessEqual, Tok::Ident(String::from("b")),
                Tok::NotEqual, Tok::Ident(String::from("c")), Tok::And, Tok::Ident(String::from("d")),
                Tok::Or, Tok::Not, Tok::Ident(String::from("e")), Tok::Equal, Tok::Ident(String::from("f")),
                Tok::GreaterEqual, Tok::Ident(String::from("g")),
            ]
        );
    }

    #[test]
    fn float_literals_keep_source_text() {
        assert_eq!(
            tokens("1.50 .5 2. 3e10 4.5E-3"),
            vec![
                Tok::FloatLit(String::from("1.50")),
                Tok::FloatLit(String::from(".5")),
                Tok::FloatLit(String::from("2.")),
                Tok::FloatLit(String::from("3e10")),
                Tok::FloatLit(String::from("4.5E-3")),
            ]
        );
    }

    #[test]
    fn quoted_literals_keep_quotes_and_escapes() {
        assert_eq!(
            tokens(r#""a \"b\"\n" '\n' 'x'"#),
            vec![
                Tok::StrLit(String::from(r#""a \"b\"\n""#)),
                Tok::CharLit(String::from(r"'\n'")),
                Tok::CharLit(String::from("'x'")),
            ]
        );
    }

    #[test]
    fn skips_comments_and_preprocessor_lines() {
        let source = "#include <stdio.h>\n// line comment\nint /* inline */ x; /* multi\nline */";
        assert_eq!(tokens(source), vec![Tok::KwInt, Tok::Ident(String::from("x")), Tok::Semicolon]);
    }

    #[test]
    fn spans_are_byte_offsets() {
        let spans: Vec<_> = Lexer::new("int  xy;")
            .map(|spanned| {
                let (l, _, r) = spanned.unwrap();
                (l, r)
            })
            .collect();
        assert_eq!(spans, vec![(0, 3), (5, 7), (7, 8)]);
    }

    #[test]
    fn reserved_words_are_rejected() {
        let result: Result<Vec<_>, _> = Lexer::new("struct point;").collect();
        assert_eq!(result, Err(LexicalError::ReservedWord { word: String::from("struct"), location: 0 }));
    }

    #[test]
    fn unterminated_input_is_reported() {
        let result: Result<Vec<_>, _> = Lexer::new("x = \"abc").collect();
        assert_eq!(result, Err(LexicalError::UnterminatedString { location: 4 }));

        let result: Result<Vec<_>, _> = Lexer::new("x; /* never closed").collect();
        assert_eq!(result, Err(LexicalError::UnterminatedComment { location: 3 }));
    }

    #[test]
    fn single_ampersand_is_unexpected() {
        let result: Result<Vec<_>, _> = Lexer::new("a & b").collect();
        assert_eq!(result, Err(LexicalError::UnexpectedCharacter { ch: '&', location: 2 }));
    }
}
