//! Tokenizer for inline handler bodies.

use crate::compiler::CompileError;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    String(String),
    Identifier(String),
    Punctuator(&'static str),
    End,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Self::Number(_) => String::from("number"),
            Self::String(_) => String::from("string"),
            Self::Identifier(name) => format!("identifier '{name}'"),
            Self::Punctuator(punctuator) => format!("token '{punctuator}'"),
            Self::End => String::from("end of input"),
        }
    }
}

/// A token with the layout facts automatic semicolon insertion needs.
#[derive(Clone, Debug)]
pub struct Lexeme {
    pub token: Token,
    pub offset: usize,
    pub newline_before: bool,
}

/// Longest first, so `===` wins over `==` and `=`.
const PUNCTUATORS: [&str; 19] = [
    "===", "!==", "&&", "||", "==", "!=", "(", ")", "[", "]", "{", "}", ".", ",", ";", "=", "!",
    "+", "-",
];

const fn is_line_terminator(character: char) -> bool {
    matches!(character, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_identifier_start(character: char) -> bool {
    character == '$' || character == '_' || character.is_alphabetic()
}

fn is_identifier_part(character: char) -> bool {
    is_identifier_start(character) || character.is_alphanumeric()
}

struct Lexer<'source> {
    source: &'source str,
    position: usize,
    newline_before: bool,
}

impl<'source> Lexer<'source> {
    fn rest(&self) -> &'source str {
        self.source.get(self.position..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self, bytes: usize) {
        self.position = self.position.saturating_add(bytes);
    }

    fn error(&self, message: &str) -> CompileError {
        CompileError::syntax(format!("{message} (at offset {})", self.position))
    }

    fn skip_trivia(&mut self) -> Result<(), CompileError> {
        loop {
            let rest = self.rest();
            if let Some(comment) = rest.strip_prefix("//") {
                let length = comment.find(is_line_terminator).unwrap_or(comment.len());
                self.advance(length.saturating_add(2));
            } else if let Some(comment) = rest.strip_prefix("/*") {
                let Some(end) = comment.find("*/") else {
                    return Err(self.error("Unterminated comment"));
                };
                if comment.get(..end).is_some_and(|body| body.contains(is_line_terminator)) {
                    self.newline_before = true;
                }
                self.advance(end.saturating_add(4));
            } else if let Some(character) = self.peek().filter(|character| character.is_whitespace()) {
                if is_line_terminator(character) {
                    self.newline_before = true;
                }
                self.advance(character.len_utf8());
            } else {
                return Ok(());
            }
        }
    }

    fn number(&mut self) -> Result<Token, CompileError> {
        let rest = self.rest();
        let mut length = rest.find(|character: char| !character.is_ascii_digit()).unwrap_or(rest.len());
        let mut literal = rest.get(..length).unwrap_or_default().to_owned();
        if let Some(fraction) = rest.get(length..).and_then(|after| after.strip_prefix('.')) {
            let digits = fraction
                .find(|character: char| !character.is_ascii_digit())
                .unwrap_or(fraction.len());
            literal.push('.');
            literal.push_str(fraction.get(..digits).unwrap_or_default());
            length = length.saturating_add(1).saturating_add(digits);
        }
        if let Some(exponent) = rest.get(length..).and_then(|after| after.strip_prefix(['e', 'E'])) {
            let (sign, unsigned) = match exponent.as_bytes().first() {
                Some(b'+' | b'-') => (exponent.get(..1).unwrap_or_default(), exponent.get(1..).unwrap_or_default()),
                _ => ("", exponent),
            };
            let digits = unsigned
                .find(|character: char| !character.is_ascii_digit())
                .unwrap_or(unsigned.len());
            if digits == 0 {
                return Err(self.error("Invalid or unexpected token"));
            }
            literal.push('e');
            literal.push_str(sign);
            literal.push_str(unsigned.get(..digits).unwrap_or_default());
            length = length.saturating_add(1).saturating_add(sign.len()).saturating_add(digits);
        }
        if rest.get(length..).and_then(|after| after.chars().next()).is_some_and(is_identifier_start) {
            return Err(self.error("Invalid or unexpected token"));
        }
        let value = literal
            .parse::<f64>()
            .map_err(|_| self.error("Invalid or unexpected token"))?;
        self.advance(length);
        Ok(Token::Number(value))
    }

    fn string(&mut self, quote: char) -> Result<Token, CompileError> {
        self.advance(quote.len_utf8());
        let mut value = String::new();
        let mut characters = self.rest().char_indices();
        while let Some((index, character)) = characters.next() {
            if character == quote {
                self.advance(index.saturating_add(quote.len_utf8()));
                return Ok(Token::String(value));
            }
            if is_line_terminator(character) {
                break;
            }
            if character != '\\' {
                value.push(character);
                continue;
            }
            let Some((_, escaped)) = characters.next() else {
                break;
            };
            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                'b' => value.push('\u{0008}'),
                'f' => value.push('\u{000C}'),
                'v' => value.push('\u{000B}'),
                '0' => value.push('\u{0000}'),
                'u' => {
                    let hex: String = characters.by_ref().take(4).map(|(_, digit)| digit).collect();
                    let decoded = u32::from_str_radix(&hex, 16)
                        .ok()
                        .filter(|_| hex.len() == 4)
                        .map(|code| char::from_u32(code).unwrap_or('\u{FFFD}'));
                    let Some(decoded) = decoded else {
                        return Err(self.error("Invalid Unicode escape sequence"));
                    };
                    value.push(decoded);
                }
                other => value.push(other),
            }
        }
        Err(self.error("Invalid or unexpected token"))
    }

    fn next_token(&mut self) -> Result<Lexeme, CompileError> {
        self.newline_before = false;
        self.skip_trivia()?;
        let offset = self.position;
        let newline_before = self.newline_before;
        let rest = self.rest();
        let token = match self.peek() {
            None => Token::End,
            Some(character)
                if character.is_ascii_digit()
                    || (character == '.' && rest.as_bytes().get(1).is_some_and(u8::is_ascii_digit)) =>
            {
                self.number()?
            }
            Some(quote @ ('"' | '\'')) => self.string(quote)?,
            Some(character) if is_identifier_start(character) => {
                let length = rest.find(|next: char| !is_identifier_part(next)).unwrap_or(rest.len());
                let name = rest.get(..length).unwrap_or_default().to_owned();
                self.advance(length);
                Token::Identifier(name)
            }
            Some(character) => {
                let Some(punctuator) = PUNCTUATORS.iter().find(|candidate| rest.starts_with(**candidate)) else {
                    return Err(self.error(&format!("Invalid or unexpected token '{character}'")));
                };
                self.advance(punctuator.len());
                Token::Punctuator(*punctuator)
            }
        };
        Ok(Lexeme {
            token,
            offset,
            newline_before,
        })
    }
}

/// Split `source` into lexemes, ending with [`Token::End`].
pub fn tokenize(source: &str) -> Result<Vec<Lexeme>, CompileError> {
    let mut lexer = Lexer {
        source,
        position: 0,
        newline_before: false,
    };
    let mut lexemes = Vec::new();
    loop {
        let lexeme = lexer.next_token()?;
        let finished = lexeme.token == Token::End;
        lexemes.push(lexeme);
        if finished {
            return Ok(lexemes);
        }
    }
}
