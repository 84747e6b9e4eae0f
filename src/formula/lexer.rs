use crate::error::ScoringError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Self::Number(value) => format!("number {value}"),
            Self::Ident(name) => format!("identifier '{name}'"),
            Self::Plus => "'+'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Slash => "'/'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
        }
    }
}

/// Splits a formula into tokens. Positions in error messages are 0-based
/// character offsets.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScoringError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        match ch {
            c if c.is_whitespace() => pos += 1,
            '+' => push(&mut tokens, &mut pos, Token::Plus),
            '-' => push(&mut tokens, &mut pos, Token::Minus),
            '*' => push(&mut tokens, &mut pos, Token::Star),
            '/' => push(&mut tokens, &mut pos, Token::Slash),
            '(' => push(&mut tokens, &mut pos, Token::LParen),
            ')' => push(&mut tokens, &mut pos, Token::RParen),
            c if c.is_ascii_digit() || c == '.' => {
                let (token, next) = read_number(&chars, pos)?;
                tokens.push(token);
                pos = next;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_')
                {
                    pos += 1;
                }
                tokens.push(Token::Ident(chars[start..pos].iter().collect()));
            }
            other => {
                return Err(ScoringError::MalformedFormula(format!(
                    "unexpected character '{other}' at position {pos}"
                )));
            }
        }
    }

    Ok(tokens)
}

fn push(tokens: &mut Vec<Token>, pos: &mut usize, token: Token) {
    tokens.push(token);
    *pos += 1;
}

fn read_number(chars: &[char], start: usize) -> Result<(Token, usize), ScoringError> {
    let mut pos = start;
    let mut int_digits = 0;
    while pos < chars.len() && chars[pos].is_ascii_digit() {
        pos += 1;
        int_digits += 1;
    }

    let mut frac_digits = 0;
    let has_point = pos < chars.len() && chars[pos] == '.';
    if has_point {
        pos += 1;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            pos += 1;
            frac_digits += 1;
        }
    }

    let literal: String = chars[start..pos].iter().collect();
    if (has_point && frac_digits == 0) || int_digits + frac_digits == 0 {
        return Err(ScoringError::MalformedFormula(format!(
            "invalid numeric literal '{literal}' at position {start}"
        )));
    }
    if pos < chars.len() && (chars[pos].is_ascii_alphabetic() || chars[pos] == '_') {
        return Err(ScoringError::MalformedFormula(format!(
            "identifier cannot start with a digit at position {start}"
        )));
    }

    let invalid = || {
        ScoringError::MalformedFormula(format!(
            "invalid numeric literal '{literal}' at position {start}"
        ))
    };
    let value = literal.parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok((Token::Number(value), pos))
}
