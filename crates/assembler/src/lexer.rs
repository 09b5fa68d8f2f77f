//! Tokenizer for Lux assembly text.

use crate::error::AsmError;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A mnemonic or marker name. Always uppercase.
    Ident(String),
    /// A numeric literal (decimal or hex).
    Number(u64),
}

impl Token {
    /// The token as it would be written back.
    pub(crate) fn text(&self) -> String {
        match self {
            Token::Ident(s) => s.clone(),
            Token::Number(n) => n.to_string(),
        }
    }
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line. Commas separate
/// tokens just like whitespace.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut tokens = Vec::new();
    for word in line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
    {
        let token = if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
            let value = u64::from_str_radix(hex, 16).map_err(|_| AsmError::InvalidNumber {
                line: line_num,
                token: word.to_string(),
            })?;
            Token::Number(value)
        } else if word.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
            let value: u64 = word.parse().map_err(|_| AsmError::InvalidNumber {
                line: line_num,
                token: word.to_string(),
            })?;
            Token::Number(value)
        } else {
            Token::Ident(word.to_uppercase())
        };
        tokens.push(token);
    }

    Ok(tokens)
}
