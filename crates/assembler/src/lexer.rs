//! Tokenizer for subvm assembly text.

use crate::error::AsmError;
use subvm_common::U256;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// An identifier (opcode mnemonic). Always uppercase.
    Ident(String),
    /// A numeric literal (decimal or hex), up to 256 bits.
    Number(U256),
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut tokens = Vec::new();
    for word in line.split_whitespace() {
        let invalid = || AsmError::InvalidNumber {
            line: line_num,
            token: word.to_string(),
        };
        let hex_digits = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X"));
        let token = if let Some(hex_str) = hex_digits {
            if hex_str.is_empty() {
                return Err(invalid());
            }
            Token::Number(U256::from_str_radix(hex_str, 16).map_err(|_| invalid())?)
        } else if word.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
            Token::Number(U256::from_dec_str(word).map_err(|_| invalid())?)
        } else {
            Token::Ident(word.to_uppercase())
        };
        tokens.push(token);
    }

    Ok(tokens)
}
