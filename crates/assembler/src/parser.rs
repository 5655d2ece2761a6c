//! Parser for subvm assembly tokens → bytes.
//!
//! Three line shapes:
//! - bare mnemonic (`JUMPSUB`)
//! - `PUSHn <number>`, encoded big-endian in exactly n bytes
//! - `INVALID <byte>` for a byte with no assigned opcode

use crate::error::AsmError;
use crate::lexer::Token;
use subvm_common::{Opcode, U256};

/// Mnemonic for bytes that do not decode to an opcode.
pub(crate) const INVALID_MNEMONIC: &str = "INVALID";

/// Parse the tokens of a single line into the bytes they encode.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(tokens: &[Token], line_num: usize) -> Result<Option<Vec<u8>>, AsmError> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let mnemonic = match &tokens[0] {
        Token::Ident(s) => s.as_str(),
        Token::Number(n) => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: n.to_string(),
            })
        }
    };
    let args = &tokens[1..];

    if mnemonic == INVALID_MNEMONIC {
        let byte = expect_number(args, line_num, INVALID_MNEMONIC)?;
        expect_end(&args[1..], line_num)?;
        return parse_invalid(byte, line_num).map(|b| Some(vec![b]));
    }

    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    match opcode {
        Opcode::Push(width) => {
            let value = expect_number(args, line_num, opcode.mnemonic())?;
            expect_end(&args[1..], line_num)?;
            let width = width as usize;
            if value.bits() > width * 8 {
                return Err(AsmError::ValueTooLarge {
                    line: line_num,
                    opcode: opcode.mnemonic(),
                    bytes: width,
                });
            }
            let mut word = [0u8; 32];
            value.to_big_endian(&mut word);
            let mut bytes = vec![opcode.byte()];
            bytes.extend_from_slice(&word[32 - width..]);
            Ok(Some(bytes))
        }
        _ => {
            expect_end(args, line_num)?;
            Ok(Some(vec![opcode.byte()]))
        }
    }
}

fn parse_invalid(value: U256, line: usize) -> Result<u8, AsmError> {
    let token = || format!("{value:#x}");
    if value > U256::from(u8::MAX) {
        return Err(AsmError::InvalidNumber {
            line,
            token: token(),
        });
    }
    let byte = value.low_u32() as u8;
    if Opcode::try_from(byte).is_ok() {
        // Defined opcodes must be written by mnemonic.
        return Err(AsmError::UnexpectedToken {
            line,
            token: token(),
        });
    }
    Ok(byte)
}

/// Extract the number in the first argument position.
fn expect_number(args: &[Token], line: usize, opcode: &'static str) -> Result<U256, AsmError> {
    match args.first() {
        Some(Token::Number(n)) => Ok(*n),
        Some(Token::Ident(s)) => Err(AsmError::UnexpectedToken {
            line,
            token: s.clone(),
        }),
        None => Err(AsmError::MissingArgument {
            line,
            opcode,
            expected: 1,
        }),
    }
}

/// Ensure no tokens remain.
fn expect_end(remaining: &[Token], line: usize) -> Result<(), AsmError> {
    if let Some(tok) = remaining.first() {
        let token = match tok {
            Token::Ident(s) => s.clone(),
            Token::Number(n) => n.to_string(),
        };
        return Err(AsmError::UnexpectedToken { line, token });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    fn num(n: u64) -> Token {
        Token::Number(U256::from(n))
    }

    #[test]
    fn blank_line() {
        assert_eq!(parse_line(&[], 1).unwrap(), None);
    }

    #[test]
    fn bare_mnemonics() {
        assert_eq!(parse_line(&[ident("BEGINSUB")], 1).unwrap(), Some(vec![0xb2]));
        assert_eq!(parse_line(&[ident("JUMPSUB")], 1).unwrap(), Some(vec![0xb3]));
        assert_eq!(parse_line(&[ident("RETURNSUB")], 1).unwrap(), Some(vec![0xb7]));
    }

    #[test]
    fn push_is_left_padded_to_width() {
        assert_eq!(
            parse_line(&[ident("PUSH2"), num(4)], 1).unwrap(),
            Some(vec![0x61, 0x00, 0x04])
        );
        assert_eq!(
            parse_line(&[ident("PUSH1"), num(0)], 1).unwrap(),
            Some(vec![0x60, 0x00])
        );
    }

    #[test]
    fn push_value_too_large() {
        assert_eq!(
            parse_line(&[ident("PUSH1"), num(256)], 5),
            Err(AsmError::ValueTooLarge {
                line: 5,
                opcode: "PUSH1",
                bytes: 1
            })
        );
    }

    #[test]
    fn push_missing_argument() {
        assert_eq!(
            parse_line(&[ident("PUSH1")], 2),
            Err(AsmError::MissingArgument {
                line: 2,
                opcode: "PUSH1",
                expected: 1
            })
        );
    }

    #[test]
    fn extra_argument_rejected() {
        assert!(matches!(
            parse_line(&[ident("RETURNSUB"), num(1)], 1),
            Err(AsmError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_line(&[ident("PUSH1"), num(1), num(2)], 1),
            Err(AsmError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn invalid_byte() {
        assert_eq!(
            parse_line(&[ident("INVALID"), num(0xfe)], 1).unwrap(),
            Some(vec![0xfe])
        );
        // 0xb3 is JUMPSUB and must be written as such
        assert!(matches!(
            parse_line(&[ident("INVALID"), num(0xb3)], 1),
            Err(AsmError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_line(&[ident("INVALID"), num(0x100)], 1),
            Err(AsmError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn number_in_opcode_position() {
        assert!(matches!(
            parse_line(&[num(1)], 1),
            Err(AsmError::UnexpectedToken { .. })
        ));
    }
}
