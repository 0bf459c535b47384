//! # Assembler Boundary
//!
//! Tokenizing source text and resolving labels to addresses is the job of
//! the host's generic, architecture-agnostic pass. What reaches this
//! backend is a stream of [`ResolvedToken`]s: one mnemonic per
//! instruction with its operands already disambiguated. This module
//! defines that boundary and drives the per-instruction
//! [`encoder`](self::encoder) over a whole program.
//!
//! The encoder only reads the tokens; it never mutates or retains them
//! beyond the encoding pass.
//!
//! ## Debugger Tokens
//!
//! Encoding also produces one [`DebuggerToken`] per instruction, mapping
//! the emitted address back to the originating source line so the host's
//! debugger can set breakpoints and step by line.

pub mod encoder;

pub use encoder::encode_instruction;

use crate::Error;

/// One source-level instruction with operands already resolved.
///
/// Produced by the external tokenizer/resolver and consumed read-only by
/// the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    /// Instruction mnemonic, upper-case (`"LD"`, `"NOP"`, …).
    pub mnemonic: String,

    /// Operands in source order.
    pub operands: Vec<OperandToken>,

    /// Source line the instruction came from (1-indexed).
    pub line: usize,
}

/// A single resolved operand.
///
/// Registers are carried by canonical name and resolved against the
/// register-numbering table during encoding, so the encoder and the host
/// share one name contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandToken {
    /// A register operand, e.g. `A` or `BC`.
    Register(String),

    /// An immediate value; labels have already been resolved to numbers.
    Immediate(u16),

    /// Memory indirect through a register, e.g. `(HL)`.
    Indirect(String),

    /// Displaced indexed addressing, e.g. `(IX+5)` or `(IY-1)`.
    Indexed {
        /// Index register name, `IX` or `IY`.
        index: String,
        /// Signed displacement added to the index register.
        displacement: i8,
    },
}

/// Maps one emitted instruction address back to its source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebuggerToken {
    /// Address of the instruction's first byte.
    pub address: u16,

    /// Source line (1-indexed).
    pub line: usize,
}

/// Encodes a resolved instruction stream into a raw byte image laid out
/// from `origin`, plus its debugger tokens.
///
/// Any per-instruction failure is wrapped in [`Error::Encode`] tagged
/// with the offending source line.
///
/// # Examples
///
/// ```
/// use libz80::assembler::{encode_program, OperandToken, ResolvedToken};
///
/// let tokens = [ResolvedToken {
///     mnemonic: "LD".to_string(),
///     operands: vec![
///         OperandToken::Register("BC".to_string()),
///         OperandToken::Immediate(0x1234),
///     ],
///     line: 1,
/// }];
///
/// let (image, debug) = encode_program(&tokens, 0x8000).unwrap();
/// assert_eq!(image, vec![0x01, 0x34, 0x12]);
/// assert_eq!(debug[0].address, 0x8000);
/// assert_eq!(debug[0].line, 1);
/// ```
pub fn encode_program(
    tokens: &[ResolvedToken],
    origin: u16,
) -> Result<(Vec<u8>, Vec<DebuggerToken>), Error> {
    let mut image = Vec::new();
    let mut debugger_tokens = Vec::with_capacity(tokens.len());

    for token in tokens {
        let bytes = encoder::encode_instruction(token).map_err(|source| Error::Encode {
            line: token.line,
            source: Box::new(source),
        })?;

        debugger_tokens.push(DebuggerToken {
            address: origin.wrapping_add(image.len() as u16),
            line: token.line,
        });
        image.extend_from_slice(&bytes);
    }

    Ok((image, debugger_tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ld(line: usize, dst: OperandToken, src: OperandToken) -> ResolvedToken {
        ResolvedToken {
            mnemonic: "LD".to_string(),
            operands: vec![dst, src],
            line,
        }
    }

    #[test]
    fn test_debugger_tokens_track_addresses() {
        let tokens = [
            ld(
                1,
                OperandToken::Register("BC".to_string()),
                OperandToken::Immediate(0x8000),
            ),
            ld(
                2,
                OperandToken::Register("A".to_string()),
                OperandToken::Register("B".to_string()),
            ),
            ResolvedToken {
                mnemonic: "HALT".to_string(),
                operands: vec![],
                line: 4,
            },
        ];

        let (image, debug) = encode_program(&tokens, 0x8000).unwrap();
        assert_eq!(image.len(), 5);
        assert_eq!(debug.len(), 3);
        assert_eq!(debug[0], DebuggerToken { address: 0x8000, line: 1 });
        assert_eq!(debug[1], DebuggerToken { address: 0x8003, line: 2 });
        assert_eq!(debug[2], DebuggerToken { address: 0x8004, line: 4 });
    }

    #[test]
    fn test_encode_failure_is_line_tagged() {
        let tokens = [ResolvedToken {
            mnemonic: "XYZZY".to_string(),
            operands: vec![],
            line: 7,
        }];

        match encode_program(&tokens, 0x8000) {
            Err(Error::Encode { line: 7, source }) => {
                assert!(matches!(*source, Error::UnknownMnemonic(_)));
            }
            other => panic!("expected line-tagged encode error, got {:?}", other),
        }
    }
}
