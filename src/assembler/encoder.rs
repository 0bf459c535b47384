//! Instruction encoder: resolved tokens to machine-code bytes.
//!
//! The emission here is the mirror image of the decoder in
//! [`cpu`](crate::cpu): every byte sequence produced decodes back into an
//! operation with the identical register/memory effect, because both
//! sides index the shared tables in [`opcodes`](crate::opcodes). 16-bit
//! immediates are emitted low byte first, the order the decoder fetches
//! them.
//!
//! The mnemonic coverage matches the decoder's subset: the load group
//! (`LD` in all its plain, immediate, HL-indirect and IX/IY-displaced
//! forms), `NOP`, `HALT`, `LDI`, and `LDIR`.

use crate::assembler::{OperandToken, ResolvedToken};
use crate::opcodes::{PairSelect, RegSelect, PREFIX_EXTENDED, PREFIX_IX, PREFIX_IY};
use crate::registers::RegisterId;
use crate::Error;

/// Encodes one resolved instruction into its byte sequence.
///
/// Fails with [`Error::WrongOperandCount`] on arity mismatch,
/// [`Error::UnknownMnemonic`] for mnemonics outside the table, and
/// [`Error::UnsupportedOperands`] for operand shapes the instruction set
/// has no encoding for.
pub fn encode_instruction(token: &ResolvedToken) -> Result<Vec<u8>, Error> {
    match token.mnemonic.as_str() {
        "NOP" => {
            expect_operands(token, 0)?;
            Ok(vec![0x00])
        }
        "HALT" => {
            expect_operands(token, 0)?;
            Ok(vec![0x76])
        }
        "LDI" => {
            expect_operands(token, 0)?;
            Ok(vec![PREFIX_EXTENDED, 0xA0])
        }
        "LDIR" => {
            expect_operands(token, 0)?;
            Ok(vec![PREFIX_EXTENDED, 0xB0])
        }
        "LD" => {
            expect_operands(token, 2)?;
            encode_load(token, &token.operands[0], &token.operands[1])
        }
        _ => Err(Error::UnknownMnemonic(token.mnemonic.clone())),
    }
}

fn expect_operands(token: &ResolvedToken, expected: usize) -> Result<(), Error> {
    if token.operands.len() != expected {
        return Err(Error::WrongOperandCount {
            mnemonic: token.mnemonic.clone(),
            expected,
            found: token.operands.len(),
        });
    }
    Ok(())
}

fn unsupported(token: &ResolvedToken) -> Error {
    Error::UnsupportedOperands {
        mnemonic: token.mnemonic.clone(),
    }
}

/// Narrows an immediate to the 8-bit field of the byte-load forms.
/// A wider value is an error: truncating it would emit bytes that decode
/// to a different effect than the token describes.
fn byte_immediate(token: &ResolvedToken, value: u16) -> Result<u8, Error> {
    if value > 0xFF {
        return Err(Error::ImmediateOutOfRange {
            mnemonic: token.mnemonic.clone(),
            value,
            width: 8,
        });
    }
    Ok(value as u8)
}

fn encode_load(
    token: &ResolvedToken,
    dst: &OperandToken,
    src: &OperandToken,
) -> Result<Vec<u8>, Error> {
    match (dst, src) {
        // LD r,r': 01 ddd sss
        (OperandToken::Register(d), OperandToken::Register(s)) => {
            let d = RegisterId::from_name(d)?;
            let s = RegisterId::from_name(s)?;
            match (RegSelect::from_register(d), RegSelect::from_register(s)) {
                (Some(dsel), Some(ssel)) => {
                    Ok(vec![0x40 | (dsel.code() << 3) | ssel.code()])
                }
                _ => Err(unsupported(token)),
            }
        }

        // LD r,n / LD dd,nn / LD IX,nn / LD IY,nn
        (OperandToken::Register(d), OperandToken::Immediate(value)) => {
            let d = RegisterId::from_name(d)?;
            if let Some(dsel) = RegSelect::from_register(d) {
                return Ok(vec![0x06 | (dsel.code() << 3), byte_immediate(token, *value)?]);
            }
            if let Some(pair) = PairSelect::from_register(d) {
                let [lo, hi] = value.to_le_bytes();
                return Ok(vec![0x01 | (pair.code() << 4), lo, hi]);
            }
            match d {
                RegisterId::IX => {
                    let [lo, hi] = value.to_le_bytes();
                    Ok(vec![PREFIX_IX, 0x21, lo, hi])
                }
                RegisterId::IY => {
                    let [lo, hi] = value.to_le_bytes();
                    Ok(vec![PREFIX_IY, 0x21, lo, hi])
                }
                _ => Err(unsupported(token)),
            }
        }

        // LD r,(HL): 01 ddd 110
        (OperandToken::Register(d), OperandToken::Indirect(through)) => {
            let d = RegisterId::from_name(d)?;
            check_indirect_register(token, through)?;
            let dsel = RegSelect::from_register(d).ok_or_else(|| unsupported(token))?;
            Ok(vec![
                0x40 | (dsel.code() << 3) | RegSelect::IndirectHl.code(),
            ])
        }

        // LD (HL),r: 01 110 sss
        (OperandToken::Indirect(through), OperandToken::Register(s)) => {
            let s = RegisterId::from_name(s)?;
            check_indirect_register(token, through)?;
            let ssel = RegSelect::from_register(s).ok_or_else(|| unsupported(token))?;
            Ok(vec![
                0x40 | (RegSelect::IndirectHl.code() << 3) | ssel.code(),
            ])
        }

        // LD (HL),n
        (OperandToken::Indirect(through), OperandToken::Immediate(value)) => {
            check_indirect_register(token, through)?;
            Ok(vec![0x36, byte_immediate(token, *value)?])
        }

        // LD r,(IX+d) / LD r,(IY+d)
        (
            OperandToken::Register(d),
            OperandToken::Indexed {
                index,
                displacement,
            },
        ) => {
            let d = RegisterId::from_name(d)?;
            let prefix = index_prefix(token, index)?;
            let dsel = RegSelect::from_register(d).ok_or_else(|| unsupported(token))?;
            Ok(vec![
                prefix,
                0x40 | (dsel.code() << 3) | RegSelect::IndirectHl.code(),
                *displacement as u8,
            ])
        }

        // LD (IX+d),r / LD (IY+d),r
        (
            OperandToken::Indexed {
                index,
                displacement,
            },
            OperandToken::Register(s),
        ) => {
            let s = RegisterId::from_name(s)?;
            let prefix = index_prefix(token, index)?;
            let ssel = RegSelect::from_register(s).ok_or_else(|| unsupported(token))?;
            Ok(vec![
                prefix,
                0x40 | (RegSelect::IndirectHl.code() << 3) | ssel.code(),
                *displacement as u8,
            ])
        }

        // LD (IX+d),n / LD (IY+d),n: displacement byte precedes the
        // immediate, matching the decoder's fetch order
        (
            OperandToken::Indexed {
                index,
                displacement,
            },
            OperandToken::Immediate(value),
        ) => {
            let prefix = index_prefix(token, index)?;
            Ok(vec![prefix, 0x36, *displacement as u8, byte_immediate(token, *value)?])
        }

        _ => Err(unsupported(token)),
    }
}

/// The covered subset only addresses memory indirectly through HL (or
/// through an index register via [`OperandToken::Indexed`]).
fn check_indirect_register(token: &ResolvedToken, through: &str) -> Result<(), Error> {
    if RegisterId::from_name(through)? != RegisterId::HL {
        return Err(unsupported(token));
    }
    Ok(())
}

fn index_prefix(token: &ResolvedToken, index: &str) -> Result<u8, Error> {
    match RegisterId::from_name(index)? {
        RegisterId::IX => Ok(PREFIX_IX),
        RegisterId::IY => Ok(PREFIX_IY),
        _ => Err(unsupported(token)),
    }
}
