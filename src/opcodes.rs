//! # Shared Opcode and Operand Tables
//!
//! Single source of truth for the bit-field encodings shared by the
//! decoder and the instruction encoder. Both sides index the same tables;
//! a desync between "what the encoder emits" and "what the decoder reads"
//! is impossible as long as neither grows a private copy.
//!
//! The Z80 packs operand selection into small opcode sub-fields:
//!
//! - a 3-bit field selects one of eight `r` operands
//!   (`B,C,D,E,H,L,(HL),A`): [`RegSelect`];
//! - a 2-bit field selects one of four `dd` register pairs
//!   (`BC,DE,HL,SP`): [`PairSelect`].
//!
//! Three escape bytes switch the following byte into a private subtable:
//! `0xDD` (IX-indexed forms), `0xFD` (IY-indexed forms), and `0xED`
//! (extended operations).

use crate::registers::RegisterId;

/// Prefix byte selecting the IX-indexed opcode subtable.
pub const PREFIX_IX: u8 = 0xDD;

/// Prefix byte selecting the extended opcode subtable.
pub const PREFIX_EXTENDED: u8 = 0xED;

/// Prefix byte selecting the IY-indexed opcode subtable.
pub const PREFIX_IY: u8 = 0xFD;

/// The eight values of the 3-bit `r` operand field.
///
/// Field value 6 does not name a register: in plain opcodes it means
/// memory indirect through HL (or through IX/IY plus displacement under a
/// prefix), and `LD (HL),(HL)` is repurposed as HALT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegSelect {
    B = 0,
    C = 1,
    D = 2,
    E = 3,
    H = 4,
    L = 5,
    IndirectHl = 6,
    A = 7,
}

impl RegSelect {
    /// The decode table, indexed by the 3-bit field value.
    pub const TABLE: [RegSelect; 8] = [
        RegSelect::B,
        RegSelect::C,
        RegSelect::D,
        RegSelect::E,
        RegSelect::H,
        RegSelect::L,
        RegSelect::IndirectHl,
        RegSelect::A,
    ];

    /// Decodes a 3-bit field value (higher bits are masked off).
    pub fn from_code(code: u8) -> Self {
        Self::TABLE[(code & 0x07) as usize]
    }

    /// The 3-bit field value this operand encodes to.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The register this field selects, or `None` for the indirect slot.
    pub fn register(self) -> Option<RegisterId> {
        match self {
            RegSelect::B => Some(RegisterId::B),
            RegSelect::C => Some(RegisterId::C),
            RegSelect::D => Some(RegisterId::D),
            RegSelect::E => Some(RegisterId::E),
            RegSelect::H => Some(RegisterId::H),
            RegSelect::L => Some(RegisterId::L),
            RegSelect::IndirectHl => None,
            RegSelect::A => Some(RegisterId::A),
        }
    }

    /// The field value for a register, or `None` if the register has no
    /// `r`-field encoding.
    pub fn from_register(reg: RegisterId) -> Option<Self> {
        match reg {
            RegisterId::B => Some(RegSelect::B),
            RegisterId::C => Some(RegSelect::C),
            RegisterId::D => Some(RegSelect::D),
            RegisterId::E => Some(RegSelect::E),
            RegisterId::H => Some(RegSelect::H),
            RegisterId::L => Some(RegSelect::L),
            RegisterId::A => Some(RegSelect::A),
            _ => None,
        }
    }
}

/// The four values of the 2-bit `dd` register-pair field.
///
/// Under an index prefix the HL slot means IX or IY instead; that
/// substitution happens at the decode/encode site, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSelect {
    BC = 0,
    DE = 1,
    HL = 2,
    SP = 3,
}

impl PairSelect {
    /// The decode table, indexed by the 2-bit field value.
    pub const TABLE: [PairSelect; 4] =
        [PairSelect::BC, PairSelect::DE, PairSelect::HL, PairSelect::SP];

    /// Decodes a 2-bit field value (higher bits are masked off).
    pub fn from_code(code: u8) -> Self {
        Self::TABLE[(code & 0x03) as usize]
    }

    /// The 2-bit field value this pair encodes to.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The register pair this field selects.
    pub fn register(self) -> RegisterId {
        match self {
            PairSelect::BC => RegisterId::BC,
            PairSelect::DE => RegisterId::DE,
            PairSelect::HL => RegisterId::HL,
            PairSelect::SP => RegisterId::SP,
        }
    }

    /// The field value for a register pair, or `None` if the pair has no
    /// `dd`-field encoding.
    pub fn from_register(reg: RegisterId) -> Option<Self> {
        match reg {
            RegisterId::BC => Some(PairSelect::BC),
            RegisterId::DE => Some(PairSelect::DE),
            RegisterId::HL => Some(PairSelect::HL),
            RegisterId::SP => Some(PairSelect::SP),
            _ => None,
        }
    }
}
